//! Dense row-major matrix over F₂ with a row-operation log.
//!
//! The log is the only observable side effect of reduction, and every
//! synthesis algorithm downstream (CX extraction, tableau synthesis)
//! replays it to emit gates.

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitMatrix {
    rows: Vec<Vec<u8>>,
    row_ops: Vec<(usize, usize)>,
}

impl BitMatrix {
    pub fn zeros(num_rows: usize, num_cols: usize) -> Self {
        BitMatrix {
            rows: vec![vec![0u8; num_cols]; num_rows],
            row_ops: Vec::new(),
        }
    }

    pub fn from_rows(rows: Vec<Vec<u8>>) -> Self {
        BitMatrix { rows, row_ops: Vec::new() }
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_cols(&self) -> usize {
        self.rows.first().map_or(0, |r| r.len())
    }

    pub fn row(&self, i: usize) -> &[u8] {
        &self.rows[i]
    }

    pub fn get(&self, i: usize, j: usize) -> u8 {
        self.rows[i][j]
    }

    pub fn set(&mut self, i: usize, j: usize, v: u8) {
        self.rows[i][j] = v & 1;
    }

    pub fn row_operations(&self) -> &[(usize, usize)] {
        &self.row_ops
    }

    pub fn clear_row_operations(&mut self) {
        self.row_ops.clear();
    }

    pub fn push_zeros_column(&mut self) {
        for row in &mut self.rows {
            row.push(0);
        }
    }

    /// XOR `src` into `tgt` and append `(src, tgt)` to the row-operation log.
    pub fn row_op(&mut self, src: usize, tgt: usize) {
        assert!(src < self.rows.len() && tgt < self.rows.len());
        let src_row = self.rows[src].clone();
        let tgt_row = &mut self.rows[tgt];
        for (t, s) in tgt_row.iter_mut().zip(src_row.iter()) {
            *t ^= s;
        }
        self.row_ops.push((src, tgt));
    }

    fn row_is_zero(&self, i: usize) -> bool {
        self.rows[i].iter().all(|&b| b == 0)
    }

    /// Reduce to row-reduced identity on the leftmost `min(rows, cols)`
    /// block. Fails with [`Error::Semantics`] if the system is singular.
    pub fn gaussian_elimination(&mut self) -> Result<()> {
        self.row_ops.clear();
        let num_variables = self.num_cols();
        let num_rows = self.num_rows();
        if num_rows == 0 {
            return Ok(());
        }

        let bound = std::cmp::min(num_rows.saturating_sub(1), num_variables);
        for i in 0..bound {
            if self.get(i, i) != 1 {
                let mut found = false;
                for j in (i + 1)..num_rows {
                    if self.get(j, i) == 1 {
                        self.row_op(j, i);
                        found = true;
                        break;
                    }
                }
                if !found {
                    return Err(Error::Semantics("bit matrix is singular".to_string()));
                }
            }
            for j in (i + 1)..num_rows {
                if self.get(j, i) == 1 && self.get(i, i) == 1 {
                    self.row_op(i, j);
                }
            }
        }

        for i in 0..num_rows {
            let pivot_row = num_rows - i - 1;
            for j in (num_rows - i)..num_rows {
                if self.get(pivot_row, j) == 1 {
                    self.row_op(j, pivot_row);
                }
            }
        }
        Ok(())
    }

    /// Treat the last column as the RHS; returns whether the system is
    /// solvable (consistent), leaving the matrix in echelon form either way.
    pub fn gaussian_elimination_augmented(&mut self) -> bool {
        self.row_ops.clear();
        let num_variables = self.num_cols().saturating_sub(1);
        let num_rows = self.num_rows();

        let mut cur_row = 0usize;
        let mut cur_col = 0usize;

        while cur_row < num_rows && cur_col < num_variables {
            if (0..num_rows).all(|r| self.get(r, cur_col) == 0) {
                cur_col += 1;
                continue;
            }

            if self.get(cur_row, cur_col) == 0 {
                let pivot = (cur_row..num_rows).find(|&r| self.get(r, cur_col) == 1);
                match pivot {
                    None => {
                        cur_col += 1;
                        continue;
                    }
                    Some(r) => self.row_op(r, cur_row),
                }
            }

            for r in 0..num_rows {
                if r != cur_row && self.get(r, cur_col) == 1 {
                    self.row_op(cur_row, r);
                }
            }

            cur_row += 1;
            cur_col += 1;
        }

        (cur_row..num_rows).all(|r| *self.rows[r].last().unwrap_or(&0) == 0)
    }

    /// Block-wise echelon reduction with duplicate-subvector skipping.
    /// Returns the matrix rank; emits fewer row-ops than naive elimination
    /// because rows sharing a block's sub-vector are folded together first.
    pub fn gaussian_elimination_skip(&mut self, block_size: usize, fully_reduced: bool) -> usize {
        self.row_ops.clear();
        assert!(block_size > 0);
        let num_cols = self.num_cols();
        let num_rows = self.num_rows();
        let n_sections = (num_cols + block_size - 1) / block_size;
        let mut pivots: Vec<usize> = Vec::new();

        let section_range = |idx: usize| {
            let begin = idx * block_size;
            let end = std::cmp::min(num_cols, (idx + 1) * block_size);
            (begin, end)
        };

        for section_idx in 0..n_sections {
            let (begin, end) = section_range(section_idx);
            self.clear_section_duplicates(begin, end, pivots.len()..num_rows);

            for col in begin..end {
                let row_idx = (pivots.len()..num_rows).find(|&r| self.get(r, col) == 1);
                let row_idx = match row_idx {
                    Some(r) => r,
                    None => continue,
                };
                if row_idx != pivots.len() {
                    self.row_op(row_idx, pivots.len());
                }
                let pivot_row = pivots.len();
                for r in (pivot_row + 1)..num_rows {
                    if self.get(r, col) == 1 {
                        self.row_op(pivot_row, r);
                    }
                }
                if fully_reduced {
                    pivots.push(col);
                }
            }
        }

        let rank = pivots.len();
        if !fully_reduced || rank == 0 {
            return rank;
        }

        for section_idx in (0..n_sections).rev() {
            let (begin, end) = section_range(section_idx);
            self.clear_section_duplicates_rev(begin, end, pivots.len());

            while let Some(&last) = pivots.last() {
                if last < begin || last >= end {
                    break;
                }
                pivots.pop();
                let pivot_row = pivots.len();
                for r in 0..pivot_row {
                    if self.get(r, last) == 1 {
                        self.row_op(pivot_row, r);
                    }
                }
                if pivots.is_empty() {
                    return rank;
                }
            }
        }

        rank
    }

    fn clear_section_duplicates(&mut self, begin: usize, end: usize, rows: std::ops::Range<usize>) {
        use std::collections::HashMap;
        let mut seen: HashMap<Vec<u8>, usize> = HashMap::new();
        for r in rows {
            let sub: Vec<u8> = self.rows[r][begin..end].to_vec();
            if sub.iter().all(|&b| b == 0) {
                continue;
            }
            if let Some(&first) = seen.get(&sub) {
                self.row_op(first, r);
            } else {
                seen.insert(sub, r);
            }
        }
    }

    fn clear_section_duplicates_rev(&mut self, begin: usize, end: usize, num_pivot_rows: usize) {
        use std::collections::HashMap;
        let mut seen: HashMap<Vec<u8>, usize> = HashMap::new();
        for r in (0..num_pivot_rows).rev() {
            let sub: Vec<u8> = self.rows[r][begin..end].to_vec();
            if sub.iter().all(|&b| b == 0) {
                continue;
            }
            if let Some(&first) = seen.get(&sub) {
                self.row_op(first, r);
            } else {
                seen.insert(sub, r);
            }
        }
    }

    /// Rank over F₂, computed via a throwaway Gaussian elimination.
    pub fn matrix_rank(&self) -> usize {
        let mut copy = self.clone();
        // Fall back to the non-augmented, rectangular-safe skip variant so
        // this works for non-square matrices too.
        copy.gaussian_elimination_skip(copy.num_cols().max(1), false)
    }

    /// Cancel consecutive involutive `(a,b)`/`(b,a)` pairs in the log.
    pub fn filter_duplicate_row_operations(&mut self) -> usize {
        use std::collections::HashMap;
        #[derive(Clone, Copy)]
        struct RowAndOp {
            row_idx: usize,
            op_idx: usize,
        }
        let mut last_used: HashMap<usize, RowAndOp> = HashMap::new();
        let mut dups: Vec<usize> = Vec::new();

        for i in 0..self.row_ops.len() {
            let (src, tgt) = self.row_ops[i];
            let first_match = last_used
                .get(&src)
                .map(|r| r.row_idx == tgt && self.row_ops[r.op_idx].0 == src)
                .unwrap_or(false);
            let second_match = last_used
                .get(&tgt)
                .map(|r| r.row_idx == src && self.row_ops[r.op_idx].1 == tgt)
                .unwrap_or(false);

            if first_match && second_match {
                dups.push(i);
                dups.push(last_used[&tgt].op_idx);
                last_used.remove(&src);
                last_used.remove(&tgt);
            } else {
                last_used.insert(src, RowAndOp { row_idx: tgt, op_idx: i });
                last_used.insert(tgt, RowAndOp { row_idx: src, op_idx: i });
            }
        }

        dups.sort_unstable();
        dups.dedup();
        let removed = dups.len();
        for &idx in dups.iter().rev() {
            self.row_ops.remove(idx);
        }
        removed
    }

    /// Longest chain of dependent row operations (diagnostic only).
    pub fn row_operation_depth(&self) -> usize {
        use std::collections::HashMap;
        if self.row_ops.is_empty() {
            return 0;
        }
        let mut depth: HashMap<usize, usize> = HashMap::new();
        for &(a, b) in &self.row_ops {
            let da = *depth.get(&a).unwrap_or(&0);
            let db = *depth.get(&b).unwrap_or(&0);
            let m = da.max(db) + 1;
            depth.insert(a, m);
            depth.insert(b, m);
        }
        *depth.values().max().unwrap_or(&0)
    }

    /// `depth / len(row_ops)`, rounded to two decimals (diagnostic only).
    pub fn dense_ratio(&self) -> f64 {
        let depth = self.row_operation_depth();
        if depth == 0 {
            return 0.0;
        }
        let ratio = depth as f64 / self.row_ops.len() as f64;
        (ratio * 100.0).round() / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_op_xors_and_logs() {
        let mut m = BitMatrix::from_rows(vec![vec![1, 0, 1], vec![0, 1, 1]]);
        m.row_op(0, 1);
        assert_eq!(m.row(1), &[1, 1, 0]);
        assert_eq!(m.row_operations(), &[(0, 1)]);
    }

    #[test]
    fn gaussian_elimination_reduces_identity() {
        let mut m = BitMatrix::from_rows(vec![vec![1, 1], vec![0, 1]]);
        m.gaussian_elimination().unwrap();
        assert_eq!(m.row(0), &[1, 0]);
        assert_eq!(m.row(1), &[0, 1]);
    }

    #[test]
    fn gaussian_elimination_detects_singular() {
        let mut m = BitMatrix::from_rows(vec![vec![1, 1], vec![1, 1]]);
        assert!(m.gaussian_elimination().is_err());
    }

    #[test]
    fn row_op_log_matches_product_of_elementary_matrices() {
        // Replaying the log on an identity matrix should reproduce the
        // same net transformation as applying it directly.
        let original = BitMatrix::from_rows(vec![vec![1, 0, 1], vec![0, 1, 1], vec![1, 1, 0]]);
        let mut reduced = original.clone();
        reduced.gaussian_elimination_skip(2, true);

        let mut replay = original.clone();
        for &(src, tgt) in reduced.row_operations() {
            replay.row_op(src, tgt);
        }
        assert_eq!(replay.rows, reduced.rows);
    }

    #[test]
    fn filter_duplicate_cancels_involutive_pairs() {
        let mut m = BitMatrix::zeros(2, 2);
        m.row_op(0, 1);
        m.row_op(0, 1);
        let removed = m.filter_duplicate_row_operations();
        assert_eq!(removed, 2);
        assert!(m.row_operations().is_empty());
    }

    #[test]
    fn matrix_rank_of_identity_is_full() {
        let m = BitMatrix::from_rows(vec![vec![1, 0], vec![0, 1]]);
        assert_eq!(m.matrix_rank(), 2);
    }
}
