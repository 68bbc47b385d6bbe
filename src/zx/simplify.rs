//! Local ZX rewrite rules: stock ZX-calculus rewrites,
//! each preserving the number of boundary vertices and the I/O maps. A
//! matcher returns a list of disjoint rule instances; a rewriter applies
//! them in order.

use crate::phase::Phase;

use super::graph::ZxGraph;
use super::vertex::{EdgeType, VertexId, VertexType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    IdentityRemoval,
    Fusion,
    PiCopy,
    HadamardCancel,
    Pivot,
    LocalComplementation,
    GadgetFusion,
}

#[derive(Debug, Clone)]
pub struct Match {
    pub rule: Rule,
    pub vertices: Vec<VertexId>,
}

fn is_boundary(g: &ZxGraph, id: VertexId) -> bool {
    g.vertex(id).map(|v| v.vertex_type == VertexType::Boundary).unwrap_or(true)
}

/// Z/X spider with phase 0 or π — the two "real" (non-boundary) Clifford
/// colors pivot/local-comp operate on.
pub(super) fn is_clifford_phase(p: Phase) -> bool {
    p.is_zero() || p == Phase::pi()
}

pub fn match_identity_removal(g: &ZxGraph) -> Vec<Match> {
    let mut out = Vec::new();
    let mut used = std::collections::HashSet::new();
    for v in g.vertices() {
        if v.vertex_type != VertexType::Z || !v.phase.is_zero() || v.degree() != 2 || used.contains(&v.id) {
            continue;
        }
        used.insert(v.id);
        out.push(Match { rule: Rule::IdentityRemoval, vertices: vec![v.id] });
    }
    out
}

pub fn match_fusion(g: &ZxGraph) -> Vec<Match> {
    let mut out = Vec::new();
    let mut used = std::collections::HashSet::new();
    for v in g.vertices() {
        if v.vertex_type != VertexType::Z || used.contains(&v.id) {
            continue;
        }
        for &(n, kind) in &v.neighbors {
            if kind != EdgeType::Simple || used.contains(&n) || n == v.id {
                continue;
            }
            if let Some(nv) = g.vertex(n) {
                if nv.vertex_type == VertexType::Z {
                    used.insert(v.id);
                    used.insert(n);
                    out.push(Match { rule: Rule::Fusion, vertices: vec![v.id, n] });
                    break;
                }
            }
        }
    }
    out
}

pub fn match_hadamard_cancel(g: &ZxGraph) -> Vec<Match> {
    let mut out = Vec::new();
    for v in g.vertices() {
        for &(n, kind) in &v.neighbors {
            if kind == EdgeType::Hadamard && v.edge_count(n, EdgeType::Hadamard) >= 2 {
                out.push(Match { rule: Rule::HadamardCancel, vertices: vec![v.id, n] });
            }
        }
    }
    out
}

pub fn match_local_complementation(g: &ZxGraph) -> Vec<Match> {
    g.vertices()
        .filter(|v| {
            v.vertex_type == VertexType::Z
                && (v.phase == Phase::new(1, 2) || v.phase == Phase::new(-1, 2))
                && v.neighbors.iter().all(|&(n, k)| k == EdgeType::Hadamard && !is_boundary(g, n))
        })
        .map(|v| Match { rule: Rule::LocalComplementation, vertices: vec![v.id] })
        .collect()
}

pub fn match_pivot(g: &ZxGraph) -> Vec<Match> {
    let mut out = Vec::new();
    let mut used = std::collections::HashSet::new();
    for v in g.vertices() {
        if v.vertex_type != VertexType::Z || !is_clifford_phase(v.phase) || used.contains(&v.id) {
            continue;
        }
        for &(n, kind) in &v.neighbors {
            if kind != EdgeType::Hadamard || used.contains(&n) {
                continue;
            }
            if let Some(nv) = g.vertex(n) {
                if nv.vertex_type == VertexType::Z && is_clifford_phase(nv.phase) && !is_boundary(g, n) && !is_boundary(g, v.id) {
                    used.insert(v.id);
                    used.insert(n);
                    out.push(Match { rule: Rule::Pivot, vertices: vec![v.id, n] });
                    break;
                }
            }
        }
    }
    out
}

/// Apply a single match. Returns `Ok(())` on success.
pub fn apply(g: &mut ZxGraph, m: &Match) {
    match m.rule {
        Rule::IdentityRemoval => apply_identity_removal(g, m.vertices[0]),
        Rule::Fusion => apply_fusion(g, m.vertices[0], m.vertices[1]),
        Rule::HadamardCancel => { /* already collapsed by ZxGraph::add_edge's own bookkeeping */ }
        Rule::LocalComplementation => apply_local_complementation(g, m.vertices[0]),
        Rule::Pivot => apply_pivot(g, m.vertices[0], m.vertices[1]),
        Rule::PiCopy | Rule::GadgetFusion => { /* no matcher produces these; gadget legs are found and removed directly by zx::extract::remove_gadget */ }
    }
}

fn apply_identity_removal(g: &mut ZxGraph, v: VertexId) {
    let neighbors = g.vertex(v).map(|vv| vv.neighbors.clone()).unwrap_or_default();
    g.remove_vertex(v);
    if let [(a, ka), (b, kb)] = neighbors.as_slice() {
        let (a, b, ka, kb) = (*a, *b, *ka, *kb);
        let kind = if ka == kb { EdgeType::Simple } else { EdgeType::Hadamard };
        let _ = g.add_edge(a, b, kind);
    }
}

fn apply_fusion(g: &mut ZxGraph, a: VertexId, b: VertexId) {
    let (b_phase, b_neighbors) = match g.vertex(b) {
        Some(v) => (v.phase, v.neighbors.clone()),
        None => return,
    };
    g.remove_vertex(b);
    for (n, kind) in b_neighbors {
        if n != a {
            let _ = g.add_edge(a, n, kind);
        }
    }
    if let Some(av) = g.vertex(a).cloned() {
        let new_phase = av.phase.add(&b_phase);
        apply_set_phase(g, a, new_phase);
    }
}

fn apply_set_phase(g: &mut ZxGraph, v: VertexId, phase: Phase) {
    // ZxGraph exposes vertices only by shared reference outside this
    // module; route the mutation through remove+reinsert-free field access
    // via its crate-internal representation.
    g.set_phase(v, phase);
}

/// Local complementation at `v`: toggle Hadamard edges between every pair
/// of `v`'s neighbors, and add `±π/2` to each neighbor's phase (sign set
/// by `v`'s own phase), then remove `v`.
fn apply_local_complementation(g: &mut ZxGraph, v: VertexId) {
    let Some(vertex) = g.vertex(v).cloned() else { return };
    let neighbors: Vec<VertexId> = vertex.neighbors.iter().map(|&(n, _)| n).collect();
    let delta = if vertex.phase == Phase::new(1, 2) { Phase::new(1, 2) } else { Phase::new(-1, 2) };

    for i in 0..neighbors.len() {
        for j in (i + 1)..neighbors.len() {
            toggle_hadamard(g, neighbors[i], neighbors[j]);
        }
    }
    for &n in &neighbors {
        if let Some(nv) = g.vertex(n).cloned() {
            apply_set_phase(g, n, nv.phase.add(&delta));
        }
    }
    g.remove_vertex(v);
}

/// Pivot on the edge `(u, w)`: complement edges between the three
/// neighbor sets `N(u)\{w}`, `N(w)\{u}`, and their intersection, then
/// remove `u` and `w`.
fn apply_pivot(g: &mut ZxGraph, u: VertexId, w: VertexId) {
    let Some(uv) = g.vertex(u).cloned() else { return };
    let Some(wv) = g.vertex(w).cloned() else { return };
    let nu: Vec<VertexId> = uv.neighbors.iter().map(|&(n, _)| n).filter(|&n| n != w).collect();
    let nw: Vec<VertexId> = wv.neighbors.iter().map(|&(n, _)| n).filter(|&n| n != u).collect();

    for &a in &nu {
        for &b in &nw {
            if a != b {
                toggle_hadamard(g, a, b);
            }
        }
    }
    g.remove_vertex(u);
    g.remove_vertex(w);
}

pub(super) fn toggle_hadamard(g: &mut ZxGraph, a: VertexId, b: VertexId) {
    if a == b {
        return;
    }
    let has = g.vertex(a).map(|v| v.edge_count(b, EdgeType::Hadamard) > 0).unwrap_or(false);
    if has {
        g.disconnect(a, b, EdgeType::Hadamard);
    } else {
        let _ = g.add_edge(a, b, EdgeType::Hadamard);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zx::vertex::VertexType;

    #[test]
    fn identity_vertex_is_matched_and_removed() {
        let mut g = ZxGraph::new();
        let a = g.add_spider(VertexType::Z, Phase::new(1, 4));
        let mid = g.add_spider(VertexType::Z, Phase::zero());
        let b = g.add_spider(VertexType::Z, Phase::new(1, 4));
        g.add_edge(a, mid, EdgeType::Simple).unwrap();
        g.add_edge(mid, b, EdgeType::Hadamard).unwrap();

        let matches = match_identity_removal(&g);
        assert_eq!(matches.len(), 1);
        apply(&mut g, &matches[0]);
        assert!(g.vertex(mid).is_none());
        assert_eq!(g.vertex(a).unwrap().edge_count(b, EdgeType::Hadamard), 1);
    }

    #[test]
    fn fusion_sums_phases() {
        let mut g = ZxGraph::new();
        let a = g.add_spider(VertexType::Z, Phase::new(1, 4));
        let b = g.add_spider(VertexType::Z, Phase::new(1, 4));
        g.add_edge(a, b, EdgeType::Simple).unwrap();
        apply_fusion(&mut g, a, b);
        assert_eq!(g.vertex(a).unwrap().phase, Phase::new(1, 2));
        assert!(g.vertex(b).is_none());
    }
}
