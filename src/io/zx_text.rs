//! The ZX text format: one vertex per line,
//! `<type><id> [(<qubit>,<col>)] [<edgeType><neighborId>...] [<phase>]`.
//! This module owns only the grammar, not file-system I/O (the
//! caller supplies and collects `String`s).
//!
//! File vertex IDs are remapped to fresh graph IDs in declaration order
//! rather than forced to match literally — a file written by [`write`]
//! always declares vertices in ascending ID order, so the round trip is
//! structurally identical; a hand-edited file with gaps or reordered IDs
//! still parses, just under renumbered IDs.

use std::collections::HashMap;
use std::fmt::Write as _;

use crate::error::{Error, Result};
use crate::phase::Phase;
use crate::zx::{EdgeType, VertexId, VertexType, ZxGraph};

struct ParsedLine {
    vertex_type: VertexType,
    file_id: usize,
    coord: Option<(usize, i64)>,
    edges: Vec<(EdgeType, usize)>,
    phase: Option<Phase>,
}

fn parse_header(token: &str) -> Result<(VertexType, usize)> {
    let mut chars = token.chars();
    let tag = chars.next().ok_or_else(|| Error::Parse("empty vertex header".to_string()))?;
    let vertex_type = match tag {
        'I' => VertexType::Boundary,
        'O' => VertexType::Boundary,
        'Z' => VertexType::Z,
        'X' => VertexType::X,
        'H' => VertexType::H,
        other => return Err(Error::Parse(format!("unknown vertex type tag {other:?}"))),
    };
    let id: usize = chars.as_str().parse().map_err(|_| Error::Parse(format!("bad vertex id in {token:?}")))?;
    Ok((vertex_type, id))
}

fn parse_coord(token: &str) -> Result<(usize, i64)> {
    let inner = token.strip_prefix('(').and_then(|t| t.strip_suffix(')')).ok_or_else(|| Error::Parse(format!("bad coordinate {token:?}")))?;
    let (q, c) = inner.split_once(',').ok_or_else(|| Error::Parse(format!("bad coordinate {token:?}")))?;
    let qubit = if q.trim() == "-" { 0 } else { q.trim().parse().map_err(|_| Error::Parse(format!("bad qubit in {token:?}")))? };
    let col = if c.trim() == "-" { 0 } else { c.trim().parse().map_err(|_| Error::Parse(format!("bad column in {token:?}")))? };
    Ok((qubit, col))
}

fn is_edge_token(token: &str) -> bool {
    let mut chars = token.chars();
    matches!(chars.next(), Some('S') | Some('H')) && !chars.as_str().is_empty() && chars.as_str().chars().all(|c| c.is_ascii_digit())
}

fn parse_line(line: &str) -> Result<ParsedLine> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let (vertex_type, file_id) = parse_header(tokens[0])?;
    let is_boundary_line = line.starts_with('I') || line.starts_with('O');

    let mut rest = &tokens[1..];
    let coord = if let Some(first) = rest.first() {
        if first.starts_with('(') {
            let c = parse_coord(first)?;
            rest = &rest[1..];
            Some(c)
        } else {
            None
        }
    } else {
        None
    };

    if is_boundary_line && coord.is_none() {
        return Err(Error::Parse(format!("boundary vertex {file_id} is missing its (qubit,col)")));
    }

    let mut edges = Vec::new();
    let mut idx = 0;
    while idx < rest.len() && is_edge_token(rest[idx]) {
        let kind = if rest[idx].starts_with('S') { EdgeType::Simple } else { EdgeType::Hadamard };
        let id: usize = rest[idx][1..].parse().map_err(|_| Error::Parse(format!("bad neighbor id in {:?}", rest[idx])))?;
        edges.push((kind, id));
        idx += 1;
    }

    let phase = if idx < rest.len() {
        if idx != rest.len() - 1 {
            return Err(Error::Parse("phase, if present, must be the final token".to_string()));
        }
        Some(Phase::from_string(rest[idx])?)
    } else {
        None
    };

    if is_boundary_line && phase.is_some() {
        return Err(Error::Parse(format!("boundary vertex {file_id} must not carry a phase")));
    }
    if vertex_type == VertexType::H && phase.is_some() {
        return Err(Error::Parse(format!("H-box vertex {file_id} carries an implicit pi phase and cannot be given one")));
    }

    Ok(ParsedLine { vertex_type, file_id, coord, edges, phase })
}

/// Parse a complete ZX text document into a graph.
pub fn parse(text: &str) -> Result<ZxGraph> {
    let mut parsed = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        parsed.push(parse_line(line)?);
    }

    let mut graph = ZxGraph::new();
    let mut id_map: HashMap<usize, VertexId> = HashMap::new();
    let mut seen_qubits: HashMap<usize, bool> = HashMap::new();
    let mut h_boxes: Vec<(usize, Vec<usize>)> = Vec::new();
    let mut seen_ids: HashMap<usize, bool> = HashMap::new();

    for line in &parsed {
        if line.vertex_type != VertexType::H && seen_ids.insert(line.file_id, true).is_some() {
            return Err(Error::Parse(format!("duplicate vertex id {}", line.file_id)));
        }
    }

    for (raw_line, line) in text.lines().zip(parsed.iter()).filter(|(raw, _)| !raw.trim().is_empty()) {
        let raw = raw_line.trim();
        match line.vertex_type {
            VertexType::Boundary => {
                let (qubit, col) = line.coord.unwrap();
                if seen_qubits.insert(qubit, true).is_some() {
                    return Err(Error::Parse(format!("duplicate boundary qubit {qubit}")));
                }
                let is_input = raw.starts_with('I');
                let id = graph.add_boundary(qubit, col, is_input);
                id_map.insert(line.file_id, id);
            }
            VertexType::Z | VertexType::X => {
                let id = graph.add_spider(line.vertex_type, line.phase.unwrap_or_else(Phase::zero));
                id_map.insert(line.file_id, id);
            }
            VertexType::H => {
                h_boxes.push((line.file_id, line.edges.iter().map(|&(_, n)| n).collect()));
            }
        }
    }

    for line in &parsed {
        if matches!(line.vertex_type, VertexType::Boundary | VertexType::Z | VertexType::X) {
            let &a = id_map.get(&line.file_id).ok_or_else(|| Error::Parse(format!("unknown vertex id {}", line.file_id)))?;
            for &(kind, neighbor_file_id) in &line.edges {
                if let Some(&b) = id_map.get(&neighbor_file_id) {
                    if b > a {
                        graph.add_edge(a, b, kind)?;
                    }
                }
            }
        }
    }

    for (_, neighbors) in &h_boxes {
        if neighbors.len() != 2 {
            return Err(Error::Parse("an H-box vertex must have exactly two neighbors".to_string()));
        }
        let &a = id_map.get(&neighbors[0]).ok_or_else(|| Error::Parse(format!("unknown vertex id {}", neighbors[0])))?;
        let &b = id_map.get(&neighbors[1]).ok_or_else(|| Error::Parse(format!("unknown vertex id {}", neighbors[1])))?;
        graph.add_edge(a, b, EdgeType::Hadamard)?;
    }

    Ok(graph)
}

/// Print a graph back into the text format, declaring vertices in
/// ascending id order and each edge only once (on its lower-id endpoint).
pub fn write(graph: &ZxGraph) -> String {
    let mut out = String::new();
    let mut ids: Vec<VertexId> = graph.vertices().map(|v| v.id).collect();
    ids.sort_unstable();

    for id in ids {
        let v = graph.vertex(id).unwrap();
        let tag = match v.vertex_type {
            VertexType::Boundary => {
                if graph.inputs().contains(&id) {
                    "I"
                } else {
                    "O"
                }
            }
            VertexType::Z => "Z",
            VertexType::X => "X",
            VertexType::H => "H",
        };
        write!(out, "{tag}{id}").unwrap();
        if let Some((q, c)) = v.qubit_col {
            write!(out, " ({q},{c})").unwrap();
        }
        for &(n, kind) in &v.neighbors {
            if n > id {
                let letter = match kind {
                    EdgeType::Simple => 'S',
                    EdgeType::Hadamard => 'H',
                };
                write!(out, " {letter}{n}").unwrap();
            }
        }
        if v.vertex_type == VertexType::Z || v.vertex_type == VertexType::X {
            write!(out, " {}", phase_token(v.phase)).unwrap();
        }
        out.push('\n');
    }
    out
}

fn phase_token(phase: Phase) -> String {
    if phase.is_zero() {
        "0".to_string()
    } else {
        phase.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_the_canonical_cx_diagram() {
        let mut g = ZxGraph::new();
        let i0 = g.add_boundary(0, 0, true);
        let i1 = g.add_boundary(1, 0, true);
        let o0 = g.add_boundary(0, 1, false);
        let o1 = g.add_boundary(1, 1, false);
        let z = g.add_spider(VertexType::Z, Phase::zero());
        let x = g.add_spider(VertexType::X, Phase::zero());
        g.add_edge(i0, z, EdgeType::Simple).unwrap();
        g.add_edge(z, o0, EdgeType::Simple).unwrap();
        g.add_edge(i1, x, EdgeType::Simple).unwrap();
        g.add_edge(x, o1, EdgeType::Simple).unwrap();
        g.add_edge(z, x, EdgeType::Hadamard).unwrap();

        let text = write(&g);
        let reparsed = parse(&text).unwrap();
        assert_eq!(reparsed.num_vertices(), g.num_vertices());
        assert_eq!(reparsed.inputs().len(), 2);
        assert_eq!(reparsed.outputs().len(), 2);
    }

    #[test]
    fn boundary_without_coordinate_is_rejected() {
        assert!(parse("I0\n").is_err());
    }

    #[test]
    fn phase_must_be_the_last_token() {
        assert!(parse_line("Z0 S1 pi S2").is_err());
    }

    #[test]
    fn duplicate_boundary_qubits_are_rejected() {
        let text = "I0 (0,0) S2\nI1 (0,0) S3\nZ2 S0\nZ3 S1\n";
        assert!(parse(text).is_err());
    }
}
