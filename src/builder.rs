/*
 * SPDX-FileCopyrightText: 2023 Inria
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Three-pass construction of a CSR layout from an edge-list stream,
//! without ever materializing a per-vertex adjacency list.

use crate::error::{GraphError, ParseReason};
use crate::reader::EdgeListReader;

/// The four CSR fields, built in one shot from an [`EdgeListReader`].
pub struct Csr {
    pub num_nodes: usize,
    pub num_edges: usize,
    pub row_ptr: Vec<usize>,
    pub col_indices: Vec<usize>,
}

/// Builds a [`Csr`] from a rewindable edge-list stream in exactly three
/// passes: a dimension pass to size the arrays, a histogram pass to compute
/// `row_ptr` as an exclusive prefix sum, and a scatter pass that writes each
/// neighbor into its row slot in input order.
///
/// Self-loops and duplicate edges are preserved verbatim; the reader's
/// multiplicity is never deduplicated or normalized.
pub fn build_csr(mut reader: EdgeListReader) -> Result<Csr, GraphError> {
    let path = reader.path().to_path_buf();

    // Pass 1: dimension. Determine num_nodes (max id + 1) and num_edges.
    let mut max_id: i64 = -1;
    let mut num_edges: usize = 0;
    for pair in &mut reader {
        let (u, v) = pair?;
        reject_negative(u, &path)?;
        reject_negative(v, &path)?;
        max_id = max_id.max(u).max(v);
        num_edges += 1;
    }
    let num_nodes = if max_id < 0 {
        0
    } else {
        (max_id + 1) as usize
    };
    log::debug!("dimension pass: num_nodes={num_nodes}, num_edges={num_edges}");

    if num_nodes == 0 {
        return Ok(Csr {
            num_nodes: 0,
            num_edges: 0,
            row_ptr: vec![0],
            col_indices: Vec::new(),
        });
    }

    reader.rewind()?;

    // Pass 2: histogram. counts[u] = out-degree of u, then exclusive prefix sum.
    let mut counts = vec![0usize; num_nodes];
    for pair in &mut reader {
        let (u, _v) = pair?;
        counts[u as usize] += 1;
    }
    let mut row_ptr = vec![0usize; num_nodes + 1];
    for i in 0..num_nodes {
        row_ptr[i + 1] = row_ptr[i] + counts[i];
    }
    debug_assert_eq!(row_ptr[num_nodes], num_edges);

    reader.rewind()?;

    // Pass 3: scatter. Walk a cursor per row, writing neighbors in input order.
    let mut cursor = row_ptr.clone();
    let mut col_indices = vec![0usize; num_edges];
    for pair in &mut reader {
        let (u, v) = pair?;
        let u = u as usize;
        let v = v as usize;
        col_indices[cursor[u]] = v;
        cursor[u] += 1;
    }

    #[cfg(debug_assertions)]
    for u in 0..num_nodes {
        debug_assert_eq!(cursor[u], row_ptr[u + 1]);
    }

    Ok(Csr {
        num_nodes,
        num_edges,
        row_ptr,
        col_indices,
    })
}

fn reject_negative(id: i64, path: &std::path::Path) -> Result<(), GraphError> {
    if id < 0 {
        return Err(GraphError::Parse {
            path: path.to_path_buf(),
            line: 0,
            reason: ParseReason::NegativeId(id),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn build_from(contents: &str) -> Result<Csr, GraphError> {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        let reader = EdgeListReader::open(file.path())?;
        build_csr(reader)
    }

    #[test]
    fn empty_input_yields_empty_graph() {
        let csr = build_from("# nothing here\n").unwrap();
        assert_eq!(csr.num_nodes, 0);
        assert_eq!(csr.num_edges, 0);
        assert_eq!(csr.row_ptr, vec![0]);
        assert!(csr.col_indices.is_empty());
    }

    #[test]
    fn triangle() {
        let csr = build_from("0 1\n1 2\n2 0\n").unwrap();
        assert_eq!(csr.num_nodes, 3);
        assert_eq!(csr.num_edges, 3);
        assert_eq!(csr.row_ptr, vec![0, 1, 2, 3]);
        assert_eq!(csr.col_indices, vec![1, 2, 0]);
    }

    #[test]
    fn sparse_high_id_vertex_gets_empty_rows() {
        let csr = build_from("0 1000\n").unwrap();
        assert_eq!(csr.num_nodes, 1001);
        assert_eq!(csr.num_edges, 1);
        assert_eq!(csr.row_ptr[0], 0);
        assert_eq!(csr.row_ptr[1], 1);
        for u in 1..1001 {
            assert_eq!(csr.row_ptr[u], csr.row_ptr[u + 1]);
        }
    }

    #[test]
    fn multigraph_preserves_duplicates_in_order() {
        let csr = build_from("0 1\n0 1\n0 2\n").unwrap();
        assert_eq!(csr.col_indices, vec![1, 1, 2]);
    }

    #[test]
    fn self_loops_are_preserved() {
        let csr = build_from("0 0\n").unwrap();
        assert_eq!(csr.num_nodes, 1);
        assert_eq!(csr.col_indices, vec![0]);
    }

    #[test]
    fn negative_token_is_rejected() {
        let err = build_from("0 -1\n").unwrap_err();
        assert!(matches!(err, GraphError::Parse { .. }));
    }
}
