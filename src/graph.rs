/*
 * SPDX-FileCopyrightText: 2023 Inria
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! The `Graph` type: an immutable CSR-backed directed graph, and the
//! read-only query operations (critical-node, bounded BFS) over it.

use crate::builder::{build_csr, Csr};
use crate::cache;
use crate::error::GraphError;
use crate::reader::EdgeListReader;
use std::collections::VecDeque;
use std::path::Path;

/// The capability set a CSR-backed graph store exposes: load from a
/// filesystem path, report its size, and answer the two structural
/// queries. A backend other than [`Graph`] (for instance a memory-mapped
/// CSR) can implement this trait and slot into the same query engine.
pub trait GraphStore {
    fn num_nodes(&self) -> usize;
    fn num_edges(&self) -> usize;
    fn critical_node(&self) -> Option<usize>;
    fn bfs(&self, start: usize, depth: u64) -> Vec<(usize, usize)>;
}

/// An in-memory, immutable Compressed Sparse Row graph.
///
/// A freshly created instance is empty (`num_nodes() == 0`). [`Graph::load`]
/// populates it exactly once: it is not meant to be called twice on the
/// same instance, and a failed load leaves the instance empty rather than
/// partially populated. Once loaded, all reads are safe to share across
/// threads (`&Graph` is `Sync`); there is no internal mutability.
#[derive(Debug)]
pub struct Graph {
    num_nodes: usize,
    num_edges: usize,
    row_ptr: Vec<usize>,
    col_indices: Vec<usize>,
}

impl Graph {
    /// Creates an empty graph, ready to be populated by [`Graph::load`].
    pub fn new() -> Self {
        Self {
            num_nodes: 0,
            num_edges: 0,
            row_ptr: vec![0],
            col_indices: Vec::new(),
        }
    }

    /// Populates this graph from `path`.
    ///
    /// First tries the binary cache sidecar at `<path>.bin`: if it exists
    /// and parses cleanly (correct magic, version, and sizes), its CSR is
    /// adopted directly and the text file is never opened. Otherwise the
    /// text edge list at `path` is parsed through the three-pass CSR
    /// builder, and the result is opportunistically written back to the
    /// cache sidecar for the next load — a failure to write the cache is
    /// logged and otherwise ignored, since the cache is an optimization,
    /// never a contract.
    ///
    /// Note well: the cache is trusted purely because it parses, with no
    /// check against the source file's modification time. Editing `path`
    /// after a cache has been written will not invalidate it; delete the
    /// `.bin` sidecar yourself if the source changes.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<(), GraphError> {
        let path = path.as_ref();
        let cache_file = cache::cache_path(path);

        let csr = match cache::read(&cache_file) {
            Ok(csr) => {
                log::debug!("loaded graph from cache {}", cache_file.display());
                csr
            }
            Err(e) => {
                log::debug!(
                    "cache {} unusable ({e}), parsing text source {}",
                    cache_file.display(),
                    path.display()
                );
                let reader = EdgeListReader::open(path)?;
                let csr = build_csr(reader)?;
                if let Err(e) = cache::write(&cache_file, &csr) {
                    log::warn!("could not write cache {}: {e}", cache_file.display());
                }
                csr
            }
        };

        self.adopt(csr);
        Ok(())
    }

    fn adopt(&mut self, csr: Csr) {
        self.num_nodes = csr.num_nodes;
        self.num_edges = csr.num_edges;
        self.row_ptr = csr.row_ptr;
        self.col_indices = csr.col_indices;
    }

    #[inline]
    fn out_degree(&self, u: usize) -> usize {
        self.row_ptr[u + 1] - self.row_ptr[u]
    }

    #[inline]
    fn successors(&self, u: usize) -> &[usize] {
        &self.col_indices[self.row_ptr[u]..self.row_ptr[u + 1]]
    }

    /// Compatibility shim for embedders that expect the reference's `-1`
    /// sentinel on an empty graph instead of `Option::None`.
    pub fn critical_node_ffi(&self) -> i64 {
        self.critical_node().map(|u| u as i64).unwrap_or(-1)
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphStore for Graph {
    fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    fn num_edges(&self) -> usize {
        self.num_edges
    }

    /// The vertex of maximum out-degree, ties broken by lowest id. `None`
    /// on an empty graph. O(num_nodes), no allocation.
    ///
    /// Deliberately not `Iterator::max_by_key`: that adaptor returns the
    /// *last* element on a tie, while this query must keep the first
    /// (lowest-id) one.
    fn critical_node(&self) -> Option<usize> {
        let mut best: Option<(usize, usize)> = None;
        for u in 0..self.num_nodes {
            let degree = self.out_degree(u);
            if best.map_or(true, |(_, best_degree)| degree > best_degree) {
                best = Some((u, degree));
            }
        }
        best.map(|(u, _)| u)
    }

    /// Breadth-first traversal from `start`, capped at `depth` levels,
    /// returning every edge examined — including edges into
    /// already-visited vertices — in the order it was examined. This is
    /// the explored edge frontier, not the BFS tree: visualization
    /// consumers need the cross/back edges too.
    ///
    /// A vertex is expanded as long as its own level does not exceed
    /// `depth`, so a vertex discovered exactly at `depth` still emits its
    /// outgoing edges (its successors land at `depth + 1` and are never
    /// themselves expanded).
    ///
    /// An out-of-range `start` returns an empty vector; this is not
    /// signalled as an error.
    fn bfs(&self, start: usize, depth: u64) -> Vec<(usize, usize)> {
        if start >= self.num_nodes {
            return Vec::new();
        }

        let mut level = vec![-1i64; self.num_nodes];
        let mut queue = VecDeque::new();
        let mut edges = Vec::new();

        level[start] = 0;
        queue.push_back(start);

        while let Some(u) = queue.pop_front() {
            if level[u] as u64 > depth {
                continue;
            }
            for &v in self.successors(u) {
                edges.push((u, v));
                if level[v] == -1 {
                    level[v] = level[u] + 1;
                    queue.push_back(v);
                }
            }
        }

        edges
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn load_text(contents: &str) -> Graph {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        let mut graph = Graph::new();
        graph.load(file.path()).unwrap();
        graph
    }

    #[test]
    fn empty_graph_has_sentinel_critical_node() {
        let graph = load_text("# comment\n");
        assert_eq!(graph.num_nodes(), 0);
        assert_eq!(graph.num_edges(), 0);
        assert_eq!(graph.critical_node(), None);
        assert_eq!(graph.critical_node_ffi(), -1);
        assert_eq!(graph.bfs(0, 5), Vec::new());
    }

    #[test]
    fn triangle_queries() {
        let graph = load_text("0 1\n1 2\n2 0\n");
        assert_eq!(graph.num_nodes(), 3);
        assert_eq!(graph.num_edges(), 3);
        assert_eq!(graph.critical_node(), Some(0));
        assert_eq!(graph.bfs(0, 10), vec![(0, 1), (1, 2), (2, 0)]);
    }

    #[test]
    fn bfs_depth_cap_stops_expansion_not_emission() {
        let graph = load_text("0 1\n1 2\n2 3\n3 4\n");
        assert_eq!(graph.bfs(0, 2), vec![(0, 1), (1, 2), (2, 3)]);
    }

    #[test]
    fn bfs_emits_cross_edges_to_already_visited_nodes() {
        // 0 -> 1, 0 -> 2, 1 -> 2 : edge (1,2) is a cross edge, still emitted.
        let graph = load_text("0 1\n0 2\n1 2\n");
        let edges = graph.bfs(0, 10);
        assert!(edges.contains(&(1, 2)));
    }

    #[test]
    fn bfs_out_of_range_start_is_empty() {
        let graph = load_text("0 1\n");
        assert_eq!(graph.bfs(42, 5), Vec::new());
    }

    #[test]
    fn bfs_is_deterministic() {
        let graph = load_text("0 1\n0 2\n1 3\n2 3\n3 0\n");
        assert_eq!(graph.bfs(0, 3), graph.bfs(0, 3));
    }

    #[test]
    fn critical_node_breaks_ties_by_lowest_id() {
        // 0 -> 1, 2 -> 3 : both out-degree 1, tie broken by lowest id (0).
        let graph = load_text("0 1\n2 3\n");
        assert_eq!(graph.critical_node(), Some(0));
    }

    #[test]
    fn load_uses_cache_on_second_call() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"0 1\n1 2\n2 0\n").unwrap();
        file.flush().unwrap();

        let mut first = Graph::new();
        first.load(file.path()).unwrap();

        let cache_file = cache::cache_path(file.path());
        assert!(cache_file.exists());

        std::fs::remove_file(file.path()).unwrap();

        let mut second = Graph::new();
        second.load(file.path()).unwrap();
        assert_eq!(second.num_nodes(), first.num_nodes());
        assert_eq!(second.critical_node(), first.critical_node());

        std::fs::remove_file(&cache_file).ok();
    }

    #[test]
    fn load_fails_on_missing_source() {
        let mut graph = Graph::new();
        let err = graph.load("/nonexistent/path/does-not-exist.txt").unwrap_err();
        assert!(matches!(err, GraphError::Io { .. }));
        assert_eq!(graph.num_nodes(), 0);
    }
}
