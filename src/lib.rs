/*
 * SPDX-FileCopyrightText: 2023 Inria
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! An in-memory engine for large sparse directed graphs.
//!
//! Ingests SNAP-style edge-list text dumps into a Compressed Sparse Row
//! (CSR) layout via a three-pass, allocation-exact builder ([`builder`]),
//! amortizes re-ingestion cost across sessions with a binary cache sidecar
//! ([`cache`]), and answers two structural queries directly over the CSR
//! arrays: the maximum out-degree vertex, and a depth-bounded BFS that
//! reports every edge it examines ([`graph`]).
//!
//! The graph, once loaded, is immutable: there is no edge deletion, vertex
//! renaming, or weighted/undirected support, and a single instance is
//! meant for one logical caller at a time. See [`Graph::load`] for the
//! load path and its cache-freshness contract.
#![deny(unsafe_code)]
#![deny(unreachable_pub)]

pub mod builder;
pub mod cache;
pub mod error;
pub mod reader;

mod graph;

pub use builder::Csr;
pub use error::{GraphError, ParseReason};
pub use graph::{Graph, GraphStore};
pub use reader::EdgeListReader;

/// Re-exports the full public surface for `use sparsegraph::prelude::*;`.
pub mod prelude {
    pub use crate::{Csr, EdgeListReader, Graph, GraphError, GraphStore, ParseReason};
}
