/*
 * SPDX-FileCopyrightText: 2023 Inria
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Error taxonomy for ingestion, caching, and the query engine.

use std::path::PathBuf;

/// Everything that can go wrong while building or loading a [`crate::Graph`].
///
/// `Graph::load` only ever returns [`GraphError::Io`] or [`GraphError::Parse`]
/// variants to its caller: cache corruption is handled internally and never
/// escapes as an error (see the cache module and `Graph::load`).
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("could not open edge list at {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed edge list at {path}:{line}: {reason}")]
    Parse {
        path: PathBuf,
        line: u64,
        reason: ParseReason,
    },
}

/// Why a line of the edge-list text format failed to parse.
///
/// Kept separate from [`GraphError::Parse`] so callers that only care about
/// the path/line can match on the outer variant without destructuring this.
#[derive(Debug, thiserror::Error)]
pub enum ParseReason {
    #[error("expected two whitespace-separated integers, found {0:?}")]
    WrongTokenCount(usize),
    #[error("token {0:?} is not a valid integer")]
    NotAnInteger(String),
    #[error("vertex id {0} is negative")]
    NegativeId(i64),
    #[error("comment ('#') found after the data-start position")]
    CommentAfterDataStart,
    #[error("trailing incomplete pair at end of file")]
    TruncatedPair,
}
