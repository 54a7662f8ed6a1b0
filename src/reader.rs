/*
 * SPDX-FileCopyrightText: 2023 Inria
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Text edge-list reader: skips leading comments, yields `(u, v)` pairs,
//! and supports rewinding to the data-start position without reopening
//! the file.

use crate::error::{GraphError, ParseReason};
use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// Iterator over the `(u, v)` pairs of a SNAP-style edge-list text file.
///
/// Leading lines whose first non-whitespace character is `#` are treated as
/// comments and skipped once, at construction time. The byte offset right
/// after the last such comment is recorded as the data-start position;
/// [`EdgeListReader::rewind`] seeks back there without reopening the file,
/// which lets the CSR builder make its three passes over the same stream.
pub struct EdgeListReader {
    path: PathBuf,
    reader: BufReader<File>,
    data_start: u64,
    line_no: u64,
}

impl EdgeListReader {
    /// Opens `path` and skips the leading comment block.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, GraphError> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|source| GraphError::Io {
            path: path.clone(),
            source,
        })?;
        let mut reader = BufReader::new(file);

        let mut offset: u64 = 0;
        let data_start = loop {
            let line_start = offset;
            let mut line = String::new();
            let n = reader.read_line(&mut line).map_err(|source| GraphError::Io {
                path: path.clone(),
                source,
            })?;
            if n == 0 {
                break line_start;
            }
            offset += n as u64;
            if line.trim_start().starts_with('#') {
                continue;
            }
            break line_start;
        };

        reader
            .seek(SeekFrom::Start(data_start))
            .map_err(|source| GraphError::Io {
                path: path.clone(),
                source,
            })?;

        log::debug!(
            "edge list {}: data starts at byte offset {data_start}",
            path.display()
        );

        Ok(Self {
            path,
            reader,
            data_start,
            line_no: 0,
        })
    }

    /// The path this reader was opened from, for error reporting by callers.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the cursor to the data-start position recorded at open time.
    pub fn rewind(&mut self) -> Result<(), GraphError> {
        self.reader
            .seek(SeekFrom::Start(self.data_start))
            .map_err(|source| GraphError::Io {
                path: self.path.clone(),
                source,
            })?;
        self.line_no = 0;
        Ok(())
    }

    fn parse_id(&self, token: &str) -> Result<i64, GraphError> {
        let value: i64 = token
            .parse()
            .map_err(|_| GraphError::Parse {
                path: self.path.clone(),
                line: self.line_no,
                reason: ParseReason::NotAnInteger(token.to_string()),
            })?;
        Ok(value)
    }
}

impl Iterator for EdgeListReader {
    type Item = Result<(i64, i64), GraphError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let mut line = String::new();
            let n = match self.reader.read_line(&mut line) {
                Ok(n) => n,
                Err(source) => {
                    return Some(Err(GraphError::Io {
                        path: self.path.clone(),
                        source,
                    }))
                }
            };
            if n == 0 {
                return None;
            }
            self.line_no += 1;

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if trimmed.starts_with('#') {
                return Some(Err(GraphError::Parse {
                    path: self.path.clone(),
                    line: self.line_no,
                    reason: ParseReason::CommentAfterDataStart,
                }));
            }

            let mut tokens = trimmed.split_whitespace();
            let (u_tok, v_tok, extra) = (tokens.next(), tokens.next(), tokens.next());
            return match (u_tok, v_tok, extra) {
                (Some(u), Some(v), None) => {
                    let result = self.parse_id(u).and_then(|u| Ok((u, self.parse_id(v)?)));
                    Some(result)
                }
                (Some(_), None, _) => Some(Err(GraphError::Parse {
                    path: self.path.clone(),
                    line: self.line_no,
                    reason: ParseReason::TruncatedPair,
                })),
                (None, _, _) => unreachable!("empty lines are skipped above"),
                (Some(_), Some(_), Some(_)) => {
                    let count = trimmed.split_whitespace().count();
                    Some(Err(GraphError::Parse {
                        path: self.path.clone(),
                        line: self.line_no,
                        reason: ParseReason::WrongTokenCount(count),
                    }))
                }
            };
        }
    }
}
