/*
 * SPDX-FileCopyrightText: 2023 Inria
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Binary cache sidecar: a flat, little-endian mirror of a [`Csr`] keyed by
//! the source path (`<source>.bin`).
//!
//! The format is deliberately simple — no compression, no per-field
//! alignment tricks — since its only job is to skip re-parsing a text file
//! that was already parsed once. A magic number and version precede the
//! payload so a cache from an incompatible build is rejected instead of
//! misread; there is still no modification-time check against the source
//! (see the freshness policy note on [`read`]).

use crate::builder::Csr;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

const MAGIC: u32 = 0x4752_4348; // "GRCH"
const VERSION: u32 = 1;

/// Derives the cache sidecar path for a given source path: `<source>.bin`.
pub fn cache_path(source: &Path) -> PathBuf {
    let mut os = source.as_os_str().to_os_string();
    os.push(".bin");
    PathBuf::from(os)
}

/// Writes `csr` to `path` as a flat binary blob. Failures here are never
/// fatal to the caller — the cache is an optimization, not a contract — so
/// this returns a plain [`io::Result`] that `Graph::load` logs and discards.
pub fn write(path: &Path, csr: &Csr) -> io::Result<()> {
    let file = File::create(path)?;
    let mut out = BufWriter::new(file);

    out.write_all(&MAGIC.to_le_bytes())?;
    out.write_all(&VERSION.to_le_bytes())?;
    out.write_all(&to_u32(csr.num_nodes)?.to_le_bytes())?;
    out.write_all(&to_u32(csr.num_edges)?.to_le_bytes())?;
    for &x in &csr.row_ptr {
        out.write_all(&to_u32(x)?.to_le_bytes())?;
    }
    for &x in &csr.col_indices {
        out.write_all(&to_u32(x)?.to_le_bytes())?;
    }
    out.flush()?;
    Ok(())
}

/// Reads a cache sidecar back into a [`Csr`].
///
/// Any failure — missing file, bad magic/version, a short or over-long
/// stream, or a size exceeding what `u32` can encode — is reported as a
/// plain `io::Error`; the caller (`Graph::load`) treats all of them
/// identically and falls through to text parsing. The cache is trusted as
/// soon as it parses cleanly: there is no check of the source file's
/// modification time, so a cache left behind after editing the source text
/// will be served stale. Callers that mutate the source must delete the
/// cache themselves.
pub fn read(path: &Path) -> io::Result<Csr> {
    let file = File::open(path)?;
    let mut input = BufReader::new(file);

    let magic = read_u32(&mut input)?;
    if magic != MAGIC {
        return Err(io::Error::new(io::ErrorKind::InvalidData, "bad cache magic"));
    }
    let version = read_u32(&mut input)?;
    if version != VERSION {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("unsupported cache version {version}"),
        ));
    }

    let num_nodes = read_u32(&mut input)? as usize;
    let num_edges = read_u32(&mut input)? as usize;

    let mut row_ptr = Vec::with_capacity(num_nodes + 1);
    for _ in 0..=num_nodes {
        row_ptr.push(read_u32(&mut input)? as usize);
    }
    let mut col_indices = Vec::with_capacity(num_edges);
    for _ in 0..num_edges {
        col_indices.push(read_u32(&mut input)? as usize);
    }

    // A trailing byte would mean the declared sizes don't match the file;
    // treat that as corruption rather than silently ignoring it.
    let mut trailing = [0u8; 1];
    match input.read(&mut trailing)? {
        0 => {}
        _ => {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "cache file longer than its declared sizes",
            ))
        }
    }

    Ok(Csr {
        num_nodes,
        num_edges,
        row_ptr,
        col_indices,
    })
}

fn read_u32(input: &mut impl Read) -> io::Result<u32> {
    let mut buf = [0u8; 4];
    input.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

fn to_u32(value: usize) -> io::Result<u32> {
    u32::try_from(value)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "value exceeds u32 range"))
}
