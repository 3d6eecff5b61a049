//! Document snapshots using `MessagePack`.
//!
//! A snapshot carries declarations only: resolved handles, heights, and
//! search uniqueness are never written. Loading always links the decoded
//! document with declaration re-checking on, so a snapshot cannot bypass
//! the naming invariants.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use schemata_foundation::{Error, ErrorKind, Result};
use schemata_linker::{LinkConfig, LinkedConfig, Linker};
use schemata_model::Config;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Snapshot format version. Bumped whenever the encoded shape changes.
pub const SNAPSHOT_FORMAT: u32 = 1;

#[derive(Serialize)]
struct SnapshotRef<'a> {
    format: u32,
    config: &'a Config,
}

#[derive(Deserialize)]
struct Snapshot {
    format: u32,
    config: Config,
}

fn serialization(e: impl std::fmt::Display) -> Error {
    Error::new(ErrorKind::Serialization(e.to_string()))
}

/// Encodes a document.
///
/// Uses named serialization to preserve struct field names.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_bytes(config: &Config) -> Result<Vec<u8>> {
    rmp_serde::to_vec_named(&SnapshotRef {
        format: SNAPSHOT_FORMAT,
        config,
    })
    .map_err(serialization)
}

/// Decodes a document without linking it.
///
/// # Errors
///
/// Returns an error if decoding fails or the format version is unknown.
pub fn decode(bytes: &[u8]) -> Result<Config> {
    let snapshot: Snapshot = rmp_serde::from_slice(bytes).map_err(serialization)?;
    if snapshot.format != SNAPSHOT_FORMAT {
        return Err(serialization(format!(
            "unsupported snapshot format {} (expected {SNAPSHOT_FORMAT})",
            snapshot.format
        )));
    }
    Ok(snapshot.config)
}

/// Decodes and links a document with the default link options.
///
/// # Errors
///
/// Returns a serialization error, or any error of [`Linker::link`].
pub fn from_bytes(bytes: &[u8]) -> Result<LinkedConfig> {
    from_bytes_with(bytes, LinkConfig::default())
}

/// Decodes and links a document. Declaration re-checking is forced on.
///
/// # Errors
///
/// Returns a serialization error, or any error of [`Linker::link`].
pub fn from_bytes_with(bytes: &[u8], options: LinkConfig) -> Result<LinkedConfig> {
    let config = decode(bytes)?;
    debug!(
        bytes = bytes.len(),
        entities = config.entities().len(),
        "snapshot decoded"
    );
    Linker::new(options.with_recheck_declarations(true)).link(config)
}

/// Saves a document to a file.
///
/// Creates the file if it doesn't exist, or overwrites it if it does.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written to,
/// or if serialization fails.
pub fn save_to_file<P: AsRef<Path>>(config: &Config, path: P) -> Result<()> {
    let path = path.as_ref();
    let io = |what: &str, e: std::io::Error| {
        Error::new(ErrorKind::Io(format!(
            "failed to {what} '{}': {e}",
            path.display()
        )))
    };

    let bytes = to_bytes(config)?;
    let file = File::create(path).map_err(|e| io("create", e))?;
    let mut writer = BufWriter::new(file);
    writer.write_all(&bytes).map_err(|e| io("write", e))?;
    writer.flush().map_err(|e| io("flush", e))?;
    debug!(path = %path.display(), bytes = bytes.len(), "snapshot saved");
    Ok(())
}

/// Loads and links a document from a file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, or any error of
/// [`from_bytes_with`].
pub fn load_from_file<P: AsRef<Path>>(path: P, options: LinkConfig) -> Result<LinkedConfig> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        Error::new(ErrorKind::Io(format!(
            "failed to open file '{}': {e}",
            path.display()
        )))
    })?;

    let mut reader = BufReader::new(file);
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes).map_err(|e| {
        Error::new(ErrorKind::Io(format!(
            "failed to read file '{}': {e}",
            path.display()
        )))
    })?;

    from_bytes_with(&bytes, options)
}
