//! Embedding cache file
//!
//! Layout (little-endian): magic `GBEM`, u32 version, u32 vector count,
//! u32 dimension, then count × dimension f32 values in catalog order.

use crate::errors::{AgentError, Result};
use crate::steamdb::document::build_text;
use crate::steamdb::embedder::{l2_normalize, Embedder};
use crate::steamdb::record::GameRecord;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use futures_util::stream::{self, StreamExt, TryStreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::io::{Cursor, Read, Write};
use std::path::Path;
use tracing::{info, warn};

/// File magic
pub const CACHE_MAGIC: &[u8; 4] = b"GBEM";

/// Current format version
pub const CACHE_VERSION: u32 = 1;

const HEADER_LEN: usize = 16;

/// Serialize vectors into the cache layout
pub fn encode(vectors: &[Vec<f32>]) -> Result<Vec<u8>> {
    let dimension = vectors.first().map(Vec::len).unwrap_or(0);
    if vectors.iter().any(|v| v.len() != dimension) {
        return Err(AgentError::DataLoadError(
            "Cannot cache embeddings of differing dimensions".to_string(),
        ));
    }

    let mut buf = Vec::with_capacity(HEADER_LEN + vectors.len() * dimension * 4);
    buf.write_all(CACHE_MAGIC)?;
    buf.write_u32::<LittleEndian>(CACHE_VERSION)?;
    buf.write_u32::<LittleEndian>(to_u32(vectors.len(), "vector count")?)?;
    buf.write_u32::<LittleEndian>(to_u32(dimension, "dimension")?)?;
    for value in vectors.iter().flatten() {
        buf.write_f32::<LittleEndian>(*value)?;
    }
    Ok(buf)
}

/// Parse the cache layout back into vectors
pub fn decode(bytes: &[u8]) -> Result<Vec<Vec<f32>>> {
    let corrupt = |what: &str| AgentError::DataLoadError(format!("Embedding cache is corrupt: {}", what));

    let mut cursor = Cursor::new(bytes);
    let mut magic = [0u8; 4];
    cursor
        .read_exact(&mut magic)
        .map_err(|_| corrupt("truncated header"))?;
    if &magic != CACHE_MAGIC {
        return Err(corrupt("bad magic"));
    }

    let version = cursor
        .read_u32::<LittleEndian>()
        .map_err(|_| corrupt("truncated header"))?;
    if version != CACHE_VERSION {
        return Err(AgentError::DataLoadError(format!(
            "Unsupported embedding cache version {} (expected {})",
            version, CACHE_VERSION
        )));
    }

    let count = cursor
        .read_u32::<LittleEndian>()
        .map_err(|_| corrupt("truncated header"))? as usize;
    let dimension = cursor
        .read_u32::<LittleEndian>()
        .map_err(|_| corrupt("truncated header"))? as usize;

    let expected = count
        .checked_mul(dimension)
        .and_then(|n| n.checked_mul(4))
        .ok_or_else(|| corrupt("header overflow"))?;
    if bytes.len() - HEADER_LEN != expected {
        return Err(corrupt(&format!(
            "payload is {} bytes, header describes {}",
            bytes.len() - HEADER_LEN,
            expected
        )));
    }

    let mut vectors = Vec::with_capacity(count);
    for _ in 0..count {
        let mut vector = vec![0f32; dimension];
        cursor
            .read_f32_into::<LittleEndian>(&mut vector)
            .map_err(|_| corrupt("truncated payload"))?;
        vectors.push(vector);
    }
    Ok(vectors)
}

/// Write the cache atomically (temp file in the same directory, then rename)
pub fn save(path: &Path, vectors: &[Vec<f32>]) -> Result<()> {
    let bytes = encode(vectors)?;

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    fs::write(&tmp, &bytes)?;
    fs::rename(&tmp, path)?;

    info!(path = %path.display(), vectors = vectors.len(), "Saved embedding cache");
    Ok(())
}

/// Read the cache and check it matches the filtered catalog
pub fn load(path: &Path, expected_count: usize) -> Result<Vec<Vec<f32>>> {
    let bytes = fs::read(path).map_err(|e| {
        AgentError::DataLoadError(format!(
            "Failed to read embedding cache {}: {}",
            path.display(),
            e
        ))
    })?;
    let vectors = decode(&bytes)?;

    if vectors.len() != expected_count {
        return Err(AgentError::DataLoadError(format!(
            "Embedding cache {} holds {} vectors but the catalog has {} records; delete it to rebuild",
            path.display(),
            vectors.len(),
            expected_count
        )));
    }
    Ok(vectors)
}

/// Embed every record, keeping catalog order.
///
/// Up to `concurrency` requests are in flight at once.
pub async fn generate(
    records: &[GameRecord],
    embedder: &dyn Embedder,
    concurrency: usize,
) -> Result<Vec<Vec<f32>>> {
    let progress = ProgressBar::new(records.len() as u64);
    if let Ok(style) =
        ProgressStyle::default_bar().template("{spinner:.green} Embedding [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
    {
        progress.set_style(style);
    }

    let vectors = stream::iter(records.iter().map(|record| {
        let progress = &progress;
        async move {
            let mut vector = embedder.embed(&build_text(record)).await?;
            l2_normalize(&mut vector);
            progress.inc(1);
            Ok::<_, AgentError>(vector)
        }
    }))
    .buffered(concurrency.max(1))
    .try_collect::<Vec<_>>()
    .await;

    match &vectors {
        Ok(_) => progress.finish_with_message("done"),
        Err(_) => progress.abandon(),
    }
    vectors
}

/// Load the cache when present, otherwise embed the catalog and persist it
pub async fn load_or_build(
    path: &Path,
    records: &[GameRecord],
    embedder: &dyn Embedder,
    concurrency: usize,
) -> Result<Vec<Vec<f32>>> {
    if path.exists() {
        info!(path = %path.display(), "Loading embedding cache");
        return load(path, records.len());
    }

    warn!(
        path = %path.display(),
        records = records.len(),
        "Embedding cache not found, generating embeddings"
    );
    let vectors = generate(records, embedder, concurrency).await?;
    save(path, &vectors)?;
    Ok(vectors)
}

fn to_u32(value: usize, what: &str) -> Result<u32> {
    u32::try_from(value)
        .map_err(|_| AgentError::DataLoadError(format!("Embedding cache {} {} too large", what, value)))
}
