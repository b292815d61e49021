// crates/itsuku-prove/src/io.rs

//! Proof serialization: JSON and CBOR read/write with extension-based
//! auto-detection. Unknown or missing extensions are rejected for reads and
//! default to JSON for writes.

use crate::proof::Proof;
use anyhow::{anyhow, Context, Result};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)
                .with_context(|| format!("creating parent directory {}", dir.display()))?;
        }
    }
    Ok(())
}

fn ext_lower(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
}

/// Read a [`Proof`] from JSON.
pub fn read_proof_json<P: AsRef<Path>>(path: P) -> Result<Proof> {
    let path = path.as_ref();
    let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let rdr = BufReader::new(f);
    serde_json::from_reader(rdr).with_context(|| "deserialize JSON proof")
}

/// Write a [`Proof`] to JSON (pretty).
pub fn write_proof_json<P: AsRef<Path>>(path: P, proof: &Proof) -> Result<()> {
    let path = path.as_ref();
    ensure_parent_dir(path)?;
    let f = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let w = BufWriter::new(f);
    serde_json::to_writer_pretty(w, proof).with_context(|| "serialize JSON proof")
}

/// Read a [`Proof`] from CBOR.
pub fn read_proof_cbor<P: AsRef<Path>>(path: P) -> Result<Proof> {
    let path = path.as_ref();
    let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut rdr = BufReader::new(f);
    ciborium::de::from_reader(&mut rdr).with_context(|| "deserialize CBOR proof")
}

/// Write a [`Proof`] to CBOR.
pub fn write_proof_cbor<P: AsRef<Path>>(path: P, proof: &Proof) -> Result<()> {
    let path = path.as_ref();
    ensure_parent_dir(path)?;
    let f = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut w = BufWriter::new(f);
    ciborium::ser::into_writer(proof, &mut w).with_context(|| "serialize CBOR proof")
}

/// Auto-detect read by extension `.json` / `.cbor` (case-insensitive).
pub fn read_proof_auto<P: AsRef<Path>>(path: P) -> Result<Proof> {
    match ext_lower(path.as_ref()).as_deref() {
        Some("json") => read_proof_json(path),
        Some("cbor") => read_proof_cbor(path),
        Some(other) => Err(anyhow!(
            "unsupported proof extension: {other} (supported: .json, .cbor)"
        )),
        None => Err(anyhow!("path has no extension (expected .json or .cbor)")),
    }
}

/// Auto-detect write by extension (defaults to JSON if unknown or missing).
pub fn write_proof_auto<P: AsRef<Path>>(path: P, proof: &Proof) -> Result<()> {
    match ext_lower(path.as_ref()).as_deref() {
        Some("cbor") => write_proof_cbor(path, proof),
        _ => write_proof_json(path, proof),
    }
}
