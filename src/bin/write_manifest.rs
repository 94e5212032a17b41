//! Manifest utility for Heartwise model directories.
//!
//! Hashes `model.json` (and `scaler.json`, if present) and writes
//! `manifest.json` next to them. With `--check`, loads the directory with the
//! manifest required instead, and reports whether it verifies.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin write_manifest -- <model_dir> [--check]
//! ```

use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use heartwise::adapters::artifact::MANIFEST_FILE;
use heartwise::adapters::{load_artifacts, Manifest};

fn usage() -> &'static str {
    "Usage: write_manifest <model_dir> [--check]"
}

fn parse_args() -> Result<(PathBuf, bool)> {
    let mut model_dir: Option<PathBuf> = None;
    let mut check = false;

    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--check" => check = true,
            "-h" | "--help" => bail!(usage()),
            _ => {
                if model_dir.is_some() {
                    bail!(usage());
                }
                model_dir = Some(PathBuf::from(arg));
            }
        }
    }

    let model_dir = model_dir.context(usage())?;
    Ok((model_dir, check))
}

fn main() -> Result<()> {
    let (model_dir, check) = parse_args()?;

    if !model_dir.is_dir() {
        bail!("Model directory not found: {}", model_dir.display());
    }

    if check {
        let artifacts = load_artifacts(&model_dir, true)
            .with_context(|| format!("{} does not verify", model_dir.display()))?;
        println!(
            "OK: {} verified (reference scaler: {})",
            model_dir.display(),
            artifacts.reference_scaler.is_some()
        );
        return Ok(());
    }

    let manifest = Manifest::for_directory(&model_dir)
        .with_context(|| format!("Failed to hash {}", model_dir.display()))?;
    let json = serde_json::to_string_pretty(&manifest).context("Failed to serialize manifest")?;

    let out = model_dir.join(MANIFEST_FILE);
    fs::write(&out, format!("{json}\n"))
        .with_context(|| format!("Failed to write {}", out.display()))?;

    for (name, digest) in &manifest.files {
        println!("{digest}  {name}");
    }
    println!("Wrote {}", out.display());
    Ok(())
}
