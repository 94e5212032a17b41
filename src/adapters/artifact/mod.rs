//! Model artifact loading.
//!
//! A model directory holds:
//! - `model.json`: the exported network (see [`crate::adapters::dense`])
//! - `scaler.json` (optional): training-set mean and scale per feature
//! - `manifest.json` (optional): SHA-256 digests binding the files above
//!
//! When a manifest is present every file it lists must match its digest, and
//! every artifact that gets loaded must be listed. When
//! `HEARTWISE_REQUIRE_MANIFEST` is set, a missing manifest refuses the load.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::adapters::dense::{DenseNetwork, ExportedNetwork, ModelError};
use crate::domain::{ScalerError, StandardScaler};

pub const MODEL_FILE: &str = "model.json";
pub const SCALER_FILE: &str = "scaler.json";
pub const MANIFEST_FILE: &str = "manifest.json";

/// Manifest format version.
pub const MANIFEST_VERSION: u32 = 1;

/// Errors raised while loading a model directory.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("model artifact not found at {0:?}")]
    NotFound(PathBuf),

    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid model: {0}")]
    Model(#[from] ModelError),

    #[error("invalid scaler: {0}")]
    Scaler(#[from] ScalerError),

    #[error("manifest.json required but missing in {0:?}")]
    ManifestRequired(PathBuf),

    #[error("invalid manifest: {0}")]
    Manifest(String),

    #[error("digest mismatch for {0}")]
    DigestMismatch(String),
}

/// Digest list over the files of a model directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub version: u32,
    pub files: BTreeMap<String, String>,
}

impl Manifest {
    /// Hash `model.json` and, if present, `scaler.json` in `dir`.
    ///
    /// # Errors
    /// Returns `NotFound` if `model.json` is missing.
    pub fn for_directory(dir: &Path) -> Result<Self, ArtifactError> {
        let model_path = dir.join(MODEL_FILE);
        if !model_path.is_file() {
            return Err(ArtifactError::NotFound(model_path));
        }

        let mut files = BTreeMap::new();
        for name in [MODEL_FILE, SCALER_FILE] {
            let path = dir.join(name);
            if path.is_file() {
                files.insert(name.to_string(), sha256_hex(&read(&path)?));
            }
        }

        Ok(Self {
            version: MANIFEST_VERSION,
            files,
        })
    }
}

/// Everything loaded from a model directory.
#[derive(Debug)]
pub struct ModelArtifacts {
    pub network: DenseNetwork,
    /// Scaler fitted on the training distribution, if shipped.
    pub reference_scaler: Option<StandardScaler>,
    /// Whether a manifest vouched for the loaded files.
    pub verified: bool,
    pub directory: PathBuf,
}

#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

// Constant-time compare for ASCII hex digests.
fn constant_time_eq_str(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff: u8 = 0;
    for (x, y) in a.as_bytes().iter().zip(b.as_bytes()) {
        diff |= x ^ y;
    }
    diff == 0
}

fn read(path: &Path) -> Result<Vec<u8>, ArtifactError> {
    fs::read(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn parse<T: serde::de::DeserializeOwned>(path: &Path, bytes: &[u8]) -> Result<T, ArtifactError> {
    serde_json::from_slice(bytes).map_err(|source| ArtifactError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Check file digests against the manifest, if there is one.
///
/// Returns whether the directory was verified.
fn verify_manifest(
    base_dir: &Path,
    loaded: &[(&str, &[u8])],
    require_manifest: bool,
) -> Result<bool, ArtifactError> {
    let manifest_path = base_dir.join(MANIFEST_FILE);
    if !manifest_path.is_file() {
        if require_manifest {
            return Err(ArtifactError::ManifestRequired(base_dir.to_path_buf()));
        }
        tracing::warn!("No {MANIFEST_FILE} in {:?}; loading unverified model", base_dir);
        return Ok(false);
    }

    let manifest: Manifest = parse(&manifest_path, &read(&manifest_path)?)?;
    if manifest.version != MANIFEST_VERSION {
        return Err(ArtifactError::Manifest(format!(
            "unsupported version {}",
            manifest.version
        )));
    }

    for (name, bytes) in loaded {
        let expected = manifest
            .files
            .get(*name)
            .ok_or_else(|| ArtifactError::Manifest(format!("{name} is not listed")))?;
        if !constant_time_eq_str(&sha256_hex(bytes), &expected.to_ascii_lowercase()) {
            return Err(ArtifactError::DigestMismatch((*name).to_string()));
        }
    }

    // Listed files that were not loaded above must still exist and match.
    for (name, expected) in &manifest.files {
        if loaded.iter().any(|(n, _)| *n == name.as_str()) {
            continue;
        }
        let bytes = read(&base_dir.join(name))?;
        if !constant_time_eq_str(&sha256_hex(&bytes), &expected.to_ascii_lowercase()) {
            return Err(ArtifactError::DigestMismatch(name.clone()));
        }
    }

    Ok(true)
}

/// Load the classifier (and reference scaler, if shipped) from a directory.
///
/// `path` may also point directly at a `model.json`; its directory is used
/// for the scaler and manifest.
///
/// # Errors
/// Returns an error if a file is missing, malformed, fails validation, or
/// does not match the manifest.
pub fn load_artifacts(path: &Path, require_manifest: bool) -> Result<ModelArtifacts, ArtifactError> {
    let (base_dir, model_path) = if path.is_file() {
        let dir = path.parent().unwrap_or(Path::new(".")).to_path_buf();
        (dir, path.to_path_buf())
    } else {
        (path.to_path_buf(), path.join(MODEL_FILE))
    };

    if !model_path.is_file() {
        return Err(ArtifactError::NotFound(model_path));
    }

    let model_bytes = read(&model_path)?;
    let model_name = model_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(MODEL_FILE)
        .to_string();

    let scaler_path = base_dir.join(SCALER_FILE);
    let scaler_bytes = if scaler_path.is_file() {
        Some(read(&scaler_path)?)
    } else {
        None
    };

    let mut loaded: Vec<(&str, &[u8])> = vec![(model_name.as_str(), model_bytes.as_slice())];
    if let Some(bytes) = &scaler_bytes {
        loaded.push((SCALER_FILE, bytes.as_slice()));
    }
    let verified = verify_manifest(&base_dir, &loaded, require_manifest)?;

    let exported: ExportedNetwork = parse(&model_path, &model_bytes)?;
    let network = DenseNetwork::from_exported(exported)?;

    let reference_scaler = match &scaler_bytes {
        Some(bytes) => {
            let scaler: StandardScaler = parse(&scaler_path, bytes)?;
            scaler.validate()?;
            Some(scaler)
        }
        None => None,
    };

    tracing::info!(
        "Loaded {} from {:?} (reference scaler: {}, verified: {})",
        crate::ports::Classifier::describe(&network),
        model_path,
        reference_scaler.is_some(),
        verified
    );

    Ok(ModelArtifacts {
        network,
        reference_scaler,
        verified,
        directory: base_dir,
    })
}
