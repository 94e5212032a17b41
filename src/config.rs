//! Runtime settings read from `HEARTWISE_*` environment variables.

use std::path::PathBuf;
use std::time::Duration;

use crate::HeartwiseError;

/// Default model directory, relative to the working directory.
pub const DEFAULT_MODEL_PATH: &str = "models";

pub const DEFAULT_LOG_FILE: &str = "heartwise.log";

/// Which scaler the prediction pipeline applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScalingMode {
    /// Fit on each request's own vector.
    #[default]
    PerRequest,
    /// Use `scaler.json` from the model directory.
    Reference,
}

impl std::str::FromStr for ScalingMode {
    type Err = HeartwiseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "per-request" | "per_request" | "request" => Ok(Self::PerRequest),
            "reference" => Ok(Self::Reference),
            other => Err(HeartwiseError::Config(format!(
                "HEARTWISE_SCALING must be per-request or reference, got {other:?}"
            ))),
        }
    }
}

/// Where log output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogMode {
    /// File when stdout is a terminal, stdout otherwise.
    #[default]
    Auto,
    File,
    Stdout,
}

impl std::str::FromStr for LogMode {
    type Err = HeartwiseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "file" => Ok(Self::File),
            "stdout" => Ok(Self::Stdout),
            other => Err(HeartwiseError::Config(format!(
                "HEARTWISE_LOG_MODE must be auto, file or stdout, got {other:?}"
            ))),
        }
    }
}

/// Parsed configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Model directory (or a direct path to `model.json`).
    pub model_path: PathBuf,
    pub scaling: ScalingMode,
    /// `None` disables the prediction timeout.
    pub predict_timeout: Option<Duration>,
    /// Refuse to load a model directory without `manifest.json`.
    pub require_manifest: bool,
    pub log_mode: LogMode,
    pub log_file: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            scaling: ScalingMode::default(),
            predict_timeout: None,
            require_manifest: false,
            log_mode: LogMode::default(),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool, HeartwiseError> {
    match value.trim() {
        "1" | "true" | "TRUE" | "True" | "yes" | "YES" | "Yes" => Ok(true),
        "0" | "false" | "FALSE" | "False" | "no" | "NO" | "No" | "" => Ok(false),
        other => Err(HeartwiseError::Config(format!(
            "{name} must be a boolean, got {other:?}"
        ))),
    }
}

impl Settings {
    /// Read settings from the process environment.
    ///
    /// # Errors
    /// Returns `HeartwiseError::Config` for malformed values.
    pub fn from_env() -> Result<Self, HeartwiseError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read settings through `lookup`; unset variables keep their defaults.
    ///
    /// # Errors
    /// Returns `HeartwiseError::Config` for malformed values.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, HeartwiseError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(path) = lookup("HEARTWISE_MODEL_PATH").filter(|p| !p.trim().is_empty()) {
            settings.model_path = PathBuf::from(path);
        }
        if let Some(mode) = lookup("HEARTWISE_SCALING") {
            settings.scaling = mode.parse()?;
        }
        if let Some(ms) = lookup("HEARTWISE_PREDICT_TIMEOUT_MS") {
            let ms: u64 = ms.trim().parse().map_err(|_| {
                HeartwiseError::Config(format!(
                    "HEARTWISE_PREDICT_TIMEOUT_MS must be a number of milliseconds, got {ms:?}"
                ))
            })?;
            settings.predict_timeout = (ms > 0).then(|| Duration::from_millis(ms));
        }
        if let Some(flag) = lookup("HEARTWISE_REQUIRE_MANIFEST") {
            settings.require_manifest = parse_bool("HEARTWISE_REQUIRE_MANIFEST", &flag)?;
        }
        if let Some(mode) = lookup("HEARTWISE_LOG_MODE") {
            settings.log_mode = mode.parse()?;
        }
        if let Some(file) = lookup("HEARTWISE_LOG_FILE").filter(|f| !f.trim().is_empty()) {
            settings.log_file = PathBuf::from(file);
        }

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::from_lookup(|_| None).expect("defaults");
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.model_path, PathBuf::from("models"));
        assert_eq!(settings.scaling, ScalingMode::PerRequest);
        assert_eq!(settings.predict_timeout, None);
        assert!(!settings.require_manifest);
    }

    #[test]
    fn test_overrides() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("HEARTWISE_MODEL_PATH", "/opt/heartwise/model.json"),
            ("HEARTWISE_SCALING", "Reference"),
            ("HEARTWISE_PREDICT_TIMEOUT_MS", "2500"),
            ("HEARTWISE_REQUIRE_MANIFEST", "yes"),
            ("HEARTWISE_LOG_MODE", "stdout"),
            ("HEARTWISE_LOG_FILE", "/tmp/hw.log"),
        ]))
        .expect("valid settings");

        assert_eq!(settings.model_path, PathBuf::from("/opt/heartwise/model.json"));
        assert_eq!(settings.scaling, ScalingMode::Reference);
        assert_eq!(settings.predict_timeout, Some(Duration::from_millis(2500)));
        assert!(settings.require_manifest);
        assert_eq!(settings.log_mode, LogMode::Stdout);
        assert_eq!(settings.log_file, PathBuf::from("/tmp/hw.log"));
    }

    #[test]
    fn test_zero_timeout_disables() {
        let settings =
            Settings::from_lookup(lookup_from(&[("HEARTWISE_PREDICT_TIMEOUT_MS", "0")]))
                .expect("valid");
        assert_eq!(settings.predict_timeout, None);
    }

    #[test]
    fn test_invalid_values_are_config_errors() {
        for pairs in [
            [("HEARTWISE_SCALING", "minmax")],
            [("HEARTWISE_PREDICT_TIMEOUT_MS", "soon")],
            [("HEARTWISE_REQUIRE_MANIFEST", "maybe")],
            [("HEARTWISE_LOG_MODE", "syslog")],
        ] {
            let err = Settings::from_lookup(lookup_from(&pairs)).expect_err("invalid");
            assert!(matches!(err, HeartwiseError::Config(_)), "{pairs:?}");
        }
    }
}
