//! Key/value configuration store for experiment runs.
//!
//! A [`Properties`] object encapsulates all the parameters for a run. The
//! orchestrator derives one copy per run (`derive` + overrides) so each run
//! owns an isolated configuration; the base store is never mutated by a run.
//!
//! Two on-disk formats are accepted: `key = value` lines (the conventional
//! experiment-properties format, `#`/`!` comments) and a flat JSON object.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{HarnessError, Result};

/// Directory all file output for a run is written under.
pub const OUTPUT_DIR_KEY: &str = "output.dir";
/// Number of independent runs to perform.
pub const NUM_RUNS_KEY: &str = "num.runs";
/// Number of generations each run executes for.
pub const NUM_GENERATIONS_KEY: &str = "num.generations";
/// Human-chosen experiment name; the derived run identifier is built from it.
pub const RUN_NAME_KEY: &str = "run.name";
/// Unique identifier of a single run. Set by the orchestrator, never by hand.
pub const RUN_ID_KEY: &str = "run.id";
/// File name of the per-run log; redirected into each run's directory.
pub const RUN_LOG_FILE_KEY: &str = "run.log.file";
/// Registered name of the trainable process factory to instantiate.
pub const PROCESS_NAME_KEY: &str = "process.name";

/// Immutable-per-run key/value property set with typed lookups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Properties {
    values: BTreeMap<String, String>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load properties from `path`. A `.json` extension selects the JSON
    /// object format; anything else is parsed as `key = value` lines.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        if path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
        {
            Self::from_json_str(&text)
        } else {
            Ok(Self::from_properties_str(&text))
        }
    }

    /// Parse `key = value` lines. Blank lines and lines starting with `#`
    /// or `!` are ignored; whitespace around keys and values is trimmed.
    pub fn from_properties_str(text: &str) -> Self {
        let mut values = BTreeMap::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                values.insert(key.trim().to_string(), value.trim().to_string());
            }
        }
        Self { values }
    }

    /// Parse a flat JSON object; scalar values are stringified.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let object: serde_json::Map<String, serde_json::Value> = serde_json::from_str(text)
            .map_err(|e| HarnessError::Configuration(format!("invalid JSON configuration: {e}")))?;
        let mut values = BTreeMap::new();
        for (key, value) in object {
            let rendered = match value {
                serde_json::Value::String(s) => s,
                serde_json::Value::Number(n) => n.to_string(),
                serde_json::Value::Bool(b) => b.to_string(),
                other => {
                    return Err(HarnessError::Configuration(format!(
                        "property '{key}' has an unsupported JSON type: {other}"
                    )))
                }
            };
            values.insert(key, rendered);
        }
        Ok(Self { values })
    }

    /// Look up a required property.
    pub fn get(&self, key: &str) -> Result<&str> {
        self.values.get(key).map(String::as_str).ok_or_else(|| {
            HarnessError::Configuration(format!("missing required property '{key}'"))
        })
    }

    /// Look up an optional property.
    pub fn get_opt(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Look up a required non-negative integer property.
    pub fn get_int(&self, key: &str) -> Result<usize> {
        let value = self.get(key)?;
        value.trim().parse().map_err(|_| {
            HarnessError::Configuration(format!("property '{key}' is not an integer: '{value}'"))
        })
    }

    pub fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    pub fn remove(&mut self, key: &str) {
        self.values.remove(key);
    }

    /// Copy-with-overrides derivation: the returned store starts identical
    /// to `self` and is owned exclusively by the caller.
    pub fn derive(&self) -> Self {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_properties_lines() {
        let props = Properties::from_properties_str(
            "# experiment parameters\n\
             num.runs = 5\n\
             run.name=xor\n\
             ! legacy comment style\n\
             \n\
             output.dir = ./out\n",
        );
        assert_eq!(props.get("num.runs").unwrap(), "5");
        assert_eq!(props.get("run.name").unwrap(), "xor");
        assert_eq!(props.get("output.dir").unwrap(), "./out");
    }

    #[test]
    fn test_parse_json_object() {
        let props =
            Properties::from_json_str(r#"{"num.runs": 5, "run.name": "xor", "flag": true}"#)
                .unwrap();
        assert_eq!(props.get_int("num.runs").unwrap(), 5);
        assert_eq!(props.get("run.name").unwrap(), "xor");
        assert_eq!(props.get("flag").unwrap(), "true");
    }

    #[test]
    fn test_json_and_properties_formats_agree() {
        let a = Properties::from_properties_str("num.runs = 3\nrun.name = exp\n");
        let b = Properties::from_json_str(r#"{"num.runs": 3, "run.name": "exp"}"#).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_json_rejects_nested_values() {
        let err = Properties::from_json_str(r#"{"nested": {"a": 1}}"#).unwrap_err();
        assert!(matches!(err, HarnessError::Configuration(_)));
    }

    #[test]
    fn test_missing_key_is_configuration_error() {
        let props = Properties::new();
        let err = props.get("run.name").unwrap_err();
        assert!(matches!(err, HarnessError::Configuration(_)));
    }

    #[test]
    fn test_get_int_rejects_garbage() {
        let mut props = Properties::new();
        props.set("num.runs", "five");
        assert!(matches!(
            props.get_int("num.runs"),
            Err(HarnessError::Configuration(_))
        ));
    }

    #[test]
    fn test_derive_is_isolated_from_base() {
        let mut base = Properties::new();
        base.set("run.name", "exp");
        let mut derived = base.derive();
        derived.set("run.id", "exp-1");
        derived.set("run.name", "other");
        assert_eq!(base.get("run.name").unwrap(), "exp");
        assert!(base.get_opt("run.id").is_none());
        assert_eq!(derived.get("run.id").unwrap(), "exp-1");
    }
}
