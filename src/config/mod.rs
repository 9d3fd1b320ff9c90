//! Config module - Comparison policies.
//!
//! A [`Config`] can be passed explicitly to a
//! [`Comparator`](crate::compare::Comparator), or installed process-wide with
//! [`set_config`] / [`update_config`]. Every comparison takes a snapshot at
//! entry, so changes made while a comparison runs do not affect it.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

/// Tunable comparison policies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Decimal places used to compare and render floats.
    pub float_precision: usize,

    /// Granularity timestamps and durations are truncated to before they are
    /// compared. Zero disables truncation. Serialized as nanoseconds.
    #[serde(with = "duration_nanos")]
    pub time_precision: Duration,

    /// Maximum number of differences reported.
    pub max_diff: usize,

    /// Maximum recursion depth, or zero for no limit.
    pub max_depth: usize,

    /// Report internal diagnostics as `tracing` warnings.
    pub log_errors: bool,

    /// Compare struct fields whose names are unexported.
    pub compare_unexported_fields: bool,

    /// Report non-nil functions as different instead of ignoring them.
    pub compare_functions: bool,

    /// Treat a nil slice as equal to an empty one.
    pub nil_slices_are_empty: bool,

    /// Treat a nil map as equal to an empty one.
    pub nil_maps_are_empty: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            float_precision: 10,
            time_precision: Duration::ZERO,
            max_diff: 10,
            max_depth: 0,
            log_errors: false,
            compare_unexported_fields: false,
            compare_functions: false,
            nil_slices_are_empty: false,
            nil_maps_are_empty: false,
        }
    }
}

impl Config {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Config, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Parse a config from YAML. Missing fields take their defaults.
    pub fn from_yaml(yaml: &str) -> Result<Config, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }
}

mod duration_nanos {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(d.as_nanos()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_nanos)
    }
}

static CONFIG: Lazy<RwLock<Config>> = Lazy::new(|| RwLock::new(Config::default()));

/// Returns a snapshot of the process-wide config.
pub fn config() -> Config {
    CONFIG
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Replaces the process-wide config.
pub fn set_config(config: Config) {
    *CONFIG.write().unwrap_or_else(PoisonError::into_inner) = config;
}

/// Modifies the process-wide config in place.
pub fn update_config(f: impl FnOnce(&mut Config)) {
    let mut guard = CONFIG.write().unwrap_or_else(PoisonError::into_inner);
    f(&mut guard);
}

/// Restores the process-wide config to its defaults.
pub fn reset_config() {
    set_config(Config::default());
}

/// Serializes tests that touch the process-wide config.
#[cfg(test)]
pub(crate) static CONFIG_TEST_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = Config::default();
        assert_eq!(c.float_precision, 10);
        assert_eq!(c.max_diff, 10);
        assert_eq!(c.max_depth, 0);
        assert_eq!(c.time_precision, Duration::ZERO);
        assert!(!c.compare_unexported_fields);
        assert!(!c.nil_slices_are_empty);
    }

    #[test]
    fn test_from_json_and_yaml() {
        let c = Config::from_json(r#"{"floatPrecision": 6, "timePrecision": 1000}"#)
            .expect("json");
        assert_eq!(c.float_precision, 6);
        assert_eq!(c.time_precision, Duration::from_micros(1));
        assert_eq!(c.max_diff, 10);

        let c = Config::from_yaml("maxDepth: 4\nnilMapsAreEmpty: true\n").expect("yaml");
        assert_eq!(c.max_depth, 4);
        assert!(c.nil_maps_are_empty);
        assert_eq!(c.float_precision, 10);

        assert!(Config::from_json(r#"{"maxDiff": "many"}"#).is_err());
    }

    #[test]
    fn test_serialize_round_trip() {
        let c = Config {
            time_precision: Duration::from_millis(5),
            ..Config::default()
        };
        let json = serde_json::to_string(&c).expect("serialize");
        assert!(json.contains(r#""timePrecision":5000000"#));
        assert_eq!(Config::from_json(&json).expect("parse"), c);
    }

    #[test]
    fn test_global_config() {
        let _guard = CONFIG_TEST_LOCK
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        update_config(|c| c.max_diff = 3);
        assert_eq!(config().max_diff, 3);

        set_config(Config {
            float_precision: 2,
            ..Config::default()
        });
        assert_eq!(config().float_precision, 2);
        assert_eq!(config().max_diff, 10);

        reset_config();
        assert_eq!(config(), Config::default());
    }
}
