//! Layered key/value settings.
//!
//! Sources, lowest precedence first:
//!
//! 1. `<config dir>/<env>.yml`, where `<env>` comes from `ENV` (default `local`)
//! 2. process variables prefixed `APP_`
//!
//! `APP_ALPHA_VANTAGE__API_KEY=secret` lands at `alpha_vantage.api_key`:
//! the prefix is stripped, the rest lower-cased and split on `__`.

use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};

use crate::ConfigError;

pub const ENV_NAME_VAR: &str = "ENV";
pub const CONFIG_DIR_VAR: &str = "QUOTEKIT_CONFIG_DIR";
pub const ENV_OVERRIDE_PREFIX: &str = "APP_";
pub const DEFAULT_ENV_NAME: &str = "local";
pub const DEFAULT_CONFIG_DIR: &str = "configs";

const PATH_SEPARATOR: &str = "__";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    root: Mapping,
}

impl Settings {
    /// Loads from the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let env_name =
            std::env::var(ENV_NAME_VAR).unwrap_or_else(|_| String::from(DEFAULT_ENV_NAME));
        let config_dir = std::env::var(CONFIG_DIR_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_DIR));

        Self::load_from(&config_dir, &env_name, std::env::vars())
    }

    /// Loads `<config_dir>/<env_name>.yml` when it exists, then applies
    /// `APP_`-prefixed entries of `vars`.
    pub fn load_from<I, K, V>(config_dir: &Path, env_name: &str, vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut settings = Self::default();

        let path = config_dir.join(format!("{env_name}.yml"));
        if path.is_file() {
            let raw = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
                path: path.display().to_string(),
                source,
            })?;
            settings.merge_yaml_str(&raw).map_err(|source| ConfigError::Parse {
                path: path.display().to_string(),
                source,
            })?;
            tracing::debug!(path = %path.display(), "loaded settings file");
        }

        settings.apply_env_overrides(vars);
        Ok(settings)
    }

    /// Deep-merges a YAML document into the current tree. An empty document
    /// is a no-op.
    pub fn merge_yaml_str(&mut self, raw: &str) -> Result<(), serde_yaml::Error> {
        match serde_yaml::from_str::<Value>(raw)? {
            Value::Mapping(overlay) => deep_merge(&mut self.root, overlay),
            Value::Null => {}
            _ => {
                return Err(serde::de::Error::custom(
                    "top-level config document must be a mapping",
                ))
            }
        }
        Ok(())
    }

    pub fn apply_env_overrides<I, K, V>(&mut self, vars: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        for (key, value) in vars {
            let Some(stripped) = key.as_ref().strip_prefix(ENV_OVERRIDE_PREFIX) else {
                continue;
            };
            let lowered = stripped.to_ascii_lowercase();
            let path = lowered
                .split(PATH_SEPARATOR)
                .filter(|segment| !segment.is_empty())
                .collect::<Vec<_>>();
            if path.is_empty() {
                continue;
            }
            set_nested(&mut self.root, &path, Value::String(value.into()));
        }
    }

    /// Value at a dotted path such as `alpha_vantage.timeout`.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut current = self.root.get(first)?;
        for segment in segments {
            current = current.as_mapping()?.get(segment)?;
        }
        Some(current)
    }

    /// String at `path`; numbers and booleans are rendered as text.
    pub fn get_string(&self, path: &str) -> Option<String> {
        match self.get(path)? {
            Value::String(value) => Some(value.clone()),
            Value::Number(value) => Some(value.to_string()),
            Value::Bool(value) => Some(value.to_string()),
            _ => None,
        }
    }

    /// Unsigned integer at `path`; accepts native numbers and numeric strings.
    pub fn get_u64(&self, path: &str) -> Result<Option<u64>, ConfigError> {
        let invalid = || ConfigError::InvalidValue {
            path: path.to_owned(),
            expected: "a non-negative integer",
        };

        match self.get(path) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(number)) => number.as_u64().map(Some).ok_or_else(invalid),
            Some(Value::String(text)) => text.trim().parse().map(Some).map_err(|_| invalid()),
            Some(_) => Err(invalid()),
        }
    }

    pub fn get_string_or(&self, path: &str, default: &str) -> String {
        self.get_string(path).unwrap_or_else(|| default.to_owned())
    }
}

fn deep_merge(base: &mut Mapping, overlay: Mapping) {
    for (key, value) in overlay {
        match value {
            Value::Mapping(incoming) => match base.get_mut(&key) {
                Some(Value::Mapping(existing)) => deep_merge(existing, incoming),
                _ => {
                    base.insert(key, Value::Mapping(incoming));
                }
            },
            other => {
                base.insert(key, other);
            }
        }
    }
}

fn set_nested(root: &mut Mapping, path: &[&str], value: Value) {
    let Some((last, parents)) = path.split_last() else {
        return;
    };

    let mut current = root;
    for segment in parents {
        let key = Value::String((*segment).to_owned());
        let needs_reset = !matches!(current.get(&key), Some(Value::Mapping(_)));
        if needs_reset {
            current.insert(key.clone(), Value::Mapping(Mapping::new()));
        }
        current = match current.get_mut(&key) {
            Some(Value::Mapping(next)) => next,
            _ => return,
        };
    }
    current.insert(Value::String((*last).to_owned()), value);
}
