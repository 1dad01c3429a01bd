use std::path::Path;

use serde::{Deserialize, Serialize};

/// Default field names and delimiter for the command-line tool.
///
/// Library callers name fields explicitly on every call; this only supplies
/// the CLI's defaults, so a differently-shaped data set can keep a checked-in
/// profile instead of repeating flags on every invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Name of the field holding a record's unique identifier.
    pub id_field: String,

    /// Name of the field holding the identifier of a record's parent.
    pub reference_field: String,

    /// Name of the field holding a record's nested children.
    pub children_field: String,

    /// Substring marking nesting boundaries in delimited keys.
    pub delimiter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            id_field: "id".to_string(),
            reference_field: "parent".to_string(),
            children_field: "children".to_string(),
            delimiter: ":".to_string(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or
    /// if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_conventional_schema() {
        let config = Config::default();
        assert_eq!(config.id_field, "id");
        assert_eq!(config.reference_field, "parent");
        assert_eq!(config.children_field, "children");
        assert_eq!(config.delimiter, ":");
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("arbor.toml");

        let config = Config {
            id_field: "pk".to_string(),
            reference_field: "parent_pk".to_string(),
            children_field: "members".to_string(),
            delimiter: ".".to_string(),
        };
        config.save(&path).unwrap();

        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config: Config = toml::from_str("id_field = \"uid\"").unwrap();
        assert_eq!(config.id_field, "uid");
        assert_eq!(config.reference_field, "parent");
        assert_eq!(config.delimiter, ":");
    }
}
