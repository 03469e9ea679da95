//! Job-scoped manifest properties with tagged-optional lookup
//!
//! A `PropertyTree` is the nested key/value configuration the deployment
//! manifest supplies for one job. Lookups are by dotted path. A missing
//! key and an explicit null are both *unset* - distinct from `""` and
//! from `false` - so precedence rules never conflate "not configured"
//! with a falsy value.

use serde::Deserialize;
use serde_json::Value;

use crate::error::ConfigError;

/// Immutable manifest properties for one job instance.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct PropertyTree(Value);

impl PropertyTree {
    /// Parse a property tree from a YAML document.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(Self(serde_yaml::from_str(yaml)?))
    }

    /// Look up a dotted path.
    ///
    /// Returns `None` for absent keys and for explicit nulls.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut current = &self.0;
        for segment in path.split('.') {
            current = current.as_object()?.get(segment)?;
        }
        if current.is_null() {
            None
        } else {
            Some(current)
        }
    }

    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path)?.as_str()
    }

    pub fn get_bool(&self, path: &str) -> Option<bool> {
        self.get(path)?.as_bool()
    }

    /// Scalar leaf rendered to a string.
    ///
    /// Ports and similar values may arrive as YAML numbers or strings;
    /// both render the same way into flags and URLs.
    pub fn get_scalar(&self, path: &str) -> Option<String> {
        match self.get(path)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Look up a required property.
    pub fn require(&self, path: &str) -> Result<&Value, ConfigError> {
        self.get(path).ok_or_else(|| ConfigError::MissingProperty {
            path: path.to_string(),
        })
    }

    /// Required string property.
    pub fn require_str(&self, path: &str) -> Result<&str, ConfigError> {
        self.require(path)?
            .as_str()
            .ok_or_else(|| ConfigError::MissingProperty {
                path: path.to_string(),
            })
    }

    /// Required scalar property, rendered to a string.
    pub fn require_scalar(&self, path: &str) -> Result<String, ConfigError> {
        self.get_scalar(path)
            .ok_or_else(|| ConfigError::MissingProperty {
                path: path.to_string(),
            })
    }
}

impl From<Value> for PropertyTree {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn get_walks_dotted_paths() {
        let tree = PropertyTree::from(json!({
            "credhub": {"uaa_client_id": "some-client-id"}
        }));

        assert_eq!(
            tree.get("credhub.uaa_client_id"),
            Some(&json!("some-client-id"))
        );
        assert_eq!(tree.get("credhub.uaa_client_secret"), None);
        assert_eq!(tree.get("missing.deeply.nested"), None);
    }

    #[test]
    fn explicit_null_is_unset() {
        let tree = PropertyTree::from(json!({"db": {"ca_cert": null}}));

        assert_eq!(tree.get("db.ca_cert"), None);
        assert_eq!(tree.get_str("db.ca_cert"), None);
    }

    #[test]
    fn empty_string_and_false_are_set() {
        let tree = PropertyTree::from(json!({"a": "", "b": false}));

        assert_eq!(tree.get_str("a"), Some(""));
        assert_eq!(tree.get_bool("b"), Some(false));
    }

    #[test]
    fn get_scalar_renders_numbers() {
        let tree = PropertyTree::from(json!({"credhub": {"port": 4321}}));

        assert_eq!(tree.get_scalar("credhub.port"), Some("4321".to_string()));
    }

    #[test]
    fn require_reports_the_missing_path() {
        let tree = PropertyTree::default();

        let err = tree.require_str("db_hostname").unwrap_err();
        assert_eq!(err.to_string(), "can't find property 'db_hostname'");
    }

    #[test]
    fn from_yaml_parses_nested_maps() {
        let tree = PropertyTree::from_yaml("db:\n  host: some-db-host\n").unwrap();

        assert_eq!(tree.get_str("db.host"), Some("some-db-host"));
    }
}
