use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    ast::OperatorTable,
    catalog::CatalogBuilder,
    error::Result,
};

/// Builder configuration, loaded once per session and never mutated.
///
/// Every field is optional in JSON:
///
/// ```
/// use stream_expr::config::BuilderConfig;
///
/// let config = BuilderConfig::from_json_str(r#"{ "extensionNamespaces": ["str"] }"#).unwrap();
/// assert_eq!(config.extension_namespaces, vec!["str".to_string()]);
/// assert!(config.operators.get("greater_than").is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuilderConfig {
    /// Extension groups indexed in the catalog, in order
    #[serde(default = "default_namespaces")]
    pub extension_namespaces: Vec<String>,
    #[serde(default)]
    pub operators: OperatorTable,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        BuilderConfig {
            extension_namespaces: default_namespaces(),
            operators: OperatorTable::builtin(),
        }
    }
}

impl BuilderConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn catalog_builder(&self) -> CatalogBuilder {
        CatalogBuilder::new(self.extension_namespaces.clone())
    }
}

pub fn default_namespaces() -> Vec<String> {
    ["time", "env", "geo", "math", "str"]
        .into_iter()
        .map(String::from)
        .collect()
}
