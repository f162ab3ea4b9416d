//! Lookup of attributes and functions by the concrete type they produce.
//!
//! The function metadata is the read-only document the query editor serves
//! for completion: built-in functions plus one group per extension
//! namespace. [`CatalogBuilder`] indexes every function under each concrete
//! type in its declared return types, and every input attribute under its
//! own type.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::ConcreteType;

/// Input stream attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputAttribute {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: ConcreteType,
}

impl InputAttribute {
    pub fn new(name: impl Into<String>, data_type: ConcreteType) -> Self {
        InputAttribute {
            name: name.into(),
            data_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReturnAttribute {
    /// Concrete type names as spelled in the metadata (`INT`, `OBJECT`, ...)
    #[serde(rename = "type", default)]
    pub types: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxEntry {
    pub syntax: String,
}

/// A function as described by the metadata document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionDescriptor {
    pub name: String,
    /// Extension namespace; `None` for built-ins
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub return_attributes: Vec<ReturnAttribute>,
    #[serde(default)]
    pub syntax: Vec<SyntaxEntry>,
}

impl FunctionDescriptor {
    /// `namespace:name` for extensions, plain `name` for built-ins
    pub fn qualified_name(&self) -> String {
        match self.namespace.as_deref() {
            Some(ns) if !ns.is_empty() => format!("{}:{}", ns, self.name),
            _ => self.name.clone(),
        }
    }

    pub fn display_name(&self) -> String {
        format!("{}()", self.qualified_name())
    }

    /// Recognized return types; `OBJECT` and other unknown names are dropped.
    pub fn return_types(&self) -> Vec<ConcreteType> {
        let Some(first) = self.return_attributes.first() else {
            return Vec::new();
        };
        let mut types = Vec::new();
        for name in &first.types {
            match name.parse::<ConcreteType>() {
                Ok(ty) if !types.contains(&ty) => types.push(ty),
                Ok(_) => {}
                Err(_) => debug!(function = %self.name, data_type = %name, "skipping unrecognized return type"),
            }
        }
        types
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FunctionGroup {
    #[serde(default)]
    pub functions: Vec<FunctionDescriptor>,
}

/// Completion metadata: built-ins plus extension groups by namespace.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionMetadata {
    #[serde(default)]
    pub in_built: FunctionGroup,
    #[serde(default)]
    pub extensions: IndexMap<String, FunctionGroup>,
}

impl FunctionMetadata {
    pub fn from_json_str(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Attributes and functions producing one concrete type.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TypeEntry {
    pub attributes: IndexMap<String, InputAttribute>,
    pub functions: IndexMap<String, FunctionDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Catalog {
    entries: IndexMap<ConcreteType, TypeEntry>,
    inputs: Vec<InputAttribute>,
}

impl Catalog {
    /// Entry for `ty`; every concrete type has one, possibly empty.
    pub fn entry(&self, ty: ConcreteType) -> &TypeEntry {
        &self.entries[&ty]
    }

    pub fn inputs(&self) -> &[InputAttribute] {
        &self.inputs
    }

    pub fn input(&self, name: &str) -> Option<&InputAttribute> {
        self.inputs.iter().find(|attr| attr.name == name)
    }

    pub fn entries(&self) -> impl Iterator<Item = (ConcreteType, &TypeEntry)> {
        self.entries.iter().map(|(ty, entry)| (*ty, entry))
    }
}

#[derive(Debug, Clone)]
pub struct CatalogBuilder {
    namespaces: Vec<String>,
}

impl CatalogBuilder {
    /// `namespaces` selects which extension groups are indexed, in order.
    pub fn new(namespaces: Vec<String>) -> Self {
        CatalogBuilder { namespaces }
    }

    /// Index `inputs` and `metadata` by concrete type.
    ///
    /// Extension groups are indexed first, in namespace order, then the
    /// built-ins. A repeated key overwrites the earlier entry in place.
    #[tracing::instrument(skip_all, fields(inputs = inputs.len()))]
    pub fn build(&self, inputs: &[InputAttribute], metadata: &FunctionMetadata) -> Catalog {
        let mut entries: IndexMap<ConcreteType, TypeEntry> = ConcreteType::ALL
            .into_iter()
            .map(|ty| (ty, TypeEntry::default()))
            .collect();

        for attr in inputs {
            entries[&attr.data_type]
                .attributes
                .insert(attr.name.clone(), attr.clone());
        }

        for namespace in &self.namespaces {
            let Some(group) = metadata.extensions.get(namespace) else {
                debug!(%namespace, "extension namespace missing from metadata");
                continue;
            };
            for func in &group.functions {
                let mut func = func.clone();
                func.namespace = Some(namespace.clone());
                index_function(&mut entries, func);
            }
        }

        for func in &metadata.in_built.functions {
            let mut func = func.clone();
            func.namespace = None;
            index_function(&mut entries, func);
        }

        Catalog {
            entries,
            inputs: inputs.to_vec(),
        }
    }
}

impl Default for CatalogBuilder {
    fn default() -> Self {
        CatalogBuilder::new(crate::config::default_namespaces())
    }
}

fn index_function(entries: &mut IndexMap<ConcreteType, TypeEntry>, func: FunctionDescriptor) {
    let key = func.qualified_name();
    for ty in func.return_types() {
        entries[&ty].functions.insert(key.clone(), func.clone());
    }
}
