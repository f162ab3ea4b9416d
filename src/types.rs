//! Data types and their generic classes.
//!
//! Every compatibility check in the builder works on one of three generic
//! classes rather than on concrete stream types:
//!
//! | Concrete                      | Generic  |
//! |-------------------------------|----------|
//! | `int`, `long`, `float`, `double` | `number` |
//! | `string`                      | `text`   |
//! | `bool`                        | `bool`   |
//!
//! ```
//! use stream_expr::types::{classify, GenericType};
//!
//! assert_eq!(classify("LONG").unwrap(), GenericType::Number);
//! assert!(classify("object").is_err());
//! ```

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::BuilderError;

/// Concrete attribute data type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum ConcreteType {
    String,
    Int,
    Long,
    Double,
    Float,
    Bool,
}

impl ConcreteType {
    /// Every concrete type, in catalog order.
    pub const ALL: [ConcreteType; 6] = [
        ConcreteType::String,
        ConcreteType::Int,
        ConcreteType::Long,
        ConcreteType::Double,
        ConcreteType::Float,
        ConcreteType::Bool,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ConcreteType::String => "string",
            ConcreteType::Int => "int",
            ConcreteType::Long => "long",
            ConcreteType::Double => "double",
            ConcreteType::Float => "float",
            ConcreteType::Bool => "bool",
        }
    }

    /// The generic class of this type
    pub fn generic(self) -> GenericType {
        match self {
            ConcreteType::Int | ConcreteType::Long | ConcreteType::Float | ConcreteType::Double => {
                GenericType::Number
            }
            ConcreteType::String => GenericType::Text,
            ConcreteType::Bool => GenericType::Bool,
        }
    }

    pub fn is_integral(self) -> bool {
        matches!(self, ConcreteType::Int | ConcreteType::Long)
    }

    /// Concrete types whose generic class is one of `generics`.
    pub fn of_generics(generics: &[GenericType]) -> Vec<ConcreteType> {
        Self::ALL
            .into_iter()
            .filter(|ty| generics.contains(&ty.generic()))
            .collect()
    }
}

impl fmt::Display for ConcreteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConcreteType {
    type Err = BuilderError;

    /// Case-insensitive; stream metadata spells types in upper case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "string" => Ok(ConcreteType::String),
            "int" => Ok(ConcreteType::Int),
            "long" => Ok(ConcreteType::Long),
            "double" => Ok(ConcreteType::Double),
            "float" => Ok(ConcreteType::Float),
            "bool" => Ok(ConcreteType::Bool),
            _ => Err(BuilderError::UnknownType(s.to_string())),
        }
    }
}

impl TryFrom<String> for ConcreteType {
    type Error = BuilderError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Generic type class used for operator compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenericType {
    Number,
    Text,
    Bool,
}

impl GenericType {
    pub const ALL: [GenericType; 3] = [GenericType::Bool, GenericType::Text, GenericType::Number];

    pub fn as_str(self) -> &'static str {
        match self {
            GenericType::Number => "number",
            GenericType::Text => "text",
            GenericType::Bool => "bool",
        }
    }
}

impl fmt::Display for GenericType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a concrete type name.
///
/// Fails with [`BuilderError::UnknownType`] for anything outside the six
/// recognized types, which indicates a bug in the caller or the catalog.
pub fn classify(concrete: &str) -> Result<GenericType, BuilderError> {
    concrete.parse::<ConcreteType>().map(ConcreteType::generic)
}

/// Generic classes of `types`, deduplicated, in first-seen order
pub fn generic_set(types: &[ConcreteType]) -> Vec<GenericType> {
    let mut generics = Vec::with_capacity(types.len());
    for ty in types {
        let generic = ty.generic();
        if !generics.contains(&generic) {
            generics.push(generic);
        }
    }
    generics
}

pub fn intersects(a: &[GenericType], b: &[GenericType]) -> bool {
    a.iter().any(|ty| b.contains(ty))
}
