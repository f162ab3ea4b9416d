//! Function syntax strings.
//!
//! Function metadata describes each overload as a string such as
//!
//! ```text
//! str:concat(<STRING|INT> arg, <STRING> arg...)
//! ```
//!
//! Each comma-separated parameter is `<TYPE|TYPE> name`. A name containing
//! `...` marks the variadic tail.

use std::sync::LazyLock;

use regex::Regex;

use crate::{
    error::{BuilderError, Result},
    types::ConcreteType,
};

static PARAMETER_LIST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([^)]+)\)").expect("valid parameter list regex"));

static PARAMETER_TYPES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<(.*?)>").expect("valid parameter type regex"));

/// Parameter layout extracted from a syntax string.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedSignature {
    /// Allowed types of each fixed parameter, in order
    pub fixed: Vec<Vec<ConcreteType>>,
    /// Allowed types of the repeatable tail, if any
    pub variadic: Option<Vec<ConcreteType>>,
}

pub fn parse(syntax: &str) -> Result<ParsedSignature> {
    let mut parsed = ParsedSignature::default();

    let Some(list) = PARAMETER_LIST.captures(syntax) else {
        return Ok(parsed);
    };

    for param in list[1].split(',') {
        let param = param.trim();
        let mut parts = param.split_whitespace();
        let type_spec = parts.next().unwrap_or_default();
        let name = parts.next().unwrap_or_default();

        let types = PARAMETER_TYPES
            .captures(type_spec)
            .ok_or_else(|| BuilderError::InvalidSignature(syntax.to_string()))?;
        let types = parse_types(&types[1])?;

        if name.contains("...") {
            parsed.variadic = Some(types);
        } else {
            parsed.fixed.push(types);
        }
    }

    Ok(parsed)
}

/// `OBJECT` accepts anything, so it widens to every recognized type.
fn parse_types(spec: &str) -> Result<Vec<ConcreteType>> {
    let mut types: Vec<ConcreteType> = Vec::new();
    for name in spec.split('|') {
        let widened = if name.trim().eq_ignore_ascii_case("object") {
            ConcreteType::ALL.to_vec()
        } else {
            vec![name.parse::<ConcreteType>()?]
        };
        for ty in widened {
            if !types.contains(&ty) {
                types.push(ty);
            }
        }
    }
    Ok(types)
}
