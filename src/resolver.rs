//! Computing the tokens that may legally follow the focused position.
//!
//! The resolver looks only at the focused node and the immutable catalog
//! and operator table. It never mutates anything, so the same focus always
//! yields the same [`Candidates`] in the same order.
//!
//! | Focus                                  | Attributes / functions           | Operators                          |
//! |----------------------------------------|----------------------------------|------------------------------------|
//! | empty scope                            | producing any allowed type       | `isFirst` ops returning allowed, `()` |
//! | scope ending in attribute / literal    | none                             | left accepts the value, returns allowed |
//! | scope ending in function / scope       | none                             | same, using the node's return types |
//! | scope ending in terminal operator      | none                             | same, using the operator's result  |
//! | scope ending in non-terminal operator  | producing the operator's right types | `()` only                      |
//! | function                               | none                             | none (drill into a parameter)      |

use std::rc::Rc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{
    ast::{
        AttributeNode, ExpressionNode, FunctionNode, LiteralNode, OperatorDescriptor, OperatorNode,
        OperatorTable, ScopeNode,
    },
    catalog::{Catalog, FunctionDescriptor, InputAttribute},
    error::{BuilderError, Result},
    types::{ConcreteType, GenericType, intersects},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateCategory {
    Attribute,
    Function,
    Operator,
}

/// Search box state: narrows one category by a case-insensitive substring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateFilter {
    pub category: CandidateCategory,
    pub search: String,
}

impl CandidateFilter {
    pub fn new(category: CandidateCategory, search: impl Into<String>) -> Self {
        CandidateFilter {
            category,
            search: search.into(),
        }
    }
}

/// Legal next tokens for the focused position.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidates {
    pub attributes: IndexMap<String, InputAttribute>,
    /// Keyed by qualified name (`str:concat`)
    pub functions: IndexMap<String, FunctionDescriptor>,
    /// Keyed by operator key (`greater_than`, `bracket`)
    pub operators: IndexMap<String, OperatorDescriptor>,
    /// Types a custom value or a new bracket scope may take here
    pub value_types: Vec<ConcreteType>,
}

impl Candidates {
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.functions.is_empty() && self.operators.is_empty()
    }

    /// Build the node for a chosen candidate.
    pub fn instantiate(&self, selection: &Selection) -> Result<ExpressionNode> {
        match selection {
            Selection::Attribute(name) => self
                .attributes
                .get(name)
                .map(|attr| AttributeNode::from(attr).into())
                .ok_or_else(|| BuilderError::NotACandidate(name.clone())),
            Selection::Operator(key) => {
                let op = self
                    .operators
                    .get(key)
                    .ok_or_else(|| BuilderError::NotACandidate(key.clone()))?;
                if op.opens_scope {
                    Ok(ScopeNode::new(self.value_types.clone()).into())
                } else {
                    Ok(OperatorNode::from(op).into())
                }
            }
            Selection::Function { name, syntax } => {
                let func = self
                    .functions
                    .get(name)
                    .ok_or_else(|| BuilderError::NotACandidate(name.clone()))?;
                Ok(FunctionNode::from_descriptor(func, *syntax)?.into())
            }
            Selection::Literal { data_type, raw } => {
                if !self.value_types.contains(data_type) {
                    return Err(BuilderError::NotACandidate(format!("{} value", data_type)));
                }
                Ok(LiteralNode::parse(*data_type, raw)?.into())
            }
        }
    }
}

/// A token the user picked from the candidate lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Selection {
    Attribute(String),
    Operator(String),
    /// Function by qualified name and the index of the chosen syntax
    Function { name: String, syntax: usize },
    Literal { data_type: ConcreteType, raw: String },
}

pub struct Resolver<'a> {
    catalog: &'a Catalog,
    operators: &'a OperatorTable,
}

impl<'a> Resolver<'a> {
    pub fn new(catalog: &'a Catalog, operators: &'a OperatorTable) -> Self {
        Resolver { catalog, operators }
    }

    pub fn resolve(&self, focus: &ExpressionNode, filter: Option<&CandidateFilter>) -> Candidates {
        let mut candidates = match focus {
            ExpressionNode::Scope(scope) => match scope.children.last() {
                None => self.for_empty_scope(scope),
                Some(last) => self.after(last, scope),
            },
            _ => Candidates::default(),
        };

        if let Some(filter) = filter {
            apply_filter(&mut candidates, filter);
        }
        candidates
    }

    fn for_empty_scope(&self, scope: &ScopeNode) -> Candidates {
        let mut candidates = Candidates::default();
        let allowed = scope.generic_types();

        // A bare attribute of any type may stand as a predicate.
        if allowed.contains(&GenericType::Bool) {
            for attr in self.catalog.inputs() {
                candidates.attributes.insert(attr.name.clone(), attr.clone());
            }
        }

        self.collect_producers(&scope.allowed_return_types, &mut candidates);

        let bracket = OperatorDescriptor::bracket();
        candidates.operators.insert(bracket.key.clone(), bracket);
        for op in self.operators.iter() {
            if op.is_first && intersects(&op.return_types, &allowed) {
                candidates.operators.entry(op.key.clone()).or_insert_with(|| op.clone());
            }
        }

        candidates.value_types = scope.allowed_return_types.clone();
        candidates
    }

    fn after(&self, last: &Rc<ExpressionNode>, scope: &ScopeNode) -> Candidates {
        match last.as_ref() {
            ExpressionNode::Operator(op) if !op.is_terminal => {
                let mut candidates = Candidates::default();
                let types = ConcreteType::of_generics(&op.right_types);
                self.collect_producers(&types, &mut candidates);

                let bracket = OperatorDescriptor::bracket();
                candidates.operators.insert(bracket.key.clone(), bracket);
                candidates.value_types = types;
                candidates
            }
            value => {
                let produced = value.generic_return_types();
                let allowed = scope.generic_types();
                let mut candidates = Candidates::default();
                for op in self.operators.iter() {
                    if intersects(&op.left_types, &produced) && intersects(&op.return_types, &allowed)
                    {
                        candidates.operators.insert(op.key.clone(), op.clone());
                    }
                }
                candidates
            }
        }
    }

    /// Merge the catalog entries of every type in `types`.
    fn collect_producers(&self, types: &[ConcreteType], candidates: &mut Candidates) {
        for ty in types {
            let entry = self.catalog.entry(*ty);
            for (name, attr) in &entry.attributes {
                candidates.attributes.insert(name.clone(), attr.clone());
            }
            for (name, func) in &entry.functions {
                candidates.functions.insert(name.clone(), func.clone());
            }
        }
    }
}

fn apply_filter(candidates: &mut Candidates, filter: &CandidateFilter) {
    let needle = filter.search.to_lowercase();
    let matches = |haystack: &str| haystack.to_lowercase().contains(&needle);
    match filter.category {
        CandidateCategory::Attribute => {
            candidates.attributes.retain(|name, _| matches(name));
        }
        CandidateCategory::Function => {
            candidates.functions.retain(|_, func| {
                matches(&func.display_name()) || matches(&func.description)
            });
        }
        CandidateCategory::Operator => {
            candidates.operators.retain(|_, op| {
                matches(&op.description) || matches(&op.symbol)
            });
        }
    }
}
