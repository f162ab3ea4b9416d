pub mod ast;
pub mod catalog;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod focus;
pub mod render;
pub mod resolver;
pub mod session;
pub mod types;
pub mod validate;

pub use ast::{Coordinate, ExpressionNode, OperatorDescriptor, OperatorTable, ScopeNode};
pub use catalog::{Catalog, CatalogBuilder, FunctionMetadata, InputAttribute};
pub use config::BuilderConfig;
pub use error::{BuilderError, Result};
pub use focus::FocusStack;
pub use render::{render, render_plain};
pub use resolver::{CandidateCategory, CandidateFilter, Candidates, Resolver, Selection};
pub use session::{MappingBoard, SlotId};
pub use types::{ConcreteType, GenericType, classify};
pub use validate::{ValidationIssue, issues, validate};
