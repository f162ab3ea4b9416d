//! Expression slots of an ETL task and the edit session over one of them.
//!
//! A [`MappingBoard`] holds the committed expression of every output
//! attribute plus the optional stream filter. At most one slot is edited at
//! a time: [`MappingBoard::open`] copies the committed root into a
//! [`FocusStack`], every editing call works on that copy, and only
//! [`MappingBoard::submit`] writes it back. [`MappingBoard::cancel`] simply
//! drops the copy.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, info};

use crate::{
    ast::{Coordinate, ExpressionNode, OperatorTable, ScopeNode},
    catalog::{Catalog, FunctionMetadata, InputAttribute},
    config::BuilderConfig,
    error::{BuilderError, Result},
    focus::FocusStack,
    render::{render, render_plain},
    resolver::{CandidateFilter, Candidates, Resolver, Selection},
    types::ConcreteType,
    validate::issues,
};

/// Output attributes share the shape of input attributes.
pub type OutputAttribute = InputAttribute;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SlotId {
    /// Mapping expression of the named output attribute
    Output(String),
    /// Stream filter condition
    Filter,
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotId::Output(name) => f.write_str(name),
            SlotId::Filter => f.write_str("filter"),
        }
    }
}

/// An input attribute feeding an output attribute's mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Connection {
    pub input: String,
    pub output: String,
}

#[derive(Debug)]
struct ActiveEdit {
    slot: SlotId,
    focus: FocusStack,
}

#[derive(Debug)]
pub struct MappingBoard {
    config: BuilderConfig,
    catalog: Catalog,
    outputs: Vec<OutputAttribute>,
    mappings: IndexMap<String, ScopeNode>,
    filter: Option<ScopeNode>,
    filter_reversed: bool,
    active: Option<ActiveEdit>,
}

impl MappingBoard {
    pub fn new(
        config: BuilderConfig,
        inputs: &[InputAttribute],
        outputs: Vec<OutputAttribute>,
        metadata: &FunctionMetadata,
    ) -> Self {
        let catalog = config.catalog_builder().build(inputs, metadata);
        MappingBoard {
            config,
            catalog,
            outputs,
            mappings: IndexMap::new(),
            filter: None,
            filter_reversed: false,
            active: None,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn operators(&self) -> &OperatorTable {
        &self.config.operators
    }

    pub fn outputs(&self) -> &[OutputAttribute] {
        &self.outputs
    }

    /// Committed mapping of `output`
    pub fn mapping(&self, output: &str) -> Option<&ScopeNode> {
        self.mappings.get(output)
    }

    /// Committed filter condition
    pub fn filter(&self) -> Option<&ScopeNode> {
        self.filter.as_ref()
    }

    pub fn is_filter_reversed(&self) -> bool {
        self.filter_reversed
    }

    pub fn set_filter_reversed(&mut self, reversed: bool) {
        self.filter_reversed = reversed;
    }

    /// Filter condition as query text, negated when reversed.
    pub fn filter_query(&self) -> Option<String> {
        let filter = self.filter.as_ref()?;
        let text = render_plain(&ExpressionNode::from(filter.clone()));
        Some(if self.filter_reversed {
            format!("not ({})", text)
        } else {
            text
        })
    }

    /// Start editing `slot` from its committed expression.
    pub fn open(&mut self, slot: SlotId) -> Result<()> {
        if let Some(active) = &self.active {
            return Err(BuilderError::SessionActive(active.slot.to_string()));
        }

        let root = match &slot {
            SlotId::Output(name) => {
                let output = self
                    .outputs
                    .iter()
                    .find(|attr| &attr.name == name)
                    .ok_or_else(|| BuilderError::UnknownSlot(name.clone()))?;
                self.mappings
                    .get(name)
                    .cloned()
                    .unwrap_or_else(|| ScopeNode::new(vec![output.data_type]))
            }
            SlotId::Filter => self
                .filter
                .clone()
                .unwrap_or_else(|| ScopeNode::new(vec![ConcreteType::Bool])),
        };

        debug!(%slot, "open expression");
        self.active = Some(ActiveEdit {
            slot,
            focus: FocusStack::new(root),
        });
        Ok(())
    }

    pub fn active_slot(&self) -> Option<&SlotId> {
        self.active.as_ref().map(|active| &active.slot)
    }

    pub fn focus(&self) -> Result<&FocusStack> {
        self.active
            .as_ref()
            .map(|active| &active.focus)
            .ok_or(BuilderError::NoActiveSession)
    }

    fn focus_mut(&mut self) -> Result<&mut FocusStack> {
        self.active
            .as_mut()
            .map(|active| &mut active.focus)
            .ok_or(BuilderError::NoActiveSession)
    }

    /// Candidates for the focused position of the open session.
    pub fn candidates(&self, filter: Option<&CandidateFilter>) -> Result<Candidates> {
        let focus = self.focus()?;
        let resolver = Resolver::new(&self.catalog, &self.config.operators);
        Ok(resolver.resolve(focus.current_focus(), filter))
    }

    /// Append the selected candidate to the focused scope.
    pub fn select(&mut self, selection: &Selection) -> Result<()> {
        let node = self.candidates(None)?.instantiate(selection)?;
        self.focus_mut()?.add_node(node)
    }

    pub fn descend(&mut self, coordinate: Coordinate) -> Result<bool> {
        Ok(self.focus_mut()?.descend(coordinate))
    }

    pub fn merge_up(&mut self) -> Result<bool> {
        Ok(self.focus_mut()?.merge_up())
    }

    pub fn clear_child(&mut self, coordinate: Coordinate) -> Result<()> {
        self.focus_mut()?.clear_child(coordinate)
    }

    pub fn add_parameter(&mut self) -> Result<()> {
        self.focus_mut()?.add_parameter()
    }

    /// Restart the open expression from an empty scope.
    pub fn clear_expression(&mut self) -> Result<()> {
        self.focus_mut()?.clear();
        Ok(())
    }

    /// Markup for each drill-down level, outermost first.
    ///
    /// Every level highlights the child the next level descended into.
    pub fn render_levels(&self) -> Result<Vec<String>> {
        let focus = self.focus()?;
        let path = focus.path();
        let mut levels = vec![render(focus.root(), path.first().copied())];
        for (i, snapshot) in focus.snapshots().enumerate() {
            levels.push(render(snapshot, path.get(i + 1).copied()));
        }
        Ok(levels)
    }

    /// Discard the open session; the committed expression is untouched.
    pub fn cancel(&mut self) -> Result<()> {
        let active = self.active.take().ok_or(BuilderError::NoActiveSession)?;
        debug!(slot = %active.slot, "cancel expression");
        Ok(())
    }

    /// Merge pending edits, validate, and commit.
    ///
    /// An incomplete expression is refused and the session stays open with
    /// all edits merged into its root.
    pub fn submit(&mut self) -> Result<()> {
        let focus = self.focus_mut()?;
        focus.merge_all();
        let found = issues(focus.root());
        if !found.is_empty() {
            return Err(BuilderError::IncompleteExpression(found));
        }

        let active = self.active.take().ok_or(BuilderError::NoActiveSession)?;
        let root = active.focus.into_scope();
        info!(slot = %active.slot, expression = %render_plain(&ExpressionNode::from(root.clone())), "commit expression");
        match active.slot {
            SlotId::Output(name) => {
                self.mappings.insert(name, root);
            }
            SlotId::Filter => self.filter = Some(root),
        }
        Ok(())
    }

    /// Remove the committed mapping of `output`; returns whether one existed.
    pub fn clear_mapping(&mut self, output: &str) -> bool {
        self.mappings.shift_remove(output).is_some()
    }

    /// Input attributes each committed mapping reads, in output order.
    pub fn connections(&self) -> Vec<Connection> {
        let mut connections = Vec::new();
        for (output, root) in &self.mappings {
            for input in referenced_attributes(&ExpressionNode::from(root.clone())) {
                if self.catalog.input(&input).is_some() {
                    connections.push(Connection {
                        input,
                        output: output.clone(),
                    });
                }
            }
        }
        connections
    }
}

/// Names of the attributes referenced anywhere in `node`, first use first.
pub fn referenced_attributes(node: &ExpressionNode) -> Vec<String> {
    let mut names = Vec::new();
    collect_attributes(node, &mut names);
    names
}

fn collect_attributes(node: &ExpressionNode, names: &mut Vec<String>) {
    if let ExpressionNode::Attribute(attr) = node {
        if !names.contains(&attr.name) {
            names.push(attr.name.clone());
        }
    }
    for (_, child) in node.slots() {
        collect_attributes(child, names);
    }
}
