//! Editable expense forest.
//!
//! Nodes live in a flat map keyed by [`ExpenseId`] with parent links and
//! ordered child lists, so every edit is a single lookup. The engine never
//! sees this structure: [`ExpenseForest::snapshot`] exports the immutable
//! tree of [`ExpenseNode`]s the calculations consume.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use income_core::{Cadence, ExpenseDraft, ExpenseForest};
//!
//! let mut forest = ExpenseForest::new();
//! let housing = forest.add_root(ExpenseDraft::new("Housing", dec!(0)).cadence(Cadence::Monthly));
//! forest.add_child(&housing, ExpenseDraft::new("Rent", dec!(1500))).unwrap();
//!
//! let snapshot = forest.snapshot();
//! assert_eq!(snapshot[0].children[0].cadence, Cadence::Monthly);
//! ```

use std::collections::HashMap;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, warn};

use crate::calculations::{impact_color, row_total};
use crate::models::{Cadence, ExpenseDraft, ExpenseId, ExpenseNode};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ForestError {
    #[error("expense {0} not found")]
    NotFound(ExpenseId),
}

#[derive(Debug, Clone)]
struct Slot {
    label: String,
    amount: Decimal,
    cadence: Cadence,
    color: String,
    parent: Option<ExpenseId>,
    children: Vec<ExpenseId>,
}

#[derive(Debug, Clone, Default)]
pub struct ExpenseForest {
    slots: HashMap<ExpenseId, Slot>,
    roots: Vec<ExpenseId>,
}

impl ExpenseForest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds an arena from an exported tree.
    ///
    /// A node whose id was already seen is kept under a fresh id, so a
    /// stored forest with repeated ids still loads in full.
    pub fn from_nodes(nodes: &[ExpenseNode]) -> Self {
        let mut forest = Self::new();
        for node in nodes {
            let id = forest.insert_subtree(node, None);
            forest.roots.push(id);
        }
        forest
    }

    fn insert_subtree(
        &mut self,
        node: &ExpenseNode,
        parent: Option<&ExpenseId>,
    ) -> ExpenseId {
        let id = if self.slots.contains_key(&node.id) {
            let fresh = ExpenseId::new_random();
            warn!(duplicate = %node.id, %fresh, "expense id repeats; assigning a new one");
            fresh
        } else {
            node.id.clone()
        };

        self.slots.insert(
            id.clone(),
            Slot {
                label: node.label.clone(),
                amount: node.amount,
                cadence: node.cadence,
                color: node.color.clone(),
                parent: parent.cloned(),
                children: Vec::new(),
            },
        );
        let children: Vec<ExpenseId> = node
            .children
            .iter()
            .map(|child| self.insert_subtree(child, Some(&id)))
            .collect();
        if let Some(slot) = self.slots.get_mut(&id) {
            slot.children = children;
        }
        id
    }

    /// Appends a new root. A draft without a cadence defaults to Monthly.
    pub fn add_root(
        &mut self,
        draft: ExpenseDraft,
    ) -> ExpenseId {
        let cadence = draft.cadence.unwrap_or(Cadence::Monthly);
        let id = self.insert_draft(draft, cadence, None);
        self.roots.push(id.clone());
        id
    }

    /// Appends a new last child of `parent`. A draft without a cadence
    /// takes the parent's.
    pub fn add_child(
        &mut self,
        parent: &ExpenseId,
        draft: ExpenseDraft,
    ) -> Result<ExpenseId, ForestError> {
        let parent_cadence = self.slot(parent)?.cadence;
        let cadence = draft.cadence.unwrap_or(parent_cadence);
        let id = self.insert_draft(draft, cadence, Some(parent.clone()));
        self.slot_mut(parent)?.children.push(id.clone());
        Ok(id)
    }

    fn insert_draft(
        &mut self,
        draft: ExpenseDraft,
        cadence: Cadence,
        parent: Option<ExpenseId>,
    ) -> ExpenseId {
        let color = match draft.color {
            Some(color) => color,
            None => impact_color(draft.amount, self.root_display_totals()),
        };
        let id = ExpenseId::new_random();
        debug!(%id, label = %draft.label, "adding expense");
        self.slots.insert(
            id.clone(),
            Slot {
                label: draft.label,
                amount: draft.amount,
                cadence,
                color,
                parent,
                children: Vec::new(),
            },
        );
        id
    }

    /// Removes `id` and everything beneath it. Returns how many nodes were
    /// dropped.
    pub fn remove(
        &mut self,
        id: &ExpenseId,
    ) -> Result<usize, ForestError> {
        let parent = self.slot(id)?.parent.clone();
        match parent {
            Some(parent) => self.slot_mut(&parent)?.children.retain(|c| c != id),
            None => self.roots.retain(|r| r != id),
        }

        let mut removed = 0;
        let mut pending = vec![id.clone()];
        while let Some(next) = pending.pop() {
            if let Some(slot) = self.slots.remove(&next) {
                pending.extend(slot.children);
                removed += 1;
            }
        }
        debug!(%id, removed, "removed expense subtree");
        Ok(removed)
    }

    pub fn set_color(
        &mut self,
        id: &ExpenseId,
        color: impl Into<String>,
    ) -> Result<(), ForestError> {
        self.slot_mut(id)?.color = color.into();
        Ok(())
    }

    pub fn set_amount(
        &mut self,
        id: &ExpenseId,
        amount: Decimal,
    ) -> Result<(), ForestError> {
        self.slot_mut(id)?.amount = amount;
        Ok(())
    }

    pub fn set_label(
        &mut self,
        id: &ExpenseId,
        label: impl Into<String>,
    ) -> Result<(), ForestError> {
        self.slot_mut(id)?.label = label.into();
        Ok(())
    }

    /// The subtree rooted at `id`.
    pub fn get(
        &self,
        id: &ExpenseId,
    ) -> Result<ExpenseNode, ForestError> {
        self.slot(id)?;
        Ok(self.build(id))
    }

    pub fn parent(
        &self,
        id: &ExpenseId,
    ) -> Result<Option<&ExpenseId>, ForestError> {
        Ok(self.slot(id)?.parent.as_ref())
    }

    pub fn contains(
        &self,
        id: &ExpenseId,
    ) -> bool {
        self.slots.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn roots(&self) -> &[ExpenseId] {
        &self.roots
    }

    /// The whole forest as an owned tree, roots and children in insertion
    /// order.
    pub fn snapshot(&self) -> Vec<ExpenseNode> {
        self.roots.iter().map(|id| self.build(id)).collect()
    }

    fn build(
        &self,
        id: &ExpenseId,
    ) -> ExpenseNode {
        let slot = &self.slots[id];
        ExpenseNode::new(id.clone(), slot.label.clone(), slot.amount, slot.cadence)
            .with_color(slot.color.clone())
            .with_children(slot.children.iter().map(|c| self.build(c)).collect())
    }

    /// Display totals of the roots, read from the slots of each root and its
    /// direct children.
    fn root_display_totals(&self) -> Vec<Decimal> {
        self.roots
            .iter()
            .filter_map(|id| self.slots.get(id))
            .map(|root| {
                row_total(
                    root.amount,
                    root.cadence,
                    root.children
                        .iter()
                        .filter_map(|child| self.slots.get(child))
                        .map(|child| (child.amount, child.cadence)),
                )
            })
            .collect()
    }

    fn slot(
        &self,
        id: &ExpenseId,
    ) -> Result<&Slot, ForestError> {
        self.slots
            .get(id)
            .ok_or_else(|| ForestError::NotFound(id.clone()))
    }

    fn slot_mut(
        &mut self,
        id: &ExpenseId,
    ) -> Result<&mut Slot, ForestError> {
        self.slots
            .get_mut(id)
            .ok_or_else(|| ForestError::NotFound(id.clone()))
    }
}
