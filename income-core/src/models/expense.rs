use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Cadence;
use super::amount::deserialize_lenient_amount;

/// Opaque, stable identifier of an expense node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(String);

impl ExpenseId {
    /// A fresh random id for a newly created node.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExpenseId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ExpenseId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ExpenseId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// One node of the expense forest.
///
/// An `amount` of zero marks the node as a container. Its own amount and
/// the totals of its children are independent and always added together.
///
/// The serialized layout (`frequency`, `subItems`) matches the persisted
/// expense forest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseNode {
    pub id: ExpenseId,
    pub label: String,
    #[serde(default, deserialize_with = "deserialize_lenient_amount")]
    pub amount: Decimal,
    #[serde(rename = "frequency", alias = "cadence", default)]
    pub cadence: Cadence,
    /// Display hint only.
    #[serde(default)]
    pub color: String,
    #[serde(rename = "subItems", alias = "children", default)]
    pub children: Vec<ExpenseNode>,
}

impl ExpenseNode {
    /// A childless node with the given id.
    pub fn new(
        id: impl Into<ExpenseId>,
        label: impl Into<String>,
        amount: Decimal,
        cadence: Cadence,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            amount,
            cadence,
            color: String::new(),
            children: Vec::new(),
        }
    }

    pub fn with_color(
        mut self,
        color: impl Into<String>,
    ) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_children(
        mut self,
        children: Vec<ExpenseNode>,
    ) -> Self {
        self.children = children;
        self
    }

    pub fn is_container(&self) -> bool {
        self.amount.is_zero()
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn subtree_len(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(ExpenseNode::subtree_len)
            .sum::<usize>()
    }
}

/// User input for a node that does not exist yet.
///
/// `cadence` and `color` are optional: a child without a cadence inherits
/// its parent's, and a missing color is filled in from the impact palette.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExpenseDraft {
    pub label: String,
    pub amount: Decimal,
    pub cadence: Option<Cadence>,
    pub color: Option<String>,
}

impl ExpenseDraft {
    pub fn new(
        label: impl Into<String>,
        amount: Decimal,
    ) -> Self {
        Self {
            label: label.into(),
            amount,
            ..Default::default()
        }
    }

    pub fn cadence(
        mut self,
        cadence: Cadence,
    ) -> Self {
        self.cadence = Some(cadence);
        self
    }

    pub fn color(
        mut self,
        color: impl Into<String>,
    ) -> Self {
        self.color = Some(color.into());
        self
    }
}
