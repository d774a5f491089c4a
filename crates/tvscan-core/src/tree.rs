//! AND/OR composition of filter operations.
//!
//! Leaves are wrapped in a one-field `{"expression": ...}` envelope; subtrees are
//! embedded as-is. Operand order is preserved exactly.
//!
//! ```
//! use tvscan_core::{and, or};
//! use tvscan_core::columns::{CLOSE, EMA20, EMA5, RSI, VOLUME, AVERAGE_VOLUME_10D};
//!
//! let tree = and!(
//!     CLOSE.between(&EMA5, &EMA20),
//!     or!(VOLUME.greater_than(&AVERAGE_VOLUME_10D), RSI.less_than(30)),
//! );
//! assert_eq!(tree.operands().len(), 2);
//! assert_eq!(tree.depth(), 2);
//! ```

use std::fmt::{Display, Formatter};

use serde::de::{Error as _, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::filter::FilterOperation;

/// Boolean combinator of a [`ComparisonTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicalOperator {
    And,
    Or,
}

impl LogicalOperator {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
        }
    }
}

impl Display for LogicalOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One operand of a tree: a wrapped leaf or a nested tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ComparisonNode {
    Expression { expression: FilterOperation },
    Tree(ComparisonTree),
}

impl ComparisonNode {
    pub fn as_expression(&self) -> Option<&FilterOperation> {
        match self {
            Self::Expression { expression } => Some(expression),
            Self::Tree(_) => None,
        }
    }

    pub fn as_tree(&self) -> Option<&ComparisonTree> {
        match self {
            Self::Expression { .. } => None,
            Self::Tree(tree) => Some(tree),
        }
    }
}

// Decoded key by key instead of through an untagged buffer so nesting depth only
// costs what the underlying deserializer spends per level.
impl<'de> Deserialize<'de> for ComparisonNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(NodeVisitor)
    }
}

struct NodeVisitor;

impl<'de> Visitor<'de> for NodeVisitor {
    type Value = ComparisonNode;

    fn expecting(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("an {\"expression\": ...} leaf or an {operator, operands} tree")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut expression = None;
        let mut operator = None;
        let mut operands = None;
        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                "expression" => expression = Some(map.next_value::<FilterOperation>()?),
                "operator" => operator = Some(map.next_value::<LogicalOperator>()?),
                "operands" => operands = Some(map.next_value::<Vec<ComparisonNode>>()?),
                _ => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }

        match (expression, operator, operands) {
            (Some(expression), None, None) => Ok(ComparisonNode::Expression { expression }),
            (Some(_), _, _) => Err(A::Error::custom(
                "node mixes 'expression' with 'operator'/'operands'",
            )),
            (None, Some(operator), Some(operands)) => {
                Ok(ComparisonNode::Tree(ComparisonTree { operator, operands }))
            }
            (None, None, _) => Err(A::Error::missing_field("operator")),
            (None, Some(_), None) => Err(A::Error::missing_field("operands")),
        }
    }
}

impl From<FilterOperation> for ComparisonNode {
    fn from(expression: FilterOperation) -> Self {
        Self::Expression { expression }
    }
}

impl From<ComparisonTree> for ComparisonNode {
    fn from(tree: ComparisonTree) -> Self {
        Self::Tree(tree)
    }
}

/// `{operator, operands}` node, serialized as the `filter2` request field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonTree {
    operator: LogicalOperator,
    operands: Vec<ComparisonNode>,
}

impl ComparisonTree {
    pub fn new<I, N>(operator: LogicalOperator, operands: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<ComparisonNode>,
    {
        Self {
            operator,
            operands: operands.into_iter().map(Into::into).collect(),
        }
    }

    pub fn and<I, N>(operands: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<ComparisonNode>,
    {
        Self::new(LogicalOperator::And, operands)
    }

    pub fn or<I, N>(operands: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<ComparisonNode>,
    {
        Self::new(LogicalOperator::Or, operands)
    }

    pub const fn operator(&self) -> LogicalOperator {
        self.operator
    }

    pub fn operands(&self) -> &[ComparisonNode] {
        &self.operands
    }

    /// Number of tree levels; a tree of only leaves has depth 1.
    pub fn depth(&self) -> usize {
        1 + self
            .operands
            .iter()
            .filter_map(ComparisonNode::as_tree)
            .map(Self::depth)
            .max()
            .unwrap_or(0)
    }

    /// Leaf predicates in depth-first, left-to-right order.
    pub fn leaves(&self) -> Vec<&FilterOperation> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a FilterOperation>) {
        for operand in &self.operands {
            match operand {
                ComparisonNode::Expression { expression } => out.push(expression),
                ComparisonNode::Tree(tree) => tree.collect_leaves(out),
            }
        }
    }
}

/// Builds an `and` [`ComparisonTree`] from filters and subtrees.
#[macro_export]
macro_rules! and {
    ($($operand:expr),* $(,)?) => {{
        let operands: ::std::vec::Vec<$crate::ComparisonNode> =
            ::std::vec![$($crate::ComparisonNode::from($operand)),*];
        $crate::ComparisonTree::and(operands)
    }};
}

/// Builds an `or` [`ComparisonTree`] from filters and subtrees.
#[macro_export]
macro_rules! or {
    ($($operand:expr),* $(,)?) => {{
        let operands: ::std::vec::Vec<$crate::ComparisonNode> =
            ::std::vec![$($crate::ComparisonNode::from($operand)),*];
        $crate::ComparisonTree::or(operands)
    }};
}
