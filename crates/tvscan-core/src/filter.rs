//! Leaf predicates and their operands.
//!
//! A [`FilterOperation`] is one `{left, operation, right}` triple of the scanner
//! wire format. Every [`OperationKind`] constrains the shape of `right`; the
//! mapping lives in [`OperationKind::operand_shape`] and is checked both by
//! [`FilterOperation::new`] and by the wire encoder.
//!
//! | Kind | Right operand |
//! |------|---------------|
//! | `greater`, `egreater`, `less`, `eless`, `equal`, `nequal` | scalar or field |
//! | `crosses`, `crosses_above`, `crosses_below` | scalar or field |
//! | `in_range`, `not_in_range` | list of scalars/fields |
//! | `has`, `has_none_of` | list of strings |
//! | `above%`, `below%` | `[scalar-or-field, pct]` |
//! | `in_range%`, `not_in_range%` | `[scalar-or-field, pct, pct-or-null]` |
//! | `match`, `nmatch`, `smatch` | string or field |
//! | `empty`, `nempty` | null |
//! | `in_day_range`, `in_week_range`, `in_month_range` | `[int, int]` |

use std::fmt::{Display, Formatter};

use serde::de::Error as _;
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::column::Column;
use crate::error::ConstructionError;

/// Wire token of a filter operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    #[serde(rename = "greater")]
    Greater,
    #[serde(rename = "egreater")]
    GreaterOrEqual,
    #[serde(rename = "less")]
    Less,
    #[serde(rename = "eless")]
    LessOrEqual,
    #[serde(rename = "equal")]
    Equal,
    #[serde(rename = "nequal")]
    NotEqual,
    #[serde(rename = "in_range")]
    InRange,
    #[serde(rename = "not_in_range")]
    NotInRange,
    #[serde(rename = "empty")]
    Empty,
    #[serde(rename = "nempty")]
    NotEmpty,
    #[serde(rename = "crosses")]
    Crosses,
    #[serde(rename = "crosses_above")]
    CrossesAbove,
    #[serde(rename = "crosses_below")]
    CrossesBelow,
    #[serde(rename = "match")]
    Match,
    #[serde(rename = "nmatch")]
    NotMatch,
    #[serde(rename = "smatch")]
    SimpleMatch,
    #[serde(rename = "has")]
    Has,
    #[serde(rename = "has_none_of")]
    HasNoneOf,
    #[serde(rename = "above%")]
    AbovePercent,
    #[serde(rename = "below%")]
    BelowPercent,
    #[serde(rename = "in_range%")]
    InRangePercent,
    #[serde(rename = "not_in_range%")]
    NotInRangePercent,
    #[serde(rename = "in_day_range")]
    InDayRange,
    #[serde(rename = "in_week_range")]
    InWeekRange,
    #[serde(rename = "in_month_range")]
    InMonthRange,
}

impl OperationKind {
    pub const ALL: [Self; 25] = [
        Self::Greater,
        Self::GreaterOrEqual,
        Self::Less,
        Self::LessOrEqual,
        Self::Equal,
        Self::NotEqual,
        Self::InRange,
        Self::NotInRange,
        Self::Empty,
        Self::NotEmpty,
        Self::Crosses,
        Self::CrossesAbove,
        Self::CrossesBelow,
        Self::Match,
        Self::NotMatch,
        Self::SimpleMatch,
        Self::Has,
        Self::HasNoneOf,
        Self::AbovePercent,
        Self::BelowPercent,
        Self::InRangePercent,
        Self::NotInRangePercent,
        Self::InDayRange,
        Self::InWeekRange,
        Self::InMonthRange,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Greater => "greater",
            Self::GreaterOrEqual => "egreater",
            Self::Less => "less",
            Self::LessOrEqual => "eless",
            Self::Equal => "equal",
            Self::NotEqual => "nequal",
            Self::InRange => "in_range",
            Self::NotInRange => "not_in_range",
            Self::Empty => "empty",
            Self::NotEmpty => "nempty",
            Self::Crosses => "crosses",
            Self::CrossesAbove => "crosses_above",
            Self::CrossesBelow => "crosses_below",
            Self::Match => "match",
            Self::NotMatch => "nmatch",
            Self::SimpleMatch => "smatch",
            Self::Has => "has",
            Self::HasNoneOf => "has_none_of",
            Self::AbovePercent => "above%",
            Self::BelowPercent => "below%",
            Self::InRangePercent => "in_range%",
            Self::NotInRangePercent => "not_in_range%",
            Self::InDayRange => "in_day_range",
            Self::InWeekRange => "in_week_range",
            Self::InMonthRange => "in_month_range",
        }
    }

    /// Parses a wire token such as `"above%"`.
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == token)
    }

    /// Right-operand shape accepted by this kind.
    pub const fn operand_shape(self) -> OperandShape {
        match self {
            Self::Greater
            | Self::GreaterOrEqual
            | Self::Less
            | Self::LessOrEqual
            | Self::Equal
            | Self::NotEqual
            | Self::Crosses
            | Self::CrossesAbove
            | Self::CrossesBelow => OperandShape::Scalar,
            Self::InRange | Self::NotInRange => OperandShape::ValueList,
            Self::Has | Self::HasNoneOf => OperandShape::StringList,
            Self::AbovePercent | Self::BelowPercent => OperandShape::Percent,
            Self::InRangePercent | Self::NotInRangePercent => OperandShape::PercentRange,
            Self::Match | Self::NotMatch | Self::SimpleMatch => OperandShape::Pattern,
            Self::Empty | Self::NotEmpty => OperandShape::Absent,
            Self::InDayRange | Self::InWeekRange | Self::InMonthRange => OperandShape::Offsets,
        }
    }
}

impl Display for OperationKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shape the right operand must take for a given [`OperationKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandShape {
    Scalar,
    ValueList,
    StringList,
    Percent,
    PercentRange,
    Pattern,
    Absent,
    Offsets,
}

impl OperandShape {
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Scalar => "a single scalar or field reference",
            Self::ValueList => "a list of scalars or field references",
            Self::StringList => "a list of strings",
            Self::Percent => "[scalar-or-field, percentage]",
            Self::PercentRange => "[scalar-or-field, percentage, percentage-or-null]",
            Self::Pattern => "a pattern string",
            Self::Absent => "no right operand",
            Self::Offsets => "[start-offset, end-offset] integers",
        }
    }

    /// Returns true when `operand` fits this shape.
    pub fn accepts(self, operand: &Operand) -> bool {
        match self {
            Self::Scalar => operand.is_single(),
            Self::ValueList => {
                matches!(operand, Operand::List(items) if items.iter().all(Operand::is_single))
            }
            Self::StringList => {
                matches!(operand, Operand::List(items) if items.iter().all(|item| matches!(item, Operand::Text(_))))
            }
            Self::Percent => match operand {
                Operand::List(items) => {
                    matches!(items.as_slice(), [base, pct] if base.is_single() && pct.is_number())
                }
                _ => false,
            },
            Self::PercentRange => match operand {
                Operand::List(items) => match items.as_slice() {
                    [base, low] => base.is_single() && low.is_number(),
                    [base, low, high] => {
                        base.is_single()
                            && low.is_number()
                            && (high.is_number() || matches!(high, Operand::Null))
                    }
                    _ => false,
                },
                _ => false,
            },
            Self::Pattern => matches!(operand, Operand::Text(_) | Operand::Field(_)),
            Self::Absent => matches!(operand, Operand::Null),
            Self::Offsets => match operand {
                Operand::List(items) => {
                    matches!(items.as_slice(), [Operand::Int(_), Operand::Int(_)])
                }
                _ => false,
            },
        }
    }
}

/// Right-hand side of a filter operation.
///
/// `Field` holds a de-referenced column name and serializes as a plain string;
/// strings read back from the wire therefore decode as `Text`.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Field(String),
    List(Vec<Operand>),
}

impl Operand {
    /// Parses a numeric literal, keeping integers integral on the wire.
    pub fn number(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if let Ok(value) = trimmed.parse::<i64>() {
            return Some(Self::Int(value));
        }
        trimmed
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .map(Self::Float)
    }

    /// Builds a list operand, de-referencing each element.
    pub fn list<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Operand>,
    {
        Self::List(values.into_iter().map(Into::into).collect())
    }

    /// Scalar or field reference: anything but a list or null.
    pub const fn is_single(&self) -> bool {
        !matches!(self, Self::List(_) | Self::Null)
    }

    pub const fn is_number(&self) -> bool {
        matches!(self, Self::Int(_) | Self::Float(_))
    }

    pub fn is_finite(&self) -> bool {
        match self {
            Self::Float(value) => value.is_finite(),
            Self::List(items) => items.iter().all(Self::is_finite),
            _ => true,
        }
    }

    fn from_value(value: Value) -> Result<Self, String> {
        Ok(match value {
            Value::Null => Self::Null,
            Value::Bool(flag) => Self::Bool(flag),
            Value::Number(number) => match number.as_i64() {
                Some(int) => Self::Int(int),
                None => Self::Float(
                    number
                        .as_f64()
                        .ok_or_else(|| format!("unsupported number {number}"))?,
                ),
            },
            Value::String(text) => Self::Text(text),
            Value::Array(items) => Self::List(
                items
                    .into_iter()
                    .map(Self::from_value)
                    .collect::<Result<_, _>>()?,
            ),
            Value::Object(_) => return Err(String::from("objects are not valid operands")),
        })
    }
}

impl Serialize for Operand {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(flag) => serializer.serialize_bool(*flag),
            Self::Int(int) => serializer.serialize_i64(*int),
            Self::Float(float) => serializer.serialize_f64(*float),
            Self::Text(text) | Self::Field(text) => serializer.serialize_str(text),
            Self::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Operand {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<Value>::deserialize(deserializer)?.unwrap_or(Value::Null);
        Self::from_value(value).map_err(D::Error::custom)
    }
}

impl From<Column> for Operand {
    fn from(value: Column) -> Self {
        Self::Field(value.into_name())
    }
}

impl From<&Column> for Operand {
    fn from(value: &Column) -> Self {
        Self::Field(value.name().to_owned())
    }
}

impl From<bool> for Operand {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for Operand {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<f32> for Operand {
    fn from(value: f32) -> Self {
        Self::Float(f64::from(value))
    }
}

impl From<&str> for Operand {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Operand {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<T: Into<Operand>> From<Option<T>> for Operand {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

macro_rules! int_operand {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Operand {
                fn from(value: $ty) -> Self {
                    Self::Int(i64::from(value))
                }
            }
        )*
    };
}

int_operand!(i8, i16, i32, i64, u8, u16, u32);

/// One `{left, operation, right}` predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterOperation {
    left: String,
    operation: OperationKind,
    #[serde(default)]
    right: Operand,
}

impl Default for Operand {
    fn default() -> Self {
        Self::Null
    }
}

impl FilterOperation {
    /// Checked constructor for predicates assembled from data.
    pub fn new(
        left: impl Into<String>,
        operation: OperationKind,
        right: impl Into<Operand>,
    ) -> Result<Self, ConstructionError> {
        let filter = Self::unchecked(left.into(), operation, right.into());
        filter.validate()?;
        Ok(filter)
    }

    pub(crate) fn unchecked(left: String, operation: OperationKind, right: Operand) -> Self {
        Self {
            left,
            operation,
            right,
        }
    }

    pub fn left(&self) -> &str {
        &self.left
    }

    pub const fn operation(&self) -> OperationKind {
        self.operation
    }

    /// Right operand, `None` for `empty`/`nempty`.
    pub fn right(&self) -> Option<&Operand> {
        match &self.right {
            Operand::Null => None,
            other => Some(other),
        }
    }

    /// Checks the right operand against the shape table for this kind.
    pub fn validate(&self) -> Result<(), ConstructionError> {
        if self.left.trim().is_empty() {
            return Err(ConstructionError::EmptyColumnName);
        }

        let shape = self.operation.operand_shape();
        if !shape.accepts(&self.right) {
            return Err(ConstructionError::OperandShape {
                field: self.left.clone(),
                operation: self.operation.as_str(),
                expected: shape.describe(),
            });
        }

        if !self.right.is_finite() {
            return Err(ConstructionError::NonFiniteOperand {
                field: self.left.clone(),
                operation: self.operation.as_str(),
            });
        }

        Ok(())
    }
}
