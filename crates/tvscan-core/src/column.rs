use std::borrow::Cow;
use std::fmt::{Display, Formatter};

use crate::error::ConstructionError;
use crate::filter::{FilterOperation, Operand, OperationKind};

/// Handle for one scanner field, used to build filters and select columns.
///
/// A column never holds a value, so it has no meaningful equality: `Column`
/// implements neither `PartialEq` nor `Hash`. Comparisons are built with the
/// named constructors instead:
///
/// ```
/// use tvscan_core::columns::CLOSE;
///
/// let filter = CLOSE.greater_than(100);
/// assert_eq!(filter.left(), "close");
/// ```
///
/// Using `==` on two columns is rejected when the code is compiled:
///
/// ```compile_fail
/// use tvscan_core::columns::{CLOSE, OPEN};
///
/// let _ = CLOSE == OPEN;
/// ```
#[derive(Debug, Clone)]
pub struct Column(Cow<'static, str>);

impl Column {
    /// Column for a field name known at compile time.
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// Column for an arbitrary field name outside the bundled catalog.
    pub fn new(name: impl Into<String>) -> Result<Self, ConstructionError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ConstructionError::EmptyColumnName);
        }
        Ok(Self(Cow::Owned(name)))
    }

    /// Wire-level field name.
    pub fn name(&self) -> &str {
        &self.0
    }

    pub fn into_name(self) -> String {
        self.0.into_owned()
    }

    fn op(&self, operation: OperationKind, right: Operand) -> FilterOperation {
        FilterOperation::unchecked(self.name().to_owned(), operation, right)
    }

    pub fn greater_than(&self, other: impl Into<Operand>) -> FilterOperation {
        self.op(OperationKind::Greater, other.into())
    }

    pub fn greater_or_equal(&self, other: impl Into<Operand>) -> FilterOperation {
        self.op(OperationKind::GreaterOrEqual, other.into())
    }

    pub fn less_than(&self, other: impl Into<Operand>) -> FilterOperation {
        self.op(OperationKind::Less, other.into())
    }

    pub fn less_or_equal(&self, other: impl Into<Operand>) -> FilterOperation {
        self.op(OperationKind::LessOrEqual, other.into())
    }

    pub fn equal_to(&self, other: impl Into<Operand>) -> FilterOperation {
        self.op(OperationKind::Equal, other.into())
    }

    pub fn not_equal_to(&self, other: impl Into<Operand>) -> FilterOperation {
        self.op(OperationKind::NotEqual, other.into())
    }

    pub fn crosses(&self, other: impl Into<Operand>) -> FilterOperation {
        self.op(OperationKind::Crosses, other.into())
    }

    pub fn crosses_above(&self, other: impl Into<Operand>) -> FilterOperation {
        self.op(OperationKind::CrossesAbove, other.into())
    }

    pub fn crosses_below(&self, other: impl Into<Operand>) -> FilterOperation {
        self.op(OperationKind::CrossesBelow, other.into())
    }

    /// Value lies within `[low, high]`; either bound may be another column.
    pub fn between(&self, low: impl Into<Operand>, high: impl Into<Operand>) -> FilterOperation {
        self.op(
            OperationKind::InRange,
            Operand::List(vec![low.into(), high.into()]),
        )
    }

    pub fn not_between(
        &self,
        low: impl Into<Operand>,
        high: impl Into<Operand>,
    ) -> FilterOperation {
        self.op(
            OperationKind::NotInRange,
            Operand::List(vec![low.into(), high.into()]),
        )
    }

    /// Value is one of `values`. Sent as `in_range` with a list operand.
    pub fn is_in<I, V>(&self, values: I) -> FilterOperation
    where
        I: IntoIterator<Item = V>,
        V: Into<Operand>,
    {
        self.op(OperationKind::InRange, Operand::list(values))
    }

    pub fn not_in<I, V>(&self, values: I) -> FilterOperation
    where
        I: IntoIterator<Item = V>,
        V: Into<Operand>,
    {
        self.op(OperationKind::NotInRange, Operand::list(values))
    }

    /// Set-valued field contains any of `values`.
    pub fn has<I, S>(&self, values: I) -> FilterOperation
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.op(OperationKind::Has, text_list(values))
    }

    pub fn has_none_of<I, S>(&self, values: I) -> FilterOperation
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.op(OperationKind::HasNoneOf, text_list(values))
    }

    pub fn in_day_range(&self, start: i32, end: i32) -> FilterOperation {
        self.op(OperationKind::InDayRange, Operand::list([start, end]))
    }

    pub fn in_week_range(&self, start: i32, end: i32) -> FilterOperation {
        self.op(OperationKind::InWeekRange, Operand::list([start, end]))
    }

    pub fn in_month_range(&self, start: i32, end: i32) -> FilterOperation {
        self.op(OperationKind::InMonthRange, Operand::list([start, end]))
    }

    /// Value is above `base` by `percentage` (e.g. `1.03` for three percent).
    pub fn above_pct(&self, base: impl Into<Operand>, percentage: f64) -> FilterOperation {
        self.op(
            OperationKind::AbovePercent,
            Operand::List(vec![base.into(), Operand::Float(percentage)]),
        )
    }

    pub fn below_pct(&self, base: impl Into<Operand>, percentage: f64) -> FilterOperation {
        self.op(
            OperationKind::BelowPercent,
            Operand::List(vec![base.into(), Operand::Float(percentage)]),
        )
    }

    /// Value lies between two percentages of `base`. An omitted upper bound is
    /// sent as `null`.
    pub fn between_pct(
        &self,
        base: impl Into<Operand>,
        low: f64,
        high: Option<f64>,
    ) -> FilterOperation {
        self.op(
            OperationKind::InRangePercent,
            Operand::List(vec![base.into(), Operand::Float(low), high.into()]),
        )
    }

    pub fn not_between_pct(
        &self,
        base: impl Into<Operand>,
        low: f64,
        high: Option<f64>,
    ) -> FilterOperation {
        self.op(
            OperationKind::NotInRangePercent,
            Operand::List(vec![base.into(), Operand::Float(low), high.into()]),
        )
    }

    pub fn like(&self, pattern: impl Into<Operand>) -> FilterOperation {
        self.op(OperationKind::Match, pattern.into())
    }

    pub fn not_like(&self, pattern: impl Into<Operand>) -> FilterOperation {
        self.op(OperationKind::NotMatch, pattern.into())
    }

    pub fn simple_match(&self, pattern: impl Into<Operand>) -> FilterOperation {
        self.op(OperationKind::SimpleMatch, pattern.into())
    }

    pub fn empty(&self) -> FilterOperation {
        self.op(OperationKind::Empty, Operand::Null)
    }

    pub fn not_empty(&self) -> FilterOperation {
        self.op(OperationKind::NotEmpty, Operand::Null)
    }
}

fn text_list<I, S>(values: I) -> Operand
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Operand::List(
        values
            .into_iter()
            .map(|value| Operand::Text(value.into()))
            .collect(),
    )
}

impl AsRef<str> for Column {
    fn as_ref(&self) -> &str {
        self.name()
    }
}

impl Display for Column {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
