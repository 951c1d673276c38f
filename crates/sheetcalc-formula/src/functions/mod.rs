//! Range functions
//!
//! The closed set of aggregates a formula can apply to a `CELL:CELL` range.

use std::fmt;

/// A reduction over every numeric cell of a range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RangeFunction {
    /// Sum of the range
    Sum,
    /// Product of the range
    Mult,
}

impl RangeFunction {
    /// Every supported function
    pub const ALL: [RangeFunction; 2] = [RangeFunction::Sum, RangeFunction::Mult];

    /// Look up a function by keyword (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(name))
    }

    /// Canonical keyword
    pub fn name(&self) -> &'static str {
        match self {
            RangeFunction::Sum => "SUM",
            RangeFunction::Mult => "MULT",
        }
    }

    /// Result over an empty range
    pub fn identity(&self) -> f64 {
        match self {
            RangeFunction::Sum => 0.0,
            RangeFunction::Mult => 1.0,
        }
    }

    /// Fold one more value into the accumulator
    pub fn combine(&self, acc: f64, value: f64) -> f64 {
        match self {
            RangeFunction::Sum => acc + value,
            RangeFunction::Mult => acc * value,
        }
    }

    /// Reduce a sequence of values
    pub fn apply<I: IntoIterator<Item = f64>>(&self, values: I) -> f64 {
        values
            .into_iter()
            .fold(self.identity(), |acc, v| self.combine(acc, v))
    }
}

impl fmt::Display for RangeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        assert_eq!(RangeFunction::from_name("sum"), Some(RangeFunction::Sum));
        assert_eq!(RangeFunction::from_name("MULT"), Some(RangeFunction::Mult));
        assert_eq!(RangeFunction::from_name("avg"), None);
    }

    #[test]
    fn test_apply() {
        let values = [10.0, 20.0, 30.0, 15.0, 25.0, 35.0];
        assert_eq!(RangeFunction::Sum.apply(values), 135.0);
        assert_eq!(RangeFunction::Mult.apply([2.0, 3.0, 4.0]), 24.0);
        assert_eq!(RangeFunction::Sum.apply([]), 0.0);
        assert_eq!(RangeFunction::Mult.apply([]), 1.0);
    }
}
