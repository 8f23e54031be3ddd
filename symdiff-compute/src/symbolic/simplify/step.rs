#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Possible simplification steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Step {
    /// `2 + 3 = 5`
    /// `sin(0) = 0`
    FoldConstants,

    /// `sin(pi) = 0`
    /// `cos(pi) = -1`
    /// `pi / pi = 1`
    CollapseKnownValue,

    /// `0+a = a`
    /// `a+0 = a`
    AddZero,

    /// `a-0 = a`
    SubtractZero,

    /// `1*a = a`
    /// `a*1 = a`
    MultiplyOne,

    /// `0*a = 0`
    /// `a*0 = 0`
    MultiplyZero,

    /// `a/1 = a`
    DivideOne,

    /// `0/a = 0`
    DivideZero,

    /// `a^1 = a`
    PowerOne,

    /// `a^0 = 1`
    PowerZero,

    /// `1^a = 1`
    PowerOneLeft,

    /// `log(1) = 0`
    LogOne,

    /// `log(e) = 1`
    LogE,

    /// `exp(0) = 1`
    ExpZero,

    /// `exp(1) = e`
    ExpOne,
}
