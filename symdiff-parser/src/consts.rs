//! Tolerance-based float comparison and the table of named constants.

use std::{cmp::Ordering, f64::consts};

/// The tolerance used by every comparison in the engine. Two values closer than this are equal.
pub const EPSILON: f64 = 1e-9;

/// The named constants recognized by the parser, in lookup order.
pub const CONSTANTS: [(&str, f64); 2] = [("e", consts::E), ("pi", consts::PI)];

/// Compares two values, treating them as equal if they are within [`EPSILON`] of each other.
pub fn compare(a: f64, b: f64) -> Ordering {
    compare_with(a, b, EPSILON)
}

/// Compares two values, treating them as equal if they are within `epsilon` of each other.
///
/// NaN never compares equal to anything, itself included; it is ordered as [`Ordering::Greater`].
pub fn compare_with(a: f64, b: f64, epsilon: f64) -> Ordering {
    if (a - b).abs() < epsilon {
        Ordering::Equal
    } else if a < b {
        Ordering::Less
    } else {
        Ordering::Greater
    }
}

/// Returns true if the two values are within [`EPSILON`] of each other.
pub fn approx_eq(a: f64, b: f64) -> bool {
    compare(a, b) == Ordering::Equal
}

/// Returns true if the value matches one of the named constants.
pub fn is_constant(value: f64) -> bool {
    constant_name(value).is_some()
}

/// Returns the name of the constant matching the given value.
pub fn constant_name(value: f64) -> Option<&'static str> {
    CONSTANTS
        .iter()
        .find(|(_, v)| approx_eq(*v, value))
        .map(|(name, _)| *name)
}

/// Returns the value of the constant with the given name.
pub fn constant_value(name: &str) -> Option<f64> {
    CONSTANTS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, value)| *value)
}
