//! Variable and literal representations

use crate::memory::Offset;
use std::{fmt, fmt::Display, ops};

/// A variable, numbered from zero (DIMACS variable `v` is `Variable(v - 1)`).
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord, Default)]
pub struct Variable(pub u32);

/// A literal is a variable with a sign.
///
/// The encoding is `variable << 1 | negative`, so negation flips the lowest
/// bit and sorting literals groups both polarities of a variable together.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct Literal {
    encoding: u32,
}

impl Variable {
    pub fn new(value: u32) -> Variable {
        Variable(value)
    }
    /// The positive or negative literal of this variable.
    pub fn literal(self, negative: bool) -> Literal {
        requires!(self.0 < u32::max_value() >> 1);
        Literal {
            encoding: self.0 << 1 | u32::from(negative),
        }
    }
}

impl Offset for Variable {
    fn as_offset(&self) -> usize {
        self.0 as usize
    }
}

/// The size of an array that can be indexed by all literals up to `maxvar`.
pub fn literal_array_len(maxvar: Variable) -> usize {
    2 * (maxvar.as_offset() + 1)
}

impl Literal {
    /// A value that never denotes a literal.
    pub const UNDEFINED: Literal = Literal {
        encoding: u32::max_value(),
    };

    /// Convert from the signed DIMACS representation, which must not be zero.
    pub fn from_dimacs(value: i32) -> Literal {
        requires!(value != 0 && value != i32::min_value());
        Variable::new(value.abs() as u32 - 1).literal(value < 0)
    }
    pub fn from_raw(encoding: u32) -> Literal {
        Literal { encoding }
    }
    pub fn encoding(self) -> u32 {
        self.encoding
    }
    /// Convert to the signed DIMACS representation.
    pub fn to_dimacs(self) -> i32 {
        requires!(self != Literal::UNDEFINED);
        let magnitude = self.variable().0 as i32 + 1;
        if self.is_negative() {
            -magnitude
        } else {
            magnitude
        }
    }
    pub fn variable(self) -> Variable {
        Variable(self.encoding >> 1)
    }
    pub fn is_negative(self) -> bool {
        self.encoding & 1 != 0
    }
}

impl Offset for Literal {
    fn as_offset(&self) -> usize {
        self.encoding as usize
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if *self == Literal::UNDEFINED {
            write!(f, "undefined")
        } else {
            write!(f, "{}", self.to_dimacs())
        }
    }
}

impl ops::Neg for Literal {
    type Output = Literal;
    fn neg(self) -> Literal {
        Literal {
            encoding: self.encoding ^ 1,
        }
    }
}
