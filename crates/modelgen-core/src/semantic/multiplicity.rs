//! Multiplicity bounds of attributes and association ends.

use std::{fmt, str::FromStr};

/// A single multiplicity bound: a count or the unbounded wildcard `*`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bound {
    Count(u32),
    Many,
}

impl Bound {
    pub const ZERO: Self = Self::Count(0);
    pub const ONE: Self = Self::Count(1);

    /// Returns `true` for the `*` wildcard.
    pub fn is_many(&self) -> bool {
        matches!(self, Self::Many)
    }
}

impl FromStr for Bound {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == "*" {
            return Ok(Self::Many);
        }
        s.parse::<u32>()
            .map(Self::Count)
            .map_err(|_| format!("`{s}` is not a multiplicity bound"))
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count(n) => write!(f, "{n}"),
            Self::Many => write!(f, "*"),
        }
    }
}

/// The multiplicity of a feature as declared in the schema.
///
/// Either bound may be absent. How absent bounds are filled in depends on
/// the kind of feature, see [`Multiplicity::end_bounds`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Multiplicity {
    lower: Option<Bound>,
    upper: Option<Bound>,
}

impl Multiplicity {
    pub fn new(lower: Option<Bound>, upper: Option<Bound>) -> Self {
        Self { lower, upper }
    }

    /// Declared lower bound.
    pub fn lower(&self) -> Option<Bound> {
        self.lower
    }

    /// Declared upper bound.
    pub fn upper(&self) -> Option<Bound> {
        self.upper
    }

    /// Resolved bounds of an association end.
    ///
    /// The upper bound defaults to `*` and the lower bound defaults to the
    /// upper bound. A lower bound that ends up as `*` becomes 0.
    pub fn end_bounds(&self) -> (Bound, Bound) {
        let upper = self.upper.unwrap_or(Bound::Many);
        let lower = match self.lower.unwrap_or(upper) {
            Bound::Many => Bound::ZERO,
            lower => lower,
        };
        (lower, upper)
    }
}
