//! Boolean conjunctions joining two or more expressions.

use std::fmt;

/// A boolean combinator.
///
/// NAND and NOR have no atomic token in SQL; the formatter resolves them to
/// `NOT (...)` around their positive counterpart unless resolution is turned off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Conjunction {
    And,
    Or,
    Nand,
    Nor,
}

impl Conjunction {
    /// Token emitted between terms.
    pub const fn token(self) -> &'static str {
        match self {
            Conjunction::And => "AND",
            Conjunction::Or => "OR",
            Conjunction::Nand => "NAND",
            Conjunction::Nor => "NOR",
        }
    }

    /// Binding strength used for bracket decisions; higher binds tighter.
    ///
    /// NAND sits at OR's position (it resolves to a negated AND) and NOR at
    /// AND's position (it resolves to a negated OR).
    pub const fn precedence(self) -> u8 {
        match self {
            Conjunction::And | Conjunction::Nor => 2,
            Conjunction::Or | Conjunction::Nand => 1,
        }
    }

    /// True for NAND and NOR.
    pub const fn is_negation(self) -> bool {
        matches!(self, Conjunction::Nand | Conjunction::Nor)
    }

    /// Only AND and OR may be flattened into a parent of the same kind.
    pub const fn is_associative(self) -> bool {
        !self.is_negation()
    }

    /// The conjunction a negated form resolves to (NAND -> AND, NOR -> OR).
    pub const fn positive(self) -> Self {
        match self {
            Conjunction::Nand => Conjunction::And,
            Conjunction::Nor => Conjunction::Or,
            other => other,
        }
    }
}

impl fmt::Display for Conjunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn and_binds_tighter_than_or() {
        assert!(Conjunction::And.precedence() > Conjunction::Or.precedence());
    }

    #[test]
    fn negations_take_the_structural_position_of_their_resolution() {
        assert_eq!(Conjunction::Nand.precedence(), Conjunction::Or.precedence());
        assert_eq!(Conjunction::Nor.precedence(), Conjunction::And.precedence());
    }

    #[test]
    fn positive_counterparts() {
        assert_eq!(Conjunction::Nand.positive(), Conjunction::And);
        assert_eq!(Conjunction::Nor.positive(), Conjunction::Or);
        assert_eq!(Conjunction::And.positive(), Conjunction::And);
        assert!(!Conjunction::Nor.is_associative());
    }
}
