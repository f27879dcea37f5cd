//! In-memory evaluation with SQL three-valued logic.
//!
//! `Some(true)` / `Some(false)` are TRUE / FALSE, `None` is UNKNOWN (any
//! comparison involving NULL). This mirrors what the backend would compute
//! for the rendered predicate.

use super::argument::Argument;
use super::conjunction::Conjunction;
use super::expression::{Comparison, Expression};
use super::operator::Operator;
use crate::value::Value;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

/// Source of property values for [`Expression::evaluate`].
pub trait Record {
    /// Value of `property`; `None` is treated as NULL.
    fn get(&self, property: &str) -> Option<&Value>;
}

impl Record for HashMap<String, Value> {
    fn get(&self, property: &str) -> Option<&Value> {
        HashMap::get(self, property)
    }
}

impl Record for BTreeMap<String, Value> {
    fn get(&self, property: &str) -> Option<&Value> {
        BTreeMap::get(self, property)
    }
}

static NULL: Value = Value::Null;

impl Expression {
    /// Evaluate against `record` without touching the backend.
    pub fn evaluate(&self, record: &impl Record) -> Option<bool> {
        match self {
            Expression::Comparison(c) => evaluate_comparison(c, record),
            Expression::Constant(v) => Some(*v),
            Expression::Negated(inner) => inner.evaluate(record).map(|v| !v),
            Expression::Combined(c) => {
                let results = c.terms().iter().map(|t| t.evaluate(record));
                match c.conjunction() {
                    Conjunction::And => and_all(results),
                    Conjunction::Or => or_all(results),
                    Conjunction::Nand => and_all(results).map(|v| !v),
                    Conjunction::Nor => or_all(results).map(|v| !v),
                }
            }
        }
    }
}

fn and_all(results: impl Iterator<Item = Option<bool>>) -> Option<bool> {
    let mut unknown = false;
    for r in results {
        match r {
            Some(false) => return Some(false),
            None => unknown = true,
            Some(true) => {}
        }
    }
    if unknown { None } else { Some(true) }
}

fn or_all(results: impl Iterator<Item = Option<bool>>) -> Option<bool> {
    let mut unknown = false;
    for r in results {
        match r {
            Some(true) => return Some(true),
            None => unknown = true,
            Some(false) => {}
        }
    }
    if unknown { None } else { Some(false) }
}

fn resolve<'a>(argument: &'a Argument, record: &'a impl Record) -> &'a Value {
    match argument {
        Argument::Literal(v) => v,
        Argument::Reference(path) => record.get(path.property()).unwrap_or(&NULL),
    }
}

fn evaluate_comparison(c: &Comparison, record: &impl Record) -> Option<bool> {
    let left = record.get(c.path().property()).unwrap_or(&NULL);
    let args: Vec<&Value> = c.arguments().iter().map(|a| resolve(a, record)).collect();

    match c.operator() {
        Operator::IsNull => Some(left.is_null()),
        Operator::IsNotNull => Some(!left.is_null()),
        Operator::Eq => ordering(left, args.first()?).map(|o| o == Ordering::Equal),
        Operator::Ne => ordering(left, args.first()?).map(|o| o != Ordering::Equal),
        Operator::Lt => ordering(left, args.first()?).map(|o| o == Ordering::Less),
        Operator::Leq => ordering(left, args.first()?).map(|o| o != Ordering::Greater),
        Operator::Gt => ordering(left, args.first()?).map(|o| o == Ordering::Greater),
        Operator::Geq => ordering(left, args.first()?).map(|o| o != Ordering::Less),
        Operator::Like => {
            let pattern = args.first()?;
            match (left.as_str(), pattern.as_str()) {
                (Some(text), Some(pattern)) => Some(like_matches(text, pattern)),
                _ => None,
            }
        }
        Operator::Between => {
            let low = ordering(left, args.first()?).map(|o| o != Ordering::Less);
            let high = ordering(left, args.get(1)?).map(|o| o != Ordering::Greater);
            and_all([low, high].into_iter())
        }
        Operator::In => or_all(
            args.iter()
                .map(|v| ordering(left, v).map(|o| o == Ordering::Equal)),
        ),
    }
}

fn ordering(left: &Value, right: &Value) -> Option<Ordering> {
    left.compare(right)
}

/// SQL `LIKE`: `%` matches any run, `_` one character, `\` escapes.
pub(crate) fn like_matches(text: &str, pattern: &str) -> bool {
    #[derive(Clone, Copy, PartialEq)]
    enum Token {
        Any,
        One,
        Char(char),
    }

    let mut tokens = Vec::with_capacity(pattern.len());
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        tokens.push(match c {
            '%' => Token::Any,
            '_' => Token::One,
            '\\' => Token::Char(chars.next().unwrap_or('\\')),
            other => Token::Char(other),
        });
    }
    let text: Vec<char> = text.chars().collect();

    // Greedy match with single-point backtracking to the last `%`.
    let (mut t, mut p) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;
    while t < text.len() {
        match tokens.get(p) {
            Some(Token::Any) => {
                backtrack = Some((p, t));
                p += 1;
            }
            Some(Token::One) => {
                t += 1;
                p += 1;
            }
            Some(Token::Char(c)) if *c == text[t] => {
                t += 1;
                p += 1;
            }
            _ => match backtrack {
                Some((bp, bt)) => {
                    p = bp + 1;
                    t = bt + 1;
                    backtrack = Some((bp, bt + 1));
                }
                None => return false,
            },
        }
    }
    tokens[p..].iter().all(|tok| *tok == Token::Any)
}

#[cfg(test)]
mod tests {
    use super::like_matches;

    #[test]
    fn like_wildcards() {
        assert!(like_matches("Peter Pan", "%Pan"));
        assert!(like_matches("Peter Pane", "%Pan_"));
        assert!(!like_matches("Peter Pan", "%Pan_"));
        assert!(like_matches("abc", "a%c"));
        assert!(like_matches("ac", "a%c"));
        assert!(!like_matches("ab", "a%c"));
        assert!(like_matches("", "%"));
        assert!(like_matches("aXbXc", "%b%c"));
    }

    #[test]
    fn like_escapes() {
        assert!(like_matches("100%", "100\\%"));
        assert!(!like_matches("1000", "100\\%"));
        assert!(like_matches("a_b", "a\\_b"));
        assert!(!like_matches("axb", "a\\_b"));
    }
}
