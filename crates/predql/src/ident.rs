//! Identifier validation for alias names, backing types and fields.
//!
//! Every name that is spliced into statement text (never bound as a parameter)
//! goes through these checks when an alias is constructed:
//!
//! - A part must match `[A-Za-z_][A-Za-z0-9_$]*`
//! - Backing names may be dotted (`schema.table`), each part validated alone

use crate::error::{QueryError, QueryResult};

/// Validate a single identifier part such as an alias name or field.
pub(crate) fn validate_part(kind: &str, s: &str) -> QueryResult<()> {
    let mut chars = s.chars();
    match chars.next() {
        None => {
            return Err(QueryError::InvalidIdentifier(format!(
                "{kind} cannot be empty"
            )));
        }
        // First char: letter or underscore.
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
        Some(c) => {
            return Err(QueryError::InvalidIdentifier(format!(
                "{kind} '{s}' starts with invalid character '{c}'"
            )));
        }
    }
    // Subsequent chars: letter, digit, underscore, or $.
    if let Some(c) = chars.find(|c| !(*c == '_' || *c == '$' || c.is_ascii_alphanumeric())) {
        return Err(QueryError::InvalidIdentifier(format!(
            "{kind} '{s}' contains invalid character '{c}'"
        )));
    }
    Ok(())
}

/// Validate a possibly dotted name such as `public.contacts`.
pub(crate) fn validate_dotted(kind: &str, s: &str) -> QueryResult<()> {
    if s.is_empty() {
        return Err(QueryError::InvalidIdentifier(format!(
            "{kind} cannot be empty"
        )));
    }
    for part in s.split('.') {
        if part.is_empty() {
            return Err(QueryError::InvalidIdentifier(format!(
                "{kind} '{s}' has an empty segment"
            )));
        }
        validate_part(kind, part)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn part_simple() {
        assert!(validate_part("alias", "c").is_ok());
        assert!(validate_part("alias", "_tmp$1").is_ok());
    }

    #[test]
    fn part_rejects_empty() {
        assert!(validate_part("alias", "").is_err());
    }

    #[test]
    fn part_rejects_start_digit() {
        assert!(validate_part("alias", "1c").is_err());
    }

    #[test]
    fn part_rejects_space_and_dot() {
        assert!(validate_part("alias", "my alias").is_err());
        assert!(validate_part("alias", "a.b").is_err());
    }

    #[test]
    fn dotted_allows_schema() {
        assert!(validate_dotted("backing", "public.contacts").is_ok());
        assert!(validate_dotted("backing", "ContactEntity").is_ok());
    }

    #[test]
    fn dotted_rejects_empty_segment() {
        assert!(validate_dotted("backing", "schema..table").is_err());
        assert!(validate_dotted("backing", "schema.").is_err());
        assert!(validate_dotted("backing", "").is_err());
    }
}
