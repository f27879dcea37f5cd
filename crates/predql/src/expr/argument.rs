//! Comparison operands.

use crate::alias::Path;
use crate::value::Value;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Right-hand operand of a comparison.
///
/// A literal becomes a positional parameter when rendered; a reference is
/// inlined as alias-qualified text and never creates a parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    Literal(Value),
    Reference(Path),
}

/// Conversion into an [`Argument`].
///
/// Paths become references; everything convertible into a [`Value`] becomes
/// a literal.
pub trait IntoArgument {
    fn into_argument(self) -> Argument;
}

impl IntoArgument for Argument {
    fn into_argument(self) -> Argument {
        self
    }
}

impl IntoArgument for Path {
    fn into_argument(self) -> Argument {
        Argument::Reference(self)
    }
}

impl IntoArgument for &Path {
    fn into_argument(self) -> Argument {
        Argument::Reference(self.clone())
    }
}

impl IntoArgument for Value {
    fn into_argument(self) -> Argument {
        Argument::Literal(self)
    }
}

macro_rules! impl_into_argument {
    ($($t:ty),* $(,)?) => {
        $(
            impl IntoArgument for $t {
                fn into_argument(self) -> Argument {
                    Argument::Literal(Value::from(self))
                }
            }
        )*
    };
}

impl_into_argument!(
    bool,
    i8,
    i16,
    i32,
    i64,
    u8,
    u16,
    u32,
    f32,
    f64,
    &str,
    String,
    &String,
    Uuid,
    DateTime<Utc>,
    serde_json::Value,
);

impl<T: Into<Value>> IntoArgument for Option<T> {
    fn into_argument(self) -> Argument {
        Argument::Literal(Value::from(self))
    }
}
