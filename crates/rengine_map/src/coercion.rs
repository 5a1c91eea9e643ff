//! Value coercion
//!
//! Turns a single comma-separated token into a typed field value. Tokens are
//! never trimmed: `" 1.5"` is not a number.

/// Primitive kind a field is coerced to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Float,
    Bool,
    Str,
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Float => write!(f, "float"),
            Self::Bool => write!(f, "bool"),
            Self::Str => write!(f, "string"),
        }
    }
}

/// A coerced field value
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Float(f32),
    Bool(bool),
    Str(String),
}

impl FieldValue {
    /// Kind of this value
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Float(_) => FieldKind::Float,
            Self::Bool(_) => FieldKind::Bool,
            Self::Str(_) => FieldKind::Str,
        }
    }
}

/// A token that could not be coerced to its field kind
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("field '{field}' expected {expected}, found {token:?}")]
pub struct CoercionError {
    /// Name of the field in its record layout
    pub field: &'static str,
    /// The offending token, verbatim
    pub token: String,
    /// Kind the token had to coerce to
    pub expected: FieldKind,
}

/// Literal accepted as `true` by [`coerce_bool`]
pub const TRUE_LITERAL: &str = "true";

/// Coerce a token to a float
///
/// Accepts standard decimal and exponent syntax. Empty tokens and tokens with
/// leading or trailing garbage (whitespace included) fail. No clamping.
pub fn coerce_float(field: &'static str, token: &str) -> Result<f32, CoercionError> {
    token.parse::<f32>().map_err(|_| CoercionError {
        field,
        token: token.to_string(),
        expected: FieldKind::Float,
    })
}

/// Coerce a token to a bool
///
/// Exactly `"true"` is `true`; every other token is `false`.
pub fn coerce_bool(token: &str) -> bool {
    token == TRUE_LITERAL
}

/// Coerce a token to a string (verbatim, empty allowed)
pub fn coerce_str(token: &str) -> String {
    token.to_string()
}

/// Coerce a token to `kind`
pub fn coerce(field: &'static str, token: &str, kind: FieldKind) -> Result<FieldValue, CoercionError> {
    match kind {
        FieldKind::Float => coerce_float(field, token).map(FieldValue::Float),
        FieldKind::Bool => Ok(FieldValue::Bool(coerce_bool(token))),
        FieldKind::Str => Ok(FieldValue::Str(coerce_str(token))),
    }
}

/// Format a float so that [`coerce_float`] reads back the identical value
///
/// Rust's `Display` for `f32` prints the shortest representation that
/// round-trips, including `inf`, `-inf` and `NaN`.
pub fn format_float(value: f32) -> String {
    value.to_string()
}

/// Format a bool as the literal [`coerce_bool`] recognizes
pub fn format_bool(value: bool) -> &'static str {
    if value {
        TRUE_LITERAL
    } else {
        "false"
    }
}
