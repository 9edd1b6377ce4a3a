//! Tri-state parse results.

/// Outcome of a lenient parse.
///
/// `Absent` means the source held no value; `Malformed` keeps the raw text of a
/// value that matched no accepted form. Rules treat both as "no value".
#[derive(Debug, Clone, PartialEq)]
pub enum Parsed<T> {
    Value(T),
    Absent,
    Malformed(String),
}

impl<T> Parsed<T> {
    pub fn value(self) -> Option<T> {
        match self {
            Self::Value(value) => Some(value),
            Self::Absent | Self::Malformed(_) => None,
        }
    }

    pub fn is_value(&self) -> bool {
        matches!(self, Self::Value(_))
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed(_))
    }
}
