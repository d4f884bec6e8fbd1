use smol_str::SmolStr;
use vela_lexer::BitVector;

/// An elaboration-time constant, as produced by default-value queries.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstantValue {
    Integer(BitVector),
    Real(f64),
    Str(SmolStr),
    /// Placeholder for chandle/event/null defaults.
    Null,
    /// Aggregate value, one entry per element or field.
    Elements(Vec<ConstantValue>),
}

impl ConstantValue {
    pub fn integer(&self) -> Option<&BitVector> {
        match self {
            Self::Integer(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}
