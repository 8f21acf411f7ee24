use thiserror::Error;

/// Decode failures for records carried by a simulation response.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error("term record is empty")]
    EmptyTerm,
    #[error("term record must end with a list of sub-terms, found {found}")]
    MissingSubTerms { found: String },
    #[error("term record has {fields} leading fields, expected at least 2 (base and symbol)")]
    MissingBaseOrSymbol { fields: usize },
    #[error("sub-term {index} is not a [base, symbol, exponent] triple")]
    InvalidTriple { index: usize },
    #[error("sub-term {index} exponent is not numeric: {found}")]
    InvalidExponent { index: usize, found: String },
}
