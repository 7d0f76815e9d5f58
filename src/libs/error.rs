use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PpiError {
    /// Input text or a table row that cannot be interpreted at all
    Format(String),
    /// The alignment primitive produced no candidate for a protein pair
    NoAlignment {
        /// Protein of the source organism
        a: String,
        /// Protein of the target organism
        b: String,
    },
    /// Input data that leaves a required computation undefined,
    /// e.g. a mean over an empty table or a zero-length sequence
    Config(String),
}

impl fmt::Display for PpiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PpiError::Format(msg) => write!(f, "Format error: {}", msg),
            PpiError::NoAlignment { a, b } => {
                write!(f, "No global alignment between {} and {}", a, b)
            }
            PpiError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for PpiError {}
