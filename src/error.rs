use std::path::PathBuf;

use crate::{compiler::CompilationError, parser::ParseError};

/// List of all errors that can surface from compiling a unit
/// and materializing its tree.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("source failed to parse ({} error(s))", .0.len())]
    Parse(Vec<ParseError>),

    #[error(transparent)]
    Compilation(#[from] CompilationError),

    #[error("unknown compile phase `{0}`")]
    UnknownPhase(String),

    #[error("unable to load label templates from `{}`: {reason}", path.display())]
    LabelConfig { path: PathBuf, reason: String },
}

impl From<Vec<ParseError>> for Error {
    fn from(errors: Vec<ParseError>) -> Self {
        Self::Parse(errors)
    }
}
