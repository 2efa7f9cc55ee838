use crate::common::ast::Span;

use super::CompilePhase;

/// A source unit that parsed correctly but could not be
/// compiled through a later phase.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{phase} failed: {message}")]
pub struct CompilationError {
    pub phase: CompilePhase,
    pub message: String,
    pub span: Span,
}

impl CompilationError {
    pub fn new<S: Into<String>>(phase: CompilePhase, message: S, span: Span) -> Self {
        Self {
            phase,
            message: message.into(),
            span,
        }
    }
}

pub type FallableAction = Result<(), CompilationError>;
