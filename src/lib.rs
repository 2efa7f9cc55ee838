//! Inspect what a script compiler makes of a script at any compile phase,
//! as a tree of labelled nodes with their properties.
pub mod browser;
pub mod common;
pub mod compiler;
pub mod error;
pub mod parser;

pub use browser::{LabelMapping, Session, TreeNode};
pub use compiler::CompilePhase;
pub use error::Error;
