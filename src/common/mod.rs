//! Common data & logic shared across the compiler and the tree browser
//! (e.g. AST).
pub mod ast;
pub mod inspect;
pub mod kind;
pub mod text;
pub mod visit;

pub use inspect::{Inspect, PropertyValue};
pub use kind::NodeKind;
