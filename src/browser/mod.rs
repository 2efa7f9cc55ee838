//! Materialization of a compiled unit's AST into a generic tree
//! (label, property table and children per node) for tree-view frontends.
pub mod adapter;
pub mod labels;
pub mod materializer;
pub mod session;
pub mod tree;
pub mod visitor;

pub use adapter::NodeAdapter;
pub use labels::LabelMapping;
pub use materializer::DeclarationMaterializer;
pub use session::Session;
pub use tree::{Property, TreeNode};
pub use visitor::TreeBuildingVisitor;
