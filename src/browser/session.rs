use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex, PoisonError,
};

use tracing::debug;

use crate::{
    compiler::{CompilationUnit, CompilePhase},
    error::Error,
};

use super::{
    adapter::NodeAdapter, labels::LabelMapping, materializer::DeclarationMaterializer,
    tree::TreeNode,
};

/// Compiles scripts and returns the tree of their AST.
///
/// Each call to [`compile`](Self::compile) starts from scratch:
/// results of earlier calls are never shared with later ones.
pub struct Session<'a> {
    labels: &'a LabelMapping,
    root: Mutex<TreeNode>,
    top_level_emitted: AtomicBool,
    /// Number of units compiled so far, used to name the next one.
    units: usize,
}

impl Session<'static> {
    /// A session labelling nodes with the process-wide templates.
    pub fn new() -> Self {
        Self::with_labels(LabelMapping::global())
    }
}

impl Default for Session<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Session<'a> {
    pub fn with_labels(labels: &'a LabelMapping) -> Self {
        Self {
            labels,
            root: Mutex::new(TreeNode::default()),
            top_level_emitted: AtomicBool::new(false),
            units: 0,
        }
    }

    /// Compile `source` up to and including `phase` and return the tree of
    /// what the compiler produced by then.
    pub fn compile(&mut self, source: &str, phase: CompilePhase) -> Result<TreeNode, Error> {
        self.units += 1;
        let name = format!("Script{}", self.units);
        debug!(unit = %name, %phase, "compiling");

        self.top_level_emitted.store(false, Ordering::Release);
        *self.root.get_mut().unwrap_or_else(PoisonError::into_inner) = TreeNode::new(&name);

        let materializer = DeclarationMaterializer::new(
            NodeAdapter::new(self.labels),
            &self.root,
            &self.top_level_emitted,
        );

        let mut unit = CompilationUnit::new(name, source);
        unit.add_phase_operation(Box::new(move |module, class| {
            materializer.materialize(module, class);
        }));
        let compiled = unit.compile(phase);
        drop(unit);
        compiled?;

        Ok(std::mem::take(
            self.root.get_mut().unwrap_or_else(PoisonError::into_inner),
        ))
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    use super::*;

    fn labels_under<'t>(node: &'t TreeNode) -> Vec<&'t str> {
        node.iter().map(|(_, node)| node.label.as_str()).collect()
    }

    #[test]
    fn test_assignment_at_class_generation() {
        let labels = LabelMapping::empty();
        let mut session = Session::with_labels(&labels);

        let root = session
            .compile("x = 1", CompilePhase::ClassGeneration)
            .expect("source should compile");

        let classes: Vec<&TreeNode> = root
            .children
            .iter()
            .filter(|child| child.label == "ClassNode")
            .collect();
        assert_eq!(classes.len(), 1);

        let methods = classes[0].child("Methods").expect("methods should be shown");
        let run = methods
            .children
            .iter()
            .find(|method| {
                method
                    .property("name")
                    .is_some_and(|name| name.value.as_deref() == Some("run"))
            })
            .expect("run should be shown");

        assert_eq!(
            labels_under(run)
                .into_iter()
                .filter(|label| *label == "BinaryExpression")
                .count(),
            1
        );
    }

    #[test]
    fn test_default_labels() {
        let labels = LabelMapping::defaults();
        let mut session = Session::with_labels(&labels);

        let root = session
            .compile("class Point { int x }", CompilePhase::Conversion)
            .expect("source should compile");

        assert_eq!(root.label, "Script1");
        assert_eq!(
            labels_under(&root),
            vec![
                "Script1",
                "ClassNode - Point",
                "Fields",
                "FieldNode - x : int",
                "Properties",
                "PropertyNode - x : int",
            ]
        );
    }

    #[test]
    fn test_syntax_error() {
        let labels = LabelMapping::empty();
        let mut session = Session::with_labels(&labels);

        assert!(matches!(
            session.compile("x = (", CompilePhase::Conversion),
            Err(Error::Parse(_))
        ));
    }

    #[test]
    fn test_semantic_error() {
        let labels = LabelMapping::empty();
        let mut session = Session::with_labels(&labels);

        assert!(matches!(
            session.compile("new Missing()", CompilePhase::ClassGeneration),
            Err(Error::Compilation(_))
        ));
        // the error is only reported by the phase that detects it
        assert!(session
            .compile("new Missing()", CompilePhase::Conversion)
            .is_ok());
    }

    #[test]
    fn test_sequential_compiles_are_independent() {
        let labels = LabelMapping::empty();
        let mut session = Session::with_labels(&labels);

        let first = session
            .compile("a = 1", CompilePhase::Conversion)
            .expect("source should compile");
        let second = session
            .compile("class A {}", CompilePhase::Conversion)
            .expect("source should compile");

        assert_eq!(first.label, "Script1");
        assert_eq!(
            first
                .children
                .iter()
                .map(|child| child.label.as_str())
                .collect::<Vec<_>>(),
            vec!["BlockStatement", "ClassNode"]
        );
        assert_eq!(second.label, "Script2");
        assert_eq!(second.children.len(), 1);
        assert_eq!(second.children[0].label, "ClassNode");
    }

    #[test]
    fn test_phase_changes_the_tree() {
        let labels = LabelMapping::empty();
        let mut session = Session::with_labels(&labels);
        let source = indoc! {"
            class A {
                String name
            }
        "};

        let converted = session
            .compile(source, CompilePhase::Conversion)
            .expect("source should compile");
        let canonical = session
            .compile(source, CompilePhase::Canonicalization)
            .expect("source should compile");

        assert_eq!(converted.children[0].child("Methods"), None);
        assert_eq!(
            canonical.children[0]
                .child("Methods")
                .map(|methods| methods.children.len()),
            Some(2)
        );
    }
}
