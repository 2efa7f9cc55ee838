use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex, PoisonError,
};

use tracing::debug;

#[allow(clippy::wildcard_imports)]
use crate::common::ast::*;

use super::{
    adapter::NodeAdapter,
    tree::TreeNode,
    visitor::{expression_tree, statement_tree},
};

/// Builds the subtree of each compiled class, grouping its members by category.
pub struct DeclarationMaterializer<'a> {
    adapter: NodeAdapter<'a>,
    root: &'a Mutex<TreeNode>,
    /// Set once the script's top-level statements have been added to `root`.
    top_level_emitted: &'a AtomicBool,
}

impl<'a> DeclarationMaterializer<'a> {
    pub const fn new(
        adapter: NodeAdapter<'a>,
        root: &'a Mutex<TreeNode>,
        top_level_emitted: &'a AtomicBool,
    ) -> Self {
        Self {
            adapter,
            root,
            top_level_emitted,
        }
    }

    /// Append the subtree of `class` to the root. The first call also
    /// appends the module's top-level statements ahead of it.
    pub fn materialize(&self, module: &ModuleNode, class: &ClassNode) {
        let mut nodes = vec![];

        if self
            .top_level_emitted
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            nodes.extend(self.top_level(module));
        }

        debug!(class = %class.name, "materializing class");
        nodes.push(self.class_tree(class));

        self.root
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .children
            .extend(nodes);
    }

    fn top_level(&self, module: &ModuleNode) -> Vec<TreeNode> {
        let Some(block) = module.statement_block() else {
            return vec![];
        };

        match &block.node {
            Stmt::Block(statements) if !statements.statements.is_empty() => {
                statement_tree(self.adapter, block)
            }
            _ => vec![],
        }
    }

    fn class_tree(&self, class: &ClassNode) -> TreeNode {
        let mut type_node = self.adapter.make(class);

        let constructors: Vec<TreeNode> = class
            .constructors
            .iter()
            .map(|constructor| self.with_code(self.adapter.make(constructor), constructor.code.as_ref()))
            .collect();
        let methods = class
            .methods
            .iter()
            .map(|method| self.with_code(self.adapter.make(method), method.code.as_ref()))
            .collect();
        let fields = class
            .fields
            .iter()
            .map(|field| {
                self.with_initializer(self.adapter.make(field), field.initial_expression.as_ref())
            })
            .collect();
        let properties = class
            .properties
            .iter()
            .map(|property| {
                let initializer = class
                    .property_field(property)
                    .and_then(|field| field.initial_expression.as_ref());
                self.with_initializer(self.adapter.make(property), initializer)
            })
            .collect();
        let annotations = class
            .annotations
            .iter()
            .map(|annotation| self.adapter.make(annotation))
            .collect();

        for (category, members) in [
            ("Constructors", constructors),
            ("Methods", methods),
            ("Fields", fields),
            ("Properties", properties),
            ("Annotations", annotations),
        ] {
            if members.is_empty() {
                continue;
            }

            let mut category_node = TreeNode::new(category);
            category_node.children = members;
            type_node.children.push(category_node);
        }

        type_node
    }

    fn with_code(&self, mut node: TreeNode, code: Option<&Statement>) -> TreeNode {
        if let Some(code) = code {
            node.children.extend(statement_tree(self.adapter, code));
        }
        node
    }

    fn with_initializer(&self, mut node: TreeNode, initializer: Option<&Expression>) -> TreeNode {
        if let Some(initializer) = initializer {
            node.children.extend(expression_tree(self.adapter, initializer));
        }
        node
    }
}
