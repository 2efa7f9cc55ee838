use crate::common::Inspect;

use super::{
    labels::{self, LabelMapping},
    tree::{Property, TreeNode},
};

/// Turns single AST nodes into (childless) tree nodes.
#[derive(Debug, Clone, Copy)]
pub struct NodeAdapter<'a> {
    labels: &'a LabelMapping,
}

impl<'a> NodeAdapter<'a> {
    pub const fn new(labels: &'a LabelMapping) -> Self {
        Self { labels }
    }

    pub fn make<N: Inspect + ?Sized>(&self, node: &N) -> TreeNode {
        TreeNode {
            label: self.label(node),
            properties: self.property_table(node),
            children: vec![],
        }
    }

    /// The node's template rendered with its properties,
    /// or its kind's simple name when there is no template for it.
    pub fn label<N: Inspect + ?Sized>(&self, node: &N) -> String {
        let kind = node.kind();

        match self.labels.template(&kind.qualified_name()) {
            Some(template) => labels::render(template, &node.properties()),
            None => kind.simple_name().to_owned(),
        }
    }

    /// Every property of the node, sorted by name.
    pub fn property_table<N: Inspect + ?Sized>(&self, node: &N) -> Vec<Property> {
        let mut properties: Vec<Property> =
            node.properties().into_iter().map(Property::from).collect();
        properties.sort_by(|a, b| a.name.cmp(&b.name));
        properties
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    #[allow(clippy::wildcard_imports)]
    use crate::common::ast::*;

    fn variable() -> Expression {
        Expression::new(Expr::Variable(VariableExpression::new("total")), 4..9)
    }

    #[test]
    fn test_template_label() {
        let labels = LabelMapping::defaults();
        let adapter = NodeAdapter::new(&labels);

        // origin is only known after semantic analysis
        assert_eq!(adapter.label(&variable()), "Variable - total : null");
    }

    #[test]
    fn test_fallback_label() {
        let labels = LabelMapping::empty();
        let adapter = NodeAdapter::new(&labels);

        assert_eq!(adapter.label(&variable()), "VariableExpression");
        assert_eq!(adapter.label(&Statement::empty()), "EmptyStatement");
    }

    #[test]
    fn test_property_table_is_sorted() {
        let labels = LabelMapping::empty();
        let adapter = NodeAdapter::new(&labels);
        let node = adapter.make(&variable());

        let names: Vec<&str> = node
            .properties
            .iter()
            .map(|property| property.name.as_str())
            .collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();

        assert_eq!(names, sorted);
        assert!(node.children.is_empty());
        assert_eq!(
            node.property("declared_type").map(|property| property.value.clone()),
            Some(None)
        );
        assert_eq!(
            node.property("span").and_then(|property| property.value.clone()),
            Some("4..9".to_owned())
        );
    }
}
