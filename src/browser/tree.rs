//! Generic tree handed to tree-view frontends.

use std::fmt::{self, Display, Formatter};

use crate::common::PropertyValue;

/// One row of a node's property table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub name: String,
    /// `None` when the compiler has not computed the value yet.
    pub value: Option<String>,
    pub type_name: String,
}

impl From<PropertyValue> for Property {
    fn from(property: PropertyValue) -> Self {
        Self {
            name: property.name.to_owned(),
            value: property.value,
            type_name: property.type_name.to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TreeNode {
    pub label: String,
    /// Sorted by name.
    pub properties: Vec<Property>,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn new<S: Into<String>>(label: S) -> Self {
        Self {
            label: label.into(),
            properties: vec![],
            children: vec![],
        }
    }

    /// Node reached by following child indices from this node;
    /// an empty path is the node itself.
    pub fn get(&self, path: &[usize]) -> Option<&Self> {
        path.iter()
            .try_fold(self, |node, index| node.children.get(*index))
    }

    /// First direct child with the given label.
    pub fn child(&self, label: &str) -> Option<&Self> {
        self.children.iter().find(|child| child.label == label)
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties
            .binary_search_by(|property| property.name.as_str().cmp(name))
            .ok()
            .map(|index| &self.properties[index])
    }

    /// Pre-order walk over this node and its descendants, with their depth
    /// (this node being at depth 0).
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            stack: vec![(0, self)],
        }
    }

    /// Indented outline of the tree, optionally listing each node's properties.
    pub fn render(&self, with_properties: bool) -> String {
        let mut rendered = String::new();

        for (depth, node) in self.iter() {
            let indent = "  ".repeat(depth);
            rendered.push_str(&format!("{indent}{}\n", node.label));

            if with_properties {
                for property in &node.properties {
                    rendered.push_str(&format!("{indent}  | {property}\n"));
                }
            }
        }

        rendered
    }
}

impl Display for Property {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} = {}",
            self.name,
            self.type_name,
            self.value.as_deref().unwrap_or("null")
        )
    }
}

pub struct Iter<'a> {
    stack: Vec<(usize, &'a TreeNode)>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (usize, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        self.stack
            .extend(node.children.iter().rev().map(|child| (depth + 1, child)));

        Some((depth, node))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn sample() -> TreeNode {
        let mut root = TreeNode::new("root");
        let mut a = TreeNode::new("a");
        a.children.push(TreeNode::new("a1"));
        root.children.push(a);
        root.children.push(TreeNode::new("b"));
        root
    }

    #[test]
    fn test_path_navigation() {
        let root = sample();

        assert_eq!(root.get(&[]).map(|node| node.label.as_str()), Some("root"));
        assert_eq!(root.get(&[0, 0]).map(|node| node.label.as_str()), Some("a1"));
        assert_eq!(root.get(&[1, 0]), None);
        assert_eq!(root.child("b").map(|node| node.children.len()), Some(0));
    }

    #[test]
    fn test_pre_order_iteration() {
        let root = sample();
        let visited: Vec<(usize, &str)> = root
            .iter()
            .map(|(depth, node)| (depth, node.label.as_str()))
            .collect();

        assert_eq!(visited, vec![(0, "root"), (1, "a"), (2, "a1"), (1, "b")]);
    }

    #[test]
    fn test_render() {
        let mut root = sample();
        root.properties.push(Property {
            name: "name".to_owned(),
            value: None,
            type_name: "String".to_owned(),
        });

        assert_eq!(root.render(false), "root\n  a\n    a1\n  b\n");
        assert!(root.render(true).starts_with("root\n  | name: String = null\n"));
        assert_eq!(
            root.property("name").map(|property| property.value.clone()),
            Some(None)
        );
    }
}
