//! Materialization of statement and expression subtrees.
//!
//! Every callback handles exactly one [`NodeKind`]. Kinds that specialize a
//! more generic kind descend through the generic callback, which sees a node
//! of the wrong kind and only walks its children; so each node is
//! materialized once, by the callback of its own kind.

#[allow(clippy::wildcard_imports)]
use crate::common::ast::*;
use crate::common::{
    visit::{walk_expression, walk_statement, CodeVisitor},
    Inspect, NodeKind,
};

use super::{adapter::NodeAdapter, tree::TreeNode};

/// Builds the tree of one statement or expression subtree.
pub struct TreeBuildingVisitor<'a> {
    adapter: NodeAdapter<'a>,
    /// Node currently receiving children; starts as a sentinel
    /// holding the top-level nodes of the run.
    parent: TreeNode,
}

impl<'a> TreeBuildingVisitor<'a> {
    pub fn new(adapter: NodeAdapter<'a>) -> Self {
        Self {
            adapter,
            parent: TreeNode::default(),
        }
    }

    /// The nodes built at the top level of the run.
    pub fn finish(self) -> Vec<TreeNode> {
        self.parent.children
    }

    fn add_node<N, F>(&mut self, node: &N, expected: NodeKind, descend: F)
    where
        N: Inspect + ?Sized,
        F: FnOnce(&mut Self),
    {
        if node.kind() != expected {
            descend(self);
            return;
        }

        let child = self.adapter.make(node);
        let parent = std::mem::replace(&mut self.parent, child);
        descend(self);
        let child = std::mem::replace(&mut self.parent, parent);
        self.parent.children.push(child);
    }
}

/// Tree nodes of a statement (and everything inside it).
pub fn statement_tree(adapter: NodeAdapter<'_>, statement: &Statement) -> Vec<TreeNode> {
    let mut visitor = TreeBuildingVisitor::new(adapter);
    visitor.visit_statement(statement);
    visitor.finish()
}

/// Tree nodes of an expression (and everything inside it).
pub fn expression_tree(adapter: NodeAdapter<'_>, expression: &Expression) -> Vec<TreeNode> {
    let mut visitor = TreeBuildingVisitor::new(adapter);
    visitor.visit_expression(expression);
    visitor.finish()
}

// region: callbacks

impl CodeVisitor for TreeBuildingVisitor<'_> {
    // -- statements --

    fn visit_block_statement(&mut self, statement: &Statement) {
        self.add_node(statement, NodeKind::BlockStatement, |visitor| {
            walk_statement(visitor, statement);
        });
    }

    fn visit_expression_statement(&mut self, statement: &Statement) {
        self.add_node(statement, NodeKind::ExpressionStatement, |visitor| {
            walk_statement(visitor, statement);
        });
    }

    fn visit_return_statement(&mut self, statement: &Statement) {
        self.add_node(statement, NodeKind::ReturnStatement, |visitor| {
            walk_statement(visitor, statement);
        });
    }

    fn visit_assert_statement(&mut self, statement: &Statement) {
        self.add_node(statement, NodeKind::AssertStatement, |visitor| {
            walk_statement(visitor, statement);
        });
    }

    fn visit_for_loop(&mut self, statement: &Statement) {
        self.add_node(statement, NodeKind::ForStatement, |visitor| {
            walk_statement(visitor, statement);
        });
    }

    fn visit_while_loop(&mut self, statement: &Statement) {
        self.add_node(statement, NodeKind::WhileStatement, |visitor| {
            walk_statement(visitor, statement);
        });
    }

    fn visit_do_while_loop(&mut self, statement: &Statement) {
        self.add_node(statement, NodeKind::DoWhileStatement, |visitor| {
            walk_statement(visitor, statement);
        });
    }

    fn visit_if_else(&mut self, statement: &Statement) {
        self.add_node(statement, NodeKind::IfStatement, |visitor| {
            walk_statement(visitor, statement);
        });
    }

    fn visit_try_catch_finally(&mut self, statement: &Statement) {
        self.add_node(statement, NodeKind::TryCatchStatement, |visitor| {
            walk_statement(visitor, statement);
        });
    }

    fn visit_catch_statement(&mut self, catch: &CatchStatement) {
        self.add_node(catch, NodeKind::CatchStatement, |visitor| {
            visitor.visit_statement(&catch.code);
        });
    }

    fn visit_switch(&mut self, statement: &Statement) {
        self.add_node(statement, NodeKind::SwitchStatement, |visitor| {
            walk_statement(visitor, statement);
        });
    }

    fn visit_case_statement(&mut self, case: &CaseStatement) {
        self.add_node(case, NodeKind::CaseStatement, |visitor| {
            visitor.visit_expression(&case.expression);
            visitor.visit_statement(&case.code);
        });
    }

    fn visit_break_statement(&mut self, statement: &Statement) {
        self.add_node(statement, NodeKind::BreakStatement, |_| {});
    }

    fn visit_continue_statement(&mut self, statement: &Statement) {
        self.add_node(statement, NodeKind::ContinueStatement, |_| {});
    }

    fn visit_synchronized_statement(&mut self, statement: &Statement) {
        self.add_node(statement, NodeKind::SynchronizedStatement, |visitor| {
            walk_statement(visitor, statement);
        });
    }

    fn visit_throw_statement(&mut self, statement: &Statement) {
        self.add_node(statement, NodeKind::ThrowStatement, |visitor| {
            walk_statement(visitor, statement);
        });
    }

    fn visit_empty_statement(&mut self, statement: &Statement) {
        // placeholders for a missing `else` or `finally` are not shown
        if statement.span.is_empty() {
            return;
        }
        self.add_node(statement, NodeKind::EmptyStatement, |_| {});
    }

    // -- expressions --

    fn visit_method_call_expression(&mut self, expression: &Expression) {
        self.add_node(expression, NodeKind::MethodCallExpression, |visitor| {
            walk_expression(visitor, expression);
        });
    }

    fn visit_static_method_call_expression(&mut self, expression: &Expression) {
        self.add_node(expression, NodeKind::StaticMethodCallExpression, |visitor| {
            walk_expression(visitor, expression);
        });
    }

    fn visit_constructor_call_expression(&mut self, expression: &Expression) {
        self.add_node(expression, NodeKind::ConstructorCallExpression, |visitor| {
            walk_expression(visitor, expression);
        });
    }

    fn visit_binary_expression(&mut self, expression: &Expression) {
        self.add_node(expression, NodeKind::BinaryExpression, |visitor| {
            walk_expression(visitor, expression);
        });
    }

    fn visit_declaration_expression(&mut self, expression: &Expression) {
        self.add_node(expression, NodeKind::DeclarationExpression, |visitor| {
            visitor.visit_binary_expression(expression);
        });
    }

    fn visit_ternary_expression(&mut self, expression: &Expression) {
        self.add_node(expression, NodeKind::TernaryExpression, |visitor| {
            walk_expression(visitor, expression);
        });
    }

    fn visit_short_ternary_expression(&mut self, expression: &Expression) {
        self.add_node(expression, NodeKind::ElvisOperatorExpression, |visitor| {
            visitor.visit_ternary_expression(expression);
        });
    }

    fn visit_postfix_expression(&mut self, expression: &Expression) {
        self.add_node(expression, NodeKind::PostfixExpression, |visitor| {
            walk_expression(visitor, expression);
        });
    }

    fn visit_prefix_expression(&mut self, expression: &Expression) {
        self.add_node(expression, NodeKind::PrefixExpression, |visitor| {
            walk_expression(visitor, expression);
        });
    }

    fn visit_boolean_expression(&mut self, expression: &Expression) {
        self.add_node(expression, NodeKind::BooleanExpression, |visitor| {
            walk_expression(visitor, expression);
        });
    }

    fn visit_not_expression(&mut self, expression: &Expression) {
        self.add_node(expression, NodeKind::NotExpression, |visitor| {
            visitor.visit_boolean_expression(expression);
        });
    }

    fn visit_closure_expression(&mut self, expression: &Expression) {
        self.add_node(expression, NodeKind::ClosureExpression, |visitor| {
            walk_expression(visitor, expression);
        });
    }

    fn visit_tuple_expression(&mut self, expression: &Expression) {
        self.add_node(expression, NodeKind::TupleExpression, |visitor| {
            walk_expression(visitor, expression);
        });
    }

    fn visit_argument_list_expression(&mut self, expression: &Expression) {
        self.add_node(expression, NodeKind::ArgumentListExpression, |visitor| {
            visitor.visit_tuple_expression(expression);
        });
    }

    fn visit_list_expression(&mut self, expression: &Expression) {
        self.add_node(expression, NodeKind::ListExpression, |visitor| {
            walk_expression(visitor, expression);
        });
    }

    fn visit_closure_list_expression(&mut self, expression: &Expression) {
        self.add_node(expression, NodeKind::ClosureListExpression, |visitor| {
            visitor.visit_list_expression(expression);
        });
    }

    fn visit_array_expression(&mut self, expression: &Expression) {
        self.add_node(expression, NodeKind::ArrayExpression, |visitor| {
            walk_expression(visitor, expression);
        });
    }

    fn visit_map_expression(&mut self, expression: &Expression) {
        self.add_node(expression, NodeKind::MapExpression, |visitor| {
            walk_expression(visitor, expression);
        });
    }

    fn visit_named_argument_list_expression(&mut self, expression: &Expression) {
        self.add_node(expression, NodeKind::NamedArgumentListExpression, |visitor| {
            visitor.visit_map_expression(expression);
        });
    }

    fn visit_map_entry_expression(&mut self, expression: &Expression) {
        self.add_node(expression, NodeKind::MapEntryExpression, |visitor| {
            walk_expression(visitor, expression);
        });
    }

    fn visit_range_expression(&mut self, expression: &Expression) {
        self.add_node(expression, NodeKind::RangeExpression, |visitor| {
            walk_expression(visitor, expression);
        });
    }

    fn visit_spread_expression(&mut self, expression: &Expression) {
        self.add_node(expression, NodeKind::SpreadExpression, |visitor| {
            walk_expression(visitor, expression);
        });
    }

    fn visit_spread_map_expression(&mut self, expression: &Expression) {
        self.add_node(expression, NodeKind::SpreadMapExpression, |visitor| {
            walk_expression(visitor, expression);
        });
    }

    fn visit_method_pointer_expression(&mut self, expression: &Expression) {
        self.add_node(expression, NodeKind::MethodPointerExpression, |visitor| {
            walk_expression(visitor, expression);
        });
    }

    fn visit_unary_minus_expression(&mut self, expression: &Expression) {
        self.add_node(expression, NodeKind::UnaryMinusExpression, |visitor| {
            walk_expression(visitor, expression);
        });
    }

    fn visit_unary_plus_expression(&mut self, expression: &Expression) {
        self.add_node(expression, NodeKind::UnaryPlusExpression, |visitor| {
            walk_expression(visitor, expression);
        });
    }

    fn visit_bitwise_negation_expression(&mut self, expression: &Expression) {
        self.add_node(expression, NodeKind::BitwiseNegationExpression, |visitor| {
            walk_expression(visitor, expression);
        });
    }

    fn visit_cast_expression(&mut self, expression: &Expression) {
        self.add_node(expression, NodeKind::CastExpression, |visitor| {
            walk_expression(visitor, expression);
        });
    }

    fn visit_constant_expression(&mut self, expression: &Expression) {
        self.add_node(expression, NodeKind::ConstantExpression, |_| {});
    }

    fn visit_class_expression(&mut self, expression: &Expression) {
        self.add_node(expression, NodeKind::ClassExpression, |_| {});
    }

    fn visit_variable_expression(&mut self, expression: &Expression) {
        self.add_node(expression, NodeKind::VariableExpression, |_| {});
    }

    fn visit_property_expression(&mut self, expression: &Expression) {
        self.add_node(expression, NodeKind::PropertyExpression, |visitor| {
            walk_expression(visitor, expression);
        });
    }

    fn visit_attribute_expression(&mut self, expression: &Expression) {
        self.add_node(expression, NodeKind::AttributeExpression, |visitor| {
            visitor.visit_property_expression(expression);
        });
    }

    fn visit_field_expression(&mut self, expression: &Expression) {
        self.add_node(expression, NodeKind::FieldExpression, |_| {});
    }

    fn visit_regex_expression(&mut self, expression: &Expression) {
        self.add_node(expression, NodeKind::RegexExpression, |visitor| {
            walk_expression(visitor, expression);
        });
    }

    fn visit_gstring_expression(&mut self, expression: &Expression) {
        self.add_node(expression, NodeKind::GStringExpression, |visitor| {
            walk_expression(visitor, expression);
        });
    }

    fn visit_bytecode_expression(&mut self, expression: &Expression) {
        self.add_node(expression, NodeKind::BytecodeExpression, |_| {});
    }
}

// endregion

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::browser::labels::LabelMapping;

    fn labels_of(nodes: &[TreeNode]) -> Vec<(usize, String)> {
        nodes
            .iter()
            .flat_map(TreeNode::iter)
            .map(|(depth, node)| (depth, node.label.clone()))
            .collect()
    }

    fn tree_of(expression: &Expression) -> Vec<(usize, String)> {
        let labels = LabelMapping::empty();
        labels_of(&expression_tree(NodeAdapter::new(&labels), expression))
    }

    fn pair(depth: usize, label: &str) -> (usize, String) {
        (depth, label.to_owned())
    }

    fn one() -> Expression {
        Expression::constant(Constant::Integer(1))
    }

    #[test]
    fn test_aliased_kinds_are_materialized_once() {
        let aliased = [
            (
                Expr::ArgumentList(vec![one()]),
                "ArgumentListExpression",
            ),
            (
                Expr::NamedArgumentList(vec![]),
                "NamedArgumentListExpression",
            ),
            (Expr::ClosureList(vec![one()]), "ClosureListExpression"),
            (Expr::Not(one().boxed()), "NotExpression"),
            (
                Expr::Declaration(BinaryExpression {
                    left: Expression::variable("x").boxed(),
                    operation: "=".to_owned(),
                    right: one().boxed(),
                }),
                "DeclarationExpression",
            ),
            (
                Expr::Elvis(TernaryExpression {
                    condition: Expression::variable("a").boxed(),
                    true_expression: Expression::variable("a").boxed(),
                    false_expression: one().boxed(),
                }),
                "ElvisOperatorExpression",
            ),
            (
                Expr::Attribute(PropertyExpression {
                    object: Expression::variable("a").boxed(),
                    property: "b".to_owned(),
                    safe: false,
                    spread_safe: false,
                }),
                "AttributeExpression",
            ),
        ];

        for (node, kind) in aliased {
            let tree = tree_of(&Expression::internal(node));

            assert_eq!(tree[0], pair(0, kind));
            assert_eq!(
                tree.iter().filter(|(depth, _)| *depth == 0).count(),
                1,
                "{kind} should produce one top-level node"
            );
            assert!(
                tree.iter().all(|(_, label)| label != "TupleExpression"
                    && label != "MapExpression"
                    && label != "ListExpression"
                    && label != "BooleanExpression"
                    && label != "BinaryExpression"
                    && label != "TernaryExpression"
                    && label != "PropertyExpression"),
                "{kind} should not be materialized as its generic kind"
            );
        }
    }

    #[test]
    fn test_children_of_aliased_kinds_surface() {
        let declaration = Expression::internal(Expr::Declaration(BinaryExpression {
            left: Expression::variable("x").boxed(),
            operation: "=".to_owned(),
            right: one().boxed(),
        }));

        assert_eq!(
            tree_of(&declaration),
            vec![
                pair(0, "DeclarationExpression"),
                pair(1, "VariableExpression"),
                pair(1, "ConstantExpression"),
            ]
        );
    }

    #[test]
    fn test_generic_kinds_still_materialize() {
        let tuple = Expression::internal(Expr::Tuple(vec![one()]));

        assert_eq!(
            tree_of(&tuple),
            vec![pair(0, "TupleExpression"), pair(1, "ConstantExpression")]
        );
    }

    #[test]
    fn test_unshown_kinds_pass_their_children_up() {
        let labels = LabelMapping::empty();
        let adapter = NodeAdapter::new(&labels);

        // an empty expression is never shown, and neither is a missing `else`
        let statement = Statement::internal(Stmt::If(IfStatement {
            condition: Expression::internal(Expr::Boolean(Expression::variable("a").boxed()))
                .boxed(),
            if_block: Box::new(Statement::block(vec![Statement::internal(Stmt::Break)])),
            else_block: Box::new(Statement::empty()),
        }));
        let mut visitor = TreeBuildingVisitor::new(adapter);
        visitor.visit_expression(&Expression::internal(Expr::Empty));
        visitor.visit_statement(&statement);

        assert_eq!(
            labels_of(&visitor.finish()),
            vec![
                pair(0, "IfStatement"),
                pair(1, "BooleanExpression"),
                pair(2, "VariableExpression"),
                pair(1, "BlockStatement"),
                pair(2, "BreakStatement"),
            ]
        );
    }

    #[test]
    fn test_source_order() {
        let call = Expression::internal(Expr::MethodCall(MethodCallExpression {
            object: Expression::variable("out").boxed(),
            method: "println".to_owned(),
            arguments: Expression::internal(Expr::ArgumentList(vec![
                Expression::variable("a"),
                one(),
            ]))
            .boxed(),
            safe: false,
            implicit_this: false,
        }));

        assert_eq!(
            tree_of(&call),
            vec![
                pair(0, "MethodCallExpression"),
                pair(1, "VariableExpression"),
                pair(1, "ArgumentListExpression"),
                pair(2, "VariableExpression"),
                pair(2, "ConstantExpression"),
            ]
        );
    }

    #[test]
    fn test_catch_and_case_clauses() {
        let labels = LabelMapping::empty();
        let switch = Statement::internal(Stmt::Switch(SwitchStatement {
            expression: Expression::variable("x").boxed(),
            cases: vec![CaseStatement {
                expression: one(),
                code: Box::new(Statement::block(vec![])),
                span: 0..0,
            }],
            default: Box::new(Statement::empty()),
        }));

        assert_eq!(
            labels_of(&statement_tree(NodeAdapter::new(&labels), &switch)),
            vec![
                pair(0, "SwitchStatement"),
                pair(1, "VariableExpression"),
                pair(1, "CaseStatement"),
                pair(2, "ConstantExpression"),
                pair(2, "BlockStatement"),
            ]
        );
    }
}
