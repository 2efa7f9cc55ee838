//! Recursive-descent walks over statements and expressions.
//!
//! [`CodeVisitor`] has one callback per node kind. Each default callback
//! descends into the node's children; callbacks of kinds that specialize a
//! more generic kind route through the generic callback instead (an argument
//! list is visited as a tuple, a declaration as a binary expression, ...).
//!
//! [`CodeVisitorMut`] is the coarse, mutable walk used by the compiler phases.

#[allow(clippy::wildcard_imports)]
use super::ast::*;

// region: CodeVisitor

#[allow(unused_variables)]
pub trait CodeVisitor {
    fn visit_statement(&mut self, statement: &Statement) {
        match &statement.node {
            Stmt::Block(_) => self.visit_block_statement(statement),
            Stmt::Expression(_) => self.visit_expression_statement(statement),
            Stmt::Return(_) => self.visit_return_statement(statement),
            Stmt::Assert(_) => self.visit_assert_statement(statement),
            Stmt::For(_) => self.visit_for_loop(statement),
            Stmt::While(_) => self.visit_while_loop(statement),
            Stmt::DoWhile(_) => self.visit_do_while_loop(statement),
            Stmt::If(_) => self.visit_if_else(statement),
            Stmt::TryCatch(_) => self.visit_try_catch_finally(statement),
            Stmt::Switch(_) => self.visit_switch(statement),
            Stmt::Break => self.visit_break_statement(statement),
            Stmt::Continue => self.visit_continue_statement(statement),
            Stmt::Synchronized(_) => self.visit_synchronized_statement(statement),
            Stmt::Throw(_) => self.visit_throw_statement(statement),
            Stmt::Empty => self.visit_empty_statement(statement),
        }
    }

    #[allow(clippy::too_many_lines)]
    fn visit_expression(&mut self, expression: &Expression) {
        match &expression.node {
            Expr::MethodCall(_) => self.visit_method_call_expression(expression),
            Expr::StaticMethodCall(_) => self.visit_static_method_call_expression(expression),
            Expr::ConstructorCall(_) => self.visit_constructor_call_expression(expression),
            Expr::Binary(_) => self.visit_binary_expression(expression),
            Expr::Declaration(_) => self.visit_declaration_expression(expression),
            Expr::Ternary(_) => self.visit_ternary_expression(expression),
            Expr::Elvis(_) => self.visit_short_ternary_expression(expression),
            Expr::Postfix(_) => self.visit_postfix_expression(expression),
            Expr::Prefix(_) => self.visit_prefix_expression(expression),
            Expr::Boolean(_) => self.visit_boolean_expression(expression),
            Expr::Not(_) => self.visit_not_expression(expression),
            Expr::Closure(_) => self.visit_closure_expression(expression),
            Expr::Tuple(_) => self.visit_tuple_expression(expression),
            Expr::ArgumentList(_) => self.visit_argument_list_expression(expression),
            Expr::List(_) => self.visit_list_expression(expression),
            Expr::ClosureList(_) => self.visit_closure_list_expression(expression),
            Expr::Array(_) => self.visit_array_expression(expression),
            Expr::Map(_) => self.visit_map_expression(expression),
            Expr::NamedArgumentList(_) => self.visit_named_argument_list_expression(expression),
            Expr::MapEntry(_) => self.visit_map_entry_expression(expression),
            Expr::Range(_) => self.visit_range_expression(expression),
            Expr::Spread(_) => self.visit_spread_expression(expression),
            Expr::SpreadMap(_) => self.visit_spread_map_expression(expression),
            Expr::MethodPointer(_) => self.visit_method_pointer_expression(expression),
            Expr::UnaryMinus(_) => self.visit_unary_minus_expression(expression),
            Expr::UnaryPlus(_) => self.visit_unary_plus_expression(expression),
            Expr::BitwiseNegation(_) => self.visit_bitwise_negation_expression(expression),
            Expr::Cast(_) => self.visit_cast_expression(expression),
            Expr::Constant(_) => self.visit_constant_expression(expression),
            Expr::Class(_) => self.visit_class_expression(expression),
            Expr::Variable(_) => self.visit_variable_expression(expression),
            Expr::Property(_) => self.visit_property_expression(expression),
            Expr::Attribute(_) => self.visit_attribute_expression(expression),
            Expr::Field(_) => self.visit_field_expression(expression),
            Expr::Regex(_) => self.visit_regex_expression(expression),
            Expr::GString(_) => self.visit_gstring_expression(expression),
            Expr::Bytecode(_) => self.visit_bytecode_expression(expression),
            Expr::Empty => self.visit_empty_expression(expression),
        }
    }

    // -- statements --

    fn visit_block_statement(&mut self, statement: &Statement) {
        walk_statement(self, statement);
    }

    fn visit_expression_statement(&mut self, statement: &Statement) {
        walk_statement(self, statement);
    }

    fn visit_return_statement(&mut self, statement: &Statement) {
        walk_statement(self, statement);
    }

    fn visit_assert_statement(&mut self, statement: &Statement) {
        walk_statement(self, statement);
    }

    fn visit_for_loop(&mut self, statement: &Statement) {
        walk_statement(self, statement);
    }

    fn visit_while_loop(&mut self, statement: &Statement) {
        walk_statement(self, statement);
    }

    fn visit_do_while_loop(&mut self, statement: &Statement) {
        walk_statement(self, statement);
    }

    fn visit_if_else(&mut self, statement: &Statement) {
        walk_statement(self, statement);
    }

    fn visit_try_catch_finally(&mut self, statement: &Statement) {
        walk_statement(self, statement);
    }

    fn visit_catch_statement(&mut self, catch: &CatchStatement) {
        self.visit_statement(&catch.code);
    }

    fn visit_switch(&mut self, statement: &Statement) {
        walk_statement(self, statement);
    }

    fn visit_case_statement(&mut self, case: &CaseStatement) {
        self.visit_expression(&case.expression);
        self.visit_statement(&case.code);
    }

    fn visit_break_statement(&mut self, statement: &Statement) {}

    fn visit_continue_statement(&mut self, statement: &Statement) {}

    fn visit_synchronized_statement(&mut self, statement: &Statement) {
        walk_statement(self, statement);
    }

    fn visit_throw_statement(&mut self, statement: &Statement) {
        walk_statement(self, statement);
    }

    fn visit_empty_statement(&mut self, statement: &Statement) {}

    // -- expressions --

    fn visit_method_call_expression(&mut self, expression: &Expression) {
        walk_expression(self, expression);
    }

    fn visit_static_method_call_expression(&mut self, expression: &Expression) {
        walk_expression(self, expression);
    }

    fn visit_constructor_call_expression(&mut self, expression: &Expression) {
        walk_expression(self, expression);
    }

    fn visit_binary_expression(&mut self, expression: &Expression) {
        walk_expression(self, expression);
    }

    fn visit_declaration_expression(&mut self, expression: &Expression) {
        self.visit_binary_expression(expression);
    }

    fn visit_ternary_expression(&mut self, expression: &Expression) {
        walk_expression(self, expression);
    }

    fn visit_short_ternary_expression(&mut self, expression: &Expression) {
        self.visit_ternary_expression(expression);
    }

    fn visit_postfix_expression(&mut self, expression: &Expression) {
        walk_expression(self, expression);
    }

    fn visit_prefix_expression(&mut self, expression: &Expression) {
        walk_expression(self, expression);
    }

    fn visit_boolean_expression(&mut self, expression: &Expression) {
        walk_expression(self, expression);
    }

    fn visit_not_expression(&mut self, expression: &Expression) {
        self.visit_boolean_expression(expression);
    }

    fn visit_closure_expression(&mut self, expression: &Expression) {
        walk_expression(self, expression);
    }

    fn visit_tuple_expression(&mut self, expression: &Expression) {
        walk_expression(self, expression);
    }

    fn visit_argument_list_expression(&mut self, expression: &Expression) {
        self.visit_tuple_expression(expression);
    }

    fn visit_list_expression(&mut self, expression: &Expression) {
        walk_expression(self, expression);
    }

    fn visit_closure_list_expression(&mut self, expression: &Expression) {
        self.visit_list_expression(expression);
    }

    fn visit_array_expression(&mut self, expression: &Expression) {
        walk_expression(self, expression);
    }

    fn visit_map_expression(&mut self, expression: &Expression) {
        walk_expression(self, expression);
    }

    fn visit_named_argument_list_expression(&mut self, expression: &Expression) {
        self.visit_map_expression(expression);
    }

    fn visit_map_entry_expression(&mut self, expression: &Expression) {
        walk_expression(self, expression);
    }

    fn visit_range_expression(&mut self, expression: &Expression) {
        walk_expression(self, expression);
    }

    fn visit_spread_expression(&mut self, expression: &Expression) {
        walk_expression(self, expression);
    }

    fn visit_spread_map_expression(&mut self, expression: &Expression) {
        walk_expression(self, expression);
    }

    fn visit_method_pointer_expression(&mut self, expression: &Expression) {
        walk_expression(self, expression);
    }

    fn visit_unary_minus_expression(&mut self, expression: &Expression) {
        walk_expression(self, expression);
    }

    fn visit_unary_plus_expression(&mut self, expression: &Expression) {
        walk_expression(self, expression);
    }

    fn visit_bitwise_negation_expression(&mut self, expression: &Expression) {
        walk_expression(self, expression);
    }

    fn visit_cast_expression(&mut self, expression: &Expression) {
        walk_expression(self, expression);
    }

    fn visit_constant_expression(&mut self, expression: &Expression) {}

    fn visit_class_expression(&mut self, expression: &Expression) {}

    fn visit_variable_expression(&mut self, expression: &Expression) {}

    fn visit_property_expression(&mut self, expression: &Expression) {
        walk_expression(self, expression);
    }

    fn visit_attribute_expression(&mut self, expression: &Expression) {
        self.visit_property_expression(expression);
    }

    fn visit_field_expression(&mut self, expression: &Expression) {}

    fn visit_regex_expression(&mut self, expression: &Expression) {
        walk_expression(self, expression);
    }

    fn visit_gstring_expression(&mut self, expression: &Expression) {
        walk_expression(self, expression);
    }

    fn visit_bytecode_expression(&mut self, expression: &Expression) {}

    fn visit_empty_expression(&mut self, expression: &Expression) {}
}

/// Visit the direct children of a statement, in source order.
pub fn walk_statement<V: CodeVisitor + ?Sized>(visitor: &mut V, statement: &Statement) {
    match &statement.node {
        Stmt::Block(block) => {
            for statement in &block.statements {
                visitor.visit_statement(statement);
            }
        }
        Stmt::Expression(expression) | Stmt::Return(expression) | Stmt::Throw(expression) => {
            visitor.visit_expression(expression);
        }
        Stmt::Assert(assert) => {
            visitor.visit_expression(&assert.condition);
            visitor.visit_expression(&assert.message);
        }
        Stmt::For(for_loop) => {
            visitor.visit_expression(&for_loop.collection);
            visitor.visit_statement(&for_loop.body);
        }
        Stmt::While(while_loop) => {
            visitor.visit_expression(&while_loop.condition);
            visitor.visit_statement(&while_loop.body);
        }
        Stmt::DoWhile(do_while) => {
            visitor.visit_statement(&do_while.body);
            visitor.visit_expression(&do_while.condition);
        }
        Stmt::If(if_else) => {
            visitor.visit_expression(&if_else.condition);
            visitor.visit_statement(&if_else.if_block);
            visitor.visit_statement(&if_else.else_block);
        }
        Stmt::TryCatch(try_catch) => {
            visitor.visit_statement(&try_catch.try_block);
            for catch in &try_catch.catches {
                visitor.visit_catch_statement(catch);
            }
            visitor.visit_statement(&try_catch.finally_block);
        }
        Stmt::Switch(switch) => {
            visitor.visit_expression(&switch.expression);
            for case in &switch.cases {
                visitor.visit_case_statement(case);
            }
            visitor.visit_statement(&switch.default);
        }
        Stmt::Synchronized(synchronized) => {
            visitor.visit_expression(&synchronized.lock);
            visitor.visit_statement(&synchronized.code);
        }
        Stmt::Break | Stmt::Continue | Stmt::Empty => {}
    }
}

/// Visit the direct children of an expression, in source order.
pub fn walk_expression<V: CodeVisitor + ?Sized>(visitor: &mut V, expression: &Expression) {
    match &expression.node {
        Expr::MethodCall(call) => {
            visitor.visit_expression(&call.object);
            visitor.visit_expression(&call.arguments);
        }
        Expr::StaticMethodCall(StaticMethodCallExpression { arguments, .. })
        | Expr::ConstructorCall(ConstructorCallExpression { arguments, .. }) => {
            visitor.visit_expression(arguments);
        }
        Expr::Binary(binary) | Expr::Declaration(binary) => {
            visitor.visit_expression(&binary.left);
            visitor.visit_expression(&binary.right);
        }
        Expr::Ternary(ternary) => {
            visitor.visit_expression(&ternary.condition);
            visitor.visit_expression(&ternary.true_expression);
            visitor.visit_expression(&ternary.false_expression);
        }
        Expr::Elvis(elvis) => {
            visitor.visit_expression(&elvis.condition);
            visitor.visit_expression(&elvis.false_expression);
        }
        Expr::Postfix(operation) | Expr::Prefix(operation) => {
            visitor.visit_expression(&operation.expression);
        }
        Expr::Boolean(inner)
        | Expr::Not(inner)
        | Expr::Spread(inner)
        | Expr::SpreadMap(inner)
        | Expr::UnaryMinus(inner)
        | Expr::UnaryPlus(inner)
        | Expr::BitwiseNegation(inner)
        | Expr::Regex(inner) => visitor.visit_expression(inner),
        Expr::Closure(closure) => visitor.visit_statement(&closure.code),
        Expr::Tuple(expressions)
        | Expr::ArgumentList(expressions)
        | Expr::List(expressions)
        | Expr::ClosureList(expressions)
        | Expr::Map(expressions)
        | Expr::NamedArgumentList(expressions) => {
            for expression in expressions {
                visitor.visit_expression(expression);
            }
        }
        Expr::Array(array) => {
            for expression in array.expressions.iter().chain(&array.size_expressions) {
                visitor.visit_expression(expression);
            }
        }
        Expr::MapEntry(entry) => {
            visitor.visit_expression(&entry.key);
            visitor.visit_expression(&entry.value);
        }
        Expr::Range(range) => {
            visitor.visit_expression(&range.from);
            visitor.visit_expression(&range.to);
        }
        Expr::MethodPointer(pointer) => visitor.visit_expression(&pointer.expression),
        Expr::Cast(cast) => visitor.visit_expression(&cast.expression),
        Expr::Property(property) | Expr::Attribute(property) => {
            visitor.visit_expression(&property.object);
        }
        Expr::GString(gstring) => {
            for (i, fragment) in gstring.strings.iter().enumerate() {
                visitor.visit_expression(fragment);
                if let Some(value) = gstring.values.get(i) {
                    visitor.visit_expression(value);
                }
            }
        }
        Expr::Constant(_)
        | Expr::Class(_)
        | Expr::Variable(_)
        | Expr::Field(_)
        | Expr::Bytecode(_)
        | Expr::Empty => {}
    }
}

// endregion

// region: CodeVisitorMut

pub trait CodeVisitorMut {
    fn visit_statement_mut(&mut self, statement: &mut Statement) {
        walk_statement_mut(self, statement);
    }

    fn visit_catch_mut(&mut self, catch: &mut CatchStatement) {
        self.visit_statement_mut(&mut catch.code);
    }

    fn visit_expression_mut(&mut self, expression: &mut Expression) {
        walk_expression_mut(self, expression);
    }
}

pub fn walk_statement_mut<V: CodeVisitorMut + ?Sized>(visitor: &mut V, statement: &mut Statement) {
    match &mut statement.node {
        Stmt::Block(block) => {
            for statement in &mut block.statements {
                visitor.visit_statement_mut(statement);
            }
        }
        Stmt::Expression(expression) | Stmt::Return(expression) | Stmt::Throw(expression) => {
            visitor.visit_expression_mut(expression);
        }
        Stmt::Assert(assert) => {
            visitor.visit_expression_mut(&mut assert.condition);
            visitor.visit_expression_mut(&mut assert.message);
        }
        Stmt::For(for_loop) => {
            visitor.visit_expression_mut(&mut for_loop.collection);
            visitor.visit_statement_mut(&mut for_loop.body);
        }
        Stmt::While(while_loop) => {
            visitor.visit_expression_mut(&mut while_loop.condition);
            visitor.visit_statement_mut(&mut while_loop.body);
        }
        Stmt::DoWhile(do_while) => {
            visitor.visit_statement_mut(&mut do_while.body);
            visitor.visit_expression_mut(&mut do_while.condition);
        }
        Stmt::If(if_else) => {
            visitor.visit_expression_mut(&mut if_else.condition);
            visitor.visit_statement_mut(&mut if_else.if_block);
            visitor.visit_statement_mut(&mut if_else.else_block);
        }
        Stmt::TryCatch(try_catch) => {
            visitor.visit_statement_mut(&mut try_catch.try_block);
            for catch in &mut try_catch.catches {
                visitor.visit_catch_mut(catch);
            }
            visitor.visit_statement_mut(&mut try_catch.finally_block);
        }
        Stmt::Switch(switch) => {
            visitor.visit_expression_mut(&mut switch.expression);
            for case in &mut switch.cases {
                visitor.visit_expression_mut(&mut case.expression);
                visitor.visit_statement_mut(&mut case.code);
            }
            visitor.visit_statement_mut(&mut switch.default);
        }
        Stmt::Synchronized(synchronized) => {
            visitor.visit_expression_mut(&mut synchronized.lock);
            visitor.visit_statement_mut(&mut synchronized.code);
        }
        Stmt::Break | Stmt::Continue | Stmt::Empty => {}
    }
}

pub fn walk_expression_mut<V: CodeVisitorMut + ?Sized>(
    visitor: &mut V,
    expression: &mut Expression,
) {
    match &mut expression.node {
        Expr::MethodCall(call) => {
            visitor.visit_expression_mut(&mut call.object);
            visitor.visit_expression_mut(&mut call.arguments);
        }
        Expr::StaticMethodCall(StaticMethodCallExpression { arguments, .. })
        | Expr::ConstructorCall(ConstructorCallExpression { arguments, .. }) => {
            visitor.visit_expression_mut(arguments);
        }
        Expr::Binary(binary) | Expr::Declaration(binary) => {
            visitor.visit_expression_mut(&mut binary.left);
            visitor.visit_expression_mut(&mut binary.right);
        }
        Expr::Ternary(ternary) | Expr::Elvis(ternary) => {
            visitor.visit_expression_mut(&mut ternary.condition);
            visitor.visit_expression_mut(&mut ternary.true_expression);
            visitor.visit_expression_mut(&mut ternary.false_expression);
        }
        Expr::Postfix(operation) | Expr::Prefix(operation) => {
            visitor.visit_expression_mut(&mut operation.expression);
        }
        Expr::Boolean(inner)
        | Expr::Not(inner)
        | Expr::Spread(inner)
        | Expr::SpreadMap(inner)
        | Expr::UnaryMinus(inner)
        | Expr::UnaryPlus(inner)
        | Expr::BitwiseNegation(inner)
        | Expr::Regex(inner) => visitor.visit_expression_mut(inner),
        Expr::Closure(closure) => visitor.visit_statement_mut(&mut closure.code),
        Expr::Tuple(expressions)
        | Expr::ArgumentList(expressions)
        | Expr::List(expressions)
        | Expr::ClosureList(expressions)
        | Expr::Map(expressions)
        | Expr::NamedArgumentList(expressions) => {
            for expression in expressions {
                visitor.visit_expression_mut(expression);
            }
        }
        Expr::Array(array) => {
            for expression in array
                .expressions
                .iter_mut()
                .chain(array.size_expressions.iter_mut())
            {
                visitor.visit_expression_mut(expression);
            }
        }
        Expr::MapEntry(entry) => {
            visitor.visit_expression_mut(&mut entry.key);
            visitor.visit_expression_mut(&mut entry.value);
        }
        Expr::Range(range) => {
            visitor.visit_expression_mut(&mut range.from);
            visitor.visit_expression_mut(&mut range.to);
        }
        Expr::MethodPointer(pointer) => visitor.visit_expression_mut(&mut pointer.expression),
        Expr::Cast(cast) => visitor.visit_expression_mut(&mut cast.expression),
        Expr::Property(property) | Expr::Attribute(property) => {
            visitor.visit_expression_mut(&mut property.object);
        }
        Expr::GString(gstring) => {
            for expression in gstring.strings.iter_mut().chain(gstring.values.iter_mut()) {
                visitor.visit_expression_mut(expression);
            }
        }
        Expr::Constant(_)
        | Expr::Class(_)
        | Expr::Variable(_)
        | Expr::Field(_)
        | Expr::Bytecode(_)
        | Expr::Empty => {}
    }
}

// endregion

#[cfg(test)]
mod tests {
    use super::*;

    /// Records the callbacks it receives, keeping the default routing.
    #[derive(Default)]
    struct CallbackRecorder {
        calls: Vec<&'static str>,
    }

    impl CodeVisitor for CallbackRecorder {
        fn visit_tuple_expression(&mut self, expression: &Expression) {
            self.calls.push("tuple");
            walk_expression(self, expression);
        }

        fn visit_constant_expression(&mut self, _expression: &Expression) {
            self.calls.push("constant");
        }

        fn visit_binary_expression(&mut self, expression: &Expression) {
            self.calls.push("binary");
            walk_expression(self, expression);
        }

        fn visit_variable_expression(&mut self, _expression: &Expression) {
            self.calls.push("variable");
        }
    }

    #[test]
    fn test_argument_list_routes_through_tuple_callback() {
        let arguments = Expression::internal(Expr::ArgumentList(vec![Expression::constant(
            Constant::Integer(1),
        )]));

        let mut recorder = CallbackRecorder::default();
        recorder.visit_expression(&arguments);

        assert_eq!(recorder.calls, vec!["tuple", "constant"]);
    }

    #[test]
    fn test_declaration_routes_through_binary_callback() {
        let declaration = Expression::internal(Expr::Declaration(BinaryExpression {
            left: Expression::variable("x").boxed(),
            operation: "=".to_owned(),
            right: Expression::constant(Constant::Integer(1)).boxed(),
        }));

        let mut recorder = CallbackRecorder::default();
        recorder.visit_statement(&Statement::expression(declaration));

        assert_eq!(recorder.calls, vec!["binary", "variable", "constant"]);
    }

    #[test]
    fn test_gstring_children_are_interleaved() {
        let gstring = Expression::internal(Expr::GString(GStringExpression {
            strings: vec![
                Expression::constant(Constant::String("a".to_owned())),
                Expression::constant(Constant::String("b".to_owned())),
            ],
            values: vec![Expression::variable("x")],
        }));

        let mut recorder = CallbackRecorder::default();
        recorder.visit_expression(&gstring);

        assert_eq!(recorder.calls, vec!["constant", "variable", "constant"]);
    }
}
