//! Declared, readable properties of every AST node kind.
//!
//! Each kind lists its properties explicitly. A property the compiler has
//! not computed yet at the current phase reads as `None`.

#[allow(clippy::wildcard_imports)]
use super::ast::*;
use super::{kind::NodeKind, text};

/// One readable property of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyValue {
    pub name: &'static str,
    pub value: Option<String>,
    /// Simple name of the property's declared type.
    pub type_name: &'static str,
}

/// A node that can be shown in a tree view.
pub trait Inspect {
    /// Exact kind of the node.
    fn kind(&self) -> NodeKind;

    /// Every readable property of the node, in declaration order.
    fn properties(&self) -> Vec<PropertyValue>;
}

#[derive(Debug, Default)]
struct PropertyList(Vec<PropertyValue>);

impl PropertyList {
    fn with<T: ToString>(self, name: &'static str, type_name: &'static str, value: T) -> Self {
        self.with_optional(name, type_name, Some(value))
    }

    fn with_optional<T: ToString>(
        mut self,
        name: &'static str,
        type_name: &'static str,
        value: Option<T>,
    ) -> Self {
        self.0.push(PropertyValue {
            name,
            value: value.map(|value| value.to_string()),
            type_name,
        });
        self
    }

    fn with_span(self, span: &Span) -> Self {
        self.with("span", "Range", format!("{}..{}", span.start, span.end))
    }

    fn finish(self) -> Vec<PropertyValue> {
        self.0
    }
}

fn type_list(types: &[TypeName]) -> String {
    types
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

// region: declarations

impl Inspect for ClassNode {
    fn kind(&self) -> NodeKind {
        NodeKind::ClassNode
    }

    fn properties(&self) -> Vec<PropertyValue> {
        PropertyList::default()
            .with("name", "String", &self.name)
            .with("modifiers", "String", self.modifiers)
            .with("super_class", "ClassNode", &self.super_class)
            .with("interfaces", "ClassNode[]", type_list(&self.interfaces))
            .with("script", "boolean", self.is_script)
            .with("generated", "boolean", self.generated)
            .with_span(&self.span)
            .finish()
    }
}

impl Inspect for ConstructorNode {
    fn kind(&self) -> NodeKind {
        NodeKind::ConstructorNode
    }

    fn properties(&self) -> Vec<PropertyValue> {
        PropertyList::default()
            .with("name", "String", "<init>")
            .with("modifiers", "String", self.modifiers)
            .with("parameters", "Parameter[]", text::parameter_list(&self.parameters))
            .with("synthetic", "boolean", self.synthetic)
            .with("has_code", "boolean", self.code.is_some())
            .with_span(&self.span)
            .finish()
    }
}

impl Inspect for MethodNode {
    fn kind(&self) -> NodeKind {
        NodeKind::MethodNode
    }

    fn properties(&self) -> Vec<PropertyValue> {
        PropertyList::default()
            .with("name", "String", &self.name)
            .with("modifiers", "String", self.modifiers)
            .with("return_type", "ClassNode", &self.return_type)
            .with("parameters", "Parameter[]", text::parameter_list(&self.parameters))
            .with_optional(
                "variable_scope",
                "VariableScope",
                self.variable_scope.as_ref().map(|names| names.join(", ")),
            )
            .with("synthetic", "boolean", self.synthetic)
            .with("abstract", "boolean", self.code.is_none())
            .with_span(&self.span)
            .finish()
    }
}

impl Inspect for FieldNode {
    fn kind(&self) -> NodeKind {
        NodeKind::FieldNode
    }

    fn properties(&self) -> Vec<PropertyValue> {
        PropertyList::default()
            .with("name", "String", &self.name)
            .with("modifiers", "String", self.modifiers)
            .with("type", "ClassNode", &self.field_type)
            .with("owner", "ClassNode", &self.owner)
            .with_optional(
                "initial_expression",
                "Expression",
                self.initial_expression.as_ref(),
            )
            .with_span(&self.span)
            .finish()
    }
}

impl Inspect for PropertyNode {
    fn kind(&self) -> NodeKind {
        NodeKind::PropertyNode
    }

    fn properties(&self) -> Vec<PropertyValue> {
        PropertyList::default()
            .with("name", "String", &self.name)
            .with("modifiers", "String", self.modifiers)
            .with("type", "ClassNode", &self.property_type)
            .with_optional("getter_name", "String", self.getter_name.as_ref())
            .with_optional("setter_name", "String", self.setter_name.as_ref())
            .with_span(&self.span)
            .finish()
    }
}

impl Inspect for AnnotationNode {
    fn kind(&self) -> NodeKind {
        NodeKind::AnnotationNode
    }

    fn properties(&self) -> Vec<PropertyValue> {
        PropertyList::default()
            .with("class_name", "ClassNode", &self.class_name)
            .with_optional("resolved", "String", self.class_name.resolved.as_ref())
            .with("members", "Map", text::annotation_members(self))
            .with_span(&self.span)
            .finish()
    }
}

// endregion

// region: statements

impl Inspect for Statement {
    fn kind(&self) -> NodeKind {
        match &self.node {
            Stmt::Block(_) => NodeKind::BlockStatement,
            Stmt::Expression(_) => NodeKind::ExpressionStatement,
            Stmt::Return(_) => NodeKind::ReturnStatement,
            Stmt::Assert(_) => NodeKind::AssertStatement,
            Stmt::For(_) => NodeKind::ForStatement,
            Stmt::While(_) => NodeKind::WhileStatement,
            Stmt::DoWhile(_) => NodeKind::DoWhileStatement,
            Stmt::If(_) => NodeKind::IfStatement,
            Stmt::TryCatch(_) => NodeKind::TryCatchStatement,
            Stmt::Switch(_) => NodeKind::SwitchStatement,
            Stmt::Break => NodeKind::BreakStatement,
            Stmt::Continue => NodeKind::ContinueStatement,
            Stmt::Synchronized(_) => NodeKind::SynchronizedStatement,
            Stmt::Throw(_) => NodeKind::ThrowStatement,
            Stmt::Empty => NodeKind::EmptyStatement,
        }
    }

    fn properties(&self) -> Vec<PropertyValue> {
        let properties = PropertyList::default()
            .with("text", "String", self)
            .with_span(&self.span);

        match &self.node {
            Stmt::Block(block) => properties
                .with("statement_count", "int", block.statements.len())
                .with_optional(
                    "declared_variables",
                    "VariableScope",
                    block.declared_variables.as_ref().map(|names| names.join(", ")),
                ),
            Stmt::Expression(expression) => {
                properties.with("expression_kind", "String", expression.kind())
            }
            Stmt::Return(expression) => properties.with(
                "return_null",
                "boolean",
                matches!(expression.node, Expr::Constant(Constant::Null)),
            ),
            Stmt::For(for_loop) => properties
                .with_optional(
                    "variable",
                    "Parameter",
                    for_loop.variable.as_ref().map(|variable| &variable.name),
                )
                .with_optional(
                    "variable_type",
                    "ClassNode",
                    for_loop.variable.as_ref().map(|variable| &variable.param_type),
                ),
            Stmt::TryCatch(try_catch) => properties
                .with("catch_count", "int", try_catch.catches.len())
                .with("has_finally", "boolean", !try_catch.finally_block.is_empty()),
            Stmt::Switch(switch) => properties
                .with("case_count", "int", switch.cases.len())
                .with("has_default", "boolean", !switch.default.is_empty()),
            Stmt::If(if_else) => {
                properties.with("has_else", "boolean", !if_else.else_block.is_empty())
            }
            Stmt::Assert(_)
            | Stmt::While(_)
            | Stmt::DoWhile(_)
            | Stmt::Synchronized(_)
            | Stmt::Throw(_)
            | Stmt::Break
            | Stmt::Continue
            | Stmt::Empty => properties,
        }
        .finish()
    }
}

impl Inspect for CatchStatement {
    fn kind(&self) -> NodeKind {
        NodeKind::CatchStatement
    }

    fn properties(&self) -> Vec<PropertyValue> {
        PropertyList::default()
            .with("text", "String", self)
            .with("exception_type", "ClassNode", &self.variable.param_type)
            .with("variable", "Parameter", &self.variable.name)
            .with_span(&self.span)
            .finish()
    }
}

impl Inspect for CaseStatement {
    fn kind(&self) -> NodeKind {
        NodeKind::CaseStatement
    }

    fn properties(&self) -> Vec<PropertyValue> {
        PropertyList::default()
            .with("text", "String", self)
            .with("expression", "Expression", &self.expression)
            .with_span(&self.span)
            .finish()
    }
}

// endregion

// region: expressions

impl Inspect for Expression {
    fn kind(&self) -> NodeKind {
        match &self.node {
            Expr::MethodCall(_) => NodeKind::MethodCallExpression,
            Expr::StaticMethodCall(_) => NodeKind::StaticMethodCallExpression,
            Expr::ConstructorCall(_) => NodeKind::ConstructorCallExpression,
            Expr::Binary(_) => NodeKind::BinaryExpression,
            Expr::Declaration(_) => NodeKind::DeclarationExpression,
            Expr::Ternary(_) => NodeKind::TernaryExpression,
            Expr::Elvis(_) => NodeKind::ElvisOperatorExpression,
            Expr::Postfix(_) => NodeKind::PostfixExpression,
            Expr::Prefix(_) => NodeKind::PrefixExpression,
            Expr::Boolean(_) => NodeKind::BooleanExpression,
            Expr::Not(_) => NodeKind::NotExpression,
            Expr::Closure(_) => NodeKind::ClosureExpression,
            Expr::Tuple(_) => NodeKind::TupleExpression,
            Expr::ArgumentList(_) => NodeKind::ArgumentListExpression,
            Expr::List(_) => NodeKind::ListExpression,
            Expr::ClosureList(_) => NodeKind::ClosureListExpression,
            Expr::Array(_) => NodeKind::ArrayExpression,
            Expr::Map(_) => NodeKind::MapExpression,
            Expr::NamedArgumentList(_) => NodeKind::NamedArgumentListExpression,
            Expr::MapEntry(_) => NodeKind::MapEntryExpression,
            Expr::Range(_) => NodeKind::RangeExpression,
            Expr::Spread(_) => NodeKind::SpreadExpression,
            Expr::SpreadMap(_) => NodeKind::SpreadMapExpression,
            Expr::MethodPointer(_) => NodeKind::MethodPointerExpression,
            Expr::UnaryMinus(_) => NodeKind::UnaryMinusExpression,
            Expr::UnaryPlus(_) => NodeKind::UnaryPlusExpression,
            Expr::BitwiseNegation(_) => NodeKind::BitwiseNegationExpression,
            Expr::Cast(_) => NodeKind::CastExpression,
            Expr::Constant(_) => NodeKind::ConstantExpression,
            Expr::Class(_) => NodeKind::ClassExpression,
            Expr::Variable(_) => NodeKind::VariableExpression,
            Expr::Property(_) => NodeKind::PropertyExpression,
            Expr::Attribute(_) => NodeKind::AttributeExpression,
            Expr::Field(_) => NodeKind::FieldExpression,
            Expr::Regex(_) => NodeKind::RegexExpression,
            Expr::GString(_) => NodeKind::GStringExpression,
            Expr::Bytecode(_) => NodeKind::BytecodeExpression,
            Expr::Empty => NodeKind::EmptyExpression,
        }
    }

    fn properties(&self) -> Vec<PropertyValue> {
        let properties = PropertyList::default()
            .with("text", "String", self)
            .with_optional("inferred_type", "ClassNode", self.inferred_type.as_ref())
            .with_span(&self.span);

        match &self.node {
            Expr::MethodCall(call) => properties
                .with("method", "String", &call.method)
                .with("safe", "boolean", call.safe)
                .with("implicit_this", "boolean", call.implicit_this),
            Expr::StaticMethodCall(call) => properties
                .with("owner_type", "ClassNode", &call.owner_type)
                .with("method", "String", &call.method),
            Expr::ConstructorCall(call) => properties
                .with("type", "ClassNode", &call.target)
                .with_optional("resolved_type", "String", call.target.resolved.as_ref())
                .with_optional("special_call", "String", call.special),
            Expr::Binary(binary) | Expr::Declaration(binary) => {
                properties.with("operation", "Token", &binary.operation)
            }
            Expr::Postfix(operation) | Expr::Prefix(operation) => {
                properties.with("operation", "Token", &operation.operation)
            }
            Expr::Closure(closure) => properties.with_optional(
                "parameters",
                "Parameter[]",
                closure
                    .parameters
                    .as_ref()
                    .map(|parameters| text::parameter_list(parameters)),
            ),
            Expr::Tuple(expressions)
            | Expr::ArgumentList(expressions)
            | Expr::List(expressions)
            | Expr::ClosureList(expressions)
            | Expr::Map(expressions)
            | Expr::NamedArgumentList(expressions) => {
                properties.with("size", "int", expressions.len())
            }
            Expr::Array(array) => properties
                .with("element_type", "ClassNode", &array.element_type)
                .with("dynamic", "boolean", !array.size_expressions.is_empty()),
            Expr::Range(range) => properties.with("inclusive", "boolean", range.inclusive),
            Expr::MethodPointer(pointer) => {
                properties.with("method_name", "String", &pointer.method_name)
            }
            Expr::Cast(cast) => properties
                .with("type", "ClassNode", &cast.target)
                .with_optional("resolved_type", "String", cast.target.resolved.as_ref())
                .with("coerce", "boolean", cast.coerce),
            Expr::Constant(constant) => properties
                .with("value", "Object", constant)
                .with("constant_type", "ClassNode", constant.type_name()),
            Expr::Class(class_type) => properties
                .with("type", "ClassNode", class_type)
                .with_optional("resolved_type", "String", class_type.resolved.as_ref()),
            Expr::Variable(variable) => properties
                .with("name", "String", &variable.name)
                .with_optional("declared_type", "ClassNode", variable.declared_type.as_ref())
                .with_optional("origin", "Variable", variable.origin),
            Expr::Property(property) | Expr::Attribute(property) => properties
                .with("property", "String", &property.property)
                .with("safe", "boolean", property.safe)
                .with("spread_safe", "boolean", property.spread_safe),
            Expr::Field(field) => properties
                .with("field_name", "String", &field.field)
                .with("owner", "ClassNode", &field.owner),
            Expr::GString(gstring) => properties
                .with("verbatim_text", "String", text::gstring_verbatim(gstring))
                .with("value_count", "int", gstring.values.len()),
            Expr::Bytecode(instructions) => properties
                .with("instruction_count", "int", instructions.len())
                .with("instructions", "String", instructions.join("; ")),
            Expr::Ternary(_)
            | Expr::Elvis(_)
            | Expr::Boolean(_)
            | Expr::Not(_)
            | Expr::MapEntry(_)
            | Expr::Spread(_)
            | Expr::SpreadMap(_)
            | Expr::UnaryMinus(_)
            | Expr::UnaryPlus(_)
            | Expr::BitwiseNegation(_)
            | Expr::Regex(_)
            | Expr::Empty => properties,
        }
        .finish()
    }
}

// endregion
