//! Source-like text of AST nodes, as shown in node labels
//! and property tables.

use std::fmt::{self, Display, Formatter};

#[allow(clippy::wildcard_imports)]
use super::ast::*;

fn join<T: Display>(items: &[T], separator: &str) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(separator)
}

// region: declarations

impl Display for TypeName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, "[]".repeat(self.dimensions))
    }
}

impl Display for Parameter {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.param_type, self.name)?;
        if let Some(default_value) = &self.default_value {
            write!(f, " = {default_value}")?;
        }
        Ok(())
    }
}

impl Display for Modifiers {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut words = vec![];
        if let Some(visibility) = self.visibility {
            words.push(visibility.to_string());
        }
        for (set, word) in [
            (self.is_abstract, "abstract"),
            (self.is_static, "static"),
            (self.is_final, "final"),
            (self.is_synchronized, "synchronized"),
        ] {
            if set {
                words.push(word.to_owned());
            }
        }
        write!(f, "{}", words.join(" "))
    }
}

/// `(int a, Object b)`
pub fn parameter_list(parameters: &[Parameter]) -> String {
    format!("({})", join(parameters, ", "))
}

/// `value: 1, name: "x"`
pub fn annotation_members(annotation: &AnnotationNode) -> String {
    annotation
        .members
        .iter()
        .map(|(name, value)| format!("{name}: {value}"))
        .collect::<Vec<_>>()
        .join(", ")
}

// endregion

// region: statements

impl Display for Statement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.node {
            Stmt::Block(block) => {
                if block.statements.is_empty() {
                    write!(f, "{{ }}")
                } else {
                    write!(f, "{{ {} }}", join(&block.statements, "; "))
                }
            }
            Stmt::Expression(expression) => write!(f, "{expression}"),
            Stmt::Return(expression) => write!(f, "return {expression}"),
            Stmt::Assert(assert) => write!(f, "assert {} : {}", assert.condition, assert.message),
            Stmt::For(for_loop) => match &for_loop.variable {
                Some(variable) => write!(
                    f,
                    "for ({} in {}) {}",
                    variable.name, for_loop.collection, for_loop.body
                ),
                None => write!(f, "for {} {}", for_loop.collection, for_loop.body),
            },
            Stmt::While(while_loop) => {
                write!(f, "while ({}) {}", while_loop.condition, while_loop.body)
            }
            Stmt::DoWhile(do_while) => {
                write!(f, "do {} while ({})", do_while.body, do_while.condition)
            }
            Stmt::If(if_else) => {
                write!(f, "if ({}) {}", if_else.condition, if_else.if_block)?;
                if !if_else.else_block.is_empty() {
                    write!(f, " else {}", if_else.else_block)?;
                }
                Ok(())
            }
            Stmt::TryCatch(try_catch) => {
                write!(f, "try {}", try_catch.try_block)?;
                for catch in &try_catch.catches {
                    write!(f, " {catch}")?;
                }
                if !try_catch.finally_block.is_empty() {
                    write!(f, " finally {}", try_catch.finally_block)?;
                }
                Ok(())
            }
            Stmt::Switch(switch) => {
                write!(f, "switch ({}) {{ ", switch.expression)?;
                for case in &switch.cases {
                    write!(f, "{case} ")?;
                }
                if !switch.default.is_empty() {
                    write!(f, "default: {} ", switch.default)?;
                }
                write!(f, "}}")
            }
            Stmt::Break => write!(f, "break"),
            Stmt::Continue => write!(f, "continue"),
            Stmt::Synchronized(synchronized) => {
                write!(f, "synchronized ({}) {}", synchronized.lock, synchronized.code)
            }
            Stmt::Throw(expression) => write!(f, "throw {expression}"),
            Stmt::Empty => Ok(()),
        }
    }
}

impl Display for CatchStatement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "catch ({}) {}", self.variable, self.code)
    }
}

impl Display for CaseStatement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "case {}: {}", self.expression, self.code)
    }
}

// endregion

// region: expressions

impl Display for Constant {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Decimal(d) => write!(f, "{d:?}"),
            Self::String(s) => write!(f, "{s}"),
        }
    }
}

impl Display for Expression {
    #[allow(clippy::too_many_lines)]
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.node {
            Expr::MethodCall(call) => {
                let separator = if call.safe { "?." } else { "." };
                write!(
                    f,
                    "{}{separator}{}{}",
                    call.object, call.method, call.arguments
                )
            }
            Expr::StaticMethodCall(call) => {
                write!(f, "{}.{}{}", call.owner_type, call.method, call.arguments)
            }
            Expr::ConstructorCall(call) => match call.special {
                Some(special) => write!(f, "{special}{}", call.arguments),
                None => write!(f, "new {}{}", call.target, call.arguments),
            },
            Expr::Binary(binary) if binary.operation == "[" => {
                write!(f, "{}[{}]", binary.left, binary.right)
            }
            Expr::Binary(binary) => {
                write!(f, "({} {} {})", binary.left, binary.operation, binary.right)
            }
            Expr::Declaration(declaration) => {
                let declared_type = match &declaration.left.node {
                    Expr::Variable(VariableExpression {
                        declared_type: Some(declared_type),
                        ..
                    }) => declared_type.to_string(),
                    _ => "def".to_owned(),
                };
                write!(f, "{declared_type} {}", declaration.left)?;
                if !matches!(declaration.right.node, Expr::Empty) {
                    write!(f, " = {}", declaration.right)?;
                }
                Ok(())
            }
            Expr::Ternary(ternary) => write!(
                f,
                "({}) ? {} : {}",
                ternary.condition, ternary.true_expression, ternary.false_expression
            ),
            Expr::Elvis(elvis) => {
                write!(f, "{} ?: {}", elvis.true_expression, elvis.false_expression)
            }
            Expr::Postfix(postfix) => write!(f, "({}{})", postfix.expression, postfix.operation),
            Expr::Prefix(prefix) => write!(f, "({}{})", prefix.operation, prefix.expression),
            Expr::Boolean(expression) => write!(f, "{expression}"),
            Expr::Not(expression) => write!(f, "!({expression})"),
            Expr::Closure(closure) => match &closure.parameters {
                Some(parameters) => write!(
                    f,
                    "{{ {} -> {} }}",
                    join(parameters, ", "),
                    closure_body(&closure.code)
                ),
                None => write!(f, "{{ {} }}", closure_body(&closure.code)),
            },
            Expr::Tuple(expressions) | Expr::ArgumentList(expressions) => {
                write!(f, "({})", join(expressions, ", "))
            }
            Expr::List(expressions) => write!(f, "[{}]", join(expressions, ", ")),
            Expr::ClosureList(expressions) => write!(f, "({})", join(expressions, "; ")),
            Expr::Array(array) => {
                if array.size_expressions.is_empty() {
                    write!(
                        f,
                        "[{}] as {}[]",
                        join(&array.expressions, ", "),
                        array.element_type
                    )
                } else {
                    write!(f, "new {}", array.element_type)?;
                    for size in &array.size_expressions {
                        write!(f, "[{size}]")?;
                    }
                    Ok(())
                }
            }
            Expr::Map(entries) | Expr::NamedArgumentList(entries) => {
                if entries.is_empty() {
                    write!(f, "[:]")
                } else {
                    write!(f, "[{}]", join(entries, ", "))
                }
            }
            Expr::MapEntry(entry) => write!(f, "{}:{}", entry.key, entry.value),
            Expr::Range(range) => {
                let operator = if range.inclusive { ".." } else { "..<" };
                write!(f, "({}{operator}{})", range.from, range.to)
            }
            Expr::Spread(expression) => write!(f, "*{expression}"),
            Expr::SpreadMap(expression) => write!(f, "*:{expression}"),
            Expr::MethodPointer(pointer) => {
                write!(f, "{}.&{}", pointer.expression, pointer.method_name)
            }
            Expr::UnaryMinus(expression) => write!(f, "-({expression})"),
            Expr::UnaryPlus(expression) => write!(f, "+({expression})"),
            Expr::BitwiseNegation(expression) => write!(f, "~({expression})"),
            Expr::Cast(cast) => {
                if cast.coerce {
                    write!(f, "{} as {}", cast.expression, cast.target)
                } else {
                    write!(f, "({}) {}", cast.target, cast.expression)
                }
            }
            Expr::Constant(constant) => write!(f, "{constant}"),
            Expr::Class(class_type) => write!(f, "{class_type}"),
            Expr::Variable(variable) => write!(f, "{}", variable.name),
            Expr::Property(property) => {
                let separator = match (property.safe, property.spread_safe) {
                    (_, true) => "*.",
                    (true, false) => "?.",
                    (false, false) => ".",
                };
                write!(f, "{}{separator}{}", property.object, property.property)
            }
            Expr::Attribute(attribute) => {
                write!(f, "{}.@{}", attribute.object, attribute.property)
            }
            Expr::Field(field) => write!(f, "this.@{}", field.field),
            Expr::Regex(pattern) => write!(f, "~/{pattern}/"),
            Expr::GString(gstring) => write!(f, "\"{}\"", gstring_verbatim(gstring)),
            Expr::Bytecode(instructions) => {
                write!(f, "<bytecode sequence: {} instructions>", instructions.len())
            }
            Expr::Empty => Ok(()),
        }
    }
}

fn closure_body(code: &Statement) -> String {
    match &code.node {
        Stmt::Block(block) => join(&block.statements, "; "),
        _ => code.to_string(),
    }
}

/// Re-assemble the literal text of an interpolated string.
pub fn gstring_verbatim(gstring: &GStringExpression) -> String {
    let mut verbatim = String::new();
    for (i, fragment) in gstring.strings.iter().enumerate() {
        verbatim.push_str(&fragment.to_string());
        if let Some(value) = gstring.values.get(i) {
            verbatim.push_str(&format!("${{{value}}}"));
        }
    }
    verbatim
}

// endregion

#[cfg(test)]
mod tests {
    use super::*;

    fn binary(left: Expression, operation: &str, right: Expression) -> Expression {
        Expression::internal(Expr::Binary(BinaryExpression {
            left: left.boxed(),
            operation: operation.to_owned(),
            right: right.boxed(),
        }))
    }

    #[test]
    fn test_binary_text() {
        let expression = binary(
            Expression::variable("x"),
            "=",
            Expression::constant(Constant::Integer(1)),
        );

        assert_eq!(expression.to_string(), "(x = 1)");
    }

    #[test]
    fn test_index_text() {
        let expression = binary(
            Expression::variable("xs"),
            "[",
            Expression::constant(Constant::Integer(0)),
        );

        assert_eq!(expression.to_string(), "xs[0]");
    }

    #[test]
    fn test_declaration_text() {
        let mut variable = VariableExpression::new("count");
        variable.declared_type = Some(TypeName::new("int"));

        let declaration = Expression::internal(Expr::Declaration(BinaryExpression {
            left: Expression::internal(Expr::Variable(variable)).boxed(),
            operation: "=".to_owned(),
            right: Expression::internal(Expr::Empty).boxed(),
        }));

        assert_eq!(declaration.to_string(), "int count");
    }

    #[test]
    fn test_gstring_verbatim() {
        let gstring = GStringExpression {
            strings: vec![
                Expression::constant(Constant::String("hello ".to_owned())),
                Expression::constant(Constant::String("!".to_owned())),
            ],
            values: vec![Expression::variable("name")],
        };

        assert_eq!(gstring_verbatim(&gstring), "hello ${name}!");
    }

    #[test]
    fn test_modifiers_text() {
        let modifiers = Modifiers::private().with_static();

        assert_eq!(modifiers.to_string(), "private static");
    }
}
