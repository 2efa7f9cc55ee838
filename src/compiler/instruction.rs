//! Record the statically known type of every expression
//! where it can be told without running the script.

#[allow(clippy::wildcard_imports)]
use crate::common::ast::*;
use crate::common::visit::{walk_expression_mut, walk_statement_mut, CodeVisitorMut};

const NUMERIC_TYPES: [&str; 5] = ["int", "long", "double", "BigDecimal", "Integer"];

pub fn infer_types(module: &mut ModuleNode) {
    let mut inference = TypeInference;

    for class in &mut module.classes {
        for field in &mut class.fields {
            if let Some(initial_expression) = &mut field.initial_expression {
                inference.visit_expression_mut(initial_expression);
            }
        }

        let constructor_code = class
            .constructors
            .iter_mut()
            .filter_map(|constructor| constructor.code.as_mut());
        let method_code = class
            .methods
            .iter_mut()
            .filter_map(|method| method.code.as_mut());

        for code in constructor_code.chain(method_code) {
            inference.visit_statement_mut(code);
        }
    }
}

fn display_type(type_name: &TypeName) -> String {
    type_name.to_string()
}

/// Result type of an arithmetic operation on two known types, if obvious.
fn arithmetic_type(operation: &str, left: Option<&str>, right: Option<&str>) -> Option<String> {
    match (operation, left?, right?) {
        ("+", "String", _) | ("+", _, "String") => Some("String".to_owned()),
        ("+" | "-" | "*" | "%", left, right) if left == right && NUMERIC_TYPES.contains(&left) => {
            Some(left.to_owned())
        }
        ("+" | "-" | "*" | "/", "BigDecimal", right) | ("+" | "-" | "*" | "/", right, "BigDecimal")
            if NUMERIC_TYPES.contains(&right) =>
        {
            Some("BigDecimal".to_owned())
        }
        ("/", "int", "int") => Some("BigDecimal".to_owned()),
        _ => None,
    }
}

struct TypeInference;

impl CodeVisitorMut for TypeInference {
    fn visit_statement_mut(&mut self, statement: &mut Statement) {
        walk_statement_mut(self, statement);
    }

    fn visit_expression_mut(&mut self, expression: &mut Expression) {
        // children first, so composite expressions can build on their types
        walk_expression_mut(self, expression);

        let inferred = match &expression.node {
            Expr::Constant(constant) => Some(constant.type_name().to_owned()),
            Expr::GString(_) => Some("GString".to_owned()),
            Expr::Regex(_) => Some("Pattern".to_owned()),
            Expr::List(_) => Some("List".to_owned()),
            Expr::Map(_) => Some("Map".to_owned()),
            Expr::Range(_) => Some("Range".to_owned()),
            Expr::Closure(_) => Some("Closure".to_owned()),
            Expr::Class(_) => Some("Class".to_owned()),
            Expr::Boolean(_) | Expr::Not(_) => Some("boolean".to_owned()),
            Expr::Cast(cast) => Some(display_type(&cast.target)),
            Expr::ConstructorCall(call) if call.special.is_none() => {
                Some(display_type(&call.target))
            }
            Expr::Array(array) => {
                let dimensions = array.element_type.dimensions
                    + array.size_expressions.len().max(1);
                Some(display_type(&array.element_type.clone().array_of(dimensions)))
            }
            Expr::Variable(variable) => variable.declared_type.as_ref().map(display_type),
            Expr::Declaration(declaration) => declaration.left.inferred_type.clone(),
            Expr::Binary(binary) => match binary.operation.as_str() {
                "==" | "!=" | "<" | "<=" | ">" | ">=" | "&&" | "||" | "in" | "instanceof"
                | "==~" => Some("boolean".to_owned()),
                "<=>" => Some("int".to_owned()),
                "=" => binary.right.inferred_type.clone(),
                operation => arithmetic_type(
                    operation,
                    binary.left.inferred_type.as_deref(),
                    binary.right.inferred_type.as_deref(),
                ),
            },
            Expr::UnaryMinus(operand) | Expr::UnaryPlus(operand) => operand.inferred_type.clone(),
            _ => None,
        };

        if inferred.is_some() {
            expression.inferred_type = inferred;
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{compiler::conversion::convert, parser::parse_module};

    fn inferred(source: &str) -> Vec<Option<String>> {
        let parsed = parse_module(source).expect("source should parse");
        let mut module = convert("Script1", parsed).expect("source should convert");
        infer_types(&mut module);

        match module.statement_block().map(|block| &block.node) {
            Some(Stmt::Block(block)) => block
                .statements
                .iter()
                .map(|statement| match &statement.node {
                    Stmt::Expression(expression) => expression.inferred_type.clone(),
                    _ => None,
                })
                .collect(),
            _ => panic!("script should have a statement block"),
        }
    }

    fn some(type_name: &str) -> Option<String> {
        Some(type_name.to_owned())
    }

    #[test]
    fn test_literals() {
        assert_eq!(
            inferred("1\n'a'\n\"x${y}\"\n[1, 2]\n[:]\n1..3\n{ -> 1 }\ntrue\n2.5"),
            vec![
                some("int"),
                some("String"),
                some("GString"),
                some("List"),
                some("Map"),
                some("Range"),
                some("Closure"),
                some("boolean"),
                some("BigDecimal"),
            ]
        );
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            inferred("1 + 2\n'a' + 1\n1 / 2\na < b\n!a\nx + y"),
            vec![
                some("int"),
                some("String"),
                some("BigDecimal"),
                some("boolean"),
                some("boolean"),
                None,
            ]
        );
    }

    #[test]
    fn test_declarations_and_constructors() {
        assert_eq!(
            inferred("(String) z\nint x = 1\ndef y = 2\nnew Date()\nnew int[3]"),
            vec![some("String"), some("int"), None, some("Date"), some("int[]")]
        );
    }
}
