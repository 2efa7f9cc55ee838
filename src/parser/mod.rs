//! Logic for parsing raw script source
//! into an AST.

use chumsky::prelude::*;
use phf::phf_set;

#[allow(clippy::wildcard_imports)]
use crate::common::ast::*;

mod declaration;
mod expression;
mod statement;

pub type ParseError = Simple<char>;

type BoxedParser<O> = chumsky::BoxedParser<'static, char, O, ParseError>;

/// Words that can never be used as identifiers.
static KEYWORDS: phf::Set<&'static str> = phf_set! {
    "abstract", "as", "assert", "break", "case", "catch", "class", "continue",
    "def", "default", "do", "else", "extends", "false", "final", "finally",
    "for", "if", "implements", "in", "instanceof", "new", "null", "private",
    "protected", "public", "return", "static", "super", "switch",
    "synchronized", "this", "throw", "true", "try", "while",
};

/// Parse a whole script into its statements, top-level methods and classes.
pub fn parse_module(source: &str) -> Result<ParsedModule, Vec<ParseError>> {
    module().parse(source)
}

enum Item {
    Class(ParsedClass),
    Method(MethodNode),
    Statement(Statement),
}

/// Construct the parser for a script (file).
fn module() -> impl Parser<char, ParsedModule, Error = ParseError> {
    let statement = statement::statement();

    let item = declaration::class(statement.clone())
        .map(Item::Class)
        .or(declaration::method(statement.clone()).map(Item::Method))
        .or(statement.map(Item::Statement));

    whitespace()
        .ignore_then(item.repeated())
        .then_ignore(end())
        .map(|items| {
            let mut module = ParsedModule {
                statements: vec![],
                methods: vec![],
                classes: vec![],
            };

            for item in items {
                match item {
                    Item::Class(class) => module.classes.push(class),
                    Item::Method(method) => module.methods.push(method),
                    Item::Statement(statement) => module.statements.push(statement),
                }
            }

            module
        })
}

// region: lexical helpers

fn whitespace() -> impl Parser<char, (), Error = ParseError> + Clone {
    let line_comment = just("//")
        .then(take_until(text::newline().or(end())))
        .ignored();
    let block_comment = just("/*").then(take_until(just("*/"))).ignored();

    filter(|c: &char| c.is_whitespace())
        .ignored()
        .or(line_comment)
        .or(block_comment)
        .repeated()
        .ignored()
}

fn token<O, P>(parser: P) -> impl Parser<char, O, Error = ParseError> + Clone
where
    P: Parser<char, O, Error = ParseError> + Clone,
{
    parser.padded_by(whitespace())
}

fn symbol(symbol: &'static str) -> impl Parser<char, &'static str, Error = ParseError> + Clone {
    token(just(symbol))
}

fn keyword(keyword: &'static str) -> impl Parser<char, (), Error = ParseError> + Clone {
    token(text::keyword(keyword))
}

fn identifier() -> impl Parser<char, String, Error = ParseError> + Clone {
    token(text::ident().try_map(|name: String, span| {
        if KEYWORDS.contains(name.as_str()) {
            Err(Simple::custom(
                span,
                format!("`{name}` is a keyword and cannot be used as a name"),
            ))
        } else {
            Ok(name)
        }
    }))
}

/// `Foo`, `a.b.Foo`, `Map<String, List<Integer>>`; generic arguments are not retained.
fn class_type() -> BoxedParser<TypeName> {
    recursive(|class_type: Recursive<'static, char, TypeName, ParseError>| {
        let type_arguments = class_type
            .separated_by(symbol(","))
            .delimited_by(symbol("<"), symbol(">"));

        identifier()
            .then(just('.').ignore_then(identifier()).repeated())
            .then_ignore(type_arguments.or_not())
            .map(|(head, tail)| {
                let segments: Vec<_> = std::iter::once(head).chain(tail).collect();
                TypeName::new(segments.join("."))
            })
    })
    .boxed()
}

/// A class type, optionally followed by array dimensions (`int[][]`).
fn type_name() -> BoxedParser<TypeName> {
    class_type()
        .then(symbol("[").then(symbol("]")).repeated())
        .map(|(type_name, dimensions)| type_name.array_of(dimensions.len()))
        .boxed()
}

fn escape() -> impl Parser<char, char, Error = ParseError> + Clone {
    just('\\').ignore_then(choice((
        just('n').to('\n'),
        just('t').to('\t'),
        just('r').to('\r'),
        just('\\'),
        just('\''),
        just('"'),
        just('$'),
    )))
}

fn single_quoted_string() -> impl Parser<char, String, Error = ParseError> + Clone {
    just('\'')
        .ignore_then(
            filter(|c: &char| *c != '\'' && *c != '\\')
                .or(escape())
                .repeated(),
        )
        .then_ignore(just('\''))
        .collect::<String>()
}

// endregion

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    use super::*;

    fn only_statement(source: &str) -> Statement {
        let module = parse_module(source).expect("source should parse");
        assert_eq!(module.statements.len(), 1, "expected a single statement");
        module.statements.into_iter().next().expect("checked above")
    }

    fn only_expression(source: &str) -> Expression {
        match only_statement(source).node {
            Stmt::Expression(expression) => *expression,
            other => panic!("expected an expression statement, got {other:?}"),
        }
    }

    #[test]
    fn test_assignment() {
        let expression = only_expression("x = 1");

        assert_eq!(expression.to_string(), "(x = 1)");
        assert!(matches!(expression.node, Expr::Binary(_)));
    }

    #[test]
    fn test_operator_precedence() {
        let expression = only_expression("a + b * c - d");

        assert_eq!(expression.to_string(), "((a + (b * c)) - d)");
    }

    #[test]
    fn test_declaration() {
        let expression = only_expression("int count = 3");

        assert!(matches!(expression.node, Expr::Declaration(_)));
        assert_eq!(expression.to_string(), "int count = 3");
    }

    #[test]
    fn test_untyped_declaration_without_value() {
        let expression = only_expression("def x");

        match expression.node {
            Expr::Declaration(declaration) => {
                assert!(matches!(declaration.right.node, Expr::Empty));
            }
            other => panic!("expected a declaration, got {other:?}"),
        }
    }

    #[test]
    fn test_method_call_arguments() {
        let expression = only_expression("println(1, 2)");

        match expression.node {
            Expr::MethodCall(call) => {
                assert!(call.implicit_this);
                assert_eq!(call.method, "println");
                assert!(matches!(call.arguments.node, Expr::ArgumentList(ref args) if args.len() == 2));
            }
            other => panic!("expected a method call, got {other:?}"),
        }
    }

    #[test]
    fn test_named_arguments_are_wrapped_in_a_tuple() {
        let expression = only_expression("point.move(x: 1, y: 2)");

        match expression.node {
            Expr::MethodCall(call) => match call.arguments.node {
                Expr::Tuple(arguments) => {
                    assert_eq!(arguments.len(), 1);
                    assert!(matches!(arguments[0].node, Expr::NamedArgumentList(_)));
                }
                other => panic!("expected a tuple, got {other:?}"),
            },
            other => panic!("expected a method call, got {other:?}"),
        }
    }

    #[test]
    fn test_trailing_closure() {
        let expression = only_expression("items.each { println(it) }");

        match expression.node {
            Expr::MethodCall(call) => match call.arguments.node {
                Expr::ArgumentList(arguments) => {
                    assert!(matches!(arguments[0].node, Expr::Closure(ref closure) if closure.parameters.is_none()));
                }
                other => panic!("expected an argument list, got {other:?}"),
            },
            other => panic!("expected a method call, got {other:?}"),
        }
    }

    #[test]
    fn test_elvis_and_ternary() {
        assert!(matches!(only_expression("a ?: b").node, Expr::Elvis(_)));
        assert!(matches!(only_expression("a ? b : c").node, Expr::Ternary(_)));
    }

    #[test]
    fn test_map_and_list_literals() {
        assert!(matches!(only_expression("[a: 1, b: 2]").node, Expr::Map(ref entries) if entries.len() == 2));
        assert!(matches!(only_expression("[:]").node, Expr::Map(ref entries) if entries.is_empty()));
        assert!(matches!(only_expression("[1, *rest]").node, Expr::List(ref items) if items.len() == 2));
    }

    #[test]
    fn test_range() {
        match only_expression("1..<10").node {
            Expr::Range(range) => assert!(!range.inclusive),
            other => panic!("expected a range, got {other:?}"),
        }
    }

    #[test]
    fn test_gstring_interpolation() {
        match only_expression(r#""hello ${name}, you are $person.age""#).node {
            Expr::GString(gstring) => {
                assert_eq!(gstring.values.len(), 2);
                assert_eq!(gstring.strings.len(), 3);
                assert!(matches!(gstring.values[1].node, Expr::Property(_)));
            }
            other => panic!("expected a gstring, got {other:?}"),
        }
    }

    #[test]
    fn test_plain_double_quoted_string_is_a_constant() {
        assert!(matches!(
            only_expression(r#""plain""#).node,
            Expr::Constant(Constant::String(ref s)) if s == "plain"
        ));
    }

    #[test]
    fn test_regex_and_bitwise_negation() {
        assert!(matches!(only_expression("~/a+b/").node, Expr::Regex(_)));
        assert!(matches!(only_expression("~mask").node, Expr::BitwiseNegation(_)));
    }

    #[test]
    fn test_class_literal_and_casts() {
        assert!(matches!(only_expression("String.class").node, Expr::Class(_)));
        assert!(matches!(only_expression("(int) x").node, Expr::Cast(ref cast) if !cast.coerce));
        assert!(matches!(only_expression("x as String").node, Expr::Cast(ref cast) if cast.coerce));
    }

    #[test]
    fn test_member_access_forms() {
        assert!(matches!(only_expression("a.b").node, Expr::Property(_)));
        assert!(matches!(only_expression("a.@b").node, Expr::Attribute(_)));
        assert!(matches!(only_expression("a.&b").node, Expr::MethodPointer(_)));
        assert!(matches!(only_expression("a?.b()").node, Expr::MethodCall(ref call) if call.safe));
        assert!(matches!(only_expression("a[0]").node, Expr::Binary(ref binary) if binary.operation == "["));
    }

    #[test]
    fn test_constructor_calls() {
        assert!(matches!(only_expression("new Foo(1)").node, Expr::ConstructorCall(_)));
        assert!(matches!(only_expression("new int[3]").node, Expr::Array(_)));
    }

    #[test]
    fn test_classic_for_uses_closure_list() {
        match only_statement("for (int i = 0; i < 3; i++) { }").node {
            Stmt::For(for_loop) => {
                assert!(for_loop.variable.is_none());
                assert!(matches!(for_loop.collection.node, Expr::ClosureList(ref parts) if parts.len() == 3));
            }
            other => panic!("expected a for loop, got {other:?}"),
        }
    }

    #[test]
    fn test_control_flow_statements() {
        let source = indoc! {"
            if (a) { b() } else { c() }
            while (x < 3) { x++ }
            do { x-- } while (x > 0)
            for (item in items) { break }
            try { risky() } catch (IOException e) { throw e } finally { done() }
            switch (x) { case 1: one(); break; default: other() }
            synchronized (lock) { counter++ }
            assert x : 'message'
            return x
        "};

        let module = parse_module(source).expect("source should parse");
        let kinds: Vec<_> = module
            .statements
            .iter()
            .map(|statement| std::mem::discriminant(&statement.node))
            .collect();

        assert_eq!(kinds.len(), 9);
    }

    #[test]
    fn test_comments_are_skipped() {
        let source = indoc! {"
            // leading comment
            x = 1 /* inline */ + 2
        "};

        assert_eq!(only_expression(source).to_string(), "(x = (1 + 2))");
    }

    #[test]
    fn test_classes_and_methods() {
        let source = indoc! {"
            @Immutable
            class Point {
                int x = 0
                private int secret
                Point(int x) { this.x = x }
                def norm() { x * x }
            }

            def helper(a, b = 2) { a + b }

            helper(1)
        "};

        let module = parse_module(source).expect("source should parse");

        assert_eq!(module.classes.len(), 1);
        assert_eq!(module.methods.len(), 1);
        assert_eq!(module.statements.len(), 1);

        let point = &module.classes[0];
        assert_eq!(point.annotations.len(), 1);
        assert_eq!(point.members.len(), 4);
        assert!(matches!(point.members[0], ClassMember::Property(_)));
        assert!(matches!(point.members[1], ClassMember::Field(_)));
        assert!(matches!(point.members[2], ClassMember::Constructor(_, _)));
        assert!(matches!(point.members[3], ClassMember::Method(_)));
    }

    #[test]
    fn test_syntax_error() {
        assert!(parse_module("x = (1 + ").is_err());
    }

    #[test]
    fn test_keyword_is_not_an_identifier() {
        assert!(parse_module("def class = 1").is_err());
    }
}
