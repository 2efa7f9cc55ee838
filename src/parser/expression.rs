//! Expression grammar, from literals up to assignments.

use chumsky::prelude::*;

#[allow(clippy::wildcard_imports)]
use crate::common::ast::*;

use super::{
    class_type, escape, identifier, keyword, single_quoted_string, symbol, token, type_name,
    BoxedParser, ParseError,
};

const PRIMITIVE_TYPES: [&str; 8] = [
    "boolean", "byte", "char", "short", "int", "long", "float", "double",
];

// region: helpers

fn binary(left: Expression, operation: &str, right: Expression) -> Expression {
    let span = left.span.start..right.span.end;
    Expression::new(
        Expr::Binary(BinaryExpression {
            left: left.boxed(),
            operation: operation.to_owned(),
            right: right.boxed(),
        }),
        span,
    )
}

/// Wrap a condition the way branching constructs expect it.
pub(super) fn boolean(condition: Expression) -> Expression {
    let span = condition.span.clone();
    Expression::new(Expr::Boolean(condition.boxed()), span)
}

/// Only primitives and capitalized names are treated as cast targets,
/// so `(x) - 1` stays a subtraction.
fn is_cast_target(target: &TypeName) -> bool {
    PRIMITIVE_TYPES.contains(&target.name.as_str())
        || target
            .name
            .rsplit('.')
            .next()
            .and_then(|simple_name| simple_name.chars().next())
            .is_some_and(char::is_uppercase)
}

/// Dotted name spelled by a chain of variables and property accesses (`a.b.C`).
fn type_reference(expression: &Expression) -> Option<String> {
    match &expression.node {
        Expr::Variable(variable) => Some(variable.name.clone()),
        Expr::Property(property) if !property.safe && !property.spread_safe => {
            Some(format!("{}.{}", type_reference(&property.object)?, property.property))
        }
        _ => None,
    }
}

// endregion

// region: literals

fn number() -> impl Parser<char, Constant, Error = ParseError> + Clone {
    text::int(10)
        .then(just('.').ignore_then(text::digits(10)).or_not())
        .try_map(
            |(integer, fraction): (String, Option<String>), span| match fraction {
                Some(fraction) => format!("{integer}.{fraction}")
                    .parse()
                    .map(Constant::Decimal)
                    .map_err(|_| Simple::custom(span, "invalid decimal literal")),
                None => integer.parse().map(Constant::Integer).map_err(|_| {
                    Simple::custom(span, format!("integer literal `{integer}` is out of range"))
                }),
            },
        )
}

#[derive(Clone)]
enum Fragment {
    Text(char),
    Value(Expression),
}

/// Double-quoted strings: a plain constant unless they interpolate
/// `${expression}` or `$name.path` values.
fn gstring<P>(expression: P) -> impl Parser<char, Expression, Error = ParseError> + Clone
where
    P: Parser<char, Expression, Error = ParseError> + Clone,
{
    let interpolation = just("${")
        .ignore_then(expression)
        .then_ignore(just('}'));

    let name = text::ident().map_with_span(|name: String, span| (name, span));
    let path = just('$')
        .ignore_then(name.clone())
        .map(|(name, span)| Expression::new(Expr::Variable(VariableExpression::new(name)), span))
        .then(just('.').ignore_then(name).repeated())
        .foldl(|object, (property, span): (String, Span)| {
            let span = object.span.start..span.end;
            Expression::new(
                Expr::Property(PropertyExpression {
                    object: object.boxed(),
                    property,
                    safe: false,
                    spread_safe: false,
                }),
                span,
            )
        });

    let fragment = choice((
        interpolation.map(Fragment::Value),
        path.map(Fragment::Value),
        escape().map(Fragment::Text),
        filter(|c: &char| *c != '"' && *c != '\\').map(Fragment::Text),
    ));

    just('"')
        .ignore_then(fragment.repeated())
        .then_ignore(just('"'))
        .map_with_span(|fragments, span: Span| {
            let mut strings = vec![];
            let mut values = vec![];
            let mut current = String::new();

            for fragment in fragments {
                match fragment {
                    Fragment::Text(c) => current.push(c),
                    Fragment::Value(value) => {
                        let text = Constant::String(std::mem::take(&mut current));
                        strings.push(Expression::new(Expr::Constant(text), span.clone()));
                        values.push(value);
                    }
                }
            }

            if values.is_empty() {
                return Expression::new(Expr::Constant(Constant::String(current)), span);
            }

            strings.push(Expression::new(
                Expr::Constant(Constant::String(current)),
                span.clone(),
            ));
            Expression::new(Expr::GString(GStringExpression { strings, values }), span)
        })
}

fn regex() -> impl Parser<char, Expression, Error = ParseError> + Clone {
    just("~/")
        .ignore_then(
            just("\\/")
                .to('/')
                .or(filter(|c: &char| *c != '/'))
                .repeated()
                .collect::<String>(),
        )
        .then_ignore(just('/'))
        .map_with_span(|pattern, span: Span| {
            let pattern = Expression::new(Expr::Constant(Constant::String(pattern)), span.clone());
            Expression::new(Expr::Regex(pattern.boxed()), span)
        })
}

// endregion

// region: arguments

#[derive(Clone)]
enum Argument {
    Named(Expression),
    Positional(Expression),
}

/// `key: value` or `*:map`, as found in map literals and named arguments.
fn map_entry<P>(expression: P) -> impl Parser<char, Expression, Error = ParseError> + Clone
where
    P: Parser<char, Expression, Error = ParseError> + Clone,
{
    let key = choice((
        identifier().map(Constant::String),
        token(single_quoted_string()).map(Constant::String),
        token(number()),
    ))
    .map_with_span(|key, span| Expression::new(Expr::Constant(key), span))
    .or(expression
        .clone()
        .delimited_by(symbol("("), symbol(")")));

    let entry = key
        .then_ignore(symbol(":"))
        .then(expression.clone())
        .map_with_span(|(key, value), span| {
            Expression::new(
                Expr::MapEntry(MapEntryExpression {
                    key: key.boxed(),
                    value: value.boxed(),
                }),
                span,
            )
        });

    let spread = symbol("*:")
        .ignore_then(expression)
        .map_with_span(|map, span| Expression::new(Expr::SpreadMap(map.boxed()), span));

    entry.or(spread)
}

fn spread<P>(expression: P) -> impl Parser<char, Expression, Error = ParseError> + Clone
where
    P: Parser<char, Expression, Error = ParseError> + Clone,
{
    symbol("*")
        .ignore_then(expression)
        .map_with_span(|items, span| Expression::new(Expr::Spread(items.boxed()), span))
}

/// Named arguments are gathered into a single leading named-argument list;
/// a call with nothing but named arguments passes them as a tuple.
fn argument_list(arguments: Vec<Argument>, closure: Option<Expression>, span: Span) -> Expression {
    let mut named = vec![];
    let mut positional = vec![];

    for argument in arguments {
        match argument {
            Argument::Named(entry) => named.push(entry),
            Argument::Positional(value) => positional.push(value),
        }
    }
    positional.extend(closure);

    if named.is_empty() {
        return Expression::new(Expr::ArgumentList(positional), span);
    }

    let named_span = named.first().map_or(0, |entry| entry.span.start)
        ..named.last().map_or(0, |entry| entry.span.end);
    let named = Expression::new(Expr::NamedArgumentList(named), named_span);

    if positional.is_empty() {
        Expression::new(Expr::Tuple(vec![named]), span)
    } else {
        positional.insert(0, named);
        Expression::new(Expr::ArgumentList(positional), span)
    }
}

// endregion

// region: postfix

enum Suffix {
    Member {
        name: String,
        safe: bool,
        spread_safe: bool,
        arguments: Option<Expression>,
        end: usize,
    },
    Attribute(String, usize),
    Pointer(String, usize),
    ClassLiteral(usize),
    Call(Expression),
    Index(Expression, usize),
    Increment(&'static str, usize),
}

fn apply_suffix(object: Expression, suffix: Suffix) -> Expression {
    let start = object.span.start;

    match suffix {
        Suffix::Member {
            name,
            safe,
            spread_safe,
            arguments,
            end,
        } => {
            let node = match arguments {
                Some(arguments) => Expr::MethodCall(MethodCallExpression {
                    object: object.boxed(),
                    method: name,
                    arguments: arguments.boxed(),
                    safe,
                    implicit_this: false,
                }),
                None => Expr::Property(PropertyExpression {
                    object: object.boxed(),
                    property: name,
                    safe,
                    spread_safe,
                }),
            };
            Expression::new(node, start..end)
        }
        Suffix::Attribute(name, end) => Expression::new(
            Expr::Attribute(PropertyExpression {
                object: object.boxed(),
                property: name,
                safe: false,
                spread_safe: false,
            }),
            start..end,
        ),
        Suffix::Pointer(method_name, end) => Expression::new(
            Expr::MethodPointer(MethodPointerExpression {
                expression: object.boxed(),
                method_name,
            }),
            start..end,
        ),
        Suffix::ClassLiteral(end) => match type_reference(&object) {
            Some(name) => Expression::new(Expr::Class(TypeName::new(name)), start..end),
            None => Expression::new(
                Expr::Property(PropertyExpression {
                    object: object.boxed(),
                    property: "class".to_owned(),
                    safe: false,
                    spread_safe: false,
                }),
                start..end,
            ),
        },
        Suffix::Call(arguments) => {
            let end = arguments.span.end;
            let node = match object.node {
                Expr::Variable(variable) if variable.name != "this" && variable.name != "super" => {
                    Expr::MethodCall(MethodCallExpression {
                        object: Expression::variable("this").boxed(),
                        method: variable.name,
                        arguments: arguments.boxed(),
                        safe: false,
                        implicit_this: true,
                    })
                }
                _ => Expr::MethodCall(MethodCallExpression {
                    object: object.boxed(),
                    method: "call".to_owned(),
                    arguments: arguments.boxed(),
                    safe: false,
                    implicit_this: false,
                }),
            };
            Expression::new(node, start..end)
        }
        Suffix::Index(index, end) => {
            let span = start..end;
            let mut subscript = binary(object, "[", index);
            subscript.span = span;
            subscript
        }
        Suffix::Increment(operation, end) => Expression::new(
            Expr::Postfix(UnaryOperation {
                operation: operation.to_owned(),
                expression: object.boxed(),
            }),
            start..end,
        ),
    }
}

// endregion

/// Construct the (recursive) expression parser.
///
/// Closures embed whole statements, so the statement parser
/// has to be passed in directly.
pub(super) fn expression(statement: BoxedParser<Statement>) -> BoxedParser<Expression> {
    recursive(|expression: Recursive<'static, char, Expression, ParseError>| {
        // region: primaries

        let closure = symbol("{")
            .ignore_then(
                parameter(expression.clone())
                    .separated_by(symbol(","))
                    .then_ignore(symbol("->"))
                    .or_not(),
            )
            .then(statement.clone().repeated())
            .then_ignore(symbol("}"))
            .map_with_span(|(parameters, statements), span: Span| {
                let code = Statement::new(
                    Stmt::Block(BlockStatement {
                        statements,
                        declared_variables: None,
                    }),
                    span.clone(),
                );
                Expression::new(
                    Expr::Closure(ClosureExpression {
                        parameters,
                        code: Box::new(code),
                    }),
                    span,
                )
            })
            .boxed();

        let argument = map_entry(expression.clone())
            .map(Argument::Named)
            .or(spread(expression.clone()).map(Argument::Positional))
            .or(expression.clone().map(Argument::Positional));

        let arguments = argument
            .separated_by(symbol(","))
            .allow_trailing()
            .delimited_by(symbol("("), symbol(")"))
            .then(closure.clone().or_not())
            .map_with_span(|(arguments, closure), span| argument_list(arguments, closure, span))
            .boxed();

        let literal = choice((
            token(number()).map_with_span(|value, span| Expression::new(Expr::Constant(value), span)),
            token(single_quoted_string()).map_with_span(|value, span| {
                Expression::new(Expr::Constant(Constant::String(value)), span)
            }),
            token(gstring(expression.clone())),
            token(regex()),
            keyword("true").to(Constant::Bool(true))
                .or(keyword("false").to(Constant::Bool(false)))
                .or(keyword("null").to(Constant::Null))
                .map_with_span(|value, span| Expression::new(Expr::Constant(value), span)),
        ));

        let sized_array = keyword("new")
            .ignore_then(class_type())
            .then(
                expression
                    .clone()
                    .delimited_by(symbol("["), symbol("]"))
                    .repeated()
                    .at_least(1),
            )
            .then(symbol("[").then(symbol("]")).repeated())
            .map_with_span(|((element_type, size_expressions), _), span| {
                Expression::new(
                    Expr::Array(ArrayExpression {
                        element_type,
                        expressions: vec![],
                        size_expressions,
                    }),
                    span,
                )
            });

        let initialized_array = keyword("new")
            .ignore_then(class_type())
            .then(symbol("[").then(symbol("]")).repeated().at_least(1))
            .then(
                expression
                    .clone()
                    .separated_by(symbol(","))
                    .allow_trailing()
                    .delimited_by(symbol("{"), symbol("}")),
            )
            .map_with_span(|((element_type, dimensions), expressions), span| {
                Expression::new(
                    Expr::Array(ArrayExpression {
                        element_type: element_type.array_of(dimensions.len() - 1),
                        expressions,
                        size_expressions: vec![],
                    }),
                    span,
                )
            });

        let new_object = keyword("new")
            .ignore_then(class_type())
            .then(arguments.clone())
            .map_with_span(|(target, arguments), span| {
                Expression::new(
                    Expr::ConstructorCall(ConstructorCallExpression {
                        target,
                        arguments: arguments.boxed(),
                        special: None,
                    }),
                    span,
                )
            });

        let special = keyword("this")
            .to(SpecialCall::This)
            .or(keyword("super").to(SpecialCall::Super));

        let special_call = special
            .clone()
            .then(arguments.clone())
            .map_with_span(|(special, arguments), span| {
                Expression::new(
                    Expr::ConstructorCall(ConstructorCallExpression {
                        target: TypeName::new(special.to_string()),
                        arguments: arguments.boxed(),
                        special: Some(special),
                    }),
                    span,
                )
            });

        let this_or_super = special.map_with_span(|special, span| {
            Expression::new(
                Expr::Variable(VariableExpression::new(special.to_string())),
                span,
            )
        });

        let empty_map = symbol("[")
            .then(symbol(":"))
            .then(symbol("]"))
            .map_with_span(|_, span| Expression::new(Expr::Map(vec![]), span));

        let map = map_entry(expression.clone())
            .separated_by(symbol(","))
            .at_least(1)
            .allow_trailing()
            .delimited_by(symbol("["), symbol("]"))
            .map_with_span(|entries, span| Expression::new(Expr::Map(entries), span));

        let list = spread(expression.clone())
            .or(expression.clone())
            .separated_by(symbol(","))
            .allow_trailing()
            .delimited_by(symbol("["), symbol("]"))
            .map_with_span(|items, span| Expression::new(Expr::List(items), span));

        let parenthesized = expression
            .clone()
            .delimited_by(symbol("("), symbol(")"));

        let variable = identifier().map_with_span(|name, span| {
            Expression::new(Expr::Variable(VariableExpression::new(name)), span)
        });

        // since there is possible ambiguity here, order in which the
        // options are listed is important (most specific => least specific)
        let primary = choice((
            literal,
            sized_array,
            initialized_array,
            new_object,
            special_call,
            this_or_super,
            closure.clone(),
            empty_map,
            map,
            list,
            parenthesized,
            variable,
        ))
        .boxed();

        // endregion

        // region: postfix

        let member_name = identifier().map_with_span(|name, span: Span| (name, span.end));

        let pointer = symbol(".&")
            .ignore_then(member_name.clone())
            .map(|(name, end)| Suffix::Pointer(name, end));

        let attribute = symbol(".@")
            .ignore_then(member_name.clone())
            .map(|(name, end)| Suffix::Attribute(name, end));

        let class_literal = symbol(".")
            .ignore_then(keyword("class"))
            .map_with_span(|(), span: Span| Suffix::ClassLiteral(span.end));

        let call_arguments = arguments.clone().or(closure.map_with_span(|closure, span| {
            Expression::new(Expr::ArgumentList(vec![closure]), span)
        }));

        let member = choice((symbol("?."), symbol("*."), symbol(".")))
            .then(member_name)
            .then(call_arguments.or_not())
            .map(|((accessor, (name, name_end)), arguments)| Suffix::Member {
                end: arguments.as_ref().map_or(name_end, |arguments| arguments.span.end),
                name,
                safe: accessor == "?.",
                spread_safe: accessor == "*.",
                arguments,
            });

        let call = arguments.map(Suffix::Call);

        let index = expression
            .clone()
            .delimited_by(symbol("["), symbol("]"))
            .map_with_span(|index, span: Span| Suffix::Index(index, span.end));

        let increment = symbol("++")
            .or(symbol("--"))
            .map_with_span(|operation, span: Span| Suffix::Increment(operation, span.end));

        let postfix = primary
            .then(choice((pointer, attribute, class_literal, member, call, index, increment)).repeated())
            .foldl(apply_suffix)
            .boxed();

        // endregion

        // region: unary

        let unary = recursive(|unary: Recursive<'static, char, Expression, ParseError>| {
            let cast = symbol("(")
                .ignore_then(type_name())
                .then_ignore(symbol(")"))
                .try_map(|target, span| {
                    if is_cast_target(&target) {
                        Ok(target)
                    } else {
                        Err(Simple::custom(span, format!("`{target}` is not a type")))
                    }
                })
                .then(unary.clone())
                .map_with_span(|(target, expression): (TypeName, Expression), span| {
                    Expression::new(
                        Expr::Cast(CastExpression {
                            target,
                            expression: expression.boxed(),
                            coerce: false,
                        }),
                        span,
                    )
                });

            let prefix = choice((
                symbol("++"),
                symbol("--"),
                symbol("!"),
                symbol("-"),
                symbol("+"),
                symbol("~"),
            ))
            .then(unary)
            .map_with_span(|(operation, expression), span| {
                let expression = expression.boxed();
                let node = match operation {
                    "!" => Expr::Not(expression),
                    "-" => Expr::UnaryMinus(expression),
                    "+" => Expr::UnaryPlus(expression),
                    "~" => Expr::BitwiseNegation(expression),
                    _ => Expr::Prefix(UnaryOperation {
                        operation: operation.to_owned(),
                        expression,
                    }),
                };
                Expression::new(node, span)
            });

            cast.or(postfix).or(prefix)
        });

        let coercion = unary
            .then(
                keyword("as")
                    .ignore_then(type_name())
                    .map_with_span(|target, span: Span| (target, span.end))
                    .repeated(),
            )
            .foldl(|expression, (target, end)| {
                let span = expression.span.start..end;
                Expression::new(
                    Expr::Cast(CastExpression {
                        target,
                        expression: expression.boxed(),
                        coerce: true,
                    }),
                    span,
                )
            })
            .boxed();

        // endregion

        // region: binary

        let power = binary_tier(coercion, symbol("**"));
        let multiplicative = binary_tier(power, choice((symbol("*"), symbol("/"), symbol("%"))));
        let additive = binary_tier(multiplicative, symbol("+").or(symbol("-")));
        let shift = binary_tier(additive, symbol("<<").or(symbol(">>")));

        let range = shift
            .clone()
            .then(
                symbol("..<")
                    .to(false)
                    .or(symbol("..").to(true))
                    .then(shift)
                    .or_not(),
            )
            .map(|(from, to)| match to {
                Some((inclusive, to)) => {
                    let span = from.span.start..to.span.end;
                    Expression::new(
                        Expr::Range(RangeExpression {
                            from: from.boxed(),
                            to: to.boxed(),
                            inclusive,
                        }),
                        span,
                    )
                }
                None => from,
            })
            .boxed();

        let instance_of = keyword("instanceof")
            .to("instanceof")
            .then(type_name().map_with_span(|target, span| Expression::new(Expr::Class(target), span)));
        let relational = range
            .clone()
            .then(
                choice((
                    symbol("<="),
                    symbol(">="),
                    symbol("<"),
                    symbol(">"),
                    keyword("in").to("in"),
                ))
                .then(range)
                .or(instance_of)
                .repeated(),
            )
            .foldl(|left, (operation, right)| binary(left, operation, right))
            .boxed();

        let equality = binary_tier(
            relational,
            choice((
                symbol("==~"),
                symbol("=="),
                symbol("!="),
                symbol("<=>"),
                symbol("=~"),
            )),
        );
        let bitwise_and = binary_tier(equality, symbol("&"));
        let bitwise_xor = binary_tier(bitwise_and, symbol("^"));
        let bitwise_or = binary_tier(bitwise_xor, symbol("|"));
        let logical_and = binary_tier(bitwise_or, symbol("&&"));
        let logical_or = binary_tier(logical_and, symbol("||"));

        // endregion

        // region: ternary & assignment

        let ternary = logical_or
            .then(
                symbol("?:")
                    .ignore_then(expression.clone())
                    .map(|otherwise| (None, otherwise))
                    .or(symbol("?")
                        .ignore_then(expression.clone())
                        .then_ignore(symbol(":"))
                        .then(expression.clone())
                        .map(|(then, otherwise)| (Some(then), otherwise)))
                    .or_not(),
            )
            .map(|(condition, branches)| match branches {
                None => condition,
                Some((then, otherwise)) => {
                    let span = condition.span.start..otherwise.span.end;
                    match then {
                        Some(then) => Expression::new(
                            Expr::Ternary(TernaryExpression {
                                condition: boolean(condition).boxed(),
                                true_expression: then.boxed(),
                                false_expression: otherwise.boxed(),
                            }),
                            span,
                        ),
                        None => Expression::new(
                            Expr::Elvis(TernaryExpression {
                                true_expression: condition.clone().boxed(),
                                condition: boolean(condition).boxed(),
                                false_expression: otherwise.boxed(),
                            }),
                            span,
                        ),
                    }
                }
            })
            .boxed();

        ternary
            .then(
                choice((
                    symbol("**="),
                    symbol("+="),
                    symbol("-="),
                    symbol("*="),
                    symbol("/="),
                    symbol("%="),
                    symbol("="),
                ))
                .then(expression)
                .or_not(),
            )
            .map(|(target, assignment)| match assignment {
                Some((operation, value)) => binary(target, operation, value),
                None => target,
            })

        // endregion
    })
    .boxed()
}

/// Left-associative chain of `operand (operator operand)*`.
fn binary_tier<O>(operand: BoxedParser<Expression>, operator: O) -> BoxedParser<Expression>
where
    O: Parser<char, &'static str, Error = ParseError> + Clone + 'static,
{
    operand
        .clone()
        .then(operator.then(operand).repeated())
        .foldl(|left, (operation, right)| binary(left, operation, right))
        .boxed()
}

/// A method, constructor or closure parameter: `[def | Type] name [= default]`.
pub(super) fn parameter<P>(expression: P) -> impl Parser<char, Parameter, Error = ParseError> + Clone
where
    P: Parser<char, Expression, Error = ParseError> + Clone,
{
    let typed = keyword("def")
        .to(TypeName::dynamic())
        .or(type_name())
        .then(identifier());
    let untyped = identifier().map(|name| (TypeName::dynamic(), name));

    typed
        .or(untyped)
        .then(symbol("=").ignore_then(expression).or_not())
        .map(|((param_type, name), default_value)| Parameter {
            name,
            param_type,
            default_value,
        })
}
