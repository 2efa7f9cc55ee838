//! Grammar of class and method declarations.

use chumsky::prelude::*;

#[allow(clippy::wildcard_imports)]
use crate::common::ast::*;

use super::expression::{expression, parameter};
use super::statement::block;
use super::{class_type, identifier, keyword, symbol, type_name, BoxedParser, ParseError};

#[derive(Debug, Clone, Copy)]
enum Modifier {
    Visibility(Visibility),
    Static,
    Final,
    Abstract,
    Synchronized,
}

fn modifiers() -> impl Parser<char, Modifiers, Error = ParseError> + Clone {
    choice((
        keyword("public").to(Modifier::Visibility(Visibility::Public)),
        keyword("protected").to(Modifier::Visibility(Visibility::Protected)),
        keyword("private").to(Modifier::Visibility(Visibility::Private)),
        keyword("static").to(Modifier::Static),
        keyword("final").to(Modifier::Final),
        keyword("abstract").to(Modifier::Abstract),
        keyword("synchronized").to(Modifier::Synchronized),
    ))
    .repeated()
    .map(|modifiers| {
        modifiers
            .into_iter()
            .fold(Modifiers::default(), |mut modifiers, modifier| {
                match modifier {
                    Modifier::Visibility(visibility) => modifiers.visibility = Some(visibility),
                    Modifier::Static => modifiers.is_static = true,
                    Modifier::Final => modifiers.is_final = true,
                    Modifier::Abstract => modifiers.is_abstract = true,
                    Modifier::Synchronized => modifiers.is_synchronized = true,
                }
                modifiers
            })
    })
}

/// `@Name`, `@Name(value)` or `@Name(key = value, ...)`.
fn annotation<P>(expression: P) -> impl Parser<char, AnnotationNode, Error = ParseError> + Clone
where
    P: Parser<char, Expression, Error = ParseError> + Clone,
{
    let member = identifier()
        .then_ignore(symbol("="))
        .then(expression.clone())
        .or(expression.map(|value| ("value".to_owned(), value)));

    symbol("@")
        .ignore_then(class_type())
        .then(
            member
                .separated_by(symbol(","))
                .delimited_by(symbol("("), symbol(")"))
                .or_not(),
        )
        .map_with_span(|(class_name, members), span| AnnotationNode {
            class_name,
            members: members.unwrap_or_default(),
            span,
        })
}

fn parameters<P>(expression: P) -> impl Parser<char, Vec<Parameter>, Error = ParseError> + Clone
where
    P: Parser<char, Expression, Error = ParseError> + Clone,
{
    parameter(expression)
        .separated_by(symbol(","))
        .delimited_by(symbol("("), symbol(")"))
}

fn return_type() -> impl Parser<char, TypeName, Error = ParseError> + Clone {
    keyword("def").to(TypeName::dynamic()).or(type_name())
}

/// `[annotations] [modifiers] (def | Type) name(parameters) [{ ... }]`
///
/// Abstract methods have no body.
pub(super) fn method(statement: BoxedParser<Statement>) -> BoxedParser<MethodNode> {
    let expression = expression(statement.clone());

    annotation(expression.clone())
        .repeated()
        .then(modifiers())
        .then(return_type())
        .then(identifier())
        .then(parameters(expression))
        .then(block(statement).map(Some).or(symbol(";").or_not().to(None)))
        .map_with_span(
            |(((((annotations, modifiers), return_type), name), parameters), code), span| MethodNode {
                name,
                modifiers,
                return_type,
                parameters,
                annotations,
                code,
                variable_scope: None,
                synthetic: false,
                span,
            },
        )
        .boxed()
}

/// `[annotations] [modifiers] Name(parameters) { ... }`
fn constructor(statement: BoxedParser<Statement>) -> impl Parser<char, ClassMember, Error = ParseError> + Clone {
    let expression = expression(statement.clone());

    annotation(expression.clone())
        .repeated()
        .then(modifiers())
        .then(identifier())
        .then(parameters(expression))
        .then(block(statement))
        .map_with_span(
            |((((annotations, modifiers), name), parameters), code), span| {
                ClassMember::Constructor(
                    name,
                    ConstructorNode {
                        modifiers,
                        parameters,
                        annotations,
                        code: Some(code),
                        synthetic: false,
                        span,
                    },
                )
            },
        )
}

/// A field when declared with a visibility modifier, otherwise a property.
fn field<P>(expression: P) -> impl Parser<char, ClassMember, Error = ParseError> + Clone
where
    P: Parser<char, Expression, Error = ParseError> + Clone,
{
    annotation(expression.clone())
        .repeated()
        .then(modifiers())
        .then(return_type())
        .then(identifier())
        .then(symbol("=").ignore_then(expression).or_not())
        .map_with_span(
            |((((annotations, modifiers), field_type), name), initial_expression), span| {
                let node = FieldNode {
                    name,
                    modifiers,
                    field_type,
                    annotations,
                    initial_expression,
                    owner: String::new(),
                    span,
                };

                if modifiers.visibility.is_some() {
                    ClassMember::Field(node)
                } else {
                    ClassMember::Property(node)
                }
            },
        )
}

/// `[annotations] [modifiers] class Name [extends Type] [implements Type, ...] { members }`
pub(super) fn class(statement: BoxedParser<Statement>) -> BoxedParser<ParsedClass> {
    let expression = expression(statement.clone());

    let member = method(statement.clone())
        .map(ClassMember::Method)
        .or(constructor(statement))
        .or(field(expression.clone()))
        .then_ignore(symbol(";").or_not());

    annotation(expression)
        .repeated()
        .then(modifiers())
        .then_ignore(keyword("class"))
        .then(identifier())
        .then(keyword("extends").ignore_then(class_type()).or_not())
        .then(
            keyword("implements")
                .ignore_then(class_type().separated_by(symbol(",")).at_least(1))
                .or_not(),
        )
        .then(member.repeated().delimited_by(symbol("{"), symbol("}")))
        .map_with_span(
            |(((((annotations, modifiers), name), super_class), interfaces), members), span| {
                ParsedClass {
                    name,
                    modifiers,
                    super_class,
                    interfaces: interfaces.unwrap_or_default(),
                    annotations,
                    members,
                    span,
                }
            },
        )
        .boxed()
}
