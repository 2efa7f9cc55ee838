//! Statement grammar.

use chumsky::prelude::*;

#[allow(clippy::wildcard_imports)]
use crate::common::ast::*;

use super::expression::{boolean, expression};
use super::{class_type, identifier, keyword, symbol, type_name, BoxedParser, ParseError};

/// `{ statement* }`
pub(super) fn block<P>(statement: P) -> impl Parser<char, Statement, Error = ParseError> + Clone
where
    P: Parser<char, Statement, Error = ParseError> + Clone,
{
    statement
        .repeated()
        .delimited_by(symbol("{"), symbol("}"))
        .map_with_span(|statements, span| {
            Statement::new(
                Stmt::Block(BlockStatement {
                    statements,
                    declared_variables: None,
                }),
                span,
            )
        })
}

/// `def x = 1`, `final int[] xs`: a variable declaration with an optional value.
pub(super) fn declaration<P>(expression: P) -> impl Parser<char, Expression, Error = ParseError> + Clone
where
    P: Parser<char, Expression, Error = ParseError> + Clone,
{
    let declared_type = keyword("final")
        .or_not()
        .ignore_then(keyword("def").to(None).or(type_name().map(Some)));

    declared_type
        .then(identifier().map_with_span(|name, span| (name, span)))
        .then(symbol("=").ignore_then(expression).or_not())
        .map_with_span(|((declared_type, (name, name_span)), value), span| {
            let variable = Expression::new(
                Expr::Variable(VariableExpression {
                    name,
                    declared_type,
                    origin: None,
                }),
                name_span,
            );
            let value = value.unwrap_or_else(|| Expression::internal(Expr::Empty));

            Expression::new(
                Expr::Declaration(BinaryExpression {
                    left: variable.boxed(),
                    operation: "=".to_owned(),
                    right: value.boxed(),
                }),
                span,
            )
        })
}

/// Construct the (recursive) statement parser.
pub(super) fn statement() -> BoxedParser<Statement> {
    recursive(|statement: Recursive<'static, char, Statement, ParseError>| {
        let statement = statement.boxed();
        let expression = expression(statement.clone());

        let block = block(statement.clone()).boxed();
        let parenthesized = expression
            .clone()
            .delimited_by(symbol("("), symbol(")"))
            .boxed();

        let if_else = keyword("if")
            .ignore_then(parenthesized.clone())
            .then(statement.clone())
            .then(keyword("else").ignore_then(statement.clone()).or_not())
            .map(|((condition, if_block), else_block)| {
                Stmt::If(IfStatement {
                    condition: boolean(condition).boxed(),
                    if_block: Box::new(if_block),
                    else_block: Box::new(else_block.unwrap_or_else(Statement::empty)),
                })
            });

        let while_loop = keyword("while")
            .ignore_then(parenthesized.clone())
            .then(statement.clone())
            .map(|(condition, body)| {
                Stmt::While(LoopStatement {
                    condition: boolean(condition).boxed(),
                    body: Box::new(body),
                })
            });

        let do_while = keyword("do")
            .ignore_then(statement.clone())
            .then_ignore(keyword("while"))
            .then(parenthesized.clone())
            .map(|(body, condition)| {
                Stmt::DoWhile(LoopStatement {
                    condition: boolean(condition).boxed(),
                    body: Box::new(body),
                })
            });

        let loop_variable = keyword("def")
            .to(TypeName::dynamic())
            .or(type_name())
            .then(identifier())
            .map(|(variable_type, name)| Parameter::new(name, variable_type))
            .or(identifier().map(|name| Parameter::new(name, TypeName::dynamic())));

        let for_in = keyword("for")
            .ignore_then(
                loop_variable
                    .then_ignore(keyword("in").or(symbol(":").ignored()))
                    .then(expression.clone())
                    .delimited_by(symbol("("), symbol(")")),
            )
            .then(statement.clone())
            .map(|((variable, collection), body)| {
                Stmt::For(ForStatement {
                    variable: Some(variable),
                    collection: collection.boxed(),
                    body: Box::new(body),
                })
            });

        let for_init = declaration(expression.clone()).or(expression.clone());
        let for_clauses = for_init
            .or_not()
            .then_ignore(symbol(";"))
            .then(expression.clone().or_not())
            .then_ignore(symbol(";"))
            .then(expression.clone().or_not())
            .map_with_span(|((init, condition), update), span| {
                let clauses = [init, condition, update]
                    .into_iter()
                    .map(|clause| clause.unwrap_or_else(|| Expression::internal(Expr::Empty)))
                    .collect();
                Expression::new(Expr::ClosureList(clauses), span)
            });

        let classic_for = keyword("for")
            .ignore_then(for_clauses.delimited_by(symbol("("), symbol(")")))
            .then(statement.clone())
            .map(|(collection, body)| {
                Stmt::For(ForStatement {
                    variable: None,
                    collection: collection.boxed(),
                    body: Box::new(body),
                })
            });

        let catch_variable = class_type()
            .then(identifier())
            .map(|(exception_type, name)| Parameter::new(name, exception_type))
            .or(identifier().map(|name| Parameter::new(name, TypeName::new("Exception"))));

        let catch = keyword("catch")
            .ignore_then(catch_variable.delimited_by(symbol("("), symbol(")")))
            .then(block.clone())
            .map_with_span(|(variable, code), span| CatchStatement {
                variable,
                code: Box::new(code),
                span,
            });

        let try_catch = keyword("try")
            .ignore_then(block.clone())
            .then(catch.repeated())
            .then(keyword("finally").ignore_then(block.clone()).or_not())
            .map(|((try_block, catches), finally_block)| {
                Stmt::TryCatch(TryCatchStatement {
                    try_block: Box::new(try_block),
                    catches,
                    finally_block: Box::new(finally_block.unwrap_or_else(Statement::empty)),
                })
            });

        let case_body = statement
            .clone()
            .repeated()
            .map_with_span(|statements, span| {
                Statement::new(
                    Stmt::Block(BlockStatement {
                        statements,
                        declared_variables: None,
                    }),
                    span,
                )
            });

        let case = keyword("case")
            .ignore_then(expression.clone())
            .then_ignore(symbol(":"))
            .then(case_body.clone())
            .map_with_span(|(expression, code), span| CaseStatement {
                expression,
                code: Box::new(code),
                span,
            });

        let default = keyword("default")
            .ignore_then(symbol(":"))
            .ignore_then(case_body);

        let switch = keyword("switch")
            .ignore_then(parenthesized.clone())
            .then(
                case.repeated()
                    .then(default.or_not())
                    .delimited_by(symbol("{"), symbol("}")),
            )
            .map(|(expression, (cases, default))| {
                Stmt::Switch(SwitchStatement {
                    expression: expression.boxed(),
                    cases,
                    default: Box::new(default.unwrap_or_else(Statement::empty)),
                })
            });

        let synchronized = keyword("synchronized")
            .ignore_then(parenthesized)
            .then(block.clone())
            .map(|(lock, code)| {
                Stmt::Synchronized(SynchronizedStatement {
                    lock: lock.boxed(),
                    code: Box::new(code),
                })
            });

        let throw = keyword("throw")
            .ignore_then(expression.clone())
            .map(|exception| Stmt::Throw(exception.boxed()));

        let return_value = keyword("return")
            .ignore_then(expression.clone().or_not())
            .map(|value| {
                Stmt::Return(
                    value
                        .unwrap_or_else(|| Expression::constant(Constant::Null))
                        .boxed(),
                )
            });

        let assert = keyword("assert")
            .ignore_then(expression.clone())
            .then(
                symbol(":")
                    .or(symbol(","))
                    .ignore_then(expression.clone())
                    .or_not(),
            )
            .map(|(condition, message)| {
                Stmt::Assert(AssertStatement {
                    condition: boolean(condition).boxed(),
                    message: message
                        .unwrap_or_else(|| Expression::constant(Constant::Null))
                        .boxed(),
                })
            });

        let declared = declaration(expression.clone()).map(|declaration| {
            Stmt::Expression(declaration.boxed())
        });

        let evaluated = expression.map(|expression| Stmt::Expression(expression.boxed()));

        let simple = choice((
            if_else,
            while_loop,
            do_while,
            for_in,
            classic_for,
            try_catch,
            switch,
            keyword("break").to(Stmt::Break),
            keyword("continue").to(Stmt::Continue),
            synchronized,
            throw,
            return_value,
            assert,
            declared,
            evaluated,
        ))
        .map_with_span(Statement::new)
        .then_ignore(symbol(";").or_not());

        let empty = symbol(";").map_with_span(|_, span| Statement::new(Stmt::Empty, span));

        block.or(simple).or(empty)
    })
    .boxed()
}
