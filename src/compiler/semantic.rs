//! Resolve what every name in a module refers to: variables to their
//! declarations, type names to declared or built-in classes.

use std::collections::HashSet;

use phf::phf_map;

#[allow(clippy::wildcard_imports)]
use crate::common::ast::*;
use crate::common::visit::{walk_expression_mut, walk_statement_mut, CodeVisitorMut};

use super::{CompilationError, CompilePhase, FallableAction};

/// Classes every script can refer to without declaring them.
static BUILTIN_TYPES: phf::Map<&'static str, &'static str> = phf_map! {
    "void" => "void",
    "boolean" => "boolean",
    "byte" => "byte",
    "char" => "char",
    "short" => "short",
    "int" => "int",
    "long" => "long",
    "float" => "float",
    "double" => "double",
    "Object" => "script.lang.Object",
    "String" => "script.lang.String",
    "Boolean" => "script.lang.Boolean",
    "Integer" => "script.lang.Integer",
    "Long" => "script.lang.Long",
    "Double" => "script.lang.Double",
    "Number" => "script.lang.Number",
    "Math" => "script.lang.Math",
    "System" => "script.lang.System",
    "Thread" => "script.lang.Thread",
    "Class" => "script.lang.Class",
    "StringBuilder" => "script.lang.StringBuilder",
    "Exception" => "script.lang.Exception",
    "RuntimeException" => "script.lang.RuntimeException",
    "IllegalArgumentException" => "script.lang.IllegalArgumentException",
    "IllegalStateException" => "script.lang.IllegalStateException",
    "Script" => "script.lang.Script",
    "Binding" => "script.lang.Binding",
    "Closure" => "script.lang.Closure",
    "GString" => "script.lang.GString",
    "Range" => "script.lang.Range",
    "BigDecimal" => "script.math.BigDecimal",
    "BigInteger" => "script.math.BigInteger",
    "List" => "script.util.List",
    "ArrayList" => "script.util.ArrayList",
    "Map" => "script.util.Map",
    "HashMap" => "script.util.HashMap",
    "Set" => "script.util.Set",
    "HashSet" => "script.util.HashSet",
    "Date" => "script.util.Date",
    "Pattern" => "script.util.regex.Pattern",
    "File" => "script.io.File",
    "IOException" => "script.io.IOException",
    "InvokerHelper" => "script.runtime.InvokerHelper",
};

fn error<S: Into<String>>(message: S, span: Span) -> CompilationError {
    CompilationError::new(CompilePhase::SemanticAnalysis, message, span)
}

pub fn analyze(module: &mut ModuleNode) -> FallableAction {
    let declared_classes: HashSet<String> = module
        .classes
        .iter()
        .map(|class| class.name.clone())
        .collect();

    for class in &mut module.classes {
        ClassResolver::new(&declared_classes, class).resolve(class)?;
    }

    Ok(())
}

// region: types

/// Resolve a type name against the declared classes and the built-in ones.
/// Names that are already qualified are taken as written.
fn resolve_type(declared_classes: &HashSet<String>, type_name: &mut TypeName) -> bool {
    let resolved = if declared_classes.contains(&type_name.name) {
        Some(type_name.name.clone())
    } else if let Some(builtin) = BUILTIN_TYPES.get(type_name.name.as_str()) {
        Some((*builtin).to_owned())
    } else if type_name.name.contains('.') {
        Some(type_name.name.clone())
    } else {
        None
    };

    let found = resolved.is_some();
    type_name.resolved = resolved;
    found
}

// endregion

// region: scope

#[derive(Debug, Default)]
struct ScopeFrame {
    variables: Vec<(String, VariableOrigin)>,
}

/// Nested lexical scopes of the code being resolved;
/// the innermost frame is the last one.
#[derive(Debug, Default)]
struct Scope {
    frames: Vec<ScopeFrame>,
}

impl Scope {
    fn enter(&mut self) {
        self.frames.push(ScopeFrame::default());
    }

    /// Leave the innermost frame, returning the names declared in it.
    fn leave(&mut self) -> Vec<String> {
        self.frames
            .pop()
            .map(|frame| frame.variables.into_iter().map(|(name, _)| name).collect())
            .unwrap_or_default()
    }

    fn declare(&mut self, name: &str, origin: VariableOrigin) {
        if let Some(frame) = self.frames.last_mut() {
            frame.variables.push((name.to_owned(), origin));
        }
    }

    fn search(&self, name: &str) -> Option<VariableOrigin> {
        self.frames.iter().rev().find_map(|frame| {
            frame
                .variables
                .iter()
                .rev()
                .find(|(declared, _)| declared == name)
                .map(|(_, origin)| *origin)
        })
    }
}

// endregion

// region: resolver

/// What the resolver needs to know about the class whose code it walks.
struct ClassInfo {
    name: String,
    super_class: String,
    fields: HashSet<String>,
    properties: HashSet<String>,
    static_methods: HashSet<String>,
}

struct ClassResolver<'a> {
    declared_classes: &'a HashSet<String>,
    class: ClassInfo,
    scope: Scope,
    /// Every local declared in the method being resolved.
    method_locals: Vec<String>,
    in_static_context: bool,
    loop_depth: usize,
    switch_depth: usize,
    error: Option<CompilationError>,
}

impl<'a> ClassResolver<'a> {
    fn new(declared_classes: &'a HashSet<String>, class: &ClassNode) -> Self {
        let class = ClassInfo {
            name: class.name.clone(),
            super_class: class.super_class.name.clone(),
            fields: class.fields.iter().map(|field| field.name.clone()).collect(),
            properties: class
                .properties
                .iter()
                .map(|property| property.name.clone())
                .collect(),
            static_methods: class
                .methods
                .iter()
                .filter(|method| method.modifiers.is_static)
                .map(|method| method.name.clone())
                .collect(),
        };

        Self {
            declared_classes,
            class,
            scope: Scope::default(),
            method_locals: vec![],
            in_static_context: false,
            loop_depth: 0,
            switch_depth: 0,
            error: None,
        }
    }

    fn resolve(mut self, class: &mut ClassNode) -> FallableAction {
        resolve_type(self.declared_classes, &mut class.super_class);
        for interface in &mut class.interfaces {
            resolve_type(self.declared_classes, interface);
        }
        for annotation in &mut class.annotations {
            resolve_type(self.declared_classes, &mut annotation.class_name);
        }

        for field in &mut class.fields {
            resolve_type(self.declared_classes, &mut field.field_type);
            if let Some(initial_expression) = &mut field.initial_expression {
                self.in_static_context = field.modifiers.is_static;
                self.visit_expression_mut(initial_expression);
            }
        }

        for property in &mut class.properties {
            resolve_type(self.declared_classes, &mut property.property_type);
        }

        for constructor in &mut class.constructors {
            self.in_static_context = false;
            self.resolve_code(&mut constructor.parameters, constructor.code.as_mut());
        }

        for method in &mut class.methods {
            resolve_type(self.declared_classes, &mut method.return_type);
            self.in_static_context = method.modifiers.is_static;

            let locals = self.resolve_code(&mut method.parameters, method.code.as_mut());
            method.variable_scope = Some(locals);
        }

        self.error.map_or(Ok(()), Err)
    }

    /// Resolve a parameterized body, returning the parameters and
    /// every local it declares.
    fn resolve_code(
        &mut self,
        parameters: &mut [Parameter],
        code: Option<&mut Statement>,
    ) -> Vec<String> {
        self.method_locals.clear();
        self.scope.enter();

        for parameter in parameters.iter_mut() {
            resolve_type(self.declared_classes, &mut parameter.param_type);
            if let Some(default_value) = &mut parameter.default_value {
                self.visit_expression_mut(default_value);
            }
            self.scope.declare(&parameter.name, VariableOrigin::Parameter);
        }

        if let Some(code) = code {
            self.visit_statement_mut(code);
        }

        self.scope.leave();

        parameters
            .iter()
            .map(|parameter| parameter.name.clone())
            .chain(self.method_locals.drain(..))
            .collect()
    }

    fn report(&mut self, error: CompilationError) {
        // only the first error is reported
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    fn require_type(&mut self, type_name: &mut TypeName, span: &Span) {
        if !resolve_type(self.declared_classes, type_name) {
            self.report(error(
                format!("unable to resolve class `{}`", type_name.name),
                span.clone(),
            ));
        }
    }

    fn declare_local(&mut self, name: &str) {
        self.scope.declare(name, VariableOrigin::Local);
        self.method_locals.push(name.to_owned());
    }

    fn origin_of(&self, name: &str) -> VariableOrigin {
        if name == "this" || name == "super" {
            VariableOrigin::This
        } else if let Some(origin) = self.scope.search(name) {
            origin
        } else if self.class.fields.contains(name) && !self.class.properties.contains(name) {
            VariableOrigin::Field
        } else if self.class.properties.contains(name) {
            VariableOrigin::Property
        } else {
            VariableOrigin::Dynamic
        }
    }

    /// Run `visit` inside a loop body (`break` and `continue` allowed).
    fn in_loop(&mut self, visit: impl FnOnce(&mut Self)) {
        self.loop_depth += 1;
        visit(self);
        self.loop_depth -= 1;
    }

    /// Run `visit` inside a closure body, which starts over
    /// with no enclosing loop or switch.
    fn in_closure(&mut self, visit: impl FnOnce(&mut Self)) {
        let depths = (self.loop_depth, self.switch_depth);
        self.loop_depth = 0;
        self.switch_depth = 0;
        visit(self);
        (self.loop_depth, self.switch_depth) = depths;
    }
}

impl CodeVisitorMut for ClassResolver<'_> {
    fn visit_statement_mut(&mut self, statement: &mut Statement) {
        match &mut statement.node {
            Stmt::Block(block) => {
                self.scope.enter();
                for statement in &mut block.statements {
                    self.visit_statement_mut(statement);
                }
                block.declared_variables = Some(self.scope.leave());
            }
            Stmt::For(for_loop) => {
                self.scope.enter();
                self.visit_expression_mut(&mut for_loop.collection);
                if let Some(variable) = &mut for_loop.variable {
                    resolve_type(self.declared_classes, &mut variable.param_type);
                    self.declare_local(&variable.name);
                }
                self.in_loop(|resolver| resolver.visit_statement_mut(&mut for_loop.body));
                self.scope.leave();
            }
            Stmt::While(while_loop) => {
                self.visit_expression_mut(&mut while_loop.condition);
                self.in_loop(|resolver| resolver.visit_statement_mut(&mut while_loop.body));
            }
            Stmt::DoWhile(do_while) => {
                self.in_loop(|resolver| resolver.visit_statement_mut(&mut do_while.body));
                self.visit_expression_mut(&mut do_while.condition);
            }
            Stmt::Switch(_) => {
                self.switch_depth += 1;
                walk_statement_mut(self, statement);
                self.switch_depth -= 1;
            }
            Stmt::Break if self.loop_depth == 0 && self.switch_depth == 0 => {
                self.report(error(
                    "the break statement is only allowed inside loops or switches",
                    statement.span.clone(),
                ));
            }
            Stmt::Continue if self.loop_depth == 0 => {
                self.report(error(
                    "the continue statement is only allowed inside loops",
                    statement.span.clone(),
                ));
            }
            _ => walk_statement_mut(self, statement),
        }
    }

    fn visit_catch_mut(&mut self, catch: &mut CatchStatement) {
        resolve_type(self.declared_classes, &mut catch.variable.param_type);

        self.scope.enter();
        self.scope
            .declare(&catch.variable.name, VariableOrigin::Parameter);
        self.visit_statement_mut(&mut catch.code);
        self.scope.leave();
    }

    fn visit_expression_mut(&mut self, expression: &mut Expression) {
        let span = expression.span.clone();

        match &mut expression.node {
            Expr::Variable(variable) => {
                variable.origin = Some(self.origin_of(&variable.name));
            }
            Expr::Declaration(declaration) => {
                // the initial value cannot refer to the variable being declared
                self.visit_expression_mut(&mut declaration.right);

                if let Expr::Variable(variable) = &mut declaration.left.node {
                    if let Some(declared_type) = &mut variable.declared_type {
                        resolve_type(self.declared_classes, declared_type);
                    }
                    variable.origin = Some(VariableOrigin::Local);
                    let name = variable.name.clone();
                    self.declare_local(&name);
                }
            }
            Expr::Closure(closure) => {
                self.scope.enter();
                match &mut closure.parameters {
                    Some(parameters) => {
                        for parameter in parameters {
                            resolve_type(self.declared_classes, &mut parameter.param_type);
                            self.scope.declare(&parameter.name, VariableOrigin::Parameter);
                        }
                    }
                    None => self.scope.declare("it", VariableOrigin::Parameter),
                }
                self.in_closure(|resolver| resolver.visit_statement_mut(&mut closure.code));
                self.scope.leave();
            }
            Expr::ConstructorCall(call) => {
                match call.special {
                    Some(SpecialCall::This) => {
                        call.target.resolved = Some(self.class.name.clone());
                    }
                    Some(SpecialCall::Super) => {
                        call.target.name.clone_from(&self.class.super_class);
                        resolve_type(self.declared_classes, &mut call.target);
                    }
                    None => self.require_type(&mut call.target, &span),
                }
                walk_expression_mut(self, expression);
            }
            Expr::Class(class_type) => self.require_type(class_type, &span),
            Expr::Cast(cast) => {
                self.require_type(&mut cast.target, &span);
                walk_expression_mut(self, expression);
            }
            Expr::Array(array) => {
                self.require_type(&mut array.element_type, &span);
                walk_expression_mut(self, expression);
            }
            Expr::MethodCall(_) => {
                walk_expression_mut(self, expression);
                self.resolve_static_call(expression);
            }
            _ => walk_expression_mut(self, expression),
        }
    }
}

impl ClassResolver<'_> {
    /// Within a static method, `helper(x)` calling one of the class's own
    /// static methods becomes a static call on the class.
    fn resolve_static_call(&self, expression: &mut Expression) {
        let Expr::MethodCall(call) = &expression.node else {
            return;
        };

        if !(self.in_static_context
            && call.implicit_this
            && self.class.static_methods.contains(&call.method))
        {
            return;
        }

        let node = std::mem::replace(&mut expression.node, Expr::Empty);
        if let Expr::MethodCall(call) = node {
            let mut owner_type = TypeName::new(self.class.name.clone());
            owner_type.resolved = Some(self.class.name.clone());

            expression.node = Expr::StaticMethodCall(StaticMethodCallExpression {
                owner_type,
                method: call.method,
                arguments: call.arguments,
            });
        }
    }
}

// endregion

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{compiler::conversion::convert, parser::parse_module};

    fn analyzed(source: &str) -> Result<ModuleNode, CompilationError> {
        let mut module = convert("Script1", parse_module(source).expect("source should parse"))?;
        analyze(&mut module)?;
        Ok(module)
    }

    fn run_statements(module: &ModuleNode) -> &[Statement] {
        match module.statement_block().map(|block| &block.node) {
            Some(Stmt::Block(block)) => &block.statements,
            _ => panic!("script should have a statement block"),
        }
    }

    fn expression_of(statement: &Statement) -> &Expression {
        match &statement.node {
            Stmt::Expression(expression) => expression,
            other => panic!("expected an expression statement, got {other:?}"),
        }
    }

    fn origin_of(expression: &Expression) -> Option<VariableOrigin> {
        match &expression.node {
            Expr::Variable(variable) => variable.origin,
            other => panic!("expected a variable, got {other:?}"),
        }
    }

    #[test]
    fn test_local_and_dynamic_variables() {
        let source = indoc! {"
            def x = 1
            x + y
        "};
        let module = analyzed(source).expect("source should analyze");
        let statements = run_statements(&module);

        let Expr::Binary(sum) = &expression_of(&statements[1]).node else {
            panic!("expected a binary expression");
        };

        assert_eq!(origin_of(&sum.left), Some(VariableOrigin::Local));
        assert_eq!(origin_of(&sum.right), Some(VariableOrigin::Dynamic));
    }

    #[test]
    fn test_block_declared_variables() {
        let module = analyzed("def a = 1\nint b = 2").expect("source should analyze");

        match &module.statement_block().map(|block| &block.node) {
            Some(Stmt::Block(block)) => assert_eq!(
                block.declared_variables,
                Some(vec!["a".to_owned(), "b".to_owned()])
            ),
            _ => panic!("script should have a statement block"),
        }
    }

    #[test]
    fn test_members_parameters_and_scope() {
        let source = indoc! {"
            class Counter {
                private int count
                int step = 1
                def add(amount) {
                    def total = count + step + amount
                    total
                }
            }
        "};
        let module = analyzed(source).expect("source should analyze");
        let add = &module.classes[0].methods[0];

        assert_eq!(
            add.variable_scope,
            Some(vec!["amount".to_owned(), "total".to_owned()])
        );

        let Some(Stmt::Block(body)) = add.code.as_ref().map(|code| &code.node) else {
            panic!("method should have a body");
        };
        let Expr::Declaration(declaration) = &expression_of(&body.statements[0]).node else {
            panic!("expected a declaration");
        };
        let Expr::Binary(outer) = &declaration.right.node else {
            panic!("expected a binary expression");
        };
        let Expr::Binary(inner) = &outer.left.node else {
            panic!("expected a binary expression");
        };

        assert_eq!(origin_of(&inner.left), Some(VariableOrigin::Field));
        assert_eq!(origin_of(&inner.right), Some(VariableOrigin::Property));
        assert_eq!(origin_of(&outer.right), Some(VariableOrigin::Parameter));
    }

    #[test]
    fn test_types_resolve_to_declared_and_builtin_classes() {
        let source = indoc! {"
            class Point {}
            def p = new Point()
            def s = (String) p
        "};
        let module = analyzed(source).expect("source should analyze");
        let statements = run_statements(&module);

        let Expr::Declaration(first) = &expression_of(&statements[0]).node else {
            panic!("expected a declaration");
        };
        let Expr::ConstructorCall(call) = &first.right.node else {
            panic!("expected a constructor call");
        };
        assert_eq!(call.target.resolved.as_deref(), Some("Point"));

        let Expr::Declaration(second) = &expression_of(&statements[1]).node else {
            panic!("expected a declaration");
        };
        let Expr::Cast(cast) = &second.right.node else {
            panic!("expected a cast");
        };
        assert_eq!(cast.target.resolved.as_deref(), Some("script.lang.String"));
    }

    #[test]
    fn test_unresolvable_types() {
        for source in ["new Missing()", "Missing.class", "(Missing) x", "new Missing[2]"] {
            let error = analyzed(source).expect_err("analysis should fail");

            assert_eq!(error.phase, CompilePhase::SemanticAnalysis);
            assert_eq!(error.message, "unable to resolve class `Missing`");
        }
    }

    #[test]
    fn test_break_and_continue_placement() {
        assert!(analyzed("break").is_err());
        assert!(analyzed("while (true) { continue }").is_ok());
        assert!(analyzed("switch (x) { case 1: break }").is_ok());
        assert!(analyzed("switch (x) { case 1: continue }").is_err());
        assert!(analyzed("for (i in xs) { [1].each { break } }").is_err());
    }

    #[test]
    fn test_closure_parameters() {
        let module = analyzed("xs.each { println(it) }").expect("source should analyze");
        let statements = run_statements(&module);

        let Expr::MethodCall(each) = &expression_of(&statements[0]).node else {
            panic!("expected a method call");
        };
        let Expr::ArgumentList(arguments) = &each.arguments.node else {
            panic!("expected an argument list");
        };
        let Expr::Closure(closure) = &arguments[0].node else {
            panic!("expected a closure");
        };
        let Stmt::Block(body) = &closure.code.node else {
            panic!("expected a block");
        };
        let Expr::MethodCall(println) = &expression_of(&body.statements[0]).node else {
            panic!("expected a method call");
        };
        let Expr::ArgumentList(arguments) = &println.arguments.node else {
            panic!("expected an argument list");
        };

        assert_eq!(origin_of(&arguments[0]), Some(VariableOrigin::Parameter));
    }

    #[test]
    fn test_static_calls_to_own_methods() {
        let source = indoc! {"
            class Util {
                static int twice(int x) { x * 2 }
                static int quad(int x) { twice(twice(x)) }
            }
        "};
        let module = analyzed(source).expect("source should analyze");
        let quad = &module.classes[0].methods[1];

        let Some(Stmt::Block(body)) = quad.code.as_ref().map(|code| &code.node) else {
            panic!("method should have a body");
        };
        let Expr::StaticMethodCall(call) = &expression_of(&body.statements[0]).node else {
            panic!("expected a static method call");
        };

        assert_eq!(call.owner_type.name, "Util");
        assert_eq!(call.method, "twice");
    }
}
