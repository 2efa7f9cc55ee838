//! Turn the parsed module into classes: declared classes as written, plus the
//! script class holding the top-level statements and methods.

use std::collections::HashSet;

use heck::ToUpperCamelCase;

#[allow(clippy::wildcard_imports)]
use crate::common::ast::*;

use super::{CompilationError, CompilePhase};

fn error<S: Into<String>>(message: S, span: Span) -> CompilationError {
    CompilationError::new(CompilePhase::Conversion, message, span)
}

pub fn convert(unit_name: &str, parsed: ParsedModule) -> Result<ModuleNode, CompilationError> {
    let ParsedModule {
        statements,
        methods,
        classes,
    } = parsed;

    let mut converted = vec![];

    if !statements.is_empty() || !methods.is_empty() || classes.is_empty() {
        converted.push(script_class(&script_name(unit_name), statements, methods));
    }

    for class in classes {
        converted.push(convert_class(class)?);
    }

    let mut names = HashSet::new();
    for class in &converted {
        if !names.insert(class.name.as_str()) {
            return Err(error(
                format!("invalid duplicate class definition of `{}`", class.name),
                class.span.clone(),
            ));
        }
    }

    Ok(ModuleNode {
        name: unit_name.to_owned(),
        classes: converted,
    })
}

/// Unit names may be file stems (`my-script`), class names may not.
fn script_name(unit_name: &str) -> String {
    let name = unit_name.to_upper_camel_case();

    if name.is_empty() {
        "Script".to_owned()
    } else if name.starts_with(|c: char| c.is_ascii_digit()) {
        format!("Script{name}")
    } else {
        name
    }
}

// region: script class

fn script_class(name: &str, statements: Vec<Statement>, methods: Vec<MethodNode>) -> ClassNode {
    let run = MethodNode::synthetic(
        "run",
        Modifiers::public(),
        TypeName::dynamic(),
        vec![],
        Statement::block(statements),
    );

    let mut class_methods = vec![main_method(name), run];
    class_methods.extend(methods);

    ClassNode {
        name: name.to_owned(),
        modifiers: Modifiers::public(),
        super_class: TypeName::new("Script"),
        interfaces: vec![],
        annotations: vec![],
        constructors: script_constructors(),
        methods: class_methods,
        fields: vec![],
        properties: vec![],
        is_script: true,
        generated: false,
        // did not come from a source file, so does not have a related span
        span: Span::default(),
    }
}

/// `static void main(String[] args) { InvokerHelper.runScript(Name, args) }`
fn main_method(script_name: &str) -> MethodNode {
    let arguments = Expression::internal(Expr::ArgumentList(vec![
        Expression::internal(Expr::Class(TypeName::new(script_name))),
        Expression::variable("args"),
    ]));

    let run_script = Expression::internal(Expr::StaticMethodCall(StaticMethodCallExpression {
        owner_type: TypeName::new("InvokerHelper"),
        method: "runScript".to_owned(),
        arguments: arguments.boxed(),
    }));

    MethodNode::synthetic(
        "main",
        Modifiers::public().with_static(),
        TypeName::new("void"),
        vec![Parameter::new("args", TypeName::new("String").array_of(1))],
        Statement::block(vec![Statement::expression(run_script)]),
    )
}

/// A no-argument constructor and one taking the script's `Binding`.
fn script_constructors() -> Vec<ConstructorNode> {
    let super_call = Expression::internal(Expr::ConstructorCall(ConstructorCallExpression {
        target: TypeName::new("Script"),
        arguments: Expression::internal(Expr::ArgumentList(vec![Expression::variable("context")]))
            .boxed(),
        special: Some(SpecialCall::Super),
    }));

    let constructor = |parameters, statements| ConstructorNode {
        modifiers: Modifiers::public(),
        parameters,
        annotations: vec![],
        code: Some(Statement::block(statements)),
        synthetic: true,
        span: Span::default(),
    };

    vec![
        constructor(vec![], vec![]),
        constructor(
            vec![Parameter::new("context", TypeName::new("Binding"))],
            vec![Statement::expression(super_call)],
        ),
    ]
}

// endregion

// region: declared classes

fn convert_class(class: ParsedClass) -> Result<ClassNode, CompilationError> {
    let ParsedClass {
        name,
        modifiers,
        super_class,
        interfaces,
        annotations,
        members,
        span,
    } = class;

    let mut constructors = vec![];
    let mut methods = vec![];
    let mut fields: Vec<FieldNode> = vec![];
    let mut properties = vec![];

    for member in members {
        match member {
            ClassMember::Field(mut field) => {
                field.owner.clone_from(&name);
                check_unique_field(&fields, &field, &name)?;
                fields.push(field);
            }
            ClassMember::Property(field) => {
                let mut backing_modifiers = Modifiers::private();
                backing_modifiers.is_static = field.modifiers.is_static;
                backing_modifiers.is_final = field.modifiers.is_final;

                let mut property_modifiers = Modifiers::public();
                property_modifiers.is_static = field.modifiers.is_static;
                property_modifiers.is_final = field.modifiers.is_final;

                let property = PropertyNode {
                    name: field.name.clone(),
                    modifiers: property_modifiers,
                    property_type: field.field_type.clone(),
                    field_index: fields.len(),
                    getter_name: None,
                    setter_name: None,
                    span: field.span.clone(),
                };

                let backing_field = FieldNode {
                    modifiers: backing_modifiers,
                    owner: name.clone(),
                    ..field
                };
                check_unique_field(&fields, &backing_field, &name)?;

                fields.push(backing_field);
                properties.push(property);
            }
            ClassMember::Constructor(constructor_name, constructor) => {
                if constructor_name != name {
                    return Err(error(
                        format!(
                            "invalid constructor `{constructor_name}` in class `{name}`; \
                             method declarations need a return type or `def`"
                        ),
                        constructor.span,
                    ));
                }
                constructors.push(constructor);
            }
            ClassMember::Method(method) => methods.push(method),
        }
    }

    Ok(ClassNode {
        name,
        modifiers,
        super_class: super_class.unwrap_or_else(TypeName::dynamic),
        interfaces,
        annotations,
        constructors,
        methods,
        fields,
        properties,
        is_script: false,
        generated: false,
        span,
    })
}

fn check_unique_field(
    fields: &[FieldNode],
    field: &FieldNode,
    class_name: &str,
) -> Result<(), CompilationError> {
    if fields.iter().any(|existing| existing.name == field.name) {
        Err(error(
            format!(
                "the field `{}` is declared multiple times in class `{class_name}`",
                field.name
            ),
            field.span.clone(),
        ))
    } else {
        Ok(())
    }
}

// endregion

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::parser::parse_module;

    fn convert_source(source: &str) -> Result<ModuleNode, CompilationError> {
        convert("Script1", parse_module(source).expect("source should parse"))
    }

    #[test]
    fn test_script_class_for_top_level_statements() {
        let module = convert_source("x = 1").expect("source should convert");

        assert_eq!(module.classes.len(), 1);

        let script = &module.classes[0];
        assert!(script.is_script);
        assert_eq!(script.name, "Script1");
        assert_eq!(script.super_class.name, "Script");
        assert_eq!(
            script
                .methods
                .iter()
                .map(|method| method.name.as_str())
                .collect::<Vec<_>>(),
            vec!["main", "run"]
        );
        assert_eq!(script.constructors.len(), 2);
        assert_eq!(
            module.statement_block().map(ToString::to_string),
            Some("{ (x = 1) }".to_owned())
        );
    }

    #[test]
    fn test_class_only_source_has_no_script_class() {
        let module = convert_source("class A {}").expect("source should convert");

        assert_eq!(module.classes.len(), 1);
        assert!(module.script_class().is_none());
        assert_eq!(module.classes[0].super_class.name, "Object");
    }

    #[test]
    fn test_empty_source_still_gets_a_script_class() {
        let module = convert_source("").expect("source should convert");

        assert!(module.script_class().is_some());
    }

    #[test]
    fn test_top_level_methods_join_the_script_class() {
        let module = convert_source("def twice(x) { x * 2 }").expect("source should convert");
        let script = module.script_class().expect("script class should exist");

        assert!(script.has_method("twice", 1));
    }

    #[test]
    fn test_properties_get_backing_fields() {
        let source = indoc! {"
            class Point {
                private int id
                int x = 3
            }
        "};
        let module = convert_source(source).expect("source should convert");
        let point = &module.classes[0];

        assert_eq!(point.fields.len(), 2);
        assert_eq!(point.properties.len(), 1);

        let property = &point.properties[0];
        let backing_field = point
            .property_field(property)
            .expect("property should have a backing field");

        assert_eq!(backing_field.name, "x");
        assert_eq!(backing_field.owner, "Point");
        assert_eq!(backing_field.modifiers, Modifiers::private());
        assert!(backing_field.initial_expression.is_some());
        assert_eq!(property.modifiers, Modifiers::public());
    }

    #[test]
    fn test_misnamed_constructor() {
        let error = convert_source("class A { B() {} }").expect_err("conversion should fail");

        assert_eq!(error.phase, CompilePhase::Conversion);
        assert!(error.message.contains("invalid constructor `B`"));
    }

    #[test]
    fn test_duplicate_field() {
        let error = convert_source("class A { int x\n private int x }")
            .expect_err("conversion should fail");

        assert!(error.message.contains("declared multiple times"));
    }

    #[test]
    fn test_duplicate_class() {
        assert!(convert_source("class A {}\nclass A {}").is_err());
    }

    #[test]
    fn test_script_name_is_a_class_name() {
        assert_eq!(script_name("my-script"), "MyScript");
        assert_eq!(script_name("Script1"), "Script1");
        assert_eq!(script_name("1st"), "Script1st");
        assert_eq!(script_name(""), "Script");
    }
}
