//! Complete every class with the members the language implies:
//! a default constructor and accessors for each property.

use heck::ToUpperCamelCase;

#[allow(clippy::wildcard_imports)]
use crate::common::ast::*;

pub fn canonicalize(module: &mut ModuleNode) {
    for class in &mut module.classes {
        if class.constructors.is_empty() {
            class.constructors.push(default_constructor());
        }
        add_property_accessors(class);
    }
}

fn default_constructor() -> ConstructorNode {
    ConstructorNode {
        modifiers: Modifiers::public(),
        parameters: vec![],
        annotations: vec![],
        code: Some(Statement::block(vec![])),
        synthetic: true,
        // did not come from a source file, so does not have a related span
        span: Span::default(),
    }
}

// region: accessors

/// `getX()` and (unless the property is final) `setX(value)`,
/// skipping any accessor the class already declares.
fn add_property_accessors(class: &mut ClassNode) {
    let mut accessors = vec![];

    for property in &mut class.properties {
        let suffix = property.name.to_upper_camel_case();
        let getter_name = format!("get{suffix}");
        let setter_name = format!("set{suffix}");

        let declares = |name: &str, arity: usize| {
            class
                .methods
                .iter()
                .any(|method| method.name == name && method.parameters.len() == arity)
        };

        if !declares(&getter_name, 0) {
            accessors.push(getter(&getter_name, property, &class.name));
        }
        property.getter_name = Some(getter_name);

        if !property.modifiers.is_final {
            if !declares(&setter_name, 1) {
                accessors.push(setter(&setter_name, property, &class.name));
            }
            property.setter_name = Some(setter_name);
        }
    }

    class.methods.extend(accessors);
}

fn field_of(property: &PropertyNode, owner: &str) -> Expression {
    Expression::internal(Expr::Field(FieldExpression {
        field: property.name.clone(),
        owner: owner.to_owned(),
    }))
}

fn accessor_modifiers(property: &PropertyNode) -> Modifiers {
    let mut modifiers = Modifiers::public();
    modifiers.is_static = property.modifiers.is_static;
    modifiers
}

fn getter(name: &str, property: &PropertyNode, owner: &str) -> MethodNode {
    MethodNode::synthetic(
        name,
        accessor_modifiers(property),
        property.property_type.clone(),
        vec![],
        Statement::block(vec![Statement::internal(Stmt::Return(
            field_of(property, owner).boxed(),
        ))]),
    )
}

fn setter(name: &str, property: &PropertyNode, owner: &str) -> MethodNode {
    let mut value = VariableExpression::new("value");
    value.origin = Some(VariableOrigin::Parameter);

    let assignment = Expression::internal(Expr::Binary(BinaryExpression {
        left: field_of(property, owner).boxed(),
        operation: "=".to_owned(),
        right: Expression::internal(Expr::Variable(value)).boxed(),
    }));

    MethodNode::synthetic(
        name,
        accessor_modifiers(property),
        TypeName::new("void"),
        vec![Parameter::new("value", property.property_type.clone())],
        Statement::block(vec![Statement::expression(assignment)]),
    )
}

// endregion

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{compiler::conversion::convert, parser::parse_module};

    fn canonical(source: &str) -> ModuleNode {
        let parsed = parse_module(source).expect("source should parse");
        let mut module = convert("Script1", parsed).expect("source should convert");
        canonicalize(&mut module);
        module
    }

    fn method_names(class: &ClassNode) -> Vec<&str> {
        class.methods.iter().map(|method| method.name.as_str()).collect()
    }

    #[test]
    fn test_default_constructor() {
        let module = canonical("class A {}\nclass B { B(int x) {} }");

        assert_eq!(module.classes[0].constructors.len(), 1);
        assert!(module.classes[0].constructors[0].synthetic);
        assert_eq!(module.classes[1].constructors.len(), 1);
        assert!(!module.classes[1].constructors[0].synthetic);
    }

    #[test]
    fn test_property_accessors() {
        let source = indoc! {"
            class Person {
                String firstName
                final int age = 3
                private int secret
            }
        "};
        let module = canonical(source);
        let person = &module.classes[0];

        assert_eq!(method_names(person), vec!["getFirstName", "setFirstName", "getAge"]);

        let first_name = person.find_property("firstName").expect("property should exist");
        assert_eq!(first_name.getter_name.as_deref(), Some("getFirstName"));
        assert_eq!(first_name.setter_name.as_deref(), Some("setFirstName"));

        let age = person.find_property("age").expect("property should exist");
        assert_eq!(age.setter_name, None);
    }

    #[test]
    fn test_accessor_bodies() {
        let module = canonical("class P { int x }");
        let point = &module.classes[0];

        let rendered: Vec<String> = point
            .methods
            .iter()
            .filter_map(|method| method.code.as_ref())
            .map(ToString::to_string)
            .collect();

        assert_eq!(rendered, vec!["{ return this.@x }", "{ (this.@x = value) }"]);
    }

    #[test]
    fn test_declared_accessors_are_kept() {
        let source = indoc! {"
            class P {
                int x
                int getX() { 42 }
            }
        "};
        let module = canonical(source);
        let point = &module.classes[0];

        assert_eq!(method_names(point), vec!["getX", "setX"]);
        assert!(!point.methods[0].synthetic);
    }
}
