//! Last structural changes before classes are emitted:
//! each class gets its static meta-class accessor.

#[allow(clippy::wildcard_imports)]
use crate::common::ast::*;

pub const META_CLASS_ACCESSOR: &str = "$getStaticMetaClass";

pub fn generate(module: &mut ModuleNode) {
    for class in &mut module.classes {
        if class.generated {
            continue;
        }

        if !class.has_method(META_CLASS_ACCESSOR, 0) {
            class.methods.push(meta_class_accessor(&class.name));
        }
        class.generated = true;
    }
}

fn meta_class_accessor(class_name: &str) -> MethodNode {
    let instructions = [
        "aload 0".to_owned(),
        "invokevirtual Object.getClass".to_owned(),
        format!("ldc {class_name}"),
        "if_acmpeq cached".to_owned(),
        "invokestatic ScriptBytecodeAdapter.initMetaClass".to_owned(),
        "areturn".to_owned(),
        "cached: getstatic $staticClassInfo.getMetaClass".to_owned(),
        "areturn".to_owned(),
    ];

    let body = Statement::block(vec![Statement::internal(Stmt::Return(
        Expression::internal(Expr::Bytecode(instructions.to_vec())).boxed(),
    ))]);

    MethodNode::synthetic(
        META_CLASS_ACCESSOR,
        Modifiers {
            visibility: Some(Visibility::Protected),
            ..Modifiers::default()
        },
        TypeName::new("MetaClass"),
        vec![],
        body,
    )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{compiler::conversion::convert, parser::parse_module};

    #[test]
    fn test_meta_class_accessor_is_added_once() {
        let parsed = parse_module("class A {}\nx = 1").expect("source should parse");
        let mut module = convert("Script1", parsed).expect("source should convert");

        generate(&mut module);
        generate(&mut module);

        for class in &module.classes {
            assert!(class.generated);
            assert_eq!(
                class
                    .methods
                    .iter()
                    .filter(|method| method.name == META_CLASS_ACCESSOR)
                    .count(),
                1
            );
        }
    }

    #[test]
    fn test_accessor_returns_bytecode() {
        let accessor = meta_class_accessor("A");

        assert_eq!(accessor.modifiers.visibility, Some(Visibility::Protected));
        assert!(accessor.synthetic);
        assert!(matches!(
            accessor.code.as_ref().map(|code| &code.node),
            Some(Stmt::Block(block)) if matches!(
                &block.statements[0].node,
                Stmt::Return(value) if matches!(&value.node, Expr::Bytecode(instructions) if instructions.contains(&"ldc A".to_owned()))
            )
        ));
    }
}
