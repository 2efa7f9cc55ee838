//! Phased compilation of a script into a [`ModuleNode`].
//!
//! Each phase refines the module in place; a unit compiled to a given
//! [`CompilePhase`] exposes the AST exactly as that phase left it.

use strum::IntoEnumIterator;
use tracing::debug;

use crate::{
    common::ast::{ClassNode, ModuleNode, ParsedModule},
    error::Error,
    parser,
};

mod canonical;
mod conversion;
mod error;
mod generation;
mod instruction;
mod phase;
mod semantic;

pub use error::{CompilationError, FallableAction};
pub use phase::CompilePhase;

/// Callback run for every class of a unit once the requested phase completes.
pub type PhaseOperation<'a> = Box<dyn Fn(&ModuleNode, &ClassNode) + Send + Sync + 'a>;

/// A single source unit moving through the compile phases.
pub struct CompilationUnit<'a> {
    name: String,
    source: String,
    parsed: Option<ParsedModule>,
    module: Option<ModuleNode>,
    completed: Option<CompilePhase>,
    operations: Vec<PhaseOperation<'a>>,
}

impl<'a> CompilationUnit<'a> {
    pub fn new<N: Into<String>, S: Into<String>>(name: N, source: S) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            parsed: None,
            module: None,
            completed: None,
            operations: vec![],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register a callback invoked once per class (in declaration order)
    /// every time [`compile`](Self::compile) reaches its target phase.
    pub fn add_phase_operation(&mut self, operation: PhaseOperation<'a>) {
        self.operations.push(operation);
    }

    /// The module built so far; available from [`CompilePhase::Conversion`] on.
    pub const fn module(&self) -> Option<&ModuleNode> {
        self.module.as_ref()
    }

    /// Last phase this unit has been through.
    pub const fn completed_phase(&self) -> Option<CompilePhase> {
        self.completed
    }

    /// Run every phase up to and including `target` (phases that already ran
    /// are not repeated), then hand each class to the registered operations.
    pub fn compile(&mut self, target: CompilePhase) -> Result<(), Error> {
        for phase in CompilePhase::iter().take_while(|phase| *phase <= target) {
            if self.completed.is_some_and(|completed| phase <= completed) {
                continue;
            }

            debug!(unit = %self.name, %phase, "running phase");
            self.run_phase(phase)?;
            self.completed = Some(phase);
        }

        if let Some(module) = &self.module {
            for operation in &self.operations {
                for class in &module.classes {
                    operation(module, class);
                }
            }
        }

        Ok(())
    }

    fn run_phase(&mut self, phase: CompilePhase) -> Result<(), Error> {
        match phase {
            CompilePhase::Initialization | CompilePhase::Output | CompilePhase::Finalization => {}
            CompilePhase::Parsing => {
                self.parsed = Some(parser::parse_module(&self.source)?);
            }
            CompilePhase::Conversion => {
                if let Some(parsed) = self.parsed.take() {
                    self.module = Some(conversion::convert(&self.name, parsed)?);
                }
            }
            CompilePhase::SemanticAnalysis => {
                if let Some(module) = &mut self.module {
                    semantic::analyze(module)?;
                }
            }
            CompilePhase::Canonicalization => {
                if let Some(module) = &mut self.module {
                    canonical::canonicalize(module);
                }
            }
            CompilePhase::InstructionSelection => {
                if let Some(module) = &mut self.module {
                    instruction::infer_types(module);
                }
            }
            CompilePhase::ClassGeneration => {
                if let Some(module) = &mut self.module {
                    generation::generate(module);
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use indoc::indoc;
    use pretty_assertions::assert_eq;

    use super::*;

    fn compiled(source: &str, phase: CompilePhase) -> ModuleNode {
        let mut unit = CompilationUnit::new("Script1", source);
        unit.compile(phase).expect("source should compile");
        unit.module().cloned().expect("module should exist after conversion")
    }

    #[test]
    fn test_no_module_before_conversion() {
        let mut unit = CompilationUnit::new("Script1", "x = 1");
        unit.compile(CompilePhase::Parsing).expect("source should parse");

        assert!(unit.module().is_none());
        assert_eq!(unit.completed_phase(), Some(CompilePhase::Parsing));
    }

    #[test]
    fn test_syntax_error_aborts() {
        let mut unit = CompilationUnit::new("Script1", "x = (");

        assert!(matches!(
            unit.compile(CompilePhase::Conversion),
            Err(Error::Parse(_))
        ));
        assert_eq!(unit.completed_phase(), Some(CompilePhase::Initialization));
    }

    #[test]
    fn test_operations_run_per_class_in_order() {
        let source = indoc! {"
            class A {}
            class B {}
            println('hi')
        "};
        let visited = Mutex::new(vec![]);

        let mut unit = CompilationUnit::new("Script1", source);
        unit.add_phase_operation(Box::new(|_, class| {
            visited
                .lock()
                .expect("lock should not be poisoned")
                .push(class.name.clone());
        }));
        unit.compile(CompilePhase::Canonicalization)
            .expect("source should compile");
        drop(unit);

        assert_eq!(
            visited.into_inner().expect("lock should not be poisoned"),
            vec!["Script1", "A", "B"]
        );
    }

    #[test]
    fn test_operations_do_not_run_before_conversion() {
        let calls = Mutex::new(0);

        let mut unit = CompilationUnit::new("Script1", "x = 1");
        unit.add_phase_operation(Box::new(|_, _| {
            *calls.lock().expect("lock should not be poisoned") += 1;
        }));
        unit.compile(CompilePhase::Parsing).expect("source should parse");
        drop(unit);

        assert_eq!(calls.into_inner().expect("lock should not be poisoned"), 0);
    }

    #[test]
    fn test_compile_is_incremental() {
        let mut unit = CompilationUnit::new("Script1", "x = 1");
        unit.compile(CompilePhase::SemanticAnalysis)
            .expect("source should compile");
        unit.compile(CompilePhase::ClassGeneration)
            .expect("source should compile");

        let script = unit
            .module()
            .and_then(ModuleNode::script_class)
            .expect("script class should exist");
        assert!(script.generated);
        assert_eq!(unit.completed_phase(), Some(CompilePhase::ClassGeneration));
    }

    #[test]
    fn test_phases_refine_the_module() {
        let converted = compiled("x = 1", CompilePhase::Conversion);
        let generated = compiled("x = 1", CompilePhase::ClassGeneration);

        let before = converted.script_class().expect("script class should exist");
        let after = generated.script_class().expect("script class should exist");

        assert!(!before.has_method("$getStaticMetaClass", 0));
        assert!(after.has_method("$getStaticMetaClass", 0));
    }
}
