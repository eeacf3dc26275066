// Expression Compiler Module
// Type-directed translation of TypeScript expressions into C

pub mod ast;
pub mod collaborators;
pub mod config;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod runtime;
pub mod scope;
pub mod translation;
pub mod translator;
pub mod types;

mod expr_access;
mod expr_arrays;
mod expr_calls;
mod expr_literals;
mod expr_operators;

pub use collaborators::{AssignmentBuilder, CAssignment, FormatBuilder, PrintfFormatter};
pub use config::TranslatorConfig;
pub use error::CompilerError;
pub use expr_literals::{normalize_numeric_literal, normalize_string_literal};
pub use runtime::{RuntimeFeature, RuntimeFlags};
pub use scope::{CompileUnit, Scope};
pub use translation::Translation;
pub use translator::{ExprTranslator, ExpressionContext};
pub use types::{SemanticType, TypeEnvironment, TypeFacts};

/// Translated block of expression statements together with the compile
/// state it produced
#[derive(Debug)]
pub struct CompiledBlock {
    pub unit: CompileUnit,
    pub scope: Scope,
}

impl CompiledBlock {
    /// Declarations and statements of the block, indented one level
    pub fn body(&self) -> String {
        self.scope.render(1)
    }

    /// Support code for the features used, followed by the block body
    pub fn to_c(&self) -> String {
        self.unit.assemble(&self.body())
    }
}

/// Main compiler structure
#[derive(Debug, Clone, Default)]
pub struct ExpressionCompiler {
    config: TranslatorConfig,
}

impl ExpressionCompiler {
    /// Create a compiler with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: TranslatorConfig) -> Self {
        ExpressionCompiler { config }
    }

    pub fn config(&self) -> &TranslatorConfig {
        &self.config
    }

    /// Compile `;`-separated expression statements against the given types
    pub fn compile(
        &self,
        source: &str,
        types: &dyn TypeFacts,
    ) -> Result<CompiledBlock, CompilerError> {
        // Phase 1: Lexical Analysis and Parsing
        let statements = parser::parse_expression_statements(source)?;

        // Phase 2: Reserve source identifiers so temporaries never shadow them
        let mut unit = CompileUnit::new();
        for statement in &statements {
            statement.walk(&mut |node: &ast::Expr| {
                if let Some(name) = node.as_identifier() {
                    unit.reserve_name(name);
                }
            });
        }

        // Phase 3: Translation
        let mut scope = Scope::new();
        let mut markers = 0;
        {
            let mut translator = ExprTranslator::new(types, &self.config, &mut unit);
            for statement in &statements {
                if !translator.emit_statement(&mut scope, statement) {
                    markers += 1;
                }
            }
        }

        log::debug!(
            "compiled {} statements ({} left as markers), runtime features: {:?}",
            statements.len(),
            markers,
            unit.flags.with_prerequisites()
        );

        Ok(CompiledBlock { unit, scope })
    }
}
