// Expression Translator
//
// Dispatches every expression kind to its translator. The per-kind logic lives
// in the expr_*.rs modules as further `impl ExprTranslator` blocks; each of
// them recurses back through `translate` for sub-expressions.

use crate::expr_compiler::ast::{Expr, ExprKind, NodeId};
use crate::expr_compiler::collaborators::{
    AssignmentBuilder, CAssignment, FormatBuilder, PrintfFormatter,
};
use crate::expr_compiler::config::TranslatorConfig;
use crate::expr_compiler::scope::{CompileUnit, Scope};
use crate::expr_compiler::translation::Translation;
use crate::expr_compiler::types::{SemanticType, TypeFacts};

/// Where the translated expression's value goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpressionContext {
    /// Value is consumed by an enclosing expression or declaration
    Value,
    /// Expression is a whole statement; its value is discarded
    Statement,
}

static DEFAULT_ASSIGNMENT: CAssignment = CAssignment;
static DEFAULT_FORMATTER: PrintfFormatter = PrintfFormatter;

pub struct ExprTranslator<'a> {
    pub(super) types: &'a dyn TypeFacts,
    pub(super) config: &'a TranslatorConfig,
    pub(super) unit: &'a mut CompileUnit,
    pub(super) assignments: &'a dyn AssignmentBuilder,
    pub(super) formatter: &'a dyn FormatBuilder,
}

impl<'a> ExprTranslator<'a> {
    pub fn new(
        types: &'a dyn TypeFacts,
        config: &'a TranslatorConfig,
        unit: &'a mut CompileUnit,
    ) -> Self {
        ExprTranslator {
            types,
            config,
            unit,
            assignments: &DEFAULT_ASSIGNMENT,
            formatter: &DEFAULT_FORMATTER,
        }
    }

    pub fn with_assignment_builder(mut self, builder: &'a dyn AssignmentBuilder) -> Self {
        self.assignments = builder;
        self
    }

    pub fn with_format_builder(mut self, builder: &'a dyn FormatBuilder) -> Self {
        self.formatter = builder;
        self
    }

    pub fn resolve_type(&self, expr: &Expr) -> SemanticType {
        self.types.resolve(expr)
    }

    pub fn config(&self) -> &TranslatorConfig {
        self.config
    }

    pub(super) fn declare_temporary(&mut self, node: NodeId, prefix: &str) -> String {
        self.unit.declare_temporary(node, prefix)
    }

    /// Translate an expression whose value is used
    pub fn translate_value(&mut self, expr: &Expr) -> Translation {
        self.translate(expr, ExpressionContext::Value)
    }

    /// Translate an expression standing alone as a statement
    pub fn translate_statement(&mut self, expr: &Expr) -> Translation {
        self.translate(expr, ExpressionContext::Statement)
    }

    /// Translate `expr` as a statement of `scope`: hoisted statements first,
    /// then the expression itself. Returns false when the statement could only
    /// be kept as a marker comment.
    pub fn emit_statement(&mut self, scope: &mut Scope, expr: &Expr) -> bool {
        let translation = self.translate_statement(expr);
        let translated = !translation.is_marker();
        scope.push_statement(self.unit, translation);
        translated
    }

    pub fn translate(&mut self, expr: &Expr, context: ExpressionContext) -> Translation {
        log::trace!("translating {} `{}` ({:?})", expr.id, expr.text, context);

        match &expr.kind {
            ExprKind::NumericLiteral(raw) => self.translate_numeric_literal(raw),
            ExprKind::StringLiteral(raw) => self.translate_string_literal(raw),
            ExprKind::Identifier(_)
            | ExprKind::PropertyAccess { .. }
            | ExprKind::ElementAccess { .. } => self.translate_access(expr),
            ExprKind::Binary {
                left,
                operator,
                right,
            } => self.translate_binary(expr, left, *operator, right),
            ExprKind::Unary {
                operator,
                operand,
                fixity,
            } => self.translate_unary(expr, *operator, operand, *fixity),
            ExprKind::Conditional {
                condition,
                when_true,
                when_false,
            } => self.translate_conditional(condition, when_true, when_false),
            ExprKind::Call { callee, arguments } => {
                self.translate_call(callee, arguments, context)
            }
            ExprKind::ArrayLiteral(elements) => self.translate_array_literal(expr, elements),
            ExprKind::Parenthesized(inner) => {
                let mut result = Translation::default();
                let inner = result.absorb(self.translate_value(inner));
                result.with_fragment(format!("({})", inner))
            }
        }
    }
}

#[cfg(test)]
#[path = "translator_tests.rs"]
mod tests;
