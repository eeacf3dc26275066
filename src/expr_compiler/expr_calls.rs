// Call expressions
//
// Array `push`/`pop` become the array macros, configured output entry points
// go to the format builder and every other call is emitted with its callee
// text unchanged.

use crate::expr_compiler::ast::{Expr, ExprKind};
use crate::expr_compiler::runtime::RuntimeFeature;
use crate::expr_compiler::translation::Translation;
use crate::expr_compiler::translator::{ExprTranslator, ExpressionContext};

impl ExprTranslator<'_> {
    pub(super) fn translate_call(
        &mut self,
        callee: &Expr,
        arguments: &[Expr],
        context: ExpressionContext,
    ) -> Translation {
        if self.config.is_format_entry_point(&callee.text) {
            log::debug!("`{}` delegated to format builder", callee.text);
            let formatter = self.formatter;
            let mut result = formatter.build(self, arguments);
            result.activate(RuntimeFeature::Printf);
            return result;
        }

        if let ExprKind::PropertyAccess { object, property } = &callee.kind {
            match (property.as_str(), arguments) {
                ("push", [item]) => return self.translate_push(object, item, context),
                ("pop", []) => return self.translate_pop(object),
                _ => {}
            }
        }

        let mut result = Translation::default();
        let mut values = Vec::with_capacity(arguments.len());
        for argument in arguments {
            let value = self.translate_value(argument);
            values.push(result.absorb(value));
        }
        result.with_fragment(format!("{}({})", callee.text, values.join(", ")))
    }

    fn translate_push(
        &mut self,
        array: &Expr,
        item: &Expr,
        context: ExpressionContext,
    ) -> Translation {
        let mut result = Translation::default();
        let base = result.absorb(self.translate_value(array));
        let value = result.absorb(self.translate_value(item));
        result.activate(RuntimeFeature::Array);

        match context {
            ExpressionContext::Statement => {
                result.with_fragment(format!("ARRAY_PUSH({}, {})", base, value))
            }
            ExpressionContext::Value => {
                // push evaluates to the new length
                result.hoist(format!("ARRAY_PUSH({}, {});", base, value));
                result.with_fragment(format!("{}->size", base))
            }
        }
    }

    fn translate_pop(&mut self, array: &Expr) -> Translation {
        let mut result = Translation::default();
        let base = result.absorb(self.translate_value(array));
        result.activate(RuntimeFeature::Array);
        result.activate(RuntimeFeature::ArrayPop);
        result.with_fragment(format!("ARRAY_POP({})", base))
    }
}

#[cfg(test)]
#[path = "expr_calls_tests.rs"]
mod tests;
