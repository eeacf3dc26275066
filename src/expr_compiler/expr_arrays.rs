// Array literals in expression position
//
// C has no array literal expression, so every literal is materialized in a
// temporary. A fixed array made only of literals gets an initializer list;
// anything else is filled element by element through the assignment builder.

use crate::expr_compiler::ast::Expr;
use crate::expr_compiler::runtime::RuntimeFeature;
use crate::expr_compiler::scope::{TemporaryVariable, VariableType};
use crate::expr_compiler::translation::Translation;
use crate::expr_compiler::translator::ExprTranslator;
use crate::expr_compiler::types::SemanticType;

impl ExprTranslator<'_> {
    pub(super) fn translate_array_literal(
        &mut self,
        expr: &Expr,
        elements: &[Expr],
    ) -> Translation {
        if elements.is_empty() {
            log::warn!("empty array literal in expression position");
            return Translation::marker("Empty array is not supported inside expressions");
        }

        let array_type = match self.resolve_type(expr) {
            SemanticType::Array(array) => array,
            other => {
                log::warn!("array literal `{}` resolved to {}", expr.text, other);
                return Translation::marker("Unsupported use of array literal expression");
            }
        };

        let config = self.config;
        let name = self.declare_temporary(expr.id, &config.array_temp_prefix);
        let is_dynamic = array_type.is_dynamic;
        let declared_type = SemanticType::Array(array_type);
        let mut result = Translation::default();

        if !is_dynamic && elements.iter().all(Expr::is_literal) {
            let mut values = Vec::with_capacity(elements.len());
            for element in elements {
                let value = self.translate_value(element);
                values.push(result.absorb(value));
            }
            result.declare(
                TemporaryVariable::new(name.as_str(), VariableType::Semantic(declared_type))
                    .with_initializer(format!("{{ {} }}", values.join(", "))),
            );
        } else {
            result.declare(TemporaryVariable::new(
                name.as_str(),
                VariableType::Semantic(declared_type.clone()),
            ));
            if is_dynamic {
                result.activate(RuntimeFeature::Array);
                result.hoist(format!(
                    "ARRAY_CREATE({}, {}, {});",
                    name,
                    elements.len(),
                    elements.len()
                ));
            }
            let builder = self.assignments;
            for (index, element) in elements.iter().enumerate() {
                let assignment =
                    builder.build(self, &name, &index.to_string(), &declared_type, element);
                result.absorb(assignment);
            }
        }

        log::debug!("array literal `{}` materialized as {}", expr.text, name);

        if is_dynamic {
            result.with_fragment(format!("((void *){})", name))
        } else {
            result.with_fragment(name)
        }
    }
}

#[cfg(test)]
#[path = "expr_arrays_tests.rs"]
mod tests;
