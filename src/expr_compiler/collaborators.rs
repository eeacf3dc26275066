// Translator collaborators
//
// Element stores and formatted output have their own C shapes, so the
// translator hands them to these builders. Both call back into the
// translator for their sub-expressions.

use crate::expr_compiler::ast::Expr;
use crate::expr_compiler::config::is_c_identifier;
use crate::expr_compiler::runtime::RuntimeFeature;
use crate::expr_compiler::translation::Translation;
use crate::expr_compiler::translator::ExprTranslator;
use crate::expr_compiler::types::SemanticType;

/// Builds the statement storing `value` into `target[index]` (or the field or
/// key named by `index`)
pub trait AssignmentBuilder {
    fn build(
        &self,
        translator: &mut ExprTranslator<'_>,
        target: &str,
        index: &str,
        declared_type: &SemanticType,
        value: &Expr,
    ) -> Translation;
}

/// Builds the output expression for a formatted-output call
pub trait FormatBuilder {
    fn build(&self, translator: &mut ExprTranslator<'_>, arguments: &[Expr]) -> Translation;
}

/// Element and member stores as plain C assignments; the statement is hoisted
/// and the returned fragment is empty
#[derive(Debug, Clone, Copy, Default)]
pub struct CAssignment;

impl AssignmentBuilder for CAssignment {
    fn build(
        &self,
        translator: &mut ExprTranslator<'_>,
        target: &str,
        index: &str,
        declared_type: &SemanticType,
        value: &Expr,
    ) -> Translation {
        let mut result = Translation::default();
        let value = result.absorb(translator.translate_value(value));

        let statement = match declared_type {
            SemanticType::Array(array) if array.is_dynamic => {
                format!("{}->data[{}] = {};", target, index, value)
            }
            SemanticType::Array(_) => format!("{}[{}] = {};", target, index, value),
            SemanticType::Record(record) if record.is_map => {
                result.activate(RuntimeFeature::Dict);
                let key = if is_c_identifier(index) {
                    format!("\"{}\"", index)
                } else {
                    index.to_string()
                };
                format!("DICT_SET({}, {}, {});", target, key, value)
            }
            SemanticType::Record(_) => format!("{}->{} = {};", target, index, value),
            _ => format!("{} = {};", target, value),
        };

        result.hoist(statement);
        result
    }
}

/// One `printf` per argument, space separated with a trailing newline,
/// chained with the comma operator
#[derive(Debug, Clone, Copy, Default)]
pub struct PrintfFormatter;

impl FormatBuilder for PrintfFormatter {
    fn build(&self, translator: &mut ExprTranslator<'_>, arguments: &[Expr]) -> Translation {
        let mut result = Translation::default();
        result.activate(RuntimeFeature::Printf);

        if arguments.is_empty() {
            return result.with_fragment("printf(\"\\n\")");
        }

        let last = arguments.len() - 1;
        let mut calls = Vec::with_capacity(arguments.len());
        for (position, argument) in arguments.iter().enumerate() {
            let separator = if position == last { "\\n" } else { " " };
            let argument_type = translator.resolve_type(argument);
            let call = match argument_type {
                SemanticType::String => {
                    let value = result.absorb(translator.translate_value(argument));
                    format!("printf(\"%s{}\", {})", separator, value)
                }
                SemanticType::Number => {
                    let value = result.absorb(translator.translate_value(argument));
                    format!("printf(\"%d{}\", {})", separator, value)
                }
                SemanticType::Boolean => {
                    let value = result.absorb(translator.translate_value(argument));
                    format!(
                        "printf({} ? \"true{sep}\" : \"false{sep}\")",
                        value,
                        sep = separator
                    )
                }
                other => {
                    log::warn!("cannot print `{}` of type {}", argument.text, other);
                    let marker = Translation::marker(format!(
                        "unsupported printf argument {}",
                        argument.text
                    ));
                    format!("{} printf(\"{}\")", marker.fragment, separator)
                }
            };
            calls.push(call);
        }

        result.with_fragment(calls.join(", "))
    }
}
