// Operator expressions: binary, unary and conditional
//
// Binary operators are type-directed. Number/number pairs map straight onto
// C operators; anything involving strings becomes calls into the string
// support routines, with `+` materializing its result in a heap buffer.

use crate::expr_compiler::ast::{BinaryOp, Expr, Fixity, UnaryOp};
use crate::expr_compiler::runtime::RuntimeFeature;
use crate::expr_compiler::scope::{TemporaryVariable, VariableType};
use crate::expr_compiler::translation::Translation;
use crate::expr_compiler::translator::ExprTranslator;
use crate::expr_compiler::types::SemanticType;
use indexmap::IndexMap;

lazy_static! {
    /// C spelling of each operator supported between two numbers
    static ref NUMBER_OPERATORS: IndexMap<BinaryOp, &'static str> = {
        let mut operators = IndexMap::new();
        operators.insert(BinaryOp::Greater, ">");
        operators.insert(BinaryOp::GreaterEqual, ">=");
        operators.insert(BinaryOp::Less, "<");
        operators.insert(BinaryOp::LessEqual, "<=");
        operators.insert(BinaryOp::Equal, "==");
        operators.insert(BinaryOp::StrictEqual, "==");
        operators.insert(BinaryOp::NotEqual, "!=");
        operators.insert(BinaryOp::StrictNotEqual, "!=");
        operators.insert(BinaryOp::Multiply, "*");
        operators.insert(BinaryOp::Divide, "/");
        operators.insert(BinaryOp::Add, "+");
        operators.insert(BinaryOp::Subtract, "-");
        operators
    };
}

/// Translation chosen for one binary expression from its operand types
#[derive(Debug, Clone, Copy, PartialEq)]
enum BinaryStrategy {
    Operator(&'static str),
    StringCompare { negated: bool },
    StringConcat,
    MixedCompare { negated: bool, number_left: bool },
    MixedConcat { number_left: bool },
}

fn binary_strategy(
    operator: BinaryOp,
    left: &SemanticType,
    right: &SemanticType,
) -> Option<BinaryStrategy> {
    let negated = operator.is_negated_equality();
    match (left, right) {
        (SemanticType::Number, SemanticType::Number) => NUMBER_OPERATORS
            .get(&operator)
            .map(|symbol| BinaryStrategy::Operator(*symbol)),
        (SemanticType::String, SemanticType::String) if operator.is_equality() => {
            Some(BinaryStrategy::StringCompare { negated })
        }
        (SemanticType::String, SemanticType::String) if operator == BinaryOp::Add => {
            Some(BinaryStrategy::StringConcat)
        }
        (SemanticType::Number, SemanticType::String)
        | (SemanticType::String, SemanticType::Number) => {
            let number_left = *left == SemanticType::Number;
            if operator.is_equality() {
                Some(BinaryStrategy::MixedCompare {
                    negated,
                    number_left,
                })
            } else if operator == BinaryOp::Add {
                Some(BinaryStrategy::MixedConcat { number_left })
            } else {
                None
            }
        }
        _ => None,
    }
}

fn comparison_suffix(negated: bool) -> &'static str {
    if negated {
        "!= 0"
    } else {
        "== 0"
    }
}

impl ExprTranslator<'_> {
    pub(super) fn translate_binary(
        &mut self,
        expr: &Expr,
        left: &Expr,
        operator: BinaryOp,
        right: &Expr,
    ) -> Translation {
        let left_type = self.resolve_type(left);
        let right_type = self.resolve_type(right);

        let strategy = match binary_strategy(operator, &left_type, &right_type) {
            Some(strategy) => strategy,
            None => {
                log::debug!(
                    "no translation for {} {} {} in `{}`",
                    left_type,
                    operator,
                    right_type,
                    expr.text
                );
                return Translation::unsupported(&expr.text);
            }
        };

        let mut result = Translation::default();
        let l = result.absorb(self.translate_value(left));
        let r = result.absorb(self.translate_value(right));

        let fragment = match strategy {
            BinaryStrategy::Operator(symbol) => format!("{} {} {}", l, symbol, r),
            BinaryStrategy::StringCompare { negated } => {
                result.activate(RuntimeFeature::Strings);
                format!("strcmp({}, {}) {}", l, r, comparison_suffix(negated))
            }
            BinaryStrategy::MixedCompare {
                negated,
                number_left,
            } => {
                result.activate(RuntimeFeature::StrInt16Cmp);
                let (string, number) = if number_left { (&r, &l) } else { (&l, &r) };
                format!(
                    "str_int16_t_cmp({}, {}) {}",
                    string,
                    number,
                    comparison_suffix(negated)
                )
            }
            BinaryStrategy::StringConcat => {
                let buffer = self.string_buffer(expr, &mut result);
                result.hoist(format!(
                    "{t} = malloc(strlen({l}) + strlen({r}) + 1);\nassert({t} != NULL);",
                    t = buffer,
                    l = l,
                    r = r
                ));
                result.hoist(format!("strcpy({}, {});", buffer, l));
                result.hoist(format!("strcat({}, {});", buffer, r));
                buffer
            }
            BinaryStrategy::MixedConcat { number_left } => {
                result.activate(RuntimeFeature::StrInt16Cat);
                let buffer = self.string_buffer(expr, &mut result);
                let string = if number_left { &r } else { &l };
                result.hoist(format!(
                    "{t} = malloc(strlen({s}) + STR_INT16_T_BUFLEN + 1);\nassert({t} != NULL);",
                    t = buffer,
                    s = string
                ));
                result.hoist(format!("{}[0] = '\\0';", buffer));
                // Appends follow source order, whichever side holds the number
                if number_left {
                    result.hoist(format!("str_int16_t_cat({}, {});", buffer, l));
                    result.hoist(format!("strcat({}, {});", buffer, r));
                } else {
                    result.hoist(format!("strcat({}, {});", buffer, l));
                    result.hoist(format!("str_int16_t_cat({}, {});", buffer, r));
                }
                buffer
            }
        };

        result.with_fragment(fragment)
    }

    /// Fresh heap string temporary for a concatenation
    fn string_buffer(&mut self, expr: &Expr, result: &mut Translation) -> String {
        let config = self.config;
        let buffer = self.declare_temporary(expr.id, &config.string_temp_prefix);
        result.declare(TemporaryVariable::new(buffer.as_str(), VariableType::raw("char *")));
        result.activate(RuntimeFeature::Strings);
        result.activate(RuntimeFeature::Malloc);
        buffer
    }

    pub(super) fn translate_unary(
        &mut self,
        expr: &Expr,
        operator: UnaryOp,
        operand: &Expr,
        fixity: Fixity,
    ) -> Translation {
        if self.resolve_type(operand) != SemanticType::Number {
            return Translation::unsupported(&expr.text);
        }

        let symbol = match operator {
            UnaryOp::Increment => "++",
            UnaryOp::Decrement => "--",
            UnaryOp::Not => "!",
            UnaryOp::Plus => {
                let mut result = Translation::default();
                let value = result.absorb(self.translate_value(operand));
                result.activate(RuntimeFeature::Atoi);
                return result.with_fragment(format!("atoi({})", value));
            }
            UnaryOp::Minus => return Translation::unsupported(&expr.text),
        };

        let mut result = Translation::default();
        let value = result.absorb(self.translate_value(operand));
        let fragment = match fixity {
            Fixity::Prefix => format!("{}{}", symbol, value),
            Fixity::Postfix => format!("{}{}", value, symbol),
        };
        result.with_fragment(fragment)
    }

    pub(super) fn translate_conditional(
        &mut self,
        condition: &Expr,
        when_true: &Expr,
        when_false: &Expr,
    ) -> Translation {
        let mut result = Translation::default();
        let condition = result.absorb(self.translate_value(condition));
        let when_true = result.absorb(self.translate_value(when_true));
        let when_false = result.absorb(self.translate_value(when_false));
        result.with_fragment(format!("{} ? {} : {}", condition, when_true, when_false))
    }
}

#[cfg(test)]
#[path = "expr_operators_tests.rs"]
mod tests;
