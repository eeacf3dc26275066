// Variable and member access
//
// The C form of `base.name` / `base[index]` depends entirely on the resolved
// type of the base: dynamic arrays go through their `data`/`size` members,
// fixed arrays are plain C arrays, structures are pointers to structs and
// maps go through the dictionary macros.

use crate::expr_compiler::ast::{Expr, ExprKind};
use crate::expr_compiler::config::is_c_identifier;
use crate::expr_compiler::runtime::RuntimeFeature;
use crate::expr_compiler::translation::Translation;
use crate::expr_compiler::translator::ExprTranslator;
use crate::expr_compiler::types::SemanticType;

/// How the member is selected once the base is known
#[derive(Debug, Clone, PartialEq)]
enum Accessor {
    /// `.name`, or a string-literal index shaped like an identifier
    Name(String),
    /// Any other index, already translated to C
    Computed(String),
}

impl ExprTranslator<'_> {
    pub(super) fn translate_access(&mut self, expr: &Expr) -> Translation {
        let (object, index, property) = match &expr.kind {
            ExprKind::Identifier(name) => return Translation::inline(name.as_str()),
            ExprKind::PropertyAccess { object, property } => (object, None, Some(property)),
            ExprKind::ElementAccess { object, index } => (object, Some(index), None),
            _ => return self.translate_value(expr),
        };

        let mut result = Translation::default();
        let base_type = self.resolve_type(object);
        let base = result.absorb(self.translate_value(object));

        let accessor = match (property, index) {
            (Some(property), _) => Accessor::Name(property.clone()),
            (None, Some(index)) => match identifier_key(index) {
                Some(key) => Accessor::Name(key),
                None => Accessor::Computed(result.absorb(self.translate_value(index))),
            },
            (None, None) => return Translation::unsupported(&expr.text),
        };

        log::debug!(
            "access `{}`: base type {} accessor {:?}",
            expr.text,
            base_type,
            accessor
        );

        let fragment = match (&base_type, &accessor) {
            (SemanticType::Array(array), Accessor::Name(name)) if name == "length" => {
                if array.is_dynamic {
                    format!("{}->size", base)
                } else {
                    array.capacity.to_string()
                }
            }
            (SemanticType::Array(array), Accessor::Computed(index)) => {
                if array.is_dynamic {
                    format!("{}->data[{}]", base, index)
                } else {
                    format!("{}[{}]", base, index)
                }
            }
            (SemanticType::Record(record), Accessor::Name(key)) if record.is_map => {
                result.activate(RuntimeFeature::Dict);
                format!("DICT_GET({}, \"{}\")", base, key)
            }
            (SemanticType::Record(record), Accessor::Computed(key)) if record.is_map => {
                result.activate(RuntimeFeature::Dict);
                format!("DICT_GET({}, {})", base, key)
            }
            (SemanticType::Record(_), Accessor::Name(field)) => format!("{}->{}", base, field),
            _ => return Translation::unsupported(&expr.text),
        };

        result.with_fragment(fragment)
    }
}

/// `obj["name"]` selects the member `name` when the key is identifier-shaped
fn identifier_key(index: &Expr) -> Option<String> {
    match &index.kind {
        ExprKind::StringLiteral(raw) => {
            let key = raw.get(1..raw.len().saturating_sub(1))?;
            if is_c_identifier(key) {
                Some(key.to_string())
            } else {
                None
            }
        }
        _ => None,
    }
}
