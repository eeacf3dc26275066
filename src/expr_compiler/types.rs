// Semantic types and type facts
//
// The translator never infers types itself; it asks a `TypeFacts` source for
// the resolved type of each operand node. `TypeEnvironment` is the
// declared-types implementation used by the crate's tests and callers that
// already know their variable types.

use crate::expr_compiler::ast::{BinaryOp, Expr, ExprKind, NodeId, UnaryOp};
use indexmap::IndexMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum SemanticType {
    Number,
    String,
    Boolean,
    Array(ArrayType),
    Record(RecordType),
    Pointer,
    Universal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayType {
    pub element: Box<SemanticType>,
    pub is_dynamic: bool,
    /// Compile-time capacity; for dynamic arrays this is the initial reservation
    pub capacity: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordType {
    pub fields: IndexMap<String, SemanticType>,
    pub is_map: bool,
}

impl SemanticType {
    pub fn fixed_array(element: SemanticType, capacity: usize) -> Self {
        SemanticType::Array(ArrayType {
            element: Box::new(element),
            is_dynamic: false,
            capacity,
        })
    }

    pub fn dynamic_array(element: SemanticType) -> Self {
        SemanticType::Array(ArrayType {
            element: Box::new(element),
            is_dynamic: true,
            capacity: 0,
        })
    }

    pub fn structure<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = (S, SemanticType)>,
        S: Into<String>,
    {
        SemanticType::Record(RecordType {
            fields: fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            is_map: false,
        })
    }

    /// String-keyed map; every value shares the type of the first entry
    pub fn map<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, SemanticType)>,
        S: Into<String>,
    {
        SemanticType::Record(RecordType {
            fields: entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            is_map: true,
        })
    }

    /// C spelling of this type for declarations and casts
    pub fn c_type(&self) -> String {
        match self {
            SemanticType::Number => "int16_t".to_string(),
            SemanticType::String => "const char *".to_string(),
            SemanticType::Boolean => "uint8_t".to_string(),
            SemanticType::Array(array) if array.is_dynamic => {
                format!("ARRAY({})", array.element.c_type())
            }
            SemanticType::Array(array) => format!("{} *", array.element.c_type()),
            SemanticType::Record(record) if record.is_map => {
                format!("DICT({})", record.value_type().c_type())
            }
            SemanticType::Record(_) | SemanticType::Pointer | SemanticType::Universal => {
                "void *".to_string()
            }
        }
    }
}

impl RecordType {
    /// Type stored under `key`; maps fall back to their uniform value type
    pub fn field_type(&self, key: &str) -> SemanticType {
        match self.fields.get(key) {
            Some(ty) => ty.clone(),
            None if self.is_map => self.value_type(),
            None => SemanticType::Universal,
        }
    }

    pub fn value_type(&self) -> SemanticType {
        self.fields
            .values()
            .next()
            .cloned()
            .unwrap_or(SemanticType::Universal)
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SemanticType::Number => write!(f, "number"),
            SemanticType::String => write!(f, "string"),
            SemanticType::Boolean => write!(f, "boolean"),
            SemanticType::Array(array) if array.is_dynamic => {
                write!(f, "{}[]", array.element)
            }
            SemanticType::Array(array) => write!(f, "{}[{}]", array.element, array.capacity),
            SemanticType::Record(record) if record.is_map => {
                write!(f, "{{ [key: string]: {} }}", record.value_type())
            }
            SemanticType::Record(record) => {
                let fields: Vec<String> = record
                    .fields
                    .iter()
                    .map(|(name, ty)| format!("{}: {}", name, ty))
                    .collect();
                write!(f, "{{ {} }}", fields.join("; "))
            }
            SemanticType::Pointer => write!(f, "pointer"),
            SemanticType::Universal => write!(f, "any"),
        }
    }
}

/// Source of resolved types, queried read-only during translation
pub trait TypeFacts {
    fn resolve(&self, expr: &Expr) -> SemanticType;
}

/// Declared variable and function types plus per-node overrides, with local
/// derivation for everything built from them
#[derive(Debug, Clone, Default)]
pub struct TypeEnvironment {
    variables: IndexMap<String, SemanticType>,
    functions: IndexMap<String, SemanticType>,
    node_types: IndexMap<NodeId, SemanticType>,
}

impl TypeEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare_variable(&mut self, name: impl Into<String>, ty: SemanticType) -> &mut Self {
        self.variables.insert(name.into(), ty);
        self
    }

    pub fn declare_function(&mut self, name: impl Into<String>, returns: SemanticType) -> &mut Self {
        self.functions.insert(name.into(), returns);
        self
    }

    /// Pin the type of one node, overriding derivation
    pub fn set_node_type(&mut self, node: NodeId, ty: SemanticType) -> &mut Self {
        self.node_types.insert(node, ty);
        self
    }

    fn derive(&self, expr: &Expr) -> SemanticType {
        match &expr.kind {
            ExprKind::NumericLiteral(_) => SemanticType::Number,
            ExprKind::StringLiteral(_) => SemanticType::String,
            ExprKind::Identifier(name) => match name.as_str() {
                "true" | "false" => SemanticType::Boolean,
                _ => self
                    .variables
                    .get(name)
                    .cloned()
                    .unwrap_or(SemanticType::Universal),
            },
            ExprKind::PropertyAccess { object, property } => {
                self.member_type(&self.resolve(object), property)
            }
            ExprKind::ElementAccess { object, index } => {
                let base = self.resolve(object);
                match (&base, &index.kind) {
                    (SemanticType::Record(_), ExprKind::StringLiteral(raw)) => {
                        self.member_type(&base, raw.get(1..raw.len().saturating_sub(1)).unwrap_or(""))
                    }
                    (SemanticType::Array(array), _) => (*array.element).clone(),
                    (SemanticType::Record(record), _) if record.is_map => record.value_type(),
                    (SemanticType::String, _) => SemanticType::String,
                    _ => SemanticType::Universal,
                }
            }
            ExprKind::Binary {
                left,
                operator,
                right,
            } => {
                if operator.is_comparison() {
                    return SemanticType::Boolean;
                }
                let left = self.resolve(left);
                let right = self.resolve(right);
                match operator {
                    BinaryOp::Add
                        if left == SemanticType::String || right == SemanticType::String =>
                    {
                        SemanticType::String
                    }
                    BinaryOp::And | BinaryOp::Or => left,
                    _ if left == SemanticType::Number && right == SemanticType::Number => {
                        SemanticType::Number
                    }
                    _ => SemanticType::Universal,
                }
            }
            ExprKind::Unary { operator, .. } => match operator {
                UnaryOp::Not => SemanticType::Boolean,
                _ => SemanticType::Number,
            },
            ExprKind::Conditional { when_true, .. } => self.resolve(when_true),
            ExprKind::Call { callee, arguments } => match &callee.kind {
                ExprKind::Identifier(name) => self
                    .functions
                    .get(name)
                    .cloned()
                    .unwrap_or(SemanticType::Universal),
                ExprKind::PropertyAccess { object, property } => {
                    match (property.as_str(), arguments.len(), self.resolve(object)) {
                        ("push", 1, _) => SemanticType::Number,
                        ("pop", 0, SemanticType::Array(array)) => *array.element,
                        _ => self
                            .functions
                            .get(&callee.text)
                            .cloned()
                            .unwrap_or(SemanticType::Universal),
                    }
                }
                _ => SemanticType::Universal,
            },
            ExprKind::ArrayLiteral(elements) => {
                let element = elements
                    .first()
                    .map(|first| self.resolve(first))
                    .unwrap_or(SemanticType::Universal);
                SemanticType::fixed_array(element, elements.len())
            }
            ExprKind::Parenthesized(inner) => self.resolve(inner),
        }
    }

    fn member_type(&self, base: &SemanticType, member: &str) -> SemanticType {
        match base {
            SemanticType::Array(_) | SemanticType::String if member == "length" => {
                SemanticType::Number
            }
            SemanticType::Record(record) => record.field_type(member),
            _ => SemanticType::Universal,
        }
    }
}

impl TypeFacts for TypeEnvironment {
    fn resolve(&self, expr: &Expr) -> SemanticType {
        if let Some(ty) = self.node_types.get(&expr.id) {
            return ty.clone();
        }
        self.derive(expr)
    }
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;
