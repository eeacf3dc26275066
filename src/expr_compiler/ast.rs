// Abstract Syntax Tree definitions for the TypeScript expression subset

use std::fmt;

/// Identifier for an expression node: the parse that produced it plus the
/// node's index within that parse. Distinct parses never share a generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    pub generation: u32,
    pub index: u32,
}

impl NodeId {
    pub fn new(generation: u32, index: u32) -> Self {
        NodeId { generation, index }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}.{}", self.generation, self.index)
    }
}

/// An expression node together with the exact source text it was parsed from.
/// The source text is what ends up inside unsupported-expression markers and
/// is used verbatim as callee text for plain calls.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub id: NodeId,
    pub kind: ExprKind,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// Numeric literal, raw source text
    NumericLiteral(String),
    /// String literal, raw source text including its delimiting quotes
    StringLiteral(String),
    Identifier(String),
    PropertyAccess {
        object: Box<Expr>,
        property: String,
    },
    ElementAccess {
        object: Box<Expr>,
        index: Box<Expr>,
    },
    Binary {
        left: Box<Expr>,
        operator: BinaryOp,
        right: Box<Expr>,
    },
    Unary {
        operator: UnaryOp,
        operand: Box<Expr>,
        fixity: Fixity,
    },
    Conditional {
        condition: Box<Expr>,
        when_true: Box<Expr>,
        when_false: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        arguments: Vec<Expr>,
    },
    ArrayLiteral(Vec<Expr>),
    Parenthesized(Box<Expr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
    Equal,          // ==
    StrictEqual,    // ===
    NotEqual,       // !=
    StrictNotEqual, // !==
    Multiply,
    Divide,
    Modulo,
    Add,
    Subtract,
    And,
    Or,
}

impl BinaryOp {
    /// `==`, `===`, `!=` and `!==` all collapse to one C comparison
    pub fn is_equality(self) -> bool {
        matches!(
            self,
            BinaryOp::Equal | BinaryOp::StrictEqual | BinaryOp::NotEqual | BinaryOp::StrictNotEqual
        )
    }

    pub fn is_negated_equality(self) -> bool {
        matches!(self, BinaryOp::NotEqual | BinaryOp::StrictNotEqual)
    }

    pub fn is_comparison(self) -> bool {
        self.is_equality()
            || matches!(
                self,
                BinaryOp::Greater | BinaryOp::GreaterEqual | BinaryOp::Less | BinaryOp::LessEqual
            )
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let symbol = match self {
            BinaryOp::Greater => ">",
            BinaryOp::GreaterEqual => ">=",
            BinaryOp::Less => "<",
            BinaryOp::LessEqual => "<=",
            BinaryOp::Equal => "==",
            BinaryOp::StrictEqual => "===",
            BinaryOp::NotEqual => "!=",
            BinaryOp::StrictNotEqual => "!==",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Modulo => "%",
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        };
        write!(f, "{}", symbol)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Increment, // ++
    Decrement, // --
    Not,       // !
    Plus,      // unary +
    Minus,     // unary -
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fixity {
    Prefix,
    Postfix,
}

impl Expr {
    pub fn new(id: NodeId, kind: ExprKind, text: impl Into<String>) -> Self {
        Expr {
            id,
            kind,
            text: text.into(),
        }
    }

    /// Literal numbers and strings are the only elements an initializer list accepts
    pub fn is_literal(&self) -> bool {
        matches!(
            self.kind,
            ExprKind::NumericLiteral(_) | ExprKind::StringLiteral(_)
        )
    }

    pub fn as_identifier(&self) -> Option<&str> {
        match &self.kind {
            ExprKind::Identifier(name) => Some(name),
            _ => None,
        }
    }

    /// Visit this node and every node below it, parents before children
    pub fn walk(&self, visit: &mut impl FnMut(&Expr)) {
        visit(self);
        match &self.kind {
            ExprKind::NumericLiteral(_) | ExprKind::StringLiteral(_) | ExprKind::Identifier(_) => {}
            ExprKind::PropertyAccess { object, .. } => object.walk(visit),
            ExprKind::ElementAccess { object, index } => {
                object.walk(visit);
                index.walk(visit);
            }
            ExprKind::Binary { left, right, .. } => {
                left.walk(visit);
                right.walk(visit);
            }
            ExprKind::Unary { operand, .. } => operand.walk(visit),
            ExprKind::Conditional {
                condition,
                when_true,
                when_false,
            } => {
                condition.walk(visit);
                when_true.walk(visit);
                when_false.walk(visit);
            }
            ExprKind::Call { callee, arguments } => {
                callee.walk(visit);
                for argument in arguments {
                    argument.walk(visit);
                }
            }
            ExprKind::ArrayLiteral(elements) => {
                for element in elements {
                    element.walk(visit);
                }
            }
            ExprKind::Parenthesized(inner) => inner.walk(visit),
        }
    }
}
