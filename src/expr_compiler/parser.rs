// Expression Parser
// Recursive descent over the token stream, producing `Expr` trees whose nodes
// carry their exact source text.

use crate::expr_compiler::ast::*;
use crate::expr_compiler::error::CompilerError;
use crate::expr_compiler::lexer::{Lexer, Token, TokenKind};
use std::sync::atomic::{AtomicU32, Ordering};

// One generation per parser, stamped into every NodeId it hands out
static NEXT_GENERATION: AtomicU32 = AtomicU32::new(0);

pub struct Parser {
    tokens: Vec<Token>,
    source: Vec<char>,
    current: usize,
    generation: u32,
    next_node_id: u32,
}

/// Lex and parse a single expression
pub fn parse_expression(source: &str) -> Result<Expr, CompilerError> {
    let mut lexer = Lexer::new(source);
    let tokens = lexer.tokenize()?;
    let mut parser = Parser::new(tokens, source);
    let expr = parser.parse_expression()?;
    parser.expect_end()?;
    Ok(expr)
}

/// Lex and parse a `;`-separated sequence of expression statements
pub fn parse_expression_statements(source: &str) -> Result<Vec<Expr>, CompilerError> {
    let mut lexer = Lexer::new(source);
    let tokens = lexer.tokenize()?;
    let mut parser = Parser::new(tokens, source);
    parser.parse_statements()
}

impl Parser {
    pub fn new(tokens: Vec<Token>, source: &str) -> Self {
        Parser {
            tokens,
            source: source.chars().collect(),
            current: 0,
            generation: NEXT_GENERATION.fetch_add(1, Ordering::Relaxed),
            next_node_id: 0,
        }
    }

    pub fn parse_statements(&mut self) -> Result<Vec<Expr>, CompilerError> {
        let mut statements = Vec::new();

        while !self.is_at_end() {
            if self.check(&TokenKind::Semicolon) {
                self.advance();
                continue;
            }
            statements.push(self.parse_expression()?);
            if !self.is_at_end() {
                self.consume(TokenKind::Semicolon, "Expected ';' after expression")?;
            }
        }

        Ok(statements)
    }

    pub fn parse_expression(&mut self) -> Result<Expr, CompilerError> {
        self.parse_conditional()
    }

    fn expect_end(&mut self) -> Result<(), CompilerError> {
        if self.check(&TokenKind::Semicolon) {
            self.advance();
        }
        if self.is_at_end() {
            Ok(())
        } else {
            let token = self.peek();
            Err(CompilerError::ExpectedToken(
                "end of input".to_string(),
                format!("{:?}", token.kind),
                token.position,
            ))
        }
    }

    fn parse_conditional(&mut self) -> Result<Expr, CompilerError> {
        let start = self.peek().position;
        let condition = self.parse_logical_or()?;

        if self.check(&TokenKind::Question) {
            self.advance();
            let when_true = Box::new(self.parse_conditional()?);
            self.consume(TokenKind::Colon, "Expected ':' in conditional expression")?;
            let when_false = Box::new(self.parse_conditional()?);

            Ok(self.node(
                ExprKind::Conditional {
                    condition: Box::new(condition),
                    when_true,
                    when_false,
                },
                start,
            ))
        } else {
            Ok(condition)
        }
    }

    fn parse_logical_or(&mut self) -> Result<Expr, CompilerError> {
        self.parse_binary_level(&[(TokenKind::Or, BinaryOp::Or)], Self::parse_logical_and)
    }

    fn parse_logical_and(&mut self) -> Result<Expr, CompilerError> {
        self.parse_binary_level(&[(TokenKind::And, BinaryOp::And)], Self::parse_equality)
    }

    fn parse_equality(&mut self) -> Result<Expr, CompilerError> {
        self.parse_binary_level(
            &[
                (TokenKind::EqualEqual, BinaryOp::Equal),
                (TokenKind::EqualEqualEqual, BinaryOp::StrictEqual),
                (TokenKind::NotEqual, BinaryOp::NotEqual),
                (TokenKind::NotEqualEqual, BinaryOp::StrictNotEqual),
            ],
            Self::parse_comparison,
        )
    }

    fn parse_comparison(&mut self) -> Result<Expr, CompilerError> {
        self.parse_binary_level(
            &[
                (TokenKind::Greater, BinaryOp::Greater),
                (TokenKind::GreaterEqual, BinaryOp::GreaterEqual),
                (TokenKind::Less, BinaryOp::Less),
                (TokenKind::LessEqual, BinaryOp::LessEqual),
            ],
            Self::parse_term,
        )
    }

    fn parse_term(&mut self) -> Result<Expr, CompilerError> {
        self.parse_binary_level(
            &[
                (TokenKind::Plus, BinaryOp::Add),
                (TokenKind::Minus, BinaryOp::Subtract),
            ],
            Self::parse_factor,
        )
    }

    fn parse_factor(&mut self) -> Result<Expr, CompilerError> {
        self.parse_binary_level(
            &[
                (TokenKind::Star, BinaryOp::Multiply),
                (TokenKind::Slash, BinaryOp::Divide),
                (TokenKind::Percent, BinaryOp::Modulo),
            ],
            Self::parse_unary,
        )
    }

    /// Left-associative binary level: `operand (op operand)*`
    fn parse_binary_level(
        &mut self,
        operators: &[(TokenKind, BinaryOp)],
        operand: fn(&mut Self) -> Result<Expr, CompilerError>,
    ) -> Result<Expr, CompilerError> {
        let start = self.peek().position;
        let mut expr = operand(self)?;

        'outer: loop {
            for (token, operator) in operators {
                if self.check(token) {
                    self.advance();
                    let right = operand(self)?;
                    expr = self.node(
                        ExprKind::Binary {
                            left: Box::new(expr),
                            operator: *operator,
                            right: Box::new(right),
                        },
                        start,
                    );
                    continue 'outer;
                }
            }
            break;
        }

        Ok(expr)
    }

    fn parse_unary(&mut self) -> Result<Expr, CompilerError> {
        let start = self.peek().position;
        let operator = match self.peek().kind {
            TokenKind::PlusPlus => Some(UnaryOp::Increment),
            TokenKind::MinusMinus => Some(UnaryOp::Decrement),
            TokenKind::Not => Some(UnaryOp::Not),
            TokenKind::Plus => Some(UnaryOp::Plus),
            TokenKind::Minus => Some(UnaryOp::Minus),
            _ => None,
        };

        match operator {
            Some(operator) => {
                self.advance();
                let operand = Box::new(self.parse_unary()?);
                Ok(self.node(
                    ExprKind::Unary {
                        operator,
                        operand,
                        fixity: Fixity::Prefix,
                    },
                    start,
                ))
            }
            None => self.parse_postfix(),
        }
    }

    fn parse_postfix(&mut self) -> Result<Expr, CompilerError> {
        let start = self.peek().position;
        let expr = self.parse_call()?;

        let operator = match self.peek().kind {
            TokenKind::PlusPlus => UnaryOp::Increment,
            TokenKind::MinusMinus => UnaryOp::Decrement,
            _ => return Ok(expr),
        };
        self.advance();

        Ok(self.node(
            ExprKind::Unary {
                operator,
                operand: Box::new(expr),
                fixity: Fixity::Postfix,
            },
            start,
        ))
    }

    fn parse_call(&mut self) -> Result<Expr, CompilerError> {
        let start = self.peek().position;
        let mut expr = self.parse_primary()?;

        loop {
            if self.check(&TokenKind::LeftParen) {
                self.advance();
                let arguments = self.parse_list(TokenKind::RightParen)?;
                self.consume(TokenKind::RightParen, "Expected ')' after arguments")?;
                expr = self.node(
                    ExprKind::Call {
                        callee: Box::new(expr),
                        arguments,
                    },
                    start,
                );
            } else if self.check(&TokenKind::Dot) {
                self.advance();
                let property = self.consume_identifier("Expected property name after '.'")?;
                expr = self.node(
                    ExprKind::PropertyAccess {
                        object: Box::new(expr),
                        property,
                    },
                    start,
                );
            } else if self.check(&TokenKind::LeftBracket) {
                self.advance();
                let index = self.parse_expression()?;
                self.consume(TokenKind::RightBracket, "Expected ']' after index")?;
                expr = self.node(
                    ExprKind::ElementAccess {
                        object: Box::new(expr),
                        index: Box::new(index),
                    },
                    start,
                );
            } else {
                break;
            }
        }

        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<Expr, CompilerError> {
        let start = self.peek().position;

        match self.peek().kind.clone() {
            TokenKind::NumericLiteral(raw) => {
                self.advance();
                Ok(self.node(ExprKind::NumericLiteral(raw), start))
            }
            TokenKind::StringLiteral(raw) => {
                self.advance();
                Ok(self.node(ExprKind::StringLiteral(raw), start))
            }
            TokenKind::Identifier(name) => {
                self.advance();
                Ok(self.node(ExprKind::Identifier(name), start))
            }
            TokenKind::LeftParen => {
                self.advance();
                let inner = self.parse_expression()?;
                self.consume(TokenKind::RightParen, "Expected ')' after expression")?;
                Ok(self.node(ExprKind::Parenthesized(Box::new(inner)), start))
            }
            TokenKind::LeftBracket => {
                self.advance();
                let elements = self.parse_list(TokenKind::RightBracket)?;
                self.consume(TokenKind::RightBracket, "Expected ']' after array elements")?;
                Ok(self.node(ExprKind::ArrayLiteral(elements), start))
            }
            kind => {
                let token = self.peek();
                Err(CompilerError::ExpectedToken(
                    "expression".to_string(),
                    format!("{:?}", kind),
                    token.position,
                ))
            }
        }
    }

    /// Comma-separated expressions up to (not including) `closing`
    fn parse_list(&mut self, closing: TokenKind) -> Result<Vec<Expr>, CompilerError> {
        let mut items = Vec::new();

        while !self.check(&closing) && !self.is_at_end() {
            items.push(self.parse_expression()?);
            if self.check(&TokenKind::Comma) {
                self.advance();
            } else {
                break;
            }
        }

        Ok(items)
    }

    fn node(&mut self, kind: ExprKind, start: usize) -> Expr {
        let end = self.previous_end();
        let id = NodeId::new(self.generation, self.next_node_id);
        self.next_node_id += 1;
        let text: String = self
            .source
            .get(start..end)
            .map(|chars| chars.iter().collect())
            .unwrap_or_default();
        Expr::new(id, kind, text)
    }

    // Helper methods
    fn check(&self, token_type: &TokenKind) -> bool {
        if self.is_at_end() {
            false
        } else {
            std::mem::discriminant(&self.peek().kind) == std::mem::discriminant(token_type)
        }
    }

    fn advance(&mut self) {
        if !self.is_at_end() {
            self.current += 1;
        }
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.tokens.len() || matches!(self.peek().kind, TokenKind::EOF)
    }

    fn peek(&self) -> &Token {
        static END_OF_INPUT: Token = Token {
            kind: TokenKind::EOF,
            position: 0,
            end: 0,
        };
        self.tokens.get(self.current).unwrap_or(&END_OF_INPUT)
    }

    fn previous_end(&self) -> usize {
        self.current
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map(|t| t.end)
            .unwrap_or(0)
    }

    fn consume(&mut self, token_type: TokenKind, message: &str) -> Result<(), CompilerError> {
        if self.check(&token_type) {
            self.advance();
            Ok(())
        } else {
            let token = self.peek();
            log::debug!("parse failure: {} (found {:?})", message, token.kind);
            Err(CompilerError::ExpectedToken(
                format!("{:?}", token_type),
                format!("{:?}", token.kind),
                token.position,
            ))
        }
    }

    fn consume_identifier(&mut self, message: &str) -> Result<String, CompilerError> {
        if let TokenKind::Identifier(name) = &self.peek().kind {
            let identifier = name.clone();
            self.advance();
            Ok(identifier)
        } else {
            let token = self.peek();
            Err(CompilerError::ParseError(message.to_string(), token.position))
        }
    }
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
