// Expression Lexer
// Tokenizes TypeScript expression source into a stream of tokens

use crate::expr_compiler::error::CompilerError;

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub position: usize, // first char
    pub end: usize,      // one past the last char
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals (raw source text)
    NumericLiteral(String),
    StringLiteral(String),
    Identifier(String),

    // Symbols
    LeftBracket,  // [
    RightBracket, // ]
    LeftParen,    // (
    RightParen,   // )
    Semicolon,    // ;
    Colon,        // :
    Comma,        // ,
    Dot,          // .

    // Operators
    EqualEqual,       // ==
    EqualEqualEqual,  // ===
    NotEqual,         // !=
    NotEqualEqual,    // !==
    Plus,             // +
    PlusPlus,         // ++
    Minus,            // -
    MinusMinus,       // --
    Star,             // *
    Slash,            // /
    Percent,          // %
    Less,             // <
    LessEqual,        // <=
    Greater,          // >
    GreaterEqual,     // >=
    And,              // &&
    Or,               // ||
    Not,              // !
    Question,         // ?

    EOF,
}

pub struct Lexer {
    input: Vec<char>,
    position: usize,
    current_char: Option<char>,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        let chars: Vec<char> = input.chars().collect();
        let current_char = chars.first().copied();

        Lexer {
            input: chars,
            position: 0,
            current_char,
        }
    }

    pub fn tokenize(&mut self) -> Result<Vec<Token>, CompilerError> {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::EOF;
            tokens.push(token);
            if done {
                break;
            }
        }

        Ok(tokens)
    }

    fn next_token(&mut self) -> Result<Token, CompilerError> {
        self.skip_whitespace_and_comments();

        let start_pos = self.position;

        let kind = match self.current_char {
            None => TokenKind::EOF,
            Some(ch) => match ch {
                '[' => self.single(TokenKind::LeftBracket),
                ']' => self.single(TokenKind::RightBracket),
                '(' => self.single(TokenKind::LeftParen),
                ')' => self.single(TokenKind::RightParen),
                ';' => self.single(TokenKind::Semicolon),
                ':' => self.single(TokenKind::Colon),
                ',' => self.single(TokenKind::Comma),
                '*' => self.single(TokenKind::Star),
                '/' => self.single(TokenKind::Slash),
                '%' => self.single(TokenKind::Percent),
                '?' => self.single(TokenKind::Question),
                '.' => {
                    if self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
                        TokenKind::NumericLiteral(self.read_number())
                    } else {
                        self.single(TokenKind::Dot)
                    }
                }
                '+' => {
                    self.advance();
                    if self.current_char == Some('+') {
                        self.advance();
                        TokenKind::PlusPlus
                    } else {
                        TokenKind::Plus
                    }
                }
                '-' => {
                    self.advance();
                    if self.current_char == Some('-') {
                        self.advance();
                        TokenKind::MinusMinus
                    } else {
                        TokenKind::Minus
                    }
                }
                '=' => {
                    self.advance();
                    if self.current_char != Some('=') {
                        // plain assignment is statement-level syntax
                        return Err(CompilerError::UnexpectedCharacter('=', start_pos));
                    }
                    self.advance();
                    if self.current_char == Some('=') {
                        self.advance();
                        TokenKind::EqualEqualEqual
                    } else {
                        TokenKind::EqualEqual
                    }
                }
                '!' => {
                    self.advance();
                    if self.current_char == Some('=') {
                        self.advance();
                        if self.current_char == Some('=') {
                            self.advance();
                            TokenKind::NotEqualEqual
                        } else {
                            TokenKind::NotEqual
                        }
                    } else {
                        TokenKind::Not
                    }
                }
                '<' => {
                    self.advance();
                    if self.current_char == Some('=') {
                        self.advance();
                        TokenKind::LessEqual
                    } else {
                        TokenKind::Less
                    }
                }
                '>' => {
                    self.advance();
                    if self.current_char == Some('=') {
                        self.advance();
                        TokenKind::GreaterEqual
                    } else {
                        TokenKind::Greater
                    }
                }
                '&' => {
                    self.advance();
                    if self.current_char == Some('&') {
                        self.advance();
                        TokenKind::And
                    } else {
                        return Err(CompilerError::UnexpectedCharacter('&', start_pos));
                    }
                }
                '|' => {
                    self.advance();
                    if self.current_char == Some('|') {
                        self.advance();
                        TokenKind::Or
                    } else {
                        return Err(CompilerError::UnexpectedCharacter('|', start_pos));
                    }
                }

                // String literals keep their quotes; normalization happens at translation time
                '"' | '\'' => TokenKind::StringLiteral(self.read_string(ch, start_pos)?),

                ch if ch.is_ascii_digit() => TokenKind::NumericLiteral(self.read_number()),

                ch if ch.is_alphabetic() || ch == '_' || ch == '$' => {
                    TokenKind::Identifier(self.read_identifier())
                }

                ch => {
                    return Err(CompilerError::UnexpectedCharacter(ch, start_pos));
                }
            },
        };

        Ok(Token {
            kind,
            position: start_pos,
            end: self.position,
        })
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.advance();
        kind
    }

    fn advance(&mut self) {
        self.position += 1;
        self.current_char = self.input.get(self.position).copied();
    }

    fn peek_char(&self) -> Option<char> {
        self.input.get(self.position + 1).copied()
    }

    fn skip_whitespace_and_comments(&mut self) {
        while let Some(ch) = self.current_char {
            if ch.is_whitespace() {
                self.advance();
            } else if ch == '/' && self.peek_char() == Some('/') {
                while let Some(ch) = self.current_char {
                    if ch == '\n' {
                        break;
                    }
                    self.advance();
                }
            } else {
                break;
            }
        }
    }

    fn read_string(&mut self, quote: char, start_pos: usize) -> Result<String, CompilerError> {
        let mut raw = String::new();
        raw.push(quote);
        self.advance();

        while let Some(ch) = self.current_char {
            match ch {
                '\\' => {
                    raw.push(ch);
                    self.advance();
                    match self.current_char {
                        Some(escaped) => {
                            raw.push(escaped);
                            self.advance();
                        }
                        None => return Err(CompilerError::UnterminatedString(start_pos)),
                    }
                }
                '\n' => return Err(CompilerError::UnterminatedString(start_pos)),
                ch if ch == quote => {
                    raw.push(ch);
                    self.advance();
                    return Ok(raw);
                }
                ch => {
                    raw.push(ch);
                    self.advance();
                }
            }
        }

        Err(CompilerError::UnterminatedString(start_pos))
    }

    /// Numeric literal as written: `0x`/`0o`/`0b` prefixes, `_` separators,
    /// a fraction and an `e[+-]digits` exponent all stay in the raw text
    fn read_number(&mut self) -> String {
        let mut value = String::new();

        if self.current_char == Some('0') {
            if let Some(prefix @ ('x' | 'X' | 'o' | 'O' | 'b' | 'B')) = self.peek_char() {
                value.push('0');
                value.push(prefix);
                self.advance();
                self.advance();
                self.read_digits(&mut value, |ch| ch.is_ascii_hexdigit());
                return value;
            }
        }

        self.read_digits(&mut value, |ch| ch.is_ascii_digit());
        if self.current_char == Some('.') {
            value.push('.');
            self.advance();
            self.read_digits(&mut value, |ch| ch.is_ascii_digit());
        }

        if let Some(marker @ ('e' | 'E')) = self.current_char {
            let sign = match self.peek_char() {
                Some(sign @ ('+' | '-')) => Some(sign),
                _ => None,
            };
            let digit_at = self.position + if sign.is_some() { 2 } else { 1 };
            if self.input.get(digit_at).is_some_and(|ch| ch.is_ascii_digit()) {
                value.push(marker);
                self.advance();
                if let Some(sign) = sign {
                    value.push(sign);
                    self.advance();
                }
                self.read_digits(&mut value, |ch| ch.is_ascii_digit());
            }
        }

        value
    }

    fn read_digits(&mut self, value: &mut String, is_digit: impl Fn(char) -> bool) {
        while let Some(ch) = self.current_char {
            if is_digit(ch) || ch == '_' {
                value.push(ch);
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_identifier(&mut self) -> String {
        let mut value = String::new();

        while let Some(ch) = self.current_char {
            if ch.is_alphanumeric() || ch == '_' || ch == '$' {
                value.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        value
    }
}

#[cfg(test)]
#[path = "lexer_tests.rs"]
mod tests;
