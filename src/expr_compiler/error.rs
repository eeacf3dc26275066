// Compiler Error Handling
//
// Expression translation itself never fails (unsupported shapes become inline
// markers). These errors cover everything around it: lexing, parsing and
// loading translator configuration.

use std::fmt;

#[derive(Debug, Clone)]
pub enum CompilerError {
    // Lexical errors
    UnexpectedCharacter(char, usize),
    UnterminatedString(usize),

    // Parse errors
    ParseError(String, usize),
    ExpectedToken(String, String, usize), // expected, found, position

    // Configuration errors
    ConfigError(String),

    // IO errors
    IOError(String),
}

impl fmt::Display for CompilerError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CompilerError::UnexpectedCharacter(ch, pos) => {
                write!(f, "Unexpected character '{}' at position {}", ch, pos)
            }
            CompilerError::UnterminatedString(pos) => {
                write!(f, "Unterminated string starting at position {}", pos)
            }
            CompilerError::ParseError(msg, pos) => {
                write!(f, "Parse error at position {}: {}", pos, msg)
            }
            CompilerError::ExpectedToken(expected, found, pos) => {
                write!(
                    f,
                    "Expected '{}' but found '{}' at position {}",
                    expected, found, pos
                )
            }
            CompilerError::ConfigError(msg) => {
                write!(f, "Configuration error: {}", msg)
            }
            CompilerError::IOError(msg) => {
                write!(f, "IO error: {}", msg)
            }
        }
    }
}

impl std::error::Error for CompilerError {}

impl From<std::io::Error> for CompilerError {
    fn from(err: std::io::Error) -> Self {
        CompilerError::IOError(err.to_string())
    }
}

impl From<toml::de::Error> for CompilerError {
    fn from(err: toml::de::Error) -> Self {
        CompilerError::ConfigError(err.to_string())
    }
}
