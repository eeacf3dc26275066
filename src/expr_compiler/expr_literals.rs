// Literal expressions
//
// Numbers pass through with digit separators dropped; octal and binary
// prefixes C does not share are rewritten in decimal. String literals always come out
// double-quoted: single-quoted source literals are requoted so that the C
// compiler sees a char array rather than a character constant.

use crate::expr_compiler::translation::Translation;
use crate::expr_compiler::translator::ExprTranslator;

impl ExprTranslator<'_> {
    pub(super) fn translate_numeric_literal(&self, raw: &str) -> Translation {
        Translation::inline(normalize_numeric_literal(raw))
    }

    pub(super) fn translate_string_literal(&self, raw: &str) -> Translation {
        Translation::inline(normalize_string_literal(raw))
    }
}

/// Spell a source numeric literal in C: `1_000` becomes `1000`, `0o17` and
/// `0b1010` become `15` and `10`. Hex, decimal and exponent forms are kept.
pub fn normalize_numeric_literal(raw: &str) -> String {
    let digits: String = raw.chars().filter(|&c| c != '_').collect();
    let radix = match digits.get(..2) {
        Some("0o") | Some("0O") => 8,
        Some("0b") | Some("0B") => 2,
        _ => return digits,
    };
    match u64::from_str_radix(&digits[2..], radix) {
        Ok(value) => value.to_string(),
        Err(_) => {
            log::warn!("numeric literal {} does not fit in 64 bits", raw);
            digits
        }
    }
}

/// Requote a single-quoted literal for C. `"` gets escaped, `\'` loses its
/// escape, and every other escape pair is kept as written. Double-quoted
/// literals are already valid C and pass through.
pub fn normalize_string_literal(raw: &str) -> String {
    let body = match raw
        .strip_prefix('\'')
        .and_then(|rest| rest.strip_suffix('\''))
    {
        Some(body) => body,
        None => return raw.to_string(),
    };

    let mut output = String::with_capacity(body.len() + 2);
    output.push('"');
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('\'') => output.push('\''),
                Some(escaped) => {
                    output.push('\\');
                    output.push(escaped);
                }
                None => output.push_str("\\\\"),
            },
            '"' => output.push_str("\\\""),
            _ => output.push(c),
        }
    }
    output.push('"');
    output
}
