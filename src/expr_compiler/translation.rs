// Expression Translation Result
//
// A translated expression is more than its inline C text: it may need
// statements sequenced ahead of it, temporaries declared in the enclosing
// block and runtime support routines included in the final output. Parents
// absorb their children's side effects in evaluation order, so hoisted
// statements always come out in source left-to-right order.

use crate::expr_compiler::runtime::{RuntimeFeature, RuntimeFlags};
use crate::expr_compiler::scope::TemporaryVariable;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Translation {
    /// Inline C expression text
    pub fragment: String,
    /// Statements to emit before the statement consuming `fragment`
    pub statements: Vec<String>,
    /// Temporaries to declare in the enclosing block
    pub temporaries: Vec<TemporaryVariable>,
    pub flags: RuntimeFlags,
}

impl Translation {
    pub fn inline(fragment: impl Into<String>) -> Self {
        Translation {
            fragment: fragment.into(),
            ..Default::default()
        }
    }

    /// Inline comment standing in for an expression shape we cannot translate
    pub fn unsupported(source_text: &str) -> Self {
        log::warn!("unsupported expression left as marker: {}", source_text);
        Self::marker(format!("unsupported expression {}", source_text))
    }

    pub fn marker(message: impl AsRef<str>) -> Self {
        // a stray "*/" in the source would close the comment early
        let message = message.as_ref().replace("*/", "* /");
        Self::inline(format!("/* {} */", message))
    }

    pub fn is_marker(&self) -> bool {
        self.fragment.starts_with("/*") && self.fragment.ends_with("*/")
    }

    /// Take over a child's hoisted statements, temporaries and flags, returning
    /// its inline fragment for composition
    pub fn absorb(&mut self, child: Translation) -> String {
        self.statements.extend(child.statements);
        self.temporaries.extend(child.temporaries);
        self.flags.merge(&child.flags);
        child.fragment
    }

    pub fn hoist(&mut self, statement: impl Into<String>) {
        self.statements.push(statement.into());
    }

    pub fn declare(&mut self, variable: TemporaryVariable) {
        self.temporaries.push(variable);
    }

    pub fn activate(&mut self, feature: RuntimeFeature) {
        self.flags.activate(feature);
    }

    pub fn with_fragment(mut self, fragment: impl Into<String>) -> Self {
        self.fragment = fragment.into();
        self
    }
}
