// Scope Context
//
// `CompileUnit` holds the state shared by every block of one compile: the
// accumulated runtime flags and the temporary names handed out so far.
// `Scope` is one block: its declared temporaries and its statements in
// emission order. Neither is global; each compile builds its own.

use crate::expr_compiler::ast::NodeId;
use crate::expr_compiler::runtime::{self, RuntimeFlags};
use crate::expr_compiler::translation::Translation;
use crate::expr_compiler::types::SemanticType;
use indexmap::{IndexMap, IndexSet};

#[derive(Debug, Clone, PartialEq)]
pub enum VariableType {
    Semantic(SemanticType),
    /// Already-spelled C type, e.g. `char *` for string buffers
    Raw(String),
}

impl VariableType {
    pub fn raw(c_type: impl Into<String>) -> Self {
        VariableType::Raw(c_type.into())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TemporaryVariable {
    pub name: String,
    pub var_type: VariableType,
    pub initializer: Option<String>,
}

impl TemporaryVariable {
    pub fn new(name: impl Into<String>, var_type: VariableType) -> Self {
        TemporaryVariable {
            name: name.into(),
            var_type,
            initializer: None,
        }
    }

    pub fn with_initializer(mut self, initializer: impl Into<String>) -> Self {
        self.initializer = Some(initializer.into());
        self
    }

    /// C declaration statement, including the trailing `;`
    pub fn declaration(&self) -> String {
        let declarator = match &self.var_type {
            VariableType::Semantic(SemanticType::Array(array)) if !array.is_dynamic => {
                join_type_and_name(
                    &array.element.c_type(),
                    &format!("{}[{}]", self.name, array.capacity),
                )
            }
            VariableType::Semantic(ty) => join_type_and_name(&ty.c_type(), &self.name),
            VariableType::Raw(c_type) => join_type_and_name(c_type, &self.name),
        };

        match &self.initializer {
            Some(initializer) => format!("{} = {};", declarator, initializer),
            None => format!("{};", declarator),
        }
    }
}

fn join_type_and_name(c_type: &str, name: &str) -> String {
    if c_type.ends_with('*') {
        format!("{}{}", c_type, name)
    } else {
        format!("{} {}", c_type, name)
    }
}

/// Per-compile shared state
#[derive(Debug, Default)]
pub struct CompileUnit {
    pub flags: RuntimeFlags,
    used_names: IndexSet<String>,
    temporaries: IndexMap<NodeId, String>,
}

impl CompileUnit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a user identifier as taken so no temporary shadows it
    pub fn reserve_name(&mut self, name: impl Into<String>) {
        self.used_names.insert(name.into());
    }

    /// Temporary name for `node`: `prefix`, then `prefix_2`, `prefix_3`, ...
    /// A node that already has a temporary keeps it.
    pub fn declare_temporary(&mut self, node: NodeId, prefix: &str) -> String {
        if let Some(existing) = self.temporaries.get(&node) {
            return existing.clone();
        }

        let mut name = prefix.to_string();
        let mut suffix = 2;
        while self.used_names.contains(&name) {
            name = format!("{}_{}", prefix, suffix);
            suffix += 1;
        }
        self.used_names.insert(name.clone());
        self.temporaries.insert(node, name.clone());
        log::debug!("temporary {} declared for node {}", name, node);
        name
    }

    /// Temporary declared on behalf of `node`, if any
    pub fn temporary_for(&self, node: NodeId) -> Option<&str> {
        self.temporaries.get(&node).map(|name| name.as_str())
    }

    /// Support code for every feature activated during this compile, followed
    /// by `body`
    pub fn assemble(&self, body: &str) -> String {
        let mut output = runtime::render_support(&self.flags);
        output.push('\n');
        output.push_str(body);
        output
    }
}

/// One block: declarations first, then statements in emission order
#[derive(Debug, Clone, Default)]
pub struct Scope {
    pub variables: Vec<TemporaryVariable>,
    pub statements: Vec<String>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare(&mut self, variable: TemporaryVariable) {
        self.variables.push(variable);
    }

    pub fn hoist(&mut self, statement: impl Into<String>) {
        self.statements.push(statement.into());
    }

    /// Move a translation's side effects into this block and the compile unit,
    /// returning the inline fragment for the consuming statement
    pub fn commit(&mut self, unit: &mut CompileUnit, translation: Translation) -> String {
        unit.flags.merge(&translation.flags);
        self.variables.extend(translation.temporaries);
        self.statements.extend(translation.statements);
        translation.fragment
    }

    /// Commit `translation` and append `{fragment};` after its hoisted statements
    pub fn push_statement(&mut self, unit: &mut CompileUnit, translation: Translation) {
        let fragment = self.commit(unit, translation);
        if !fragment.is_empty() {
            self.statements.push(format!("{};", fragment));
        }
    }

    pub fn render(&self, indent: usize) -> String {
        let pad = "    ".repeat(indent);
        let mut output = String::new();
        let lines = self
            .variables
            .iter()
            .map(|variable| variable.declaration())
            .chain(self.statements.iter().cloned());
        for statement in lines {
            for line in statement.lines() {
                output.push_str(&pad);
                output.push_str(line);
                output.push('\n');
            }
        }
        output
    }
}

#[cfg(test)]
#[path = "scope_tests.rs"]
mod tests;
