// Runtime Support Routines
//
// Each optional C support routine the generated program may need is a
// `RuntimeFeature`. Translation only ever activates features; the output
// stage reads the accumulated flags once and includes exactly the matching
// headers and support code.

use indexmap::IndexSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RuntimeFeature {
    /// ARRAY / ARRAY_CREATE / ARRAY_PUSH macros
    Array,
    /// ARRAY_POP macro
    ArrayPop,
    /// printf from <stdio.h>
    Printf,
    /// strcmp / strcpy / strcat / strlen from <string.h>
    Strings,
    /// str_int16_t_cmp(string, number)
    StrInt16Cmp,
    /// str_int16_t_cat(buffer, number)
    StrInt16Cat,
    /// atoi from <stdlib.h>
    Atoi,
    /// malloc plus assert on the result
    Malloc,
    /// DICT / DICT_GET / DICT_SET keyed lookup
    Dict,
}

impl RuntimeFeature {
    pub const ALL: [RuntimeFeature; 9] = [
        RuntimeFeature::Array,
        RuntimeFeature::ArrayPop,
        RuntimeFeature::Printf,
        RuntimeFeature::Strings,
        RuntimeFeature::StrInt16Cmp,
        RuntimeFeature::StrInt16Cat,
        RuntimeFeature::Atoi,
        RuntimeFeature::Malloc,
        RuntimeFeature::Dict,
    ];

    /// Features whose support code this feature's support code relies on
    pub fn prerequisites(self) -> &'static [RuntimeFeature] {
        match self {
            RuntimeFeature::ArrayPop => &[RuntimeFeature::Array],
            RuntimeFeature::Dict => &[RuntimeFeature::Array, RuntimeFeature::Strings],
            RuntimeFeature::StrInt16Cmp | RuntimeFeature::StrInt16Cat => {
                &[RuntimeFeature::Strings, RuntimeFeature::Printf]
            }
            _ => &[],
        }
    }

    fn headers(self) -> &'static [&'static str] {
        match self {
            RuntimeFeature::Array => &["stdlib.h", "assert.h"],
            RuntimeFeature::ArrayPop => &[],
            RuntimeFeature::Printf => &["stdio.h"],
            RuntimeFeature::Strings => &["string.h"],
            RuntimeFeature::StrInt16Cmp | RuntimeFeature::StrInt16Cat => &["limits.h"],
            RuntimeFeature::Atoi => &["stdlib.h"],
            RuntimeFeature::Malloc => &["stdlib.h", "assert.h"],
            RuntimeFeature::Dict => &[],
        }
    }

    fn support_code(self) -> &'static str {
        match self {
            RuntimeFeature::Array => ARRAY_MACROS,
            RuntimeFeature::ArrayPop => ARRAY_POP_MACRO,
            RuntimeFeature::Dict => DICT_MACROS,
            RuntimeFeature::StrInt16Cmp => STR_INT16_T_CMP,
            RuntimeFeature::StrInt16Cat => STR_INT16_T_CAT,
            _ => "",
        }
    }
}

impl fmt::Display for RuntimeFeature {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            RuntimeFeature::Array => "array",
            RuntimeFeature::ArrayPop => "array_pop",
            RuntimeFeature::Printf => "printf",
            RuntimeFeature::Strings => "strings",
            RuntimeFeature::StrInt16Cmp => "str_int16_t_cmp",
            RuntimeFeature::StrInt16Cat => "str_int16_t_cat",
            RuntimeFeature::Atoi => "atoi",
            RuntimeFeature::Malloc => "malloc",
            RuntimeFeature::Dict => "dict",
        };
        write!(f, "{}", name)
    }
}

/// Set of activated runtime features; union-only
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuntimeFlags {
    active: IndexSet<RuntimeFeature>,
}

impl RuntimeFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn activate(&mut self, feature: RuntimeFeature) {
        if self.active.insert(feature) {
            log::trace!("runtime feature activated: {}", feature);
        }
    }

    pub fn is_active(&self, feature: RuntimeFeature) -> bool {
        self.active.contains(&feature)
    }

    pub fn merge(&mut self, other: &RuntimeFlags) {
        for feature in other.iter() {
            self.activate(feature);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Activated features in activation order
    pub fn iter(&self) -> impl Iterator<Item = RuntimeFeature> + '_ {
        self.active.iter().copied()
    }

    /// Activated features plus everything they transitively rely on, in
    /// declaration order so output does not depend on activation order
    pub fn with_prerequisites(&self) -> Vec<RuntimeFeature> {
        let mut needed: IndexSet<RuntimeFeature> = IndexSet::new();
        let mut pending: Vec<RuntimeFeature> = self.iter().collect();
        while let Some(feature) = pending.pop() {
            if needed.insert(feature) {
                pending.extend_from_slice(feature.prerequisites());
            }
        }
        RuntimeFeature::ALL
            .iter()
            .copied()
            .filter(|feature| needed.contains(feature))
            .collect()
    }
}

/// `#include` lines plus support code for the activated features
pub fn render_support(flags: &RuntimeFlags) -> String {
    let features = flags.with_prerequisites();

    let mut headers: IndexSet<&'static str> = IndexSet::new();
    headers.insert("stdint.h");
    for feature in &features {
        headers.extend(feature.headers().iter().copied());
    }

    let mut output = String::new();
    for header in &headers {
        output.push_str(&format!("#include <{}>\n", header));
    }

    // both integer/string helpers size their scratch buffer with this
    if features
        .iter()
        .any(|f| matches!(f, RuntimeFeature::StrInt16Cmp | RuntimeFeature::StrInt16Cat))
    {
        output.push('\n');
        output.push_str(STR_INT16_T_BUFLEN);
    }

    for feature in &features {
        let code = feature.support_code();
        if !code.is_empty() {
            output.push('\n');
            output.push_str(code);
        }
    }

    output
}

const ARRAY_MACROS: &str = r#"#define ARRAY(T) struct {\
    int16_t size;\
    int16_t capacity;\
    T *data;\
} *
#define ARRAY_CREATE(array, init_capacity, init_size) {\
    array = malloc(sizeof(*array)); \
    array->data = malloc((init_capacity) * sizeof(*array->data)); \
    assert(array->data != NULL); \
    array->capacity = init_capacity; \
    array->size = init_size; \
}
#define ARRAY_PUSH(array, item) {\
    if (array->size == array->capacity) {  \
        array->capacity = array->capacity ? array->capacity * 2 : 4;  \
        array->data = realloc(array->data, array->capacity * sizeof(*array->data)); \
        assert(array->data != NULL); \
    }  \
    array->data[array->size++] = item; \
}
"#;

const ARRAY_POP_MACRO: &str = r#"#define ARRAY_POP(a) (a->size != 0 ? a->data[--a->size] : 0)
"#;

const DICT_MACROS: &str = r#"#define DICT(T) struct { \
    ARRAY(const char *) index; \
    ARRAY(T) values; \
} *
#define DICT_CREATE(dict, init_capacity) { \
    dict = malloc(sizeof(*dict)); \
    ARRAY_CREATE(dict->index, init_capacity, 0); \
    ARRAY_CREATE(dict->values, init_capacity, 0); \
}
int16_t dict_find_pos(const char ** keys, int16_t keys_size, const char * key) {
    int16_t i;
    for (i = 0; i < keys_size; i++)
        if (strcmp(keys[i], key) == 0)
            return i;
    return -1;
}
#define DICT_GET(dict, prop) ((dict)->values->data[dict_find_pos((dict)->index->data, (dict)->index->size, prop)])
#define DICT_SET(dict, prop, value) { \
    int16_t dict_pos = dict_find_pos((dict)->index->data, (dict)->index->size, prop); \
    if (dict_pos == -1) { \
        ARRAY_PUSH((dict)->index, prop); \
        ARRAY_PUSH((dict)->values, value); \
    } else \
        (dict)->values->data[dict_pos] = value; \
}
"#;

const STR_INT16_T_BUFLEN: &str = r#"#define STR_INT16_T_BUFLEN ((CHAR_BIT * sizeof(int16_t) - 1) / 3 + 2)
"#;

const STR_INT16_T_CMP: &str = r#"int str_int16_t_cmp(const char * str, int16_t number) {
    char numstr[STR_INT16_T_BUFLEN];
    sprintf(numstr, "%d", number);
    return strcmp(str, numstr);
}
"#;

const STR_INT16_T_CAT: &str = r#"void str_int16_t_cat(char *str, int16_t num) {
    char numstr[STR_INT16_T_BUFLEN];
    sprintf(numstr, "%d", num);
    strcat(str, numstr);
}
"#;

#[cfg(test)]
#[path = "runtime_tests.rs"]
mod tests;
