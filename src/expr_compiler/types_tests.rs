// Type environment tests

#[cfg(test)]
mod tests {
    use crate::expr_compiler::parser::parse_expression;
    use crate::expr_compiler::types::*;

    fn environment() -> TypeEnvironment {
        let mut env = TypeEnvironment::new();
        env.declare_variable("n", SemanticType::Number)
            .declare_variable("s", SemanticType::String)
            .declare_variable("list", SemanticType::dynamic_array(SemanticType::Number))
            .declare_variable(
                "point",
                SemanticType::structure([("x", SemanticType::Number), ("label", SemanticType::String)]),
            )
            .declare_variable("names", SemanticType::map([("first", SemanticType::String)]))
            .declare_function("parse", SemanticType::Number);
        env
    }

    fn resolve(env: &TypeEnvironment, source: &str) -> SemanticType {
        env.resolve(&parse_expression(source).unwrap())
    }

    #[test]
    fn test_literals_and_identifiers() {
        let env = environment();
        assert_eq!(resolve(&env, "12"), SemanticType::Number);
        assert_eq!(resolve(&env, "'a'"), SemanticType::String);
        assert_eq!(resolve(&env, "true"), SemanticType::Boolean);
        assert_eq!(resolve(&env, "s"), SemanticType::String);
        assert_eq!(resolve(&env, "unknown"), SemanticType::Universal);
    }

    #[test]
    fn test_access_chains() {
        let env = environment();
        assert_eq!(resolve(&env, "list.length"), SemanticType::Number);
        assert_eq!(resolve(&env, "list[0]"), SemanticType::Number);
        assert_eq!(resolve(&env, "point.label"), SemanticType::String);
        assert_eq!(resolve(&env, "point['x']"), SemanticType::Number);
        assert_eq!(resolve(&env, "names.anything"), SemanticType::String);
        assert_eq!(resolve(&env, "names[s]"), SemanticType::String);
        assert_eq!(resolve(&env, "point.missing"), SemanticType::Universal);
    }

    #[test]
    fn test_operators_and_calls() {
        let env = environment();
        assert_eq!(resolve(&env, "n + 1"), SemanticType::Number);
        assert_eq!(resolve(&env, "s + n"), SemanticType::String);
        assert_eq!(resolve(&env, "n < 2"), SemanticType::Boolean);
        assert_eq!(resolve(&env, "!n"), SemanticType::Boolean);
        assert_eq!(resolve(&env, "parse(s)"), SemanticType::Number);
        assert_eq!(resolve(&env, "list.push(1)"), SemanticType::Number);
        assert_eq!(resolve(&env, "list.pop()"), SemanticType::Number);
        assert_eq!(resolve(&env, "n ? s : 'x'"), SemanticType::String);
        assert_eq!(resolve(&env, "(s)"), SemanticType::String);
    }

    #[test]
    fn test_array_literal_defaults_to_fixed() {
        let env = environment();
        assert_eq!(
            resolve(&env, "[1, n, 3]"),
            SemanticType::fixed_array(SemanticType::Number, 3)
        );
    }

    #[test]
    fn test_node_override_wins() {
        let mut env = environment();
        let expr = parse_expression("[1, 2]").unwrap();
        env.set_node_type(expr.id, SemanticType::dynamic_array(SemanticType::Number));
        assert_eq!(
            env.resolve(&expr),
            SemanticType::dynamic_array(SemanticType::Number)
        );
    }

    #[test]
    fn test_c_type_spelling() {
        assert_eq!(SemanticType::Number.c_type(), "int16_t");
        assert_eq!(
            SemanticType::dynamic_array(SemanticType::String).c_type(),
            "ARRAY(const char *)"
        );
        assert_eq!(
            SemanticType::map([("k", SemanticType::Number)]).c_type(),
            "DICT(int16_t)"
        );
        assert_eq!(SemanticType::Universal.c_type(), "void *");
    }

    #[test]
    fn test_display() {
        assert_eq!(
            SemanticType::fixed_array(SemanticType::Number, 4).to_string(),
            "number[4]"
        );
        assert_eq!(
            SemanticType::dynamic_array(SemanticType::String).to_string(),
            "string[]"
        );
    }
}
