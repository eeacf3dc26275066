// End-to-end translation of expression statements into a C block
//
// Exercises the whole pipeline: parse, reserve source identifiers, translate
// each statement, then assemble support code for exactly the runtime
// features that were used.

use ts2c::expr_compiler::{
    CompilerError, ExpressionCompiler, RuntimeFeature, SemanticType, TranslatorConfig,
    TypeEnvironment,
};

fn environment() -> TypeEnvironment {
    let mut env = TypeEnvironment::new();
    env.declare_variable("n", SemanticType::Number)
        .declare_variable("name", SemanticType::String)
        .declare_variable("scores", SemanticType::dynamic_array(SemanticType::Number))
        .declare_variable(
            "player",
            SemanticType::structure([
                ("name", SemanticType::String),
                ("lives", SemanticType::Number),
            ]),
        );
    env
}

#[test_log::test]
fn test_statements_are_emitted_in_order() {
    let env = environment();
    let block = ExpressionCompiler::new()
        .compile(
            "scores.push(n); console.log(\"score\", scores.length); scores.pop();",
            &env,
        )
        .unwrap();

    assert_eq!(
        block.scope.statements,
        vec![
            "ARRAY_PUSH(scores, n);",
            "printf(\"%s \", \"score\"), printf(\"%d\\n\", scores->size);",
            "ARRAY_POP(scores);",
        ]
    );
    assert!(block.scope.variables.is_empty());
}

#[test_log::test]
fn test_concatenation_block_and_support_code() {
    let env = environment();
    let block = ExpressionCompiler::new()
        .compile("console.log(player.name + \" has \" + player.lives)", &env)
        .unwrap();

    assert_eq!(
        block.body(),
        concat!(
            "    char *tmp_string;\n",
            "    char *tmp_string_2;\n",
            "    tmp_string = malloc(strlen(player->name) + strlen(\" has \") + 1);\n",
            "    assert(tmp_string != NULL);\n",
            "    strcpy(tmp_string, player->name);\n",
            "    strcat(tmp_string, \" has \");\n",
            "    tmp_string_2 = malloc(strlen(tmp_string) + STR_INT16_T_BUFLEN + 1);\n",
            "    assert(tmp_string_2 != NULL);\n",
            "    tmp_string_2[0] = '\\0';\n",
            "    strcat(tmp_string_2, tmp_string);\n",
            "    str_int16_t_cat(tmp_string_2, player->lives);\n",
            "    printf(\"%s\\n\", tmp_string_2);\n",
        )
    );

    for feature in [
        RuntimeFeature::Printf,
        RuntimeFeature::Strings,
        RuntimeFeature::Malloc,
        RuntimeFeature::StrInt16Cat,
    ] {
        assert!(block.unit.flags.is_active(feature), "{} not active", feature);
    }
    assert!(!block.unit.flags.is_active(RuntimeFeature::Array));

    let c = block.to_c();
    assert!(c.starts_with("#include <stdint.h>\n"));
    assert!(c.contains("#include <string.h>\n"));
    assert!(c.contains("#define STR_INT16_T_BUFLEN"));
    assert!(c.contains("void str_int16_t_cat(char *str, int16_t num)"));
    assert!(!c.contains("str_int16_t_cmp"));
    assert!(!c.contains("#define ARRAY("));
    assert!(c.ends_with("    printf(\"%s\\n\", tmp_string_2);\n"));
}

#[test_log::test]
fn test_temporaries_avoid_source_identifiers() {
    let mut env = environment();
    env.declare_variable("tmp_string", SemanticType::String);
    let block = ExpressionCompiler::new()
        .compile("tmp_string + name", &env)
        .unwrap();

    assert_eq!(block.scope.variables[0].name, "tmp_string_2");
    assert_eq!(block.scope.statements.last().unwrap(), "tmp_string_2;");
}

#[test]
fn test_unsupported_expressions_do_not_stop_the_block() {
    let env = environment();
    let block = ExpressionCompiler::new()
        .compile("n % 2; name.length; scores.push(1)", &env)
        .unwrap();

    assert_eq!(
        block.scope.statements,
        vec![
            "/* unsupported expression n % 2 */;",
            "/* unsupported expression name.length */;",
            "ARRAY_PUSH(scores, 1);",
        ]
    );
}

#[test]
fn test_custom_temporary_prefixes() {
    let config = TranslatorConfig::from_toml_str(
        r#"
        string_temp_prefix = "joined"
        array_temp_prefix = "items"
        "#,
    )
    .unwrap();
    let env = environment();
    let block = ExpressionCompiler::with_config(config)
        .compile("console.log(name + name, [1, 2][0])", &env)
        .unwrap();

    let names: Vec<&str> = block.scope.variables.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(names, vec!["joined", "items"]);
}

#[test]
fn test_parse_errors_are_reported() {
    let env = environment();
    match ExpressionCompiler::new().compile("n = 1", &env) {
        Err(CompilerError::UnexpectedCharacter('=', 2)) => {}
        other => panic!("Expected unexpected character error, got {:?}", other),
    }
}

#[test]
fn test_numeric_literal_forms() {
    let env = environment();
    let block = ExpressionCompiler::new()
        .compile("n + 1_000; n * 0x1F; 1e3; 0b11", &env)
        .unwrap();

    assert_eq!(
        block.scope.statements,
        vec!["n + 1000;", "n * 0x1F;", "1e3;", "3;"]
    );
}
