// Operator translation tests

#[cfg(test)]
mod operator_tests {
    use crate::expr_compiler::config::TranslatorConfig;
    use crate::expr_compiler::parser::parse_expression;
    use crate::expr_compiler::runtime::RuntimeFeature;
    use crate::expr_compiler::scope::CompileUnit;
    use crate::expr_compiler::translation::Translation;
    use crate::expr_compiler::translator::ExprTranslator;
    use crate::expr_compiler::types::{SemanticType, TypeEnvironment};
    use test_log::test;

    fn environment() -> TypeEnvironment {
        let mut env = TypeEnvironment::new();
        env.declare_variable("a", SemanticType::Number)
            .declare_variable("b", SemanticType::Number)
            .declare_variable("n", SemanticType::Number)
            .declare_variable("s", SemanticType::String)
            .declare_variable("t", SemanticType::String)
            .declare_variable("u", SemanticType::String)
            .declare_variable("flag", SemanticType::Boolean);
        env
    }

    fn translate(source: &str) -> Translation {
        let env = environment();
        let expr = parse_expression(source).unwrap();
        let config = TranslatorConfig::default();
        let mut unit = CompileUnit::new();
        let mut translator = ExprTranslator::new(&env, &config, &mut unit);
        translator.translate_value(&expr)
    }

    #[test]
    fn test_number_operators_map_directly() {
        let cases = [
            (">", ">"),
            (">=", ">="),
            ("<", "<"),
            ("<=", "<="),
            ("==", "=="),
            ("===", "=="),
            ("!=", "!="),
            ("!==", "!="),
            ("*", "*"),
            ("/", "/"),
            ("+", "+"),
            ("-", "-"),
        ];
        for (source_op, c_op) in cases {
            let result = translate(&format!("a {} b", source_op));
            assert_eq!(result.fragment, format!("a {} b", c_op), "operator {}", source_op);
            assert!(result.flags.is_empty());
            assert!(result.statements.is_empty());
        }
    }

    #[test]
    fn test_unmapped_number_operators_become_markers() {
        assert_eq!(translate("a % b").fragment, "/* unsupported expression a % b */");
        assert_eq!(translate("a && b").fragment, "/* unsupported expression a && b */");
        assert_eq!(translate("a || b").fragment, "/* unsupported expression a || b */");
    }

    #[test]
    fn test_string_equality_uses_strcmp() {
        let equal = translate("s === t");
        assert_eq!(equal.fragment, "strcmp(s, t) == 0");
        assert!(equal.flags.is_active(RuntimeFeature::Strings));

        assert_eq!(translate("s != t").fragment, "strcmp(s, t) != 0");
    }

    #[test]
    fn test_string_concatenation_materializes_buffer() {
        let result = translate("s + t");

        assert_eq!(result.fragment, "tmp_string");
        assert_eq!(result.temporaries.len(), 1);
        assert_eq!(result.temporaries[0].declaration(), "char *tmp_string;");
        assert_eq!(
            result.statements,
            vec![
                "tmp_string = malloc(strlen(s) + strlen(t) + 1);\nassert(tmp_string != NULL);",
                "strcpy(tmp_string, s);",
                "strcat(tmp_string, t);",
            ]
        );
        assert!(result.flags.is_active(RuntimeFeature::Strings));
        assert!(result.flags.is_active(RuntimeFeature::Malloc));
    }

    #[test]
    fn test_chained_concatenation_uses_distinct_buffers() {
        let result = translate("s + t + u");

        assert_eq!(result.fragment, "tmp_string_2");
        let names: Vec<&str> = result.temporaries.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["tmp_string", "tmp_string_2"]);
        assert_eq!(result.statements.len(), 6);
        assert_eq!(result.statements[2], "strcat(tmp_string, t);");
        assert_eq!(
            result.statements[3],
            "tmp_string_2 = malloc(strlen(tmp_string) + strlen(u) + 1);\nassert(tmp_string_2 != NULL);"
        );
        assert_eq!(result.statements[4], "strcpy(tmp_string_2, tmp_string);");
    }

    #[test]
    fn test_mixed_equality_puts_string_first() {
        let string_left = translate("s == n");
        assert_eq!(string_left.fragment, "str_int16_t_cmp(s, n) == 0");
        assert!(string_left.flags.is_active(RuntimeFeature::StrInt16Cmp));

        let number_left = translate("n !== s");
        assert_eq!(number_left.fragment, "str_int16_t_cmp(s, n) != 0");
    }

    #[test]
    fn test_mixed_concatenation_appends_in_source_order() {
        let string_left = translate("s + n");
        assert_eq!(string_left.fragment, "tmp_string");
        assert_eq!(
            string_left.statements,
            vec![
                "tmp_string = malloc(strlen(s) + STR_INT16_T_BUFLEN + 1);\nassert(tmp_string != NULL);",
                "tmp_string[0] = '\\0';",
                "strcat(tmp_string, s);",
                "str_int16_t_cat(tmp_string, n);",
            ]
        );
        for feature in [
            RuntimeFeature::Strings,
            RuntimeFeature::Malloc,
            RuntimeFeature::StrInt16Cat,
        ] {
            assert!(string_left.flags.is_active(feature), "{} not active", feature);
        }

        // The comparison swaps operands, concatenation must not
        let number_left = translate("n + s");
        assert_eq!(
            number_left.statements,
            vec![
                "tmp_string = malloc(strlen(s) + STR_INT16_T_BUFLEN + 1);\nassert(tmp_string != NULL);",
                "tmp_string[0] = '\\0';",
                "str_int16_t_cat(tmp_string, n);",
                "strcat(tmp_string, s);",
            ]
        );
    }

    #[test]
    fn test_unsupported_pairings_become_markers() {
        for source in ["s - t", "s < t", "s * n", "flag + a", "s + flag"] {
            let result = translate(source);
            assert_eq!(
                result.fragment,
                format!("/* unsupported expression {} */", source)
            );
            assert!(result.statements.is_empty());
            assert!(result.temporaries.is_empty());
        }
    }

    #[test]
    fn test_unary_operators_keep_position() {
        assert_eq!(translate("++a").fragment, "++a");
        assert_eq!(translate("a++").fragment, "a++");
        assert_eq!(translate("--a").fragment, "--a");
        assert_eq!(translate("a--").fragment, "a--");
        assert_eq!(translate("!a").fragment, "!a");
    }

    #[test]
    fn test_unary_plus_becomes_atoi() {
        let result = translate("+a");
        assert_eq!(result.fragment, "atoi(a)");
        assert!(result.flags.is_active(RuntimeFeature::Atoi));
    }

    #[test]
    fn test_unsupported_unary() {
        assert_eq!(translate("-a").fragment, "/* unsupported expression -a */");
        assert_eq!(translate("!s").fragment, "/* unsupported expression !s */");
        assert_eq!(translate("s++").fragment, "/* unsupported expression s++ */");
    }

    #[test]
    fn test_conditional_hoists_branch_statements() {
        let result = translate("flag ? s + t : u");
        assert_eq!(result.fragment, "flag ? tmp_string : u");
        assert_eq!(result.statements.len(), 3);
    }
}
