// Parser tests

#[cfg(test)]
mod tests {
    use crate::expr_compiler::ast::*;
    use crate::expr_compiler::error::CompilerError;
    use crate::expr_compiler::parser::{parse_expression, parse_expression_statements};

    #[test]
    fn test_binary_precedence() {
        let expr = parse_expression("a + b * c").unwrap();
        match expr.kind {
            ExprKind::Binary {
                left,
                operator: BinaryOp::Add,
                right,
            } => {
                assert_eq!(left.text, "a");
                assert_eq!(right.text, "b * c");
                assert!(matches!(
                    right.kind,
                    ExprKind::Binary {
                        operator: BinaryOp::Multiply,
                        ..
                    }
                ));
            }
            other => panic!("Expected addition, got {:?}", other),
        }
        assert_eq!(expr.text, "a + b * c");
    }

    #[test]
    fn test_left_associative_subtraction() {
        let expr = parse_expression("a - b - c").unwrap();
        if let ExprKind::Binary { left, right, .. } = expr.kind {
            assert_eq!(left.text, "a - b");
            assert_eq!(right.text, "c");
        } else {
            panic!("Expected binary expression");
        }
    }

    #[test]
    fn test_strict_equality_tokens() {
        let expr = parse_expression("x !== 'y'").unwrap();
        assert!(matches!(
            expr.kind,
            ExprKind::Binary {
                operator: BinaryOp::StrictNotEqual,
                ..
            }
        ));
    }

    #[test]
    fn test_access_chain_text() {
        let expr = parse_expression("obj.items[i + 1].name").unwrap();
        assert_eq!(expr.text, "obj.items[i + 1].name");
        match expr.kind {
            ExprKind::PropertyAccess { object, property } => {
                assert_eq!(property, "name");
                assert_eq!(object.text, "obj.items[i + 1]");
                match object.kind {
                    ExprKind::ElementAccess { object, index } => {
                        assert_eq!(object.text, "obj.items");
                        assert_eq!(index.text, "i + 1");
                    }
                    other => panic!("Expected element access, got {:?}", other),
                }
            }
            other => panic!("Expected property access, got {:?}", other),
        }
    }

    #[test]
    fn test_method_call() {
        let expr = parse_expression("arr.push(x, 2)").unwrap();
        match expr.kind {
            ExprKind::Call { callee, arguments } => {
                assert_eq!(callee.text, "arr.push");
                assert_eq!(arguments.len(), 2);
                assert_eq!(arguments[1].text, "2");
            }
            other => panic!("Expected call, got {:?}", other),
        }
    }

    #[test]
    fn test_prefix_and_postfix() {
        let prefix = parse_expression("++i").unwrap();
        assert!(matches!(
            prefix.kind,
            ExprKind::Unary {
                operator: UnaryOp::Increment,
                fixity: Fixity::Prefix,
                ..
            }
        ));

        let postfix = parse_expression("i--").unwrap();
        assert!(matches!(
            postfix.kind,
            ExprKind::Unary {
                operator: UnaryOp::Decrement,
                fixity: Fixity::Postfix,
                ..
            }
        ));
        assert_eq!(postfix.text, "i--");
    }

    #[test]
    fn test_conditional_and_array_literal() {
        let expr = parse_expression("flag ? [1, 2] : []").unwrap();
        match expr.kind {
            ExprKind::Conditional {
                when_true,
                when_false,
                ..
            } => {
                assert!(matches!(&when_true.kind, ExprKind::ArrayLiteral(items) if items.len() == 2));
                assert!(matches!(&when_false.kind, ExprKind::ArrayLiteral(items) if items.is_empty()));
            }
            other => panic!("Expected conditional, got {:?}", other),
        }
    }

    #[test]
    fn test_node_ids_are_unique() {
        let expr = parse_expression("f(a, b) + c").unwrap();
        let mut ids = Vec::new();
        fn collect(expr: &Expr, ids: &mut Vec<NodeId>) {
            ids.push(expr.id);
            match &expr.kind {
                ExprKind::Binary { left, right, .. } => {
                    collect(left, ids);
                    collect(right, ids);
                }
                ExprKind::Call { callee, arguments } => {
                    collect(callee, ids);
                    for argument in arguments {
                        collect(argument, ids);
                    }
                }
                _ => {}
            }
        }
        collect(&expr, &mut ids);
        let count = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), count);
    }

    #[test]
    fn test_separate_parses_do_not_share_ids() {
        let first = parse_expression("s + t").unwrap();
        let second = parse_expression("s + t").unwrap();
        assert_ne!(first.id, second.id);
        assert_ne!(first.id.generation, second.id.generation);
        assert_eq!(first.id.index, second.id.index);

        let statements = parse_expression_statements("a; b").unwrap();
        assert_eq!(statements[0].id.generation, statements[1].id.generation);
        assert_ne!(statements[0].id, statements[1].id);
    }

    #[test]
    fn test_statement_sequence() {
        let statements = parse_expression_statements("a.push(1); n = 2").err();
        assert!(statements.is_some(), "assignment is not an expression here");

        let statements = parse_expression_statements("a.push(1); a.pop();").unwrap();
        assert_eq!(statements.len(), 2);
        assert_eq!(statements[0].text, "a.push(1)");
        assert_eq!(statements[1].text, "a.pop()");
    }

    #[test]
    fn test_trailing_tokens_rejected() {
        match parse_expression("a b") {
            Err(CompilerError::ExpectedToken(expected, _, 2)) => {
                assert_eq!(expected, "end of input");
            }
            other => panic!("Expected trailing token error, got {:?}", other),
        }
    }
}
