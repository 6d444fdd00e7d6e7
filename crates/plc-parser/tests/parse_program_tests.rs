// Copyright 2024 OctoFHIR Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Whole-program parsing tests

use num_bigint::BigInt;
use plc_ast::{BinaryOperator, ExpressionKind, Literal, Statement};
use plc_parser::{ParseError, parse, parse_expression};
use pretty_assertions::assert_eq;
use rstest::rstest;

const FACTORIAL: &str = r#"
LET CONST limit: Integer = 10;
LET greeting: String = "hello\n";

DEF factorial(n: Integer): Integer DO
    IF n <= 1 DO
        RETURN 1;
    ELSE
        RETURN n * factorial(n - 1);
    END
END

DEF main(): Integer DO
    LET total = 0;
    FOR (i = 0; i < limit; i = i + 1) DO
        total = total + factorial(i);
    END
    print(greeting.concat(total.toString()));
    RETURN 0;
END
"#;

#[test]
fn parses_fields_and_methods() {
    let source = parse(FACTORIAL).unwrap();

    assert_eq!(source.fields.len(), 2);
    assert!(source.fields[0].constant);
    assert_eq!(source.fields[0].type_name, "Integer");
    assert_eq!(
        source.fields[1].value.as_ref().and_then(|v| v.as_literal()),
        Some(&Literal::String("hello\n".to_string()))
    );

    let names: Vec<&str> = source.methods.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["factorial", "main"]);
    let factorial = source.method("factorial", 1).unwrap();
    assert_eq!(factorial.parameter_types, vec!["Integer".to_string()]);
    assert_eq!(factorial.return_type.as_deref(), Some("Integer"));

    let at = |offset: usize| &FACTORIAL[offset..];
    assert!(at(factorial.parameter_offsets[0]).starts_with("n: Integer"));
    assert!(at(factorial.parameter_type_offsets[0]).starts_with("Integer): Integer DO"));
    assert!(at(factorial.return_type_offset.unwrap()).starts_with("Integer DO"));
}

#[test]
fn for_loop_declares_and_assigns_loop_variable() {
    let source = parse(FACTORIAL).unwrap();
    let main = source.method("main", 0).unwrap();

    let Statement::For {
        initialization,
        increment,
        statements,
        ..
    } = &main.statements[1]
    else {
        panic!("expected a FOR statement, got {:?}", main.statements[1]);
    };
    let initialization = initialization.as_ref().unwrap();
    assert_eq!(initialization.name, "i");
    assert_eq!(initialization.type_name, None);
    assert_eq!(
        initialization.value.as_ref().and_then(|v| v.as_literal()),
        Some(&Literal::Integer(BigInt::from(0)))
    );
    let increment = increment.as_ref().unwrap();
    assert!(matches!(
        &increment.receiver.kind,
        ExpressionKind::Access { receiver: None, name } if name == "i"
    ));
    assert_eq!(statements.len(), 1);
}

#[rstest]
#[case("DEF main(): Integer DO FOR (i = 0; i < 3; i = i + 1) DO print(i); END RETURN 0; END")]
#[case("DEF main(): Integer DO FOR (i = 0; i < 3; i = i + 1) print(i); END RETURN 0; END")]
#[case("DEF main(): Integer DO FOR (; TRUE; ) print(1); END RETURN 0; END")]
fn for_loop_do_is_optional(#[case] input: &str) {
    let source = parse(input).unwrap();
    assert!(matches!(
        source.methods[0].statements[0],
        Statement::For { .. }
    ));
}

#[test]
fn parsing_is_deterministic() {
    assert_eq!(parse(FACTORIAL).unwrap(), parse(FACTORIAL).unwrap());
}

#[test]
fn identifier_offsets_flow_into_nodes() {
    let input = "DEF main() DO x.y = f(a); END";
    let source = parse(input).unwrap();
    let method = &source.methods[0];
    assert_eq!(method.offset, input.find("main").unwrap());

    let Statement::Assignment(assignment) = &method.statements[0] else {
        panic!("expected an assignment");
    };
    assert_eq!(assignment.receiver.offset, input.find('y').unwrap());
    let ExpressionKind::Access {
        receiver: Some(receiver),
        ..
    } = &assignment.receiver.kind
    else {
        panic!("expected a receiver access");
    };
    assert_eq!(receiver.offset, input.find('x').unwrap());
    assert_eq!(assignment.value.offset, input.find('f').unwrap());
}

#[test]
fn node_ids_are_unique() {
    let source = parse(FACTORIAL).unwrap();
    let mut ids = Vec::new();
    ids.extend(source.fields.iter().map(|f| f.id));
    ids.extend(source.methods.iter().map(|m| m.id));
    let count = ids.len();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), count);
}

#[test]
fn method_chain_is_left_folded() {
    let expression = parse_expression("\"ab\".concat(\"c\").length()").unwrap();
    let ExpressionKind::Function(outer) = &expression.kind else {
        panic!("expected a call");
    };
    assert_eq!(outer.name, "length");
    let Some(receiver) = &outer.receiver else {
        panic!("expected a receiver");
    };
    let ExpressionKind::Function(inner) = &receiver.kind else {
        panic!("expected an inner call");
    };
    assert_eq!(inner.name, "concat");
    assert_eq!(inner.arguments.len(), 1);
}

#[test]
fn group_accepts_any_expression() {
    let expression = parse_expression("(x)").unwrap();
    let ExpressionKind::Group(inner) = &expression.kind else {
        panic!("expected a group");
    };
    assert!(inner.is_access());

    let expression = parse_expression("(1 + 2) * 3").unwrap();
    let ExpressionKind::Binary(data) = &expression.kind else {
        panic!("expected a binary expression");
    };
    assert_eq!(data.op, BinaryOperator::Multiply);
    assert!(matches!(data.left.kind, ExpressionKind::Group(_)));
}

#[rstest]
#[case("'\\n'", Literal::Character('\n'))]
#[case("'\\''", Literal::Character('\''))]
#[case("\"a\\\"b\"", Literal::String("a\"b".to_string()))]
#[case("-3.50", Literal::Decimal("-3.50".to_string()))]
#[case("+42", Literal::Integer(BigInt::from(42)))]
#[case("123456789012345678901234567890", Literal::Integer("123456789012345678901234567890".parse().unwrap()))]
#[case("NIL", Literal::Nil)]
#[case("FALSE", Literal::Boolean(false))]
fn literals(#[case] input: &str, #[case] expected: Literal) {
    assert_eq!(parse_expression(input).unwrap().as_literal(), Some(&expected));
}

#[rstest]
#[case("LET x = 1;", 6)]
#[case("LET x: Integer = 1", 18)]
#[case("DEF main() DO 1 + 2 = 3; END", 14)]
#[case("RETURN 1;", 0)]
#[case("DEF f(a) DO END", 7)]
#[case("DEF main() DO IF TRUE DO END", 28)]
fn structural_mismatch_fails_at_offset(#[case] input: &str, #[case] position: usize) {
    let err = parse(input).unwrap_err();
    assert_eq!(err.position(), position, "{err}");
}

#[test]
fn assignment_target_must_be_access() {
    let err = parse("DEF main() DO f() = 1; END").unwrap_err();
    assert_eq!(err, ParseError::InvalidAssignmentTarget { position: 14 });
}

#[test]
fn empty_source_is_valid() {
    let source = parse("  \n\t").unwrap();
    assert!(source.fields.is_empty());
    assert!(source.methods.is_empty());
}
