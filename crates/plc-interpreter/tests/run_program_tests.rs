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

//! Whole-program execution tests

use plc_core::Type;
use plc_interpreter::{EvaluationError, EvaluationResult, Interpreter, InterpreterConfig, Value};
use plc_parser::parse;
use pretty_assertions::assert_eq;
use rstest::rstest;

fn run_with(source: &str, config: InterpreterConfig) -> (EvaluationResult<Value>, String) {
    let program = parse(source).unwrap();
    let mut interpreter = Interpreter::with_config(Vec::new(), config);
    let result = interpreter.run(&program);
    let output = String::from_utf8(interpreter.into_output()).unwrap();
    (result, output)
}

fn run(source: &str) -> (EvaluationResult<Value>, String) {
    run_with(source, InterpreterConfig::default())
}

fn output_of(body: &str) -> String {
    let source = format!("DEF main(): Integer DO {body} RETURN 0; END");
    let (result, output) = run(&source);
    assert_eq!(result, Ok(Value::from(0)), "{source}");
    output
}

#[test]
fn minimal_program_returns_zero() {
    let (result, output) = run("DEF main(): Integer DO RETURN 0; END");
    assert_eq!(result, Ok(Value::from(0)));
    assert_eq!(output, "");
}

#[test]
fn main_result_is_returned() {
    let (result, _) = run("DEF main(): Integer DO RETURN 6 * 7; END");
    assert_eq!(result, Ok(Value::from(42)));
}

#[rstest]
#[case(r#"print("3" + "4");"#, "34\n")]
#[case("print(7 / 2);", "3\n")]
#[case("print(1.0 / 4.0);", "0.2\n")]
#[case("print(1.5 / 2.0);", "0.8\n")]
#[case("print(NIL);", "NIL\n")]
#[case("print(1 < 2 && 2 <= 2);", "true\n")]
#[case(r#"print("n = " + 4);"#, "n = 4\n")]
#[case("print((1 + 2) * 3);", "9\n")]
#[case("print(10 - 4 - 3);", "3\n")]
#[case(r#"print('a' == 'a' || "x" != "x");"#, "true\n")]
fn prints_expression_values(#[case] body: &str, #[case] expected: &str) {
    assert_eq!(output_of(body), expected);
}

#[rstest]
#[case(r#"print("hello".length());"#, "5\n")]
#[case(r#"print("abc".charAt(1));"#, "b\n")]
#[case(r#"print("ab".concat("cd"));"#, "abcd\n")]
#[case("print(2.5.toInteger());", "2\n")]
#[case("print(7.toDecimal());", "7\n")]
#[case("print(TRUE.toString());", "true\n")]
fn dispatches_builtin_members(#[case] body: &str, #[case] expected: &str) {
    assert_eq!(output_of(body), expected);
}

#[test]
fn integer_division_by_zero_fails() {
    let (result, _) = run("DEF main(): Integer DO RETURN 7 / 0; END");
    assert!(matches!(result, Err(EvaluationError::DivideByZero { .. })));
}

#[test]
fn logical_operators_short_circuit() {
    let source = r#"
        DEF probe(): Boolean DO
            print("probe");
            RETURN TRUE;
        END

        DEF main(): Integer DO
            IF FALSE && probe() DO print("and"); END
            IF TRUE || probe() DO print("or"); END
            IF TRUE && probe() DO print("both"); END
            RETURN 0;
        END
    "#;
    let (result, output) = run(source);
    assert_eq!(result, Ok(Value::from(0)));
    assert_eq!(output, "or\nprobe\nboth\n");
}

#[test]
fn for_loop_counts_and_scopes_each_iteration() {
    let output = output_of(
        "FOR (i = 0; i < 3; i = i + 1) DO LET doubled = i * 2; print(i); print(doubled); END",
    );
    assert_eq!(output, "0\n0\n1\n2\n2\n4\n");
}

#[test]
fn while_loop_and_return_unwinds_to_the_caller() {
    let source = r#"
        DEF find(limit: Integer): Integer DO
            LET i = 0;
            WHILE TRUE DO
                i = i + 1;
                IF i == limit DO
                    RETURN i;
                END
            END
            RETURN -1;
        END

        DEF main(): Integer DO
            print(find(5));
            RETURN 0;
        END
    "#;
    let (result, output) = run(source);
    assert_eq!(result, Ok(Value::from(0)));
    assert_eq!(output, "5\n");
}

#[test]
fn recursion_uses_arbitrary_precision() {
    let source = r#"
        DEF factorial(n: Integer): Integer DO
            IF n <= 1 DO
                RETURN 1;
            ELSE
                RETURN n * factorial(n - 1);
            END
        END

        DEF main(): Integer DO
            print(factorial(25));
            RETURN 0;
        END
    "#;
    let (_, output) = run(source);
    assert_eq!(output, "15511210043330985984000000\n");
}

#[test]
fn methods_without_return_yield_nil() {
    let source = r#"
        DEF greet(name: String) DO
            print("hi " + name);
        END

        DEF main(): Integer DO
            print(greet("bob"));
            RETURN 0;
        END
    "#;
    let (_, output) = run(source);
    assert_eq!(output, "hi bob\nNIL\n");
}

#[test]
fn globals_are_visible_and_writable_from_methods() {
    let source = r#"
        LET counter: Integer = 0;

        DEF bump() DO
            counter = counter + 1;
        END

        DEF main(): Integer DO
            bump();
            bump();
            RETURN counter;
        END
    "#;
    let (result, _) = run(source);
    assert_eq!(result, Ok(Value::from(2)));
}

#[test]
fn method_bodies_close_over_their_defining_scope() {
    let source = r#"
        DEF peek(): Integer DO
            RETURN local;
        END

        DEF main(): Integer DO
            LET local = 1;
            RETURN peek();
        END
    "#;
    let (result, _) = run(source);
    assert!(matches!(
        result,
        Err(EvaluationError::UndefinedVariable { ref name, .. }) if name == "local"
    ));
}

#[test]
fn initialized_constant_cannot_be_reassigned() {
    let source = "LET CONST x: Integer = 1; DEF main(): Integer DO x = 2; RETURN x; END";
    let (result, _) = run(source);
    assert!(matches!(
        result,
        Err(EvaluationError::ConstantReassignment { ref name, .. }) if name == "x"
    ));
}

#[test]
fn uninitialized_constant_accepts_one_write() {
    let source = "LET CONST x: Integer; DEF main(): Integer DO x = 1; print(x); x = 2; RETURN 0; END";
    let (result, output) = run(source);
    assert_eq!(output, "1\n");
    assert!(matches!(result, Err(EvaluationError::ConstantReassignment { .. })));
}

#[test]
fn missing_main_is_fatal() {
    let (result, _) = run("LET x: Integer = 1; DEF main(argument: Integer): Integer DO RETURN 0; END");
    assert_eq!(result, Err(EvaluationError::MissingMain));
}

#[test]
fn call_depth_is_bounded() {
    let source = "DEF spin(n: Integer): Integer DO RETURN spin(n + 1); END DEF main(): Integer DO RETURN spin(0); END";
    let (result, _) = run_with(source, InterpreterConfig::default().with_max_call_depth(16));
    assert!(matches!(
        result,
        Err(EvaluationError::CallDepthExceeded { limit: 16, .. })
    ));
}

const COUNT_DOWN: &str = "DEF f(n: Integer): Integer DO IF n == 0 DO RETURN 0; END RETURN f(n - 1) + 1; END";

#[rstest]
#[case(300)]
#[case(1000)]
fn deep_recursion_runs_on_the_calling_thread(#[case] depth: i64) {
    let source = format!("{COUNT_DOWN} DEF main(): Integer DO print(f({depth})); RETURN 0; END");
    let (result, output) = run(&source);
    assert_eq!(result, Ok(Value::from(0)));
    assert_eq!(output, format!("{depth}\n"));
}

#[test]
fn default_call_depth_fails_cleanly() {
    let source = format!("{COUNT_DOWN} DEF main(): Integer DO RETURN f(5000); END");
    let (result, _) = run(&source);
    assert!(matches!(
        result,
        Err(EvaluationError::CallDepthExceeded { limit: 1024, .. })
    ));
}

#[test]
fn arguments_are_evaluated_before_the_receiver() {
    let source = r#"
        DEF left(): String DO print("receiver"); RETURN "a"; END
        DEF right(): String DO print("argument"); RETURN "b"; END
        DEF main(): Integer DO print(left().concat(right())); RETURN 0; END
    "#;
    let (result, output) = run(source);
    assert_eq!(result, Ok(Value::from(0)));
    assert_eq!(output, "argument\nreceiver\nab\n");
}

#[rstest]
#[case("print(1000000000000000.0 * 1000000000000000.0);", "1000000000000000000000000000000.00\n")]
#[case("print(0.00000000000000000001 * 0.00000000000000000001);", "1E-40\n")]
#[case("print(123456789012345678901234567890.5 + 0.5);", "123456789012345678901234567891.0\n")]
#[case("print(1.0 / 3.0);", "0.3\n")]
#[case("print(1.0 == 1.00);", "false\n")]
#[case("print(1.0 == 1.0);", "true\n")]
fn decimals_are_arbitrary_precision(#[case] body: &str, #[case] expected: &str) {
    assert_eq!(output_of(body), expected);
}

#[test]
fn non_boolean_condition_fails_at_runtime() {
    let (result, _) = run("DEF main(): Integer DO IF 1 DO RETURN 1; END RETURN 0; END");
    assert!(matches!(
        result,
        Err(EvaluationError::TypeMismatch {
            expected: Type::Boolean,
            actual: Type::Integer,
            ..
        })
    ));
}

#[test]
fn redefinition_in_one_scope_fails() {
    let (result, _) = run("DEF main(): Integer DO LET x = 1; LET x = 2; RETURN x; END");
    assert!(matches!(result, Err(EvaluationError::Redefinition { .. })));
}

#[test]
fn field_access_on_a_value_fails() {
    let (result, _) = run(r#"DEF main(): Integer DO print("s".size); RETURN 0; END"#);
    assert!(matches!(
        result,
        Err(EvaluationError::UndefinedField { receiver: Type::String, .. })
    ));
}

#[test]
fn undefined_function_names_its_arity() {
    let (result, _) = run("DEF main(): Integer DO print(1, 2); RETURN 0; END");
    assert_eq!(
        result.unwrap_err().to_string(),
        "Function 'print' with arity 2 is not defined"
    );
}
