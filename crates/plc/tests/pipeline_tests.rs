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

//! End-to-end pipeline tests

use plc::{
    AnalysisError, Engine, EvaluationError, InterpreterConfig, Phase, PlcError, TokenKind, Value,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn run(input: &str) -> (plc::Result<Value>, String) {
    let engine = Engine::new();
    let program = match engine.compile(input) {
        Ok(program) => program,
        Err(err) => return (Err(err), String::new()),
    };
    let mut output = Vec::new();
    let result = engine.run(&program, &mut output);
    (result, String::from_utf8(output).unwrap())
}

#[test]
fn minimal_main_returns_zero() {
    let (result, output) = run("DEF main(): Integer DO RETURN 0; END");
    assert_eq!(result, Ok(Value::from(0)));
    assert_eq!(output, "");
}

#[test]
fn lex_exposes_tokens() {
    let tokens = plc::lex("LET x = -1;").unwrap();
    let kinds: Vec<TokenKind> = tokens.iter().map(|token| token.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Identifier,
            TokenKind::Identifier,
            TokenKind::Operator,
            TokenKind::Integer,
            TokenKind::Operator,
        ]
    );
}

#[test]
fn for_loop_prints_each_iteration() {
    let (result, output) = run(
        "DEF main(): Integer DO FOR (i = 0; i < 3; i = i + 1) DO print(i); END RETURN 0; END",
    );
    assert_eq!(result, Ok(Value::from(0)));
    assert_eq!(output, "0\n1\n2\n");
}

#[test]
fn recursion_a_thousand_deep_completes() {
    let (result, output) = run(
        "DEF f(n: Integer): Integer DO IF n == 0 DO RETURN 0; END RETURN f(n - 1) + 1; END \
         DEF main(): Integer DO print(f(1000)); RETURN 0; END",
    );
    assert_eq!(result, Ok(Value::from(0)));
    assert_eq!(output, "1000\n");
}

#[test]
fn wide_decimals_pass_analysis_and_run() {
    let (result, output) = run(
        "DEF main(): Integer DO print(123456789012345678901234567890.5 * 2.0); RETURN 0; END",
    );
    assert_eq!(result, Ok(Value::from(0)));
    assert_eq!(output, "246913578024691357802469135781.00\n");
}

#[test]
fn constant_reassignment_fails_analysis() {
    let (result, _) = run("LET CONST x: Integer = 1; DEF main(): Integer DO x = 2; RETURN 0; END");
    let err = result.unwrap_err();
    assert_eq!(err.phase(), Phase::Analysis);
    assert!(matches!(
        err,
        PlcError::Analysis(AnalysisError::ConstantAssignment { .. })
    ));
}

#[test]
fn constant_reassignment_fails_execution() {
    let source = plc::parse("LET CONST x: Integer = 1; DEF main(): Integer DO x = 2; RETURN 0; END")
        .unwrap();
    let result = Engine::new().run_unchecked(&source, Vec::new());
    let err = result.unwrap_err();
    assert_eq!(err.phase(), Phase::Evaluation);
    assert!(matches!(
        err,
        PlcError::Evaluation(EvaluationError::ConstantReassignment { .. })
    ));
}

#[test]
fn unknown_arity_names_function_and_arity() {
    let input = "DEF f(a: Integer): Integer DO RETURN a; END DEF main(): Integer DO RETURN f(1, 2); END";
    let (result, _) = run(input);
    let err = result.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Function 'f' with arity 2 not found in the current scope"
    );
    assert_eq!(err.offset(), input.rfind("f(1, 2)"));
}

#[rstest]
#[case("DEF main(): Integer DO RETURN 0 END", Phase::Parse)]
#[case("DEF main(): Integer DO RETURN TRUE; END", Phase::Analysis)]
#[case("DEF main(): Integer DO RETURN 7 / 0; END", Phase::Evaluation)]
fn failures_report_their_phase(#[case] input: &str, #[case] phase: Phase) {
    let (result, _) = run(input);
    assert_eq!(result.unwrap_err().phase(), phase);
}

#[test]
fn call_depth_comes_from_engine_config() {
    let engine = Engine::with_config(InterpreterConfig::default().with_max_call_depth(8));
    let program = engine
        .compile("DEF loop(): Integer DO RETURN loop(); END DEF main(): Integer DO RETURN loop(); END")
        .unwrap();
    let err = engine.run(&program, Vec::new()).unwrap_err();
    assert!(matches!(
        err,
        PlcError::Evaluation(EvaluationError::CallDepthExceeded { limit: 8, .. })
    ));
}

#[test]
fn generate_uses_java_names() {
    let engine = Engine::new();
    let program = engine
        .compile(r#"DEF main(): Integer DO print("hi"); RETURN 0; END"#)
        .unwrap();
    let java = engine.generate(&program).unwrap();
    assert!(java.starts_with("public class Main {"));
    assert!(java.contains("        System.out.println(\"hi\");"));
    assert!(java.contains("    int main() {"));
}
