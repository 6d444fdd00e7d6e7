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

//! Construction helpers and serialization of AST nodes

use num_bigint::BigInt;
use plc_ast::{BinaryOperator, Expression, ExpressionKind, Literal, NodeIdGenerator};
use pretty_assertions::assert_eq;

fn sample(ids: &mut NodeIdGenerator) -> Expression {
    let left = Expression::literal(ids.next_id(), 0, Literal::Integer(BigInt::from(1)));
    let receiver = Expression::access(ids.next_id(), 4, None, "s");
    let right = Expression::function(ids.next_id(), 6, Some(receiver), "length", Vec::<Expression>::new());
    Expression::binary(ids.next_id(), 0, BinaryOperator::Add, left, right)
}

#[test]
fn builders_assign_fresh_ids() {
    let mut ids = NodeIdGenerator::new();
    let expression = sample(&mut ids);
    assert_eq!(ids.allocated(), 4);
    assert_eq!(expression.id.index(), 3);

    let ExpressionKind::Binary(data) = &expression.kind else {
        panic!("expected a binary node");
    };
    assert!(data.right.is_function());
    assert!(!data.left.is_access());
}

#[test]
fn equal_construction_yields_equal_trees() {
    let first = sample(&mut NodeIdGenerator::new());
    let second = sample(&mut NodeIdGenerator::new());
    assert_eq!(first, second);
}

#[cfg(feature = "serde")]
#[test]
fn serializes_to_json() {
    let expression = sample(&mut NodeIdGenerator::new());
    let json = serde_json::to_value(&expression).unwrap();
    assert_eq!(json["kind"]["Binary"]["op"], "Add");
    let back: Expression = serde_json::from_value(json).unwrap();
    assert_eq!(back, expression);
}
