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

//! Abstract Syntax Tree (AST) definitions for PLC programs
//!
//! Nodes are produced once by the parser and never mutated afterwards. Every
//! node that a later phase annotates carries a [`NodeId`] unique within one
//! parse, so analysis results live in side tables keyed by that id instead of
//! in the tree itself.

#![warn(missing_docs)]

mod expression;
mod node;
mod operator;
mod source;
mod statement;

pub use expression::*;
pub use node::*;
pub use operator::*;
pub use source::*;
pub use statement::*;
