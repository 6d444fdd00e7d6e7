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

//! Statement outcomes

use crate::value::Value;

/// How a statement finished
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    /// Fall through to the next statement
    Continue,
    /// A `RETURN` ran; unwinds to the enclosing call
    Returned(Value),
}

impl Flow {
    /// Whether a return is in flight
    pub fn is_return(&self) -> bool {
        matches!(self, Flow::Returned(_))
    }
}
