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

//! Core types and abstractions for the PLC toolchain
//!
//! This crate holds what every phase shares: the builtin type model with its
//! assignability law, the static member table of the builtin kinds, and the
//! source location and phase-error abstractions used for reporting.

#![warn(missing_docs)]

pub mod location;
pub mod phase;
pub mod types;

pub use location::SourceLocation;
pub use phase::{Phase, PhaseError};
pub use types::{AssignabilityError, MemberSignature, Type};
