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

//! Error reporting for the PLC toolchain
//!
//! Renders any [`plc_core::PhaseError`] against the source text it came
//! from, either as an ariadne report with a labelled span or as a single
//! `file:line:column` line.

#![warn(missing_docs)]

pub mod renderer;

pub use renderer::{DiagnosticRenderer, should_show_colors};
