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

//! Ariadne-based rendering

use ariadne::{Color, Config, IndexType, Label, Report, ReportKind, Source};
use plc_core::{PhaseError, SourceLocation};
use std::io::{self, IsTerminal, Write};
use std::ops::Range;

/// Whether coloured output is appropriate: `NO_COLOR` unset and stderr a terminal
pub fn should_show_colors() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    io::stderr().is_terminal()
}

/// Renders phase errors against their source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagnosticRenderer {
    color: bool,
}

impl Default for DiagnosticRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticRenderer {
    /// Create a renderer, colouring output when the environment allows it
    pub fn new() -> Self {
        Self {
            color: should_show_colors(),
        }
    }

    /// Force colours on or off
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Whether this renderer emits ANSI colours
    pub fn color(&self) -> bool {
        self.color
    }

    /// Write an ariadne report for `error` to `writer`
    pub fn write(
        &self,
        error: &dyn PhaseError,
        file_name: &str,
        source: &str,
        writer: &mut dyn Write,
    ) -> io::Result<()> {
        let span = error
            .offset()
            .map(|offset| span_at(source, offset))
            .unwrap_or(0..0);
        let config = Config::default()
            .with_color(self.color)
            .with_index_type(IndexType::Byte);

        let mut report = Report::build(ReportKind::Error, (file_name, span.clone()))
            .with_config(config)
            .with_code(error.phase())
            .with_message(error);
        if let Some(offset) = error.offset() {
            let location = SourceLocation::from_offset(source, offset);
            report = report
                .with_label(
                    Label::new((file_name, span))
                        .with_message(error.phase())
                        .with_color(Color::Red),
                )
                .with_note(format!("at {file_name}:{location}"));
        }
        report.finish().write((file_name, Source::from(source)), writer)
    }

    /// Render an ariadne report into a string
    pub fn render(&self, error: &dyn PhaseError, file_name: &str, source: &str) -> String {
        let mut buffer = Vec::new();
        // Writing into a Vec cannot fail
        let _ = self.write(error, file_name, source, &mut buffer);
        String::from_utf8_lossy(&buffer).into_owned()
    }

    /// One-line form: `file:line:column: phase: message`
    pub fn render_short(&self, error: &dyn PhaseError, file_name: &str, source: &str) -> String {
        match error.offset() {
            Some(offset) => {
                let location = SourceLocation::from_offset(source, offset);
                format!("{file_name}:{location}: {}: {error}", error.phase())
            }
            None => format!("{file_name}: {}: {error}", error.phase()),
        }
    }
}

/// Byte range of the character at `offset`, empty at end of input
fn span_at(source: &str, offset: usize) -> Range<usize> {
    let start = offset.min(source.len());
    let width = source
        .get(start..)
        .and_then(|rest| rest.chars().next())
        .map_or(0, char::len_utf8);
    start..start + width
}
