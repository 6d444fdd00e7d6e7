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

//! Source location tracking

use std::fmt;

/// Line/column position resolved from a byte offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SourceLocation {
    /// Line number (1-based)
    pub line: usize,
    /// Column number (1-based, in characters)
    pub column: usize,
    /// Byte offset from start (0-based)
    pub offset: usize,
}

impl SourceLocation {
    /// Create a location from explicit parts
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }

    /// Resolve `offset` against `source`. Offsets past the end clamp to the end.
    pub fn from_offset(source: &str, offset: usize) -> Self {
        let offset = offset.min(source.len());
        let mut line = 1;
        let mut column = 1;
        for (index, ch) in source.char_indices() {
            if index >= offset {
                break;
            }
            if ch == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        Self::new(line, column, offset)
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_lines_and_columns() {
        let source = "LET x: Integer;\nDEF main() DO\n";
        assert_eq!(SourceLocation::from_offset(source, 0), SourceLocation::new(1, 1, 0));
        assert_eq!(SourceLocation::from_offset(source, 4), SourceLocation::new(1, 5, 4));
        assert_eq!(SourceLocation::from_offset(source, 16), SourceLocation::new(2, 1, 16));
        assert_eq!(SourceLocation::from_offset(source, 20).to_string(), "2:5");
    }

    #[test]
    fn clamps_past_the_end() {
        let location = SourceLocation::from_offset("ab", 10);
        assert_eq!(location.offset, 2);
        assert_eq!(location.column, 3);
    }
}
