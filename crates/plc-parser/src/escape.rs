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

//! Escape sequence decoding for character and string literals

use crate::error::{ParseError, ParseResult};

/// Decode `\b \n \r \t \' \" \\` in the body of a literal (quotes removed).
/// `position` is the byte offset of `body` in the source.
pub fn decode_escapes(body: &str, position: usize) -> ParseResult<String> {
    let mut result = String::with_capacity(body.len());
    let mut chars = body.char_indices();

    while let Some((index, ch)) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }
        match chars.next() {
            Some((_, 'b')) => result.push('\u{8}'),
            Some((_, 'n')) => result.push('\n'),
            Some((_, 'r')) => result.push('\r'),
            Some((_, 't')) => result.push('\t'),
            Some((_, '\'')) => result.push('\''),
            Some((_, '"')) => result.push('"'),
            Some((_, '\\')) => result.push('\\'),
            Some((_, other)) => {
                return Err(ParseError::InvalidEscape {
                    sequence: format!("\\{other}"),
                    position: position + index,
                });
            }
            None => {
                return Err(ParseError::InvalidEscape {
                    sequence: "\\".to_string(),
                    position: position + index,
                });
            }
        }
    }

    Ok(result)
}

/// Whether `ch` may follow a backslash
pub fn is_escape_char(ch: char) -> bool {
    matches!(ch, 'b' | 'n' | 'r' | 't' | '\'' | '"' | '\\')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_every_escape() {
        assert_eq!(
            decode_escapes(r#"a\b\n\r\t\'\"\\z"#, 0).unwrap(),
            "a\u{8}\n\r\t'\"\\z"
        );
    }

    #[test]
    fn rejects_unknown_escape_with_offset() {
        let err = decode_escapes(r"ab\q", 10).unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidEscape {
                sequence: "\\q".to_string(),
                position: 12,
            }
        );
    }
}
