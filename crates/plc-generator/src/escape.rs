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

//! Java literal escaping

/// Escape a character for a Java character literal
pub fn escape_char(ch: char) -> String {
    match ch {
        '\'' => "\\'".to_string(),
        other => escape_common(other).unwrap_or_else(|| other.to_string()),
    }
}

/// Escape text for a Java string literal
pub fn escape_string(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '"' => escaped.push_str("\\\""),
            other => match escape_common(other) {
                Some(sequence) => escaped.push_str(&sequence),
                None => escaped.push(other),
            },
        }
    }
    escaped
}

fn escape_common(ch: char) -> Option<String> {
    let sequence = match ch {
        '\u{8}' => "\\b",
        '\n' => "\\n",
        '\r' => "\\r",
        '\t' => "\\t",
        '\\' => "\\\\",
        _ => return None,
    };
    Some(sequence.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case('a', "a")]
    #[case('\'', "\\'")]
    #[case('"', "\"")]
    #[case('\n', "\\n")]
    #[case('\\', "\\\\")]
    #[case('\u{8}', "\\b")]
    fn characters(#[case] input: char, #[case] expected: &str) {
        assert_eq!(escape_char(input), expected);
    }

    #[test]
    fn strings() {
        assert_eq!(escape_string("say \"hi\"\tnow\r\n"), "say \\\"hi\\\"\\tnow\\r\\n");
        assert_eq!(escape_string("it's"), "it's");
    }
}
