// SPDX-FileCopyrightText: Copyright (c) 2025 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Lexical helpers shared by literal parsing and formatting.

/// Whether `text` is delimited by single quotes.
#[must_use]
pub fn is_quoted(text: &str) -> bool {
    text.len() >= 2 && text.starts_with('\'') && text.ends_with('\'')
}

/// Remove single quotes around `text` and unescape doubled quotes.
/// Returns `None` if the text is not quoted or contains a lone quote.
#[must_use]
pub fn unquote(text: &str) -> Option<String> {
    if !is_quoted(text) {
        return None;
    }
    let body = text.get(1..text.len() - 1)?;
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c == '\'' && chars.next() != Some('\'') {
            return None;
        }
        out.push(c);
    }
    Some(out)
}

/// Quote `text` doubling inner single quotes.
#[must_use]
pub fn quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

/// Body of `prefix'body'` where prefix is matched case-insensitively.
/// The body is returned as is.
#[must_use]
pub fn prefixed<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    if !head.eq_ignore_ascii_case(prefix) {
        return None;
    }
    let rest = text.get(prefix.len()..)?;
    if is_quoted(rest) {
        rest.get(1..rest.len() - 1)
    } else {
        None
    }
}

/// Split `Qualified.Name'body'` into the name and the quoted part.
#[must_use]
pub fn split_type_prefix(text: &str) -> Option<(&str, &str)> {
    let quote = text.find('\'')?;
    if quote == 0 {
        return None;
    }
    let (name, rest) = text.split_at(quote);
    let valid = name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_' || c == '.');
    (valid && is_quoted(rest)).then_some((name, rest))
}

/// Strip one of the literal suffix characters (`L`, `f`, `d`, `m`) in
/// either case.
#[must_use]
pub fn strip_suffix_ignore_case(text: &str, suffix: char) -> &str {
    text.strip_suffix(suffix.to_ascii_lowercase())
        .or_else(|| text.strip_suffix(suffix.to_ascii_uppercase()))
        .unwrap_or(text)
}

/// Text consists only of characters of a numeric literal.
#[must_use]
pub fn is_numeric_text(text: &str) -> bool {
    !text.is_empty()
        && text.chars().any(|c| c.is_ascii_digit())
        && text
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unquote() {
        assert_eq!(unquote("'abc'").as_deref(), Some("abc"));
        assert_eq!(unquote("''").as_deref(), Some(""));
        assert_eq!(unquote("'O''Neil'").as_deref(), Some("O'Neil"));
        assert_eq!(unquote("''''").as_deref(), Some("'"));
        assert_eq!(unquote("'O'Neil'"), None);
        assert_eq!(unquote("abc"), None);
        assert_eq!(unquote("'"), None);
    }

    #[test]
    fn test_quote() {
        assert_eq!(quote("O'Neil"), "'O''Neil'");
        assert_eq!(unquote(&quote("a''b")).as_deref(), Some("a''b"));
    }

    #[test]
    fn test_prefixed() {
        assert_eq!(prefixed("X'0aff'", "X"), Some("0aff"));
        assert_eq!(prefixed("x'0aff'", "X"), Some("0aff"));
        assert_eq!(prefixed("Geography'Point(1 2)'", "geography"), Some("Point(1 2)"));
        assert_eq!(prefixed("X0aff", "X"), None);
        assert_eq!(prefixed("'0aff'", "X"), None);
    }

    #[test]
    fn test_split_type_prefix() {
        assert_eq!(split_type_prefix("Ns.Color'Red'"), Some(("Ns.Color", "'Red'")));
        assert_eq!(split_type_prefix("'Red'"), None);
        assert_eq!(split_type_prefix("Ns Color'Red'"), None);
    }

    #[test]
    fn test_numeric_text() {
        assert!(is_numeric_text("-1.5e10"));
        assert!(!is_numeric_text("inf"));
        assert!(!is_numeric_text("1_000"));
        assert!(!is_numeric_text("-"));
        assert_eq!(strip_suffix_ignore_case("10L", 'L'), "10");
        assert_eq!(strip_suffix_ignore_case("10l", 'L'), "10");
        assert_eq!(strip_suffix_ignore_case("1.5", 'm'), "1.5");
    }
}
