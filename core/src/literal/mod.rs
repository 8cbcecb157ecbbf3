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

//! URI literals.
//!
//! A literal is the text of a typed value in a URI: `'O''Neil'`,
//! `42L`, `2021-03-04`, `geography'SRID=4326;Point(1 2)'`. Parsing is
//! performed against a target type reference by a chain of parsers
//! (see [`UriLiteralParsers`]). Each parser in the chain reports one of
//! three outcomes:
//!
//! - the literal is not applicable to the parser (the chain continues);
//! - the literal was parsed into a value;
//! - the literal belongs to the parser but is malformed.
//!
//! ```rust
//! use nv_odata_core::literal::ParseOutcome;
//! use nv_odata_core::literal::UriLiteralParsers;
//! use nv_odata_core::primitive::PrimitiveKind;
//! use nv_odata_core::type_ref::TypeReference;
//! use nv_odata_core::value::Value;
//!
//! let parsers = UriLiteralParsers::new();
//! let target = TypeReference::primitive(PrimitiveKind::Int64);
//! assert_eq!(
//!     parsers.parse("9223372036854775807L", &target),
//!     ParseOutcome::Value(Value::from(i64::MAX))
//! );
//! ```

/// Literal text helpers.
pub mod text;

/// Built-in parser of primitive and enum literals.
pub mod primitive;

/// Formatting of values as literals.
pub mod format;

/// Parser chain and registry.
pub mod registry;

use crate::type_ref::TypeReference;
use crate::value::Value;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;

#[doc(inline)]
pub use format::format_uri_literal;
#[doc(inline)]
pub use primitive::PrimitiveLiteralParser;
#[doc(inline)]
pub use registry::UriLiteralParsers;

/// Literal recognized by a parser but malformed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralError {
    /// Human readable description.
    pub message: String,
    /// Offending literal text.
    pub text: String,
}

impl LiteralError {
    pub fn new(message: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            text: text.into(),
        }
    }
}

impl Display for LiteralError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "invalid literal {}: {}", self.text, self.message)
    }
}

impl std::error::Error for LiteralError {}

/// Result of parsing a literal by one parser or by the whole chain.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    /// Parser doesn't recognize the literal for the target type.
    NotApplicable,
    /// Parsed value.
    Value(Value),
    /// Parser recognized the literal but it is malformed.
    Error(LiteralError),
}

impl ParseOutcome {
    /// Whether the outcome stops the chain.
    #[must_use]
    pub const fn is_applicable(&self) -> bool {
        !matches!(self, Self::NotApplicable)
    }

    #[must_use]
    pub fn value(self) -> Option<Value> {
        match self {
            Self::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Convert to `Result` where `Ok(None)` is not applicable.
    ///
    /// # Errors
    ///
    /// Returns error if the literal is malformed.
    pub fn into_result(self) -> Result<Option<Value>, LiteralError> {
        match self {
            Self::NotApplicable => Ok(None),
            Self::Value(v) => Ok(Some(v)),
            Self::Error(e) => Err(e),
        }
    }
}

impl From<Value> for ParseOutcome {
    fn from(v: Value) -> Self {
        Self::Value(v)
    }
}

/// Parser of URI literals for a target type.
pub trait UriLiteralParser: Send + Sync {
    /// Parse `text` as a value of `target`.
    fn parse(&self, text: &str, target: &TypeReference) -> ParseOutcome;
}

impl<F> UriLiteralParser for F
where
    F: Fn(&str, &TypeReference) -> ParseOutcome + Send + Sync,
{
    fn parse(&self, text: &str, target: &TypeReference) -> ParseOutcome {
        self(text, target)
    }
}
