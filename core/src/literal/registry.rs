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

//! Parser chain.
//!
//! Literal is parsed by the first applicable stage:
//!
//! 1. Parser registered for a type equivalent to the target. If such a
//!    parser exists its outcome is final, even if it is not applicable.
//! 2. General parsers in registration order. The first parser that
//!    returns a value or an error stops the chain.
//! 3. Built-in [`PrimitiveLiteralParser`].

use crate::literal::LiteralError;
use crate::literal::ParseOutcome;
use crate::literal::PrimitiveLiteralParser;
use crate::literal::UriLiteralParser;
use crate::type_ref::TypeReference;
use log::debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::sync::Arc;
use std::sync::RwLock;

/// Shared parser instance.
pub type SharedParser = Arc<dyn UriLiteralParser>;

/// Registry errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The same parser instance is already registered as general parser.
    DuplicateParser,
    /// Parser for an equivalent type is already registered.
    DuplicateTypeParser(String),
    /// Registry lock is poisoned.
    Lock(String),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::DuplicateParser => write!(f, "parser is already registered"),
            Self::DuplicateTypeParser(t) => write!(f, "parser for type {t} is already registered"),
            Self::Lock(err) => write!(f, "parser registry lock: {err}"),
        }
    }
}

impl std::error::Error for Error {}

#[derive(Default)]
struct Registered {
    by_type: Vec<(TypeReference, SharedParser)>,
    general: Vec<SharedParser>,
}

/// Parser chain with registry of custom parsers.
///
/// Registry is safe for concurrent use. Parsing doesn't block other
/// parsing; registration and removal are exclusive.
#[derive(Default)]
pub struct UriLiteralParsers {
    registered: RwLock<Registered>,
    builtin: PrimitiveLiteralParser,
}

fn same_instance(a: &SharedParser, b: &SharedParser) -> bool {
    Arc::as_ptr(a).cast::<()>() == Arc::as_ptr(b).cast::<()>()
}

impl UriLiteralParsers {
    /// Chain with only the built-in parser.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register general parser.
    ///
    /// # Errors
    ///
    /// Returns error if the same instance is already registered.
    pub fn add_parser(&self, parser: SharedParser) -> Result<(), Error> {
        let mut registered = self
            .registered
            .write()
            .map_err(|e| Error::Lock(e.to_string()))?;
        if registered.general.iter().any(|p| same_instance(p, &parser)) {
            return Err(Error::DuplicateParser);
        }
        registered.general.push(parser);
        debug!(
            "general literal parser added, {} registered",
            registered.general.len()
        );
        Ok(())
    }

    /// Register parser for values of `type_ref`.
    ///
    /// # Errors
    ///
    /// Returns error if a parser for an equivalent type is already
    /// registered.
    pub fn add_type_parser(&self, type_ref: TypeReference, parser: SharedParser) -> Result<(), Error> {
        let mut registered = self
            .registered
            .write()
            .map_err(|e| Error::Lock(e.to_string()))?;
        if registered
            .by_type
            .iter()
            .any(|(t, _)| t.is_equivalent_to(&type_ref))
        {
            return Err(Error::DuplicateTypeParser(type_ref.full_name()));
        }
        debug!("literal parser for {} added", type_ref.full_name());
        registered.by_type.push((type_ref, parser));
        Ok(())
    }

    /// Remove all registrations of `parser`. Returns `true` if anything
    /// was removed.
    ///
    /// # Errors
    ///
    /// Returns error if the registry lock is poisoned.
    pub fn remove_parser(&self, parser: &SharedParser) -> Result<bool, Error> {
        let mut registered = self
            .registered
            .write()
            .map_err(|e| Error::Lock(e.to_string()))?;
        let before = registered.general.len() + registered.by_type.len();
        registered.general.retain(|p| !same_instance(p, parser));
        registered.by_type.retain(|(_, p)| !same_instance(p, parser));
        let removed = before - registered.general.len() - registered.by_type.len();
        debug!("literal parser removed from {removed} registrations");
        Ok(removed > 0)
    }

    /// Parse `text` as a value of `target` by the chain.
    #[must_use]
    pub fn parse(&self, text: &str, target: &TypeReference) -> ParseOutcome {
        let (typed, general) = match self.registered.read() {
            Ok(registered) => (
                registered
                    .by_type
                    .iter()
                    .find(|(t, _)| t.is_equivalent_to(target))
                    .map(|(_, p)| Arc::clone(p)),
                registered.general.clone(),
            ),
            Err(e) => return ParseOutcome::Error(LiteralError::new(e.to_string(), text)),
        };
        if let Some(parser) = typed {
            return parser.parse(text, target);
        }
        general
            .iter()
            .map(|p| p.parse(text, target))
            .find(ParseOutcome::is_applicable)
            .unwrap_or_else(|| self.builtin.parse(text, target))
    }
}

impl UriLiteralParser for UriLiteralParsers {
    fn parse(&self, text: &str, target: &TypeReference) -> ParseOutcome {
        Self::parse(self, text, target)
    }
}
