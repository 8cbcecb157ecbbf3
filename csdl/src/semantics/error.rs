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

//! Semantic diagnostics.
//!
//! Resolution never fails with a Rust error. A reference that cannot be
//! resolved becomes [`Resolution::Unresolved`] carrying the diagnostics
//! that explain why. Callers decide whether the model is valid by
//! inspecting the diagnostics.

use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use tagged_types::TaggedType;

/// Logical location of the schema element that produced a diagnostic:
/// `Ns.Type`, `Ns.Type/Property`, `Ns.Container/Set`,
/// `Ns.Type@Core.Description/0`.
pub type Location = TaggedType<String, LocationTag>;
#[derive(tagged_types::Tag)]
#[implement(Clone, Hash, PartialEq, Eq)]
#[transparent(Debug, Display)]
#[capability(inner_access)]
pub enum LocationTag {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdmErrorCode {
    InvalidTypeName,
    BadUnresolvedType,
    BadUnresolvedPrimitiveType,
    BadUnresolvedProperty,
    BadUnresolvedEnumMember,
    BadUnresolvedEntitySet,
    BadUnresolvedTerm,
    BadUnresolvedOperation,
    BadUnresolvedLabeledElement,
    BadUnresolvedTarget,
    AmbiguousLabeledElement,
    BadCyclicType,
    BadCyclicLabeledElement,
    BaseTypeKindMismatch,
    EnumMemberValueOutOfRange,
    InvalidEnumMemberValue,
    DuplicateParameterName,
    InvalidFacetValue,
    InvalidConstant,
    /// Expression cannot be evaluated without an instance.
    NotConstant,
}

impl Display for EdmErrorCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&format!("{self:?}"), f)
    }
}

/// Structured diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EdmError {
    pub code: EdmErrorCode,
    pub message: String,
    pub location: Location,
}

impl EdmError {
    pub fn new(code: EdmErrorCode, message: impl Into<String>, location: &Location) -> Self {
        Self {
            code,
            message: message.into(),
            location: location.clone(),
        }
    }
}

impl Display for EdmError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}: {}: {}", self.location, self.code, self.message)
    }
}

/// Sentinel that stands in for a reference that failed to resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unresolved {
    /// Name as written in the schema.
    pub name: String,
    pub location: Location,
    /// Zero or more diagnostics. Empty when the reason is reported by
    /// another element (the referenced type definition is broken, for
    /// example).
    pub errors: Vec<EdmError>,
}

impl Unresolved {
    /// Sentinel with exactly one diagnostic at `location`.
    pub fn new(
        name: impl Into<String>,
        code: EdmErrorCode,
        message: impl Into<String>,
        location: &Location,
    ) -> Self {
        Self {
            name: name.into(),
            location: location.clone(),
            errors: vec![EdmError::new(code, message, location)],
        }
    }

    /// Sentinel without its own diagnostics.
    pub fn silent(name: impl Into<String>, location: &Location) -> Self {
        Self {
            name: name.into(),
            location: location.clone(),
            errors: Vec::new(),
        }
    }
}

/// Outcome of resolving a reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<T> {
    Resolved(T),
    Unresolved(Unresolved),
}

impl<T> Resolution<T> {
    /// Resolution with one diagnostic.
    pub fn unresolved(
        name: impl Into<String>,
        code: EdmErrorCode,
        message: impl Into<String>,
        location: &Location,
    ) -> Self {
        Self::Unresolved(Unresolved::new(name, code, message, location))
    }

    #[must_use]
    pub const fn resolved(&self) -> Option<&T> {
        match self {
            Self::Resolved(v) => Some(v),
            Self::Unresolved(_) => None,
        }
    }

    #[must_use]
    pub const fn is_unresolved(&self) -> bool {
        matches!(self, Self::Unresolved(_))
    }

    /// Diagnostics of the sentinel; empty for resolved values.
    #[must_use]
    pub fn errors(&self) -> &[EdmError] {
        match self {
            Self::Resolved(_) => &[],
            Self::Unresolved(u) => &u.errors,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Resolution<U> {
        match self {
            Self::Resolved(v) => Resolution::Resolved(f(v)),
            Self::Unresolved(u) => Resolution::Unresolved(u),
        }
    }

    /// # Errors
    ///
    /// Returns the sentinel if the reference is not resolved.
    pub fn into_result(self) -> Result<T, Unresolved> {
        match self {
            Self::Resolved(v) => Ok(v),
            Self::Unresolved(u) => Err(u),
        }
    }
}

impl<T: Clone> Resolution<T> {
    /// Resolved value without diagnostics or a sentinel without its own
    /// diagnostics. Used when the failure is reported elsewhere.
    #[must_use]
    pub fn quiet(&self) -> Self {
        match self {
            Self::Resolved(v) => Self::Resolved(v.clone()),
            Self::Unresolved(u) => Self::Unresolved(Unresolved::silent(&u.name, &u.location)),
        }
    }
}
