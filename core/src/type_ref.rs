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

//! Type references.
//!
//! A type reference is a use of a type definition together with
//! nullability and, for primitive types, facets. Structured types are
//! referenced by qualified name; enum references carry their definition
//! so enum literals can be parsed without a model.

use crate::primitive::PrimitiveKind;
use std::collections::HashMap;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::sync::Arc;
use tagged_types::TaggedType;

/// Whether the value of the type may be null.
pub type IsNullable = TaggedType<bool, IsNullableTag>;
#[derive(tagged_types::Tag)]
#[implement(Clone, Copy, Hash, PartialEq, Eq)]
#[transparent(Debug, Display)]
#[capability(inner_access)]
pub enum IsNullableTag {}

/// Namespace-qualified name of the type (`Ns.Type`).
pub type FullName = TaggedType<String, FullNameTag>;
#[derive(tagged_types::Tag)]
#[implement(Clone, Hash, PartialEq, Eq)]
#[transparent(Debug, Display)]
#[capability(inner_access)]
pub enum FullNameTag {}

/// Kind of the referenced type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Primitive,
    Entity,
    Complex,
    Enum,
    TypeDefinition,
    Collection,
    EntityReference,
}

/// `MaxLength` facet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaxLength {
    Max,
    Value(u64),
}

/// `Scale` facet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scale {
    Variable,
    Value(u32),
}

/// `SRID` facet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Srid {
    Variable,
    Value(u32),
}

/// Facets of primitive and type definition references.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Facets {
    pub max_length: Option<MaxLength>,
    pub precision: Option<u32>,
    pub scale: Option<Scale>,
    pub srid: Option<Srid>,
    pub unicode: Option<bool>,
}

/// Reference to entity or complex type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StructuredTypeReference {
    pub name: FullName,
    pub nullable: IsNullable,
    pub is_abstract: bool,
    pub is_open: bool,
}

/// Member of the enum definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumMemberDefinition {
    pub name: String,
    pub value: i64,
}

/// Definition of the enum type sufficient to parse and format its
/// literals.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumDefinition {
    pub name: FullName,
    pub underlying: PrimitiveKind,
    pub is_flags: bool,
    pub members: Vec<EnumMemberDefinition>,
}

impl EnumDefinition {
    #[must_use]
    pub fn find_member(&self, name: &str) -> Option<&EnumMemberDefinition> {
        self.members.iter().find(|m| m.name == name)
    }

    /// Names of the members that compose `value`. For non-flag enums
    /// this is the single member with exactly this value.
    #[must_use]
    pub fn member_names(&self, value: i64) -> Vec<String> {
        if self.is_flags {
            if value == 0 {
                return self
                    .members
                    .iter()
                    .find(|m| m.value == 0)
                    .map(|m| vec![m.name.clone()])
                    .unwrap_or_default();
            }
            let names = self
                .members
                .iter()
                .filter(|m| m.value != 0 && value & m.value == m.value)
                .map(|m| m.name.clone())
                .collect::<Vec<_>>();
            let covered = self
                .members
                .iter()
                .filter(|m| names.contains(&m.name))
                .fold(0, |acc, m| acc | m.value);
            if covered == value {
                names
            } else {
                Vec::new()
            }
        } else {
            self.members
                .iter()
                .find(|m| m.value == value)
                .map(|m| vec![m.name.clone()])
                .unwrap_or_default()
        }
    }
}

/// Reference to a type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeReference {
    Primitive {
        kind: PrimitiveKind,
        nullable: IsNullable,
        facets: Facets,
    },
    Entity(StructuredTypeReference),
    Complex(StructuredTypeReference),
    Enum {
        definition: Arc<EnumDefinition>,
        nullable: IsNullable,
    },
    TypeDefinition {
        name: FullName,
        underlying: PrimitiveKind,
        nullable: IsNullable,
        facets: Facets,
    },
    Collection {
        element: Box<TypeReference>,
        nullable: IsNullable,
    },
    EntityReference {
        entity: FullName,
        nullable: IsNullable,
    },
}

impl TypeReference {
    /// Nullable primitive type reference without facets.
    #[must_use]
    pub fn primitive(kind: PrimitiveKind) -> Self {
        Self::Primitive {
            kind,
            nullable: IsNullable::new(true),
            facets: Facets::default(),
        }
    }

    /// Collection of `element`. Collections themselves are not nullable.
    #[must_use]
    pub fn collection(element: Self) -> Self {
        Self::Collection {
            element: Box::new(element),
            nullable: IsNullable::new(false),
        }
    }

    /// Enum reference.
    #[must_use]
    pub fn enumeration(definition: Arc<EnumDefinition>) -> Self {
        Self::Enum {
            definition,
            nullable: IsNullable::new(true),
        }
    }

    /// Same reference with different nullability.
    #[must_use]
    pub fn with_nullable(mut self, value: bool) -> Self {
        match &mut self {
            Self::Primitive { nullable, .. }
            | Self::Enum { nullable, .. }
            | Self::TypeDefinition { nullable, .. }
            | Self::Collection { nullable, .. }
            | Self::EntityReference { nullable, .. } => *nullable = IsNullable::new(value),
            Self::Entity(s) | Self::Complex(s) => s.nullable = IsNullable::new(value),
        }
        self
    }

    /// Same reference with different facets. Ignored for references
    /// that have no facets.
    #[must_use]
    pub fn with_facets(mut self, value: Facets) -> Self {
        match &mut self {
            Self::Primitive { facets, .. } | Self::TypeDefinition { facets, .. } => {
                *facets = value;
            }
            _ => (),
        }
        self
    }

    #[must_use]
    pub const fn kind(&self) -> TypeKind {
        match self {
            Self::Primitive { .. } => TypeKind::Primitive,
            Self::Entity(_) => TypeKind::Entity,
            Self::Complex(_) => TypeKind::Complex,
            Self::Enum { .. } => TypeKind::Enum,
            Self::TypeDefinition { .. } => TypeKind::TypeDefinition,
            Self::Collection { .. } => TypeKind::Collection,
            Self::EntityReference { .. } => TypeKind::EntityReference,
        }
    }

    #[must_use]
    pub fn is_nullable(&self) -> bool {
        match self {
            Self::Primitive { nullable, .. }
            | Self::Enum { nullable, .. }
            | Self::TypeDefinition { nullable, .. }
            | Self::Collection { nullable, .. }
            | Self::EntityReference { nullable, .. } => *nullable.inner(),
            Self::Entity(s) | Self::Complex(s) => *s.nullable.inner(),
        }
    }

    /// Facets of the reference if the reference carries any.
    #[must_use]
    pub const fn facets(&self) -> Option<&Facets> {
        match self {
            Self::Primitive { facets, .. } | Self::TypeDefinition { facets, .. } => Some(facets),
            _ => None,
        }
    }

    /// Primitive kind of the value: the kind itself for primitive
    /// references, the underlying type for type definitions.
    #[must_use]
    pub const fn primitive_kind(&self) -> Option<PrimitiveKind> {
        match self {
            Self::Primitive { kind, .. } => Some(*kind),
            Self::TypeDefinition { underlying, .. } => Some(*underlying),
            _ => None,
        }
    }

    /// Element type of the collection.
    #[must_use]
    pub fn element_type(&self) -> Option<&Self> {
        match self {
            Self::Collection { element, .. } => Some(element),
            _ => None,
        }
    }

    /// Enum definition of the enum reference.
    #[must_use]
    pub const fn enum_definition(&self) -> Option<&Arc<EnumDefinition>> {
        match self {
            Self::Enum { definition, .. } => Some(definition),
            _ => None,
        }
    }

    /// Full name of the referenced type: `Edm.Int32`, `Ns.Type`,
    /// `Collection(Ns.Type)`, `Ref(Ns.Entity)`.
    #[must_use]
    pub fn full_name(&self) -> String {
        match self {
            Self::Primitive { kind, .. } => kind.to_string(),
            Self::Entity(s) | Self::Complex(s) => s.name.inner().clone(),
            Self::Enum { definition, .. } => definition.name.inner().clone(),
            Self::TypeDefinition { name, .. } => name.inner().clone(),
            Self::Collection { element, .. } => format!("Collection({})", element.full_name()),
            Self::EntityReference { entity, .. } => format!("Ref({entity})"),
        }
    }

    /// Two references are equivalent when they reference the same
    /// definition with the same nullability and facets.
    #[must_use]
    pub fn is_equivalent_to(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Self::Primitive {
                    kind: k1,
                    nullable: n1,
                    facets: f1,
                },
                Self::Primitive {
                    kind: k2,
                    nullable: n2,
                    facets: f2,
                },
            ) => k1 == k2 && n1 == n2 && f1 == f2,
            (Self::Entity(s1), Self::Entity(s2)) | (Self::Complex(s1), Self::Complex(s2)) => {
                s1.name == s2.name && s1.nullable == s2.nullable
            }
            (
                Self::Enum {
                    definition: d1,
                    nullable: n1,
                },
                Self::Enum {
                    definition: d2,
                    nullable: n2,
                },
            ) => d1.name == d2.name && n1 == n2,
            (
                Self::TypeDefinition {
                    name: t1,
                    nullable: n1,
                    facets: f1,
                    ..
                },
                Self::TypeDefinition {
                    name: t2,
                    nullable: n2,
                    facets: f2,
                    ..
                },
            ) => t1 == t2 && n1 == n2 && f1 == f2,
            (
                Self::Collection {
                    element: e1,
                    nullable: n1,
                },
                Self::Collection {
                    element: e2,
                    nullable: n2,
                },
            ) => n1 == n2 && e1.is_equivalent_to(e2),
            (
                Self::EntityReference {
                    entity: e1,
                    nullable: n1,
                },
                Self::EntityReference {
                    entity: e2,
                    nullable: n2,
                },
            ) => e1 == e2 && n1 == n2,
            _ => false,
        }
    }
}

impl Display for TypeReference {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.full_name())?;
        if self.is_nullable() {
            f.write_str(" (nullable)")
        } else {
            Ok(())
        }
    }
}

/// Type affinity errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Primitive types cannot carry external type affinity.
    PrimitiveTypeAffinity(PrimitiveKind),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::PrimitiveTypeAffinity(kind) => {
                write!(f, "primitive type {kind} cannot have a type affinity")
            }
        }
    }
}

impl std::error::Error for Error {}

/// External type names (for example host-language type names)
/// associated with non-primitive types.
#[derive(Debug, Default, Clone)]
pub struct TypeAffinities {
    affinities: HashMap<String, String>,
}

impl TypeAffinities {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Associate `affinity` with the referenced type. Replaces the
    /// previous association.
    ///
    /// # Errors
    ///
    /// Returns error if `type_ref` references a primitive type (directly
    /// or via a type definition).
    pub fn set(&mut self, type_ref: &TypeReference, affinity: impl Into<String>) -> Result<(), Error> {
        match type_ref {
            TypeReference::Primitive { kind, .. } => Err(Error::PrimitiveTypeAffinity(*kind)),
            TypeReference::TypeDefinition { underlying, .. } => {
                Err(Error::PrimitiveTypeAffinity(*underlying))
            }
            _ => {
                self.affinities.insert(type_ref.full_name(), affinity.into());
                Ok(())
            }
        }
    }

    #[must_use]
    pub fn get(&self, type_ref: &TypeReference) -> Option<&str> {
        self.affinities
            .get(&type_ref.full_name())
            .map(String::as_str)
    }
}
