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

//! EDMX (CSDL XML) document model.
//!
//! Documents are deserialized with `quick-xml` into `De*` structures
//! that mirror the XML and then validated into the structures used by
//! the semantics layer. Validation covers document structure only:
//! references to types, properties, terms and labeled elements are kept
//! as raw strings and resolved lazily by [`crate::semantics`].

/// 17 Attribute Values
pub mod attribute_values;

/// 3.1 Element edmx:Edmx, 3.2 Element edmx:DataServices, 3.3 Element
/// edmx:Reference
pub mod edmx_root;

/// 5 Schema
pub mod schema;

/// 6 Structural Property / 7 Navigation Property
pub mod property;

/// 8 Entity Type / 9 Complex Type
pub mod structured_type;

/// 10 Enumeration Type
pub mod enum_type;

/// 11 Type Definition
pub mod type_definition;

/// 12 Action and Function
pub mod operation;

/// 13 Entity Container
pub mod entity_container;

/// 14 Vocabulary and Annotation
pub mod annotation;

/// 14.4 Constant Expression / 14.5 Dynamic Expression
pub mod expression;

pub use annotation::Annotation;
pub use annotation::Annotations;
pub use annotation::Term;
pub use attribute_values::Namespace;
pub use attribute_values::QualifiedName;
pub use attribute_values::SimpleIdentifier;
pub use attribute_values::TypeName;
pub use edmx_root::Edmx;
pub use entity_container::EntityContainer;
pub use enum_type::EnumType;
pub use expression::Expression;
pub use operation::Operation;
pub use property::Property;
pub use schema::Schema;
pub use schema::SchemaItem;
pub use structured_type::StructuredType;
pub use type_definition::TypeDefinition;

use quick_xml::DeError;
use std::error::Error as StdError;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;

pub type SchemaNamespace = String;

/// Facet attributes as they appear in the document. Parsed by the
/// semantics layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFacets {
    pub max_length: Option<String>,
    pub precision: Option<u32>,
    pub scale: Option<String>,
    pub srid: Option<String>,
    pub unicode: Option<bool>,
}

/// EDMX validation errors.
#[derive(Debug)]
pub enum ValidateError {
    /// XML deserialization error.
    XmlDeserialize(DeError),
    /// Invalid number of `DataServices`.
    WrongDataServicesNumber,
    /// In the `EntityType` too many keys.
    TooManyKeys,
    /// `Key` declared in the `ComplexType`.
    KeyInComplexType,
    /// In the `NavigationProperty` too `OnDelete` items.
    TooManyOnDelete,
    /// More than one `ReturnType` in the operation.
    TooManyReturnTypes,
    /// Required attribute is not specified.
    MissingAttribute(&'static str),
    /// Element carries more than one expression.
    TooManyExpressions,
    /// Element requires an expression but has none.
    MissingExpression,
    /// `If` expression must have exactly three operands.
    WrongIfOperands(usize),
    /// Schema validation error.
    Schema(SchemaNamespace, Box<ValidateError>),
    /// `ComplexType` or `EntityType` validation error.
    StructuredType(String, Box<ValidateError>),
    /// `NavigationProperty` validation error.
    NavigationProperty(String, Box<ValidateError>),
    /// `Action` or `Function` validation error.
    Operation(String, Box<ValidateError>),
    /// `EntityContainer` validation error.
    EntityContainer(String, Box<ValidateError>),
    /// `Annotation` validation error.
    Annotation(String, Box<ValidateError>),
    /// `LabeledElement` validation error.
    LabeledElement(String, Box<ValidateError>),
    /// `PropertyValue` validation error.
    PropertyValue(String, Box<ValidateError>),
}

impl Display for ValidateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::XmlDeserialize(err) => write!(f, "xml deserialization error: {err}"),
            Self::WrongDataServicesNumber => "exactly one DataServices element expected".fmt(f),
            Self::TooManyKeys => "too many Key elements".fmt(f),
            Self::KeyInComplexType => "Key element is not allowed in ComplexType".fmt(f),
            Self::TooManyOnDelete => "too many OnDelete elements".fmt(f),
            Self::TooManyReturnTypes => "too many ReturnType elements".fmt(f),
            Self::MissingAttribute(name) => write!(f, "required attribute {name} is missing"),
            Self::TooManyExpressions => "element has more than one expression".fmt(f),
            Self::MissingExpression => "element has no expression".fmt(f),
            Self::WrongIfOperands(n) => write!(f, "If expression has {n} operands, expected 3"),
            Self::Schema(ns, err) => write!(f, "schema {ns}: {err}"),
            Self::StructuredType(name, err) => write!(f, "type {name}: {err}"),
            Self::NavigationProperty(name, err) => write!(f, "navigation property {name}: {err}"),
            Self::Operation(name, err) => write!(f, "operation {name}: {err}"),
            Self::EntityContainer(name, err) => write!(f, "entity container {name}: {err}"),
            Self::Annotation(term, err) => write!(f, "annotation {term}: {err}"),
            Self::LabeledElement(name, err) => write!(f, "labeled element {name}: {err}"),
            Self::PropertyValue(name, err) => write!(f, "property value {name}: {err}"),
        }
    }
}

impl StdError for ValidateError {}
