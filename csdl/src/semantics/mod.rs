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

//! Semantic model of CSDL documents.
//!
//! [`Model`] wraps validated documents ([`crate::edmx::Edmx`]) into an
//! arena of nodes addressed by handles ([`TypeId`], [`PropertyId`],
//! ...). Nodes are created once when the model is built. Everything that
//! requires name resolution (base types, property types, enum member
//! values, annotation targets, expression references) is computed on
//! first access and memoized, see [`memo::Memo`].
//!
//! Resolution never fails: a reference that cannot be resolved is
//! returned as [`Resolution::Unresolved`] with diagnostics attached.
//! [`Model::errors`] forces every lazily computed property and collects
//! all diagnostics of the model.
//!
//! Example:
//!
//! ```rust
//! use nv_odata_csdl::edmx::Edmx;
//! use nv_odata_csdl::semantics::Model;
//!
//! let csdl = r#"<edmx:Edmx xmlns:edmx="http://docs.oasis-open.org/odata/ns/edmx" Version="4.0">
//!   <edmx:DataServices>
//!     <Schema xmlns="http://docs.oasis-open.org/odata/ns/edm" Namespace="Sales">
//!       <EntityType Name="Customer">
//!         <Key><PropertyRef Name="Id"/></Key>
//!         <Property Name="Id" Type="Edm.Int32" Nullable="false"/>
//!       </EntityType>
//!     </Schema>
//!   </edmx:DataServices>
//! </edmx:Edmx>"#;
//! let model = Model::new(vec![Edmx::parse(csdl).unwrap()]);
//! let customer = model.find_type("Sales.Customer").unwrap();
//! assert_eq!(model.key(customer).len(), 1);
//! assert!(model.errors().is_empty());
//! ```

pub mod error;
pub mod memo;

mod annotations;
mod build;
mod containers;
mod enums;
mod expressions;
mod names;
mod operations;
mod structured;
mod terms;
mod types;
mod validation;

#[doc(inline)]
pub use annotations::AnnotationTarget;
#[doc(inline)]
pub use containers::NavigationBinding;
#[doc(inline)]
pub use enums::EnumMember;
#[doc(inline)]
pub use error::EdmError;
#[doc(inline)]
pub use error::EdmErrorCode;
#[doc(inline)]
pub use error::Location;
#[doc(inline)]
pub use error::Resolution;
#[doc(inline)]
pub use error::Unresolved;
#[doc(inline)]
pub use expressions::ExpressionKind;
#[doc(inline)]
pub use expressions::ReferenceTarget;
#[doc(inline)]
pub use operations::EntitySetPath;
#[doc(inline)]
pub use operations::OperationKind;
#[doc(inline)]
pub use operations::OperationParameter;
#[doc(inline)]
pub use operations::ParameterList;

use crate::edmx::entity_container::NavigationPropertyBinding;
use crate::edmx::entity_container::NavigationSourceKind;
use crate::edmx::entity_container::OperationImportKind;
use crate::edmx::expression::ConstantKind;
use crate::edmx::expression::PathKind;
use crate::edmx::property::PropertyAttrs;
use crate::edmx::structured_type::PropertyRef;
use crate::edmx::RawFacets;
use memo::Memo;
use names::NameIndex;
use nv_odata_core::type_ref::EnumDefinition;
use nv_odata_core::type_ref::TypeAffinities;
use nv_odata_core::PrimitiveKind;
use nv_odata_core::TypeReference;
use nv_odata_core::UriLiteralParsers;
use nv_odata_core::Value;
use std::collections::HashMap;
use std::sync::RwLock;
use tagged_types::TaggedType;

macro_rules! handle {
    ($(#[$doc:meta])* $name:ident, $tag:ident) => {
        $(#[$doc])*
        pub type $name = TaggedType<usize, $tag>;
        #[derive(tagged_types::Tag)]
        #[implement(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
        #[transparent(Debug, Display)]
        #[capability(inner_access)]
        pub enum $tag {}
    };
}

handle!(
    /// Schema of the model.
    SchemaId,
    SchemaIdTag
);
handle!(
    /// Entity type, complex type, enum type or type definition.
    TypeId,
    TypeIdTag
);
handle!(
    /// Structural or navigation property.
    PropertyId,
    PropertyIdTag
);
handle!(
    /// Action or function (one overload).
    OperationId,
    OperationIdTag
);
handle!(TermId, TermIdTag);
handle!(ContainerId, ContainerIdTag);
handle!(
    /// Entity set or singleton.
    SourceId,
    SourceIdTag
);
handle!(
    /// Action import or function import.
    ImportId,
    ImportIdTag
);
handle!(AnnotationId, AnnotationIdTag);
handle!(ExpressionId, ExpressionIdTag);

/// Kind of the schema type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaTypeKind {
    EntityType,
    ComplexType,
    EnumType,
    TypeDefinition,
}

pub(crate) struct SchemaNode {
    pub(crate) namespace: String,
    pub(crate) alias: Option<String>,
    /// Aliases visible in the document of the schema: alias to namespace.
    pub(crate) aliases: HashMap<String, String>,
    pub(crate) types: Vec<TypeId>,
    pub(crate) operations: Vec<OperationId>,
    pub(crate) terms: Vec<TermId>,
    pub(crate) containers: Vec<ContainerId>,
    pub(crate) annotations: Vec<AnnotationId>,
}

pub(crate) struct TypeNode {
    pub(crate) schema: SchemaId,
    pub(crate) name: String,
    pub(crate) full_name: String,
    pub(crate) location: Location,
    pub(crate) annotations: Vec<AnnotationId>,
    pub(crate) decl: TypeDecl,
}

pub(crate) enum TypeDecl {
    Structured(StructuredDecl),
    Enum(EnumDecl),
    Definition(DefinitionDecl),
}

pub(crate) struct StructuredDecl {
    pub(crate) is_entity: bool,
    pub(crate) base_type: Option<String>,
    pub(crate) is_abstract: bool,
    pub(crate) is_open: bool,
    pub(crate) has_stream: bool,
    pub(crate) key: Option<Vec<PropertyRef>>,
    pub(crate) properties: Vec<PropertyId>,
    pub(crate) resolved_base: Memo<Option<Resolution<TypeId>>>,
    pub(crate) all_properties: Memo<Vec<PropertyId>>,
    pub(crate) resolved_key: Memo<Vec<Resolution<PropertyId>>>,
}

pub(crate) struct EnumDecl {
    pub(crate) underlying_type: Option<String>,
    pub(crate) is_flags: bool,
    pub(crate) members: Vec<EnumMemberDecl>,
    pub(crate) underlying: Memo<Resolution<PrimitiveKind>>,
    pub(crate) resolved_members: Memo<Vec<EnumMember>>,
    pub(crate) definition: Memo<EnumDefinition>,
}

pub(crate) struct EnumMemberDecl {
    pub(crate) name: String,
    pub(crate) value: Option<String>,
    pub(crate) annotations: Vec<AnnotationId>,
}

pub(crate) struct DefinitionDecl {
    pub(crate) underlying_type: String,
    pub(crate) facets: RawFacets,
    pub(crate) underlying: Memo<Resolution<PrimitiveKind>>,
}

pub(crate) struct PropertyNode {
    pub(crate) owner: TypeId,
    pub(crate) name: String,
    pub(crate) location: Location,
    pub(crate) ptype: String,
    pub(crate) nullable: Option<bool>,
    pub(crate) attrs: PropertyAttrs,
    pub(crate) annotations: Vec<AnnotationId>,
    pub(crate) resolved_type: Memo<Resolution<TypeReference>>,
    pub(crate) partner: Memo<Option<Resolution<PropertyId>>>,
}

pub(crate) struct ParameterDecl {
    pub(crate) name: String,
    pub(crate) ptype: String,
    pub(crate) nullable: Option<bool>,
    pub(crate) facets: RawFacets,
    pub(crate) location: Location,
    pub(crate) annotations: Vec<AnnotationId>,
}

pub(crate) struct ReturnDecl {
    pub(crate) rtype: String,
    pub(crate) nullable: Option<bool>,
    pub(crate) facets: RawFacets,
    pub(crate) location: Location,
    pub(crate) annotations: Vec<AnnotationId>,
}

pub(crate) struct OperationNode {
    pub(crate) schema: SchemaId,
    pub(crate) name: String,
    pub(crate) full_name: String,
    pub(crate) kind: OperationKind,
    pub(crate) location: Location,
    pub(crate) is_bound: bool,
    pub(crate) is_composable: bool,
    pub(crate) entity_set_path: Option<String>,
    pub(crate) parameters: Vec<ParameterDecl>,
    pub(crate) return_type: Option<ReturnDecl>,
    pub(crate) annotations: Vec<AnnotationId>,
    pub(crate) resolved_parameters: Memo<ParameterList>,
    pub(crate) resolved_return: Memo<Option<Resolution<TypeReference>>>,
    pub(crate) resolved_path: Memo<Option<Resolution<EntitySetPath>>>,
}

pub(crate) struct TermNode {
    pub(crate) schema: SchemaId,
    pub(crate) name: String,
    pub(crate) full_name: String,
    pub(crate) location: Location,
    pub(crate) ttype: String,
    pub(crate) base_term: Option<String>,
    pub(crate) default_value: Option<String>,
    pub(crate) applies_to: Vec<String>,
    pub(crate) nullable: Option<bool>,
    pub(crate) facets: RawFacets,
    pub(crate) annotations: Vec<AnnotationId>,
    pub(crate) resolved_type: Memo<Resolution<TypeReference>>,
    pub(crate) resolved_base: Memo<Option<Resolution<TermId>>>,
    pub(crate) default: Memo<Option<Resolution<Value>>>,
}

pub(crate) struct ContainerNode {
    pub(crate) schema: SchemaId,
    pub(crate) name: String,
    pub(crate) full_name: String,
    pub(crate) location: Location,
    pub(crate) sources: Vec<SourceId>,
    pub(crate) imports: Vec<ImportId>,
    pub(crate) annotations: Vec<AnnotationId>,
}

pub(crate) struct SourceNode {
    pub(crate) container: ContainerId,
    pub(crate) name: String,
    pub(crate) kind: NavigationSourceKind,
    pub(crate) location: Location,
    pub(crate) entity_type: String,
    pub(crate) bindings: Vec<NavigationPropertyBinding>,
    pub(crate) annotations: Vec<AnnotationId>,
    pub(crate) resolved_type: Memo<Resolution<TypeId>>,
    pub(crate) resolved_bindings: Memo<Vec<NavigationBinding>>,
}

pub(crate) struct ImportNode {
    pub(crate) container: ContainerId,
    pub(crate) name: String,
    pub(crate) kind: OperationImportKind,
    pub(crate) location: Location,
    pub(crate) operation: String,
    pub(crate) entity_set: Option<String>,
    pub(crate) annotations: Vec<AnnotationId>,
    pub(crate) resolved_operations: Memo<Resolution<Vec<OperationId>>>,
    pub(crate) resolved_entity_set: Memo<Option<Resolution<SourceId>>>,
}

/// Target of the annotation as written in the schema.
pub(crate) enum TargetDecl {
    /// Annotation is nested in the annotated element.
    Inline(AnnotationTarget),
    /// `Target` attribute of edm:Annotations.
    External(String),
}

pub(crate) struct AnnotationNode {
    pub(crate) schema: SchemaId,
    pub(crate) term: String,
    pub(crate) qualifier: Option<String>,
    pub(crate) location: Location,
    pub(crate) target: TargetDecl,
    pub(crate) value: Option<ExpressionId>,
    pub(crate) resolved_term: Memo<Resolution<TermId>>,
    pub(crate) resolved_target: Memo<Resolution<AnnotationTarget>>,
    pub(crate) binding: Memo<Option<TypeId>>,
}

pub(crate) enum ExpressionData {
    Constant(ConstantKind, String),
    Null,
    Path(PathKind, String),
    Collection(Vec<ExpressionId>),
    Record {
        rtype: Option<String>,
        properties: Vec<(String, ExpressionId)>,
    },
    LabeledElement {
        name: String,
        value: ExpressionId,
    },
    LabeledElementReference(String),
    Apply {
        function: String,
        arguments: Vec<ExpressionId>,
    },
    If {
        condition: ExpressionId,
        then: ExpressionId,
        otherwise: ExpressionId,
    },
}

pub(crate) struct ExpressionNode {
    pub(crate) annotation: AnnotationId,
    pub(crate) location: Location,
    pub(crate) data: ExpressionData,
    pub(crate) reference: Memo<Option<Resolution<ReferenceTarget>>>,
    pub(crate) dereferenced: Memo<Resolution<ExpressionId>>,
    pub(crate) value: Memo<Resolution<Value>>,
}

/// Semantic model over a set of CSDL documents.
///
/// The model is immutable after construction except for memoized
/// properties and the registries it owns ([`Model::literal_parsers`],
/// type affinities). It is safe to share between threads.
pub struct Model {
    pub(crate) schemas: Vec<SchemaNode>,
    pub(crate) types: Vec<TypeNode>,
    pub(crate) properties: Vec<PropertyNode>,
    pub(crate) operations: Vec<OperationNode>,
    pub(crate) terms: Vec<TermNode>,
    pub(crate) containers: Vec<ContainerNode>,
    pub(crate) sources: Vec<SourceNode>,
    pub(crate) imports: Vec<ImportNode>,
    pub(crate) annotations: Vec<AnnotationNode>,
    pub(crate) expressions: Vec<ExpressionNode>,
    pub(crate) names: NameIndex,
    pub(crate) parsers: UriLiteralParsers,
    pub(crate) affinities: RwLock<TypeAffinities>,
    pub(crate) derived: Memo<HashMap<TypeId, Vec<TypeId>>>,
}

impl Model {
    /// Parser chain used for constant expressions and default values.
    /// Custom parsers registered here apply to the whole model.
    #[must_use]
    pub const fn literal_parsers(&self) -> &UriLiteralParsers {
        &self.parsers
    }

    /// All schemas in document order.
    pub fn schemas(&self) -> impl Iterator<Item = SchemaId> {
        (0..self.schemas.len()).map(SchemaId::new)
    }

    #[must_use]
    pub fn schema_namespace(&self, id: SchemaId) -> &str {
        &self.schema(id).namespace
    }

    #[must_use]
    pub fn schema_alias(&self, id: SchemaId) -> Option<&str> {
        self.schema(id).alias.as_deref()
    }

    /// Types declared in the schema in declaration order.
    #[must_use]
    pub fn schema_types(&self, id: SchemaId) -> &[TypeId] {
        &self.schema(id).types
    }

    #[must_use]
    pub fn schema_operations(&self, id: SchemaId) -> &[OperationId] {
        &self.schema(id).operations
    }

    #[must_use]
    pub fn schema_terms(&self, id: SchemaId) -> &[TermId] {
        &self.schema(id).terms
    }

    #[must_use]
    pub fn schema_containers(&self, id: SchemaId) -> &[ContainerId] {
        &self.schema(id).containers
    }

    /// All types of the model.
    pub fn types(&self) -> impl Iterator<Item = TypeId> {
        (0..self.types.len()).map(TypeId::new)
    }

    pub fn operations(&self) -> impl Iterator<Item = OperationId> {
        (0..self.operations.len()).map(OperationId::new)
    }

    pub fn terms(&self) -> impl Iterator<Item = TermId> {
        (0..self.terms.len()).map(TermId::new)
    }

    pub fn entity_containers(&self) -> impl Iterator<Item = ContainerId> {
        (0..self.containers.len()).map(ContainerId::new)
    }

    /// All annotations of the model, inline and out-of-line.
    pub fn annotations(&self) -> impl Iterator<Item = AnnotationId> {
        (0..self.annotations.len()).map(AnnotationId::new)
    }

    pub(crate) fn schema(&self, id: SchemaId) -> &SchemaNode {
        &self.schemas[*id.inner()]
    }

    pub(crate) fn type_node(&self, id: TypeId) -> &TypeNode {
        &self.types[*id.inner()]
    }

    pub(crate) fn property_node(&self, id: PropertyId) -> &PropertyNode {
        &self.properties[*id.inner()]
    }

    pub(crate) fn operation_node(&self, id: OperationId) -> &OperationNode {
        &self.operations[*id.inner()]
    }

    pub(crate) fn term_node(&self, id: TermId) -> &TermNode {
        &self.terms[*id.inner()]
    }

    pub(crate) fn container_node(&self, id: ContainerId) -> &ContainerNode {
        &self.containers[*id.inner()]
    }

    pub(crate) fn source_node(&self, id: SourceId) -> &SourceNode {
        &self.sources[*id.inner()]
    }

    pub(crate) fn import_node(&self, id: ImportId) -> &ImportNode {
        &self.imports[*id.inner()]
    }

    pub(crate) fn annotation_node(&self, id: AnnotationId) -> &AnnotationNode {
        &self.annotations[*id.inner()]
    }

    pub(crate) fn expression_node(&self, id: ExpressionId) -> &ExpressionNode {
        &self.expressions[*id.inner()]
    }
}

#[cfg(test)]
pub(crate) mod test_utils {
    use super::Model;
    use crate::edmx::Edmx;

    /// Model of one document with a single schema.
    pub fn model(namespace: &str, alias: Option<&str>, body: &str) -> Model {
        let alias = alias.map(|a| format!(r#" Alias="{a}""#)).unwrap_or_default();
        let csdl = format!(
            r#"<edmx:Edmx xmlns:edmx="http://docs.oasis-open.org/odata/ns/edmx" Version="4.0">
                 <edmx:DataServices>
                   <Schema xmlns="http://docs.oasis-open.org/odata/ns/edm" Namespace="{namespace}"{alias}>
                     {body}
                   </Schema>
                 </edmx:DataServices>
               </edmx:Edmx>"#
        );
        Model::new(vec![Edmx::parse(&csdl).unwrap()])
    }
}
