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

//! Vocabulary annotations.

use crate::semantics::AnnotationId;
use crate::semantics::ContainerId;
use crate::semantics::EdmErrorCode;
use crate::semantics::ExpressionId;
use crate::semantics::ImportId;
use crate::semantics::Location;
use crate::semantics::Model;
use crate::semantics::OperationId;
use crate::semantics::PropertyId;
use crate::semantics::ReferenceTarget;
use crate::semantics::Resolution;
use crate::semantics::SchemaId;
use crate::semantics::SourceId;
use crate::semantics::TargetDecl;
use crate::semantics::TermId;
use crate::semantics::TypeId;
use nv_odata_core::type_ref::TypeKind;
use nv_odata_core::PrimitiveKind;
use nv_odata_core::TypeReference;
use nv_odata_core::Value;
use std::sync::Arc;

/// Qualified name of the `Core.Description` term.
pub const CORE_DESCRIPTION: &str = "Org.OData.Core.V1.Description";
/// Qualified name of the `Core.LongDescription` term.
pub const CORE_LONG_DESCRIPTION: &str = "Org.OData.Core.V1.LongDescription";

/// Annotatable model element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnnotationTarget {
    Schema(SchemaId),
    Type(TypeId),
    Property(PropertyId),
    /// Enum type and member index.
    EnumMember(TypeId, usize),
    Operation(OperationId),
    /// Operation and parameter index.
    Parameter(OperationId, usize),
    ReturnType(OperationId),
    Term(TermId),
    Container(ContainerId),
    Source(SourceId),
    Import(ImportId),
}

impl Model {
    /// Term name as written.
    #[must_use]
    pub fn annotation_term_name(&self, id: AnnotationId) -> &str {
        &self.annotation_node(id).term
    }

    #[must_use]
    pub fn annotation_qualifier(&self, id: AnnotationId) -> Option<&str> {
        self.annotation_node(id).qualifier.as_deref()
    }

    #[must_use]
    pub fn annotation_location(&self, id: AnnotationId) -> &Location {
        &self.annotation_node(id).location
    }

    /// Expression of the annotation. `None` means the default value of
    /// the term.
    #[must_use]
    pub fn annotation_value(&self, id: AnnotationId) -> Option<ExpressionId> {
        self.annotation_node(id).value
    }

    pub fn annotation_term(&self, id: AnnotationId) -> Arc<Resolution<TermId>> {
        let node = self.annotation_node(id);
        node.resolved_term.get_or_init(|| {
            match self.lookup_term(Some(node.schema), &node.term) {
                Some(t) => Resolution::Resolved(t),
                None => Resolution::unresolved(
                    &node.term,
                    EdmErrorCode::BadUnresolvedTerm,
                    format!("term {} not found", node.term),
                    &node.location,
                ),
            }
        })
    }

    /// Annotated element. Always resolved for inline annotations.
    pub fn annotation_target(&self, id: AnnotationId) -> Arc<Resolution<AnnotationTarget>> {
        let node = self.annotation_node(id);
        node.resolved_target.get_or_init(|| match &node.target {
            TargetDecl::Inline(target) => Resolution::Resolved(*target),
            TargetDecl::External(raw) => self.resolve_target(node.schema, raw, &node.location),
        })
    }

    /// Structured type that paths in the annotation start from: the
    /// annotated type, the declaring type of the annotated property,
    /// the entity type of the annotated entity set or the binding
    /// parameter type of the annotated bound operation.
    #[must_use]
    pub fn annotation_binding_context(&self, id: AnnotationId) -> Option<TypeId> {
        let node = self.annotation_node(id);
        *node.binding.get_or_init(|| {
            match self.annotation_target(id).resolved()? {
                AnnotationTarget::Type(t) => self.is_structured(*t).then_some(*t),
                AnnotationTarget::Property(p) => Some(self.property_owner(*p)),
                AnnotationTarget::Source(s) => self.source_entity_type(*s).resolved().copied(),
                AnnotationTarget::Operation(op) | AnnotationTarget::Parameter(op, _) => self
                    .binding_parameter(*op)
                    .and_then(|p| self.structured_type_of(p.type_ref.resolved()?)),
                AnnotationTarget::Schema(_)
                | AnnotationTarget::EnumMember(..)
                | AnnotationTarget::ReturnType(_)
                | AnnotationTarget::Term(_)
                | AnnotationTarget::Container(_)
                | AnnotationTarget::Import(_) => None,
            }
        })
    }

    /// Structured type of the reference or of its collection elements.
    pub(crate) fn structured_type_of(&self, type_ref: &TypeReference) -> Option<TypeId> {
        let element = type_ref.element_type().unwrap_or(type_ref);
        matches!(element.kind(), TypeKind::Entity | TypeKind::Complex)
            .then(|| self.names.types.get(&element.full_name()).copied())
            .flatten()
    }

    /// Inline and out-of-line annotations of the element.
    #[must_use]
    pub fn annotations_for(&self, target: AnnotationTarget) -> Vec<AnnotationId> {
        self.annotations()
            .filter(|a| self.annotation_target(*a).resolved() == Some(&target))
            .collect()
    }

    /// Annotation of the element with the term (qualified name or
    /// alias) and qualifier.
    #[must_use]
    pub fn find_annotation(
        &self,
        target: AnnotationTarget,
        term: &str,
        qualifier: Option<&str>,
    ) -> Option<AnnotationId> {
        let term = self.qualify(None, term);
        self.annotations_for(target).into_iter().find(|a| {
            let node = self.annotation_node(*a);
            node.qualifier.as_deref() == qualifier && self.qualify(Some(node.schema), &node.term) == term
        })
    }

    /// Value of the annotation. Without an expression the annotation
    /// takes the default value of the term, or `true` for boolean
    /// terms without default.
    #[must_use]
    pub fn evaluate_annotation(&self, id: AnnotationId) -> Resolution<Value> {
        let node = self.annotation_node(id);
        if let Some(value) = node.value {
            return (*self.evaluate(value)).clone();
        }
        let term = match &*self.annotation_term(id) {
            Resolution::Resolved(t) => *t,
            Resolution::Unresolved(u) => return Resolution::Unresolved(u.clone()),
        };
        if let Some(default) = self.term_default_value(term).as_ref() {
            return default.clone();
        }
        let is_boolean = self
            .term_type(term)
            .resolved()
            .is_some_and(|t| t.primitive_kind() == Some(PrimitiveKind::Boolean));
        if is_boolean {
            Resolution::Resolved(Value::from(true))
        } else {
            Resolution::Resolved(Value::Null)
        }
    }

    /// Text of the unqualified `Core.Description` annotation.
    #[must_use]
    pub fn description(&self, target: AnnotationTarget) -> Option<String> {
        self.string_annotation(target, CORE_DESCRIPTION)
    }

    /// Text of the unqualified `Core.LongDescription` annotation.
    #[must_use]
    pub fn long_description(&self, target: AnnotationTarget) -> Option<String> {
        self.string_annotation(target, CORE_LONG_DESCRIPTION)
    }

    fn string_annotation(&self, target: AnnotationTarget, term: &str) -> Option<String> {
        let annotation = self.find_annotation(target, term, None)?;
        match self.evaluate_annotation(annotation) {
            Resolution::Resolved(v) => v.as_primitive()?.as_str().map(str::to_string),
            Resolution::Unresolved(_) => None,
        }
    }

    /// Resolve `Target` of edm:Annotations: `Ns.Type`, `Ns.Type/Property`,
    /// `Ns.Enum/Member`, `Ns.Op`, `Ns.Op(Ns.Binding)/param`,
    /// `Ns.Op/$ReturnType`, `Ns.Term`, `Ns.Container/Set` or `Ns`.
    fn resolve_target(&self, schema: SchemaId, raw: &str, location: &Location) -> Resolution<AnnotationTarget> {
        let fail = || {
            Resolution::unresolved(
                raw,
                EdmErrorCode::BadUnresolvedTarget,
                format!("annotation target {raw} not found"),
                location,
            )
        };
        let (head, rest) = match raw.split_once('/') {
            Some((h, r)) => (h, Some(r)),
            None => (raw, None),
        };
        let (head, signature) = match head.split_once('(') {
            Some((h, s)) => (h, Some(s.trim_end_matches(')'))),
            None => (head, None),
        };
        if let Some(t) = self.lookup_type(Some(schema), head) {
            let Some(path) = rest else {
                return Resolution::Resolved(AnnotationTarget::Type(t));
            };
            if self.is_structured(t) {
                return match self.resolve_path(t, path, location) {
                    Resolution::Resolved(ReferenceTarget::Property(p)) => {
                        Resolution::Resolved(AnnotationTarget::Property(p))
                    }
                    _ => fail(),
                };
            }
            return self
                .enum_members(t)
                .iter()
                .position(|m| m.name == path)
                .map_or_else(fail, |i| Resolution::Resolved(AnnotationTarget::EnumMember(t, i)));
        }
        let operations = self.lookup_operations(Some(schema), head);
        if !operations.is_empty() {
            let operation = match signature {
                None => operations.first().copied(),
                Some(signature) => {
                    let expected = signature
                        .split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(|s| self.qualify(Some(schema), s))
                        .collect::<Vec<_>>();
                    operations.iter().copied().find(|op| {
                        let node = self.operation_node(*op);
                        let declared = node
                            .parameters
                            .iter()
                            .map(|p| self.qualify(Some(node.schema), &p.ptype))
                            .collect::<Vec<_>>();
                        declared.starts_with(&expected)
                    })
                }
            };
            let Some(op) = operation else {
                return fail();
            };
            return match rest {
                None => Resolution::Resolved(AnnotationTarget::Operation(op)),
                Some("$ReturnType") if self.operation_node(op).return_type.is_some() => {
                    Resolution::Resolved(AnnotationTarget::ReturnType(op))
                }
                Some(name) => self
                    .operation_node(op)
                    .parameters
                    .iter()
                    .position(|p| p.name == name)
                    .map_or_else(fail, |i| Resolution::Resolved(AnnotationTarget::Parameter(op, i))),
            };
        }
        if let Some(t) = self.lookup_term(Some(schema), head) {
            return match rest {
                None => Resolution::Resolved(AnnotationTarget::Term(t)),
                Some(_) => fail(),
            };
        }
        if let Some(c) = self.lookup_container(Some(schema), head) {
            let Some(rest) = rest else {
                return Resolution::Resolved(AnnotationTarget::Container(c));
            };
            let (child, path) = match rest.split_once('/') {
                Some((c, p)) => (c, Some(p)),
                None => (rest, None),
            };
            if let Some(s) = self.find_source(c, child) {
                let Some(path) = path else {
                    return Resolution::Resolved(AnnotationTarget::Source(s));
                };
                let property = self
                    .source_entity_type(s)
                    .resolved()
                    .map(|t| self.resolve_path(*t, path, location));
                return match property {
                    Some(Resolution::Resolved(ReferenceTarget::Property(p))) => {
                        Resolution::Resolved(AnnotationTarget::Property(p))
                    }
                    _ => fail(),
                };
            }
            return match self.find_import(c, child) {
                Some(i) if path.is_none() => Resolution::Resolved(AnnotationTarget::Import(i)),
                _ => fail(),
            };
        }
        match (rest, self.find_schema(raw)) {
            (None, Some(s)) => Resolution::Resolved(AnnotationTarget::Schema(s)),
            _ => fail(),
        }
    }
}
