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

//! Annotation expressions: references and constant evaluation.

use crate::edmx::expression::ConstantKind;
use crate::edmx::expression::PathKind;
use crate::semantics::AnnotationId;
use crate::semantics::EdmError;
use crate::semantics::EdmErrorCode;
use crate::semantics::ExpressionData;
use crate::semantics::ExpressionId;
use crate::semantics::ExpressionNode;
use crate::semantics::Location;
use crate::semantics::Model;
use crate::semantics::OperationId;
use crate::semantics::OperationKind;
use crate::semantics::PropertyId;
use crate::semantics::Resolution;
use crate::semantics::SchemaId;
use crate::semantics::SchemaTypeKind;
use crate::semantics::TermId;
use crate::semantics::TypeId;
use crate::semantics::Unresolved;
use log::debug;
use nv_odata_core::literal::text::quote;
use nv_odata_core::value::EnumValue;
use nv_odata_core::value::PropertyValue;
use nv_odata_core::value::StructuredValue;
use nv_odata_core::ParseOutcome;
use nv_odata_core::PrimitiveKind;
use nv_odata_core::PrimitiveValue;
use nv_odata_core::TypeReference;
use nv_odata_core::Value;
use std::sync::Arc;

/// Namespace of canonical functions usable in edm:Apply.
const CANONICAL_FUNCTION_PREFIX: &str = "odata.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpressionKind {
    Constant(ConstantKind),
    Null,
    Path(PathKind),
    Collection,
    Record,
    LabeledElement,
    LabeledElementReference,
    Apply,
    If,
}

/// Model element an expression refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceTarget {
    Property(PropertyId),
    /// Type cast segment of a path or declared type of a record.
    Type(TypeId),
    Term(TermId),
    LabeledElement(ExpressionId),
    /// Overloads of the function applied by edm:Apply.
    Operations(Vec<OperationId>),
    /// Canonical function (`odata.concat`).
    CanonicalFunction(String),
    /// Reference that depends on the annotated instance and cannot be
    /// checked: a path without binding context or `$`-segments.
    Unbound,
}

impl Model {
    fn expression_schema(&self, node: &ExpressionNode) -> SchemaId {
        self.annotation_node(node.annotation).schema
    }

    #[must_use]
    pub fn expression_kind(&self, id: ExpressionId) -> ExpressionKind {
        match &self.expression_node(id).data {
            ExpressionData::Constant(kind, _) => ExpressionKind::Constant(*kind),
            ExpressionData::Null => ExpressionKind::Null,
            ExpressionData::Path(kind, _) => ExpressionKind::Path(*kind),
            ExpressionData::Collection(_) => ExpressionKind::Collection,
            ExpressionData::Record { .. } => ExpressionKind::Record,
            ExpressionData::LabeledElement { .. } => ExpressionKind::LabeledElement,
            ExpressionData::LabeledElementReference(_) => ExpressionKind::LabeledElementReference,
            ExpressionData::Apply { .. } => ExpressionKind::Apply,
            ExpressionData::If { .. } => ExpressionKind::If,
        }
    }

    #[must_use]
    pub fn expression_location(&self, id: ExpressionId) -> &Location {
        &self.expression_node(id).location
    }

    /// Annotation that contains the expression.
    #[must_use]
    pub fn expression_annotation(&self, id: ExpressionId) -> AnnotationId {
        self.expression_node(id).annotation
    }

    /// Text of constants and paths, name of labeled elements, labeled
    /// element references and applied functions, declared type of
    /// records.
    #[must_use]
    pub fn expression_text(&self, id: ExpressionId) -> Option<&str> {
        match &self.expression_node(id).data {
            ExpressionData::Constant(_, text) | ExpressionData::Path(_, text) => Some(text),
            ExpressionData::LabeledElement { name, .. } => Some(name),
            ExpressionData::LabeledElementReference(name) => Some(name),
            ExpressionData::Apply { function, .. } => Some(function),
            ExpressionData::Record { rtype, .. } => rtype.as_deref(),
            ExpressionData::Null | ExpressionData::Collection(_) | ExpressionData::If { .. } => None,
        }
    }

    /// Nested expressions in declaration order.
    #[must_use]
    pub fn expression_children(&self, id: ExpressionId) -> Vec<ExpressionId> {
        match &self.expression_node(id).data {
            ExpressionData::Collection(items) => items.clone(),
            ExpressionData::Record { properties, .. } => properties.iter().map(|(_, v)| *v).collect(),
            ExpressionData::LabeledElement { value, .. } => vec![*value],
            ExpressionData::Apply { arguments, .. } => arguments.clone(),
            ExpressionData::If {
                condition,
                then,
                otherwise,
            } => vec![*condition, *then, *otherwise],
            ExpressionData::Constant(..)
            | ExpressionData::Null
            | ExpressionData::Path(..)
            | ExpressionData::LabeledElementReference(_) => Vec::new(),
        }
    }

    /// Property values of the record expression.
    #[must_use]
    pub fn record_properties(&self, id: ExpressionId) -> Vec<(&str, ExpressionId)> {
        match &self.expression_node(id).data {
            ExpressionData::Record { properties, .. } => {
                properties.iter().map(|(n, v)| (n.as_str(), *v)).collect()
            }
            _ => Vec::new(),
        }
    }

    /// Element referenced by a path, labeled element reference, apply
    /// or typed record. `None` for expressions that don't refer to
    /// anything. Failures carry the location of the expression.
    pub fn expression_reference(&self, id: ExpressionId) -> Arc<Option<Resolution<ReferenceTarget>>> {
        let node = self.expression_node(id);
        node.reference.get_or_init(|| match &node.data {
            ExpressionData::Path(_, path) => Some(
                match self.annotation_binding_context(node.annotation) {
                    Some(binding) => self.resolve_path(binding, path, &node.location),
                    None => Resolution::Resolved(ReferenceTarget::Unbound),
                },
            ),
            ExpressionData::LabeledElementReference(name) => Some(self.resolve_labeled_element(node, name)),
            ExpressionData::Apply { function, .. } => Some(self.resolve_function(node, function)),
            ExpressionData::Record { rtype: Some(rtype), .. } => {
                let schema = self.expression_schema(node);
                Some(
                    match self
                        .lookup_type(Some(schema), rtype)
                        .filter(|t| self.is_structured(*t))
                    {
                        Some(t) => Resolution::Resolved(ReferenceTarget::Type(t)),
                        None => Resolution::unresolved(
                            rtype,
                            EdmErrorCode::BadUnresolvedType,
                            format!("record type {rtype} not found"),
                            &node.location,
                        ),
                    },
                )
            }
            _ => None,
        })
    }

    /// Labeled element by name. Qualified names are looked up in the
    /// named schema. Unqualified names are looked up in the schema of
    /// the reference; elements under annotations with the same binding
    /// context take precedence.
    fn resolve_labeled_element(&self, node: &ExpressionNode, name: &str) -> Resolution<ReferenceTarget> {
        let schema = self.expression_schema(node);
        let candidates = if name.contains('.') {
            let qualified = self.qualify(Some(schema), name);
            let (namespace, local) = qualified.rsplit_once('.').unwrap_or(("", name));
            self.schemas()
                .filter(|s| self.schema(*s).namespace == namespace)
                .flat_map(|s| {
                    self.names
                        .labels
                        .get(&(s, local.to_string()))
                        .cloned()
                        .unwrap_or_default()
                })
                .collect::<Vec<_>>()
        } else {
            let all = self
                .names
                .labels
                .get(&(schema, name.to_string()))
                .cloned()
                .unwrap_or_default();
            let binding = self.annotation_binding_context(node.annotation);
            let scoped = all
                .iter()
                .copied()
                .filter(|e| self.annotation_binding_context(self.expression_node(*e).annotation) == binding)
                .collect::<Vec<_>>();
            if scoped.is_empty() {
                all
            } else {
                scoped
            }
        };
        match candidates.as_slice() {
            [] => Resolution::unresolved(
                name,
                EdmErrorCode::BadUnresolvedLabeledElement,
                format!("labeled element {name} not found"),
                &node.location,
            ),
            [single] => Resolution::Resolved(ReferenceTarget::LabeledElement(*single)),
            _ => Resolution::unresolved(
                name,
                EdmErrorCode::AmbiguousLabeledElement,
                format!("labeled element name {name} is ambiguous"),
                &node.location,
            ),
        }
    }

    fn resolve_function(&self, node: &ExpressionNode, function: &str) -> Resolution<ReferenceTarget> {
        if function.starts_with(CANONICAL_FUNCTION_PREFIX) {
            return Resolution::Resolved(ReferenceTarget::CanonicalFunction(function.into()));
        }
        let functions = self
            .lookup_operations(Some(self.expression_schema(node)), function)
            .iter()
            .copied()
            .filter(|op| self.operation_kind(*op) == OperationKind::Function)
            .collect::<Vec<_>>();
        if functions.is_empty() {
            Resolution::unresolved(
                function,
                EdmErrorCode::BadUnresolvedOperation,
                format!("function {function} not found"),
                &node.location,
            )
        } else {
            Resolution::Resolved(ReferenceTarget::Operations(functions))
        }
    }

    /// Follow labeled elements and labeled element references to the
    /// expression that provides the value. Other expressions
    /// dereference to themselves.
    pub fn dereference(&self, id: ExpressionId) -> Arc<Resolution<ExpressionId>> {
        let node = self.expression_node(id);
        node.dereferenced.get_or_init(|| {
            let mut visited = vec![id];
            let mut current = id;
            loop {
                let next = match &self.expression_node(current).data {
                    ExpressionData::LabeledElement { value, .. } => *value,
                    ExpressionData::LabeledElementReference(name) => {
                        match self.expression_reference(current).as_ref() {
                            Some(Resolution::Resolved(ReferenceTarget::LabeledElement(target))) => *target,
                            _ => return Resolution::Unresolved(Unresolved::silent(name, &node.location)),
                        }
                    }
                    _ => return Resolution::Resolved(current),
                };
                if visited.contains(&next) {
                    let name = self.expression_text(id).unwrap_or_default();
                    debug!("{}: labeled element cycle", node.location);
                    return Resolution::unresolved(
                        name,
                        EdmErrorCode::BadCyclicLabeledElement,
                        format!("labeled element {name} refers to itself"),
                        &node.location,
                    );
                }
                visited.push(next);
                current = next;
            }
        })
    }

    /// Parse text of a constant, default value or literal as a value of
    /// `type_ref` with the model's literal parser chain.
    pub(crate) fn value_from_text(
        &self,
        text: &str,
        type_ref: &TypeReference,
        location: &Location,
    ) -> Resolution<Value> {
        let literal = match (type_ref.primitive_kind(), type_ref.enum_definition()) {
            (Some(PrimitiveKind::String), _) => return Resolution::Resolved(Value::from(text)),
            (Some(PrimitiveKind::Binary), _) => format!("binary'{text}'"),
            (_, Some(_)) if text.parse::<i64>().is_err() && !text.contains('\'') => quote(text),
            _ => text.to_string(),
        };
        match self.parsers.parse(&literal, type_ref) {
            ParseOutcome::Value(v) => Resolution::Resolved(v),
            ParseOutcome::NotApplicable => Resolution::unresolved(
                text,
                EdmErrorCode::InvalidConstant,
                format!("{text} is not a valid {} value", type_ref.full_name()),
                location,
            ),
            ParseOutcome::Error(err) => {
                Resolution::unresolved(text, EdmErrorCode::InvalidConstant, err.to_string(), location)
            }
        }
    }

    fn constant_value(
        &self,
        schema: SchemaId,
        kind: ConstantKind,
        text: &str,
        location: &Location,
    ) -> Resolution<Value> {
        let primitive = match kind {
            ConstantKind::EnumMember => return self.enum_member_value(schema, text, location),
            ConstantKind::Binary => PrimitiveKind::Binary,
            ConstantKind::Bool => PrimitiveKind::Boolean,
            ConstantKind::Date => PrimitiveKind::Date,
            ConstantKind::DateTimeOffset => PrimitiveKind::DateTimeOffset,
            ConstantKind::Decimal => PrimitiveKind::Decimal,
            ConstantKind::Duration => PrimitiveKind::Duration,
            ConstantKind::Float => PrimitiveKind::Double,
            ConstantKind::Guid => PrimitiveKind::Guid,
            ConstantKind::Int => PrimitiveKind::Int64,
            ConstantKind::String => PrimitiveKind::String,
            ConstantKind::TimeOfDay => PrimitiveKind::TimeOfDay,
        };
        let type_ref = TypeReference::primitive(primitive).with_nullable(false);
        self.value_from_text(text, &type_ref, location)
    }

    /// `Ns.Type/Member` or, for flags, space separated list of them.
    fn enum_member_value(&self, schema: SchemaId, text: &str, location: &Location) -> Resolution<Value> {
        let invalid = |message: String| {
            Resolution::unresolved(text, EdmErrorCode::InvalidConstant, message, location)
        };
        let mut enum_type: Option<TypeId> = None;
        let mut value = 0;
        let mut member_names = Vec::new();
        for path in text.split_whitespace() {
            let Some((type_name, member)) = path.rsplit_once('/') else {
                return invalid(format!("{path} is not a Type/Member path"));
            };
            let Some(t) = self
                .lookup_type(Some(schema), type_name)
                .filter(|t| self.type_kind(*t) == SchemaTypeKind::EnumType)
            else {
                return Resolution::unresolved(
                    type_name,
                    EdmErrorCode::BadUnresolvedType,
                    format!("enum type {type_name} not found"),
                    location,
                );
            };
            if enum_type.is_some_and(|prev| prev != t) {
                return invalid(format!("{text} mixes members of different enum types"));
            }
            enum_type = Some(t);
            let Some(m) = self.find_enum_member(t, member) else {
                return Resolution::unresolved(
                    member,
                    EdmErrorCode::BadUnresolvedEnumMember,
                    format!("member {member} not found in {}", self.type_full_name(t)),
                    location,
                );
            };
            let Resolution::Resolved(v) = m.value else {
                return Resolution::Unresolved(Unresolved::silent(member, location));
            };
            value |= v;
            member_names.push(member.to_string());
        }
        let Some(t) = enum_type else {
            return invalid("enum member constant is empty".into());
        };
        if member_names.len() > 1 && !self.is_flags(t) {
            return invalid(format!("{} is not a flags enum", self.type_full_name(t)));
        }
        Resolution::Resolved(Value::Enum(EnumValue {
            type_name: self.type_full_name(t).to_string(),
            value,
            member_names,
        }))
    }

    /// Value of a constant expression. Paths and functions other than
    /// `odata.concat` depend on the instance and evaluate to
    /// `NotConstant`. Cyclic labeled element references evaluate to
    /// `BadCyclicLabeledElement`.
    pub fn evaluate(&self, id: ExpressionId) -> Arc<Resolution<Value>> {
        let node = self.expression_node(id);
        node.value.get_or_init_guarded(
            || self.compute_value(id, node),
            || {
                Resolution::unresolved(
                    node.location.inner(),
                    EdmErrorCode::BadCyclicLabeledElement,
                    "expression value depends on itself",
                    &node.location,
                )
            },
        )
    }

    fn evaluate_all(&self, items: &[ExpressionId], location: &Location) -> Resolution<Vec<Value>> {
        let mut values = Vec::with_capacity(items.len());
        let mut errors = Vec::new();
        let mut resolved = true;
        for item in items {
            match &*self.evaluate(*item) {
                Resolution::Resolved(v) => values.push(v.clone()),
                Resolution::Unresolved(u) => {
                    resolved = false;
                    errors.extend(u.errors.iter().cloned());
                }
            }
        }
        if resolved {
            Resolution::Resolved(values)
        } else {
            Resolution::Unresolved(Unresolved {
                name: location.inner().clone(),
                location: location.clone(),
                errors,
            })
        }
    }

    fn compute_value(&self, id: ExpressionId, node: &ExpressionNode) -> Resolution<Value> {
        let not_constant = |message: &str| {
            Resolution::unresolved(
                node.location.inner(),
                EdmErrorCode::NotConstant,
                message,
                &node.location,
            )
        };
        match &node.data {
            ExpressionData::Constant(kind, text) => {
                self.constant_value(self.expression_schema(node), *kind, text, &node.location)
            }
            ExpressionData::Null => Resolution::Resolved(Value::Null),
            ExpressionData::Path(..) => not_constant("path value depends on the annotated instance"),
            ExpressionData::Collection(items) => self.evaluate_all(items, &node.location).map(Value::Collection),
            ExpressionData::Record { rtype, properties } => {
                let ids = properties.iter().map(|(_, v)| *v).collect::<Vec<_>>();
                let type_name = rtype
                    .as_deref()
                    .map(|t| self.qualify(Some(self.expression_schema(node)), t));
                self.evaluate_all(&ids, &node.location).map(|values| {
                    Value::Structured(StructuredValue {
                        type_name,
                        properties: properties
                            .iter()
                            .zip(values)
                            .map(|((name, _), value)| PropertyValue {
                                name: name.clone(),
                                value,
                            })
                            .collect(),
                    })
                })
            }
            ExpressionData::LabeledElement { value, .. } => (*self.evaluate(*value)).clone(),
            ExpressionData::LabeledElementReference(_) => match self.expression_reference(id).as_ref() {
                Some(Resolution::Unresolved(u)) => Resolution::Unresolved(u.clone()),
                _ => match &*self.dereference(id) {
                    Resolution::Resolved(target) => (*self.evaluate(*target)).clone(),
                    Resolution::Unresolved(u) => Resolution::Unresolved(u.clone()),
                },
            },
            ExpressionData::Apply { function, arguments } => {
                if function != "odata.concat" {
                    return not_constant("function value depends on the annotated instance");
                }
                match self.evaluate_all(arguments, &node.location) {
                    Resolution::Resolved(values) => values
                        .iter()
                        .map(|v| v.as_primitive().and_then(PrimitiveValue::as_str))
                        .collect::<Option<String>>()
                        .map_or_else(
                            || not_constant("odata.concat of non-string values"),
                            |s| Resolution::Resolved(Value::from(s)),
                        ),
                    Resolution::Unresolved(u) => Resolution::Unresolved(u),
                }
            }
            ExpressionData::If {
                condition,
                then,
                otherwise,
            } => match &*self.evaluate(*condition) {
                Resolution::Resolved(Value::Primitive(PrimitiveValue::Boolean(true))) => {
                    (*self.evaluate(*then)).clone()
                }
                Resolution::Resolved(Value::Primitive(PrimitiveValue::Boolean(false))) => {
                    (*self.evaluate(*otherwise)).clone()
                }
                Resolution::Resolved(_) => not_constant("condition is not a boolean value"),
                Resolution::Unresolved(u) => Resolution::Unresolved(u.clone()),
            },
        }
    }

    /// Diagnostics of the expression and its nested expressions:
    /// malformed constants and unresolved or cyclic references.
    /// Evaluation-only failures (`NotConstant`) are not included.
    #[must_use]
    pub fn expression_errors(&self, id: ExpressionId) -> Vec<EdmError> {
        let node = self.expression_node(id);
        let mut errors = Vec::new();
        match &node.data {
            ExpressionData::Constant(..) => errors.extend(self.evaluate(id).errors().iter().cloned()),
            ExpressionData::LabeledElementReference(_) => {
                let reference = self.expression_reference(id);
                match reference.as_ref() {
                    Some(Resolution::Unresolved(u)) => errors.extend(u.errors.iter().cloned()),
                    _ => errors.extend(self.dereference(id).errors().iter().cloned()),
                }
            }
            ExpressionData::Path(..) | ExpressionData::Apply { .. } | ExpressionData::Record { .. } => {
                if let Some(r) = self.expression_reference(id).as_ref() {
                    errors.extend(r.errors().iter().cloned());
                }
            }
            ExpressionData::Null
            | ExpressionData::Collection(_)
            | ExpressionData::LabeledElement { .. }
            | ExpressionData::If { .. } => {}
        }
        for child in self.expression_children(id) {
            errors.extend(self.expression_errors(child));
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantics::test_utils::model;
    use crate::semantics::AnnotationTarget;

    const BODY: &str = r#"
        <EnumType Name="Color" IsFlags="true">
          <Member Name="Red" Value="1"/>
          <Member Name="Blue" Value="4"/>
        </EnumType>
        <EnumType Name="Size"><Member Name="Small"/><Member Name="Large"/></EnumType>
        <ComplexType Name="Box"><Property Name="Label" Type="Edm.String"/></ComplexType>
        <Term Name="Any" Type="Edm.String"/>
        <Annotations Target="S.Box">
          <Annotation Term="S.Any" Qualifier="Int" Int="42"/>
          <Annotation Term="S.Any" Qualifier="Flags" EnumMember="S.Color/Red S.Color/Blue"/>
          <Annotation Term="S.Any" Qualifier="NotFlags" EnumMember="Sales.Size/Small Sales.Size/Large"/>
          <Annotation Term="S.Any" Qualifier="Concat">
            <Apply Function="odata.concat"><String>a</String><String>b</String></Apply>
          </Annotation>
          <Annotation Term="S.Any" Qualifier="If">
            <If><Bool>false</Bool><String>yes</String><String>no</String></If>
          </Annotation>
          <Annotation Term="S.Any" Qualifier="Record">
            <Record Type="S.Box"><PropertyValue Property="Label" String="x"/></Record>
          </Annotation>
          <Annotation Term="S.Any" Qualifier="Path" Path="Label"/>
          <Annotation Term="S.Any" Qualifier="Label">
            <LabeledElement Name="Answer" Int="42"/>
          </Annotation>
          <Annotation Term="S.Any" Qualifier="Ref">
            <LabeledElementReference>Answer</LabeledElementReference>
          </Annotation>
          <Annotation Term="S.Any" Qualifier="Dup1"><LabeledElement Name="Dup" Int="1"/></Annotation>
          <Annotation Term="S.Any" Qualifier="Dup2"><LabeledElement Name="Dup" Int="2"/></Annotation>
          <Annotation Term="S.Any" Qualifier="Ambiguous">
            <LabeledElementReference>Dup</LabeledElementReference>
          </Annotation>
          <Annotation Term="S.Any" Qualifier="Missing">
            <LabeledElementReference>Nope</LabeledElementReference>
          </Annotation>
        </Annotations>
        <Annotations Target="S.Size">
          <Annotation Term="S.Any" Qualifier="Cycle">
            <Collection>
              <LabeledElement Name="A"><LabeledElementReference>Sales.B</LabeledElementReference></LabeledElement>
              <LabeledElement Name="B"><LabeledElementReference>Sales.A</LabeledElementReference></LabeledElement>
            </Collection>
          </Annotation>
        </Annotations>
    "#;

    fn value_of(model: &Model, target: &str, qualifier: &str) -> ExpressionId {
        let t = model.find_type(target).unwrap();
        let annotation = model
            .find_annotation(AnnotationTarget::Type(t), "Sales.Any", Some(qualifier))
            .unwrap();
        model.annotation_value(annotation).unwrap()
    }

    #[test]
    fn test_constants() {
        let model = model("Sales", Some("S"), BODY);
        let int = value_of(&model, "Sales.Box", "Int");
        assert_eq!(*model.evaluate(int), Resolution::Resolved(Value::from(42_i64)));
        assert!(Arc::ptr_eq(&model.evaluate(int), &model.evaluate(int)));

        let flags = value_of(&model, "Sales.Box", "Flags");
        let Resolution::Resolved(Value::Enum(value)) = &*model.evaluate(flags) else {
            panic!("enum value expected");
        };
        assert_eq!(value.type_name, "Sales.Color");
        assert_eq!(value.value, 5);
        assert_eq!(value.member_names, ["Red", "Blue"]);

        let not_flags = value_of(&model, "Sales.Box", "NotFlags");
        let errors = model.expression_errors(not_flags);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, EdmErrorCode::InvalidConstant);
    }

    #[test]
    fn test_composite_values() {
        let model = model("Sales", Some("S"), BODY);
        let concat = value_of(&model, "Sales.Box", "Concat");
        assert_eq!(*model.evaluate(concat), Resolution::Resolved(Value::from("ab")));
        let cond = value_of(&model, "Sales.Box", "If");
        assert_eq!(*model.evaluate(cond), Resolution::Resolved(Value::from("no")));

        let record = value_of(&model, "Sales.Box", "Record");
        let Resolution::Resolved(Value::Structured(value)) = &*model.evaluate(record) else {
            panic!("structured value expected");
        };
        assert_eq!(value.type_name.as_deref(), Some("Sales.Box"));
        assert_eq!(value.properties[0].name, "Label");
        assert_eq!(value.properties[0].value, Value::from("x"));
        let boxed = model.find_type("Sales.Box").unwrap();
        assert_eq!(
            *model.expression_reference(record),
            Some(Resolution::Resolved(ReferenceTarget::Type(boxed)))
        );

        let path = value_of(&model, "Sales.Box", "Path");
        assert_eq!(model.evaluate(path).errors()[0].code, EdmErrorCode::NotConstant);
        assert!(model.expression_errors(path).is_empty());
    }

    #[test]
    fn test_labeled_elements() {
        let model = model("Sales", Some("S"), BODY);
        let reference = value_of(&model, "Sales.Box", "Ref");
        let label = value_of(&model, "Sales.Box", "Label");
        assert_eq!(
            *model.expression_reference(reference),
            Some(Resolution::Resolved(ReferenceTarget::LabeledElement(label)))
        );
        assert_eq!(*model.evaluate(reference), Resolution::Resolved(Value::from(42_i64)));
        assert_eq!(
            *model.dereference(reference),
            Resolution::Resolved(model.expression_children(label)[0])
        );

        let ambiguous = value_of(&model, "Sales.Box", "Ambiguous");
        assert_eq!(
            model.expression_errors(ambiguous)[0].code,
            EdmErrorCode::AmbiguousLabeledElement
        );
        let missing = value_of(&model, "Sales.Box", "Missing");
        let errors = model.expression_errors(missing);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, EdmErrorCode::BadUnresolvedLabeledElement);
    }

    #[test]
    fn test_labeled_element_cycle() {
        let model = model("Sales", Some("S"), BODY);
        let cycle = value_of(&model, "Sales.Size", "Cycle");
        let errors = model.expression_errors(cycle);
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| e.code == EdmErrorCode::BadCyclicLabeledElement));
        assert!(model.evaluate(cycle).is_unresolved());
    }
}
