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

//! Construction of the model arena from validated documents.

use crate::edmx::annotation::Annotation;
use crate::edmx::entity_container::EntityContainer;
use crate::edmx::enum_type::EnumType;
use crate::edmx::expression::Expression;
use crate::edmx::operation::Operation;
use crate::edmx::structured_type::StructuredType;
use crate::edmx::type_definition::TypeDefinition;
use crate::edmx::Edmx;
use crate::edmx::Schema;
use crate::edmx::SchemaItem;
use crate::edmx::Term;
use crate::semantics::memo::Memo;
use crate::semantics::names::NameIndex;
use crate::semantics::AnnotationId;
use crate::semantics::AnnotationNode;
use crate::semantics::AnnotationTarget;
use crate::semantics::ContainerId;
use crate::semantics::ContainerNode;
use crate::semantics::DefinitionDecl;
use crate::semantics::EnumDecl;
use crate::semantics::EnumMemberDecl;
use crate::semantics::ExpressionData;
use crate::semantics::ExpressionId;
use crate::semantics::ExpressionNode;
use crate::semantics::ImportId;
use crate::semantics::ImportNode;
use crate::semantics::Location;
use crate::semantics::Model;
use crate::semantics::OperationId;
use crate::semantics::OperationKind;
use crate::semantics::OperationNode;
use crate::semantics::ParameterDecl;
use crate::semantics::PropertyId;
use crate::semantics::PropertyNode;
use crate::semantics::ReturnDecl;
use crate::semantics::SchemaId;
use crate::semantics::SchemaNode;
use crate::semantics::SourceId;
use crate::semantics::SourceNode;
use crate::semantics::StructuredDecl;
use crate::semantics::TargetDecl;
use crate::semantics::TermId;
use crate::semantics::TermNode;
use crate::semantics::TypeDecl;
use crate::semantics::TypeId;
use crate::semantics::TypeNode;
use log::debug;
use nv_odata_core::type_ref::TypeAffinities;
use nv_odata_core::UriLiteralParsers;
use std::collections::HashMap;
use std::sync::RwLock;

fn child(location: &Location, segment: &str) -> Location {
    Location::new(format!("{location}/{segment}"))
}

impl Model {
    /// Build model of the documents with the built-in literal parser
    /// chain.
    #[must_use]
    pub fn new(documents: Vec<Edmx>) -> Self {
        Self::with_parsers(documents, UriLiteralParsers::new())
    }

    /// Build model that parses constant expressions with `parsers`.
    #[must_use]
    pub fn with_parsers(documents: Vec<Edmx>, parsers: UriLiteralParsers) -> Self {
        let mut model = Self {
            schemas: Vec::new(),
            types: Vec::new(),
            properties: Vec::new(),
            operations: Vec::new(),
            terms: Vec::new(),
            containers: Vec::new(),
            sources: Vec::new(),
            imports: Vec::new(),
            annotations: Vec::new(),
            expressions: Vec::new(),
            names: NameIndex::default(),
            parsers,
            affinities: RwLock::new(TypeAffinities::new()),
            derived: Memo::new(),
        };
        for document in documents {
            model.add_document(document);
        }
        debug!(
            "model: {} schemas, {} types, {} operations, {} annotations",
            model.schemas.len(),
            model.types.len(),
            model.operations.len(),
            model.annotations.len()
        );
        model
    }

    fn add_document(&mut self, document: Edmx) {
        let mut aliases = document
            .include_aliases()
            .map(|(alias, ns)| (alias.to_string(), ns.to_string()))
            .collect::<HashMap<_, _>>();
        for schema in &document.schemas {
            if let Some(alias) = &schema.alias {
                aliases.insert(alias.clone(), schema.namespace.clone());
                self.names
                    .aliases
                    .entry(alias.clone())
                    .or_insert_with(|| schema.namespace.clone());
            }
        }
        for schema in document.schemas {
            self.add_schema(schema, aliases.clone());
        }
    }

    fn add_schema(&mut self, schema: Schema, aliases: HashMap<String, String>) {
        let id = SchemaId::new(self.schemas.len());
        self.schemas.push(SchemaNode {
            namespace: schema.namespace.clone(),
            alias: schema.alias,
            aliases,
            types: Vec::new(),
            operations: Vec::new(),
            terms: Vec::new(),
            containers: Vec::new(),
            annotations: Vec::new(),
        });
        let ns = schema.namespace;
        for item in schema.items {
            match item {
                SchemaItem::EntityType(t) => self.add_structured(id, &ns, t, true),
                SchemaItem::ComplexType(t) => self.add_structured(id, &ns, t, false),
                SchemaItem::EnumType(t) => self.add_enum(id, &ns, t),
                SchemaItem::TypeDefinition(t) => self.add_type_definition(id, &ns, t),
                SchemaItem::Action(op) => self.add_operation(id, &ns, op, OperationKind::Action),
                SchemaItem::Function(op) => self.add_operation(id, &ns, op, OperationKind::Function),
                SchemaItem::Term(t) => self.add_term(id, &ns, t),
                SchemaItem::EntityContainer(c) => self.add_container(id, &ns, c),
            }
        }
        let location = Location::new(ns);
        let annotations = self.add_annotations(id, AnnotationTarget::Schema(id), &location, schema.annotations);
        self.schemas[*id.inner()].annotations = annotations;
        for block in schema.out_of_line {
            let location = Location::new(block.target.clone());
            for annotation in block.annotations {
                let target = TargetDecl::External(block.target.clone());
                self.add_annotation(id, target, &location, annotation);
            }
        }
    }

    fn push_type(&mut self, schema: SchemaId, node: TypeNode) {
        let id = TypeId::new(self.types.len());
        self.names.types.entry(node.full_name.clone()).or_insert(id);
        self.schemas[*schema.inner()].types.push(id);
        self.types.push(node);
    }

    fn add_structured(&mut self, schema: SchemaId, ns: &str, t: StructuredType, is_entity: bool) {
        let id = TypeId::new(self.types.len());
        let full_name = format!("{ns}.{}", t.name);
        let location = Location::new(full_name.clone());
        let properties = t
            .properties
            .into_iter()
            .map(|p| {
                let pid = PropertyId::new(self.properties.len());
                let location = child(&location, p.name.inner());
                let annotations =
                    self.add_annotations(schema, AnnotationTarget::Property(pid), &location, p.annotations);
                self.properties.push(PropertyNode {
                    owner: id,
                    name: p.name.inner().clone(),
                    location,
                    ptype: p.ptype,
                    nullable: p.nullable,
                    attrs: p.attrs,
                    annotations,
                    resolved_type: Memo::new(),
                    partner: Memo::new(),
                });
                pid
            })
            .collect();
        let annotations = self.add_annotations(schema, AnnotationTarget::Type(id), &location, t.annotations);
        let decl = StructuredDecl {
            is_entity,
            base_type: t.base_type,
            is_abstract: t.is_abstract,
            is_open: t.is_open,
            has_stream: t.has_stream,
            key: t.key.map(|k| k.property_refs),
            properties,
            resolved_base: Memo::new(),
            all_properties: Memo::new(),
            resolved_key: Memo::new(),
        };
        self.push_type(
            schema,
            TypeNode {
                schema,
                name: t.name.inner().clone(),
                full_name,
                location,
                annotations,
                decl: TypeDecl::Structured(decl),
            },
        );
    }

    fn add_enum(&mut self, schema: SchemaId, ns: &str, t: EnumType) {
        let id = TypeId::new(self.types.len());
        let full_name = format!("{ns}.{}", t.name);
        let location = Location::new(full_name.clone());
        let members = t
            .members
            .into_iter()
            .enumerate()
            .map(|(i, m)| {
                let location = child(&location, m.name.inner());
                let target = AnnotationTarget::EnumMember(id, i);
                EnumMemberDecl {
                    annotations: self.add_annotations(schema, target, &location, m.annotations),
                    name: m.name.inner().clone(),
                    value: m.value,
                }
            })
            .collect();
        let annotations = self.add_annotations(schema, AnnotationTarget::Type(id), &location, t.annotations);
        let decl = EnumDecl {
            underlying_type: t.underlying_type,
            is_flags: t.is_flags,
            members,
            underlying: Memo::new(),
            resolved_members: Memo::new(),
            definition: Memo::new(),
        };
        self.push_type(
            schema,
            TypeNode {
                schema,
                name: t.name.inner().clone(),
                full_name,
                location,
                annotations,
                decl: TypeDecl::Enum(decl),
            },
        );
    }

    fn add_type_definition(&mut self, schema: SchemaId, ns: &str, t: TypeDefinition) {
        let id = TypeId::new(self.types.len());
        let full_name = format!("{ns}.{}", t.name);
        let location = Location::new(full_name.clone());
        let annotations = self.add_annotations(schema, AnnotationTarget::Type(id), &location, t.annotations);
        let decl = DefinitionDecl {
            underlying_type: t.underlying_type,
            facets: t.facets,
            underlying: Memo::new(),
        };
        self.push_type(
            schema,
            TypeNode {
                schema,
                name: t.name.inner().clone(),
                full_name,
                location,
                annotations,
                decl: TypeDecl::Definition(decl),
            },
        );
    }

    fn add_operation(&mut self, schema: SchemaId, ns: &str, op: Operation, kind: OperationKind) {
        let id = OperationId::new(self.operations.len());
        let full_name = format!("{ns}.{}", op.name);
        let location = Location::new(full_name.clone());
        let parameters = op
            .parameters
            .into_iter()
            .enumerate()
            .map(|(i, p)| {
                let location = child(&location, p.name.inner());
                let target = AnnotationTarget::Parameter(id, i);
                ParameterDecl {
                    annotations: self.add_annotations(schema, target, &location, p.annotations),
                    name: p.name.inner().clone(),
                    ptype: p.ptype,
                    nullable: p.nullable,
                    facets: p.facets,
                    location,
                }
            })
            .collect();
        let return_type = op.return_type.map(|r| {
            let location = child(&location, "$ReturnType");
            let target = AnnotationTarget::ReturnType(id);
            ReturnDecl {
                annotations: self.add_annotations(schema, target, &location, r.annotations),
                rtype: r.rtype,
                nullable: r.nullable,
                facets: r.facets,
                location,
            }
        });
        let annotations = self.add_annotations(schema, AnnotationTarget::Operation(id), &location, op.annotations);
        self.names.operations.entry(full_name.clone()).or_default().push(id);
        self.schemas[*schema.inner()].operations.push(id);
        self.operations.push(OperationNode {
            schema,
            name: op.name.inner().clone(),
            full_name,
            kind,
            location,
            is_bound: op.is_bound,
            is_composable: op.is_composable,
            entity_set_path: op.entity_set_path,
            parameters,
            return_type,
            annotations,
            resolved_parameters: Memo::new(),
            resolved_return: Memo::new(),
            resolved_path: Memo::new(),
        });
    }

    fn add_term(&mut self, schema: SchemaId, ns: &str, t: Term) {
        let id = TermId::new(self.terms.len());
        let full_name = format!("{ns}.{}", t.name);
        let location = Location::new(full_name.clone());
        let annotations = self.add_annotations(schema, AnnotationTarget::Term(id), &location, t.annotations);
        self.names.terms.entry(full_name.clone()).or_insert(id);
        self.schemas[*schema.inner()].terms.push(id);
        self.terms.push(TermNode {
            schema,
            name: t.name.inner().clone(),
            full_name,
            location,
            ttype: t.ttype,
            base_term: t.base_term,
            default_value: t.default_value,
            applies_to: t.applies_to,
            nullable: t.nullable,
            facets: t.facets,
            annotations,
            resolved_type: Memo::new(),
            resolved_base: Memo::new(),
            default: Memo::new(),
        });
    }

    fn add_container(&mut self, schema: SchemaId, ns: &str, c: EntityContainer) {
        let id = ContainerId::new(self.containers.len());
        let full_name = format!("{ns}.{}", c.name);
        let location = Location::new(full_name.clone());
        let sources = c
            .sources
            .into_iter()
            .map(|s| {
                let sid = SourceId::new(self.sources.len());
                let location = child(&location, s.name.inner());
                let annotations =
                    self.add_annotations(schema, AnnotationTarget::Source(sid), &location, s.annotations);
                self.sources.push(SourceNode {
                    container: id,
                    name: s.name.inner().clone(),
                    kind: s.kind,
                    location,
                    entity_type: s.entity_type,
                    bindings: s.bindings,
                    annotations,
                    resolved_type: Memo::new(),
                    resolved_bindings: Memo::new(),
                });
                sid
            })
            .collect();
        let imports = c
            .imports
            .into_iter()
            .map(|i| {
                let iid = ImportId::new(self.imports.len());
                let location = child(&location, i.name.inner());
                let annotations =
                    self.add_annotations(schema, AnnotationTarget::Import(iid), &location, i.annotations);
                self.imports.push(ImportNode {
                    container: id,
                    name: i.name.inner().clone(),
                    kind: i.kind,
                    location,
                    operation: i.operation,
                    entity_set: i.entity_set,
                    annotations,
                    resolved_operations: Memo::new(),
                    resolved_entity_set: Memo::new(),
                });
                iid
            })
            .collect();
        let annotations = self.add_annotations(schema, AnnotationTarget::Container(id), &location, c.annotations);
        self.names.containers.entry(full_name.clone()).or_insert(id);
        self.schemas[*schema.inner()].containers.push(id);
        self.containers.push(ContainerNode {
            schema,
            name: c.name.inner().clone(),
            full_name,
            location,
            sources,
            imports,
            annotations,
        });
    }

    fn add_annotations(
        &mut self,
        schema: SchemaId,
        target: AnnotationTarget,
        location: &Location,
        annotations: Vec<Annotation>,
    ) -> Vec<AnnotationId> {
        annotations
            .into_iter()
            .map(|a| self.add_annotation(schema, TargetDecl::Inline(target), location, a))
            .collect()
    }

    /// Annotations of annotations and of record members are not part of
    /// the model: they annotate the expression, not a model element.
    fn add_annotation(
        &mut self,
        schema: SchemaId,
        target: TargetDecl,
        target_location: &Location,
        annotation: Annotation,
    ) -> AnnotationId {
        let id = AnnotationId::new(self.annotations.len());
        let mut name = format!("{target_location}@{}", annotation.term);
        if let Some(q) = &annotation.qualifier {
            name.push('#');
            name.push_str(q);
        }
        let location = Location::new(name);
        self.annotations.push(AnnotationNode {
            schema,
            term: annotation.term,
            qualifier: annotation.qualifier,
            location: location.clone(),
            target,
            value: None,
            resolved_term: Memo::new(),
            resolved_target: Memo::new(),
            binding: Memo::new(),
        });
        let value = annotation
            .value
            .map(|e| self.add_expression(schema, id, location, e));
        self.annotations[*id.inner()].value = value;
        id
    }

    fn add_expression(
        &mut self,
        schema: SchemaId,
        annotation: AnnotationId,
        location: Location,
        expression: Expression,
    ) -> ExpressionId {
        let data = match expression {
            Expression::Constant(kind, text) => ExpressionData::Constant(kind, text),
            Expression::Null => ExpressionData::Null,
            Expression::Path(kind, path) => ExpressionData::Path(kind, path),
            Expression::Collection(items) => ExpressionData::Collection(
                items
                    .into_iter()
                    .enumerate()
                    .map(|(i, e)| self.add_expression(schema, annotation, child(&location, &i.to_string()), e))
                    .collect(),
            ),
            Expression::Record(record) => ExpressionData::Record {
                rtype: record.rtype,
                properties: record
                    .properties
                    .into_iter()
                    .map(|p| {
                        let location = child(&location, &p.property);
                        let value = self.add_expression(schema, annotation, location, p.value);
                        (p.property, value)
                    })
                    .collect(),
            },
            Expression::LabeledElement(element) => {
                let element = *element;
                let location = child(&location, &element.name);
                ExpressionData::LabeledElement {
                    value: self.add_expression(schema, annotation, location, element.value),
                    name: element.name,
                }
            }
            Expression::LabeledElementReference(name) => ExpressionData::LabeledElementReference(name),
            Expression::Apply(apply) => ExpressionData::Apply {
                arguments: apply
                    .arguments
                    .into_iter()
                    .enumerate()
                    .map(|(i, e)| self.add_expression(schema, annotation, child(&location, &i.to_string()), e))
                    .collect(),
                function: apply.function,
            },
            Expression::If(e) => {
                let e = *e;
                ExpressionData::If {
                    condition: self.add_expression(schema, annotation, child(&location, "$If"), e.condition),
                    then: self.add_expression(schema, annotation, child(&location, "$Then"), e.then),
                    otherwise: self.add_expression(schema, annotation, child(&location, "$Else"), e.otherwise),
                }
            }
        };
        let id = ExpressionId::new(self.expressions.len());
        if let ExpressionData::LabeledElement { name, .. } = &data {
            self.names
                .labels
                .entry((schema, name.clone()))
                .or_default()
                .push(id);
        }
        self.expressions.push(ExpressionNode {
            annotation,
            location,
            data,
            reference: Memo::new(),
            dereferenced: Memo::new(),
            value: Memo::new(),
        });
        id
    }
}
