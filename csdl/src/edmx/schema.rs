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

use crate::edmx::annotation::DeAnnotations;
use crate::edmx::annotation::DeTerm;
use crate::edmx::entity_container::DeEntityContainer;
use crate::edmx::enum_type::DeEnumType;
use crate::edmx::expression::DeExpressionHost;
use crate::edmx::operation::DeOperation;
use crate::edmx::structured_type::DeStructuredType;
use crate::edmx::type_definition::DeTypeDefinition;
use crate::edmx::Annotation;
use crate::edmx::Annotations;
use crate::edmx::EntityContainer;
use crate::edmx::EnumType;
use crate::edmx::Operation;
use crate::edmx::SchemaNamespace;
use crate::edmx::StructuredType;
use crate::edmx::Term;
use crate::edmx::TypeDefinition;
use crate::edmx::ValidateError;
use serde::Deserialize;

/// 5.1 Element edm:Schema
#[derive(Debug, Deserialize)]
pub struct DeSchema {
    /// 5.1.1 Attribute `Namespace`
    #[serde(rename = "@Namespace")]
    pub namespace: String,
    /// 5.1.2 Attribute `Alias`
    #[serde(rename = "@Alias")]
    pub alias: Option<String>,
    #[serde(rename = "$value", default)]
    pub items: Vec<DeSchemaItem>,
}

#[derive(Debug, Deserialize)]
pub enum DeSchemaItem {
    EntityType(DeStructuredType),
    ComplexType(DeStructuredType),
    EnumType(DeEnumType),
    TypeDefinition(DeTypeDefinition),
    Action(DeOperation),
    Function(DeOperation),
    Term(DeTerm),
    EntityContainer(DeEntityContainer),
    Annotations(DeAnnotations),
    Annotation(Box<DeExpressionHost>),
}

/// Element of the schema in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaItem {
    EntityType(StructuredType),
    ComplexType(StructuredType),
    EnumType(EnumType),
    TypeDefinition(TypeDefinition),
    Action(Operation),
    Function(Operation),
    Term(Term),
    EntityContainer(EntityContainer),
}

/// Validated edm:Schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub namespace: SchemaNamespace,
    pub alias: Option<String>,
    /// Schema elements in declaration order. Functions and actions may
    /// be overloaded so elements are not keyed by name.
    pub items: Vec<SchemaItem>,
    /// Annotations of the schema itself.
    pub annotations: Vec<Annotation>,
    /// Out-of-line annotations (edm:Annotations).
    pub out_of_line: Vec<Annotations>,
}

impl DeSchema {
    /// # Errors
    ///
    /// Returns error if any of items failed to validate.
    pub fn validate(self) -> Result<Schema, ValidateError> {
        let namespace = self.namespace;
        let wrap = |e| ValidateError::Schema(namespace.clone(), Box::new(e));
        let (items, annotations, out_of_line) = self.items.into_iter().fold(
            (Vec::new(), Vec::new(), Vec::new()),
            |(mut items, mut anns, mut ool), v| {
                match v {
                    DeSchemaItem::EntityType(v) => {
                        items.push(v.validate_entity_type().map(SchemaItem::EntityType));
                    }
                    DeSchemaItem::ComplexType(v) => {
                        items.push(v.validate_complex_type().map(SchemaItem::ComplexType));
                    }
                    DeSchemaItem::EnumType(v) => {
                        items.push(v.validate().map(SchemaItem::EnumType));
                    }
                    DeSchemaItem::TypeDefinition(v) => {
                        items.push(v.validate().map(SchemaItem::TypeDefinition));
                    }
                    DeSchemaItem::Action(v) => items.push(v.validate().map(SchemaItem::Action)),
                    DeSchemaItem::Function(v) => {
                        items.push(v.validate().map(SchemaItem::Function));
                    }
                    DeSchemaItem::Term(v) => items.push(v.validate().map(SchemaItem::Term)),
                    DeSchemaItem::EntityContainer(v) => {
                        items.push(v.validate().map(SchemaItem::EntityContainer));
                    }
                    DeSchemaItem::Annotations(v) => ool.push(v.validate()),
                    DeSchemaItem::Annotation(v) => anns.push(v.validate_annotation()),
                }
                (items, anns, ool)
            },
        );
        let items = items
            .into_iter()
            .collect::<Result<Vec<_>, _>>()
            .map_err(wrap)?;
        let annotations = annotations
            .into_iter()
            .collect::<Result<Vec<_>, _>>()
            .map_err(wrap)?;
        let out_of_line = out_of_line
            .into_iter()
            .collect::<Result<Vec<_>, _>>()
            .map_err(wrap)?;
        Ok(Schema {
            namespace,
            alias: self.alias,
            items,
            annotations,
            out_of_line,
        })
    }
}
