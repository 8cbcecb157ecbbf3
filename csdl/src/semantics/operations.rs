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

//! Actions and functions.

use crate::semantics::EdmErrorCode;
use crate::semantics::EdmError;
use crate::semantics::Location;
use crate::semantics::Model;
use crate::semantics::OperationId;
use crate::semantics::Resolution;
use crate::semantics::SchemaId;
use nv_odata_core::TypeReference;
use std::collections::HashSet;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Action,
    Function,
}

/// Parameter with resolved type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationParameter {
    pub name: String,
    pub type_ref: Resolution<TypeReference>,
    pub location: Location,
}

/// Resolved parameters of an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterList {
    /// All parameters in declaration order, duplicates included.
    pub parameters: Vec<OperationParameter>,
    /// `DuplicateParameterName` diagnostics.
    pub errors: Vec<EdmError>,
}

/// `EntitySetPath` of a bound operation: the binding parameter name
/// followed by navigation segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySetPath {
    pub segments: Vec<String>,
}

impl Model {
    #[must_use]
    pub fn operation_name(&self, id: OperationId) -> &str {
        &self.operation_node(id).name
    }

    #[must_use]
    pub fn operation_full_name(&self, id: OperationId) -> &str {
        &self.operation_node(id).full_name
    }

    #[must_use]
    pub fn operation_schema(&self, id: OperationId) -> SchemaId {
        self.operation_node(id).schema
    }

    #[must_use]
    pub fn operation_kind(&self, id: OperationId) -> OperationKind {
        self.operation_node(id).kind
    }

    #[must_use]
    pub fn is_bound(&self, id: OperationId) -> bool {
        self.operation_node(id).is_bound
    }

    /// Only functions can be composable.
    #[must_use]
    pub fn is_composable(&self, id: OperationId) -> bool {
        let node = self.operation_node(id);
        node.kind == OperationKind::Function && node.is_composable
    }

    /// Parameters in declaration order with resolved types. Parameters
    /// that share a name are kept and reported as
    /// `DuplicateParameterName`.
    pub fn parameters(&self, id: OperationId) -> Arc<ParameterList> {
        let node = self.operation_node(id);
        node.resolved_parameters.get_or_init(|| {
            let mut seen = HashSet::new();
            let mut errors = Vec::new();
            let parameters = node
                .parameters
                .iter()
                .map(|p| {
                    if !seen.insert(p.name.as_str()) {
                        errors.push(EdmError::new(
                            EdmErrorCode::DuplicateParameterName,
                            format!("parameter {} is declared more than once", p.name),
                            &p.location,
                        ));
                    }
                    OperationParameter {
                        name: p.name.clone(),
                        type_ref: self.resolve_type_reference(
                            Some(node.schema),
                            &p.ptype,
                            p.nullable,
                            &p.facets,
                            &p.location,
                        ),
                        location: p.location.clone(),
                    }
                })
                .collect();
            ParameterList { parameters, errors }
        })
    }

    /// First parameter with the name.
    #[must_use]
    pub fn find_parameter(&self, id: OperationId, name: &str) -> Option<OperationParameter> {
        self.parameters(id)
            .parameters
            .iter()
            .find(|p| p.name == name)
            .cloned()
    }

    /// First parameter of a bound operation.
    #[must_use]
    pub fn binding_parameter(&self, id: OperationId) -> Option<OperationParameter> {
        if !self.is_bound(id) {
            return None;
        }
        self.parameters(id).parameters.first().cloned()
    }

    /// Resolved return type. `None` for actions without return type.
    pub fn return_type(&self, id: OperationId) -> Arc<Option<Resolution<TypeReference>>> {
        let node = self.operation_node(id);
        node.resolved_return.get_or_init(|| {
            node.return_type.as_ref().map(|r| {
                self.resolve_type_reference(Some(node.schema), &r.rtype, r.nullable, &r.facets, &r.location)
            })
        })
    }

    /// Entity set path as declared. `None` if the operation declares
    /// no path.
    pub fn entity_set_path(&self, id: OperationId) -> Arc<Option<Resolution<EntitySetPath>>> {
        let node = self.operation_node(id);
        node.resolved_path.get_or_init(|| {
            node.entity_set_path.as_deref().map(|path| {
                Resolution::Resolved(EntitySetPath {
                    segments: path.split('/').map(str::to_string).collect(),
                })
            })
        })
    }
}
