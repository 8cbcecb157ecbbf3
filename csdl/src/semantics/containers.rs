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

//! Entity containers, navigation sources and operation imports.

use crate::edmx::entity_container::NavigationSourceKind;
use crate::edmx::entity_container::OperationImportKind;
use crate::semantics::ContainerId;
use crate::semantics::EdmErrorCode;
use crate::semantics::ImportId;
use crate::semantics::Location;
use crate::semantics::Model;
use crate::semantics::OperationId;
use crate::semantics::OperationKind;
use crate::semantics::PropertyId;
use crate::semantics::Resolution;
use crate::semantics::SchemaTypeKind;
use crate::semantics::SourceId;
use crate::semantics::TypeId;
use crate::semantics::Unresolved;
use std::sync::Arc;

/// Resolved edm:NavigationPropertyBinding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationBinding {
    /// Path as written.
    pub path: String,
    pub property: Resolution<PropertyId>,
    pub target: Resolution<SourceId>,
}

impl Model {
    #[must_use]
    pub fn container_name(&self, id: ContainerId) -> &str {
        &self.container_node(id).name
    }

    #[must_use]
    pub fn container_full_name(&self, id: ContainerId) -> &str {
        &self.container_node(id).full_name
    }

    /// Entity sets and singletons in declaration order.
    #[must_use]
    pub fn container_sources(&self, id: ContainerId) -> &[SourceId] {
        &self.container_node(id).sources
    }

    /// Action and function imports in declaration order.
    #[must_use]
    pub fn container_imports(&self, id: ContainerId) -> &[ImportId] {
        &self.container_node(id).imports
    }

    /// Entity set or singleton by name.
    #[must_use]
    pub fn find_source(&self, container: ContainerId, name: &str) -> Option<SourceId> {
        self.container_sources(container)
            .iter()
            .copied()
            .find(|s| self.source_node(*s).name == name)
    }

    #[must_use]
    pub fn find_entity_set(&self, container: ContainerId, name: &str) -> Option<SourceId> {
        self.find_source(container, name)
            .filter(|s| self.source_kind(*s) == NavigationSourceKind::EntitySet)
    }

    #[must_use]
    pub fn find_singleton(&self, container: ContainerId, name: &str) -> Option<SourceId> {
        self.find_source(container, name)
            .filter(|s| self.source_kind(*s) == NavigationSourceKind::Singleton)
    }

    #[must_use]
    pub fn find_import(&self, container: ContainerId, name: &str) -> Option<ImportId> {
        self.container_imports(container)
            .iter()
            .copied()
            .find(|i| self.import_node(*i).name == name)
    }

    #[must_use]
    pub fn source_name(&self, id: SourceId) -> &str {
        &self.source_node(id).name
    }

    #[must_use]
    pub fn source_kind(&self, id: SourceId) -> NavigationSourceKind {
        self.source_node(id).kind
    }

    #[must_use]
    pub fn source_container(&self, id: SourceId) -> ContainerId {
        self.source_node(id).container
    }

    #[must_use]
    pub fn source_location(&self, id: SourceId) -> &Location {
        &self.source_node(id).location
    }

    /// Entity type of the entity set or singleton.
    pub fn source_entity_type(&self, id: SourceId) -> Arc<Resolution<TypeId>> {
        let node = self.source_node(id);
        node.resolved_type.get_or_init(|| {
            let schema = self.container_node(node.container).schema;
            match self.lookup_type(Some(schema), &node.entity_type) {
                Some(t) if self.type_kind(t) == SchemaTypeKind::EntityType => Resolution::Resolved(t),
                Some(_) => Resolution::unresolved(
                    &node.entity_type,
                    EdmErrorCode::BadUnresolvedType,
                    format!("{} is not an entity type", node.entity_type),
                    &node.location,
                ),
                None => Resolution::unresolved(
                    &node.entity_type,
                    EdmErrorCode::BadUnresolvedType,
                    format!("entity type {} not found", node.entity_type),
                    &node.location,
                ),
            }
        })
    }

    /// Navigation property bindings of the entity set or singleton.
    pub fn navigation_bindings(&self, id: SourceId) -> Arc<Vec<NavigationBinding>> {
        let node = self.source_node(id);
        node.resolved_bindings.get_or_init(|| {
            let entity_type = self.source_entity_type(id);
            node.bindings
                .iter()
                .map(|binding| {
                    let location = Location::new(format!("{}/{}", node.location, binding.path));
                    let property = match &*entity_type {
                        Resolution::Resolved(t) => self.resolve_property_reference(*t, &binding.path, &location),
                        Resolution::Unresolved(_) => {
                            Resolution::Unresolved(Unresolved::silent(&binding.path, &location))
                        }
                    };
                    NavigationBinding {
                        path: binding.path.clone(),
                        property,
                        target: self.resolve_binding_target(node.container, &binding.target, &location),
                    }
                })
                .collect()
        })
    }

    /// `Name` in the same container or `Ns.Container/Name`, optionally
    /// followed by a containment path that is not resolved.
    fn resolve_binding_target(
        &self,
        container: ContainerId,
        target: &str,
        location: &Location,
    ) -> Resolution<SourceId> {
        let schema = self.container_node(container).schema;
        let mut segments = target.split('/');
        let first = segments.next().unwrap_or_default();
        let source = match self.lookup_container(Some(schema), first) {
            Some(other) => segments.next().and_then(|name| self.find_source(other, name)),
            None => self.find_source(container, first),
        };
        match source {
            Some(s) => Resolution::Resolved(s),
            None => Resolution::unresolved(
                target,
                EdmErrorCode::BadUnresolvedEntitySet,
                format!("binding target {target} not found"),
                location,
            ),
        }
    }

    #[must_use]
    pub fn import_name(&self, id: ImportId) -> &str {
        &self.import_node(id).name
    }

    #[must_use]
    pub fn import_kind(&self, id: ImportId) -> OperationImportKind {
        self.import_node(id).kind
    }

    /// Imported overloads: the action for action imports, all unbound
    /// overloads for function imports.
    pub fn import_operations(&self, id: ImportId) -> Arc<Resolution<Vec<OperationId>>> {
        let node = self.import_node(id);
        node.resolved_operations.get_or_init(|| {
            let schema = self.container_node(node.container).schema;
            let (kind, what) = match node.kind {
                OperationImportKind::Action => (OperationKind::Action, "action"),
                OperationImportKind::Function => (OperationKind::Function, "function"),
            };
            let operations = self
                .lookup_operations(Some(schema), &node.operation)
                .iter()
                .copied()
                .filter(|op| self.operation_kind(*op) == kind && !self.is_bound(*op))
                .collect::<Vec<_>>();
            if operations.is_empty() {
                Resolution::unresolved(
                    &node.operation,
                    EdmErrorCode::BadUnresolvedOperation,
                    format!("unbound {what} {} not found", node.operation),
                    &node.location,
                )
            } else {
                Resolution::Resolved(operations)
            }
        })
    }

    /// Entity set of returned entities. `None` if not declared.
    pub fn import_entity_set(&self, id: ImportId) -> Arc<Option<Resolution<SourceId>>> {
        let node = self.import_node(id);
        node.resolved_entity_set.get_or_init(|| {
            node.entity_set
                .as_deref()
                .map(|name| self.resolve_binding_target(node.container, name, &node.location))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantics::test_utils::model;

    const BODY: &str = r#"
        <EntityType Name="Customer">
          <Key><PropertyRef Name="Id"/></Key>
          <Property Name="Id" Type="Edm.Int32" Nullable="false"/>
          <NavigationProperty Name="Orders" Type="Collection(Sales.Order)"/>
          <NavigationProperty Name="Best" Type="Sales.Order"/>
        </EntityType>
        <EntityType Name="Order">
          <Key><PropertyRef Name="Id"/></Key>
          <Property Name="Id" Type="Edm.Int32" Nullable="false"/>
        </EntityType>
        <ComplexType Name="Address"/>
        <Function Name="Recent"><ReturnType Type="Collection(Sales.Order)"/></Function>
        <Function Name="Recent" IsBound="true">
          <Parameter Name="customer" Type="Sales.Customer"/>
          <ReturnType Type="Collection(Sales.Order)"/>
        </Function>
        <EntityContainer Name="Default">
          <EntitySet Name="Customers" EntityType="Sales.Customer">
            <NavigationPropertyBinding Path="Orders" Target="Orders"/>
            <NavigationPropertyBinding Path="Best" Target="Sales.Default/Orders"/>
            <NavigationPropertyBinding Path="Missing" Target="Nowhere"/>
          </EntitySet>
          <EntitySet Name="Orders" EntityType="Sales.Order"/>
          <Singleton Name="Home" Type="Sales.Address"/>
          <FunctionImport Name="RecentOrders" Function="Sales.Recent" EntitySet="Orders"/>
          <ActionImport Name="Reset" Action="Sales.Recent"/>
        </EntityContainer>
    "#;

    #[test]
    fn test_sources() {
        let model = model("Sales", None, BODY);
        let container = model.find_entity_container("Sales.Default").unwrap();
        assert_eq!(model.container_sources(container).len(), 3);
        let customers = model.find_entity_set(container, "Customers").unwrap();
        let orders = model.find_entity_set(container, "Orders").unwrap();
        assert!(model.find_singleton(container, "Customers").is_none());
        assert_eq!(
            *model.source_entity_type(customers),
            Resolution::Resolved(model.find_type("Sales.Customer").unwrap())
        );
        let home = model.find_singleton(container, "Home").unwrap();
        assert_eq!(
            model.source_entity_type(home).errors()[0].code,
            EdmErrorCode::BadUnresolvedType
        );

        let bindings = model.navigation_bindings(customers);
        assert_eq!(bindings.len(), 3);
        assert_eq!(bindings[0].target, Resolution::Resolved(orders));
        assert_eq!(bindings[1].target, Resolution::Resolved(orders));
        assert!(bindings[1].property.resolved().is_some());
        assert_eq!(bindings[2].property.errors().len(), 1);
        assert_eq!(bindings[2].property.errors()[0].code, EdmErrorCode::BadUnresolvedProperty);
        assert_eq!(bindings[2].target.errors()[0].code, EdmErrorCode::BadUnresolvedEntitySet);
        assert!(Arc::ptr_eq(&bindings, &model.navigation_bindings(customers)));
    }

    #[test]
    fn test_imports() {
        let model = model("Sales", None, BODY);
        let container = model.find_entity_container("Sales.Default").unwrap();
        let recent = model.find_import(container, "RecentOrders").unwrap();
        assert_eq!(model.import_kind(recent), OperationImportKind::Function);
        let operations = model.import_operations(recent);
        assert_eq!(operations.resolved().map(Vec::len), Some(1));
        assert_eq!(
            *model.import_entity_set(recent),
            Some(Resolution::Resolved(model.find_entity_set(container, "Orders").unwrap()))
        );
        let reset = model.find_import(container, "Reset").unwrap();
        assert_eq!(
            model.import_operations(reset).errors()[0].code,
            EdmErrorCode::BadUnresolvedOperation
        );
    }
}
