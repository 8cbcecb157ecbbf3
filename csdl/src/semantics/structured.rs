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

//! Entity types, complex types and their properties.

use crate::edmx::property::PropertyAttrs;
use crate::edmx::RawFacets;
use crate::semantics::EdmErrorCode;
use crate::semantics::Location;
use crate::semantics::Model;
use crate::semantics::PropertyId;
use crate::semantics::ReferenceTarget;
use crate::semantics::Resolution;
use crate::semantics::StructuredDecl;
use crate::semantics::TypeDecl;
use crate::semantics::TypeId;
use crate::semantics::Unresolved;
use log::debug;
use nv_odata_core::type_ref::TypeKind;
use nv_odata_core::TypeReference;
use std::collections::HashMap;
use std::collections::HashSet;
use std::iter::once;
use std::sync::Arc;

impl Model {
    pub(crate) fn structured(&self, id: TypeId) -> Option<&StructuredDecl> {
        match &self.type_node(id).decl {
            TypeDecl::Structured(s) => Some(s),
            TypeDecl::Enum(_) | TypeDecl::Definition(_) => None,
        }
    }

    #[must_use]
    pub fn is_structured(&self, id: TypeId) -> bool {
        self.structured(id).is_some()
    }

    #[must_use]
    pub fn is_abstract(&self, id: TypeId) -> bool {
        self.structured(id).is_some_and(|s| s.is_abstract)
    }

    #[must_use]
    pub fn is_open(&self, id: TypeId) -> bool {
        self.structured(id).is_some_and(|s| s.is_open)
    }

    #[must_use]
    pub fn has_stream(&self, id: TypeId) -> bool {
        self.structured(id).is_some_and(|s| s.has_stream)
    }

    /// Properties declared by the type itself.
    #[must_use]
    pub fn declared_properties(&self, id: TypeId) -> &[PropertyId] {
        self.structured(id)
            .map(|s| s.properties.as_slice())
            .unwrap_or_default()
    }

    /// Resolved base type. `None` if the type doesn't declare one.
    ///
    /// A base type that leads back to the type itself is reported as
    /// `BadCyclicType`; types that merely derive from a cyclic chain
    /// resolve normally.
    pub fn base_type(&self, id: TypeId) -> Arc<Option<Resolution<TypeId>>> {
        let Some(decl) = self.structured(id) else {
            return Arc::new(None);
        };
        decl.resolved_base
            .get_or_init(|| self.compute_base_type(id, decl))
    }

    fn compute_base_type(&self, id: TypeId, decl: &StructuredDecl) -> Option<Resolution<TypeId>> {
        let raw = decl.base_type.as_deref()?;
        let node = self.type_node(id);
        let Some(target) = self.lookup_type(Some(node.schema), raw) else {
            return Some(Resolution::unresolved(
                raw,
                EdmErrorCode::BadUnresolvedType,
                format!("base type {raw} not found"),
                &node.location,
            ));
        };
        if self.structured(target).map(|s| s.is_entity) != Some(decl.is_entity) {
            let expected = if decl.is_entity { "an entity" } else { "a complex" };
            return Some(Resolution::unresolved(
                raw,
                EdmErrorCode::BaseTypeKindMismatch,
                format!("base type {raw} is not {expected} type"),
                &node.location,
            ));
        }
        if self.declared_chain_reaches(target, id) {
            debug!("{}: inheritance cycle through {raw}", node.location);
            return Some(Resolution::unresolved(
                raw,
                EdmErrorCode::BadCyclicType,
                format!("type {} inherits from itself through {raw}", node.full_name),
                &node.location,
            ));
        }
        Some(Resolution::Resolved(target))
    }

    /// Whether following declared base type names from `start` reaches
    /// `id`. Works on names so it never enters memoized base types.
    fn declared_chain_reaches(&self, start: TypeId, id: TypeId) -> bool {
        let mut visited = HashSet::new();
        let mut current = Some(start);
        while let Some(t) = current {
            if t == id {
                return true;
            }
            if !visited.insert(t) {
                return false;
            }
            current = self
                .structured(t)
                .and_then(|s| s.base_type.as_deref())
                .and_then(|raw| self.lookup_type(Some(self.type_node(t).schema), raw));
        }
        false
    }

    /// Resolved ancestors from the direct base type up to the root.
    #[must_use]
    pub fn base_types(&self, id: TypeId) -> Vec<TypeId> {
        let mut result = Vec::new();
        let mut current = id;
        while let Some(Resolution::Resolved(base)) = self.base_type(current).as_ref() {
            if *base == id || result.contains(base) {
                break;
            }
            result.push(*base);
            current = *base;
        }
        result
    }

    /// Declared and inherited properties. Inherited properties come
    /// first, starting from the root of the hierarchy.
    pub fn all_properties(&self, id: TypeId) -> Arc<Vec<PropertyId>> {
        let Some(decl) = self.structured(id) else {
            return Arc::new(Vec::new());
        };
        decl.all_properties.get_or_init(|| {
            let mut chain = self.base_types(id);
            chain.reverse();
            chain.push(id);
            chain
                .into_iter()
                .flat_map(|t| self.declared_properties(t).iter().copied())
                .collect()
        })
    }

    /// Find declared or inherited property by name.
    #[must_use]
    pub fn find_property(&self, id: TypeId, name: &str) -> Option<PropertyId> {
        self.all_properties(id)
            .iter()
            .copied()
            .find(|p| self.property_node(*p).name == name)
    }

    /// Key properties. The key is declared by the type or inherited
    /// from the nearest ancestor that declares it. Empty for types
    /// without key.
    pub fn key(&self, id: TypeId) -> Arc<Vec<Resolution<PropertyId>>> {
        let Some(decl) = self.structured(id) else {
            return Arc::new(Vec::new());
        };
        decl.resolved_key.get_or_init(|| {
            let declared = once(id)
                .chain(self.base_types(id))
                .find_map(|t| self.structured(t)?.key.as_ref().map(|k| (t, k)));
            let Some((owner, refs)) = declared else {
                return Vec::new();
            };
            let location = &self.type_node(owner).location;
            refs.iter()
                .map(|r| self.resolve_property_reference(id, &r.name, location))
                .collect()
        })
    }

    /// Types that declare `id` as their direct base type.
    #[must_use]
    pub fn derived_types(&self, id: TypeId) -> Vec<TypeId> {
        let derived = self.derived.get_or_init(|| {
            let mut map = HashMap::<TypeId, Vec<TypeId>>::new();
            for t in self.types() {
                if let Some(Resolution::Resolved(base)) = self.base_type(t).as_ref() {
                    map.entry(*base).or_default().push(t);
                }
            }
            map
        });
        derived.get(&id).cloned().unwrap_or_default()
    }

    /// Resolve `/`-separated path starting at the structured type
    /// `start`. Segments are property names, qualified type casts,
    /// `@Term` annotation segments and `$`-prefixed instance segments.
    /// Paths are not checked past an annotation or `$` segment.
    pub(crate) fn resolve_path(
        &self,
        start: TypeId,
        path: &str,
        location: &Location,
    ) -> Resolution<ReferenceTarget> {
        let mut current = Some(start);
        let mut target = ReferenceTarget::Type(start);
        for segment in path.split('/') {
            let Some(ty) = current else {
                return Resolution::unresolved(
                    segment,
                    EdmErrorCode::BadUnresolvedProperty,
                    format!("{segment} of path {path} follows a segment without properties"),
                    location,
                );
            };
            let schema = self.type_node(ty).schema;
            if let Some(term) = segment.strip_prefix('@') {
                let term = term.split_once('#').map_or(term, |(t, _)| t);
                return match self.lookup_term(Some(schema), term) {
                    Some(t) => Resolution::Resolved(ReferenceTarget::Term(t)),
                    None => Resolution::unresolved(
                        term,
                        EdmErrorCode::BadUnresolvedTerm,
                        format!("term {term} not found"),
                        location,
                    ),
                };
            }
            if segment.starts_with('$') {
                return Resolution::Resolved(ReferenceTarget::Unbound);
            }
            if segment.contains('.') {
                match self
                    .lookup_type(Some(schema), segment)
                    .filter(|t| self.is_structured(*t))
                {
                    Some(t) => {
                        target = ReferenceTarget::Type(t);
                        current = Some(t);
                    }
                    None => {
                        return Resolution::unresolved(
                            segment,
                            EdmErrorCode::BadUnresolvedType,
                            format!("type {segment} not found"),
                            location,
                        )
                    }
                }
                continue;
            }
            match self.find_property(ty, segment) {
                Some(p) => {
                    target = ReferenceTarget::Property(p);
                    current = self.property_structured_type(p);
                }
                None => {
                    return Resolution::unresolved(
                        segment,
                        EdmErrorCode::BadUnresolvedProperty,
                        format!(
                            "property {segment} not found on type {}",
                            self.type_node(ty).full_name
                        ),
                        location,
                    )
                }
            }
        }
        Resolution::Resolved(target)
    }

    /// Resolve path that must end with a property.
    pub(crate) fn resolve_property_reference(
        &self,
        start: TypeId,
        path: &str,
        location: &Location,
    ) -> Resolution<PropertyId> {
        match self.resolve_path(start, path, location) {
            Resolution::Resolved(ReferenceTarget::Property(p)) => Resolution::Resolved(p),
            Resolution::Resolved(_) => Resolution::unresolved(
                path,
                EdmErrorCode::BadUnresolvedProperty,
                format!("path {path} does not refer to a property"),
                location,
            ),
            Resolution::Unresolved(u) => Resolution::Unresolved(u),
        }
    }

    #[must_use]
    pub fn property_name(&self, id: PropertyId) -> &str {
        &self.property_node(id).name
    }

    /// Type that declares the property.
    #[must_use]
    pub fn property_owner(&self, id: PropertyId) -> TypeId {
        self.property_node(id).owner
    }

    #[must_use]
    pub fn property_location(&self, id: PropertyId) -> &Location {
        &self.property_node(id).location
    }

    #[must_use]
    pub fn is_navigation(&self, id: PropertyId) -> bool {
        matches!(self.property_node(id).attrs, PropertyAttrs::Navigation(_))
    }

    #[must_use]
    pub fn contains_target(&self, id: PropertyId) -> bool {
        match &self.property_node(id).attrs {
            PropertyAttrs::Navigation(nav) => nav.contains_target,
            PropertyAttrs::Structural { .. } => false,
        }
    }

    /// Raw default value of the structural property.
    #[must_use]
    pub fn property_default_value(&self, id: PropertyId) -> Option<&str> {
        match &self.property_node(id).attrs {
            PropertyAttrs::Structural { default_value, .. } => default_value.as_deref(),
            PropertyAttrs::Navigation(_) => None,
        }
    }

    /// Resolved type of the property. Navigation properties must refer
    /// to an entity type or a collection of entity types.
    pub fn property_type(&self, id: PropertyId) -> Arc<Resolution<TypeReference>> {
        let node = self.property_node(id);
        node.resolved_type.get_or_init(|| {
            let schema = self.type_node(node.owner).schema;
            let default_facets = RawFacets::default();
            let (facets, is_navigation) = match &node.attrs {
                PropertyAttrs::Structural { facets, .. } => (facets, false),
                PropertyAttrs::Navigation(_) => (&default_facets, true),
            };
            let resolved =
                self.resolve_type_reference(Some(schema), &node.ptype, node.nullable, facets, &node.location);
            match resolved {
                Resolution::Resolved(t) if is_navigation => {
                    let element = t.element_type().unwrap_or(&t);
                    if element.kind() == TypeKind::Entity {
                        Resolution::Resolved(t)
                    } else {
                        Resolution::unresolved(
                            &node.ptype,
                            EdmErrorCode::BadUnresolvedType,
                            format!("navigation property type {} is not an entity type", node.ptype),
                            &node.location,
                        )
                    }
                }
                other => other,
            }
        })
    }

    /// Structured type of the property or of its collection elements.
    #[must_use]
    pub fn property_structured_type(&self, id: PropertyId) -> Option<TypeId> {
        let t = self.property_type(id);
        let t = t.resolved()?;
        let element = t.element_type().unwrap_or(t);
        matches!(element.kind(), TypeKind::Entity | TypeKind::Complex)
            .then(|| self.names.types.get(&element.full_name()).copied())
            .flatten()
    }

    /// Partner navigation property on the target entity type.
    pub fn partner(&self, id: PropertyId) -> Arc<Option<Resolution<PropertyId>>> {
        let node = self.property_node(id);
        node.partner.get_or_init(|| {
            let PropertyAttrs::Navigation(nav) = &node.attrs else {
                return None;
            };
            let partner = nav.partner.as_deref()?;
            let Some(target) = self.property_structured_type(id) else {
                return Some(Resolution::Unresolved(Unresolved::silent(partner, &node.location)));
            };
            Some(self.resolve_property_reference(target, partner, &node.location))
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::semantics::test_utils::model;
    use crate::semantics::EdmErrorCode;
    use crate::semantics::Resolution;
    use std::sync::Arc;

    const SALES: &str = r#"
        <EntityType Name="Entity" Abstract="true">
          <Key><PropertyRef Name="Id"/></Key>
          <Property Name="Id" Type="Edm.Int32" Nullable="false"/>
        </EntityType>
        <EntityType Name="Customer" BaseType="Sales.Entity">
          <Property Name="Name" Type="Edm.String"/>
          <Property Name="Address" Type="Sales.Address"/>
          <NavigationProperty Name="Orders" Type="Collection(Sales.Order)" Partner="Customer"/>
        </EntityType>
        <EntityType Name="Order" BaseType="Sales.Entity">
          <NavigationProperty Name="Customer" Type="Sales.Customer" Partner="Buyer"/>
          <NavigationProperty Name="Lines" Type="Collection(Sales.Address)"/>
        </EntityType>
        <ComplexType Name="Address">
          <Property Name="City" Type="Edm.String"/>
        </ComplexType>
        <ComplexType Name="Cycle1" BaseType="Sales.Cycle2"/>
        <ComplexType Name="Cycle2" BaseType="Sales.Cycle1"/>
        <ComplexType Name="OnCycle" BaseType="Sales.Cycle1"/>
        <ComplexType Name="Wrong" BaseType="Sales.Entity"/>
    "#;

    #[test]
    fn test_inheritance() {
        let model = model("Sales", None, SALES);
        let entity = model.find_type("Sales.Entity").unwrap();
        let customer = model.find_type("Sales.Customer").unwrap();
        assert_eq!(*model.base_type(customer), Some(Resolution::Resolved(entity)));
        assert_eq!(*model.base_type(entity), None);
        assert!(model.is_abstract(entity));
        let names = model
            .all_properties(customer)
            .iter()
            .map(|p| model.property_name(*p).to_string())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["Id", "Name", "Address", "Orders"]);
        let key = model.key(customer);
        assert_eq!(key.len(), 1);
        assert_eq!(model.property_name(*key[0].resolved().unwrap()), "Id");
        let order = model.find_type("Sales.Order").unwrap();
        assert_eq!(model.derived_types(entity), vec![customer, order]);
    }

    #[test]
    fn test_base_type_cycle() {
        let model = model("Sales", None, SALES);
        let cycle1 = model.find_type("Sales.Cycle1").unwrap();
        let cycle2 = model.find_type("Sales.Cycle2").unwrap();
        let on_cycle = model.find_type("Sales.OnCycle").unwrap();
        for t in [cycle1, cycle2] {
            let base = model.base_type(t);
            let base = base.as_ref().as_ref().unwrap();
            assert_eq!(base.errors()[0].code, EdmErrorCode::BadCyclicType);
        }
        assert_eq!(*model.base_type(on_cycle), Some(Resolution::Resolved(cycle1)));
        assert_eq!(model.base_types(on_cycle), vec![cycle1]);
        assert!(model.all_properties(on_cycle).is_empty());
    }

    #[test]
    fn test_base_type_kind_mismatch() {
        let model = model("Sales", None, SALES);
        let wrong = model.find_type("Sales.Wrong").unwrap();
        let base = model.base_type(wrong);
        assert_eq!(
            base.as_ref().as_ref().unwrap().errors()[0].code,
            EdmErrorCode::BaseTypeKindMismatch
        );
    }

    #[test]
    fn test_memoized_property_type() {
        let model = model("Sales", None, SALES);
        let customer = model.find_type("Sales.Customer").unwrap();
        let name = model.find_property(customer, "Name").unwrap();
        let first = model.property_type(name);
        let second = model.property_type(name);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.resolved().unwrap().full_name(), "Edm.String");
    }

    #[test]
    fn test_navigation() {
        let model = model("Sales", None, SALES);
        let customer = model.find_type("Sales.Customer").unwrap();
        let order = model.find_type("Sales.Order").unwrap();
        let orders = model.find_property(customer, "Orders").unwrap();
        let buyer = model.find_property(order, "Customer").unwrap();
        assert!(model.is_navigation(orders));
        assert_eq!(model.property_structured_type(orders), Some(order));
        assert_eq!(*model.partner(orders), Some(Resolution::Resolved(buyer)));
        let missing = model.partner(buyer);
        let missing = missing.as_ref().as_ref().unwrap();
        assert_eq!(missing.errors().len(), 1);
        assert_eq!(missing.errors()[0].code, EdmErrorCode::BadUnresolvedProperty);
        assert!(missing.errors()[0].message.contains("Buyer"));
        let lines = model.find_property(order, "Lines").unwrap();
        assert_eq!(
            model.property_type(lines).errors()[0].code,
            EdmErrorCode::BadUnresolvedType
        );
    }
}
