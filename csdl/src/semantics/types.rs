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

//! Type references and facets.

use crate::edmx::attribute_values::TypeName;
use crate::edmx::RawFacets;
use crate::semantics::EdmErrorCode;
use crate::semantics::Location;
use crate::semantics::Model;
use crate::semantics::Resolution;
use crate::semantics::SchemaId;
use crate::semantics::SchemaTypeKind;
use crate::semantics::TypeDecl;
use crate::semantics::TypeId;
use crate::semantics::Unresolved;
use log::trace;
use nv_odata_core::primitive::EDM_NAMESPACE;
use nv_odata_core::type_ref::Error as TypeRefError;
use nv_odata_core::type_ref::Facets;
use nv_odata_core::type_ref::FullName;
use nv_odata_core::type_ref::IsNullable;
use nv_odata_core::type_ref::MaxLength;
use nv_odata_core::type_ref::Scale;
use nv_odata_core::type_ref::Srid;
use nv_odata_core::type_ref::StructuredTypeReference;
use nv_odata_core::PrimitiveKind;
use nv_odata_core::TypeReference;
use std::str::FromStr;
use std::sync::PoisonError;

/// Parse facet attributes.
///
/// # Errors
///
/// Description of the first malformed facet.
pub(crate) fn parse_facets(raw: &RawFacets) -> Result<Facets, String> {
    let max_length = raw
        .max_length
        .as_deref()
        .map(|v| match v {
            v if v.eq_ignore_ascii_case("max") => Ok(MaxLength::Max),
            v => v
                .parse()
                .map(MaxLength::Value)
                .map_err(|_| format!("invalid MaxLength: {v}")),
        })
        .transpose()?;
    let scale = raw
        .scale
        .as_deref()
        .map(|v| match v {
            // `floating` is the 4.01 spelling of `variable`.
            v if v.eq_ignore_ascii_case("variable") || v.eq_ignore_ascii_case("floating") => {
                Ok(Scale::Variable)
            }
            v => v
                .parse()
                .map(Scale::Value)
                .map_err(|_| format!("invalid Scale: {v}")),
        })
        .transpose()?;
    let srid = raw
        .srid
        .as_deref()
        .map(|v| match v {
            v if v.eq_ignore_ascii_case("variable") => Ok(Srid::Variable),
            v => v
                .parse()
                .map(Srid::Value)
                .map_err(|_| format!("invalid SRID: {v}")),
        })
        .transpose()?;
    Ok(Facets {
        max_length,
        precision: raw.precision,
        scale,
        srid,
        unicode: raw.unicode,
    })
}

impl Model {
    #[must_use]
    pub fn type_name(&self, id: TypeId) -> &str {
        &self.type_node(id).name
    }

    /// Namespace-qualified name.
    #[must_use]
    pub fn type_full_name(&self, id: TypeId) -> &str {
        &self.type_node(id).full_name
    }

    #[must_use]
    pub fn type_schema(&self, id: TypeId) -> SchemaId {
        self.type_node(id).schema
    }

    #[must_use]
    pub fn type_location(&self, id: TypeId) -> &Location {
        &self.type_node(id).location
    }

    #[must_use]
    pub fn type_kind(&self, id: TypeId) -> SchemaTypeKind {
        match &self.type_node(id).decl {
            TypeDecl::Structured(s) if s.is_entity => SchemaTypeKind::EntityType,
            TypeDecl::Structured(_) => SchemaTypeKind::ComplexType,
            TypeDecl::Enum(_) => SchemaTypeKind::EnumType,
            TypeDecl::Definition(_) => SchemaTypeKind::TypeDefinition,
        }
    }

    /// Nullable reference to the declared type. Unresolved only if the
    /// type is a type definition whose underlying type is unresolved;
    /// the diagnostic belongs to the type definition.
    #[must_use]
    pub fn type_reference(&self, id: TypeId) -> Resolution<TypeReference> {
        let node = self.type_node(id);
        match &node.decl {
            TypeDecl::Structured(s) => {
                let reference = StructuredTypeReference {
                    name: FullName::new(node.full_name.clone()),
                    nullable: IsNullable::new(true),
                    is_abstract: s.is_abstract,
                    is_open: s.is_open,
                };
                Resolution::Resolved(if s.is_entity {
                    TypeReference::Entity(reference)
                } else {
                    TypeReference::Complex(reference)
                })
            }
            TypeDecl::Enum(_) => Resolution::Resolved(TypeReference::enumeration(self.enum_definition(id))),
            TypeDecl::Definition(d) => match &*self.type_definition_underlying(id) {
                Resolution::Resolved(kind) => Resolution::Resolved(TypeReference::TypeDefinition {
                    name: FullName::new(node.full_name.clone()),
                    underlying: *kind,
                    nullable: IsNullable::new(true),
                    facets: parse_facets(&d.facets).unwrap_or_default(),
                }),
                Resolution::Unresolved(_) => {
                    Resolution::Unresolved(Unresolved::silent(&node.full_name, &node.location))
                }
            },
        }
    }

    /// Resolve type name (`Edm.String`, `Ns.Type`, `Collection(Alias.Type)`)
    /// outside of any schema. Only schema aliases are recognized.
    #[must_use]
    pub fn parse_type_reference(&self, raw: &str) -> Resolution<TypeReference> {
        let location = Location::new(raw.into());
        self.resolve_type_reference(None, raw, None, &RawFacets::default(), &location)
    }

    /// Resolve type name as declared by a property, parameter, return
    /// type or term. Nullability applies to the element of a
    /// collection; collections are never nullable.
    pub(crate) fn resolve_type_reference(
        &self,
        schema: Option<SchemaId>,
        raw: &str,
        nullable: Option<bool>,
        facets: &RawFacets,
        location: &Location,
    ) -> Resolution<TypeReference> {
        let type_name = match TypeName::from_str(raw) {
            Ok(v) => v,
            Err(err) => {
                trace!("{location}: {err}");
                return Resolution::unresolved(raw, EdmErrorCode::InvalidTypeName, err.to_string(), location);
            }
        };
        let parsed_facets = match parse_facets(facets) {
            Ok(v) => v,
            Err(message) => {
                return Resolution::unresolved(raw, EdmErrorCode::InvalidFacetValue, message, location);
            }
        };
        let element_name = type_name.qualified_name().to_string();
        let element = match self.resolve_named_type(schema, &element_name, location) {
            Resolution::Resolved(v) => v,
            Resolution::Unresolved(u) => return Resolution::Unresolved(u),
        };
        let element = element.with_nullable(nullable.unwrap_or(true));
        let element = if *facets == RawFacets::default() {
            element
        } else {
            element.with_facets(parsed_facets)
        };
        Resolution::Resolved(if type_name.is_collection() {
            TypeReference::collection(element)
        } else {
            element
        })
    }

    fn resolve_named_type(
        &self,
        schema: Option<SchemaId>,
        name: &str,
        location: &Location,
    ) -> Resolution<TypeReference> {
        let qualified = self.qualify(schema, name);
        if let Some(kind) = PrimitiveKind::from_qualified_name(&qualified) {
            return Resolution::Resolved(TypeReference::primitive(kind));
        }
        if qualified
            .rsplit_once('.')
            .is_some_and(|(ns, _)| ns == EDM_NAMESPACE)
        {
            trace!("{location}: unknown primitive type {name}");
            return Resolution::unresolved(
                name,
                EdmErrorCode::BadUnresolvedPrimitiveType,
                format!("unknown primitive type {name}"),
                location,
            );
        }
        match self.names.types.get(&qualified) {
            Some(id) => match self.type_reference(*id) {
                Resolution::Resolved(v) => Resolution::Resolved(v),
                Resolution::Unresolved(_) => Resolution::Unresolved(Unresolved::silent(name, location)),
            },
            None => {
                trace!("{location}: type {name} not found");
                Resolution::unresolved(
                    name,
                    EdmErrorCode::BadUnresolvedType,
                    format!("type {name} not found"),
                    location,
                )
            }
        }
    }

    /// Associate an external type name with a non-primitive type.
    ///
    /// # Errors
    ///
    /// Returns error if `type_ref` refers to a primitive type directly
    /// or through a type definition.
    pub fn set_type_affinity(
        &self,
        type_ref: &TypeReference,
        affinity: impl Into<String>,
    ) -> Result<(), TypeRefError> {
        self.affinities
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .set(type_ref, affinity)
    }

    #[must_use]
    pub fn type_affinity(&self, type_ref: &TypeReference) -> Option<String> {
        self.affinities
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(type_ref)
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantics::test_utils::model;
    use nv_odata_core::type_ref::TypeKind;

    const BODY: &str = r#"
        <ComplexType Name="Address"/>
        <TypeDefinition Name="Sku" UnderlyingType="Edm.String" MaxLength="16"/>
        <TypeDefinition Name="Broken" UnderlyingType="Edm.Text"/>
        <EnumType Name="Color"><Member Name="Red"/></EnumType>
    "#;

    #[test]
    fn test_collection_nullability() {
        let model = model("Sales", Some("S"), BODY);
        let location = Location::new("test".into());
        let r = model.resolve_type_reference(
            None,
            "Collection(S.Address)",
            Some(false),
            &RawFacets::default(),
            &location,
        );
        let r = r.resolved().unwrap();
        assert_eq!(r.kind(), TypeKind::Collection);
        assert!(!r.is_nullable());
        let element = r.element_type().unwrap();
        assert_eq!(element.kind(), TypeKind::Complex);
        assert!(!element.is_nullable());
        assert_eq!(element.full_name(), "Sales.Address");
    }

    #[test]
    fn test_unresolved_names() {
        let model = model("Sales", None, BODY);
        let r = model.parse_type_reference("Edm.Text");
        assert_eq!(r.errors()[0].code, EdmErrorCode::BadUnresolvedPrimitiveType);
        let r = model.parse_type_reference("Sales.Missing");
        assert_eq!(r.errors()[0].code, EdmErrorCode::BadUnresolvedType);
        let r = model.parse_type_reference("Collection(Sales.Address");
        assert_eq!(r.errors()[0].code, EdmErrorCode::InvalidTypeName);
        let r = model.parse_type_reference("Sales.Broken");
        assert!(r.is_unresolved());
        assert!(r.errors().is_empty());
    }

    #[test]
    fn test_type_definition_facets() {
        let model = model("Sales", None, BODY);
        let sku = model.parse_type_reference("Sales.Sku");
        let sku = sku.resolved().unwrap();
        assert_eq!(sku.primitive_kind(), Some(PrimitiveKind::String));
        assert_eq!(sku.facets().unwrap().max_length, Some(MaxLength::Value(16)));
        let color = model.parse_type_reference("Sales.Color");
        assert_eq!(color.resolved().unwrap().kind(), TypeKind::Enum);
    }

    #[test]
    fn test_facets() {
        let raw = RawFacets {
            max_length: Some("max".into()),
            precision: Some(10),
            scale: Some("variable".into()),
            srid: Some("4326".into()),
            unicode: Some(false),
        };
        let facets = parse_facets(&raw).unwrap();
        assert_eq!(facets.max_length, Some(MaxLength::Max));
        assert_eq!(facets.scale, Some(Scale::Variable));
        assert_eq!(facets.srid, Some(Srid::Value(4326)));
        let bad = RawFacets {
            max_length: Some("lots".into()),
            ..RawFacets::default()
        };
        assert_eq!(parse_facets(&bad).unwrap_err(), "invalid MaxLength: lots");
    }

    #[test]
    fn test_affinity() {
        let model = model("Sales", None, BODY);
        let address = model.parse_type_reference("Sales.Address");
        let address = address.resolved().unwrap();
        model.set_type_affinity(address, "crate::Address").unwrap();
        assert_eq!(model.type_affinity(address).as_deref(), Some("crate::Address"));
        let string = TypeReference::primitive(PrimitiveKind::String);
        assert!(model.set_type_affinity(&string, "String").is_err());
    }
}
