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

//! Enum types and type definitions.

use crate::semantics::EdmErrorCode;
use crate::semantics::EnumDecl;
use crate::semantics::Location;
use crate::semantics::Model;
use crate::semantics::Resolution;
use crate::semantics::TypeDecl;
use crate::semantics::TypeId;
use log::trace;
use nv_odata_core::type_ref::EnumDefinition;
use nv_odata_core::type_ref::EnumMemberDefinition;
use nv_odata_core::type_ref::FullName;
use nv_odata_core::PrimitiveKind;
use std::sync::Arc;

/// Member of the enum type with its assigned value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumMember {
    pub name: String,
    /// Assigned value. Unresolved if the declared value is not an
    /// integer or the value doesn't fit the underlying type.
    pub value: Resolution<i64>,
    /// Whether the value is declared in the schema or assigned
    /// implicitly (previous value plus one).
    pub is_explicit: bool,
    pub location: Location,
}

impl Model {
    fn enum_decl(&self, id: TypeId) -> Option<&EnumDecl> {
        match &self.type_node(id).decl {
            TypeDecl::Enum(e) => Some(e),
            TypeDecl::Structured(_) | TypeDecl::Definition(_) => None,
        }
    }

    #[must_use]
    pub fn is_flags(&self, id: TypeId) -> bool {
        self.enum_decl(id).is_some_and(|e| e.is_flags)
    }

    /// Underlying integral type of the enum. `Edm.Int32` if not
    /// declared.
    pub fn enum_underlying_type(&self, id: TypeId) -> Arc<Resolution<PrimitiveKind>> {
        let node = self.type_node(id);
        let Some(decl) = self.enum_decl(id) else {
            return Arc::new(Resolution::unresolved(
                &node.full_name,
                EdmErrorCode::BadUnresolvedType,
                format!("{} is not an enum type", node.full_name),
                &node.location,
            ));
        };
        decl.underlying.get_or_init(|| match decl.underlying_type.as_deref() {
            None => Resolution::Resolved(PrimitiveKind::Int32),
            Some(raw) => match PrimitiveKind::from_qualified_name(raw).filter(|k| k.is_integral()) {
                Some(kind) => Resolution::Resolved(kind),
                None => {
                    trace!("{}: bad underlying type {raw}", node.location);
                    Resolution::unresolved(
                        raw,
                        EdmErrorCode::BadUnresolvedPrimitiveType,
                        format!("{raw} is not an integral primitive type"),
                        &node.location,
                    )
                }
            },
        })
    }

    /// Members with assigned values in declaration order.
    ///
    /// A member without a value gets the value of the previous member
    /// plus one (zero for the first member). A value that doesn't fit
    /// the underlying type produces an error-bearing member and leaves
    /// the running value unchanged, so the following members are still
    /// assigned.
    pub fn enum_members(&self, id: TypeId) -> Arc<Vec<EnumMember>> {
        let Some(decl) = self.enum_decl(id) else {
            return Arc::new(Vec::new());
        };
        decl.resolved_members.get_or_init(|| {
            let underlying = *self
                .enum_underlying_type(id)
                .resolved()
                .unwrap_or(&PrimitiveKind::Int32);
            let (min, max) = underlying
                .integral_range()
                .unwrap_or((i64::from(i32::MIN), i64::from(i32::MAX)));
            let type_location = &self.type_node(id).location;
            let mut previous: i64 = -1;
            decl.members
                .iter()
                .map(|m| {
                    let location = Location::new(format!("{type_location}/{}", m.name));
                    let out_of_range = |v: String| {
                        Resolution::unresolved(
                            &m.name,
                            EdmErrorCode::EnumMemberValueOutOfRange,
                            format!("value {v} of member {} is out of range of {underlying}", m.name),
                            &location,
                        )
                    };
                    let value = match m.value.as_deref() {
                        Some(text) => match text.trim().parse::<i64>() {
                            Ok(v) if (min..=max).contains(&v) => {
                                previous = v;
                                Resolution::Resolved(v)
                            }
                            Ok(v) => out_of_range(v.to_string()),
                            Err(_) => Resolution::unresolved(
                                &m.name,
                                EdmErrorCode::InvalidEnumMemberValue,
                                format!("value {text} of member {} is not an integer", m.name),
                                &location,
                            ),
                        },
                        None => match previous.checked_add(1).filter(|v| *v <= max && *v >= min) {
                            Some(v) => {
                                previous = v;
                                Resolution::Resolved(v)
                            }
                            None => out_of_range(format!("{previous} + 1")),
                        },
                    };
                    EnumMember {
                        name: m.name.clone(),
                        value,
                        is_explicit: m.value.is_some(),
                        location,
                    }
                })
                .collect()
        })
    }

    /// Definition used to parse and format literals of the enum.
    /// Members with unresolved values are left out.
    pub fn enum_definition(&self, id: TypeId) -> Arc<EnumDefinition> {
        let node = self.type_node(id);
        let build = || EnumDefinition {
            name: FullName::new(node.full_name.clone()),
            underlying: *self
                .enum_underlying_type(id)
                .resolved()
                .unwrap_or(&PrimitiveKind::Int32),
            is_flags: self.is_flags(id),
            members: self
                .enum_members(id)
                .iter()
                .filter_map(|m| {
                    m.value.resolved().map(|v| EnumMemberDefinition {
                        name: m.name.clone(),
                        value: *v,
                    })
                })
                .collect(),
        };
        match self.enum_decl(id) {
            Some(decl) => decl.definition.get_or_init(build),
            None => Arc::new(build()),
        }
    }

    /// Find enum member by name.
    #[must_use]
    pub fn find_enum_member(&self, id: TypeId, name: &str) -> Option<EnumMember> {
        self.enum_members(id).iter().find(|m| m.name == name).cloned()
    }

    /// Underlying primitive type of the type definition.
    pub fn type_definition_underlying(&self, id: TypeId) -> Arc<Resolution<PrimitiveKind>> {
        let node = self.type_node(id);
        let TypeDecl::Definition(decl) = &node.decl else {
            return Arc::new(Resolution::unresolved(
                &node.full_name,
                EdmErrorCode::BadUnresolvedType,
                format!("{} is not a type definition", node.full_name),
                &node.location,
            ));
        };
        decl.underlying.get_or_init(|| {
            let raw = &decl.underlying_type;
            match PrimitiveKind::from_qualified_name(&self.qualify(Some(node.schema), raw)) {
                Some(kind) => Resolution::Resolved(kind),
                None => Resolution::unresolved(
                    raw,
                    EdmErrorCode::BadUnresolvedPrimitiveType,
                    format!("underlying type {raw} is not a primitive type"),
                    &node.location,
                ),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantics::test_utils::model;

    fn values(model: &Model, name: &str) -> Vec<Option<i64>> {
        let id = model.find_type(name).unwrap();
        model
            .enum_members(id)
            .iter()
            .map(|m| m.value.resolved().copied())
            .collect()
    }

    #[test]
    fn test_implicit_values() {
        let model = model(
            "Ns",
            None,
            r#"<EnumType Name="Letters">
                 <Member Name="A"/>
                 <Member Name="B" Value="10"/>
                 <Member Name="C"/>
                 <Member Name="D" Value="20"/>
                 <Member Name="E"/>
               </EnumType>"#,
        );
        assert_eq!(
            values(&model, "Ns.Letters"),
            vec![Some(0), Some(10), Some(11), Some(20), Some(21)]
        );
        let id = model.find_type("Ns.Letters").unwrap();
        let explicit = model
            .enum_members(id)
            .iter()
            .map(|m| m.is_explicit)
            .collect::<Vec<_>>();
        assert_eq!(explicit, vec![false, true, false, true, false]);
        assert_eq!(
            *model.enum_underlying_type(id),
            Resolution::Resolved(PrimitiveKind::Int32)
        );
        let definition = model.enum_definition(id);
        assert_eq!(definition.find_member("C").map(|m| m.value), Some(11));
    }

    #[test]
    fn test_overflow() {
        let model = model(
            "Ns",
            None,
            r#"<EnumType Name="Big" UnderlyingType="Edm.Int64">
                 <Member Name="Max" Value="9223372036854775807"/>
                 <Member Name="Next"/>
               </EnumType>
               <EnumType Name="Small" UnderlyingType="Edm.Byte">
                 <Member Name="A" Value="255"/>
                 <Member Name="B"/>
                 <Member Name="C" Value="300"/>
                 <Member Name="D" Value="1"/>
                 <Member Name="E"/>
               </EnumType>"#,
        );
        assert_eq!(values(&model, "Ns.Big"), vec![Some(i64::MAX), None]);
        let big = model.find_type("Ns.Big").unwrap();
        let next = &model.enum_members(big)[1];
        assert_eq!(next.value.errors().len(), 1);
        assert_eq!(
            next.value.errors()[0].code,
            EdmErrorCode::EnumMemberValueOutOfRange
        );
        assert_eq!(
            values(&model, "Ns.Small"),
            vec![Some(255), None, None, Some(1), Some(2)]
        );
    }

    #[test]
    fn test_bad_underlying_type() {
        let model = model(
            "Ns",
            None,
            r#"<EnumType Name="E" UnderlyingType="Edm.String">
                 <Member Name="A" Value="x"/>
                 <Member Name="B"/>
               </EnumType>
               <TypeDefinition Name="Code" UnderlyingType="Edm.Int16"/>"#,
        );
        let e = model.find_type("Ns.E").unwrap();
        assert_eq!(
            model.enum_underlying_type(e).errors()[0].code,
            EdmErrorCode::BadUnresolvedPrimitiveType
        );
        let members = model.enum_members(e);
        assert_eq!(
            members[0].value.errors()[0].code,
            EdmErrorCode::InvalidEnumMemberValue
        );
        assert_eq!(members[1].value.resolved(), Some(&0));
        let code = model.find_type("Ns.Code").unwrap();
        assert_eq!(
            *model.type_definition_underlying(code),
            Resolution::Resolved(PrimitiveKind::Int16)
        );
    }
}
