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

use crate::semantics::EdmErrorCode;
use crate::semantics::Location;
use crate::semantics::Model;
use crate::semantics::Resolution;
use crate::semantics::TermId;
use crate::semantics::Unresolved;
use nv_odata_core::TypeReference;
use nv_odata_core::Value;
use std::sync::Arc;

impl Model {
    #[must_use]
    pub fn term_name(&self, id: TermId) -> &str {
        &self.term_node(id).name
    }

    #[must_use]
    pub fn term_full_name(&self, id: TermId) -> &str {
        &self.term_node(id).full_name
    }

    #[must_use]
    pub fn term_location(&self, id: TermId) -> &Location {
        &self.term_node(id).location
    }

    /// Element kinds the term may be applied to (`EntityType`,
    /// `Property`, ...). Empty means any.
    #[must_use]
    pub fn applies_to(&self, id: TermId) -> &[String] {
        &self.term_node(id).applies_to
    }

    pub fn term_type(&self, id: TermId) -> Arc<Resolution<TypeReference>> {
        let node = self.term_node(id);
        node.resolved_type.get_or_init(|| {
            self.resolve_type_reference(Some(node.schema), &node.ttype, node.nullable, &node.facets, &node.location)
        })
    }

    /// Term this term specializes. `None` if no base term is declared.
    pub fn base_term(&self, id: TermId) -> Arc<Option<Resolution<TermId>>> {
        let node = self.term_node(id);
        node.resolved_base.get_or_init(|| {
            node.base_term.as_deref().map(|name| {
                match self.lookup_term(Some(node.schema), name) {
                    Some(base) if base != id => Resolution::Resolved(base),
                    Some(_) => Resolution::unresolved(
                        name,
                        EdmErrorCode::BadUnresolvedTerm,
                        format!("term {} is its own base term", node.full_name),
                        &node.location,
                    ),
                    None => Resolution::unresolved(
                        name,
                        EdmErrorCode::BadUnresolvedTerm,
                        format!("base term {name} not found"),
                        &node.location,
                    ),
                }
            })
        })
    }

    /// `DefaultValue` parsed as a value of the term type. A term
    /// with unresolved type has an unresolved default without its own
    /// diagnostics.
    pub fn term_default_value(&self, id: TermId) -> Arc<Option<Resolution<Value>>> {
        let node = self.term_node(id);
        node.default.get_or_init(|| {
            let text = node.default_value.as_deref()?;
            Some(match &*self.term_type(id) {
                Resolution::Resolved(type_ref) => self.value_from_text(text, type_ref, &node.location),
                Resolution::Unresolved(_) => Resolution::Unresolved(Unresolved::silent(text, &node.location)),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::semantics::test_utils::model;
    use crate::semantics::EdmErrorCode;
    use crate::semantics::Resolution;
    use nv_odata_core::PrimitiveKind;
    use nv_odata_core::Value;

    const BODY: &str = r#"
        <Term Name="Limit" Type="Edm.Int32" DefaultValue="10" AppliesTo="EntitySet Singleton"/>
        <Term Name="Label" Type="Edm.String" DefaultValue="none"/>
        <Term Name="Broken" Type="Edm.Int32" DefaultValue="ten"/>
        <Term Name="Orphan" Type="Sales.Missing" DefaultValue="1" BaseTerm="Sales.Nothing"/>
        <Term Name="Strict" Type="Edm.Int32" BaseTerm="V.Limit"/>
    "#;

    #[test]
    fn test_term_types_and_defaults() {
        let model = model("Sales", Some("V"), BODY);
        let limit = model.find_term("V.Limit").unwrap();
        assert_eq!(model.term_full_name(limit), "Sales.Limit");
        assert_eq!(model.applies_to(limit), ["EntitySet", "Singleton"]);
        assert_eq!(
            model.term_type(limit).resolved().and_then(|t| t.primitive_kind()),
            Some(PrimitiveKind::Int32)
        );
        assert_eq!(
            *model.term_default_value(limit),
            Some(Resolution::Resolved(Value::from(10i32)))
        );
        let label = model.find_term("Sales.Label").unwrap();
        assert_eq!(
            *model.term_default_value(label),
            Some(Resolution::Resolved(Value::from("none")))
        );
        let strict = model.find_term("Sales.Strict").unwrap();
        assert_eq!(*model.base_term(strict), Some(Resolution::Resolved(limit)));
        assert!(model.term_default_value(strict).is_none());
    }

    #[test]
    fn test_term_errors() {
        let model = model("Sales", None, BODY);
        let broken = model.find_term("Sales.Broken").unwrap();
        let default = model.term_default_value(broken);
        let errors = default.as_ref().as_ref().unwrap().errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, EdmErrorCode::InvalidConstant);

        let orphan = model.find_term("Sales.Orphan").unwrap();
        assert_eq!(model.term_type(orphan).errors()[0].code, EdmErrorCode::BadUnresolvedType);
        // Reported once, by the type.
        assert!(model.term_default_value(orphan).as_ref().as_ref().unwrap().errors().is_empty());
        let base = model.base_term(orphan);
        assert_eq!(
            base.as_ref().as_ref().unwrap().errors()[0].code,
            EdmErrorCode::BadUnresolvedTerm
        );
    }
}
