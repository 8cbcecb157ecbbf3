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

//! Whole-model validation.

use crate::semantics::EdmError;
use crate::semantics::Model;
use crate::semantics::Resolution;
use crate::semantics::TypeDecl;
use crate::semantics::TypeId;
use log::debug;

impl Model {
    /// Resolve every lazily computed property of the model and collect
    /// the diagnostics. Each failure is reported once, by the element
    /// that contains the unresolved reference.
    #[must_use]
    pub fn errors(&self) -> Vec<EdmError> {
        let mut errors = Vec::new();
        for t in self.types() {
            self.type_errors(t, &mut errors);
        }
        for op in self.operations() {
            let parameters = self.parameters(op);
            errors.extend(parameters.errors.iter().cloned());
            for p in &parameters.parameters {
                push(&mut errors, &p.type_ref);
            }
            if let Some(r) = self.return_type(op).as_ref() {
                push(&mut errors, r);
            }
            if let Some(path) = self.entity_set_path(op).as_ref() {
                push(&mut errors, path);
            }
        }
        for term in self.terms() {
            push(&mut errors, &self.term_type(term));
            if let Some(base) = self.base_term(term).as_ref() {
                push(&mut errors, base);
            }
            if let Some(default) = self.term_default_value(term).as_ref() {
                push(&mut errors, default);
            }
        }
        for container in self.entity_containers() {
            for source in self.container_sources(container) {
                push(&mut errors, &self.source_entity_type(*source));
                for binding in self.navigation_bindings(*source).iter() {
                    push(&mut errors, &binding.property);
                    push(&mut errors, &binding.target);
                }
            }
            for import in self.container_imports(container) {
                push(&mut errors, &self.import_operations(*import));
                if let Some(set) = self.import_entity_set(*import).as_ref() {
                    push(&mut errors, set);
                }
            }
        }
        for annotation in self.annotations() {
            push(&mut errors, &self.annotation_term(annotation));
            push(&mut errors, &self.annotation_target(annotation));
            if let Some(value) = self.annotation_value(annotation) {
                errors.extend(self.expression_errors(value));
            }
        }
        debug!("model validated with {} errors", errors.len());
        errors
    }

    fn type_errors(&self, id: TypeId, errors: &mut Vec<EdmError>) {
        match &self.type_node(id).decl {
            TypeDecl::Structured(decl) => {
                if let Some(base) = self.base_type(id).as_ref() {
                    push(errors, base);
                }
                // Inherited keys are reported by the declaring type.
                if decl.key.is_some() {
                    for key in self.key(id).iter() {
                        push(errors, key);
                    }
                }
                for property in self.declared_properties(id) {
                    push(errors, &self.property_type(*property));
                    if let Some(partner) = self.partner(*property).as_ref() {
                        push(errors, partner);
                    }
                }
            }
            TypeDecl::Enum(_) => {
                push(errors, &self.enum_underlying_type(id));
                for member in self.enum_members(id).iter() {
                    push(errors, &member.value);
                }
            }
            TypeDecl::Definition(_) => push(errors, &self.type_definition_underlying(id)),
        }
    }
}

fn push<T>(errors: &mut Vec<EdmError>, resolution: &Resolution<T>) {
    errors.extend(resolution.errors().iter().cloned());
}

#[cfg(test)]
mod tests {
    use crate::semantics::test_utils::model;
    use crate::semantics::EdmErrorCode;

    #[test]
    fn test_valid_model() {
        let model = model(
            "Sales",
            Some("S"),
            r#"
            <EntityType Name="Customer">
              <Key><PropertyRef Name="Id"/></Key>
              <Property Name="Id" Type="Edm.Int32" Nullable="false"/>
              <Property Name="Level" Type="S.Level"/>
              <Annotation Term="S.Rating" Int="3"/>
            </EntityType>
            <EnumType Name="Level" UnderlyingType="Edm.Byte">
              <Member Name="Bronze"/>
              <Member Name="Gold" Value="10"/>
            </EnumType>
            <TypeDefinition Name="Code" UnderlyingType="Edm.String" MaxLength="8"/>
            <Term Name="Rating" Type="Edm.Int32" DefaultValue="1"/>
            <EntityContainer Name="Default">
              <EntitySet Name="Customers" EntityType="S.Customer"/>
            </EntityContainer>
            "#,
        );
        assert_eq!(model.errors(), Vec::new());
    }

    #[test]
    fn test_errors_are_collected_once() {
        let model = model(
            "Sales",
            None,
            r#"
            <EntityType Name="Base" BaseType="Sales.Derived">
              <Key><PropertyRef Name="Nope"/></Key>
            </EntityType>
            <EntityType Name="Derived" BaseType="Sales.Base">
              <Property Name="Kind" Type="Sales.Missing"/>
            </EntityType>
            <EnumType Name="Tiny" UnderlyingType="Edm.SByte">
              <Member Name="Big" Value="300"/>
            </EnumType>
            <Action Name="Go">
              <Parameter Name="x" Type="Edm.Int32"/>
              <Parameter Name="x" Type="Edm.Int32"/>
            </Action>
            <Term Name="Size" Type="Edm.Int32">
              <Annotation Term="Sales.Size" Int="big"/>
            </Term>
            "#,
        );
        let errors = model.errors();
        let count = |code| errors.iter().filter(|e| e.code == code).count();
        assert_eq!(count(EdmErrorCode::BadCyclicType), 2);
        assert_eq!(count(EdmErrorCode::BadUnresolvedProperty), 1);
        assert_eq!(count(EdmErrorCode::BadUnresolvedType), 1);
        assert_eq!(count(EdmErrorCode::EnumMemberValueOutOfRange), 1);
        assert_eq!(count(EdmErrorCode::DuplicateParameterName), 1);
        assert_eq!(count(EdmErrorCode::InvalidConstant), 1);
        assert_eq!(errors.len(), 7);
        assert_eq!(model.errors(), errors);
    }
}
