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

//! Name lookup.
//!
//! Names are resolved by their namespace-qualified form. A qualified
//! name may use a schema alias or an alias of edmx:Include in place of
//! the namespace; the alias is replaced before lookup.

use crate::semantics::ContainerId;
use crate::semantics::ExpressionId;
use crate::semantics::Model;
use crate::semantics::OperationId;
use crate::semantics::SchemaId;
use crate::semantics::TermId;
use crate::semantics::TypeId;
use std::collections::HashMap;

#[derive(Default)]
pub(crate) struct NameIndex {
    pub(crate) types: HashMap<String, TypeId>,
    pub(crate) operations: HashMap<String, Vec<OperationId>>,
    pub(crate) terms: HashMap<String, TermId>,
    pub(crate) containers: HashMap<String, ContainerId>,
    /// Labeled elements by schema and name.
    pub(crate) labels: HashMap<(SchemaId, String), Vec<ExpressionId>>,
    /// Schema aliases of all documents: alias to namespace.
    pub(crate) aliases: HashMap<String, String>,
}

impl Model {
    /// Replace alias in `name` by the namespace it stands for. Aliases
    /// of the schema's document take precedence over aliases declared
    /// elsewhere in the model.
    pub(crate) fn qualify(&self, schema: Option<SchemaId>, name: &str) -> String {
        let Some((prefix, local)) = name.rsplit_once('.') else {
            return name.into();
        };
        schema
            .and_then(|s| self.schema(s).aliases.get(prefix))
            .or_else(|| self.names.aliases.get(prefix))
            .map_or_else(|| name.into(), |ns| format!("{ns}.{local}"))
    }

    pub(crate) fn lookup_type(&self, schema: Option<SchemaId>, name: &str) -> Option<TypeId> {
        self.names.types.get(&self.qualify(schema, name)).copied()
    }

    pub(crate) fn lookup_operations(&self, schema: Option<SchemaId>, name: &str) -> &[OperationId] {
        self.names
            .operations
            .get(&self.qualify(schema, name))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub(crate) fn lookup_term(&self, schema: Option<SchemaId>, name: &str) -> Option<TermId> {
        self.names.terms.get(&self.qualify(schema, name)).copied()
    }

    pub(crate) fn lookup_container(&self, schema: Option<SchemaId>, name: &str) -> Option<ContainerId> {
        self.names.containers.get(&self.qualify(schema, name)).copied()
    }

    /// Find entity, complex, enum type or type definition by qualified
    /// name (namespace or alias).
    #[must_use]
    pub fn find_type(&self, name: &str) -> Option<TypeId> {
        self.lookup_type(None, name)
    }

    /// All overloads of the action or function.
    #[must_use]
    pub fn find_operations(&self, name: &str) -> &[OperationId] {
        self.lookup_operations(None, name)
    }

    #[must_use]
    pub fn find_term(&self, name: &str) -> Option<TermId> {
        self.lookup_term(None, name)
    }

    #[must_use]
    pub fn find_entity_container(&self, name: &str) -> Option<ContainerId> {
        self.lookup_container(None, name)
    }

    /// Find schema by namespace or alias.
    #[must_use]
    pub fn find_schema(&self, name: &str) -> Option<SchemaId> {
        let namespace = self.names.aliases.get(name).map_or(name, String::as_str);
        self.schemas().find(|s| self.schema(*s).namespace == namespace)
    }
}

#[cfg(test)]
mod tests {
    use crate::edmx::Edmx;
    use crate::semantics::test_utils::model;
    use crate::semantics::Model;

    #[test]
    fn test_alias_lookup() {
        let model = model(
            "Sales.Model",
            Some("Sales"),
            r#"<ComplexType Name="Address"/>
               <Term Name="Tag" Type="Edm.String"/>"#,
        );
        let by_namespace = model.find_type("Sales.Model.Address").unwrap();
        assert_eq!(model.find_type("Sales.Address"), Some(by_namespace));
        assert!(model.find_type("Address").is_none());
        assert!(model.find_term("Sales.Tag").is_some());
        assert_eq!(model.find_schema("Sales"), model.find_schema("Sales.Model"));
    }

    #[test]
    fn test_include_alias_is_document_scoped() {
        let vocabulary = r#"<edmx:Edmx xmlns:edmx="http://docs.oasis-open.org/odata/ns/edmx" Version="4.0">
          <edmx:DataServices>
            <Schema xmlns="http://docs.oasis-open.org/odata/ns/edm" Namespace="Org.Example.V1">
              <Term Name="Weight" Type="Edm.Decimal"/>
            </Schema>
          </edmx:DataServices>
        </edmx:Edmx>"#;
        let service = r#"<edmx:Edmx xmlns:edmx="http://docs.oasis-open.org/odata/ns/edmx" Version="4.0">
          <edmx:Reference Uri="example.xml">
            <edmx:Include Namespace="Org.Example.V1" Alias="Ex"/>
          </edmx:Reference>
          <edmx:DataServices>
            <Schema xmlns="http://docs.oasis-open.org/odata/ns/edm" Namespace="Shop">
              <ComplexType Name="Box">
                <Annotation Term="Ex.Weight" Decimal="1.5"/>
              </ComplexType>
            </Schema>
          </edmx:DataServices>
        </edmx:Edmx>"#;
        let model = Model::new(vec![
            Edmx::parse(vocabulary).unwrap(),
            Edmx::parse(service).unwrap(),
        ]);
        assert!(model.find_term("Org.Example.V1.Weight").is_some());
        let annotation = model.annotations().next().unwrap();
        assert!(model.annotation_term(annotation).resolved().is_some());
        assert!(model.errors().is_empty());
    }
}
