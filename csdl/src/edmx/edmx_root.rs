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

use crate::edmx::schema::DeSchema;
use crate::edmx::Schema;
use crate::edmx::ValidateError;
use serde::Deserialize;

/// 3.1 Element edmx:Edmx
#[derive(Debug, Deserialize)]
struct DeEdmx {
    /// 3.1.1 Attribute `Version`
    #[serde(rename = "@Version")]
    version: Option<String>,
    #[serde(rename = "$value", default)]
    items: Vec<DeEdmxItem>,
}

#[derive(Debug, Deserialize)]
enum DeEdmxItem {
    /// edmx:Edmx element MUST contain a single direct child
    /// edmx:DataServices element.
    DataServices(DeDataServices),
    Reference(DeReference),
}

/// 3.2 Element edmx:DataServices
#[derive(Debug, Deserialize)]
struct DeDataServices {
    #[serde(rename = "Schema", default)]
    schemas: Vec<DeSchema>,
}

/// 3.3 Element edmx:Reference
#[derive(Debug, Deserialize)]
struct DeReference {
    /// 3.3.1 Attribute `Uri`
    #[serde(rename = "@Uri")]
    uri: String,
    #[serde(rename = "$value", default)]
    items: Vec<DeReferenceItem>,
}

#[derive(Debug, Deserialize)]
enum DeReferenceItem {
    Include(Include),
    IncludeAnnotations(IncludeAnnotations),
    Annotation(serde::de::IgnoredAny),
}

/// 3.4 Element edmx:Include
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Include {
    /// 3.4.1 Attribute `Namespace`
    #[serde(rename = "@Namespace")]
    pub namespace: String,
    /// 3.4.2 Attribute `Alias`
    #[serde(rename = "@Alias")]
    pub alias: Option<String>,
}

/// 3.5 Element edmx:IncludeAnnotations
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IncludeAnnotations {
    /// 3.5.1 Attribute `TermNamespace`
    #[serde(rename = "@TermNamespace")]
    pub term_namespace: String,
    /// 3.5.2 Attribute `Qualifier`
    #[serde(rename = "@Qualifier")]
    pub qualifier: Option<String>,
    /// 3.5.3 Attribute `TargetNamespace`
    #[serde(rename = "@TargetNamespace")]
    pub target_namespace: Option<String>,
}

/// Validated edmx:Reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub uri: String,
    pub includes: Vec<Include>,
    pub include_annotations: Vec<IncludeAnnotations>,
}

/// Validated Edmx document.
#[derive(Debug, Clone, PartialEq)]
pub struct Edmx {
    pub version: Option<String>,
    /// Schemas of the single edmx:DataServices element.
    pub schemas: Vec<Schema>,
    pub references: Vec<Reference>,
}

impl Edmx {
    /// Parse and validate EDMX document.
    ///
    /// # Errors
    ///
    /// Validation error or XML parsing error.
    pub fn parse(data: &str) -> Result<Self, ValidateError> {
        quick_xml::de::from_str::<DeEdmx>(data)
            .map_err(ValidateError::XmlDeserialize)?
            .validate()
    }

    /// Aliases introduced by edmx:Include elements: `(alias, namespace)`.
    pub fn include_aliases(&self) -> impl Iterator<Item = (&str, &str)> {
        self.references
            .iter()
            .flat_map(|r| r.includes.iter())
            .filter_map(|i| i.alias.as_deref().map(|a| (a, i.namespace.as_str())))
    }
}

impl DeEdmx {
    fn validate(self) -> Result<Edmx, ValidateError> {
        let mut data_services = None;
        let mut references = Vec::new();
        for item in self.items {
            match item {
                DeEdmxItem::DataServices(ds) => {
                    if data_services.replace(ds).is_some() {
                        return Err(ValidateError::WrongDataServicesNumber);
                    }
                }
                DeEdmxItem::Reference(r) => references.push(r.validate()),
            }
        }
        let data_services = data_services.ok_or(ValidateError::WrongDataServicesNumber)?;
        Ok(Edmx {
            version: self.version,
            schemas: data_services
                .schemas
                .into_iter()
                .map(DeSchema::validate)
                .collect::<Result<Vec<_>, _>>()?,
            references,
        })
    }
}

impl DeReference {
    fn validate(self) -> Reference {
        let mut includes = Vec::new();
        let mut include_annotations = Vec::new();
        for item in self.items {
            match item {
                DeReferenceItem::Include(v) => includes.push(v),
                DeReferenceItem::IncludeAnnotations(v) => include_annotations.push(v),
                DeReferenceItem::Annotation(_) => (),
            }
        }
        Reference {
            uri: self.uri,
            includes,
            include_annotations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edmx::SchemaItem;

    #[test]
    fn test_trivial_document() {
        let edmx = Edmx::parse(
            r#"<edmx:Edmx Version="4.0" xmlns:edmx="http://docs.oasis-open.org/odata/ns/edmx">
                 <edmx:Reference Uri="https://oasis-tcs.github.io/odata-vocabularies/vocabularies/Org.OData.Core.V1.xml">
                   <edmx:Include Namespace="Org.OData.Core.V1" Alias="Core"/>
                 </edmx:Reference>
                 <edmx:DataServices>
                   <Schema Namespace="Org.OData.Core.V1" Alias="Core" xmlns="http://docs.oasis-open.org/odata/ns/edm">
                     <Term Name="Computed" Type="Core.Tag" DefaultValue="true" AppliesTo="Property">
                       <Annotation Term="Core.Description" String="A value for this property is generated on both insert and update"/>
                     </Term>
                   </Schema>
                 </edmx:DataServices>
               </edmx:Edmx>"#,
        )
        .unwrap();
        assert_eq!(edmx.version.as_deref(), Some("4.0"));
        assert_eq!(edmx.schemas.len(), 1);
        assert_eq!(edmx.schemas[0].alias.as_deref(), Some("Core"));
        assert!(matches!(edmx.schemas[0].items[0], SchemaItem::Term(..)));
        assert_eq!(
            edmx.include_aliases().collect::<Vec<_>>(),
            vec![("Core", "Org.OData.Core.V1")]
        );
    }

    #[test]
    fn test_data_services_number() {
        assert!(matches!(
            Edmx::parse(r#"<Edmx Version="4.0"></Edmx>"#),
            Err(ValidateError::WrongDataServicesNumber)
        ));
        assert!(matches!(
            Edmx::parse(
                r#"<Edmx Version="4.0"><DataServices/><DataServices/></Edmx>"#
            ),
            Err(ValidateError::WrongDataServicesNumber)
        ));
    }

    #[test]
    fn test_schema_error_context() {
        let err = Edmx::parse(
            r#"<Edmx Version="4.0"><DataServices>
                 <Schema Namespace="Sales">
                   <ComplexType Name="Address"><Key><PropertyRef Name="Id"/></Key></ComplexType>
                 </Schema>
               </DataServices></Edmx>"#,
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "schema Sales: type Address: Key element is not allowed in ComplexType"
        );
    }
}
