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

use crate::edmx::annotation::validate_annotations;
use crate::edmx::expression::DeExpressionHost;
use crate::edmx::Annotation;
use crate::edmx::SimpleIdentifier;
use crate::edmx::ValidateError;
use serde::Deserialize;

/// 13.1 Element edm:EntityContainer
#[derive(Debug, Deserialize)]
pub struct DeEntityContainer {
    /// 13.1.1 Attribute `Name`
    #[serde(rename = "@Name")]
    pub name: SimpleIdentifier,
    #[serde(rename = "$value", default)]
    pub items: Vec<DeEntityContainerItem>,
}

#[derive(Debug, Deserialize)]
pub enum DeEntityContainerItem {
    /// 13.2 Element edm:EntitySet
    EntitySet(DeNavigationSource),
    /// 13.3 Element edm:Singleton
    Singleton(DeNavigationSource),
    /// 13.5 Element edm:ActionImport
    ActionImport(DeOperationImport),
    /// 13.6 Element edm:FunctionImport
    FunctionImport(DeOperationImport),
    Annotation(Box<DeExpressionHost>),
}

/// edm:EntitySet or edm:Singleton.
#[derive(Debug, Deserialize)]
pub struct DeNavigationSource {
    #[serde(rename = "@Name")]
    pub name: SimpleIdentifier,
    /// 13.2.2 Attribute `EntityType` of edm:EntitySet
    #[serde(rename = "@EntityType")]
    pub entity_type: Option<String>,
    /// 13.3.2 Attribute `Type` of edm:Singleton
    #[serde(rename = "@Type")]
    pub stype: Option<String>,
    #[serde(rename = "$value", default)]
    pub items: Vec<DeNavigationSourceItem>,
}

#[derive(Debug, Deserialize)]
pub enum DeNavigationSourceItem {
    /// 13.4 Element edm:NavigationPropertyBinding
    NavigationPropertyBinding(NavigationPropertyBinding),
    Annotation(Box<DeExpressionHost>),
}

/// 13.4 Element edm:NavigationPropertyBinding
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NavigationPropertyBinding {
    /// 13.4.1 Attribute `Path`
    #[serde(rename = "@Path")]
    pub path: String,
    /// 13.4.2 Attribute `Target`
    #[serde(rename = "@Target")]
    pub target: String,
}

/// edm:ActionImport or edm:FunctionImport.
#[derive(Debug, Deserialize)]
pub struct DeOperationImport {
    #[serde(rename = "@Name")]
    pub name: SimpleIdentifier,
    /// 13.5.2 Attribute `Action`
    #[serde(rename = "@Action")]
    pub action: Option<String>,
    /// 13.6.2 Attribute `Function`
    #[serde(rename = "@Function")]
    pub function: Option<String>,
    /// 13.5.3 Attribute `EntitySet`
    #[serde(rename = "@EntitySet")]
    pub entity_set: Option<String>,
    #[serde(rename = "Annotation", default)]
    pub annotations: Vec<DeExpressionHost>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavigationSourceKind {
    EntitySet,
    Singleton,
}

/// Validated edm:EntitySet or edm:Singleton.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationSource {
    pub name: SimpleIdentifier,
    pub kind: NavigationSourceKind,
    /// Raw name of the entity type.
    pub entity_type: String,
    pub bindings: Vec<NavigationPropertyBinding>,
    pub annotations: Vec<Annotation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationImportKind {
    Action,
    Function,
}

/// Validated edm:ActionImport or edm:FunctionImport.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationImport {
    pub name: SimpleIdentifier,
    pub kind: OperationImportKind,
    /// Raw qualified name of the imported operation.
    pub operation: String,
    pub entity_set: Option<String>,
    pub annotations: Vec<Annotation>,
}

/// Validated edm:EntityContainer.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityContainer {
    pub name: SimpleIdentifier,
    pub sources: Vec<NavigationSource>,
    pub imports: Vec<OperationImport>,
    pub annotations: Vec<Annotation>,
}

impl DeNavigationSource {
    fn validate(self, kind: NavigationSourceKind) -> Result<NavigationSource, ValidateError> {
        let entity_type = match kind {
            NavigationSourceKind::EntitySet => self
                .entity_type
                .ok_or(ValidateError::MissingAttribute("EntityType"))?,
            NavigationSourceKind::Singleton => {
                self.stype.ok_or(ValidateError::MissingAttribute("Type"))?
            }
        };
        let (bindings, annotations) =
            self.items
                .into_iter()
                .fold((Vec::new(), Vec::new()), |(mut bs, mut anns), v| {
                    match v {
                        DeNavigationSourceItem::NavigationPropertyBinding(v) => bs.push(v),
                        DeNavigationSourceItem::Annotation(v) => anns.push(*v),
                    }
                    (bs, anns)
                });
        Ok(NavigationSource {
            name: self.name,
            kind,
            entity_type,
            bindings,
            annotations: validate_annotations(annotations)?,
        })
    }
}

impl DeOperationImport {
    fn validate(self, kind: OperationImportKind) -> Result<OperationImport, ValidateError> {
        let operation = match kind {
            OperationImportKind::Action => {
                self.action.ok_or(ValidateError::MissingAttribute("Action"))?
            }
            OperationImportKind::Function => self
                .function
                .ok_or(ValidateError::MissingAttribute("Function"))?,
        };
        Ok(OperationImport {
            name: self.name,
            kind,
            operation,
            entity_set: self.entity_set,
            annotations: validate_annotations(self.annotations)?,
        })
    }
}

impl DeEntityContainer {
    /// # Errors
    ///
    /// `ValidateError::EntityContainer` if any of container elements is
    /// invalid.
    pub fn validate(self) -> Result<EntityContainer, ValidateError> {
        let name = self.name;
        let (sources, imports, annotations) = self.items.into_iter().fold(
            (Vec::new(), Vec::new(), Vec::new()),
            |(mut ss, mut is, mut anns), v| {
                match v {
                    DeEntityContainerItem::EntitySet(v) => {
                        ss.push(v.validate(NavigationSourceKind::EntitySet));
                    }
                    DeEntityContainerItem::Singleton(v) => {
                        ss.push(v.validate(NavigationSourceKind::Singleton));
                    }
                    DeEntityContainerItem::ActionImport(v) => {
                        is.push(v.validate(OperationImportKind::Action));
                    }
                    DeEntityContainerItem::FunctionImport(v) => {
                        is.push(v.validate(OperationImportKind::Function));
                    }
                    DeEntityContainerItem::Annotation(v) => anns.push(*v),
                }
                (ss, is, anns)
            },
        );
        let wrap = |e| ValidateError::EntityContainer(name.inner().clone(), Box::new(e));
        let sources = sources
            .into_iter()
            .collect::<Result<Vec<_>, _>>()
            .map_err(wrap)?;
        let imports = imports
            .into_iter()
            .collect::<Result<Vec<_>, _>>()
            .map_err(wrap)?;
        let annotations = validate_annotations(annotations).map_err(wrap)?;
        Ok(EntityContainer {
            name,
            sources,
            imports,
            annotations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container() {
        let ec: DeEntityContainer = quick_xml::de::from_str(
            r#"<EntityContainer Name="Default">
                 <EntitySet Name="Customers" EntityType="Sales.Customer">
                   <NavigationPropertyBinding Path="Orders" Target="Orders"/>
                 </EntitySet>
                 <Singleton Name="Me" Type="Sales.Customer"/>
                 <EntitySet Name="Orders" EntityType="Sales.Order"/>
                 <FunctionImport Name="Top" Function="Sales.TopOrders" EntitySet="Orders"/>
                 <ActionImport Name="Reset" Action="Sales.Reset"/>
               </EntityContainer>"#,
        )
        .unwrap();
        let ec = ec.validate().unwrap();
        assert_eq!(ec.sources.len(), 3);
        assert_eq!(ec.sources[0].bindings[0].target, "Orders");
        assert_eq!(ec.sources[1].kind, NavigationSourceKind::Singleton);
        assert_eq!(ec.sources[1].entity_type, "Sales.Customer");
        assert_eq!(ec.imports.len(), 2);
        assert_eq!(ec.imports[0].kind, OperationImportKind::Function);
        assert_eq!(ec.imports[0].entity_set.as_deref(), Some("Orders"));
        assert_eq!(ec.imports[1].operation, "Sales.Reset");
    }

    #[test]
    fn test_missing_entity_type() {
        let ec: DeEntityContainer = quick_xml::de::from_str(
            r#"<EntityContainer Name="Default"><EntitySet Name="Customers"/></EntityContainer>"#,
        )
        .unwrap();
        assert!(matches!(
            ec.validate(),
            Err(ValidateError::EntityContainer(_, e)) if matches!(*e, ValidateError::MissingAttribute("EntityType"))
        ));
    }
}
