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
use crate::edmx::property::DeNavigationProperty;
use crate::edmx::property::DeStructuralProperty;
use crate::edmx::Annotation;
use crate::edmx::Property;
use crate::edmx::SimpleIdentifier;
use crate::edmx::ValidateError;
use serde::Deserialize;

/// 8.1 Element edm:EntityType / 9.1 Element edm:ComplexType
#[derive(Debug, Deserialize)]
pub struct DeStructuredType {
    /// 8.1.1 Attribute Name
    #[serde(rename = "@Name")]
    pub name: SimpleIdentifier,
    /// 8.1.2 Attribute `BaseType`
    #[serde(rename = "@BaseType")]
    pub base_type: Option<String>,
    /// 8.1.3 Attribute `Abstract`
    #[serde(rename = "@Abstract")]
    pub r#abstract: Option<bool>,
    /// 8.1.4 Attribute `OpenType`
    #[serde(rename = "@OpenType")]
    pub open_type: Option<bool>,
    /// 8.1.5 Attribute `HasStream` (entity types only)
    #[serde(rename = "@HasStream")]
    pub has_stream: Option<bool>,
    #[serde(rename = "$value", default)]
    pub items: Vec<DeStructuredTypeItem>,
}

/// 8.2 Element edm:Key
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Key {
    #[serde(rename = "PropertyRef", default)]
    pub property_refs: Vec<PropertyRef>,
}

/// 8.3 Element edm:PropertyRef
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PropertyRef {
    /// 8.3.1 Attribute Name
    #[serde(rename = "@Name")]
    pub name: String,
    /// 8.3.2 Attribute Alias
    #[serde(rename = "@Alias")]
    pub alias: Option<String>,
}

/// Items of edm:EntityType and edm:ComplexType
#[derive(Debug, Deserialize)]
pub enum DeStructuredTypeItem {
    Key(Key),
    #[serde(rename = "Property")]
    StructuralProperty(DeStructuralProperty),
    NavigationProperty(DeNavigationProperty),
    Annotation(Box<DeExpressionHost>),
}

/// Validated edm:EntityType or edm:ComplexType.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredType {
    pub name: SimpleIdentifier,
    pub base_type: Option<String>,
    pub is_abstract: bool,
    pub is_open: bool,
    pub has_stream: bool,
    pub key: Option<Key>,
    pub properties: Vec<Property>,
    pub annotations: Vec<Annotation>,
}

impl DeStructuredType {
    /// Validate as edm:EntityType.
    ///
    /// # Errors
    ///
    /// `ValidateError::StructuredType` if more than one key specified or
    /// any of properties is invalid.
    pub fn validate_entity_type(self) -> Result<StructuredType, ValidateError> {
        self.validate(true)
    }

    /// Validate as edm:ComplexType.
    ///
    /// # Errors
    ///
    /// `ValidateError::StructuredType` if key specified or any of
    /// properties is invalid.
    pub fn validate_complex_type(self) -> Result<StructuredType, ValidateError> {
        self.validate(false)
    }

    fn validate(self, is_entity: bool) -> Result<StructuredType, ValidateError> {
        let name = self.name;
        let wrap = |e| ValidateError::StructuredType(name.inner().clone(), Box::new(e));
        let (mut keys, properties, annotations) = self.items.into_iter().fold(
            (Vec::new(), Vec::new(), Vec::new()),
            |(mut keys, mut ps, mut anns), v| {
                match v {
                    DeStructuredTypeItem::Key(k) => keys.push(k),
                    DeStructuredTypeItem::StructuralProperty(p) => ps.push(p.validate()),
                    DeStructuredTypeItem::NavigationProperty(p) => ps.push(p.validate()),
                    DeStructuredTypeItem::Annotation(a) => anns.push(*a),
                }
                (keys, ps, anns)
            },
        );
        if !is_entity && !keys.is_empty() {
            return Err(wrap(ValidateError::KeyInComplexType));
        }
        if keys.len() > 1 {
            return Err(wrap(ValidateError::TooManyKeys));
        }
        let properties = properties
            .into_iter()
            .collect::<Result<Vec<_>, _>>()
            .map_err(wrap)?;
        let annotations = validate_annotations(annotations).map_err(wrap)?;
        Ok(StructuredType {
            key: keys.pop(),
            name,
            base_type: self.base_type,
            is_abstract: self.r#abstract.unwrap_or(false),
            is_open: self.open_type.unwrap_or(false),
            has_stream: self.has_stream.unwrap_or(false),
            properties,
            annotations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edmx::property::PropertyAttrs;

    fn parse(xml: &str) -> DeStructuredType {
        quick_xml::de::from_str(xml).unwrap()
    }

    #[test]
    fn test_entity_type() {
        let et = parse(
            r#"<EntityType Name="Customer" BaseType="Sales.Person" OpenType="true">
                 <Key><PropertyRef Name="Id"/></Key>
                 <Property Name="Id" Type="Edm.Int32" Nullable="false"/>
                 <Property Name="Name" Type="Edm.String" MaxLength="max"/>
                 <NavigationProperty Name="Orders" Type="Collection(Sales.Order)" Partner="Customer">
                   <OnDelete Action="Cascade"/>
                 </NavigationProperty>
                 <Annotation Term="Core.Description" String="A customer"/>
               </EntityType>"#,
        )
        .validate_entity_type()
        .unwrap();
        assert_eq!(et.name.inner(), "Customer");
        assert_eq!(et.base_type.as_deref(), Some("Sales.Person"));
        assert!(et.is_open);
        assert!(!et.is_abstract);
        assert_eq!(et.key.unwrap().property_refs[0].name, "Id");
        assert_eq!(et.properties.len(), 3);
        assert_eq!(et.properties[0].nullable, Some(false));
        assert!(matches!(
            &et.properties[1].attrs,
            PropertyAttrs::Structural { facets, .. } if facets.max_length.as_deref() == Some("max")
        ));
        assert!(et.properties[2].is_navigation());
        assert_eq!(et.annotations.len(), 1);
    }

    #[test]
    fn test_too_many_keys() {
        let err = parse(
            r#"<EntityType Name="Bad">
                 <Key><PropertyRef Name="A"/></Key>
                 <Key><PropertyRef Name="B"/></Key>
               </EntityType>"#,
        )
        .validate_entity_type()
        .unwrap_err();
        assert!(matches!(
            err,
            ValidateError::StructuredType(name, e) if name == "Bad" && matches!(*e, ValidateError::TooManyKeys)
        ));
    }

    #[test]
    fn test_key_in_complex_type() {
        let err = parse(
            r#"<ComplexType Name="Address"><Key><PropertyRef Name="A"/></Key></ComplexType>"#,
        )
        .validate_complex_type()
        .unwrap_err();
        assert!(matches!(
            err,
            ValidateError::StructuredType(_, e) if matches!(*e, ValidateError::KeyInComplexType)
        ));
    }

    #[test]
    fn test_too_many_on_delete() {
        let err = parse(
            r#"<EntityType Name="Order">
                 <NavigationProperty Name="Customer" Type="Sales.Customer">
                   <OnDelete Action="Cascade"/>
                   <OnDelete Action="None"/>
                 </NavigationProperty>
               </EntityType>"#,
        )
        .validate_entity_type()
        .unwrap_err();
        assert!(matches!(
            err,
            ValidateError::StructuredType(_, e) if matches!(&*e, ValidateError::NavigationProperty(name, _) if name == "Customer")
        ));
    }
}
