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
use crate::edmx::RawFacets;
use crate::edmx::SimpleIdentifier;
use crate::edmx::ValidateError;
use serde::Deserialize;

/// 6.1 Element edm:Property
#[derive(Debug, Deserialize)]
pub struct DeStructuralProperty {
    /// 6.1.1 Attribute `Name`
    #[serde(rename = "@Name")]
    pub name: SimpleIdentifier,
    /// 6.1.2 Attribute `Type`
    #[serde(rename = "@Type")]
    pub ptype: String,
    /// 6.2.1 Attribute `Nullable`
    #[serde(rename = "@Nullable")]
    pub nullable: Option<bool>,
    /// 6.2.2 Attribute `MaxLength`
    #[serde(rename = "@MaxLength")]
    pub max_length: Option<String>,
    /// 6.2.3 Attribute `Precision`
    #[serde(rename = "@Precision")]
    pub precision: Option<u32>,
    /// 6.2.4 Attribute `Scale`
    #[serde(rename = "@Scale")]
    pub scale: Option<String>,
    /// 6.2.5 Attribute `Unicode`
    #[serde(rename = "@Unicode")]
    pub unicode: Option<bool>,
    /// 6.2.6 Attribute `SRID`
    /// Non-negative integer or special value `variable`.
    #[serde(rename = "@SRID")]
    pub srid: Option<String>,
    /// 6.2.7 Attribute `DefaultValue`
    #[serde(rename = "@DefaultValue")]
    pub default_value: Option<String>,
    #[serde(rename = "Annotation", default)]
    pub annotations: Vec<DeExpressionHost>,
}

/// 7.1 Element edm:NavigationProperty
#[derive(Debug, Deserialize)]
pub struct DeNavigationProperty {
    /// 7.1.1 Attribute `Name`
    #[serde(rename = "@Name")]
    pub name: SimpleIdentifier,
    /// 7.1.2 Attribute `Type`
    #[serde(rename = "@Type")]
    pub ptype: String,
    /// 7.1.3 Attribute `Nullable`
    #[serde(rename = "@Nullable")]
    pub nullable: Option<bool>,
    /// 7.1.4 Attribute `Partner`
    #[serde(rename = "@Partner")]
    pub partner: Option<String>,
    /// 7.1.5 Attribute `ContainsTarget`
    #[serde(rename = "@ContainsTarget")]
    pub contains_target: Option<bool>,
    /// Items of edm:NavigationProperty
    #[serde(rename = "$value", default)]
    pub items: Vec<DeNavigationPropertyItem>,
}

/// Items of edm:NavigationProperty
#[derive(Debug, Deserialize)]
pub enum DeNavigationPropertyItem {
    /// 7.2 Element edm:ReferentialConstraint
    ReferentialConstraint(ReferentialConstraint),
    /// 7.3 Element edm:OnDelete
    OnDelete(OnDelete),
    Annotation(Box<DeExpressionHost>),
}

/// 7.2 Element edm:ReferentialConstraint
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReferentialConstraint {
    /// 7.2.1 Attribute `Property`
    #[serde(rename = "@Property")]
    pub property: String,
    /// 7.2.2 Attribute `ReferencedProperty`
    #[serde(rename = "@ReferencedProperty")]
    pub referenced_property: String,
}

/// 7.3 Element edm:OnDelete
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OnDelete {
    /// 7.3.1 Attribute Action
    #[serde(rename = "@Action")]
    pub action: String,
}

/// Validated edm:Property or edm:NavigationProperty.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: SimpleIdentifier,
    /// Raw type name (`Edm.String`, `Collection(Ns.Type)`).
    pub ptype: String,
    pub nullable: Option<bool>,
    pub attrs: PropertyAttrs,
    pub annotations: Vec<Annotation>,
}

/// Kind-specific attributes of the property.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyAttrs {
    Structural {
        facets: RawFacets,
        default_value: Option<String>,
    },
    Navigation(NavigationAttrs),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationAttrs {
    pub partner: Option<String>,
    pub contains_target: bool,
    pub on_delete: Option<OnDelete>,
    pub referential_constraints: Vec<ReferentialConstraint>,
}

impl Property {
    #[must_use]
    pub const fn is_navigation(&self) -> bool {
        matches!(self.attrs, PropertyAttrs::Navigation(_))
    }
}

impl DeStructuralProperty {
    /// # Errors
    ///
    /// Returns error if any of annotations is invalid.
    pub fn validate(self) -> Result<Property, ValidateError> {
        Ok(Property {
            name: self.name,
            ptype: self.ptype,
            nullable: self.nullable,
            attrs: PropertyAttrs::Structural {
                facets: RawFacets {
                    max_length: self.max_length,
                    precision: self.precision,
                    scale: self.scale,
                    srid: self.srid,
                    unicode: self.unicode,
                },
                default_value: self.default_value,
            },
            annotations: validate_annotations(self.annotations)?,
        })
    }
}

impl DeNavigationProperty {
    /// # Errors
    ///
    /// `ValidateError::NavigationProperty` error if more than one
    /// edm:OnDelete specified or annotation is invalid.
    pub fn validate(self) -> Result<Property, ValidateError> {
        let name = self.name;
        let (mut on_deletes, referential_constraints, annotations) =
            self.items.into_iter().fold(
                (Vec::new(), Vec::new(), Vec::new()),
                |(mut dels, mut rcs, mut anns), v| {
                    match v {
                        DeNavigationPropertyItem::OnDelete(v) => dels.push(v),
                        DeNavigationPropertyItem::ReferentialConstraint(v) => rcs.push(v),
                        DeNavigationPropertyItem::Annotation(v) => anns.push(*v),
                    }
                    (dels, rcs, anns)
                },
            );
        let wrap = |e| ValidateError::NavigationProperty(name.inner().clone(), Box::new(e));
        if on_deletes.len() > 1 {
            return Err(wrap(ValidateError::TooManyOnDelete));
        }
        let annotations = validate_annotations(annotations).map_err(wrap)?;
        Ok(Property {
            attrs: PropertyAttrs::Navigation(NavigationAttrs {
                partner: self.partner,
                contains_target: self.contains_target.unwrap_or(false),
                on_delete: on_deletes.pop(),
                referential_constraints,
            }),
            name,
            ptype: self.ptype,
            nullable: self.nullable,
            annotations,
        })
    }
}
