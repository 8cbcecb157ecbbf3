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

/// 12.1 Element edm:Action / 12.2 Element edm:Function
#[derive(Debug, Deserialize)]
pub struct DeOperation {
    /// 12.1.1 Attribute `Name`
    #[serde(rename = "@Name")]
    pub name: SimpleIdentifier,
    /// 12.1.2 Attribute `IsBound`
    #[serde(rename = "@IsBound")]
    pub is_bound: Option<bool>,
    /// 12.1.3 Attribute `EntitySetPath`
    #[serde(rename = "@EntitySetPath")]
    pub entity_set_path: Option<String>,
    /// 12.2.4 Attribute `IsComposable` (functions only)
    #[serde(rename = "@IsComposable")]
    pub is_composable: Option<bool>,
    #[serde(rename = "$value", default)]
    pub items: Vec<DeOperationItem>,
}

#[derive(Debug, Deserialize)]
pub enum DeOperationItem {
    /// 12.3 Element edm:ReturnType
    ReturnType(DeReturnType),
    /// 12.4 Element edm:Parameter
    Parameter(DeParameter),
    Annotation(Box<DeExpressionHost>),
}

/// 12.3 Element edm:ReturnType
#[derive(Debug, Deserialize)]
pub struct DeReturnType {
    /// 12.3.1 Attribute `Type`
    #[serde(rename = "@Type")]
    pub rtype: String,
    /// 12.3.2 Attribute `Nullable`
    #[serde(rename = "@Nullable")]
    pub nullable: Option<bool>,
    #[serde(rename = "@MaxLength")]
    pub max_length: Option<String>,
    #[serde(rename = "@Precision")]
    pub precision: Option<u32>,
    #[serde(rename = "@Scale")]
    pub scale: Option<String>,
    #[serde(rename = "@SRID")]
    pub srid: Option<String>,
    #[serde(rename = "Annotation", default)]
    pub annotations: Vec<DeExpressionHost>,
}

/// 12.4 Element edm:Parameter
#[derive(Debug, Deserialize)]
pub struct DeParameter {
    /// 12.4.1 Attribute `Name`
    #[serde(rename = "@Name")]
    pub name: SimpleIdentifier,
    /// 12.4.2 Attribute `Type`
    #[serde(rename = "@Type")]
    pub ptype: String,
    /// 12.4.3 Attribute `Nullable`
    #[serde(rename = "@Nullable")]
    pub nullable: Option<bool>,
    #[serde(rename = "@MaxLength")]
    pub max_length: Option<String>,
    #[serde(rename = "@Precision")]
    pub precision: Option<u32>,
    #[serde(rename = "@Scale")]
    pub scale: Option<String>,
    #[serde(rename = "@SRID")]
    pub srid: Option<String>,
    #[serde(rename = "Annotation", default)]
    pub annotations: Vec<DeExpressionHost>,
}

/// Validated edm:Parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: SimpleIdentifier,
    pub ptype: String,
    pub nullable: Option<bool>,
    pub facets: RawFacets,
    pub annotations: Vec<Annotation>,
}

/// Validated edm:ReturnType.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnType {
    pub rtype: String,
    pub nullable: Option<bool>,
    pub facets: RawFacets,
    pub annotations: Vec<Annotation>,
}

/// Validated edm:Action or edm:Function.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub name: SimpleIdentifier,
    pub is_bound: bool,
    pub is_composable: bool,
    pub entity_set_path: Option<String>,
    /// Parameters in declaration order. The first one is the binding
    /// parameter of the bound operation.
    pub parameters: Vec<Parameter>,
    pub return_type: Option<ReturnType>,
    pub annotations: Vec<Annotation>,
}

impl DeOperation {
    /// # Errors
    ///
    /// `ValidateError::Operation` if more than one edm:ReturnType
    /// specified or any of annotations is invalid.
    pub fn validate(self) -> Result<Operation, ValidateError> {
        let name = self.name;
        let wrap = |e| ValidateError::Operation(name.inner().clone(), Box::new(e));
        let (mut return_types, parameters, annotations) = self.items.into_iter().fold(
            (Vec::new(), Vec::new(), Vec::new()),
            |(mut rts, mut ps, mut anns), v| {
                match v {
                    DeOperationItem::ReturnType(v) => rts.push(v),
                    DeOperationItem::Parameter(v) => ps.push(v),
                    DeOperationItem::Annotation(v) => anns.push(*v),
                }
                (rts, ps, anns)
            },
        );
        if return_types.len() > 1 {
            return Err(wrap(ValidateError::TooManyReturnTypes));
        }
        let return_type = return_types
            .pop()
            .map(|rt| {
                Ok::<_, ValidateError>(ReturnType {
                    rtype: rt.rtype,
                    nullable: rt.nullable,
                    facets: RawFacets {
                        max_length: rt.max_length,
                        precision: rt.precision,
                        scale: rt.scale,
                        srid: rt.srid,
                        unicode: None,
                    },
                    annotations: validate_annotations(rt.annotations)?,
                })
            })
            .transpose()
            .map_err(wrap)?;
        let parameters = parameters
            .into_iter()
            .map(|p| {
                Ok::<_, ValidateError>(Parameter {
                    name: p.name,
                    ptype: p.ptype,
                    nullable: p.nullable,
                    facets: RawFacets {
                        max_length: p.max_length,
                        precision: p.precision,
                        scale: p.scale,
                        srid: p.srid,
                        unicode: None,
                    },
                    annotations: validate_annotations(p.annotations)?,
                })
            })
            .collect::<Result<Vec<_>, ValidateError>>()
            .map_err(wrap)?;
        let annotations = validate_annotations(annotations).map_err(wrap)?;
        Ok(Operation {
            name,
            is_bound: self.is_bound.unwrap_or(false),
            is_composable: self.is_composable.unwrap_or(false),
            entity_set_path: self.entity_set_path,
            parameters,
            return_type,
            annotations,
        })
    }
}
