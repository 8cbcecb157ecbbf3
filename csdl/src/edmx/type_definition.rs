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

/// 11.1 Element edm:TypeDefinition
#[derive(Debug, Deserialize)]
pub struct DeTypeDefinition {
    /// 11.1.1 Attribute `Name`
    #[serde(rename = "@Name")]
    pub name: SimpleIdentifier,
    /// 11.1.2 Attribute `UnderlyingType`
    #[serde(rename = "@UnderlyingType")]
    pub underlying_type: String,
    #[serde(rename = "@MaxLength")]
    pub max_length: Option<String>,
    #[serde(rename = "@Precision")]
    pub precision: Option<u32>,
    #[serde(rename = "@Scale")]
    pub scale: Option<String>,
    #[serde(rename = "@Unicode")]
    pub unicode: Option<bool>,
    #[serde(rename = "@SRID")]
    pub srid: Option<String>,
    #[serde(rename = "Annotation", default)]
    pub annotations: Vec<DeExpressionHost>,
}

/// Validated edm:TypeDefinition.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDefinition {
    pub name: SimpleIdentifier,
    pub underlying_type: String,
    pub facets: RawFacets,
    pub annotations: Vec<Annotation>,
}

impl DeTypeDefinition {
    /// # Errors
    ///
    /// Returns error if any of annotations is invalid.
    pub fn validate(self) -> Result<TypeDefinition, ValidateError> {
        Ok(TypeDefinition {
            name: self.name,
            underlying_type: self.underlying_type,
            facets: RawFacets {
                max_length: self.max_length,
                precision: self.precision,
                scale: self.scale,
                srid: self.srid,
                unicode: self.unicode,
            },
            annotations: validate_annotations(self.annotations)?,
        })
    }
}
