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

//! Deserialization and validation of terms and annotations.

use crate::edmx::expression::DeExpressionHost;
use crate::edmx::Expression;
use crate::edmx::RawFacets;
use crate::edmx::SimpleIdentifier;
use crate::edmx::ValidateError;
use serde::Deserialize;

/// 14.3 Element edm:Annotation
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    /// 14.3.1 Attribute `Term`
    pub term: String,
    /// 14.3.2 Attribute `Qualifier`
    pub qualifier: Option<String>,
    /// Value of the annotation. If not specified, the default value
    /// of the term applies.
    pub value: Option<Expression>,
    /// Annotations of the annotation.
    pub annotations: Vec<Annotation>,
}

impl DeExpressionHost {
    /// Validate as edm:Annotation.
    ///
    /// # Errors
    ///
    /// Returns error if `Term` is missing or the expression is invalid.
    pub fn validate_annotation(self) -> Result<Annotation, ValidateError> {
        let term = self
            .term
            .clone()
            .ok_or(ValidateError::MissingAttribute("Term"))?;
        let qualifier = self.qualifier.clone();
        let (value, annotations) = self
            .validate_expression()
            .map_err(|e| ValidateError::Annotation(term.clone(), Box::new(e)))?;
        Ok(Annotation {
            term,
            qualifier,
            value,
            annotations,
        })
    }
}

/// Validate list of annotation elements.
///
/// # Errors
///
/// Returns the first validation error.
pub fn validate_annotations(v: Vec<DeExpressionHost>) -> Result<Vec<Annotation>, ValidateError> {
    v.into_iter()
        .map(DeExpressionHost::validate_annotation)
        .collect()
}

/// 14.2 Element edm:Annotations
#[derive(Debug, Deserialize)]
pub struct DeAnnotations {
    /// 14.2.1 Attribute `Target`
    #[serde(rename = "@Target")]
    pub target: String,
    /// 14.2.2 Attribute `Qualifier`
    #[serde(rename = "@Qualifier")]
    pub qualifier: Option<String>,
    #[serde(rename = "Annotation", default)]
    pub annotations: Vec<DeExpressionHost>,
}

/// Validated edm:Annotations.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotations {
    pub target: String,
    pub qualifier: Option<String>,
    pub annotations: Vec<Annotation>,
}

impl DeAnnotations {
    /// # Errors
    ///
    /// Returns error if any of annotations is invalid.
    pub fn validate(self) -> Result<Annotations, ValidateError> {
        let qualifier = self.qualifier;
        let annotations = validate_annotations(self.annotations)?
            .into_iter()
            .map(|mut a| {
                // Qualifier of the Annotations element applies to all
                // annotations without their own qualifier.
                if a.qualifier.is_none() {
                    a.qualifier.clone_from(&qualifier);
                }
                a
            })
            .collect();
        Ok(Annotations {
            target: self.target,
            qualifier,
            annotations,
        })
    }
}

/// 14.1 Element edm:Term
#[derive(Debug, Deserialize)]
pub struct DeTerm {
    /// 14.1.1 Attribute `Name`
    #[serde(rename = "@Name")]
    pub name: SimpleIdentifier,
    /// 14.1.2 Attribute `Type`
    #[serde(rename = "@Type")]
    pub ttype: String,
    /// 14.1.3 Attribute `BaseTerm`
    #[serde(rename = "@BaseTerm")]
    pub base_term: Option<String>,
    /// 14.1.4 Attribute `DefaultValue`
    #[serde(rename = "@DefaultValue")]
    pub default_value: Option<String>,
    /// 14.1.5 Attribute `AppliesTo`
    #[serde(rename = "@AppliesTo")]
    pub applies_to: Option<String>,
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

/// Validated edm:Term.
#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    pub name: SimpleIdentifier,
    pub ttype: String,
    pub base_term: Option<String>,
    pub default_value: Option<String>,
    /// Symbolic values of `AppliesTo` (`EntityType`, `Property`, ...).
    pub applies_to: Vec<String>,
    pub nullable: Option<bool>,
    pub facets: RawFacets,
    pub annotations: Vec<Annotation>,
}

impl DeTerm {
    /// # Errors
    ///
    /// Returns error if any of annotations is invalid.
    pub fn validate(self) -> Result<Term, ValidateError> {
        Ok(Term {
            name: self.name,
            ttype: self.ttype,
            base_term: self.base_term,
            default_value: self.default_value,
            applies_to: self
                .applies_to
                .map(|v| v.split_whitespace().map(Into::into).collect())
                .unwrap_or_default(),
            nullable: self.nullable,
            facets: RawFacets {
                max_length: self.max_length,
                precision: self.precision,
                scale: self.scale,
                srid: self.srid,
                unicode: None,
            },
            annotations: validate_annotations(self.annotations)?,
        })
    }
}
