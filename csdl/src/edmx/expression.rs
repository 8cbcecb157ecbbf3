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

//! Annotation expressions.
//!
//! Expressions can be written as attributes of the hosting element
//! (`<Annotation Term="Core.Description" String="..."/>`) or as child
//! elements (`<Annotation Term="..."><String>...</String></Annotation>`).
//! Both forms are folded into [`Expression`].

use crate::edmx::annotation::Annotation;
use crate::edmx::ValidateError;
use serde::Deserialize;

/// Element that hosts an expression: edm:Annotation, edm:PropertyValue
/// and edm:LabeledElement. The hosts differ only in the naming
/// attribute, so they share the deserialization structure.
#[derive(Debug, Default, Deserialize)]
pub struct DeExpressionHost {
    /// 14.3.1 Attribute `Term` of edm:Annotation
    #[serde(rename = "@Term")]
    pub term: Option<String>,
    /// 14.3.2 Attribute `Qualifier` of edm:Annotation
    #[serde(rename = "@Qualifier")]
    pub qualifier: Option<String>,
    /// 14.5.14.2 Attribute `Property` of edm:PropertyValue
    #[serde(rename = "@Property")]
    pub property: Option<String>,
    /// 14.5.8.1 Attribute `Name` of edm:LabeledElement
    #[serde(rename = "@Name")]
    pub name: Option<String>,
    #[serde(rename = "@Binary")]
    pub binary: Option<String>,
    #[serde(rename = "@Bool")]
    pub bool_value: Option<String>,
    #[serde(rename = "@Date")]
    pub date: Option<String>,
    #[serde(rename = "@DateTimeOffset")]
    pub date_time_offset: Option<String>,
    #[serde(rename = "@Decimal")]
    pub decimal: Option<String>,
    #[serde(rename = "@Duration")]
    pub duration: Option<String>,
    #[serde(rename = "@EnumMember")]
    pub enum_member: Option<String>,
    #[serde(rename = "@Float")]
    pub float: Option<String>,
    #[serde(rename = "@Guid")]
    pub guid: Option<String>,
    #[serde(rename = "@Int")]
    pub int: Option<String>,
    #[serde(rename = "@String")]
    pub string: Option<String>,
    #[serde(rename = "@TimeOfDay")]
    pub time_of_day: Option<String>,
    #[serde(rename = "@Path")]
    pub path: Option<String>,
    #[serde(rename = "@PropertyPath")]
    pub property_path: Option<String>,
    #[serde(rename = "@NavigationPropertyPath")]
    pub navigation_property_path: Option<String>,
    #[serde(rename = "@AnnotationPath")]
    pub annotation_path: Option<String>,
    /// Child expression and annotations.
    #[serde(rename = "$value", default)]
    pub items: Vec<DeExpressionItem>,
}

/// Child element of an expression host or of a composite expression.
#[derive(Debug, Deserialize)]
pub enum DeExpressionItem {
    Binary(String),
    Bool(String),
    Date(String),
    DateTimeOffset(String),
    Decimal(String),
    Duration(String),
    EnumMember(String),
    Float(String),
    Guid(String),
    Int(String),
    String(String),
    TimeOfDay(String),
    /// 14.5.10 Expression edm:Null
    Null,
    Path(String),
    PropertyPath(String),
    NavigationPropertyPath(String),
    AnnotationPath(String),
    /// 14.5.4 Expression edm:Collection
    Collection(DeCollection),
    /// 14.5.14 Expression edm:Record
    Record(DeRecord),
    /// 14.5.8 Expression edm:LabeledElement
    LabeledElement(Box<DeExpressionHost>),
    /// 14.5.9 Expression edm:LabeledElementReference
    LabeledElementReference(String),
    /// 14.5.3 Expression edm:Apply
    Apply(DeApply),
    /// 14.5.6 Expression edm:If
    If(DeIf),
    /// Annotation of the hosting element.
    Annotation(Box<DeExpressionHost>),
}

#[derive(Debug, Deserialize)]
pub struct DeCollection {
    #[serde(rename = "$value", default)]
    pub items: Vec<DeExpressionItem>,
}

#[derive(Debug, Deserialize)]
pub struct DeRecord {
    /// 14.5.14.1 Attribute `Type`
    #[serde(rename = "@Type")]
    pub rtype: Option<String>,
    #[serde(rename = "$value", default)]
    pub items: Vec<DeRecordItem>,
}

#[derive(Debug, Deserialize)]
pub enum DeRecordItem {
    PropertyValue(Box<DeExpressionHost>),
    Annotation(Box<DeExpressionHost>),
}

#[derive(Debug, Deserialize)]
pub struct DeApply {
    /// 14.5.3.1 Attribute `Function`
    #[serde(rename = "@Function")]
    pub function: String,
    #[serde(rename = "$value", default)]
    pub items: Vec<DeExpressionItem>,
}

#[derive(Debug, Deserialize)]
pub struct DeIf {
    #[serde(rename = "$value", default)]
    pub items: Vec<DeExpressionItem>,
}

/// Kind of the constant expression (14.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstantKind {
    Binary,
    Bool,
    Date,
    DateTimeOffset,
    Decimal,
    Duration,
    EnumMember,
    Float,
    Guid,
    Int,
    String,
    TimeOfDay,
}

/// Kind of the path expression (14.5.12, 14.5.13, 14.5.11, 14.5.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathKind {
    Path,
    PropertyPath,
    NavigationPropertyPath,
    AnnotationPath,
}

/// Validated expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Constant(ConstantKind, String),
    Null,
    Path(PathKind, String),
    Collection(Vec<Expression>),
    Record(Record),
    LabeledElement(Box<LabeledElement>),
    LabeledElementReference(String),
    Apply(Apply),
    If(Box<IfExpression>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub rtype: Option<String>,
    pub properties: Vec<PropertyValue>,
    pub annotations: Vec<Annotation>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyValue {
    pub property: String,
    pub value: Expression,
    pub annotations: Vec<Annotation>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabeledElement {
    pub name: String,
    pub value: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Apply {
    pub function: String,
    pub arguments: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfExpression {
    pub condition: Expression,
    pub then: Expression,
    pub otherwise: Expression,
}

impl DeExpressionHost {
    /// Split the host into its single expression (if any) and the
    /// annotations of the host.
    ///
    /// # Errors
    ///
    /// - `ValidateError::TooManyExpressions` if more than one
    ///   expression is specified.
    /// - Any error of nested expressions.
    pub fn validate_expression(
        self,
    ) -> Result<(Option<Expression>, Vec<Annotation>), ValidateError> {
        let attributes = [
            self.binary.map(|v| Expression::Constant(ConstantKind::Binary, v)),
            self.bool_value.map(|v| Expression::Constant(ConstantKind::Bool, v)),
            self.date.map(|v| Expression::Constant(ConstantKind::Date, v)),
            self.date_time_offset
                .map(|v| Expression::Constant(ConstantKind::DateTimeOffset, v)),
            self.decimal.map(|v| Expression::Constant(ConstantKind::Decimal, v)),
            self.duration.map(|v| Expression::Constant(ConstantKind::Duration, v)),
            self.enum_member
                .map(|v| Expression::Constant(ConstantKind::EnumMember, v)),
            self.float.map(|v| Expression::Constant(ConstantKind::Float, v)),
            self.guid.map(|v| Expression::Constant(ConstantKind::Guid, v)),
            self.int.map(|v| Expression::Constant(ConstantKind::Int, v)),
            self.string.map(|v| Expression::Constant(ConstantKind::String, v)),
            self.time_of_day
                .map(|v| Expression::Constant(ConstantKind::TimeOfDay, v)),
            self.path.map(|v| Expression::Path(PathKind::Path, v)),
            self.property_path
                .map(|v| Expression::Path(PathKind::PropertyPath, v)),
            self.navigation_property_path
                .map(|v| Expression::Path(PathKind::NavigationPropertyPath, v)),
            self.annotation_path
                .map(|v| Expression::Path(PathKind::AnnotationPath, v)),
        ];
        let (children, annotations) = split_items(self.items)?;
        let mut expressions = attributes.into_iter().flatten().chain(children);
        let expression = expressions.next();
        if expressions.next().is_some() {
            return Err(ValidateError::TooManyExpressions);
        }
        Ok((expression, annotations))
    }

    /// Validate as edm:LabeledElement.
    ///
    /// # Errors
    ///
    /// Returns error if `Name` or the expression is missing.
    pub fn validate_labeled_element(self) -> Result<LabeledElement, ValidateError> {
        let name = self
            .name
            .clone()
            .ok_or(ValidateError::MissingAttribute("Name"))?;
        let (value, _) = self
            .validate_expression()
            .map_err(|e| ValidateError::LabeledElement(name.clone(), Box::new(e)))?;
        let value = value.ok_or_else(|| {
            ValidateError::LabeledElement(name.clone(), Box::new(ValidateError::MissingExpression))
        })?;
        Ok(LabeledElement { name, value })
    }

    /// Validate as edm:PropertyValue.
    ///
    /// # Errors
    ///
    /// Returns error if `Property` or the expression is missing.
    pub fn validate_property_value(self) -> Result<PropertyValue, ValidateError> {
        let property = self
            .property
            .clone()
            .ok_or(ValidateError::MissingAttribute("Property"))?;
        let (value, annotations) = self
            .validate_expression()
            .map_err(|e| ValidateError::PropertyValue(property.clone(), Box::new(e)))?;
        let value = value.ok_or_else(|| {
            ValidateError::PropertyValue(property.clone(), Box::new(ValidateError::MissingExpression))
        })?;
        Ok(PropertyValue {
            property,
            value,
            annotations,
        })
    }
}

fn split_items(
    items: Vec<DeExpressionItem>,
) -> Result<(Vec<Expression>, Vec<Annotation>), ValidateError> {
    items.into_iter().try_fold(
        (Vec::new(), Vec::new()),
        |(mut exprs, mut anns), item| {
            match item {
                DeExpressionItem::Annotation(v) => anns.push(v.validate_annotation()?),
                item => exprs.push(item.validate()?),
            }
            Ok((exprs, anns))
        },
    )
}

fn only_expressions(items: Vec<DeExpressionItem>) -> Result<Vec<Expression>, ValidateError> {
    split_items(items).map(|(exprs, _)| exprs)
}

impl DeExpressionItem {
    /// Validate child element as an expression.
    ///
    /// # Errors
    ///
    /// Returns error if a nested expression is invalid. Annotations are
    /// not expressions and produce `ValidateError::MissingExpression`.
    pub fn validate(self) -> Result<Expression, ValidateError> {
        let constant = |kind, v| Ok(Expression::Constant(kind, v));
        match self {
            Self::Binary(v) => constant(ConstantKind::Binary, v),
            Self::Bool(v) => constant(ConstantKind::Bool, v),
            Self::Date(v) => constant(ConstantKind::Date, v),
            Self::DateTimeOffset(v) => constant(ConstantKind::DateTimeOffset, v),
            Self::Decimal(v) => constant(ConstantKind::Decimal, v),
            Self::Duration(v) => constant(ConstantKind::Duration, v),
            Self::EnumMember(v) => constant(ConstantKind::EnumMember, v),
            Self::Float(v) => constant(ConstantKind::Float, v),
            Self::Guid(v) => constant(ConstantKind::Guid, v),
            Self::Int(v) => constant(ConstantKind::Int, v),
            Self::String(v) => constant(ConstantKind::String, v),
            Self::TimeOfDay(v) => constant(ConstantKind::TimeOfDay, v),
            Self::Null => Ok(Expression::Null),
            Self::Path(v) => Ok(Expression::Path(PathKind::Path, v)),
            Self::PropertyPath(v) => Ok(Expression::Path(PathKind::PropertyPath, v)),
            Self::NavigationPropertyPath(v) => {
                Ok(Expression::Path(PathKind::NavigationPropertyPath, v))
            }
            Self::AnnotationPath(v) => Ok(Expression::Path(PathKind::AnnotationPath, v)),
            Self::Collection(v) => only_expressions(v.items).map(Expression::Collection),
            Self::Record(v) => v.validate().map(Expression::Record),
            Self::LabeledElement(v) => v
                .validate_labeled_element()
                .map(|v| Expression::LabeledElement(Box::new(v))),
            Self::LabeledElementReference(v) => Ok(Expression::LabeledElementReference(v)),
            Self::Apply(v) => Ok(Expression::Apply(Apply {
                function: v.function,
                arguments: only_expressions(v.items)?,
            })),
            Self::If(v) => {
                let operands = only_expressions(v.items)?;
                let count = operands.len();
                match <[Expression; 3]>::try_from(operands) {
                    Ok([condition, then, otherwise]) => Ok(Expression::If(Box::new(IfExpression {
                        condition,
                        then,
                        otherwise,
                    }))),
                    Err(_) => Err(ValidateError::WrongIfOperands(count)),
                }
            }
            Self::Annotation(_) => Err(ValidateError::MissingExpression),
        }
    }
}

impl DeRecord {
    /// # Errors
    ///
    /// Returns error if any of property values is invalid.
    pub fn validate(self) -> Result<Record, ValidateError> {
        let (properties, annotations) = self.items.into_iter().try_fold(
            (Vec::new(), Vec::new()),
            |(mut ps, mut anns), item| {
                match item {
                    DeRecordItem::PropertyValue(v) => ps.push(v.validate_property_value()?),
                    DeRecordItem::Annotation(v) => anns.push(v.validate_annotation()?),
                }
                Ok::<_, ValidateError>((ps, anns))
            },
        )?;
        Ok(Record {
            rtype: self.rtype,
            properties,
            annotations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host(xml: &str) -> DeExpressionHost {
        quick_xml::de::from_str(xml).unwrap()
    }

    #[test]
    fn test_attribute_form() {
        let (expr, anns) = host(r#"<Annotation Term="Core.Description" String="Customer"/>"#)
            .validate_expression()
            .unwrap();
        assert_eq!(
            expr,
            Some(Expression::Constant(ConstantKind::String, "Customer".into()))
        );
        assert!(anns.is_empty());
    }

    #[test]
    fn test_element_form() {
        let (expr, _) = host(
            r#"<Annotation Term="Core.Example">
                 <Collection>
                   <Int>1</Int>
                   <Null/>
                   <Path>Address/City</Path>
                 </Collection>
               </Annotation>"#,
        )
        .validate_expression()
        .unwrap();
        assert_eq!(
            expr,
            Some(Expression::Collection(vec![
                Expression::Constant(ConstantKind::Int, "1".into()),
                Expression::Null,
                Expression::Path(PathKind::Path, "Address/City".into()),
            ]))
        );
    }

    #[test]
    fn test_record() {
        let (expr, _) = host(
            r#"<Annotation Term="Core.Revision">
                 <Record Type="Core.RevisionType">
                   <PropertyValue Property="Version" String="1.2"/>
                   <PropertyValue Property="Kind">
                     <EnumMember>Core.RevisionKind/Deprecated</EnumMember>
                   </PropertyValue>
                 </Record>
               </Annotation>"#,
        )
        .validate_expression()
        .unwrap();
        let Some(Expression::Record(record)) = expr else {
            panic!("record expected");
        };
        assert_eq!(record.rtype.as_deref(), Some("Core.RevisionType"));
        assert_eq!(record.properties.len(), 2);
        assert_eq!(record.properties[1].property, "Kind");
        assert_eq!(
            record.properties[1].value,
            Expression::Constant(ConstantKind::EnumMember, "Core.RevisionKind/Deprecated".into())
        );
    }

    #[test]
    fn test_labeled_element_and_if() {
        let (expr, _) = host(
            r#"<Annotation Term="Ns.Term">
                 <If>
                   <Bool>true</Bool>
                   <LabeledElement Name="Answer" Int="42"/>
                   <LabeledElementReference>Ns.Answer</LabeledElementReference>
                 </If>
               </Annotation>"#,
        )
        .validate_expression()
        .unwrap();
        let Some(Expression::If(cond)) = expr else {
            panic!("if expected");
        };
        assert_eq!(
            cond.then,
            Expression::LabeledElement(Box::new(LabeledElement {
                name: "Answer".into(),
                value: Expression::Constant(ConstantKind::Int, "42".into()),
            }))
        );
        assert_eq!(
            cond.otherwise,
            Expression::LabeledElementReference("Ns.Answer".into())
        );
    }

    #[test]
    fn test_invalid_hosts() {
        assert!(matches!(
            host(r#"<Annotation Term="T" String="a" Int="1"/>"#).validate_expression(),
            Err(ValidateError::TooManyExpressions)
        ));
        assert!(matches!(
            host(r#"<Annotation Term="T"><If><Bool>true</Bool></If></Annotation>"#)
                .validate_expression(),
            Err(ValidateError::WrongIfOperands(1))
        ));
        assert!(matches!(
            host(r#"<LabeledElement Name="L"/>"#).validate_labeled_element(),
            Err(ValidateError::LabeledElement(_, _))
        ));
    }
}
