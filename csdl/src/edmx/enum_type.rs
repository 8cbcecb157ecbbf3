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

/// 10.1 Element edm:EnumType
#[derive(Debug, Deserialize)]
pub struct DeEnumType {
    /// 10.1.1 Attribute `Name`
    #[serde(rename = "@Name")]
    pub name: SimpleIdentifier,
    /// 10.1.2 Attribute `UnderlyingType`
    #[serde(rename = "@UnderlyingType")]
    pub underlying_type: Option<String>,
    /// 10.1.3 Attribute `IsFlags`
    #[serde(rename = "@IsFlags")]
    pub is_flags: Option<bool>,
    /// Child elements of `EnumType`.
    #[serde(rename = "$value", default)]
    pub items: Vec<DeEnumTypeItem>,
}

#[derive(Debug, Deserialize)]
pub enum DeEnumTypeItem {
    /// 10.2 Element edm:Member
    Member(DeEnumMember),
    Annotation(Box<DeExpressionHost>),
}

/// 10.2 Element edm:Member
#[derive(Debug, Deserialize)]
pub struct DeEnumMember {
    /// 10.2.1 Attribute `Name`
    #[serde(rename = "@Name")]
    pub name: SimpleIdentifier,
    /// 10.2.2 Attribute `Value`
    #[serde(rename = "@Value")]
    pub value: Option<String>,
    #[serde(rename = "Annotation", default)]
    pub annotations: Vec<DeExpressionHost>,
}

/// Validated edm:Member. The value is kept as text: it is assigned and
/// range-checked by the semantics layer.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumMember {
    pub name: SimpleIdentifier,
    pub value: Option<String>,
    pub annotations: Vec<Annotation>,
}

/// Validated edm:EnumType.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumType {
    pub name: SimpleIdentifier,
    pub underlying_type: Option<String>,
    pub is_flags: bool,
    pub members: Vec<EnumMember>,
    pub annotations: Vec<Annotation>,
}

impl DeEnumType {
    /// # Errors
    ///
    /// Returns error if any of annotations is invalid.
    pub fn validate(self) -> Result<EnumType, ValidateError> {
        let (members, annotations) =
            self.items
                .into_iter()
                .fold((Vec::new(), Vec::new()), |(mut ms, mut anns), v| {
                    match v {
                        DeEnumTypeItem::Member(v) => ms.push(v),
                        DeEnumTypeItem::Annotation(v) => anns.push(*v),
                    }
                    (ms, anns)
                });
        Ok(EnumType {
            name: self.name,
            underlying_type: self.underlying_type,
            is_flags: self.is_flags.unwrap_or(false),
            members: members
                .into_iter()
                .map(|m| {
                    Ok::<_, ValidateError>(EnumMember {
                        name: m.name,
                        value: m.value,
                        annotations: validate_annotations(m.annotations)?,
                    })
                })
                .collect::<Result<Vec<_>, ValidateError>>()?,
            annotations: validate_annotations(annotations)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_type() {
        let et: DeEnumType = quick_xml::de::from_str(
            r#"<EnumType Name="Color" UnderlyingType="Edm.Byte" IsFlags="true">
                 <Member Name="Red" Value="1"/>
                 <Member Name="Green">
                   <Annotation Term="Core.Description" String="Grass"/>
                 </Member>
                 <Annotation Term="Core.Description" String="Colors"/>
               </EnumType>"#,
        )
        .unwrap();
        let et = et.validate().unwrap();
        assert_eq!(et.underlying_type.as_deref(), Some("Edm.Byte"));
        assert!(et.is_flags);
        assert_eq!(et.members.len(), 2);
        assert_eq!(et.members[0].value.as_deref(), Some("1"));
        assert_eq!(et.members[1].value, None);
        assert_eq!(et.members[1].annotations.len(), 1);
        assert_eq!(et.annotations.len(), 1);
    }
}
