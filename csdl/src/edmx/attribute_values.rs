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

//! Types defined in 17 Attribute Values

use nv_odata_core::primitive::EDM_NAMESPACE;
use serde::de::Error as DeError;
use serde::de::Visitor;
use serde::Deserialize;
use serde::Deserializer;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    InvalidSimpleIdentifier(String),
    InvalidQualifiedIdentifier(String),
    InvalidTypeName(String),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::InvalidSimpleIdentifier(id) => write!(f, "invalid simple identifier {id}"),
            Self::InvalidQualifiedIdentifier(id) => write!(f, "invalid qualified identifier {id}"),
            Self::InvalidTypeName(id) => write!(f, "invalid type name {id}"),
        }
    }
}

impl std::error::Error for Error {}

macro_rules! deserialize_from_str {
    ($ty:ty, $expecting:literal) => {
        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(de: D) -> Result<Self, D::Error> {
                struct FromStrVisitor {}
                impl Visitor<'_> for FromStrVisitor {
                    type Value = $ty;

                    fn expecting(&self, formatter: &mut Formatter) -> FmtResult {
                        formatter.write_str($expecting)
                    }
                    fn visit_str<E: DeError>(self, value: &str) -> Result<Self::Value, E> {
                        value.parse().map_err(DeError::custom)
                    }
                }

                de.deserialize_string(FromStrVisitor {})
            }
        }
    };
}

/// 17.1 `Namespace`
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Namespace {
    pub ids: Vec<SimpleIdentifier>,
}

impl Namespace {
    #[must_use]
    pub fn is_edm(&self) -> bool {
        self.ids.len() == 1 && self.ids[0].inner() == EDM_NAMESPACE
    }
}

impl FromStr for Namespace {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self {
            ids: s
                .split('.')
                .map(SimpleIdentifier::from_str)
                .collect::<Result<Vec<_>, _>>()?,
        })
    }
}

impl Display for Namespace {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let mut iter = self.ids.iter();
        if let Some(v) = iter.next() {
            v.fmt(f)?;
        }
        iter.try_for_each(|v| write!(f, ".{v}"))
    }
}

deserialize_from_str!(Namespace, "Namespace string");

/// 17.2 `SimpleIdentifier`
#[derive(Clone, Debug, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct SimpleIdentifier(String);

impl SimpleIdentifier {
    #[must_use]
    pub const fn inner(&self) -> &String {
        &self.0
    }
}

impl Display for SimpleIdentifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        self.0.fmt(f)
    }
}

impl AsRef<str> for SimpleIdentifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for SimpleIdentifier {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl FromStr for SimpleIdentifier {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();

        // Starts with a letter or underscore, followed by letters,
        // underscores or digits. Max length (128) is not checked.
        let valid_first = chars
            .next()
            .is_some_and(|first| first.is_alphabetic() || first == '_');
        if valid_first && chars.all(|c| c.is_alphanumeric() || c == '_') {
            Ok(Self(s.into()))
        } else {
            Err(Error::InvalidSimpleIdentifier(s.into()))
        }
    }
}

deserialize_from_str!(SimpleIdentifier, "SimpleIdentifier string");

/// 17.3 `QualifiedName`
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    pub namespace: Namespace,
    pub name: SimpleIdentifier,
}

impl FromStr for QualifiedName {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut ids = s
            .split('.')
            .map(SimpleIdentifier::from_str)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| Error::InvalidQualifiedIdentifier(s.into()))?;
        let name = ids
            .pop()
            .ok_or_else(|| Error::InvalidQualifiedIdentifier(s.into()))?;
        if ids.is_empty() {
            return Err(Error::InvalidQualifiedIdentifier(s.into()));
        }
        Ok(Self {
            namespace: Namespace { ids },
            name,
        })
    }
}

impl Display for QualifiedName {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}.{}", self.namespace, self.name)
    }
}

deserialize_from_str!(QualifiedName, "QualifiedName string");

/// 17.4 `TypeName`
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeName {
    One(QualifiedName),
    CollectionOf(QualifiedName),
}

impl TypeName {
    #[must_use]
    pub const fn qualified_name(&self) -> &QualifiedName {
        match self {
            Self::One(v) | Self::CollectionOf(v) => v,
        }
    }

    #[must_use]
    pub const fn is_collection(&self) -> bool {
        matches!(self, Self::CollectionOf(_))
    }
}

impl FromStr for TypeName {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const COLLECTION_PREFIX: &str = "Collection(";
        const COLLECTION_SUFFIX: &str = ")";
        let invalid = |_| Error::InvalidTypeName(s.into());
        match s
            .strip_prefix(COLLECTION_PREFIX)
            .and_then(|rest| rest.strip_suffix(COLLECTION_SUFFIX))
        {
            Some(element) => element.parse().map(Self::CollectionOf).map_err(invalid),
            None => s.parse().map(Self::One).map_err(invalid),
        }
    }
}

impl Display for TypeName {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::One(v) => v.fmt(f),
            Self::CollectionOf(v) => write!(f, "Collection({v})"),
        }
    }
}

deserialize_from_str!(TypeName, "type name string");

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::from_str as json_from_str;

    #[test]
    fn test_simple_identifier() {
        for case in ["Name", "_name", "Name_1", "Имя", "a"] {
            assert!(
                SimpleIdentifier::from_str(case).is_ok(),
                "must be valid: {case}"
            );
        }
        for case in ["", "1Name", "Name-1", "Name.Sub", "Name x", "$Name"] {
            assert!(
                SimpleIdentifier::from_str(case).is_err(),
                "must be invalid: {case}"
            );
        }
    }

    #[test]
    fn test_namespace() {
        let ns: Namespace = "Org.OData.Core.V1".parse().unwrap();
        assert_eq!(ns.ids.len(), 4);
        assert_eq!(ns.to_string(), "Org.OData.Core.V1");
        assert!(!ns.is_edm());
        assert!("Edm".parse::<Namespace>().unwrap().is_edm());
        assert!("Edm.Sub".parse::<Namespace>().map(|ns| !ns.is_edm()).unwrap());
        for case in ["", ".Ns", "Ns.", "Ns..Sub"] {
            assert!(case.parse::<Namespace>().is_err(), "must be invalid: {case}");
        }
    }

    #[test]
    fn test_qualified_name() {
        let qn: QualifiedName = "Sales.Model.Customer".parse().unwrap();
        assert_eq!(qn.name.inner(), "Customer");
        assert_eq!(qn.namespace.to_string(), "Sales.Model");
        assert_eq!(qn.to_string(), "Sales.Model.Customer");
        assert_eq!(
            "Customer".parse::<QualifiedName>(),
            Err(Error::InvalidQualifiedIdentifier("Customer".into()))
        );
        assert!("Sales..Customer".parse::<QualifiedName>().is_err());
    }

    #[test]
    fn test_type_name() {
        let one: TypeName = "Edm.String".parse().unwrap();
        assert!(!one.is_collection());
        assert_eq!(one.qualified_name().name.inner(), "String");

        let many: TypeName = "Collection(Sales.Order)".parse().unwrap();
        assert!(many.is_collection());
        assert_eq!(many.to_string(), "Collection(Sales.Order)");

        for case in ["Collection()", "Collection(Edm.String", "Collection Edm.String", "Edm/String"] {
            assert_eq!(
                case.parse::<TypeName>(),
                Err(Error::InvalidTypeName(case.into()))
            );
        }
    }

    #[test]
    fn test_deserialize() {
        let tn: TypeName = json_from_str(r#""Collection(Edm.Int32)""#).unwrap();
        assert!(tn.is_collection());
        assert!(json_from_str::<SimpleIdentifier>(r#""Bad-Name""#).is_err());
    }
}
