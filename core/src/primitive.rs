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

//! Primitive types of the `Edm` namespace.
//!
//! OASIS OData 4.01 CSDL, 4.4 Primitive Types.

use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::str::FromStr;

/// Namespace of all primitive types.
pub const EDM_NAMESPACE: &str = "Edm";

/// Kind of the primitive type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimitiveKind {
    Binary,
    Boolean,
    Byte,
    Date,
    DateTimeOffset,
    Decimal,
    Double,
    Duration,
    Guid,
    Int16,
    Int32,
    Int64,
    SByte,
    Single,
    Stream,
    String,
    TimeOfDay,
    Geography,
    GeographyPoint,
    GeographyLineString,
    GeographyPolygon,
    GeographyMultiPoint,
    GeographyMultiLineString,
    GeographyMultiPolygon,
    GeographyCollection,
    Geometry,
    GeometryPoint,
    GeometryLineString,
    GeometryPolygon,
    GeometryMultiPoint,
    GeometryMultiLineString,
    GeometryMultiPolygon,
    GeometryCollection,
}

const ALL: [PrimitiveKind; 33] = [
    PrimitiveKind::Binary,
    PrimitiveKind::Boolean,
    PrimitiveKind::Byte,
    PrimitiveKind::Date,
    PrimitiveKind::DateTimeOffset,
    PrimitiveKind::Decimal,
    PrimitiveKind::Double,
    PrimitiveKind::Duration,
    PrimitiveKind::Guid,
    PrimitiveKind::Int16,
    PrimitiveKind::Int32,
    PrimitiveKind::Int64,
    PrimitiveKind::SByte,
    PrimitiveKind::Single,
    PrimitiveKind::Stream,
    PrimitiveKind::String,
    PrimitiveKind::TimeOfDay,
    PrimitiveKind::Geography,
    PrimitiveKind::GeographyPoint,
    PrimitiveKind::GeographyLineString,
    PrimitiveKind::GeographyPolygon,
    PrimitiveKind::GeographyMultiPoint,
    PrimitiveKind::GeographyMultiLineString,
    PrimitiveKind::GeographyMultiPolygon,
    PrimitiveKind::GeographyCollection,
    PrimitiveKind::Geometry,
    PrimitiveKind::GeometryPoint,
    PrimitiveKind::GeometryLineString,
    PrimitiveKind::GeometryPolygon,
    PrimitiveKind::GeometryMultiPoint,
    PrimitiveKind::GeometryMultiLineString,
    PrimitiveKind::GeometryMultiPolygon,
    PrimitiveKind::GeometryCollection,
];

impl PrimitiveKind {
    /// All primitive kinds in declaration order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &ALL
    }

    /// Name of the type without namespace (`Int32`).
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Binary => "Binary",
            Self::Boolean => "Boolean",
            Self::Byte => "Byte",
            Self::Date => "Date",
            Self::DateTimeOffset => "DateTimeOffset",
            Self::Decimal => "Decimal",
            Self::Double => "Double",
            Self::Duration => "Duration",
            Self::Guid => "Guid",
            Self::Int16 => "Int16",
            Self::Int32 => "Int32",
            Self::Int64 => "Int64",
            Self::SByte => "SByte",
            Self::Single => "Single",
            Self::Stream => "Stream",
            Self::String => "String",
            Self::TimeOfDay => "TimeOfDay",
            Self::Geography => "Geography",
            Self::GeographyPoint => "GeographyPoint",
            Self::GeographyLineString => "GeographyLineString",
            Self::GeographyPolygon => "GeographyPolygon",
            Self::GeographyMultiPoint => "GeographyMultiPoint",
            Self::GeographyMultiLineString => "GeographyMultiLineString",
            Self::GeographyMultiPolygon => "GeographyMultiPolygon",
            Self::GeographyCollection => "GeographyCollection",
            Self::Geometry => "Geometry",
            Self::GeometryPoint => "GeometryPoint",
            Self::GeometryLineString => "GeometryLineString",
            Self::GeometryPolygon => "GeometryPolygon",
            Self::GeometryMultiPoint => "GeometryMultiPoint",
            Self::GeometryMultiLineString => "GeometryMultiLineString",
            Self::GeometryMultiPolygon => "GeometryMultiPolygon",
            Self::GeometryCollection => "GeometryCollection",
        }
    }

    /// Find primitive kind by qualified name (`Edm.Int32`).
    #[must_use]
    pub fn from_qualified_name(name: &str) -> Option<Self> {
        name.strip_prefix(EDM_NAMESPACE)
            .and_then(|rest| rest.strip_prefix('.'))
            .and_then(Self::from_name)
    }

    /// Find primitive kind by unqualified name (`Int32`).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        ALL.iter().copied().find(|k| k.name() == name)
    }

    /// Integral types that can be used as underlying types of enums.
    #[must_use]
    pub const fn is_integral(self) -> bool {
        matches!(
            self,
            Self::Byte | Self::SByte | Self::Int16 | Self::Int32 | Self::Int64
        )
    }

    /// Any numeric type.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        self.is_integral() || matches!(self, Self::Single | Self::Double | Self::Decimal)
    }

    /// Range of the integral type. `None` for non-integral types.
    #[must_use]
    pub const fn integral_range(self) -> Option<(i64, i64)> {
        match self {
            Self::Byte => Some((u8::MIN as i64, u8::MAX as i64)),
            Self::SByte => Some((i8::MIN as i64, i8::MAX as i64)),
            Self::Int16 => Some((i16::MIN as i64, i16::MAX as i64)),
            Self::Int32 => Some((i32::MIN as i64, i32::MAX as i64)),
            Self::Int64 => Some((i64::MIN, i64::MAX)),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_geography(self) -> bool {
        matches!(
            self,
            Self::Geography
                | Self::GeographyPoint
                | Self::GeographyLineString
                | Self::GeographyPolygon
                | Self::GeographyMultiPoint
                | Self::GeographyMultiLineString
                | Self::GeographyMultiPolygon
                | Self::GeographyCollection
        )
    }

    #[must_use]
    pub const fn is_geometry(self) -> bool {
        matches!(
            self,
            Self::Geometry
                | Self::GeometryPoint
                | Self::GeometryLineString
                | Self::GeometryPolygon
                | Self::GeometryMultiPoint
                | Self::GeometryMultiLineString
                | Self::GeometryMultiPolygon
                | Self::GeometryCollection
        )
    }

    #[must_use]
    pub const fn is_spatial(self) -> bool {
        self.is_geography() || self.is_geometry()
    }

    /// Default SRID of spatial types: 4326 for geography, 0 for geometry.
    #[must_use]
    pub const fn default_srid(self) -> Option<u32> {
        if self.is_geography() {
            Some(4326)
        } else if self.is_geometry() {
            Some(0)
        } else {
            None
        }
    }
}

impl Display for PrimitiveKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{EDM_NAMESPACE}.{}", self.name())
    }
}

/// Error returned when string is not a name of a primitive type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPrimitiveType(pub String);

impl Display for UnknownPrimitiveType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "unknown primitive type: {}", self.0)
    }
}

impl std::error::Error for UnknownPrimitiveType {}

impl FromStr for PrimitiveKind {
    type Err = UnknownPrimitiveType;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_qualified_name(s).ok_or_else(|| UnknownPrimitiveType(s.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualified_names() {
        for kind in PrimitiveKind::all() {
            let name = kind.to_string();
            assert_eq!(name.parse::<PrimitiveKind>().unwrap(), *kind);
        }
        assert!("Int32".parse::<PrimitiveKind>().is_err());
        assert!("Edm.Int128".parse::<PrimitiveKind>().is_err());
        assert!("Edm.".parse::<PrimitiveKind>().is_err());
        assert!("EdmInt32".parse::<PrimitiveKind>().is_err());
    }

    #[test]
    fn test_classification() {
        assert!(PrimitiveKind::Int64.is_integral());
        assert!(!PrimitiveKind::Decimal.is_integral());
        assert!(PrimitiveKind::Decimal.is_numeric());
        assert!(PrimitiveKind::GeographyPoint.is_spatial());
        assert!(!PrimitiveKind::GeographyPoint.is_geometry());
        assert_eq!(PrimitiveKind::Geography.default_srid(), Some(4326));
        assert_eq!(PrimitiveKind::GeometryPolygon.default_srid(), Some(0));
        assert_eq!(PrimitiveKind::String.default_srid(), None);
        assert_eq!(PrimitiveKind::SByte.integral_range(), Some((-128, 127)));
    }
}
