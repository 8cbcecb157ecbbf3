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

//! Values of EDM types.
//!
//! Values are produced by URI literal parsing and by evaluation of
//! constant annotation expressions. They do not refer back to the model:
//! enum and structured values carry the qualified name of their type.

use crate::edm_date_time_offset::EdmDateTimeOffset;
use crate::edm_duration::EdmDuration;
use crate::primitive::PrimitiveKind;
use crate::spatial::SpatialValue;
use rust_decimal::Decimal;
use time::Date;
use time::Time;
use uuid::Uuid;

/// Value of a primitive type.
#[derive(Debug, Clone, PartialEq)]
pub enum PrimitiveValue {
    Binary(Vec<u8>),
    Boolean(bool),
    Byte(u8),
    SByte(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Single(f32),
    Double(f64),
    Decimal(Decimal),
    Guid(Uuid),
    Date(Date),
    DateTimeOffset(EdmDateTimeOffset),
    Duration(EdmDuration),
    TimeOfDay(Time),
    String(String),
    Geography(SpatialValue),
    Geometry(SpatialValue),
}

impl PrimitiveValue {
    /// Kind of the value. Spatial values report their most specific
    /// kind (`Edm.GeographyPoint`).
    #[must_use]
    pub const fn kind(&self) -> PrimitiveKind {
        match self {
            Self::Binary(_) => PrimitiveKind::Binary,
            Self::Boolean(_) => PrimitiveKind::Boolean,
            Self::Byte(_) => PrimitiveKind::Byte,
            Self::SByte(_) => PrimitiveKind::SByte,
            Self::Int16(_) => PrimitiveKind::Int16,
            Self::Int32(_) => PrimitiveKind::Int32,
            Self::Int64(_) => PrimitiveKind::Int64,
            Self::Single(_) => PrimitiveKind::Single,
            Self::Double(_) => PrimitiveKind::Double,
            Self::Decimal(_) => PrimitiveKind::Decimal,
            Self::Guid(_) => PrimitiveKind::Guid,
            Self::Date(_) => PrimitiveKind::Date,
            Self::DateTimeOffset(_) => PrimitiveKind::DateTimeOffset,
            Self::Duration(_) => PrimitiveKind::Duration,
            Self::TimeOfDay(_) => PrimitiveKind::TimeOfDay,
            Self::String(_) => PrimitiveKind::String,
            Self::Geography(v) => v.shape.primitive_kind(true),
            Self::Geometry(v) => v.shape.primitive_kind(false),
        }
    }

    /// Integral value widened to `i64`.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Byte(v) => Some(i64::from(*v)),
            Self::SByte(v) => Some(i64::from(*v)),
            Self::Int16(v) => Some(i64::from(*v)),
            Self::Int32(v) => Some(i64::from(*v)),
            Self::Int64(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

/// Value of an enum type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    /// Qualified name of the enum type.
    pub type_name: String,
    /// Numeric value.
    pub value: i64,
    /// Members that form the value; empty if the value does not match
    /// declared members.
    pub member_names: Vec<String>,
}

/// Property of a structured value.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyValue {
    pub name: String,
    pub value: Value,
}

/// Value of an entity or complex type.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredValue {
    /// Qualified name of the type if known.
    pub type_name: Option<String>,
    pub properties: Vec<PropertyValue>,
}

impl StructuredValue {
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties
            .iter()
            .find(|p| p.name == name)
            .map(|p| &p.value)
    }
}

/// Value of any EDM type.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Primitive(PrimitiveValue),
    Enum(EnumValue),
    Collection(Vec<Value>),
    Structured(StructuredValue),
}

/// Kind of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Primitive,
    Enum,
    Collection,
    Structured,
}

impl Value {
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::Primitive(_) => ValueKind::Primitive,
            Self::Enum(_) => ValueKind::Enum,
            Self::Collection(_) => ValueKind::Collection,
            Self::Structured(_) => ValueKind::Structured,
        }
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub const fn as_primitive(&self) -> Option<&PrimitiveValue> {
        match self {
            Self::Primitive(v) => Some(v),
            _ => None,
        }
    }
}

impl From<PrimitiveValue> for Value {
    fn from(v: PrimitiveValue) -> Self {
        Self::Primitive(v)
    }
}

impl From<EnumValue> for Value {
    fn from(v: EnumValue) -> Self {
        Self::Enum(v)
    }
}

impl From<StructuredValue> for Value {
    fn from(v: StructuredValue) -> Self {
        Self::Structured(v)
    }
}

macro_rules! primitive_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for PrimitiveValue {
                fn from(v: $ty) -> Self {
                    Self::$variant(v)
                }
            }

            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Self::Primitive(PrimitiveValue::$variant(v))
                }
            }
        )*
    };
}

primitive_from! {
    bool => Boolean,
    u8 => Byte,
    i8 => SByte,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    f32 => Single,
    f64 => Double,
    Decimal => Decimal,
    Uuid => Guid,
    Date => Date,
    EdmDateTimeOffset => DateTimeOffset,
    EdmDuration => Duration,
    Time => TimeOfDay,
    String => String,
}

impl From<&str> for PrimitiveValue {
    fn from(v: &str) -> Self {
        Self::String(v.into())
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Primitive(PrimitiveValue::String(v.into()))
    }
}
