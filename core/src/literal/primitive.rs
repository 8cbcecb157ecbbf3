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

//! Built-in literal parser.
//!
//! Literal forms are tried in the following order: `null`, binary
//! (`X'..'`, `binary'..'`), `Edm.Guid`, `Edm.Date`, `Edm.DateTimeOffset`,
//! `Edm.Duration`, spatial types, `Edm.TimeOfDay`, then strings, booleans
//! and numbers. Enum targets accept `Ns.Type'Member'`, `'Member'`,
//! `'A,B'` for flags and numeric values.
//!
//! Numeric, format and overflow failures produce
//! [`ParseOutcome::NotApplicable`]. Malformed binary and spatial bodies
//! produce [`ParseOutcome::Error`].

use crate::edm_date_time_offset::EdmDateTimeOffset;
use crate::edm_duration::EdmDuration;
use crate::literal::text;
use crate::literal::LiteralError;
use crate::literal::ParseOutcome;
use crate::literal::UriLiteralParser;
use crate::primitive::PrimitiveKind;
use crate::spatial::SpatialValue;
use crate::type_ref::EnumDefinition;
use crate::type_ref::TypeReference;
use crate::value::EnumValue;
use crate::value::PrimitiveValue;
use crate::value::Value;
use base64::alphabet;
use base64::engine::DecodePaddingMode;
use base64::engine::GeneralPurpose;
use base64::engine::GeneralPurposeConfig;
use base64::Engine as _;
use log::debug;
use rust_decimal::Decimal;
use std::str::FromStr;
use time::Date;
use time::Month;
use time::Time;
use uuid::Uuid;

const DECODE_CONFIG: GeneralPurposeConfig =
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent);
const BASE64_URL: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, DECODE_CONFIG);
const BASE64_STANDARD: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, DECODE_CONFIG);

/// Parser of all literal forms defined by OData for primitive and enum
/// types. Last element of every parser chain.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrimitiveLiteralParser;

impl UriLiteralParser for PrimitiveLiteralParser {
    fn parse(&self, text: &str, target: &TypeReference) -> ParseOutcome {
        parse_literal(text, target)
    }
}

/// Parse `text` as a value of `target`.
#[must_use]
pub fn parse_literal(text: &str, target: &TypeReference) -> ParseOutcome {
    if text == "null" {
        return if target.is_nullable() {
            ParseOutcome::Value(Value::Null)
        } else {
            ParseOutcome::NotApplicable
        };
    }
    if let Some(definition) = target.enum_definition() {
        return parse_enum(text, definition);
    }
    let Some(kind) = target.primitive_kind() else {
        return ParseOutcome::NotApplicable;
    };
    parse_primitive(text, kind, target)
}

fn not_applicable<T>(_: T) -> ParseOutcome {
    ParseOutcome::NotApplicable
}

fn primitive(v: impl Into<PrimitiveValue>) -> ParseOutcome {
    ParseOutcome::Value(Value::Primitive(v.into()))
}

fn parse_primitive(text: &str, kind: PrimitiveKind, target: &TypeReference) -> ParseOutcome {
    if let Some(binary) = parse_binary(text) {
        return match binary {
            Ok(bytes) if kind == PrimitiveKind::Binary => primitive(PrimitiveValue::Binary(bytes)),
            // Binary literal encodes text of a literal of another type.
            Ok(bytes) => String::from_utf8(bytes)
                .map_or(ParseOutcome::NotApplicable, |s| parse_literal(&s, target)),
            Err(err) => ParseOutcome::Error(err),
        };
    }
    match kind {
        PrimitiveKind::Guid => parse_guid(text),
        PrimitiveKind::Date => parse_date(text).map_or(ParseOutcome::NotApplicable, primitive),
        PrimitiveKind::DateTimeOffset => {
            let body = text::prefixed(text, "datetimeoffset").unwrap_or(text);
            EdmDateTimeOffset::from_str(body).map_or_else(not_applicable, primitive)
        }
        PrimitiveKind::Duration => {
            let body = text::prefixed(text, "duration").unwrap_or(text);
            EdmDuration::from_str(body).map_or_else(not_applicable, primitive)
        }
        k if k.is_spatial() => parse_spatial(text, k),
        PrimitiveKind::TimeOfDay => parse_time_of_day(text).map_or(ParseOutcome::NotApplicable, primitive),
        PrimitiveKind::String => text::unquote(text).map_or(ParseOutcome::NotApplicable, primitive),
        _ if text::is_quoted(text) => ParseOutcome::NotApplicable,
        PrimitiveKind::Boolean => {
            if text.eq_ignore_ascii_case("true") {
                primitive(true)
            } else if text.eq_ignore_ascii_case("false") {
                primitive(false)
            } else {
                ParseOutcome::NotApplicable
            }
        }
        PrimitiveKind::Byte => parse_integer::<u8>(text),
        PrimitiveKind::SByte => parse_integer::<i8>(text),
        PrimitiveKind::Int16 => parse_integer::<i16>(text),
        PrimitiveKind::Int32 => parse_integer::<i32>(text),
        PrimitiveKind::Int64 => parse_integer::<i64>(text::strip_suffix_ignore_case(text, 'L')),
        PrimitiveKind::Single => parse_float(text, 'f', f32::INFINITY, f32::NAN),
        PrimitiveKind::Double => parse_float(text, 'd', f64::INFINITY, f64::NAN),
        PrimitiveKind::Decimal => parse_decimal(text::strip_suffix_ignore_case(text, 'm')),
        _ => ParseOutcome::NotApplicable,
    }
}

/// `None` if the text is not a binary literal.
fn parse_binary(text: &str) -> Option<Result<Vec<u8>, LiteralError>> {
    if let Some(body) = text::prefixed(text, "X") {
        return Some(
            hex::decode(body).map_err(|e| LiteralError::new(format!("invalid hex: {e}"), text)),
        );
    }
    text::prefixed(text, "binary").map(|body| {
        BASE64_URL
            .decode(body)
            .or_else(|_| BASE64_STANDARD.decode(body))
            .map_err(|e| LiteralError::new(format!("invalid base64: {e}"), text))
    })
}

/// Only the hyphenated `8-4-4-4-12` form is accepted.
fn parse_guid(text: &str) -> ParseOutcome {
    let groups = text.split('-').map(str::len).collect::<Vec<_>>();
    if groups != [8, 4, 4, 4, 12] || !text.chars().all(|c| c == '-' || c.is_ascii_hexdigit()) {
        return ParseOutcome::NotApplicable;
    }
    Uuid::parse_str(text).map_or_else(not_applicable, primitive)
}

fn digits<T: FromStr>(text: &str, len: usize) -> Option<T> {
    (text.len() == len && text.chars().all(|c| c.is_ascii_digit()))
        .then(|| text.parse().ok())
        .flatten()
}

/// `[-]YYYY-MM-DD`
pub(crate) fn parse_date(text: &str) -> Option<Date> {
    let (negative, rest) = text.strip_prefix('-').map_or((false, text), |r| (true, r));
    let mut parts = rest.rsplitn(3, '-');
    let day = digits::<u8>(parts.next()?, 2)?;
    let month = digits::<u8>(parts.next()?, 2)?;
    let year_text = parts.next()?;
    if year_text.len() < 4 {
        return None;
    }
    let year = digits::<i32>(year_text, year_text.len())?;
    let year = if negative { -year } else { year };
    let month = Month::try_from(month).ok()?;
    Date::from_calendar_date(year, month, day).ok()
}

/// `HH:MM[:SS[.fffffffffff]]`. Fraction digits beyond nanoseconds are
/// truncated.
pub(crate) fn parse_time_of_day(text: &str) -> Option<Time> {
    let mut parts = text.splitn(3, ':');
    let hour = digits::<u8>(parts.next()?, 2)?;
    let minute = digits::<u8>(parts.next()?, 2)?;
    let (second, nano) = match parts.next() {
        None => (0, 0),
        Some(sec) => {
            let (whole, frac) = sec.split_once('.').unwrap_or((sec, ""));
            let second = digits::<u8>(whole, 2)?;
            if sec.contains('.') && (frac.is_empty() || frac.len() > 12) {
                return None;
            }
            let nano = if frac.is_empty() {
                0
            } else {
                let frac = frac.get(..frac.len().min(9))?;
                digits::<u32>(&format!("{frac:0<9}"), 9)?
            };
            (second, nano)
        }
    };
    Time::from_hms_nano(hour, minute, second, nano).ok()
}

fn parse_spatial(text: &str, kind: PrimitiveKind) -> ParseOutcome {
    let prefix = if kind.is_geography() {
        "geography"
    } else {
        "geometry"
    };
    let Some(body) = text::prefixed(text, prefix) else {
        return ParseOutcome::NotApplicable;
    };
    let default_srid = kind.default_srid().unwrap_or_default();
    match SpatialValue::parse(body, default_srid) {
        Ok(v) if !v.shape.conforms_to(kind) => ParseOutcome::NotApplicable,
        Ok(v) if kind.is_geography() => primitive(PrimitiveValue::Geography(v)),
        Ok(v) => primitive(PrimitiveValue::Geometry(v)),
        Err(err) => ParseOutcome::Error(LiteralError::new(err.to_string(), text)),
    }
}

fn parse_integer<T>(text: &str) -> ParseOutcome
where
    T: FromStr + Into<PrimitiveValue>,
{
    if !text.chars().all(|c| c.is_ascii_digit() || c == '-' || c == '+') {
        return ParseOutcome::NotApplicable;
    }
    text.parse::<T>().map_or_else(not_applicable, primitive)
}

fn parse_float<T>(text: &str, suffix: char, infinity: T, nan: T) -> ParseOutcome
where
    T: FromStr + Into<PrimitiveValue> + std::ops::Neg<Output = T>,
{
    match text {
        "INF" => primitive(infinity),
        "-INF" => primitive(-infinity),
        "NaN" => primitive(nan),
        _ => {
            let number = text::strip_suffix_ignore_case(text, suffix);
            if text::is_numeric_text(number) {
                number.parse::<T>().map_or_else(not_applicable, primitive)
            } else {
                ParseOutcome::NotApplicable
            }
        }
    }
}

fn parse_decimal(text: &str) -> ParseOutcome {
    if !text::is_numeric_text(text) {
        return ParseOutcome::NotApplicable;
    }
    match Decimal::from_str(text) {
        Ok(v) => primitive(v),
        Err(_) => match Decimal::from_scientific(text) {
            Ok(v) => primitive(v),
            Err(err) => {
                debug!("decimal literal {text} rejected: {err}");
                ParseOutcome::NotApplicable
            }
        },
    }
}

fn parse_enum(text: &str, definition: &EnumDefinition) -> ParseOutcome {
    let body = match text::split_type_prefix(text) {
        Some((name, quoted)) if name == definition.name.inner().as_str() => quoted,
        Some(_) => return ParseOutcome::NotApplicable,
        None => text,
    };
    let value = match text::unquote(body) {
        Some(names) => {
            let items = names.split(',').map(str::trim).collect::<Vec<_>>();
            if items.len() > 1 && !definition.is_flags {
                return ParseOutcome::NotApplicable;
            }
            let mut value = 0;
            for item in items {
                let member = definition
                    .find_member(item)
                    .map(|m| m.value)
                    .or_else(|| item.parse::<i64>().ok());
                match member {
                    Some(v) => value |= v,
                    None => return ParseOutcome::NotApplicable,
                }
            }
            value
        }
        None => match body.parse::<i64>() {
            Ok(v) => v,
            Err(_) => return ParseOutcome::NotApplicable,
        },
    };
    if let Some((min, max)) = definition.underlying.integral_range() {
        if value < min || value > max {
            return ParseOutcome::NotApplicable;
        }
    }
    ParseOutcome::Value(Value::Enum(EnumValue {
        type_name: definition.name.inner().clone(),
        value,
        member_names: definition.member_names(value),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::type_ref::EnumMemberDefinition;
    use crate::type_ref::FullName;
    use std::sync::Arc;

    fn parse(text: &str, kind: PrimitiveKind) -> ParseOutcome {
        parse_literal(text, &TypeReference::primitive(kind))
    }

    fn value(v: impl Into<PrimitiveValue>) -> ParseOutcome {
        ParseOutcome::Value(Value::Primitive(v.into()))
    }

    #[test]
    fn test_null() {
        let target = TypeReference::primitive(PrimitiveKind::Int32);
        assert_eq!(parse_literal("null", &target), ParseOutcome::Value(Value::Null));
        assert_eq!(
            parse_literal("null", &target.with_nullable(false)),
            ParseOutcome::NotApplicable
        );
    }

    #[test]
    fn test_binary() {
        assert_eq!(
            parse("X'0AfF'", PrimitiveKind::Binary),
            value(PrimitiveValue::Binary(vec![0x0a, 0xff]))
        );
        assert_eq!(
            parse("binary'AQID'", PrimitiveKind::Binary),
            value(PrimitiveValue::Binary(vec![1, 2, 3]))
        );
        assert!(matches!(parse("X'0'", PrimitiveKind::Binary), ParseOutcome::Error(_)));
        assert!(matches!(parse("binary'!!'", PrimitiveKind::Binary), ParseOutcome::Error(_)));
    }

    #[test]
    fn test_binary_encoded_key() {
        // X'27616227' is the UTF-8 of 'ab'
        assert_eq!(parse("X'27616227'", PrimitiveKind::String), value("ab"));
        assert_eq!(parse("X'3432'", PrimitiveKind::Int32), value(42_i32));
        assert_eq!(parse("X'ff'", PrimitiveKind::String), ParseOutcome::NotApplicable);
    }

    #[test]
    fn test_guid() {
        let text = "01234567-89ab-cdef-0123-456789abcdef";
        assert_eq!(
            parse(text, PrimitiveKind::Guid),
            value(Uuid::parse_str(text).unwrap())
        );
        assert_eq!(
            parse("0123456789abcdef0123456789abcdef", PrimitiveKind::Guid),
            ParseOutcome::NotApplicable
        );
        assert_eq!(parse("'x'", PrimitiveKind::Guid), ParseOutcome::NotApplicable);
    }

    #[test]
    fn test_date_and_time() {
        assert_eq!(
            parse("2021-03-04", PrimitiveKind::Date),
            value(Date::from_calendar_date(2021, Month::March, 4).unwrap())
        );
        assert_eq!(parse("2021-02-30", PrimitiveKind::Date), ParseOutcome::NotApplicable);
        assert_eq!(parse("21-03-04", PrimitiveKind::Date), ParseOutcome::NotApplicable);
        assert_eq!(
            parse("13:20", PrimitiveKind::TimeOfDay),
            value(Time::from_hms(13, 20, 0).unwrap())
        );
        assert_eq!(
            parse("13:20:01.5", PrimitiveKind::TimeOfDay),
            value(Time::from_hms_milli(13, 20, 1, 500).unwrap())
        );
        assert_eq!(parse("25:00", PrimitiveKind::TimeOfDay), ParseOutcome::NotApplicable);
        assert!(matches!(
            parse("2021-03-04T05:06Z", PrimitiveKind::DateTimeOffset),
            ParseOutcome::Value(_)
        ));
        assert!(matches!(
            parse("duration'P1D'", PrimitiveKind::Duration),
            ParseOutcome::Value(_)
        ));
        assert!(matches!(parse("PT5M", PrimitiveKind::Duration), ParseOutcome::Value(_)));
        assert_eq!(parse("P1Y", PrimitiveKind::Duration), ParseOutcome::NotApplicable);
    }

    #[test]
    fn test_spatial() {
        assert!(matches!(
            parse("geography'SRID=4326;Point(1 2)'", PrimitiveKind::GeographyPoint),
            ParseOutcome::Value(Value::Primitive(PrimitiveValue::Geography(_)))
        ));
        let ParseOutcome::Value(Value::Primitive(PrimitiveValue::Geometry(v))) =
            parse("geometry'Point(1 2)'", PrimitiveKind::Geometry)
        else {
            panic!("not a geometry");
        };
        assert_eq!(v.srid, 0);
        assert!(matches!(
            parse("geography'Point(1 2'", PrimitiveKind::GeographyPoint),
            ParseOutcome::Error(_)
        ));
        assert_eq!(
            parse("geography'Point(1 2)'", PrimitiveKind::GeographyPolygon),
            ParseOutcome::NotApplicable
        );
        assert_eq!(
            parse("geometry'Point(1 2)'", PrimitiveKind::GeographyPoint),
            ParseOutcome::NotApplicable
        );
    }

    #[test]
    fn test_strings() {
        assert_eq!(parse("''", PrimitiveKind::String), value(""));
        assert_eq!(parse("'O''Neil'", PrimitiveKind::String), value("O'Neil"));
        assert_eq!(parse("abc", PrimitiveKind::String), ParseOutcome::NotApplicable);
        assert_eq!(parse("'1'", PrimitiveKind::Int32), ParseOutcome::NotApplicable);
    }

    #[test]
    fn test_numbers() {
        assert_eq!(parse("true", PrimitiveKind::Boolean), value(true));
        assert_eq!(parse("255", PrimitiveKind::Byte), value(255_u8));
        assert_eq!(parse("256", PrimitiveKind::Byte), ParseOutcome::NotApplicable);
        assert_eq!(parse("-128", PrimitiveKind::SByte), value(-128_i8));
        assert_eq!(parse("9223372036854775807", PrimitiveKind::Int64), value(i64::MAX));
        assert_eq!(parse("9223372036854775807L", PrimitiveKind::Int64), value(i64::MAX));
        assert_eq!(parse("9223372036854775808", PrimitiveKind::Int64), ParseOutcome::NotApplicable);
        assert_eq!(parse("5L", PrimitiveKind::Int32), ParseOutcome::NotApplicable);
        assert_eq!(parse("1.5f", PrimitiveKind::Single), value(1.5_f32));
        assert_eq!(parse("1.5d", PrimitiveKind::Double), value(1.5_f64));
        assert_eq!(parse("-INF", PrimitiveKind::Double), value(f64::NEG_INFINITY));
        assert_eq!(parse("INF", PrimitiveKind::Single), value(f32::INFINITY));
        assert_eq!(parse("inf", PrimitiveKind::Double), ParseOutcome::NotApplicable);
        let ParseOutcome::Value(Value::Primitive(PrimitiveValue::Double(nan))) =
            parse("NaN", PrimitiveKind::Double)
        else {
            panic!("not a double");
        };
        assert!(nan.is_nan());
    }

    #[test]
    fn test_decimal() {
        assert_eq!(
            parse("1.25m", PrimitiveKind::Decimal),
            value(Decimal::new(125, 2))
        );
        assert_eq!(parse("1.5E3", PrimitiveKind::Decimal), value(Decimal::new(1500, 0)));
        assert_eq!(parse("25e-2", PrimitiveKind::Decimal), value(Decimal::new(25, 2)));
        assert_eq!(parse("1e400", PrimitiveKind::Decimal), ParseOutcome::NotApplicable);
        assert_eq!(parse("1_000", PrimitiveKind::Decimal), ParseOutcome::NotApplicable);
    }

    fn color() -> TypeReference {
        TypeReference::enumeration(Arc::new(EnumDefinition {
            name: FullName::new("Ns.Color".into()),
            underlying: PrimitiveKind::Byte,
            is_flags: true,
            members: vec![
                EnumMemberDefinition {
                    name: "Red".into(),
                    value: 1,
                },
                EnumMemberDefinition {
                    name: "Blue".into(),
                    value: 4,
                },
            ],
        }))
    }

    fn color_value(value: i64, names: &[&str]) -> ParseOutcome {
        ParseOutcome::Value(Value::Enum(EnumValue {
            type_name: "Ns.Color".into(),
            value,
            member_names: names.iter().map(ToString::to_string).collect(),
        }))
    }

    #[test]
    fn test_enum() {
        let target = color();
        assert_eq!(parse_literal("Ns.Color'Red'", &target), color_value(1, &["Red"]));
        assert_eq!(parse_literal("'Red,Blue'", &target), color_value(5, &["Red", "Blue"]));
        assert_eq!(parse_literal("4", &target), color_value(4, &["Blue"]));
        assert_eq!(parse_literal("Ns.Other'Red'", &target), ParseOutcome::NotApplicable);
        assert_eq!(parse_literal("'Green'", &target), ParseOutcome::NotApplicable);
        assert_eq!(parse_literal("300", &target), ParseOutcome::NotApplicable);
    }
}
