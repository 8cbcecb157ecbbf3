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

use nv_odata_core::literal::format_uri_literal;
use nv_odata_core::literal::ParseOutcome;
use nv_odata_core::literal::UriLiteralParser;
use nv_odata_core::literal::UriLiteralParsers;
use nv_odata_core::primitive::PrimitiveKind;
use nv_odata_core::spatial::Position;
use nv_odata_core::spatial::Shape;
use nv_odata_core::spatial::SpatialValue;
use nv_odata_core::type_ref::EnumDefinition;
use nv_odata_core::type_ref::EnumMemberDefinition;
use nv_odata_core::type_ref::FullName;
use nv_odata_core::type_ref::TypeReference;
use nv_odata_core::value::EnumValue;
use nv_odata_core::value::PrimitiveValue;
use nv_odata_core::value::Value;
use nv_odata_core::EdmDateTimeOffset;
use nv_odata_core::EdmDuration;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread;
use time::Date;
use time::Month;
use time::Time;
use uuid::Uuid;

fn round_trip(parsers: &UriLiteralParsers, value: PrimitiveValue) {
    let kind = match value.kind() {
        k if k.is_geography() => PrimitiveKind::Geography,
        k if k.is_geometry() => PrimitiveKind::Geometry,
        k => k,
    };
    let value = Value::Primitive(value);
    let text = format_uri_literal(&value);
    let parsed = parsers.parse(&text, &TypeReference::primitive(kind));
    assert_eq!(parsed, ParseOutcome::Value(value), "literal {text}");
}

#[test]
fn test_primitive_values_round_trip() {
    let parsers = UriLiteralParsers::new();
    let values = vec![
        PrimitiveValue::Binary(vec![]),
        PrimitiveValue::Binary(vec![0, 1, 0xfe, 0xff]),
        PrimitiveValue::Boolean(false),
        PrimitiveValue::Byte(u8::MAX),
        PrimitiveValue::SByte(i8::MIN),
        PrimitiveValue::Int16(i16::MIN),
        PrimitiveValue::Int32(i32::MAX),
        PrimitiveValue::Int64(i64::MAX),
        PrimitiveValue::Int64(i64::MIN),
        PrimitiveValue::Single(f32::MAX),
        PrimitiveValue::Single(f32::NEG_INFINITY),
        PrimitiveValue::Double(-0.000_123_5),
        PrimitiveValue::Double(f64::MIN_POSITIVE),
        PrimitiveValue::Decimal(Decimal::MAX),
        PrimitiveValue::Decimal(Decimal::new(-12345, 3)),
        PrimitiveValue::Guid(Uuid::from_u128(0x0123_4567_89ab_cdef_0123_4567_89ab_cdef)),
        PrimitiveValue::Date(Date::from_calendar_date(2000, Month::February, 29).unwrap()),
        PrimitiveValue::DateTimeOffset(EdmDateTimeOffset::from_str("2021-03-04T05:06:07.5+01:00").unwrap()),
        PrimitiveValue::Duration(EdmDuration::from_str("-P1DT0.001S").unwrap()),
        PrimitiveValue::TimeOfDay(Time::from_hms_nano(23, 59, 59, 999_999_999).unwrap()),
        PrimitiveValue::String(String::new()),
        PrimitiveValue::String("it's".into()),
        PrimitiveValue::Geography(SpatialValue {
            srid: 4326,
            shape: Shape::LineString(vec![Position::new(1.5, 2.0), Position::new(-3.0, 4.25)]),
        }),
        PrimitiveValue::Geometry(SpatialValue {
            srid: 0,
            shape: Shape::Collection(vec![Shape::Point(None)]),
        }),
    ];
    for value in values {
        round_trip(&parsers, value);
    }
}

#[test]
fn test_int64_max_with_and_without_suffix() {
    let parsers = UriLiteralParsers::new();
    let target = TypeReference::primitive(PrimitiveKind::Int64);
    for text in ["9223372036854775807", "9223372036854775807L"] {
        assert_eq!(
            parsers.parse(text, &target),
            ParseOutcome::Value(Value::from(i64::MAX))
        );
    }
}

#[test]
fn test_decimal_plain_and_scientific() {
    let parsers = UriLiteralParsers::new();
    let target = TypeReference::primitive(PrimitiveKind::Decimal);
    let expected = ParseOutcome::Value(Value::from(Decimal::new(123, 1)));
    assert_eq!(parsers.parse("12.3", &target), expected);
    assert_eq!(parsers.parse("12.3M", &target), expected);
    assert_eq!(parsers.parse("1.23e1", &target), expected);
    assert_eq!(parsers.parse("123E-1m", &target), expected);
}

#[test]
fn test_enum_values_round_trip() {
    let parsers = UriLiteralParsers::new();
    let definition = Arc::new(EnumDefinition {
        name: FullName::new("Sales.Pattern".into()),
        underlying: PrimitiveKind::Int64,
        is_flags: true,
        members: vec![
            EnumMemberDefinition {
                name: "Plain".into(),
                value: 1,
            },
            EnumMemberDefinition {
                name: "Striped".into(),
                value: 2,
            },
        ],
    });
    let target = TypeReference::enumeration(definition);
    let value = Value::Enum(EnumValue {
        type_name: "Sales.Pattern".into(),
        value: 3,
        member_names: vec!["Plain".into(), "Striped".into()],
    });
    let text = format_uri_literal(&value);
    assert_eq!(text, "Sales.Pattern'Plain,Striped'");
    assert_eq!(parsers.parse(&text, &target), ParseOutcome::Value(value));
}

struct Flagging(AtomicBool);

impl UriLiteralParser for Flagging {
    fn parse(&self, _: &str, _: &TypeReference) -> ParseOutcome {
        self.0.store(true, Ordering::SeqCst);
        ParseOutcome::NotApplicable
    }
}

#[test]
fn test_type_parser_has_no_fallback() {
    let parsers = UriLiteralParsers::new();
    let guid = TypeReference::primitive(PrimitiveKind::Guid);
    let custom = Arc::new(Flagging(AtomicBool::new(false)));
    parsers.add_type_parser(guid.clone(), custom.clone()).unwrap();
    assert_eq!(
        parsers.parse("anything", &guid),
        ParseOutcome::NotApplicable
    );
    assert!(custom.0.load(Ordering::SeqCst));
    assert_eq!(
        parsers.parse("01234567-89ab-cdef-0123-456789abcdef", &guid),
        ParseOutcome::NotApplicable
    );
}

#[test]
fn test_concurrent_registration_and_parsing() {
    let parsers = Arc::new(UriLiteralParsers::new());
    let handles = (0..8)
        .map(|i| {
            let parsers = Arc::clone(&parsers);
            thread::spawn(move || {
                let parser: Arc<dyn UriLiteralParser> = Arc::new(Flagging(AtomicBool::new(false)));
                parsers.add_parser(parser.clone()).unwrap();
                let target = TypeReference::primitive(PrimitiveKind::Int32);
                assert_eq!(
                    parsers.parse(&i.to_string(), &target),
                    ParseOutcome::Value(Value::from(i))
                );
                assert!(parsers.remove_parser(&parser).unwrap());
            })
        })
        .collect::<Vec<_>>();
    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_deeply_nested_collection_is_error() {
    let parsers = UriLiteralParsers::new();
    let target = TypeReference::primitive(PrimitiveKind::Geometry);
    let depth = 10_000;
    let text = format!(
        "geometry'{}Point(1 2){}'",
        "Collection(".repeat(depth),
        ")".repeat(depth)
    );
    assert!(matches!(parsers.parse(&text, &target), ParseOutcome::Error(_)));
    let text = "geometry'Collection(Collection(Point(1 2)))'";
    assert!(matches!(parsers.parse(text, &target), ParseOutcome::Value(_)));
}
