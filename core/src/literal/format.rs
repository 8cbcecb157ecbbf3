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

//! Formatting of values as URI literals.
//!
//! Output of [`format_uri_literal`] for a primitive or enum value is
//! accepted by the built-in parser for the value's type and parses back
//! to an equal value.

use crate::literal::text::quote;
use crate::spatial::SpatialValue;
use crate::value::EnumValue;
use crate::value::PrimitiveValue;
use crate::value::Value;
use base64::engine::general_purpose::URL_SAFE;
use base64::Engine as _;
use time::Date;
use time::Time;

/// Format `value` as URI literal.
///
/// Collections and structured values use the JSON-like bracket forms
/// (`[1,2]`, `{"Name":'x'}`) with items formatted as literals.
#[must_use]
pub fn format_uri_literal(value: &Value) -> String {
    match value {
        Value::Null => "null".into(),
        Value::Primitive(v) => format_primitive(v),
        Value::Enum(v) => format_enum(v),
        Value::Collection(items) => {
            let items = items.iter().map(format_uri_literal).collect::<Vec<_>>();
            format!("[{}]", items.join(","))
        }
        Value::Structured(v) => {
            let props = v
                .properties
                .iter()
                .map(|p| format!("\"{}\":{}", p.name, format_uri_literal(&p.value)))
                .collect::<Vec<_>>();
            format!("{{{}}}", props.join(","))
        }
    }
}

/// Format primitive value as URI literal.
#[must_use]
pub fn format_primitive(value: &PrimitiveValue) -> String {
    match value {
        PrimitiveValue::Binary(bytes) => format!("binary'{}'", URL_SAFE.encode(bytes)),
        PrimitiveValue::Boolean(v) => v.to_string(),
        PrimitiveValue::Byte(v) => v.to_string(),
        PrimitiveValue::SByte(v) => v.to_string(),
        PrimitiveValue::Int16(v) => v.to_string(),
        PrimitiveValue::Int32(v) => v.to_string(),
        PrimitiveValue::Int64(v) => v.to_string(),
        PrimitiveValue::Single(v) => format_float(f64::from(*v), v.to_string()),
        PrimitiveValue::Double(v) => format_float(*v, v.to_string()),
        PrimitiveValue::Decimal(v) => v.to_string(),
        PrimitiveValue::Guid(v) => v.hyphenated().to_string(),
        PrimitiveValue::Date(v) => format_date(*v),
        PrimitiveValue::DateTimeOffset(v) => v.to_string(),
        PrimitiveValue::Duration(v) => format!("duration'{v}'"),
        PrimitiveValue::TimeOfDay(v) => format_time_of_day(*v),
        PrimitiveValue::String(v) => quote(v),
        PrimitiveValue::Geography(v) => format_spatial("geography", v),
        PrimitiveValue::Geometry(v) => format_spatial("geometry", v),
    }
}

fn format_float(v: f64, text: String) -> String {
    if v.is_nan() {
        "NaN".into()
    } else if v == f64::INFINITY {
        "INF".into()
    } else if v == f64::NEG_INFINITY {
        "-INF".into()
    } else {
        text
    }
}

fn format_date(v: Date) -> String {
    let year = v.year();
    let sign = if year < 0 { "-" } else { "" };
    format!(
        "{sign}{:04}-{:02}-{:02}",
        year.unsigned_abs(),
        u8::from(v.month()),
        v.day()
    )
}

fn format_time_of_day(v: Time) -> String {
    let mut out = format!("{:02}:{:02}:{:02}", v.hour(), v.minute(), v.second());
    if v.nanosecond() > 0 {
        let frac = format!("{:09}", v.nanosecond());
        out.push('.');
        out.push_str(frac.trim_end_matches('0'));
    }
    out
}

fn format_spatial(prefix: &str, v: &SpatialValue) -> String {
    format!("{prefix}'{v}'")
}

fn format_enum(v: &EnumValue) -> String {
    let body = if v.member_names.is_empty() {
        v.value.to_string()
    } else {
        v.member_names.join(",")
    };
    format!("{}{}", v.type_name, quote(&body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::PropertyValue;
    use crate::value::StructuredValue;
    use time::Month;

    #[test]
    fn test_primitives() {
        assert_eq!(format_uri_literal(&Value::from("O'Neil")), "'O''Neil'");
        assert_eq!(format_uri_literal(&Value::from("")), "''");
        assert_eq!(format_uri_literal(&Value::from(i64::MAX)), "9223372036854775807");
        assert_eq!(format_uri_literal(&Value::from(f32::INFINITY)), "INF");
        assert_eq!(format_uri_literal(&Value::from(f64::NAN)), "NaN");
        assert_eq!(
            format_uri_literal(&Value::from(PrimitiveValue::Binary(vec![0xfb, 0xff]))),
            "binary'-_8='"
        );
        assert_eq!(
            format_uri_literal(&Value::from(
                Date::from_calendar_date(33, Month::January, 2).unwrap()
            )),
            "0033-01-02"
        );
        assert_eq!(
            format_uri_literal(&Value::from(Time::from_hms_milli(1, 2, 3, 40).unwrap())),
            "01:02:03.04"
        );
    }

    #[test]
    fn test_enum() {
        let v = EnumValue {
            type_name: "Ns.Color".into(),
            value: 5,
            member_names: vec!["Red".into(), "Blue".into()],
        };
        assert_eq!(format_uri_literal(&Value::Enum(v)), "Ns.Color'Red,Blue'");
        let v = EnumValue {
            type_name: "Ns.Color".into(),
            value: 64,
            member_names: vec![],
        };
        assert_eq!(format_uri_literal(&Value::Enum(v)), "Ns.Color'64'");
    }

    #[test]
    fn test_composite() {
        let v = Value::Collection(vec![
            Value::from(1_i32),
            Value::Structured(StructuredValue {
                type_name: None,
                properties: vec![PropertyValue {
                    name: "A".into(),
                    value: Value::Null,
                }],
            }),
        ]);
        assert_eq!(format_uri_literal(&v), "[1,{\"A\":null}]");
    }
}
