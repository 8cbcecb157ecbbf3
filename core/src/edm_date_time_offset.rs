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

//! `Edm.DateTimeOffset` primitive wrapper
//!
//! Wraps `time::OffsetDateTime`. Text form is RFC 3339 with the seconds
//! part optional on input (`2021-03-04T05:06Z` is a valid URI literal).
//! Display always uses canonical RFC 3339 formatting; `+00:00` is
//! rendered as `Z` while non-UTC offsets are preserved.
//!
//! References:
//! - OASIS OData 4.01 CSDL, Primitive Types: Edm.DateTimeOffset
//! - OASIS OData 4.01 ABNF, `dateTimeOffsetValue`
//! - RFC 3339: Date and Time on the Internet
//!
//! Examples
//! ```rust
//! use nv_odata_core::EdmDateTimeOffset;
//! use std::str::FromStr;
//!
//! let z = EdmDateTimeOffset::from_str("2021-03-04T05:06:07Z").unwrap();
//! assert_eq!(z.to_string(), "2021-03-04T05:06:07Z".to_string());
//!
//! let short = EdmDateTimeOffset::from_str("2021-03-04T05:06+05:30").unwrap();
//! assert_eq!(short.to_string(), "2021-03-04T05:06:00+05:30");
//! ```

use core::str::FromStr;
use serde::Deserialize;
use serde::Serialize;
use std::fmt::Display;
use std::fmt::Error as FmtError;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Type corresponding to `Edm.DateTimeOffset`.
///
/// Equality compares instants: `05:06Z` equals `10:36+05:30`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdmDateTimeOffset(#[serde(with = "time::serde::rfc3339")] OffsetDateTime);

impl From<OffsetDateTime> for EdmDateTimeOffset {
    fn from(dt: OffsetDateTime) -> Self {
        Self(dt)
    }
}

impl From<EdmDateTimeOffset> for OffsetDateTime {
    fn from(w: EdmDateTimeOffset) -> Self {
        w.0
    }
}

impl Display for EdmDateTimeOffset {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let s = self.0.format(&Rfc3339).map_err(|_| FmtError)?;
        f.write_str(&s)
    }
}

/// Insert `:00` seconds into `YYYY-MM-DDThh:mm<offset>`.
fn with_seconds(s: &str) -> Option<String> {
    let t = s.find('T')?;
    let (date, time) = s.split_at(t + 1);
    let hm = time.get(..5)?;
    let rest = time.get(5..)?;
    if rest.starts_with(':') {
        None
    } else {
        Some(format!("{date}{hm}:00{rest}"))
    }
}

#[allow(clippy::absolute_paths)]
impl FromStr for EdmDateTimeOffset {
    type Err = time::error::Parse;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match OffsetDateTime::parse(s, &Rfc3339) {
            Ok(dt) => Ok(Self(dt)),
            Err(err) => match with_seconds(s) {
                Some(full) => OffsetDateTime::parse(&full, &Rfc3339).map(Self),
                None => Err(err),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::UtcOffset;

    #[test]
    fn test_parses_and_displays_utc_z() {
        let s = "2021-03-04T05:06:07Z";
        let w: EdmDateTimeOffset = s.parse().unwrap();
        assert_eq!(w.to_string(), s);

        let dt: OffsetDateTime = w.into();
        assert_eq!(dt.offset(), UtcOffset::UTC);
    }

    #[test]
    fn test_parses_utc_plus00_canonicalizes_to_z_on_display() {
        let w: EdmDateTimeOffset = "2021-03-04T05:06:07+00:00".parse().unwrap();
        assert!(w.to_string().ends_with('Z'));
    }

    #[test]
    fn test_parses_and_displays_offsets() {
        let s = "2021-03-04T10:36:07+05:30";
        let w: EdmDateTimeOffset = s.parse().unwrap();
        assert_eq!(w.to_string(), s);
        let dt: OffsetDateTime = w.into();
        assert_eq!(dt.offset(), UtcOffset::from_hms(5, 30, 0).unwrap());

        let s = "2021-03-04T00:06:07-05:00";
        let w: EdmDateTimeOffset = s.parse().unwrap();
        assert_eq!(w.to_string(), s);
    }

    #[test]
    fn test_equality_compares_instants() {
        let z: EdmDateTimeOffset = "2021-03-04T05:06:07Z".parse().unwrap();
        let plus: EdmDateTimeOffset = "2021-03-04T10:36:07+05:30".parse().unwrap();
        assert_eq!(z, plus);
    }

    #[test]
    fn test_parses_fractional_seconds() {
        let s = "2021-03-04T05:06:07.123456789Z";
        let w: EdmDateTimeOffset = s.parse().unwrap();
        assert_eq!(w.to_string(), s);
    }

    #[test]
    fn test_parses_without_seconds() {
        let w: EdmDateTimeOffset = "2021-03-04T05:06Z".parse().unwrap();
        assert_eq!(w.to_string(), "2021-03-04T05:06:00Z");
        let w: EdmDateTimeOffset = "2021-03-04T05:06-08:00".parse().unwrap();
        assert_eq!(w.to_string(), "2021-03-04T05:06:00-08:00");
    }

    #[test]
    fn test_rejects_invalid_inputs() {
        assert!("not-a-date".parse::<EdmDateTimeOffset>().is_err());
        assert!("2021-03-04T05:06:07".parse::<EdmDateTimeOffset>().is_err());
        assert!("2021-03-04T05:06".parse::<EdmDateTimeOffset>().is_err());
        assert!("2021-03-04T23:59:60Z".parse::<EdmDateTimeOffset>().is_err());
        assert!("2021-03-04".parse::<EdmDateTimeOffset>().is_err());
    }

    #[test]
    fn test_serde_round_trip() {
        let w: EdmDateTimeOffset = "2021-03-04T05:06:07+00:00".parse().unwrap();
        let json = serde_json::to_string(&w).unwrap();
        assert_eq!(json, r#""2021-03-04T05:06:07Z""#);
        let back: EdmDateTimeOffset = serde_json::from_str(&json).unwrap();
        assert_eq!(back, w);
    }
}
