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

//! `Edm.Duration` primitive wrapper
//!
//! Text form is the ISO 8601 day-time duration used by OData:
//! `[-]P[nD][T[nH][nM][n[.fffffffff]S]]`. Years and months are not
//! allowed. Display produces the canonical form with days split off
//! (`P1DT2H`, `PT0.5S`, `-PT1M`).
//!
//! ```rust
//! use nv_odata_core::EdmDuration;
//!
//! let d: EdmDuration = "PT90M".parse().unwrap();
//! assert_eq!(d.to_string(), "PT1H30M");
//! ```

use core::str::FromStr;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use time::Duration;

/// Type corresponding to `Edm.Duration`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdmDuration(Duration);

impl From<Duration> for EdmDuration {
    fn from(d: Duration) -> Self {
        Self(d)
    }
}

impl From<EdmDuration> for Duration {
    fn from(w: EdmDuration) -> Self {
        w.0
    }
}

/// Duration text is not a valid day-time duration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidDuration(pub String);

impl Display for InvalidDuration {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "invalid duration: {}", self.0)
    }
}

impl std::error::Error for InvalidDuration {}

const SECONDS_PER_MINUTE: i64 = 60;
const SECONDS_PER_HOUR: i64 = 60 * SECONDS_PER_MINUTE;
const SECONDS_PER_DAY: i64 = 24 * SECONDS_PER_HOUR;

impl Display for EdmDuration {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let total = self.0.whole_seconds();
        let nanos = self.0.subsec_nanoseconds();
        if total < 0 || nanos < 0 {
            f.write_str("-")?;
        }
        let secs = total.unsigned_abs();
        let nanos = nanos.unsigned_abs();
        let days = secs / SECONDS_PER_DAY.unsigned_abs();
        let hours = secs % SECONDS_PER_DAY.unsigned_abs() / SECONDS_PER_HOUR.unsigned_abs();
        let minutes = secs % SECONDS_PER_HOUR.unsigned_abs() / SECONDS_PER_MINUTE.unsigned_abs();
        let seconds = secs % SECONDS_PER_MINUTE.unsigned_abs();
        f.write_str("P")?;
        if days > 0 {
            write!(f, "{days}D")?;
        }
        if hours == 0 && minutes == 0 && seconds == 0 && nanos == 0 {
            return if days == 0 { f.write_str("T0S") } else { Ok(()) };
        }
        f.write_str("T")?;
        if hours > 0 {
            write!(f, "{hours}H")?;
        }
        if minutes > 0 {
            write!(f, "{minutes}M")?;
        }
        if seconds > 0 || nanos > 0 {
            write!(f, "{seconds}")?;
            if nanos > 0 {
                let frac = format!("{nanos:09}");
                write!(f, ".{}", frac.trim_end_matches('0'))?;
            }
            f.write_str("S")?;
        }
        Ok(())
    }
}

/// Split the leading run of ASCII digits (and optionally one dot).
fn split_number(s: &str, allow_fraction: bool) -> (&str, &str) {
    let mut seen_dot = false;
    let end = s
        .char_indices()
        .find(|(_, c)| {
            if *c == '.' && allow_fraction && !seen_dot {
                seen_dot = true;
                false
            } else {
                !c.is_ascii_digit()
            }
        })
        .map_or(s.len(), |(i, _)| i);
    s.split_at(end)
}

fn component(number: &str, unit_seconds: i64, original: &str) -> Result<Duration, InvalidDuration> {
    let err = || InvalidDuration(original.into());
    if number.is_empty() {
        return Err(err());
    }
    let value = number.parse::<i64>().map_err(|_| err())?;
    value
        .checked_mul(unit_seconds)
        .map(Duration::seconds)
        .ok_or_else(err)
}

fn seconds_component(number: &str, original: &str) -> Result<Duration, InvalidDuration> {
    let err = || InvalidDuration(original.into());
    let (whole, frac) = number.split_once('.').unwrap_or((number, ""));
    if whole.is_empty() || (number.contains('.') && frac.is_empty()) || frac.len() > 9 {
        return Err(err());
    }
    let whole = whole.parse::<i64>().map_err(|_| err())?;
    let nanos = if frac.is_empty() {
        0
    } else {
        format!("{frac:0<9}").parse::<i32>().map_err(|_| err())?
    };
    Ok(Duration::new(whole, nanos))
}

impl FromStr for EdmDuration {
    type Err = InvalidDuration;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || InvalidDuration(s.into());
        let (negative, rest) = s.strip_prefix('-').map_or((false, s), |r| (true, r));
        let rest = rest.strip_prefix('P').ok_or_else(err)?;
        let (date_part, time_part) = match rest.split_once('T') {
            Some((d, t)) => {
                if t.is_empty() {
                    return Err(err());
                }
                (d, Some(t))
            }
            None => (rest, None),
        };

        let mut total = Duration::ZERO;
        let mut any = false;
        if !date_part.is_empty() {
            let days = date_part.strip_suffix('D').ok_or_else(err)?;
            if !days.chars().all(|c| c.is_ascii_digit()) {
                return Err(err());
            }
            total = component(days, SECONDS_PER_DAY, s)?;
            any = true;
        }

        if let Some(mut t) = time_part {
            let mut last_unit = 0;
            while !t.is_empty() {
                let (number, after) = split_number(t, true);
                let mut chars = after.chars();
                let unit = chars.next().ok_or_else(err)?;
                let (order, value) = match unit {
                    'H' if !number.contains('.') => (1, component(number, SECONDS_PER_HOUR, s)?),
                    'M' if !number.contains('.') => {
                        (2, component(number, SECONDS_PER_MINUTE, s)?)
                    }
                    'S' => (3, seconds_component(number, s)?),
                    _ => return Err(err()),
                };
                if order <= last_unit {
                    return Err(err());
                }
                last_unit = order;
                total = total.checked_add(value).ok_or_else(err)?;
                any = true;
                t = chars.as_str();
            }
        }

        if !any {
            return Err(err());
        }
        Ok(Self(if negative { -total } else { total }))
    }
}
