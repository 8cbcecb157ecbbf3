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

//! `$expand` items.
//!
//! An expand item names navigation properties to be included inline in
//! the response, optionally with nested options:
//!
//! | Builder | Rendered item |
//! |---------|---------------|
//! | `ExpandQuery::all()` | `*` |
//! | `ExpandQuery::property("Orders")` | `Orders` |
//! | `ExpandQuery::property("Orders").levels(2)` | `Orders($levels=2)` |
//! | `ExpandQuery::property("Orders").max_levels()` | `Orders($levels=max)` |
//! | `ExpandQuery::property("Orders").select(&["Id"])` | `Orders($select=Id)` |
//!
//! ```rust
//! use nv_odata_core::query::expand::ExpandQuery;
//!
//! let query = ExpandQuery::property("Orders").select(&["Id", "Total"]).levels(2);
//! assert_eq!(query.to_query_string(), "$expand=Orders($select=Id,Total;$levels=2)");
//! ```

/// Depth of the expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Levels {
    Value(u32),
    Max,
}

/// Builder of one `$expand` item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandQuery {
    /// `*` or comma-separated navigation property paths.
    expand_expression: String,
    select: Vec<String>,
    levels: Option<Levels>,
}

impl ExpandQuery {
    fn from_expression(expand_expression: String) -> Self {
        Self {
            expand_expression,
            select: Vec::new(),
            levels: None,
        }
    }

    /// Expand all navigation properties.
    #[must_use]
    pub fn all() -> Self {
        Self::from_expression("*".to_string())
    }

    /// Expand a specific navigation property.
    pub fn property<S: Into<String>>(property: S) -> Self {
        Self::from_expression(property.into())
    }

    /// Expand several navigation properties with the same options.
    #[must_use]
    pub fn properties(properties: &[&str]) -> Self {
        Self::from_expression(properties.join(","))
    }

    /// Number of levels to cascade the expansion.
    #[must_use]
    pub const fn levels(mut self, levels: u32) -> Self {
        self.levels = Some(Levels::Value(levels));
        self
    }

    /// Cascade the expansion to all levels.
    #[must_use]
    pub const fn max_levels(mut self) -> Self {
        self.levels = Some(Levels::Max);
        self
    }

    /// Properties of the expanded entities to select.
    #[must_use]
    pub fn select(mut self, properties: &[&str]) -> Self {
        self.select = properties.iter().map(ToString::to_string).collect();
        self
    }

    /// Item without the `$expand=` prefix.
    #[must_use]
    pub fn expression(&self) -> String {
        let mut options = Vec::new();
        if !self.select.is_empty() {
            options.push(format!("$select={}", self.select.join(",")));
        }
        match self.levels {
            Some(Levels::Value(levels)) => options.push(format!("$levels={levels}")),
            Some(Levels::Max) => options.push("$levels=max".to_string()),
            None => (),
        }
        if options.is_empty() {
            self.expand_expression.clone()
        } else {
            format!("{}({})", self.expand_expression, options.join(";"))
        }
    }

    #[must_use]
    pub fn to_query_string(&self) -> String {
        format!("$expand={}", self.expression())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_all() {
        assert_eq!(ExpandQuery::all().to_query_string(), "$expand=*");
        assert_eq!(ExpandQuery::all().levels(3).to_query_string(), "$expand=*($levels=3)");
    }

    #[test]
    fn test_expand_property() {
        let query = ExpandQuery::property("Thermal");
        assert_eq!(query.to_query_string(), "$expand=Thermal");
    }

    #[test]
    fn test_expand_properties() {
        let query = ExpandQuery::properties(&["Thermal", "Power"]).levels(1);
        assert_eq!(query.to_query_string(), "$expand=Thermal,Power($levels=1)");
    }

    #[test]
    fn test_expand_max_levels() {
        let query = ExpandQuery::property("Parent").max_levels();
        assert_eq!(query.expression(), "Parent($levels=max)");
    }

    #[test]
    fn test_expand_select() {
        let query = ExpandQuery::property("Orders").select(&["Id"]);
        assert_eq!(query.expression(), "Orders($select=Id)");
    }
}
