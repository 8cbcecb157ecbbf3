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

//! `$filter` predicates.
//!
//! [`FilterQuery`] builds a boolean expression from comparisons of
//! property paths with literal values. Values are any [`Value`]; they
//! are rendered with [`format_uri_literal`], so strings are quoted and
//! escaped, dates and GUIDs are unquoted and enum values carry their
//! type prefix.
//!
//! ```rust
//! use nv_odata_core::query::filter::FilterQuery;
//!
//! let query = FilterQuery::gt(&"Temperature", 50)
//!     .and()
//!     .lt_then(&"Temperature", 80);
//! assert_eq!(query.to_query_string(), "$filter=Temperature gt 50 and Temperature lt 80");
//! ```

use crate::literal::format_uri_literal;
use crate::value::Value;

/// Types that can be used as property path in a filter expression.
pub trait FilterProperty {
    /// Path of the property (`Address/City`).
    fn property_path(&self) -> &str;
}

impl FilterProperty for &str {
    fn property_path(&self) -> &str {
        self
    }
}

impl FilterProperty for String {
    fn property_path(&self) -> &str {
        self.as_str()
    }
}

/// Comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl ComparisonOp {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::Gt => "gt",
            Self::Ge => "ge",
            Self::Lt => "lt",
            Self::Le => "le",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum FilterExpr {
    Comparison {
        property: String,
        operator: ComparisonOp,
        value: Value,
    },
    And(Box<FilterExpr>, Box<FilterExpr>),
    Or(Box<FilterExpr>, Box<FilterExpr>),
    Not(Box<FilterExpr>),
    Group(Box<FilterExpr>),
}

impl FilterExpr {
    fn to_odata_string(&self) -> String {
        match self {
            Self::Comparison {
                property,
                operator,
                value,
            } => format!(
                "{} {} {}",
                property,
                operator.as_str(),
                format_uri_literal(value)
            ),
            Self::And(left, right) => {
                format!("{} and {}", left.to_odata_string(), right.to_odata_string())
            }
            Self::Or(left, right) => {
                format!("{} or {}", left.to_odata_string(), right.to_odata_string())
            }
            Self::Not(expr) => format!("not {}", expr.to_odata_string()),
            Self::Group(expr) => format!("({})", expr.to_odata_string()),
        }
    }

    /// Operand of `and`: `or` expressions need parentheses.
    fn into_conjunct(self) -> Self {
        match self {
            Self::Or(..) => Self::Group(Box::new(self)),
            other => other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogicalOp {
    And,
    Or,
}

/// Builder of `$filter` predicates.
///
/// Comparisons are chained with [`FilterQuery::and`] or
/// [`FilterQuery::or`] followed by one of the `*_then` methods.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterQuery {
    expr: Option<FilterExpr>,
    pending_logical_op: Option<LogicalOp>,
}

impl FilterQuery {
    fn comparison<P: FilterProperty, V: Into<Value>>(
        property: &P,
        operator: ComparisonOp,
        value: V,
    ) -> FilterExpr {
        FilterExpr::Comparison {
            property: property.property_path().to_string(),
            operator,
            value: value.into(),
        }
    }

    fn from_expr(expr: FilterExpr) -> Self {
        Self {
            expr: Some(expr),
            pending_logical_op: None,
        }
    }

    /// `property op value`
    pub fn compare<P: FilterProperty, V: Into<Value>>(
        property: &P,
        operator: ComparisonOp,
        value: V,
    ) -> Self {
        Self::from_expr(Self::comparison(property, operator, value))
    }

    pub fn eq<P: FilterProperty, V: Into<Value>>(property: &P, value: V) -> Self {
        Self::compare(property, ComparisonOp::Eq, value)
    }

    pub fn ne<P: FilterProperty, V: Into<Value>>(property: &P, value: V) -> Self {
        Self::compare(property, ComparisonOp::Ne, value)
    }

    pub fn gt<P: FilterProperty, V: Into<Value>>(property: &P, value: V) -> Self {
        Self::compare(property, ComparisonOp::Gt, value)
    }

    pub fn ge<P: FilterProperty, V: Into<Value>>(property: &P, value: V) -> Self {
        Self::compare(property, ComparisonOp::Ge, value)
    }

    pub fn lt<P: FilterProperty, V: Into<Value>>(property: &P, value: V) -> Self {
        Self::compare(property, ComparisonOp::Lt, value)
    }

    pub fn le<P: FilterProperty, V: Into<Value>>(property: &P, value: V) -> Self {
        Self::compare(property, ComparisonOp::Le, value)
    }

    /// Next comparison is combined with `and`.
    #[must_use]
    pub const fn and(mut self) -> Self {
        self.pending_logical_op = Some(LogicalOp::And);
        self
    }

    /// Next comparison is combined with `or`.
    #[must_use]
    pub const fn or(mut self) -> Self {
        self.pending_logical_op = Some(LogicalOp::Or);
        self
    }

    /// Negate the expression built so far.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn not(mut self) -> Self {
        if let Some(expr) = self.expr.take() {
            self.expr = Some(FilterExpr::Not(Box::new(expr)));
        }
        self
    }

    /// Put the expression built so far in parentheses.
    #[must_use]
    pub fn group(mut self) -> Self {
        if let Some(expr) = self.expr.take() {
            self.expr = Some(FilterExpr::Group(Box::new(expr)));
        }
        self
    }

    #[must_use]
    pub fn compare_then<P: FilterProperty, V: Into<Value>>(
        self,
        property: &P,
        operator: ComparisonOp,
        value: V,
    ) -> Self {
        let new_expr = Self::comparison(property, operator, value);
        self.combine_with_pending_op(new_expr)
    }

    #[must_use]
    pub fn eq_then<P: FilterProperty, V: Into<Value>>(self, property: &P, value: V) -> Self {
        self.compare_then(property, ComparisonOp::Eq, value)
    }

    #[must_use]
    pub fn ne_then<P: FilterProperty, V: Into<Value>>(self, property: &P, value: V) -> Self {
        self.compare_then(property, ComparisonOp::Ne, value)
    }

    #[must_use]
    pub fn gt_then<P: FilterProperty, V: Into<Value>>(self, property: &P, value: V) -> Self {
        self.compare_then(property, ComparisonOp::Gt, value)
    }

    #[must_use]
    pub fn ge_then<P: FilterProperty, V: Into<Value>>(self, property: &P, value: V) -> Self {
        self.compare_then(property, ComparisonOp::Ge, value)
    }

    #[must_use]
    pub fn lt_then<P: FilterProperty, V: Into<Value>>(self, property: &P, value: V) -> Self {
        self.compare_then(property, ComparisonOp::Lt, value)
    }

    #[must_use]
    pub fn le_then<P: FilterProperty, V: Into<Value>>(self, property: &P, value: V) -> Self {
        self.compare_then(property, ComparisonOp::Le, value)
    }

    fn combine_with_pending_op(mut self, new_expr: FilterExpr) -> Self {
        if let Some(existing) = self.expr.take() {
            self.expr = Some(match self.pending_logical_op.take() {
                Some(LogicalOp::And) => FilterExpr::And(Box::new(existing), Box::new(new_expr)),
                Some(LogicalOp::Or) => FilterExpr::Or(Box::new(existing), Box::new(new_expr)),
                None => new_expr,
            });
        } else {
            self.expr = Some(new_expr);
        }
        self
    }

    /// Conjunction of two predicates. Disjunctions are parenthesized.
    #[must_use]
    pub fn and_also(self, other: Self) -> Self {
        match (self.expr, other.expr) {
            (Some(left), Some(right)) => Self::from_expr(FilterExpr::And(
                Box::new(left.into_conjunct()),
                Box::new(right.into_conjunct()),
            )),
            (Some(expr), None) | (None, Some(expr)) => Self::from_expr(expr),
            (None, None) => Self {
                expr: None,
                pending_logical_op: None,
            },
        }
    }

    /// Expression without the `$filter=` prefix.
    #[must_use]
    pub fn expression(&self) -> String {
        self.expr
            .as_ref()
            .map_or_else(String::new, FilterExpr::to_odata_string)
    }

    #[must_use]
    pub fn to_query_string(&self) -> String {
        self.expr.as_ref().map_or_else(String::new, |expr| {
            format!("$filter={}", expr.to_odata_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::EnumValue;
    use uuid::Uuid;

    #[test]
    fn test_simple_eq() {
        let filter = FilterQuery::eq(&"Count", 2);
        assert_eq!(filter.to_query_string(), "$filter=Count eq 2");
    }

    #[test]
    fn test_string_escaping() {
        let filter = FilterQuery::eq(&"Name", "O'Brien");
        assert_eq!(filter.to_query_string(), "$filter=Name eq 'O''Brien'");
    }

    #[test]
    fn test_grouping() {
        let filter = FilterQuery::eq(&"State", "Enabled")
            .and()
            .eq_then(&"Health", "OK")
            .group()
            .or()
            .eq_then(&"SystemType", "Physical");
        assert_eq!(
            filter.to_query_string(),
            "$filter=(State eq 'Enabled' and Health eq 'OK') or SystemType eq 'Physical'"
        );
    }

    #[test]
    fn test_not_operator() {
        let filter = FilterQuery::eq(&"Count", 2).not();
        assert_eq!(filter.to_query_string(), "$filter=not Count eq 2");
    }

    #[test]
    fn test_all_comparison_operators() {
        assert_eq!(FilterQuery::ne(&"A", 1).to_query_string(), "$filter=A ne 1");
        assert_eq!(FilterQuery::gt(&"B", 2).to_query_string(), "$filter=B gt 2");
        assert_eq!(FilterQuery::ge(&"C", 3).to_query_string(), "$filter=C ge 3");
        assert_eq!(FilterQuery::lt(&"D", 4).to_query_string(), "$filter=D lt 4");
        assert_eq!(FilterQuery::le(&"E", 5).to_query_string(), "$filter=E le 5");
    }

    #[test]
    fn test_typed_literals() {
        assert_eq!(
            FilterQuery::gt(&"Temperature", 98.6).to_query_string(),
            "$filter=Temperature gt 98.6"
        );
        assert_eq!(
            FilterQuery::eq(&"Enabled", true).to_query_string(),
            "$filter=Enabled eq true"
        );
        assert_eq!(
            FilterQuery::eq(&"Id", Uuid::nil()).to_query_string(),
            "$filter=Id eq 00000000-0000-0000-0000-000000000000"
        );
        let color = EnumValue {
            type_name: "Ns.Color".into(),
            value: 1,
            member_names: vec!["Red".into()],
        };
        assert_eq!(
            FilterQuery::eq(&"Color", color).to_query_string(),
            "$filter=Color eq Ns.Color'Red'"
        );
    }

    #[test]
    fn test_and_also() {
        let a = FilterQuery::eq(&"A", 1).or().eq_then(&"A", 2);
        let b = FilterQuery::eq(&"B", 3);
        assert_eq!(
            a.and_also(b).expression(),
            "(A eq 1 or A eq 2) and B eq 3"
        );
    }
}
