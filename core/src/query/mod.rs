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

//! Query option expressions.
//!
//! A query is refined by query options (`$filter`, `$orderby`, `$top`,
//! `$skip`, `$select`/`$expand`). When the same option is specified
//! more than once the new specification is composed with the previous
//! one:
//!
//! - `$top`: the smaller count wins;
//! - `$filter`: conjuncts of both specifications are combined with
//!   `and`, previous conjuncts first;
//! - other options: the new specification replaces the previous one.
//!
//! ```rust
//! use nv_odata_core::query::filter::FilterQuery;
//! use nv_odata_core::query::QueryOptions;
//!
//! let options = QueryOptions::new("Ns.Customer")
//!     .filter(FilterQuery::eq(&"Country", "NO"))
//!     .take(10)
//!     .filter(FilterQuery::gt(&"Age", 30))
//!     .take(3);
//! assert_eq!(
//!     options.to_query_string(),
//!     "$filter=Country eq 'NO' and Age gt 30&$top=3"
//! );
//! ```

/// `$filter` predicate builder.
pub mod filter;

/// `$expand` item builder.
pub mod expand;

use expand::ExpandQuery;
use filter::FilterQuery;
use log::trace;
use tagged_types::TaggedType;

/// Name of the type of the elements the query produces.
pub type ResultType = TaggedType<String, ResultTypeTag>;
#[derive(tagged_types::Tag)]
#[implement(Clone, Hash, PartialEq, Eq)]
#[transparent(Debug, Display)]
#[capability(inner_access)]
pub enum ResultTypeTag {}

/// `$filter` option: conjuncts combined with `and`.
///
/// Conjuncts can only be added.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterOption {
    conjuncts: Vec<FilterQuery>,
}

impl FilterOption {
    #[must_use]
    pub fn new(predicate: FilterQuery) -> Self {
        Self {
            conjuncts: vec![predicate],
        }
    }

    pub fn add_conjunct(&mut self, predicate: FilterQuery) {
        self.conjuncts.push(predicate);
    }

    #[must_use]
    pub fn conjuncts(&self) -> &[FilterQuery] {
        &self.conjuncts
    }

    /// Combined predicate: `c1 and c2 and ...` in order of addition.
    #[must_use]
    pub fn predicate(&self) -> Option<FilterQuery> {
        self.conjuncts
            .iter()
            .cloned()
            .reduce(FilterQuery::and_also)
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDirection {
    Ascending,
    Descending,
}

/// One `$orderby` key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderByItem {
    pub property: String,
    pub direction: OrderDirection,
}

/// `$orderby` option.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OrderByOption {
    items: Vec<OrderByItem>,
}

impl OrderByOption {
    #[must_use]
    pub fn asc(property: impl Into<String>) -> Self {
        Self::default().then_asc(property)
    }

    #[must_use]
    pub fn desc(property: impl Into<String>) -> Self {
        Self::default().then_desc(property)
    }

    #[must_use]
    pub fn then_asc(mut self, property: impl Into<String>) -> Self {
        self.items.push(OrderByItem {
            property: property.into(),
            direction: OrderDirection::Ascending,
        });
        self
    }

    #[must_use]
    pub fn then_desc(mut self, property: impl Into<String>) -> Self {
        self.items.push(OrderByItem {
            property: property.into(),
            direction: OrderDirection::Descending,
        });
        self
    }

    #[must_use]
    pub fn items(&self) -> &[OrderByItem] {
        &self.items
    }
}

/// `$select` and `$expand` options.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProjectionOption {
    pub select: Vec<String>,
    pub expand: Vec<ExpandQuery>,
}

impl ProjectionOption {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn select(mut self, properties: &[&str]) -> Self {
        self.select
            .extend(properties.iter().map(ToString::to_string));
        self
    }

    #[must_use]
    pub fn expand(mut self, item: ExpandQuery) -> Self {
        self.expand.push(item);
        self
    }
}

/// Kind of query option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryOptionKind {
    Filter,
    OrderBy,
    Take,
    Skip,
    Projection,
}

/// Query option.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOption {
    Filter(FilterOption),
    OrderBy(OrderByOption),
    /// `$top`
    Take(u64),
    /// `$skip`
    Skip(u64),
    Projection(ProjectionOption),
}

impl QueryOption {
    #[must_use]
    pub const fn kind(&self) -> QueryOptionKind {
        match self {
            Self::Filter(_) => QueryOptionKind::Filter,
            Self::OrderBy(_) => QueryOptionKind::OrderBy,
            Self::Take(_) => QueryOptionKind::Take,
            Self::Skip(_) => QueryOptionKind::Skip,
            Self::Projection(_) => QueryOptionKind::Projection,
        }
    }
}

/// Query option applied to a query producing elements of
/// `result_type`.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOptionExpression {
    pub result_type: ResultType,
    pub option: QueryOption,
}

impl QueryOptionExpression {
    #[must_use]
    pub const fn new(result_type: ResultType, option: QueryOption) -> Self {
        Self {
            result_type,
            option,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> QueryOptionKind {
        self.option.kind()
    }

    /// Compose this specification with the `previous` specification of
    /// the same option.
    #[must_use]
    pub fn compose_multiple_specification(self, previous: &Self) -> Self {
        let option = match (self.option, &previous.option) {
            (QueryOption::Take(count), QueryOption::Take(previous_count)) => {
                if count < *previous_count {
                    QueryOption::Take(count)
                } else {
                    QueryOption::Take(*previous_count)
                }
            }
            (QueryOption::Filter(new), QueryOption::Filter(previous)) => {
                let mut combined = previous.clone();
                for conjunct in new.conjuncts {
                    combined.add_conjunct(conjunct);
                }
                QueryOption::Filter(combined)
            }
            (option, _) => option,
        };
        trace!("composed repeated {:?} option", option.kind());
        Self {
            result_type: self.result_type,
            option,
        }
    }

    /// Query string fragment of the option. Empty filters and
    /// projections render as an empty string.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        match &self.option {
            QueryOption::Filter(filter) => filter
                .predicate()
                .map(|p| p.to_query_string())
                .unwrap_or_default(),
            QueryOption::OrderBy(order) => {
                let items = order
                    .items
                    .iter()
                    .map(|item| match item.direction {
                        OrderDirection::Ascending => item.property.clone(),
                        OrderDirection::Descending => format!("{} desc", item.property),
                    })
                    .collect::<Vec<_>>();
                format!("$orderby={}", items.join(","))
            }
            QueryOption::Take(count) => format!("$top={count}"),
            QueryOption::Skip(count) => format!("$skip={count}"),
            QueryOption::Projection(projection) => {
                let mut parts = Vec::new();
                if !projection.select.is_empty() {
                    parts.push(format!("$select={}", projection.select.join(",")));
                }
                if !projection.expand.is_empty() {
                    let items = projection
                        .expand
                        .iter()
                        .map(ExpandQuery::expression)
                        .collect::<Vec<_>>();
                    parts.push(format!("$expand={}", items.join(",")));
                }
                parts.join("&")
            }
        }
    }
}

/// Options of one query, at most one per kind.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOptions {
    result_type: ResultType,
    options: Vec<QueryOptionExpression>,
}

impl QueryOptions {
    pub fn new(result_type: impl Into<String>) -> Self {
        Self {
            result_type: ResultType::new(result_type.into()),
            options: Vec::new(),
        }
    }

    /// Apply `option`. If the option of the same kind was applied before
    /// the two are composed in place.
    #[must_use]
    pub fn apply(mut self, option: QueryOption) -> Self {
        let expr = QueryOptionExpression::new(self.result_type.clone(), option);
        match self.options.iter_mut().find(|o| o.kind() == expr.kind()) {
            Some(previous) => *previous = expr.compose_multiple_specification(previous),
            None => self.options.push(expr),
        }
        self
    }

    #[must_use]
    pub fn filter(self, predicate: FilterQuery) -> Self {
        self.apply(QueryOption::Filter(FilterOption::new(predicate)))
    }

    #[must_use]
    pub fn order_by(self, order: OrderByOption) -> Self {
        self.apply(QueryOption::OrderBy(order))
    }

    #[must_use]
    pub fn take(self, count: u64) -> Self {
        self.apply(QueryOption::Take(count))
    }

    #[must_use]
    pub fn skip(self, count: u64) -> Self {
        self.apply(QueryOption::Skip(count))
    }

    #[must_use]
    pub fn project(self, projection: ProjectionOption) -> Self {
        self.apply(QueryOption::Projection(projection))
    }

    #[must_use]
    pub const fn result_type(&self) -> &ResultType {
        &self.result_type
    }

    #[must_use]
    pub fn get(&self, kind: QueryOptionKind) -> Option<&QueryOptionExpression> {
        self.options.iter().find(|o| o.kind() == kind)
    }

    #[must_use]
    pub fn options(&self) -> &[QueryOptionExpression] {
        &self.options
    }

    /// Options joined with `&` in order of first application.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        self.options
            .iter()
            .map(QueryOptionExpression::to_query_string)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("&")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn take(count: u64) -> QueryOptionExpression {
        QueryOptionExpression::new(ResultType::new("Ns.T".into()), QueryOption::Take(count))
    }

    #[test]
    fn test_take_composition() {
        assert_eq!(take(10).compose_multiple_specification(&take(3)), take(3));
        assert_eq!(take(10).compose_multiple_specification(&take(20)), take(10));
        assert_eq!(take(10).compose_multiple_specification(&take(10)), take(10));
    }

    #[test]
    fn test_filter_composition() {
        let a = FilterQuery::eq(&"A", 1);
        let b = FilterQuery::eq(&"B", 2).or().eq_then(&"B", 3);
        let options = QueryOptions::new("Ns.T")
            .filter(a.clone())
            .filter(b.clone());
        let Some(QueryOptionExpression {
            option: QueryOption::Filter(filter),
            ..
        }) = options.get(QueryOptionKind::Filter)
        else {
            panic!("no filter");
        };
        assert_eq!(filter.conjuncts(), &[a, b]);
        assert_eq!(
            filter.predicate().unwrap().expression(),
            "A eq 1 and (B eq 2 or B eq 3)"
        );
    }

    #[test]
    fn test_last_wins() {
        let options = QueryOptions::new("Ns.T")
            .skip(5)
            .skip(2)
            .order_by(OrderByOption::asc("Name"))
            .order_by(OrderByOption::desc("Age").then_asc("Name"));
        assert_eq!(options.to_query_string(), "$skip=2&$orderby=Age desc,Name");
    }

    #[test]
    fn test_projection() {
        let options = QueryOptions::new("Ns.T").project(
            ProjectionOption::new()
                .select(&["Id", "Name"])
                .expand(ExpandQuery::property("Orders").levels(2)),
        );
        assert_eq!(
            options.to_query_string(),
            "$select=Id,Name&$expand=Orders($levels=2)"
        );
        assert_eq!(options.result_type().inner(), "Ns.T");
    }
}
