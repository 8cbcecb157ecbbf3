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

//! Core of the OData Entity Data Model.
//!
//! - [`primitive`]: primitive kinds of the `Edm` namespace.
//! - [`type_ref`]: type references with nullability and facets.
//! - [`value`]: typed values produced by literal parsing and constant
//!   expression evaluation.
//! - [`literal`]: URI literal parser chain and literal formatting.
//! - [`query`]: query option expressions (`$filter`, `$orderby`, `$top`,
//!   `$skip`, `$select`/`$expand`) with composition of repeated options.

/// 4.4 Primitive Types
pub mod primitive;

/// Type references (primitive, structured, enum, collection...).
pub mod type_ref;

/// Values of EDM types.
pub mod value;

/// `Edm.DateTimeOffset` wrapper.
pub mod edm_date_time_offset;

/// `Edm.Duration` wrapper.
pub mod edm_duration;

/// `Edm.Geography*` and `Edm.Geometry*` values and WKT.
pub mod spatial;

/// URI literals.
pub mod literal;

/// Query options.
pub mod query;

#[doc(inline)]
pub use edm_date_time_offset::EdmDateTimeOffset;
#[doc(inline)]
pub use edm_duration::EdmDuration;
#[doc(inline)]
pub use literal::format_uri_literal;
#[doc(inline)]
pub use literal::LiteralError;
#[doc(inline)]
pub use literal::ParseOutcome;
#[doc(inline)]
pub use literal::UriLiteralParser;
#[doc(inline)]
pub use literal::UriLiteralParsers;
#[doc(inline)]
pub use primitive::PrimitiveKind;
#[doc(inline)]
pub use type_ref::TypeReference;
#[doc(inline)]
pub use value::PrimitiveValue;
#[doc(inline)]
pub use value::Value;
