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

//! OData CSDL documents and EDM semantics.
//!
//! - [`edmx`]: deserialization and structural validation of
//!   `edmx:Edmx` XML documents.
//! - [`semantics`]: lazily resolved semantic model over validated
//!   documents with deferred diagnostics.
//! - [`manifest`]: TOML manifest naming sets of CSDL documents.
//! - [`commands`]: subcommands of the `csdl-inspect` binary.

/// CSDL XML document model.
pub mod edmx;

/// Semantic model.
pub mod semantics;

/// Model manifest.
pub mod manifest;

/// Inspector commands.
pub mod commands;

mod error;

#[doc(inline)]
pub use error::Error;

#[cfg(test)]
mod test {
    use super::edmx::Edmx;
    use super::semantics::Model;
    use std::fs;
    use std::path::Path;

    fn crate_root() -> &'static Path {
        Path::new(env!("CARGO_MANIFEST_DIR"))
    }

    #[test]
    fn test_read_sales() {
        let xml = fs::read_to_string(crate_root().join("test-data/sales.xml")).unwrap();
        let edmx = Edmx::parse(&xml).unwrap();
        assert_eq!(edmx.schemas.len(), 1);
        let model = Model::new(vec![edmx]);
        assert!(model.find_type("Sales.Customer").is_some());
    }
}
