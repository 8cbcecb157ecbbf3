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

//! Model manifest.
//!
//! Manifest names sets of CSDL documents that form one model, so the
//! inspector can be pointed to a model instead of a list of files:
//!
//! ```toml
//! [[models]]
//! name = "sales"
//! csdl-files = ["vocabularies/Core.xml", "sales.xml"]
//! ```

use serde::Deserialize;
use std::error::Error as StdError;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::fs::File;
use std::io::Error as IoError;
use std::io::Read as _;
use std::path::Path;
use toml::de::Error as TomlError;

/// Manifest with named models.
#[derive(Deserialize, Debug)]
pub struct ModelsManifest {
    pub models: Vec<ModelEntry>,
}

impl ModelsManifest {
    /// Read manifest from toml file.
    ///
    /// # Errors
    ///
    /// - `Error::Io` if failed to read file
    /// - `Error::Toml` if content is not a valid manifest.
    pub fn read(fname: &Path) -> Result<Self, Error> {
        let mut file = File::open(fname).map_err(Error::Io)?;
        let mut content = String::new();
        file.read_to_string(&mut content).map_err(Error::Io)?;
        Self::parse(&content)
    }

    /// Parse manifest content.
    ///
    /// # Errors
    ///
    /// `Error::Toml` if content is not a valid manifest.
    pub fn parse(content: &str) -> Result<Self, Error> {
        toml::from_str(content).map_err(Error::Toml)
    }

    #[must_use]
    pub fn all_models(&self) -> Vec<&String> {
        self.models.iter().map(|m| &m.name).collect()
    }

    #[must_use]
    pub fn find(&self, name: &str) -> Option<&ModelEntry> {
        self.models.iter().find(|m| m.name == name)
    }
}

/// Model of the manifest.
#[derive(Deserialize, Debug)]
pub struct ModelEntry {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// CSDL documents of the model. Relative paths are relative to the
    /// manifest file.
    #[serde(rename = "csdl-files")]
    pub csdl_files: Vec<String>,
}

impl ModelEntry {
    /// CSDL files with relative paths resolved against `base`.
    #[must_use]
    pub fn resolve_files(&self, base: &Path) -> Vec<String> {
        self.csdl_files
            .iter()
            .map(|f| {
                if Path::new(f).is_absolute() {
                    f.clone()
                } else {
                    base.join(f).to_string_lossy().into_owned()
                }
            })
            .collect()
    }
}

#[derive(Debug)]
pub enum Error {
    Io(IoError),
    Toml(TomlError),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Io(err) => write!(f, "input/output error: {err}"),
            Self::Toml(err) => write!(f, "manifest file format error: {err}"),
        }
    }
}

impl StdError for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_manifest() {
        let manifest = ModelsManifest::parse(
            r#"
            [[models]]
            name = "sales"
            description = "Sales service"
            csdl-files = ["core.xml", "/opt/csdl/sales.xml"]

            [[models]]
            name = "empty"
            csdl-files = []
            "#,
        )
        .unwrap();
        assert_eq!(manifest.all_models(), ["sales", "empty"]);
        let sales = manifest.find("sales").unwrap();
        assert_eq!(
            sales.resolve_files(Path::new("/srv/models")),
            ["/srv/models/core.xml", "/opt/csdl/sales.xml"]
        );
        assert!(manifest.find("missing").is_none());
    }

    #[test]
    fn test_invalid_manifest() {
        assert!(matches!(
            ModelsManifest::parse("[[models]]\nname = \"x\"\n"),
            Err(Error::Toml(_))
        ));
    }
}
