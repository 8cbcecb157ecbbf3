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

use crate::edmx::ValidateError;
use crate::manifest::Error as ManifestError;
use nv_odata_core::LiteralError;
use std::error::Error as StdError;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::io::Error as IoError;
use std::path::PathBuf;

/// CSDL inspector errors.
#[derive(Debug)]
pub enum Error {
    AtLeastOneCsdlFileNeeded,
    Io(String, IoError),
    Edmx(String, ValidateError),
    Manifest(PathBuf, ManifestError),
    UnknownModel(String),
    UnknownType(String),
    /// Type name that cannot be resolved, with diagnostics.
    TypeReference(String, Vec<String>),
    Literal(String, LiteralError),
    /// No parser of the chain recognized the text.
    NotApplicable(String, String),
    /// Model diagnostics reported by `check`.
    Diagnostics(Vec<String>),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Self::AtLeastOneCsdlFileNeeded => "at least one CSDL file is needed".fmt(f),
            Self::Io(fname, error) => write!(f, "input/output error: file: {fname}: {error}"),
            Self::Edmx(fname, error) => {
                write!(f, "EDMX format validation error: file: {fname}: {error}")
            }
            Self::Manifest(fname, error) => {
                write!(f, "manifest error: file: {}: {error}", fname.display())
            }
            Self::UnknownModel(name) => write!(f, "model {name} is not defined in manifest"),
            Self::UnknownType(name) => write!(f, "type {name} not found"),
            Self::TypeReference(name, lines) => {
                write!(f, "cannot resolve type {name}:")?;
                lines.iter().try_for_each(|line| write!(f, "\n  {line}"))
            }
            Self::Literal(text, error) => write!(f, "invalid literal {text}: {error}"),
            Self::NotApplicable(text, type_name) => {
                write!(f, "{text} is not a literal of type {type_name}")
            }
            Self::Diagnostics(lines) => {
                write!(f, "model has {} errors:", lines.len())?;
                lines
                    .iter()
                    .enumerate()
                    .try_for_each(|(no, line)| write!(f, "\n #{no}: {line}"))
            }
        }
    }
}

impl StdError for Error {}
