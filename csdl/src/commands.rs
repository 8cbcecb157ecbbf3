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

//! Command-line entry points of the inspector.
//!
//! - `Check`: load a model and print every diagnostic.
//! - `Describe`: print kind, base type, properties, enum members and
//!   bound operations of a type.
//! - `ParseLiteral`: run the URI literal parser chain for a type of the
//!   model.
//!
//! A model is either a list of CSDL files or a model of a manifest
//! (`--manifest FILE --model NAME`).

use crate::edmx::Edmx;
use crate::manifest::ModelsManifest;
use crate::semantics::AnnotationTarget;
use crate::semantics::Model;
use crate::semantics::Resolution;
use crate::semantics::SchemaTypeKind;
use crate::semantics::TypeId;
use crate::Error;
use clap::Args;
use clap::Subcommand;
use log::debug;
use log::info;
use nv_odata_core::format_uri_literal;
use nv_odata_core::ParseOutcome;
use nv_odata_core::TypeReference;
use std::fs::File;
use std::io::Read as _;
use std::path::Path;
use std::path::PathBuf;

/// CSDL documents that form the model.
#[derive(Args, Debug)]
pub struct Inputs {
    /// Model manifest (TOML).
    #[arg(long, requires = "model")]
    pub manifest: Option<PathBuf>,
    /// Name of the model in the manifest.
    #[arg(long, requires = "manifest")]
    pub model: Option<String>,
    /// CSDL documents.
    pub csdls: Vec<String>,
}

/// Inspector commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve everything in the model and report diagnostics.
    Check {
        #[command(flatten)]
        inputs: Inputs,
    },
    /// Describe a schema type.
    Describe {
        /// Qualified name of the type (namespace or alias).
        #[arg(short, long = "type")]
        type_name: String,
        #[command(flatten)]
        inputs: Inputs,
    },
    /// Parse URI literal as a value of the type.
    ParseLiteral {
        /// Type name: `Edm.Int32`, `Collection(Ns.Enum)`, ...
        #[arg(short, long = "type")]
        type_name: String,
        /// Literal text.
        text: String,
        #[command(flatten)]
        inputs: Inputs,
    },
}

/// Process an inspector command.
///
/// # Errors
///
/// Returns an error if inputs cannot be read, the model has
/// diagnostics (`Check`) or the literal cannot be parsed.
pub fn process_command(command: &Commands) -> Result<Vec<String>, Error> {
    match command {
        Commands::Check { inputs } => {
            let model = load_model(inputs, true)?;
            let errors = model.errors().iter().map(ToString::to_string).collect::<Vec<_>>();
            if errors.is_empty() {
                Ok(vec!["no errors found".into()])
            } else {
                Err(Error::Diagnostics(errors))
            }
        }
        Commands::Describe { type_name, inputs } => {
            let model = load_model(inputs, true)?;
            let t = model
                .find_type(type_name)
                .ok_or_else(|| Error::UnknownType(type_name.clone()))?;
            Ok(describe(&model, t))
        }
        Commands::ParseLiteral {
            type_name,
            text,
            inputs,
        } => {
            let model = load_model(inputs, false)?;
            let type_ref = match model.parse_type_reference(type_name) {
                Resolution::Resolved(v) => v,
                Resolution::Unresolved(u) => {
                    return Err(Error::TypeReference(
                        type_name.clone(),
                        u.errors.iter().map(ToString::to_string).collect(),
                    ))
                }
            };
            match model.literal_parsers().parse(text, &type_ref) {
                ParseOutcome::Value(v) => Ok(vec![
                    format!("{}: {v:?}", type_ref.full_name()),
                    format!("canonical: {}", format_uri_literal(&v)),
                ]),
                ParseOutcome::NotApplicable => {
                    Err(Error::NotApplicable(text.clone(), type_ref.full_name()))
                }
                ParseOutcome::Error(err) => Err(Error::Literal(text.clone(), err)),
            }
        }
    }
}

fn describe(model: &Model, t: TypeId) -> Vec<String> {
    let kind = model.type_kind(t);
    let mut lines = vec![format!("{}: {kind:?}", model.type_full_name(t))];
    if let Some(description) = model.description(AnnotationTarget::Type(t)) {
        lines.push(format!("  description: {description}"));
    }
    match kind {
        SchemaTypeKind::EntityType | SchemaTypeKind::ComplexType => {
            if let Some(base) = model.base_type(t).as_ref() {
                lines.push(format!("  base: {}", show(base, |b| model.type_full_name(*b).to_string())));
            }
            let flags = [
                (model.is_abstract(t), "abstract"),
                (model.is_open(t), "open"),
                (model.has_stream(t), "has stream"),
            ];
            for (_, flag) in flags.iter().filter(|(set, _)| *set) {
                lines.push(format!("  {flag}"));
            }
            let key = model.key(t);
            if !key.is_empty() {
                let names = key
                    .iter()
                    .map(|k| show(k, |p| model.property_name(*p).to_string()))
                    .collect::<Vec<_>>();
                lines.push(format!("  key: {}", names.join(", ")));
            }
            for p in model.all_properties(t).iter() {
                let what = if model.is_navigation(*p) { "navigation" } else { "property" };
                let type_ref = model.property_type(*p);
                let nullable = match &*type_ref {
                    Resolution::Resolved(v) if !v.is_nullable() => " not null",
                    _ => "",
                };
                lines.push(format!(
                    "  {what} {}: {}{nullable}",
                    model.property_name(*p),
                    show(&*type_ref, TypeReference::full_name),
                ));
            }
            for op in model.operations() {
                let bound_here = model
                    .binding_parameter(op)
                    .and_then(|p| model.structured_type_of(p.type_ref.resolved()?))
                    == Some(t);
                if bound_here {
                    lines.push(format!(
                        "  bound {:?} {}",
                        model.operation_kind(op),
                        model.operation_full_name(op)
                    ));
                }
            }
        }
        SchemaTypeKind::EnumType => {
            lines.push(format!(
                "  underlying: {}",
                show(&*model.enum_underlying_type(t), |k| k.to_string())
            ));
            if model.is_flags(t) {
                lines.push("  flags".into());
            }
            for m in model.enum_members(t).iter() {
                lines.push(format!("  member {} = {}", m.name, show(&m.value, |v| v.to_string())));
            }
        }
        SchemaTypeKind::TypeDefinition => {
            lines.push(format!(
                "  underlying: {}",
                show(&*model.type_definition_underlying(t), |k| k.to_string())
            ));
        }
    }
    lines
}

fn show<T>(resolution: &Resolution<T>, f: impl FnOnce(&T) -> String) -> String {
    match resolution {
        Resolution::Resolved(v) => f(v),
        Resolution::Unresolved(u) => format!("<unresolved {}>", u.name),
    }
}

fn load_model(inputs: &Inputs, required: bool) -> Result<Model, Error> {
    let mut files = inputs.csdls.clone();
    if let (Some(manifest), Some(name)) = (&inputs.manifest, &inputs.model) {
        let content =
            ModelsManifest::read(manifest).map_err(|e| Error::Manifest(manifest.clone(), e))?;
        let entry = content
            .find(name)
            .ok_or_else(|| Error::UnknownModel(name.clone()))?;
        let base = manifest.parent().unwrap_or_else(|| Path::new("."));
        files.extend(entry.resolve_files(base));
    }
    if required && files.is_empty() {
        return Err(Error::AtLeastOneCsdlFileNeeded);
    }
    let docs = read_csdls(&files)?;
    info!("loaded {} CSDL documents", docs.len());
    Ok(Model::new(docs))
}

fn read_csdls(files: &[String]) -> Result<Vec<Edmx>, Error> {
    files
        .iter()
        .map(|fname| {
            debug!("reading {fname}");
            let mut file = File::open(fname).map_err(|err| Error::Io(fname.clone(), err))?;
            let mut content = String::new();
            file.read_to_string(&mut content)
                .map_err(|err| Error::Io(fname.clone(), err))?;
            Edmx::parse(&content).map_err(|e| Error::Edmx(fname.clone(), e))
        })
        .collect()
}
