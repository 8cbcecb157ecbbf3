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

//! Spatial values.
//!
//! Values of `Edm.Geography*` and `Edm.Geometry*` types in the
//! Well-Known Text form used by OData literals:
//! `SRID=4326;Point(-122.1 47.6)`. Keywords are case-insensitive on
//! input; `Collection` and `GeometryCollection` are synonyms. Output
//! uses the OData spelling (`Point`, `LineString`, `Collection`...).

use crate::primitive::PrimitiveKind;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::fmt::Write as _;

/// Position of a point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: Option<f64>,
    pub m: Option<f64>,
}

impl Position {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            z: None,
            m: None,
        }
    }
}

/// Line string or polygon ring.
pub type Path = Vec<Position>;

/// Spatial shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// `None` is `Point EMPTY`.
    Point(Option<Position>),
    LineString(Path),
    Polygon(Vec<Path>),
    MultiPoint(Vec<Position>),
    MultiLineString(Vec<Path>),
    MultiPolygon(Vec<Vec<Path>>),
    Collection(Vec<Shape>),
}

impl Shape {
    /// WKT keyword.
    #[must_use]
    pub const fn keyword(&self) -> &'static str {
        match self {
            Self::Point(_) => "Point",
            Self::LineString(_) => "LineString",
            Self::Polygon(_) => "Polygon",
            Self::MultiPoint(_) => "MultiPoint",
            Self::MultiLineString(_) => "MultiLineString",
            Self::MultiPolygon(_) => "MultiPolygon",
            Self::Collection(_) => "Collection",
        }
    }

    /// Most specific primitive kind of the shape.
    #[must_use]
    pub const fn primitive_kind(&self, geography: bool) -> PrimitiveKind {
        match (self, geography) {
            (Self::Point(_), true) => PrimitiveKind::GeographyPoint,
            (Self::LineString(_), true) => PrimitiveKind::GeographyLineString,
            (Self::Polygon(_), true) => PrimitiveKind::GeographyPolygon,
            (Self::MultiPoint(_), true) => PrimitiveKind::GeographyMultiPoint,
            (Self::MultiLineString(_), true) => PrimitiveKind::GeographyMultiLineString,
            (Self::MultiPolygon(_), true) => PrimitiveKind::GeographyMultiPolygon,
            (Self::Collection(_), true) => PrimitiveKind::GeographyCollection,
            (Self::Point(_), false) => PrimitiveKind::GeometryPoint,
            (Self::LineString(_), false) => PrimitiveKind::GeometryLineString,
            (Self::Polygon(_), false) => PrimitiveKind::GeometryPolygon,
            (Self::MultiPoint(_), false) => PrimitiveKind::GeometryMultiPoint,
            (Self::MultiLineString(_), false) => PrimitiveKind::GeometryMultiLineString,
            (Self::MultiPolygon(_), false) => PrimitiveKind::GeometryMultiPolygon,
            (Self::Collection(_), false) => PrimitiveKind::GeometryCollection,
        }
    }

    /// Whether a value of the shape can be a value of `kind`. The
    /// abstract `Edm.Geography`/`Edm.Geometry` accept every shape.
    #[must_use]
    pub fn conforms_to(&self, kind: PrimitiveKind) -> bool {
        match kind {
            PrimitiveKind::Geography | PrimitiveKind::Geometry => true,
            _ if kind.is_geography() => self.primitive_kind(true) == kind,
            _ if kind.is_geometry() => self.primitive_kind(false) == kind,
            _ => false,
        }
    }
}

/// Value of a spatial type.
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialValue {
    pub srid: u32,
    pub shape: Shape,
}

/// Error in WKT text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WktError {
    pub message: String,
    pub position: usize,
}

impl Display for WktError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{} at position {}", self.message, self.position)
    }
}

impl std::error::Error for WktError {}

impl SpatialValue {
    /// Parse `[SRID=n;]WKT`. `default_srid` is used when the SRID prefix
    /// is absent.
    ///
    /// # Errors
    ///
    /// Returns error if the text is not a valid WKT.
    pub fn parse(text: &str, default_srid: u32) -> Result<Self, WktError> {
        let mut reader = Reader {
            text,
            pos: 0,
            depth: 0,
        };
        reader.skip_ws();
        let srid = if reader.eat_keyword("SRID") {
            reader.expect('=')?;
            let start = reader.pos;
            let digits = reader.take_while(|c| c.is_ascii_digit());
            let srid = digits.parse::<u32>().map_err(|_| WktError {
                message: "invalid SRID".into(),
                position: start,
            })?;
            reader.expect(';')?;
            srid
        } else {
            default_srid
        };
        let shape = reader.shape()?;
        reader.skip_ws();
        if reader.pos != text.len() {
            return Err(reader.error("unexpected trailing text"));
        }
        Ok(Self { srid, shape })
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Dimension {
    Xy,
    Z,
    M,
    Zm,
}

/// Collections nested deeper than this are rejected.
const MAX_COLLECTION_DEPTH: usize = 32;

struct Reader<'a> {
    text: &'a str,
    pos: usize,
    /// Nesting level of collections being read.
    depth: usize,
}

impl Reader<'_> {
    fn rest(&self) -> &str {
        self.text.get(self.pos..).unwrap_or_default()
    }

    fn error(&self, message: &str) -> WktError {
        WktError {
            message: message.into(),
            position: self.pos,
        }
    }

    fn skip_ws(&mut self) {
        let skipped = self.rest().len() - self.rest().trim_start().len();
        self.pos += skipped;
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn take_while(&mut self, f: impl Fn(char) -> bool) -> &str {
        let start = self.pos;
        let len = self
            .rest()
            .char_indices()
            .find(|(_, c)| !f(*c))
            .map_or(self.rest().len(), |(i, _)| i);
        self.pos += len;
        self.text.get(start..self.pos).unwrap_or_default()
    }

    fn expect(&mut self, c: char) -> Result<(), WktError> {
        self.skip_ws();
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            Ok(())
        } else {
            Err(self.error(&format!("expected '{c}'")))
        }
    }

    fn eat(&mut self, c: char) -> bool {
        self.skip_ws();
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    /// Consume `keyword` (case-insensitive) if it is the next word.
    fn eat_keyword(&mut self, keyword: &str) -> bool {
        self.skip_ws();
        let rest = self.rest();
        let word_len = rest
            .char_indices()
            .find(|(_, c)| !c.is_ascii_alphabetic())
            .map_or(rest.len(), |(i, _)| i);
        if rest
            .get(..word_len)
            .is_some_and(|w| w.eq_ignore_ascii_case(keyword))
        {
            self.pos += word_len;
            true
        } else {
            false
        }
    }

    fn word(&mut self) -> String {
        self.skip_ws();
        self.take_while(|c| c.is_ascii_alphabetic()).to_ascii_uppercase()
    }

    fn dimension(&mut self) -> Dimension {
        if self.eat_keyword("ZM") {
            Dimension::Zm
        } else if self.eat_keyword("Z") {
            Dimension::Z
        } else if self.eat_keyword("M") {
            Dimension::M
        } else {
            Dimension::Xy
        }
    }

    fn number(&mut self) -> Result<f64, WktError> {
        self.skip_ws();
        let start = self.pos;
        let token = self.take_while(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'));
        token.parse::<f64>().map_err(|_| WktError {
            message: "invalid coordinate".into(),
            position: start,
        })
    }

    fn position(&mut self, dim: Dimension) -> Result<Position, WktError> {
        let x = self.number()?;
        let y = self.number()?;
        let mut extra = Vec::new();
        loop {
            self.skip_ws();
            match self.peek() {
                Some(c) if c.is_ascii_digit() || matches!(c, '+' | '-' | '.') => {
                    extra.push(self.number()?);
                }
                _ => break,
            }
        }
        let (z, m) = match (dim, extra.as_slice()) {
            (Dimension::Xy, []) => (None, None),
            (Dimension::Xy | Dimension::Z, [z]) => (Some(*z), None),
            (Dimension::M, [m]) => (None, Some(*m)),
            (Dimension::Xy | Dimension::Zm, [z, m]) => (Some(*z), Some(*m)),
            _ => return Err(self.error("wrong number of coordinates")),
        };
        Ok(Position { x, y, z, m })
    }

    /// `EMPTY` or `( item, item... )`.
    fn list<T>(
        &mut self,
        mut item: impl FnMut(&mut Self) -> Result<T, WktError>,
    ) -> Result<Vec<T>, WktError> {
        if self.eat_keyword("EMPTY") {
            return Ok(Vec::new());
        }
        self.expect('(')?;
        let mut items = vec![item(self)?];
        while self.eat(',') {
            items.push(item(self)?);
        }
        self.expect(')')?;
        Ok(items)
    }

    fn path(&mut self, dim: Dimension) -> Result<Path, WktError> {
        self.list(|r| r.position(dim))
    }

    fn polygon(&mut self, dim: Dimension) -> Result<Vec<Path>, WktError> {
        self.list(|r| r.path(dim))
    }

    fn shape(&mut self) -> Result<Shape, WktError> {
        let start = self.pos;
        let keyword = self.word();
        let dim = self.dimension();
        match keyword.as_str() {
            "POINT" => {
                if self.eat_keyword("EMPTY") {
                    Ok(Shape::Point(None))
                } else {
                    self.expect('(')?;
                    let p = self.position(dim)?;
                    self.expect(')')?;
                    Ok(Shape::Point(Some(p)))
                }
            }
            "LINESTRING" => self.path(dim).map(Shape::LineString),
            "POLYGON" => self.polygon(dim).map(Shape::Polygon),
            "MULTIPOINT" => self
                .list(|r| {
                    if r.eat('(') {
                        let p = r.position(dim)?;
                        r.expect(')')?;
                        Ok(p)
                    } else {
                        r.position(dim)
                    }
                })
                .map(Shape::MultiPoint),
            "MULTILINESTRING" => self.list(|r| r.path(dim)).map(Shape::MultiLineString),
            "MULTIPOLYGON" => self.list(|r| r.polygon(dim)).map(Shape::MultiPolygon),
            "COLLECTION" | "GEOMETRYCOLLECTION" => {
                if self.depth >= MAX_COLLECTION_DEPTH {
                    return Err(WktError {
                        message: "collections nested too deeply".into(),
                        position: start,
                    });
                }
                self.depth += 1;
                let shapes = self.list(Self::shape);
                self.depth -= 1;
                shapes.map(Shape::Collection)
            }
            _ => Err(WktError {
                message: "unknown shape".into(),
                position: start,
            }),
        }
    }
}

fn write_position(out: &mut String, p: &Position) -> FmtResult {
    write!(out, "{} {}", p.x, p.y)?;
    if let Some(z) = p.z {
        write!(out, " {z}")?;
    }
    if let Some(m) = p.m {
        write!(out, " {m}")?;
    }
    Ok(())
}

fn write_list<T>(
    out: &mut String,
    items: &[T],
    f: impl Fn(&mut String, &T) -> FmtResult,
) -> FmtResult {
    if items.is_empty() {
        return out.write_str(" EMPTY");
    }
    out.write_char('(')?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.write_char(',')?;
        }
        f(out, item)?;
    }
    out.write_char(')')
}

fn write_path(out: &mut String, path: &Path) -> FmtResult {
    write_list(out, path, write_position)
}

fn write_polygon(out: &mut String, rings: &[Path]) -> FmtResult {
    write_list(out, rings, write_path)
}

/// Whether any position has `M` without `Z`; such shapes need the `M`
/// dimension tag.
fn measured_only(shape: &Shape) -> bool {
    let check = |p: &Position| p.z.is_none() && p.m.is_some();
    match shape {
        Shape::Point(p) => p.as_ref().is_some_and(check),
        Shape::LineString(ps) | Shape::MultiPoint(ps) => ps.iter().any(check),
        Shape::Polygon(rings) | Shape::MultiLineString(rings) => {
            rings.iter().flatten().any(check)
        }
        Shape::MultiPolygon(polys) => polys.iter().flatten().flatten().any(check),
        Shape::Collection(shapes) => shapes.iter().any(measured_only),
    }
}

fn write_shape(out: &mut String, shape: &Shape) -> FmtResult {
    out.write_str(shape.keyword())?;
    if measured_only(shape) && !matches!(shape, Shape::Collection(_)) {
        out.write_str(" M")?;
    }
    match shape {
        Shape::Point(None) => out.write_str(" EMPTY"),
        Shape::Point(Some(p)) => {
            out.write_char('(')?;
            write_position(out, p)?;
            out.write_char(')')
        }
        Shape::LineString(path) => write_path(out, path),
        Shape::Polygon(rings) => write_polygon(out, rings),
        Shape::MultiPoint(points) => write_list(out, points, |out, p| {
            out.write_char('(')?;
            write_position(out, p)?;
            out.write_char(')')
        }),
        Shape::MultiLineString(paths) => write_list(out, paths, write_path),
        Shape::MultiPolygon(polys) => write_list(out, polys, |out, rings| write_polygon(out, rings)),
        Shape::Collection(shapes) => write_list(out, shapes, write_shape),
    }
}

impl Display for Shape {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let mut out = String::new();
        write_shape(&mut out, self)?;
        f.write_str(&out)
    }
}

impl Display for SpatialValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "SRID={};{}", self.srid, self.shape)
    }
}
