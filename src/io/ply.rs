//! PLY (Polygon File Format) import
//!
//! ASCII PLY only. The `vertex` element must provide `x`, `y`, `z`; optional
//! `red`, `green`, `blue` properties become per-vertex colors (integer types
//! are scaled from 0-255, float types are taken as 0-1). The `face` element's
//! `vertex_indices` (or `vertex_index`) list is fan-triangulated. Other
//! elements and properties are skipped.
//!
//! Author: Moroya Sakamoto

use crate::io::IoError;
use crate::mesh::{Face, Mesh};
use glam::Vec3;
use std::path::Path;

/// Scalar property type
#[derive(Debug, Clone, Copy, PartialEq)]
enum ScalarType {
    Int,
    Float,
}

impl ScalarType {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "char" | "uchar" | "short" | "ushort" | "int" | "uint" | "int8" | "uint8"
            | "int16" | "uint16" | "int32" | "uint32" => Some(ScalarType::Int),
            "float" | "double" | "float32" | "float64" => Some(ScalarType::Float),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
enum Property {
    Scalar { name: String, ty: ScalarType },
    List { name: String },
}

impl Property {
    fn name(&self) -> &str {
        match self {
            Property::Scalar { name, .. } | Property::List { name } => name,
        }
    }
}

#[derive(Debug, Clone)]
struct Element {
    name: String,
    count: usize,
    properties: Vec<Property>,
}

/// Import mesh from ASCII PLY
pub fn import_ply(path: impl AsRef<Path>) -> Result<Mesh, IoError> {
    let data = std::fs::read(path)?;
    let text = std::str::from_utf8(&data).map_err(|_| {
        IoError::UnsupportedFormat("binary PLY is not supported, export as ASCII".into())
    })?;
    parse_ply(text)
}

/// Parse ASCII PLY text into a mesh
pub fn parse_ply(text: &str) -> Result<Mesh, IoError> {
    let mut lines = text.lines().enumerate().map(|(i, l)| (i + 1, l.trim()));

    match lines.next() {
        Some((_, "ply")) => {}
        _ => return Err(IoError::InvalidFormat("missing 'ply' magic".into())),
    }

    // Header
    let mut elements: Vec<Element> = Vec::new();
    let mut saw_format = false;
    loop {
        let (line_no, line) = lines
            .next()
            .ok_or_else(|| IoError::InvalidFormat("missing end_header in PLY".into()))?;
        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts.first().copied() {
            Some("end_header") => break,
            Some("format") => {
                if parts.get(1) != Some(&"ascii") {
                    return Err(IoError::UnsupportedFormat(format!(
                        "PLY format '{}', only ascii is supported",
                        parts.get(1).unwrap_or(&"")
                    )));
                }
                saw_format = true;
            }
            Some("element") => {
                let (name, count) = match (parts.get(1), parts.get(2)) {
                    (Some(name), Some(count)) => (name, count),
                    _ => return Err(IoError::parse(line_no, "malformed element line")),
                };
                let count = count
                    .parse()
                    .map_err(|_| IoError::parse(line_no, "invalid element count"))?;
                elements.push(Element {
                    name: name.to_string(),
                    count,
                    properties: Vec::new(),
                });
            }
            Some("property") => {
                let element = elements
                    .last_mut()
                    .ok_or_else(|| IoError::parse(line_no, "property before any element"))?;
                let property = match parts.get(1).copied() {
                    Some("list") if parts.len() >= 5 => Property::List {
                        name: parts[4].to_string(),
                    },
                    Some(ty) if parts.len() >= 3 => Property::Scalar {
                        name: parts[2].to_string(),
                        ty: ScalarType::parse(ty).ok_or_else(|| {
                            IoError::parse(line_no, format!("unknown property type '{}'", ty))
                        })?,
                    },
                    _ => return Err(IoError::parse(line_no, "malformed property line")),
                };
                element.properties.push(property);
            }
            // comment, obj_info
            _ => {}
        }
    }
    if !saw_format {
        return Err(IoError::InvalidFormat("missing format line".into()));
    }

    let mut positions: Vec<Vec3> = Vec::new();
    let mut colors: Vec<Vec3> = Vec::new();
    let mut faces: Vec<Face> = Vec::new();

    // Body: elements appear in header order, one per line
    for element in &elements {
        let layout = ElementLayout::new(element);
        for _ in 0..element.count {
            let (line_no, line) = lines.next().ok_or_else(|| {
                IoError::InvalidFormat(format!("PLY truncated in '{}' element", element.name))
            })?;
            let values = read_record(line, &element.properties, line_no)?;

            match element.name.as_str() {
                "vertex" => {
                    let (x, y, z) = layout
                        .position
                        .ok_or_else(|| IoError::InvalidFormat("vertex element lacks x/y/z".into()))?;
                    positions.push(Vec3::new(
                        values[x].scalar(line_no)? as f32,
                        values[y].scalar(line_no)? as f32,
                        values[z].scalar(line_no)? as f32,
                    ));
                    if let Some((r, g, b)) = layout.color {
                        colors.push(Vec3::new(
                            color_channel(&values[r], line_no)?,
                            color_channel(&values[g], line_no)?,
                            color_channel(&values[b], line_no)?,
                        ));
                    }
                }
                "face" => {
                    let idx = layout.indices.ok_or_else(|| {
                        IoError::InvalidFormat("face element lacks vertex_indices".into())
                    })?;
                    let corners = values[idx].list(line_no)?;
                    if corners.len() < 3 {
                        return Err(IoError::parse(line_no, "face needs at least 3 vertices"));
                    }
                    let corners = corners
                        .iter()
                        .map(|&v| whole_number(v, line_no, "vertex index"))
                        .collect::<Result<Vec<u32>, IoError>>()?;
                    for i in 1..corners.len() - 1 {
                        faces.push(Face::new(corners[0], corners[i], corners[i + 1]));
                    }
                }
                _ => {}
            }
        }
    }

    let colors = (!colors.is_empty()).then_some(colors);
    Ok(Mesh::new(positions, faces, colors)?)
}

/// Where the interesting properties of an element sit in a record
struct ElementLayout {
    position: Option<(usize, usize, usize)>,
    color: Option<(usize, usize, usize)>,
    indices: Option<usize>,
}

impl ElementLayout {
    fn new(element: &Element) -> Self {
        let find = |name: &str| element.properties.iter().position(|p| p.name() == name);
        let triple = |a, b, c| Some((find(a)?, find(b)?, find(c)?));
        ElementLayout {
            position: triple("x", "y", "z"),
            color: triple("red", "green", "blue"),
            indices: find("vertex_indices").or_else(|| find("vertex_index")),
        }
    }
}

enum Value {
    Scalar(f64, ScalarType),
    List(Vec<f64>),
}

impl Value {
    fn scalar(&self, line_no: usize) -> Result<f64, IoError> {
        match self {
            Value::Scalar(v, _) => Ok(*v),
            Value::List(_) => Err(IoError::parse(line_no, "expected scalar, found list")),
        }
    }

    fn list(&self, line_no: usize) -> Result<&[f64], IoError> {
        match self {
            Value::List(v) => Ok(v),
            Value::Scalar(..) => Err(IoError::parse(line_no, "expected list, found scalar")),
        }
    }
}

fn color_channel(value: &Value, line_no: usize) -> Result<f32, IoError> {
    match value {
        Value::Scalar(v, ScalarType::Int) => Ok((*v / 255.0) as f32),
        Value::Scalar(v, ScalarType::Float) => Ok(*v as f32),
        Value::List(_) => Err(IoError::parse(line_no, "color channel cannot be a list")),
    }
}

/// Non-negative integral value that fits a `u32`
fn whole_number(v: f64, line_no: usize, what: &str) -> Result<u32, IoError> {
    if v.fract() != 0.0 || v < 0.0 || v > u32::MAX as f64 {
        return Err(IoError::parse(line_no, format!("invalid {} '{}'", what, v)));
    }
    Ok(v as u32)
}

fn read_record(line: &str, properties: &[Property], line_no: usize) -> Result<Vec<Value>, IoError> {
    let mut tokens = line.split_whitespace();
    let mut next = || -> Result<f64, IoError> {
        let token = tokens
            .next()
            .ok_or_else(|| IoError::parse(line_no, "record has too few values"))?;
        let v: f64 = token
            .parse()
            .map_err(|_| IoError::parse(line_no, format!("invalid number '{}'", token)))?;
        if v.is_finite() {
            Ok(v)
        } else {
            Err(IoError::parse(line_no, format!("non-finite number '{}'", token)))
        }
    };

    let mut values = Vec::with_capacity(properties.len());
    for property in properties {
        match property {
            Property::Scalar { ty, .. } => values.push(Value::Scalar(next()?, *ty)),
            Property::List { .. } => {
                let count = whole_number(next()?, line_no, "list length")? as usize;
                let items = (0..count).map(|_| next()).collect::<Result<Vec<f64>, IoError>>()?;
                values.push(Value::List(items));
            }
        }
    }
    Ok(values)
}
