//! Model inspection for uploaded meshes.
//!
//! Parses STL (binary and ASCII) and OBJ files into a triangle soup, measures
//! the axis-aligned bounding box and derives a volume through a
//! [`VolumeStrategy`]. Files with an extension we cannot read are quoted as a
//! 50 mm placeholder cube instead of being rejected.

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};

/// Fill factor applied to the bounding box by [`BoundingBoxHeuristic`]
pub const BOUNDING_BOX_FILL_FACTOR: f64 = 0.4;
/// Edge length of the placeholder cube, in millimetres
pub const PLACEHOLDER_SIZE_MM: f64 = 50.0;
/// Upper bound on triangles in a binary STL header
pub const MAX_TRIANGLES: u32 = 10_000_000;

const STL_HEADER_LEN: usize = 80;
const STL_TRIANGLE_LEN: usize = 50;

/// A point or vector in model space (millimetres)
pub type Vertex = [f64; 3];
/// Three vertices, counter-clockwise when seen from outside
pub type Triangle = [Vertex; 3];

/// Extents of a model along each axis, in millimetres
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Dimensions {
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Dimensions after a uniform scale
    #[must_use]
    pub fn scaled(self, scale: f64) -> Self {
        Self::new(self.x * scale, self.y * scale, self.z * scale)
    }

    /// Volume of the box itself, in cm³
    #[must_use]
    pub fn box_volume_cm3(self) -> f64 {
        (self.x * self.y * self.z) / 1000.0
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Vertex,
    pub max: Vertex,
}

impl BoundingBox {
    #[must_use]
    pub fn size(&self) -> Dimensions {
        Dimensions::new(
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        )
    }

    #[must_use]
    pub fn center(&self) -> Vertex {
        [
            (self.min[0] + self.max[0]) / 2.0,
            (self.min[1] + self.max[1]) / 2.0,
            (self.min[2] + self.max[2]) / 2.0,
        ]
    }
}

/// Triangle mesh read from an upload
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    #[must_use]
    pub const fn new(triangles: Vec<Triangle>) -> Self {
        Self { triangles }
    }

    /// Closed axis-aligned box with one corner at the origin.
    #[must_use]
    pub fn cuboid(x: f64, y: f64, z: f64) -> Self {
        let v = [
            [0.0, 0.0, 0.0],
            [x, 0.0, 0.0],
            [x, y, 0.0],
            [0.0, y, 0.0],
            [0.0, 0.0, z],
            [x, 0.0, z],
            [x, y, z],
            [0.0, y, z],
        ];
        let faces: [[usize; 3]; 12] = [
            [0, 2, 1],
            [0, 3, 2],
            [4, 5, 6],
            [4, 6, 7],
            [0, 1, 5],
            [0, 5, 4],
            [2, 3, 7],
            [2, 7, 6],
            [0, 4, 7],
            [0, 7, 3],
            [1, 2, 6],
            [1, 6, 5],
        ];
        Self::new(faces.iter().map(|f| [v[f[0]], v[f[1]], v[f[2]]]).collect())
    }

    /// Bounding box of every vertex, `None` for an empty mesh
    #[must_use]
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let mut vertices = self.triangles.iter().flatten();
        let first = *vertices.next()?;
        let mut bbox = BoundingBox {
            min: first,
            max: first,
        };
        for v in vertices {
            for axis in 0..3 {
                bbox.min[axis] = bbox.min[axis].min(v[axis]);
                bbox.max[axis] = bbox.max[axis].max(v[axis]);
            }
        }
        Some(bbox)
    }

    /// Translates the mesh so its bounding box is centered on the origin.
    pub fn center(&mut self) {
        let Some(bbox) = self.bounding_box() else {
            return;
        };
        let offset = bbox.center();
        for vertex in self.triangles.iter_mut().flatten() {
            for axis in 0..3 {
                vertex[axis] -= offset[axis];
            }
        }
    }

    /// Sum of signed tetrahedron volumes against the origin, in mm³.
    ///
    /// Equals the enclosed volume for a closed, consistently wound mesh.
    #[must_use]
    pub fn signed_volume(&self) -> f64 {
        self.triangles
            .iter()
            .map(|[a, b, c]| {
                let cross = [
                    b[1] * c[2] - b[2] * c[1],
                    b[2] * c[0] - b[0] * c[2],
                    b[0] * c[1] - b[1] * c[0],
                ];
                (a[0] * cross[0] + a[1] * cross[1] + a[2] * cross[2]) / 6.0
            })
            .sum()
    }
}

/// How an uploaded model's printable volume is estimated
pub trait VolumeStrategy: Send + Sync {
    /// Volume in cm³
    fn volume(&self, mesh: &Mesh, dimensions: Dimensions) -> f64;

    /// Short identifier for logs
    fn name(&self) -> &'static str;
}

/// Fixed 40% of the bounding box volume.
///
/// This is what the storefront quotes with, so it stays the default.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundingBoxHeuristic;

impl VolumeStrategy for BoundingBoxHeuristic {
    fn volume(&self, _mesh: &Mesh, dimensions: Dimensions) -> f64 {
        dimensions.box_volume_cm3() * BOUNDING_BOX_FILL_FACTOR
    }

    fn name(&self) -> &'static str {
        "bounding_box"
    }
}

/// Exact enclosed volume from signed tetrahedron summation
#[derive(Debug, Clone, Copy, Default)]
pub struct MeshIntegration;

impl VolumeStrategy for MeshIntegration {
    fn volume(&self, mesh: &Mesh, _dimensions: Dimensions) -> f64 {
        mesh.signed_volume().abs() / 1000.0
    }

    fn name(&self) -> &'static str {
        "mesh_integration"
    }
}

/// Mesh formats we can parse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFormat {
    Stl,
    Obj,
}

impl ModelFormat {
    /// Maps a file extension (with or without the dot) to a format.
    #[must_use]
    pub fn from_extension(extension: &str) -> Option<Self> {
        let ext = extension.trim().trim_start_matches('.').to_ascii_lowercase();
        match ext.as_str() {
            "stl" => Some(Self::Stl),
            "obj" => Some(Self::Obj),
            _ => None,
        }
    }

    /// Extension of a file name, lowercased
    #[must_use]
    pub fn extension_of(file_name: &str) -> Option<String> {
        std::path::Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
    }

    /// Parses bytes in this format.
    ///
    /// # Errors
    /// Returns [`Error::Mesh`] when the data is malformed.
    pub fn parse(self, bytes: &[u8]) -> Result<Mesh> {
        let mesh = match self {
            Self::Stl => StlParser::parse(bytes)?,
            Self::Obj => ObjParser::parse(bytes)?,
        };
        if mesh.triangles.is_empty() {
            return Err(mesh_error("model contains no triangles"));
        }
        Ok(mesh)
    }
}

/// Parser for one mesh file format
pub trait MeshParser {
    /// # Errors
    /// Returns [`Error::Mesh`] when the data is malformed.
    fn parse(bytes: &[u8]) -> Result<Mesh>;
}

fn mesh_error(reason: impl Into<String>) -> Error {
    Error::Mesh {
        reason: reason.into(),
    }
}

/// STL reader, binary or ASCII
pub struct StlParser;

impl StlParser {
    fn binary_triangle_count(bytes: &[u8]) -> Option<u32> {
        let count_bytes = bytes.get(STL_HEADER_LEN..STL_HEADER_LEN + 4)?;
        Some(u32::from_le_bytes([
            count_bytes[0],
            count_bytes[1],
            count_bytes[2],
            count_bytes[3],
        ]))
    }

    fn is_exact_binary(bytes: &[u8]) -> bool {
        Self::binary_triangle_count(bytes).is_some_and(|count| {
            (STL_HEADER_LEN + 4)
                .checked_add(count as usize * STL_TRIANGLE_LEN)
                .is_some_and(|expected| expected == bytes.len())
        })
    }

    fn looks_ascii(bytes: &[u8]) -> bool {
        let start = bytes
            .iter()
            .position(|b| !b.is_ascii_whitespace())
            .unwrap_or(bytes.len());
        bytes[start..].starts_with(b"solid")
    }

    fn parse_binary(bytes: &[u8]) -> Result<Mesh> {
        let count = Self::binary_triangle_count(bytes)
            .ok_or_else(|| mesh_error("binary STL is shorter than its header"))?;
        if count > MAX_TRIANGLES {
            return Err(mesh_error(format!(
                "binary STL declares {count} triangles, limit is {MAX_TRIANGLES}"
            )));
        }
        let body = &bytes[STL_HEADER_LEN + 4..];
        let needed = count as usize * STL_TRIANGLE_LEN;
        if body.len() < needed {
            return Err(mesh_error(format!(
                "binary STL truncated: {count} triangles need {needed} bytes, found {}",
                body.len()
            )));
        }

        let read_f32 = |chunk: &[u8], offset: usize| {
            f64::from(f32::from_le_bytes([
                chunk[offset],
                chunk[offset + 1],
                chunk[offset + 2],
                chunk[offset + 3],
            ]))
        };

        let triangles = body[..needed]
            .chunks_exact(STL_TRIANGLE_LEN)
            .map(|chunk| {
                // 12 bytes of normal, then three vertices of 12 bytes each
                let vertex = |i: usize| {
                    let base = 12 + i * 12;
                    [
                        read_f32(chunk, base),
                        read_f32(chunk, base + 4),
                        read_f32(chunk, base + 8),
                    ]
                };
                [vertex(0), vertex(1), vertex(2)]
            })
            .collect();
        Ok(Mesh::new(triangles))
    }

    fn parse_ascii(bytes: &[u8]) -> Result<Mesh> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| mesh_error(format!("ASCII STL is not valid UTF-8: {e}")))?;

        let mut vertices: Vec<Vertex> = Vec::new();
        let mut tokens = text.split_ascii_whitespace();
        while let Some(token) = tokens.next() {
            if token != "vertex" {
                continue;
            }
            let mut v = [0.0; 3];
            for coord in &mut v {
                let raw = tokens
                    .next()
                    .ok_or_else(|| mesh_error("vertex is missing coordinates"))?;
                *coord = raw
                    .parse()
                    .map_err(|_| mesh_error(format!("invalid vertex coordinate '{raw}'")))?;
            }
            vertices.push(v);
        }

        if vertices.len() % 3 != 0 {
            return Err(mesh_error(format!(
                "ASCII STL has {} vertices, not a multiple of three",
                vertices.len()
            )));
        }
        Ok(Mesh::new(
            vertices
                .chunks_exact(3)
                .map(|tri| [tri[0], tri[1], tri[2]])
                .collect(),
        ))
    }
}

impl MeshParser for StlParser {
    fn parse(bytes: &[u8]) -> Result<Mesh> {
        if bytes.is_empty() {
            return Err(mesh_error("file is empty"));
        }
        // Binary files may also start with "solid", so an exact size match wins.
        if Self::is_exact_binary(bytes) {
            Self::parse_binary(bytes)
        } else if Self::looks_ascii(bytes) {
            Self::parse_ascii(bytes)
        } else {
            Self::parse_binary(bytes)
        }
    }
}

/// Wavefront OBJ reader (geometry only)
pub struct ObjParser;

impl ObjParser {
    fn resolve_index(token: &str, vertex_count: usize) -> Result<usize> {
        let raw = token.split('/').next().unwrap_or_default();
        let index: i64 = raw
            .parse()
            .map_err(|_| mesh_error(format!("invalid face index '{token}'")))?;
        let resolved = match index {
            0 => return Err(mesh_error("face index 0 is not valid in OBJ")),
            i if i > 0 => usize::try_from(i - 1).ok(),
            i => usize::try_from(i.unsigned_abs())
                .ok()
                .and_then(|back| vertex_count.checked_sub(back)),
        };
        resolved.ok_or_else(|| mesh_error(format!("face index '{token}' is out of range")))
    }
}

impl MeshParser for ObjParser {
    fn parse(bytes: &[u8]) -> Result<Mesh> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| mesh_error(format!("OBJ is not valid UTF-8: {e}")))?;

        let mut vertices: Vec<Vertex> = Vec::new();
        let mut faces: Vec<[usize; 3]> = Vec::new();

        for (line_no, line) in text.lines().enumerate() {
            let mut parts = line.split_ascii_whitespace();
            match parts.next() {
                Some("v") => {
                    let mut v = [0.0; 3];
                    for coord in &mut v {
                        let raw = parts.next().ok_or_else(|| {
                            mesh_error(format!("line {}: vertex needs 3 coordinates", line_no + 1))
                        })?;
                        *coord = raw.parse().map_err(|_| {
                            mesh_error(format!("line {}: invalid coordinate '{raw}'", line_no + 1))
                        })?;
                    }
                    vertices.push(v);
                }
                Some("f") => {
                    let polygon = parts
                        .map(|token| Self::resolve_index(token, vertices.len()))
                        .collect::<Result<Vec<_>>>()?;
                    if polygon.len() < 3 {
                        return Err(mesh_error(format!(
                            "line {}: face needs at least 3 vertices",
                            line_no + 1
                        )));
                    }
                    // Fan triangulation
                    for i in 1..polygon.len() - 1 {
                        faces.push([polygon[0], polygon[i], polygon[i + 1]]);
                    }
                }
                _ => {}
            }
        }

        let triangles = faces
            .into_iter()
            .map(|face| {
                let lookup = |i: usize| {
                    vertices.get(i).copied().ok_or_else(|| {
                        mesh_error(format!(
                            "face references vertex {} but only {} exist",
                            i + 1,
                            vertices.len()
                        ))
                    })
                };
                Ok([lookup(face[0])?, lookup(face[1])?, lookup(face[2])?])
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Mesh::new(triangles))
    }
}

/// What inspection learned about a model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Bounding box extents, in millimetres
    pub dimensions: Dimensions,
    /// Estimated printable volume, in cm³
    pub volume: f64,
    pub triangle_count: usize,
    /// True when the file could not be read and a default cube was assumed
    pub placeholder: bool,
}

impl ModelInfo {
    /// The 50 mm cube quoted for unreadable formats.
    #[must_use]
    pub fn placeholder(strategy: &dyn VolumeStrategy) -> Self {
        let mut info = inspect_mesh(
            &mut Mesh::cuboid(PLACEHOLDER_SIZE_MM, PLACEHOLDER_SIZE_MM, PLACEHOLDER_SIZE_MM),
            strategy,
        );
        info.placeholder = true;
        info
    }
}

/// Measures a parsed mesh and centers it on the origin.
pub fn inspect_mesh(mesh: &mut Mesh, strategy: &dyn VolumeStrategy) -> ModelInfo {
    let dimensions = mesh
        .bounding_box()
        .map(|bbox| bbox.size())
        .unwrap_or_default();
    mesh.center();

    ModelInfo {
        dimensions,
        volume: strategy.volume(mesh, dimensions),
        triangle_count: mesh.triangles.len(),
        placeholder: false,
    }
}

/// Inspects an uploaded file given its extension.
///
/// Unknown extensions yield [`ModelInfo::placeholder`].
///
/// # Errors
/// Returns [`Error::Mesh`] when a recognized format fails to parse.
pub fn inspect_model(
    bytes: &[u8],
    extension: &str,
    strategy: &dyn VolumeStrategy,
) -> Result<ModelInfo> {
    let Some(format) = ModelFormat::from_extension(extension) else {
        tracing::debug!(extension, "Unrecognized model format, using placeholder box");
        return Ok(ModelInfo::placeholder(strategy));
    };

    let mut mesh = format.parse(bytes)?;
    let info = inspect_mesh(&mut mesh, strategy);
    tracing::debug!(
        extension,
        strategy = strategy.name(),
        triangles = info.triangle_count,
        volume = info.volume,
        "Inspected model"
    );
    Ok(info)
}
