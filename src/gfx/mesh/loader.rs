//! # Mesh Loader
//!
//! Parses the line-oriented text mesh format:
//!
//! ```text
//! # comment
//! v 0.0 0.0 0.0
//! v 1.0 0.0 0.0
//! v 1.0 1.0 0.0
//! v 0.0 1.0 0.0
//! f 1 2 3 4
//! f 1/1/1 2/2/2 3/3/3
//! ```
//!
//! - `v x y z` declares a vertex.
//! - `f a b c [d]` declares a triangle or convex quad. Each reference is
//!   `index[/texture[/normal]]` with a 1-based `index`; the other sub-fields
//!   are ignored.
//! - Every other line is ignored.
//!
//! Quads are split with a fixed fan, `(v0, v1, v2)` and `(v0, v2, v3)`.

use std::path::Path;

use cgmath::{Vector3, Zero};
use log::debug;

use super::{Bounds, Mesh};
use crate::error::{SceneError, SceneResult};

/// Parses mesh text and normalizes the result.
pub fn load(source: &str) -> SceneResult<Mesh> {
    load_with_context(source, "mesh")
}

/// Reads and parses a mesh file.
pub fn load_file(path: impl AsRef<Path>) -> SceneResult<Mesh> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path).map_err(|source| SceneError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mesh = load_with_context(&source, &path.display().to_string())?;

    debug!(
        "Loaded mesh {}: {} vertices, {} triangles",
        path.display(),
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    Ok(mesh)
}

fn load_with_context(source: &str, context: &str) -> SceneResult<Mesh> {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();
    // Largest referenced index and the line it appeared on, checked once all
    // vertices are known.
    let mut highest_ref: Option<(u32, usize)> = None;

    for (number, line) in source.lines().enumerate() {
        let line_no = number + 1;
        let mut tokens = line.split_whitespace();

        match tokens.next() {
            Some("v") => {
                for axis in 0..3 {
                    let token = tokens.next().ok_or_else(|| {
                        SceneError::parse(
                            context,
                            line_no,
                            format!("vertex is missing coordinate {}", axis),
                        )
                    })?;
                    vertices.push(parse_coordinate(token, context, line_no)?);
                }
            }
            Some("f") => {
                let refs = tokens
                    .map(|token| parse_vertex_ref(token, context, line_no))
                    .collect::<SceneResult<Vec<u32>>>()?;

                for &r in &refs {
                    if highest_ref.map_or(true, |(max, _)| r > max) {
                        highest_ref = Some((r, line_no));
                    }
                }

                match refs.as_slice() {
                    [a, b, c] => indices.extend_from_slice(&[*a, *b, *c]),
                    [a, b, c, d] => indices.extend_from_slice(&triangulate_quad([*a, *b, *c, *d])),
                    _ => {
                        return Err(SceneError::UnsupportedFaceFormat {
                            line: line_no,
                            arity: refs.len(),
                        })
                    }
                }
            }
            _ => {}
        }
    }

    let vertex_count = vertices.len() / 3;
    if let Some((max, line_no)) = highest_ref {
        if max as usize >= vertex_count {
            return Err(SceneError::parse(
                context,
                line_no,
                format!(
                    "face references vertex {} but only {} vertices are declared",
                    max + 1,
                    vertex_count
                ),
            ));
        }
    }

    normalize(&mut vertices);
    Ok(Mesh::new(vertices, indices))
}

fn parse_coordinate(token: &str, context: &str, line: usize) -> SceneResult<f32> {
    match token.parse::<f32>() {
        Ok(value) if value.is_finite() => Ok(value),
        Ok(_) => Err(SceneError::parse(context, line, format!("non-finite coordinate '{}'", token))),
        Err(e) => Err(SceneError::parse(context, line, format!("invalid coordinate '{}': {}", token, e))),
    }
}

/// Parses the leading index of `index[/..[/..]]` and converts it to 0-based.
fn parse_vertex_ref(token: &str, context: &str, line: usize) -> SceneResult<u32> {
    let index = token.split('/').next().unwrap_or_default();
    match index.parse::<u32>() {
        Ok(0) => Err(SceneError::parse(context, line, "vertex indices are 1-based, found 0")),
        Ok(i) => Ok(i - 1),
        Err(e) => Err(SceneError::parse(
            context,
            line,
            format!("invalid vertex reference '{}': {}", token, e),
        )),
    }
}

/// Splits a convex quad into two triangles sharing the `a`–`c` diagonal.
pub fn triangulate_quad([a, b, c, d]: [u32; 4]) -> [u32; 6] {
    [a, b, c, a, c, d]
}

/// Centres flattened positions on the origin and scales them uniformly so the
/// longest bounding-box axis spans exactly 2.
///
/// An empty slice is left untouched. When every vertex coincides (zero
/// longest extent) the positions are recentred but not scaled.
///
/// Centre and extent are computed in `f64`, so coordinates near `f32::MAX`
/// still normalize to finite values.
pub fn normalize(vertices: &mut [f32]) {
    let Some(bounds) = Bounds::from_positions(vertices) else {
        return;
    };

    let min = bounds.min.cast::<f64>().unwrap_or(Vector3::zero());
    let max = bounds.max.cast::<f64>().unwrap_or(Vector3::zero());
    let center = (min + max) * 0.5;
    let extent = max - min;
    let max_extent = extent.x.max(extent.y).max(extent.z);
    let scale = if max_extent > 0.0 { 2.0 / max_extent } else { 1.0 };

    for p in vertices.chunks_exact_mut(3) {
        p[0] = ((f64::from(p[0]) - center.x) * scale) as f32;
        p[1] = ((f64::from(p[1]) - center.y) * scale) as f32;
        p[2] = ((f64::from(p[2]) - center.z) * scale) as f32;
    }
}
