use glam::Vec3;

use super::{checked_count, MeshError};

/// `div + 1` evenly spaced points from `start` to `end`, flattened to
/// `[x, y, z, x, y, z, ...]`.
///
/// # Errors
///
/// Returns [`MeshError::ZeroDivisions`] when `div` is zero, or
/// [`MeshError::IndexOverflow`] when `div + 1` points exceed the `u32` range.
#[allow(clippy::cast_precision_loss)]
pub fn line(start: Vec3, end: Vec3, div: u32) -> Result<Vec<f32>, MeshError> {
    if div == 0 {
        return Err(MeshError::ZeroDivisions);
    }
    let points = checked_count(&[div as usize + 1])?;
    let direction = (end - start) / div as f32;
    let mut vertices = Vec::with_capacity(points as usize * 3);
    for i in 0..=div {
        let current = start + direction * i as f32;
        vertices.extend_from_slice(&current.to_array());
    }
    Ok(vertices)
}

/// Subdivide the quadrilateral `v0 v1 v2 v3` into a `(div + 1)²` point grid.
///
/// ```text
/// v3 --- v2
/// |      |
/// v0 --- v1
/// ```
///
/// Row `i` runs from `v0 + (v3 - v0) * i / div` to `v1 + (v2 - v1) * i / div`,
/// so vertex `(i, j)` lands at flat index `i * (div + 1) + j`.
///
/// # Errors
///
/// Returns [`MeshError::ZeroDivisions`] when `div` is zero, or
/// [`MeshError::IndexOverflow`] when the grid has more points than `u32`
/// indices can address.
#[allow(clippy::cast_precision_loss)]
pub fn plane(
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
    v3: Vec3,
    div: u32,
) -> Result<Vec<f32>, MeshError> {
    if div == 0 {
        return Err(MeshError::ZeroDivisions);
    }
    let row_points = div as usize + 1;
    let vertex_count = checked_count(&[row_points, row_points])?;

    let basis_x = (v3 - v0) / div as f32;
    let basis_y = (v2 - v1) / div as f32;

    let mut vertices = Vec::with_capacity(vertex_count as usize * 3);
    for i in 0..=div {
        let start = v0 + basis_x * i as f32;
        let end = v1 + basis_y * i as f32;
        vertices.extend(line(start, end, div)?);
    }
    Ok(vertices)
}

/// Triangle-list indices for a [`plane`] grid with `div` cells per side.
///
/// ```text
/// idx+div+1 --- idx+div+2
/// |          /  |
/// |       /     |
/// idx -------- idx+1
/// ```
///
/// Each cell emits `{idx, idx+div+2, idx+div+1}` then
/// `{idx, idx+1, idx+div+2}`. The winding is what makes the face
/// orientation consistent across the grid.
///
/// # Errors
///
/// Returns [`MeshError::ZeroDivisions`] when `div` is zero, or
/// [`MeshError::IndexOverflow`] when the grid's points or indices exceed the
/// `u32` range.
pub fn plane_indices(div: u32) -> Result<Vec<u32>, MeshError> {
    if div == 0 {
        return Err(MeshError::ZeroDivisions);
    }
    let row_points = div as usize + 1;
    let _ = checked_count(&[row_points, row_points])?;
    let index_count = checked_count(&[6, div as usize, div as usize])?;

    let stride = div + 1;
    let mut indices = Vec::with_capacity(index_count as usize);
    for i in 0..div {
        for j in 0..div {
            let index = i * stride + j;
            // top
            indices.extend_from_slice(&[
                index,
                index + stride + 1,
                index + stride,
            ]);
            // bottom
            indices.extend_from_slice(&[index, index + 1, index + stride + 1]);
        }
    }
    Ok(indices)
}
