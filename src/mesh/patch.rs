use super::{checked_count, MeshError};

/// Control points per quad patch.
pub const VERTICES_PER_PATCH: u32 = 4;
/// Position (3) + texture coordinate (2).
pub const FLOATS_PER_VERTEX: usize = 5;

/// Emit `resolution²` independent quad patches covering
/// `[-width/2, width/2] × [-height/2, height/2]` on the `y = 0` plane.
///
/// Patches do not share vertices. Patch `(i, j)` emits its corners in the
/// order `(i, j)`, `(i+1, j)`, `(i, j+1)`, `(i+1, j+1)`, each as
/// `[x, 0, z, u, v]` where `(u, v)` is the normalized grid coordinate used to
/// sample the heightmap during displacement.
///
/// # Errors
///
/// Returns [`MeshError::ZeroDivisions`] when `resolution` is zero, or
/// [`MeshError::IndexOverflow`] for grids past the `u32` vertex range.
#[allow(clippy::cast_precision_loss)]
pub fn patch_grid(
    width: f32,
    height: f32,
    resolution: u32,
) -> Result<Vec<f32>, MeshError> {
    if resolution == 0 {
        return Err(MeshError::ZeroDivisions);
    }
    let vertex_count = checked_count(&[
        resolution as usize,
        resolution as usize,
        VERTICES_PER_PATCH as usize,
    ])? as usize;

    let rez = resolution as f32;
    let corner = |i: u32, j: u32| -> [f32; FLOATS_PER_VERTEX] {
        let (u, v) = (i as f32 / rez, j as f32 / rez);
        [-width / 2.0 + width * u, 0.0, -height / 2.0 + height * v, u, v]
    };

    let mut vertices = Vec::with_capacity(vertex_count * FLOATS_PER_VERTEX);
    for i in 0..resolution {
        for j in 0..resolution {
            vertices.extend_from_slice(&corner(i, j));
            vertices.extend_from_slice(&corner(i + 1, j));
            vertices.extend_from_slice(&corner(i, j + 1));
            vertices.extend_from_slice(&corner(i + 1, j + 1));
        }
    }
    Ok(vertices)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertex(data: &[f32], n: usize) -> &[f32] {
        &data[n * FLOATS_PER_VERTEX..(n + 1) * FLOATS_PER_VERTEX]
    }

    #[test]
    fn single_patch_spans_extent() {
        let data = patch_grid(10.0, 4.0, 1).unwrap();
        assert_eq!(data.len(), 4 * FLOATS_PER_VERTEX);
        assert_eq!(vertex(&data, 0), &[-5.0, 0.0, -2.0, 0.0, 0.0]);
        assert_eq!(vertex(&data, 1), &[5.0, 0.0, -2.0, 1.0, 0.0]);
        assert_eq!(vertex(&data, 2), &[-5.0, 0.0, 2.0, 0.0, 1.0]);
        assert_eq!(vertex(&data, 3), &[5.0, 0.0, 2.0, 1.0, 1.0]);
    }

    #[test]
    fn vertex_count_is_four_per_patch() {
        for rez in [1_u32, 2, 5, 20] {
            let data = patch_grid(64.0, 64.0, rez).unwrap();
            assert_eq!(
                data.len(),
                (rez * rez * VERTICES_PER_PATCH) as usize * FLOATS_PER_VERTEX
            );
        }
    }

    #[test]
    fn texture_coordinates_stay_normalized() {
        let data = patch_grid(512.0, 256.0, 7).unwrap();
        for v in data.chunks(FLOATS_PER_VERTEX) {
            assert!((0.0..=1.0).contains(&v[3]));
            assert!((0.0..=1.0).contains(&v[4]));
            assert!(v[0].abs() <= 256.0 + 1e-3);
            assert!(v[2].abs() <= 128.0 + 1e-3);
            assert_eq!(v[1], 0.0);
        }
    }

    #[test]
    fn neighbouring_patches_do_not_share_vertices() {
        // Patch (0,0) and patch (0,1) meet along an edge; both carry their own
        // copy of the shared corners.
        let data = patch_grid(2.0, 2.0, 2).unwrap();
        let first_patch_far = vertex(&data, 2);
        let second_patch_near = vertex(&data, 4);
        assert_eq!(first_patch_far, second_patch_near);
    }

    #[test]
    fn zero_resolution_is_an_error() {
        assert_eq!(patch_grid(1.0, 1.0, 0), Err(MeshError::ZeroDivisions));
    }

    #[test]
    fn oversized_resolution_is_an_overflow_error() {
        assert_eq!(patch_grid(1.0, 1.0, 1 << 31), Err(MeshError::IndexOverflow));
        // 65_536² patches of four corners is exactly 2^34 vertices.
        assert_eq!(patch_grid(1.0, 1.0, 1 << 16), Err(MeshError::IndexOverflow));
        assert_eq!(patch_grid(1.0, 1.0, u32::MAX), Err(MeshError::IndexOverflow));
    }
}
