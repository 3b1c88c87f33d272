use super::{checked_count, Heightmap, Mesh, MeshError, PrimitiveMode};

/// Linear mapping from an 8-bit sample to a vertex height:
/// `y = sample * y_scale + y_shift`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightParams {
    /// World units per sample step.
    pub y_scale: f32,
    /// Constant vertical offset.
    pub y_shift: f32,
}

impl Default for HeightParams {
    fn default() -> Self {
        Self {
            y_scale: 64.0 / 256.0,
            y_shift: -8.0,
        }
    }
}

impl HeightParams {
    /// World-space height for one sample.
    #[must_use]
    pub fn height(self, sample: u8) -> f32 {
        f32::from(sample) * self.y_scale + self.y_shift
    }
}

/// Build a heightmap-displaced grid indexed as triangle strips.
///
/// Pixel `(i, j)` (row, column) becomes the vertex
/// `(-height/2 + i, sample * y_scale + y_shift, -width/2 + j)`. For each row
/// `i` below the last, every column `j` contributes the pair
/// `j + width * i`, `j + width * (i + 1)`, so each row is one zig-zag strip of
/// `width * 2` indices. The renderer issues one strip draw per row.
///
/// # Errors
///
/// Returns [`MeshError::IndexOverflow`] when `width * height` vertices or
/// the strip indices exceed the `u32` range.
#[allow(clippy::cast_precision_loss)]
pub fn strip_mesh(
    heightmap: &Heightmap,
    params: HeightParams,
) -> Result<Mesh, MeshError> {
    let width = heightmap.width();
    let height = heightmap.height();
    let vertex_count = checked_count(&[width as usize, height as usize])?;

    let half_height = height as f32 / 2.0;
    let half_width = width as f32 / 2.0;

    let mut vertices = Vec::with_capacity(vertex_count as usize * 3);
    for (index, &sample) in heightmap.samples().iter().enumerate() {
        let i = index / width as usize;
        let j = index % width as usize;
        vertices.extend_from_slice(&[
            -half_height + i as f32,
            params.height(sample),
            -half_width + j as f32,
        ]);
    }

    let strips = height - 1;
    let indices_per_strip = checked_count(&[width as usize, 2])?;
    let index_count =
        checked_count(&[strips as usize, indices_per_strip as usize])?;
    let mut indices = Vec::with_capacity(index_count as usize);
    for i in 0..strips {
        for j in 0..width {
            for k in 0..2 {
                indices.push(j + width * (i + k));
            }
        }
    }

    log::debug!(
        "Strip mesh: {} vertices, {strips} strips of {indices_per_strip} indices",
        vertices.len() / 3
    );

    Ok(Mesh {
        vertices,
        indices,
        floats_per_vertex: 3,
        primitive: PrimitiveMode::TriangleStrip {
            strips,
            indices_per_strip,
        },
    })
}

#[cfg(test)]
mod tests {
    use rand::Rng;

    use super::*;

    #[test]
    fn two_by_two_is_one_strip() {
        let map = Heightmap::from_pixels(2, 2, 1, &[0, 128, 255, 64]).unwrap();
        let mesh = strip_mesh(&map, HeightParams::default()).unwrap();

        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.indices, vec![0, 2, 1, 3]);
        assert_eq!(
            mesh.primitive,
            PrimitiveMode::TriangleStrip {
                strips: 1,
                indices_per_strip: 4,
            }
        );

        let ys: Vec<f32> = mesh.vertices.chunks(3).map(|v| v[1]).collect();
        let expected: Vec<f32> = [0_u8, 128, 255, 64]
            .iter()
            .map(|&s| f32::from(s) * 64.0 / 256.0 - 8.0)
            .collect();
        assert_eq!(ys, expected);
    }

    #[test]
    fn vertices_are_centered_on_origin() {
        let map = Heightmap::from_fn(4, 2, |_, _| 0).unwrap();
        let mesh = strip_mesh(&map, HeightParams::default()).unwrap();
        // First vertex: x = -height/2, z = -width/2.
        assert_eq!(&mesh.vertices[..3], &[-1.0, -8.0, -2.0]);
        // Last vertex: row 1, column 3.
        assert_eq!(&mesh.vertices[mesh.vertices.len() - 3..], &[0.0, -8.0, 1.0]);
    }

    #[test]
    fn strips_alternate_between_rows() {
        let mut rng = rand::rng();
        let width = rng.random_range(2..24_u32);
        let height = rng.random_range(2..24_u32);
        let map = Heightmap::from_fn(width, height, |_, _| rng.random()).unwrap();
        let mesh = strip_mesh(&map, HeightParams::default()).unwrap();

        assert!(mesh.validate().is_ok());
        assert_eq!(
            mesh.indices.len(),
            ((height - 1) * width * 2) as usize
        );
        for (row, strip) in mesh.indices.chunks(width as usize * 2).enumerate() {
            for pair in strip.chunks(2) {
                assert_eq!(pair[0] / width, row as u32);
                assert_eq!(pair[1] / width, row as u32 + 1);
                assert_eq!(pair[0] % width, pair[1] % width);
            }
        }
    }

    #[test]
    fn single_row_has_no_strips() {
        let map = Heightmap::from_fn(5, 1, |_, j| j as u8).unwrap();
        let mesh = strip_mesh(&map, HeightParams::default()).unwrap();
        assert_eq!(mesh.vertex_count(), 5);
        assert!(mesh.indices.is_empty());
    }

    #[test]
    fn height_mapping_is_monotonic() {
        let params = HeightParams {
            y_scale: 0.5,
            y_shift: 3.0,
        };
        assert_eq!(params.height(0), 3.0);
        assert_eq!(params.height(10), 8.0);
        assert!(params.height(200) > params.height(199));
    }
}
