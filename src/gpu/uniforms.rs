//! Uniform block reflection and CPU-side staging.
//!
//! Every terrain shader declares one uniform struct at `@group(0)
//! @binding(0)`. [`UniformBlock::reflect`] walks the composed naga module to
//! find that struct and records each member's byte offset and type, so the
//! renderer can write uniforms by name instead of mirroring the WGSL layout
//! in a `#[repr(C)]` Rust struct.

use std::fmt;

use glam::{Mat4, Vec2, Vec3, Vec4};
use rustc_hash::FxHashMap;

use super::shader::ShaderError;

/// Bind group index of the uniform block.
pub const UNIFORM_GROUP: u32 = 0;
/// Binding index of the uniform block within its group.
pub const UNIFORM_BINDING: u32 = 0;

/// WGSL types a uniform member can be written as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniformType {
    /// `f32`
    F32,
    /// `i32`
    I32,
    /// `u32`
    U32,
    /// `vec2<f32>`
    Vec2,
    /// `vec3<f32>`
    Vec3,
    /// `vec4<f32>`
    Vec4,
    /// `mat4x4<f32>`
    Mat4,
}

impl UniformType {
    /// Bytes written for one value of this type.
    #[must_use]
    pub const fn size(self) -> usize {
        match self {
            Self::F32 | Self::I32 | Self::U32 => 4,
            Self::Vec2 => 8,
            Self::Vec3 => 12,
            Self::Vec4 => 16,
            Self::Mat4 => 64,
        }
    }

    fn from_naga(inner: &naga::TypeInner) -> Option<Self> {
        use naga::{Scalar, TypeInner, VectorSize};

        match *inner {
            TypeInner::Scalar(Scalar::F32) => Some(Self::F32),
            TypeInner::Scalar(Scalar::I32) => Some(Self::I32),
            TypeInner::Scalar(Scalar::U32) => Some(Self::U32),
            TypeInner::Vector {
                size,
                scalar: Scalar::F32,
            } => match size {
                VectorSize::Bi => Some(Self::Vec2),
                VectorSize::Tri => Some(Self::Vec3),
                VectorSize::Quad => Some(Self::Vec4),
            },
            TypeInner::Matrix {
                columns: VectorSize::Quad,
                rows: VectorSize::Quad,
                scalar: Scalar::F32,
            } => Some(Self::Mat4),
            _ => None,
        }
    }
}

impl fmt::Display for UniformType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::F32 => "f32",
            Self::I32 => "i32",
            Self::U32 => "u32",
            Self::Vec2 => "vec2<f32>",
            Self::Vec3 => "vec3<f32>",
            Self::Vec4 => "vec4<f32>",
            Self::Mat4 => "mat4x4<f32>",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy)]
struct Member {
    offset: usize,
    ty: UniformType,
}

/// Reflected uniform struct plus the bytes that will be uploaded.
#[derive(Debug, Clone)]
pub struct UniformBlock {
    members: FxHashMap<String, Member>,
    data: Vec<u8>,
}

impl UniformBlock {
    /// Find the `@group(0) @binding(0)` uniform struct in `module` and lay
    /// out a zeroed staging buffer for it.
    ///
    /// Members of types without a setter (arrays, nested structs) are
    /// skipped; they keep their zeroed bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ShaderError::MissingUniformBlock`] when the module declares
    /// no uniform struct at that binding.
    pub fn reflect(
        shader: &str,
        module: &naga::Module,
    ) -> Result<Self, ShaderError> {
        let missing = || ShaderError::MissingUniformBlock {
            shader: shader.to_owned(),
        };

        let global = module
            .global_variables
            .iter()
            .map(|(_, var)| var)
            .find(|var| {
                var.space == naga::AddressSpace::Uniform
                    && var.binding.as_ref().is_some_and(|b| {
                        b.group == UNIFORM_GROUP && b.binding == UNIFORM_BINDING
                    })
            })
            .ok_or_else(missing)?;

        let naga::TypeInner::Struct {
            ref members,
            span,
        } = module.types[global.ty].inner
        else {
            return Err(missing());
        };

        let members = members
            .iter()
            .filter_map(|member| {
                let name = member.name.clone()?;
                let ty =
                    UniformType::from_naga(&module.types[member.ty].inner)?;
                Some((
                    name,
                    Member {
                        offset: member.offset as usize,
                        ty,
                    },
                ))
            })
            .collect();

        // Uniform buffer bindings are sized in 16-byte steps.
        let size = (span as usize).next_multiple_of(16).max(16);
        Ok(Self {
            members,
            data: vec![0; size],
        })
    }

    /// Staged bytes, ready for `Queue::write_buffer`.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Size of the uniform buffer in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    /// Whether the block has a settable member called `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.members.contains_key(name)
    }

    /// Byte offset and type of a member.
    #[must_use]
    pub fn member(&self, name: &str) -> Option<(usize, UniformType)> {
        self.members.get(name).map(|m| (m.offset, m.ty))
    }

    /// Write a 4×4 matrix (column-major).
    ///
    /// # Errors
    ///
    /// [`ShaderError::UnknownUniform`] or [`ShaderError::UniformTypeMismatch`].
    pub fn set_mat4(&mut self, name: &str, value: Mat4) -> Result<(), ShaderError> {
        self.write(name, UniformType::Mat4, bytemuck::bytes_of(&value.to_cols_array()))
    }

    /// Write a `vec2<f32>`.
    ///
    /// # Errors
    ///
    /// [`ShaderError::UnknownUniform`] or [`ShaderError::UniformTypeMismatch`].
    pub fn set_vec2(&mut self, name: &str, value: Vec2) -> Result<(), ShaderError> {
        self.write(name, UniformType::Vec2, bytemuck::bytes_of(&value.to_array()))
    }

    /// Write a `vec3<f32>`.
    ///
    /// # Errors
    ///
    /// [`ShaderError::UnknownUniform`] or [`ShaderError::UniformTypeMismatch`].
    pub fn set_vec3(&mut self, name: &str, value: Vec3) -> Result<(), ShaderError> {
        self.write(name, UniformType::Vec3, bytemuck::bytes_of(&value.to_array()))
    }

    /// Write a `vec4<f32>`.
    ///
    /// # Errors
    ///
    /// [`ShaderError::UnknownUniform`] or [`ShaderError::UniformTypeMismatch`].
    pub fn set_vec4(&mut self, name: &str, value: Vec4) -> Result<(), ShaderError> {
        self.write(name, UniformType::Vec4, bytemuck::bytes_of(&value.to_array()))
    }

    /// Write an `f32`.
    ///
    /// # Errors
    ///
    /// [`ShaderError::UnknownUniform`] or [`ShaderError::UniformTypeMismatch`].
    pub fn set_f32(&mut self, name: &str, value: f32) -> Result<(), ShaderError> {
        self.write(name, UniformType::F32, bytemuck::bytes_of(&value))
    }

    /// Write an `i32`.
    ///
    /// # Errors
    ///
    /// [`ShaderError::UnknownUniform`] or [`ShaderError::UniformTypeMismatch`].
    pub fn set_i32(&mut self, name: &str, value: i32) -> Result<(), ShaderError> {
        self.write(name, UniformType::I32, bytemuck::bytes_of(&value))
    }

    /// Write a `u32`.
    ///
    /// # Errors
    ///
    /// [`ShaderError::UnknownUniform`] or [`ShaderError::UniformTypeMismatch`].
    pub fn set_u32(&mut self, name: &str, value: u32) -> Result<(), ShaderError> {
        self.write(name, UniformType::U32, bytemuck::bytes_of(&value))
    }

    fn write(
        &mut self,
        name: &str,
        ty: UniformType,
        bytes: &[u8],
    ) -> Result<(), ShaderError> {
        let member = self
            .members
            .get(name)
            .ok_or_else(|| ShaderError::UnknownUniform(name.to_owned()))?;
        if member.ty != ty {
            return Err(ShaderError::UniformTypeMismatch {
                name: name.to_owned(),
                expected: member.ty,
                found: ty,
            });
        }
        let end = member.offset + bytes.len();
        self.data[member.offset..end].copy_from_slice(bytes);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = r"
struct Uniforms {
    model: mat4x4<f32>,
    tint: vec3<f32>,
    y_scale: f32,
    offset: vec2<f32>,
    level: u32,
    bias: i32,
    weights: array<vec4<f32>, 2>,
};

@group(0) @binding(0) var<uniform> uniforms: Uniforms;

@vertex
fn vs_main(@location(0) pos: vec3<f32>) -> @builtin(position) vec4<f32> {
    return uniforms.model * vec4<f32>(pos * uniforms.tint * uniforms.y_scale, 1.0);
}
";

    fn block() -> UniformBlock {
        let module = naga::front::wgsl::parse_str(SOURCE).unwrap();
        UniformBlock::reflect("test", &module).unwrap()
    }

    fn read_f32(block: &UniformBlock, offset: usize) -> f32 {
        bytemuck::pod_read_unaligned(&block.bytes()[offset..offset + 4])
    }

    #[test]
    fn reflects_wgsl_offsets() {
        let block = block();
        assert_eq!(block.member("model"), Some((0, UniformType::Mat4)));
        assert_eq!(block.member("tint"), Some((64, UniformType::Vec3)));
        // f32 packs into the tail of the vec3 slot.
        assert_eq!(block.member("y_scale"), Some((76, UniformType::F32)));
        assert_eq!(block.member("offset"), Some((80, UniformType::Vec2)));
        assert_eq!(block.member("level"), Some((88, UniformType::U32)));
        assert_eq!(block.member("bias"), Some((92, UniformType::I32)));
        assert!(!block.contains("weights"));
        assert_eq!(block.size(), 128);
    }

    #[test]
    fn setters_write_at_reflected_offsets() {
        let mut block = block();
        block
            .set_mat4("model", Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0)))
            .unwrap();
        block.set_f32("y_scale", 0.25).unwrap();
        block.set_vec3("tint", Vec3::new(0.5, 0.6, 0.7)).unwrap();
        block.set_u32("level", 16).unwrap();
        block.set_i32("bias", -3).unwrap();
        block.set_vec2("offset", Vec2::new(-4.0, 8.0)).unwrap();

        // Translation lives in column 3.
        assert_eq!(read_f32(&block, 48), 1.0);
        assert_eq!(read_f32(&block, 52), 2.0);
        assert_eq!(read_f32(&block, 56), 3.0);
        assert_eq!(read_f32(&block, 60), 1.0);
        assert_eq!(read_f32(&block, 64), 0.5);
        assert_eq!(read_f32(&block, 72), 0.7);
        assert_eq!(read_f32(&block, 76), 0.25);
        assert_eq!(read_f32(&block, 80), -4.0);
        assert_eq!(read_f32(&block, 84), 8.0);
        let level: u32 = bytemuck::pod_read_unaligned(&block.bytes()[88..92]);
        let bias: i32 = bytemuck::pod_read_unaligned(&block.bytes()[92..96]);
        assert_eq!(level, 16);
        assert_eq!(bias, -3);
    }

    #[test]
    fn unknown_and_mismatched_names_are_errors() {
        let mut block = block();
        assert!(matches!(
            block.set_f32("y_shift", 1.0),
            Err(ShaderError::UnknownUniform(ref name)) if name == "y_shift"
        ));
        assert!(matches!(
            block.set_vec4("tint", Vec4::ONE),
            Err(ShaderError::UniformTypeMismatch {
                expected: UniformType::Vec3,
                found: UniformType::Vec4,
                ..
            })
        ));
        // Failed writes leave the staging bytes untouched.
        assert!(block.bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn module_without_uniforms_is_rejected() {
        let module = naga::front::wgsl::parse_str(
            "@vertex fn vs_main() -> @builtin(position) vec4<f32> { return vec4<f32>(0.0); }",
        )
        .unwrap();
        assert!(matches!(
            UniformBlock::reflect("bare", &module),
            Err(ShaderError::MissingUniformBlock { ref shader }) if shader == "bare"
        ));
    }
}
