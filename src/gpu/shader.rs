//! WGSL shader loading with `#import` support via naga-oil.
//!
//! A shader directory holds top-level shaders (`<name>.wgsl`, each with a
//! `vs_main` and `fs_main` entry point) and a `modules/` subdirectory of
//! shared code. Shared modules declare `#define_import_path relief::<name>`
//! and are pulled in with `#import`. Every composed module is validated with
//! naga before any GPU object is created, so a broken shader is reported as
//! a [`ShaderError`] instead of a driver panic at pipeline creation.

use std::{
    borrow::Cow,
    fmt, fs,
    path::{Path, PathBuf},
};

use log::{debug, info};
use naga_oil::compose::{
    ComposableModuleDescriptor, Composer, NagaModuleDescriptor,
    ShaderLanguage, ShaderType,
};

use super::{
    render_context::RenderContext,
    uniforms::{UniformBlock, UniformType, UNIFORM_BINDING},
};

/// Errors from reading, composing, validating or addressing shaders.
#[derive(Debug)]
pub enum ShaderError {
    /// A shader or module file could not be read.
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// naga-oil rejected a module or failed to resolve its imports.
    Compose {
        /// Shader or module name.
        shader: String,
        /// Composer diagnostic.
        message: String,
    },
    /// The composed module failed naga validation.
    Validation {
        /// Shader name.
        shader: String,
        /// Validator diagnostic.
        message: String,
    },
    /// No `var<uniform>` struct at `@group(0) @binding(0)`.
    MissingUniformBlock {
        /// Shader name.
        shader: String,
    },
    /// A setter named a member the uniform struct does not have.
    UnknownUniform(String),
    /// A setter's value type differs from the member's WGSL type.
    UniformTypeMismatch {
        /// Member name.
        name: String,
        /// Declared WGSL type.
        expected: UniformType,
        /// Type the caller tried to write.
        found: UniformType,
    },
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot read {}: {source}", path.display())
            }
            Self::Compose { shader, message } => {
                write!(f, "failed to compose '{shader}': {message}")
            }
            Self::Validation { shader, message } => {
                write!(f, "shader '{shader}' failed validation: {message}")
            }
            Self::MissingUniformBlock { shader } => write!(
                f,
                "shader '{shader}' declares no uniform struct at \
                 @group(0) @binding(0)"
            ),
            Self::UnknownUniform(name) => {
                write!(f, "no uniform member named '{name}'")
            }
            Self::UniformTypeMismatch {
                name,
                expected,
                found,
            } => write!(
                f,
                "uniform '{name}' is {expected}, cannot write {found}"
            ),
        }
    }
}

impl std::error::Error for ShaderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

fn read_source(path: &Path) -> Result<String, ShaderError> {
    fs::read_to_string(path).map_err(|source| ShaderError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// A composed, validated shader and its reflected uniform block.
#[derive(Debug)]
pub struct ComposedShader {
    /// Shader name (file stem).
    pub name: String,
    /// Validated naga IR.
    pub module: naga::Module,
    /// Uniform layout with zeroed staging bytes.
    pub uniforms: UniformBlock,
}

/// Loads shared modules once and composes top-level shaders on demand.
pub struct ShaderLibrary {
    dir: PathBuf,
    composer: Composer,
}

impl ShaderLibrary {
    /// Register every `modules/*.wgsl` file under `dir` as a composable
    /// module.
    ///
    /// Modules are registered in file-name order, so a module may only
    /// import modules whose file names sort before its own. A missing
    /// `modules/` directory is not an error.
    ///
    /// # Errors
    ///
    /// [`ShaderError::Io`] if a module cannot be read,
    /// [`ShaderError::Compose`] if naga-oil rejects one.
    pub fn load(dir: impl Into<PathBuf>) -> Result<Self, ShaderError> {
        let dir = dir.into();
        let mut composer = Composer::default();

        let modules_dir = dir.join("modules");
        let mut module_paths = match fs::read_dir(&modules_dir) {
            Ok(entries) => entries
                .filter_map(Result::ok)
                .map(|entry| entry.path())
                .filter(|path| path.extension().is_some_and(|e| e == "wgsl"))
                .collect::<Vec<_>>(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(source) => {
                return Err(ShaderError::Io {
                    path: modules_dir,
                    source,
                })
            }
        };
        module_paths.sort();

        for path in &module_paths {
            let source = read_source(path)?;
            let file_path = path.to_string_lossy();
            let _ = composer
                .add_composable_module(ComposableModuleDescriptor {
                    source: &source,
                    file_path: &file_path,
                    language: ShaderLanguage::Wgsl,
                    ..Default::default()
                })
                .map_err(|e| ShaderError::Compose {
                    shader: file_path.to_string(),
                    message: e.to_string(),
                })?;
            debug!("registered shader module {}", path.display());
        }

        info!(
            "shader library at {} ({} shared modules)",
            dir.display(),
            module_paths.len()
        );
        Ok(Self { dir, composer })
    }

    /// Read `<dir>/<name>.wgsl`, compose and validate it.
    ///
    /// # Errors
    ///
    /// Any [`ShaderError`] from reading, composing, validating or
    /// reflecting the shader.
    pub fn compose(&mut self, name: &str) -> Result<ComposedShader, ShaderError> {
        let path = self.dir.join(format!("{name}.wgsl"));
        let source = read_source(&path)?;
        self.compose_source(name, &source)
    }

    /// Compose and validate WGSL held in memory.
    ///
    /// # Errors
    ///
    /// See [`compose`](Self::compose).
    pub fn compose_source(
        &mut self,
        name: &str,
        source: &str,
    ) -> Result<ComposedShader, ShaderError> {
        let file_path = format!("{name}.wgsl");
        let module = self
            .composer
            .make_naga_module(NagaModuleDescriptor {
                source,
                file_path: &file_path,
                shader_type: ShaderType::Wgsl,
                ..Default::default()
            })
            .map_err(|e| ShaderError::Compose {
                shader: name.to_owned(),
                message: e.to_string(),
            })?;

        let _ = naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::default(),
        )
        .validate(&module)
        .map_err(|e| ShaderError::Validation {
            shader: name.to_owned(),
            message: e.to_string(),
        })?;

        let uniforms = UniformBlock::reflect(name, &module)?;
        debug!("composed shader '{name}' ({} uniform bytes)", uniforms.size());
        Ok(ComposedShader {
            name: name.to_owned(),
            module,
            uniforms,
        })
    }
}

/// A shader module on the GPU with its uniform buffer and bind group.
///
/// The uniform block is bound at group 0. Pipelines add further groups
/// (textures) after [`bind_group_layout`](Self::bind_group_layout).
pub struct ShaderProgram {
    name: String,
    module: wgpu::ShaderModule,
    uniforms: UniformBlock,
    buffer: wgpu::Buffer,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
}

impl ShaderProgram {
    /// Compose `name` from `library` and create its GPU resources.
    ///
    /// # Errors
    ///
    /// Any [`ShaderError`] from [`ShaderLibrary::compose`].
    pub fn new(
        context: &RenderContext,
        library: &mut ShaderLibrary,
        name: &str,
    ) -> Result<Self, ShaderError> {
        let composed = library.compose(name)?;
        Ok(Self::from_composed(&context.device, composed))
    }

    /// Create GPU resources for an already composed shader.
    #[must_use]
    pub fn from_composed(device: &wgpu::Device, composed: ComposedShader) -> Self {
        let ComposedShader {
            name,
            module,
            uniforms,
        } = composed;

        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&name),
            source: wgpu::ShaderSource::Naga(Cow::Owned(module)),
        });

        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{name} Uniforms")),
            size: uniforms.size(),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some(&format!("{name} Uniform Layout")),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: UNIFORM_BINDING,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{name} Uniform Bind Group")),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: UNIFORM_BINDING,
                resource: buffer.as_entire_binding(),
            }],
        });

        Self {
            name,
            module,
            uniforms,
            buffer,
            bind_group_layout,
            bind_group,
        }
    }

    /// Shader name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The GPU shader module, for pipeline creation.
    #[must_use]
    pub const fn module(&self) -> &wgpu::ShaderModule {
        &self.module
    }

    /// Layout of the uniform bind group (group 0).
    #[must_use]
    pub const fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    /// Uniform staging block; write members by name, then
    /// [`upload`](Self::upload).
    pub fn uniforms_mut(&mut self) -> &mut UniformBlock {
        &mut self.uniforms
    }

    /// Copy staged uniform bytes to the GPU buffer.
    pub fn upload(&self, queue: &wgpu::Queue) {
        queue.write_buffer(&self.buffer, 0, self.uniforms.bytes());
    }

    /// Make this program's uniforms current for subsequent draws.
    pub fn bind(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_bind_group(0, &self.bind_group, &[]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every top-level shader the renderer loads.
    const SHIPPED: [&str; 3] = ["terrain_plane", "terrain_strip", "terrain_patch"];

    fn shipped_dir() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("assets/shaders")
    }

    #[test]
    fn all_shipped_shaders_compose_and_validate() {
        let mut library = ShaderLibrary::load(shipped_dir()).unwrap();
        for name in SHIPPED {
            let shader = library
                .compose(name)
                .unwrap_or_else(|e| panic!("{name}: {e}"));
            for member in ["model", "view", "projection"] {
                assert!(shader.uniforms.contains(member), "{name} lacks {member}");
            }
            assert!(shader.module.entry_points.len() >= 2);
        }
    }

    #[test]
    fn heightmap_shaders_expose_height_mapping() {
        let mut library = ShaderLibrary::load(shipped_dir()).unwrap();
        for name in ["terrain_strip", "terrain_patch"] {
            let mut shader = library.compose(name).unwrap();
            shader.uniforms.set_f32("y_scale", 0.25).unwrap();
            shader.uniforms.set_f32("y_shift", -8.0).unwrap();
        }
    }

    #[test]
    fn plane_shader_takes_color_and_checker_density() {
        let mut library = ShaderLibrary::load(shipped_dir()).unwrap();
        let mut shader = library.compose("terrain_plane").unwrap();
        shader.uniforms.set_vec4("color", glam::Vec4::ONE).unwrap();
        shader.uniforms.set_vec2("checker", glam::Vec2::splat(5.0)).unwrap();
    }

    #[test]
    fn missing_shader_is_io_error() {
        let mut library = ShaderLibrary::load(shipped_dir()).unwrap();
        assert!(matches!(
            library.compose("does_not_exist"),
            Err(ShaderError::Io { .. })
        ));
    }

    #[test]
    fn syntax_error_is_compose_error() {
        let mut library = ShaderLibrary::load(shipped_dir()).unwrap();
        let err = library
            .compose_source("broken", "@vertex fn vs_main( -> {")
            .unwrap_err();
        assert!(matches!(err, ShaderError::Compose { ref shader, .. } if shader == "broken"));
    }

    #[test]
    fn missing_modules_dir_is_allowed() {
        let dir = std::env::temp_dir().join(format!("relief-no-modules-{}", std::process::id()));
        let mut library = ShaderLibrary::load(&dir).unwrap();
        let shader = library
            .compose_source(
                "inline",
                "struct U { model: mat4x4<f32> };\n\
                 @group(0) @binding(0) var<uniform> u: U;\n\
                 @vertex fn vs_main(@location(0) p: vec3<f32>) -> @builtin(position) vec4<f32> {\n\
                     return u.model * vec4<f32>(p, 1.0);\n\
                 }\n",
            )
            .unwrap();
        assert_eq!(shader.uniforms.member("model"), Some((0, UniformType::Mat4)));
    }
}
