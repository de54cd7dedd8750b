use std::borrow::Cow;
use std::collections::HashMap;

use naga_oil::compose::{
    ComposableModuleDescriptor, Composer, NagaModuleDescriptor, ShaderDefValue,
    ShaderLanguage, ShaderType,
};

use crate::error::TraceError;

/// Shaders built through the composer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shader {
    /// Ray-tracing compute kernel.
    RayTrace,
    /// Fullscreen copy of the traced image onto the swapchain.
    Blit,
}

impl Shader {
    /// Every composable shader.
    pub const ALL: [Self; 2] = [Self::RayTrace, Self::Blit];

    fn source(self) -> &'static str {
        match self {
            Self::RayTrace => {
                include_str!("../../assets/shaders/compute/raytrace.wgsl")
            }
            Self::Blit => include_str!("../../assets/shaders/screen/blit.wgsl"),
        }
    }

    fn file_path(self) -> &'static str {
        match self {
            Self::RayTrace => "compute/raytrace.wgsl",
            Self::Blit => "screen/blit.wgsl",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::RayTrace => "Ray Trace Kernel",
            Self::Blit => "Blit Shader",
        }
    }
}

/// Shared module definition: (source, file_path)
struct ModuleDef {
    source: &'static str,
    file_path: &'static str,
}

/// Wraps `naga_oil::compose::Composer` to provide shader composition with
/// `#import` support and `#{NAME}` shader-def substitution.
///
/// Consuming shaders use `#import orbitrace::module_name`. The composer
/// produces `naga::Module` IR directly, skipping WGSL re-parse at runtime.
pub struct ShaderComposer {
    composer: Composer,
}

impl ShaderComposer {
    /// Composer with all shared modules registered.
    ///
    /// # Errors
    ///
    /// [`TraceError::KernelLoad`] if a shared module fails to parse.
    pub fn new() -> Result<Self, TraceError> {
        let mut composer = Composer::default();

        // Register shared modules in dependency order.
        let modules: &[ModuleDef] = &[ModuleDef {
            source: include_str!("../../assets/shaders/modules/sampling.wgsl"),
            file_path: "modules/sampling.wgsl",
        }];

        for m in modules {
            let _ = composer
                .add_composable_module(ComposableModuleDescriptor {
                    source: m.source,
                    file_path: m.file_path,
                    language: ShaderLanguage::Wgsl,
                    ..Default::default()
                })
                .map_err(|e| {
                    TraceError::KernelLoad(format!(
                        "failed to register shader module '{}': {e:?}",
                        m.file_path
                    ))
                })?;
        }

        Ok(Self { composer })
    }

    /// Compose `shader` into a `wgpu::ShaderModule`, substituting `defs`.
    ///
    /// # Errors
    ///
    /// [`TraceError::KernelLoad`] if composition fails.
    pub fn compose(
        &mut self,
        device: &wgpu::Device,
        shader: Shader,
        defs: &[(&str, u32)],
    ) -> Result<wgpu::ShaderModule, TraceError> {
        let naga_module = self.compose_naga(shader, defs)?;
        Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(shader.label()),
            source: wgpu::ShaderSource::Naga(Cow::Owned(naga_module)),
        }))
    }

    /// Compose into a `naga::Module` without creating a wgpu shader module.
    /// Useful for testing shader composition without a GPU device.
    ///
    /// # Errors
    ///
    /// [`TraceError::KernelLoad`] if composition fails.
    pub fn compose_naga(
        &mut self,
        shader: Shader,
        defs: &[(&str, u32)],
    ) -> Result<naga::Module, TraceError> {
        let shader_defs: HashMap<String, ShaderDefValue> = defs
            .iter()
            .map(|&(name, value)| (name.to_owned(), ShaderDefValue::UInt(value)))
            .collect();

        self.composer
            .make_naga_module(NagaModuleDescriptor {
                source: shader.source(),
                file_path: shader.file_path(),
                shader_type: ShaderType::Wgsl,
                shader_defs,
                ..Default::default()
            })
            .map_err(|e| {
                TraceError::KernelLoad(format!(
                    "failed to compose shader '{}': {}",
                    shader.file_path(),
                    e.emit_to_string(&self.composer)
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use naga::valid::{Capabilities, ValidationFlags, Validator};

    use super::*;
    use crate::gpu::kernel::workgroup_defs;
    use crate::renderer::workgroup::WorkgroupSize;

    fn defs() -> Vec<(&'static str, u32)> {
        workgroup_defs(WorkgroupSize {
            width: 32,
            height: 8,
            depth: 1,
        })
        .to_vec()
    }

    #[test]
    fn test_all_shaders_compose() {
        let mut composer = ShaderComposer::new().unwrap();
        for shader in Shader::ALL {
            let module = composer
                .compose_naga(shader, &defs())
                .unwrap_or_else(|e| panic!("{shader:?} failed to compose: {e}"));
            let _ = Validator::new(ValidationFlags::all(), Capabilities::default())
                .validate(&module)
                .unwrap_or_else(|e| panic!("{shader:?} failed validation: {e:?}"));
        }
    }

    #[test]
    fn kernel_uses_injected_workgroup_size() {
        let mut composer = ShaderComposer::new().unwrap();
        let module = composer.compose_naga(Shader::RayTrace, &defs()).unwrap();
        let entry = module
            .entry_points
            .iter()
            .find(|e| e.name == "main")
            .unwrap();
        assert_eq!(entry.workgroup_size, [32, 8, 1]);
    }
}
