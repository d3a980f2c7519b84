use std::borrow::Cow;

use anyhow::Result;
use wgpu::naga::ShaderStage;

use crate::shaders::FRAGMENT_PRELUDE;

/// Compiles the static full-screen triangle vertex shader.
pub(crate) fn compile_vertex_shader(device: &wgpu::Device) -> Result<wgpu::ShaderModule> {
    Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("fullscreen triangle vertex"),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Borrowed(VERTEX_SHADER_GLSL),
            stage: ShaderStage::Vertex,
            defines: &[],
        },
    }))
}

/// Prepends the shared prelude to a background body and compiles it.
pub(crate) fn compile_fragment_shader(
    device: &wgpu::Device,
    body: &str,
) -> Result<wgpu::ShaderModule> {
    let assembled = assemble_fragment(body);
    Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("background fragment"),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Owned(assembled),
            stage: ShaderStage::Fragment,
            defines: &[],
        },
    }))
}

/// Joins the prelude and a shader body into one translation unit.
///
/// Bodies must not carry their own `#version`; the prelude owns it along
/// with the scene uniform block declaration.
pub(crate) fn assemble_fragment(body: &str) -> String {
    format!("{FRAGMENT_PRELUDE}\n{body}")
}

/// Minimal full-screen triangle; the fragment stages work off
/// `gl_FragCoord` alone, so no varyings are needed.
const VERTEX_SHADER_GLSL: &str = r"#version 450

const vec2 positions[3] = vec2[3](
    vec2(-1.0, -3.0),
    vec2(3.0, 1.0),
    vec2(-1.0, 1.0)
);

void main() {
    uint vertex_index = uint(gl_VertexIndex);
    gl_Position = vec4(positions[vertex_index], 0.0, 1.0);
}
";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shaders::{GRAIN_FRAGMENT, MARBLE_FRAGMENT};

    #[test]
    fn assembled_sources_have_a_single_version_directive() {
        for body in [GRAIN_FRAGMENT, MARBLE_FRAGMENT] {
            let assembled = assemble_fragment(body);
            assert_eq!(assembled.matches("#version").count(), 1);
            assert!(assembled.contains("uniform Scene"));
            assert!(assembled.contains("void main()"));
        }
    }

    #[test]
    fn grain_body_clamps_to_the_documented_range() {
        assert!(GRAIN_FRAGMENT.contains("clamp(0.5 + distortion * 0.5 + grain, 0.1, 0.95)"));
    }

    #[test]
    fn marble_body_reads_the_grid_uniforms() {
        assert!(MARBLE_FRAGMENT.contains("scene.grid.x"));
        assert!(MARBLE_FRAGMENT.contains("scene.grid.y"));
    }
}
