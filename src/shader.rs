//! Embedded shader programs for the debug draw pipelines.
//!
//! One generic colored-vertex program serves both the line and the triangle
//! pipelines; text is pre-tessellated into line segments, so there is no
//! separate font shader. The program is carried once per shader language a
//! backend may accept, and [`select`] picks the variant matching the
//! backend's capability flags.

use crate::backend::{BackendError, BackendResult, ShaderFormats};

/// GLSL source, for backends that consume SPIR-V (compiled downstream).
const VERTEX_GLSL: &str = r#"#version 450

layout(set = 0, binding = 0) uniform ViewProjection {
    mat4 view_proj;
};

layout(location = 0) in vec3 position;
layout(location = 1) in uint color;

layout(location = 0) out vec4 v_color;

void main() {
    gl_Position = view_proj * vec4(position, 1.0);
    v_color = vec4(
        float((color >> 24u) & 0xFFu),
        float((color >> 16u) & 0xFFu),
        float((color >> 8u) & 0xFFu),
        float(color & 0xFFu)) / 255.0;
}
"#;

const FRAGMENT_GLSL: &str = r#"#version 450

layout(location = 0) in vec4 v_color;
layout(location = 0) out vec4 out_color;

void main() {
    out_color = v_color;
}
"#;

/// HLSL source, for backends that consume DXIL.
const VERTEX_HLSL: &str = r#"cbuffer ViewProjection : register(b0, space1) {
    float4x4 view_proj;
};

struct Output {
    float4 color : TEXCOORD0;
    float4 position : SV_Position;
};

Output main(float3 position : TEXCOORD0, uint color : TEXCOORD1) {
    Output output;
    output.position = mul(view_proj, float4(position, 1.0));
    output.color = float4(
        (color >> 24) & 0xFF,
        (color >> 16) & 0xFF,
        (color >> 8) & 0xFF,
        color & 0xFF) / 255.0;
    return output;
}
"#;

const FRAGMENT_HLSL: &str = r#"float4 main(float4 color : TEXCOORD0) : SV_Target0 {
    return color;
}
"#;

/// MSL source, for Metal backends.
const VERTEX_MSL: &str = r#"#include <metal_stdlib>
using namespace metal;

struct ViewProjection {
    float4x4 view_proj;
};

struct VertexIn {
    float3 position [[attribute(0)]];
    uint color [[attribute(1)]];
};

struct VertexOut {
    float4 position [[position]];
    float4 color;
};

vertex VertexOut main0(VertexIn in [[stage_in]],
                       constant ViewProjection& uniforms [[buffer(0)]]) {
    VertexOut out;
    out.position = uniforms.view_proj * float4(in.position, 1.0);
    out.color = float4(
        (in.color >> 24) & 0xFF,
        (in.color >> 16) & 0xFF,
        (in.color >> 8) & 0xFF,
        in.color & 0xFF) / 255.0;
    return out;
}
"#;

const FRAGMENT_MSL: &str = r#"#include <metal_stdlib>
using namespace metal;

struct VertexOut {
    float4 position [[position]];
    float4 color;
};

fragment float4 main0(VertexOut in [[stage_in]]) {
    return in.color;
}
"#;

/// The shader program variant selected for a backend.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ShaderProgram {
    pub format: ShaderFormats,
    pub entry_point: &'static str,
    pub vertex_code: &'static [u8],
    pub fragment_code: &'static [u8],
}

/// Pick the program variant for the backend's capability flags.
///
/// Preference order: SPIR-V, then DXIL, then MSL.
pub(crate) fn select(formats: ShaderFormats) -> BackendResult<ShaderProgram> {
    if formats.contains(ShaderFormats::SPIRV) {
        Ok(ShaderProgram {
            format: ShaderFormats::SPIRV,
            entry_point: "main",
            vertex_code: VERTEX_GLSL.as_bytes(),
            fragment_code: FRAGMENT_GLSL.as_bytes(),
        })
    } else if formats.contains(ShaderFormats::DXIL) {
        Ok(ShaderProgram {
            format: ShaderFormats::DXIL,
            entry_point: "main",
            vertex_code: VERTEX_HLSL.as_bytes(),
            fragment_code: FRAGMENT_HLSL.as_bytes(),
        })
    } else if formats.contains(ShaderFormats::MSL) {
        Ok(ShaderProgram {
            format: ShaderFormats::MSL,
            entry_point: "main0",
            vertex_code: VERTEX_MSL.as_bytes(),
            fragment_code: FRAGMENT_MSL.as_bytes(),
        })
    } else {
        Err(BackendError::FormatNotSupported)
    }
}
