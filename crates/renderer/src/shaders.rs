//! Built-in GLSL fragment shaders.
//!
//! Each background is a body appended to [`FRAGMENT_PRELUDE`] by
//! `compile::assemble_fragment`. The prelude declares the scene uniform
//! block — its layout must match `SceneUniforms` in `gpu/uniforms.rs` —
//! and the 2D hash both backgrounds build on.

/// Shared fragment prologue: output, scene uniforms, hash.
pub(crate) const FRAGMENT_PRELUDE: &str = r"#version 450
layout(location = 0) out vec4 out_color;

layout(std140, set = 0, binding = 0) uniform Scene {
    vec4 resolution;  // x, y: surface px; z: pixel ratio; w: seconds
    vec4 base_color;  // rgb: theme background; a: reveal level
    vec4 drag;        // x, y: pointer in surface px; z: 1 while dragging
    vec4 grain;       // x: block scale; y: intensity; z: session seed
    vec4 grid;        // x: marble columns; y: marble rows
} scene;

float hash(vec2 p) {
    return fract(sin(dot(p, vec2(127.1, 311.7))) * 43758.5453);
}
";

/// Animated grain overlay, composited onto the theme color in-shader.
///
/// Three drifting waves build a scalar distortion field, a live drag adds
/// a radial ripple, and chunked per-block noise supplies the grain. The
/// gray field is clamped to [0.1, 0.95] and overlay-blended onto the
/// base color at 0.7 opacity.
pub(crate) const GRAIN_FRAGMENT: &str = r"
float overlay_channel(float base, float top) {
    if (base < 0.5) {
        return 2.0 * base * top;
    }
    return 1.0 - 2.0 * (1.0 - base) * (1.0 - top);
}

void main() {
    vec2 uv = gl_FragCoord.xy;
    float t = scene.resolution.w;
    float seed = scene.grain.z;

    // Dancing organic waves: horizontal drift with hash-based phase jitter.
    float h_drift = t * 50.0;
    float n1 = hash(floor(uv * 0.35) + t * 0.08 + seed);
    float n2 = hash(floor(uv * 0.5) + t * 0.12 + 50.0 + seed);

    float wave1 = sin((uv.x + h_drift + n1 * 100.0) * 0.005 + t * 1.5 + seed) * cos(uv.y * 0.004 - t * 1.2);
    float wave2 = sin((uv.x + h_drift * 0.7 + n2 * 80.0) * 0.004 + t * 2.0) * cos((uv.x - uv.y) * 0.003 - t * 0.8 + seed);
    float wave3 = sin((uv.x + h_drift * 1.2) * 0.006 + n1 * 2.0 + t * 1.8) * cos(uv.y * 0.005 + t * 1.0);
    float distortion = wave1 + wave2 * 1.5 + wave3 * 0.8;

    // Radial ripple around the pointer while a drag is live, faded out
    // past 1000 px.
    if (scene.drag.z > 0.5) {
        float dist = distance(uv, scene.drag.xy);
        float falloff = 1.0 - smoothstep(0.0, 1000.0, dist);
        distortion += sin(dist * 0.02 - t * 6.0) * 0.5 * falloff;
    }

    // Chunky grain; block size in pixels comes from the session scale.
    float grain = (hash(floor(uv / scene.grain.x) + fract(t * 60.0)) - 0.5) * scene.grain.y;

    // Tight range around middle gray keeps the contrast low.
    float value = clamp(0.5 + distortion * 0.5 + grain, 0.1, 0.95);

    vec3 base = scene.base_color.rgb;
    vec3 blended = vec3(
        overlay_channel(base.r, value),
        overlay_channel(base.g, value),
        overlay_channel(base.b, value));
    vec3 color = mix(base, blended, 0.7);

    out_color = vec4(color * scene.base_color.a, 1.0);
}
";

/// Holographic marble spheres over a pastel fBm background.
pub(crate) const MARBLE_FRAGMENT: &str = r"
vec3 hash3(vec2 p) {
    vec3 q = vec3(dot(p, vec2(127.1, 311.7)),
                  dot(p, vec2(269.5, 183.3)),
                  dot(p, vec2(419.2, 371.9)));
    return fract(sin(q) * 43758.5453);
}

float noise(vec2 p) {
    vec2 i = floor(p);
    vec2 f = fract(p);
    f = f * f * (3.0 - 2.0 * f);
    float a = hash(i);
    float b = hash(i + vec2(1.0, 0.0));
    float c = hash(i + vec2(0.0, 1.0));
    float d = hash(i + vec2(1.0, 1.0));
    return mix(mix(a, b, f.x), mix(c, d, f.x), f.y);
}

float fbm(vec2 p) {
    float sum = 0.0;
    float amp = 0.5;
    for (int i = 0; i < 5; i++) {
        sum += noise(p) * amp;
        p *= 2.0;
        amp *= 0.5;
    }
    return sum;
}

vec3 pastel_background(vec2 uv, float time) {
    float n1 = fbm(uv * 2.5 + time * 0.03);
    float n2 = fbm(uv * 3.0 - time * 0.02 + 50.0);

    vec3 pink = vec3(0.95, 0.75, 0.85);
    vec3 cyan = vec3(0.75, 0.88, 0.95);
    vec3 purple = vec3(0.85, 0.78, 0.95);
    vec3 mint = vec3(0.8, 0.95, 0.82);

    vec3 mix1 = mix(pink, cyan, n1);
    vec3 mix2 = mix(purple, mint, n2);

    return mix(mix1, mix2, 0.5 + 0.3 * sin(uv.x * 3.0 + uv.y * 2.0 + time * 0.08));
}

void main() {
    // Bottom-left origin so the key light stays above the spheres.
    vec2 frag = vec2(gl_FragCoord.x, scene.resolution.y - gl_FragCoord.y);
    vec2 uv = frag / scene.resolution.xy;
    float aspect = scene.resolution.x / scene.resolution.y;
    float t = scene.resolution.w;

    vec3 final_color = pastel_background(uv, t);

    float cols = scene.grid.x;
    float rows = scene.grid.y;
    float cell_w = aspect / cols;
    float cell_h = 1.0 / rows;
    float radius = min(cell_w, cell_h) * 0.5;

    vec2 a_uv = vec2(uv.x * aspect, uv.y);

    for (float row = 0.0; row < rows; row += 1.0) {
        for (float col = 0.0; col < cols; col += 1.0) {
            vec2 center = vec2((col + 0.5) * cell_w, (row + 0.5) * cell_h);
            vec2 d = a_uv - center;
            float dist = length(d);

            if (dist < radius) {
                float norm_dist = dist / radius;
                float z = sqrt(1.0 - norm_dist * norm_dist);
                vec3 normal = normalize(vec3(d / radius, z));

                float seed = hash(vec2(col, row));
                vec3 seed_vec = hash3(vec2(col, row));
                vec3 seed_vec2 = hash3(vec2(col + 100.0, row + 50.0));

                // Refracted internal UV for the inside-the-marble look,
                // rotating at a per-sphere speed.
                vec3 refr = refract(vec3(0.0, 0.0, -1.0), normal, 0.7);
                vec2 base_uv = refr.xy * 2.0 + seed_vec.xy * 8.0;
                float angle = t * (0.15 + seed * 0.1);
                float cos_a = cos(angle);
                float sin_a = sin(angle);
                vec2 internal_uv = vec2(
                    base_uv.x * cos_a - base_uv.y * sin_a,
                    base_uv.x * sin_a + base_uv.y * cos_a);

                float n1 = fbm(internal_uv * 3.0 + seed * 50.0);
                float n2 = fbm(internal_uv * 4.0 + seed * 100.0);
                float n3 = fbm(internal_uv * 2.5 + seed * 150.0);

                vec2 grain_uv = gl_FragCoord.xy * 0.5 + seed_vec.xy * 100.0;
                float grain = (hash(grain_uv) - 0.5) * 0.12;

                // Pearly golden base with subtle color blobs.
                vec3 color = vec3(0.85, 0.78, 0.65);

                float pink_amt = smoothstep(0.55, 0.7, n1) * (0.3 + seed_vec2.x * 0.5);
                color = mix(color, vec3(0.95, 0.5, 0.7), pink_amt * 0.5);

                float blue_amt = smoothstep(0.5, 0.65, n2) * (0.3 + seed_vec2.y * 0.5);
                color = mix(color, vec3(0.4, 0.5, 0.9), blue_amt * 0.5);

                float green_amt = smoothstep(0.55, 0.7, n3) * (0.3 + seed_vec2.z * 0.5);
                color = mix(color, vec3(0.5, 0.85, 0.6), green_amt * 0.45);

                float purple_amt = smoothstep(0.6, 0.75, n1 * n2) * seed_vec.z;
                color = mix(color, vec3(0.7, 0.5, 0.85), purple_amt * 0.35);

                color += grain;

                vec3 light_dir = normalize(vec3(0.5, 0.7, 1.0));
                float diffuse = max(dot(normal, light_dir), 0.0);
                color *= (0.4 + diffuse * 0.6);

                vec3 view_dir = vec3(0.0, 0.0, 1.0);
                vec3 half_vec = normalize(light_dir + view_dir);
                float spec = pow(max(dot(normal, half_vec), 0.0), 80.0);
                color += vec3(1.0, 0.98, 0.9) * spec * 0.9;

                // Darker toward the silhouette.
                color *= (0.6 + 0.4 * z);

                float rim = smoothstep(0.7, 0.98, norm_dist);
                color = mix(color, vec3(0.8, 0.65, 0.4), rim * 0.5);

                final_color = color;
            }
        }
    }

    float luma = dot(final_color, vec3(0.299, 0.587, 0.114));
    final_color = mix(vec3(luma), final_color, 1.2);
    final_color = clamp(final_color, 0.0, 1.0);

    out_color = vec4(final_color * scene.base_color.a, 1.0);
}
";
