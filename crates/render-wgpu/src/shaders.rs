/// WGSL shader for the shell pass.
///
/// Every draw renders the same sphere. The vertex stage pushes it outward by
/// the shell height; the fragment stage keeps a fragment only where a strand
/// rooted in that cell is taller than the shell.
pub const SHELL_SHADER: &str = r#"
struct Frame {
    view: mat4x4<f32>,
    proj: mat4x4<f32>,
    // xyz: camera position, w: seconds since startup
    camera_time: vec4<f32>,
    // rgb: strand root color, a: strand density
    base_density: vec4<f32>,
    // rgb: strand tip color, a: shell thickness
    tip_thickness: vec4<f32>,
    // rgb: water color, a: planet radius
    water_radius: vec4<f32>,
    // x: frequency, y: octaves, z: seed, w: sea level
    terrain: vec4<f32>,
    // x: wind strength, y: shell count
    misc: vec4<f32>,
};

struct Shell {
    // x: normalized height, y: shell index
    params: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> u_frame: Frame;

@group(1) @binding(0)
var<uniform> u_shell: Shell;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) dir: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

fn hash3(p: vec3<f32>) -> f32 {
    return fract(sin(dot(p, vec3<f32>(12.9898, 78.233, 37.719))) * 43758.5453);
}

fn value_noise(p: vec3<f32>) -> f32 {
    let i = floor(p);
    let f = fract(p);
    let u = f * f * (3.0 - 2.0 * f);

    let n000 = hash3(i + vec3<f32>(0.0, 0.0, 0.0));
    let n100 = hash3(i + vec3<f32>(1.0, 0.0, 0.0));
    let n010 = hash3(i + vec3<f32>(0.0, 1.0, 0.0));
    let n110 = hash3(i + vec3<f32>(1.0, 1.0, 0.0));
    let n001 = hash3(i + vec3<f32>(0.0, 0.0, 1.0));
    let n101 = hash3(i + vec3<f32>(1.0, 0.0, 1.0));
    let n011 = hash3(i + vec3<f32>(0.0, 1.0, 1.0));
    let n111 = hash3(i + vec3<f32>(1.0, 1.0, 1.0));

    let x00 = mix(n000, n100, u.x);
    let x10 = mix(n010, n110, u.x);
    let x01 = mix(n001, n101, u.x);
    let x11 = mix(n011, n111, u.x);
    return mix(mix(x00, x10, u.y), mix(x01, x11, u.y), u.z);
}

fn terrain_height(dir: vec3<f32>) -> f32 {
    let octaves = i32(u_frame.terrain.y);
    var p = dir * u_frame.terrain.x + vec3<f32>(u_frame.terrain.z);
    var amplitude = 0.5;
    var total = 0.0;
    var norm = 0.0;
    for (var i = 0; i < octaves; i++) {
        total += value_noise(p) * amplitude;
        norm += amplitude;
        amplitude *= 0.5;
        p *= 2.0;
    }
    return total / max(norm, 1e-4);
}

@vertex
fn vs_main(vertex: VertexInput) -> VertexOutput {
    let height = u_shell.params.x;
    let dir = normalize(vertex.position);
    let radius = u_frame.water_radius.a + height * u_frame.tip_thickness.a;

    // Sway grows with the square of the height so roots stay anchored.
    let time = u_frame.camera_time.w;
    let tangent = normalize(cross(dir, vec3<f32>(0.0, 1.0, 0.0)) + vec3<f32>(1e-4, 0.0, 0.0));
    let sway = sin(time * 1.7 + dot(dir, vec3<f32>(5.0, 3.0, 4.0))) * u_frame.misc.x * height * height;

    let world = dir * radius + tangent * sway;

    var out: VertexOutput;
    out.clip_position = u_frame.proj * u_frame.view * vec4<f32>(world, 1.0);
    out.dir = dir;
    out.normal = normalize(vertex.normal);
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let height = u_shell.params.x;
    let sea_level = u_frame.terrain.w;
    let terrain = terrain_height(in.dir);
    let land = terrain > sea_level;

    let light_dir = normalize(vec3<f32>(0.4, 0.8, 0.45));
    let diffuse = max(dot(in.normal, light_dir), 0.0);
    let lighting = 0.25 + diffuse * 0.75;

    if (height <= 0.0) {
        if (!land) {
            return vec4<f32>(u_frame.water_radius.rgb * lighting, 1.0);
        }
        return vec4<f32>(u_frame.base_density.rgb * lighting * 0.6, 1.0);
    }

    if (!land) {
        discard;
    }

    // Strands grow taller further inland.
    let elevation = clamp((terrain - sea_level) / max(1.0 - sea_level, 1e-4) * 2.5, 0.0, 1.0);
    let cell_pos = in.dir * u_frame.base_density.a;
    let cell = floor(cell_pos);
    let strand = hash3(cell) * elevation;
    if (height > strand) {
        discard;
    }

    let local = fract(cell_pos) * 2.0 - 1.0;
    if (length(local) > 1.4 * (1.0 - height / max(strand, 1e-4))) {
        discard;
    }

    let color = mix(u_frame.base_density.rgb, u_frame.tip_thickness.rgb, height);
    let occlusion = 0.35 + 0.65 * height;
    return vec4<f32>(color * lighting * occlusion, 1.0);
}
"#;
