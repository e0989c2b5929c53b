/// WGSL shader for every material model. The fragment stage switches on
/// `material.kind.x`, which matches `MaterialKind::shader_id`.
pub const MATERIAL_SHADER: &str = r#"
const PI: f32 = 3.14159265;
const MAX_POINT_LIGHTS: u32 = 4u;

struct Frame {
    view_proj: mat4x4<f32>,
    view: mat4x4<f32>,
    // xyz: camera position, w: near plane
    camera_pos: vec4<f32>,
    // rgb: summed ambient radiance, w: far plane
    ambient: vec4<f32>,
    point_positions: array<vec4<f32>, 4>,
    point_colors: array<vec4<f32>, 4>,
    point_count: vec4<u32>,
};

struct Object {
    model: mat4x4<f32>,
    normal: mat4x4<f32>,
};

struct MaterialParams {
    // rgb: base color, a: opacity
    color: vec4<f32>,
    // rgb: specular color, a: shininess
    specular: vec4<f32>,
    // x: metalness, y: roughness
    pbr: vec4<f32>,
    // x: model, y: transparent
    kind: vec4<u32>,
    // x: map, y: alpha map, z: matcap, w: gradient map
    maps: vec4<u32>,
    // x: environment map
    env: vec4<u32>,
};

@group(0) @binding(0) var<uniform> frame: Frame;

@group(1) @binding(0) var<uniform> material: MaterialParams;
@group(1) @binding(1) var color_map: texture_2d<f32>;
@group(1) @binding(2) var alpha_map: texture_2d<f32>;
@group(1) @binding(3) var matcap_map: texture_2d<f32>;
@group(1) @binding(4) var gradient_map: texture_2d<f32>;
@group(1) @binding(5) var env_map: texture_cube<f32>;
@group(1) @binding(6) var linear_sampler: sampler;
@group(1) @binding(7) var nearest_sampler: sampler;

@group(2) @binding(0) var<uniform> object: Object;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
    @location(3) view_depth: f32,
};

@vertex
fn vs_main(vertex: VertexInput) -> VertexOutput {
    let world = object.model * vec4<f32>(vertex.position, 1.0);

    var out: VertexOutput;
    out.clip_position = frame.view_proj * world;
    out.world_pos = world.xyz;
    out.world_normal = normalize((object.normal * vec4<f32>(vertex.normal, 0.0)).xyz);
    out.uv = vertex.uv;
    out.view_depth = -(frame.view * world).z;
    return out;
}

fn light_dir(i: u32, p: vec3<f32>) -> vec3<f32> {
    let d = frame.point_positions[i].xyz - p;
    if (dot(d, d) < 1e-8) {
        return vec3<f32>(0.0);
    }
    return normalize(d);
}

fn lambert(n: vec3<f32>, p: vec3<f32>) -> vec3<f32> {
    var total = frame.ambient.rgb;
    for (var i = 0u; i < min(frame.point_count.x, MAX_POINT_LIGHTS); i += 1u) {
        let l = light_dir(i, p);
        total += frame.point_colors[i].rgb * max(dot(n, l), 0.0);
    }
    return total;
}

fn phong(base: vec3<f32>, n: vec3<f32>, v: vec3<f32>, p: vec3<f32>) -> vec3<f32> {
    var diffuse = frame.ambient.rgb;
    var specular = vec3<f32>(0.0);
    for (var i = 0u; i < min(frame.point_count.x, MAX_POINT_LIGHTS); i += 1u) {
        let l = light_dir(i, p);
        let c = frame.point_colors[i].rgb;
        let ndl = max(dot(n, l), 0.0);
        diffuse += c * ndl;
        let h = normalize(l + v);
        let shine = pow(max(dot(n, h), 0.0), max(material.specular.a, 1.0));
        specular += c * material.specular.rgb * shine * select(0.0, 1.0, ndl > 0.0);
    }
    return base * diffuse + specular;
}

fn toon(base: vec3<f32>, n: vec3<f32>, p: vec3<f32>) -> vec3<f32> {
    var total = frame.ambient.rgb;
    for (var i = 0u; i < min(frame.point_count.x, MAX_POINT_LIGHTS); i += 1u) {
        let l = light_dir(i, p);
        let ndl = dot(n, l) * 0.5 + 0.5;
        var tone = select(0.7, 1.0, ndl >= 0.7);
        if (material.maps.w != 0u) {
            tone = textureSampleLevel(gradient_map, nearest_sampler, vec2<f32>(ndl, 0.5), 0.0).r;
        }
        total += frame.point_colors[i].rgb * tone;
    }
    return base * total;
}

fn standard(
    base: vec3<f32>,
    n: vec3<f32>,
    v: vec3<f32>,
    p: vec3<f32>,
    env_specular: vec3<f32>,
    env_diffuse: vec3<f32>,
) -> vec3<f32> {
    let metalness = material.pbr.x;
    let roughness = max(material.pbr.y, 0.04);
    let f0 = mix(vec3<f32>(0.04), base, metalness);
    let diffuse_color = base * (1.0 - metalness);
    let ndv = max(dot(n, v), 1e-4);

    let a = roughness * roughness;
    let a2 = a * a;
    let k = (roughness + 1.0) * (roughness + 1.0) / 8.0;
    let g_v = ndv / (ndv * (1.0 - k) + k);

    var lo = vec3<f32>(0.0);
    for (var i = 0u; i < min(frame.point_count.x, MAX_POINT_LIGHTS); i += 1u) {
        let l = light_dir(i, p);
        let ndl = max(dot(n, l), 0.0);
        let h = normalize(l + v);
        let ndh = max(dot(n, h), 0.0);
        let vdh = max(dot(v, h), 0.0);

        let denom = ndh * ndh * (a2 - 1.0) + 1.0;
        let d = a2 / (PI * denom * denom);
        let g = g_v * (ndl / (ndl * (1.0 - k) + k));
        let f = f0 + (vec3<f32>(1.0) - f0) * pow(1.0 - vdh, 5.0);
        let specular = d * g * f / (4.0 * ndl * ndv + 1e-4);

        lo += (diffuse_color / PI + specular) * frame.point_colors[i].rgb * ndl * PI;
    }

    var color = lo + diffuse_color * frame.ambient.rgb;
    if (material.env.x != 0u) {
        let f_env = f0 + (max(vec3<f32>(1.0 - roughness), f0) - f0) * pow(1.0 - ndv, 5.0);
        let reflected = mix(env_specular, env_diffuse, roughness);
        color += reflected * f_env + diffuse_color * env_diffuse * (1.0 - metalness) * 0.5;
    }
    return color;
}

@fragment
fn fs_main(in: VertexOutput, @builtin(front_facing) front: bool) -> @location(0) vec4<f32> {
    let n = select(-1.0, 1.0, front) * normalize(in.world_normal);
    let v = normalize(frame.camera_pos.xyz - in.world_pos);
    let r = reflect(-v, n);
    let view_n = normalize((frame.view * vec4<f32>(n, 0.0)).xyz);
    let matcap_uv = view_n.xy * vec2<f32>(0.5, -0.5) + vec2<f32>(0.5);

    // No mip chains are uploaded, so sampling level 0 everywhere is exact.
    let map_sample = textureSampleLevel(color_map, linear_sampler, in.uv, 0.0);
    let alpha_sample = textureSampleLevel(alpha_map, linear_sampler, in.uv, 0.0);
    let matcap_sample = textureSampleLevel(matcap_map, linear_sampler, matcap_uv, 0.0);
    // Cube maps are authored for a left-handed lookup; mirror X.
    let flip = vec3<f32>(-1.0, 1.0, 1.0);
    let env_specular = textureSampleLevel(env_map, linear_sampler, r * flip, 0.0).rgb;
    let env_diffuse = textureSampleLevel(env_map, linear_sampler, n * flip, 0.0).rgb;

    var base = material.color.rgb;
    var alpha = material.color.a;
    if (material.maps.x != 0u) {
        base *= map_sample.rgb;
        alpha *= map_sample.a;
    }
    if (material.maps.y != 0u) {
        alpha *= alpha_sample.g;
    }

    var color: vec3<f32>;
    switch material.kind.x {
        case 0u: {
            color = base;
        }
        case 1u: {
            var shade = vec3<f32>(0.5 + 0.5 * view_n.z);
            if (material.maps.z != 0u) {
                shade = matcap_sample.rgb;
            }
            color = base * shade;
        }
        case 2u: {
            let near = frame.camera_pos.w;
            let far = frame.ambient.w;
            let t = clamp((in.view_depth - near) / max(far - near, 1e-4), 0.0, 1.0);
            color = vec3<f32>(1.0 - t);
        }
        case 3u: {
            color = base * lambert(n, in.world_pos);
        }
        case 4u: {
            color = phong(base, n, v, in.world_pos);
        }
        case 5u: {
            color = toon(base, n, in.world_pos);
        }
        default: {
            color = standard(base, n, v, in.world_pos, env_specular, env_diffuse);
        }
    }

    let out_alpha = select(1.0, alpha, material.kind.y != 0u);
    return vec4<f32>(color, out_alpha);
}
"#;
