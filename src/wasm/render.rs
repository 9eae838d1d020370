//! WebGL2 scene assembly and the render pass chain.
//!
//! Owns every GL resource it allocates: the point-cloud pass, the
//! starfield pass, and the post chain (bright extract, separable blur,
//! composite with tone mapping). `dispose` releases all of it and is
//! safe to call more than once.

use glam::Mat4;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    HtmlCanvasElement, WebGl2RenderingContext as GL, WebGlBuffer, WebGlFramebuffer, WebGlProgram,
    WebGlShader, WebGlTexture, WebGlUniformLocation, WebGlVertexArrayObject,
};

use crate::camera::{cloud_spin, star_spin, Camera};
use crate::morph::Mode;
use crate::sampler::ParticleSet;

const POINT_SIZE: f32 = 1.6;
const GLOW: f32 = 1.0;
const EXPOSURE: f32 = 1.15;
const STAR_FOG_DENSITY: f32 = 0.26;
const BLUR_PASSES: usize = 4;

/// Post-chain bloom parameters, retuned per silhouette.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BloomSettings {
    pub strength: f32,
    pub radius: f32,
    pub threshold: f32,
}

impl BloomSettings {
    pub fn for_mode(mode: Mode) -> Self {
        match mode {
            Mode::Tree => Self {
                strength: 1.35,
                radius: 0.55,
                threshold: 0.12,
            },
            Mode::Cake => Self {
                strength: 1.05,
                radius: 0.42,
                threshold: 0.10,
            },
        }
    }
}

const POINTS_VS: &str = r#"#version 300 es
precision highp float;

uniform mat4 uModelView;
uniform mat4 uProjection;
uniform float uTime;
uniform float uPixelRatio;
uniform float uSize;

layout(location = 0) in vec3 position;
layout(location = 1) in vec3 color;
layout(location = 2) in float aSeed;

out vec3 vColor;
out float vTwinkle;

void main() {
    vColor = color;

    // Soft twinkle per particle
    float tw = sin(uTime * (1.2 + aSeed * 1.6) + aSeed * 20.0);
    vTwinkle = 0.55 + 0.45 * tw;

    vec4 mvPosition = uModelView * vec4(position, 1.0);
    float size = uSize * uPixelRatio;
    // Perspective scaling (keep points reasonably small)
    size *= (14.0 / -mvPosition.z);
    size *= (0.7 + 0.8 * vTwinkle);

    // Safety clamp to avoid giant squares on some GPUs
    size = clamp(size, 1.0, 36.0);

    gl_PointSize = size;
    gl_Position = uProjection * mvPosition;
}
"#;

const POINTS_FS: &str = r#"#version 300 es
precision highp float;

uniform float uGlow;

in vec3 vColor;
in float vTwinkle;

out vec4 fragColor;

void main() {
    vec2 uv = gl_PointCoord.xy - 0.5;
    float d = length(uv);

    // Core + halo
    // NOTE: smoothstep requires edge0 < edge1; we invert to get a soft disc.
    float core = 1.0 - smoothstep(0.0, 0.32, d);
    float halo = (1.0 - smoothstep(0.0, 0.7, d)) * 0.55;

    // Cut hard outside to prevent square corners
    if (d > 0.72) discard;

    float alpha = (core + halo) * (0.55 + 0.55 * vTwinkle) * uGlow;
    vec3 col = vColor;

    // Subtle warm highlight in center
    col += vec3(0.12, 0.08, 0.05) * core;

    fragColor = vec4(col, alpha);
}
"#;

const STARS_VS: &str = r#"#version 300 es
precision highp float;

uniform mat4 uModelView;
uniform mat4 uProjection;
uniform float uPixelRatio;

layout(location = 0) in vec3 position;
layout(location = 1) in vec3 color;

out vec3 vColor;
out float vDepth;

void main() {
    vColor = color;
    vec4 mvPosition = uModelView * vec4(position, 1.0);
    vDepth = -mvPosition.z;

    float size = 1.3 * uPixelRatio * (14.0 / -mvPosition.z);
    gl_PointSize = clamp(size, 1.0, 8.0);
    gl_Position = uProjection * mvPosition;
}
"#;

const STARS_FS: &str = r#"#version 300 es
precision highp float;

uniform float uFogDensity;

in vec3 vColor;
in float vDepth;

out vec4 fragColor;

void main() {
    vec2 uv = gl_PointCoord.xy - 0.5;
    float d = length(uv);
    if (d > 0.5) discard;

    float falloff = 1.0 - smoothstep(0.0, 0.5, d);
    float fog = exp(-uFogDensity * uFogDensity * vDepth * vDepth);
    fragColor = vec4(vColor, 0.5 * falloff * fog);
}
"#;

const QUAD_VS: &str = r#"#version 300 es
precision highp float;

out vec2 vUv;

void main() {
    vec2 p = vec2(float((gl_VertexID << 1) & 2), float(gl_VertexID & 2));
    vUv = p;
    gl_Position = vec4(p * 2.0 - 1.0, 0.0, 1.0);
}
"#;

const BRIGHT_FS: &str = r#"#version 300 es
precision highp float;

uniform sampler2D uScene;
uniform float uThreshold;

in vec2 vUv;
out vec4 fragColor;

void main() {
    vec3 c = texture(uScene, vUv).rgb;
    float l = dot(c, vec3(0.2126, 0.7152, 0.0722));
    float k = smoothstep(uThreshold, uThreshold + 0.1, l);
    fragColor = vec4(c * k, 1.0);
}
"#;

const BLUR_FS: &str = r#"#version 300 es
precision highp float;

uniform sampler2D uSource;
uniform vec2 uStep;

in vec2 vUv;
out vec4 fragColor;

void main() {
    float w[5] = float[](0.227027, 0.1945946, 0.1216216, 0.054054, 0.016216);
    vec3 sum = texture(uSource, vUv).rgb * w[0];
    for (int i = 1; i < 5; i++) {
        vec2 off = uStep * float(i);
        sum += texture(uSource, vUv + off).rgb * w[i];
        sum += texture(uSource, vUv - off).rgb * w[i];
    }
    fragColor = vec4(sum, 1.0);
}
"#;

const COMPOSITE_FS: &str = r#"#version 300 es
precision highp float;

uniform sampler2D uBase;
uniform sampler2D uBloom;
uniform float uStrength;
uniform float uExposure;

in vec2 vUv;
out vec4 fragColor;

vec3 aces(vec3 x) {
    return clamp((x * (2.51 * x + 0.03)) / (x * (2.43 * x + 0.59) + 0.14), 0.0, 1.0);
}

void main() {
    vec3 hdr = texture(uBase, vUv).rgb + texture(uBloom, vUv).rgb * uStrength;
    vec3 mapped = aces(hdr * uExposure);
    fragColor = vec4(pow(mapped, vec3(1.0 / 2.2)), 1.0);
}
"#;

struct PointsPass {
    program: WebGlProgram,
    vao: WebGlVertexArrayObject,
    position_buffer: WebGlBuffer,
    color_buffer: WebGlBuffer,
    seed_buffer: WebGlBuffer,
    u_model_view: Option<WebGlUniformLocation>,
    u_projection: Option<WebGlUniformLocation>,
    u_time: Option<WebGlUniformLocation>,
    u_pixel_ratio: Option<WebGlUniformLocation>,
    u_size: Option<WebGlUniformLocation>,
    u_glow: Option<WebGlUniformLocation>,
    count: i32,
}

struct StarPass {
    program: WebGlProgram,
    vao: WebGlVertexArrayObject,
    position_buffer: WebGlBuffer,
    color_buffer: WebGlBuffer,
    u_model_view: Option<WebGlUniformLocation>,
    u_projection: Option<WebGlUniformLocation>,
    u_pixel_ratio: Option<WebGlUniformLocation>,
    u_fog_density: Option<WebGlUniformLocation>,
    count: i32,
}

/// Offscreen color target.
struct Target {
    fbo: WebGlFramebuffer,
    tex: WebGlTexture,
}

struct PostChain {
    quad_vao: WebGlVertexArrayObject,
    scene: Target,
    bright: Target,
    pingpong: [Target; 2],
    bright_program: WebGlProgram,
    u_bright_scene: Option<WebGlUniformLocation>,
    u_bright_threshold: Option<WebGlUniformLocation>,
    blur_program: WebGlProgram,
    u_blur_source: Option<WebGlUniformLocation>,
    u_blur_step: Option<WebGlUniformLocation>,
    composite_program: WebGlProgram,
    u_comp_base: Option<WebGlUniformLocation>,
    u_comp_bloom: Option<WebGlUniformLocation>,
    u_comp_strength: Option<WebGlUniformLocation>,
    u_comp_exposure: Option<WebGlUniformLocation>,
    bloom_width: i32,
    bloom_height: i32,
}

pub struct SceneRenderer {
    gl: GL,
    canvas: HtmlCanvasElement,
    points: PointsPass,
    stars: StarPass,
    post: PostChain,
    camera: Camera,
    bloom: BloomSettings,
    width: i32,
    height: i32,
    pixel_ratio: f32,
    disposed: bool,
}

impl SceneRenderer {
    /// Build the full pipeline. `live` seeds the morphable buffers,
    /// `starfield` the background pass, `seeds` the twinkle attribute.
    pub fn new(
        canvas: &HtmlCanvasElement,
        live: &ParticleSet,
        starfield: &ParticleSet,
        seeds: &[f32],
    ) -> Result<Self, JsValue> {
        let gl: GL = canvas
            .get_context("webgl2")?
            .ok_or("WebGL2 not supported")?
            .dyn_into()?;

        let points = {
            let program = link_program(&gl, POINTS_VS, POINTS_FS)?;
            let vao = gl.create_vertex_array().ok_or("create_vertex_array failed")?;
            gl.bind_vertex_array(Some(&vao));
            let position_buffer = upload_f32(&gl, &live.positions, GL::DYNAMIC_DRAW)?;
            bind_attrib(&gl, 0, 3);
            let color_buffer = upload_f32(&gl, &live.colors, GL::DYNAMIC_DRAW)?;
            bind_attrib(&gl, 1, 3);
            let seed_buffer = upload_f32(&gl, seeds, GL::STATIC_DRAW)?;
            bind_attrib(&gl, 2, 1);
            gl.bind_vertex_array(None);
            gl.bind_buffer(GL::ARRAY_BUFFER, None);

            PointsPass {
                u_model_view: gl.get_uniform_location(&program, "uModelView"),
                u_projection: gl.get_uniform_location(&program, "uProjection"),
                u_time: gl.get_uniform_location(&program, "uTime"),
                u_pixel_ratio: gl.get_uniform_location(&program, "uPixelRatio"),
                u_size: gl.get_uniform_location(&program, "uSize"),
                u_glow: gl.get_uniform_location(&program, "uGlow"),
                program,
                vao,
                position_buffer,
                color_buffer,
                seed_buffer,
                count: live.len() as i32,
            }
        };

        let stars = {
            let program = link_program(&gl, STARS_VS, STARS_FS)?;
            let vao = gl.create_vertex_array().ok_or("create_vertex_array failed")?;
            gl.bind_vertex_array(Some(&vao));
            let position_buffer = upload_f32(&gl, &starfield.positions, GL::STATIC_DRAW)?;
            bind_attrib(&gl, 0, 3);
            let color_buffer = upload_f32(&gl, &starfield.colors, GL::STATIC_DRAW)?;
            bind_attrib(&gl, 1, 3);
            gl.bind_vertex_array(None);
            gl.bind_buffer(GL::ARRAY_BUFFER, None);

            StarPass {
                u_model_view: gl.get_uniform_location(&program, "uModelView"),
                u_projection: gl.get_uniform_location(&program, "uProjection"),
                u_pixel_ratio: gl.get_uniform_location(&program, "uPixelRatio"),
                u_fog_density: gl.get_uniform_location(&program, "uFogDensity"),
                program,
                vao,
                position_buffer,
                color_buffer,
                count: starfield.len() as i32,
            }
        };

        let post = {
            let quad_vao = gl.create_vertex_array().ok_or("create_vertex_array failed")?;
            let scene = make_target(&gl, 1, 1)?;
            let bright = make_target(&gl, 1, 1)?;
            let pingpong = [make_target(&gl, 1, 1)?, make_target(&gl, 1, 1)?];

            let bright_program = link_program(&gl, QUAD_VS, BRIGHT_FS)?;
            let blur_program = link_program(&gl, QUAD_VS, BLUR_FS)?;
            let composite_program = link_program(&gl, QUAD_VS, COMPOSITE_FS)?;

            PostChain {
                u_bright_scene: gl.get_uniform_location(&bright_program, "uScene"),
                u_bright_threshold: gl.get_uniform_location(&bright_program, "uThreshold"),
                u_blur_source: gl.get_uniform_location(&blur_program, "uSource"),
                u_blur_step: gl.get_uniform_location(&blur_program, "uStep"),
                u_comp_base: gl.get_uniform_location(&composite_program, "uBase"),
                u_comp_bloom: gl.get_uniform_location(&composite_program, "uBloom"),
                u_comp_strength: gl.get_uniform_location(&composite_program, "uStrength"),
                u_comp_exposure: gl.get_uniform_location(&composite_program, "uExposure"),
                quad_vao,
                scene,
                bright,
                pingpong,
                bright_program,
                blur_program,
                composite_program,
                bloom_width: 1,
                bloom_height: 1,
            }
        };

        Ok(Self {
            gl,
            canvas: canvas.clone(),
            points,
            stars,
            post,
            camera: Camera::new(1.0),
            bloom: BloomSettings::for_mode(Mode::Tree),
            width: 1,
            height: 1,
            pixel_ratio: 1.0,
            disposed: false,
        })
    }

    pub fn set_bloom(&mut self, bloom: BloomSettings) {
        self.bloom = bloom;
    }

    /// Push rewritten live buffers to the GPU.
    pub fn upload_live(&self, positions: &[f32], colors: &[f32]) {
        let gl = &self.gl;
        gl.bind_buffer(GL::ARRAY_BUFFER, Some(&self.points.position_buffer));
        unsafe {
            let view = js_sys::Float32Array::view(positions);
            gl.buffer_sub_data_with_i32_and_array_buffer_view(GL::ARRAY_BUFFER, 0, &view);
        }
        gl.bind_buffer(GL::ARRAY_BUFFER, Some(&self.points.color_buffer));
        unsafe {
            let view = js_sys::Float32Array::view(colors);
            gl.buffer_sub_data_with_i32_and_array_buffer_view(GL::ARRAY_BUFFER, 0, &view);
        }
        gl.bind_buffer(GL::ARRAY_BUFFER, None);
    }

    /// Recompute output dimensions. `css_width`/`css_height` are the
    /// mount's layout size; the backing store is scaled by the capped
    /// device pixel ratio.
    pub fn resize(
        &mut self,
        css_width: f64,
        css_height: f64,
        pixel_ratio: f64,
    ) -> Result<(), JsValue> {
        let css_width = css_width.max(1.0);
        let css_height = css_height.max(1.0);
        let w = (css_width * pixel_ratio).floor().max(1.0) as i32;
        let h = (css_height * pixel_ratio).floor().max(1.0) as i32;

        self.canvas.set_width(w as u32);
        self.canvas.set_height(h as u32);
        let style = self.canvas.style();
        style.set_property("width", &format!("{css_width}px"))?;
        style.set_property("height", &format!("{css_height}px"))?;

        self.width = w;
        self.height = h;
        self.pixel_ratio = pixel_ratio as f32;
        self.camera.aspect = w as f32 / h as f32;

        resize_target(&self.gl, &self.post.scene, w, h)?;
        self.post.bloom_width = (w / 2).max(1);
        self.post.bloom_height = (h / 2).max(1);
        resize_target(
            &self.gl,
            &self.post.bright,
            self.post.bloom_width,
            self.post.bloom_height,
        )?;
        for target in &self.post.pingpong {
            resize_target(&self.gl, target, self.post.bloom_width, self.post.bloom_height)?;
        }
        Ok(())
    }

    /// Draw one frame at elapsed time `t` (seconds).
    pub fn render(&mut self, t: f32) {
        if self.disposed {
            return;
        }
        let gl = &self.gl;

        self.camera.orbit(t);
        let view = self.camera.view_matrix();
        let projection = self.camera.projection_matrix().to_cols_array();

        // Scene pass into the offscreen target: additive points over black.
        gl.bind_framebuffer(GL::FRAMEBUFFER, Some(&self.post.scene.fbo));
        gl.viewport(0, 0, self.width, self.height);
        gl.clear_color(0.0, 0.0, 0.0, 1.0);
        gl.clear(GL::COLOR_BUFFER_BIT);
        gl.enable(GL::BLEND);
        gl.blend_func(GL::SRC_ALPHA, GL::ONE);
        gl.depth_mask(false);

        let star_mv = (view * Mat4::from_rotation_y(star_spin(t))).to_cols_array();
        gl.use_program(Some(&self.stars.program));
        gl.uniform_matrix4fv_with_f32_array(self.stars.u_model_view.as_ref(), false, &star_mv);
        gl.uniform_matrix4fv_with_f32_array(self.stars.u_projection.as_ref(), false, &projection);
        gl.uniform1f(self.stars.u_pixel_ratio.as_ref(), self.pixel_ratio);
        gl.uniform1f(self.stars.u_fog_density.as_ref(), STAR_FOG_DENSITY);
        gl.bind_vertex_array(Some(&self.stars.vao));
        gl.draw_arrays(GL::POINTS, 0, self.stars.count);

        let cloud_mv = (view * Mat4::from_rotation_y(cloud_spin(t))).to_cols_array();
        gl.use_program(Some(&self.points.program));
        gl.uniform_matrix4fv_with_f32_array(self.points.u_model_view.as_ref(), false, &cloud_mv);
        gl.uniform_matrix4fv_with_f32_array(self.points.u_projection.as_ref(), false, &projection);
        gl.uniform1f(self.points.u_time.as_ref(), t);
        gl.uniform1f(self.points.u_pixel_ratio.as_ref(), self.pixel_ratio);
        gl.uniform1f(self.points.u_size.as_ref(), POINT_SIZE);
        gl.uniform1f(self.points.u_glow.as_ref(), GLOW);
        gl.bind_vertex_array(Some(&self.points.vao));
        gl.draw_arrays(GL::POINTS, 0, self.points.count);

        // Bright extract at half resolution.
        gl.disable(GL::BLEND);
        gl.bind_vertex_array(Some(&self.post.quad_vao));

        gl.bind_framebuffer(GL::FRAMEBUFFER, Some(&self.post.bright.fbo));
        gl.viewport(0, 0, self.post.bloom_width, self.post.bloom_height);
        gl.use_program(Some(&self.post.bright_program));
        gl.active_texture(GL::TEXTURE0);
        gl.bind_texture(GL::TEXTURE_2D, Some(&self.post.scene.tex));
        gl.uniform1i(self.post.u_bright_scene.as_ref(), 0);
        gl.uniform1f(self.post.u_bright_threshold.as_ref(), self.bloom.threshold);
        gl.draw_arrays(GL::TRIANGLES, 0, 3);

        // Separable blur, ping-pong; the radius widens the texel step.
        gl.use_program(Some(&self.post.blur_program));
        gl.uniform1i(self.post.u_blur_source.as_ref(), 0);
        let mut source = &self.post.bright.tex;
        for i in 0..BLUR_PASSES {
            let target = &self.post.pingpong[i % 2];
            gl.bind_framebuffer(GL::FRAMEBUFFER, Some(&target.fbo));
            gl.bind_texture(GL::TEXTURE_2D, Some(source));
            let spread = 1.0 + self.bloom.radius * i as f32;
            let (sx, sy) = if i % 2 == 0 {
                (spread / self.post.bloom_width as f32, 0.0)
            } else {
                (0.0, spread / self.post.bloom_height as f32)
            };
            gl.uniform2f(self.post.u_blur_step.as_ref(), sx, sy);
            gl.draw_arrays(GL::TRIANGLES, 0, 3);
            source = &target.tex;
        }

        // Composite to the canvas.
        gl.bind_framebuffer(GL::FRAMEBUFFER, None);
        gl.viewport(0, 0, self.width, self.height);
        gl.use_program(Some(&self.post.composite_program));
        gl.active_texture(GL::TEXTURE0);
        gl.bind_texture(GL::TEXTURE_2D, Some(&self.post.scene.tex));
        gl.uniform1i(self.post.u_comp_base.as_ref(), 0);
        gl.active_texture(GL::TEXTURE1);
        gl.bind_texture(GL::TEXTURE_2D, Some(source));
        gl.uniform1i(self.post.u_comp_bloom.as_ref(), 1);
        gl.uniform1f(self.post.u_comp_strength.as_ref(), self.bloom.strength);
        gl.uniform1f(self.post.u_comp_exposure.as_ref(), EXPOSURE);
        gl.draw_arrays(GL::TRIANGLES, 0, 3);

        gl.bind_vertex_array(None);
        gl.active_texture(GL::TEXTURE0);
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// Release every GL resource. Subsequent calls are no-ops.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        let gl = &self.gl;

        gl.bind_vertex_array(None);
        gl.bind_buffer(GL::ARRAY_BUFFER, None);
        gl.bind_framebuffer(GL::FRAMEBUFFER, None);
        gl.bind_texture(GL::TEXTURE_2D, None);
        gl.use_program(None);

        gl.delete_buffer(Some(&self.points.position_buffer));
        gl.delete_buffer(Some(&self.points.color_buffer));
        gl.delete_buffer(Some(&self.points.seed_buffer));
        gl.delete_vertex_array(Some(&self.points.vao));
        gl.delete_program(Some(&self.points.program));

        gl.delete_buffer(Some(&self.stars.position_buffer));
        gl.delete_buffer(Some(&self.stars.color_buffer));
        gl.delete_vertex_array(Some(&self.stars.vao));
        gl.delete_program(Some(&self.stars.program));

        for target in [&self.post.scene, &self.post.bright]
            .into_iter()
            .chain(self.post.pingpong.iter())
        {
            gl.delete_framebuffer(Some(&target.fbo));
            gl.delete_texture(Some(&target.tex));
        }
        gl.delete_vertex_array(Some(&self.post.quad_vao));
        gl.delete_program(Some(&self.post.bright_program));
        gl.delete_program(Some(&self.post.blur_program));
        gl.delete_program(Some(&self.post.composite_program));
    }
}

fn compile_shader(gl: &GL, kind: u32, source: &str) -> Result<WebGlShader, JsValue> {
    let shader = gl.create_shader(kind).ok_or("create_shader failed")?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    if gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(shader)
    } else {
        let log = gl
            .get_shader_info_log(&shader)
            .unwrap_or_else(|| "unknown shader compile error".into());
        gl.delete_shader(Some(&shader));
        Err(JsValue::from_str(&log))
    }
}

fn link_program(gl: &GL, vertex: &str, fragment: &str) -> Result<WebGlProgram, JsValue> {
    let vs = compile_shader(gl, GL::VERTEX_SHADER, vertex)?;
    let fs = compile_shader(gl, GL::FRAGMENT_SHADER, fragment)?;

    let program = gl.create_program().ok_or("create_program failed")?;
    gl.attach_shader(&program, &vs);
    gl.attach_shader(&program, &fs);
    gl.link_program(&program);

    // The program owns the shaders from here on.
    gl.delete_shader(Some(&vs));
    gl.delete_shader(Some(&fs));

    if gl
        .get_program_parameter(&program, GL::LINK_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(program)
    } else {
        let log = gl
            .get_program_info_log(&program)
            .unwrap_or_else(|| "unknown program link error".into());
        gl.delete_program(Some(&program));
        Err(JsValue::from_str(&log))
    }
}

fn upload_f32(gl: &GL, data: &[f32], usage: u32) -> Result<WebGlBuffer, JsValue> {
    let buffer = gl.create_buffer().ok_or("create_buffer failed")?;
    gl.bind_buffer(GL::ARRAY_BUFFER, Some(&buffer));
    // The view must not outlive this call: any allocation on the Rust
    // side can move the wasm heap underneath it.
    unsafe {
        let view = js_sys::Float32Array::view(data);
        gl.buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &view, usage);
    }
    Ok(buffer)
}

fn bind_attrib(gl: &GL, location: u32, components: i32) {
    gl.enable_vertex_attrib_array(location);
    gl.vertex_attrib_pointer_with_i32(location, components, GL::FLOAT, false, 0, 0);
}

fn make_target(gl: &GL, width: i32, height: i32) -> Result<Target, JsValue> {
    let tex = gl.create_texture().ok_or("create_texture failed")?;
    gl.bind_texture(GL::TEXTURE_2D, Some(&tex));
    gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MIN_FILTER, GL::LINEAR as i32);
    gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MAG_FILTER, GL::LINEAR as i32);
    gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_S, GL::CLAMP_TO_EDGE as i32);
    gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_T, GL::CLAMP_TO_EDGE as i32);
    alloc_texture(gl, width, height)?;

    let fbo = gl.create_framebuffer().ok_or("create_framebuffer failed")?;
    gl.bind_framebuffer(GL::FRAMEBUFFER, Some(&fbo));
    gl.framebuffer_texture_2d(
        GL::FRAMEBUFFER,
        GL::COLOR_ATTACHMENT0,
        GL::TEXTURE_2D,
        Some(&tex),
        0,
    );
    gl.bind_framebuffer(GL::FRAMEBUFFER, None);
    gl.bind_texture(GL::TEXTURE_2D, None);

    Ok(Target { fbo, tex })
}

fn resize_target(gl: &GL, target: &Target, width: i32, height: i32) -> Result<(), JsValue> {
    gl.bind_texture(GL::TEXTURE_2D, Some(&target.tex));
    alloc_texture(gl, width, height)?;
    gl.bind_texture(GL::TEXTURE_2D, None);
    Ok(())
}

fn alloc_texture(gl: &GL, width: i32, height: i32) -> Result<(), JsValue> {
    gl.tex_image_2d_with_i32_and_i32_and_i32_and_format_and_type_and_opt_u8_array(
        GL::TEXTURE_2D,
        0,
        GL::RGBA as i32,
        width,
        height,
        0,
        GL::RGBA,
        GL::UNSIGNED_BYTE,
        None,
    )?;
    Ok(())
}
