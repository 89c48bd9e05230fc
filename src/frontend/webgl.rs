//! WebGL2 implementation of [`Surface`].

use js_sys::{Float32Array, Uint32Array};
use wasm_bindgen::JsCast;
use web_sys::{
    HtmlCanvasElement, WebGl2RenderingContext as GL, WebGlBuffer, WebGlProgram, WebGlShader,
    WebGlUniformLocation, WebGlVertexArrayObject,
};

use crate::events::Viewport;
use crate::scene::geometry::Geometry;
use crate::scene::{Frame, SceneError, Surface};

const MAX_LIGHTS: usize = 2;
const VERTEX_STRIDE: i32 = 6 * 4;

const VERT_SRC: &str = r#"#version 300 es
layout(location = 0) in vec3 a_position;
layout(location = 1) in vec3 a_normal;
uniform mat4 u_model;
uniform mat4 u_view_projection;
out vec3 v_world;
out vec3 v_normal;
void main() {
    vec4 world = u_model * vec4(a_position, 1.0);
    v_world = world.xyz;
    v_normal = mat3(u_model) * a_normal;
    gl_Position = u_view_projection * world;
}
"#;

// Range 0 disables distance falloff.
const FRAG_SRC: &str = r#"#version 300 es
precision highp float;
in vec3 v_world;
in vec3 v_normal;
uniform vec3 u_eye;
uniform vec3 u_ambient;
uniform vec3 u_color;
uniform vec3 u_emissive;
uniform float u_emissive_intensity;
uniform float u_metalness;
uniform float u_roughness;
uniform int u_light_count;
uniform vec3 u_light_position[2];
uniform vec3 u_light_color[2];
uniform float u_light_intensity[2];
uniform float u_light_range[2];
out vec4 out_color;
void main() {
    vec3 n = normalize(gl_FrontFacing ? v_normal : -v_normal);
    vec3 v = normalize(u_eye - v_world);
    vec3 diffuse_color = u_color * (1.0 - u_metalness);
    vec3 specular_color = mix(vec3(0.04), u_color, u_metalness);
    float shininess = mix(256.0, 4.0, u_roughness);
    vec3 lit = u_ambient * diffuse_color;
    for (int i = 0; i < 2; i++) {
        if (i >= u_light_count) break;
        vec3 to_light = u_light_position[i] - v_world;
        float dist = length(to_light);
        vec3 l = to_light / max(dist, 1e-4);
        float falloff = u_light_range[i] > 0.0 ? clamp(1.0 - dist / u_light_range[i], 0.0, 1.0) : 1.0;
        vec3 radiance = u_light_color[i] * u_light_intensity[i] * falloff * falloff;
        float ndl = max(dot(n, l), 0.0);
        vec3 h = normalize(l + v);
        float spec = pow(max(dot(n, h), 0.0), shininess) * ndl;
        lit += radiance * (diffuse_color * ndl + specular_color * spec);
    }
    lit += u_emissive * u_emissive_intensity;
    out_color = vec4(lit, 1.0);
}
"#;

fn compile_shader(gl: &GL, src: &str, shader_type: u32) -> Result<WebGlShader, SceneError> {
    let shader = gl
        .create_shader(shader_type)
        .ok_or_else(|| SceneError::ShaderCompile("could not create shader".to_string()))?;
    gl.shader_source(&shader, src);
    gl.compile_shader(&shader);
    if !gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        return Err(SceneError::ShaderCompile(
            gl.get_shader_info_log(&shader).unwrap_or_default(),
        ));
    }
    Ok(shader)
}

fn link_program(gl: &GL, vert_src: &str, frag_src: &str) -> Result<WebGlProgram, SceneError> {
    let vert = compile_shader(gl, vert_src, GL::VERTEX_SHADER)?;
    let frag = compile_shader(gl, frag_src, GL::FRAGMENT_SHADER)?;
    let prog = gl
        .create_program()
        .ok_or_else(|| SceneError::ProgramLink("could not create program".to_string()))?;
    gl.attach_shader(&prog, &vert);
    gl.attach_shader(&prog, &frag);
    gl.link_program(&prog);
    gl.delete_shader(Some(&vert));
    gl.delete_shader(Some(&frag));
    if !gl
        .get_program_parameter(&prog, GL::LINK_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        return Err(SceneError::ProgramLink(
            gl.get_program_info_log(&prog).unwrap_or_default(),
        ));
    }
    Ok(prog)
}

fn uniform(gl: &GL, prog: &WebGlProgram, name: &'static str) -> Result<WebGlUniformLocation, SceneError> {
    gl.get_uniform_location(prog, name)
        .ok_or(SceneError::MissingUniform(name))
}

struct Uniforms {
    model: WebGlUniformLocation,
    view_projection: WebGlUniformLocation,
    eye: WebGlUniformLocation,
    ambient: WebGlUniformLocation,
    color: WebGlUniformLocation,
    emissive: WebGlUniformLocation,
    emissive_intensity: WebGlUniformLocation,
    metalness: WebGlUniformLocation,
    roughness: WebGlUniformLocation,
    light_count: WebGlUniformLocation,
    light_position: WebGlUniformLocation,
    light_color: WebGlUniformLocation,
    light_intensity: WebGlUniformLocation,
    light_range: WebGlUniformLocation,
}

impl Uniforms {
    fn locate(gl: &GL, prog: &WebGlProgram) -> Result<Self, SceneError> {
        Ok(Self {
            model: uniform(gl, prog, "u_model")?,
            view_projection: uniform(gl, prog, "u_view_projection")?,
            eye: uniform(gl, prog, "u_eye")?,
            ambient: uniform(gl, prog, "u_ambient")?,
            color: uniform(gl, prog, "u_color")?,
            emissive: uniform(gl, prog, "u_emissive")?,
            emissive_intensity: uniform(gl, prog, "u_emissive_intensity")?,
            metalness: uniform(gl, prog, "u_metalness")?,
            roughness: uniform(gl, prog, "u_roughness")?,
            light_count: uniform(gl, prog, "u_light_count")?,
            light_position: uniform(gl, prog, "u_light_position")?,
            light_color: uniform(gl, prog, "u_light_color")?,
            light_intensity: uniform(gl, prog, "u_light_intensity")?,
            light_range: uniform(gl, prog, "u_light_range")?,
        })
    }
}

struct GpuMesh {
    vao: WebGlVertexArrayObject,
    vertices: WebGlBuffer,
    indices: WebGlBuffer,
    index_count: i32,
}

pub struct GlSurface {
    gl: GL,
    canvas: HtmlCanvasElement,
    program: WebGlProgram,
    uniforms: Uniforms,
    meshes: Vec<GpuMesh>,
    size: Viewport,
    pixel_ratio: f64,
    disposed: bool,
}

impl GlSurface {
    /// Fails with [`SceneError::ContextUnavailable`] when the browser has no WebGL2.
    pub fn new(canvas: HtmlCanvasElement, pixel_ratio: f64) -> Result<Self, SceneError> {
        let gl: GL = canvas
            .get_context("webgl2")
            .ok()
            .flatten()
            .and_then(|context| context.dyn_into().ok())
            .ok_or(SceneError::ContextUnavailable)?;

        let program = link_program(&gl, VERT_SRC, FRAG_SRC)?;
        let uniforms = Uniforms::locate(&gl, &program)?;

        gl.enable(GL::DEPTH_TEST);
        gl.clear_color(0.0, 0.0, 0.0, 0.0);

        Ok(Self {
            gl,
            canvas,
            program,
            uniforms,
            meshes: Vec::new(),
            size: Viewport {
                width: 0,
                height: 0,
            },
            pixel_ratio,
            disposed: false,
        })
    }

    fn upload_mesh(&self, geometry: &Geometry) -> Result<GpuMesh, SceneError> {
        let gl = &self.gl;
        let vao = gl.create_vertex_array().ok_or(SceneError::BufferAllocation)?;
        let vertices = gl.create_buffer().ok_or(SceneError::BufferAllocation)?;
        let indices = gl.create_buffer().ok_or(SceneError::BufferAllocation)?;

        gl.bind_vertex_array(Some(&vao));

        gl.bind_buffer(GL::ARRAY_BUFFER, Some(&vertices));
        let data = Float32Array::from(geometry.interleaved().as_slice());
        gl.buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &data, GL::STATIC_DRAW);
        gl.enable_vertex_attrib_array(0);
        gl.vertex_attrib_pointer_with_i32(0, 3, GL::FLOAT, false, VERTEX_STRIDE, 0);
        gl.enable_vertex_attrib_array(1);
        gl.vertex_attrib_pointer_with_i32(1, 3, GL::FLOAT, false, VERTEX_STRIDE, 12);

        gl.bind_buffer(GL::ELEMENT_ARRAY_BUFFER, Some(&indices));
        let index_data = Uint32Array::from(geometry.indices.as_slice());
        gl.buffer_data_with_array_buffer_view(GL::ELEMENT_ARRAY_BUFFER, &index_data, GL::STATIC_DRAW);

        gl.bind_vertex_array(None);

        Ok(GpuMesh {
            vao,
            vertices,
            indices,
            index_count: geometry.indices.len() as i32,
        })
    }

    fn release_meshes(&mut self) {
        for mesh in self.meshes.drain(..) {
            self.gl.delete_vertex_array(Some(&mesh.vao));
            self.gl.delete_buffer(Some(&mesh.vertices));
            self.gl.delete_buffer(Some(&mesh.indices));
        }
    }
}

impl Surface for GlSurface {
    fn upload(&mut self, geometries: &[Geometry]) -> Result<(), SceneError> {
        self.release_meshes();
        let meshes = geometries
            .iter()
            .map(|geometry| self.upload_mesh(geometry))
            .collect::<Result<Vec<_>, _>>()?;
        self.meshes = meshes;
        Ok(())
    }

    fn set_size(&mut self, viewport: Viewport) {
        let width = (f64::from(viewport.width) * self.pixel_ratio).round() as u32;
        let height = (f64::from(viewport.height) * self.pixel_ratio).round() as u32;

        if self.canvas.width() != width || self.canvas.height() != height {
            self.canvas.set_width(width);
            self.canvas.set_height(height);
        }
        self.gl.viewport(0, 0, width as i32, height as i32);
        self.size = viewport;
    }

    fn size(&self) -> Viewport {
        self.size
    }

    fn draw(&mut self, frame: &Frame) {
        if self.disposed {
            return;
        }

        let gl = &self.gl;
        let u = &self.uniforms;
        gl.clear(GL::COLOR_BUFFER_BIT | GL::DEPTH_BUFFER_BIT);
        gl.use_program(Some(&self.program));

        gl.uniform_matrix4fv_with_f32_array(
            Some(&u.view_projection),
            false,
            &frame.view_projection.to_cols_array(),
        );
        gl.uniform3fv_with_f32_array(Some(&u.eye), &frame.eye.to_array());
        gl.uniform3fv_with_f32_array(Some(&u.ambient), &frame.ambient.to_array());

        let lights = &frame.lights[..frame.lights.len().min(MAX_LIGHTS)];
        let mut positions = [0.0_f32; MAX_LIGHTS * 3];
        let mut colors = [0.0_f32; MAX_LIGHTS * 3];
        let mut intensities = [0.0_f32; MAX_LIGHTS];
        let mut ranges = [0.0_f32; MAX_LIGHTS];
        for (index, light) in lights.iter().enumerate() {
            positions[index * 3..index * 3 + 3].copy_from_slice(&light.position.to_array());
            colors[index * 3..index * 3 + 3].copy_from_slice(&light.color.to_array());
            intensities[index] = light.intensity;
            ranges[index] = light.range;
        }
        gl.uniform1i(Some(&u.light_count), lights.len() as i32);
        gl.uniform3fv_with_f32_array(Some(&u.light_position), &positions);
        gl.uniform3fv_with_f32_array(Some(&u.light_color), &colors);
        gl.uniform1fv_with_f32_array(Some(&u.light_intensity), &intensities);
        gl.uniform1fv_with_f32_array(Some(&u.light_range), &ranges);

        for item in &frame.items {
            let Some(mesh) = self.meshes.get(item.geometry) else {
                continue;
            };

            let material = &item.material;
            gl.uniform_matrix4fv_with_f32_array(Some(&u.model), false, &item.model.to_cols_array());
            gl.uniform3fv_with_f32_array(Some(&u.color), &material.color.to_array());
            gl.uniform3fv_with_f32_array(Some(&u.emissive), &material.emissive.to_array());
            gl.uniform1f(Some(&u.emissive_intensity), material.emissive_intensity);
            gl.uniform1f(Some(&u.metalness), material.metalness);
            gl.uniform1f(Some(&u.roughness), material.roughness);

            gl.bind_vertex_array(Some(&mesh.vao));
            gl.draw_elements_with_i32(GL::TRIANGLES, mesh.index_count, GL::UNSIGNED_INT, 0);
        }
        gl.bind_vertex_array(None);
    }

    fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.release_meshes();
        self.gl.delete_program(Some(&self.program));
        self.disposed = true;
    }
}
