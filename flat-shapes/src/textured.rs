use crate::geometry::StripGeometry;
use crate::Shape;
use gl::types::GLint;
use gl_scoped::binding::{ActiveTextureUnit, GpuState};
use gl_scoped::error::Error;
use gl_scoped::image::ImageData;
use gl_scoped::linear::Vec2;
use gl_scoped::program::Program;
use gl_scoped::texture::{Texture, WrapMode};
use gl_scoped::vertex::Buffer;
use std::rc::Rc;

pub const VERTEX_SOURCE: &str = "#version 150
in vec2 position;
in vec2 texcoord;

out vec2 v_texcoord;

void main() {
    v_texcoord = texcoord;
    gl_Position = vec4(position, 0.0, 1.0);
}
";

pub const FRAGMENT_SOURCE: &str = "#version 150
uniform sampler2D tex;

in vec2 v_texcoord;

out vec4 frag_color;

void main() {
    frag_color = texture(tex, v_texcoord);
}
";

/// All textured shapes sample through this unit; the sampler uniform is set
/// to it once at construction.
pub const TEXTURE_UNIT: ActiveTextureUnit = ActiveTextureUnit(0);

/// Compiles the built-in textured program. Wrap it in `Rc` to share it
/// across shapes.
pub fn default_program() -> Result<Program, Error> {
    Program::compile(VERTEX_SOURCE, FRAGMENT_SOURCE)
}

/// A texture-sampled triangle strip: the shared geometry core plus a UV
/// buffer and an exclusively owned texture.
pub struct TexturedShape {
    geometry: StripGeometry,
    uv_buffer: Buffer<Vec2>,
    texture: Texture,
    program: Rc<Program>,
}

impl TexturedShape {
    /// Looks up all three bindings first, then allocates geometry, the UV
    /// buffer and the texture. A failure part-way drops whatever was already
    /// allocated.
    pub fn new(
        gpu: &mut GpuState,
        program: Rc<Program>,
        vertices: Vec<Vec2>,
        uvs: Vec<Vec2>,
        image: &ImageData,
        wrap: WrapMode,
    ) -> Result<Self, Error> {
        assert_eq!(vertices.len(), uvs.len(), "one UV per vertex");

        let position_location = program.attribute("position")?;
        let texcoord_location = program.attribute("texcoord")?;
        let sampler_location = program.uniform("tex")?;
        log::debug!(
            "textured shape: position at {}, texcoord at {}, sampler at {}",
            position_location,
            texcoord_location,
            sampler_location,
        );

        let geometry = StripGeometry::new(gpu, position_location, vertices)?;
        let uv_buffer = Buffer::new()?;
        {
            let _bound_array = gpu.vertex_array.bind(geometry.vertex_array())?;
            let bound_uvs = gpu.array_buffer.bind(&uv_buffer)?;
            bound_uvs.load_static(&uvs)?;
            bound_uvs.rig_attribute(texcoord_location)?;
        }

        let texture = Texture::from_image(gpu, image, wrap)?;
        {
            let bound_program = gpu.program.bind(program.as_ref())?;
            bound_program.set_uniform_1i(sampler_location, TEXTURE_UNIT.0 as GLint)?;
        }

        Ok(Self {
            geometry,
            uv_buffer,
            texture,
            program,
        })
    }

    pub fn vertices(&self) -> &[Vec2] {
        self.geometry.vertices()
    }

    pub fn uv_buffer(&self) -> &Buffer<Vec2> {
        &self.uv_buffer
    }
}

impl Shape for TexturedShape {
    fn draw(&self, gpu: &mut GpuState) -> Result<(), Error> {
        gpu.active_texture(TEXTURE_UNIT)?;
        let _bound_program = gpu.program.bind(self.program.as_ref())?;
        let bound_array = gpu.vertex_array.bind(self.geometry.vertex_array())?;
        let _bound_texture = gpu.texture_2d.bind(&self.texture)?;
        bound_array.draw_arrays(gl::TRIANGLE_STRIP, 0, self.geometry.vertex_count())
    }

    fn translate(&mut self, delta: Vec2, gpu: &mut GpuState) -> Result<(), Error> {
        self.geometry.translate(delta, gpu)
    }
}
