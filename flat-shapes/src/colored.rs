use crate::geometry::StripGeometry;
use crate::Shape;
use gl::types::GLint;
use gl_scoped::binding::GpuState;
use gl_scoped::error::Error;
use gl_scoped::linear::Vec2;
use gl_scoped::program::Program;
use std::rc::Rc;

pub const VERTEX_SOURCE: &str = "#version 150
in vec2 position;

void main() {
    gl_Position = vec4(position, 0.0, 1.0);
}
";

pub const FRAGMENT_SOURCE: &str = "#version 150
uniform vec3 color;

out vec4 frag_color;

void main() {
    frag_color = vec4(color, 1.0);
}
";

/// Compiles the built-in solid-color program. Wrap it in `Rc` to share it
/// across shapes.
pub fn default_program() -> Result<Program, Error> {
    Program::compile(VERTEX_SOURCE, FRAGMENT_SOURCE)
}

/// A solid-color triangle strip. Any program may be substituted for the
/// built-in one as long as it exposes a `position` attribute and a `color`
/// uniform.
pub struct ColoredShape {
    geometry: StripGeometry,
    program: Rc<Program>,
    color: [f32; 3],
    color_location: GLint,
}

impl ColoredShape {
    /// Looks up the bindings, then allocates and uploads the geometry. The
    /// lookups come first so an unknown name fails before any GPU object
    /// exists.
    pub fn new(
        gpu: &mut GpuState,
        program: Rc<Program>,
        vertices: Vec<Vec2>,
        color: [f32; 3],
    ) -> Result<Self, Error> {
        let position_location = program.attribute("position")?;
        let color_location = program.uniform("color")?;
        log::debug!(
            "colored shape: position at {}, color at {}",
            position_location,
            color_location,
        );

        let geometry = StripGeometry::new(gpu, position_location, vertices)?;
        Ok(Self {
            geometry,
            program,
            color,
            color_location,
        })
    }

    pub fn color(&self) -> [f32; 3] {
        self.color
    }

    /// Takes effect on the next draw; no upload happens here.
    pub fn set_color(&mut self, color: [f32; 3]) {
        self.color = color;
    }

    pub fn vertices(&self) -> &[Vec2] {
        self.geometry.vertices()
    }
}

impl Shape for ColoredShape {
    fn draw(&self, gpu: &mut GpuState) -> Result<(), Error> {
        let bound_program = gpu.program.bind(self.program.as_ref())?;
        bound_program.set_uniform_3f(
            self.color_location,
            self.color[0],
            self.color[1],
            self.color[2],
        )?;
        let bound_array = gpu.vertex_array.bind(self.geometry.vertex_array())?;
        bound_array.draw_arrays(gl::TRIANGLE_STRIP, 0, self.geometry.vertex_count())
    }

    fn translate(&mut self, delta: Vec2, gpu: &mut GpuState) -> Result<(), Error> {
        self.geometry.translate(delta, gpu)
    }
}
