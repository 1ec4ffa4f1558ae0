use gl::types::{GLsizei, GLuint};
use gl_scoped::binding::GpuState;
use gl_scoped::error::Error;
use gl_scoped::linear::Vec2;
use gl_scoped::vertex::{Buffer, VertexArray};

/// The geometry core both shape variants compose: one exclusively owned
/// vertex array, one position buffer, and the CPU mirror of its contents in
/// strip order.
///
/// Invariant: the GPU buffer holds exactly `vertices.len()` points in the
/// same order as `vertices`. Every mutation goes through [`Self::translate`],
/// which rewrites the buffer in place without touching its identity or
/// capacity.
pub struct StripGeometry {
    vertex_array: VertexArray,
    vertex_buffer: Buffer<Vec2>,
    vertices: Vec<Vec2>,
}

impl StripGeometry {
    /// Allocates the vertex array and buffer, uploads `vertices`, and rigs
    /// them to `position_location`. Both binding points are released again
    /// before this returns; on error, anything already allocated is dropped.
    pub fn new(
        gpu: &mut GpuState,
        position_location: GLuint,
        vertices: Vec<Vec2>,
    ) -> Result<Self, Error> {
        let vertex_array = VertexArray::new()?;
        let vertex_buffer = Buffer::new()?;
        {
            let _bound_array = gpu.vertex_array.bind(&vertex_array)?;
            let bound_buffer = gpu.array_buffer.bind(&vertex_buffer)?;
            bound_buffer.load_static(&vertices)?;
            bound_buffer.rig_attribute(position_location)?;
        }
        Ok(Self {
            vertex_array,
            vertex_buffer,
            vertices,
        })
    }

    /// Moves every vertex by `delta` and rewrites the whole buffer, same
    /// size, same handle.
    pub fn translate(&mut self, delta: Vec2, gpu: &mut GpuState) -> Result<(), Error> {
        translate_vertices(&mut self.vertices, delta);
        let bound = gpu.array_buffer.bind(&self.vertex_buffer)?;
        bound.rewrite(&self.vertices)
    }

    pub fn vertex_array(&self) -> &VertexArray {
        &self.vertex_array
    }

    pub fn vertex_buffer(&self) -> &Buffer<Vec2> {
        &self.vertex_buffer
    }

    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    pub fn vertex_count(&self) -> GLsizei {
        self.vertices.len() as GLsizei
    }
}

/// Element-wise translation of the CPU mirror. Factored out so the math is
/// checkable without a context.
pub fn translate_vertices(vertices: &mut [Vec2], delta: Vec2) {
    for vertex in vertices {
        *vertex += delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Vec<Vec2> {
        vec![
            Vec2::new(0.0, 0.5),
            Vec2::new(0.5, -0.5),
            Vec2::new(-0.5, -0.5),
        ]
    }

    fn assert_close(actual: Vec2, expected: Vec2) {
        assert!(
            (actual.x - expected.x).abs() < 1e-6 && (actual.y - expected.y).abs() < 1e-6,
            "{:?} != {:?}",
            actual,
            expected
        );
    }

    #[test]
    fn translate_moves_every_vertex_by_the_delta() {
        let mut vertices = triangle();
        translate_vertices(&mut vertices, Vec2::new(0.1, 0.0));

        let expected = [
            Vec2::new(0.1, 0.5),
            Vec2::new(0.6, -0.5),
            Vec2::new(-0.4, -0.5),
        ];
        assert_eq!(vertices.len(), expected.len());
        for (actual, expected) in vertices.iter().zip(expected) {
            assert_close(*actual, expected);
        }
    }

    #[test]
    fn two_translations_compose_additively() {
        let d1 = Vec2::new(0.1, 0.0);
        let d2 = Vec2::new(-0.3, 0.2);

        let mut stepwise = triangle();
        translate_vertices(&mut stepwise, d1);
        translate_vertices(&mut stepwise, d2);

        let mut at_once = triangle();
        translate_vertices(&mut at_once, d1 + d2);

        for (a, b) in stepwise.iter().zip(at_once) {
            assert_close(*a, b);
        }
    }

    #[test]
    fn translation_preserves_count_and_order() {
        let mut vertices = triangle();
        translate_vertices(&mut vertices, Vec2::new(5.0, -5.0));
        assert_eq!(vertices.len(), 3);
        // winding order is untouched: the apex stays first
        assert_close(vertices[0], Vec2::new(5.0, -4.5));
    }
}
