use crate::binding::{ArrayBufferTarget, BindTo, Scoped, VertexArrayTarget};
use crate::error::{drain_gl_errors, Error};
use crate::linear::Vec2;
use gl::types::{GLenum, GLfloat, GLint, GLsizei, GLsizeiptr, GLuint};
use std::cell::Cell;
use std::ffi::c_void;
use std::marker::PhantomData;
use std::mem::size_of;
use std::ptr::null;

/// An element type that can feed a vertex attribute. The component count is
/// derived from the type: 2 for a 2D point, 3 for a color.
pub trait VertexData: Copy {
    const COMPONENTS: GLint;
    const TYPE_CODE: GLenum;
}

impl VertexData for GLfloat {
    const COMPONENTS: GLint = 1;
    const TYPE_CODE: GLenum = gl::FLOAT;
}

impl VertexData for Vec2 {
    const COMPONENTS: GLint = 2;
    const TYPE_CODE: GLenum = gl::FLOAT;
}

impl VertexData for [f32; 2] {
    const COMPONENTS: GLint = 2;
    const TYPE_CODE: GLenum = gl::FLOAT;
}

impl VertexData for [f32; 3] {
    const COMPONENTS: GLint = 3;
    const TYPE_CODE: GLenum = gl::FLOAT;
}

/// Byte size of a tightly packed upload of `data`.
pub fn byte_len<T: VertexData>(data: &[T]) -> usize {
    data.len() * size_of::<T>()
}

//

/// One vertex array object, exclusively owned by its shape.
pub struct VertexArray {
    handle: GLuint,
}

impl VertexArray {
    pub fn new() -> Result<Self, Error> {
        let mut handle = 0;
        unsafe { gl::GenVertexArrays(1, &mut handle) };
        drain_gl_errors()?;
        Ok(Self { handle })
    }
}

impl Drop for VertexArray {
    fn drop(&mut self) {
        unsafe { gl::DeleteVertexArrays(1, &self.handle) }
    }
}

impl BindTo for VertexArray {
    type Point = VertexArrayTarget;

    fn raw_handle(&self) -> GLuint {
        self.handle
    }
}

impl Scoped<'_, '_, VertexArray> {
    /// Issues one non-indexed draw over the bound array. The caller keeps its
    /// program guard live across this call.
    pub fn draw_arrays(&self, mode: GLenum, first: GLint, count: GLsizei) -> Result<(), Error> {
        unsafe { gl::DrawArrays(mode, first, count) };
        drain_gl_errors()
    }
}

//

/// One GL_ARRAY_BUFFER-backed buffer of `T` elements. The CPU-side mirror of
/// the contents lives with the owner; the buffer only remembers how many
/// elements it was allocated for.
pub struct Buffer<T: VertexData> {
    handle: GLuint,
    len: Cell<usize>,
    _element: PhantomData<T>,
}

impl<T: VertexData> Buffer<T> {
    pub fn new() -> Result<Self, Error> {
        let mut handle = 0;
        unsafe { gl::GenBuffers(1, &mut handle) };
        drain_gl_errors()?;
        Ok(Self {
            handle,
            len: Cell::new(0),
            _element: PhantomData,
        })
    }

    /// Element count of the last `load_static`.
    pub fn len(&self) -> usize {
        self.len.get()
    }

    pub fn is_empty(&self) -> bool {
        self.len.get() == 0
    }
}

impl<T: VertexData> Drop for Buffer<T> {
    fn drop(&mut self) {
        unsafe { gl::DeleteBuffers(1, &self.handle) }
    }
}

impl<T: VertexData> BindTo for Buffer<T> {
    type Point = ArrayBufferTarget;

    fn raw_handle(&self) -> GLuint {
        self.handle
    }
}

impl<T: VertexData> Scoped<'_, '_, Buffer<T>> {
    /// One-time static-usage allocation of the buffer's storage. Later
    /// content changes go through [`Self::rewrite`]; the storage is never
    /// resized.
    pub fn load_static(&self, data: &[T]) -> Result<(), Error> {
        unsafe {
            gl::BufferData(
                gl::ARRAY_BUFFER,
                byte_len(data) as GLsizeiptr,
                data.as_ptr() as *const c_void,
                gl::STATIC_DRAW,
            )
        };
        drain_gl_errors()?;
        self.len.set(data.len());
        Ok(())
    }

    /// Overwrites the whole buffer in place. Same size, same handle, same
    /// capacity; a different element count is a programming error.
    pub fn rewrite(&self, data: &[T]) -> Result<(), Error> {
        assert_eq!(
            data.len(),
            self.len.get(),
            "rewrite must not resize the buffer"
        );
        unsafe {
            gl::BufferSubData(
                gl::ARRAY_BUFFER,
                0,
                byte_len(data) as GLsizeiptr,
                data.as_ptr() as *const c_void,
            )
        };
        drain_gl_errors()
    }

    /// Points attribute `location` at this buffer (tightly packed, component
    /// count from `T`) and enables the attribute array. Records into the
    /// vertex array bound by the caller.
    pub fn rig_attribute(&self, location: GLuint) -> Result<(), Error> {
        unsafe {
            gl::VertexAttribPointer(location, T::COMPONENTS, T::TYPE_CODE, gl::FALSE, 0, null())
        };
        drain_gl_errors()?;
        unsafe { gl::EnableVertexAttribArray(location) };
        drain_gl_errors()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn components_derive_from_the_element_type() {
        assert_eq!(Vec2::COMPONENTS, 2);
        assert_eq!(<[f32; 3]>::COMPONENTS, 3);
        assert_eq!(GLfloat::COMPONENTS, 1);
    }

    #[test]
    fn three_points_pack_into_six_floats() {
        let triangle = [
            Vec2::new(0.0, 0.5),
            Vec2::new(0.5, -0.5),
            Vec2::new(-0.5, -0.5),
        ];
        assert_eq!(byte_len(&triangle), 6 * size_of::<f32>());
    }

    #[test]
    fn vec2_has_no_padding() {
        assert_eq!(size_of::<Vec2>(), 2 * size_of::<f32>());
    }
}
