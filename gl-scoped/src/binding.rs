//! Scoped access to the four global GL binding points.
//!
//! Each binding point (program, vertex array, array buffer, 2D texture) is a
//! process-wide mutable register. [`GpuState`] owns one [`Register`] per
//! point; binding goes through [`Register::bind`], which returns a guard that
//! rebinds zero when it drops, on every exit path.
//!
//! The guard holds the register's `&mut` borrow for its whole lifetime, so a
//! second guard for the same binding point cannot exist while one is live,
//! and guards for different points never interfere. Locals drop in reverse
//! declaration order, which is exactly the stack discipline the binding
//! points need.

use crate::error::{drain_gl_errors, Error};
use gl::types::GLuint;
use std::marker::PhantomData;
use std::ops::Deref;

/// One kind of global binding point. Implementations issue the raw bind call
/// for their slot; handle 0 means "nothing bound".
pub trait BindingPoint {
    fn bind_raw(handle: GLuint);
}

pub struct ProgramTarget;
impl BindingPoint for ProgramTarget {
    fn bind_raw(handle: GLuint) {
        unsafe { gl::UseProgram(handle) }
    }
}

pub struct VertexArrayTarget;
impl BindingPoint for VertexArrayTarget {
    fn bind_raw(handle: GLuint) {
        unsafe { gl::BindVertexArray(handle) }
    }
}

pub struct ArrayBufferTarget;
impl BindingPoint for ArrayBufferTarget {
    fn bind_raw(handle: GLuint) {
        unsafe { gl::BindBuffer(gl::ARRAY_BUFFER, handle) }
    }
}

pub struct TextureTarget;
impl BindingPoint for TextureTarget {
    fn bind_raw(handle: GLuint) {
        unsafe { gl::BindTexture(gl::TEXTURE_2D, handle) }
    }
}

/// A GPU resource that can occupy a binding point.
pub trait BindTo {
    type Point: BindingPoint;
    fn raw_handle(&self) -> GLuint;
}

/// The register for one binding point. Only reachable through [`GpuState`],
/// so there is exactly one per point per context thread.
pub struct Register<P: BindingPoint> {
    _kind: PhantomData<P>,
}

impl<P: BindingPoint> Register<P> {
    fn new() -> Self {
        Self { _kind: PhantomData }
    }

    /// Binds `resource` to this register's binding point and returns the
    /// guard that will unbind it.
    pub fn bind<'r, 'g, R>(&'g mut self, resource: &'r R) -> Result<Scoped<'r, 'g, R>, Error>
    where
        R: BindTo<Point = P>,
    {
        P::bind_raw(resource.raw_handle());
        if let Err(e) = drain_gl_errors() {
            P::bind_raw(0);
            return Err(e);
        }
        Ok(Scoped {
            resource,
            _register: PhantomData,
        })
    }
}

/// A live binding. Dereferences to the bound resource; operations that are
/// only legal while bound live on per-resource impls of this type.
pub struct Scoped<'r, 'g, R: BindTo> {
    resource: &'r R,
    _register: PhantomData<&'g mut Register<R::Point>>,
}

impl<R: BindTo> Deref for Scoped<'_, '_, R> {
    type Target = R;

    fn deref(&self) -> &R {
        self.resource
    }
}

impl<R: BindTo> Drop for Scoped<'_, '_, R> {
    fn drop(&mut self) {
        <R::Point as BindingPoint>::bind_raw(0);
    }
}

//

/// Texture image unit index, as passed to `glActiveTexture` and to sampler
/// uniforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveTextureUnit(pub u32);

/// The binding-state token for the one thread that owns the GL context.
/// Everything that touches a binding point takes this `&mut`.
pub struct GpuState {
    pub program: Register<ProgramTarget>,
    pub vertex_array: Register<VertexArrayTarget>,
    pub array_buffer: Register<ArrayBufferTarget>,
    pub texture_2d: Register<TextureTarget>,
}

impl GpuState {
    pub fn new() -> Self {
        Self {
            program: Register::new(),
            vertex_array: Register::new(),
            array_buffer: Register::new(),
            texture_2d: Register::new(),
        }
    }

    /// Selects the active texture unit for the next texture bind.
    pub fn active_texture(&mut self, unit: ActiveTextureUnit) -> Result<(), Error> {
        unsafe { gl::ActiveTexture(gl::TEXTURE0 + unit.0) };
        drain_gl_errors()
    }
}

impl Default for GpuState {
    fn default() -> Self {
        Self::new()
    }
}
