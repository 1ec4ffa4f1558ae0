use crate::binding::{BindTo, ProgramTarget, Scoped};
use crate::error::{drain_gl_errors, Error, NameKind, Stage};
use gl::types::{GLchar, GLenum, GLfloat, GLint, GLsizei, GLuint};
use itertools::Itertools;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::path::Path;

/// Marker for the two compilable stages.
pub trait ShaderStage {
    const FLAVOR: GLenum;
    const STAGE: Stage;
}

pub struct VertexStage;
impl ShaderStage for VertexStage {
    const FLAVOR: GLenum = gl::VERTEX_SHADER;
    const STAGE: Stage = Stage::Vertex;
}

pub struct FragmentStage;
impl ShaderStage for FragmentStage {
    const FLAVOR: GLenum = gl::FRAGMENT_SHADER;
    const STAGE: Stage = Stage::Fragment;
}

//

/// One compiled shader object. Only lives long enough to be linked into a
/// [`Program`].
pub struct Shader<S> {
    handle: GLuint,
    _stage: PhantomData<S>,
}

impl<S: ShaderStage> Shader<S> {
    /// Compiles `source`, or reports the stage plus the driver's verbatim
    /// info log.
    pub fn compile(source: &str) -> Result<Self, Error> {
        let handle = unsafe { gl::CreateShader(S::FLAVOR) };
        drain_gl_errors()?;
        let shader = Self {
            handle,
            _stage: PhantomData,
        };

        let bytes = source.as_bytes();
        let strings = [bytes.as_ptr() as *const GLchar];
        let lengths = [bytes.len() as GLint];
        unsafe { gl::ShaderSource(shader.handle, 1, strings.as_ptr(), lengths.as_ptr()) };
        drain_gl_errors()?;
        unsafe { gl::CompileShader(shader.handle) };
        drain_gl_errors()?;

        let mut compiled = 0;
        unsafe { gl::GetShaderiv(shader.handle, gl::COMPILE_STATUS, &mut compiled) };
        if compiled == 0 {
            return Err(Error::ShaderCompile {
                stage: S::STAGE,
                diagnostic: shader_info_log(shader.handle),
            });
        }
        Ok(shader)
    }
}

impl<S> Drop for Shader<S> {
    fn drop(&mut self) {
        unsafe { gl::DeleteShader(self.handle) }
    }
}

//

/// The reflected name→location maps of a linked program. Populated exactly
/// once, immediately after linking; the program is never re-linked, so no
/// entry can go stale.
#[derive(Debug, Default)]
pub struct BindingTable {
    attributes: HashMap<String, GLuint>,
    uniforms: HashMap<String, GLint>,
}

impl BindingTable {
    /// Exact-name lookup of an active attribute's location.
    pub fn attribute(&self, name: &str) -> Result<GLuint, Error> {
        self.attributes
            .get(name)
            .copied()
            .ok_or_else(|| Error::UnknownIdentifier {
                kind: NameKind::Attribute,
                name: name.to_owned(),
            })
    }

    /// Exact-name lookup of an active uniform's location.
    pub fn uniform(&self, name: &str) -> Result<GLint, Error> {
        self.uniforms
            .get(name)
            .copied()
            .ok_or_else(|| Error::UnknownIdentifier {
                kind: NameKind::Uniform,
                name: name.to_owned(),
            })
    }

    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    pub fn uniform_names(&self) -> impl Iterator<Item = &str> {
        self.uniforms.keys().map(String::as_str)
    }
}

//

/// A linked shader program plus its reflected bindings. Share between shapes
/// with `Rc<Program>`; the GL handle is released when the last owner drops.
pub struct Program {
    handle: GLuint,
    bindings: BindingTable,
}

impl Program {
    /// Compiles both stages, links them, and reflects the active attribute
    /// and uniform sets.
    pub fn compile(vertex_source: &str, fragment_source: &str) -> Result<Self, Error> {
        let vertex = Shader::<VertexStage>::compile(vertex_source)?;
        let fragment = Shader::<FragmentStage>::compile(fragment_source)?;

        let handle = unsafe { gl::CreateProgram() };
        drain_gl_errors()?;
        let mut program = Program {
            handle,
            bindings: BindingTable::default(),
        };

        unsafe {
            gl::AttachShader(handle, vertex.handle);
            gl::AttachShader(handle, fragment.handle);
        }
        drain_gl_errors()?;
        unsafe { gl::LinkProgram(handle) };
        drain_gl_errors()?;

        let mut linked = 0;
        unsafe { gl::GetProgramiv(handle, gl::LINK_STATUS, &mut linked) };
        if linked == 0 {
            return Err(Error::ShaderLink {
                diagnostic: program_info_log(handle),
            });
        }

        unsafe {
            gl::DetachShader(handle, vertex.handle);
            gl::DetachShader(handle, fragment.handle);
        }

        program.bindings = BindingTable {
            attributes: read_active_attributes(handle)?,
            uniforms: read_active_uniforms(handle)?,
        };
        log::debug!(
            "linked program {}: attributes [{}], uniforms [{}]",
            handle,
            program.bindings.attributes.keys().join(", "),
            program.bindings.uniforms.keys().join(", "),
        );
        Ok(program)
    }

    /// Reads both stages from disk as plain text, then [`Program::compile`]s.
    pub fn from_files(vertex_path: &Path, fragment_path: &Path) -> Result<Self, Error> {
        let vertex_source = read_source(vertex_path)?;
        let fragment_source = read_source(fragment_path)?;
        Self::compile(&vertex_source, &fragment_source)
    }

    pub fn attribute(&self, name: &str) -> Result<GLuint, Error> {
        self.bindings.attribute(name)
    }

    pub fn uniform(&self, name: &str) -> Result<GLint, Error> {
        self.bindings.uniform(name)
    }

    pub fn bindings(&self) -> &BindingTable {
        &self.bindings
    }
}

impl Drop for Program {
    fn drop(&mut self) {
        unsafe { gl::DeleteProgram(self.handle) }
    }
}

impl BindTo for Program {
    type Point = ProgramTarget;

    fn raw_handle(&self) -> GLuint {
        self.handle
    }
}

/// Uniform upload is only legal while the program occupies the program
/// binding point, so the setters live on the guard.
impl Scoped<'_, '_, Program> {
    pub fn set_uniform_1i(&self, location: GLint, v0: GLint) -> Result<(), Error> {
        unsafe { gl::Uniform1i(location, v0) };
        drain_gl_errors()
    }

    pub fn set_uniform_1f(&self, location: GLint, v0: GLfloat) -> Result<(), Error> {
        unsafe { gl::Uniform1f(location, v0) };
        drain_gl_errors()
    }

    pub fn set_uniform_2f(&self, location: GLint, v0: GLfloat, v1: GLfloat) -> Result<(), Error> {
        unsafe { gl::Uniform2f(location, v0, v1) };
        drain_gl_errors()
    }

    pub fn set_uniform_3f(
        &self,
        location: GLint,
        v0: GLfloat,
        v1: GLfloat,
        v2: GLfloat,
    ) -> Result<(), Error> {
        unsafe { gl::Uniform3f(location, v0, v1, v2) };
        drain_gl_errors()
    }
}

//

fn read_source(path: &Path) -> Result<String, Error> {
    std::fs::read_to_string(path).map_err(|source| Error::FileRead {
        path: path.to_owned(),
        source,
    })
}

fn program_iv(handle: GLuint, pname: GLenum) -> Result<GLint, Error> {
    let mut value = 0;
    unsafe { gl::GetProgramiv(handle, pname, &mut value) };
    drain_gl_errors()?;
    Ok(value)
}

/// Enumerates every attribute the linker kept. Names the driver reports
/// without a location (predeclared `gl_*` inputs) are not user bindings and
/// are skipped.
fn read_active_attributes(handle: GLuint) -> Result<HashMap<String, GLuint>, Error> {
    let count = program_iv(handle, gl::ACTIVE_ATTRIBUTES)?;
    let name_capacity = program_iv(handle, gl::ACTIVE_ATTRIBUTE_MAX_LENGTH)?.max(1) as usize;

    let mut attributes = HashMap::with_capacity(count.max(0) as usize);
    for index in 0..count.max(0) as GLuint {
        let mut name_buf = vec![0 as GLchar; name_capacity + 1];
        let mut written: GLsizei = 0;
        let mut size: GLint = 0;
        let mut data_type: GLenum = 0;
        unsafe {
            gl::GetActiveAttrib(
                handle,
                index,
                name_buf.len() as GLsizei,
                &mut written,
                &mut size,
                &mut data_type,
                name_buf.as_mut_ptr(),
            );
        }
        drain_gl_errors()?;

        let location = unsafe { gl::GetAttribLocation(handle, name_buf.as_ptr()) };
        drain_gl_errors()?;
        if location < 0 {
            continue;
        }
        attributes.insert(name_from_gl(&name_buf, written), location as GLuint);
    }
    Ok(attributes)
}

/// Enumerates every uniform the linker kept. A program with no uniforms
/// yields an empty map.
fn read_active_uniforms(handle: GLuint) -> Result<HashMap<String, GLint>, Error> {
    let count = program_iv(handle, gl::ACTIVE_UNIFORMS)?;
    let name_capacity = program_iv(handle, gl::ACTIVE_UNIFORM_MAX_LENGTH)?.max(1) as usize;

    let mut uniforms = HashMap::with_capacity(count.max(0) as usize);
    for index in 0..count.max(0) as GLuint {
        let mut name_buf = vec![0 as GLchar; name_capacity + 1];
        let mut written: GLsizei = 0;
        let mut size: GLint = 0;
        let mut data_type: GLenum = 0;
        unsafe {
            gl::GetActiveUniform(
                handle,
                index,
                name_buf.len() as GLsizei,
                &mut written,
                &mut size,
                &mut data_type,
                name_buf.as_mut_ptr(),
            );
        }
        drain_gl_errors()?;

        let location = unsafe { gl::GetUniformLocation(handle, name_buf.as_ptr()) };
        drain_gl_errors()?;
        if location < 0 {
            continue;
        }
        uniforms.insert(name_from_gl(&name_buf, written), location);
    }
    Ok(uniforms)
}

fn name_from_gl(buf: &[GLchar], written: GLsizei) -> String {
    let bytes = buf[..written.max(0) as usize]
        .iter()
        .map(|&c| c as u8)
        .collect::<Vec<_>>();
    String::from_utf8_lossy(&bytes).into_owned()
}

fn shader_info_log(handle: GLuint) -> String {
    let mut capacity = 0;
    unsafe { gl::GetShaderiv(handle, gl::INFO_LOG_LENGTH, &mut capacity) };
    let mut buf = vec![0 as GLchar; capacity.max(1) as usize];
    let mut written: GLsizei = 0;
    unsafe { gl::GetShaderInfoLog(handle, buf.len() as GLsizei, &mut written, buf.as_mut_ptr()) };
    name_from_gl(&buf, written)
}

fn program_info_log(handle: GLuint) -> String {
    let mut capacity = 0;
    unsafe { gl::GetProgramiv(handle, gl::INFO_LOG_LENGTH, &mut capacity) };
    let mut buf = vec![0 as GLchar; capacity.max(1) as usize];
    let mut written: GLsizei = 0;
    unsafe { gl::GetProgramInfoLog(handle, buf.len() as GLsizei, &mut written, buf.as_mut_ptr()) };
    name_from_gl(&buf, written)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> BindingTable {
        BindingTable {
            attributes: [("aPosition".to_owned(), 0), ("texcoord".to_owned(), 1)]
                .into_iter()
                .collect(),
            uniforms: [("color".to_owned(), 2)].into_iter().collect(),
        }
    }

    #[test]
    fn lookup_succeeds_for_exactly_the_active_names() {
        let t = table();
        assert_eq!(t.attribute("aPosition").unwrap(), 0);
        assert_eq!(t.attribute("texcoord").unwrap(), 1);
        assert_eq!(t.uniform("color").unwrap(), 2);
        assert!(t.attribute("normal").is_err());
        assert!(t.uniform("matrix").is_err());
    }

    #[test]
    fn attribute_is_not_visible_through_the_uniform_map() {
        let t = table();
        assert_eq!(t.attribute("aPosition").unwrap(), 0);
        match t.uniform("aPosition") {
            Err(Error::UnknownIdentifier { kind, name }) => {
                assert_eq!(kind, NameKind::Uniform);
                assert_eq!(name, "aPosition");
            }
            other => panic!("expected UnknownIdentifier, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn unknown_attribute_reports_the_attribute_map() {
        match table().attribute("missing") {
            Err(Error::UnknownIdentifier { kind, name }) => {
                assert_eq!(kind, NameKind::Attribute);
                assert_eq!(name, "missing");
            }
            other => panic!("expected UnknownIdentifier, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn empty_uniform_map_is_not_an_error_until_queried() {
        let t = BindingTable {
            attributes: [("position".to_owned(), 0)].into_iter().collect(),
            uniforms: HashMap::new(),
        };
        assert_eq!(t.uniform_names().count(), 0);
        assert_eq!(t.attribute("position").unwrap(), 0);
        assert!(t.uniform("position").is_err());
    }

    #[test]
    fn name_from_gl_truncates_at_the_reported_length() {
        let raw: Vec<GLchar> = b"color\0\0\0".iter().map(|&b| b as GLchar).collect();
        assert_eq!(name_from_gl(&raw, 5), "color");
    }
}
