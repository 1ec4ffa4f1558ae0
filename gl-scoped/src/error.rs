use gl::types::GLenum;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use thiserror::Error;

/// Which shader stage a diagnostic came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Vertex,
    Fragment,
}

impl Display for Stage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Vertex => f.write_str("vertex"),
            Stage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Which reflected map a failed lookup went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    Attribute,
    Uniform,
}

impl Display for NameKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            NameKind::Attribute => f.write_str("attribute"),
            NameKind::Uniform => f.write_str("uniform"),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("{stage} shader failed to compile: {diagnostic}")]
    ShaderCompile { stage: Stage, diagnostic: String },

    #[error("shader program failed to link: {diagnostic}")]
    ShaderLink { diagnostic: String },

    #[error("failed to read {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no active {kind} named {name:?}")]
    UnknownIdentifier { kind: NameKind, name: String },

    #[error("failed to decode image {}", path.display())]
    ImageDecode { path: PathBuf },

    #[error("OpenGL error 0x{code:04x}")]
    Gl { code: GLenum },
}

/// Empties the GL error queue, reporting the most recent code if any were
/// pending. Call after every GL entry point; the queue accumulates otherwise.
pub fn drain_gl_errors() -> Result<(), Error> {
    let mut last_code = None;
    loop {
        let code = unsafe { gl::GetError() };
        if code == gl::NO_ERROR {
            break;
        }
        last_code = Some(code);
    }

    match last_code {
        Some(code) => Err(Error::Gl { code }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_error_names_the_stage() {
        let e = Error::ShaderCompile {
            stage: Stage::Fragment,
            diagnostic: "0:3: 'foo' : undeclared identifier".into(),
        };
        let text = e.to_string();
        assert!(text.contains("fragment"));
        assert!(text.contains("undeclared identifier"));
    }

    #[test]
    fn unknown_identifier_names_the_map_and_the_name() {
        let e = Error::UnknownIdentifier {
            kind: NameKind::Uniform,
            name: "aPosition".into(),
        };
        let text = e.to_string();
        assert!(text.contains("uniform"));
        assert!(text.contains("aPosition"));
    }

    #[test]
    fn file_read_keeps_the_path() {
        let e = Error::FileRead {
            path: "shaders/quad.vert".into(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(e.to_string().contains("shaders/quad.vert"));
    }
}
