use crate::binding::{BindTo, GpuState, Scoped, TextureTarget};
use crate::error::{drain_gl_errors, Error};
use crate::image::ImageData;
use gl::types::{GLenum, GLint, GLsizei, GLuint};
use std::ffi::c_void;

/// Wrap behavior outside [0, 1] texture coordinates, fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapMode {
    ClampToEdge,
    Repeat,
}

impl WrapMode {
    fn gl_param(self) -> GLint {
        match self {
            WrapMode::ClampToEdge => gl::CLAMP_TO_EDGE as GLint,
            WrapMode::Repeat => gl::REPEAT as GLint,
        }
    }
}

/// One 2D texture object.
pub struct Texture {
    handle: GLuint,
}

impl Texture {
    pub fn new() -> Result<Self, Error> {
        let mut handle = 0;
        unsafe { gl::GenTextures(1, &mut handle) };
        drain_gl_errors()?;
        Ok(Self { handle })
    }

    /// Builds a filtered, mip-mapped texture from decoded pixels. The image
    /// is validated before any handle is allocated, so a decoder that handed
    /// over no data fails without leaving a texture behind.
    pub fn from_image(gpu: &mut GpuState, image: &ImageData, wrap: WrapMode) -> Result<Self, Error> {
        pixel_format(image)?;

        let texture = Texture::new()?;
        {
            let bound = gpu.texture_2d.bind(&texture)?;
            bound.set_wrap(wrap)?;
            bound.set_linear_filtering()?;
            bound.write_pixels(image)?;
            bound.generate_mipmap()?;
        }
        log::debug!(
            "uploaded {}x{} texture ({} channels) from {}",
            image.width(),
            image.height(),
            image.channels(),
            image.path().display(),
        );
        Ok(texture)
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        unsafe { gl::DeleteTextures(1, &self.handle) }
    }
}

impl BindTo for Texture {
    type Point = TextureTarget;

    fn raw_handle(&self) -> GLuint {
        self.handle
    }
}

impl Scoped<'_, '_, Texture> {
    pub fn set_wrap(&self, wrap: WrapMode) -> Result<(), Error> {
        unsafe {
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_S, wrap.gl_param());
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_T, wrap.gl_param());
        }
        drain_gl_errors()
    }

    pub fn set_linear_filtering(&self) -> Result<(), Error> {
        unsafe {
            gl::TexParameteri(
                gl::TEXTURE_2D,
                gl::TEXTURE_MIN_FILTER,
                gl::LINEAR_MIPMAP_LINEAR as GLint,
            );
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MAG_FILTER, gl::LINEAR as GLint);
        }
        drain_gl_errors()
    }

    /// Uploads level 0. Rows are tightly packed regardless of channel count.
    pub fn write_pixels(&self, image: &ImageData) -> Result<(), Error> {
        let format = pixel_format(image)?;
        unsafe {
            gl::PixelStorei(gl::UNPACK_ALIGNMENT, 1);
            gl::TexImage2D(
                gl::TEXTURE_2D,
                0,
                format as GLint,
                image.width() as GLsizei,
                image.height() as GLsizei,
                0,
                format,
                gl::UNSIGNED_BYTE,
                image.pixels().as_ptr() as *const c_void,
            );
        }
        drain_gl_errors()
    }

    pub fn generate_mipmap(&self) -> Result<(), Error> {
        unsafe { gl::GenerateMipmap(gl::TEXTURE_2D) };
        drain_gl_errors()
    }
}

/// Maps the channel count to a GL format, rejecting images whose buffer does
/// not match their declared shape. An empty buffer means the decoder failed
/// upstream.
fn pixel_format(image: &ImageData) -> Result<GLenum, Error> {
    let fail = || Error::ImageDecode {
        path: image.path().to_owned(),
    };

    if image.pixels().is_empty() {
        return Err(fail());
    }
    let format = match image.channels() {
        1 => gl::RED,
        3 => gl::RGB,
        4 => gl::RGBA,
        _ => return Err(fail()),
    };
    let expected = image.width() as usize * image.height() as usize * image.channels() as usize;
    if image.pixels().len() != expected {
        return Err(fail());
    }
    Ok(format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    // from_image validates before touching GL, so the failure paths are
    // exercisable without a context.

    #[test]
    fn empty_buffer_fails_without_allocating() {
        let mut gpu = GpuState::new();
        let image = ImageData::from_parts("missing.png", Vec::new(), 0, 0, 3);
        match Texture::from_image(&mut gpu, &image, WrapMode::Repeat) {
            Err(Error::ImageDecode { path }) => assert_eq!(path, Path::new("missing.png")),
            _ => panic!("expected ImageDecode"),
        }
    }

    #[test]
    fn truncated_buffer_is_a_decode_failure() {
        let image = ImageData::from_parts("short.png", vec![0u8; 10], 4, 4, 3);
        assert!(pixel_format(&image).is_err());
    }

    #[test]
    fn unsupported_channel_count_is_a_decode_failure() {
        let image = ImageData::from_parts("ga.png", vec![0u8; 32], 4, 4, 2);
        assert!(pixel_format(&image).is_err());
    }

    #[test]
    fn channel_counts_map_to_formats() {
        let grey = ImageData::from_parts("g.png", vec![0u8; 16], 4, 4, 1);
        let rgb = ImageData::from_parts("c.png", vec![0u8; 48], 4, 4, 3);
        let rgba = ImageData::from_parts("a.png", vec![0u8; 64], 4, 4, 4);
        assert_eq!(pixel_format(&grey).unwrap(), gl::RED);
        assert_eq!(pixel_format(&rgb).unwrap(), gl::RGB);
        assert_eq!(pixel_format(&rgba).unwrap(), gl::RGBA);
    }
}
