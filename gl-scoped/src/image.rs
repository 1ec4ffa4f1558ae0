use std::path::{Path, PathBuf};

#[cfg(feature = "png")]
use crate::error::Error;

/// Decoded pixels as handed over by the image decoder: a tightly packed
/// buffer plus dimensions and channel count, with the source path kept for
/// diagnostics. Uploading consumes nothing; the texture layer does not
/// retain the buffer.
pub struct ImageData {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
    path: PathBuf,
}

impl ImageData {
    pub fn from_parts(
        path: impl Into<PathBuf>,
        pixels: Vec<u8>,
        width: u32,
        height: u32,
        channels: u8,
    ) -> Self {
        Self {
            pixels,
            width,
            height,
            channels,
            path: path.into(),
        }
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Decodes a PNG file into an [`ImageData`]. Grayscale, RGB and RGBA images
/// are supported; anything else is reported as a decode failure.
#[cfg(feature = "png")]
pub fn decode_png(path: &Path) -> Result<ImageData, Error> {
    let raw = std::fs::read(path).map_err(|source| Error::FileRead {
        path: path.to_owned(),
        source,
    })?;

    let decoder = png::Decoder::new(raw.as_slice());
    let mut reader = decoder.read_info().map_err(|e| decode_failure(path, &e))?;
    let mut buf = vec![0u8; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf).map_err(|e| decode_failure(path, &e))?;
    buf.truncate(info.buffer_size());

    let channels = match info.color_type {
        png::ColorType::Grayscale => 1,
        png::ColorType::Rgb => 3,
        png::ColorType::Rgba => 4,
        other => {
            log::warn!("{}: unsupported color type {:?}", path.display(), other);
            return Err(Error::ImageDecode {
                path: path.to_owned(),
            });
        }
    };
    Ok(ImageData::from_parts(
        path, buf, info.width, info.height, channels,
    ))
}

#[cfg(feature = "png")]
fn decode_failure(path: &Path, cause: &png::DecodingError) -> Error {
    log::warn!("{}: {}", path.display(), cause);
    Error::ImageDecode {
        path: path.to_owned(),
    }
}
