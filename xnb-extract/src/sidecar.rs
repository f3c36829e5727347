//! Sidecar files: naming, the image codec seam, and file I/O
//!
//! Sidecars sit next to the primary text document and share its base name:
//!
//! - image: `<dir>/<base>.<asset path>.png` (`<dir>/<base>.png` for a root texture)
//! - tilemap: `<dir>/<base>.tbin`

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, ImageFormat};

use crate::error::{Result, XnbError};
use crate::path::AssetPath;
use crate::{PNG_EXT, TBIN_EXT};

/// Identifies one sidecar of a document
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SidecarKey {
    /// Pixels of the texture at this path
    Image(AssetPath),
    /// The transcoded tilemap segment
    Tilemap,
}

impl SidecarKey {
    /// Location of this sidecar for the given primary output file
    pub fn file_path(&self, primary: &Path) -> PathBuf {
        let dir = primary.parent().unwrap_or_else(|| Path::new(""));
        let mut name = OsString::from(primary.file_stem().unwrap_or_default());
        match self {
            SidecarKey::Image(path) if path.is_root() => {}
            SidecarKey::Image(path) => {
                name.push(".");
                name.push(path.to_string());
            }
            SidecarKey::Tilemap => {}
        }
        name.push(".");
        name.push(match self {
            SidecarKey::Image(_) => PNG_EXT,
            SidecarKey::Tilemap => TBIN_EXT,
        });
        dir.join(name)
    }
}

/// A sidecar ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sidecar {
    pub key: SidecarKey,
    pub bytes: Vec<u8>,
}

/// Uncompressed RGBA8 raster
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl RawImage {
    /// Check that the buffer holds exactly width × height RGBA pixels
    pub fn validate(&self) -> Result<()> {
        let expected = self.width as usize * self.height as usize * 4;
        if self.pixels.len() != expected {
            return Err(XnbError::PixelBufferSize {
                width: self.width,
                height: self.height,
                len: self.pixels.len(),
                expected,
            });
        }
        Ok(())
    }
}

/// Encodes raster sidecars
pub trait ImageCodec {
    fn encode(&self, image: &RawImage) -> Result<Vec<u8>>;
    fn decode(&self, bytes: &[u8]) -> Result<RawImage>;
}

/// PNG image sidecars via the `image` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct PngCodec;

impl ImageCodec for PngCodec {
    fn encode(&self, image: &RawImage) -> Result<Vec<u8>> {
        image.validate()?;
        let mut out = Vec::new();
        PngEncoder::new(&mut out).write_image(
            &image.pixels,
            image.width,
            image.height,
            ExtendedColorType::Rgba8,
        )?;
        Ok(out)
    }

    fn decode(&self, bytes: &[u8]) -> Result<RawImage> {
        let rgba = image::load_from_memory_with_format(bytes, ImageFormat::Png)?.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(RawImage {
            width,
            height,
            pixels: rgba.into_raw(),
        })
    }
}

/// Where the reinjection pass reads sidecars from
pub trait SidecarSource {
    fn read(&self, key: &SidecarKey) -> Result<Vec<u8>>;
}

/// Sidecars stored next to a primary text file
#[derive(Debug, Clone)]
pub struct SidecarDir {
    primary: PathBuf,
}

impl SidecarDir {
    pub fn new(primary: impl Into<PathBuf>) -> Self {
        Self {
            primary: primary.into(),
        }
    }

    /// Write every sidecar, returning the paths written
    pub fn write_all(&self, sidecars: &[Sidecar]) -> Result<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(sidecars.len());
        for sidecar in sidecars {
            let path = sidecar.key.file_path(&self.primary);
            if let Err(e) = std::fs::write(&path, &sidecar.bytes) {
                remove_written(&written);
                return Err(XnbError::io(&path, e));
            }
            tracing::debug!("Wrote sidecar {:?} ({} bytes)", path, sidecar.bytes.len());
            written.push(path);
        }
        Ok(written)
    }
}

/// Best-effort removal of files from a conversion that failed part way
pub(crate) fn remove_written(paths: &[PathBuf]) {
    for path in paths {
        if let Err(e) = std::fs::remove_file(path) {
            tracing::warn!("Could not remove {:?}: {}", path, e);
        }
    }
}

impl SidecarSource for SidecarDir {
    fn read(&self, key: &SidecarKey) -> Result<Vec<u8>> {
        let path = key.file_path(&self.primary);
        std::fs::read(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => XnbError::MissingSidecar { path },
            _ => XnbError::io(&path, e),
        })
    }
}
