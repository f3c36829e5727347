//! Per-file conversion jobs
//!
//! `unpack_file` turns one container into a text document plus sidecars;
//! `pack_file` goes the other way. Every step runs in memory before anything
//! is written, so a failing file leaves no partial output behind.

use std::path::{Path, PathBuf};

use crate::codec::ContainerCodec;
use crate::config::ConvertOptions;
use crate::document::Document;
use crate::error::{Result, XnbError};
use crate::extract::extract_assets;
use crate::inject::reinject_assets;
use crate::sidecar::{ImageCodec, SidecarDir, remove_written};

/// Files written by one conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Written {
    pub primary: PathBuf,
    pub sidecars: Vec<PathBuf>,
}

/// Container at `input` → text document at `output` plus sidecars beside it
pub fn unpack_file(
    input: &Path,
    output: &Path,
    codec: &dyn ContainerCodec,
    images: &dyn ImageCodec,
    opts: &ConvertOptions,
) -> Result<Written> {
    let bytes = std::fs::read(input).map_err(|e| XnbError::io(input, e))?;
    let mut doc = Document::new(codec.decode(&bytes)?);
    let extracted = extract_assets(&mut doc, images, opts)?;
    let text = doc.to_text(opts.indent)?;

    create_parent(output)?;
    let sidecars = SidecarDir::new(output).write_all(&extracted)?;
    if let Err(e) = std::fs::write(output, text) {
        remove_written(&sidecars);
        return Err(XnbError::io(output, e));
    }

    if opts.verbose {
        tracing::info!(
            "Unpacked {:?} -> {:?} ({} sidecars)",
            input,
            output,
            sidecars.len()
        );
    }

    Ok(Written {
        primary: output.to_path_buf(),
        sidecars,
    })
}

/// Text document at `input` (sidecars beside it) → container at `output`
pub fn pack_file(
    input: &Path,
    output: &Path,
    codec: &dyn ContainerCodec,
    images: &dyn ImageCodec,
    opts: &ConvertOptions,
) -> Result<Written> {
    let text = std::fs::read_to_string(input).map_err(|e| XnbError::io(input, e))?;
    let mut doc = Document::from_text(&text)?;
    reinject_assets(&mut doc, &SidecarDir::new(input), images, opts)?;
    let bytes = codec.encode(&doc.content)?;

    create_parent(output)?;
    std::fs::write(output, &bytes).map_err(|e| XnbError::io(output, e))?;

    if opts.verbose {
        tracing::info!("Packed {:?} -> {:?} ({} bytes)", input, output, bytes.len());
    }

    Ok(Written {
        primary: output.to_path_buf(),
        sidecars: Vec::new(),
    })
}

fn create_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            std::fs::create_dir_all(dir).map_err(|e| XnbError::io(dir, e))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::JsonContainer;
    use crate::sidecar::PngCodec;
    use crate::value::{Fields, Value};
    use tempfile::tempdir;

    fn texture_container() -> Value {
        Value::tagged(
            "Texture2D",
            Value::Map(Fields::from_iter([
                ("format", Value::Int(0)),
                ("width", Value::Int(1)),
                ("height", Value::Int(1)),
                ("data", Value::Bytes(vec![10, 20, 30, 255])),
            ])),
        )
    }

    #[test]
    fn test_unpack_writes_text_and_sidecar() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("Pixel.xnbj");
        std::fs::write(&input, JsonContainer.encode(&texture_container()).unwrap()).unwrap();

        let output = dir.path().join("out/Pixel.json");
        let written = unpack_file(
            &input,
            &output,
            &JsonContainer,
            &PngCodec,
            &ConvertOptions::default(),
        )
        .unwrap();

        assert_eq!(written.primary, output);
        assert_eq!(written.sidecars, vec![dir.path().join("out/Pixel.png")]);
        let text = std::fs::read_to_string(&output).unwrap();
        assert!(text.contains("\"extractedImages\""));
        assert!(!text.contains("$bytes"));
    }

    #[test]
    fn test_failed_unpack_writes_nothing() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("Bad.xnbj");
        let broken = Value::tagged(
            "Texture2D",
            Value::Map(Fields::from_iter([
                ("width", Value::Int(2)),
                ("height", Value::Int(2)),
                ("data", Value::Bytes(vec![0; 3])),
            ])),
        );
        std::fs::write(&input, JsonContainer.encode(&broken).unwrap()).unwrap();

        let output = dir.path().join("out/Bad.json");
        let result = unpack_file(
            &input,
            &output,
            &JsonContainer,
            &PngCodec,
            &ConvertOptions::default(),
        );
        assert!(matches!(result, Err(XnbError::PixelBufferSize { .. })));
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn test_failed_text_write_removes_sidecars() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("Pixel.xnbj");
        std::fs::write(&input, JsonContainer.encode(&texture_container()).unwrap()).unwrap();

        // A directory in the way of the text document
        let output = dir.path().join("out/Pixel.json");
        std::fs::create_dir_all(&output).unwrap();

        let result = unpack_file(
            &input,
            &output,
            &JsonContainer,
            &PngCodec,
            &ConvertOptions::default(),
        );
        assert!(matches!(result, Err(XnbError::Io { .. })));
        assert!(!dir.path().join("out/Pixel.png").exists());
        assert!(output.is_dir());
    }

    #[test]
    fn test_pack_without_sidecar_fails() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("Pixel.json");
        std::fs::write(
            &input,
            r#"{"content":{"type":"Texture2D","data":{"format":0}},"extractedImages":[{"path":"","width":1,"height":1}]}"#,
        )
        .unwrap();

        let output = dir.path().join("Pixel.xnbj");
        let result = pack_file(
            &input,
            &output,
            &JsonContainer,
            &PngCodec,
            &ConvertOptions::default(),
        );
        assert!(matches!(result, Err(XnbError::MissingSidecar { .. })));
        assert!(!output.exists());
    }

    #[test]
    fn test_missing_input() {
        let dir = tempdir().unwrap();
        let result = unpack_file(
            &dir.path().join("nope.xnbj"),
            &dir.path().join("nope.json"),
            &JsonContainer,
            &PngCodec,
            &ConvertOptions::default(),
        );
        assert!(matches!(result, Err(XnbError::Io { .. })));
    }
}
