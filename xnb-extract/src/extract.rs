//! Asset extraction pass (save direction)
//!
//! Moves embedded binary payloads out of a freshly decoded document:
//!
//! 1. A tBIN segment in the innermost `data` field of `content` is transcoded
//!    into a `.tbin` sidecar and replaced, in place, by `tileSheetImageNames`.
//! 2. Every `Texture2D` node loses `data`/`width`/`height`; the pixels become a
//!    PNG sidecar and an [`ImagePlaceholder`] records where they came from.
//!
//! Traversal is depth-first in array order and field insertion order, so the
//! same input always yields the same paths and sidecar names.

use crate::config::ConvertOptions;
use crate::document::{Document, ImagePlaceholder};
use crate::error::{Result, XnbError};
use crate::path::{AssetPath, PathStep};
use crate::sidecar::{ImageCodec, RawImage, Sidecar, SidecarKey};
use crate::tbin::{TranscodedTilemap, is_tilemap, transcode_tilemap};
use crate::value::{Fields, TypeTag, Value};
use crate::{DATA_FIELD, HEIGHT_FIELD, TILESHEET_NAMES_FIELD, WIDTH_FIELD};

/// Pull tilemap and texture payloads out of `doc`, returning the sidecars
/// to persist next to the text document.
pub fn extract_assets(
    doc: &mut Document,
    images: &dyn ImageCodec,
    opts: &ConvertOptions,
) -> Result<Vec<Sidecar>> {
    let mut sidecars = Vec::new();

    if let Some(tilemap) = extract_tilemap(&mut doc.content)? {
        let names = &tilemap.header.tile_sheet_image_names;
        if opts.verbose {
            tracing::info!("Extracted tilemap ({} tile sheets)", names.len());
        }
        tracing::debug!("Tile sheets: {:?}", names);
        sidecars.push(Sidecar {
            key: SidecarKey::Tilemap,
            bytes: tilemap.bytes,
        });
    }

    let mut placeholders = Vec::new();
    capture_textures(&mut doc.content, &mut AssetPath::root(), &mut placeholders)?;

    for placeholder in &mut placeholders {
        let image = RawImage {
            width: placeholder.width,
            height: placeholder.height,
            pixels: placeholder.pixels.take().unwrap_or_default(),
        };
        let bytes = images.encode(&image)?;
        if opts.verbose {
            tracing::info!(
                "Extracted {}x{} texture at '{}'",
                image.width,
                image.height,
                placeholder.path
            );
        }
        sidecars.push(Sidecar {
            key: SidecarKey::Image(placeholder.path.clone()),
            bytes,
        });
    }
    doc.extracted_images.extend(placeholders);

    Ok(sidecars)
}

/// Find the mapping holding `key` at the bottom of the `data` chain.
///
/// Descends from `node` through tagged payloads and through `data` fields
/// that are themselves containers. Texture payloads are never tilemaps.
pub(crate) fn tilemap_owner<'v>(node: &'v mut Value, key: &str) -> Option<&'v mut Fields> {
    match node {
        Value::Tagged {
            tag: TypeTag::Texture2D,
            ..
        } => None,
        Value::Tagged { payload, .. } => tilemap_owner(payload, key),
        Value::Map(fields) => {
            if matches!(
                fields.get(DATA_FIELD),
                Some(Value::Map(_) | Value::Tagged { .. })
            ) {
                return fields
                    .get_mut(DATA_FIELD)
                    .and_then(|child| tilemap_owner(child, key));
            }
            fields.contains_key(key).then_some(fields)
        }
        _ => None,
    }
}

fn extract_tilemap(content: &mut Value) -> Result<Option<TranscodedTilemap>> {
    let Some(fields) = tilemap_owner(content, DATA_FIELD) else {
        return Ok(None);
    };
    let Some(segment) = fields.get(DATA_FIELD).and_then(Value::as_bytes) else {
        return Ok(None);
    };
    if !is_tilemap(segment) {
        return Ok(None);
    }

    let transcoded = transcode_tilemap(segment)?;
    let names = transcoded
        .header
        .tile_sheet_image_names
        .iter()
        .cloned()
        .map(Value::Text)
        .collect();
    fields.replace_entry(DATA_FIELD, TILESHEET_NAMES_FIELD, Value::Array(names));
    Ok(Some(transcoded))
}

fn capture_textures(
    node: &mut Value,
    path: &mut AssetPath,
    out: &mut Vec<ImagePlaceholder>,
) -> Result<()> {
    match node {
        Value::Tagged {
            tag: TypeTag::Texture2D,
            payload,
        } => out.push(take_texture(payload, path)?),
        Value::Tagged { payload, .. } => capture_textures(payload, path, out)?,
        Value::Array(items) => {
            for (i, item) in items.iter_mut().enumerate() {
                path.push(PathStep::Index(i));
                capture_textures(item, path, out)?;
                path.pop();
            }
        }
        Value::Map(fields) => {
            for (name, child) in fields.iter_mut() {
                path.push(PathStep::Field(name.to_string()));
                capture_textures(child, path, out)?;
                path.pop();
            }
        }
        _ => {}
    }
    Ok(())
}

/// Remove `data`/`width`/`height` from a texture payload
fn take_texture(payload: &mut Value, path: &AssetPath) -> Result<ImagePlaceholder> {
    let malformed = |reason: &str| XnbError::MalformedTexture {
        path: path.to_string(),
        reason: reason.to_string(),
    };

    if !path.is_addressable() {
        return Err(malformed("path cannot be written in dotted form"));
    }
    let fields = payload
        .untagged_mut()
        .as_map_mut()
        .ok_or_else(|| malformed("payload is not a field mapping"))?;

    let width = dimension(fields, WIDTH_FIELD).ok_or_else(|| malformed("bad 'width'"))?;
    let height = dimension(fields, HEIGHT_FIELD).ok_or_else(|| malformed("bad 'height'"))?;
    if fields.get(DATA_FIELD).and_then(Value::as_bytes).is_none() {
        return Err(malformed("'data' is not a byte blob"));
    }

    let field_indices = match (
        fields.index_of(WIDTH_FIELD),
        fields.index_of(HEIGHT_FIELD),
        fields.index_of(DATA_FIELD),
    ) {
        (Some(w), Some(h), Some(d)) => Some([w, h, d]),
        _ => None,
    };

    fields.remove(WIDTH_FIELD);
    fields.remove(HEIGHT_FIELD);
    let pixels = match fields.remove(DATA_FIELD) {
        Some(Value::Bytes(pixels)) => pixels,
        _ => Vec::new(),
    };
    tracing::debug!("Captured texture at '{}' ({} bytes)", path, pixels.len());

    Ok(ImagePlaceholder {
        path: path.clone(),
        width,
        height,
        field_indices,
        pixels: Some(pixels),
    })
}

fn dimension(fields: &Fields, key: &str) -> Option<u32> {
    fields
        .get(key)
        .and_then(Value::as_i64)
        .and_then(|n| u32::try_from(n).ok())
}
