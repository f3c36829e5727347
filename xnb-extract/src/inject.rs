//! Asset reinjection pass (load direction)
//!
//! Inverse of [`crate::extract`]: each recorded image placeholder is filled
//! from its PNG sidecar at the node its path resolves to, and a
//! `tileSheetImageNames` field is swapped back for the tBIN segment read from
//! the `.tbin` sidecar.

use crate::config::ConvertOptions;
use crate::document::{Document, ImagePlaceholder};
use crate::error::{Result, XnbError};
use crate::extract::tilemap_owner;
use crate::sidecar::{ImageCodec, SidecarKey, SidecarSource};
use crate::tbin::{is_tilemap, restore_tilemap};
use crate::value::Value;
use crate::{DATA_FIELD, HEIGHT_FIELD, TILESHEET_NAMES_FIELD, WIDTH_FIELD};

/// Restore every payload [`crate::extract_assets`] moved out of `doc`.
///
/// Consumes `doc.extracted_images`. A document without placeholders or
/// tile sheet names is left unchanged.
pub fn reinject_assets(
    doc: &mut Document,
    sidecars: &dyn SidecarSource,
    images: &dyn ImageCodec,
    opts: &ConvertOptions,
) -> Result<()> {
    for mut placeholder in std::mem::take(&mut doc.extracted_images) {
        let bytes = sidecars.read(&SidecarKey::Image(placeholder.path.clone()))?;
        let image = images.decode(&bytes)?;
        if (image.width, image.height) != (placeholder.width, placeholder.height) {
            tracing::warn!(
                "Texture at '{}' was {}x{}, sidecar is {}x{}",
                placeholder.path,
                placeholder.width,
                placeholder.height,
                image.width,
                image.height
            );
        }
        placeholder.width = image.width;
        placeholder.height = image.height;
        placeholder.pixels = Some(image.pixels);

        if opts.verbose {
            tracing::info!(
                "Reinjected {}x{} texture at '{}'",
                placeholder.width,
                placeholder.height,
                placeholder.path
            );
        }
        restore_texture(&mut doc.content, placeholder)?;
    }

    reinject_tilemap(&mut doc.content, sidecars, opts)
}

fn restore_texture(content: &mut Value, placeholder: ImagePlaceholder) -> Result<()> {
    let unresolved = || XnbError::PathResolution {
        path: placeholder.path.to_string(),
    };
    let fields = placeholder
        .path
        .resolve_mut(content)
        .and_then(|node| node.untagged_mut().as_map_mut())
        .ok_or_else(unresolved)?;

    let entries = [
        (WIDTH_FIELD, Value::Int(placeholder.width.into())),
        (HEIGHT_FIELD, Value::Int(placeholder.height.into())),
        (DATA_FIELD, Value::Bytes(placeholder.pixels.unwrap_or_default())),
    ];
    match placeholder.field_indices {
        Some(indices) => {
            // Ascending order so each index is counted against the fields
            // that preceded it originally
            let mut slots: Vec<_> = indices.into_iter().zip(entries).collect();
            slots.sort_by_key(|(index, _)| *index);
            for (index, (key, value)) in slots {
                fields.insert_at(index, key, value);
            }
        }
        None => {
            for (key, value) in entries {
                fields.insert(key, value);
            }
        }
    }
    Ok(())
}

fn reinject_tilemap(
    content: &mut Value,
    sidecars: &dyn SidecarSource,
    opts: &ConvertOptions,
) -> Result<()> {
    let Some(fields) = tilemap_owner(content, TILESHEET_NAMES_FIELD) else {
        return Ok(());
    };

    let bytes = sidecars.read(&SidecarKey::Tilemap)?;
    if !is_tilemap(&bytes) {
        tracing::warn!("Tilemap sidecar does not start with the tBIN magic");
    }
    let restored = restore_tilemap(&bytes)?;

    let recorded = fields
        .get(TILESHEET_NAMES_FIELD)
        .and_then(Value::as_array)
        .map_or(0, <[Value]>::len);
    let found = restored.header.tile_sheet_image_names.len();
    if recorded != found {
        tracing::warn!(
            "Document lists {} tile sheets, tilemap sidecar has {}",
            recorded,
            found
        );
    }
    if opts.verbose {
        tracing::info!("Reinjected tilemap ({} tile sheets)", found);
    }

    fields.replace_entry(
        TILESHEET_NAMES_FIELD,
        DATA_FIELD,
        Value::Bytes(restored.bytes),
    );
    Ok(())
}
