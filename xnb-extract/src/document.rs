//! Root record of a converted file

use serde::{Deserialize, Serialize};
use serde_json::Map;

use crate::error::{Result, XnbError};
use crate::path::AssetPath;
use crate::value::Value;
use crate::value::text::{from_json, to_json, write_json};

const CONTENT_KEY: &str = "content";
const EXTRACTED_IMAGES_KEY: &str = "extractedImages";

/// A texture whose pixels live in a sidecar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagePlaceholder {
    /// Where the `Texture2D` node sits in `content`
    pub path: AssetPath,
    pub width: u32,
    pub height: u32,
    /// Original positions of `width`, `height` and `data` in the payload
    #[serde(
        rename = "fieldIndices",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub field_indices: Option<[usize; 3]>,
    /// RGBA pixels while in flight between the tree and the sidecar
    #[serde(skip)]
    pub pixels: Option<Vec<u8>>,
}

impl ImagePlaceholder {
    pub fn new(path: AssetPath, width: u32, height: u32) -> Self {
        Self {
            path,
            width,
            height,
            field_indices: None,
            pixels: None,
        }
    }
}

/// Decoded content plus the bookkeeping for payloads moved out of it
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub content: Value,
    /// Empty unless textures have been extracted
    pub extracted_images: Vec<ImagePlaceholder>,
}

impl Document {
    pub fn new(content: Value) -> Self {
        Self {
            content,
            extracted_images: Vec::new(),
        }
    }

    /// Serialize as indented text. `extractedImages` is omitted when empty.
    pub fn to_text(&self, indent: usize) -> Result<String> {
        let mut root = Map::new();
        root.insert(CONTENT_KEY.to_string(), to_json(&self.content));
        if !self.extracted_images.is_empty() {
            root.insert(
                EXTRACTED_IMAGES_KEY.to_string(),
                serde_json::to_value(&self.extracted_images)?,
            );
        }
        write_json(&root, indent)
    }

    pub fn from_text(text: &str) -> Result<Self> {
        let serde_json::Value::Object(mut root) = serde_json::from_str(text)? else {
            return Err(XnbError::InvalidText("document root is not an object".into()));
        };

        let content = root
            .remove(CONTENT_KEY)
            .ok_or_else(|| XnbError::InvalidText(format!("missing '{CONTENT_KEY}'")))?;
        let extracted_images = match root.remove(EXTRACTED_IMAGES_KEY) {
            Some(images) => serde_json::from_value(images)?,
            None => Vec::new(),
        };

        if let Some(key) = root.keys().next() {
            tracing::warn!("Ignoring unknown document field '{}'", key);
        }

        Ok(Self {
            content: from_json(content)?,
            extracted_images,
        })
    }
}
