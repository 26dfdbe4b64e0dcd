//! Input asset staging
//!
//! Uploaded reference images are decoded once into a `DataUrl` and kept per
//! logical slot. Slots are independent of the active mode, so switching tabs
//! never discards an upload.

use lookbook_core::{DataUrl, LookbookError, Mode, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// A named upload position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SlotId {
    ProductSpotlight,
    ProductLifestyle,
    ModelLifestyle,
    OtherProductLifestyle,
    ShotLabReference,
    Background,
}

impl SlotId {
    pub const ALL: [SlotId; 6] = [
        SlotId::ProductSpotlight,
        SlotId::ProductLifestyle,
        SlotId::ModelLifestyle,
        SlotId::OtherProductLifestyle,
        SlotId::ShotLabReference,
        SlotId::Background,
    ];

    /// Stable key of the slot (matches the upload field it came from)
    pub fn key(&self) -> &'static str {
        match self {
            SlotId::ProductSpotlight => "productImage_spotlight",
            SlotId::ProductLifestyle => "productImage_lifestyle",
            SlotId::ModelLifestyle => "modelImage_lifestyle",
            SlotId::OtherProductLifestyle => "otherProductImage_lifestyle",
            SlotId::ShotLabReference => "image_shot_lab",
            SlotId::Background => "backgroundImage",
        }
    }

    /// Human-readable name used in user-facing messages
    pub fn label(&self) -> &'static str {
        match self {
            SlotId::ProductSpotlight | SlotId::ProductLifestyle => "product photo",
            SlotId::ModelLifestyle => "model/talent photo",
            SlotId::OtherProductLifestyle => "additional product photo",
            SlotId::ShotLabReference => "Shot Lab reference image",
            SlotId::Background => "background image",
        }
    }

    /// Resolve a short slot alias (`product`, `model`, ...) against a mode.
    ///
    /// Full slot keys are accepted regardless of mode.
    pub fn resolve(name: &str, mode: Mode) -> Result<SlotId> {
        if let Ok(slot) = name.parse::<SlotId>() {
            return Ok(slot);
        }
        match (name.trim().to_lowercase().as_str(), mode) {
            ("product", Mode::Spotlight) => Ok(SlotId::ProductSpotlight),
            ("product", Mode::Lifestyle) => Ok(SlotId::ProductLifestyle),
            ("product" | "reference", Mode::ShotLab) => Ok(SlotId::ShotLabReference),
            ("model", _) => Ok(SlotId::ModelLifestyle),
            ("other-product" | "other_product", _) => Ok(SlotId::OtherProductLifestyle),
            ("reference", _) => Ok(SlotId::ShotLabReference),
            ("background", _) => Ok(SlotId::Background),
            (other, _) => Err(LookbookError::ParseError(format!(
                "Unknown slot '{}'. Use: product, model, other-product, reference, background",
                other
            ))),
        }
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for SlotId {
    type Err = LookbookError;

    fn from_str(s: &str) -> Result<Self> {
        SlotId::ALL
            .into_iter()
            .find(|slot| slot.key() == s)
            .ok_or_else(|| LookbookError::ParseError(format!("Unknown slot key '{}'", s)))
    }
}

/// A staged upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub slot: SlotId,
    pub media_type: String,
    pub raw_bytes: Vec<u8>,
    pub encoded: DataUrl,
}

impl Asset {
    pub fn new(slot: SlotId, media_type: &str, raw_bytes: Vec<u8>) -> Self {
        let encoded = DataUrl::encode(media_type, &raw_bytes);
        Self {
            slot,
            media_type: media_type.to_string(),
            raw_bytes,
            encoded,
        }
    }
}

/// Holds at most one asset per slot
#[derive(Debug, Default)]
pub struct AssetStore {
    slots: BTreeMap<SlotId, Asset>,
}

impl AssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read an image file into a slot, replacing any previous upload.
    ///
    /// On failure the error is logged and the slot keeps its previous value.
    pub fn set_asset(&mut self, slot: SlotId, path: &Path) -> Result<()> {
        let staged = std::fs::read(path)
            .map_err(|e| {
                LookbookError::AssetError(format!("Failed to read {}: {}", path.display(), e))
            })
            .and_then(|bytes| {
                let media_type = sniff_media_type(&bytes, path)?;
                Ok(Asset::new(slot, media_type, bytes))
            });

        match staged {
            Ok(asset) => {
                tracing::info!(slot = %slot, media_type = %asset.media_type, bytes = asset.raw_bytes.len(), "asset staged");
                self.slots.insert(slot, asset);
                Ok(())
            }
            Err(e) => {
                tracing::error!(slot = %slot, path = %path.display(), error = %e, "failed to stage asset");
                Err(e)
            }
        }
    }

    /// Stage in-memory image bytes with a known media type
    pub fn set_asset_bytes(&mut self, slot: SlotId, bytes: Vec<u8>, media_type: &str) -> Result<()> {
        if bytes.is_empty() || !media_type.starts_with("image/") {
            let err = LookbookError::AssetError(format!(
                "Cannot stage {} bytes of '{}' as an image",
                bytes.len(),
                media_type
            ));
            tracing::error!(slot = %slot, error = %err, "failed to stage asset");
            return Err(err);
        }
        self.slots.insert(slot, Asset::new(slot, media_type, bytes));
        Ok(())
    }

    pub fn get(&self, slot: SlotId) -> Option<&Asset> {
        self.slots.get(&slot)
    }

    pub fn contains(&self, slot: SlotId) -> bool {
        self.slots.contains_key(&slot)
    }

    /// Drop the upload in a slot (the file input was cleared)
    pub fn remove(&mut self, slot: SlotId) -> Option<Asset> {
        self.slots.remove(&slot)
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Occupied slots in declaration order
    pub fn slots(&self) -> impl Iterator<Item = SlotId> + '_ {
        self.slots.keys().copied()
    }
}

/// Determine the media type from magic bytes, falling back to the extension
fn sniff_media_type(bytes: &[u8], path: &Path) -> Result<&'static str> {
    if bytes.is_empty() {
        return Err(LookbookError::AssetError(format!(
            "{} is empty",
            path.display()
        )));
    }
    image::guess_format(bytes)
        .or_else(|_| image::ImageFormat::from_path(path))
        .map(|format| format.to_mime_type())
        .map_err(|_| {
            LookbookError::AssetError(format!("{} is not a supported image", path.display()))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

    fn temp_file(name: &str, content: &[u8]) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("lookbook_asset_test_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_set_asset_from_file_sniffs_media_type() {
        let path = temp_file("upload.bin", PNG_MAGIC);
        let mut store = AssetStore::new();
        store.set_asset(SlotId::ProductSpotlight, &path).unwrap();

        let asset = store.get(SlotId::ProductSpotlight).unwrap();
        assert_eq!(asset.media_type, "image/png");
        assert_eq!(asset.raw_bytes, PNG_MAGIC);
        assert!(asset.encoded.to_string().starts_with("data:image/png;base64,"));

        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn test_set_asset_falls_back_to_extension() {
        let path = temp_file("photo.jpg", b"not really a jpeg");
        let mut store = AssetStore::new();
        store.set_asset(SlotId::Background, &path).unwrap();
        assert_eq!(store.get(SlotId::Background).unwrap().media_type, "image/jpeg");

        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn test_failed_decode_keeps_previous_value() {
        let mut store = AssetStore::new();
        store
            .set_asset_bytes(SlotId::ModelLifestyle, vec![1, 2, 3], "image/png")
            .unwrap();

        let bad = temp_file("notes.txt", b"plain text");
        assert!(store.set_asset(SlotId::ModelLifestyle, &bad).is_err());
        assert!(store
            .set_asset(SlotId::ModelLifestyle, Path::new("/nonexistent/lookbook.png"))
            .is_err());

        assert_eq!(store.get(SlotId::ModelLifestyle).unwrap().raw_bytes, vec![1, 2, 3]);

        std::fs::remove_dir_all(bad.parent().unwrap()).ok();
    }

    #[test]
    fn test_slots_are_independent() {
        let mut store = AssetStore::new();
        store
            .set_asset_bytes(SlotId::ProductLifestyle, vec![1], "image/png")
            .unwrap();
        store
            .set_asset_bytes(SlotId::ModelLifestyle, vec![2], "image/jpeg")
            .unwrap();
        store
            .set_asset_bytes(SlotId::ProductLifestyle, vec![3], "image/webp")
            .unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.get(SlotId::ProductLifestyle).unwrap().raw_bytes, vec![3]);
        assert_eq!(store.get(SlotId::ModelLifestyle).unwrap().raw_bytes, vec![2]);

        store.remove(SlotId::ProductLifestyle);
        assert!(store.get(SlotId::ProductLifestyle).is_none());
        assert!(store.contains(SlotId::ModelLifestyle));
    }

    #[test]
    fn test_set_asset_bytes_rejects_non_images() {
        let mut store = AssetStore::new();
        assert!(store.set_asset_bytes(SlotId::Background, vec![], "image/png").is_err());
        assert!(store
            .set_asset_bytes(SlotId::Background, vec![1], "text/plain")
            .is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn test_resolve_slot_aliases() {
        assert_eq!(
            SlotId::resolve("product", Mode::Spotlight).unwrap(),
            SlotId::ProductSpotlight
        );
        assert_eq!(
            SlotId::resolve("product", Mode::Lifestyle).unwrap(),
            SlotId::ProductLifestyle
        );
        assert_eq!(
            SlotId::resolve("product", Mode::ShotLab).unwrap(),
            SlotId::ShotLabReference
        );
        assert_eq!(
            SlotId::resolve("modelImage_lifestyle", Mode::Spotlight).unwrap(),
            SlotId::ModelLifestyle
        );
        assert!(SlotId::resolve("logo", Mode::Spotlight).is_err());
    }
}
