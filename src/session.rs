//! Working image lifecycle.
//!
//! The photo being edited is kept as a `data:` URL and persisted under
//! [`SESSION_KEY`] so it survives a restart. [`Session`] owns the current
//! [`WorkingImage`] and the [`KeyValueStore`] backing it.

use std::collections::HashMap;
use std::path::PathBuf;

use image::{ImageFormat, RgbaImage};
use log::{debug, info, warn};
use thiserror::Error;

use crate::asset::{Asset, AssetError, decode_data_url, encode_data_url};

/// Storage key of the persisted working image.
pub const SESSION_KEY: &str = "pfp_editor_image_url";

/// Errors raised by the session and its storage.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("unsupported file type '{0}', expected an image")]
    UnsupportedMimeType(String),

    #[error("invalid working image")]
    InvalidImage(#[from] AssetError),

    #[error("failed to encode working image")]
    Encode(#[from] image::ImageError),

    #[error("storage I/O failed for '{key}'")]
    Storage {
        key: String,
        #[source]
        source: std::io::Error,
    },
}

// ============================================================================
// WorkingImage
// ============================================================================

/// The uploaded subject photo, as a base64 `data:` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingImage {
    data_url: String,
}

impl WorkingImage {
    /// Wraps uploaded bytes. `mime` must start with `image/`.
    pub fn from_bytes(bytes: &[u8], mime: &str) -> Result<Self, SessionError> {
        let mime = mime.trim().to_ascii_lowercase();
        if !mime.starts_with("image/") {
            return Err(SessionError::UnsupportedMimeType(mime));
        }
        Ok(Self {
            data_url: encode_data_url(&mime, bytes),
        })
    }

    /// Wraps an existing data URL after checking its header.
    pub fn from_data_url(data_url: impl Into<String>) -> Result<Self, SessionError> {
        let data_url = data_url.into();
        let (mime, _) = decode_data_url(&data_url)?;
        if !mime.starts_with("image/") {
            return Err(SessionError::UnsupportedMimeType(mime));
        }
        Ok(Self { data_url })
    }

    /// Encodes a bitmap as PNG.
    pub fn from_image(img: &RgbaImage) -> Result<Self, SessionError> {
        let mut bytes = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut bytes), ImageFormat::Png)?;
        Self::from_bytes(&bytes, "image/png")
    }

    pub fn data_url(&self) -> &str {
        &self.data_url
    }

    /// MIME type from the data URL header.
    pub fn mime_type(&self) -> &str {
        self.data_url
            .strip_prefix("data:")
            .and_then(|rest| rest.split([';', ',']).next())
            .unwrap_or_default()
    }

    /// Decodes the payload into an [`Asset`].
    pub fn decode(&self) -> Result<Asset, AssetError> {
        let (_mime, bytes) = decode_data_url(&self.data_url)?;
        Asset::decode(&bytes)
    }
}

// ============================================================================
// KeyValueStore
// ============================================================================

/// String storage the session persists into.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), SessionError>;
    fn remove(&mut self, key: &str) -> Result<(), SessionError>;
}

/// Volatile in-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SessionError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), SessionError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Stores each key as a file in a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect();
        self.dir.join(name)
    }

    fn io_error(key: &str) -> impl FnOnce(std::io::Error) -> SessionError + '_ {
        move |source| SessionError::Storage {
            key: key.to_string(),
            source,
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Self::io_error(key)(e)),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SessionError> {
        std::fs::create_dir_all(&self.dir).map_err(Self::io_error(key))?;
        std::fs::write(self.path_for(key), value).map_err(Self::io_error(key))
    }

    fn remove(&mut self, key: &str) -> Result<(), SessionError> {
        match std::fs::remove_file(self.path_for(key)) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(Self::io_error(key)(e)),
            _ => Ok(()),
        }
    }
}

// ============================================================================
// Session
// ============================================================================

/// Owns the working image and keeps it in sync with the store.
#[derive(Debug)]
pub struct Session<S: KeyValueStore = MemoryStore> {
    store: S,
    working: Option<WorkingImage>,
}

impl<S: KeyValueStore> Session<S> {
    /// Starts with no working image. Call [`Session::restore`] to reload a
    /// persisted one.
    pub fn new(store: S) -> Self {
        Self {
            store,
            working: None,
        }
    }

    /// Loads the persisted working image, if any.
    ///
    /// A stored value that is not an image data URL is discarded.
    pub fn restore(&mut self) -> Result<Option<&WorkingImage>, SessionError> {
        self.working = match self.store.get(SESSION_KEY)? {
            Some(url) => match WorkingImage::from_data_url(url) {
                Ok(image) => {
                    debug!("restored working image ({})", image.mime_type());
                    Some(image)
                }
                Err(e) => {
                    warn!("discarding stored working image: {e}");
                    self.store.remove(SESSION_KEY)?;
                    None
                }
            },
            None => None,
        };
        Ok(self.working.as_ref())
    }

    /// Replaces the working image with an upload and persists it.
    pub fn upload(&mut self, bytes: &[u8], mime: &str) -> Result<&WorkingImage, SessionError> {
        let image = WorkingImage::from_bytes(bytes, mime)?;
        // Reject payloads that will not decode before they replace anything.
        image.decode()?;
        self.store.set(SESSION_KEY, image.data_url())?;
        info!("working image uploaded ({mime}, {} bytes)", bytes.len());
        Ok(&*self.working.insert(image))
    }

    /// Forgets the working image and removes it from the store.
    pub fn clear(&mut self) -> Result<(), SessionError> {
        self.working = None;
        self.store.remove(SESSION_KEY)
    }

    pub fn working_image(&self) -> Option<&WorkingImage> {
        self.working.as_ref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn png_bytes() -> Vec<u8> {
        let img = RgbaImage::from_pixel(3, 2, Rgba([10, 20, 30, 255]));
        let mut bytes = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn working_image_requires_image_mime() {
        let err = WorkingImage::from_bytes(b"hello", "text/plain").unwrap_err();
        assert!(matches!(err, SessionError::UnsupportedMimeType(m) if m == "text/plain"));

        let image = WorkingImage::from_bytes(&png_bytes(), "Image/PNG").unwrap();
        assert!(image.data_url().starts_with("data:image/png;base64,"));
        assert_eq!(image.mime_type(), "image/png");
    }

    #[test]
    fn working_image_decodes() {
        let image = WorkingImage::from_bytes(&png_bytes(), "image/png").unwrap();
        match image.decode().unwrap() {
            Asset::Raster(img) => {
                assert_eq!(img.dimensions(), (3, 2));
                assert_eq!(img.get_pixel(0, 0).0, [10, 20, 30, 255]);
            }
            other => panic!("unexpected asset {other:?}"),
        }
    }

    #[test]
    fn from_image_round_trips_pixels() {
        let img = RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 4]));
        let image = WorkingImage::from_image(&img).unwrap();
        assert_eq!(image.decode().unwrap(), Asset::Raster(img));
    }

    #[test]
    fn upload_persists_and_restore_reloads() {
        let mut session = Session::new(MemoryStore::new());
        assert!(session.restore().unwrap().is_none());

        let url = session.upload(&png_bytes(), "image/png").unwrap().data_url().to_string();
        assert_eq!(session.store().get(SESSION_KEY).unwrap(), Some(url.clone()));

        let mut reopened = Session::new(session.store().clone());
        let restored = reopened.restore().unwrap().unwrap();
        assert_eq!(restored.data_url(), url);
    }

    #[test]
    fn failed_upload_keeps_previous_image() {
        let mut session = Session::new(MemoryStore::new());
        session.upload(&png_bytes(), "image/png").unwrap();
        let before = session.working_image().cloned();

        assert!(session.upload(b"not an image", "image/png").is_err());
        assert!(session.upload(&png_bytes(), "application/pdf").is_err());
        assert_eq!(session.working_image().cloned(), before);
    }

    #[test]
    fn clear_removes_stored_value() {
        let mut session = Session::new(MemoryStore::new());
        session.upload(&png_bytes(), "image/png").unwrap();
        session.clear().unwrap();
        assert!(session.working_image().is_none());
        assert_eq!(session.store().get(SESSION_KEY).unwrap(), None);
    }

    #[test]
    fn restore_discards_garbage() {
        let mut store = MemoryStore::new();
        store.set(SESSION_KEY, "not a data url").unwrap();
        let mut session = Session::new(store);
        assert!(session.restore().unwrap().is_none());
        assert_eq!(session.store().get(SESSION_KEY).unwrap(), None);
    }

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::new(FileStore::new(dir.path().join("session")));
        session.upload(&png_bytes(), "image/png").unwrap();

        let mut reopened = Session::new(FileStore::new(dir.path().join("session")));
        assert!(reopened.restore().unwrap().is_some());

        reopened.clear().unwrap();
        reopened.clear().unwrap();
        assert_eq!(reopened.store().get(SESSION_KEY).unwrap(), None);
    }
}
