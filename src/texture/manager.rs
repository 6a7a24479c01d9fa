//! TextureManager: reference-counted, single-flight texture cache.
//!
//! Every entry is keyed by [`TextureKey`]. The first `acquire` of a key
//! inserts an entry whose [`OnceCell`] is filled by exactly one load; callers
//! arriving while the load is running wait on the same cell. Each live
//! [`Texture`] handle counts as one user, and the entry is evicted when the
//! count drops to zero.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::OnceCell;
use tracing::{debug, trace, warn};

use crate::error::{Error, Result};

use super::loader::{ImageData, LoadError, TextureKey, TextureLoader};

/// Identifier reserved for the built-in placeholder image.
pub const PLACEHOLDER_ID: &str = "trellis:placeholder";

const PLACEHOLDER_SIZE: u32 = 8;

type LoadResult = std::result::Result<Arc<TextureData>, LoadError>;

// ---------------------------------------------------------------------------
// TextureData
// ---------------------------------------------------------------------------

/// Loaded pixels of one cache entry.
#[derive(Debug)]
pub struct TextureData {
    key: TextureKey,
    image: ImageData,
}

impl TextureData {
    pub fn key(&self) -> &TextureKey {
        &self.key
    }

    pub fn image(&self) -> &ImageData {
        &self.image
    }
}

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

struct Entry {
    cell: Arc<OnceCell<LoadResult>>,
    users: usize,
}

struct Shared {
    loader: Box<dyn TextureLoader>,
    entries: Mutex<HashMap<TextureKey, Entry>>,
}

impl Shared {
    /// Register one more user of `key`, creating the entry if needed.
    fn retain(&self, key: &TextureKey) -> Arc<OnceCell<LoadResult>> {
        let mut entries = self.entries.lock();
        let entry = entries.entry(key.clone()).or_insert_with(|| {
            trace!(id = %key.id, "texture entry created");
            Entry { cell: Arc::new(OnceCell::new()), users: 0 }
        });
        entry.users += 1;
        entry.cell.clone()
    }

    /// Drop one user of `key`, evicting the entry when none remain.
    fn release(&self, key: &TextureKey) {
        let mut entries = self.entries.lock();
        let Some(entry) = entries.get_mut(key) else {
            warn!(id = %key.id, "released a texture that is not cached");
            return;
        };
        entry.users = entry.users.saturating_sub(1);
        if entry.users == 0 {
            entries.remove(key);
            debug!(id = %key.id, part = ?key.part, "texture evicted");
        }
    }

    fn load(&self, key: &TextureKey) -> LoadResult {
        let image = if key.id == PLACEHOLDER_ID {
            checkerboard(PLACEHOLDER_SIZE)
        } else {
            self.loader.load(&key.id)?
        };

        let image = match key.part {
            Some(part) => image.crop(part).ok_or_else(|| LoadError::PartOutOfBounds {
                id: key.id.clone(),
                part,
                width: image.width,
                height: image.height,
            })?,
            None => image,
        };

        debug!(id = %key.id, width = image.width, height = image.height, "texture loaded");
        Ok(Arc::new(TextureData { key: key.clone(), image }))
    }
}

fn checkerboard(size: u32) -> ImageData {
    let mut pixels = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let rgba = if (x / 2 + y / 2) % 2 == 0 {
                [255, 0, 255, 255]
            } else {
                [0, 0, 0, 255]
            };
            pixels.extend_from_slice(&rgba);
        }
    }
    ImageData { width: size, height: size, pixels }
}

/// Holds one user count until it is either handed to a [`Texture`] or
/// dropped, so a cancelled `acquire` does not leak its count.
struct Claim<'a> {
    shared: &'a Arc<Shared>,
    key: Option<TextureKey>,
}

impl Claim<'_> {
    fn into_texture(mut self, data: Arc<TextureData>) -> Texture {
        self.key = None;
        Texture { data, shared: self.shared.clone() }
    }
}

impl Drop for Claim<'_> {
    fn drop(&mut self) {
        if let Some(key) = self.key.take() {
            self.shared.release(&key);
        }
    }
}

// ---------------------------------------------------------------------------
// TextureManager
// ---------------------------------------------------------------------------

/// Cache of loaded textures, shared by every widget of a GUI.
///
/// Cloning the manager yields another handle to the same cache.
#[derive(Clone)]
pub struct TextureManager {
    shared: Arc<Shared>,
}

impl TextureManager {
    /// Create a manager that loads images through `loader`.
    pub fn new(loader: impl TextureLoader + 'static) -> Self {
        Self {
            shared: Arc::new(Shared {
                loader: Box::new(loader),
                entries: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Get the texture for `key`, loading it if no live entry exists.
    ///
    /// Concurrent calls for the same key share a single load. A missing image
    /// fails with [`Error::ResourceNotFound`], a part outside the image with
    /// [`Error::InvalidGeometry`].
    pub async fn acquire(&self, key: TextureKey) -> Result<Texture> {
        let cell = self.shared.retain(&key);
        let claim = Claim { shared: &self.shared, key: Some(key.clone()) };

        let loaded = cell
            .get_or_init(|| async { self.shared.load(&key) })
            .await
            .clone();

        match loaded {
            Ok(data) => Ok(claim.into_texture(data)),
            Err(err) => Err(load_error(err)),
        }
    }

    /// Like [`acquire`](Self::acquire), but a missing image is replaced with
    /// the shared placeholder texture.
    pub async fn acquire_or_placeholder(&self, key: TextureKey) -> Result<Texture> {
        match self.acquire(key.clone()).await {
            Err(Error::ResourceNotFound { id, reason }) => {
                warn!(%id, %reason, "texture missing, using placeholder");
                self.placeholder().await
            }
            other => other,
        }
    }

    /// The built-in placeholder texture.
    pub async fn placeholder(&self) -> Result<Texture> {
        self.acquire(TextureKey::new(PLACEHOLDER_ID).smooth(false)).await
    }

    /// Number of live cache entries.
    pub fn cached_count(&self) -> usize {
        self.shared.entries.lock().len()
    }

    /// Number of users of `key` (0 when not cached).
    pub fn users(&self, key: &TextureKey) -> usize {
        self.shared
            .entries
            .lock()
            .get(key)
            .map_or(0, |entry| entry.users)
    }

    /// Whether `key` has a live entry.
    pub fn contains(&self, key: &TextureKey) -> bool {
        self.shared.entries.lock().contains_key(key)
    }
}

impl fmt::Debug for TextureManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextureManager")
            .field("cached", &self.cached_count())
            .finish()
    }
}

fn load_error(err: LoadError) -> Error {
    match err {
        LoadError::NotFound(id) => Error::ResourceNotFound {
            reason: "no such image".to_owned(),
            id,
        },
        LoadError::Decode { id, reason } => Error::ResourceNotFound { id, reason },
        err @ LoadError::PartOutOfBounds { .. } => Error::InvalidGeometry(err.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Texture
// ---------------------------------------------------------------------------

/// A counted reference to a cached texture.
///
/// Cloning registers another user; dropping releases one.
pub struct Texture {
    data: Arc<TextureData>,
    shared: Arc<Shared>,
}

impl Texture {
    pub fn key(&self) -> &TextureKey {
        &self.data.key
    }

    pub fn image(&self) -> &ImageData {
        &self.data.image
    }

    pub fn width(&self) -> u32 {
        self.data.image.width
    }

    pub fn height(&self) -> u32 {
        self.data.image.height
    }

    pub fn is_placeholder(&self) -> bool {
        self.data.key.id == PLACEHOLDER_ID
    }

    /// Whether both handles refer to the same cache entry.
    pub fn ptr_eq(&self, other: &Texture) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}

impl Clone for Texture {
    fn clone(&self) -> Self {
        self.shared.retain(&self.data.key);
        Self { data: self.data.clone(), shared: self.shared.clone() }
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        self.shared.release(&self.data.key);
    }
}

impl fmt::Debug for Texture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Texture")
            .field("id", &self.data.key.id)
            .field("part", &self.data.key.part)
            .field("size", &(self.width(), self.height()))
            .finish()
    }
}
