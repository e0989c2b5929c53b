use crate::texture::Slot;
use crate::{AssetError, AssetId, AssetSource, CubeTextureHandle, Image, TextureHandle, TextureState};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Fire-and-forget texture loader.
///
/// Each new path gets one worker thread that fetches and decodes, then
/// resolves the slot. Callers get a handle back immediately and read its
/// state whenever they like; nothing here ever blocks on a load except
/// [`TextureLoader::wait_all`].
pub struct TextureLoader {
    source: Arc<dyn AssetSource>,
    handles: HashMap<AssetId, TextureHandle>,
}

impl TextureLoader {
    pub fn new(source: impl AssetSource + 'static) -> Self {
        Self {
            source: Arc::new(source),
            handles: HashMap::new(),
        }
    }

    /// Start loading `path` and return its handle. Repeated paths share a slot.
    pub fn load(&mut self, path: &str) -> TextureHandle {
        let id = AssetId::from_path(path);
        if let Some(handle) = self.handles.get(&id) {
            return handle.clone();
        }

        let slot = Arc::new(Slot::new());
        let handle = TextureHandle::new(path, slot.clone());
        self.handles.insert(id, handle.clone());

        let source = self.source.clone();
        let owned_path = path.to_string();
        let spawned = std::thread::Builder::new()
            .name(format!("texture-load:{path}"))
            .spawn(move || {
                let state = match fetch_and_decode(source.as_ref(), &owned_path) {
                    Ok(img) => {
                        tracing::debug!(
                            "loaded {owned_path} ({}x{})",
                            img.width,
                            img.height
                        );
                        TextureState::Ready(Arc::new(img))
                    }
                    Err(e) => {
                        tracing::warn!("texture load failed: {e}");
                        TextureState::Failed(e.to_string())
                    }
                };
                slot.resolve(state);
            });

        if let Err(e) = spawned {
            let e = AssetError::Worker(e);
            tracing::warn!("texture load failed: {e}");
            handle.fail(e.to_string());
        }

        handle
    }

    /// Start loading the six faces of a cube map, in +X, -X, +Y, -Y, +Z, -Z order.
    pub fn load_cube(&mut self, paths: &[String; 6]) -> CubeTextureHandle {
        let faces = std::array::from_fn(|i| self.load(&paths[i]));
        CubeTextureHandle::new(faces)
    }

    /// Number of distinct paths requested so far.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Block until every requested load resolves or `timeout` passes.
    /// Returns whether everything resolved.
    pub fn wait_all(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        self.handles.values().all(|h| h.wait_until(deadline))
    }
}

fn fetch_and_decode(source: &dyn AssetSource, path: &str) -> Result<Image, AssetError> {
    let bytes = source.fetch(path)?;
    Image::decode(path, &bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemorySource;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 255]));
        let mut out = std::io::Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn load_resolves_to_ready() {
        let source = MemorySource::new().with("/a.png", png_bytes(4, 2));
        let mut loader = TextureLoader::new(source);
        let handle = loader.load("/a.png");
        assert!(loader.wait_all(Duration::from_secs(5)));

        let img = handle.image().unwrap();
        assert_eq!((img.width, img.height), (4, 2));
        assert_eq!(&img.pixels[..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn missing_asset_fails_without_panicking() {
        let mut loader = TextureLoader::new(MemorySource::new());
        let handle = loader.load("/missing.jpg");
        assert!(loader.wait_all(Duration::from_secs(5)));
        assert!(matches!(handle.state(), TextureState::Failed(_)));
        assert!(handle.image().is_none());
    }

    #[test]
    fn same_path_shares_slot() {
        let source = MemorySource::new().with("/a.png", png_bytes(1, 1));
        let mut loader = TextureLoader::new(source);
        let a = loader.load("/a.png");
        let b = loader.load("/a.png");
        assert_eq!(a.id(), b.id());
        assert_eq!(loader.len(), 1);
        assert!(loader.wait_all(Duration::from_secs(5)));
        assert!(a.is_ready() && b.is_ready());
    }

    #[test]
    fn cube_load_requests_six_faces() {
        let mut source = MemorySource::new();
        let paths: [String; 6] = std::array::from_fn(|i| format!("/env/{i}.png"));
        for p in &paths {
            source.insert(p.clone(), png_bytes(2, 2));
        }
        let mut loader = TextureLoader::new(source);
        let cube = loader.load_cube(&paths);
        assert_eq!(loader.len(), 6);
        assert!(loader.wait_all(Duration::from_secs(5)));
        assert!(cube.images().unwrap().is_some());
    }
}
