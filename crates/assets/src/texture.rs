use crate::AssetError;
use sha2::{Digest, Sha256};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Asset ID derived from the asset's path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetId(pub u64);

impl AssetId {
    pub fn from_path(path: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(path.as_bytes());
        let result = hasher.finalize();
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&result[..8]);
        AssetId(u64::from_le_bytes(bytes))
    }
}

/// A decoded RGBA8 image.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl Image {
    /// Decode any format the `image` crate was built with into RGBA8.
    pub fn decode(path: &str, bytes: &[u8]) -> Result<Self, AssetError> {
        let img = image::load_from_memory(bytes).map_err(|e| AssetError::Decode {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(Self {
            width,
            height,
            pixels: rgba.into_raw(),
        })
    }

    /// A 1x1 image of a single color, used as the pending placeholder.
    pub fn solid(rgba: [u8; 4]) -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: rgba.to_vec(),
        }
    }
}

/// Load state of one texture slot.
#[derive(Debug, Clone)]
pub enum TextureState {
    Pending,
    Ready(Arc<Image>),
    Failed(String),
}

impl TextureState {
    pub fn is_resolved(&self) -> bool {
        !matches!(self, TextureState::Pending)
    }
}

#[derive(Debug)]
pub(crate) struct Slot {
    state: Mutex<TextureState>,
    resolved: Condvar,
}

impl Slot {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(TextureState::Pending),
            resolved: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, TextureState> {
        // A worker that panicked mid-write leaves Pending behind, which is still valid.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub(crate) fn resolve(&self, state: TextureState) {
        *self.lock() = state;
        self.resolved.notify_all();
    }

    fn wait_until(&self, deadline: Instant) -> bool {
        let mut guard = self.lock();
        while !guard.is_resolved() {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            guard = match self.resolved.wait_timeout(guard, deadline - now) {
                Ok((g, _)) => g,
                Err(e) => e.into_inner().0,
            };
        }
        true
    }
}

/// Handle to a texture that may still be loading.
///
/// Cloning is cheap; all clones observe the same slot.
#[derive(Debug, Clone)]
pub struct TextureHandle {
    id: AssetId,
    path: Arc<str>,
    slot: Arc<Slot>,
}

impl TextureHandle {
    pub(crate) fn new(path: &str, slot: Arc<Slot>) -> Self {
        Self {
            id: AssetId::from_path(path),
            path: path.into(),
            slot,
        }
    }

    pub fn id(&self) -> AssetId {
        self.id
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn state(&self) -> TextureState {
        self.slot.lock().clone()
    }

    /// The decoded image if the load has completed successfully.
    pub fn image(&self) -> Option<Arc<Image>> {
        match &*self.slot.lock() {
            TextureState::Ready(img) => Some(img.clone()),
            _ => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(&*self.slot.lock(), TextureState::Ready(_))
    }

    /// Block until the slot resolves or the timeout passes. Returns whether it resolved.
    pub fn wait(&self, timeout: Duration) -> bool {
        self.slot.wait_until(Instant::now() + timeout)
    }

    pub(crate) fn wait_until(&self, deadline: Instant) -> bool {
        self.slot.wait_until(deadline)
    }

    pub(crate) fn fail(&self, reason: String) {
        self.slot.resolve(TextureState::Failed(reason));
    }
}

/// Order of the six faces of a cube map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CubeFace {
    PositiveX,
    NegativeX,
    PositiveY,
    NegativeY,
    PositiveZ,
    NegativeZ,
}

impl CubeFace {
    pub const ALL: [CubeFace; 6] = [
        CubeFace::PositiveX,
        CubeFace::NegativeX,
        CubeFace::PositiveY,
        CubeFace::NegativeY,
        CubeFace::PositiveZ,
        CubeFace::NegativeZ,
    ];

    /// Conventional file stem: `px`, `nx`, ...
    pub fn stem(self) -> &'static str {
        match self {
            CubeFace::PositiveX => "px",
            CubeFace::NegativeX => "nx",
            CubeFace::PositiveY => "py",
            CubeFace::NegativeY => "ny",
            CubeFace::PositiveZ => "pz",
            CubeFace::NegativeZ => "nz",
        }
    }
}

/// Handle to a six-face cube texture. Ready only once all faces are.
#[derive(Debug, Clone)]
pub struct CubeTextureHandle {
    faces: [TextureHandle; 6],
}

impl CubeTextureHandle {
    pub(crate) fn new(faces: [TextureHandle; 6]) -> Self {
        Self { faces }
    }

    pub fn faces(&self) -> &[TextureHandle; 6] {
        &self.faces
    }

    pub fn id(&self) -> AssetId {
        self.faces[0].id()
    }

    pub fn face(&self, face: CubeFace) -> &TextureHandle {
        &self.faces[face as usize]
    }

    pub fn state(&self) -> TextureState {
        let mut pending = false;
        for face in &self.faces {
            match face.state() {
                TextureState::Failed(msg) => {
                    return TextureState::Failed(format!("{}: {msg}", face.path()));
                }
                TextureState::Pending => pending = true,
                TextureState::Ready(_) => {}
            }
        }
        if pending {
            return TextureState::Pending;
        }
        // Ready: report the +X face, callers wanting all faces use `images`.
        self.faces[0].state()
    }

    /// All six images once every face is ready and they share one square size.
    pub fn images(&self) -> Result<Option<[Arc<Image>; 6]>, AssetError> {
        let mut images = Vec::with_capacity(6);
        for face in &self.faces {
            match face.image() {
                Some(img) => images.push(img),
                None => return Ok(None),
            }
        }
        let expected = images[0].width;
        for (i, img) in images.iter().enumerate() {
            if img.width != expected || img.height != expected {
                return Err(AssetError::CubeFaceSize {
                    face: i,
                    width: img.width,
                    height: img.height,
                    expected,
                });
            }
        }
        Ok(images.try_into().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_id_is_stable_per_path() {
        assert_eq!(
            AssetId::from_path("/textures/door/color.jpg"),
            AssetId::from_path("/textures/door/color.jpg")
        );
        assert_ne!(
            AssetId::from_path("/textures/door/color.jpg"),
            AssetId::from_path("/textures/door/alpha.jpg")
        );
    }

    #[test]
    fn decode_rejects_garbage() {
        let err = Image::decode("x.png", b"not an image").unwrap_err();
        assert!(matches!(err, AssetError::Decode { .. }));
    }

    #[test]
    fn solid_placeholder() {
        let img = Image::solid([255, 255, 255, 255]);
        assert_eq!((img.width, img.height), (1, 1));
        assert_eq!(img.pixels.len(), 4);
    }

    #[test]
    fn handle_waits_for_resolution() {
        let slot = Arc::new(Slot::new());
        let handle = TextureHandle::new("a.png", slot.clone());
        assert!(!handle.wait(Duration::from_millis(1)));

        let worker = std::thread::spawn(move || {
            slot.resolve(TextureState::Ready(Arc::new(Image::solid([0, 0, 0, 255]))));
        });
        assert!(handle.wait(Duration::from_secs(5)));
        worker.join().unwrap();
        assert!(handle.is_ready());
    }

    #[test]
    fn cube_state_aggregates_faces() {
        let slots: Vec<Arc<Slot>> = (0..6).map(|_| Arc::new(Slot::new())).collect();
        let faces: [TextureHandle; 6] = std::array::from_fn(|i| {
            TextureHandle::new(CubeFace::ALL[i].stem(), slots[i].clone())
        });
        let cube = CubeTextureHandle::new(faces);
        assert!(matches!(cube.state(), TextureState::Pending));

        for slot in &slots[..5] {
            slot.resolve(TextureState::Ready(Arc::new(Image::solid([1, 2, 3, 4]))));
        }
        assert!(matches!(cube.state(), TextureState::Pending));
        assert!(cube.images().unwrap().is_none());

        slots[5].resolve(TextureState::Ready(Arc::new(Image::solid([1, 2, 3, 4]))));
        assert!(matches!(cube.state(), TextureState::Ready(_)));
        assert!(cube.images().unwrap().is_some());
    }

    #[test]
    fn cube_with_failed_face_is_failed() {
        let slots: Vec<Arc<Slot>> = (0..6).map(|_| Arc::new(Slot::new())).collect();
        let faces: [TextureHandle; 6] =
            std::array::from_fn(|i| TextureHandle::new(CubeFace::ALL[i].stem(), slots[i].clone()));
        let cube = CubeTextureHandle::new(faces);
        slots[2].resolve(TextureState::Failed("missing".into()));
        match cube.state() {
            TextureState::Failed(msg) => assert!(msg.starts_with("py")),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn cube_faces_must_match_size() {
        let slots: Vec<Arc<Slot>> = (0..6).map(|_| Arc::new(Slot::new())).collect();
        let faces: [TextureHandle; 6] =
            std::array::from_fn(|i| TextureHandle::new(CubeFace::ALL[i].stem(), slots[i].clone()));
        let cube = CubeTextureHandle::new(faces);
        for slot in &slots[..5] {
            slot.resolve(TextureState::Ready(Arc::new(Image::solid([0; 4]))));
        }
        slots[5].resolve(TextureState::Ready(Arc::new(Image {
            width: 2,
            height: 2,
            pixels: vec![0; 16],
        })));
        assert!(matches!(
            cube.images(),
            Err(AssetError::CubeFaceSize { face: 5, .. })
        ));
    }
}
