use std::collections::{HashMap, HashSet};
use surface_assets::{AssetId, CubeTextureHandle, Image, TextureHandle, TextureState};

/// GPU copies of loaded textures, keyed by asset.
///
/// A texture is uploaded once, the first frame its handle reports ready.
/// Until then (or forever, if loading failed) lookups return a 1x1
/// placeholder and report the slot as unbound.
pub(crate) struct TextureCache {
    placeholder_2d: wgpu::TextureView,
    placeholder_cube: wgpu::TextureView,
    views: HashMap<AssetId, wgpu::TextureView>,
    cubes: HashMap<AssetId, wgpu::TextureView>,
    // Failures are reported once, not every frame.
    failed: HashSet<AssetId>,
    pub linear_sampler: wgpu::Sampler,
    pub nearest_sampler: wgpu::Sampler,
}

impl TextureCache {
    pub(crate) fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let white = Image::solid([255, 255, 255, 255]);
        let placeholder_2d = upload_2d(device, queue, "placeholder_texture", &white, false);
        let placeholder_cube = upload_cube(
            device,
            queue,
            "placeholder_cube",
            [&white, &white, &white, &white, &white, &white],
        );

        let linear_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("linear_sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });
        // Gradient ramps must keep hard steps between tones.
        let nearest_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("nearest_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            placeholder_2d,
            placeholder_cube,
            views: HashMap::new(),
            cubes: HashMap::new(),
            failed: HashSet::new(),
            linear_sampler,
            nearest_sampler,
        }
    }

    /// Upload a 2D texture if it became ready since the last call.
    /// Returns true when a new GPU texture was created.
    pub(crate) fn sync(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        handle: &TextureHandle,
        srgb: bool,
    ) -> bool {
        let id = handle.id();
        if self.views.contains_key(&id) || self.failed.contains(&id) {
            return false;
        }
        match handle.state() {
            TextureState::Pending => false,
            TextureState::Failed(reason) => {
                tracing::debug!("{} stays on placeholder: {reason}", handle.path());
                self.failed.insert(id);
                false
            }
            TextureState::Ready(image) => {
                let view = upload_2d(device, queue, handle.path(), &image, srgb);
                tracing::debug!("uploaded {} ({}x{})", handle.path(), image.width, image.height);
                self.views.insert(id, view);
                true
            }
        }
    }

    /// Upload a cube texture once all six faces are ready.
    pub(crate) fn sync_cube(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        handle: &CubeTextureHandle,
    ) -> bool {
        let id = handle.id();
        if self.cubes.contains_key(&id) || self.failed.contains(&id) {
            return false;
        }
        if let TextureState::Failed(reason) = handle.state() {
            tracing::debug!("environment map stays on placeholder: {reason}");
            self.failed.insert(id);
            return false;
        }
        match handle.images() {
            Ok(None) => false,
            Ok(Some(images)) => {
                let faces = [
                    &*images[0],
                    &*images[1],
                    &*images[2],
                    &*images[3],
                    &*images[4],
                    &*images[5],
                ];
                let view = upload_cube(device, queue, "environment_map", faces);
                tracing::debug!("uploaded environment map ({}px faces)", images[0].width);
                self.cubes.insert(id, view);
                true
            }
            Err(e) => {
                tracing::warn!("environment map rejected: {e}");
                self.failed.insert(id);
                false
            }
        }
    }

    /// The view to bind for a slot, and whether it is the real texture.
    pub(crate) fn view(&self, handle: Option<&TextureHandle>) -> (&wgpu::TextureView, bool) {
        match handle.and_then(|h| self.views.get(&h.id())) {
            Some(view) => (view, true),
            None => (&self.placeholder_2d, false),
        }
    }

    pub(crate) fn cube_view(
        &self,
        handle: Option<&CubeTextureHandle>,
    ) -> (&wgpu::TextureView, bool) {
        match handle.and_then(|h| self.cubes.get(&h.id())) {
            Some(view) => (view, true),
            None => (&self.placeholder_cube, false),
        }
    }

    pub(crate) fn uploaded(&self) -> usize {
        self.views.len() + self.cubes.len()
    }
}

fn texture_format(srgb: bool) -> wgpu::TextureFormat {
    if srgb {
        wgpu::TextureFormat::Rgba8UnormSrgb
    } else {
        wgpu::TextureFormat::Rgba8Unorm
    }
}

fn write_layer(queue: &wgpu::Queue, texture: &wgpu::Texture, layer: u32, image: &Image) {
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d {
                x: 0,
                y: 0,
                z: layer,
            },
            aspect: wgpu::TextureAspect::All,
        },
        &image.pixels,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * image.width),
            rows_per_image: Some(image.height),
        },
        wgpu::Extent3d {
            width: image.width,
            height: image.height,
            depth_or_array_layers: 1,
        },
    );
}

fn upload_2d(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    label: &str,
    image: &Image,
    srgb: bool,
) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width: image.width.max(1),
            height: image.height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: texture_format(srgb),
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    write_layer(queue, &texture, 0, image);
    texture.create_view(&Default::default())
}

fn upload_cube(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    label: &str,
    faces: [&Image; 6],
) -> wgpu::TextureView {
    let size = faces[0].width.max(1);
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width: size,
            height: size,
            depth_or_array_layers: 6,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: texture_format(true),
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    for (layer, image) in faces.iter().enumerate() {
        write_layer(queue, &texture, layer as u32, image);
    }
    texture.create_view(&wgpu::TextureViewDescriptor {
        label: Some(label),
        dimension: Some(wgpu::TextureViewDimension::Cube),
        array_layer_count: Some(6),
        ..Default::default()
    })
}
