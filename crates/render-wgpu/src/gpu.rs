use crate::shaders;
use crate::textures::TextureCache;
use crate::uniforms::{
    BoundMaps, FrameUniforms, MaterialUniforms, ObjectUniforms, pipeline_index,
};
use bytemuck::{Pod, Zeroable};
use std::collections::HashMap;
use surface_assets::AssetId;
use surface_common::NodeId;
use surface_render::PerspectiveCamera;
use surface_scene::{Geometry, Material, Scene, Side};
use wgpu::util::DeviceExt;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Vertex {
    position: [f32; 3],
    normal: [f32; 3],
    uv: [f32; 2],
}

struct GpuMesh {
    geometry: Geometry,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl GpuMesh {
    fn new(device: &wgpu::Device, name: &str, geometry: Geometry) -> Self {
        let data = geometry.build();
        let vertices: Vec<Vertex> = data
            .positions
            .iter()
            .zip(&data.normals)
            .zip(&data.uvs)
            .map(|((p, n), uv)| Vertex {
                position: *p,
                normal: *n,
                uv: *uv,
            })
            .collect();
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{name}_vertex_buffer")),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{name}_index_buffer")),
            contents: bytemuck::cast_slice(&data.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            geometry,
            vertex_buffer,
            index_buffer,
            index_count: data.indices.len() as u32,
        }
    }
}

/// Textures bound into a material's bind group, by slot.
type BindKey = [Option<AssetId>; 5];

struct GpuMaterial {
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    key: BindKey,
    side: Side,
    transparent: bool,
}

/// wgpu-based scene renderer: one draw per mesh node, shading chosen by the
/// node's material.
pub struct WgpuRenderer {
    pipelines: Vec<wgpu::RenderPipeline>,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    object_buffer: wgpu::Buffer,
    object_bind_group: wgpu::BindGroup,
    object_stride: u32,
    max_objects: u32,
    material_layout: wgpu::BindGroupLayout,
    materials: Vec<GpuMaterial>,
    meshes: HashMap<NodeId, GpuMesh>,
    textures: TextureCache,
    depth_texture: wgpu::TextureView,
}

impl WgpuRenderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Self {
        let frame_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("frame_uniform_buffer"),
            size: std::mem::size_of::<FrameUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("frame_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frame_bind_group"),
            layout: &frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        let material_layout = Self::material_layout(device);

        // Object matrices share one buffer, addressed by dynamic offset.
        let object_size = std::mem::size_of::<ObjectUniforms>() as u32;
        let object_stride = wgpu::util::align_to(
            object_size,
            device.limits().min_uniform_buffer_offset_alignment,
        );
        let max_objects = 256u32;
        let object_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("object_uniform_buffer"),
            size: (max_objects * object_stride) as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let object_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("object_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(object_size as u64),
                },
                count: None,
            }],
        });

        let object_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("object_bind_group"),
            layout: &object_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &object_buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(object_size as u64),
                }),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[&frame_layout, &material_layout, &object_layout],
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("material_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::MATERIAL_SHADER.into()),
        });

        // Ordered to match `pipeline_index`.
        let mut pipelines = Vec::with_capacity(6);
        for side in [Side::Front, Side::Back, Side::Double] {
            for transparent in [false, true] {
                debug_assert_eq!(pipelines.len(), pipeline_index(side, transparent));
                pipelines.push(Self::create_pipeline(
                    device,
                    &pipeline_layout,
                    &shader,
                    surface_format,
                    side,
                    transparent,
                ));
            }
        }

        let depth_texture = Self::create_depth_texture(device, width, height);

        Self {
            pipelines,
            frame_buffer,
            frame_bind_group,
            object_buffer,
            object_bind_group,
            object_stride,
            max_objects,
            material_layout,
            materials: Vec::new(),
            meshes: HashMap::new(),
            textures: TextureCache::new(device, queue),
            depth_texture,
        }
    }

    fn material_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
        let texture = |binding, view_dimension| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension,
                multisampled: false,
            },
            count: None,
        };
        let sampler = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
            count: None,
        };

        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("material_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                texture(1, wgpu::TextureViewDimension::D2),
                texture(2, wgpu::TextureViewDimension::D2),
                texture(3, wgpu::TextureViewDimension::D2),
                texture(4, wgpu::TextureViewDimension::D2),
                texture(5, wgpu::TextureViewDimension::Cube),
                sampler(6),
                sampler(7),
            ],
        })
    }

    fn create_pipeline(
        device: &wgpu::Device,
        layout: &wgpu::PipelineLayout,
        shader: &wgpu::ShaderModule,
        surface_format: wgpu::TextureFormat,
        side: Side,
        transparent: bool,
    ) -> wgpu::RenderPipeline {
        let cull_mode = match side {
            Side::Front => Some(wgpu::Face::Back),
            Side::Back => Some(wgpu::Face::Front),
            Side::Double => None,
        };
        let blend = if transparent {
            wgpu::BlendState::ALPHA_BLENDING
        } else {
            wgpu::BlendState::REPLACE
        };

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("material_pipeline"),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<Vertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![
                        0 => Float32x3,
                        1 => Float32x3,
                        2 => Float32x2,
                    ],
                }],
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(blend),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: !transparent,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        })
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = Self::create_depth_texture(device, width, height);
    }

    /// Number of textures that have reached the GPU so far.
    pub fn uploaded_textures(&self) -> usize {
        self.textures.uploaded()
    }

    /// Upload textures that finished loading and refresh material state.
    ///
    /// Called by `render`; exposed so callers can sync without drawing.
    pub fn sync_textures(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, scene: &Scene) {
        for material in scene.materials() {
            for (handle, srgb) in [
                (&material.map, true),
                (&material.alpha_map, false),
                (&material.matcap, true),
                (&material.gradient_map, true),
            ] {
                if let Some(handle) = handle {
                    self.textures.sync(device, queue, handle, srgb);
                }
            }
            if let Some(env) = &material.env_map {
                self.textures.sync_cube(device, queue, env);
            }
        }
    }

    fn bind_key(&self, material: &Material) -> BindKey {
        let slot = |h: Option<&surface_assets::TextureHandle>| {
            let (_, bound) = self.textures.view(h);
            bound.then(|| h.map(|h| h.id())).flatten()
        };
        let (_, env_bound) = self.textures.cube_view(material.env_map.as_ref());
        [
            slot(material.map.as_ref()),
            slot(material.alpha_map.as_ref()),
            slot(material.matcap.as_ref()),
            slot(material.gradient_map.as_ref()),
            env_bound
                .then(|| material.env_map.as_ref().map(|e| e.id()))
                .flatten(),
        ]
    }

    fn bound_maps(key: &BindKey) -> BoundMaps {
        BoundMaps {
            map: key[0].is_some(),
            alpha_map: key[1].is_some(),
            matcap: key[2].is_some(),
            gradient_map: key[3].is_some(),
            env_map: key[4].is_some(),
        }
    }

    fn create_material_bind_group(
        &self,
        device: &wgpu::Device,
        buffer: &wgpu::Buffer,
        material: &Material,
    ) -> wgpu::BindGroup {
        let (map, _) = self.textures.view(material.map.as_ref());
        let (alpha_map, _) = self.textures.view(material.alpha_map.as_ref());
        let (matcap, _) = self.textures.view(material.matcap.as_ref());
        let (gradient, _) = self.textures.view(material.gradient_map.as_ref());
        let (env, _) = self.textures.cube_view(material.env_map.as_ref());

        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("material_bind_group"),
            layout: &self.material_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(map),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(alpha_map),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::TextureView(matcap),
                },
                wgpu::BindGroupEntry {
                    binding: 4,
                    resource: wgpu::BindingResource::TextureView(gradient),
                },
                wgpu::BindGroupEntry {
                    binding: 5,
                    resource: wgpu::BindingResource::TextureView(env),
                },
                wgpu::BindGroupEntry {
                    binding: 6,
                    resource: wgpu::BindingResource::Sampler(&self.textures.linear_sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 7,
                    resource: wgpu::BindingResource::Sampler(&self.textures.nearest_sampler),
                },
            ],
        })
    }

    /// Write every material's parameters, rebuilding bind groups whose
    /// bound textures changed. Runs each frame so slider edits show at once.
    fn prepare_materials(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, scene: &Scene) {
        for (index, material) in scene.materials().iter().enumerate() {
            let key = self.bind_key(material);
            let uniforms = MaterialUniforms::new(material, Self::bound_maps(&key));

            if index == self.materials.len() {
                let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
                    label: Some(&format!("material_{index}_uniform_buffer")),
                    size: std::mem::size_of::<MaterialUniforms>() as u64,
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                    mapped_at_creation: false,
                });
                let bind_group = self.create_material_bind_group(device, &uniform_buffer, material);
                self.materials.push(GpuMaterial {
                    uniform_buffer,
                    bind_group,
                    key,
                    side: material.side,
                    transparent: material.transparent,
                });
            } else if self.materials[index].key != key {
                tracing::debug!("material {index} rebinding textures");
                let bind_group = self.create_material_bind_group(
                    device,
                    &self.materials[index].uniform_buffer,
                    material,
                );
                let gpu = &mut self.materials[index];
                gpu.bind_group = bind_group;
                gpu.key = key;
            }

            let gpu = &mut self.materials[index];
            gpu.side = material.side;
            gpu.transparent = material.transparent;
            queue.write_buffer(&gpu.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
        }
    }

    fn prepare_meshes(&mut self, device: &wgpu::Device, scene: &Scene) {
        self.meshes
            .retain(|id, _| scene.nodes().iter().any(|n| n.id == *id));
        for node in scene.nodes() {
            let stale = self
                .meshes
                .get(&node.id)
                .is_none_or(|mesh| mesh.geometry != node.geometry);
            if stale {
                self.meshes
                    .insert(node.id, GpuMesh::new(device, &node.name, node.geometry));
            }
        }
    }

    /// Render one frame of the scene from the camera into `view`.
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        camera: &PerspectiveCamera,
        scene: &Scene,
    ) {
        self.sync_textures(device, queue, scene);
        self.prepare_materials(device, queue, scene);
        self.prepare_meshes(device, scene);

        queue.write_buffer(
            &self.frame_buffer,
            0,
            bytemuck::bytes_of(&FrameUniforms::new(camera, scene)),
        );

        let nodes = &scene.nodes()[..scene.node_count().min(self.max_objects as usize)];
        if nodes.len() < scene.node_count() {
            tracing::warn!(
                "drawing {} of {} nodes, object buffer is full",
                nodes.len(),
                scene.node_count()
            );
        }
        let stride = self.object_stride as usize;
        let mut objects = vec![0u8; nodes.len() * stride];
        for (i, node) in nodes.iter().enumerate() {
            let block = ObjectUniforms::new(&node.transform);
            let bytes = bytemuck::bytes_of(&block);
            objects[i * stride..i * stride + bytes.len()].copy_from_slice(bytes);
        }
        if !objects.is_empty() {
            queue.write_buffer(&self.object_buffer, 0, &objects);
        }

        let bg = scene.background;
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: bg.r as f64,
                            g: bg.g as f64,
                            b: bg.b as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            pass.set_bind_group(0, &self.frame_bind_group, &[]);
            for (i, node) in nodes.iter().enumerate() {
                let (Some(material), Some(mesh)) = (
                    self.materials.get(node.material.0 as usize),
                    self.meshes.get(&node.id),
                ) else {
                    continue;
                };
                pass.set_pipeline(&self.pipelines[pipeline_index(material.side, material.transparent)]);
                pass.set_bind_group(1, &material.bind_group, &[]);
                pass.set_bind_group(2, &self.object_bind_group, &[i as u32 * self.object_stride]);
                pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
    }

    fn create_depth_texture(
        device: &wgpu::Device,
        width: u32,
        height: u32,
    ) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}
