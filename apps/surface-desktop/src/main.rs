mod config;

use anyhow::{Context, Result};
use clap::Parser;
use config::{DemoConfig, MaterialConfig};
use egui::Context as EguiContext;
use glam::Vec2;
use std::path::PathBuf;
use std::sync::Arc;
use surface_assets::{DemoTextures, DirSource, TextureLoader};
use surface_input::{PointerButton, PointerTracker};
use surface_render::{OrbitControls, PerspectiveCamera, Viewport, apply_resize};
use surface_render_wgpu::WgpuRenderer;
use surface_scene::{Clock, DemoScene, FrameLoop, FrameStamp, Material, MaterialKind, demo};
use surface_tools::DebugPanel;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "surface-desktop", about = "Material showcase on three primitives")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Material model (overrides the config file)
    #[arg(long)]
    material: Option<MaterialKind>,

    /// Asset root directory (overrides the config file)
    #[arg(long)]
    assets: Option<PathBuf>,
}

/// Scene-side state: everything the frame loop touches except the GPU.
struct AppState {
    demo: DemoScene,
    textures: DemoTextures,
    loader: TextureLoader,
    frame_loop: FrameLoop,
    last_frame: Option<FrameStamp>,
    camera: PerspectiveCamera,
    controls: OrbitControls,
    viewport: Viewport,
    pointer: PointerTracker,
    panel: DebugPanel,
    material_config: MaterialConfig,
    /// Last metalness and roughness of the standard model, restored when
    /// switching back to it.
    standard_scalars: (f32, f32),
}

impl AppState {
    fn new(config: &DemoConfig) -> Self {
        let mut loader = TextureLoader::new(DirSource::new(&config.assets));
        let textures = DemoTextures::request(&mut loader, &config.textures);

        // Clamped through the material setters.
        let tuned = Material::standard(config.material.metalness, config.material.roughness);
        let standard_scalars = (tuned.metalness(), tuned.roughness());

        let mut initial = demo::material(config.material.kind, &textures);
        if config.material.kind == MaterialKind::Standard {
            initial.set_metalness(standard_scalars.0);
            initial.set_roughness(standard_scalars.1);
        }
        config.material.apply_overrides(&mut initial);
        let demo = DemoScene::build(initial);

        let viewport = Viewport::new(config.window.width, config.window.height, 1.0);
        let mut camera = PerspectiveCamera::new(config.camera.fov, viewport.aspect(), 0.1, 100.0);
        camera.position = config.camera.position();

        let controls =
            OrbitControls::with_damping(config.camera.damping, config.camera.damping_factor);

        Self {
            demo,
            textures,
            loader,
            frame_loop: FrameLoop::new(Clock::system()),
            last_frame: None,
            camera,
            controls,
            viewport,
            pointer: PointerTracker::new(),
            panel: DebugPanel::material_panel(),
            material_config: config.material.clone(),
            standard_scalars,
        }
    }

    /// Animate, then move the camera. The draw follows.
    fn update(&mut self) {
        self.last_frame = Some(self.frame_loop.advance(&mut self.demo.scene));
        self.controls.update(&mut self.camera);
    }

    /// Resize handler. Returns the surface size, which uses the capped pixel ratio.
    fn resize(&mut self, physical: PhysicalSize<u32>, scale_factor: f64) -> (u32, u32) {
        let logical = Viewport::from_physical(physical.width, physical.height, scale_factor);
        apply_resize(
            &mut self.viewport,
            &mut self.camera,
            logical.width(),
            logical.height(),
            scale_factor,
        );
        self.viewport.physical_size()
    }

    /// Surface pixels per egui point. egui lays out in logical points, and the
    /// surface holds `pixel_ratio` pixels per point once the ratio is capped.
    fn ui_pixels_per_point(&self) -> f32 {
        self.viewport.pixel_ratio() as f32
    }

    fn pointer_button(&mut self, button: MouseButton, pressed: bool) {
        let button = match button {
            MouseButton::Left => PointerButton::Primary,
            MouseButton::Right => PointerButton::Secondary,
            MouseButton::Middle => PointerButton::Middle,
            _ => return,
        };
        self.pointer.button(button, pressed);
    }

    fn pointer_moved(&mut self, logical: Vec2) {
        if let Some(action) = self.pointer.moved(logical) {
            self.controls
                .handle(action, &self.camera, self.viewport.height() as f32);
        }
    }

    fn scrolled(&mut self, delta: MouseScrollDelta) {
        let lines = match delta {
            MouseScrollDelta::LineDelta(_, y) => y,
            MouseScrollDelta::PixelDelta(p) => p.y as f32 / 40.0,
        };
        if let Some(action) = self.pointer.scrolled(lines) {
            self.controls
                .handle(action, &self.camera, self.viewport.height() as f32);
        }
    }

    fn handle_key(&mut self, key: KeyCode, pressed: bool) {
        if !pressed {
            return;
        }
        if key == KeyCode::F1 {
            self.panel.visible = !self.panel.visible;
        }
    }

    fn switch_material(&mut self, kind: MaterialKind) {
        let current = self.demo.material();
        if current.kind == MaterialKind::Standard {
            self.standard_scalars = (current.metalness(), current.roughness());
        }
        let mut material = demo::material(kind, &self.textures);
        if kind == MaterialKind::Standard {
            material.set_metalness(self.standard_scalars.0);
            material.set_roughness(self.standard_scalars.1);
        }
        self.material_config.apply_overrides(&mut material);
        *self.demo.material_mut() = material;
        tracing::info!("material switched to {kind}");
    }

    fn draw_ui(&mut self, ctx: &EguiContext, uploaded: usize) {
        if !self.panel.visible {
            return;
        }

        let mut switch_to = None;
        egui::Window::new("Debug")
            .default_width(260.0)
            .resizable(false)
            .show(ctx, |ui| {
                let kind = self.demo.material().kind;
                egui::ComboBox::from_label("model")
                    .selected_text(kind.name())
                    .show_ui(ui, |ui| {
                        for candidate in MaterialKind::ALL {
                            if ui
                                .selectable_label(candidate == kind, candidate.name())
                                .clicked()
                                && candidate != kind
                            {
                                switch_to = Some(candidate);
                            }
                        }
                    });
                ui.separator();

                let material = self.demo.material_mut();
                for (field, binding) in self.panel.bindings() {
                    let mut value = self.panel.get(material, field);
                    let slider = egui::Slider::new(&mut value, binding.min..=binding.max)
                        .step_by(binding.step as f64)
                        .fixed_decimals(binding.decimals())
                        .text(binding.label.as_str());
                    if ui.add(slider).changed() {
                        self.panel.set(material, field, value);
                    }
                }

                ui.separator();
                if let Some(stamp) = self.last_frame {
                    ui.label(format!("Frame {}  t={:.2}s", stamp.index, stamp.elapsed));
                }
                ui.label(format!(
                    "Textures: {} requested, {uploaded} on GPU",
                    self.loader.len()
                ));
                ui.label(format!(
                    "Camera: ({:.2}, {:.2}, {:.2})",
                    self.camera.position.x, self.camera.position.y, self.camera.position.z
                ));
                ui.separator();
                ui.small("F1: Toggle Panel | LMB: Orbit | RMB: Pan | Wheel: Zoom");
            });

        if let Some(kind) = switch_to {
            self.switch_material(kind);
        }
    }
}

/// Window, surface and GPU resources, created once the event loop resumes.
struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: WgpuRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl Gpu {
    fn new(
        event_loop: &ActiveEventLoop,
        egui_ctx: &EguiContext,
        window_config: &config::WindowConfig,
    ) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title(window_config.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(
                window_config.width,
                window_config.height,
            ));
        let window = Arc::new(event_loop.create_window(attrs).context("create window")?);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("no compatible GPU adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("surface_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("create device")?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .context("surface reports no formats")?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer =
            WgpuRenderer::new(&device, &queue, surface_format, config.width, config.height);

        let egui_winit = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            renderer,
            egui_winit,
            egui_renderer,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.config.width = width.max(1);
        self.config.height = height.max(1);
        self.surface.configure(&self.device, &self.config);
        self.renderer
            .resize(&self.device, self.config.width, self.config.height);
    }

    /// Draw the scene, then the debug panel on top, then present.
    fn render(&mut self, state: &mut AppState, egui_ctx: &EguiContext) {
        let output = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.renderer.render(
            &self.device,
            &self.queue,
            &view,
            &state.camera,
            &state.demo.scene,
        );

        let uploaded = self.renderer.uploaded_textures();
        let pixels_per_point = state.ui_pixels_per_point();
        let raw_input = self.egui_winit.take_egui_input(&self.window);
        let full_output = egui_ctx.run(raw_input, |ctx| {
            state.draw_ui(ctx, uploaded);
        });

        self.egui_winit
            .handle_platform_output(&self.window, full_output.platform_output);

        // egui_winit reports the uncapped display scale; map the overlay onto
        // the capped surface instead so points still match the pointer.
        let paint_jobs = egui_ctx.tessellate(full_output.shapes, pixels_per_point);

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, image_delta);
        }
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            self.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        self.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        output.present();
    }
}

struct GpuApp {
    state: AppState,
    window_config: config::WindowConfig,
    gpu: Option<Gpu>,
    egui_ctx: EguiContext,
}

impl GpuApp {
    fn new(config: &DemoConfig) -> Self {
        Self {
            state: AppState::new(config),
            window_config: config.window.clone(),
            gpu: None,
            egui_ctx: EguiContext::default(),
        }
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }

        match Gpu::new(event_loop, &self.egui_ctx, &self.window_config) {
            Ok(mut gpu) => {
                let size = gpu.window.inner_size();
                let (w, h) = self.state.resize(size, gpu.window.scale_factor());
                gpu.resize(w, h);
                gpu.window.request_redraw();
                self.gpu = Some(gpu);
            }
            Err(e) => {
                tracing::error!("failed to start renderer: {e:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(gpu) = &mut self.gpu else {
            return;
        };

        let response = gpu.egui_winit.on_window_event(&gpu.window, &event);
        if response.consumed {
            if matches!(event, WindowEvent::MouseInput { .. }) {
                self.state.pointer.reset();
            }
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                let (w, h) = self.state.resize(new_size, gpu.window.scale_factor());
                gpu.resize(w, h);
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                let (w, h) = self.state.resize(gpu.window.inner_size(), scale_factor);
                gpu.resize(w, h);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: key_state,
                        ..
                    },
                ..
            } => {
                self.state
                    .handle_key(key, key_state == ElementState::Pressed);
            }
            WindowEvent::MouseInput {
                button,
                state: btn_state,
                ..
            } => {
                self.state
                    .pointer_button(button, btn_state == ElementState::Pressed);
            }
            WindowEvent::CursorMoved { position, .. } => {
                let logical = position.to_logical::<f32>(gpu.window.scale_factor());
                self.state.pointer_moved(Vec2::new(logical.x, logical.y));
            }
            WindowEvent::CursorLeft { .. } => {
                self.state.pointer.reset();
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.state.scrolled(delta);
            }
            WindowEvent::RedrawRequested => {
                self.state.update();
                gpu.render(&mut self.state, &self.egui_ctx);
                gpu.window.request_redraw();
            }
            _ => {}
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let mut config = match &cli.config {
        Some(path) => DemoConfig::load(path)?,
        None => DemoConfig::default(),
    };
    if let Some(kind) = cli.material {
        config.material.kind = kind;
    }
    if let Some(assets) = cli.assets {
        config.assets = assets;
    }

    tracing::info!(
        "surface-desktop starting: {} material, assets from {}",
        config.material.kind,
        config.assets.display()
    );

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = GpuApp::new(&config);
    event_loop.run_app(&mut app)?;

    Ok(())
}
