//! The viewer application: window, event loop, and the load pipeline.

use std::sync::Arc;

use cgmath::{Deg, Vector3, Zero};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop, EventLoopProxy},
    window::{Window, WindowAttributes},
};

use crate::config::{ReplacePolicy, ViewerConfig};
use crate::gfx::{
    camera::{
        camera_controller::CameraController, camera_utils::CameraManager,
        orbit_camera::OrbitCamera,
    },
    framing::frame_model,
    rendering::render_engine::RenderEngine,
    scene::{Model, Scene},
};
use crate::loader::{parse_obj, ModelSource, SourceError};
use crate::ui::{control_panel, UiManager, ViewerCommand};

/// Events delivered back to the event loop from worker threads.
#[derive(Debug)]
pub enum ViewerEvent {
    /// A fetch finished, successfully or not. Parsing happens on the event
    /// loop thread so the scene swap stays synchronous.
    SourceLoaded(Result<String, SourceError>),
}

/// The viewer. Construct with a [`ViewerConfig`], point it at a
/// [`ModelSource`], then [`run`](ViewerApp::run).
pub struct ViewerApp {
    event_loop: Option<EventLoop<ViewerEvent>>,
    app_state: AppState,
}

struct AppState {
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    ui_manager: Option<UiManager>,
    scene: Scene,
    config: ViewerConfig,
    source: Option<ModelSource>,
    proxy: EventLoopProxy<ViewerEvent>,
    load_in_flight: bool,
}

impl ViewerApp {
    pub fn new(config: ViewerConfig) -> Self {
        let event_loop = EventLoop::<ViewerEvent>::with_user_event()
            .build()
            .expect("Failed to create event loop");
        let proxy = event_loop.create_proxy();

        let mut camera = OrbitCamera::new(5.0, 0.0, 0.0, Vector3::zero(), 1.0);
        camera.fovy = Deg(config.fovy_degrees).into();
        let controller = CameraController::new(0.005, 0.1);
        let scene = Scene::new(CameraManager::new(camera, controller));

        Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                window: None,
                render_engine: None,
                ui_manager: None,
                scene,
                config,
                source: None,
                proxy,
                load_in_flight: false,
            },
        }
    }

    /// Sets the model source loaded at startup and by the Reload button.
    pub fn set_source(&mut self, source: ModelSource) {
        self.app_state.source = Some(source);
    }

    /// Runs the event loop until the window closes. Consumes the app.
    pub fn run(mut self) -> anyhow::Result<()> {
        let event_loop = self.event_loop.take().expect("Event loop already consumed");
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run_app(&mut self.app_state)?;
        Ok(())
    }
}

impl AppState {
    /// Starts a load from the configured source. With the eager replace
    /// policy the current model is detached up front, so a failed load
    /// leaves the viewport empty; with lazy it survives until a
    /// replacement parses.
    fn begin_load(&mut self) {
        if self.load_in_flight {
            log::debug!("load already in flight, ignoring request");
            return;
        }
        let Some(source) = self.source.clone() else {
            log::warn!("no model source configured");
            return;
        };

        if self.config.replace_policy == ReplacePolicy::Eager
            && self.scene.detach_model().is_some()
        {
            log::debug!("detached current model ahead of load (eager replace)");
        }

        log::info!("loading model from {source}");
        match source {
            ModelSource::Remote(_) => {
                self.load_in_flight = true;
                let proxy = self.proxy.clone();
                std::thread::spawn(move || {
                    let result = source.fetch();
                    // Fails only once the event loop is gone; the pending
                    // result is dropped with it.
                    let _ = proxy.send_event(ViewerEvent::SourceLoaded(result));
                });
            }
            ModelSource::Asset(_) => {
                let result = source.fetch();
                self.finish_load(result);
            }
        }
    }

    /// Second half of the load pipeline: parse, frame, upload, swap.
    /// Failures are logged and the scene keeps its prior state.
    fn finish_load(&mut self, result: Result<String, SourceError>) {
        self.load_in_flight = false;

        let raw = match result {
            Ok(raw) => raw,
            Err(error) => {
                log::error!("model source failed: {error}");
                return;
            }
        };
        let parts = match parse_obj(&raw) {
            Ok(parts) => parts,
            Err(error) => {
                log::error!("model parse failed: {error}");
                return;
            }
        };

        let mut model = Model::from_mesh_data(parts);
        frame_model(
            &mut model,
            &mut self.scene.camera_manager.camera,
            self.config.margin,
        );

        if let Some(render_engine) = self.render_engine.as_ref() {
            model.init_gpu_resources(
                render_engine.device(),
                render_engine.model_bind_group_layout(),
            );
        }

        log::info!(
            "loaded model \"{}\" ({} triangles)",
            model.name,
            model.triangle_count()
        );
        self.scene.attach_model(model);

        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }

    fn apply_command(&mut self, command: ViewerCommand) {
        match command {
            ViewerCommand::RotateX => self.scene.rotate_model_x(),
            ViewerCommand::RotateY => self.scene.rotate_model_y(),
            ViewerCommand::RotateZ => self.scene.rotate_model_z(),
            ViewerCommand::Reload => self.begin_load(),
        }
    }
}

impl ApplicationHandler<ViewerEvent> for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = WindowAttributes::default()
            .with_title(self.config.window_title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(1200, 800));
        let Ok(window) = event_loop.create_window(attributes) else {
            log::error!("failed to create window");
            event_loop.exit();
            return;
        };

        let window_handle = Arc::new(window);
        self.window = Some(window_handle.clone());

        let (width, height) = window_handle.inner_size().into();
        let background = self.config.background;

        let window_clone = window_handle.clone();
        let renderer = pollster::block_on(async move {
            RenderEngine::new(window_clone, width, height, background).await
        });

        let ui_manager = UiManager::new(
            renderer.device(),
            renderer.queue(),
            renderer.surface_format(),
            &window_handle,
        );

        self.ui_manager = Some(ui_manager);
        self.render_engine = Some(renderer);

        // Kick off the initial load now that GPU resources can be built.
        if self.source.is_some() {
            self.begin_load();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window.as_ref() else {
            return;
        };
        let window = window.clone();

        // UI gets first refusal on input.
        if let Some(ui_manager) = self.ui_manager.as_mut() {
            let ui_event: winit::event::Event<ViewerEvent> = winit::event::Event::WindowEvent {
                window_id,
                event: event.clone(),
            };
            if ui_manager.handle_input(&window, &ui_event) {
                window.request_redraw();
                return;
            }
        }

        match event {
            WindowEvent::KeyboardInput {
                event: key_event, ..
            } => {
                if matches!(
                    key_event.physical_key,
                    winit::keyboard::PhysicalKey::Code(winit::keyboard::KeyCode::Escape)
                ) {
                    event_loop.exit();
                    return;
                }
                self.scene.camera_manager.process_keyboard_event(&key_event);
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                // Minimized windows report zero; skip instead of
                // configuring a degenerate surface.
                if width == 0 || height == 0 {
                    return;
                }
                self.scene
                    .camera_manager
                    .camera
                    .resize_projection(width, height);
                if let Some(render_engine) = self.render_engine.as_mut() {
                    render_engine.resize(width, height);
                }
                if let Some(ui_manager) = self.ui_manager.as_mut() {
                    ui_manager.update_display_size(width, height);
                }
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                let Some(render_engine) = self.render_engine.as_mut() else {
                    return;
                };

                self.scene.camera_manager.update();
                self.scene.update();
                render_engine.update(self.scene.camera_manager.camera.uniform);
                self.scene.sync_transforms(render_engine.queue());

                let mut commands = Vec::new();
                if let Some(ui_manager) = self.ui_manager.as_mut() {
                    let scene = &self.scene;
                    render_engine.render_frame_with_ui(
                        scene,
                        |device, queue, encoder, color_attachment| {
                            ui_manager.draw(
                                device,
                                queue,
                                encoder,
                                &window,
                                color_attachment,
                                |ui| control_panel(ui, scene, &mut commands),
                            );
                        },
                    );
                } else {
                    render_engine.render_frame(&self.scene);
                }

                for command in commands {
                    self.apply_command(command);
                }
            }
            _ => (),
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: ViewerEvent) {
        match event {
            ViewerEvent::SourceLoaded(result) => self.finish_load(result),
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: winit::event::DeviceEvent,
    ) {
        let Some(window) = self.window.as_ref() else {
            return;
        };

        // Ignore camera input while the UI owns the pointer or keyboard.
        if let Some(ui_manager) = self.ui_manager.as_ref() {
            let io = ui_manager.context.io();
            if io.want_capture_mouse || io.want_capture_keyboard {
                return;
            }
        }

        self.scene.camera_manager.process_event(&event, window);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}
