//! Standalone window that drives the ray tracer from the display's refresh.
//!
//! ```no_run
//! # use orbitrace::Viewer;
//! Viewer::builder()
//!     .with_title("Orbitrace")
//!     .build()
//!     .run()
//!     .unwrap();
//! ```

use std::{sync::Arc, time::Instant};

use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::{
    error::TraceError,
    gpu::{
        kernel::{query_hints, ComputeKernel},
        render_context::RenderContext,
        shader_composer::ShaderComposer,
        wgpu_backend::WgpuBackend,
    },
    options::Options,
    renderer::{FrameOutcome, Renderer},
    util::frame_timing::FrameTiming,
};

// ── Builder ──────────────────────────────────────────────────────────────

/// Fluent builder for [`Viewer`].
pub struct ViewerBuilder {
    options: Options,
    title: Option<String>,
}

impl ViewerBuilder {
    fn new() -> Self {
        Self {
            options: Options::default(),
            title: None,
        }
    }

    /// Override the default options.
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Set the window title, taking precedence over `display.title`.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Consume the builder and produce a [`Viewer`].
    #[must_use]
    pub fn build(self) -> Viewer {
        let title = self
            .title
            .unwrap_or_else(|| self.options.display.title.clone());
        Viewer {
            options: self.options,
            title,
        }
    }
}

// ── Viewer ───────────────────────────────────────────────────────────────

/// A window presenting one traced frame per refresh tick.
///
/// Construct via [`Viewer::builder`], then call [`run`](Self::run) to
/// enter the event loop.
pub struct Viewer {
    options: Options,
    title: String,
}

impl Viewer {
    /// Start a new builder.
    #[must_use]
    pub fn builder() -> ViewerBuilder {
        ViewerBuilder::new()
    }

    /// Open the window and run the event loop. Blocks until the window is
    /// closed.
    ///
    /// # Errors
    ///
    /// Event loop failures, or the first fatal renderer error.
    pub fn run(self) -> Result<(), TraceError> {
        let event_loop =
            EventLoop::new().map_err(|e| TraceError::Viewer(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = ViewerApp {
            window: None,
            gpu: None,
            timing: FrameTiming::new(self.options.display.max_fps),
            options: self.options,
            title: self.title,
            error: None,
        };

        event_loop
            .run_app(&mut app)
            .map_err(|e| TraceError::Viewer(e.to_string()))?;

        log::info!(
            "viewer closed after {} frames ({:.1} fps)",
            app.timing.frames(),
            app.timing.fps()
        );
        app.error.map_or(Ok(()), Err)
    }
}

// ── Winit app ────────────────────────────────────────────────────────────

/// GPU state created once the window exists.
struct GpuState {
    context: RenderContext,
    backend: WgpuBackend,
    renderer: Renderer<WgpuBackend>,
}

impl GpuState {
    fn new(window: Arc<Window>, options: &Options) -> Result<Self, TraceError> {
        let inner = window.inner_size();
        let context = pollster::block_on(RenderContext::new(
            window,
            (inner.width, inner.height),
            options.display.vsync,
        ))?;

        let mut composer = ShaderComposer::new()?;
        let hints = query_hints(
            context.adapter_info.vendor,
            &context.device.limits(),
            &options.kernel,
        );
        let kernel = ComputeKernel::load(&context.device, &mut composer, hints)?;
        let mut backend = WgpuBackend::new(&context, &mut composer)?;
        let renderer = Renderer::new(&mut backend, kernel, options)?;

        Ok(Self {
            context,
            backend,
            renderer,
        })
    }
}

/// Internal winit application handler.
struct ViewerApp {
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    timing: FrameTiming,
    options: Options,
    title: String,
    error: Option<TraceError>,
}

impl ViewerApp {
    fn fail(&mut self, event_loop: &ActiveEventLoop, error: TraceError) {
        log::error!("{error}");
        self.error = Some(error);
        event_loop.exit();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(gpu) = &mut self.gpu else {
            return;
        };
        match gpu
            .renderer
            .render_frame(&mut gpu.backend, &mut gpu.context)
        {
            Ok(FrameOutcome::Presented { .. }) => self.timing.end_frame(),
            Ok(FrameOutcome::Skipped(_)) => {}
            Err(e) => self.fail(event_loop, e),
        }
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes().with_title(&self.title);
        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                self.fail(event_loop, TraceError::Viewer(e.to_string()));
                return;
            }
        };

        match GpuState::new(window.clone(), &self.options) {
            Ok(gpu) => self.gpu = Some(gpu),
            Err(e) => {
                self.fail(event_loop, e);
                return;
            }
        }

        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.context.resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => (),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(window) = &self.window else {
            return;
        };
        if self.timing.should_render() {
            event_loop.set_control_flow(ControlFlow::Poll);
            window.request_redraw();
        } else {
            event_loop.set_control_flow(ControlFlow::WaitUntil(
                Instant::now() + self.timing.time_until_next(),
            ));
        }
    }
}
