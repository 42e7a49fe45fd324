use std::time::Duration;

use ouroboros::self_referencing;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowId};

use crate::config::EngineConfig;
use crate::coords::Viewport;
use crate::error::PlatformError;
use crate::input::platform::winit::translate_window_event;
use crate::input::InputEvent;

use super::{Gpu, GpuInit};

/// How long one pump may block while the window is still being created.
const INIT_PUMP_TIMEOUT: Duration = Duration::from_millis(16);

#[self_referencing]
pub(super) struct WindowSurface {
    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

/// winit callbacks. Events are buffered until the next poll.
struct WindowHandler {
    title: String,
    size: LogicalSize<f64>,
    gpu_init: GpuInit,

    surface: Option<WindowSurface>,
    pending: Vec<InputEvent>,
    close_requested: bool,
    init_error: Option<PlatformError>,
}

impl WindowHandler {
    fn new(config: &EngineConfig) -> Self {
        Self {
            title: config.title.clone(),
            size: LogicalSize::new(config.width as f64, config.height as f64),
            gpu_init: config.gpu.clone(),
            surface: None,
            pending: Vec::new(),
            close_requested: false,
            init_error: None,
        }
    }

    fn create_surface(&self, event_loop: &ActiveEventLoop) -> Result<WindowSurface, PlatformError> {
        let attrs = Window::default_attributes()
            .with_title(self.title.clone())
            .with_inner_size(self.size)
            .with_resizable(false);

        let window = event_loop
            .create_window(attrs)
            .map_err(|e| PlatformError::Window(e.to_string()))?;

        let gpu_init = self.gpu_init.clone();
        WindowSurfaceTryBuilder {
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .map_err(PlatformError::Gpu)
    }
}

impl ApplicationHandler for WindowHandler {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.surface.is_some() || self.init_error.is_some() {
            return;
        }
        match self.create_surface(event_loop) {
            Ok(surface) => {
                let id = surface.borrow_window().id();
                log::debug!("window {id:?} ready");
                self.surface = Some(surface);
            }
            Err(e) => {
                log::error!("{e}");
                self.init_error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Poll);
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };

        let scale = surface.borrow_window().scale_factor();
        if let Some(ev) = translate_window_event(scale, &event) {
            self.pending.push(ev);
        }

        match &event {
            WindowEvent::CloseRequested => {
                log::debug!("close requested");
                self.close_requested = true;
            }
            WindowEvent::Resized(new_size) => {
                surface.with_gpu_mut(|gpu| gpu.resize(*new_size));
            }
            WindowEvent::ScaleFactorChanged { .. } => {
                let new_size = surface.borrow_window().inner_size();
                surface.with_gpu_mut(|gpu| gpu.resize(new_size));
            }
            _ => {}
        }
    }
}

/// A desktop window driven by polling instead of a callback loop.
///
/// The caller owns the frame loop; winit is pumped once per poll with a zero
/// timeout.
pub(super) struct NativeWindow {
    // Declared first so the window drops before its event loop.
    handler: WindowHandler,
    event_loop: EventLoop<()>,
}

impl NativeWindow {
    /// Creates the window and its GPU surface, pumping until both exist.
    pub(super) fn open(config: &EngineConfig) -> Result<Self, PlatformError> {
        let mut event_loop = EventLoop::new()?;
        let mut handler = WindowHandler::new(config);

        loop {
            let status = event_loop.pump_app_events(Some(INIT_PUMP_TIMEOUT), &mut handler);
            if let Some(err) = handler.init_error.take() {
                return Err(err);
            }
            if handler.surface.is_some() {
                break;
            }
            if matches!(status, PumpStatus::Exit(_)) || handler.close_requested {
                return Err(PlatformError::ClosedDuringInit);
            }
        }

        log::info!("opened window \"{}\" ({}x{})", config.title, config.width, config.height);
        Ok(Self { handler, event_loop })
    }

    /// Runs pending platform callbacks and hands over the buffered input.
    pub(super) fn pump(&mut self) -> Vec<InputEvent> {
        if self.handler.surface.is_some() {
            let status = self
                .event_loop
                .pump_app_events(Some(Duration::ZERO), &mut self.handler);
            if let PumpStatus::Exit(code) = status {
                log::debug!("event loop exited with code {code}");
                self.handler.close_requested = true;
            }
        }
        std::mem::take(&mut self.handler.pending)
    }

    pub(super) fn close_requested(&self) -> bool {
        self.handler.close_requested
    }

    pub(super) fn is_open(&self) -> bool {
        self.handler.surface.is_some()
    }

    /// Logical inner size, or an empty viewport once closed.
    pub(super) fn viewport(&self) -> Viewport {
        let Some(surface) = self.handler.surface.as_ref() else {
            return Viewport::default();
        };
        let window = surface.borrow_window();
        let logical = window.inner_size().to_logical::<f32>(window.scale_factor());
        Viewport::new(logical.width, logical.height)
    }

    /// `true` while the drawable area has zero physical pixels (minimized).
    pub(super) fn is_minimized(&self) -> bool {
        self.handler.surface.as_ref().is_none_or(|s| {
            let size = s.borrow_gpu().size();
            size.width == 0 || size.height == 0
        })
    }

    pub(super) fn with_gpu<R>(&self, f: impl FnOnce(&Gpu<'_>) -> R) -> Option<R> {
        self.handler.surface.as_ref().map(|s| f(s.borrow_gpu()))
    }

    pub(super) fn with_gpu_mut<R>(&mut self, f: impl FnOnce(&mut Gpu<'_>) -> R) -> Option<R> {
        self.handler.surface.as_mut().map(|s| s.with_gpu_mut(|gpu| f(gpu)))
    }

    /// Destroys the surface and the window. The event loop stays alive but idle.
    pub(super) fn close(&mut self) {
        if self.handler.surface.take().is_some() {
            log::info!("window closed");
        }
        self.handler.close_requested = true;
        self.handler.pending.clear();
    }
}
