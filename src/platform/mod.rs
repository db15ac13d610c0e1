//! Platform glue
//!
//! Adapts the pipeline's collaborator seams to winit and softbuffer: the
//! event-loop proxy carries the frame-ready tag pushed from the producer
//! thread, and a softbuffer surface is the visible display surface. Window
//! lifecycle stays here; the core never touches it.

use std::num::NonZeroU32;
use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop, EventLoopProxy};
use winit::window::{Window, WindowId};

use crate::error::{PresentError, SetupError};
use crate::pipeline::{DisplayEvent, DisplaySurface, FrameBuffer, FrameSink, Presenter};

/// The one custom event tag registered with the event loop.
#[derive(Debug, Clone, Copy)]
pub struct FrameReady;

pub fn create_event_loop() -> Result<EventLoop<FrameReady>, SetupError> {
    EventLoop::<FrameReady>::with_user_event()
        .build()
        .map_err(|e| SetupError::Window(e.to_string()))
}

/// Frame-ready notifications routed through the event-loop proxy. Reports the
/// consumer as gone once the loop has shut down.
pub struct ProxySink(EventLoopProxy<FrameReady>);

impl ProxySink {
    pub fn new(event_loop: &EventLoop<FrameReady>) -> Self {
        Self(event_loop.create_proxy())
    }
}

impl FrameSink for ProxySink {
    fn frame_ready(&self) -> bool {
        self.0.send_event(FrameReady).is_ok()
    }
}

/// softbuffer-backed display surface. Created once per window; the underlying
/// buffer keeps the window's fixed size for the whole run.
pub struct WindowDisplay {
    surface: softbuffer::Surface<Arc<Window>, Arc<Window>>,
}

impl WindowDisplay {
    fn new(window: Arc<Window>) -> Result<Self, SetupError> {
        let context = softbuffer::Context::new(window.clone())
            .map_err(|e| SetupError::Surface(e.to_string()))?;
        let mut surface = softbuffer::Surface::new(&context, window.clone())
            .map_err(|e| SetupError::Surface(e.to_string()))?;

        let size = window.inner_size();
        let (Some(width), Some(height)) =
            (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
        else {
            return Err(SetupError::Surface("zero-sized window".into()));
        };
        surface
            .resize(width, height)
            .map_err(|e| SetupError::Surface(e.to_string()))?;
        Ok(Self { surface })
    }
}

impl DisplaySurface for WindowDisplay {
    fn present(&mut self, pixels: &[u32]) -> Result<(), PresentError> {
        let mut buffer = self
            .surface
            .buffer_mut()
            .map_err(|e| PresentError(e.to_string()))?;
        let n = buffer.len().min(pixels.len());
        buffer[..n].copy_from_slice(&pixels[..n]);
        buffer.present().map_err(|e| PresentError(e.to_string()))
    }
}

/// winit application: owns the window and forwards events into the presenter.
pub struct DotfieldApp {
    title: String,
    size: u32,
    frames: Arc<FrameBuffer>,
    presenter: Option<Presenter<WindowDisplay>>,
    setup_error: Option<SetupError>,
}

impl DotfieldApp {
    pub fn new(title: String, size: u32, frames: Arc<FrameBuffer>) -> Self {
        Self {
            title,
            size,
            frames,
            presenter: None,
            setup_error: None,
        }
    }

    /// Fatal setup failure captured during `resumed`, if any.
    pub fn take_setup_error(&mut self) -> Option<SetupError> {
        self.setup_error.take()
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: SetupError) {
        self.setup_error = Some(err);
        event_loop.exit();
    }
}

impl ApplicationHandler<FrameReady> for DotfieldApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.presenter.is_some() {
            return;
        }
        event_loop.set_control_flow(ControlFlow::Wait);

        let attrs = Window::default_attributes()
            .with_title(self.title.as_str())
            .with_inner_size(PhysicalSize::new(self.size, self.size))
            .with_resizable(false);
        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(err) => return self.fail(event_loop, SetupError::Window(err.to_string())),
        };
        match WindowDisplay::new(window) {
            Ok(display) => {
                self.presenter = Some(Presenter::new(display, Arc::clone(&self.frames)));
            }
            Err(err) => self.fail(event_loop, err),
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, _event: FrameReady) {
        if let Some(presenter) = &mut self.presenter
            && !presenter.handle(DisplayEvent::FrameReady)
        {
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                if let Some(presenter) = &mut self.presenter {
                    presenter.handle(DisplayEvent::Quit);
                }
                event_loop.exit();
            }
            // Redraws happen on frame-ready only; everything else is ignored.
            _ => {
                if let Some(presenter) = &mut self.presenter {
                    presenter.handle(DisplayEvent::Other);
                }
            }
        }
    }
}
