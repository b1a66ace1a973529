//=========================================================================
// Platform
//=========================================================================
//
// The winit side of the engine. Owns the window, translates OS input and
// ships it to the core thread once per redraw.
//
//   winit ─► InputTranslator ─► InputBuffer ─┐
//                                            │ RedrawRequested
//   core  ◄── PlatformEvent::Inputs ◄────────┘ (bounded channel)
//
// The platform learns about the running engine from the runtime registry
// when the window comes up. A raised exit flag closes the window at the
// next redraw. winit pins this to the thread that called `Engine::run`.
//
//=========================================================================

//=== Submodules ==========================================================

mod input_buffer;
mod translate;

//=== External Dependencies ===============================================

use std::sync::Arc;

use crossbeam_channel::Sender;
use log::{debug, error, info, trace, warn};
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowAttributes, WindowId},
};

//=== Internal Dependencies ===============================================

use crate::core::globals::{runtime, EngineStatus};
use crate::core::platform_bridge::{PlatformError, PlatformEvent};
use input_buffer::InputBuffer;
use translate::InputTranslator;

//=== WindowConfig ========================================================

/// Window parameters chosen on the engine builder.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct WindowConfig {
    pub(crate) title: String,
    pub(crate) size: (u32, u32),
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Hearth Engine".to_string(),
            size: (800, 600),
        }
    }
}

//=== FrameEnd ============================================================

/// What the event loop does after a redraw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameEnd {
    Continue,
    Close,
}

//=== Platform ============================================================

/// Main-thread window owner and input forwarder.
pub(crate) struct Platform {
    /// Created in `resumed`.
    window: Option<Window>,
    buffer: InputBuffer,
    sender: Sender<PlatformEvent>,
    translator: InputTranslator,
    config: WindowConfig,

    /// Running engine, looked up from the runtime registry.
    status: Option<Arc<EngineStatus>>,
}

impl Platform {
    pub(crate) fn new(sender: Sender<PlatformEvent>, config: WindowConfig) -> Self {
        info!(target: "platform", "Platform subsystem initialized");
        Self {
            window: None,
            buffer: InputBuffer::new(),
            sender,
            translator: InputTranslator::new(),
            config,
            status: None,
        }
    }

    /// Blocks in the winit event loop until the window closes.
    ///
    /// # Errors
    ///
    /// [`PlatformError`] if the event loop cannot be created or fails
    /// while running.
    pub(crate) fn run(mut self) -> Result<(), PlatformError> {
        debug!(target: "platform", "Starting winit event loop");

        let event_loop =
            EventLoop::new().map_err(|e| PlatformError::EventLoopCreation(e.to_string()))?;

        event_loop
            .run_app(&mut self)
            .map_err(|e| PlatformError::EventLoopExecution(e.to_string()))
    }

    //--- Engine Status ----------------------------------------------------

    fn attach_status(&mut self) {
        if self.status.is_some() {
            return;
        }
        match runtime::active() {
            Ok(status) => self.status = Some(status),
            Err(e) => warn!(target: "platform", "No running engine ({}), exit flag ignored", e),
        }
    }

    fn exit_requested(&self) -> bool {
        self.status.as_ref().is_some_and(|status| status.exit_requested())
    }

    //--- Frames -----------------------------------------------------------

    fn on_input(&mut self, event: &WindowEvent) {
        if let Some(input) = self.translator.translate(event) {
            self.buffer.push(input);
        }
    }

    /// Frame boundary: honors the exit flag or flushes buffered input.
    fn end_frame(&mut self) -> FrameEnd {
        if self.exit_requested() {
            info!(target: "platform", "Exit requested by core, closing window");
            return FrameEnd::Close;
        }

        let Some((discrete, continuous)) = self.buffer.drain() else {
            return FrameEnd::Continue;
        };
        let count = discrete.len() + continuous.len();
        trace!(target: "platform::input", "Flushing {} input events", count);

        if self.sender.send(PlatformEvent::Inputs { discrete, continuous }).is_err() {
            warn!(target: "platform::input", "Core thread gone, dropped {} events", count);
        }
        FrameEnd::Continue
    }

    /// Drops pending input, tells the core and leaves the event loop.
    fn close(&mut self, event_loop: &ActiveEventLoop) {
        self.buffer.clear();
        let _ = self.sender.send(PlatformEvent::WindowClosed);
        event_loop.exit();
    }
}

//=== Winit Integration ===================================================

impl ApplicationHandler for Platform {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        self.attach_status();
        if self.window.is_some() {
            return;
        }

        let (width, height) = self.config.size;
        let attrs = WindowAttributes::default()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(width, height));

        match event_loop.create_window(attrs) {
            Ok(window) => {
                let size = window.inner_size();
                info!(target: "platform", "Window created: {}x{}", size.width, size.height);
                window.request_redraw();
                self.window = Some(window);
            }
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                self.close(event_loop);
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                self.close(event_loop);
            }
            WindowEvent::RedrawRequested => match self.end_frame() {
                FrameEnd::Close => self.close(event_loop),
                FrameEnd::Continue => {
                    if let Some(window) = &self.window {
                        window.request_redraw();
                    }
                }
            },
            other => self.on_input(&other),
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
