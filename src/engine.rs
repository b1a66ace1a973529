//=========================================================================
// Hearth Engine
//
// Main entry point and coordinator for the engine.
//
// Architecture:
// ```text
//     EngineBuilder  ──build()──>  Engine  ──run()──>  [Runtime]
//         │                          │
//         ├─ with_tps()              ├─ init(): register scenes
//         ├─ with_channel_capacity() ├─ tick(): one headless frame
//         ├─ with_window_title()     └─ run(): spawns core thread,
//         └─ with_window_size()                runs platform,
//                                              blocks until exit
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;
use std::thread::JoinHandle;

use crossbeam_channel::{bounded, Receiver, Sender};
use log::{error, info};

//=== Internal Dependencies ===============================================

use crate::core::error::{EngineError, EngineResult};
use crate::core::globals::{runtime, GlobalContext, GlobalSystems};
use crate::core::input::InputEvent;
use crate::core::platform_bridge::PlatformEvent;
use crate::core::{FrameLoop, TickControl};
use crate::platform::{Platform, WindowConfig};

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// # Default Values
///
/// - **TPS**: 60.0 (logic updates per second)
/// - **Channel capacity**: 128 events
/// - **Window**: "Hearth Engine", 800x600
///
/// # Examples
///
/// ```no_run
/// use hearth_engine::prelude::*;
///
/// fn main() -> EngineResult<()> {
///     EngineBuilder::new()
///         .with_tps(120.0)
///         .with_window_title("Walker")
///         .build()
///         .init(|systems| {
///             systems.scenes()?.register_default("field", || Scene::new("field"));
///             Ok(())
///         })?
///         .run()
/// }
/// ```
pub struct EngineBuilder {
    tps: f64,
    channel_capacity: usize,
    window: WindowConfig,
}

impl EngineBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            tps: 60.0,
            channel_capacity: 128,
            window: WindowConfig::default(),
        }
    }

    /// Sets the target ticks per second for the logic thread.
    ///
    /// The core thread runs every frame with a fixed `dt` of `1 / tps`.
    ///
    /// Default: 60.0
    ///
    /// # Panics
    ///
    /// Panics if `tps <= 0.0`.
    pub fn with_tps(mut self, tps: f64) -> Self {
        assert!(tps > 0.0, "TPS must be positive, got {}", tps);
        self.tps = tps;
        self
    }

    /// Sets the channel capacity for platform → core communication.
    ///
    /// Larger values absorb frame spikes; when the channel is full the
    /// platform thread waits for the core thread to catch up.
    ///
    /// Default: 128
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.channel_capacity = capacity;
        self
    }

    /// Sets the window title. Default: "Hearth Engine".
    pub fn with_window_title(mut self, title: impl Into<String>) -> Self {
        self.window.title = title.into();
        self
    }

    /// Sets the logical window size.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        assert!(
            width > 0 && height > 0,
            "Window size must be positive, got {}x{}",
            width,
            height
        );
        self.window.size = (width, height);
        self
    }

    /// Builds the engine instance.
    ///
    /// Call [`Engine::init`] to register scenes and engine-wide
    /// components before running.
    pub fn build(self) -> Engine {
        info!(
            "Building engine (TPS: {}, channel: {}, window: {}x{})",
            self.tps, self.channel_capacity, self.window.size.0, self.window.size.1
        );

        Engine {
            frame_loop: FrameLoop::new(),
            tps: self.tps,
            channel_capacity: self.channel_capacity,
            window: self.window,
        }
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Engine ==============================================================

/// Hearth Engine runtime.
///
/// Create via [`EngineBuilder`]. Drive it with [`Engine::run`] for a
/// windowed application or with [`Engine::tick`] headlessly.
///
/// # Architecture
///
/// ```text
/// Engine (Main Thread)
///   ├─► FrameLoop (Logic Thread @ TPS)
///   │     └─► InputSystem → Physics → State → Render
///   │
///   └─► Platform (Event Loop)
///         └─► Window, Input Polling
///
/// Communication: bounded channel (PlatformEvent)
/// ```
pub struct Engine {
    frame_loop: FrameLoop,
    tps: f64,
    channel_capacity: usize,
    window: WindowConfig,
}

impl Engine {
    //--- Initialization ---------------------------------------------------

    /// Configures engine systems before execution.
    ///
    /// The closure receives [`GlobalSystems`]: register scenes on the
    /// root scene manager, attach engine-wide components to the root
    /// entity, or adjust input bindings.
    ///
    /// # Errors
    ///
    /// Propagates the closure's error.
    pub fn init<F>(mut self, init_fn: F) -> EngineResult<Self>
    where
        F: FnOnce(&mut GlobalSystems) -> EngineResult<()>,
    {
        info!("Initializing engine systems");

        self.frame_loop.init_systems(init_fn)?;

        info!("Engine initialization complete");
        Ok(self)
    }

    //--- Access -----------------------------------------------------------

    pub fn systems(&self) -> &GlobalSystems {
        self.frame_loop.systems()
    }

    pub fn systems_mut(&mut self) -> &mut GlobalSystems {
        self.frame_loop.systems_mut()
    }

    pub fn context(&self) -> &GlobalContext {
        self.frame_loop.context()
    }

    pub fn context_mut(&mut self) -> &mut GlobalContext {
        self.frame_loop.context_mut()
    }

    pub fn tps(&self) -> f64 {
        self.tps
    }

    //--- Headless Execution -----------------------------------------------

    /// Queues input events for the next [`Engine::tick`].
    pub fn feed_input(&mut self, events: Vec<InputEvent>) {
        self.frame_loop.feed(events);
    }

    /// Runs exactly one frame: input, physics, state, render.
    ///
    /// # Errors
    ///
    /// Any [`EngineError`] raised by a component during the frame.
    pub fn tick(&mut self, dt: f32) -> EngineResult<TickControl> {
        self.frame_loop.tick(dt)
    }

    //--- Execution --------------------------------------------------------

    /// Starts the engine runtime and blocks until the application exits.
    ///
    /// # Lifecycle
    ///
    /// 1. Registers the engine as the running instance
    /// 2. Creates the bounded channel for platform → core communication
    /// 3. Spawns the logic thread running at the configured TPS
    /// 4. Runs the platform event loop (blocks here)
    /// 5. On window close: platform sends `WindowClosed` → logic thread stops
    ///
    /// # Errors
    ///
    /// - [`EngineError::AlreadyRunning`] if another engine is running
    /// - [`EngineError::Platform`] if the event loop fails
    /// - [`EngineError::CoreThreadPanicked`] if the logic thread panics
    /// - the first frame error raised on the logic thread
    pub fn run(self) -> EngineResult<()> {
        info!("Starting engine runtime (TPS: {})", self.tps);

        runtime::install(self.frame_loop.context().status().clone())?;

        //--- 1. Create communication channel -----------------------------
        let (tx, rx): (Sender<PlatformEvent>, Receiver<PlatformEvent>) =
            bounded(self.channel_capacity);

        info!("Channel created (capacity: {})", self.channel_capacity);

        //--- 2. Spawn the core logic thread -------------------------------
        let core_handle = self.frame_loop.spawn_core_thread(rx, self.tps);
        info!("Core logic thread spawned");

        //--- 3. Launch the platform subsystem -----------------------------
        let platform = Platform::new(tx, self.window);
        info!("Platform initialized, entering event loop");

        let platform_result = platform.run();
        if let Err(e) = &platform_result {
            error!("Platform error: {}", e);
        }

        info!("Platform event loop exited");

        //--- 4. Cleanup: Wait for logic thread to terminate --------------
        let core_result = join_core(core_handle);

        runtime::shutdown();
        info!("Engine shutdown complete");

        platform_result?;
        core_result
    }
}

//=== Core Thread Join ====================================================

/// Waits for the core thread and turns a panic into an error.
fn join_core(handle: JoinHandle<EngineResult<()>>) -> EngineResult<()> {
    match handle.join() {
        Ok(result) => {
            info!("Core thread terminated");
            result
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            error!("Core thread panicked: {}", message);
            Err(EngineError::CoreThreadPanicked(message))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::KeyCode;
    use crate::core::scene::Scene;
    use crate::core::test_support::{Journal, Recorder};

    //=====================================================================
    // EngineBuilder Tests
    //=====================================================================

    #[test]
    fn builder_defaults() {
        let builder = EngineBuilder::new();
        assert_eq!(builder.tps, 60.0);
        assert_eq!(builder.channel_capacity, 128);
        assert_eq!(builder.window, WindowConfig::default());
    }

    #[test]
    fn builder_with_tps() {
        let builder = EngineBuilder::new().with_tps(120.0);
        assert_eq!(builder.tps, 120.0);
    }

    #[test]
    #[should_panic(expected = "TPS must be positive")]
    fn builder_with_tps_panics_on_zero() {
        EngineBuilder::new().with_tps(0.0);
    }

    #[test]
    #[should_panic(expected = "TPS must be positive")]
    fn builder_with_tps_panics_on_negative() {
        EngineBuilder::new().with_tps(-60.0);
    }

    #[test]
    fn builder_with_channel_capacity() {
        let builder = EngineBuilder::new().with_channel_capacity(256);
        assert_eq!(builder.channel_capacity, 256);
    }

    #[test]
    #[should_panic(expected = "Channel capacity must be positive")]
    fn builder_with_channel_capacity_panics_on_zero() {
        EngineBuilder::new().with_channel_capacity(0);
    }

    #[test]
    fn builder_with_window() {
        let builder = EngineBuilder::new()
            .with_window_title("Walker")
            .with_window_size(1280, 720);
        assert_eq!(builder.window.title, "Walker");
        assert_eq!(builder.window.size, (1280, 720));
    }

    #[test]
    #[should_panic(expected = "Window size must be positive")]
    fn builder_with_window_size_panics_on_zero() {
        EngineBuilder::new().with_window_size(0, 600);
    }

    #[test]
    fn builder_fluent_api_chaining() {
        let engine = EngineBuilder::new()
            .with_tps(120.0)
            .with_channel_capacity(256)
            .build();

        assert_eq!(engine.tps(), 120.0);
        assert_eq!(engine.channel_capacity, 256);
    }

    //=====================================================================
    // Engine Tests
    //=====================================================================

    #[test]
    fn init_propagates_errors() {
        let result = EngineBuilder::new()
            .build()
            .init(|_| Err(EngineError::Asset("missing atlas".to_string())));

        assert!(matches!(result, Err(EngineError::Asset(_))));
    }

    #[test]
    fn headless_scene_switch() {
        let journal = Journal::new();
        let (menu_journal, field_journal) = (journal.clone(), journal.clone());

        let mut engine = EngineBuilder::new()
            .build()
            .init(move |systems| {
                let scenes = systems.scenes()?;
                scenes.register_default("menu", move || {
                    let mut scene = Scene::new("menu");
                    scene.add_component(Recorder::new("menu", &menu_journal));
                    scene
                });
                scenes.register_scene("field", move || {
                    let mut scene = Scene::new("field");
                    scene.add_component(Recorder::new("field", &field_journal));
                    scene
                });
                Ok(())
            })
            .unwrap();

        engine.tick(0.016).unwrap();
        engine.context_mut().request_scene("field");
        engine.tick(0.016).unwrap();
        engine.tick(0.016).unwrap();

        assert_eq!(
            journal.entries(),
            vec![
                "menu.init",
                "menu.render",
                "menu.physics",
                "menu.state",
                "field.init",
                "field.render",
                "field.physics",
                "field.state",
                "field.render",
            ]
        );
        let current = engine.systems_mut().scenes().unwrap().current_id().cloned();
        assert_eq!(current.map(|id| id.to_string()), Some("field".to_string()));
    }

    #[test]
    fn headless_input_reaches_context() {
        let mut engine = EngineBuilder::new().build();

        engine.feed_input(vec![InputEvent::key_down(KeyCode::Space)]);
        engine.tick(0.016).unwrap();

        assert!(engine.context().input.is_key_pressed(KeyCode::Space));
        assert!(engine.context().controller.primary_pressed());
    }

    #[test]
    fn core_thread_panic_is_reported() {
        let handle = std::thread::spawn(|| -> EngineResult<()> { panic!("frame {} exploded", 7) });

        let err = join_core(handle).unwrap_err();
        assert!(matches!(&err, EngineError::CoreThreadPanicked(msg) if msg == "frame 7 exploded"));
    }

    #[test]
    fn core_thread_result_passes_through() {
        let handle = std::thread::spawn(|| -> EngineResult<()> { Err(EngineError::NotRunning) });
        assert!(matches!(join_core(handle), Err(EngineError::NotRunning)));
    }

    #[test]
    fn tick_reports_exit_request() {
        let mut engine = EngineBuilder::new().build();
        engine.context_mut().request_exit();

        assert_eq!(engine.tick(0.016).unwrap(), TickControl::Exit);
    }
}
