//=========================================================================
// Core Frame Loop
//
// Central coordinator for all engine subsystems running on the logic
// (non-platform) thread.
//
// Responsibilities:
// - Own the global systems (input, root entity) and the shared context
// - Receive platform events through the bounded crossbeam channel
// - Run Physics → State → Render once per frame at a fixed tick rate
// - Stop on window close, channel disconnect, exit request or error
//
// Notes:
// The loop runs independently from the platform layer. It can also be
// driven by hand through `tick`, which is how headless hosts and tests
// use it.
//
//=========================================================================

//=== Standard Library Imports ============================================
use std::thread;
use std::time::{Duration, Instant};

//=== External Crates =====================================================
use crossbeam_channel::Receiver;
use log::{debug, error, info};

//=== Module Declarations =================================================
pub mod behavior;
pub mod components;
pub mod entity;
pub mod error;
pub mod globals;
pub mod input;
pub mod logging;
pub mod platform_bridge;
pub mod scene;

#[cfg(test)]
pub(crate) mod test_support;

//=== Internal Modules ====================================================
use error::EngineResult;
use globals::{GlobalContext, GlobalSystems};
use input::InputEvent;
use platform_bridge::{EventCollector, PlatformEvent};

//=== TickControl =========================================================
//
// Control flow for the core update loop.
// Each tick signals either to continue or to terminate the loop.
//
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickControl {
    Continue,
    Exit,
}

//=== FrameLoop ===========================================================
//
// Owns the engine systems and context and advances them one frame at a
// time, either by hand (`tick`) or on a dedicated thread.
//
pub(crate) struct FrameLoop {
    systems: GlobalSystems,
    context: GlobalContext,
}

impl FrameLoop {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new() -> Self {
        Self {
            systems: GlobalSystems::new(),
            context: GlobalContext::new(),
        }
    }

    //--- Setup ------------------------------------------------------------

    pub(crate) fn init_systems<F>(&mut self, init_fn: F) -> EngineResult<()>
    where
        F: FnOnce(&mut GlobalSystems) -> EngineResult<()>,
    {
        init_fn(&mut self.systems)
    }

    pub(crate) fn systems(&self) -> &GlobalSystems {
        &self.systems
    }

    pub(crate) fn systems_mut(&mut self) -> &mut GlobalSystems {
        &mut self.systems
    }

    pub(crate) fn context(&self) -> &GlobalContext {
        &self.context
    }

    pub(crate) fn context_mut(&mut self) -> &mut GlobalContext {
        &mut self.context
    }

    /// Queues a batch of input events for the next tick.
    pub(crate) fn feed(&mut self, batch: Vec<InputEvent>) {
        if !batch.is_empty() {
            self.context.frame_events.push(batch);
        }
    }

    //--- tick() -----------------------------------------------------------
    //
    // Runs one full frame:
    //  1. Input batches → StateTracker and VirtualController
    //  2. Physics, State and Render over the root tree
    //  3. Advances the frame clock
    //
    pub(crate) fn tick(&mut self, dt: f32) -> EngineResult<TickControl> {
        self.systems.update(&mut self.context, dt)?;
        self.context.advance_clock(dt);

        if self.context.exit_requested() {
            debug!("Exit requested at frame {}", self.context.frame());
            return Ok(TickControl::Exit);
        }
        Ok(TickControl::Continue)
    }

    //--- spawn_core_thread() ---------------------------------------------
    //
    // Spawns the logic thread that ticks the engine at a fixed rate
    // (TPS - ticks per second).
    //
    // Each tick:
    //  1. Collects platform events
    //  2. Runs one frame with a fixed dt of 1 / TPS
    //  3. Sleeps to maintain fixed pacing
    //  4. Exits cleanly on shutdown, or returns the frame error
    //
    pub(crate) fn spawn_core_thread(
        mut self,
        receiver: Receiver<PlatformEvent>,
        tps: f64,
    ) -> thread::JoinHandle<EngineResult<()>> {
        let frame_duration = Duration::from_secs_f64(1.0 / tps);
        let dt = frame_duration.as_secs_f32();

        thread::spawn(move || {
            let mut collector = EventCollector::new(receiver);

            loop {
                let frame_start = Instant::now();

                //--- Step 1: Gather platform events ------------------------
                if collector.collect_frame() == TickControl::Exit {
                    info!("Core thread exiting: platform closed");
                    break;
                }
                for batch in collector.take_batches() {
                    self.feed(batch);
                }

                //--- Step 2: Run the frame ---------------------------------
                match self.tick(dt) {
                    Ok(TickControl::Continue) => {}
                    Ok(TickControl::Exit) => {
                        info!("Core thread exiting: exit requested");
                        break;
                    }
                    Err(err) => {
                        error!("Frame {} failed: {}", self.context.frame(), err);
                        self.context.request_exit();
                        return Err(err);
                    }
                }

                //--- Step 3: Maintain deterministic pacing ----------------
                let elapsed = frame_start.elapsed();
                if elapsed < frame_duration {
                    thread::sleep(frame_duration - elapsed);
                }
            }

            Ok(())
        })
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
