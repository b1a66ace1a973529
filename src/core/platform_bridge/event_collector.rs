//=========================================================================
// Event Collector
//=========================================================================
//
// Core-side platform event collection with bounded polling and shutdown
// detection.
//
// Architecture:
//   Receiver<PlatformEvent> → collect_frame() → input batches → TickControl
//
// Bounded polling keeps a flooded channel from starving the frame.
// Pacing is the frame loop's job, so an empty channel returns at once.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{Receiver, TryRecvError};
use log::warn;

//=== Internal Dependencies ===============================================

use super::PlatformEvent;
use crate::core::input::InputEvent;
use crate::core::TickControl;

/// Upper bound on channel messages handled in one frame.
const MAX_EVENTS_PER_FRAME: usize = 100;

//=== EventCollector ======================================================

/// Drains the platform channel once per frame.
pub(crate) struct EventCollector {
    receiver: Receiver<PlatformEvent>,
    input_batches: Vec<Vec<InputEvent>>,
}

impl EventCollector {
    pub(crate) fn new(receiver: Receiver<PlatformEvent>) -> Self {
        Self {
            receiver,
            input_batches: Vec::with_capacity(4),
        }
    }

    /// Collects pending platform events, up to the per-frame bound.
    ///
    /// Returns [`TickControl::Exit`] on `WindowClosed` or when the
    /// platform side hung up.
    pub(crate) fn collect_frame(&mut self) -> TickControl {
        self.input_batches.clear();

        let mut drained = 0;
        while drained < MAX_EVENTS_PER_FRAME {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if self.handle_event(event) == TickControl::Exit {
                        return TickControl::Exit;
                    }
                    drained += 1;
                }
                Err(TryRecvError::Disconnected) => return TickControl::Exit,
                Err(TryRecvError::Empty) => break,
            }
        }

        if drained >= MAX_EVENTS_PER_FRAME {
            warn!("Event queue backlog: drained {} events this frame", drained);
        }

        TickControl::Continue
    }

    #[cfg(test)]
    pub(crate) fn batches(&self) -> &[Vec<InputEvent>] {
        &self.input_batches
    }

    /// Takes the batches collected this frame.
    pub(crate) fn take_batches(&mut self) -> Vec<Vec<InputEvent>> {
        std::mem::take(&mut self.input_batches)
    }

    fn handle_event(&mut self, event: PlatformEvent) -> TickControl {
        match event {
            PlatformEvent::Inputs { discrete, continuous } => {
                if !discrete.is_empty() {
                    self.input_batches.push(discrete);
                }
                if !continuous.is_empty() {
                    self.input_batches.push(continuous);
                }
                TickControl::Continue
            }
            PlatformEvent::WindowClosed => TickControl::Exit,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
