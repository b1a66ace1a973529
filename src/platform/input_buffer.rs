//=========================================================================
// Input Buffer
//
// Collects translated input events between two frame boundaries, split
// into discrete and continuous categories.
//
// Responsibilities:
// - Keep discrete events (keys, buttons, focus) in arrival order
// - Drop consecutive duplicate discrete events (key auto-repeat)
// - Coalesce continuous events: last cursor position, summed wheel delta
// - Hand everything over in one `drain()` per frame
//
//=========================================================================

//=== Internal Modules ====================================================
use crate::core::input::InputEvent;

//=== InputBuffer Struct ==================================================
//
// Transient event store for one frame of input.
//
pub(crate) struct InputBuffer {
    discrete: Vec<InputEvent>,
    cursor: Option<InputEvent>,
    wheel: f32,
}

impl InputBuffer {
    //--- Construction -----------------------------------------------------
    //
    // Preallocates to avoid reallocations under typical input rates.
    //
    pub(crate) fn new() -> Self {
        const DISCRETE_BASE: usize = 128;

        Self {
            discrete: Vec::with_capacity(DISCRETE_BASE),
            cursor: None,
            wheel: 0.0,
        }
    }

    //--- Push ------------------------------------------------------------
    //
    // Cursor moves replace each other and wheel deltas add up. Discrete
    // events keep arrival order, minus consecutive duplicates.
    //
    pub(crate) fn push(&mut self, event: InputEvent) {
        match event {
            InputEvent::MouseMoved { .. } => self.cursor = Some(event),
            InputEvent::MouseWheel { delta } => self.wheel += delta,
            other if self.discrete.last() != Some(&other) => self.discrete.push(other),
            _ => {}
        }
    }

    //--- Drain ------------------------------------------------------------
    //
    // Returns `(discrete, continuous)` and resets the buffer, or `None`
    // if nothing arrived since the last drain.
    //
    pub(crate) fn drain(&mut self) -> Option<(Vec<InputEvent>, Vec<InputEvent>)> {
        if self.is_empty() {
            return None;
        }

        let discrete = std::mem::replace(&mut self.discrete, Vec::with_capacity(16));

        let mut continuous = Vec::with_capacity(2);
        if let Some(cursor) = self.cursor.take() {
            continuous.push(cursor);
        }
        if self.wheel != 0.0 {
            continuous.push(InputEvent::MouseWheel { delta: self.wheel });
            self.wheel = 0.0;
        }

        Some((discrete, continuous))
    }

    //--- Utilities --------------------------------------------------------
    pub(crate) fn clear(&mut self) {
        self.discrete.clear();
        self.cursor = None;
        self.wheel = 0.0;
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.discrete.is_empty() && self.cursor.is_none() && self.wheel == 0.0
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::KeyCode;

    fn mouse_move(x: f32, y: f32) -> InputEvent {
        InputEvent::MouseMoved { x, y }
    }

    #[test]
    fn empty_buffer_drains_to_none() {
        let mut buffer = InputBuffer::new();
        assert!(buffer.drain().is_none());
    }

    #[test]
    fn consecutive_duplicates_are_dropped() {
        let mut buffer = InputBuffer::new();
        buffer.push(InputEvent::key_down(KeyCode::KeyA));
        buffer.push(InputEvent::key_down(KeyCode::KeyA));
        buffer.push(InputEvent::key_down(KeyCode::KeyB));
        buffer.push(InputEvent::key_down(KeyCode::KeyA));

        let (discrete, _) = buffer.drain().unwrap();
        assert_eq!(discrete.len(), 3);
    }

    #[test]
    fn cursor_keeps_latest_position() {
        let mut buffer = InputBuffer::new();
        buffer.push(mouse_move(10.0, 10.0));
        buffer.push(mouse_move(20.0, 30.0));

        let (discrete, continuous) = buffer.drain().unwrap();
        assert!(discrete.is_empty());
        assert_eq!(continuous, vec![mouse_move(20.0, 30.0)]);
    }

    #[test]
    fn wheel_deltas_accumulate() {
        let mut buffer = InputBuffer::new();
        buffer.push(InputEvent::MouseWheel { delta: 1.0 });
        buffer.push(InputEvent::MouseWheel { delta: 2.0 });

        let (_, continuous) = buffer.drain().unwrap();
        assert_eq!(continuous, vec![InputEvent::MouseWheel { delta: 3.0 }]);
    }

    #[test]
    fn focus_loss_lands_in_the_discrete_queue() {
        let mut buffer = InputBuffer::new();
        buffer.push(InputEvent::FocusLost);

        let (discrete, continuous) = buffer.drain().unwrap();
        assert_eq!(discrete, vec![InputEvent::FocusLost]);
        assert!(continuous.is_empty());
    }

    #[test]
    fn drain_resets_buffer() {
        let mut buffer = InputBuffer::new();
        buffer.push(InputEvent::key_down(KeyCode::KeyA));
        buffer.push(mouse_move(5.0, 5.0));

        assert!(buffer.drain().is_some());
        assert!(buffer.is_empty());
        assert!(buffer.drain().is_none());
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut buffer = InputBuffer::new();
        for i in 0..256 {
            let key = if i % 2 == 0 { KeyCode::KeyA } else { KeyCode::KeyB };
            buffer.push(InputEvent::key_down(key));
        }
        let capacity = buffer.discrete.capacity();

        buffer.clear();

        assert!(buffer.is_empty());
        assert_eq!(buffer.discrete.capacity(), capacity);
    }
}
