//=========================================================================
// Transition Queue
//=========================================================================
//
// Queue for scene change requests.
//
// Components queue requests here during hooks. The root scene manager
// drains this queue after its state dispatch and again right before its
// safe point in the render phase.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::SceneId;

//=== Transition Queue ====================================================

/// Ordered scene requests made during the current frame.
///
/// Only the last entry matters once drained: requests made before a safe
/// point collapse to the most recent one.
#[derive(Debug, Default)]
pub struct TransitionQueue {
    queue: Vec<SceneId>,
}

impl TransitionQueue {
    /// Creates a new empty transition queue.
    pub fn new() -> Self {
        Self { queue: Vec::new() }
    }

    /// Queues a scene request.
    pub fn push(&mut self, scene: SceneId) {
        self.queue.push(scene);
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Takes all queued requests, leaving the queue empty.
    pub fn take(&mut self) -> Vec<SceneId> {
        std::mem::take(&mut self.queue)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_empties_the_queue_in_request_order() {
        let mut queue = TransitionQueue::new();
        queue.push("menu".into());
        queue.push("field".into());
        assert!(!queue.is_empty());

        let taken = queue.take();
        assert_eq!(taken, vec![SceneId::from("menu"), SceneId::from("field")]);
        assert!(queue.is_empty());
    }
}
