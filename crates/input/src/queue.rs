use crate::event::InputEvent;
use std::collections::VecDeque;

/// FIFO of input events accumulated between frames.
#[derive(Debug, Default)]
pub struct EventQueue {
    pending: VecDeque<InputEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: InputEvent) {
        tracing::trace!(?event, "queued input");
        self.pending.push_back(event);
    }

    /// Take every pending event in arrival order, leaving the queue empty.
    pub fn drain(&mut self) -> impl Iterator<Item = InputEvent> + '_ {
        self.pending.drain(..)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl Extend<InputEvent> for EventQueue {
    fn extend<T: IntoIterator<Item = InputEvent>>(&mut self, iter: T) {
        for event in iter {
            self.push(event);
        }
    }
}
