//! Discrete input events and the queue that carries them into the run loop.
//!
//! Interrupt handlers (crank quadrature, button edges) run asynchronously
//! with respect to the run loop. Their only contract with the core is to
//! push [`InputEvent`]s through an [`InputEventHandler`]; any cross-context
//! synchronization wraps around that seam and is the adapter's concern.

use heapless::Deque;
use log::warn;

/// Capacity of the pending-event queue. Events arriving while the queue is
/// full are dropped; the crank produces at most a handful per frame.
pub const INPUT_QUEUE_DEPTH: usize = 16;

/// A discrete input edge produced by the crank or one of the push buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Crank rotated one detent clockwise.
    CrankCw,
    /// Crank rotated one detent counterclockwise.
    CrankCcw,
    /// Crank axle pressed in.
    CrankPush,
    APush,
    BPush,
    CPush,
}

/// Seam through which input adapters deliver events without depending on UI
/// internals.
pub trait InputEventHandler {
    fn handle_input_event(&mut self, event: InputEvent);
}

/// FIFO of input events drained at the start of each loop iteration.
#[derive(Debug, Default)]
pub struct InputQueue {
    events: Deque<InputEvent, INPUT_QUEUE_DEPTH>,
}

impl InputQueue {
    pub const fn new() -> Self {
        Self {
            events: Deque::new(),
        }
    }

    /// Enqueue an event, dropping it with a warning if the queue is full.
    pub fn push(&mut self, event: InputEvent) {
        if self.events.push_back(event).is_err() {
            warn!("input queue full, dropping {:?}", event);
        }
    }

    pub fn pop(&mut self) -> Option<InputEvent> {
        self.events.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}
