//! Shared UI vocabulary: panel geometry, padding, and the actions screens
//! hand back up the routing chain.

pub mod items;

use crate::mqtt::MqttMessage;

/// Physical panel width in pixels (400x240 memory-in-pixel, landscape).
pub const DISPLAY_WIDTH_PX: u32 = 400;
/// Physical panel height in pixels.
pub const DISPLAY_HEIGHT_PX: u32 = 240;

/// Uniform padding applied inside screen regions.
pub const PADDING_PX: u32 = 8;

/// Effect requested by a screen in response to an input event.
///
/// Screens never touch the shared queues themselves; they return the effect
/// and the composition root applies it. This keeps item activation free of
/// queue plumbing and makes the routing chain easy to test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Publish a command on the outbound bus queue.
    Publish(MqttMessage),
}
