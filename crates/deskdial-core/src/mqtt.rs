//! MQTT message values, the FIFO queues bridging the core and the bus
//! adapter, and the subscriber seam.
//!
//! The transport (broker connection, keepalive, wire serialization) lives
//! outside the core. It fills the inbound queue and drains the outbound one;
//! the core never assumes delivery or ordering across a reconnect.

use heapless::{Deque, String};
use log::warn;

/// Maximum topic length; longer topics are truncated on construction.
pub const MAX_TOPIC_LEN: usize = 64;
/// Maximum payload length; longer payloads are truncated on construction.
pub const MAX_PAYLOAD_LEN: usize = 64;
/// Messages held per queue. A full queue drops the newest message.
pub const MQTT_QUEUE_DEPTH: usize = 16;

/// An immutable topic/payload pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MqttMessage {
    pub topic: String<MAX_TOPIC_LEN>,
    pub payload: String<MAX_PAYLOAD_LEN>,
}

impl MqttMessage {
    pub fn new(topic: &str, payload: &str) -> Self {
        Self {
            topic: truncated(topic),
            payload: truncated(payload),
        }
    }
}

/// Copies as much of `s` as fits; heapless `push_str` is all-or-nothing, so
/// an overlong field must be cut char by char instead.
pub(crate) fn truncated<const N: usize>(s: &str) -> String<N> {
    let mut out = String::new();
    for c in s.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

/// Strict-FIFO message queue with fixed capacity.
#[derive(Debug, Default)]
pub struct MqttMessageQueue {
    messages: Deque<MqttMessage, MQTT_QUEUE_DEPTH>,
}

impl MqttMessageQueue {
    pub const fn new() -> Self {
        Self {
            messages: Deque::new(),
        }
    }

    /// Enqueue a message, dropping it with a warning if the queue is full.
    pub fn push(&mut self, msg: MqttMessage) {
        if let Err(msg) = self.messages.push_back(msg) {
            warn!("mqtt queue full, dropping message on {}", msg.topic);
        }
    }

    pub fn pop(&mut self) -> Option<MqttMessage> {
        self.messages.pop_front()
    }

    pub fn front(&self) -> Option<&MqttMessage> {
        self.messages.front()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }
}

/// The pair of FIFOs bridging the UI core and the bus transport.
///
/// The adapter fills `input_queue` with broker messages and publishes
/// whatever it finds in `output_queue`. From the core's side both queues are
/// single-producer/single-consumer within one loop iteration.
#[derive(Debug, Default)]
pub struct MqttMessageBuffer {
    inbound: MqttMessageQueue,
    outbound: MqttMessageQueue,
}

impl MqttMessageBuffer {
    pub const fn new() -> Self {
        Self {
            inbound: MqttMessageQueue::new(),
            outbound: MqttMessageQueue::new(),
        }
    }

    /// Filled by the bus adapter, drained by the dispatch step.
    pub fn input_queue(&mut self) -> &mut MqttMessageQueue {
        &mut self.inbound
    }

    /// Filled by UI components, drained by the bus adapter for publishing.
    pub fn output_queue(&mut self) -> &mut MqttMessageQueue {
        &mut self.outbound
    }
}

/// Topic-filtered message consumer.
///
/// Dispatch broadcasts every inbound message to every subscriber;
/// [`handle_message`](MqttSubscriber::handle_message) makes that safe by
/// ignoring anything whose topic is not an exact match. Implementations must
/// update state synchronously and must not block.
pub trait MqttSubscriber {
    fn subscription_topic(&self) -> &str;

    /// Called only for messages whose topic equals the subscription topic.
    fn on_own_message(&mut self, msg: &MqttMessage);

    /// Entry point used by the broadcast dispatch step.
    fn handle_message(&mut self, msg: &MqttMessage) {
        if msg.topic.as_str() == self.subscription_topic() {
            self.on_own_message(msg);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Recorder {
        topic: &'static str,
        seen: usize,
    }

    impl MqttSubscriber for Recorder {
        fn subscription_topic(&self) -> &str {
            self.topic
        }

        fn on_own_message(&mut self, _msg: &MqttMessage) {
            self.seen += 1;
        }
    }

    #[test]
    fn queue_preserves_fifo_order() {
        let mut queue = MqttMessageQueue::new();
        queue.push(MqttMessage::new("a", "1"));
        queue.push(MqttMessage::new("b", "2"));
        assert_eq!(queue.front().unwrap().topic.as_str(), "a");
        assert_eq!(queue.pop().unwrap().topic.as_str(), "a");
        assert_eq!(queue.pop().unwrap().topic.as_str(), "b");
        assert!(queue.is_empty());
    }

    #[test]
    fn full_queue_drops_the_newest_message() {
        let mut queue = MqttMessageQueue::new();
        for i in 0..MQTT_QUEUE_DEPTH {
            queue.push(MqttMessage::new("t", if i == 0 { "first" } else { "x" }));
        }
        queue.push(MqttMessage::new("t", "overflow"));
        assert_eq!(queue.len(), MQTT_QUEUE_DEPTH);
        assert_eq!(queue.pop().unwrap().payload.as_str(), "first");
    }

    #[test]
    fn subscriber_ignores_foreign_topics() {
        let mut sub = Recorder {
            topic: "home/light/state",
            seen: 0,
        };
        sub.handle_message(&MqttMessage::new("home/other/state", "ON"));
        assert_eq!(sub.seen, 0);
        sub.handle_message(&MqttMessage::new("home/light/state", "ON"));
        assert_eq!(sub.seen, 1);
    }

    #[test]
    fn overlong_fields_are_truncated() {
        let long: alloc::string::String = core::iter::repeat('x').take(100).collect();
        let msg = MqttMessage::new(&long, &long);
        assert_eq!(msg.topic.len(), MAX_TOPIC_LEN);
        assert_eq!(msg.payload.len(), MAX_PAYLOAD_LEN);
    }
}
