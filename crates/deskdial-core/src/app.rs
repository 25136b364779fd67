//! Composition root: builds the item/screen/window tree from configuration
//! once at startup and runs the per-tick drain/dispatch/render sequence.

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use heapless::Vec;
use log::debug;

use crate::config::{ConfigError, DeviceConfig};
use crate::input::{InputEvent, InputEventHandler, InputQueue};
use crate::mqtt::MqttMessageBuffer;
use crate::screens::{ListScreen, ScreenWrapper, VerticalBarsList, Window, WindowedScreen};
use crate::ui::items::{GaugeItem, ItemKind, ItemStore, MAX_ITEMS, MqttToggleItem};
use crate::ui::{Action, DISPLAY_HEIGHT_PX, DISPLAY_WIDTH_PX};

/// Width of the switches region; the gauge bars take the rest of the panel.
const SWITCH_REGION_WIDTH_PX: u32 = 200;

/// The wired-up device UI.
///
/// Owns every item and screen for its whole lifetime. The run loop calls
/// [`tick`](App::tick) once per frame; interrupt adapters deliver through
/// [`InputEventHandler`] and the bus adapter through
/// [`mqtt_buffer`](App::mqtt_buffer).
pub struct App {
    items: ItemStore,
    window: Window,
    input: InputQueue,
    mqtt: MqttMessageBuffer,
}

impl App {
    /// Build the concrete item/screen/window tree: switches in a bordered
    /// list on the left, gauges as vertical bars on the right, focus
    /// starting on the switches and rotating on the B button.
    pub fn new(config: &DeviceConfig<'_>) -> Result<Self, ConfigError> {
        if config.switches.is_empty() && config.gauges.is_empty() {
            return Err(ConfigError::Empty);
        }
        if config.switches.len() + config.gauges.len() > MAX_ITEMS {
            return Err(ConfigError::CapacityExceeded);
        }

        let mut items = ItemStore::new();
        let mut switch_ids: Vec<usize, MAX_ITEMS> = Vec::new();
        for switch in config.switches {
            let id = items
                .push(ItemKind::Toggle(MqttToggleItem::new(
                    switch.display_name,
                    switch.command_topic,
                    switch.state_topic,
                )))
                .map_err(|_| ConfigError::CapacityExceeded)?;
            switch_ids
                .push(id)
                .map_err(|_| ConfigError::CapacityExceeded)?;
        }

        let mut gauge_ids: Vec<usize, MAX_ITEMS> = Vec::new();
        for gauge in config.gauges {
            let id = items
                .push(ItemKind::Gauge(GaugeItem::new(
                    gauge.display_name,
                    gauge.percentage,
                    gauge.filled,
                )))
                .map_err(|_| ConfigError::CapacityExceeded)?;
            gauge_ids
                .push(id)
                .map_err(|_| ConfigError::CapacityExceeded)?;
        }

        let mut window = Window::new(0, Some(InputEvent::BPush));
        window
            .register(WindowedScreen {
                screen: ScreenWrapper::List(ListScreen::new(switch_ids)),
                region: Rectangle::new(
                    Point::zero(),
                    Size::new(SWITCH_REGION_WIDTH_PX, DISPLAY_HEIGHT_PX),
                ),
                draw_border: true,
            })
            .ok();
        window
            .register(WindowedScreen {
                screen: ScreenWrapper::Bars(VerticalBarsList::new(gauge_ids)),
                region: Rectangle::new(
                    Point::new(SWITCH_REGION_WIDTH_PX as i32, 0),
                    Size::new(DISPLAY_WIDTH_PX - SWITCH_REGION_WIDTH_PX, DISPLAY_HEIGHT_PX),
                ),
                draw_border: true,
            })
            .ok();

        Ok(Self {
            items,
            window,
            input: InputQueue::new(),
            mqtt: MqttMessageBuffer::new(),
        })
    }

    /// Queues shared with the bus adapter.
    pub fn mqtt_buffer(&mut self) -> &mut MqttMessageBuffer {
        &mut self.mqtt
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn items(&self) -> &ItemStore {
        &self.items
    }

    /// One cooperative loop iteration: drain pending input, dispatch every
    /// inbound bus message, then draw exactly one frame. The caller flushes
    /// or refreshes the panel afterwards. Never blocks.
    pub fn tick<D: DrawTarget<Color = BinaryColor>>(
        &mut self,
        display: &mut D,
    ) -> Result<(), D::Error> {
        self.drain_input_events();
        self.dispatch_inbound();
        display.clear(BinaryColor::Off)?;
        self.window.render(display, &self.items)
    }

    fn drain_input_events(&mut self) {
        while let Some(event) = self.input.pop() {
            debug!("routing input event {:?}", event);
            if let Some(Action::Publish(msg)) = self.window.handle_input_event(event, &mut self.items)
            {
                debug!("queueing command {} -> {}", msg.topic, msg.payload);
                self.mqtt.output_queue().push(msg);
            }
        }
    }

    /// Broadcast every inbound message, in FIFO order, to every registered
    /// subscriber; each subscriber self-filters by topic.
    fn dispatch_inbound(&mut self) {
        while let Some(msg) = self.mqtt.input_queue().pop() {
            debug!("dispatching {} -> {}", msg.topic, msg.payload);
            for subscriber in self.items.subscribers_mut() {
                subscriber.handle_message(&msg);
            }
        }
    }
}

impl InputEventHandler for App {
    fn handle_input_event(&mut self, event: InputEvent) {
        self.input.push(event);
    }
}
