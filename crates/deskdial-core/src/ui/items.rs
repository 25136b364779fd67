//! Selectable, renderable rows and the store the composition root owns.
//!
//! Items are constructed once at startup and live in an [`ItemStore`];
//! screens address them by index, which keeps the borrow graph acyclic while
//! still letting the MQTT dispatch step reach every subscriber directly.
//!
//! [`ItemKind`] is an enum wrapper rather than `dyn ListItem` because the
//! render method is generic over the draw target.

use core::fmt::Write;

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::mono_font::ascii::FONT_10X20;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};
use heapless::{String, Vec};
use log::debug;

use crate::mqtt::{MAX_TOPIC_LEN, MqttMessage, MqttSubscriber, truncated};

/// Fixed capacity of the item store.
pub const MAX_ITEMS: usize = 16;
/// Maximum display-name length; longer names are truncated.
pub const MAX_NAME_LEN: usize = 32;

/// A renderable, selectable row.
pub trait ListItem {
    fn display_name(&self) -> &str;

    /// Activation hook. Returns the bus command this item wants published,
    /// if any.
    fn on_select(&mut self) -> Option<MqttMessage> {
        None
    }

    /// Draw into a target clipped to exactly this item's row.
    fn render<D: DrawTarget<Color = BinaryColor>>(
        &self,
        display: &mut D,
        is_selected: bool,
    ) -> Result<(), D::Error>;
}

fn draw_row_text<D: DrawTarget<Color = BinaryColor>>(
    display: &mut D,
    text: &str,
) -> Result<(), D::Error> {
    let style = MonoTextStyle::new(&FONT_10X20, BinaryColor::On);
    Text::with_baseline(text, Point::zero(), style, Baseline::Top).draw(display)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// MqttToggleItem
// ---------------------------------------------------------------------------

/// Row bound to a smart switch: selecting it publishes a command, and the
/// displayed ON/OFF state tracks the device's state topic.
///
/// Selection is optimistic: the command carries the logical negation of the
/// last observed state, but `on` only flips once a confirming message
/// arrives on the state topic. If no confirmation ever arrives the row keeps
/// showing the stale state, by contract.
pub struct MqttToggleItem {
    display_name: String<MAX_NAME_LEN>,
    command_topic: String<MAX_TOPIC_LEN>,
    state_topic: String<MAX_TOPIC_LEN>,
    on: bool,
}

impl MqttToggleItem {
    pub fn new(display_name: &str, command_topic: &str, state_topic: &str) -> Self {
        Self {
            display_name: truncated(display_name),
            command_topic: truncated(command_topic),
            state_topic: truncated(state_topic),
            on: false,
        }
    }

    /// Last state observed on the state topic.
    pub fn is_on(&self) -> bool {
        self.on
    }
}

impl ListItem for MqttToggleItem {
    fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    fn on_select(&mut self) -> Option<MqttMessage> {
        Some(MqttMessage::new(
            self.command_topic.as_str(),
            if self.on { "OFF" } else { "ON" },
        ))
    }

    fn render<D: DrawTarget<Color = BinaryColor>>(
        &self,
        display: &mut D,
        is_selected: bool,
    ) -> Result<(), D::Error> {
        let mut line: String<48> = String::new();
        let _ = write!(
            line,
            "{}{} {}",
            if is_selected { "-> " } else { "" },
            self.display_name,
            if self.on { "ON" } else { "OFF" },
        );
        draw_row_text(display, line.as_str())
    }
}

impl MqttSubscriber for MqttToggleItem {
    fn subscription_topic(&self) -> &str {
        self.state_topic.as_str()
    }

    fn on_own_message(&mut self, msg: &MqttMessage) {
        match msg.payload.as_str() {
            "ON" => self.on = true,
            "OFF" => self.on = false,
            other => debug!("ignoring payload {:?} on {}", other, self.state_topic),
        }
    }
}

// ---------------------------------------------------------------------------
// TextListItem
// ---------------------------------------------------------------------------

/// Plain, non-interactive text row.
pub struct TextListItem {
    display_name: String<MAX_NAME_LEN>,
}

impl TextListItem {
    pub fn new(display_name: &str) -> Self {
        Self {
            display_name: truncated(display_name),
        }
    }
}

impl ListItem for TextListItem {
    fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    fn render<D: DrawTarget<Color = BinaryColor>>(
        &self,
        display: &mut D,
        is_selected: bool,
    ) -> Result<(), D::Error> {
        let mut line: String<40> = String::new();
        let _ = write!(
            line,
            "{}{}",
            if is_selected { "-> " } else { "" },
            self.display_name,
        );
        draw_row_text(display, line.as_str())
    }
}

// ---------------------------------------------------------------------------
// GaugeItem
// ---------------------------------------------------------------------------

/// A level in `[0, 1]` rendered as a bar by the vertical bars screen.
pub struct GaugeItem {
    display_name: String<MAX_NAME_LEN>,
    percentage: f32,
    filled: bool,
}

impl GaugeItem {
    pub fn new(display_name: &str, percentage: f32, filled: bool) -> Self {
        Self {
            display_name: truncated(display_name),
            percentage: sanitize(percentage),
            filled,
        }
    }

    /// Fill fraction, always finite and within `[0, 1]`.
    pub fn percentage(&self) -> f32 {
        self.percentage
    }

    pub fn is_filled(&self) -> bool {
        self.filled
    }

    pub fn set_percentage(&mut self, percentage: f32) {
        self.percentage = sanitize(percentage);
    }

    pub fn set_filled(&mut self, filled: bool) {
        self.filled = filled;
    }
}

/// Non-finite input degrades to an empty gauge; everything else clamps.
fn sanitize(percentage: f32) -> f32 {
    if percentage.is_finite() {
        percentage.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

impl ListItem for GaugeItem {
    fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    fn render<D: DrawTarget<Color = BinaryColor>>(
        &self,
        display: &mut D,
        is_selected: bool,
    ) -> Result<(), D::Error> {
        // Fallback row rendering, used when a gauge sits in a plain list.
        let mut line: String<48> = String::new();
        let _ = write!(
            line,
            "{}{} {}%",
            if is_selected { "-> " } else { "" },
            self.display_name,
            percent(self.percentage),
        );
        draw_row_text(display, line.as_str())
    }
}

/// Rounded whole-number percentage for labels.
pub(crate) fn percent(fraction: f32) -> u32 {
    (sanitize(fraction) * 100.0 + 0.5) as u32
}

// ---------------------------------------------------------------------------
// ItemKind / ItemStore
// ---------------------------------------------------------------------------

/// Concrete item wrapper so screens and the store can hold a heterogeneous
/// collection without trait objects.
pub enum ItemKind {
    Toggle(MqttToggleItem),
    Text(TextListItem),
    Gauge(GaugeItem),
}

impl ItemKind {
    /// The MQTT-bound view of this item, if it has one.
    pub fn as_subscriber_mut(&mut self) -> Option<&mut dyn MqttSubscriber> {
        match self {
            ItemKind::Toggle(item) => Some(item),
            ItemKind::Text(_) | ItemKind::Gauge(_) => None,
        }
    }

    pub fn as_gauge(&self) -> Option<&GaugeItem> {
        match self {
            ItemKind::Gauge(item) => Some(item),
            _ => None,
        }
    }

    pub fn as_gauge_mut(&mut self) -> Option<&mut GaugeItem> {
        match self {
            ItemKind::Gauge(item) => Some(item),
            _ => None,
        }
    }

    pub fn as_toggle(&self) -> Option<&MqttToggleItem> {
        match self {
            ItemKind::Toggle(item) => Some(item),
            _ => None,
        }
    }
}

impl ListItem for ItemKind {
    fn display_name(&self) -> &str {
        match self {
            ItemKind::Toggle(item) => item.display_name(),
            ItemKind::Text(item) => item.display_name(),
            ItemKind::Gauge(item) => item.display_name(),
        }
    }

    fn on_select(&mut self) -> Option<MqttMessage> {
        match self {
            ItemKind::Toggle(item) => item.on_select(),
            ItemKind::Text(item) => item.on_select(),
            ItemKind::Gauge(item) => item.on_select(),
        }
    }

    fn render<D: DrawTarget<Color = BinaryColor>>(
        &self,
        display: &mut D,
        is_selected: bool,
    ) -> Result<(), D::Error> {
        match self {
            ItemKind::Toggle(item) => item.render(display, is_selected),
            ItemKind::Text(item) => item.render(display, is_selected),
            ItemKind::Gauge(item) => item.render(display, is_selected),
        }
    }
}

/// Item storage owned by the composition root.
///
/// Items are pushed once at startup and never removed; the returned index is
/// the stable handle screens keep.
#[derive(Default)]
pub struct ItemStore {
    items: Vec<ItemKind, MAX_ITEMS>,
}

impl ItemStore {
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Add an item, returning its index, or the item back when full.
    pub fn push(&mut self, item: ItemKind) -> Result<usize, ItemKind> {
        let id = self.items.len();
        self.items.push(item)?;
        Ok(id)
    }

    pub fn get(&self, id: usize) -> Option<&ItemKind> {
        self.items.get(id)
    }

    pub fn get_mut(&mut self, id: usize) -> Option<&mut ItemKind> {
        self.items.get_mut(id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Every MQTT-bound item, in registration order.
    pub fn subscribers_mut(&mut self) -> impl Iterator<Item = &mut dyn MqttSubscriber> {
        self.items.iter_mut().filter_map(ItemKind::as_subscriber_mut)
    }
}
