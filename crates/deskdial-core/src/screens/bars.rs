//! Side-by-side vertical gauge bars with a selection marker.
//!
//! Layout, top to bottom: the bars themselves, a round marker under the
//! selected bar, a 1-px divider the bars sit on, and a caption band with the
//! selected gauge's name (left) and rounded percentage (right).

use core::fmt::Write;

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::mono_font::ascii::FONT_10X20;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};
use heapless::{String, Vec};

use crate::input::InputEvent;
use crate::screens::{Screen, route_list_event};
use crate::ui::items::{ItemKind, ItemStore, ListItem, MAX_ITEMS, percent};
use crate::ui::{Action, PADDING_PX};

/// Radius of the round marker drawn under the selected bar.
const SELECTOR_RADIUS_PX: u32 = 8;
/// Width of one bar; bars sit on a pitch of twice this value.
const BAR_WIDTH_PX: u32 = 2 * PADDING_PX;

/// Gauge items laid out as vertical bars, sharing the list cursor state
/// machine.
pub struct VerticalBarsList {
    item_ids: Vec<usize, MAX_ITEMS>,
    selected: usize,
}

impl VerticalBarsList {
    /// `item_ids` must reference gauge items; anything else is skipped at
    /// render time (debug builds assert).
    pub fn new(item_ids: Vec<usize, MAX_ITEMS>) -> Self {
        Self {
            item_ids,
            selected: 0,
        }
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn len(&self) -> usize {
        self.item_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.item_ids.is_empty()
    }
}

/// Bar height in pixels for a fill fraction over `avail` pixels of headroom.
///
/// The fraction is clamped (non-finite values count as zero) so bad gauge
/// data can never leak into layout arithmetic. The extra pixel keeps an
/// empty bar visible and seats every bar flush on the divider.
pub(crate) fn bar_height_px(fraction: f32, avail: u32) -> u32 {
    let fraction = if fraction.is_finite() {
        fraction.clamp(0.0, 1.0)
    } else {
        0.0
    };
    (fraction * avail as f32 + 0.5) as u32 + 1
}

impl Screen for VerticalBarsList {
    fn handle_input_event(&mut self, event: InputEvent, items: &mut ItemStore) -> Option<Action> {
        route_list_event(&self.item_ids, &mut self.selected, event, items)
    }

    fn render<D: DrawTarget<Color = BinaryColor>>(
        &self,
        display: &mut D,
        items: &ItemStore,
    ) -> Result<(), D::Error> {
        let size = display.bounding_box().size;
        let inner_rect = Rectangle::new(
            Point::new(PADDING_PX as i32, PADDING_PX as i32),
            Size::new(
                size.width.saturating_sub(2 * PADDING_PX),
                size.height.saturating_sub(2 * PADDING_PX),
            ),
        );
        let mut inner_clip = display.clipped(&inner_rect);
        let mut inner = inner_clip.translated(inner_rect.top_left);
        let inner_size = inner.bounding_box().size;

        let caption_band = 2 * PADDING_PX + FONT_10X20.character_size.height;
        let selector_band = 2 * PADDING_PX + 2 * SELECTOR_RADIUS_PX;
        // The divider row doubles as the bars' baseline; everything above it
        // is bar headroom.
        let divider_y = inner_size
            .height
            .saturating_sub(caption_band + selector_band + 1);

        let outline = PrimitiveStyle::with_stroke(BinaryColor::On, 1);
        let solid = PrimitiveStyle::with_fill(BinaryColor::On);

        for (i, &id) in self.item_ids.iter().enumerate() {
            let Some(gauge) = items.get(id).and_then(ItemKind::as_gauge) else {
                debug_assert!(false, "bars screen references a non-gauge item");
                continue;
            };

            let x = (PADDING_PX + i as u32 * 2 * BAR_WIDTH_PX) as i32;
            let height = bar_height_px(gauge.percentage(), divider_y);
            let top = divider_y as i32 + 1 - height as i32;
            let bar = Rectangle::new(Point::new(x, top), Size::new(BAR_WIDTH_PX, height));
            let style = if gauge.is_filled() { solid } else { outline };
            bar.into_styled(style).draw(&mut inner)?;

            if i == self.selected {
                let center = Point::new(
                    x + BAR_WIDTH_PX as i32 / 2,
                    (divider_y + 1 + PADDING_PX + SELECTOR_RADIUS_PX) as i32,
                );
                Circle::with_center(center, 2 * SELECTOR_RADIUS_PX)
                    .into_styled(solid)
                    .draw(&mut inner)?;
            }
        }

        Rectangle::new(
            Point::new(0, divider_y as i32),
            Size::new(inner_size.width, 1),
        )
        .into_styled(solid)
        .draw(&mut inner)?;

        // Caption for the selected gauge. An empty list degrades to the
        // divider alone.
        let Some(gauge) = self
            .item_ids
            .get(self.selected)
            .and_then(|&id| items.get(id))
            .and_then(ItemKind::as_gauge)
        else {
            return Ok(());
        };

        let caption_y = (divider_y + 1 + selector_band) as i32;
        let style = MonoTextStyle::new(&FONT_10X20, BinaryColor::On);
        Text::with_baseline(
            gauge.display_name(),
            Point::new(0, caption_y),
            style,
            Baseline::Top,
        )
        .draw(&mut inner)?;

        let mut label: String<8> = String::new();
        let _ = write!(label, "{}%", percent(gauge.percentage()));
        let right_aligned = TextStyleBuilder::new()
            .alignment(Alignment::Right)
            .baseline(Baseline::Top)
            .build();
        Text::with_text_style(
            label.as_str(),
            Point::new(inner_size.width as i32, caption_y),
            style,
            right_aligned,
        )
        .draw(&mut inner)?;

        Ok(())
    }
}
