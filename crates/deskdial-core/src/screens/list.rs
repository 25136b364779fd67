//! Scrollable list of full-width rows with a selection cursor.

use embedded_graphics::mono_font::ascii::FONT_10X20;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use heapless::Vec;

use crate::input::InputEvent;
use crate::screens::{Screen, route_list_event};
use crate::ui::items::{ItemStore, ListItem, MAX_ITEMS};
use crate::ui::{Action, PADDING_PX};

/// Vertical gap between rows in pixels.
const ROW_GAP_PX: u32 = 4;

/// An ordered sequence of item indices plus the selection cursor.
///
/// The cursor satisfies `0 <= selected < len` whenever the list is
/// non-empty; crank events saturate at both ends without wrapping.
pub struct ListScreen {
    item_ids: Vec<usize, MAX_ITEMS>,
    selected: usize,
}

impl ListScreen {
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

impl Screen for ListScreen {
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

        let row_height = FONT_10X20.character_size.height + ROW_GAP_PX;
        for (row, &id) in self.item_ids.iter().enumerate() {
            let Some(item) = items.get(id) else {
                debug_assert!(false, "list references an unknown item");
                continue;
            };
            // Rows below the region bottom clip away to nothing.
            let row_rect = Rectangle::new(
                Point::new(0, (row as u32 * row_height) as i32),
                Size::new(inner_rect.size.width, row_height),
            );
            let mut row_clip = inner.clipped(&row_rect);
            let mut row_target = row_clip.translated(row_rect.top_left);
            item.render(&mut row_target, row == self.selected)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framebuffer::FrameBuffer;
    use crate::ui::items::{ItemKind, TextListItem};

    fn store_with_texts(n: usize) -> (ItemStore, Vec<usize, MAX_ITEMS>) {
        let mut store = ItemStore::new();
        let mut ids = Vec::new();
        for i in 0..n {
            let mut name = heapless::String::<8>::new();
            use core::fmt::Write;
            write!(name, "row {i}").unwrap();
            let id = store
                .push(ItemKind::Text(TextListItem::new(name.as_str())))
                .ok()
                .unwrap();
            ids.push(id).unwrap();
        }
        (store, ids)
    }

    #[test]
    fn cursor_saturates_at_both_ends() {
        let (mut store, ids) = store_with_texts(3);
        let mut screen = ListScreen::new(ids);

        // Any crank sequence keeps the cursor in [0, N-1] moving one step
        // at a time.
        let script = [
            InputEvent::CrankCcw,
            InputEvent::CrankCw,
            InputEvent::CrankCw,
            InputEvent::CrankCw,
            InputEvent::CrankCw,
            InputEvent::CrankCcw,
        ];
        let mut prev = screen.selected_index();
        for event in script {
            screen.handle_input_event(event, &mut store);
            let now = screen.selected_index();
            assert!(now < 3);
            assert!(now.abs_diff(prev) <= 1);
            prev = now;
        }
        assert_eq!(screen.selected_index(), 1);

        // Saturate at the top end.
        for _ in 0..10 {
            screen.handle_input_event(InputEvent::CrankCw, &mut store);
        }
        assert_eq!(screen.selected_index(), 2);

        // And at the bottom.
        for _ in 0..10 {
            screen.handle_input_event(InputEvent::CrankCcw, &mut store);
        }
        assert_eq!(screen.selected_index(), 0);
    }

    #[test]
    fn selection_does_not_move_the_cursor() {
        let (mut store, ids) = store_with_texts(2);
        let mut screen = ListScreen::new(ids);
        screen.handle_input_event(InputEvent::CrankCw, &mut store);
        assert_eq!(screen.selected_index(), 1);
        let action = screen.handle_input_event(InputEvent::APush, &mut store);
        assert!(action.is_none());
        assert_eq!(screen.selected_index(), 1);
    }

    #[test]
    fn unmapped_events_are_ignored() {
        let (mut store, ids) = store_with_texts(2);
        let mut screen = ListScreen::new(ids);
        assert!(
            screen
                .handle_input_event(InputEvent::CPush, &mut store)
                .is_none()
        );
        assert_eq!(screen.selected_index(), 0);
    }

    #[test]
    fn empty_list_renders_and_handles_events_without_panicking() {
        let mut store = ItemStore::new();
        let mut screen = ListScreen::new(Vec::new());
        screen.handle_input_event(InputEvent::CrankCw, &mut store);
        screen.handle_input_event(InputEvent::CrankCcw, &mut store);
        let mut fb = FrameBuffer::new();
        screen.render(&mut fb, &store).unwrap();
    }

    #[test]
    fn render_draws_every_row_inside_the_padding() {
        let (mut store, ids) = store_with_texts(2);
        let mut screen = ListScreen::new(ids);
        screen.handle_input_event(InputEvent::CrankCw, &mut store);

        let mut fb = FrameBuffer::new();
        screen.render(&mut fb, &store).unwrap();

        // Each row band carries text ink starting at the padded origin.
        let row_height = (FONT_10X20.character_size.height + ROW_GAP_PX) as usize;
        let marker_cols = PADDING_PX as usize..(PADDING_PX as usize + 30);
        let row0 = PADDING_PX as usize..(PADDING_PX as usize + row_height);
        let row1 = (PADDING_PX as usize + row_height)..(PADDING_PX as usize + 2 * row_height);

        let ink = |rows: core::ops::Range<usize>, cols: core::ops::Range<usize>| {
            rows.clone()
                .flat_map(|y| cols.clone().map(move |x| (x, y)))
                .filter(|&(x, y)| fb.pixel(x, y).is_on())
                .count()
        };
        // Both rows have text ink somewhere.
        assert!(ink(row0.clone(), marker_cols.clone()) > 0);
        assert!(ink(row1, marker_cols) > 0);
    }
}
