//! Multi-screen compositor: disjoint regions, one focused screen.

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use heapless::Vec;
use log::debug;

use crate::input::InputEvent;
use crate::screens::{Screen, ScreenWrapper};
use crate::ui::Action;
use crate::ui::items::ItemStore;

/// Fixed capacity of the region table.
pub const MAX_SCREENS: usize = 4;

/// One region record: a screen, where it lives, and whether to frame it.
pub struct WindowedScreen {
    pub screen: ScreenWrapper,
    pub region: Rectangle,
    pub draw_border: bool,
}

/// Compositor that partitions the display into disjoint rectangular regions,
/// each owned by one screen, and routes input to the focused one.
///
/// Region disjointness is a wiring invariant checked at registration in
/// debug builds only.
pub struct Window {
    screens: Vec<WindowedScreen, MAX_SCREENS>,
    focused: usize,
    focus_switch: Option<InputEvent>,
}

impl Window {
    /// `focus_switch` is the event (if any) that rotates focus between
    /// regions; it is consumed by the window and never forwarded.
    pub fn new(focused: usize, focus_switch: Option<InputEvent>) -> Self {
        Self {
            screens: Vec::new(),
            focused,
            focus_switch,
        }
    }

    /// Add a region record, returning it back if the table is full.
    pub fn register(&mut self, windowed: WindowedScreen) -> Result<(), WindowedScreen> {
        debug_assert!(
            self.screens
                .iter()
                .all(|ws| ws.region.intersection(&windowed.region).is_zero_sized()),
            "window regions overlap"
        );
        self.screens.push(windowed)
    }

    pub fn focused_index(&self) -> usize {
        self.focused
    }

    pub fn screen(&self, index: usize) -> Option<&ScreenWrapper> {
        self.screens.get(index).map(|ws| &ws.screen)
    }

    /// Route one event: either rotate focus (consuming the event) or forward
    /// it verbatim to the focused screen only.
    pub fn handle_input_event(
        &mut self,
        event: InputEvent,
        items: &mut ItemStore,
    ) -> Option<Action> {
        if self.focus_switch == Some(event) {
            if !self.screens.is_empty() {
                self.focused = (self.focused + 1) % self.screens.len();
                debug!("focus moved to region {}", self.focused);
            }
            return None;
        }
        let focused = self.screens.get_mut(self.focused)?;
        focused.screen.handle_input_event(event, items)
    }

    /// Draw every region. Each screen receives a target clipped to its
    /// region and translated to its origin (inset by the border when one is
    /// drawn), so region-local coordinates and clipping are restored
    /// automatically per region and nothing can paint across a region
    /// boundary.
    pub fn render<D: DrawTarget<Color = BinaryColor>>(
        &self,
        display: &mut D,
        items: &ItemStore,
    ) -> Result<(), D::Error> {
        for ws in &self.screens {
            let mut region_clip = display.clipped(&ws.region);
            let mut region = region_clip.translated(ws.region.top_left);
            let inset = if ws.draw_border {
                Rectangle::new(Point::zero(), ws.region.size)
                    .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
                    .draw(&mut region)?;
                1
            } else {
                0
            };
            let content = Rectangle::new(
                Point::new(inset, inset),
                Size::new(
                    ws.region.size.width.saturating_sub(2 * inset as u32),
                    ws.region.size.height.saturating_sub(2 * inset as u32),
                ),
            );
            let mut content_clip = region.clipped(&content);
            let mut content_target = content_clip.translated(content.top_left);
            ws.screen.render(&mut content_target, items)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framebuffer::FrameBuffer;
    use crate::screens::ListScreen;
    use crate::ui::items::{ItemKind, ItemStore, TextListItem};

    fn two_region_window() -> (ItemStore, Window) {
        let mut store = ItemStore::new();
        let mut left_ids = Vec::new();
        let mut right_ids = Vec::new();
        for i in 0..3 {
            let id = store
                .push(ItemKind::Text(TextListItem::new(if i == 0 {
                    "left"
                } else {
                    "row"
                })))
                .ok()
                .unwrap();
            left_ids.push(id).unwrap();
        }
        for _ in 0..3 {
            let id = store
                .push(ItemKind::Text(TextListItem::new("right")))
                .ok()
                .unwrap();
            right_ids.push(id).unwrap();
        }

        let mut window = Window::new(0, Some(InputEvent::BPush));
        window
            .register(WindowedScreen {
                screen: ScreenWrapper::List(ListScreen::new(left_ids)),
                region: Rectangle::new(Point::zero(), Size::new(200, 240)),
                draw_border: true,
            })
            .ok()
            .unwrap();
        window
            .register(WindowedScreen {
                screen: ScreenWrapper::List(ListScreen::new(right_ids)),
                region: Rectangle::new(Point::new(200, 0), Size::new(200, 240)),
                draw_border: true,
            })
            .ok()
            .unwrap();
        (store, window)
    }

    #[test]
    fn input_reaches_only_the_focused_screen() {
        let (mut store, mut window) = two_region_window();
        window.handle_input_event(InputEvent::CrankCw, &mut store);
        window.handle_input_event(InputEvent::CrankCw, &mut store);
        assert_eq!(window.screen(0).unwrap().selected_index(), 2);
        assert_eq!(window.screen(1).unwrap().selected_index(), 0);
    }

    #[test]
    fn focus_switch_event_is_consumed_and_rotates_focus() {
        let (mut store, mut window) = two_region_window();
        assert_eq!(window.focused_index(), 0);

        let action = window.handle_input_event(InputEvent::BPush, &mut store);
        assert!(action.is_none());
        assert_eq!(window.focused_index(), 1);

        window.handle_input_event(InputEvent::CrankCw, &mut store);
        assert_eq!(window.screen(0).unwrap().selected_index(), 0);
        assert_eq!(window.screen(1).unwrap().selected_index(), 1);

        // Wraps back to the first region.
        window.handle_input_event(InputEvent::BPush, &mut store);
        assert_eq!(window.focused_index(), 0);
    }

    #[test]
    fn render_frames_each_bordered_region() {
        let (store, window) = two_region_window();
        let mut fb = FrameBuffer::new();
        window.render(&mut fb, &store).unwrap();

        // Border corners of both regions.
        assert!(fb.pixel(0, 0).is_on());
        assert!(fb.pixel(199, 239).is_on());
        assert!(fb.pixel(200, 0).is_on());
        assert!(fb.pixel(399, 239).is_on());
    }

    #[test]
    fn rows_cannot_paint_across_a_region_boundary() {
        let mut store = ItemStore::new();
        let mut left_ids = Vec::new();
        let id = store
            .push(ItemKind::Text(TextListItem::new(
                "mmmmmmmmmmmmmmmmmmmmmmmmmmmmmm",
            )))
            .ok()
            .unwrap();
        left_ids.push(id).unwrap();

        let mut window = Window::new(0, None);
        window
            .register(WindowedScreen {
                screen: ScreenWrapper::List(ListScreen::new(left_ids)),
                region: Rectangle::new(Point::zero(), Size::new(200, 240)),
                draw_border: false,
            })
            .ok()
            .unwrap();
        window
            .register(WindowedScreen {
                screen: ScreenWrapper::List(ListScreen::new(Vec::new())),
                region: Rectangle::new(Point::new(200, 0), Size::new(200, 240)),
                draw_border: false,
            })
            .ok()
            .unwrap();

        let mut fb = FrameBuffer::new();
        window.render(&mut fb, &store).unwrap();

        // The row is far wider than the left region, so ink fills its padded
        // interior but never escapes it. The right region holds an empty
        // list and must stay blank.
        let interior_ink = (8..28usize)
            .flat_map(|y| (8..192usize).map(move |x| (x, y)))
            .filter(|&(x, y)| fb.pixel(x, y).is_on())
            .count();
        assert!(interior_ink > 0);
        for y in 0..240 {
            for x in 192..400 {
                assert!(fb.pixel(x, y).is_off(), "stray ink at ({x}, {y})");
            }
        }
    }

    #[test]
    fn window_without_screens_is_inert() {
        let mut store = ItemStore::new();
        let mut window = Window::new(0, None);
        assert!(
            window
                .handle_input_event(InputEvent::CrankCw, &mut store)
                .is_none()
        );
        let mut fb = FrameBuffer::new();
        window.render(&mut fb, &store).unwrap();
    }
}
