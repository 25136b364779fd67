//! Screens: renderable, input-handling units that each occupy one window
//! region.
//!
//! A screen receives a draw target already clipped to its region and
//! translated to its origin, so all of its coordinates are local and stray
//! drawing is discarded by the target itself.
//! This replaces a mutable push/pop window stack: entering a region is a
//! scoped borrow, and the outer coordinate system is restored exactly when
//! the borrow ends, on every exit path.

pub mod bars;
pub mod list;
pub mod window;

pub use bars::VerticalBarsList;
pub use list::ListScreen;
pub use window::{Window, WindowedScreen};

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;

use crate::input::InputEvent;
use crate::ui::Action;
use crate::ui::items::{ItemStore, ListItem};

pub trait Screen {
    /// React to one input event. Items are passed in because screens hold
    /// only indices into the root-owned store.
    fn handle_input_event(&mut self, event: InputEvent, items: &mut ItemStore) -> Option<Action>;

    /// Draw into a target clipped to this screen's region.
    fn render<D: DrawTarget<Color = BinaryColor>>(
        &self,
        display: &mut D,
        items: &ItemStore,
    ) -> Result<(), D::Error>;
}

/// Concrete screen wrapper so the window can store a heterogeneous set of
/// screens without trait objects (the generic render method rules out `dyn`).
pub enum ScreenWrapper {
    List(ListScreen),
    Bars(VerticalBarsList),
}

impl ScreenWrapper {
    /// Current selection cursor, mostly useful for adapters and tests.
    pub fn selected_index(&self) -> usize {
        match self {
            ScreenWrapper::List(screen) => screen.selected_index(),
            ScreenWrapper::Bars(screen) => screen.selected_index(),
        }
    }
}

impl Screen for ScreenWrapper {
    fn handle_input_event(&mut self, event: InputEvent, items: &mut ItemStore) -> Option<Action> {
        match self {
            ScreenWrapper::List(screen) => screen.handle_input_event(event, items),
            ScreenWrapper::Bars(screen) => screen.handle_input_event(event, items),
        }
    }

    fn render<D: DrawTarget<Color = BinaryColor>>(
        &self,
        display: &mut D,
        items: &ItemStore,
    ) -> Result<(), D::Error> {
        match self {
            ScreenWrapper::List(screen) => screen.render(display, items),
            ScreenWrapper::Bars(screen) => screen.render(display, items),
        }
    }
}

/// Shared crank/select state machine for the list-style screens.
///
/// Clockwise advances the cursor saturating at the last item, counter-
/// clockwise retreats saturating at zero, and a push activates the cursor
/// item without moving it. Everything else is ignored.
pub(crate) fn route_list_event(
    item_ids: &[usize],
    selected: &mut usize,
    event: InputEvent,
    items: &mut ItemStore,
) -> Option<Action> {
    match event {
        InputEvent::CrankCw => {
            if *selected + 1 < item_ids.len() {
                *selected += 1;
            }
            None
        }
        InputEvent::CrankCcw => {
            *selected = selected.saturating_sub(1);
            None
        }
        InputEvent::CrankPush | InputEvent::APush => {
            let Some(&id) = item_ids.get(*selected) else {
                // Selecting on an empty list is a wiring defect; stay quiet
                // in release rather than corrupt anything.
                debug_assert!(item_ids.is_empty(), "selection cursor out of range");
                return None;
            };
            items
                .get_mut(id)
                .and_then(|item| item.on_select())
                .map(Action::Publish)
        }
        _ => None,
    }
}
