//! User input handling.
//!
//! Input goes through three steps:
//! 1. The host surface converts its native pointer events into [`RawUserEvent`]s.
//! 2. The [`EventProcessor`] tracks the pointer and button state and turns raw events into
//!    [`UserEvent`]s: presses, clicks, context menu requests, drags and scrolls.
//! 3. Every `UserEvent` is given to the chain of [`UserEventHandler`]s, which change the map
//!    host and the interaction state.

use maybe_sync::{MaybeSend, MaybeSync};
use skyline_types::{GeoPoint, Point2d};

use crate::map::MapHost;

mod event_processor;
mod interaction;
mod map;

pub use event_processor::EventProcessor;
pub use interaction::InteractionHandler;
pub use map::{MapController, MapControllerConfiguration};

/// User input handler.
pub trait UserEventHandler: MaybeSend + MaybeSync {
    /// Handle the event.
    fn handle(&self, event: &UserEvent, map: &mut MapHost) -> EventPropagation;
}

impl<T: for<'a> Fn(&'a UserEvent, &'a mut MapHost) -> EventPropagation> UserEventHandler for T
where
    T: MaybeSync + MaybeSend,
{
    fn handle(&self, event: &UserEvent, map: &mut MapHost) -> EventPropagation {
        self(event, map)
    }
}

/// Pointer event as reported by the host surface, without any input state.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum RawUserEvent {
    /// A mouse button was pressed.
    ButtonPressed(MouseButton),
    /// A mouse button was released.
    ButtonReleased(MouseButton),
    /// Mouse pointer was moved to the given screen pixel position.
    PointerMoved(Point2d),
    /// Mouse wheel was turned. The number is the number of text lines the wheel would scroll.
    Scroll(f64),
}

/// User interaction event as seen by the [`UserEventHandler`]s.
#[derive(Debug, Clone, PartialEq)]
pub enum UserEvent {
    /// A mouse button was pressed.
    ButtonPressed(MouseButton, MouseEvent),
    /// A mouse button was released.
    ButtonReleased(MouseButton, MouseEvent),
    /// A button was released shortly after it was pressed, and the pointer did not drag.
    Click(MouseButton, MouseEvent),
    /// The secondary button was pressed. Fired right after the [`UserEvent::ButtonPressed`].
    ContextMenu(MouseEvent),
    /// Mouse pointer moved.
    PointerMoved(MouseEvent),
    /// The pointer moved past the drag threshold with a single button pressed. A handler
    /// returning [`EventPropagation::Consume`] becomes the owner of the drag.
    DragStarted(MouseButton, MouseEvent),
    /// The pointer moved during a drag. The vector is the movement in screen pixels.
    Drag(MouseButton, Point2d, MouseEvent),
    /// The button was released while dragging.
    DragEnded(MouseButton, MouseEvent),
    /// Mouse wheel was turned.
    Scroll(f64, MouseEvent),
}

/// Value returned by an [`UserEventHandler`] to indicate the status of the event.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EventPropagation {
    /// Event should be propagated to the next handler.
    Propagate,
    /// Event should not be propagated to the next handler.
    Stop,
    /// Event should not be propagated, and the handler becomes the owner of the event. For
    /// [`UserEvent::DragStarted`] it means the following drag events go only to this handler.
    Consume,
}

/// Mouse button.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MouseButton {
    /// Primary button.
    Left,
    /// Wheel button.
    Middle,
    /// Secondary button.
    Right,
    /// Any other button.
    Other,
}

/// State of the mouse at the moment of the event.
#[derive(Debug, Clone, PartialEq)]
pub struct MouseEvent {
    /// Pointer position on the screen in pixels from the top-left corner.
    pub screen_pointer_position: Point2d,
    /// Geographic position under the pointer.
    pub map_pointer_position: GeoPoint,
    /// State of the mouse buttons.
    pub buttons: MouseButtonsState,
}

/// State of a mouse button.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MouseButtonState {
    /// Button is pressed.
    Pressed,
    /// Button is not pressed.
    Released,
}

/// State of all mouse buttons.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MouseButtonsState {
    /// State of the left mouse button.
    pub left: MouseButtonState,
    /// State of the middle mouse button.
    pub middle: MouseButtonState,
    /// State of the right mouse button.
    pub right: MouseButtonState,
}

impl MouseButtonsState {
    pub(crate) fn set_pressed(&mut self, button: MouseButton) {
        self.set_state(button, MouseButtonState::Pressed);
    }

    pub(crate) fn set_released(&mut self, button: MouseButton) {
        self.set_state(button, MouseButtonState::Released);
    }

    fn set_state(&mut self, button: MouseButton, state: MouseButtonState) {
        match button {
            MouseButton::Left => self.left = state,
            MouseButton::Middle => self.middle = state,
            MouseButton::Right => self.right = state,
            MouseButton::Other => {}
        }
    }

    fn single_pressed(&self) -> Option<MouseButton> {
        let mut button = None;
        if self.left == MouseButtonState::Pressed && button.replace(MouseButton::Left).is_some() {
            return None;
        }
        if self.middle == MouseButtonState::Pressed && button.replace(MouseButton::Middle).is_some()
        {
            return None;
        }
        if self.right == MouseButtonState::Pressed && button.replace(MouseButton::Right).is_some() {
            return None;
        }

        button
    }
}

impl Default for MouseButtonsState {
    fn default() -> Self {
        Self {
            left: MouseButtonState::Released,
            middle: MouseButtonState::Released,
            right: MouseButtonState::Released,
        }
    }
}
