use skyline_types::Point2d;

use crate::control::{
    EventPropagation, MouseButton, MouseButtonsState, MouseEvent, RawUserEvent, UserEvent,
    UserEventHandler,
};
use crate::map::MapHost;

const DRAG_THRESHOLD: f64 = 3.0;

/// Converts [`RawUserEvent`]s into [`UserEvent`]s and runs them through the handler chain.
pub struct EventProcessor {
    handlers: Vec<Box<dyn UserEventHandler>>,
    pointer_position: Point2d,
    pointer_pressed_position: Point2d,

    buttons_state: MouseButtonsState,
    dragging: bool,

    drag_target: Option<usize>,
}

impl Default for EventProcessor {
    fn default() -> Self {
        Self {
            handlers: vec![],
            pointer_position: Default::default(),
            pointer_pressed_position: Default::default(),
            buttons_state: Default::default(),
            dragging: false,
            drag_target: None,
        }
    }
}

impl EventProcessor {
    /// Appends a handler to the end of the chain.
    pub fn add_handler(&mut self, handler: impl UserEventHandler + 'static) {
        self.handlers.push(Box::new(handler));
    }

    /// Returns true if there are no handlers.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Last known pointer position.
    pub fn pointer_position(&self) -> Point2d {
        self.pointer_position
    }

    /// Processes a raw event and gives the resulting user events to the handlers.
    ///
    /// A release is a [`UserEvent::Click`] unless the pointer was dragged since the press, no
    /// matter how long the button was held.
    pub fn handle(&mut self, event: RawUserEvent, map: &mut MapHost) {
        for user_event in self.process(event, map) {
            let mut drag_start_target = None;

            for (index, handler) in self.handlers.iter().enumerate() {
                if matches!(user_event, UserEvent::Drag(..) | UserEvent::DragEnded(..))
                    && self.drag_target != Some(index)
                {
                    continue;
                }

                match handler.handle(&user_event, map) {
                    EventPropagation::Propagate => {}
                    EventPropagation::Stop => break,
                    EventPropagation::Consume => {
                        if let UserEvent::DragStarted(..) = user_event {
                            drag_start_target = Some(index);
                        }

                        break;
                    }
                }
            }

            if drag_start_target.is_some() {
                self.drag_target = drag_start_target;
            } else if matches!(user_event, UserEvent::DragEnded(..)) {
                self.drag_target = None;
            }
        }
    }

    fn process(&mut self, event: RawUserEvent, map: &MapHost) -> Vec<UserEvent> {
        match event {
            RawUserEvent::ButtonPressed(button) => {
                self.buttons_state.set_pressed(button);
                self.pointer_pressed_position = self.pointer_position;
                self.dragging = false;

                let mouse_event = self.mouse_event(map, self.pointer_position);
                let mut events = vec![UserEvent::ButtonPressed(button, mouse_event.clone())];
                if button == MouseButton::Right {
                    events.push(UserEvent::ContextMenu(mouse_event));
                }

                events
            }
            RawUserEvent::ButtonReleased(button) => {
                self.buttons_state.set_released(button);
                let mouse_event = self.mouse_event(map, self.pointer_position);
                let mut events = vec![UserEvent::ButtonReleased(button, mouse_event.clone())];

                if self.dragging {
                    self.dragging = false;
                    if self.drag_target.is_some() {
                        events.push(UserEvent::DragEnded(button, mouse_event));
                    }
                } else {
                    events.push(UserEvent::Click(button, mouse_event));
                }

                events
            }
            RawUserEvent::PointerMoved(position) => {
                let prev_position = self.pointer_position;
                self.pointer_position = position;

                let mut events = vec![UserEvent::PointerMoved(self.mouse_event(map, position))];
                if let Some(button) = self.buttons_state.single_pressed() {
                    if !self.dragging
                        && position.taxicab_distance(&self.pointer_pressed_position)
                            > DRAG_THRESHOLD
                    {
                        self.dragging = true;
                        self.drag_target = None;
                        events.push(UserEvent::DragStarted(
                            button,
                            self.mouse_event(map, self.pointer_pressed_position),
                        ));
                        events.push(UserEvent::Drag(
                            button,
                            position - self.pointer_pressed_position,
                            self.mouse_event(map, position),
                        ));
                    } else if self.dragging {
                        events.push(UserEvent::Drag(
                            button,
                            position - prev_position,
                            self.mouse_event(map, position),
                        ));
                    }
                }

                events
            }
            RawUserEvent::Scroll(delta) => vec![UserEvent::Scroll(
                delta,
                self.mouse_event(map, self.pointer_position),
            )],
        }
    }

    fn mouse_event(&self, map: &MapHost, screen_pointer_position: Point2d) -> MouseEvent {
        MouseEvent {
            screen_pointer_position,
            map_pointer_position: map.view().screen_to_geo(screen_pointer_position),
            buttons: self.buttons_state,
        }
    }
}
