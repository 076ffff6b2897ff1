use std::time::Duration;

use skyline_types::Point2d;

use crate::control::{EventPropagation, MouseButton, UserEvent, UserEventHandler};
use crate::map::{MapHost, MapView};

const DEFAULT_ZOOM_DURATION: Duration = Duration::from_millis(50);
const ROTATION_SPEED_K: f64 = 0.25;

/// Configuration of a [`MapController`]
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct MapControllerConfiguration {
    zoom_duration: Duration,
    zoom_speed: f64,
    min_zoom: f64,
    max_zoom: f64,

    rotation_speed: f64,
    min_pitch: f64,
    max_pitch: f64,
}

impl Default for MapControllerConfiguration {
    fn default() -> Self {
        Self {
            zoom_duration: DEFAULT_ZOOM_DURATION,
            zoom_speed: 0.5,
            min_zoom: 2.0,
            max_zoom: 20.0,
            rotation_speed: 1.0,
            min_pitch: 0.0,
            max_pitch: 80.0,
        }
    }
}

impl MapControllerConfiguration {
    /// Duration of the zoom animation when mouse wheel is turned.
    pub fn zoom_duration(&self) -> Duration {
        self.zoom_duration
    }

    /// Sets duration of the zoom animation when mouse wheel is turned.
    pub fn with_zoom_duration(mut self, duration: Duration) -> Self {
        self.zoom_duration = duration;
        self
    }

    /// Zoom levels added for every line of mouse wheel scroll.
    pub fn zoom_speed(&self) -> f64 {
        self.zoom_speed
    }

    /// Sets zoom levels added for every line of mouse wheel scroll.
    pub fn with_zoom_speed(mut self, speed: f64) -> Self {
        self.zoom_speed = speed;
        self
    }

    /// Allowed zoom range.
    pub fn zoom_range(&self) -> (f64, f64) {
        (self.min_zoom, self.max_zoom)
    }

    /// Sets allowed zoom range.
    pub fn with_zoom_range(mut self, min: f64, max: f64) -> Self {
        self.min_zoom = min;
        self.max_zoom = max;
        self
    }

    /// Sensitivity for map rotation by dragging right mouse button.
    ///
    /// The value here is an abstract multiplier. Default value is `1.0`. Use higher values for
    /// higher sensitivity. Negative value will inverse rotation direction.
    pub fn rotation_speed(&self) -> f64 {
        self.rotation_speed
    }

    /// Sets sensitivity for map rotation by dragging right mouse button.
    pub fn with_rotation_speed(mut self, speed: f64) -> Self {
        self.rotation_speed = speed;
        self
    }

    /// Allowed pitch range in degrees.
    pub fn pitch_range(&self) -> (f64, f64) {
        (self.min_pitch, self.max_pitch)
    }

    /// Sets allowed pitch range in degrees.
    pub fn with_pitch_range(mut self, min: f64, max: f64) -> Self {
        self.min_pitch = min;
        self.max_pitch = max;
        self
    }
}

/// Pans the map by dragging with the primary button, rotates and tilts it by dragging with the
/// secondary one, and zooms it with the mouse wheel.
#[derive(Debug, Default)]
pub struct MapController {
    config: MapControllerConfiguration,
}

impl MapController {
    /// Creates a new controller with the given configuration.
    pub fn new(config: MapControllerConfiguration) -> Self {
        Self { config }
    }
}

impl UserEventHandler for MapController {
    fn handle(&self, event: &UserEvent, map: &mut MapHost) -> EventPropagation {
        match event {
            UserEvent::DragStarted(button, _)
                if *button == MouseButton::Left
                    || *button == MouseButton::Right
                    || *button == MouseButton::Other =>
            {
                EventPropagation::Consume
            }
            UserEvent::Drag(button, delta, _) => match button {
                MouseButton::Left | MouseButton::Other => {
                    let target = map.view().translate_by_pixels(*delta);
                    let adjusted = self.adjust_target_view(target);

                    map.set_view(adjusted);
                    EventPropagation::Stop
                }
                MouseButton::Right => {
                    let target = self.get_rotation(map.view(), *delta);
                    let adjusted = self.adjust_target_view(target);
                    map.set_view(adjusted);

                    EventPropagation::Stop
                }
                _ => EventPropagation::Propagate,
            },
            UserEvent::Scroll(delta, mouse_event) => {
                let target = map.target_view().zoom_around(
                    delta * self.config.zoom_speed,
                    mouse_event.screen_pointer_position,
                );
                let adjusted = self.adjust_target_view(target);
                map.animate_to(adjusted, self.config.zoom_duration);

                EventPropagation::Stop
            }
            _ => EventPropagation::Propagate,
        }
    }
}

impl MapController {
    fn get_rotation(&self, curr_view: &MapView, px_delta: Point2d) -> MapView {
        let k = self.config.rotation_speed * ROTATION_SPEED_K;
        curr_view
            .with_bearing(curr_view.bearing() + px_delta.x * k)
            .with_pitch(curr_view.pitch() - px_delta.y * k)
    }

    /// Adjusts target view according to the controller configuration.
    fn adjust_target_view(&self, target: MapView) -> MapView {
        target
            .with_zoom(target.zoom().clamp(self.config.min_zoom, self.config.max_zoom))
            .with_pitch(target.pitch().clamp(self.config.min_pitch, self.config.max_pitch))
    }
}
