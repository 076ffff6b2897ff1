use maybe_sync::{MaybeSend, MaybeSync};

/// Connects the map host with whatever draws it. The host calls the messenger every time a
/// dataset, a layer or the camera changes.
pub trait Messenger: MaybeSend + MaybeSync {
    /// Asks the surface to draw a new frame.
    fn request_redraw(&self);
}

/// Messenger that ignores all requests. Useful for headless hosts.
#[derive(Debug, Default, Copy, Clone)]
pub struct DummyMessenger;

impl Messenger for DummyMessenger {
    fn request_redraw(&self) {}
}
