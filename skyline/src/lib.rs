//! Skyline is an interactive 3D building map viewer. It shows a collection of buildings as
//! extruded footprints and clickable markers, finds places with a geocoding service, builds
//! routes with a routing backend and lets the user filter buildings by category.
//!
//! # Quick start
//!
//! ```no_run
//! use skyline::buildings::BuildingCollection;
//! use skyline::control::{MouseButton, RawUserEvent};
//! use skyline::map::Size;
//! use skyline::{MapViewer, ViewerConfig};
//! use web_time::Instant;
//!
//! # async fn run(geojson: &str) -> Result<(), skyline::error::SkylineError> {
//! let buildings = BuildingCollection::from_geojson_str(geojson)?;
//! let mut viewer = MapViewer::with_http_services(ViewerConfig::default(), buildings)?;
//! viewer.mount(Size::new(1280.0, 720.0), None)?;
//!
//! viewer.handle_event(RawUserEvent::ButtonPressed(MouseButton::Left));
//! viewer.handle_event(RawUserEvent::ButtonReleased(MouseButton::Left));
//! viewer.process_next_completion().await;
//! viewer.tick(Instant::now());
//! # Ok(())
//! # }
//! ```
//!
//! # Main components
//!
//! * [`MapHost`] owns the camera, the datasets and the layers drawn on the map surface. It does
//!   not know anything about buildings or searches; it is the thing a drawing backend reads.
//! * [`InteractionState`](state::InteractionState) holds what the user is doing: the selected
//!   building or the clicked address, the route, the search box, the collected coordinates.
//! * [`EventProcessor`](control::EventProcessor) turns raw pointer input into clicks, drags and
//!   context menu requests and passes them to the [`control`] handlers.
//! * [`services`] talk to the geocoding and routing backends. Their results return through the
//!   viewer and are only applied if they answer the latest request of their kind.
//! * [`MapViewer`] ties everything together and, after every change, brings the datasets and
//!   layer styles of the host in line with the interaction state.

#![warn(clippy::unwrap_used)]
#![warn(missing_docs)]

pub(crate) mod async_runtime;
pub mod buildings;
pub mod category;
mod color;
pub mod config;
pub mod control;
pub mod debounce;
pub mod decoded_image;
pub mod dispatch;
pub mod error;
pub mod map;
mod messenger;
pub mod platform;
pub mod services;
pub mod state;
pub mod sync;
mod viewer;

#[cfg(test)]
mod testing;

pub use category::Category;
pub use color::Color;
pub use config::ViewerConfig;
pub use map::MapHost;
pub use messenger::{DummyMessenger, Messenger};
pub use viewer::MapViewer;

// Reexport skyline_types
pub use skyline_types;
