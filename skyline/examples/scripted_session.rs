//! Drives a headless viewer through a short session against live geocoding and routing
//! services: searches a place, clicks a building, requests a route to it and collects a few
//! coordinates with the secondary button.
//!
//! ```sh
//! RUST_LOG=debug cargo run --example scripted_session
//! ```

use std::time::Duration;

use skyline::buildings::BuildingCollection;
use skyline::control::{MouseButton, RawUserEvent};
use skyline::map::Size;
use skyline::skyline_types::{lnglat, GeoPoint};
use skyline::state::Overlay;
use skyline::{Category, MapViewer, Messenger, ViewerConfig};
use web_time::Instant;

const BUILDINGS: &str = r#"{"type": "FeatureCollection", "features": [
    {"type": "Feature",
     "properties": {"name": "King George Hospital", "id": "kgh", "category": "Healthcare",
                    "height": 24},
     "geometry": {"type": "Polygon", "coordinates": [[
        [83.3045, 17.7093], [83.3071, 17.7093], [83.3071, 17.7112],
        [83.3045, 17.7112], [83.3045, 17.7093]]]}},
    {"type": "Feature",
     "properties": {"name": "Andhra University Library", "id": "au-lib", "category": "Educational"},
     "geometry": {"type": "Point", "coordinates": [83.3192, 17.7298]}}
]}"#;

struct LogMessenger;

impl Messenger for LogMessenger {
    fn request_redraw(&self) {
        log::trace!("Redraw requested");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ViewerConfig::default().with_initial_view(lnglat!(83.2185, 17.6868), 15.0);
    let buildings = BuildingCollection::from_geojson_str(BUILDINGS)?;
    let mut viewer = MapViewer::with_http_services(config, buildings)?;
    viewer.mount(Size::new(1280.0, 720.0), Some(Box::new(LogMessenger)))?;

    viewer.set_search_text("Visakhapatnam", Instant::now());
    viewer.submit_search();
    settle(&mut viewer).await;
    log::info!(
        "Search: center {:?}, error {:?}",
        viewer.host().map(|host| host.target_view().center()),
        viewer.state().error()
    );

    click(&mut viewer, lnglat!(83.3058, 17.7101), MouseButton::Left);
    settle(&mut viewer).await;
    if let Overlay::Feature(feature) = viewer.state().overlay() {
        log::info!("Selected '{}' ({:?})", feature.name, feature.category);
    }

    if let Err(error) = viewer.route_to_selection() {
        log::warn!("No route requested: {error}");
    }
    settle(&mut viewer).await;
    log::info!(
        "Route: {} points, error {:?}",
        viewer.state().route().points().len(),
        viewer.state().error()
    );

    click(&mut viewer, lnglat!(83.30, 17.70), MouseButton::Left);
    settle(&mut viewer).await;
    if let Some(address) = viewer.state().reverse_geocode_result() {
        log::info!("Address: {} ({})", address.full_address, address.pincode);
    }

    for lng in [83.31, 83.32, 83.33] {
        click(&mut viewer, lnglat!(lng, 17.71), MouseButton::Right);
    }
    println!("{}", viewer.export_collected_text());

    viewer.set_category(Category::Educational);
    viewer.unmount();

    Ok(())
}

fn click(viewer: &mut MapViewer, point: GeoPoint, button: MouseButton) {
    let Some(px) = viewer.host().map(|host| host.view().geo_to_screen(&point)) else {
        return;
    };

    viewer.handle_event(RawUserEvent::PointerMoved(px));
    viewer.handle_event(RawUserEvent::ButtonPressed(button));
    viewer.handle_event(RawUserEvent::ButtonReleased(button));
}

/// Runs frames until requests had time to finish and camera animations ended.
async fn settle(viewer: &mut MapViewer) {
    for _ in 0..60 {
        tokio::time::sleep(Duration::from_millis(50)).await;
        viewer.tick(Instant::now());
    }
}
