mod canvas;

pub use canvas::{Alert, MapCanvas, MapState, MapView, Marker, RouteLayer};

use crate::entities::{Coordinates, Route};

/// Drawing surface for the session. Each call replaces what it draws, so at
/// most one origin marker, one destination marker and one route are visible.
pub trait MapPresenter {
    fn show_origin(&self, origin: Coordinates);
    fn show_destination(&self, destination: Coordinates);
    fn draw_route(&self, route: &Route);
    fn alert(&self, message: String);
}

pub type DynPresenter = std::sync::Arc<dyn MapPresenter + Send + Sync>;
