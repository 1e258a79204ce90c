use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::MapPresenter;
use crate::entities::{Coordinates, Route};

pub const ROUTE_LAYER_ID: &str = "route";
pub const ROUTE_LINE_COLOR: &str = "rgba(215, 89, 89, 0.6)";
pub const ROUTE_LINE_WIDTH: u32 = 6;
pub const DEFAULT_ZOOM: u8 = 14;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    pub center: Coordinates,
    pub zoom: u8,
    pub traffic_incidents: bool,
    pub traffic_flow: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub position: Coordinates,
    pub class_name: String,
    pub draggable: bool,
    pub popup: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteLayer {
    pub id: String,
    pub route_token: Uuid,
    pub line_color: String,
    pub line_width: u32,
    pub data: serde_json::Value,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub message: String,
    pub raised_at: DateTime<Utc>,
}

/// Everything currently drawn, as handed to a client.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapState {
    pub view: MapView,
    pub origin: Option<Marker>,
    pub destination: Option<Marker>,
    pub route: Option<RouteLayer>,
    pub alert: Option<Alert>,
}

/// In-memory map surface backing the HTTP map endpoint.
#[derive(Debug)]
pub struct MapCanvas {
    state: RwLock<MapState>,
}

impl MapCanvas {
    pub fn new(center: Coordinates) -> Self {
        Self {
            state: RwLock::new(MapState {
                view: MapView {
                    center,
                    zoom: DEFAULT_ZOOM,
                    traffic_incidents: true,
                    traffic_flow: true,
                },
                origin: None,
                destination: None,
                route: None,
                alert: None,
            }),
        }
    }

    pub fn snapshot(&self) -> MapState {
        self.state
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn update<F: FnOnce(&mut MapState)>(&self, f: F) {
        let mut state = self
            .state
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut state);
    }
}

impl MapPresenter for MapCanvas {
    fn show_origin(&self, origin: Coordinates) {
        // rebuilding around a new origin drops everything that was drawn
        self.update(|state| {
            state.view.center = origin;
            state.origin = Some(Marker {
                position: origin,
                class_name: "marker".into(),
                draggable: true,
                popup: Some("Here You Are!".into()),
            });
            state.destination = None;
            state.route = None;
            state.alert = None;
        });
    }

    fn show_destination(&self, destination: Coordinates) {
        self.update(|state| {
            state.destination = Some(Marker {
                position: destination,
                class_name: "marker-delivery".into(),
                draggable: false,
                popup: None,
            });
            state.alert = None;
        });
    }

    fn draw_route(&self, route: &Route) {
        self.update(|state| {
            state.route = Some(RouteLayer {
                id: ROUTE_LAYER_ID.into(),
                route_token: route.token,
                line_color: ROUTE_LINE_COLOR.into(),
                line_width: ROUTE_LINE_WIDTH,
                data: route.geometry.geojson.clone(),
            });
            state.alert = None;
        });
    }

    fn alert(&self, message: String) {
        self.update(|state| {
            state.alert = Some(Alert {
                message,
                raised_at: Utc::now(),
            });
        });
    }
}

#[test]
fn destination_marker_is_replaced() {
    let canvas = MapCanvas::new(Coordinates::new(-5.93, 54.5958));

    canvas.show_destination(Coordinates::new(-6.0, 54.6));
    canvas.show_destination(Coordinates::new(-5.8, 54.5));

    let state = canvas.snapshot();
    assert_eq!(
        state.destination.map(|m| m.position),
        Some(Coordinates::new(-5.8, 54.5))
    );
}

#[test]
fn new_destination_dismisses_alert() {
    let canvas = MapCanvas::new(Coordinates::new(-5.93, 54.5958));

    canvas.show_destination(Coordinates::new(-6.0, 54.6));
    canvas.alert("routing unavailable".into());
    assert!(canvas.snapshot().alert.is_some());

    canvas.show_destination(Coordinates::new(-5.8, 54.5));
    assert!(canvas.snapshot().alert.is_none());
}

#[test]
fn new_origin_clears_route_and_destination() {
    use crate::entities::{RouteGeometry, RoutePath};

    let canvas = MapCanvas::new(Coordinates::new(-5.93, 54.5958));
    let route = Route::new(
        RoutePath::new(Coordinates::new(-5.93, 54.5958), &[]),
        vec![],
        RouteGeometry {
            geojson: serde_json::json!({ "type": "FeatureCollection", "features": [] }),
            summary: None,
        },
    );

    canvas.show_destination(Coordinates::new(-6.0, 54.6));
    canvas.draw_route(&route);
    canvas.show_origin(Coordinates::new(1.0, 2.0));

    let state = canvas.snapshot();
    assert!(state.destination.is_none());
    assert!(state.route.is_none());
    assert_eq!(state.view.center, Coordinates::new(1.0, 2.0));
    assert_eq!(state.view.zoom, DEFAULT_ZOOM);
    assert_eq!(state.origin.unwrap().popup.as_deref(), Some("Here You Are!"));
}
