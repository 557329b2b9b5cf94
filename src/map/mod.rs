//! Map view state
//!
//! A single owned map: base tile layer, viewport, and the overlays drawn on
//! top of it. Rendering is left to whatever front end consumes
//! [`MapView::snapshot`]; this module only keeps the state consistent.
//!
//! At most one primary marker, one accuracy circle and one route exist at a
//! time. Every setter removes the previous overlay of its kind before adding
//! the new one.

pub mod viewport;

use crate::constants::map::{LABEL_PARTS, ROUTE_PADDING_PX};
use crate::coord::Coordinate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;
use viewport::{fit_bounds, LatLngBounds, ViewportSize};

/// Map shared between flows of one page
///
/// Flows lock it only while applying overlays, so concurrent flows interleave
/// and the last writer wins.
pub type SharedMap = Arc<Mutex<MapView>>;

/// Where the zoom buttons sit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlPosition {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Fixed user-interaction settings, chosen once at initialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionConfig {
    pub dragging: bool,
    pub touch_zoom: bool,
    pub scroll_wheel_zoom: bool,
    pub double_click_zoom: bool,
    pub box_zoom: bool,
    pub zoom_control: ControlPosition,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            dragging: true,
            touch_zoom: true,
            scroll_wheel_zoom: false,
            double_click_zoom: true,
            box_zoom: false,
            zoom_control: ControlPosition::BottomRight,
        }
    }
}

/// Base raster tile layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileLayer {
    pub url_template: String,
    pub attribution: String,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

/// Current camera
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub center: Coordinate,
    pub zoom: f64,
    /// Whether the front end should animate into this view
    pub animate: bool,
}

macro_rules! overlay_handle {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(Uuid);

        impl $name {
            fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }
    };
}

overlay_handle!(MarkerHandle);
overlay_handle!(CircleHandle);
overlay_handle!(RouteHandle);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub id: MarkerHandle,
    pub position: Coordinate,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccuracyCircle {
    pub id: CircleHandle,
    pub center: Coordinate,
    pub radius_m: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub id: RouteHandle,
    pub from: Coordinate,
    pub to: Coordinate,
    pub bounds: LatLngBounds,
}

/// Serializable copy of the whole map state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapSnapshot {
    pub view: ViewState,
    pub size: ViewportSize,
    pub interaction: InteractionConfig,
    pub tiles: TileLayer,
    pub marker: Option<Marker>,
    pub accuracy_circle: Option<AccuracyCircle>,
    pub route: Option<Route>,
}

/// The single map widget of a page
#[derive(Debug, Clone)]
pub struct MapView {
    view: ViewState,
    size: ViewportSize,
    interaction: InteractionConfig,
    tiles: TileLayer,
    marker: Option<Marker>,
    accuracy_circle: Option<AccuracyCircle>,
    route: Option<Route>,
}

impl MapView {
    /// Set up the map once with its base layer, camera and interaction flags
    pub fn initialize(
        center: Coordinate,
        zoom: f64,
        interaction: InteractionConfig,
        tiles: TileLayer,
        size: ViewportSize,
    ) -> Self {
        let zoom = zoom.min(tiles.max_zoom);
        Self {
            view: ViewState {
                center,
                zoom,
                animate: false,
            },
            size,
            interaction,
            tiles,
            marker: None,
            accuracy_circle: None,
            route: None,
        }
    }

    /// Build a map from configuration
    pub fn from_config(config: &crate::config::MapConfig) -> Self {
        Self::initialize(
            config.initial_center(),
            config.initial_zoom,
            InteractionConfig::default(),
            config.tile_layer(),
            ViewportSize::new(config.viewport_width, config.viewport_height),
        )
    }

    /// Wrap in the shared handle used by concurrent flows
    pub fn shared(self) -> SharedMap {
        Arc::new(Mutex::new(self))
    }

    /// Place the primary marker, replacing any previous one
    pub fn set_marker(&mut self, position: Coordinate, label: impl Into<String>) -> MarkerHandle {
        self.clear_marker();
        let id = MarkerHandle::new();
        let label = label.into();
        debug!("Marker at {}: {}", position, label);
        self.marker = Some(Marker {
            id,
            position,
            label,
        });
        id
    }

    /// Draw the accuracy circle, replacing any previous one
    pub fn set_accuracy_circle(&mut self, center: Coordinate, radius_m: f64) -> CircleHandle {
        self.clear_accuracy_circle();
        let id = CircleHandle::new();
        self.accuracy_circle = Some(AccuracyCircle {
            id,
            center,
            radius_m: radius_m.max(0.0),
        });
        id
    }

    /// Draw a straight route line and fit the viewport to it
    ///
    /// Any previous route is removed first. The view is fitted with a fixed
    /// padding on both axes.
    pub fn draw_route(&mut self, from: Coordinate, to: Coordinate) -> RouteHandle {
        self.clear_route();
        let id = RouteHandle::new();
        let bounds = LatLngBounds::from_points(from, to);
        self.route = Some(Route {
            id,
            from,
            to,
            bounds,
        });

        let (center, zoom) = fit_bounds(
            bounds,
            self.size,
            ROUTE_PADDING_PX,
            self.tiles.min_zoom,
            self.tiles.max_zoom,
        );
        debug!("Fitted route {} -> {} at zoom {}", from, to, zoom);
        self.view = ViewState {
            center,
            zoom,
            animate: false,
        };
        id
    }

    /// Animated recenter on a coordinate
    pub fn focus(&mut self, center: Coordinate, zoom: f64) {
        self.view = ViewState {
            center,
            zoom: zoom.clamp(self.tiles.min_zoom, self.tiles.max_zoom),
            animate: true,
        };
    }

    pub fn clear_marker(&mut self) -> Option<Marker> {
        self.marker.take()
    }

    pub fn clear_accuracy_circle(&mut self) -> Option<AccuracyCircle> {
        self.accuracy_circle.take()
    }

    pub fn clear_route(&mut self) -> Option<Route> {
        self.route.take()
    }

    pub fn view(&self) -> ViewState {
        self.view
    }

    pub fn interaction(&self) -> InteractionConfig {
        self.interaction
    }

    pub fn marker(&self) -> Option<&Marker> {
        self.marker.as_ref()
    }

    pub fn accuracy_circle(&self) -> Option<&AccuracyCircle> {
        self.accuracy_circle.as_ref()
    }

    pub fn route(&self) -> Option<&Route> {
        self.route.as_ref()
    }

    /// Number of overlays currently attached
    pub fn overlay_count(&self) -> usize {
        self.marker.iter().count()
            + self.accuracy_circle.iter().count()
            + self.route.iter().count()
    }

    pub fn snapshot(&self) -> MapSnapshot {
        MapSnapshot {
            view: self.view,
            size: self.size,
            interaction: self.interaction,
            tiles: self.tiles.clone(),
            marker: self.marker.clone(),
            accuracy_circle: self.accuracy_circle.clone(),
            route: self.route.clone(),
        }
    }
}

/// Shorten a geocoder display name to its leading address parts
///
/// "Eiffel Tower, 5, Avenue Anatole France, Paris, France" becomes
/// "Eiffel Tower, 5, Avenue Anatole France".
pub fn short_label(display_name: &str) -> String {
    display_name
        .split(',')
        .take(LABEL_PARTS)
        .collect::<Vec<_>>()
        .join(",")
        .trim()
        .to_string()
}
