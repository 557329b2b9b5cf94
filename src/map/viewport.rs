//! Web Mercator viewport math
//!
//! Projection and bounds fitting follow the slippy-map convention: the world
//! is `256 * 2^zoom` pixels wide at a given zoom.

use crate::constants::map::TILE_SIZE_PX;
use crate::coord::Coordinate;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Latitude limit of the Web Mercator projection
const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Pixel size of the map surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportSize {
    pub width: f64,
    pub height: f64,
}

impl ViewportSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned lat/lng bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    pub south_west: Coordinate,
    pub north_east: Coordinate,
}

impl LatLngBounds {
    /// Smallest box containing both points
    pub fn from_points(a: Coordinate, b: Coordinate) -> Self {
        let south_west = Coordinate::clamped(a.lat().min(b.lat()), a.lng().min(b.lng()));
        let north_east = Coordinate::clamped(a.lat().max(b.lat()), a.lng().max(b.lng()));
        Self {
            south_west,
            north_east,
        }
    }

    pub fn contains(&self, point: Coordinate) -> bool {
        (self.south_west.lat()..=self.north_east.lat()).contains(&point.lat())
            && (self.south_west.lng()..=self.north_east.lng()).contains(&point.lng())
    }
}

/// Project a coordinate to world pixels at zoom 0
pub fn project(point: Coordinate) -> (f64, f64) {
    let lat = point.lat().clamp(-MAX_LATITUDE, MAX_LATITUDE);
    let sin = (lat * PI / 180.0).sin();
    let x = (point.lng() + 180.0) / 360.0;
    let y = 0.5 - ((1.0 + sin) / (1.0 - sin)).ln() / (4.0 * PI);
    (x * TILE_SIZE_PX, y * TILE_SIZE_PX)
}

/// Inverse of [`project`]
pub fn unproject(x: f64, y: f64) -> Coordinate {
    let lng = x / TILE_SIZE_PX * 360.0 - 180.0;
    let n = PI - 2.0 * PI * y / TILE_SIZE_PX;
    let lat = (0.5 * (n.exp() - (-n).exp())).atan() * 180.0 / PI;
    Coordinate::clamped(lat, lng)
}

/// Center and zoom that show `bounds` inside `size` minus `padding` on each side
///
/// The zoom is floored to a whole level so the bounds always fit, then
/// clamped to `[min_zoom, max_zoom]`.
pub fn fit_bounds(
    bounds: LatLngBounds,
    size: ViewportSize,
    padding: f64,
    min_zoom: f64,
    max_zoom: f64,
) -> (Coordinate, f64) {
    let (x1, y1) = project(bounds.south_west);
    let (x2, y2) = project(bounds.north_east);
    let center = unproject((x1 + x2) / 2.0, (y1 + y2) / 2.0);

    let span_x = (x2 - x1).abs();
    let span_y = (y2 - y1).abs();
    let avail_x = (size.width - 2.0 * padding).max(1.0);
    let avail_y = (size.height - 2.0 * padding).max(1.0);

    let scale = match (span_x > 0.0, span_y > 0.0) {
        (false, false) => return (center, max_zoom),
        (true, false) => avail_x / span_x,
        (false, true) => avail_y / span_y,
        (true, true) => (avail_x / span_x).min(avail_y / span_y),
    };

    let zoom = scale.log2().floor().clamp(min_zoom, max_zoom);
    (center, zoom)
}

/// Pixel span of `bounds` at `zoom`
pub fn pixel_span(bounds: LatLngBounds, zoom: f64) -> (f64, f64) {
    let (x1, y1) = project(bounds.south_west);
    let (x2, y2) = project(bounds.north_east);
    let scale = 2f64.powf(zoom);
    ((x2 - x1).abs() * scale, (y2 - y1).abs() * scale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn coord(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng).unwrap()
    }

    #[test]
    fn test_project_origin() {
        let (x, y) = project(coord(0.0, 0.0));
        assert_relative_eq!(x, 128.0);
        assert_relative_eq!(y, 128.0, epsilon = 1e-9);
    }

    #[test]
    fn test_project_roundtrip() {
        let p = coord(51.5074, -0.1278);
        let (x, y) = project(p);
        let back = unproject(x, y);
        assert_relative_eq!(back.lat(), p.lat(), epsilon = 1e-9);
        assert_relative_eq!(back.lng(), p.lng(), epsilon = 1e-9);
    }

    #[test]
    fn test_bounds_from_points_orders_corners() {
        let b = LatLngBounds::from_points(coord(10.0, 20.0), coord(-5.0, 30.0));
        assert_eq!(b.south_west, coord(-5.0, 20.0));
        assert_eq!(b.north_east, coord(10.0, 30.0));
        assert!(b.contains(coord(0.0, 25.0)));
        assert!(!b.contains(coord(11.0, 25.0)));
    }

    #[test]
    fn test_fit_bounds_respects_padding() {
        let bounds = LatLngBounds::from_points(coord(48.8566, 2.3522), coord(48.8606, 2.2945));
        let size = ViewportSize::new(800.0, 600.0);
        let (center, zoom) = fit_bounds(bounds, size, 50.0, 3.0, 18.0);

        let (w, h) = pixel_span(bounds, zoom);
        assert!(w <= 700.0 && h <= 500.0);
        // One level closer would overflow
        let (w2, h2) = pixel_span(bounds, zoom + 1.0);
        assert!(w2 > 700.0 || h2 > 500.0);
        assert!(bounds.contains(center));
    }

    #[test]
    fn test_fit_bounds_same_point_uses_max_zoom() {
        let p = coord(1.0, 1.0);
        let (center, zoom) = fit_bounds(
            LatLngBounds::from_points(p, p),
            ViewportSize::new(800.0, 600.0),
            50.0,
            3.0,
            18.0,
        );
        assert_eq!(zoom, 18.0);
        assert_relative_eq!(center.lat(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_fit_bounds_clamps_to_min_zoom() {
        let bounds = LatLngBounds::from_points(coord(-60.0, -170.0), coord(70.0, 170.0));
        let (_, zoom) = fit_bounds(bounds, ViewportSize::new(400.0, 300.0), 50.0, 3.0, 18.0);
        assert_eq!(zoom, 3.0);
    }
}
