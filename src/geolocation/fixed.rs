//! Position source reporting a single known fix

use crate::coord::Coordinate;
use crate::geolocation::{PositionReading, PositionSource, PositionWatch, WatchOptions};

/// Reports one reading, then ends the watch
///
/// Used when the caller already knows the position (CLI flags, a reading
/// posted by a browser).
#[derive(Debug, Clone, Copy)]
pub struct FixedPositionSource {
    reading: PositionReading,
}

impl FixedPositionSource {
    pub fn new(coordinate: Coordinate, accuracy_m: f64) -> Self {
        Self {
            reading: PositionReading::new(coordinate, accuracy_m),
        }
    }
}

impl PositionSource for FixedPositionSource {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn watch(&self, _options: WatchOptions) -> PositionWatch {
        let (tx, watch) = PositionWatch::channel(1);
        // Capacity 1 and a fresh channel: this cannot be full
        let _ = tx.try_send(Ok(self.reading));
        watch
    }
}
