//! Device position sources and the locate policy
//!
//! A [`PositionSource`] opens a watch that streams readings until it is
//! cleared. [`locate`] prefers a high-accuracy reading but settles for the
//! best coarse one once the watch window elapses, then cancels the watch.

pub mod fixed;
pub mod ip;

use crate::constants::location::{HIGH_ACCURACY_METERS, WATCH_WINDOW_SECS};
use crate::coord::Coordinate;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// One position fix
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionReading {
    pub coordinate: Coordinate,
    /// Radius of uncertainty in meters
    pub accuracy_m: f64,
}

impl PositionReading {
    pub fn new(coordinate: Coordinate, accuracy_m: f64) -> Self {
        Self {
            coordinate,
            accuracy_m,
        }
    }
}

/// Options passed to a source when opening a watch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WatchOptions {
    pub high_accuracy: bool,
    /// Oldest cached fix the source may hand back
    pub maximum_age: Duration,
    /// Per-fix timeout for sources that support it
    pub timeout: Duration,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            maximum_age: Duration::ZERO,
            timeout: Duration::from_secs(WATCH_WINDOW_SECS),
        }
    }
}

/// Sending half of a watch, held by the source
pub type PositionSender = mpsc::Sender<Result<PositionReading>>;

/// Receiving half of a watch
///
/// Clearing or dropping it cancels the watch: the source's next send fails.
#[derive(Debug)]
pub struct PositionWatch {
    rx: mpsc::Receiver<Result<PositionReading>>,
}

impl PositionWatch {
    /// Create a connected sender/watch pair
    pub fn channel(buffer: usize) -> (PositionSender, Self) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        (tx, Self { rx })
    }

    /// Next reading or error; `None` once the source has finished
    pub async fn next(&mut self) -> Option<Result<PositionReading>> {
        self.rx.recv().await
    }

    /// Stop the watch
    pub fn clear(mut self) {
        self.rx.close();
    }
}

/// Anything that can report the device position
pub trait PositionSource: Send + Sync {
    fn name(&self) -> &'static str;

    /// Start watching the position
    fn watch(&self, options: WatchOptions) -> PositionWatch;
}

/// Thresholds for [`locate`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocatePolicy {
    /// A reading at or below this accuracy ends the watch immediately
    pub high_accuracy_m: f64,
    /// How long to wait for such a reading
    pub window: Duration,
}

impl Default for LocatePolicy {
    fn default() -> Self {
        Self {
            high_accuracy_m: HIGH_ACCURACY_METERS,
            window: Duration::from_secs(WATCH_WINDOW_SECS),
        }
    }
}

/// Result of a locate run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocateOutcome {
    pub reading: PositionReading,
    /// Whether the reading met the high-accuracy threshold
    pub precise: bool,
}

/// Watch `source` until a precise reading arrives or the window closes
///
/// When the window closes, the most accurate reading seen so far is accepted.
/// An error before any reading fails the run; an error after one ends the
/// watch with what was seen. The watch is always cleared before returning.
pub async fn locate<S: PositionSource + ?Sized>(
    source: &S,
    policy: LocatePolicy,
) -> Result<LocateOutcome> {
    let mut watch = source.watch(WatchOptions::default());
    let deadline = tokio::time::sleep(policy.window);
    tokio::pin!(deadline);

    let mut best: Option<PositionReading> = None;
    let mut failure: Option<Error> = None;
    let mut precise = false;

    loop {
        tokio::select! {
            _ = &mut deadline => {
                debug!("Locate window elapsed on {}", source.name());
                break;
            }
            next = watch.next() => match next {
                Some(Ok(reading)) => {
                    debug!("Reading {} ±{}m", reading.coordinate, reading.accuracy_m);
                    if reading.accuracy_m <= policy.high_accuracy_m {
                        best = Some(reading);
                        precise = true;
                        break;
                    }
                    if best.map_or(true, |b| reading.accuracy_m < b.accuracy_m) {
                        best = Some(reading);
                    }
                }
                Some(Err(e)) => {
                    failure = Some(e);
                    break;
                }
                None => break,
            }
        }
    }

    watch.clear();

    match (best, failure) {
        (Some(reading), _) if precise => {
            info!("Precise position from {}", source.name());
            Ok(LocateOutcome {
                reading,
                precise: true,
            })
        }
        (Some(reading), _) => {
            info!(
                "Accepting coarse position from {} (±{}m)",
                source.name(),
                reading.accuracy_m
            );
            Ok(LocateOutcome {
                reading,
                precise: false,
            })
        }
        (None, Some(e)) => Err(e),
        (None, None) => Err(Error::LocationTimeout),
    }
}
