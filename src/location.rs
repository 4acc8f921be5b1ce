// SPDX-License-Identifier: GPL-3.0-only

//! Location source for geotagging captures
//!
//! The viewfinder never resolves positions itself. When location recording
//! is enabled it asks a [`LocationProvider`] for the latest fix at the moment
//! a photo is taken and hands it to the backend unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// A position fix
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    /// Meters above sea level, when the provider knows it
    pub altitude: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

impl Location {
    /// Fix taken now
    pub fn now(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude: None,
            timestamp: Utc::now(),
        }
    }
}

/// External location provider
///
/// Updates are started while the viewfinder is on screen and stopped when
/// it disappears.
pub trait LocationProvider: Send + Sync {
    fn start_updating(&self);
    fn stop_updating(&self);
    /// Most recent fix, if any has been received
    fn latest_location(&self) -> Option<Location>;
}

/// Provider reporting a fixed position while updating
///
/// Used by the command line simulator and by hosts without a positioning
/// service that still want captures tagged.
#[derive(Debug)]
pub struct StaticLocationProvider {
    location: Location,
    updating: Mutex<bool>,
}

impl StaticLocationProvider {
    pub fn new(location: Location) -> Self {
        Self {
            location,
            updating: Mutex::new(false),
        }
    }

    pub fn is_updating(&self) -> bool {
        self.updating.lock().map(|u| *u).unwrap_or(false)
    }

    fn set_updating(&self, value: bool) {
        if let Ok(mut updating) = self.updating.lock() {
            *updating = value;
        }
    }
}

impl LocationProvider for StaticLocationProvider {
    fn start_updating(&self) {
        self.set_updating(true);
    }

    fn stop_updating(&self) {
        self.set_updating(false);
    }

    fn latest_location(&self) -> Option<Location> {
        self.is_updating().then_some(self.location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_provider_reports_only_while_updating() {
        let provider = StaticLocationProvider::new(Location::now(48.85, 2.35));
        assert!(provider.latest_location().is_none());

        provider.start_updating();
        let fix = provider.latest_location().unwrap();
        assert_eq!(fix.latitude, 48.85);

        provider.stop_updating();
        assert!(provider.latest_location().is_none());
    }
}
