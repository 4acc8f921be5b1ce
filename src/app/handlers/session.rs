// SPDX-License-Identifier: GPL-3.0-only

//! Session lifecycle and layout handlers
//!
//! Reacts to capture backend lifecycle events, host layout passes, device
//! rotation and visibility changes.

use crate::app::Viewfinder;
use crate::backends::{Rect, SessionEvent};
use crate::orientation::DeviceOrientation;
use tracing::{debug, info, warn};

impl Viewfinder {
    // =========================================================================
    // Backend Lifecycle Events
    // =========================================================================

    pub(crate) fn handle_session_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Unavailable => self.handle_unavailable(),
            SessionEvent::ActiveInputChanged { has_flash } => {
                self.handle_active_input_changed(has_flash)
            }
            SessionEvent::SessionStarted => self.handle_session_started(),
        }
    }

    /// Camera unavailable: show the fallback panel and stop offering focus and capture
    ///
    /// Sticky for the lifetime of the viewfinder. The host is notified on
    /// every event, the state is only re-asserted.
    fn handle_unavailable(&mut self) {
        warn!("Camera not available");
        self.visibility.has_camera = false;
        self.visibility.no_camera_visible = true;
        self.focus.disable();
        self.notify(|host| host.camera_not_available());
    }

    fn handle_active_input_changed(&mut self, has_flash: bool) {
        info!(has_flash, "Active input changed");
        if !self.visibility.has_camera {
            debug!("Input changed after unavailability, camera stays unavailable");
        }
        self.visibility.flash_control_visible = has_flash;
        self.notify(|host| host.set_flash_button_hidden(!has_flash));
    }

    /// The only point at which a preview surface comes into existence
    fn handle_session_started(&mut self) {
        info!("Capture session started");
        self.preview.attach(self.backend.session(), self.bounds);
        self.apply_device_orientation();
    }

    // =========================================================================
    // Layout & Orientation
    // =========================================================================

    /// Layout pass: resize the preview and re-apply the device orientation
    pub fn layout(&mut self, bounds: Rect, orientation: DeviceOrientation) {
        self.bounds = bounds;
        self.device_orientation = orientation;
        self.preview.layout(bounds);
        self.apply_device_orientation();
    }

    pub fn device_orientation_changed(&mut self, orientation: DeviceOrientation) {
        debug!(%orientation, "Device orientation changed");
        self.device_orientation = orientation;
        self.apply_device_orientation();
    }

    /// Map the sampled device orientation and apply it when it carries a rotation
    fn apply_device_orientation(&mut self) {
        if let Some(capture) = self.device_orientation.capture_orientation() {
            self.preview.apply_orientation(capture);
        }
    }

    // =========================================================================
    // Visibility
    // =========================================================================

    pub(crate) fn handle_appeared(&mut self) {
        if let Some(location) = &self.location {
            debug!("Starting location updates");
            location.start_updating();
        }
    }

    pub(crate) fn handle_disappeared(&mut self) {
        if let Some(location) = &self.location {
            debug!("Stopping location updates");
            location.stop_updating();
        }
    }

    /// Host view torn down: release everything the viewfinder owns
    pub(crate) fn handle_shutdown(&mut self) {
        info!("Shutting down viewfinder");
        self.handle_disappeared();
        self.focus.cancel_timer();
        self.focus.hide();
        self.preview.detach();
    }
}
