// SPDX-License-Identifier: GPL-3.0-only

//! Message update handling
//!
//! The `update()` function is a dispatcher; the handlers live in the
//! `handlers` submodules organized by concern:
//!
//! - `handlers::focus`: Tap-to-focus and the focus indicator
//! - `handlers::capture`: Camera switch, still capture, flash
//! - `handlers::session`: Backend lifecycle, layout, orientation, visibility

use crate::app::Viewfinder;
use crate::app::state::Message;
use tracing::trace;

impl Viewfinder {
    /// Main message handler - routes messages to handler methods
    pub fn update(&mut self, message: Message) {
        trace!(?message, "update");
        match message {
            // ===== Host input =====
            Message::Tap(point) => self.request_focus(point),
            Message::SwitchCamera => self.switch_camera(),
            Message::TakePicture(on_done) => self.take_picture(on_done),
            Message::SelectFlash(label) => self.select_flash(&label),
            Message::CycleFlash => self.cycle_flash(),
            Message::Layout {
                bounds,
                orientation,
            } => self.layout(bounds, orientation),
            Message::DeviceOrientationChanged(orientation) => {
                self.device_orientation_changed(orientation)
            }
            Message::Appeared => self.handle_appeared(),
            Message::Disappeared => self.handle_disappeared(),
            Message::Shutdown => self.handle_shutdown(),

            // ===== Backend =====
            Message::Session(event) => self.handle_session_event(event),
            Message::CameraSwitched => self.handle_camera_switched(),
            Message::PhotoCaptured(id) => self.handle_photo_captured(id),

            // ===== Timers =====
            Message::CoverFadedIn => self.handle_cover_faded_in(),
            Message::CoverFadedOut => self.handle_cover_faded_out(),
            Message::ShutterPeaked { pulse } => self.handle_shutter_peaked(pulse),
            Message::ShutterFaded { pulse } => self.handle_shutter_faded(pulse),
            Message::FocusExpired { generation } => self.handle_focus_expired(generation),
            Message::FocusFaded { generation } => self.handle_focus_faded(generation),
        }
    }
}
