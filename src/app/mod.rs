// SPDX-License-Identifier: GPL-3.0-only

//! Viewfinder coordinator
//!
//! This module contains the viewfinder state, message handling and the
//! run loop that ties it to a capture backend.
//!
//! # Architecture
//!
//! - `state`: Message and state types (focus indicator, overlays, visibility)
//! - `preview`: Preview surface creation, layout and orientation
//! - `scheduler`: Delayed messages for animations and timers
//! - `handlers`: Message handlers grouped by concern
//! - `update`: Message dispatch
//! - `runtime`: Channel, host handle and run loop
//!
//! All state lives in [`Viewfinder`] and is only touched from
//! [`Viewfinder::update`], which runs on a single logical context. Anything
//! asynchronous (timers, backend completions, lifecycle events) arrives as a
//! [`Message`].

mod handlers;
pub mod preview;
pub mod runtime;
pub mod scheduler;
pub mod state;
#[cfg(test)]
mod test_support;
mod update;

pub use preview::{PreviewSurface, PreviewSurfaceManager};
pub use runtime::{ViewfinderHandle, channel, run};
pub use scheduler::{ManualScheduler, Scheduler, TimerHandle, TokioScheduler};
pub use state::{
    ActionId, Animation, CaptureCallback, CapturePhase, FocusIndicatorState, Message, Overlay,
    SwitchPhase, UiVisibility,
};

use crate::backends::{CaptureBackend, Completion, Rect, SessionEventSink};
use crate::config::Config;
use crate::flash::FlashMode;
use crate::location::LocationProvider;
use crate::orientation::DeviceOrientation;
use state::FocusIndicator;
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info};

/// Host notifications
///
/// A single listener, held without ownership: the viewfinder never keeps its
/// host alive.
pub trait ViewfinderDelegate: Send + Sync {
    fn set_flash_button_hidden(&self, hidden: bool);
    /// A photo was captured and can be moved to the library
    fn image_captured(&self);
    fn camera_not_available(&self);
}

/// Coordinator between the capture session and the viewfinder surface
pub struct Viewfinder {
    config: Config,
    backend: Arc<dyn CaptureBackend>,
    scheduler: Box<dyn Scheduler>,
    sender: UnboundedSender<Message>,
    delegate: Option<Weak<dyn ViewfinderDelegate>>,
    /// Only present when location recording is enabled
    location: Option<Arc<dyn LocationProvider>>,

    visibility: UiVisibility,
    preview: PreviewSurfaceManager,
    focus: FocusIndicator,

    /// Cross-fade cover masking lens switches
    cover: Overlay,
    switch_phase: SwitchPhase,

    /// Shutter flash overlay
    shutter: Overlay,
    shutter_pulse: u64,
    pending_captures: HashMap<ActionId, Option<CaptureCallback>>,
    next_action_id: u64,

    flash_mode: FlashMode,
    device_orientation: DeviceOrientation,
    bounds: Rect,
    started: bool,
}

impl Viewfinder {
    /// Build a viewfinder with all overlays in their initial state
    ///
    /// `sender` must feed the receiver that drives [`Viewfinder::update`].
    /// `location` is ignored unless the configuration enables location
    /// recording.
    pub fn new(
        config: Config,
        backend: Arc<dyn CaptureBackend>,
        scheduler: Box<dyn Scheduler>,
        sender: UnboundedSender<Message>,
        location: Option<Arc<dyn LocationProvider>>,
    ) -> Self {
        let location = if config.record_location {
            location
        } else {
            if location.is_some() {
                debug!("Location recording disabled, provider ignored");
            }
            None
        };

        Self {
            preview: PreviewSurfaceManager::new(config.main_color),
            config,
            backend,
            scheduler,
            sender,
            delegate: None,
            location,
            visibility: UiVisibility::default(),
            focus: FocusIndicator::default(),
            cover: Overlay::transparent(),
            switch_phase: SwitchPhase::Idle,
            shutter: Overlay::transparent(),
            shutter_pulse: 0,
            pending_captures: HashMap::new(),
            next_action_id: 0,
            flash_mode: FlashMode::default(),
            device_orientation: DeviceOrientation::Unknown,
            bounds: Rect::default(),
            started: false,
        }
    }

    /// Register the host listener, replacing any previous one
    pub fn set_delegate<D: ViewfinderDelegate + 'static>(&mut self, delegate: &Arc<D>) {
        let delegate: Weak<D> = Arc::downgrade(delegate);
        self.delegate = Some(delegate);
    }

    /// Ask the backend to set up and start the session
    ///
    /// Only the first call has an effect.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        info!(
            front = self.config.start_on_front_camera,
            location = self.location.is_some(),
            "Starting capture session"
        );
        self.backend.setup(
            self.config.start_on_front_camera,
            SessionEventSink::new(self.sender.clone()),
        );
    }

    // ===== Accessors =====

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn visibility(&self) -> UiVisibility {
        self.visibility
    }

    pub fn preview(&self) -> Option<&PreviewSurface> {
        self.preview.surface()
    }

    pub fn focus_indicator(&self) -> FocusIndicatorState {
        self.focus.state()
    }

    /// Pending focus indicator timers, at most one
    pub fn pending_focus_timers(&self) -> usize {
        self.focus.pending_timers()
    }

    pub fn cover(&self) -> Overlay {
        self.cover
    }

    pub fn shutter(&self) -> Overlay {
        self.shutter
    }

    pub fn switch_phase(&self) -> SwitchPhase {
        self.switch_phase
    }

    pub fn capture_phase(&self) -> CapturePhase {
        if self.shutter.is_animating() {
            CapturePhase::ShutterPulsing
        } else if !self.pending_captures.is_empty() {
            CapturePhase::BackendPending
        } else {
            CapturePhase::Idle
        }
    }

    /// Captures issued to the backend and not yet completed
    pub fn pending_captures(&self) -> usize {
        self.pending_captures.len()
    }

    pub fn flash_mode(&self) -> FlashMode {
        self.flash_mode
    }

    pub fn device_orientation(&self) -> DeviceOrientation {
        self.device_orientation
    }

    // ===== Internal helpers =====

    fn delegate(&self) -> Option<Arc<dyn ViewfinderDelegate>> {
        self.delegate.as_ref().and_then(Weak::upgrade)
    }

    /// Run `f` against the host listener, if it is still alive
    fn notify(&self, f: impl FnOnce(&dyn ViewfinderDelegate)) {
        match self.delegate() {
            Some(delegate) => f(&*delegate),
            None => debug!("No host listener, notification dropped"),
        }
    }

    fn completion(&self, message: Message) -> Completion {
        Completion::new(self.sender.clone(), message)
    }

    fn next_action_id(&mut self) -> ActionId {
        self.next_action_id += 1;
        ActionId(self.next_action_id)
    }
}
