// SPDX-License-Identifier: GPL-3.0-only

//! Simulated capture backend
//!
//! Behaves like a two-lens phone camera without touching hardware: commands
//! run on tokio tasks with configurable latencies and report back through
//! the viewfinder channel exactly as a real backend would. The back lens has
//! a flash, the front lens does not and is mirrored.
//!
//! Used by the `simulate` command and by the end-to-end tests.

use super::{
    CaptureBackend, CaptureSession, Completion, ConnectionInfo, NormalizedFocusPoint,
    PreviewSurfaceRef, SessionEvent, SessionEventSink, SessionHandle, Size,
};
use crate::flash::FlashMode;
use crate::location::Location;
use crate::orientation::CaptureOrientation;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::{debug, info, warn};

/// Camera lens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lens {
    Back,
    Front,
}

impl Lens {
    fn other(self) -> Self {
        match self {
            Lens::Back => Lens::Front,
            Lens::Front => Lens::Back,
        }
    }

    fn has_flash(self) -> bool {
        matches!(self, Lens::Back)
    }
}

/// Latencies and failure modes of the simulated hardware
#[derive(Debug, Clone)]
pub struct SimulatedOptions {
    /// Report the camera as unavailable instead of starting
    pub unavailable: bool,
    pub start_latency: Duration,
    pub switch_latency: Duration,
    pub capture_latency: Duration,
    /// Native frame size of both lenses
    pub frame_size: Size,
    /// Whether the connection accepts orientation changes
    pub orientation_supported: bool,
}

impl Default for SimulatedOptions {
    fn default() -> Self {
        Self {
            unavailable: false,
            start_latency: Duration::from_millis(250),
            switch_latency: Duration::from_millis(400),
            capture_latency: Duration::from_millis(350),
            frame_size: Size::new(1920.0, 1080.0),
            orientation_supported: true,
        }
    }
}

/// Record of a completed simulated capture
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedPhoto {
    pub surface: PreviewSurfaceRef,
    pub location: Option<Location>,
    pub lens: Lens,
    pub flash: FlashMode,
    pub focus: Option<NormalizedFocusPoint>,
}

#[derive(Debug)]
struct SessionState {
    running: bool,
    lens: Lens,
    orientation: Option<CaptureOrientation>,
    flash: FlashMode,
    focus: Option<NormalizedFocusPoint>,
    photos: Vec<SimulatedPhoto>,
}

/// Session side of the simulated backend
#[derive(Debug)]
pub struct SimulatedSession {
    state: Mutex<SessionState>,
    frame_size: Size,
    orientation_supported: bool,
}

impl SimulatedSession {
    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn orientation(&self) -> Option<CaptureOrientation> {
        self.lock().orientation
    }
}

impl CaptureSession for SimulatedSession {
    fn connection(&self) -> Option<ConnectionInfo> {
        let state = self.lock();
        state.running.then_some(ConnectionInfo {
            orientation_supported: self.orientation_supported,
            mirrored: state.lens == Lens::Front,
        })
    }

    fn set_video_orientation(&self, orientation: CaptureOrientation) {
        self.lock().orientation = Some(orientation);
    }

    fn frame_size(&self) -> Option<Size> {
        Some(self.frame_size)
    }
}

/// Two-lens capture backend running on tokio tasks
pub struct SimulatedBackend {
    options: SimulatedOptions,
    session: Arc<SimulatedSession>,
    events: Mutex<Option<SessionEventSink>>,
    runtime: Handle,
}

impl SimulatedBackend {
    pub fn new(options: SimulatedOptions, runtime: Handle) -> Self {
        let session = Arc::new(SimulatedSession {
            state: Mutex::new(SessionState {
                running: false,
                lens: Lens::Back,
                orientation: None,
                flash: FlashMode::default(),
                focus: None,
                photos: Vec::new(),
            }),
            frame_size: options.frame_size,
            orientation_supported: options.orientation_supported,
        });
        Self {
            options,
            session,
            events: Mutex::new(None),
            runtime,
        }
    }

    pub fn lens(&self) -> Lens {
        self.session.lock().lens
    }

    pub fn flash_mode(&self) -> FlashMode {
        self.session.lock().flash
    }

    /// Photos taken so far, oldest first
    pub fn photos(&self) -> Vec<SimulatedPhoto> {
        self.session.lock().photos.clone()
    }

    pub fn simulated_session(&self) -> Arc<SimulatedSession> {
        Arc::clone(&self.session)
    }

    fn events(&self) -> Option<SessionEventSink> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl CaptureBackend for SimulatedBackend {
    fn session(&self) -> SessionHandle {
        self.session.clone()
    }

    fn setup(&self, start_on_front_camera: bool, events: SessionEventSink) {
        *self.events.lock().unwrap_or_else(PoisonError::into_inner) = Some(events.clone());

        let session = Arc::clone(&self.session);
        let options = self.options.clone();
        self.runtime.spawn(async move {
            tokio::time::sleep(options.start_latency).await;
            if options.unavailable {
                warn!("Simulated camera unavailable");
                events.send(SessionEvent::Unavailable);
                return;
            }

            let lens = if start_on_front_camera {
                Lens::Front
            } else {
                Lens::Back
            };
            {
                let mut state = session.lock();
                state.lens = lens;
                state.running = true;
            }
            info!(?lens, "Simulated session started");
            events.send(SessionEvent::ActiveInputChanged {
                has_flash: lens.has_flash(),
            });
            events.send(SessionEvent::SessionStarted);
        });
    }

    fn switch_camera(&self, done: Completion) {
        let session = Arc::clone(&self.session);
        let events = self.events();
        let latency = self.options.switch_latency;
        self.runtime.spawn(async move {
            tokio::time::sleep(latency).await;
            let lens = {
                let mut state = session.lock();
                if !state.running {
                    warn!("Switch requested on a stopped session");
                    drop(state);
                    done.complete();
                    return;
                }
                state.lens = state.lens.other();
                state.focus = None;
                state.lens
            };
            info!(?lens, "Simulated lens switched");
            if let Some(events) = events {
                events.send(SessionEvent::ActiveInputChanged {
                    has_flash: lens.has_flash(),
                });
            }
            done.complete();
        });
    }

    fn set_flash_mode(&self, mode: FlashMode) {
        debug!(%mode, "Simulated flash mode");
        self.session.lock().flash = mode;
    }

    fn focus(&self, point: NormalizedFocusPoint) {
        debug!(%point, "Simulated focus");
        self.session.lock().focus = Some(point);
    }

    fn capture_photo(&self, surface: PreviewSurfaceRef, location: Option<Location>, done: Completion) {
        let session = Arc::clone(&self.session);
        let latency = self.options.capture_latency;
        self.runtime.spawn(async move {
            tokio::time::sleep(latency).await;
            {
                let mut state = session.lock();
                let photo = SimulatedPhoto {
                    surface,
                    location,
                    lens: state.lens,
                    // The front lens has no flash to fire
                    flash: if state.lens.has_flash() {
                        state.flash
                    } else {
                        FlashMode::Off
                    },
                    focus: state.focus,
                };
                info!(lens = ?photo.lens, flash = %photo.flash, "Simulated photo captured");
                state.photos.push(photo);
            }
            done.complete();
        });
    }
}
