// SPDX-License-Identifier: GPL-3.0-only

//! Capture backend abstraction
//!
//! The viewfinder never owns capture hardware. It talks to a backend through
//! the narrow command surface below and receives everything back as
//! [`Message`]s on its own channel.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────┐   commands (fire-and-forget)   ┌──────────────────┐
//! │ Viewfinder (UI ctx) │ ─────────────────────────────▶ │  CaptureBackend  │
//! └──────────▲──────────┘                                │ (own queue/task) │
//!            │        Completion / SessionEventSink      └────────┬─────────┘
//!            └────────────────── Message channel ◀────────────────┘
//! ```
//!
//! Backends may call [`Completion::complete`] and [`SessionEventSink::send`]
//! from any thread; both only enqueue a message, so no viewfinder state is
//! touched off the UI context.

pub mod simulated;
pub mod types;

pub use simulated::{Lens, SimulatedBackend, SimulatedOptions, SimulatedPhoto, SimulatedSession};
pub use types::*;

use crate::app::state::Message;
use crate::flash::FlashMode;
use crate::location::Location;
use crate::orientation::CaptureOrientation;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

/// Reference to the backend-owned capture session
pub type SessionHandle = Arc<dyn CaptureSession>;

/// Lifecycle notifications from the capture backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// No usable camera (missing hardware or permission denied)
    Unavailable,
    /// The active input changed, e.g. after a lens switch
    ActiveInputChanged { has_flash: bool },
    /// The session is running and a preview can be attached
    SessionStarted,
}

/// Complete capture backend command contract
///
/// Every command returns immediately. Long-running work happens on the
/// backend's own execution context and is reported through the
/// [`Completion`] it was handed.
pub trait CaptureBackend: Send + Sync {
    /// Session the preview surface attaches to
    fn session(&self) -> SessionHandle;

    /// Configure inputs and start the session
    ///
    /// Lifecycle events for the whole session are delivered through `events`.
    fn setup(&self, start_on_front_camera: bool, events: SessionEventSink);

    /// Switch between front and back lens, signalling `done` when finished
    fn switch_camera(&self, done: Completion);

    fn set_flash_mode(&self, mode: FlashMode);

    /// Focus (and expose) at a sensor-space point
    fn focus(&self, point: NormalizedFocusPoint);

    /// Take a still photo framed like `surface`, signalling `done` when stored
    fn capture_photo(&self, surface: PreviewSurfaceRef, location: Option<Location>, done: Completion);
}

/// The running capture session as seen by the preview surface
pub trait CaptureSession: Send + Sync {
    /// Active video connection, `None` while the session has no output yet
    fn connection(&self) -> Option<ConnectionInfo>;

    /// Rotate the delivered stream
    fn set_video_orientation(&self, orientation: CaptureOrientation);

    /// Native frame size of the active input (landscape), if known
    fn frame_size(&self) -> Option<Size>;
}

/// One-shot completion signal for a backend command
///
/// Signalling enqueues the associated message onto the viewfinder channel.
/// A completion dropped without being signalled still delivers its message,
/// so a backend that gives up on a command cannot leave an action pending.
pub struct Completion {
    sender: Option<UnboundedSender<Message>>,
    message: Option<Message>,
}

impl Completion {
    pub(crate) fn new(sender: UnboundedSender<Message>, message: Message) -> Self {
        Self {
            sender: Some(sender),
            message: Some(message),
        }
    }

    /// Signal that the command has finished
    pub fn complete(mut self) {
        self.deliver();
    }

    fn deliver(&mut self) {
        if let (Some(sender), Some(message)) = (self.sender.take(), self.message.take()) {
            if sender.send(message).is_err() {
                debug!("Viewfinder channel closed, completion discarded");
            }
        }
    }
}

impl Drop for Completion {
    fn drop(&mut self) {
        if self.message.is_some() {
            warn!(message = ?self.message, "Completion dropped without being signalled");
            self.deliver();
        }
    }
}

impl std::fmt::Debug for Completion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.message {
            Some(message) => write!(f, "Completion({:?})", message),
            None => write!(f, "Completion(signalled)"),
        }
    }
}

/// Sender for backend lifecycle events
#[derive(Debug, Clone)]
pub struct SessionEventSink {
    sender: UnboundedSender<Message>,
}

impl SessionEventSink {
    pub(crate) fn new(sender: UnboundedSender<Message>) -> Self {
        Self { sender }
    }

    pub fn send(&self, event: SessionEvent) {
        if self.sender.send(Message::Session(event)).is_err() {
            debug!(?event, "Viewfinder channel closed, session event discarded");
        }
    }
}
