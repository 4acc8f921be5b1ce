// SPDX-License-Identifier: GPL-3.0-only

//! Run loop and host handle
//!
//! The viewfinder is owned by a single task that drains its message channel.
//! Hosts post input through a [`ViewfinderHandle`]; backends and timers post
//! through the senders the viewfinder hands them.
//!
//! The viewfinder, its timers and its backend all hold senders of their own,
//! so the channel never closes by itself. The host side is tracked
//! separately: when the last handle is dropped a [`Message::Shutdown`] is
//! posted, and the loop tears down as if the host had asked.

use crate::app::Viewfinder;
use crate::app::state::{CaptureCallback, Message};
use crate::backends::{Point, Rect};
use crate::orientation::DeviceOrientation;
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info};

/// Create the viewfinder message channel
pub fn channel() -> (UnboundedSender<Message>, UnboundedReceiver<Message>) {
    mpsc::unbounded_channel()
}

/// Drive the viewfinder until [`Message::Shutdown`] is processed
///
/// Starts the capture session before the first message is handled. Dropping
/// every [`ViewfinderHandle`] counts as a shutdown request.
pub async fn run(mut viewfinder: Viewfinder, mut receiver: UnboundedReceiver<Message>) -> Viewfinder {
    viewfinder.start();
    while let Some(message) = receiver.recv().await {
        let shutdown = matches!(message, Message::Shutdown);
        viewfinder.update(message);
        if shutdown {
            break;
        }
    }
    info!("Viewfinder loop finished");
    viewfinder
}

/// Posts a shutdown once the last host handle is gone
#[derive(Debug)]
struct HostLink {
    sender: UnboundedSender<Message>,
}

impl Drop for HostLink {
    fn drop(&mut self) {
        if self.sender.send(Message::Shutdown).is_ok() {
            debug!("Last host handle dropped, shutting down viewfinder");
        }
    }
}

/// Cloneable host-side entry point
///
/// Clones share one host link; the viewfinder shuts down when the last clone
/// is dropped.
#[derive(Debug, Clone)]
pub struct ViewfinderHandle {
    sender: UnboundedSender<Message>,
    _link: Arc<HostLink>,
}

impl ViewfinderHandle {
    pub fn new(sender: UnboundedSender<Message>) -> Self {
        Self {
            _link: Arc::new(HostLink {
                sender: sender.clone(),
            }),
            sender,
        }
    }

    /// Post any message; returns false if the viewfinder has shut down
    pub fn send(&self, message: Message) -> bool {
        let delivered = self.sender.send(message).is_ok();
        if !delivered {
            debug!("Viewfinder gone, host message dropped");
        }
        delivered
    }

    pub fn tap(&self, point: Point) -> bool {
        self.send(Message::Tap(point))
    }

    pub fn switch_camera(&self) -> bool {
        self.send(Message::SwitchCamera)
    }

    pub fn take_picture(&self, on_done: impl FnOnce() + Send + 'static) -> bool {
        self.send(Message::TakePicture(Some(CaptureCallback::new(on_done))))
    }

    pub fn select_flash(&self, label: impl Into<String>) -> bool {
        self.send(Message::SelectFlash(label.into()))
    }

    pub fn layout(&self, bounds: Rect, orientation: DeviceOrientation) -> bool {
        self.send(Message::Layout {
            bounds,
            orientation,
        })
    }

    pub fn device_orientation_changed(&self, orientation: DeviceOrientation) -> bool {
        self.send(Message::DeviceOrientationChanged(orientation))
    }

    pub fn appeared(&self) -> bool {
        self.send(Message::Appeared)
    }

    pub fn disappeared(&self) -> bool {
        self.send(Message::Disappeared)
    }

    pub fn shutdown(&self) -> bool {
        self.send(Message::Shutdown)
    }
}
