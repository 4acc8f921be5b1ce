// SPDX-License-Identifier: GPL-3.0-only

//! Viewfinder - camera preview and capture coordination
//!
//! This library coordinates a live camera preview with a capture backend:
//! tap-to-focus with an animated indicator, cross-faded lens switching, a
//! shutter pulse around still capture, flash selection, and orientation
//! tracking for both the preview and captured images.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`app`]: The [`Viewfinder`] state machine, message handlers and run loop
//! - [`backends`]: Capture backend contract and a simulated backend
//! - [`config`]: User configuration handling
//! - [`location`]: Location source used to tag captured images
//! - [`orientation`]: Device to capture orientation mapping
//! - [`flash`]: Flash modes and button labels
//!
//! # Example
//!
//! ```ignore
//! let (sender, receiver) = viewfinder::app::channel();
//! let scheduler = TokioScheduler::new(sender.clone(), Handle::current());
//! let viewfinder = Viewfinder::new(config, backend, Box::new(scheduler), sender.clone(), None);
//! let handle = ViewfinderHandle::new(sender);
//! tokio::spawn(viewfinder::app::run(viewfinder, receiver));
//! handle.switch_camera();
//! ```

pub mod app;
pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod flash;
pub mod location;
pub mod orientation;

// Re-export commonly used types
pub use app::{Message, Viewfinder, ViewfinderDelegate, ViewfinderHandle};
pub use backends::{CaptureBackend, CaptureSession, SimulatedBackend, SimulatedOptions};
pub use config::Config;
pub use errors::{AppError, AppResult};
pub use flash::FlashMode;
pub use orientation::{CaptureOrientation, DeviceOrientation};
