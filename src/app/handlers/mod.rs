// SPDX-License-Identifier: GPL-3.0-only

//! Message handler modules
//!
//! Handlers are grouped by concern, each adding methods to
//! [`crate::app::Viewfinder`].

pub mod capture;
pub mod focus;
pub mod session;
