// SPDX-License-Identifier: GPL-3.0-only

//! Preview surface management
//!
//! The preview surface shows the live session feed inside the host's view
//! tree. It exists only after the backend reports that the session started;
//! until then [`PreviewSurfaceManager::surface`] is `None` and everything that
//! depends on it (focus, capture) is skipped.
//!
//! The surface fills its bounds with the feed (aspect fill), so taps are
//! converted to sensor coordinates through the cropped, rotated and possibly
//! mirrored frame rather than a plain division by the bounds.

use crate::backends::{
    NormalizedFocusPoint, Point, PreviewSurfaceRef, Rect, SessionHandle, Size,
};
use crate::config::Color;
use crate::orientation::CaptureOrientation;
use tracing::{debug, info};
use uuid::Uuid;

/// Live preview of the capture session
pub struct PreviewSurface {
    id: Uuid,
    session: SessionHandle,
    bounds: Rect,
    orientation: Option<CaptureOrientation>,
    background: Color,
}

impl PreviewSurface {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Orientation last applied to the connection, if any
    pub fn orientation(&self) -> Option<CaptureOrientation> {
        self.orientation
    }

    /// Color shown behind the feed while no frame is available
    pub fn background(&self) -> Color {
        self.background
    }

    /// Snapshot handed to the capture backend
    pub fn surface_ref(&self) -> PreviewSurfaceRef {
        PreviewSurfaceRef {
            id: self.id,
            bounds: self.bounds,
            orientation: self.orientation,
        }
    }

    /// Convert a surface point to a normalized sensor-space point
    pub fn capture_device_point(&self, point: Point) -> NormalizedFocusPoint {
        let bounds = self.bounds;
        if bounds.size.is_empty() {
            return NormalizedFocusPoint::new(0.5, 0.5);
        }

        // Connection defaults to portrait until an orientation is applied
        let orientation = self.orientation.unwrap_or(CaptureOrientation::Portrait);
        let mirrored = self
            .session
            .connection()
            .map(|c| c.mirrored)
            .unwrap_or(false);

        // Frame as displayed: sensor frames are landscape, rotate for portrait
        let content = match self.session.frame_size() {
            Some(size) if !size.is_empty() => {
                if orientation.is_portrait() {
                    size.transposed()
                } else {
                    size
                }
            }
            _ => bounds.size,
        };

        let scale = (bounds.width() / content.width).max(bounds.height() / content.height);
        let shown = Size::new(content.width * scale, content.height * scale);
        let offset_x = (bounds.width() - shown.width) / 2.0;
        let offset_y = (bounds.height() - shown.height) / 2.0;

        let mut u = (point.x - bounds.origin.x - offset_x) / shown.width;
        let v = (point.y - bounds.origin.y - offset_y) / shown.height;
        if mirrored {
            u = 1.0 - u;
        }

        // Sensor native orientation is landscape right
        let (x, y) = match orientation {
            CaptureOrientation::LandscapeRight => (u, v),
            CaptureOrientation::LandscapeLeft => (1.0 - u, 1.0 - v),
            CaptureOrientation::Portrait => (v, 1.0 - u),
            CaptureOrientation::PortraitUpsideDown => (1.0 - v, u),
        };
        NormalizedFocusPoint::new(x, y)
    }
}

impl std::fmt::Debug for PreviewSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewSurface")
            .field("id", &self.id)
            .field("bounds", &self.bounds)
            .field("orientation", &self.orientation)
            .finish()
    }
}

/// Creates the preview surface and keeps it in sync with layout and orientation
#[derive(Debug)]
pub struct PreviewSurfaceManager {
    surface: Option<PreviewSurface>,
    background: Color,
}

impl PreviewSurfaceManager {
    pub fn new(background: Color) -> Self {
        Self {
            surface: None,
            background,
        }
    }

    pub fn surface(&self) -> Option<&PreviewSurface> {
        self.surface.as_ref()
    }

    /// Create a surface for `session`, replacing any earlier one
    pub fn attach(&mut self, session: SessionHandle, bounds: Rect) -> PreviewSurfaceRef {
        let surface = PreviewSurface {
            id: Uuid::new_v4(),
            session,
            bounds,
            orientation: None,
            background: self.background,
        };
        if let Some(previous) = &self.surface {
            info!(previous = %previous.id, "Replacing preview surface");
        }
        info!(id = %surface.id, bounds = %bounds, "Preview surface attached");
        let reference = surface.surface_ref();
        self.surface = Some(surface);
        reference
    }

    /// Resize to the host's content bounds
    pub fn layout(&mut self, bounds: Rect) {
        if let Some(surface) = self.surface.as_mut() {
            if surface.bounds != bounds {
                debug!(bounds = %bounds, "Preview surface resized");
            }
            surface.bounds = bounds;
        }
    }

    /// Rotate the connection and the surface
    ///
    /// Skipped entirely when there is no surface, no connection, or the
    /// connection does not support orientation changes. Returns whether the
    /// orientation was applied.
    pub fn apply_orientation(&mut self, orientation: CaptureOrientation) -> bool {
        let Some(surface) = self.surface.as_mut() else {
            return false;
        };
        let Some(connection) = surface.session.connection() else {
            debug!("No capture connection yet, orientation not applied");
            return false;
        };
        if !connection.orientation_supported {
            debug!("Connection does not support orientation changes");
            return false;
        }
        if surface.orientation != Some(orientation) {
            info!(?orientation, "Applying capture orientation");
        }
        surface.session.set_video_orientation(orientation);
        surface.orientation = Some(orientation);
        true
    }

    /// Tear the surface down with the host view
    pub fn detach(&mut self) {
        if let Some(surface) = self.surface.take() {
            info!(id = %surface.id, "Preview surface detached");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::{CaptureSession, ConnectionInfo};
    use std::sync::{Arc, Mutex};

    struct FixedSession {
        connection: Option<ConnectionInfo>,
        frame: Option<Size>,
        applied: Mutex<Vec<CaptureOrientation>>,
    }

    impl FixedSession {
        fn new(connection: Option<ConnectionInfo>, frame: Option<Size>) -> Arc<Self> {
            Arc::new(Self {
                connection,
                frame,
                applied: Mutex::new(Vec::new()),
            })
        }
    }

    impl CaptureSession for FixedSession {
        fn connection(&self) -> Option<ConnectionInfo> {
            self.connection
        }

        fn set_video_orientation(&self, orientation: CaptureOrientation) {
            self.applied.lock().unwrap().push(orientation);
        }

        fn frame_size(&self) -> Option<Size> {
            self.frame
        }
    }

    const SUPPORTED: ConnectionInfo = ConnectionInfo {
        orientation_supported: true,
        mirrored: false,
    };

    fn assert_point(p: NormalizedFocusPoint, x: f32, y: f32) {
        assert!(
            (p.x() - x).abs() < 1e-3 && (p.y() - y).abs() < 1e-3,
            "expected ({x}, {y}), got {p}"
        );
    }

    #[test]
    fn test_operations_without_surface_are_noops() {
        let mut manager = PreviewSurfaceManager::new(Color::WHITE);
        manager.layout(Rect::new(0.0, 0.0, 800.0, 600.0));
        assert!(!manager.apply_orientation(CaptureOrientation::Portrait));
        assert!(manager.surface().is_none());
    }

    #[test]
    fn test_orientation_skipped_without_support() {
        let session = FixedSession::new(
            Some(ConnectionInfo {
                orientation_supported: false,
                mirrored: false,
            }),
            None,
        );
        let mut manager = PreviewSurfaceManager::new(Color::WHITE);
        manager.attach(session.clone(), Rect::new(0.0, 0.0, 800.0, 600.0));

        assert!(!manager.apply_orientation(CaptureOrientation::LandscapeLeft));
        assert!(session.applied.lock().unwrap().is_empty());
        assert_eq!(manager.surface().unwrap().orientation(), None);
    }

    #[test]
    fn test_orientation_applied_to_connection_and_surface() {
        let session = FixedSession::new(Some(SUPPORTED), None);
        let mut manager = PreviewSurfaceManager::new(Color::WHITE);
        manager.attach(session.clone(), Rect::new(0.0, 0.0, 800.0, 600.0));

        assert!(manager.apply_orientation(CaptureOrientation::LandscapeRight));
        assert_eq!(
            *session.applied.lock().unwrap(),
            vec![CaptureOrientation::LandscapeRight]
        );
        assert_eq!(
            manager.surface().unwrap().orientation(),
            Some(CaptureOrientation::LandscapeRight)
        );
    }

    #[test]
    fn test_attach_replaces_surface() {
        let session = FixedSession::new(Some(SUPPORTED), None);
        let mut manager = PreviewSurfaceManager::new(Color::WHITE);
        let first = manager.attach(session.clone(), Rect::default());
        let second = manager.attach(session, Rect::default());
        assert_ne!(first.id, second.id);
        assert_eq!(manager.surface().unwrap().id(), second.id);
    }

    #[test]
    fn test_landscape_point_accounts_for_aspect_fill() {
        let session = FixedSession::new(Some(SUPPORTED), Some(Size::new(1920.0, 1080.0)));
        let mut manager = PreviewSurfaceManager::new(Color::WHITE);
        manager.attach(session, Rect::new(0.0, 0.0, 800.0, 600.0));
        manager.apply_orientation(CaptureOrientation::LandscapeRight);
        let surface = manager.surface().unwrap();

        assert_point(surface.capture_device_point(Point::new(400.0, 300.0)), 0.5, 0.5);
        // 16:9 feed filling a 4:3 surface is cropped left and right
        assert_point(surface.capture_device_point(Point::new(0.0, 0.0)), 0.125, 0.0);
    }

    #[test]
    fn test_portrait_point_is_rotated_to_sensor_space() {
        let session = FixedSession::new(Some(SUPPORTED), Some(Size::new(1920.0, 1080.0)));
        let mut manager = PreviewSurfaceManager::new(Color::WHITE);
        manager.attach(session, Rect::new(0.0, 0.0, 600.0, 800.0));
        manager.apply_orientation(CaptureOrientation::Portrait);
        let surface = manager.surface().unwrap();

        // Top-right corner of a portrait screen is the sensor's origin side
        assert_point(surface.capture_device_point(Point::new(600.0, 0.0)), 0.125, 0.0);
        assert_point(surface.capture_device_point(Point::new(300.0, 400.0)), 0.5, 0.5);
    }

    #[test]
    fn test_mirrored_connection_flips_horizontally() {
        let session = FixedSession::new(
            Some(ConnectionInfo {
                orientation_supported: true,
                mirrored: true,
            }),
            None,
        );
        let mut manager = PreviewSurfaceManager::new(Color::WHITE);
        manager.attach(session, Rect::new(0.0, 0.0, 800.0, 600.0));
        manager.apply_orientation(CaptureOrientation::LandscapeRight);
        let surface = manager.surface().unwrap();

        assert_point(surface.capture_device_point(Point::new(200.0, 150.0)), 0.75, 0.25);
    }
}
