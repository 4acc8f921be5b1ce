// SPDX-License-Identifier: GPL-3.0-only

//! Device to capture-stream orientation mapping
//!
//! The capture connection is described from the sensor's point of view, so
//! the two landscape orientations are swapped relative to how the device is
//! held. Face-up, face-down and unknown readings carry no usable rotation and
//! leave the current capture orientation untouched.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Physical orientation of the device as reported by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DeviceOrientation {
    #[default]
    Unknown,
    Portrait,
    PortraitUpsideDown,
    /// Device rotated with the home edge on the right
    LandscapeLeft,
    /// Device rotated with the home edge on the left
    LandscapeRight,
    FaceUp,
    FaceDown,
}

/// Orientation applied to the preview surface and the capture connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaptureOrientation {
    Portrait,
    PortraitUpsideDown,
    LandscapeLeft,
    LandscapeRight,
}

impl DeviceOrientation {
    pub const ALL: [DeviceOrientation; 7] = [
        DeviceOrientation::Unknown,
        DeviceOrientation::Portrait,
        DeviceOrientation::PortraitUpsideDown,
        DeviceOrientation::LandscapeLeft,
        DeviceOrientation::LandscapeRight,
        DeviceOrientation::FaceUp,
        DeviceOrientation::FaceDown,
    ];

    /// Map to the capture orientation, or `None` when the reading should be ignored
    pub fn capture_orientation(self) -> Option<CaptureOrientation> {
        match self {
            DeviceOrientation::Portrait => Some(CaptureOrientation::Portrait),
            DeviceOrientation::PortraitUpsideDown => Some(CaptureOrientation::PortraitUpsideDown),
            DeviceOrientation::LandscapeLeft => Some(CaptureOrientation::LandscapeRight),
            DeviceOrientation::LandscapeRight => Some(CaptureOrientation::LandscapeLeft),
            DeviceOrientation::FaceUp | DeviceOrientation::FaceDown | DeviceOrientation::Unknown => {
                None
            }
        }
    }

    /// Parse the names accepted on the command line
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized = name.trim().to_ascii_lowercase().replace(['-', '_'], "");
        Self::ALL
            .into_iter()
            .find(|o| o.to_string().replace('-', "") == normalized)
    }
}

impl CaptureOrientation {
    /// Whether the stream is delivered with its long edge vertical
    pub fn is_portrait(self) -> bool {
        matches!(
            self,
            CaptureOrientation::Portrait | CaptureOrientation::PortraitUpsideDown
        )
    }
}

impl fmt::Display for DeviceOrientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeviceOrientation::Unknown => "unknown",
            DeviceOrientation::Portrait => "portrait",
            DeviceOrientation::PortraitUpsideDown => "portrait-upside-down",
            DeviceOrientation::LandscapeLeft => "landscape-left",
            DeviceOrientation::LandscapeRight => "landscape-right",
            DeviceOrientation::FaceUp => "face-up",
            DeviceOrientation::FaceDown => "face-down",
        };
        f.write_str(name)
    }
}

/// Pure mapping entry point, see [`DeviceOrientation::capture_orientation`]
pub fn map(device: DeviceOrientation) -> Option<CaptureOrientation> {
    device.capture_orientation()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cardinal_orientations() {
        assert_eq!(
            map(DeviceOrientation::Portrait),
            Some(CaptureOrientation::Portrait)
        );
        assert_eq!(
            map(DeviceOrientation::PortraitUpsideDown),
            Some(CaptureOrientation::PortraitUpsideDown)
        );
        assert_eq!(
            map(DeviceOrientation::LandscapeLeft),
            Some(CaptureOrientation::LandscapeRight)
        );
        assert_eq!(
            map(DeviceOrientation::LandscapeRight),
            Some(CaptureOrientation::LandscapeLeft)
        );
    }

    #[test]
    fn test_flat_and_unknown_are_ignored() {
        for device in [
            DeviceOrientation::FaceUp,
            DeviceOrientation::FaceDown,
            DeviceOrientation::Unknown,
        ] {
            assert_eq!(map(device), None, "{device} should not change orientation");
        }
    }

    #[test]
    fn test_from_name() {
        assert_eq!(
            DeviceOrientation::from_name("landscape-left"),
            Some(DeviceOrientation::LandscapeLeft)
        );
        assert_eq!(
            DeviceOrientation::from_name("Portrait_Upside_Down"),
            Some(DeviceOrientation::PortraitUpsideDown)
        );
        assert_eq!(DeviceOrientation::from_name("sideways"), None);
    }
}
