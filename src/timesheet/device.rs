use std::fmt;

use serde::{Deserialize, Serialize};

/// Normalized device an entry was recorded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Device {
    Web,
    Mobile,
    Ios,
    Android,
}

impl Device {
    /// Map a raw device value onto a known device, ignoring case.
    ///
    /// `DESKTOP` counts as web. Anything unrecognized, including a missing
    /// value, is treated as mobile.
    pub fn normalize(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Device::Mobile;
        };

        match raw.trim().to_uppercase().as_str() {
            "WEB" | "DESKTOP" => Device::Web,
            "MOBILE" => Device::Mobile,
            "IOS" => Device::Ios,
            "ANDROID" => Device::Android,
            _ => Device::Mobile,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Device::Web => "WEB",
            Device::Mobile => "MOBILE",
            Device::Ios => "IOS",
            Device::Android => "ANDROID",
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
