//! Session configuration

use serde::{Deserialize, Serialize};

use crate::capping::allocator::StencilAlgorithm;
use crate::capping::cap::CapColoring;
use crate::capping::generator::PlaneLayout;
use crate::error::RenderResult;

/// Default factor by which caps exceed the largest solid's diameter
pub const DEFAULT_CAP_MARGIN: f32 = 1.5;

/// Everything needed to build a `ClippingSession`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub layout: PlaneLayout,
    pub algorithm: StencilAlgorithm,
    pub cap_coloring: CapColoring,
    /// Cap edge length relative to the largest solid's bounding diameter
    pub cap_margin: f32,
    pub slicing_enabled: bool,
    pub caps_visible: bool,
    pub helpers_visible: bool,
}

impl Default for SessionConfig {
    fn default() -> SessionConfig {
        SessionConfig {
            layout: PlaneLayout::default(),
            algorithm: StencilAlgorithm::default(),
            cap_coloring: CapColoring::default(),
            cap_margin: DEFAULT_CAP_MARGIN,
            slicing_enabled: true,
            caps_visible: true,
            helpers_visible: false,
        }
    }
}

impl SessionConfig {
    /// Parses a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> RenderResult<SessionConfig> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> RenderResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    #[inline]
    pub fn with_layout(mut self, layout: PlaneLayout) -> SessionConfig {
        self.layout = layout;
        self
    }

    #[inline]
    pub fn with_algorithm(mut self, algorithm: StencilAlgorithm) -> SessionConfig {
        self.algorithm = algorithm;
        self
    }

    #[inline]
    pub fn with_cap_coloring(mut self, cap_coloring: CapColoring) -> SessionConfig {
        self.cap_coloring = cap_coloring;
        self
    }
}
