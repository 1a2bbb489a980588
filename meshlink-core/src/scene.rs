/// Configuration for the renderer, scene helpers, camera, lights and controls
///
/// Every field has a default matching the stock viewer setup, and the whole
/// tree deserializes from partial JSON so a host can override single values.
use serde::Deserialize;

use crate::bbox::CameraPlacement;
use crate::error::{Error, Result};

/// Size of the drawing surface in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Result<Self> {
        if !(width > 0.0 && height > 0.0) {
            return Err(Error::InvalidViewport { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    pub antialias: bool,
    pub shadows: bool,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            antialias: true,
            shadows: false,
        }
    }
}

/// Axes and grid helpers added to every new scene
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HelperConfig {
    pub axes_size: f64,
    pub grid_size: f64,
    pub grid_divisions: u32,
}

impl Default for HelperConfig {
    fn default() -> Self {
        Self {
            axes_size: 5.0,
            grid_size: 10.0,
            grid_divisions: 10,
        }
    }
}

/// Perspective camera parameters; the aspect ratio comes from the viewport
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_deg: f64,
    pub near: f64,
    pub far: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_deg: 45.0,
            near: 0.1,
            far: 500_000.0,
        }
    }
}

/// Resolved camera ready to hand to a renderer
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub fov_deg: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
    pub placement: Option<CameraPlacement>,
}

impl Camera {
    pub fn new(config: &CameraConfig, viewport: Viewport) -> Self {
        Self {
            fov_deg: config.fov_deg,
            aspect: viewport.aspect(),
            near: config.near,
            far: config.far,
            placement: None,
        }
    }

    pub fn placed(mut self, placement: CameraPlacement) -> Self {
        self.placement = Some(placement);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PointLightConfig {
    /// 24-bit `0xRRGGBB` color
    pub color: u32,
    pub intensity: f64,
    pub distance: f64,
    pub decay: f64,
    pub position: [f64; 3],
}

impl Default for PointLightConfig {
    fn default() -> Self {
        Self {
            color: 0xFFFFFF,
            intensity: 1.0,
            distance: 1000.0,
            decay: 2.0,
            position: [0.0, 0.0, 0.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    pub enable_damping: bool,
    pub damping_factor: f64,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            enable_damping: true,
            damping_factor: 0.04,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub renderer: RendererConfig,
    pub helpers: HelperConfig,
    pub camera: CameraConfig,
    pub lights: Vec<PointLightConfig>,
    pub controls: ControlsConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            renderer: RendererConfig::default(),
            helpers: HelperConfig::default(),
            camera: CameraConfig::default(),
            lights: vec![
                PointLightConfig {
                    color: 0x00FF00,
                    intensity: 1.0,
                    distance: 1000.0,
                    decay: 3.0,
                    position: [5.0, 0.0, 2.0],
                },
                PointLightConfig {
                    color: 0xFFFFFF,
                    intensity: 5.0,
                    distance: 1000.0,
                    decay: 20.0,
                    position: [5.0, 0.0, 2.0],
                },
            ],
            controls: ControlsConfig::default(),
        }
    }
}
