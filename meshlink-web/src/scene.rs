/// Scene scaffold: renderer, scene with helpers, camera, lights and controls
use log::info;
use meshlink_core::scene::{ControlsConfig, HelperConfig, PointLightConfig, RendererConfig};
use meshlink_core::{Camera, SceneConfig, Viewport};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::three;

/// Parse an optional JSON override on top of the stock configuration
pub fn parse_config(json: Option<&str>) -> Result<SceneConfig, String> {
    match json {
        None => Ok(SceneConfig::default()),
        Some(text) if text.trim().is_empty() => Ok(SceneConfig::default()),
        Some(text) => serde_json::from_str(text).map_err(|e| format!("invalid scene config: {}", e)),
    }
}

/// Current inner size of the browser window
pub fn viewport_of(window: &web_sys::Window) -> Result<Viewport, JsValue> {
    let width = window.inner_width()?.as_f64().unwrap_or(0.0);
    let height = window.inner_height()?.as_f64().unwrap_or(0.0);
    Viewport::new(width, height).map_err(crate::to_js)
}

pub fn renderer(config: &RendererConfig, viewport: Viewport) -> Result<three::WebGLRenderer, JsValue> {
    let parameters = three::params(&[("antialias", config.antialias.into())])?;
    let renderer = three::WebGLRenderer::new(&parameters);

    let shadow_map = renderer.shadow_map();
    js_sys::Reflect::set(&shadow_map, &"enabled".into(), &config.shadows.into())?;
    js_sys::Reflect::set(&shadow_map, &"type".into(), &three::PCF_SOFT_SHADOW_MAP.into())?;

    let canvas = renderer.dom_element();
    canvas.set_width(viewport.width as u32);
    canvas.set_height(viewport.height as u32);
    info!(
        "renderer created ({}x{}, antialias {})",
        viewport.width, viewport.height, config.antialias
    );
    Ok(renderer)
}

pub fn scene(config: &HelperConfig) -> three::Scene {
    let scene = three::Scene::new();
    scene.add(&three::AxesHelper::new(config.axes_size));
    scene.add(&three::GridHelper::new(config.grid_size, config.grid_divisions));
    info!("scene created with axes and {}x{} grid", config.grid_divisions, config.grid_divisions);
    scene
}

/// Build a perspective camera, aimed when a placement is known
pub fn camera(camera: &Camera) -> three::PerspectiveCamera {
    let node = three::PerspectiveCamera::new(camera.fov_deg, camera.aspect, camera.near, camera.far);
    if let Some(placement) = camera.placement {
        let p = placement.position;
        node.position().set(p.x as f64, p.y as f64, p.z as f64);
        let t = placement.look_at;
        node.look_at(t.x as f64, t.y as f64, t.z as f64);
    }
    node
}

pub fn lights(configs: &[PointLightConfig]) -> Vec<three::PointLight> {
    configs
        .iter()
        .map(|config| {
            let light = three::PointLight::new(config.color, config.intensity, config.distance);
            light.set_decay(config.decay);
            let [x, y, z] = config.position;
            light.position().set(x, y, z);
            light
        })
        .collect()
}

pub fn orbit_controls(
    camera: &three::PerspectiveCamera,
    renderer: &three::WebGLRenderer,
    config: &ControlsConfig,
) -> three::OrbitControls {
    let canvas: web_sys::HtmlElement = renderer.dom_element().unchecked_into();
    let controls = three::OrbitControls::new(camera, &canvas);
    controls.set_enable_damping(config.enable_damping);
    controls.set_damping_factor(config.damping_factor);
    controls
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_is_default() {
        assert_eq!(parse_config(None).unwrap(), SceneConfig::default());
        assert_eq!(parse_config(Some("  ")).unwrap(), SceneConfig::default());
    }

    #[test]
    fn test_partial_config() {
        let config = parse_config(Some(r#"{ "helpers": { "grid_divisions": 20 } }"#)).unwrap();
        assert_eq!(config.helpers.grid_divisions, 20);
        assert_eq!(config.helpers.axes_size, 5.0);
        assert_eq!(config.camera.fov_deg, 45.0);
    }

    #[test]
    fn test_bad_config() {
        let err = parse_config(Some("{ not json")).unwrap_err();
        assert!(err.starts_with("invalid scene config"));
    }
}
