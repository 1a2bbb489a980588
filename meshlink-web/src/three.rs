/// Bindings to the parts of three.js meshlink drives
use js_sys::{Object, Reflect};
use wasm_bindgen::prelude::*;

/// `THREE.PCFSoftShadowMap`
pub const PCF_SOFT_SHADOW_MAP: u32 = 2;

#[wasm_bindgen(module = "three")]
extern "C" {
    pub type Object3D;

    #[wasm_bindgen(method)]
    pub fn add(this: &Object3D, child: &Object3D);

    #[wasm_bindgen(method, getter)]
    pub fn position(this: &Object3D) -> Vector3;

    #[wasm_bindgen(method, js_name = lookAt)]
    pub fn look_at(this: &Object3D, x: f64, y: f64, z: f64);

    pub type Vector3;

    #[wasm_bindgen(method)]
    pub fn set(this: &Vector3, x: f64, y: f64, z: f64) -> Vector3;

    pub type Color;

    #[wasm_bindgen(constructor)]
    pub fn new(r: f32, g: f32, b: f32) -> Color;

    #[wasm_bindgen(extends = Object3D)]
    pub type Scene;

    #[wasm_bindgen(constructor)]
    pub fn new() -> Scene;

    #[wasm_bindgen(extends = Object3D)]
    pub type Group;

    #[wasm_bindgen(constructor)]
    pub fn new() -> Group;

    #[wasm_bindgen(extends = Object3D)]
    pub type AxesHelper;

    #[wasm_bindgen(constructor)]
    pub fn new(size: f64) -> AxesHelper;

    #[wasm_bindgen(extends = Object3D)]
    pub type GridHelper;

    #[wasm_bindgen(constructor)]
    pub fn new(size: f64, divisions: u32) -> GridHelper;

    pub type WebGLRenderer;

    #[wasm_bindgen(constructor)]
    pub fn new(parameters: &Object) -> WebGLRenderer;

    #[wasm_bindgen(method, getter, js_name = shadowMap)]
    pub fn shadow_map(this: &WebGLRenderer) -> Object;

    #[wasm_bindgen(method, getter, js_name = domElement)]
    pub fn dom_element(this: &WebGLRenderer) -> web_sys::HtmlCanvasElement;

    #[wasm_bindgen(extends = Object3D)]
    pub type PerspectiveCamera;

    #[wasm_bindgen(constructor)]
    pub fn new(fov: f64, aspect: f64, near: f64, far: f64) -> PerspectiveCamera;

    #[wasm_bindgen(extends = Object3D)]
    pub type PointLight;

    #[wasm_bindgen(constructor)]
    pub fn new(color: u32, intensity: f64, distance: f64) -> PointLight;

    #[wasm_bindgen(method, setter)]
    pub fn set_decay(this: &PointLight, decay: f64);

    pub type BufferGeometry;

    #[wasm_bindgen(constructor)]
    pub fn new() -> BufferGeometry;

    #[wasm_bindgen(method, js_name = setAttribute)]
    pub fn set_attribute(this: &BufferGeometry, name: &str, attribute: &BufferAttribute) -> BufferGeometry;

    #[wasm_bindgen(method, js_name = setIndex)]
    pub fn set_index(this: &BufferGeometry, index: &BufferAttribute) -> BufferGeometry;

    pub type BufferAttribute;

    #[wasm_bindgen(constructor)]
    pub fn new(array: &JsValue, item_size: u32) -> BufferAttribute;

    pub type Material;

    #[wasm_bindgen(extends = Material)]
    pub type PointsMaterial;

    #[wasm_bindgen(constructor)]
    pub fn new(parameters: &Object) -> PointsMaterial;

    #[wasm_bindgen(extends = Material)]
    pub type MeshBasicMaterial;

    #[wasm_bindgen(constructor)]
    pub fn new(parameters: &Object) -> MeshBasicMaterial;

    #[wasm_bindgen(extends = Material)]
    pub type LineBasicMaterial;

    #[wasm_bindgen(constructor)]
    pub fn new(parameters: &Object) -> LineBasicMaterial;

    #[wasm_bindgen(extends = Object3D)]
    pub type Points;

    #[wasm_bindgen(constructor)]
    pub fn new(geometry: &BufferGeometry, material: &Material) -> Points;

    #[wasm_bindgen(extends = Object3D)]
    pub type Mesh;

    #[wasm_bindgen(constructor)]
    pub fn new(geometry: &BufferGeometry, material: &Material) -> Mesh;

    #[wasm_bindgen(extends = Object3D)]
    pub type LineSegments;

    #[wasm_bindgen(constructor)]
    pub fn new(geometry: &BufferGeometry, material: &Material) -> LineSegments;
}

#[wasm_bindgen(module = "three/addons/controls/OrbitControls.js")]
extern "C" {
    pub type OrbitControls;

    #[wasm_bindgen(constructor)]
    pub fn new(camera: &PerspectiveCamera, dom_element: &web_sys::HtmlElement) -> OrbitControls;

    #[wasm_bindgen(method, setter, js_name = enableDamping)]
    pub fn set_enable_damping(this: &OrbitControls, enabled: bool);

    #[wasm_bindgen(method, setter, js_name = dampingFactor)]
    pub fn set_damping_factor(this: &OrbitControls, factor: f64);
}

/// Build a plain parameter object such as `{ color, size }`
pub fn params(entries: &[(&str, JsValue)]) -> Result<Object, JsValue> {
    let object = Object::new();
    for (key, value) in entries {
        Reflect::set(&object, &JsValue::from_str(key), value)?;
    }
    Ok(object)
}
