/// JavaScript entry points
///
/// Each export fetches the browser globals it needs once, converts flat JS
/// arrays into typed core buffers, and maps core errors to thrown JS errors.
/// The `*_internal` helpers hold the parts that do not touch JS objects so
/// they can be tested natively.

use js_sys::{Array, Float32Array, Float64Array, Object, Reflect, Uint8Array};
use meshlink_core::factory::{self, VOXEL_EDGE_VERTICES};
use meshlink_core::io::{self, PlyField};
use meshlink_core::{
    camera_placement, falsecolor, transform, Camera, CameraPlacement, Colors, Error, Positions, Rgb,
    Triangles,
};
use nalgebra::Point3;
use wasm_bindgen::prelude::*;

use crate::{download, file, realize, scene, three, to_js};

fn window() -> Result<web_sys::Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))
}

fn config(json: Option<String>) -> Result<meshlink_core::SceneConfig, JsValue> {
    scene::parse_config(json.as_deref()).map_err(|e| js_sys::Error::new(&e).into())
}

fn color_or(rgb: Option<Vec<f32>>, default: Rgb) -> Result<Rgb, JsValue> {
    match rgb {
        Some(rgb) => Rgb::from_slice(&rgb).map_err(to_js),
        None => Ok(default),
    }
}

fn set(target: &Object, key: &str, value: &JsValue) -> Result<(), JsValue> {
    Reflect::set(target, &JsValue::from_str(key), value).map(|_| ())
}

fn pair(mesh: three::Object3D, outline: three::Object3D) -> Array {
    Array::of2(&mesh, &outline)
}

// ---------------------------------------------------------------------------
// Scene scaffold
// ---------------------------------------------------------------------------

#[wasm_bindgen(js_name = getRenderer)]
pub fn get_renderer(config_json: Option<String>) -> Result<three::WebGLRenderer, JsValue> {
    let config = config(config_json)?;
    let viewport = scene::viewport_of(&window()?)?;
    scene::renderer(&config.renderer, viewport)
}

#[wasm_bindgen(js_name = getScene)]
pub fn get_scene(config_json: Option<String>) -> Result<three::Scene, JsValue> {
    Ok(scene::scene(&config(config_json)?.helpers))
}

fn camera_point(what: &'static str, values: &[f32]) -> meshlink_core::Result<Point3<f32>> {
    match values {
        [x, y, z] => Ok(Point3::new(*x, *y, *z)),
        other => Err(Error::LengthMismatch {
            what,
            expected: 3,
            found: other.len(),
        }),
    }
}

/// Camera placement from an optional position and look-at target; the
/// target defaults to the origin
pub fn placement_internal(
    position: Option<Vec<f32>>,
    look_at: Option<Vec<f32>>,
) -> meshlink_core::Result<Option<CameraPlacement>> {
    let position = match (position, &look_at) {
        (Some(position), _) => camera_point("camera position", &position)?,
        (None, None) => return Ok(None),
        (None, Some(_)) => {
            return Err(Error::LengthMismatch {
                what: "camera position",
                expected: 3,
                found: 0,
            })
        }
    };
    let look_at = match look_at {
        Some(target) => camera_point("camera target", &target)?,
        None => Point3::origin(),
    };
    Ok(Some(CameraPlacement { position, look_at }))
}

/// Perspective camera sized to the window, optionally placed with the two
/// points `getCamPlaceFromXyzs` returns
#[wasm_bindgen(js_name = getCamera)]
pub fn get_camera(
    config_json: Option<String>,
    position: Option<Vec<f32>>,
    look_at: Option<Vec<f32>>,
) -> Result<three::PerspectiveCamera, JsValue> {
    let config = config(config_json)?;
    let viewport = scene::viewport_of(&window()?)?;
    let mut camera = Camera::new(&config.camera, viewport);
    if let Some(placement) = placement_internal(position, look_at).map_err(to_js)? {
        camera = camera.placed(placement);
    }
    Ok(scene::camera(&camera))
}

/// The configured point lights, as an array
#[wasm_bindgen(js_name = getLights)]
pub fn get_lights(config_json: Option<String>) -> Result<Array, JsValue> {
    let config = config(config_json)?;
    Ok(scene::lights(&config.lights).into_iter().map(JsValue::from).collect())
}

#[wasm_bindgen(js_name = getOrbitCtrl)]
pub fn get_orbit_ctrl(
    camera: &three::PerspectiveCamera,
    renderer: &three::WebGLRenderer,
    config_json: Option<String>,
) -> Result<three::OrbitControls, JsValue> {
    let config = config(config_json)?;
    Ok(scene::orbit_controls(camera, renderer, &config.controls))
}

// ---------------------------------------------------------------------------
// Geometry factory
// ---------------------------------------------------------------------------

#[wasm_bindgen(js_name = vizPts)]
pub fn viz_pts(xyzs: &[f32], size: Option<f32>, rgb: Option<Vec<f32>>) -> Result<three::Object3D, JsValue> {
    let positions = Positions::from_flat(xyzs).map_err(to_js)?;
    let color = color_or(rgb, factory::DEFAULT_POINT_COLOR)?;
    realize::drawable(&factory::points(
        &positions,
        size.unwrap_or(factory::DEFAULT_POINT_SIZE),
        color,
    ))
}

#[wasm_bindgen(js_name = vizPtsColor)]
pub fn viz_pts_color(xyzs: &[f32], rgbs: &[f32], size: Option<f32>) -> Result<three::Object3D, JsValue> {
    let positions = Positions::from_flat(xyzs).map_err(to_js)?;
    let colors = Colors::from_flat(rgbs).map_err(to_js)?;
    let cloud = factory::colored_points(&positions, &colors, size.unwrap_or(factory::DEFAULT_POINT_SIZE))
        .map_err(to_js)?;
    realize::drawable(&cloud)
}

#[wasm_bindgen(js_name = createColor)]
pub fn create_color(r: f32, g: f32, b: f32) -> three::Color {
    realize::color(Rgb::new(r, g, b))
}

/// `[mesh, outline]` for a flat `n x 3 x 3` triangle array
#[wasm_bindgen(js_name = createTriMesh)]
pub fn create_tri_mesh(triangles: &[f32], rgb: Option<Vec<f32>>) -> Result<Array, JsValue> {
    let triangles = Triangles::from_flat(triangles).map_err(to_js)?;
    let (mesh, outline) = factory::triangle_mesh(&triangles, color_or(rgb, factory::DEFAULT_MESH_COLOR)?);
    Ok(pair(realize::drawable(&mesh)?, realize::drawable(&outline)?))
}

#[wasm_bindgen(js_name = createGrp)]
pub fn create_grp() -> three::Group {
    three::Group::new()
}

#[wasm_bindgen(js_name = createCube)]
pub fn create_cube(
    sx: Option<f32>,
    sy: Option<f32>,
    sz: Option<f32>,
    rgb: Option<Vec<f32>>,
) -> Result<Array, JsValue> {
    let color = color_or(rgb, factory::DEFAULT_PRIMITIVE_COLOR)?;
    let (mesh, outline) = factory::cube(sx.unwrap_or(1.0), sy.unwrap_or(1.0), sz.unwrap_or(1.0), color);
    Ok(pair(realize::drawable(&mesh)?, realize::drawable(&outline)?))
}

#[wasm_bindgen(js_name = createSphere)]
pub fn create_sphere(
    radius: f32,
    width_segments: u32,
    height_segments: u32,
    rgb: Option<Vec<f32>>,
) -> Result<three::Object3D, JsValue> {
    let color = color_or(rgb, factory::DEFAULT_PRIMITIVE_COLOR)?;
    realize::drawable(&factory::sphere(radius, width_segments, height_segments, color))
}

#[wasm_bindgen(js_name = createLines)]
pub fn create_lines(xyzs: &[f32], rgb: Option<Vec<f32>>) -> Result<three::Object3D, JsValue> {
    let positions = Positions::from_flat(xyzs).map_err(to_js)?;
    let color = color_or(rgb, factory::DEFAULT_LINE_COLOR)?;
    realize::drawable(&factory::line_segments(&positions, color).map_err(to_js)?)
}

/// Split flat per-voxel edge colors into one `Colors` per voxel
pub fn voxel_colors_internal(rgbs: &[f32], voxels: usize) -> meshlink_core::Result<Vec<Colors>> {
    let per_voxel = VOXEL_EDGE_VERTICES * 3;
    if rgbs.len() != voxels * per_voxel {
        return Err(Error::LengthMismatch {
            what: "voxel edge colors",
            expected: voxels * per_voxel,
            found: rgbs.len(),
        });
    }
    rgbs.chunks_exact(per_voxel).map(Colors::from_flat).collect()
}

#[wasm_bindgen(js_name = vizVoxOutlines)]
pub fn viz_vox_outlines(midpts: &[f32], rgbs: &[f32], vox_dim: f32) -> Result<three::Object3D, JsValue> {
    let centers = Positions::from_flat(midpts).map_err(to_js)?;
    let colors = voxel_colors_internal(rgbs, centers.len()).map_err(to_js)?;
    realize::drawable(&factory::voxel_outlines(&centers.points, &colors, vox_dim).map_err(to_js)?)
}

// ---------------------------------------------------------------------------
// Data exchange
// ---------------------------------------------------------------------------

pub fn convert_xyz_to_zxy_internal(xyzs: &[f32]) -> meshlink_core::Result<Vec<f32>> {
    let positions = Positions::from_flat(xyzs)?;
    Ok(Positions::new(transform::xyz_to_zxy(&positions.points)).to_flat())
}

#[wasm_bindgen(js_name = convertXyzToZxy)]
pub fn convert_xyz_to_zxy(xyzs: &[f32]) -> Result<Vec<f32>, JsValue> {
    convert_xyz_to_zxy_internal(xyzs).map_err(to_js)
}

/// `{ xyzs: Float32Array, shape: [n, 3, 3] }`
#[wasm_bindgen(js_name = readStl)]
pub fn read_stl(bytes: &[u8]) -> Result<Object, JsValue> {
    let triangles = io::parse_stl(bytes).map_err(to_js)?;
    let (n, v, c) = triangles.shape();
    let result = Object::new();
    set(&result, "xyzs", &Float32Array::from(triangles.to_flat().as_slice()))?;
    set(&result, "shape", &Array::of3(&(n as u32).into(), &(v as u32).into(), &(c as u32).into()))?;
    Ok(result)
}

/// `{ fields: [[name, type], ...], rows: [Float64Array, ...] }`
#[wasm_bindgen(js_name = readPly)]
pub fn read_ply(bytes: &[u8]) -> Result<Object, JsValue> {
    let table = io::read_ply(bytes).map_err(to_js)?;
    let fields: Array = table
        .fields
        .iter()
        .map(|f| JsValue::from(Array::of2(&f.name.as_str().into(), &f.ty.ply_name().into())))
        .collect();
    let rows: Array = table
        .rows
        .iter()
        .map(|row| JsValue::from(Float64Array::from(row.as_slice())))
        .collect();
    let result = Object::new();
    set(&result, "fields", &fields)?;
    set(&result, "rows", &rows)?;
    Ok(result)
}

fn js_rows(rows: &Array) -> Vec<Vec<f64>> {
    rows.iter().map(|row| Float64Array::new(&row).to_vec()).collect()
}

fn js_fields(fields: &Array) -> Result<Vec<PlyField>, JsValue> {
    let pairs = fields
        .iter()
        .map(|entry| {
            let entry = Array::from(&entry);
            let name = entry.get(0).as_string();
            let ty = entry.get(1).as_string();
            name.zip(ty)
                .ok_or_else(|| JsValue::from_str("each field must be a [name, type] pair of strings"))
        })
        .collect::<Result<Vec<_>, JsValue>>()?;
    PlyField::from_pairs(&pairs).map_err(to_js)
}

/// Text-mode PLY bytes from rows of numbers and `[name, type]` fields
#[wasm_bindgen(js_name = writePly)]
pub fn write_ply(rows: &Array, fields: &Array) -> Result<Vec<u8>, JsValue> {
    let fields = js_fields(fields)?;
    io::write_ply(&js_rows(rows), &fields).map_err(to_js)
}

#[wasm_bindgen(js_name = readCsv)]
pub fn read_csv(bytes: &[u8]) -> Result<Array, JsValue> {
    let rows = io::read_csv(bytes).map_err(to_js)?;
    Ok(rows
        .iter()
        .map(|row| JsValue::from(row.iter().map(|cell| JsValue::from_str(cell)).collect::<Array>()))
        .collect())
}

fn cell_text(cell: &JsValue) -> String {
    if let Some(text) = cell.as_string() {
        text
    } else if let Some(number) = cell.as_f64() {
        number.to_string()
    } else if let Some(flag) = cell.as_bool() {
        flag.to_string()
    } else {
        String::new()
    }
}

#[wasm_bindgen(js_name = writeCsv)]
pub fn write_csv(rows: &Array) -> Result<Vec<u8>, JsValue> {
    let rows: Vec<Vec<String>> = rows
        .iter()
        .map(|row| Array::from(&row).iter().map(|cell| cell_text(&cell)).collect())
        .collect();
    io::write_csv(&rows).map_err(to_js)
}

#[wasm_bindgen(js_name = createHiddenLink)]
pub fn create_hidden_link(bytes: &[u8], file_name: &str, file_type: &str) -> Result<(), JsValue> {
    let window = window()?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("window has no document"))?;
    download::trigger_download(&document, &window, bytes, file_name, file_type)
}

#[wasm_bindgen(js_name = getBytesFromFile)]
pub async fn get_bytes_from_file(file: web_sys::File) -> Result<Uint8Array, JsValue> {
    let bytes = file::read_file_bytes(&file).await?;
    Ok(Uint8Array::from(bytes.as_slice()))
}

#[wasm_bindgen(js_name = rgbFalsecolors)]
pub fn rgb_falsecolors(values: &[f32], min: f32, max: f32) -> Result<Vec<f32>, JsValue> {
    falsecolor::falsecolors(values, min, max).map_err(to_js)
}

pub fn cam_place_internal(xyzs: &[f32], zoom_out: f32) -> meshlink_core::Result<CameraPlacement> {
    let positions = Positions::from_flat(xyzs)?;
    camera_placement(&positions.points, zoom_out)
}

fn point_array(p: Point3<f32>) -> Array {
    Array::of3(&p.x.into(), &p.y.into(), &p.z.into())
}

/// `[[x, y, z] position, [x, y, z] look-at]`
#[wasm_bindgen(js_name = getCamPlaceFromXyzs)]
pub fn get_cam_place_from_xyzs(xyzs: &[f32], zoom_out: Option<f32>) -> Result<Array, JsValue> {
    let placement = cam_place_internal(xyzs, zoom_out.unwrap_or(0.0)).map_err(to_js)?;
    Ok(Array::of2(
        &point_array(placement.position),
        &point_array(placement.look_at),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voxel_colors_split() {
        let rgbs = vec![0.5; 2 * VOXEL_EDGE_VERTICES * 3];
        let colors = voxel_colors_internal(&rgbs, 2).unwrap();
        assert_eq!(colors.len(), 2);
        assert_eq!(colors[1].len(), VOXEL_EDGE_VERTICES);
    }

    #[test]
    fn test_voxel_colors_wrong_length() {
        let rgbs = vec![0.5; VOXEL_EDGE_VERTICES * 3 - 3];
        assert!(matches!(
            voxel_colors_internal(&rgbs, 1),
            Err(Error::LengthMismatch { .. })
        ));
    }

    #[test]
    fn test_zxy_flat() {
        let zxy = convert_xyz_to_zxy_internal(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        assert_eq!(zxy, vec![3.0, 1.0, 2.0, 6.0, 4.0, 5.0]);
        assert!(convert_xyz_to_zxy_internal(&[1.0, 2.0]).is_err());
    }

    #[test]
    fn test_cam_place() {
        let placement = cam_place_internal(&[0.0, 0.0, 0.0, 2.0, 4.0, 6.0], 5.0).unwrap();
        assert_eq!(placement.position, Point3::new(7.0, 9.0, 11.0));
        assert_eq!(placement.look_at, Point3::new(1.0, 2.0, 3.0));
        assert!(matches!(cam_place_internal(&[], 5.0), Err(Error::EmptyPointSet)));
    }

    #[test]
    fn test_camera_placement_arguments() {
        assert_eq!(placement_internal(None, None).unwrap(), None);

        let placed = placement_internal(Some(vec![7.0, 9.0, 11.0]), Some(vec![1.0, 2.0, 3.0]))
            .unwrap()
            .unwrap();
        assert_eq!(placed.position, Point3::new(7.0, 9.0, 11.0));
        assert_eq!(placed.look_at, Point3::new(1.0, 2.0, 3.0));

        let at_origin = placement_internal(Some(vec![1.0, 1.0, 1.0]), None).unwrap().unwrap();
        assert_eq!(at_origin.look_at, Point3::origin());

        assert!(placement_internal(Some(vec![1.0, 2.0]), None).is_err());
        assert!(placement_internal(None, Some(vec![0.0, 0.0, 0.0])).is_err());
    }
}
