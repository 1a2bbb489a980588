/// Turn core drawable descriptions into three.js scene nodes
use js_sys::{Float32Array, Uint32Array};
use meshlink_core::{BufferGeometry, Drawable, DrawableKind, Material, Rgb};
use wasm_bindgen::prelude::*;

use crate::three;

pub fn color(rgb: Rgb) -> three::Color {
    three::Color::new(rgb.r, rgb.g, rgb.b)
}

fn float_attribute(values: &[f32]) -> three::BufferAttribute {
    let array = Float32Array::from(values);
    three::BufferAttribute::new(&array, meshlink_core::geometry::ITEM_SIZE as u32)
}

pub fn geometry(source: &BufferGeometry) -> three::BufferGeometry {
    let target = three::BufferGeometry::new();
    target.set_attribute("position", &float_attribute(&source.position));
    if let Some(normal) = &source.normal {
        target.set_attribute("normal", &float_attribute(normal));
    }
    if let Some(colors) = &source.color {
        target.set_attribute("color", &float_attribute(colors));
    }
    if let Some(index) = &source.index {
        let array = Uint32Array::from(index.as_slice());
        target.set_index(&three::BufferAttribute::new(&array, 1));
    }
    target
}

fn with_color(mut entries: Vec<(&'static str, JsValue)>, rgb: Option<Rgb>) -> Vec<(&'static str, JsValue)> {
    if let Some(rgb) = rgb {
        entries.push(("color", color(rgb).into()));
    }
    entries
}

pub fn material(source: &Material) -> Result<three::Material, JsValue> {
    let material: three::Material = match *source {
        Material::Points {
            color,
            size,
            size_attenuation,
            vertex_colors,
        } => {
            let entries = with_color(
                vec![
                    ("size", size.into()),
                    ("sizeAttenuation", size_attenuation.into()),
                    ("vertexColors", vertex_colors.into()),
                ],
                color,
            );
            three::PointsMaterial::new(&three::params(&entries)?).into()
        }
        Material::MeshBasic { color } => {
            let entries = with_color(Vec::new(), Some(color));
            three::MeshBasicMaterial::new(&three::params(&entries)?).into()
        }
        Material::LineBasic { color, vertex_colors } => {
            let entries = with_color(vec![("vertexColors", vertex_colors.into())], color);
            three::LineBasicMaterial::new(&three::params(&entries)?).into()
        }
    };
    Ok(material)
}

/// Build the three.js node for a drawable
pub fn drawable(source: &Drawable) -> Result<three::Object3D, JsValue> {
    let geometry = geometry(&source.geometry);
    let material = material(&source.material)?;
    let node: three::Object3D = match source.kind {
        DrawableKind::Points => three::Points::new(&geometry, &material).into(),
        DrawableKind::Mesh => three::Mesh::new(&geometry, &material).into(),
        DrawableKind::LineSegments => three::LineSegments::new(&geometry, &material).into(),
    };
    Ok(node)
}
