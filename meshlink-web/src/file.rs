use js_sys::Uint8Array;
use log::debug;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

/// Read the whole content of a user-selected file into memory
pub async fn read_file_bytes(file: &web_sys::File) -> Result<Vec<u8>, JsValue> {
    let buffer = JsFuture::from(file.array_buffer()).await?;
    let bytes = Uint8Array::new(&buffer).to_vec();
    debug!("read {} bytes from {}", bytes.len(), file.name());
    Ok(bytes)
}
