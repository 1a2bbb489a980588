/// Browser downloads of in-memory bytes through object URLs
use js_sys::{Array, Uint8Array};
use log::{debug, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Blob, Document, File, FilePropertyBag, HtmlAnchorElement, Url, Window};

/// Delay before a clicked download's object URL is revoked
pub const REVOKE_DELAY_MS: i32 = 10_000;

pub fn mime_type(subtype: &str) -> String {
    format!("application/{}", subtype)
}

pub fn download_name(name: &str, subtype: &str) -> String {
    format!("{}.{}", name, subtype)
}

/// An object URL that is revoked a fixed delay after it is dropped
pub struct ObjectUrl {
    url: String,
    window: Window,
    revoke_after_ms: i32,
}

impl ObjectUrl {
    pub fn new(window: &Window, blob: &Blob, revoke_after_ms: i32) -> Result<Self, JsValue> {
        let url = Url::create_object_url_with_blob(blob)?;
        debug!("created object URL {}", url);
        Ok(Self {
            url,
            window: window.clone(),
            revoke_after_ms,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.url
    }
}

impl Drop for ObjectUrl {
    fn drop(&mut self) {
        let url = std::mem::take(&mut self.url);
        let deferred = url.clone();
        let revoke = Closure::once_into_js(move || {
            if Url::revoke_object_url(&deferred).is_err() {
                warn!("failed to revoke object URL {}", deferred);
            }
        });
        let scheduled = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(revoke.unchecked_ref(), self.revoke_after_ms);
        if scheduled.is_err() {
            // No timer available, release now
            if Url::revoke_object_url(&url).is_err() {
                warn!("failed to revoke object URL {}", url);
            }
        }
    }
}

/// Offer `bytes` to the user as `<name>.<subtype>` with MIME type
/// `application/<subtype>`
pub fn trigger_download(
    document: &Document,
    window: &Window,
    bytes: &[u8],
    name: &str,
    subtype: &str,
) -> Result<(), JsValue> {
    let parts = Array::of1(&Uint8Array::from(bytes));
    let options = FilePropertyBag::new();
    options.set_type(&mime_type(subtype));
    let file = File::new_with_u8_array_sequence_and_options(&parts, name, &options)?;

    let url = ObjectUrl::new(window, &file, REVOKE_DELAY_MS)?;
    let anchor: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
    anchor.set_download(&download_name(name, subtype));
    anchor.set_href(url.as_str());
    anchor.click();
    debug!("download of {} bytes as {} started", bytes.len(), anchor.download());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_type() {
        assert_eq!(mime_type("ply"), "application/ply");
        assert_eq!(mime_type("csv"), "application/csv");
    }

    #[test]
    fn test_download_name() {
        assert_eq!(download_name("scan_01", "stl"), "scan_01.stl");
    }
}
