//! Direct DOM writes for elements addressed by id.

use crate::flag_image_src;
use gloo_utils::document;
use log::debug;
use wasm_bindgen::JsCast;
use web_sys::HtmlImageElement;

/// Point the image with id `element_id` at the asset for `flag_code`.
///
/// A missing element is ignored, and so is a missing asset: the browser just
/// shows a broken image.
pub fn update_flag_image(flag_code: &str, element_id: &str) {
    let Some(image) = document()
        .get_element_by_id(element_id)
        .and_then(|el| el.dyn_into::<HtmlImageElement>().ok())
    else {
        debug!("no image element with id {}", element_id);
        return;
    };
    image.set_src(&flag_image_src(flag_code));
}
