//! Animated point-cloud morph: a tree and a cake silhouette sampled
//! deterministically, eased into each other on toggle, rendered with
//! additive glow in a browser viewport.
//!
//! The sampling, morph and camera math are platform-independent and
//! compile (and test) on the host; everything touching the DOM or
//! WebGL2 is wasm32-only.

pub mod camera;
pub mod morph;
pub mod rng;
pub mod sampler;

#[cfg(target_arch = "wasm32")]
mod wasm {
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;

    pub mod app;
    mod render;

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let mount = document
            .get_element_by_id(app::MOUNT_ID)
            .ok_or("mount container not found")?
            .dyn_into::<web_sys::HtmlElement>()?;

        // Single failure boundary: anything that goes wrong during
        // setup lands in the static error panel.
        if let Err(e) = app::start(&document, &mount) {
            log::error!("scene setup failed: {e:?}");
            app::show_overlay_error(&document, &mount, &e);
        }
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm::app;
