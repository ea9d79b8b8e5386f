use wasm_bindgen::prelude::*;
mod api;
mod error;
mod interop;

pub use api::set_panic_hook;

/// Browser handle around the canvas controller. Every input method returns
/// an array of effects for the host to apply in order.
#[wasm_bindgen]
pub struct Explorer { pub(crate) inner: graphview::Explorer }

impl Explorer {
    pub fn rs_new() -> Explorer { Explorer { inner: graphview::Explorer::new() } }
    pub fn core(&self) -> &graphview::Explorer { &self.inner }
}
