//! Native event translation.

pub mod dom;
#[cfg(not(target_arch = "wasm32"))]
pub mod winit;
