pub mod content;
pub mod experience;
pub mod layout;
pub mod lightbox;
pub mod scroll;
pub mod surface;

#[cfg(target_arch = "wasm32")]
mod browser;
#[cfg(target_arch = "wasm32")]
pub mod frontend;

#[cfg(not(target_arch = "wasm32"))]
pub mod server;

#[cfg(test)]
mod testing;
