pub mod common;
pub mod content;
pub mod image;
pub mod text;

pub use common::*;
pub use content::*;
pub use image::*;
pub use text::*;
