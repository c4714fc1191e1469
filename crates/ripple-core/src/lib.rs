pub mod brush;
pub mod constants;
pub mod cover;
pub mod device;
pub mod error;
pub mod image;
pub mod params;
pub mod passes;
pub mod pipeline;
pub mod pointer;
pub mod pool;
pub mod viewport;

// Shaders bundled as string constants
pub static STAMP_WGSL: &str = include_str!("../shaders/stamp.wgsl");
pub static BACKGROUND_WGSL: &str = include_str!("../shaders/background.wgsl");
pub static COMPOSITE_WGSL: &str = include_str!("../shaders/composite.wgsl");

pub use device::*;
pub use error::{Result, RippleError};
pub use image::*;
pub use params::RippleParams;
pub use pipeline::*;
pub use viewport::{PhysicalSize, Viewport};
