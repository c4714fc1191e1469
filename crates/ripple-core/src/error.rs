use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RippleError {
    #[error("Invalid parameter `{field}`: {reason}")]
    InvalidParams { field: &'static str, reason: String },

    #[error("Invalid RGBA image: {width}x{height} with {len} bytes")]
    InvalidImage { width: u32, height: u32, len: usize },

    #[error("Stamp pool capacity must be at least 1")]
    ZeroCapacity,
}

pub type Result<T> = std::result::Result<T, RippleError>;
