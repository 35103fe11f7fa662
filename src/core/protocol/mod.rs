// src/core/protocol/mod.rs

pub mod line_frame;
pub mod response;
pub use line_frame::LineCodec;
pub use response::{ErrorCode, NOT_AVAILABLE, Response};
