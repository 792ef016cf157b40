pub mod core;
pub mod utils;

// Re-export everything from core for ergonomic library use
// Users can write `slipway::pipeline` instead of `slipway::core::pipeline`
pub use core::*;
pub use utils::*;
