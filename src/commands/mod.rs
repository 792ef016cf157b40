pub mod build;
pub mod toolchain;
pub mod validate;
