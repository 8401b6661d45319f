// src/surface/mod.rs
//! Message-based graphics surface management.
//!
//! - GraphicsDriver: platform primitives behind a request/response protocol
//! - SurfaceContext: acquisition, teardown and presentation policy
//! - Messages: the request/response protocol itself

pub mod context;
pub mod driver;
pub mod drivers;
pub mod messages;

pub use context::{clear_color, AcquisitionError, Dimensions, SurfaceContext, Validity};
pub use driver::GraphicsDriver;
pub use drivers::HeadlessGraphicsDriver;
pub use messages::{
    ClearColor, ConfigDescriptor, ConfigId, GfxError, GfxRequest, GfxResponse, NativeWindow,
    SurfaceType,
};

#[cfg(test)]
mod tests;
