// src/surface/driver.rs
//! GraphicsDriver trait - minimal interface to the platform graphics API.
//!
//! The driver exposes primitives only. Configuration selection, teardown
//! ordering and presentation policy all live in `SurfaceContext`.
//!
//! ## Lifecycle
//! 1. `OpenDisplay` - connect to the display
//! 2. `ChooseConfigs` / `DescribeConfig` - pick a pixel format
//! 3. `CreateWindowSurface` / `CreateContext` / `MakeCurrent` - bind to a window
//! 4. `Clear` / `SwapBuffers` - once per presented frame
//! 5. `MakeCurrent(None)` / `DestroyContext` / `DestroySurface` / `CloseDisplay` - teardown

use crate::surface::messages::{GfxError, GfxRequest, GfxResponse};

/// Platform-specific graphics primitives.
///
/// All calls happen on the event-pump thread, so implementations need not be
/// `Send`. Each request is answered synchronously.
pub trait GraphicsDriver {
    fn handle_request(&mut self, request: GfxRequest) -> Result<GfxResponse, GfxError>;
}

impl<D: GraphicsDriver + ?Sized> GraphicsDriver for Box<D> {
    fn handle_request(&mut self, request: GfxRequest) -> Result<GfxResponse, GfxError> {
        (**self).handle_request(request)
    }
}
