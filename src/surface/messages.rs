// src/surface/messages.rs
//! Message types for communication between SurfaceContext and GraphicsDriver.
//!
//! Every graphics operation is a request answered by exactly one response.
//! Handles are plain copyable ids; the driver owns the objects behind them.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Opaque handle to the host's native window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeWindow(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DisplayId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConfigId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextId(pub u32);

bitflags! {
    /// Kinds of surfaces a configuration can render to.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct SurfaceType: u8 {
        const WINDOW = 1 << 0;
        const PBUFFER = 1 << 1;
    }
}

/// Color and depth layout of a surface configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConfigDescriptor {
    pub red_bits: u8,
    pub green_bits: u8,
    pub blue_bits: u8,
    pub depth_bits: u8,
    pub surface_type: SurfaceType,
    /// Platform visual id that the native window buffers should be reconfigured to.
    pub native_visual_id: i32,
}

/// Minimum color depth a configuration must offer to be enumerated at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigFilter {
    pub surface_type: SurfaceType,
    pub min_red_bits: u8,
    pub min_green_bits: u8,
    pub min_blue_bits: u8,
}

impl ConfigFilter {
    pub fn accepts(&self, descriptor: &ConfigDescriptor) -> bool {
        descriptor.surface_type.contains(self.surface_type)
            && descriptor.red_bits >= self.min_red_bits
            && descriptor.green_bits >= self.min_green_bits
            && descriptor.blue_bits >= self.min_blue_bits
    }
}

/// RGBA clear color, each channel nominally in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClearColor {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
    pub alpha: f32,
}

/// Identification strings reported by the graphics implementation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RendererInfo {
    pub vendor: String,
    pub renderer: String,
    pub version: String,
    pub extensions: String,
}

/// Requests sent from SurfaceContext to GraphicsDriver.
#[derive(Debug, Clone, PartialEq)]
pub enum GfxRequest {
    /// Connect to and initialize the default display.
    OpenDisplay,
    /// Enumerate configurations accepted by the filter, in the driver's preferred order.
    ChooseConfigs {
        display: DisplayId,
        filter: ConfigFilter,
    },
    DescribeConfig {
        display: DisplayId,
        config: ConfigId,
    },
    CreateWindowSurface {
        display: DisplayId,
        config: ConfigId,
        window: NativeWindow,
    },
    CreateContext {
        display: DisplayId,
        config: ConfigId,
    },
    /// Bind `target` to the calling thread, or unbind everything when `None`.
    MakeCurrent {
        display: DisplayId,
        target: Option<(SurfaceId, ContextId)>,
    },
    QuerySurface {
        display: DisplayId,
        surface: SurfaceId,
    },
    QueryRendererInfo,
    /// Fixed-function setup: fastest perspective hint, culling on,
    /// smooth shading, depth test off.
    PrepareRenderState,
    Clear(ClearColor),
    SwapBuffers {
        display: DisplayId,
        surface: SurfaceId,
    },
    DestroyContext {
        display: DisplayId,
        context: ContextId,
    },
    DestroySurface {
        display: DisplayId,
        surface: SurfaceId,
    },
    CloseDisplay(DisplayId),
}

impl GfxRequest {
    /// Short name used in logs and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            GfxRequest::OpenDisplay => "open_display",
            GfxRequest::ChooseConfigs { .. } => "choose_configs",
            GfxRequest::DescribeConfig { .. } => "describe_config",
            GfxRequest::CreateWindowSurface { .. } => "create_window_surface",
            GfxRequest::CreateContext { .. } => "create_context",
            GfxRequest::MakeCurrent { .. } => "make_current",
            GfxRequest::QuerySurface { .. } => "query_surface",
            GfxRequest::QueryRendererInfo => "query_renderer_info",
            GfxRequest::PrepareRenderState => "prepare_render_state",
            GfxRequest::Clear(_) => "clear",
            GfxRequest::SwapBuffers { .. } => "swap_buffers",
            GfxRequest::DestroyContext { .. } => "destroy_context",
            GfxRequest::DestroySurface { .. } => "destroy_surface",
            GfxRequest::CloseDisplay(_) => "close_display",
        }
    }
}

/// Responses sent from GraphicsDriver to SurfaceContext.
#[derive(Debug, Clone, PartialEq)]
pub enum GfxResponse {
    DisplayOpened(DisplayId),
    Configs(Vec<ConfigId>),
    ConfigDescribed(ConfigDescriptor),
    SurfaceCreated(SurfaceId),
    ContextCreated(ContextId),
    MadeCurrent,
    SurfaceSize { width: i32, height: i32 },
    RendererInfo(RendererInfo),
    RenderStatePrepared,
    Cleared,
    Swapped,
    Destroyed,
    DisplayClosed,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum GfxError {
    /// The driver refused the request.
    #[error("{request} rejected: {reason}")]
    Rejected {
        request: &'static str,
        reason: String,
    },
    /// The driver answered with a response that does not belong to the request.
    #[error("unexpected response to {request}: {response:?}")]
    UnexpectedResponse {
        request: &'static str,
        response: GfxResponse,
    },
}

impl GfxError {
    pub fn rejected(request: &GfxRequest, reason: impl Into<String>) -> Self {
        GfxError::Rejected {
            request: request.name(),
            reason: reason.into(),
        }
    }
}
