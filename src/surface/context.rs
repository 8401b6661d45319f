// src/surface/context.rs
//! SurfaceContext - owns the display/surface/context triple for one window.

use crate::config::SurfaceConfig;
use crate::snapshot::Snapshot;
use crate::surface::driver::GraphicsDriver;
use crate::surface::messages::{
    ClearColor, ConfigDescriptor, ConfigFilter, ConfigId, ContextId, DisplayId, GfxError,
    GfxRequest, GfxResponse, NativeWindow, SurfaceId, SurfaceType,
};
use log::{debug, info, trace, warn};
use thiserror::Error;

/// Live surface size in pixels, as last reported by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: i32,
    pub height: i32,
}

/// Tri-state validity of a [`SurfaceContext`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Validity {
    /// No native window is bound.
    #[default]
    Absent,
    /// Display, surface and context are all valid and current.
    Live,
    /// The last acquisition attempt failed.
    Invalid,
}

#[derive(Debug, Error, PartialEq)]
pub enum AcquisitionError {
    #[error("unable to open a display connection")]
    NoDisplay(#[source] GfxError),
    #[error("no surface configuration supports window rendering")]
    NoConfig,
    #[error("unable to create a window surface")]
    SurfaceCreationFailed(#[source] GfxError),
    #[error("unable to create a rendering context")]
    ContextCreationFailed(#[source] GfxError),
    #[error("unable to make the context current")]
    MakeCurrentFailed(#[source] GfxError),
    #[error("unable to query the surface size")]
    QueryFailed(#[source] GfxError),
    #[error(transparent)]
    Driver(#[from] GfxError),
}

/// Owns the graphics resources bound to the host's native window.
///
/// Resources are created by [`acquire`](Self::acquire) and torn down by
/// [`release`](Self::release), which is safe to call at any time.
pub struct SurfaceContext<D> {
    driver: D,
    format: SurfaceConfig,
    display: Option<DisplayId>,
    surface: Option<SurfaceId>,
    context: Option<ContextId>,
    bound: bool,
    dimensions: Option<Dimensions>,
    validity: Validity,
}

impl<D: GraphicsDriver> SurfaceContext<D> {
    /// Creates an absent context that will request `format` on acquisition.
    pub fn new(driver: D, format: SurfaceConfig) -> Self {
        Self {
            driver,
            format,
            display: None,
            surface: None,
            context: None,
            bound: false,
            dimensions: None,
            validity: Validity::Absent,
        }
    }

    /// Binds a display, surface and context to `window` and makes them current.
    ///
    /// An already live context is released first. On failure every partially
    /// created resource is destroyed and the context becomes [`Validity::Invalid`].
    pub fn acquire(&mut self, window: NativeWindow) -> Result<Dimensions, AcquisitionError> {
        if self.validity == Validity::Live {
            warn!("SurfaceContext: acquire while live, releasing previous surface first");
            self.release();
        }

        match self.bind(window) {
            Ok(dimensions) => {
                self.dimensions = Some(dimensions);
                self.validity = Validity::Live;
                info!(
                    "SurfaceContext: live on {:?} at {}x{}",
                    window, dimensions.width, dimensions.height
                );
                self.prepare_render_state();
                Ok(dimensions)
            }
            Err(e) => {
                self.teardown();
                self.validity = Validity::Invalid;
                Err(e)
            }
        }
    }

    /// Unbinds and destroys everything, leaving the context [`Validity::Absent`].
    pub fn release(&mut self) {
        if self.display.is_some() {
            debug!("SurfaceContext: releasing");
        }
        self.teardown();
        self.validity = Validity::Absent;
    }

    /// Clears the frame to a color derived from `snapshot` and presents it.
    ///
    /// Returns `Ok(false)` without touching the driver when not live.
    pub fn present(&mut self, snapshot: &Snapshot) -> Result<bool, GfxError> {
        let (Validity::Live, Some(display), Some(surface), Some(dimensions)) =
            (self.validity, self.display, self.surface, self.dimensions)
        else {
            trace!("SurfaceContext: present skipped, no live surface");
            return Ok(false);
        };

        let color = clear_color(snapshot, dimensions);
        trace!("SurfaceContext: present {:?}", color);
        self.call(GfxRequest::Clear(color), |r| match r {
            GfxResponse::Cleared => Ok(()),
            other => Err(other),
        })?;
        self.call(GfxRequest::SwapBuffers { display, surface }, |r| match r {
            GfxResponse::Swapped => Ok(()),
            other => Err(other),
        })?;
        Ok(true)
    }

    pub fn validity(&self) -> Validity {
        self.validity
    }

    pub fn is_live(&self) -> bool {
        self.validity == Validity::Live
    }

    /// Surface size cached by the last successful acquisition.
    pub fn dimensions(&self) -> Option<Dimensions> {
        self.dimensions
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    fn bind(&mut self, window: NativeWindow) -> Result<Dimensions, AcquisitionError> {
        let display = self
            .call(GfxRequest::OpenDisplay, |r| match r {
                GfxResponse::DisplayOpened(display) => Ok(display),
                other => Err(other),
            })
            .map_err(AcquisitionError::NoDisplay)?;
        self.display = Some(display);

        let config = self.choose_config(display)?;

        let surface = self
            .call(
                GfxRequest::CreateWindowSurface {
                    display,
                    config,
                    window,
                },
                |r| match r {
                    GfxResponse::SurfaceCreated(surface) => Ok(surface),
                    other => Err(other),
                },
            )
            .map_err(AcquisitionError::SurfaceCreationFailed)?;
        self.surface = Some(surface);

        let context = self
            .call(GfxRequest::CreateContext { display, config }, |r| match r {
                GfxResponse::ContextCreated(context) => Ok(context),
                other => Err(other),
            })
            .map_err(AcquisitionError::ContextCreationFailed)?;
        self.context = Some(context);

        self.call(
            GfxRequest::MakeCurrent {
                display,
                target: Some((surface, context)),
            },
            |r| match r {
                GfxResponse::MadeCurrent => Ok(()),
                other => Err(other),
            },
        )
        .map_err(|e| {
            warn!("SurfaceContext: unable to make context current: {}", e);
            AcquisitionError::MakeCurrentFailed(e)
        })?;
        self.bound = true;

        self.call(GfxRequest::QuerySurface { display, surface }, |r| match r {
            GfxResponse::SurfaceSize { width, height } => Ok(Dimensions { width, height }),
            other => Err(other),
        })
        .map_err(AcquisitionError::QueryFailed)
    }

    /// Picks the exact format match when one exists, otherwise the first candidate.
    fn choose_config(&mut self, display: DisplayId) -> Result<ConfigId, AcquisitionError> {
        let filter = ConfigFilter {
            surface_type: SurfaceType::WINDOW,
            min_red_bits: self.format.red_bits,
            min_green_bits: self.format.green_bits,
            min_blue_bits: self.format.blue_bits,
        };
        let candidates = self.call(GfxRequest::ChooseConfigs { display, filter }, |r| match r {
            GfxResponse::Configs(configs) => Ok(configs),
            other => Err(other),
        })?;

        let Some(&first) = candidates.first() else {
            warn!("SurfaceContext: unable to find a surface configuration");
            return Err(AcquisitionError::NoConfig);
        };

        for &config in &candidates {
            match self.describe(display, config) {
                Ok(descriptor) if is_exact_match(&descriptor, &self.format) => {
                    debug!(
                        "SurfaceContext: exact match {:?}, native visual id {}",
                        config, descriptor.native_visual_id
                    );
                    return Ok(config);
                }
                Ok(_) => {}
                // A config we cannot inspect is never an exact match.
                Err(e) => debug!("SurfaceContext: skipping {:?}: {}", config, e),
            }
        }

        match self.describe(display, first) {
            Ok(descriptor) => debug!(
                "SurfaceContext: no exact match among {} candidates, using {:?}, native visual id {}",
                candidates.len(),
                first,
                descriptor.native_visual_id
            ),
            Err(e) => debug!(
                "SurfaceContext: no exact match among {} candidates, using {:?}: {}",
                candidates.len(),
                first,
                e
            ),
        }
        Ok(first)
    }

    fn describe(
        &mut self,
        display: DisplayId,
        config: ConfigId,
    ) -> Result<ConfigDescriptor, GfxError> {
        self.call(GfxRequest::DescribeConfig { display, config }, |r| match r {
            GfxResponse::ConfigDescribed(descriptor) => Ok(descriptor),
            other => Err(other),
        })
    }

    /// Logs the renderer identification and sets the fixed render state.
    /// Neither step affects whether the surface is usable.
    fn prepare_render_state(&mut self) {
        match self.call(GfxRequest::QueryRendererInfo, |r| match r {
            GfxResponse::RendererInfo(info) => Ok(info),
            other => Err(other),
        }) {
            Ok(info) => {
                info!("Renderer vendor: {}", info.vendor);
                info!("Renderer: {}", info.renderer);
                info!("Renderer version: {}", info.version);
                info!("Renderer extensions: {}", info.extensions);
            }
            Err(e) => warn!("SurfaceContext: renderer info unavailable: {}", e),
        }

        if let Err(e) = self.call(GfxRequest::PrepareRenderState, |r| match r {
            GfxResponse::RenderStatePrepared => Ok(()),
            other => Err(other),
        }) {
            warn!("SurfaceContext: failed to prepare render state: {}", e);
        }
    }

    fn teardown(&mut self) {
        let Some(display) = self.display.take() else {
            self.surface = None;
            self.context = None;
            self.bound = false;
            self.dimensions = None;
            return;
        };

        if std::mem::take(&mut self.bound) {
            if let Err(e) = self.call(
                GfxRequest::MakeCurrent {
                    display,
                    target: None,
                },
                |r| match r {
                    GfxResponse::MadeCurrent => Ok(()),
                    other => Err(other),
                },
            ) {
                warn!("SurfaceContext: failed to unbind context: {}", e);
            }
        }
        if let Some(context) = self.context.take() {
            self.destroy(GfxRequest::DestroyContext { display, context });
        }
        if let Some(surface) = self.surface.take() {
            self.destroy(GfxRequest::DestroySurface { display, surface });
        }
        if let Err(e) = self.call(GfxRequest::CloseDisplay(display), |r| match r {
            GfxResponse::DisplayClosed => Ok(()),
            other => Err(other),
        }) {
            warn!("SurfaceContext: failed to close display: {}", e);
        }
        self.dimensions = None;
    }

    fn destroy(&mut self, request: GfxRequest) {
        if let Err(e) = self.call(request, |r| match r {
            GfxResponse::Destroyed => Ok(()),
            other => Err(other),
        }) {
            warn!("SurfaceContext: {}", e);
        }
    }

    /// Sends `request` and extracts the payload of the expected response.
    fn call<T>(
        &mut self,
        request: GfxRequest,
        extract: impl FnOnce(GfxResponse) -> Result<T, GfxResponse>,
    ) -> Result<T, GfxError> {
        let name = request.name();
        let response = self.driver.handle_request(request)?;
        extract(response).map_err(|response| GfxError::UnexpectedResponse {
            request: name,
            response,
        })
    }
}

impl<D> Drop for SurfaceContext<D> {
    fn drop(&mut self) {
        if self.display.is_some() {
            warn!("SurfaceContext dropped while resources were still held");
        }
    }
}

/// `(x / width, angle, y / height, 1.0)`, with a zero extent mapping to 0.
pub fn clear_color(snapshot: &Snapshot, dimensions: Dimensions) -> ClearColor {
    ClearColor {
        red: normalize(snapshot.last_x, dimensions.width),
        green: snapshot.angle,
        blue: normalize(snapshot.last_y, dimensions.height),
        alpha: 1.0,
    }
}

fn normalize(value: i32, extent: i32) -> f32 {
    if extent > 0 {
        value as f32 / extent as f32
    } else {
        0.0
    }
}

fn is_exact_match(descriptor: &ConfigDescriptor, wanted: &SurfaceConfig) -> bool {
    descriptor.red_bits == wanted.red_bits
        && descriptor.green_bits == wanted.green_bits
        && descriptor.blue_bits == wanted.blue_bits
        && descriptor.depth_bits == wanted.depth_bits
}
