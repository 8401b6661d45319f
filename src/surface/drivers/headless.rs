//! Headless in-memory graphics driver.
//!
//! Tracks every object it hands out so callers can observe leaks, and records
//! the clear color of every presented frame.

use crate::surface::driver::GraphicsDriver;
use crate::surface::messages::{
    ClearColor, ConfigDescriptor, ConfigId, ContextId, DisplayId, GfxError, GfxRequest,
    GfxResponse, RendererInfo, SurfaceId, SurfaceType,
};
use log::{info, trace};
use std::collections::HashSet;

pub struct HeadlessGraphicsDriver {
    configs: Vec<ConfigDescriptor>,
    width_px: i32,
    height_px: i32,
    fail_make_current: bool,
    next_id: u32,
    open_display: Option<DisplayId>,
    surfaces: HashSet<SurfaceId>,
    contexts: HashSet<ContextId>,
    current: Option<(SurfaceId, ContextId)>,
    surface_config: Option<ConfigId>,
    pending_clear: Option<ClearColor>,
    frames: Vec<ClearColor>,
    history: Vec<&'static str>,
}

impl HeadlessGraphicsDriver {
    /// A driver offering a single exact 8/8/8/0 window config.
    pub fn new(width_px: i32, height_px: i32) -> Self {
        Self::with_configs(width_px, height_px, vec![Self::window_config(8, 8, 8, 0)])
    }

    /// A driver that enumerates `configs` in the given order.
    pub fn with_configs(width_px: i32, height_px: i32, configs: Vec<ConfigDescriptor>) -> Self {
        info!(
            "HeadlessGraphicsDriver::new() {}x{} with {} configs",
            width_px,
            height_px,
            configs.len()
        );
        Self {
            configs,
            width_px,
            height_px,
            fail_make_current: false,
            next_id: 1,
            open_display: None,
            surfaces: HashSet::new(),
            contexts: HashSet::new(),
            current: None,
            surface_config: None,
            pending_clear: None,
            frames: Vec::new(),
            history: Vec::new(),
        }
    }

    /// A window-capable config with the given channel sizes.
    pub fn window_config(red: u8, green: u8, blue: u8, depth: u8) -> ConfigDescriptor {
        ConfigDescriptor {
            red_bits: red,
            green_bits: green,
            blue_bits: blue,
            depth_bits: depth,
            surface_type: SurfaceType::WINDOW,
            native_visual_id: 1,
        }
    }

    /// Makes every subsequent `MakeCurrent` that binds a target fail.
    pub fn set_fail_make_current(&mut self, fail: bool) {
        self.fail_make_current = fail;
    }

    /// Changes the size reported for surfaces queried from now on.
    pub fn resize(&mut self, width_px: i32, height_px: i32) {
        self.width_px = width_px;
        self.height_px = height_px;
    }

    /// Clear colors of every frame swapped so far, oldest first.
    pub fn frames(&self) -> &[ClearColor] {
        &self.frames
    }

    /// Names of every request received, oldest first.
    pub fn history(&self) -> &[&'static str] {
        &self.history
    }

    pub fn count(&self, request: &str) -> usize {
        self.history.iter().filter(|name| **name == request).count()
    }

    /// True while any display, surface or context is still alive.
    pub fn holds_resources(&self) -> bool {
        self.open_display.is_some() || !self.surfaces.is_empty() || !self.contexts.is_empty()
    }

    pub fn current_binding(&self) -> Option<(SurfaceId, ContextId)> {
        self.current
    }

    /// The config the most recent window surface was created with.
    pub fn surface_config(&self) -> Option<ConfigId> {
        self.surface_config
    }

    fn allocate(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn check_display(&self, request: &GfxRequest, display: DisplayId) -> Result<(), GfxError> {
        if self.open_display == Some(display) {
            Ok(())
        } else {
            Err(GfxError::rejected(request, format!("{:?} is not open", display)))
        }
    }

    fn config(&self, request: &GfxRequest, config: ConfigId) -> Result<ConfigDescriptor, GfxError> {
        self.configs
            .get(config.0 as usize)
            .copied()
            .ok_or_else(|| GfxError::rejected(request, format!("unknown {:?}", config)))
    }
}

impl GraphicsDriver for HeadlessGraphicsDriver {
    fn handle_request(&mut self, request: GfxRequest) -> Result<GfxResponse, GfxError> {
        trace!("HeadlessGraphicsDriver: {}", request.name());
        self.history.push(request.name());

        match request {
            GfxRequest::OpenDisplay => {
                if self.open_display.is_some() {
                    return Err(GfxError::rejected(&request, "display already open"));
                }
                let display = DisplayId(self.allocate());
                self.open_display = Some(display);
                Ok(GfxResponse::DisplayOpened(display))
            }
            GfxRequest::ChooseConfigs { display, filter } => {
                self.check_display(&request, display)?;
                let configs = self
                    .configs
                    .iter()
                    .enumerate()
                    .filter(|(_, descriptor)| filter.accepts(descriptor))
                    .map(|(index, _)| ConfigId(index as u32))
                    .collect();
                Ok(GfxResponse::Configs(configs))
            }
            GfxRequest::DescribeConfig { display, config } => {
                self.check_display(&request, display)?;
                Ok(GfxResponse::ConfigDescribed(self.config(&request, config)?))
            }
            GfxRequest::CreateWindowSurface {
                display, config, ..
            } => {
                self.check_display(&request, display)?;
                self.config(&request, config)?;
                let surface = SurfaceId(self.allocate());
                self.surfaces.insert(surface);
                self.surface_config = Some(config);
                Ok(GfxResponse::SurfaceCreated(surface))
            }
            GfxRequest::CreateContext { display, config } => {
                self.check_display(&request, display)?;
                self.config(&request, config)?;
                let context = ContextId(self.allocate());
                self.contexts.insert(context);
                Ok(GfxResponse::ContextCreated(context))
            }
            GfxRequest::MakeCurrent { display, target } => {
                self.check_display(&request, display)?;
                match target {
                    Some(_) if self.fail_make_current => {
                        Err(GfxError::rejected(&request, "bad match"))
                    }
                    Some((surface, context))
                        if !self.surfaces.contains(&surface) || !self.contexts.contains(&context) =>
                    {
                        Err(GfxError::rejected(&request, "unknown surface or context"))
                    }
                    _ => {
                        self.current = target;
                        Ok(GfxResponse::MadeCurrent)
                    }
                }
            }
            GfxRequest::QuerySurface { display, surface } => {
                self.check_display(&request, display)?;
                if !self.surfaces.contains(&surface) {
                    return Err(GfxError::rejected(&request, format!("unknown {:?}", surface)));
                }
                Ok(GfxResponse::SurfaceSize {
                    width: self.width_px,
                    height: self.height_px,
                })
            }
            GfxRequest::QueryRendererInfo => Ok(GfxResponse::RendererInfo(RendererInfo {
                vendor: "native-activity".to_string(),
                renderer: "headless".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                extensions: String::new(),
            })),
            GfxRequest::PrepareRenderState => Ok(GfxResponse::RenderStatePrepared),
            GfxRequest::Clear(color) => {
                if self.current.is_none() {
                    return Err(GfxError::rejected(&request, "no current context"));
                }
                self.pending_clear = Some(color);
                Ok(GfxResponse::Cleared)
            }
            GfxRequest::SwapBuffers { display, surface } => {
                self.check_display(&request, display)?;
                if self.current.map(|(bound, _)| bound) != Some(surface) {
                    return Err(GfxError::rejected(&request, "surface is not current"));
                }
                let color = self.pending_clear.take().unwrap_or_default();
                self.frames.push(color);
                Ok(GfxResponse::Swapped)
            }
            GfxRequest::DestroyContext { display, context } => {
                self.check_display(&request, display)?;
                if !self.contexts.remove(&context) {
                    return Err(GfxError::rejected(&request, format!("unknown {:?}", context)));
                }
                Ok(GfxResponse::Destroyed)
            }
            GfxRequest::DestroySurface { display, surface } => {
                self.check_display(&request, display)?;
                if !self.surfaces.remove(&surface) {
                    return Err(GfxError::rejected(&request, format!("unknown {:?}", surface)));
                }
                Ok(GfxResponse::Destroyed)
            }
            GfxRequest::CloseDisplay(display) => {
                self.check_display(&request, display)?;
                self.open_display = None;
                self.current = None;
                self.surfaces.clear();
                self.contexts.clear();
                Ok(GfxResponse::DisplayClosed)
            }
        }
    }
}
