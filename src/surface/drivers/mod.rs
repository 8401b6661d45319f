// src/surface/drivers/mod.rs
//! Graphics driver implementations.

pub mod headless;

pub use headless::HeadlessGraphicsDriver;
