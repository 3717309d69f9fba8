//! Dashboard rendering for GaugeLink
//!
//! This crate provides:
//! - `GaugeSurface`, a `RenderSurface` that draws the dashboard widgets onto
//!   any RGB565 `DrawTarget`
//! - `FrameBuffer`, an in-memory RGB565 `DrawTarget` that remembers which
//!   region changed since the last flush
//! - The fixed 320x170 landscape layout and widget drawing helpers
//!
//! # Architecture
//!
//! The core pipeline only pushes values through `RenderSurface`. The surface
//! draws into a framebuffer, and the firmware copies the dirty region of that
//! framebuffer to the panel between ticks. Nothing here talks to hardware.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod framebuffer;
pub mod layout;
pub mod surface;
pub mod widgets;

// Re-export key types
pub use framebuffer::FrameBuffer;
pub use layout::{RIDE_MODES, SCREEN_HEIGHT, SCREEN_WIDTH};
pub use surface::GaugeSurface;
