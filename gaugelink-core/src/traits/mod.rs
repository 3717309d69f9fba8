//! Hardware abstraction traits
//!
//! These traits define the interface between the gauge pipeline and
//! whatever draws the widgets.

pub mod surface;

pub use surface::{Color, Gauge, Indicator, Label, RenderSurface, Selector, SurfaceError};
