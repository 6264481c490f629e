//! Core library for the weather widget.
//!
//! This crate defines:
//! - Option merging and validation (`config`)
//! - IP geolocation and current-weather sources (`provider`)
//! - Escaping and template rendering (`render`)
//! - Output surfaces the rendered markup is written into (`surface`)
//! - The pipeline that ties them together (`widget`)
//!
//! It is used by the `weather-widget` binary, but can be embedded by any host
//! that implements [`OutputSurface`].

pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod render;
pub mod surface;
pub mod widget;

pub use config::{ApiKey, Config, Options, Settings, UnitSystem, resolve};
pub use error::WidgetError;
pub use model::{LocationInfo, WeatherObservation};
pub use provider::{LocationSource, WeatherSource};
pub use render::{Escaped, Markup, escape};
pub use surface::{FileSurface, MemorySurface, OutputSurface, StdoutSurface};
pub use widget::{RenderOutcome, WeatherWidget};
