//! Server-side services
//!
//! - [`https`] - router assembly and HTTP middleware
//! - [`image_probe`] - HEAD checks of image URLs

pub mod https;
pub mod image_probe;

pub use image_probe::ImageProbe;
