#![doc = include_str!("../README.md")]
//!
//! ## Feature flags
#![doc = document_features::document_features!()]

pub use convolution::{Kernel, KernelType};
pub use errors::*;
pub use filter::{FilterStrategy, MatrixFilter};
pub use image_view::{ImageView, PixelAccessor, PixelAccessorMut};
pub use pixels::{PixelType, RgbColor};

pub use crate::images::{Image, ImageRef};

#[macro_use]
mod utils;

pub mod benchmark;
mod convolution;
mod errors;
mod filter;
mod image_view;
pub mod images;
mod locked_buffer;
pub mod pixels;
#[cfg(feature = "rayon")]
mod threading;
#[cfg(feature = "for_testing")]
pub mod testing;
