//! # urlqr
//!
//! Encodes a URL into a QR code PNG. The crate ships a self-contained QR encoder with
//! Reed-Solomon error correction and the `urlqr` command-line tool built on top of it.
//!
//! ## Features
//!
//! - **QR Code Generation**: Versions 1-40, error correction levels L, M, Q and H
//! - **Optimal Segmentation**: Numeric, alphanumeric and byte runs picked for the shortest bit stream
//! - **Mask Selection**: All 8 mask patterns scored with the standard penalty rules
//! - **Rendering**: Monochrome images with configurable box size and quiet zone
//!
//! ## Quick Start
//!
//! ```rust
//! use urlqr::QRBuilder;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Version and mask are chosen automatically, error correction defaults to M
//! let qr = QRBuilder::new(b"https://example.com").build()?;
//!
//! let img = qr.render(10, 4)?; // 10 pixels per module, 4 module border
//! assert_eq!(img.width(), (qr.width() as u32 + 8) * 10);
//! # Ok(())
//! # }
//! ```
//!
//! ### Full Configuration
//!
//! ```rust
//! use urlqr::{ECLevel, MaskPattern, QRBuilder, Version};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let qr = QRBuilder::new(b"https://github.com/kaw393939")
//!     .version(Version::new(4)?)    // If not provided, finds the smallest version that fits
//!     .ec_level(ECLevel::H)         // If not provided, defaults to ECLevel::M
//!     .mask(MaskPattern::new(2)?)   // If not provided, picks the lowest penalty mask
//!     .build()?;
//!
//! assert_eq!(qr.width(), 33);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Correction Levels
//! - **L (Low)**: ~7% error correction
//! - **M (Medium)**: ~15% error correction
//! - **Q (Quartile)**: ~25% error correction
//! - **H (High)**: ~30% error correction

#![allow(clippy::items_after_test_module)]

pub mod builder;
pub mod cli;
pub(crate) mod common;
mod render;

pub use builder::{Module, QRBuilder, QR};
pub use common::error::{QRError, QRResult};
pub use common::mask::MaskPattern;
pub use common::metadata::{Color, ECLevel, Version};
