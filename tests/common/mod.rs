//! Common test utilities and helpers.
//!
//! This module provides shared functionality for all tests, including:
//! - Scripted OCR engines so raster tests run without tesseract
//! - Image and document builders
//! - Custom assertions

#![allow(dead_code)]

pub mod assertions;
pub mod fixtures;

pub use assertions::*;
pub use fixtures::*;
