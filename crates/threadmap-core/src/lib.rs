//! Threadmap Core Types
//!
//! This crate provides the foundational types shared by the Threadmap layout
//! engine and its command-line front end. It includes:
//!
//! - **Identifiers**: Stable thread identifiers and logical creation stamps
//!   ([`identifier`] module)
//! - **Geometry**: Points, sizes, bounding boxes and vertical spans
//!   ([`geometry`] module)

pub mod geometry;
pub mod identifier;
