//! Mindmap Core Types and Definitions
//!
//! This crate provides the foundational data model shared by the mindmap
//! parser, layout engine and renderers. It includes:
//!
//! - **Identifiers**: Per-tree node ids ([`identifier::NodeId`])
//! - **Geometry**: Basic geometric types ([`geometry`] module)
//! - **Payloads**: The raw hierarchy shapes received from upstream ([`payload`] module)
//! - **Trees**: The canonical, shape-independent tree ([`tree`] module)
//! - **Positioned trees**: Canonical trees with layout coordinates ([`positioned`] module)

pub mod geometry;
pub mod identifier;
pub mod payload;
pub mod positioned;
pub mod tree;
