//! Weakmap Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Weakmap layout
//! library and its command-line interface. It includes:
//!
//! - **Identifiers**: Efficient string-interned identifiers ([`identifier::Id`])
//! - **Colors**: Color handling with CSS color support ([`color::Color`])
//! - **Geometry**: Basic geometric types ([`geometry`] module)
//! - **Topics**: The curriculum topic record consumed by the layout ([`topic::Topic`])
//! - **Mastery**: Mastery score bands and their palettes ([`mastery`] module)

pub mod color;
pub mod geometry;
pub mod identifier;
pub mod mastery;
pub mod topic;
