//! tiledup CLI library.
//!
//! This crate provides the command implementations behind the `tiledup`
//! binary: duplicating a rule tile onto another sprite range and inspecting
//! how a rule tile maps onto a sprite sheet.

pub mod commands;
pub mod config;
