//! tiledup End-to-End Test Infrastructure
//!
//! Builds throwaway Unity projects (a palette directory of sprite tile assets
//! and a directory of rule tiles) and drives the CLI commands against them.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p tiledup-tests
//! ```

pub mod fixtures;

pub use fixtures::{sprite_file_id, TileProjectFixture};
