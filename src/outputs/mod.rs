//! Output generation.
//!
//! # Submodules
//!
//! - [`json`]: writes an [`Edition`](crate::models::Edition) snapshot to disk
//!
//! # Output Structure
//!
//! ```text
//! json_output_dir/
//! └── 2025-05-06/
//!     ├── morning.json              # `all`
//!     └── afternoon_technology.json # `top technology`
//! ```

pub mod json;
