//! Utility functions.
//!
//! ## Modules
//!
//! - [`app_data`] - Application data directory and configuration file
//! - [`tokenizer`] - Case folding and word splitting for names and queries
//!
//! ## Key Functions
//!
//! ```
//! use contactbook::utils::{fold_token, split_words};
//!
//! assert_eq!(fold_token("McDonald"), "mcdonald");
//! assert_eq!(split_words("  abe  hi "), vec!["abe", "hi"]);
//! ```

pub mod app_data;
pub mod tokenizer;

pub use app_data::*;
pub use tokenizer::*;
