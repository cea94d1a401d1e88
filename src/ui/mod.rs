//! UI utilities for terminal output

mod spinner;

pub use spinner::{create_spinner, finish_spinner, with_spinner};
