//! Common utilities for integration tests

// Each test binary uses a different subset of the helpers
#![allow(unused_imports)]

pub mod test_helpers;

// Re-export commonly used items
pub use test_helpers::{
    assert_states_close,
    base_config,
    final_max,
    relative_error,
    strictly_increasing,
};
