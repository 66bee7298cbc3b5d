//! Split engine integration test module.
//!
//! These tests drive whole trees through the public API and check the
//! structural guarantees after every mutation.

mod concurrency_test;
mod config_test;
mod property_test;
mod scenario_test;
mod x_tree_test;
