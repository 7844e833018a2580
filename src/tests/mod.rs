//! Crate-level tests, grouped by concern

mod edge_case_tests;
mod extraction_tests;
