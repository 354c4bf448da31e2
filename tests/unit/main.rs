//! Unit test modules.

mod audit_test;
mod contrast_test;
