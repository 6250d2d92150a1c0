//! Helpers for checking log output in unit tests.
//!
//! Only compiled for tests. Call `testing_logger::setup()` before the code under test.
