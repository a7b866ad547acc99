//! Integration tests for honeymeter-reporter
//!
//! Runs a reporter backed by a real `HoneycombClient` against a wiremock
//! server standing in for the Honeycomb events API.

mod common;

mod test_reporter;
