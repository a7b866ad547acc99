//! Integration tests for honeymeter-honeycomb
//!
//! Uses wiremock to simulate the Honeycomb events API and verifies the
//! request shape, authentication headers and error mapping of
//! `HoneycombClient`.

mod common;

mod test_send;
