//! Test-only crate. See `tests/` for the integration and property suites and
//! `fixtures/` for the sample `.roi` documents they load.
