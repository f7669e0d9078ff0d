//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a specific subsystem
//! against the shared mock rig.  All tests run on the host with no real
//! hardware required.

mod engine_tests;
mod mock_hw;
