//! Shared test doubles and end-to-end pipeline tests.
