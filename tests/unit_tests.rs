//! Unit tests for individual components.

mod unit;
