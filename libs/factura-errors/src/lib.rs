//! RFC 9457 Problem Details shared by all Factura HTTP surfaces.

mod problem;

pub use problem::{APPLICATION_PROBLEM_JSON, Problem, ValidationViolation};
