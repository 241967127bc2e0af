//! Dependency-free statistics helpers for training and evaluation reports.

pub mod descriptive;
pub mod histogram;
