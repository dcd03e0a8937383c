//! A single blood pressure measurement.

use serde::{Deserialize, Serialize};

/// Systolic and diastolic pressure in mmHg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reading {
    pub systolic: u16,
    pub diastolic: u16,
}

impl Reading {
    pub fn new(systolic: u16, diastolic: u16) -> Self {
        Self {
            systolic,
            diastolic,
        }
    }
}
