//! Elastic lengths.
//!
//! A `FlexMeasure` is a length along the stacking axis together with the
//! amount it may stretch or shrink. Glue elements and space specifiers are
//! expressed with it, and the breaking engine works in terms of the
//! accumulated stretch/shrink budget of a segment.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FlexMeasure {
    pub min: f32,
    pub opt: f32,
    pub max: f32,
}

impl FlexMeasure {
    pub fn new(min: f32, opt: f32, max: f32) -> Self {
        debug_assert!(min <= opt && opt <= max, "inverted flex bounds");
        Self { min, opt, max }
    }

    /// A rigid length: no stretch, no shrink.
    pub fn fixed(value: f32) -> Self {
        Self {
            min: value,
            opt: value,
            max: value,
        }
    }

    pub fn zero() -> Self {
        Self::fixed(0.0)
    }

    /// How far this measure can grow past its natural length.
    pub fn stretch(&self) -> f32 {
        self.max - self.opt
    }

    /// How far this measure can contract below its natural length.
    pub fn shrink(&self) -> f32 {
        self.opt - self.min
    }

    pub fn is_rigid(&self) -> bool {
        self.stretch() == 0.0 && self.shrink() == 0.0
    }

    /// The effective length at adjustment ratio `r`: positive ratios consume
    /// stretch, negative ratios consume shrink. `r` is clamped to [-1, r].
    pub fn at_ratio(&self, r: f32) -> f32 {
        if r >= 0.0 {
            self.opt + r * self.stretch()
        } else {
            self.opt + r.max(-1.0) * self.shrink()
        }
    }
}

impl Add for FlexMeasure {
    type Output = FlexMeasure;

    fn add(self, other: FlexMeasure) -> FlexMeasure {
        FlexMeasure {
            min: self.min + other.min,
            opt: self.opt + other.opt,
            max: self.max + other.max,
        }
    }
}

impl AddAssign for FlexMeasure {
    fn add_assign(&mut self, other: FlexMeasure) {
        *self = *self + other;
    }
}
