use bevy::math::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::ContractError;

// ---------------------------------------------------------------------------
// Observation
// ---------------------------------------------------------------------------

/// Flat f32 vector fed to the policy.
///
/// Built append-only so the construction site reads in the same order as the
/// wire layout. Field order must stay byte-for-byte stable across training
/// and inference; a reordered observation silently corrupts a trained policy.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Observation {
    data: Vec<f32>,
}

impl Observation {
    #[must_use]
    pub const fn new(data: Vec<f32>) -> Self {
        Self { data }
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// Append a single scalar.
    pub fn push(&mut self, value: f32) {
        self.data.push(value);
    }

    /// Append a boolean as 0.0 / 1.0.
    pub fn push_flag(&mut self, flag: bool) {
        self.data.push(if flag { 1.0 } else { 0.0 });
    }

    /// Append a vector as three scalars (x, y, z).
    pub fn push_vec3(&mut self, v: Vec3) {
        self.data.extend_from_slice(&[v.x, v.y, v.z]);
    }

    /// Append a quaternion as four scalars (x, y, z, w).
    pub fn push_quat(&mut self, q: Quat) {
        self.data.extend_from_slice(&[q.x, q.y, q.z, q.w]);
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }
}

impl std::ops::Index<usize> for Observation {
    type Output = f32;
    fn index(&self, i: usize) -> &f32 {
        &self.data[i]
    }
}

impl From<Vec<f32>> for Observation {
    fn from(data: Vec<f32>) -> Self {
        Self::new(data)
    }
}

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

/// Continuous control vector received from the policy, normalized to [-1, 1].
///
/// The walker contract is continuous-only; there are no discrete branches.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Action {
    data: Vec<f32>,
}

impl Action {
    #[must_use]
    pub const fn new(data: Vec<f32>) -> Self {
        Self { data }
    }

    /// Action filled with zeros.
    #[must_use]
    pub fn zeros(len: usize) -> Self {
        Self {
            data: vec![0.0; len],
        }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }

    /// Clip all values to [-1, 1].
    pub fn clip_normalized(&mut self) {
        for val in &mut self.data {
            *val = val.clamp(-1.0, 1.0);
        }
    }

    /// Reject NaN and infinite values.
    pub fn validate(&self) -> Result<(), ContractError> {
        for (index, val) in self.data.iter().enumerate() {
            if !val.is_finite() {
                return Err(ContractError::ActionNotFinite { index });
            }
        }
        Ok(())
    }
}

impl std::ops::Index<usize> for Action {
    type Output = f32;
    fn index(&self, i: usize) -> &f32 {
        &self.data[i]
    }
}

impl From<Vec<f32>> for Action {
    fn from(data: Vec<f32>) -> Self {
        Self::new(data)
    }
}

// ---------------------------------------------------------------------------
// BoxSpace
// ---------------------------------------------------------------------------

/// Axis-aligned bounds for a continuous observation or action vector.
/// Follows Gymnasium `Box` conventions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxSpace {
    low: Vec<f32>,
    high: Vec<f32>,
}

impl BoxSpace {
    /// Create from explicit per-dimension bounds.
    ///
    /// # Panics
    /// Panics if `low` and `high` have different lengths.
    #[must_use]
    pub fn new(low: Vec<f32>, high: Vec<f32>) -> Self {
        assert_eq!(
            low.len(),
            high.len(),
            "mismatched bounds: low has {} dims, high has {}",
            low.len(),
            high.len()
        );
        Self { low, high }
    }

    /// A `dim`-dimensional space with bounds `[-bound, bound]` on every axis.
    #[must_use]
    pub fn symmetric(dim: usize, bound: f32) -> Self {
        Self {
            low: vec![-bound; dim],
            high: vec![bound; dim],
        }
    }

    #[must_use]
    pub const fn dim(&self) -> usize {
        self.low.len()
    }

    #[must_use]
    pub fn low(&self) -> &[f32] {
        &self.low
    }

    #[must_use]
    pub fn high(&self) -> &[f32] {
        &self.high
    }

    /// Whether `values` has the right length and every element is in bounds.
    #[must_use]
    pub fn contains(&self, values: &[f32]) -> bool {
        values.len() == self.low.len()
            && values
                .iter()
                .zip(self.low.iter().zip(self.high.iter()))
                .all(|(v, (l, h))| v >= l && v <= h)
    }

    /// Sample a uniform random action. Takes `&mut impl Rng` for determinism.
    pub fn sample(&self, rng: &mut impl rand::Rng) -> Action {
        let data: Vec<f32> = self
            .low
            .iter()
            .zip(self.high.iter())
            .map(|(l, h)| rng.gen_range(*l..=*h))
            .collect();
        Action::new(data)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
