//! Fixed-length feature vectors handed to the policy.

use std::ops::Deref;

use serde::Serialize;

/// Dense `f32` feature vector.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FeatureVector(Vec<f32>);

impl FeatureVector {
    /// All-zero vector of the given length.
    pub fn zeros(len: usize) -> Self {
        Self(vec![0.0; len])
    }

    /// Presence indicators: 1.0 where `flags` is true, else 0.0.
    pub fn indicators<I>(flags: I) -> Self
    where
        I: IntoIterator<Item = bool>,
    {
        Self(flags.into_iter().map(|f| if f { 1.0 } else { 0.0 }).collect())
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn sum(&self) -> f32 {
        self.0.iter().sum()
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|v| *v == 0.0)
    }

    /// Append every block in order, then one trailing sum per block.
    pub(crate) fn with_block_sums(blocks: &[&FeatureVector]) -> Self {
        let width: usize = blocks.iter().map(|b| b.len()).sum();
        let mut out = Vec::with_capacity(width + blocks.len());
        for block in blocks {
            out.extend_from_slice(block.as_slice());
        }
        out.extend(blocks.iter().map(|b| b.sum()));
        Self(out)
    }
}

impl Deref for FeatureVector {
    type Target = [f32];

    fn deref(&self) -> &[f32] {
        &self.0
    }
}

impl From<Vec<f32>> for FeatureVector {
    fn from(values: Vec<f32>) -> Self {
        Self(values)
    }
}
