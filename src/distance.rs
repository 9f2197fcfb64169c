//! Distance kernels used to score a document vector against the query.
//!
//! All kernels assume both inputs have the same length. The codec enforces
//! this before any kernel runs, so the functions here do not re-check it.

use serde::{Deserialize, Serialize};

use crate::error::{Result, VecScoreError};

/// Scoring method selected once per query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMethod {
    /// Cosine similarity against a precomputed query norm
    #[default]
    Cosine,
    /// Raw dot product
    Dot,
    /// Fraction of matching character positions
    Hamming,
    /// `1 - euclidean distance`, floored at zero
    L2,
}

impl DistanceMethod {
    /// All methods, in declaration order.
    pub const ALL: [DistanceMethod; 4] = [
        DistanceMethod::Cosine,
        DistanceMethod::Dot,
        DistanceMethod::Hamming,
        DistanceMethod::L2,
    ];

    /// Get the name of this method as accepted in the `method` parameter.
    pub fn name(&self) -> &'static str {
        match self {
            DistanceMethod::Cosine => "cosine",
            DistanceMethod::Dot => "dot",
            DistanceMethod::Hamming => "hamming",
            DistanceMethod::L2 => "l2",
        }
    }

    /// Parse a method from a string.
    pub fn parse_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "cosine" => Ok(DistanceMethod::Cosine),
            "dot" | "dot_product" => Ok(DistanceMethod::Dot),
            "hamming" => Ok(DistanceMethod::Hamming),
            "l2" | "norm_l2" | "euclidean" => Ok(DistanceMethod::L2),
            _ => Err(VecScoreError::config(format!(
                "Unknown method [{s}], expected one of cosine, dot, hamming, l2"
            ))),
        }
    }
}

impl std::fmt::Display for DistanceMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Sum of squares, the norm form kept for the query vector.
pub fn norm_squared(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum()
}

/// Sum of element-wise products.
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Cosine similarity with the query norm (sum of squares) supplied.
///
/// The document norm is accumulated in the same pass as the dot product.
/// Returns `0.0` when either norm is exactly zero.
pub fn cosine(query: &[f64], doc: &[f64], query_norm_sq: f64) -> f64 {
    let mut dot_product = 0.0;
    let mut doc_norm_sq = 0.0;

    for (q, d) in query.iter().zip(doc) {
        dot_product += q * d;
        doc_norm_sq += d * d;
    }

    if doc_norm_sq == 0.0 || query_norm_sq == 0.0 {
        return 0.0;
    }

    dot_product / (doc_norm_sq.sqrt() * query_norm_sq.sqrt())
}

/// `1 - mismatches / len` over code units, compared exactly.
///
/// Two empty sequences are identical and score `1.0`.
pub fn hamming_similarity(a: &[u16], b: &[u16]) -> f64 {
    if a.is_empty() {
        return 1.0;
    }

    let mismatches = a.iter().zip(b).filter(|(x, y)| x != y).count();
    1.0 - mismatches as f64 / a.len() as f64
}

/// `1 - sqrt(sum((a_i - b_i)^2))`, never below zero.
pub fn l2_similarity(a: &[f64], b: &[f64]) -> f64 {
    let sum: f64 = a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum();
    (1.0 - sum.sqrt()).max(0.0)
}
