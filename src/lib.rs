//! # vecscore
//!
//! Exact, per-document vector scoring over vectors stored as binary doc
//! values.
//!
//! ## Features
//!
//! - Compact little-endian stored-vector layout with a VInt header
//! - Cosine, dot product, Hamming and L2-derived similarity
//! - Parameters validated once per query, shared by every segment
//! - Missing or malformed values score `0.0` instead of failing the query
//! - Parallel scoring of independent segments

pub mod cli;
pub mod codec;
pub mod config;
pub mod distance;
pub mod doc_values;
pub mod engine;
pub mod error;
pub mod params;
pub mod scorer;
pub mod util;

pub mod prelude {
    pub use crate::codec::{NoScore, decode_chars, decode_f64s, encode_chars, encode_f64s};
    pub use crate::config::EngineConfig;
    pub use crate::distance::DistanceMethod;
    pub use crate::doc_values::{BinaryValues, MemorySegment, SegmentReader};
    pub use crate::engine::{ScoreScriptFactory, ScriptContext, VectorScoreEngine};
    pub use crate::error::{Result, VecScoreError};
    pub use crate::params::{BoundQuery, ScoreParameters};
    pub use crate::scorer::DocumentScorer;
}
