//! Scoring engine entry point.
//!
//! The host compiles a script once per query. Compilation checks the script
//! context and source, validates the parameters, and returns a
//! [`ScoreScriptFactory`] that opens one [`DocumentScorer`] per segment.
//!
//! ```
//! use serde_json::json;
//! use vecscore::codec::encode_f64s;
//! use vecscore::doc_values::MemorySegment;
//! use vecscore::engine::{ScriptContext, VectorScoreEngine};
//!
//! let mut segment = MemorySegment::new(1);
//! segment.add_value(0, "emb", encode_f64s(&[6.0, 8.0]).unwrap()).unwrap();
//!
//! let engine = VectorScoreEngine::default();
//! let factory = engine
//!     .compile(
//!         "binary_vector_score",
//!         ScriptContext::Score,
//!         &json!({"field": "emb", "vector": [3.0, 4.0]}),
//!     )
//!     .unwrap();
//!
//! let mut scorer = factory.new_instance(&segment).unwrap();
//! scorer.set_document(0);
//! assert!((scorer.score() - 1.0).abs() < 1e-12);
//! ```

use std::sync::Arc;

use log::info;
use rayon::prelude::*;
use serde_json::Value;

use crate::config::EngineConfig;
use crate::distance::DistanceMethod;
use crate::doc_values::SegmentReader;
use crate::error::{Result, VecScoreError};
use crate::params::{PARAM_METHOD, ScoreParameters};
use crate::scorer::DocumentScorer;

/// Where the host intends to run a compiled script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptContext {
    /// Per-document relevance scoring, the only supported context.
    Score,
    Filter,
    Aggregation,
    Other(String),
}

impl ScriptContext {
    pub fn name(&self) -> &str {
        match self {
            ScriptContext::Score => "score",
            ScriptContext::Filter => "filter",
            ScriptContext::Aggregation => "aggs",
            ScriptContext::Other(name) => name.as_str(),
        }
    }
}

/// Engine registered with the host under [`engine_type`](Self::engine_type).
#[derive(Debug, Clone, Default)]
pub struct VectorScoreEngine {
    config: EngineConfig,
}

impl VectorScoreEngine {
    pub fn new(config: EngineConfig) -> Self {
        VectorScoreEngine { config }
    }

    pub fn engine_type(&self) -> &str {
        &self.config.engine_type
    }

    pub fn script_source(&self) -> &str {
        &self.config.script_source
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Compile a script for one query.
    ///
    /// The method comes from the `method` parameter, then the configured
    /// default, then the `cosine` flag.
    pub fn compile(
        &self,
        script_source: &str,
        context: ScriptContext,
        params: &Value,
    ) -> Result<ScoreScriptFactory> {
        if context != ScriptContext::Score {
            return Err(VecScoreError::config(format!(
                "{} scripts cannot be used for context [{}]",
                self.engine_type(),
                context.name()
            )));
        }
        if script_source != self.config.script_source {
            return Err(VecScoreError::config(format!(
                "Unknown script name {script_source}"
            )));
        }

        let method = match params.get(PARAM_METHOD) {
            Some(value) if !value.is_null() => None,
            _ => self.config.default_method,
        };
        self.build(params, method)
    }

    /// Bind an explicitly named method, skipping script identification.
    pub fn bind(&self, method: &str, params: &Value) -> Result<ScoreScriptFactory> {
        let method = DistanceMethod::parse_str(method)?;
        self.build(params, Some(method))
    }

    fn build(&self, params: &Value, method: Option<DistanceMethod>) -> Result<ScoreScriptFactory> {
        let params = ScoreParameters::from_json(params, method)?;
        info!(
            "Compiled {} script: field [{}], method {}, {} query elements",
            self.engine_type(),
            params.field(),
            params.method(),
            params.expected_len()
        );
        Ok(ScoreScriptFactory {
            params: Arc::new(params),
        })
    }
}

/// Validated query, ready to open scorers on any number of segments.
#[derive(Debug, Clone)]
pub struct ScoreScriptFactory {
    params: Arc<ScoreParameters>,
}

impl ScoreScriptFactory {
    /// Open a scorer on `segment`.
    pub fn new_instance<S: SegmentReader>(&self, segment: &S) -> Result<DocumentScorer<S::Values>> {
        let accessor = segment.binary_values(self.params.field())?;
        Ok(DocumentScorer::new(Arc::clone(&self.params), accessor))
    }

    pub fn params(&self) -> &ScoreParameters {
        &self.params
    }

    pub fn needs_score(&self) -> bool {
        false
    }

    /// Score candidates of several segments in parallel.
    ///
    /// Each entry pairs a segment with its candidate ids in ascending order.
    /// The result holds one score per candidate, in the same layout.
    pub fn score_segments<S>(&self, segments: &[(S, Vec<u32>)]) -> Result<Vec<Vec<f64>>>
    where
        S: SegmentReader + Sync,
    {
        segments
            .par_iter()
            .map(|(segment, doc_ids)| -> Result<Vec<f64>> {
                let mut scorer = self.new_instance(segment)?;
                Ok(doc_ids
                    .iter()
                    .map(|&doc_id| {
                        scorer.set_document(doc_id);
                        scorer.score()
                    })
                    .collect())
            })
            .collect()
    }
}
