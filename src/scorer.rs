//! Per-segment document scoring.
//!
//! A [`DocumentScorer`] is opened for one segment and driven by the host:
//! `set_document(id)` for each candidate, in ascending id order, followed by
//! `score()`. Every per-document problem (no value, accessor failure,
//! malformed or mismatched bytes, zero norm) resolves to a score of `0.0`.

use std::sync::Arc;

use log::{debug, trace};

use crate::codec::{decode_chars_into, decode_f64s_into};
use crate::distance::{cosine, dot, hamming_similarity, l2_similarity};
use crate::doc_values::BinaryValues;
use crate::params::{BoundQuery, ScoreParameters};

/// Scores the documents of a single segment against one query.
#[derive(Debug)]
pub struct DocumentScorer<V> {
    params: Arc<ScoreParameters>,
    /// `None` when the segment has no values for the field.
    accessor: Option<V>,
    has_value: bool,
    doubles: Vec<f64>,
    chars: Vec<u16>,
}

impl<V: BinaryValues> DocumentScorer<V> {
    pub fn new(params: Arc<ScoreParameters>, accessor: Option<V>) -> Self {
        let expected = params.expected_len();
        let (doubles, chars) = match params.query() {
            BoundQuery::Hamming(_) => (Vec::new(), Vec::with_capacity(expected)),
            _ => (Vec::with_capacity(expected), Vec::new()),
        };

        DocumentScorer {
            params,
            accessor,
            has_value: false,
            doubles,
            chars,
        }
    }

    /// Position on `doc_id`. Failures are logged and leave the document
    /// without a value; they never reach the caller.
    pub fn set_document(&mut self, doc_id: u32) {
        self.has_value = match self.accessor.as_mut() {
            None => false,
            Some(accessor) => match accessor.advance_to(doc_id) {
                Ok(found) => found,
                Err(e) => {
                    debug!(
                        "Failed to advance field [{}] to doc {}: {}",
                        self.params.field(),
                        doc_id,
                        e
                    );
                    false
                }
            },
        };
    }

    /// Whether the current document has a stored value.
    pub fn has_value(&self) -> bool {
        self.has_value
    }

    /// Score the current document.
    ///
    /// Returns `0.0` before the first `set_document` and for any document
    /// without a usable value. Calling it again without moving returns the
    /// same score.
    pub fn score(&mut self) -> f64 {
        if !self.has_value {
            return 0.0;
        }
        let Some(accessor) = self.accessor.as_ref() else {
            return 0.0;
        };

        let bytes = match accessor.current_value_bytes() {
            Ok(bytes) => bytes,
            Err(e) => {
                debug!("Failed to read field [{}]: {}", self.params.field(), e);
                return 0.0;
            }
        };

        let expected = self.params.expected_len();
        let outcome = match self.params.query() {
            BoundQuery::Cosine { vector, norm } => {
                decode_f64s_into(bytes, expected, &mut self.doubles)
                    .map(|()| cosine(vector, &self.doubles, *norm))
            }
            BoundQuery::Dot(vector) => decode_f64s_into(bytes, expected, &mut self.doubles)
                .map(|()| dot(vector, &self.doubles)),
            BoundQuery::L2(vector) => decode_f64s_into(bytes, expected, &mut self.doubles)
                .map(|()| l2_similarity(vector, &self.doubles)),
            BoundQuery::Hamming(chars) => decode_chars_into(bytes, expected, &mut self.chars)
                .map(|()| hamming_similarity(chars, &self.chars)),
        };

        match outcome {
            Ok(score) => score,
            Err(reason) => {
                trace!("No score for field [{}]: {}", self.params.field(), reason);
                0.0
            }
        }
    }

    /// This scorer never reads the upstream relevance score.
    pub fn needs_score(&self) -> bool {
        false
    }

    pub fn params(&self) -> &ScoreParameters {
        &self.params
    }
}
