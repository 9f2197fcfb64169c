//! Command implementations for the vecscore CLI.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Instant;

use anyhow::Context;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cli::args::*;
use crate::cli::output::*;
use crate::codec::{encode_chars, encode_f64s};
use crate::config::EngineConfig;
use crate::doc_values::MemorySegment;
use crate::engine::{ScriptContext, VectorScoreEngine};
use crate::error::{Result, VecScoreError};
use crate::util::binary_string::to_binary_string;

/// Document file layout accepted by `score`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentFile {
    pub segments: Vec<SegmentSpec>,
}

/// One segment of a document file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentSpec {
    /// Defaults to one past the highest document id.
    #[serde(default)]
    pub max_doc: Option<u32>,
    pub documents: Vec<DocumentSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSpec {
    pub id: u32,
    pub fields: HashMap<String, StoredValue>,
}

/// A field value before encoding into the stored-vector layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredValue {
    Vector(Vec<f64>),
    Text(String),
}

impl StoredValue {
    fn encode(&self) -> Result<Vec<u8>> {
        match self {
            StoredValue::Vector(values) => encode_f64s(values),
            StoredValue::Text(text) => encode_chars(text),
        }
    }
}

impl SegmentSpec {
    /// Encode every field value into an in-memory segment.
    pub fn build(&self) -> Result<MemorySegment> {
        let max_doc = match self.max_doc {
            Some(max_doc) => max_doc,
            None => self.documents.iter().try_fold(0, |max_doc: u32, d| {
                let end = d.id.checked_add(1).ok_or_else(|| {
                    VecScoreError::invalid_argument(format!(
                        "document id {} leaves no room for max_doc",
                        d.id
                    ))
                })?;
                Ok::<_, VecScoreError>(max_doc.max(end))
            })?,
        };

        let mut segment = MemorySegment::new(max_doc);
        for doc in &self.documents {
            for (field, value) in &doc.fields {
                segment.add_value(doc.id, field, value.encode()?)?;
            }
        }
        Ok(segment)
    }

    fn candidates(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.documents.iter().map(|d| d.id).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}

/// Execute a CLI command.
pub fn execute_command(args: VecScoreArgs) -> Result<()> {
    match &args.command {
        Command::Score(score_args) => {
            let results = score_documents(score_args)?;
            output_result(&results, &args)
        }
        Command::Encode(encode_args) => output_result(&encode_vector(encode_args)?, &args),
        Command::BinaryString(bits_args) => output_result(
            &BinaryStringResult {
                bits: to_binary_string(&bits_args.values),
            },
            &args,
        ),
    }
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let value = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(value)
}

/// Score every document in a document file.
pub fn score_documents(args: &ScoreArgs) -> Result<ScoreResults> {
    let config = match &args.config {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };
    let engine = VectorScoreEngine::new(config);

    let params: Value = read_json(&args.params_file)?;
    let factory = match &args.method {
        Some(method) => engine.bind(method, &params)?,
        None => {
            let source = args
                .script
                .as_deref()
                .unwrap_or_else(|| engine.script_source());
            engine.compile(source, ScriptContext::Score, &params)?
        }
    };

    let documents: DocumentFile = read_json(&args.document_file)?;
    let segments = documents
        .segments
        .iter()
        .map(|spec| Ok((spec.build()?, spec.candidates())))
        .collect::<Result<Vec<_>>>()?;
    let total_candidates: usize = segments.iter().map(|(_, ids)| ids.len()).sum();
    debug!(
        "Loaded {} segments with {} candidates",
        segments.len(),
        total_candidates
    );

    let start = Instant::now();
    let scores = factory.score_segments(&segments)?;
    let duration_ms = start.elapsed().as_millis() as u64;

    let mut hits: Vec<ScoredDocument> = segments
        .iter()
        .zip(scores)
        .enumerate()
        .flat_map(|(segment, ((_, ids), scores))| {
            ids.iter()
                .zip(scores)
                .map(move |(&doc_id, score)| ScoredDocument {
                    segment,
                    doc_id,
                    score,
                })
                .collect::<Vec<_>>()
        })
        .filter(|hit| args.min_score.is_none_or(|min| hit.score >= min))
        .collect();

    hits.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then(a.segment.cmp(&b.segment))
            .then(a.doc_id.cmp(&b.doc_id))
    });
    hits.truncate(args.limit);

    info!("Scored {} candidates in {}ms", total_candidates, duration_ms);

    Ok(ScoreResults {
        field: factory.params().field().to_string(),
        method: factory.params().method().to_string(),
        hits,
        total_candidates,
        duration_ms,
    })
}

/// Encode a vector or string in the stored-vector layout.
pub fn encode_vector(args: &EncodeArgs) -> Result<EncodeResult> {
    let bytes = match (&args.text, args.values.is_empty()) {
        (Some(text), _) => encode_chars(text)?,
        (None, false) => encode_f64s(&args.values)?,
        (None, true) => {
            return Err(VecScoreError::invalid_argument(
                "either VALUES or --text is required",
            ));
        }
    };

    let hex = bytes.iter().map(|b| format!("{b:02x}")).collect();
    Ok(EncodeResult {
        byte_length: bytes.len(),
        hex,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    fn json_file(value: Value) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{value}").unwrap();
        file
    }

    fn score_args(params: &NamedTempFile, docs: &NamedTempFile) -> ScoreArgs {
        ScoreArgs {
            params_file: params.path().to_path_buf(),
            document_file: docs.path().to_path_buf(),
            method: None,
            script: None,
            config: None,
            limit: 10,
            min_score: None,
        }
    }

    fn documents() -> NamedTempFile {
        json_file(serde_json::json!({
            "segments": [
                {"documents": [
                    {"id": 0, "fields": {"emb": [3.0, 4.0]}},
                    {"id": 2, "fields": {"emb": [0.0, 0.0]}}
                ]},
                {"documents": [
                    {"id": 1, "fields": {"emb": [6.0, 8.0], "bits": "1011"}},
                    {"id": 0, "fields": {"emb": [1.0, 2.0, 3.0]}}
                ]}
            ]
        }))
    }

    #[test]
    fn test_score_documents_dot() {
        let params = json_file(serde_json::json!({"field": "emb", "vector": [3.0, 4.0]}));
        let docs = documents();
        let mut args = score_args(&params, &docs);
        args.method = Some("dot".to_string());

        let results = score_documents(&args).unwrap();
        assert_eq!(results.method, "dot");
        assert_eq!(results.total_candidates, 4);
        assert_eq!(
            results.hits[0],
            ScoredDocument {
                segment: 1,
                doc_id: 1,
                score: 50.0
            }
        );
        assert_eq!(results.hits[1].score, 25.0);
        assert_eq!(results.hits.len(), 4);
    }

    #[test]
    fn test_score_documents_min_score_and_limit() {
        let params = json_file(serde_json::json!({"field": "emb", "vector": [3.0, 4.0]}));
        let docs = documents();
        let mut args = score_args(&params, &docs);
        args.min_score = Some(0.5);
        args.limit = 1;

        let results = score_documents(&args).unwrap();
        assert_eq!(results.method, "cosine");
        assert_eq!(results.hits.len(), 1);
        assert!((results.hits[0].score - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_score_documents_hamming() {
        let params = json_file(serde_json::json!({"field": "bits", "value": "1010"}));
        let docs = documents();
        let mut args = score_args(&params, &docs);
        args.method = Some("hamming".to_string());
        args.min_score = Some(0.1);

        let results = score_documents(&args).unwrap();
        assert_eq!(results.hits.len(), 1);
        assert_eq!(results.hits[0].score, 0.75);
    }

    #[test]
    fn test_unknown_script_is_rejected() {
        let params = json_file(serde_json::json!({"field": "emb", "vector": [1.0]}));
        let docs = documents();
        let mut args = score_args(&params, &docs);
        args.script = Some("other".to_string());

        assert!(score_documents(&args).unwrap_err().is_config());
    }

    #[test]
    fn test_missing_params_file() {
        let docs = documents();
        let mut args = score_args(&docs, &docs);
        args.params_file = PathBuf::from("/nonexistent/params.json");

        let err = score_documents(&args).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }

    #[test]
    fn test_segment_max_doc() {
        let spec: SegmentSpec = serde_json::from_value(serde_json::json!({
            "documents": [
                {"id": 4, "fields": {"emb": [1.0]}},
                {"id": 1, "fields": {"emb": [2.0]}}
            ]
        }))
        .unwrap();
        assert_eq!(spec.build().unwrap().field_names(), vec!["emb"]);
        assert_eq!(spec.candidates(), vec![1, 4]);

        let spec: SegmentSpec = serde_json::from_value(serde_json::json!({
            "documents": [{"id": u32::MAX, "fields": {"emb": [1.0]}}]
        }))
        .unwrap();
        let err = spec.build().unwrap_err();
        assert!(err.to_string().contains("document id 4294967295"));
    }

    #[test]
    fn test_encode_vector() {
        let result = encode_vector(&EncodeArgs {
            values: vec![1.0],
            text: None,
        })
        .unwrap();
        assert_eq!(result.byte_length, 10);
        assert_eq!(result.hex, "0108000000000000f03f");

        let result = encode_vector(&EncodeArgs {
            values: vec![],
            text: Some("ab".to_string()),
        })
        .unwrap();
        assert_eq!(result.hex, "010461006200");

        assert!(
            encode_vector(&EncodeArgs {
                values: vec![],
                text: None
            })
            .is_err()
        );
    }
}
