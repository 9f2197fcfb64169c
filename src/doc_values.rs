//! Binary doc-values access.
//!
//! The scorer reads stored vectors through [`BinaryValues`], one accessor per
//! field per segment, and obtains accessors from a [`SegmentReader`]. Hosts
//! implement both traits over their own column storage. The in-memory
//! implementations here back the tests and the command line tool.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{Result, VecScoreError};

/// Forward-only cursor over one field's binary values in one segment.
pub trait BinaryValues {
    /// Position the cursor on `doc_id`.
    ///
    /// Returns `Ok(false)` when the document has no value for the field.
    /// Targets must not move backwards; what happens if they do is up to the
    /// implementation.
    fn advance_to(&mut self, doc_id: u32) -> Result<bool>;

    /// Bytes of the value under the cursor. Only valid right after a
    /// successful [`advance_to`](BinaryValues::advance_to).
    fn current_value_bytes(&self) -> Result<&[u8]>;
}

/// A partition of the index that can hand out binary value accessors.
pub trait SegmentReader {
    type Values: BinaryValues;

    /// Open an accessor for `field`, or `None` if the segment has no values
    /// for it.
    fn binary_values(&self, field: &str) -> Result<Option<Self::Values>>;
}

/// Sparse per-document values of a single field.
pub type FieldValues = Arc<Vec<Option<Vec<u8>>>>;

/// In-memory [`BinaryValues`] over a shared sparse column.
#[derive(Debug, Clone)]
pub struct MemoryBinaryValues {
    values: FieldValues,
    current: Option<u32>,
}

impl MemoryBinaryValues {
    pub fn new(values: FieldValues) -> Self {
        MemoryBinaryValues {
            values,
            current: None,
        }
    }
}

impl BinaryValues for MemoryBinaryValues {
    fn advance_to(&mut self, doc_id: u32) -> Result<bool> {
        if let Some(current) = self.current
            && doc_id < current
        {
            return Err(VecScoreError::accessor(format!(
                "cannot advance backwards from doc {current} to doc {doc_id}"
            )));
        }

        if doc_id as usize >= self.values.len() {
            self.current = None;
            return Err(VecScoreError::accessor(format!(
                "doc {doc_id} is out of range (max_doc {})",
                self.values.len()
            )));
        }

        self.current = Some(doc_id);
        Ok(self.values[doc_id as usize].is_some())
    }

    fn current_value_bytes(&self) -> Result<&[u8]> {
        self.current
            .and_then(|doc| self.values[doc as usize].as_deref())
            .ok_or_else(|| VecScoreError::accessor("no value under the cursor"))
    }
}

/// In-memory segment holding binary values for any number of fields.
#[derive(Debug, Clone, Default)]
pub struct MemorySegment {
    max_doc: u32,
    fields: HashMap<String, FieldValues>,
}

impl MemorySegment {
    /// Create an empty segment with room for `max_doc` documents.
    pub fn new(max_doc: u32) -> Self {
        MemorySegment {
            max_doc,
            fields: HashMap::new(),
        }
    }

    /// Store `bytes` as the value of `field` for `doc_id`.
    pub fn add_value(&mut self, doc_id: u32, field: &str, bytes: Vec<u8>) -> Result<()> {
        if doc_id >= self.max_doc {
            return Err(VecScoreError::invalid_argument(format!(
                "doc {doc_id} does not fit in a segment of {} documents",
                self.max_doc
            )));
        }

        let max_doc = self.max_doc as usize;
        let column = self
            .fields
            .entry(field.to_string())
            .or_insert_with(|| Arc::new(vec![None; max_doc]));
        Arc::make_mut(column)[doc_id as usize] = Some(bytes);
        Ok(())
    }

    /// Names of all fields with at least one value.
    pub fn field_names(&self) -> Vec<String> {
        self.fields.keys().cloned().collect()
    }
}

impl SegmentReader for MemorySegment {
    type Values = MemoryBinaryValues;

    fn binary_values(&self, field: &str) -> Result<Option<MemoryBinaryValues>> {
        Ok(self
            .fields
            .get(field)
            .map(|values| MemoryBinaryValues::new(Arc::clone(values))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment() -> MemorySegment {
        let mut segment = MemorySegment::new(4);
        segment.add_value(0, "emb", vec![1, 2, 3]).unwrap();
        segment.add_value(2, "emb", vec![4]).unwrap();
        segment
    }

    #[test]
    fn test_advance_and_read() {
        let mut values = segment().binary_values("emb").unwrap().unwrap();

        assert!(values.advance_to(0).unwrap());
        assert_eq!(values.current_value_bytes().unwrap(), &[1, 2, 3]);

        assert!(!values.advance_to(1).unwrap());
        assert!(values.current_value_bytes().is_err());

        assert!(values.advance_to(2).unwrap());
        assert_eq!(values.current_value_bytes().unwrap(), &[4]);
    }

    #[test]
    fn test_backwards_and_out_of_range() {
        let mut values = segment().binary_values("emb").unwrap().unwrap();
        values.advance_to(2).unwrap();
        assert!(values.advance_to(0).is_err());

        let mut values = segment().binary_values("emb").unwrap().unwrap();
        assert!(values.advance_to(4).is_err());
        assert!(values.current_value_bytes().is_err());
    }

    #[test]
    fn test_missing_field() {
        assert!(segment().binary_values("other").unwrap().is_none());
        assert_eq!(segment().field_names(), vec!["emb".to_string()]);
    }

    #[test]
    fn test_add_value_out_of_range() {
        let mut segment = MemorySegment::new(1);
        assert!(segment.add_value(1, "emb", vec![0]).is_err());
    }
}
