use crate::fields::{FieldDescriptor, Value};
use crate::models::SubmissionRow;

/// Project flattened rows into value tuples matching the requested field
/// order. Pure; row order is preserved exactly.
pub fn project(rows: &[SubmissionRow], fields: &[FieldDescriptor]) -> Vec<Vec<Value>> {
    rows.iter()
        .map(|row| fields.iter().map(|field| field.value(row)).collect())
        .collect()
}
