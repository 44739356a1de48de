use std::fmt;

use crate::trace::{trace_from_smiles, TraceConfig};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchError {
    InvalidFingerprintSize(usize),
}

impl fmt::Display for BatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFingerprintSize(size) => {
                write!(f, "fingerprint size must be positive, got {size}")
            }
        }
    }
}

impl std::error::Error for BatchError {}

/// Traces and fingerprints for a batch of SMILES records.
///
/// `fingerprints` is row-major: record `i` occupies
/// `[i * fingerprint_size, (i + 1) * fingerprint_size)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceBatch {
    pub traces: Vec<String>,
    pub fingerprints: Vec<u8>,
    pub fingerprint_size: usize,
}

/// Per-record trace generation with the substitution rules of the tensor
/// operator:
///
/// - a hard error in the trace engine becomes `[error] {message}` with an
///   all-zero fingerprint row;
/// - an empty trace for a non-empty record becomes `[invalid]` (the
///   fingerprint row stays as returned, i.e. all zero);
/// - an empty record passes through as the empty string.
///
/// A zero `fingerprint_size` is rejected up front.
pub fn trace_batch<S: AsRef<str>>(
    inputs: &[S],
    fingerprint_size: usize,
) -> Result<TraceBatch, BatchError> {
    if fingerprint_size == 0 {
        return Err(BatchError::InvalidFingerprintSize(fingerprint_size));
    }

    let cfg = TraceConfig {
        fp_nbits: fingerprint_size,
        ..TraceConfig::default()
    };

    let mut traces = Vec::with_capacity(inputs.len());
    let mut fingerprints = Vec::with_capacity(inputs.len() * fingerprint_size);

    for input in inputs {
        let smiles = input.as_ref();
        match trace_from_smiles(smiles, &cfg) {
            Ok(result) => {
                if result.text.is_empty() && !smiles.is_empty() {
                    traces.push("[invalid]".to_string());
                } else {
                    traces.push(result.text);
                }
                fingerprints.extend(result.fingerprint);
            }
            Err(e) => {
                traces.push(format!("[error] {e}"));
                fingerprints.extend(std::iter::repeat(0u8).take(fingerprint_size));
            }
        }
    }

    Ok(TraceBatch {
        traces,
        fingerprints,
        fingerprint_size,
    })
}
