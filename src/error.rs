use thiserror::Error;

/// Failures of the outer surfaces (files, CLI). The placement pipeline itself
/// never fails.
#[derive(Debug, Error)]
pub enum LabelError {
    #[error("unsupported override file extension `.{0}` (expected .json or .json5)")]
    UnsupportedOverrideFormat(String),
    #[error("no labelable regions (polygon, polyline or path with an id) found in input")]
    NoRegions,
    #[error("output path required for {0} output")]
    OutputRequired(&'static str),
}
