//! Feature type classification.
//!
//! Upstream type systems describe columns with free-form tags (`"int64"`, `"float32"`,
//! `"object"`, `"str"`, ...). The profiler only needs two buckets, so tags are folded into a
//! [`FeatureKind`] once, when descriptors are built.

use crate::types::{FeatureDescriptor, FeatureKind};

/// Map a type tag to [`FeatureKind`].
///
/// Any tag containing `"int"` or `"float"` (case-insensitive) is numeric. Everything else is
/// categorical.
///
/// The categorical bucket is a permissive fallback: empty, unknown or misspelled tags are *not*
/// rejected and silently classify as categorical.
pub fn classify(tag: &str) -> FeatureKind {
    let tag = tag.to_ascii_lowercase();
    if tag.contains("int") || tag.contains("float") {
        FeatureKind::Numeric
    } else {
        FeatureKind::Categorical
    }
}

/// Split descriptor names into `(numeric_features, categorical_features)`.
///
/// The two lists are disjoint and together cover every descriptor, in descriptor order.
pub fn partition_features(descriptors: &[FeatureDescriptor]) -> (Vec<&str>, Vec<&str>) {
    let mut numeric = Vec::new();
    let mut categorical = Vec::new();
    for d in descriptors {
        match d.kind {
            FeatureKind::Numeric => numeric.push(d.name.as_str()),
            FeatureKind::Categorical => categorical.push(d.name.as_str()),
        }
    }
    (numeric, categorical)
}
