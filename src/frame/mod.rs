//! Owned, profile-ready tables.
//!
//! A [`Frame`] is a column-major `f64` buffer plus one [`FeatureDescriptor`] per column.
//! Categorical columns are stored as category codes (`0.0`, `1.0`, ...) with a
//! [`CategoryDictionary`] mapping codes back to labels. Missing cells are stored as NaN, so the
//! profiler counts them in `inf_count` and `nan_count`.
//!
//! Frames can be built in code ([`FrameBuilder`]), from CSV ([`csv`]) or, with the `polars`
//! feature, from a polars `DataFrame`.
//!
//! ## Example
//!
//! ```rust
//! use rusty_data_profiler::frame::FrameBuilder;
//! use rusty_data_profiler::profile::{ProfileOptions, Profiler};
//!
//! let frame = FrameBuilder::new()
//!     .numeric("score", [1.0, 3.0, 5.0])
//!     .categorical("city", ["a", "b", "a"].map(Some))
//!     .build()
//!     .unwrap();
//!
//! let profiler = Profiler::new(ProfileOptions::default()).unwrap();
//! let profile = frame.profile(&profiler, Some(2)).unwrap();
//!
//! assert_eq!(profile.features[0].median, 3.0);
//! assert_eq!(profile.features[1].unique_count, 2);
//! assert!(profile.features[1].mean.is_nan());
//! ```

pub mod csv;
#[cfg(feature = "polars")]
pub mod polars;

use std::collections::HashMap;

use crate::classify::classify;
use crate::error::{ProfileError, ProfileResult};
use crate::profile::Profiler;
use crate::types::{ArrayView, DataProfile, FeatureDescriptor, FeatureKind};

/// Name and type tag of a column to ingest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: String,
    /// Raw type tag, classified with [`classify`] (`"int64"`, `"float"`, `"str"`, ...).
    pub type_tag: String,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, type_tag: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_tag: type_tag.into(),
        }
    }

    pub fn kind(&self) -> FeatureKind {
        classify(&self.type_tag)
    }
}

/// Bidirectional label <-> code mapping for one categorical column.
///
/// Codes are assigned in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryDictionary {
    codes: HashMap<String, usize>,
    labels: Vec<String>,
}

impl CategoryDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Code for `label`, assigning the next free code on first sight.
    pub fn encode(&mut self, label: &str) -> f64 {
        if let Some(&code) = self.codes.get(label) {
            return code as f64;
        }
        let code = self.labels.len();
        self.labels.push(label.to_owned());
        self.codes.insert(label.to_owned(), code);
        code as f64
    }

    /// Label for a code produced by [`CategoryDictionary::encode`].
    pub fn label(&self, code: f64) -> Option<&str> {
        if !code.is_finite() || code < 0.0 || code.fract() != 0.0 {
            return None;
        }
        self.labels.get(code as usize).map(String::as_str)
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Values of one column while a frame is being assembled.
#[derive(Debug, Clone)]
pub(crate) enum ColumnBuffer {
    Numeric(Vec<f64>),
    Categorical {
        codes: Vec<f64>,
        dictionary: CategoryDictionary,
    },
}

impl ColumnBuffer {
    pub(crate) fn for_kind(kind: FeatureKind) -> Self {
        match kind {
            FeatureKind::Numeric => Self::Numeric(Vec::new()),
            FeatureKind::Categorical => Self::Categorical {
                codes: Vec::new(),
                dictionary: CategoryDictionary::new(),
            },
        }
    }

    fn kind(&self) -> FeatureKind {
        match self {
            Self::Numeric(_) => FeatureKind::Numeric,
            Self::Categorical { .. } => FeatureKind::Categorical,
        }
    }

    fn len(&self) -> usize {
        match self {
            Self::Numeric(values) => values.len(),
            Self::Categorical { codes, .. } => codes.len(),
        }
    }

    pub(crate) fn push_missing(&mut self) {
        match self {
            Self::Numeric(values) => values.push(f64::NAN),
            Self::Categorical { codes, .. } => codes.push(f64::NAN),
        }
    }
}

/// Incrementally assembles a [`Frame`], one column at a time.
#[derive(Debug, Default)]
pub struct FrameBuilder {
    columns: Vec<(String, ColumnBuffer)>,
}

impl FrameBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a numeric column. NaN / infinite values are kept and counted by the profiler.
    pub fn numeric(self, name: impl Into<String>, values: impl IntoIterator<Item = f64>) -> Self {
        self.push(name, ColumnBuffer::Numeric(values.into_iter().collect()))
    }

    /// Append a numeric column with missing cells (`None` is stored as NaN).
    pub fn nullable_numeric(
        self,
        name: impl Into<String>,
        values: impl IntoIterator<Item = Option<f64>>,
    ) -> Self {
        let values = values.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect();
        self.push(name, ColumnBuffer::Numeric(values))
    }

    /// Append a categorical column. `None` is a missing cell.
    pub fn categorical<S: AsRef<str>>(
        self,
        name: impl Into<String>,
        values: impl IntoIterator<Item = Option<S>>,
    ) -> Self {
        let mut dictionary = CategoryDictionary::new();
        let codes = values
            .into_iter()
            .map(|v| match v {
                Some(label) => dictionary.encode(label.as_ref()),
                None => f64::NAN,
            })
            .collect();
        self.push(name, ColumnBuffer::Categorical { codes, dictionary })
    }

    pub(crate) fn push(mut self, name: impl Into<String>, buffer: ColumnBuffer) -> Self {
        self.columns.push((name.into(), buffer));
        self
    }

    /// Finish the frame.
    ///
    /// Fails with [`ProfileError::InvalidShape`] when there are no columns or the columns differ
    /// in length.
    pub fn build(self) -> ProfileResult<Frame> {
        let Some((first_name, first)) = self.columns.first() else {
            return Err(ProfileError::shape("a frame needs at least one column"));
        };
        let row_count = first.len();
        if let Some((name, buffer)) = self.columns.iter().find(|(_, b)| b.len() != row_count) {
            return Err(ProfileError::shape(format!(
                "column '{name}' has {} rows but column '{first_name}' has {row_count}",
                buffer.len()
            )));
        }

        let mut data = Vec::with_capacity(row_count * self.columns.len());
        let mut descriptors = Vec::with_capacity(self.columns.len());
        let mut dictionaries = Vec::with_capacity(self.columns.len());
        for (position, (name, buffer)) in self.columns.into_iter().enumerate() {
            descriptors.push(FeatureDescriptor::new(name, position, buffer.kind()));
            match buffer {
                ColumnBuffer::Numeric(values) => {
                    data.extend(values);
                    dictionaries.push(None);
                }
                ColumnBuffer::Categorical { codes, dictionary } => {
                    data.extend(codes);
                    dictionaries.push(Some(dictionary));
                }
            }
        }

        Ok(Frame {
            data,
            row_count,
            descriptors,
            dictionaries,
        })
    }
}

/// An owned table ready to be profiled.
#[derive(Debug, Clone)]
pub struct Frame {
    data: Vec<f64>,
    row_count: usize,
    descriptors: Vec<FeatureDescriptor>,
    dictionaries: Vec<Option<CategoryDictionary>>,
}

impl Frame {
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.descriptors.len()
    }

    /// One descriptor per column, positioned in column order.
    pub fn descriptors(&self) -> &[FeatureDescriptor] {
        &self.descriptors
    }

    /// Column-major view over the frame's buffer.
    pub fn view(&self) -> ProfileResult<ArrayView<'_, f64>> {
        ArrayView::column_major(&self.data, self.row_count, self.descriptors.len())
    }

    /// Category dictionary of the column at `position`, if it is categorical.
    pub fn dictionary(&self, position: usize) -> Option<&CategoryDictionary> {
        self.dictionaries.get(position).and_then(Option::as_ref)
    }

    /// Profile every column with `profiler`.
    pub fn profile(&self, profiler: &Profiler, num_bins: Option<usize>) -> ProfileResult<DataProfile> {
        profiler.profile(&self.view()?, &self.descriptors, num_bins)
    }
}
