//! Core data model: array views, feature descriptors and the profiling result records.
//!
//! Inputs are borrowed ([`ArrayView`]) and never mutated. Results ([`FeatureStat`], [`FeatureBin`],
//! [`DataProfile`]) are created fresh for each profiling call and returned by value.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::classify::classify;
use crate::column::Column;
use crate::error::{ProfileError, ProfileResult};

/// Semantic kind of a feature, resolved once when its descriptor is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureKind {
    /// Integer or floating point measurements.
    Numeric,
    /// Category codes (strings, booleans and anything not recognised as numeric).
    Categorical,
}

impl FeatureKind {
    /// Classify a raw type tag (`"int64"`, `"float32"`, `"str"`, ...). See [`classify`].
    pub fn from_tag(tag: &str) -> Self {
        classify(tag)
    }
}

/// A named, positioned, typed column of the array being profiled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureDescriptor {
    /// Feature name. Not required to be unique.
    pub name: String,
    /// 0-based column index into the [`ArrayView`]. Unique within a profiling call.
    pub position: usize,
    /// Numeric or categorical.
    pub kind: FeatureKind,
}

impl FeatureDescriptor {
    /// Create a descriptor with an already resolved kind.
    pub fn new(name: impl Into<String>, position: usize, kind: FeatureKind) -> Self {
        Self {
            name: name.into(),
            position,
            kind,
        }
    }

    /// Create a descriptor from a raw type tag.
    pub fn from_tag(name: impl Into<String>, position: usize, tag: &str) -> Self {
        Self::new(name, position, FeatureKind::from_tag(tag))
    }

    /// One numeric descriptor per name, positioned in order.
    pub fn numeric<S: AsRef<str>>(names: &[S]) -> Vec<Self> {
        names
            .iter()
            .enumerate()
            .map(|(position, name)| Self::new(name.as_ref(), position, FeatureKind::Numeric))
            .collect()
    }

    /// Zip feature names with their type tags, positioned in order.
    ///
    /// Fails with [`ProfileError::InvalidShape`] when the two lists differ in length.
    pub fn from_names_and_tags<S: AsRef<str>, U: AsRef<str>>(
        names: &[S],
        tags: &[U],
    ) -> ProfileResult<Vec<Self>> {
        if names.len() != tags.len() {
            return Err(ProfileError::shape(format!(
                "{} feature names but {} type tags",
                names.len(),
                tags.len()
            )));
        }
        Ok(names
            .iter()
            .zip(tags)
            .enumerate()
            .map(|(position, (name, tag))| Self::from_tag(name.as_ref(), position, tag.as_ref()))
            .collect())
    }
}

/// Element order of a flat 2D buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// Element `(row, col)` lives at `row * column_count + col` (C order).
    #[default]
    RowMajor,
    /// Element `(row, col)` lives at `col * row_count + row` (Fortran order).
    ColumnMajor,
}

/// Buffer element types the engine can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementType {
    Float64,
    Float32,
    Int64,
    Int32,
    Int16,
    Int8,
    UInt64,
    UInt32,
    UInt16,
    UInt8,
}

impl ElementType {
    /// Parse a dtype name (case-insensitive), e.g. `"float64"`, `"f8"`, `"int32"`, `"u8"`.
    ///
    /// Bare `"int"` / `"float"` mean the 64-bit types. Short names follow Rust (`"i8"` is an
    /// 8-bit integer), byte-count codes (`"f8"`, `"i4"`, `"u1"`) follow NumPy.
    ///
    /// Anything that is not a fixed-width integer or float (`"complex128"`, `"object"`, `"bool"`,
    /// `"<U5"`, ...) fails with [`ProfileError::UnsupportedElementType`].
    pub fn from_dtype(dtype: &str) -> ProfileResult<Self> {
        let ty = match dtype.trim().to_ascii_lowercase().as_str() {
            "float64" | "f64" | "f8" | "double" | "float" => Self::Float64,
            "float32" | "f32" | "f4" => Self::Float32,
            "int64" | "i64" | "long" | "int" => Self::Int64,
            "int32" | "i32" | "i4" => Self::Int32,
            "int16" | "i16" | "i2" => Self::Int16,
            "int8" | "i8" | "i1" => Self::Int8,
            "uint64" | "u64" => Self::UInt64,
            "uint32" | "u32" | "u4" => Self::UInt32,
            "uint16" | "u16" | "u2" => Self::UInt16,
            "uint8" | "u8" | "u1" => Self::UInt8,
            _ => {
                return Err(ProfileError::UnsupportedElementType {
                    dtype: dtype.to_owned(),
                    message: "expected a fixed-width integer or float element type".to_string(),
                });
            }
        };
        Ok(ty)
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Float64 => "float64",
            Self::Float32 => "float32",
            Self::Int64 => "int64",
            Self::Int32 => "int32",
            Self::Int16 => "int16",
            Self::Int8 => "int8",
            Self::UInt64 => "uint64",
            Self::UInt32 => "uint32",
            Self::UInt16 => "uint16",
            Self::UInt8 => "uint8",
        };
        f.write_str(name)
    }
}

/// A buffer element that can be read as `f64`.
///
/// 64-bit integers above 2^53 in magnitude are rounded to the nearest representable float.
pub trait Element: Copy + Send + Sync + 'static {
    /// Runtime tag for this element type.
    const ELEMENT_TYPE: ElementType;

    /// Widen to `f64`.
    fn to_f64(self) -> f64;
}

macro_rules! impl_element {
    ($($ty:ty => $tag:ident),* $(,)?) => {
        $(
            impl Element for $ty {
                const ELEMENT_TYPE: ElementType = ElementType::$tag;

                #[inline]
                fn to_f64(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

impl_element!(
    f64 => Float64,
    f32 => Float32,
    i64 => Int64,
    i32 => Int32,
    i16 => Int16,
    i8 => Int8,
    u64 => UInt64,
    u32 => UInt32,
    u16 => UInt16,
    u8 => UInt8,
);

/// Read-only view of a flat 2D numeric buffer.
#[derive(Debug, Clone, Copy)]
pub struct ArrayView<'a, T = f64> {
    data: &'a [T],
    row_count: usize,
    column_count: usize,
    layout: Layout,
}

impl<'a, T: Element> ArrayView<'a, T> {
    /// Wrap `data` as a `row_count x column_count` array.
    ///
    /// Fails with [`ProfileError::InvalidShape`] when `column_count == 0` or the buffer length
    /// does not equal `row_count * column_count`. Zero rows is valid.
    pub fn new(
        data: &'a [T],
        row_count: usize,
        column_count: usize,
        layout: Layout,
    ) -> ProfileResult<Self> {
        if column_count == 0 {
            return Err(ProfileError::shape("column_count must be > 0"));
        }
        let expected = row_count.checked_mul(column_count).ok_or_else(|| {
            ProfileError::shape(format!("{row_count} x {column_count} overflows usize"))
        })?;
        if data.len() != expected {
            return Err(ProfileError::shape(format!(
                "buffer holds {} elements but shape {row_count} x {column_count} needs {expected}",
                data.len()
            )));
        }
        Ok(Self {
            data,
            row_count,
            column_count,
            layout,
        })
    }

    /// Like [`ArrayView::new`], for callers that carry the buffer's dtype as a name (array
    /// bindings, file headers).
    ///
    /// Fails with [`ProfileError::UnsupportedElementType`] when `dtype` is not a supported element
    /// type or does not describe `T`.
    pub fn with_dtype(
        data: &'a [T],
        row_count: usize,
        column_count: usize,
        layout: Layout,
        dtype: &str,
    ) -> ProfileResult<Self> {
        let declared = ElementType::from_dtype(dtype)?;
        if declared != T::ELEMENT_TYPE {
            return Err(ProfileError::UnsupportedElementType {
                dtype: dtype.to_owned(),
                message: format!("buffer elements are {}", T::ELEMENT_TYPE),
            });
        }
        Self::new(data, row_count, column_count, layout)
    }

    /// Row-major (C order) view.
    pub fn row_major(data: &'a [T], row_count: usize, column_count: usize) -> ProfileResult<Self> {
        Self::new(data, row_count, column_count, Layout::RowMajor)
    }

    /// Column-major (Fortran order) view.
    pub fn column_major(
        data: &'a [T],
        row_count: usize,
        column_count: usize,
    ) -> ProfileResult<Self> {
        Self::new(data, row_count, column_count, Layout::ColumnMajor)
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.column_count
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn element_type(&self) -> ElementType {
        T::ELEMENT_TYPE
    }

    /// Lazy accessor for the column at `position`, or `None` when out of range.
    pub fn column(&self, position: usize) -> Option<Column<'a, T>> {
        if position >= self.column_count {
            return None;
        }
        let column = match self.layout {
            Layout::RowMajor => Column::strided(self.data, position, self.column_count, self.row_count),
            Layout::ColumnMajor => {
                let start = position * self.row_count;
                Column::contiguous(&self.data[start..start + self.row_count])
            }
        };
        Some(column)
    }
}

/// One equal-width histogram bin.
///
/// Covers `[lower_bound, upper_bound)`, except the last bin of a histogram which also includes
/// its upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub count: u64,
}

impl HistogramBin {
    pub fn width(&self) -> f64 {
        self.upper_bound - self.lower_bound
    }
}

/// Histogram of one feature, bins ordered by ascending lower bound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureBin {
    pub feature_name: String,
    pub bins: Vec<HistogramBin>,
}

impl FeatureBin {
    /// Number of values that landed in a bin. Never exceeds the row count.
    pub fn total_count(&self) -> u64 {
        self.bins.iter().map(|b| b.count).sum()
    }
}

/// Nearest-rank quantiles of the finite values of a feature.
///
/// The quantile `q` of `n` sorted values is the value at index `round(q * (n - 1))`, so every
/// quantile is an observed value. `p50` therefore differs from the interpolated
/// [`FeatureStat::median`] when `n` is even.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quantiles {
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p99: f64,
}

impl Quantiles {
    /// All quantiles NaN (no finite value, or a categorical feature).
    pub const UNDEFINED: Self = Self {
        p25: f64::NAN,
        p50: f64::NAN,
        p75: f64::NAN,
        p99: f64::NAN,
    };

    /// Quantiles of an ascending slice; [`Quantiles::UNDEFINED`] when it is empty.
    pub fn from_sorted(sorted: &[f64]) -> Self {
        if sorted.is_empty() {
            return Self::UNDEFINED;
        }
        let last = (sorted.len() - 1) as f64;
        let at = |q: f64| sorted[(q * last).round() as usize];
        Self {
            p25: at(0.25),
            p50: at(0.5),
            p75: at(0.75),
            p99: at(0.99),
        }
    }
}

/// Summary statistics of one feature.
///
/// `mean`, `median`, `stddev`, `min`, `max` and `quantiles` are NaN when the feature has no finite
/// value, and always NaN for categorical features. `stddev` is the population standard deviation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureStat {
    pub feature_name: String,
    pub kind: FeatureKind,
    pub row_count: usize,
    pub mean: f64,
    pub median: f64,
    pub stddev: f64,
    pub min: f64,
    pub max: f64,
    pub quantiles: Quantiles,
    /// NaN, +inf and -inf values (missing cells included).
    pub inf_count: usize,
    /// The NaN share of `inf_count`: missing cells and undefined values, as opposed to overflow.
    pub nan_count: usize,
    /// Distinct finite values (numeric) or distinct categories (categorical).
    pub unique_count: usize,
}

impl FeatureStat {
    /// Share of rows that were not finite. NaN for an empty column.
    pub fn inf_percent(&self) -> f64 {
        self.inf_count as f64 / self.row_count as f64
    }

    /// Distinct values relative to the row count. NaN for an empty column.
    pub fn unique_percent(&self) -> f64 {
        self.unique_count as f64 / self.row_count as f64
    }

    /// Number of `+inf` / `-inf` values.
    pub fn infinite_count(&self) -> usize {
        self.inf_count - self.nan_count
    }

    /// Number of finite values the numeric aggregates were computed from.
    pub fn finite_count(&self) -> usize {
        self.row_count - self.inf_count
    }
}

/// Statistics and (optionally) histograms for every profiled feature, in descriptor order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataProfile {
    pub row_count: usize,
    pub features: Vec<FeatureStat>,
    /// Empty when no bin count was requested.
    pub histograms: Vec<FeatureBin>,
}

impl DataProfile {
    /// Serialize the profile as compact JSON. NaN fields serialize as `null`.
    pub fn to_json(&self) -> ProfileResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize the profile as indented JSON.
    pub fn to_json_pretty(&self) -> ProfileResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Statistics record for the first feature called `name`.
    pub fn feature(&self, name: &str) -> Option<&FeatureStat> {
        self.features.iter().find(|f| f.feature_name == name)
    }

    /// Histogram for the first feature called `name`.
    pub fn histogram(&self, name: &str) -> Option<&FeatureBin> {
        self.histograms.iter().find(|h| h.feature_name == name)
    }
}
