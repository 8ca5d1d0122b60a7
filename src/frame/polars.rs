//! Polars `DataFrame` conversion (feature-gated behind `polars`).

use polars::prelude::{DataFrame, DataType};

use crate::error::{ProfileError, ProfileResult};

use super::{Frame, FrameBuilder};

impl Frame {
    /// Convert every column of `df` into a profile-ready [`Frame`].
    ///
    /// - integer and float columns become numeric features (nulls become NaN),
    /// - boolean and string columns become categorical features (nulls are missing cells),
    /// - any other dtype (dates, lists, structs, binary, ...) fails with
    ///   [`ProfileError::UnsupportedElementType`].
    pub fn from_dataframe(df: &DataFrame) -> ProfileResult<Frame> {
        let mut builder = FrameBuilder::new();
        for column in df.columns() {
            let series = column.as_materialized_series();
            let name = series.name().to_string();
            builder = match series.dtype() {
                DataType::Int8
                | DataType::Int16
                | DataType::Int32
                | DataType::Int64
                | DataType::UInt8
                | DataType::UInt16
                | DataType::UInt32
                | DataType::UInt64
                | DataType::Float32
                | DataType::Float64 => {
                    let cast = series.cast(&DataType::Float64)?;
                    let values = cast.f64()?;
                    builder.nullable_numeric(name, values.into_iter())
                }
                DataType::Boolean | DataType::String => {
                    let cast = series.cast(&DataType::String)?;
                    let labels = cast.str()?;
                    builder.categorical(name, labels.into_iter())
                }
                other => {
                    return Err(ProfileError::UnsupportedElementType {
                        dtype: other.to_string(),
                        message: format!("column '{name}' is neither numeric, boolean nor string"),
                    });
                }
            };
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use polars::prelude::{df, DataFrame, NamedFrom, Series};

    use crate::error::ProfileError;
    use crate::frame::Frame;
    use crate::types::FeatureKind;

    #[test]
    fn dataframe_columns_become_features() {
        let df: DataFrame = df!(
            "score" => [1.0, 3.0, 5.0],
            "count" => [1i64, 2, 2],
            "city" => ["a", "b", "a"],
        )
        .unwrap();

        let frame = Frame::from_dataframe(&df).unwrap();
        assert_eq!(frame.row_count(), 3);
        let kinds: Vec<FeatureKind> = frame.descriptors().iter().map(|d| d.kind).collect();
        assert_eq!(
            kinds,
            vec![FeatureKind::Numeric, FeatureKind::Numeric, FeatureKind::Categorical]
        );
        assert_eq!(frame.descriptors()[2].name, "city");
        assert_eq!(frame.dictionary(2).map(|d| d.len()), Some(2));
    }

    #[test]
    fn nulls_become_missing_values() {
        let df = Series::new("x".into(), &[Some(1.0), None, Some(2.0)]).into_frame();
        let frame = Frame::from_dataframe(&df).unwrap();
        let values = frame.view().unwrap().column(0).unwrap().to_vec();
        assert_eq!(values[0], 1.0);
        assert!(values[1].is_nan());
    }

    #[test]
    fn unsupported_dtypes_are_rejected() {
        let df = Series::new_null("nothing".into(), 3).into_frame();
        let err = Frame::from_dataframe(&df).unwrap_err();
        assert!(matches!(err, ProfileError::UnsupportedElementType { .. }));
    }
}
