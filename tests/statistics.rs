use rusty_data_profiler::profile::{compute_statistics, ProfileOptions, Profiler};
use rusty_data_profiler::types::{
    ArrayView, ElementType, FeatureDescriptor, FeatureKind, FeatureStat, Layout,
};
use rusty_data_profiler::ProfileError;

/// Deterministic pseudo-random column data with a sprinkling of non-finite values.
fn generated_array(rows: usize, cols: usize) -> Vec<f64> {
    let mut state: u64 = 0x2545_F491_4F6C_DD1D;
    (0..rows * cols)
        .map(|i| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            match i % 97 {
                13 => f64::NAN,
                41 => f64::INFINITY,
                77 => f64::NEG_INFINITY,
                _ => ((state >> 33) % 10_000) as f64 / 100.0 - 50.0,
            }
        })
        .collect()
}

fn stat_bits(s: &FeatureStat) -> [u64; 5] {
    [
        s.mean.to_bits(),
        s.median.to_bits(),
        s.stddev.to_bits(),
        s.min.to_bits(),
        s.max.to_bits(),
    ]
}

#[test]
fn two_numeric_columns() {
    // [[1, 2], [3, 4], [5, 6]]
    let data = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
    let view = ArrayView::row_major(&data, 3, 2).unwrap();
    let descriptors = FeatureDescriptor::from_names_and_tags(&["a", "b"], &["int64", "float64"]).unwrap();

    let stats = compute_statistics(&view, &descriptors).unwrap();
    assert_eq!(stats.len(), 2);

    let a = &stats[0];
    assert_eq!(a.feature_name, "a");
    assert_eq!((a.mean, a.median, a.min, a.max), (3.0, 3.0, 1.0, 5.0));
    assert!((a.stddev - 1.632993161855452).abs() < 1e-12);
    assert_eq!(a.inf_count, 0);
    assert_eq!(a.unique_count, 3);
    assert_eq!((a.quantiles.p25, a.quantiles.p50, a.quantiles.p99), (3.0, 3.0, 5.0));

    let b = &stats[1];
    assert_eq!(b.feature_name, "b");
    assert_eq!((b.mean, b.median, b.min, b.max), (4.0, 4.0, 2.0, 6.0));
    assert!((b.stddev - 1.632993161855452).abs() < 1e-12);
}

#[test]
fn column_major_and_integer_buffers_agree_with_row_major_floats() {
    let floats = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
    let expected = compute_statistics(
        &ArrayView::row_major(&floats, 3, 2).unwrap(),
        &FeatureDescriptor::numeric(&["a", "b"]),
    )
    .unwrap();

    // Same matrix, transposed storage.
    let fortran = [1.0, 3.0, 5.0, 2.0, 4.0, 6.0];
    let col_major = compute_statistics(
        &ArrayView::column_major(&fortran, 3, 2).unwrap(),
        &FeatureDescriptor::numeric(&["a", "b"]),
    )
    .unwrap();
    assert_eq!(col_major, expected);

    let ints = [1i32, 2, 3, 4, 5, 6];
    let view = ArrayView::row_major(&ints, 3, 2).unwrap();
    assert_eq!(view.element_type(), ElementType::Int32);
    let from_ints = compute_statistics(&view, &FeatureDescriptor::numeric(&["a", "b"])).unwrap();
    assert_eq!(from_ints, expected);
}

#[test]
fn column_without_finite_values() {
    let data = [f64::NAN, f64::INFINITY, f64::NEG_INFINITY];
    let view = ArrayView::row_major(&data, 3, 1).unwrap();
    let stats = compute_statistics(&view, &FeatureDescriptor::numeric(&["x"])).unwrap();

    let x = &stats[0];
    assert_eq!(x.inf_count, 3);
    assert_eq!(x.nan_count, 1);
    assert_eq!(x.infinite_count(), 2);
    assert_eq!(x.unique_count, 0);
    assert!(x.quantiles.p25.is_nan());
    assert!(x.quantiles.p99.is_nan());
    assert_eq!(x.finite_count(), 0);
    assert!(x.mean.is_nan());
    assert!(x.median.is_nan());
    assert!(x.stddev.is_nan());
    assert!(x.min.is_nan());
    assert!(x.max.is_nan());
}

#[test]
fn categorical_column_reports_distinct_categories() {
    // ["a", "b", "a"] as category codes
    let data = [0.0, 1.0, 0.0];
    let view = ArrayView::row_major(&data, 3, 1).unwrap();
    let descriptors = vec![FeatureDescriptor::from_tag("c", 0, "str")];
    assert_eq!(descriptors[0].kind, FeatureKind::Categorical);

    let stats = compute_statistics(&view, &descriptors).unwrap();
    let c = &stats[0];
    assert_eq!(c.kind, FeatureKind::Categorical);
    assert_eq!(c.unique_count, 2);
    assert_eq!(c.inf_count, 0);
    assert!(c.mean.is_nan());
    assert!(c.median.is_nan());
    assert!((c.unique_percent() - 2.0 / 3.0).abs() < 1e-12);
}

#[test]
fn empty_view_never_fails() {
    let view = ArrayView::<f64>::row_major(&[], 0, 3).unwrap();
    let stats = compute_statistics(&view, &FeatureDescriptor::numeric(&["a", "b", "c"])).unwrap();

    assert_eq!(stats.len(), 3);
    for s in &stats {
        assert_eq!(s.row_count, 0);
        assert_eq!(s.inf_count, 0);
        assert_eq!(s.unique_count, 0);
        assert!(s.mean.is_nan());
        assert!(s.median.is_nan());
    }
}

#[test]
fn results_follow_descriptor_order_not_position_order() {
    let data = [1.0, 10.0, 2.0, 20.0];
    let view = ArrayView::row_major(&data, 2, 2).unwrap();
    let descriptors = vec![
        FeatureDescriptor::new("second", 1, FeatureKind::Numeric),
        FeatureDescriptor::new("first", 0, FeatureKind::Numeric),
    ];

    let stats = compute_statistics(&view, &descriptors).unwrap();
    assert_eq!(stats[0].feature_name, "second");
    assert_eq!(stats[0].mean, 15.0);
    assert_eq!(stats[1].feature_name, "first");
    assert_eq!(stats[1].mean, 1.5);
}

#[test]
fn median_is_bounded_by_min_and_max() {
    let (rows, cols) = (301, 7);
    let data = generated_array(rows, cols);
    let view = ArrayView::row_major(&data, rows, cols).unwrap();
    let names: Vec<String> = (0..cols).map(|i| format!("f{i}")).collect();

    for s in compute_statistics(&view, &FeatureDescriptor::numeric(&names)).unwrap() {
        assert!(s.min <= s.median, "{}", s.feature_name);
        assert!(s.median <= s.max, "{}", s.feature_name);
        assert!(s.min <= s.mean && s.mean <= s.max, "{}", s.feature_name);
        let q = s.quantiles;
        assert!(s.min <= q.p25 && q.p25 <= q.p50 && q.p50 <= q.p75 && q.p75 <= q.p99 && q.p99 <= s.max);
        assert!(s.nan_count <= s.inf_count);
        assert!(s.stddev >= 0.0);
        assert!(s.inf_count + s.unique_count <= s.row_count);
        assert_eq!(s.row_count, rows);
    }
}

#[test]
fn results_are_identical_for_any_worker_count() {
    let (rows, cols) = (500, 12);
    let data = generated_array(rows, cols);
    let view = ArrayView::column_major(&data, rows, cols).unwrap();
    let names: Vec<String> = (0..cols).map(|i| format!("f{i}")).collect();
    let descriptors = FeatureDescriptor::numeric(&names);

    let run = |threads: usize| {
        Profiler::new(ProfileOptions {
            num_threads: Some(threads),
            max_in_flight_features: threads,
        })
        .unwrap()
        .compute_statistics(&view, &descriptors)
        .unwrap()
    };

    let single = run(1);
    let multi = run(4);
    assert_eq!(single.len(), multi.len());
    for (a, b) in single.iter().zip(&multi) {
        assert_eq!(a.feature_name, b.feature_name);
        assert_eq!(stat_bits(a), stat_bits(b));
        assert_eq!(a.inf_count, b.inf_count);
        assert_eq!(a.unique_count, b.unique_count);
    }
}

#[test]
fn descriptor_count_must_match_column_count() {
    let data = [1.0, 2.0, 3.0, 4.0];
    let view = ArrayView::row_major(&data, 2, 2).unwrap();

    let err = compute_statistics(&view, &FeatureDescriptor::numeric(&["only_one"])).unwrap_err();
    assert!(matches!(err, ProfileError::InvalidShape { .. }));
    assert!(err.to_string().contains("1 feature descriptors for an array with 2 columns"));
}

#[test]
fn unsupported_element_types_are_rejected() {
    let err = ElementType::from_dtype("complex128").unwrap_err();
    assert!(matches!(err, ProfileError::UnsupportedElementType { .. }));
    assert!(err.to_string().contains("complex128"));

    let data = [1u8, 2, 3];
    let err = ArrayView::with_dtype(&data, 3, 1, Layout::RowMajor, "object").unwrap_err();
    assert!(matches!(err, ProfileError::UnsupportedElementType { .. }));
}

#[test]
fn dtype_tagged_buffers_profile_like_typed_ones() {
    let data = [3u16, 1, 2, 250];
    let view = ArrayView::with_dtype(&data, 4, 1, Layout::ColumnMajor, "uint16").unwrap();
    let stats = compute_statistics(&view, &FeatureDescriptor::numeric(&["n"])).unwrap();
    assert_eq!((stats[0].min, stats[0].median, stats[0].max), (1.0, 2.5, 250.0));
}
