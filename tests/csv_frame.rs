use rusty_data_profiler::frame::csv::{read_csv_frame, read_csv_frame_from_path};
use rusty_data_profiler::frame::{ColumnSpec, FrameBuilder};
use rusty_data_profiler::profile::{ProfileOptions, Profiler};
use rusty_data_profiler::types::FeatureKind;
use rusty_data_profiler::ProfileError;

fn measurement_specs() -> Vec<ColumnSpec> {
    vec![
        ColumnSpec::new("temperature", "float64"),
        ColumnSpec::new("humidity", "int64"),
        ColumnSpec::new("site", "str"),
    ]
}

fn reader(input: &str) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(input.as_bytes())
}

#[test]
fn profile_csv_from_path_happy_path() {
    let frame = read_csv_frame_from_path("tests/fixtures/measurements.csv", &measurement_specs()).unwrap();
    assert_eq!(frame.row_count(), 4);
    assert_eq!(frame.column_count(), 3);

    let profiler = Profiler::new(ProfileOptions::default()).unwrap();
    let profile = frame.profile(&profiler, Some(2)).unwrap();
    assert_eq!(profile.row_count, 4);

    let temperature = profile.feature("temperature").unwrap();
    assert_eq!(temperature.inf_count, 1);
    assert_eq!((temperature.min, temperature.median, temperature.max), (1.5, 3.5, 21.0));
    assert!((temperature.mean - 26.0 / 3.0).abs() < 1e-12);
    assert_eq!(temperature.inf_percent(), 0.25);
    assert_eq!((temperature.nan_count, temperature.infinite_count()), (0, 1));

    // Empty cell counts as a missing value.
    let humidity = profile.feature("humidity").unwrap();
    assert_eq!(humidity.inf_count, 1);
    assert_eq!(humidity.nan_count, 1);
    assert_eq!((humidity.min, humidity.median, humidity.max, humidity.mean), (70.0, 75.0, 80.0, 75.0));
    assert_eq!(humidity.unique_count, 3);

    let site = profile.feature("site").unwrap();
    assert_eq!(site.kind, FeatureKind::Categorical);
    assert_eq!(site.unique_count, 3);
    assert!(site.mean.is_nan());

    let temperature_bins: Vec<u64> = profile.histogram("temperature").unwrap().bins.iter().map(|b| b.count).collect();
    assert_eq!(temperature_bins, vec![2, 1]);
    let humidity_bins: Vec<u64> = profile.histogram("humidity").unwrap().bins.iter().map(|b| b.count).collect();
    assert_eq!(humidity_bins, vec![1, 2]);

    let dictionary = frame.dictionary(2).unwrap();
    assert_eq!(dictionary.labels(), ["oslo", "rome", "paris"]);
}

#[test]
fn csv_columns_may_be_reordered_and_extra_columns_ignored() {
    let input = "unused,humidity,site,temperature\nx,50,a,1.0\ny,60,b,2.0\n";
    let frame = read_csv_frame(&mut reader(input), &measurement_specs()).unwrap();

    let names: Vec<&str> = frame.descriptors().iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["temperature", "humidity", "site"]);
    assert_eq!(frame.view().unwrap().column(1).unwrap().to_vec(), vec![50.0, 60.0]);
}

#[test]
fn csv_errors_on_missing_required_column() {
    let input = "temperature,site\n1.0,a\n";
    let err = read_csv_frame(&mut reader(input), &measurement_specs()).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("schema mismatch"));
    assert!(msg.contains("missing required column 'humidity'"));
}

#[test]
fn csv_errors_on_numeric_parse() {
    let input = "temperature,humidity,site\nwarm,1,a\n";
    let err = read_csv_frame(&mut reader(input), &measurement_specs()).unwrap_err();
    assert!(matches!(err, ProfileError::ParseError { row: 2, .. }));
    let msg = err.to_string();
    assert!(msg.contains("failed to parse value"));
    assert!(msg.contains("column 'temperature'"));
}

#[test]
fn csv_missing_file_is_an_error() {
    let err = read_csv_frame_from_path("tests/fixtures/does_not_exist.csv", &measurement_specs()).unwrap_err();
    assert!(matches!(err, ProfileError::Csv(_)));
}

#[test]
fn header_only_csv_profiles_as_empty() {
    let frame = read_csv_frame(&mut reader("temperature,humidity,site\n"), &measurement_specs()).unwrap();
    assert_eq!(frame.row_count(), 0);

    let profiler = Profiler::new(ProfileOptions::default()).unwrap();
    let profile = frame.profile(&profiler, Some(3)).unwrap();
    assert_eq!(profile.features.len(), 3);
    assert!(profile.histograms.iter().all(|h| h.bins.len() == 3 && h.total_count() == 0));
}

#[test]
fn built_frame_exports_json_with_nulls_for_undefined_stats() {
    let frame = FrameBuilder::new()
        .nullable_numeric("score", [None, None])
        .categorical("city", [Some("a"), Some("a")])
        .build()
        .unwrap();

    let profiler = Profiler::new(ProfileOptions::default()).unwrap();
    let json = frame.profile(&profiler, None).unwrap().to_json().unwrap();

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["row_count"], 2);
    assert!(value["features"][0]["mean"].is_null());
    assert!(value["features"][0]["quantiles"]["p50"].is_null());
    assert_eq!(value["features"][0]["nan_count"], 2);
    assert_eq!(value["features"][0]["inf_count"], 2);
    assert_eq!(value["features"][1]["kind"], "Categorical");
    assert_eq!(value["features"][1]["unique_count"], 1);
    assert_eq!(value["histograms"].as_array().map(Vec::len), Some(0));
}
