use perfreport::prelude::*;
use perfreport_tests::*;

#[test]
fn single_endpoint_percentiles() {
    init();

    let report = report_with("a.jtl", "/checkout", &[100, 200, 300, 400, 500]);

    assert_eq!(report.median_duration(), 300);
    assert_eq!(report.p90_duration(), 500);
    assert_eq!(report.average_duration(), 300);
}

#[test]
fn error_rate_percentage() {
    init();

    let report = ReportAggregate::new("b.jtl");
    for i in 0..10 {
        report.add_sample(&SampleRecord::new("/login", 100, 1., i >= 2));
    }

    assert_eq!(report.error_rate(), 20.0);
}

#[test]
fn median_over_merged_endpoints() {
    init();

    let report = ReportAggregate::new("c.jtl");
    report.add_sample(&SampleRecord::new("/a", 100, 1., true));
    report.add_sample(&SampleRecord::new("/b", 200, 1., true));

    assert_eq!(report.endpoint_count(), 2);
    assert_eq!(report.median_duration(), 200);
}

#[test]
fn empty_report_degrades_to_zero() {
    init();

    let report = ReportAggregate::new("d.jtl");

    assert_eq!(report.average_duration(), 0);
    assert_eq!(report.error_rate(), 0.);
    assert_eq!(report.duration_at_percentile(0.5), Ok(0));
    assert_eq!(report.median_duration(), 0);
    assert_eq!(report.p90_duration(), 0);
    assert_eq!(report.average_size_kb(), 0.);
    assert_eq!(report.total_traffic_kb(), 0.);

    let stats = report.statistics();
    assert_eq!(stats.sample_count, 0);
    assert_eq!(stats.min_duration, None);
    assert_eq!(stats.max_duration, None);
}

#[test]
fn out_of_range_percentile_is_rejected() {
    init();

    let report = report_with("e.jtl", "/a", &[1, 2, 3]);

    let err = report.duration_at_percentile(1.5).unwrap_err();
    assert_eq!(err, ReportError::InvalidPercentile(1.5));
    assert!(err.to_string().contains("between 0 and 1"));

    // The failed query leaves the report untouched.
    assert_eq!(report.sample_count(), 3);
    assert_eq!(report.duration_at_percentile(1.0), Ok(3));
}

#[test]
fn key_normalization() {
    assert_eq!(endpoint_key("http://host/a/b"), "_host_a_b");

    let report = ReportAggregate::new("keys.jtl");
    report.add_sample(&SampleRecord::new("http://host/a/b", 10, 0., true));
    let endpoint = report.endpoint("_host_a_b").unwrap();
    assert_eq!(endpoint.raw_identifier(), "http://host/a/b");
}

#[test]
fn unlabeled_samples_are_not_counted() {
    init();

    let report = ReportAggregate::new("labels.jtl");
    let mut unlabeled = 0;
    for i in 0..100u64 {
        let sample = if i % 7 == 0 {
            unlabeled += 1;
            SampleRecord::unlabeled(i, 1., true)
        } else {
            SampleRecord::new("/a", i, 1., true)
        };
        report.add_sample(&sample);
    }

    assert_eq!(report.sample_count(), 100 - unlabeled);
    assert_eq!(report.endpoint("_a").unwrap().sample_count(), 100 - unlabeled);
}

#[test]
fn sizes_are_rounded() {
    init();

    let report = ReportAggregate::new("sizes.jtl");
    report.add_sample(&SampleRecord::new("/a", 10, 1.25, true));
    report.add_sample(&SampleRecord::new("/a", 10, 2.5, true));
    report.add_sample(&SampleRecord::new("/b", 10, 0.004, true));

    assert_eq!(report.average_size_kb(), 1.25);
    assert_eq!(report.total_traffic_kb(), 3.75);
}

#[test]
fn snapshot_serializes() {
    init();

    let report = report_with("snapshot.jtl", "/a", &[10, 20, 30]);
    let stats = report.statistics();
    let json = serde_json::to_value(&stats).unwrap();

    assert_eq!(json["identifier"], "snapshot.jtl");
    assert_eq!(json["sample_count"], 3);
    assert_eq!(json["median_duration"], 20);
    assert_eq!(json["min_duration"], 10);
}

#[test]
fn ordered_listing_is_worst_first() {
    init();

    let report = ReportAggregate::new("ordered.jtl");
    for (identifier, duration) in [("/fast", 10), ("/slow", 900), ("/medium", 300)] {
        report.add_sample(&SampleRecord::new(identifier, duration, 0., true));
    }

    let keys: Vec<String> = report
        .endpoints_ordered()
        .iter()
        .map(|endpoint| endpoint.key().to_string())
        .collect();
    assert_eq!(keys, vec!["_slow", "_medium", "_fast"]);

    let report = report.with_ordering(EndpointOrdering::Key);
    let keys: Vec<String> = report
        .endpoints_ordered()
        .iter()
        .map(|endpoint| endpoint.key().to_string())
        .collect();
    assert_eq!(keys, vec!["_slow", "_medium", "_fast"]);
}
