use perfreport::prelude::*;
use perfreport_tests::*;
use std::sync::Arc;

#[test]
fn diffs_are_zero_without_baseline() {
    init();

    let report = report_with("results.jtl", "/a", &[100, 200]);

    assert!(report.baseline().is_none());
    assert!(report.diff().is_none());
    assert_eq!(report.average_diff(), 0);
    assert_eq!(report.median_diff(), 0);
    assert_eq!(report.error_rate_diff(), 0.);
    assert_eq!(report.sample_count_diff(), 0);
}

#[test]
fn diffs_against_previous_build() {
    init();

    let previous = Arc::new(ReportAggregate::new("results.jtl"));
    for sample in samples(300, 3, 10) {
        previous.add_sample(&sample);
    }

    let current = ReportAggregate::new("results.jtl");
    for sample in samples(400, 4, 5) {
        current.add_sample(&sample);
    }

    assert!(current.set_baseline(previous.clone()));

    assert_eq!(
        current.average_diff(),
        current.average_duration() as i64 - previous.average_duration() as i64
    );
    assert_eq!(
        current.median_diff(),
        current.median_duration() as i64 - previous.median_duration() as i64
    );
    assert_eq!(current.sample_count_diff(), 100);
    assert_eq!(
        current.error_rate_diff(),
        current.error_rate() - previous.error_rate()
    );
    assert_eq!(current.error_rate_diff(), 10.);

    let diff = current.diff().unwrap();
    assert_eq!(diff.sample_count, 100);
    assert_eq!(diff.average, current.average_diff());
}

#[test]
fn endpoints_link_by_key() {
    init();

    let previous = Arc::new(ReportAggregate::new("results.jtl"));
    previous.add_sample(&SampleRecord::new("http://shop/cart", 100, 1., true));
    previous.add_sample(&SampleRecord::new("http://shop/gone", 100, 1., true));

    let current = ReportAggregate::new("results.jtl");
    current.add_sample(&SampleRecord::new("http://shop/cart", 180, 1., false));
    current.add_sample(&SampleRecord::new("http://shop/new", 50, 1., true));

    current.set_baseline(previous.clone());

    let cart = current.endpoint("_shop_cart").unwrap();
    let previous_cart = previous.endpoint("_shop_cart").unwrap();
    assert!(Arc::ptr_eq(cart.baseline().unwrap(), &previous_cart));
    assert_eq!(cart.average_diff(), 80);
    assert_eq!(cart.median_diff(), 80);
    assert_eq!(cart.error_rate_diff(), 100.);
    assert_eq!(cart.sample_count_diff(), 0);

    let new = current.endpoint("_shop_new").unwrap();
    assert!(new.baseline().is_none());
    assert_eq!(new.average_diff(), 0);

    // The baseline itself is never modified.
    assert!(previous.baseline().is_none());
    assert!(previous_cart.baseline().is_none());
    assert_eq!(previous.sample_count(), 2);
}

#[test]
fn chained_builds() {
    init();

    let first = Arc::new(report_with("results.jtl", "/a", &[100]));
    let second = Arc::new(report_with("results.jtl", "/a", &[150]));
    let third = report_with("results.jtl", "/a", &[120]);

    assert!(second.set_baseline(first.clone()));
    assert!(third.set_baseline(second.clone()));

    assert_eq!(second.average_diff(), 50);
    assert_eq!(third.average_diff(), -30);
    assert_eq!(third.baseline().unwrap().baseline().unwrap().identifier(), "results.jtl");
}

#[test]
fn summarized_reports_diff_weights() {
    init();

    let parsers = ParserConfig::new()
        .parser(ParserKind::Other("JMeter".into()), "**/*.jtl")
        .parser(ParserKind::JmeterSummarizer, "**/*.log");

    let previous = Arc::new(
        ReportAggregate::new("jmeter-summary.log").with_parser_mode(parsers.clone()),
    );
    previous.add_sample(&SampleRecord::new("/a", 10, 0., true).with_external_error_weight(1.));
    previous.add_sample(&SampleRecord::new("/b", 10, 0., true).with_external_error_weight(1.));

    let current = ReportAggregate::new("jmeter-summary.log").with_parser_mode(parsers.clone());
    current.add_sample(&SampleRecord::new("/a", 10, 0., true).with_external_error_weight(3.));
    current.add_sample(&SampleRecord::new("/b", 10, 0., true).with_external_error_weight(5.));

    assert_eq!(
        current.error_rate_strategy(),
        ErrorRateStrategy::SummarizedWeight
    );
    assert_eq!(previous.error_rate(), 1.);
    assert_eq!(current.error_rate(), 4.);

    current.set_baseline(previous);
    assert_eq!(current.error_rate_diff(), 3.);

    let plain = ReportAggregate::new("results.jtl").with_parser_mode(parsers);
    plain.add_sample(&SampleRecord::new("/a", 10, 0., false).with_external_error_weight(7.));
    assert_eq!(plain.error_rate_strategy(), ErrorRateStrategy::ErrorPercent);
    assert_eq!(plain.error_rate(), 100.);
}

#[test]
fn reports_of_a_run_sort_by_identifier() {
    init();

    let mut reports = vec![
        Arc::new(report_with("search.jtl", "/s", &[1])),
        Arc::new(report_with("checkout.jtl", "/c", &[1])),
        Arc::new(report_with("login.jtl", "/l", &[1])),
    ];
    reports.sort();

    let names: Vec<&str> = reports.iter().map(|r| r.identifier()).collect();
    assert_eq!(names, vec!["checkout.jtl", "login.jtl", "search.jtl"]);
}
