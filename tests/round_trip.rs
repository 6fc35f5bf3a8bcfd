use chrono::{Duration, TimeZone, Utc};
use dayahead::cache::payload::{CachedPayload, PriceResponse};
use dayahead::cache::staleness::{self, Staleness};
use dayahead::resample::grid::GridResampler;
use dayahead::source::document::PriceDocument;

fn publication(start: &str, resolution: &str, prices: &[f64]) -> String {
    let points: String = prices
        .iter()
        .enumerate()
        .map(|(i, p)| format!("<Point><position>{}</position><price.amount>{}</price.amount></Point>", i + 1, p))
        .collect();
    format!(
        r#"<Publication_MarketDocument>
  <TimeSeries>
    <Period>
      <timeInterval><start>{}</start><end>2030-01-01T00:00Z</end></timeInterval>
      <resolution>{}</resolution>
      {}
    </Period>
  </TimeSeries>
</Publication_MarketDocument>"#,
        start, resolution, points
    )
}

#[test]
fn upstream_document_to_client_body() {
    let prices: Vec<f64> = (0..192).map(|i| i as f64 * 0.5 - 20.0).collect();
    let xml = publication("2024-01-14T23:00Z", "PT15M", &prices);

    let doc = PriceDocument::from_xml(&xml).unwrap();
    let series = GridResampler::new("PT15M").unwrap().resample(&doc).unwrap();
    assert_eq!(series.len(), 192);
    assert_eq!(series.interval(), Duration::minutes(15));

    let start = Utc.with_ymd_and_hms(2024, 1, 14, 23, 0, 0).unwrap();
    let next_date = Utc.with_ymd_and_hms(2024, 1, 16, 12, 30, 0).unwrap().timestamp();
    let payload = CachedPayload::from_series(&series, next_date).unwrap();

    let parsed = PriceResponse::from_json(payload.body()).unwrap();
    assert_eq!(parsed.first_date, start.timestamp());
    assert_eq!(parsed.next_date, next_date);
    assert_eq!(parsed.prices.len(), 192);
    assert_eq!(parsed.prices[0], -2000);
    assert_eq!(parsed.prices[41], 50);
    assert_eq!(parsed.prices[191], 7550);

    let now = start.timestamp() + 3600;
    assert_eq!(staleness::evaluate(Some(&payload), 100, now), Staleness::Fresh);
}

#[test]
fn gaps_in_the_document_are_forward_filled() {
    let xml = r#"<Publication_MarketDocument>
  <TimeSeries>
    <Period>
      <timeInterval><start>2024-01-14T23:00Z</start><end>2024-01-15T00:00Z</end></timeInterval>
      <resolution>PT15M</resolution>
      <Point><position>1</position><price.amount>10</price.amount></Point>
      <Point><position>4</position><price.amount>13</price.amount></Point>
    </Period>
  </TimeSeries>
</Publication_MarketDocument>"#;

    let doc = PriceDocument::from_xml(xml).unwrap();
    let series = GridResampler::new("PT15M").unwrap().resample(&doc).unwrap();
    let payload = CachedPayload::from_series(&series, 1_800_000_000).unwrap();
    assert_eq!(payload.prices(), &[1000, 1000, 1000, 1300]);
}

#[test]
fn hourly_request_ignores_quarter_hour_periods() {
    let xml = publication("2024-01-14T23:00Z", "PT15M", &[1.0; 96]);
    let doc = PriceDocument::from_xml(&xml).unwrap();
    let series = GridResampler::new("PT60M").unwrap().resample(&doc).unwrap();
    assert!(series.is_empty());
    assert!(CachedPayload::from_series(&series, 1_800_000_000).is_err());
}
