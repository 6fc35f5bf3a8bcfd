use std::sync::Arc;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use tower::ServiceExt;
use wiremock::matchers::{method, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use dayahead::api::rest::{create_router, ApiState};
use dayahead::cache::slot_cache::SlotCache;
use dayahead::config::ForecastConfig;
use dayahead::forecast::open_meteo::{OpenMeteoClient, TemperatureForecast};

fn app(base_url: String) -> Router {
    let config = ForecastConfig {
        base_url,
        request_timeout_secs: 5,
        ..Default::default()
    };
    let forecast = OpenMeteoClient::new(&config).unwrap();
    create_router(Arc::new(ApiState { cache: Arc::new(SlotCache::new()), forecast }))
}

async fn get(app: Router, uri: &str) -> (StatusCode, String) {
    let resp = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

fn provider_body(first: i64, temps: &[f64]) -> serde_json::Value {
    let times: Vec<i64> = (0..temps.len() as i64).map(|h| first + h * 3600).collect();
    serde_json::json!({
        "latitude": 52.52,
        "longitude": 13.419998,
        "timezone": "Europe/Berlin",
        "hourly_units": { "time": "unixtime", "temperature_2m": "°C" },
        "hourly": { "time": times, "temperature_2m": temps },
    })
}

#[tokio::test]
async fn invalid_coordinates_never_reach_provider() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    for (uri, message) in [
        ("/v1/temperatures/abc/13.41", "Invalid latitude format"),
        ("/v1/temperatures/52.52/xyz", "Invalid longitude format"),
        ("/v1/temperatures/91/13.41", "Latitude must be between -90 and 90"),
        ("/v1/temperatures/-91/13.41", "Latitude must be between -90 and 90"),
        ("/v1/temperatures/52.52/181", "Longitude must be between -180 and 180"),
        ("/v1/temperatures/52.52/-181", "Longitude must be between -180 and 180"),
    ] {
        let (status, body) = get(app(server.uri()), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(body, format!(r#"{{"error":"{}"}}"#, message));
    }
}

#[tokio::test]
async fn returns_tenths_of_degrees() {
    let server = MockServer::start().await;
    let temps: Vec<f64> = std::iter::repeat(5.0).take(24).chain(std::iter::repeat(-2.0).take(24)).collect();
    Mock::given(method("GET"))
        .and(query_param("hourly", "temperature_2m"))
        .and(query_param("timeformat", "unixtime"))
        .and(query_param("forecast_days", "2"))
        .and(query_param("timezone", "auto"))
        .respond_with(ResponseTemplate::new(200).set_body_json(provider_body(1_700_000_000, &temps)))
        .expect(1)
        .mount(&server)
        .await;

    let (status, body) = get(app(server.uri()), "/v1/temperatures/52.52/13.41").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.starts_with(r#"{"first_date":1700000000,"hourly":[50,"#));

    let forecast: TemperatureForecast = serde_json::from_str(&body).unwrap();
    assert_eq!(forecast.hourly.len(), 48);
    assert_eq!(&forecast.hourly[24..], &[-20; 24]);
}

#[tokio::test]
async fn boundary_coordinates_are_accepted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(provider_body(0, &[1.0; 47])))
        .mount(&server)
        .await;

    for uri in ["/v1/temperatures/90/0", "/v1/temperatures/-90/0", "/v1/temperatures/0/180", "/v1/temperatures/0/-180"] {
        let (status, _) = get(app(server.uri()), uri).await;
        assert_eq!(status, StatusCode::OK, "{}", uri);
    }
}

#[tokio::test]
async fn provider_rejection_is_bad_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(400).set_body_string(r#"{"error":true,"reason":"bad"}"#))
        .mount(&server)
        .await;

    let (status, body) = get(app(server.uri()), "/v1/temperatures/52.52/13.41").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"error":"Invalid coordinates"}"#);
}

#[tokio::test]
async fn provider_failure_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let (status, body) = get(app(server.uri()), "/v1/temperatures/52.52/13.41").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body, r#"{"error":"Weather service unavailable"}"#);
}

#[tokio::test]
async fn unreachable_provider_is_unavailable() {
    // nothing listens on the discard port
    let (status, body) = get(app("http://127.0.0.1:9".to_string()), "/v1/temperatures/52.52/13.41").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body, r#"{"error":"Weather service unavailable"}"#);
}

#[tokio::test]
async fn short_forecast_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(provider_body(0, &[1.0; 46])))
        .mount(&server)
        .await;

    let (status, body) = get(app(server.uri()), "/v1/temperatures/52.52/13.41").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body, r#"{"error":"Invalid response from weather service"}"#);
}
