//! Integration tests for the Baidu Maps client (wiremock-based)

use domain::Coordinate;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use integration_baidu::{BaiduConfig, BaiduError, BaiduMapClient, MapClient, RouteMode};

fn client_for_mock(base_url: &str, keys: &[&str]) -> BaiduMapClient {
    BaiduMapClient::new(&BaiduConfig::for_testing(base_url, keys)).unwrap()
}

fn geocode_json(lng: f64, lat: f64) -> serde_json::Value {
    serde_json::json!({
        "status": 0,
        "result": {
            "location": { "lng": lng, "lat": lat },
            "precise": 1,
            "confidence": 80,
            "comprehension": 100,
            "level": "门址"
        }
    })
}

fn transit_json() -> serde_json::Value {
    serde_json::json!({
        "status": 0,
        "message": "ok",
        "result": {
            "total": 3,
            "routes": [
                { "distance": 14000, "duration": 2700, "price": 4 },
                { "distance": 12345, "duration": 1800, "price": 3 },
                { "distance": 16000, "duration": 1800, "price": 5 }
            ]
        }
    })
}

async fn mount_geocode(server: &MockServer, address: &str, lng: f64, lat: f64) {
    Mock::given(method("GET"))
        .and(path("/geocoding/v3/"))
        .and(query_param("address", address))
        .respond_with(ResponseTemplate::new(200).set_body_json(geocode_json(lng, lat)))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_geocode_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geocoding/v3/"))
        .and(query_param("address", "人民广场"))
        .and(query_param("city", "上海市"))
        .and(query_param("output", "json"))
        .and(query_param("ak", "key-a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(geocode_json(121.48, 31.24)))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for_mock(&server.uri(), &["key-a"]);
    let c = client.geocode("人民广场").await.unwrap();

    assert!((c.longitude() - 121.48).abs() < 1e-9);
    assert!((c.latitude() - 31.24).abs() < 1e-9);
    assert_eq!(client.key_pool().usage_snapshot()[0].usage, 1);
}

#[tokio::test]
async fn test_geocode_http_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geocoding/v3/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = client_for_mock(&server.uri(), &["key-a"]);
    let err = client.geocode("人民广场").await.unwrap_err();

    assert!(matches!(err, BaiduError::Geocode { .. }));
    assert!(matches!(
        err.root_cause(),
        BaiduError::RequestFailed { status: 500 }
    ));
}

#[tokio::test]
async fn test_geocode_provider_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geocoding/v3/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"status": 1, "msg": "Internal Service Error"})),
        )
        .mount(&server)
        .await;

    let client = client_for_mock(&server.uri(), &["key-a"]);
    let err = client.geocode("nowhere").await.unwrap_err();

    match err.root_cause() {
        BaiduError::Provider { status, message } => {
            assert_eq!(*status, 1);
            assert_eq!(message, "Internal Service Error");
        },
        other => unreachable!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_provider_quota_rotates_to_next_key() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geocoding/v3/"))
        .and(query_param("ak", "key-a"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"status": 302, "message": "天配额超限"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/geocoding/v3/"))
        .and(query_param("ak", "key-b"))
        .respond_with(ResponseTemplate::new(200).set_body_json(geocode_json(121.5, 31.2)))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for_mock(&server.uri(), &["key-a", "key-b"]);

    let err = client.geocode("陆家嘴").await.unwrap_err();
    assert!(err.is_quota_related());

    // Rotation only affects the next call; the failed one is not retried.
    let c = client.geocode("陆家嘴").await.unwrap();
    assert!((c.longitude() - 121.5).abs() < 1e-9);
}

#[tokio::test]
async fn test_local_cap_exhaustion_stops_requests() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geocoding/v3/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(geocode_json(121.5, 31.2)))
        .expect(1)
        .mount(&server)
        .await;

    let config = BaiduConfig {
        daily_cap: 1,
        ..BaiduConfig::for_testing(&server.uri(), &["key-a"])
    };
    let client = BaiduMapClient::new(&config).unwrap();

    assert!(client.geocode("A").await.is_ok());
    let err = client.geocode("B").await.unwrap_err();
    assert!(matches!(
        err.root_cause(),
        BaiduError::QuotaExhausted { keys: 1 }
    ));
}

#[tokio::test]
async fn test_transit_route_picks_fastest() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/direction/v2/transit"))
        .and(query_param("origin", "31.2,121.4"))
        .and(query_param("destination", "31.2,121.5"))
        .and(query_param("region", "上海"))
        .respond_with(ResponseTemplate::new(200).set_body_json(transit_json()))
        .mount(&server)
        .await;

    let client = client_for_mock(&server.uri(), &["key-a"]);
    let route = client
        .calculate_route(
            Coordinate::new_unchecked(121.4, 31.2),
            Coordinate::new_unchecked(121.5, 31.2),
            RouteMode::Transit,
        )
        .await
        .unwrap();

    assert_eq!(route.mode, RouteMode::Transit);
    assert_eq!(route.duration_secs, 1800);
    assert!((route.distance_km - 12.345).abs() < 1e-9);
}

#[tokio::test]
async fn test_transit_without_routes_fails() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/direction/v2/transit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            serde_json::json!({"status": 0, "result": {"total": 0, "routes": []}}),
        ))
        .mount(&server)
        .await;

    let client = client_for_mock(&server.uri(), &["key-a"]);
    let err = client
        .calculate_route(
            Coordinate::new_unchecked(121.4, 31.2),
            Coordinate::new_unchecked(121.5, 31.2),
            RouteMode::Transit,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, BaiduError::Route { mode: "transit", .. }));
    assert!(matches!(err.root_cause(), BaiduError::NoRoutesFound));
}

#[tokio::test]
async fn test_riding_route() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/direction/v2/riding"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": 0,
            "result": { "routes": [ { "distance": 3200, "duration": 960 } ] }
        })))
        .mount(&server)
        .await;

    let client = client_for_mock(&server.uri(), &["key-a"]);
    let route = client
        .calculate_route(
            Coordinate::new_unchecked(121.40, 31.20),
            Coordinate::new_unchecked(121.42, 31.21),
            RouteMode::Riding,
        )
        .await
        .unwrap();

    assert_eq!(route.mode, RouteMode::Riding);
    assert_eq!(route.duration_secs, 960);
    assert!((route.distance_km - 3.2).abs() < 1e-9);
}

#[tokio::test]
async fn test_commute_info_far_apart_uses_transit() {
    let server = MockServer::start().await;

    mount_geocode(&server, "Building A", 121.40, 31.20).await;
    mount_geocode(&server, "Building B", 121.50, 31.20).await;

    Mock::given(method("GET"))
        .and(path("/direction/v2/transit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(transit_json()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for_mock(&server.uri(), &["key-a"]);
    let info = client
        .get_commute_info("Building A", "Building B")
        .await
        .unwrap();

    assert_eq!(info.mode, RouteMode::Transit);
    assert_eq!(info.duration_secs, 1800);
    assert!((info.distance_km - 12.345).abs() < 1e-9);
    assert!((info.start.longitude() - 121.40).abs() < 1e-9);
    assert!((info.end.longitude() - 121.50).abs() < 1e-9);
    // two geocodes plus one route
    assert_eq!(client.key_pool().usage_snapshot()[0].usage, 3);
}

#[tokio::test]
async fn test_commute_info_close_by_uses_riding() {
    let server = MockServer::start().await;

    mount_geocode(&server, "Home", 121.400, 31.200).await;
    mount_geocode(&server, "Office", 121.430, 31.220).await;

    Mock::given(method("GET"))
        .and(path("/direction/v2/riding"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": 0,
            "result": { "distance": 4100, "duration": 1260 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for_mock(&server.uri(), &["key-a"]);
    let info = client.get_commute_info("Home", "Office").await.unwrap();

    assert_eq!(info.mode, RouteMode::Riding);
    assert_eq!(info.duration_secs, 1260);
}

#[tokio::test]
async fn test_commute_info_wraps_geocode_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geocoding/v3/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = client_for_mock(&server.uri(), &["key-a"]);
    let err = client
        .get_commute_info("Building A", "Building B")
        .await
        .unwrap_err();

    assert!(matches!(err, BaiduError::CommuteInfo { .. }));
    assert!(err.to_string().contains("Building A"));
}
