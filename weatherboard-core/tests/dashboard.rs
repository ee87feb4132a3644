//! End-to-end lookups: controller, real HTTP client, recording widgets.

mod common;

use common::{MapCall, Recorder, air_quality, client_for, forecast, paris_weather};
use weatherboard_core::{
    BackendClient, Dashboard, FixedPosition, Location, MemoryStore, RecentCitiesStore, Region,
    controller::CITY_NOT_FOUND_MESSAGE,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

fn dashboard(server: &MockServer, ui: &Recorder) -> Dashboard<BackendClient, MemoryStore> {
    Dashboard::new(
        client_for(server),
        RecentCitiesStore::new(MemoryStore::default()),
        ui.presenter(),
    )
}

async fn mount_side_fetches(server: &MockServer, aqi_index: i64) {
    Mock::given(method("GET"))
        .and(path("/aqi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(air_quality(aqi_index)))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast(40)))
        .mount(server)
        .await;
}

#[tokio::test]
async fn paris_lookup_renders_everything() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("city", "Paris"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paris_weather()))
        .expect(1)
        .mount(&server)
        .await;
    mount_side_fetches(&server, 2).await;

    let ui = Recorder::default();
    let board = dashboard(&server, &ui);

    board.submit_city(Some("Paris")).await.unwrap();

    assert_eq!(board.recent_cities().await.unwrap()[0], "Paris");

    let screen = ui.screen();
    assert_eq!(screen.text[&Region::Temperature], "32°C");
    assert!(screen.text[&Region::Advisory].contains("hot"));

    let paris = Location::new(48.85, 2.35);
    assert_eq!(screen.map[0], MapCall::Open(paris, 10));
    assert!(screen.map.contains(&MapCall::Marker(paris)));

    assert!(screen.aqi_visible);
    assert_eq!(screen.bar, Some((40, "#27ae60".to_string())));

    assert_eq!(screen.charts.len(), 1);
    assert_eq!(screen.charts[0].values, (0..8).map(f64::from).collect::<Vec<_>>());
    assert_eq!(screen.cards.len(), 5);
    assert!(screen.alerts.is_empty());
}

#[tokio::test]
async fn unknown_city_alerts_without_side_fetches() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("city", "Zzzznotacity"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({ "cod": 404 })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/aqi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(air_quality(1)))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast(8)))
        .expect(0)
        .mount(&server)
        .await;

    let ui = Recorder::default();
    let board = dashboard(&server, &ui);

    board.submit_city(Some("Zzzznotacity")).await.unwrap();

    {
        let screen = ui.screen();
        assert_eq!(screen.alerts, vec![CITY_NOT_FOUND_MESSAGE]);
        assert!(screen.map.is_empty());
        assert!(screen.charts.is_empty());
        assert!(!screen.aqi_visible);
    }
    assert_eq!(board.recent_cities().await.unwrap(), vec!["Zzzznotacity"]);

    server.verify().await;
}

#[tokio::test]
async fn second_lookup_moves_existing_map() {
    let server = MockServer::start().await;
    let mut berlin = paris_weather();
    berlin["name"] = "Berlin".into();
    berlin["sys"]["country"] = "DE".into();
    berlin["coord"] = serde_json::json!({ "lat": 52.52, "lon": 13.41 });

    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("city", "Paris"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paris_weather()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("city", "Berlin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(berlin))
        .mount(&server)
        .await;
    mount_side_fetches(&server, 1).await;

    let ui = Recorder::default();
    let board = dashboard(&server, &ui);

    board.submit_city(Some("Paris")).await.unwrap();
    board.submit_city(Some("Berlin")).await.unwrap();

    assert_eq!(board.recent_cities().await.unwrap(), vec!["Berlin", "Paris"]);

    let screen = ui.screen();
    let opens = screen.map.iter().filter(|c| matches!(c, MapCall::Open(..))).count();
    assert_eq!(opens, 1);
    let berlin_pos = Location::new(52.52, 13.41);
    assert!(screen.map.contains(&MapCall::View(berlin_pos, 10)));
    assert!(screen.map.contains(&MapCall::Move(berlin_pos)));
    assert_eq!(screen.text[&Region::Place], "Berlin, DE");
    assert_eq!(screen.charts.len(), 2);
}

#[tokio::test]
async fn out_of_range_aqi_keeps_panel_hidden() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paris_weather()))
        .mount(&server)
        .await;
    mount_side_fetches(&server, 9).await;

    let ui = Recorder::default();
    let board = dashboard(&server, &ui);

    board.submit_city(Some("Paris")).await.unwrap();

    let screen = ui.screen();
    assert!(!screen.aqi_visible);
    assert_eq!(screen.charts.len(), 1);
}

#[tokio::test]
async fn forecast_without_list_is_skipped_silently() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paris_weather()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/aqi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(air_quality(1)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "cod": "200" })))
        .mount(&server)
        .await;

    let ui = Recorder::default();
    let board = dashboard(&server, &ui);

    board.submit_city(Some("Paris")).await.unwrap();

    let screen = ui.screen();
    assert!(screen.charts.is_empty());
    assert!(screen.cards.is_empty());
    assert!(screen.alerts.is_empty());
    assert!(screen.aqi_visible);
}

#[tokio::test]
async fn geolocation_uses_coordinates_and_skips_recent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("lat", "48.85"))
        .and(query_param("lon", "2.35"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paris_weather()))
        .expect(1)
        .mount(&server)
        .await;
    mount_side_fetches(&server, 3).await;

    let ui = Recorder::default();
    let board = dashboard(&server, &ui).with_geolocator(FixedPosition(Location::new(48.85, 2.35)));

    board.locate().await.unwrap();

    assert!(board.recent_cities().await.unwrap().is_empty());
    let screen = ui.screen();
    assert_eq!(screen.map[0], MapCall::Open(Location::new(48.85, 2.35), 10));
    assert_eq!(screen.bar, Some((60, "#f1c40f".to_string())));
}

#[tokio::test]
async fn suggestion_flow() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cities"))
        .and(query_param("q", "Pa"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([{ "name": "Paris", "country": "FR" }])),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("city", "Paris"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paris_weather()))
        .mount(&server)
        .await;
    mount_side_fetches(&server, 1).await;

    let ui = Recorder::default();
    let board = dashboard(&server, &ui);

    assert!(board.autocomplete("P").await.unwrap().is_empty());
    let rows = board.autocomplete("Pa").await.unwrap();
    assert_eq!(ui.screen().suggestions.len(), 1);

    board.select_suggestion(&rows[0]).await.unwrap();

    let screen = ui.screen();
    assert_eq!(screen.input, "Paris");
    assert!(screen.suggestions.is_empty());
    assert_eq!(screen.text[&Region::Temperature], "32°C");
}
