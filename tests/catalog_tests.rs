use shows_catalog::catalog::{fetch_moscow_shows, write_csv, ExportError, CSV_HEADER};
use shows_catalog::config::model::Config;
use shows_catalog::kudago::model::ShowRecord;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn record(id: &str, title: &str, theatre: &str) -> ShowRecord {
    ShowRecord {
        id: id.to_string(),
        title: title.to_string(),
        theatre: theatre.to_string(),
        city: "Москва".to_string(),
    }
}

#[test_log::test]
fn written_catalog_reads_back_field_for_field() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("shows_catalog.csv");

    let records = vec![
        record("188169", "Евгений Онегин", "Театр на Таганке"),
        record("190001", "Ревизор, или Сон в руку", "Театр \"Современник\""),
        record("190002", "Без театра", ""),
    ];

    write_csv(&path, &records).unwrap();

    let mut reader = csv::Reader::from_path(&path).unwrap();
    assert_eq!(
        reader.headers().unwrap().iter().collect::<Vec<_>>(),
        CSV_HEADER
    );

    let read_back = reader
        .deserialize::<ShowRecord>()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert_eq!(read_back, records);
}

#[test_log::test]
fn empty_catalog_still_gets_a_header() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shows_catalog.csv");

    write_csv(&path, &[]).unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(contents, "id,title,theatre,city\n");
}

#[test_log::test]
fn rewriting_overwrites_the_previous_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shows_catalog.csv");

    write_csv(&path, &[record("1", "Чайка", "МХТ"), record("2", "Гамлет", "")]).unwrap();
    write_csv(&path, &[record("3", "Макбет", "")]).unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(contents.lines().count(), 2);
    assert!(contents.contains("Макбет"));
    assert!(!contents.contains("Чайка"));
}

fn event_json(id: i64) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "title": format!("Спектакль №{id}"),
        "short_title": format!("Спектакль №{id}"),
        "place": {"id": 1000 + id, "title": format!("Театр №{id}")},
        "location": {"slug": "msk", "name": "Москва"}
    })
}

async fn mount_taxonomies(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/locations/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"id": 1, "name": "Москва", "slug": "msk"},
            {"id": 2, "name": "Санкт-Петербург", "slug": "spb"}
        ])))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/event-categories/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"id": 2, "name": "Спектакли", "slug": "theater"},
            {"id": 3, "name": "Кино", "slug": "cinema"}
        ])))
        .mount(server)
        .await;
}

fn test_config(server: &MockServer, dir: &tempfile::TempDir) -> Config {
    Config {
        base_url: server.uri(),
        output_path: dir.path().join("data").join("shows_catalog.csv"),
        only_upcoming: false,
        max_pages: None,
    }
}

#[test_log::test(tokio::test)]
async fn exports_two_pages_into_a_catalog_file() {
    let server = MockServer::start().await;
    mount_taxonomies(&server).await;

    let next_url = format!("{}/events/?page=2", server.uri());
    Mock::given(method("GET"))
        .and(path("/events/"))
        .and(query_param("page", "1"))
        .and(query_param("location", "msk"))
        .and(query_param("categories", "theater"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "count": 107,
            "next": next_url,
            "results": (1..101).map(event_json).collect::<Vec<_>>()
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/events/"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "count": 107,
            "next": null,
            "results": (101..108).map(event_json).collect::<Vec<_>>()
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&server, &dir);

    let summary = fetch_moscow_shows(&config).await.unwrap();

    assert_eq!(summary.records, 107);
    assert_eq!(summary.city.slug, "msk");
    assert_eq!(summary.category.slug, "theater");

    // 1 header line + 107 rows.
    let contents = std::fs::read_to_string(&config.output_path).unwrap();
    assert_eq!(contents.lines().count(), 108);
    assert!(contents.starts_with("id,title,theatre,city\n"));
}

#[test_log::test(tokio::test)]
async fn unknown_city_fails_without_writing_anything() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/locations/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"id": 2, "name": "Санкт-Петербург", "slug": "spb"}
        ])))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&server, &dir);

    let result = fetch_moscow_shows(&config).await;

    assert!(matches!(result, Err(ExportError::Api(_))));
    assert!(!config.output_path.exists());
}

#[test_log::test(tokio::test)]
async fn mid_pagination_failure_leaves_no_partial_catalog() {
    let server = MockServer::start().await;
    mount_taxonomies(&server).await;

    let next_url = format!("{}/events/?page=2", server.uri());
    Mock::given(method("GET"))
        .and(path("/events/"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "count": 107,
            "next": next_url,
            "results": (1..101).map(event_json).collect::<Vec<_>>()
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/events/"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&server, &dir);

    let result = fetch_moscow_shows(&config).await;

    assert!(result.is_err());
    assert!(!config.output_path.exists());
}
