mod common;

use camino::Utf8PathBuf;
use orrery::errors::OrreryError;
use orrery::mpcorb::parse_mpcorb_line;
use orrery::query::parse_constraint;
use orrery::store::AsteroidStore;

use common::{mpcorb_line, opposition_body};

#[tokio::test]
async fn test_upsert_is_idempotent() {
    let store = AsteroidStore::in_memory().await.unwrap();

    let mut record = opposition_body("00042");
    store.upsert(&record).await.unwrap();
    store.upsert(&record).await.unwrap();
    assert_eq!(store.count().await.unwrap(), 1);

    // A refreshed catalog updates in place.
    record.absolute_magnitude = Some(11.5);
    store.upsert(&record).await.unwrap();
    assert_eq!(store.count().await.unwrap(), 1);

    let rows = store
        .query_elements(8.0, 16.0, None, "designation")
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].designation, "00042");
    assert_eq!(rows[0].absolute_magnitude, Some(11.5));
}

#[tokio::test]
async fn test_load_mpcorb_respects_limit_and_skips_junk() {
    let dir = std::env::temp_dir().join("orrery-store-test");
    std::fs::create_dir_all(&dir).unwrap();
    let path = Utf8PathBuf::from_path_buf(dir.join("mpcorb-sample.dat")).unwrap();

    let mut content = String::new();
    content.push_str("MINOR PLANET CENTER ORBIT DATABASE\n");
    content.push_str(&"-".repeat(160));
    content.push('\n');
    for i in 0..5 {
        let line = mpcorb_line(
            &format!("{:05}", i + 1),
            "12.00",
            "0.15",
            "22A20",
            10.0 * i as f64,
            20.0,
            10.0,
            2.0,
            0.05,
            0.25,
            2.5,
        );
        content.push_str(&line);
        content.push('\n');
    }
    std::fs::write(&path, content).unwrap();

    let store = AsteroidStore::in_memory().await.unwrap();
    let loaded = store.load_mpcorb(&path, Some(3)).await.unwrap();
    assert_eq!(loaded, 3);
    assert_eq!(store.count().await.unwrap(), 3);

    // Re-ingesting without the limit is an update, not a duplication.
    let loaded = store.load_mpcorb(&path, None).await.unwrap();
    assert_eq!(loaded, 5);
    assert_eq!(store.count().await.unwrap(), 5);

    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn test_load_mpcorb_missing_file() {
    let store = AsteroidStore::in_memory().await.unwrap();
    let path = Utf8PathBuf::from("/nonexistent/mpcorb.dat");
    match store.load_mpcorb(&path, None).await {
        Err(OrreryError::MpcorbNotFound(p)) => assert_eq!(p, path),
        other => panic!("expected MpcorbNotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn test_query_constraint_and_ordering() {
    let store = AsteroidStore::in_memory().await.unwrap();
    for (i, h) in [(1i64, 14.0), (2, 10.0), (3, 12.0)] {
        let mut record = opposition_body(&format!("{i:05}"));
        record.number = Some(i);
        record.absolute_magnitude = Some(h);
        store.upsert(&record).await.unwrap();
    }

    // The H pre-filter widens the window by five magnitudes on each side.
    let rows = store
        .query_elements(8.0, 16.0, None, "absolute_magnitude")
        .await
        .unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].number, Some(2));
    assert_eq!(rows[2].number, Some(1));

    let predicate = parse_constraint("number_lte_2").unwrap();
    let rows = store
        .query_elements(8.0, 16.0, Some(&predicate), "number DESC")
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].number, Some(2));
    assert_eq!(rows[1].number, Some(1));

    // A window whose widened H band [13, 24] isolates the faintest body.
    let rows = store
        .query_elements(18.0, 19.0, None, "number")
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].number, Some(1));
}

#[tokio::test]
async fn test_load_mpcorb_skips_non_utf8_line() {
    let dir = std::env::temp_dir().join("orrery-store-test");
    std::fs::create_dir_all(&dir).unwrap();
    let path = Utf8PathBuf::from_path_buf(dir.join("mpcorb-corrupt.dat")).unwrap();

    // Two good records with a byte-corrupted one between them.
    let good_a = mpcorb_line(
        "00001", "12.00", "0.15", "22A20", 0.0, 20.0, 10.0, 2.0, 0.05, 0.25, 2.5,
    );
    let good_b = mpcorb_line(
        "00002", "12.00", "0.15", "22A20", 40.0, 20.0, 10.0, 2.0, 0.05, 0.25, 2.5,
    );
    let mut corrupt = mpcorb_line(
        "00003", "12.00", "0.15", "22A20", 80.0, 20.0, 10.0, 2.0, 0.05, 0.25, 2.5,
    )
    .into_bytes();
    corrupt[75] = 0xFF;

    let mut content = Vec::new();
    content.extend_from_slice(good_a.as_bytes());
    content.push(b'\n');
    content.extend_from_slice(&corrupt);
    content.push(b'\n');
    content.extend_from_slice(good_b.as_bytes());
    content.push(b'\n');
    std::fs::write(&path, content).unwrap();

    let store = AsteroidStore::in_memory().await.unwrap();
    let loaded = store.load_mpcorb(&path, None).await.unwrap();
    assert_eq!(loaded, 2);
    assert_eq!(store.count().await.unwrap(), 2);

    let rows = store
        .query_elements(8.0, 16.0, None, "designation")
        .await
        .unwrap();
    let designations: Vec<&str> = rows.iter().map(|r| r.designation.as_str()).collect();
    assert_eq!(designations, ["00001", "00002"]);

    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn test_parsed_line_round_trips_through_store() {
    let line = mpcorb_line(
        "00007", "12.00", "0.15", "22A20", 0.0, 20.0, 10.0, 2.0, 0.05, 0.25, 2.5,
    );
    let record = parse_mpcorb_line(&line).unwrap();

    let store = AsteroidStore::in_memory().await.unwrap();
    store.upsert(&record).await.unwrap();
    let rows = store
        .query_elements(8.0, 16.0, None, "designation")
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.designation, record.designation);
    assert_eq!(row.epoch, "22A20");
    assert_eq!(row.eccentricity, Some(record.eccentricity));
    assert_eq!(row.semimajor_axis, Some(record.semimajor_axis));
}
