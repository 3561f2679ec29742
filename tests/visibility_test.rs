mod common;

use orrery::epoch::parse_date_mjd;
use orrery::night::night_window;
use orrery::observer::Observer;
use orrery::store::AsteroidStore;
use orrery::visibility::{compute_visibility, VisibilityParams};

use common::opposition_body;

/// End-to-end planning run: one synthetic main-belt body near opposition,
/// evaluated through the store, the night scan and the visibility cuts.
#[tokio::test]
async fn test_opposition_body_is_visible() {
    let store = AsteroidStore::in_memory().await.unwrap();
    store.upsert(&opposition_body("TARGET")).await.unwrap();

    let observer = Observer::new(45.0, 0.0, 0.0);
    let date_mjd = parse_date_mjd("2023-02-08").unwrap();
    let params = VisibilityParams::default();

    let rows = store
        .query_elements(params.mag_min, params.mag_max, None, "designation")
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);

    let visible = compute_visibility(&rows, &observer, date_mjd, &params);
    assert_eq!(visible.len(), 1);
    let body = &visible[0];
    assert_eq!(body.designation, "TARGET");

    // Near opposition at 2.5 AU with H = 12 the body sits around magnitude
    // 15 and transits high for a mid-northern site.
    assert!(
        (8.0..=16.0).contains(&body.magnitude),
        "magnitude {}",
        body.magnitude
    );
    assert!(body.max_altitude > 20.0, "max altitude {}", body.max_altitude);

    // The reported peak lies inside the sampled night.
    let window = night_window(&observer, date_mjd);
    assert!(
        window.start <= body.best_time && body.best_time <= window.end,
        "best time {} outside [{}, {}]",
        body.best_time,
        window.start,
        window.end
    );
}

#[tokio::test]
async fn test_altitude_floor_filters_everything() {
    let store = AsteroidStore::in_memory().await.unwrap();
    store.upsert(&opposition_body("TARGET")).await.unwrap();

    let observer = Observer::new(45.0, 0.0, 0.0);
    let date_mjd = parse_date_mjd("2023-02-08").unwrap();
    let params = VisibilityParams {
        alt_min: 80.0,
        ..VisibilityParams::default()
    };

    let rows = store
        .query_elements(params.mag_min, params.mag_max, None, "designation")
        .await
        .unwrap();
    let visible = compute_visibility(&rows, &observer, date_mjd, &params);
    assert!(visible.is_empty());
}

#[tokio::test]
async fn test_magnitude_window_filters_everything() {
    let store = AsteroidStore::in_memory().await.unwrap();

    // H = 25: a tiny body far below any 16th-magnitude cutoff, but inside
    // the store's widened H pre-filter for a faint window.
    let mut faint = opposition_body("FAINT");
    faint.absolute_magnitude = Some(25.0);
    store.upsert(&faint).await.unwrap();

    let observer = Observer::new(45.0, 0.0, 0.0);
    let date_mjd = parse_date_mjd("2023-02-08").unwrap();
    let params = VisibilityParams {
        mag_min: 8.0,
        mag_max: 22.0,
        alt_min: 0.0,
    };

    let rows = store
        .query_elements(params.mag_min, params.mag_max, None, "designation")
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    let visible = compute_visibility(&rows, &observer, date_mjd, &params);
    assert!(visible.is_empty());
}
