//! Version store and comparison cache behavior.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use layercheck_core::config::ComparisonConfig;
use layercheck_core::errors::{ExError, ExErrorKind, LayerCheckError};
use layercheck_core::logging_facility::test_capture::init_test_capture;
use layercheck_core::model::{Color, Point};
use layercheck_core::snapshot::LayerSnapshot;
use layercheck_core::store::{ComparisonCache, InMemoryVersionStore, VersionRecord, VersionStore};
use layercheck_core_types::schema::{EVENT_END, EVENT_END_ERROR, FIELD_ERR_CODE};
use layercheck_core_types::VersionId;

fn snaps(area: f64) -> Vec<LayerSnapshot> {
    vec![
        LayerSnapshot::new("BLK_1_FLR_0_BLT_UP_AREA", Color::indexed(1))
            .with_area(area)
            .with_centroid(Point::new(1.0, 1.0))
            .with_entity_count(1),
        LayerSnapshot::new("BLK_1_STAIR", Color::indexed(4)).with_area(8.0),
    ]
}

#[test]
fn test_store_put_get_remove() {
    let mut store = InMemoryVersionStore::new();
    let record = VersionRecord::new("tower-a", snaps(100.0)).unwrap();
    let id = record.version_id.clone();

    store.put(record.clone()).unwrap();
    assert_eq!(store.get(&id).unwrap(), &record);
    assert_eq!(store.list().len(), 1);

    let removed = store.remove(&id).unwrap();
    assert_eq!(removed.version_id, id);
    assert!(store.is_empty());

    let err: ExError = store.remove(&id).unwrap_err().into();
    assert_eq!(err.kind(), ExErrorKind::NotFound);
    assert_eq!(err.entity_id(), Some(id.as_str()));
}

#[test]
fn test_identical_content_is_stored_once() {
    let mut store = InMemoryVersionStore::new();

    let first = store.record_version("tower-a", snaps(100.0)).unwrap();
    let again = store.record_version("tower-b", snaps(100.0)).unwrap();

    assert_eq!(first, again);
    assert_eq!(store.len(), 1);
    assert!(store.list_project("tower-b").is_empty());
}

#[test]
fn test_list_is_oldest_first() {
    let mut store = InMemoryVersionStore::new();
    let t0 = chrono::Utc::now();
    let mut ids = Vec::new();
    for (i, area) in [120.0, 100.0, 110.0].into_iter().enumerate() {
        let mut record = VersionRecord::new("p", snaps(area)).unwrap();
        record.created_at = t0 + chrono::Duration::seconds(i as i64);
        ids.push(record.version_id.clone());
        store.put(record).unwrap();
    }

    let listed: Vec<&VersionId> = store.list().into_iter().map(|r| &r.version_id).collect();

    assert_eq!(listed, ids.iter().collect::<Vec<_>>());
}

#[test]
fn test_cached_result_is_reused() {
    let base = VersionRecord::new("p", snaps(100.0)).unwrap();
    let new = VersionRecord::new("p", snaps(115.0)).unwrap();
    let config = ComparisonConfig::default();
    let mut cache = ComparisonCache::new();

    let first = cache.get_or_compute(&base, &new, &config);
    let second = cache.get_or_compute(&base, &new, &config);

    assert_eq!(first, second);
    assert_eq!(cache.len(), 1);
    assert_eq!(first.base_version_id.as_deref(), Some(base.version_id.as_str()));
    assert_eq!(first.new_version_id.as_deref(), Some(new.version_id.as_str()));
}

#[test]
fn test_replacing_a_version_bypasses_stale_entry() {
    let mut store = InMemoryVersionStore::new();
    let base = VersionRecord::new("p", snaps(100.0)).unwrap();
    let new = VersionRecord::new("p", snaps(115.0)).unwrap();
    store.put(base.clone()).unwrap();
    store.put(new.clone()).unwrap();

    let config = ComparisonConfig::default();
    let mut cache = ComparisonCache::new();
    let before = cache.get_or_compute(&base, &new, &config);
    assert_eq!(before.modified.len(), 1);

    // same id, content reverted to the base
    let mut replaced = new.clone();
    replaced.snapshots = snaps(100.0);
    replaced.digest = base.digest.clone();
    store.put(replaced).unwrap();

    let current = store.get(&new.version_id).unwrap();
    assert!(cache.get(&base, current).is_none());
    let after = cache.get_or_compute(&base, current, &config);
    assert!(after.is_empty());
}

#[test]
fn test_invalidate_drops_entries_for_version() {
    let a = VersionRecord::new("p", snaps(100.0)).unwrap();
    let b = VersionRecord::new("p", snaps(101.0)).unwrap();
    let c = VersionRecord::new("p", snaps(102.0)).unwrap();
    let config = ComparisonConfig::default();
    let mut cache = ComparisonCache::new();
    cache.get_or_compute(&a, &b, &config);
    cache.get_or_compute(&b, &c, &config);
    cache.get_or_compute(&a, &c, &config);

    cache.invalidate(&b.version_id);

    assert_eq!(cache.len(), 1);
    assert!(cache.get(&a, &c).is_some());
}

#[test]
fn test_version_not_found_error_text() {
    let store = InMemoryVersionStore::new();
    let err = store.get(&VersionId::from("v-missing")).unwrap_err();
    assert_eq!(
        err,
        LayerCheckError::VersionNotFound {
            version_id: "v-missing".to_string()
        }
    );
    assert_eq!(err.to_string(), "Version not found: v-missing");
}

#[test]
fn test_compare_stored_goes_through_cache() {
    let capture = init_test_capture();
    let mut store = InMemoryVersionStore::new();
    let a = store.record_version("tower", snaps(100.0)).unwrap();
    let b = store.record_version("tower", snaps(115.0)).unwrap();
    let mut cache = ComparisonCache::new();
    let config = ComparisonConfig::default();

    let first = store.compare_stored(&mut cache, &a, &b, &config).unwrap();
    let second = store.compare_stored(&mut cache, &a, &b, &config).unwrap();

    assert_eq!(cache.len(), 1);
    assert_eq!(first, second);
    assert_eq!(first.summary.modified_count, 1);
    assert_eq!(first.base_version_id.as_deref(), Some(a.as_str()));
    assert!(capture.events_for_op("compare_stored").iter().any(|e| {
        e.event.as_deref() == Some(EVENT_END) && e.field("modified_count") == Some("1")
    }));
}

#[test]
fn test_compare_stored_with_unknown_version() {
    let capture = init_test_capture();
    let mut store = InMemoryVersionStore::new();
    let a = store.record_version("tower", snaps(100.0)).unwrap();
    let mut cache = ComparisonCache::new();

    let err = store
        .compare_stored(&mut cache, &a, &VersionId::from("v-gone"), &ComparisonConfig::default())
        .unwrap_err();

    assert_eq!(
        err,
        LayerCheckError::VersionNotFound {
            version_id: "v-gone".to_string()
        }
    );
    assert!(cache.is_empty());
    assert!(capture.events_for_op("compare_stored").iter().any(|e| {
        e.event.as_deref() == Some(EVENT_END_ERROR) && e.field(FIELD_ERR_CODE) == Some("ERR_NOT_FOUND")
    }));
}
