//! Caching and session behavior across repeated renders

use std::io::Write;

use objlens_core::config::HelperNames;
use objlens_core::expr;
use objlens_core::prelude::*;

const STRING_CLASS: u64 = 0x10000;

fn classify_expr(address: u64) -> String
{
    expr::classify(&HelperNames::default(), Address::new(address), Address::new(STRING_CLASS))
}

fn object(address: u64) -> ObjectRef
{
    ObjectRef::new("obj", "ObjHeader *", address)
}

/// Record at 0x100 with a single int32 field `x = 42`.
fn record_bridge() -> SnapshotBridge
{
    SnapshotBridge::default()
        .with_symbol("kclass:kotlin.String", STRING_CLASS)
        .with_setting("target.max-children-count", 256)
        .with_expression(expr::type_descriptor(Address::new(0x100)), EvalValue::address(0x9000u64))
        .with_expression(classify_expr(0x100), EvalValue::address(0x8000u64))
        .with_string(0x8000u64, "3|1|x|4|8192")
        .with_expression("*(int32_t *)0x2000", EvalValue::integer(42))
}

#[test]
fn test_repeat_sighting_clears_only_resolved_addresses()
{
    let inspector = Inspector::new(record_bridge(), InspectorConfig::default());

    assert_eq!(inspector.render(&object(0x100), RenderMode::Full).unwrap(), "x: 42");
    {
        let cache = inspector.session().cache();
        assert_eq!(cache.stats(CacheDomain::ResolvedAddress).clears, 0);
        assert_eq!(cache.stats(CacheDomain::ResolvedAddress).inserts, 1);
        assert_eq!(cache.len(CacheDomain::ResolvedAddress), 1);
    }

    assert_eq!(inspector.render(&object(0x100), RenderMode::Full).unwrap(), "x: 42");
    let cache = inspector.session().cache();
    assert_eq!(cache.stats(CacheDomain::ResolvedAddress).clears, 1);
    assert_eq!(cache.len(CacheDomain::ResolvedAddress), 0);
    assert_eq!(cache.stats(CacheDomain::LoadedAddress).clears, 0);
    assert_eq!(cache.stats(CacheDomain::TypeDescriptor).clears, 0);
    assert_eq!(cache.len(CacheDomain::LoadedAddress), 1);
    assert_eq!(cache.len(CacheDomain::TypeDescriptor), 1);
}

#[test]
fn test_caches_save_round_trips()
{
    let inspector = Inspector::new(record_bridge(), InspectorConfig::default());
    let descriptor_expr = expr::type_descriptor(Address::new(0x100));

    inspector.render(&object(0x100), RenderMode::Short).unwrap();
    inspector.render(&object(0x100), RenderMode::Short).unwrap();
    // The second render hit the classification cache, then dropped it.
    assert_eq!(inspector.bridge().evaluations_of(&classify_expr(0x100)), 1);

    inspector.render(&object(0x100), RenderMode::Short).unwrap();
    assert_eq!(inspector.bridge().evaluations_of(&classify_expr(0x100)), 2);
    assert_eq!(inspector.bridge().evaluations_of(&descriptor_expr), 1);

    let stats = inspector.session().cache().stats(CacheDomain::TypeDescriptor);
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 2);
}

#[test]
fn test_reset_forgets_everything()
{
    let inspector = Inspector::new(record_bridge(), InspectorConfig::default());
    inspector.render(&object(0x100), RenderMode::Full).unwrap();
    assert!(!inspector.session().cache().is_empty());

    inspector.reset();
    assert!(inspector.session().cache().is_empty());
    assert!(inspector.session().sightings().is_empty());
    assert_eq!(inspector.session().cache().stats(CacheDomain::TypeDescriptor), CacheStats::default());

    // First sighting again, so nothing is cleared.
    inspector.render(&object(0x100), RenderMode::Full).unwrap();
    assert_eq!(inspector.session().cache().stats(CacheDomain::ResolvedAddress).clears, 0);
}

#[test]
fn test_injected_session_is_used()
{
    let session = SessionState::new(1);
    let inspector = Inspector::with_session(record_bridge(), InspectorConfig::default(), session);

    inspector.render(&object(0x100), RenderMode::Full).unwrap();
    assert_eq!(inspector.session().sightings().len(), 1);
}

#[test]
fn test_snapshot_file_round_trip()
{
    let original = record_bridge();
    let json = serde_json::to_string_pretty(original.snapshot()).unwrap();

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();

    let loaded = SnapshotBridge::from_path(file.path()).unwrap();
    assert_eq!(loaded.snapshot(), original.snapshot());

    let inspector = Inspector::new(loaded, InspectorConfig::default());
    assert_eq!(inspector.render(&object(0x100), RenderMode::Full).unwrap(), "x: 42");
}

#[test]
fn test_snapshot_file_errors()
{
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.json");
    assert!(matches!(SnapshotBridge::from_path(&missing), Err(InspectError::Io(_))));

    let broken = dir.path().join("broken.json");
    std::fs::write(&broken, "{ not json").unwrap();
    assert!(matches!(SnapshotBridge::from_path(&broken), Err(InspectError::Snapshot(_))));
}

#[test]
fn test_hand_written_snapshot_document()
{
    let json = r#"{
        "expressions": {
            "*(int32_t *)0x2000": { "signed": 42, "unsigned": 42, "value": "42" }
        },
        "strings": { "4096": "hello" },
        "symbols": [ { "name": "kclass:kotlin.String", "load_address": 65536 } ],
        "settings": { "target.max-children-count": 256 }
    }"#;
    let bridge = SnapshotBridge::from_json(json).unwrap();

    assert_eq!(bridge.read_c_string(Address::new(4096), 3).unwrap(), "hel");
    assert_eq!(bridge.int_setting("target.max-children-count").unwrap(), 256);
    assert_eq!(bridge.evaluate("*(int32_t *)0x2000").unwrap().signed, 42);
    assert_eq!(bridge.module_symbols().unwrap()[0].load_address, Address::new(STRING_CLASS));
}
