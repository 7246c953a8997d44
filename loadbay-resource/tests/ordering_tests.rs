use std::cmp::Ordering;
use std::io::Cursor;

use loadbay_pack::{ModuleManifest, ModuleVersion, PackageBuilder};
use loadbay_resource::{RegisteredResource, ResourceInput, StagingArea, compare};

fn test_area() -> (tempfile::TempDir, StagingArea) {
    let dir = tempfile::tempdir().unwrap();
    let area = StagingArea::open(dir.path().join("staging")).unwrap();
    (dir, area)
}

fn module(area: &StagingArea, name: &str, version: &str, priority: i32) -> RegisteredResource {
    let version: ModuleVersion = version.parse().unwrap();
    let bytes = PackageBuilder::new(ModuleManifest::new(name, version))
        .build()
        .unwrap();
    let input = ResourceInput::from_stream(format!("{name}.jar"), Cursor::new(bytes))
        .with_priority(priority);
    RegisteredResource::create(area, input, "test").unwrap()
}

fn config(area: &StagingArea, id: &str, priority: i32) -> RegisteredResource {
    let input = ResourceInput::from_stream(id.to_string(), Cursor::new(b"a=1\n".to_vec()))
        .with_priority(priority);
    RegisteredResource::create(area, input, "test").unwrap()
}

// ── Modules ─────────────────────────────────────────────────────

#[test]
fn modules_order_by_symbolic_name_first() {
    let (_dir, area) = test_area();
    let alpha = module(&area, "com.example.alpha", "1.0.0", 100);
    let beta = module(&area, "com.example.beta", "9.0.0", 100);

    assert_eq!(compare(&alpha, &beta), Ordering::Less);
    assert_eq!(compare(&beta, &alpha), Ordering::Greater);
}

#[test]
fn higher_version_sorts_first() {
    let (_dir, area) = test_area();
    let old = module(&area, "com.example.foo", "1.0.0", 100);
    let new = module(&area, "com.example.foo", "2.0.0", 100);

    assert_eq!(compare(&new, &old), Ordering::Less);
    assert_eq!(compare(&old, &new), Ordering::Greater);
}

#[test]
fn higher_priority_breaks_version_ties() {
    let (_dir, area) = test_area();
    let low = module(&area, "com.example.foo", "1.0.0", 10);
    let high = module(&area, "com.example.foo", "1.0.0", 20);

    // B (priority 20) sorts first.
    assert_eq!(compare(&high, &low), Ordering::Less);
    assert_eq!(compare(&low, &high), Ordering::Greater);
}

#[test]
fn later_snapshot_wins_full_tie() {
    let (_dir, area) = test_area();
    let earlier = module(&area, "com.example.foo", "1.0.0.SNAPSHOT", 100);
    let later = module(&area, "com.example.foo", "1.0.0.SNAPSHOT", 100);
    assert!(earlier.serial() < later.serial());

    // The later-registered snapshot sorts first.
    assert_eq!(compare(&later, &earlier), Ordering::Less);
    assert_eq!(compare(&earlier, &later), Ordering::Greater);
}

#[test]
fn non_snapshot_full_tie_is_equal() {
    let (_dir, area) = test_area();
    let a = module(&area, "com.example.foo", "1.0.0", 100);
    let b = module(&area, "com.example.foo", "1.0.0", 100);

    // Serials differ, but serials only matter for snapshots.
    assert_eq!(compare(&a, &b), Ordering::Equal);
    assert_eq!(compare(&b, &a), Ordering::Equal);
}

// ── Configs ─────────────────────────────────────────────────────

#[test]
fn configs_order_by_pid_then_priority() {
    let (_dir, area) = test_area();
    let a = config(&area, "net.example.a.cfg", 100);
    let b = config(&area, "net.example.b.cfg", 100);
    assert_eq!(compare(&a, &b), Ordering::Less);

    let low = config(&area, "net.example.c.cfg", 10);
    let high = config(&area, "net.example.c.cfg", 20);
    assert_eq!(compare(&high, &low), Ordering::Less);
}

#[test]
fn configs_with_same_pid_and_priority_are_equal() {
    let (_dir, area) = test_area();
    let a = config(&area, "one/net.example.x.cfg", 100);
    let b = config(&area, "two/net.example.x.properties", 100);

    assert_eq!(a.entity_id(), b.entity_id());
    assert_eq!(compare(&a, &b), Ordering::Equal);
}

// ── Across kinds ────────────────────────────────────────────────

#[test]
fn modules_always_sort_after_configs() {
    let (_dir, area) = test_area();
    // Give the config every advantage; the policy is unconditional.
    let big_config = config(&area, "zzz.example.cfg", 1000);
    let small_module = module(&area, "aaa.example", "0.0.1", 0);

    assert_eq!(compare(&small_module, &big_config), Ordering::Greater);
    assert_eq!(compare(&big_config, &small_module), Ordering::Less);
}

// ── Sorting ─────────────────────────────────────────────────────

#[test]
fn sort_picks_the_effective_resource_first() {
    let (_dir, area) = test_area();
    let mut candidates = vec![
        module(&area, "com.example.foo", "1.0.0", 100),
        module(&area, "com.example.foo", "1.2.0", 100),
        module(&area, "com.example.foo", "1.2.0", 200),
        module(&area, "com.example.foo", "0.9.0", 500),
    ];

    candidates.sort_by(compare);

    // Highest version wins; among equal versions the higher priority.
    assert_eq!(
        candidates[0].attributes()["version"],
        "1.2.0"
    );
    assert_eq!(candidates[0].priority(), 200);
    assert_eq!(candidates[3].attributes()["version"], "0.9.0");
}

#[test]
fn compare_with_self_is_equal() {
    let (_dir, area) = test_area();
    let m = module(&area, "com.example.foo", "1.0.0.SNAPSHOT", 100);
    let c = config(&area, "net.example.a.cfg", 100);

    assert_eq!(compare(&m, &m), Ordering::Equal);
    assert_eq!(compare(&c, &c), Ordering::Equal);
}
