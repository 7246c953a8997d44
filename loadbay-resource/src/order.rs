//! Total ordering over registered resources.
//!
//! Used to rank competitors sharing an entity id and to pick the one that
//! survives. Modules order by symbolic name, then version (higher first),
//! then priority (higher first); when an equal version is a snapshot, the
//! later-registered resource wins. Configs order by composite pid, then
//! priority (higher first). Across kinds, modules always sort after
//! configs — a fixed policy, preserved as-is.

use std::cmp::Ordering;

use loadbay_pack::ModuleManifest;

use crate::pid::ConfigPid;
use crate::resource::{Payload, RegisteredResource};

/// Ranks two resources. A strict total order: antisymmetric, transitive,
/// and equal only when every compared field is equal.
pub fn compare(a: &RegisteredResource, b: &RegisteredResource) -> Ordering {
    match (a.payload(), b.payload()) {
        (Payload::Module { manifest: ma, .. }, Payload::Module { manifest: mb, .. }) => {
            compare_modules(a, ma, b, mb)
        }
        (Payload::Config { pid: pa, .. }, Payload::Config { pid: pb, .. }) => {
            compare_configs(a, pa, b, pb)
        }
        (Payload::Module { .. }, Payload::Config { .. }) => Ordering::Greater,
        (Payload::Config { .. }, Payload::Module { .. }) => Ordering::Less,
    }
}

fn compare_modules(
    a: &RegisteredResource,
    ma: &ModuleManifest,
    b: &RegisteredResource,
    mb: &ModuleManifest,
) -> Ordering {
    ma.symbolic_name()
        .cmp(mb.symbolic_name())
        // Higher version has more priority, must come first.
        .then_with(|| mb.version().cmp(ma.version()))
        // Then by priority, higher values first.
        .then_with(|| b.priority().cmp(&a.priority()))
        // For snapshots, the later-registered resource wins.
        .then_with(|| {
            if ma.version().is_snapshot() || mb.version().is_snapshot() {
                b.serial().cmp(&a.serial())
            } else {
                Ordering::Equal
            }
        })
}

fn compare_configs(
    a: &RegisteredResource,
    pa: &ConfigPid,
    b: &RegisteredResource,
    pb: &ConfigPid,
) -> Ordering {
    pa.composite_pid()
        .cmp(&pb.composite_pid())
        .then_with(|| b.priority().cmp(&a.priority()))
}
