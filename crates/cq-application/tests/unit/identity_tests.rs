//! Tests for the identity cache

use crate::test_utils::team_record;
use cq_application::{IdentityCache, Team};
use cq_domain::ports::LiveEntity;
use cq_domain::value_objects::EntityId;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[test]
fn test_create_returns_the_same_wrapper() {
    let cache: IdentityCache<Team> = IdentityCache::new("team");
    let id = EntityId::generate();

    let first = cache.create(id);
    let second = cache.create(id);

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_mutation_is_visible_through_every_handle() {
    let cache: IdentityCache<Team> = IdentityCache::new("team");
    let record = team_record(EntityId::generate(), "red");
    let id = record.id;
    let first = cache.create_with(id, |team| team.hydrate(record));

    first.set_color("green").unwrap();

    let second = cache.get(&id).unwrap();
    assert_eq!(second.color().as_deref(), Some("green"));
}

#[test]
fn test_init_runs_only_for_new_wrappers() {
    let cache: IdentityCache<Team> = IdentityCache::new("team");
    let game = EntityId::generate();
    let record = team_record(game, "red");
    let id = record.id;
    let inits = AtomicUsize::new(0);

    let first = cache.create_with(id, |team| {
        inits.fetch_add(1, Ordering::SeqCst);
        team.hydrate(record.clone());
    });
    first.set_color("green").unwrap();
    let second = cache.create_with(id, |team| {
        inits.fetch_add(1, Ordering::SeqCst);
        team.hydrate(record.clone());
    });

    assert_eq!(inits.load(Ordering::SeqCst), 1);
    assert_eq!(second.color().as_deref(), Some("green"));
}

#[test]
fn test_clear_keeps_referenced_wrappers() {
    let cache: IdentityCache<Team> = IdentityCache::new("team");
    let held_id = EntityId::generate();
    let dropped_id = EntityId::generate();
    let held = cache.create(held_id);
    drop(cache.create(dropped_id));

    assert_eq!(cache.clear(false), 1);

    assert!(cache.contains(&held_id));
    assert!(!cache.contains(&dropped_id));
    assert!(Arc::ptr_eq(&held, &cache.create(held_id)));
}

#[test]
fn test_forced_clear_drops_everything() {
    let cache: IdentityCache<Team> = IdentityCache::new("team");
    let id = EntityId::generate();
    let held = cache.create(id);

    assert_eq!(cache.clear(true), 1);
    assert!(cache.is_empty());
    assert!(!Arc::ptr_eq(&held, &cache.create(id)));
}

#[test]
fn test_remove_returns_the_wrapper() {
    let cache: IdentityCache<Team> = IdentityCache::new("team");
    let id = EntityId::generate();
    let created = cache.create(id);

    let removed = cache.remove(&id).unwrap();
    assert!(Arc::ptr_eq(&created, &removed));
    assert!(cache.get(&id).is_none());
    assert!(cache.remove(&id).is_none());
}
