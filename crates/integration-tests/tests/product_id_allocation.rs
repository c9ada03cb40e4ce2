//! Product ID allocator properties.
//!
//! Allocated ids are unique and strictly increasing by 1 from the prior
//! value; the first allocation against an empty counter returns 1.

use std::collections::HashSet;
use std::sync::Arc;

use terry_store_site::db::{MemoryStore, ProductStore};

#[tokio::test]
async fn test_first_allocation_on_empty_counter_returns_one() {
    let store = MemoryStore::new();
    let id = store.allocate_next_id().await.expect("allocation failed");
    assert_eq!(id.as_i32(), 1);
}

#[tokio::test]
async fn test_sequential_allocations_increase_by_one() {
    let store = MemoryStore::new();

    let mut previous = 0;
    for _ in 0..25 {
        let id = store.allocate_next_id().await.expect("allocation failed");
        assert_eq!(id.as_i32(), previous + 1);
        previous = id.as_i32();
    }
}

#[tokio::test]
async fn test_concurrent_allocations_never_collide() {
    let store = Arc::new(MemoryStore::new());

    let mut handles = Vec::new();
    for _ in 0..50 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            store.allocate_next_id().await.expect("allocation failed")
        }));
    }

    let mut seen = HashSet::new();
    for handle in handles {
        let id = handle.await.expect("task panicked");
        assert!(seen.insert(id.as_i32()), "duplicate id {id}");
    }

    // 50 allocations, ids 1..=50, no gaps.
    assert_eq!(seen.len(), 50);
    assert_eq!(seen.iter().min(), Some(&1));
    assert_eq!(seen.iter().max(), Some(&50));
}
