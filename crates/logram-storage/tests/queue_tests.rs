// SPDX-FileCopyrightText: 2026 Logram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Many producers and consumers sharing one queue file.

use std::collections::HashSet;

use logram_core::PendingQueue;
use logram_storage::{Database, SqliteQueue};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_consumers_never_share_a_payload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("queue.db");

    let producer = SqliteQueue::new(Database::open(&path).await.unwrap(), "shared");
    for i in 0..200 {
        producer.push(&format!("entry-{i}")).await.unwrap();
    }

    // Separate connections stand in for separate processes.
    let mut consumers = Vec::new();
    for _ in 0..4 {
        let queue = SqliteQueue::new(Database::open(&path).await.unwrap(), "shared");
        consumers.push(tokio::spawn(async move {
            let mut seen = Vec::new();
            while let Some(payload) = queue.pop().await.unwrap() {
                seen.push(payload);
            }
            seen
        }));
    }

    let mut all = Vec::new();
    for handle in futures::future::join_all(consumers).await {
        all.extend(handle.unwrap());
    }

    let unique: HashSet<_> = all.iter().collect();
    assert_eq!(all.len(), 200);
    assert_eq!(unique.len(), 200);
    assert_eq!(producer.len().await.unwrap(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_producers_lose_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("queue.db");

    let mut producers = Vec::new();
    for p in 0..4 {
        let queue = SqliteQueue::new(Database::open(&path).await.unwrap(), "shared");
        producers.push(tokio::spawn(async move {
            for i in 0..25 {
                queue.push(&format!("p{p}-{i}")).await.unwrap();
            }
        }));
    }
    for handle in futures::future::join_all(producers).await {
        handle.unwrap();
    }

    let consumer = SqliteQueue::new(Database::open(&path).await.unwrap(), "shared");
    assert_eq!(consumer.len().await.unwrap(), 100);

    // Per-producer order is preserved even though producers interleave.
    let mut last_seen = [-1i32; 4];
    while let Some(payload) = consumer.pop().await.unwrap() {
        let (p, i) = payload[1..].split_once('-').unwrap();
        let (p, i): (usize, i32) = (p.parse().unwrap(), i.parse().unwrap());
        assert!(i > last_seen[p]);
        last_seen[p] = i;
    }
    assert_eq!(last_seen, [24; 4]);
}
