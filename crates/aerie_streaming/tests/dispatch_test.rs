//! # Dispatch Integration Tests
//!
//! Worker-pool output must match serial generation exactly, whatever order
//! the chunks finish in, and cancelled chunks must never reach the consumer.

use std::collections::HashMap;
use std::time::Duration;

use aerie_procedural::{ChunkCoord, ChunkGenerator, ChunkResult, TerrainConfig, WorldSeed};
use aerie_streaming::{ChunkDispatcher, DispatchError};

fn config() -> TerrainConfig {
    TerrainConfig::default().with_chunk_size(25)
}

fn square(radius: i32) -> Vec<ChunkCoord> {
    let mut coords = Vec::new();
    for y in -radius..=radius {
        for x in -radius..=radius {
            coords.push(ChunkCoord::new(x, y));
        }
    }
    coords
}

/// Test: Parallel results equal serial results, keyed by coordinate.
#[test]
fn test_parallel_matches_serial() {
    let seed = WorldSeed::new(2024.0);
    let serial = ChunkGenerator::new(seed, config()).unwrap();
    let mut dispatcher = ChunkDispatcher::new(seed, config(), 4).unwrap();

    let coords = square(2);
    for &coord in &coords {
        assert!(dispatcher.request(coord).unwrap());
    }

    let results: HashMap<ChunkCoord, ChunkResult> = dispatcher
        .wait_all()
        .into_iter()
        .map(|chunk| (chunk.coord, chunk))
        .collect();

    assert_eq!(results.len(), coords.len());
    for coord in coords {
        assert_eq!(results[&coord], serial.generate(coord), "chunk {coord:?}");
    }
    assert_eq!(dispatcher.pending_count(), 0);
}

/// Test: Cancelled coordinates are never delivered.
#[test]
fn test_cancelled_results_dropped() {
    let mut dispatcher = ChunkDispatcher::new(WorldSeed::new(11.0), config(), 1).unwrap();

    let coords = square(2);
    for &coord in &coords {
        dispatcher.request(coord).unwrap();
    }
    let cancelled: Vec<ChunkCoord> = coords.iter().copied().filter(|c| c.x < 0).collect();
    for &coord in &cancelled {
        assert!(dispatcher.cancel(coord));
        assert!(!dispatcher.cancel(coord));
        assert!(!dispatcher.is_in_flight(coord));
    }

    let delivered = dispatcher.wait_all();
    assert_eq!(delivered.len(), coords.len() - cancelled.len());
    assert!(delivered.iter().all(|chunk| chunk.coord.x >= 0));

    let stats = dispatcher.stats();
    assert_eq!(stats.discarded + stats.skipped, cancelled.len() as u64);
    assert_eq!(stats.delivered, delivered.len() as u64);
}

/// Test: Re-requesting a cancelled coordinate delivers it exactly once.
#[test]
fn test_rerequest_after_cancel() {
    let mut dispatcher = ChunkDispatcher::new(WorldSeed::new(5.0), config(), 2).unwrap();
    let coord = ChunkCoord::new(3, -3);

    assert!(dispatcher.request(coord).unwrap());
    assert!(dispatcher.cancel(coord));
    assert!(dispatcher.request(coord).unwrap());
    assert!(!dispatcher.request(coord).unwrap());

    let delivered = dispatcher.wait_all();
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].coord, coord);
}

/// Test: Polling eventually yields every requested chunk.
#[test]
fn test_polling_collects_everything() {
    let mut dispatcher = ChunkDispatcher::new(WorldSeed::new(8.0), config(), 3).unwrap();
    for coord in square(1) {
        dispatcher.request(coord).unwrap();
    }

    let mut received = Vec::new();
    while dispatcher.pending_count() > 0 {
        if let Some(chunk) = dispatcher.recv_timeout(Duration::from_secs(30)) {
            received.push(chunk.coord);
        }
        received.extend(dispatcher.drain().into_iter().map(|chunk| chunk.coord));
    }

    received.sort();
    let mut expected = square(1);
    expected.sort();
    assert_eq!(received, expected);
    assert!(dispatcher.try_recv().is_none());
}

/// Test: An unbounded wait blocks until the chunk arrives.
#[test]
fn test_recv_timeout_accepts_unbounded_wait() {
    let mut dispatcher = ChunkDispatcher::new(WorldSeed::new(3.0), config(), 1).unwrap();
    dispatcher.request(ChunkCoord::new(4, -4)).unwrap();

    let chunk = dispatcher.recv_timeout(Duration::MAX).unwrap();
    assert_eq!(chunk.coord, ChunkCoord::new(4, -4));
    assert_eq!(dispatcher.pending_count(), 0);

    // Nothing in flight: returns at once instead of blocking forever.
    assert!(dispatcher.recv_timeout(Duration::MAX).is_none());
}

/// Test: Queued work still completes across shutdown.
#[test]
fn test_shutdown_finishes_queue() {
    let mut dispatcher = ChunkDispatcher::new(WorldSeed::new(1.0), config(), 2).unwrap();
    for coord in square(1) {
        dispatcher.request(coord).unwrap();
    }

    dispatcher.shutdown();
    assert!(matches!(
        dispatcher.request(ChunkCoord::new(50, 50)),
        Err(DispatchError::ShutDown)
    ));

    assert_eq!(dispatcher.wait_all().len(), 9);
    assert_eq!(dispatcher.stats().generated, 9);
}
