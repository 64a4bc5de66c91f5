//! # Chunk Dispatcher
//!
//! Runs chunk generation on a pool of worker threads and routes finished
//! chunks back to a single consumer.
//!
//! ## Guarantees
//!
//! - **One request per coordinate**: a coordinate that is already in flight
//!   is never queued twice.
//! - **Out of order**: results come back in completion order. Each result
//!   carries its coordinate; there are no sequence numbers.
//! - **Advisory cancellation**: cancelling never interrupts a worker. A
//!   cancelled coordinate that has not started yet is skipped; one that has
//!   started is generated and then dropped on arrival.
//!
//! ## Threading
//!
//! ```text
//! consumer --(coord)--> [request queue] --> worker 0..N
//!    ^                                          |
//!    +----------(ChunkResult / Skipped)---------+
//! ```
//!
//! All bookkeeping lives on the consumer side. Workers only share the set
//! of cancelled coordinates, so they can skip work nobody wants anymore.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use aerie_procedural::{
    ChunkCoord, ChunkGenerator, ChunkResult, NoiseField, TerrainConfig, WorldSeed,
};
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use parking_lot::Mutex;

use crate::error::{DispatchError, DispatchResult};

/// Consumer-side state of an outstanding coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RequestState {
    /// The result will be delivered.
    Pending,
    /// The result will be dropped when it arrives.
    Cancelled,
}

/// What a worker sends back for one request.
enum WorkerOutput {
    Generated(ChunkResult),
    Skipped(ChunkCoord),
}

/// Counters updated by worker threads.
#[derive(Debug, Default)]
struct WorkerCounters {
    generated: AtomicU64,
    skipped: AtomicU64,
}

/// Snapshot of dispatcher activity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DispatchStats {
    /// Requests accepted.
    pub requested: u64,
    /// Requests refused because the coordinate was already in flight.
    pub deduplicated: u64,
    /// Chunks handed to the consumer.
    pub delivered: u64,
    /// Chunks generated but dropped because they were cancelled.
    pub discarded: u64,
    /// Chunks generated by workers.
    pub generated: u64,
    /// Requests skipped by workers because they were cancelled first.
    pub skipped: u64,
}

/// Worker pool with in-flight tracking.
///
/// ## Usage
///
/// ```rust
/// use aerie_procedural::{ChunkCoord, TerrainConfig, WorldSeed};
/// use aerie_streaming::ChunkDispatcher;
///
/// let config = TerrainConfig::default().with_chunk_size(17);
/// let mut dispatcher = ChunkDispatcher::new(WorldSeed::new(7.0), config, 2)?;
///
/// assert!(dispatcher.request(ChunkCoord::new(0, 0))?);
/// assert!(!dispatcher.request(ChunkCoord::new(0, 0))?); // already in flight
///
/// let chunks = dispatcher.wait_all();
/// assert_eq!(chunks.len(), 1);
/// # Ok::<(), aerie_streaming::DispatchError>(())
/// ```
pub struct ChunkDispatcher {
    request_tx: Option<Sender<ChunkCoord>>,
    output_rx: Receiver<WorkerOutput>,
    workers: Vec<JoinHandle<()>>,
    in_flight: HashMap<ChunkCoord, RequestState>,
    cancelled: Arc<Mutex<HashSet<ChunkCoord>>>,
    counters: Arc<WorkerCounters>,
    stats: DispatchStats,
}

impl ChunkDispatcher {
    /// Creates a dispatcher over the standard noise field.
    ///
    /// A worker count of zero is raised to one.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Terrain`] for an invalid seed or config, or
    /// [`DispatchError::WorkerSpawn`] if a thread cannot be started.
    pub fn new(seed: WorldSeed, config: TerrainConfig, workers: usize) -> DispatchResult<Self> {
        let generator = ChunkGenerator::new(seed, config)?;
        Self::with_generator(Arc::new(generator), workers)
    }

    /// Creates a dispatcher sharing an existing generator.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::WorkerSpawn`] if a thread cannot be started.
    pub fn with_generator<N: NoiseField + 'static>(
        generator: Arc<ChunkGenerator<N>>,
        workers: usize,
    ) -> DispatchResult<Self> {
        let worker_count = workers.max(1);
        let (request_tx, request_rx) = unbounded::<ChunkCoord>();
        let (output_tx, output_rx) = unbounded::<WorkerOutput>();
        let cancelled = Arc::new(Mutex::new(HashSet::new()));
        let counters = Arc::new(WorkerCounters::default());

        let mut handles = Vec::with_capacity(worker_count);
        for id in 0..worker_count {
            let generator = Arc::clone(&generator);
            let requests = request_rx.clone();
            let outputs = output_tx.clone();
            let cancelled = Arc::clone(&cancelled);
            let counters = Arc::clone(&counters);

            let handle = std::thread::Builder::new()
                .name(format!("chunk-worker-{id}"))
                .spawn(move || {
                    run_worker(id, &generator, &requests, &outputs, &cancelled, &counters);
                })
                .map_err(|e| DispatchError::WorkerSpawn(e.to_string()))?;
            handles.push(handle);
        }

        tracing::info!("Chunk dispatcher started with {} workers", worker_count);

        Ok(Self {
            request_tx: Some(request_tx),
            output_rx,
            workers: handles,
            in_flight: HashMap::new(),
            cancelled,
            counters,
            stats: DispatchStats::default(),
        })
    }

    /// Queues a coordinate for generation.
    ///
    /// Returns `false` if it is already in flight. Requesting a cancelled
    /// coordinate that has not come back yet revives it instead of queueing
    /// a duplicate.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::ShutDown`] after [`ChunkDispatcher::shutdown`].
    pub fn request(&mut self, coord: ChunkCoord) -> DispatchResult<bool> {
        if self.request_tx.is_none() {
            return Err(DispatchError::ShutDown);
        }

        match self.in_flight.get(&coord).copied() {
            Some(RequestState::Pending) => {
                self.stats.deduplicated += 1;
                Ok(false)
            }
            Some(RequestState::Cancelled) => {
                self.cancelled.lock().remove(&coord);
                self.in_flight.insert(coord, RequestState::Pending);
                self.stats.requested += 1;
                Ok(true)
            }
            None => {
                self.submit(coord)?;
                self.in_flight.insert(coord, RequestState::Pending);
                self.stats.requested += 1;
                Ok(true)
            }
        }
    }

    /// Marks an in-flight coordinate as unwanted.
    ///
    /// Returns `true` if the coordinate was pending.
    pub fn cancel(&mut self, coord: ChunkCoord) -> bool {
        match self.in_flight.get_mut(&coord) {
            Some(state) if *state == RequestState::Pending => {
                *state = RequestState::Cancelled;
                self.cancelled.lock().insert(coord);
                true
            }
            _ => false,
        }
    }

    /// True if a result for this coordinate will still be delivered.
    #[inline]
    #[must_use]
    pub fn is_in_flight(&self, coord: ChunkCoord) -> bool {
        self.in_flight.get(&coord) == Some(&RequestState::Pending)
    }

    /// Number of coordinates whose results will still be delivered.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.in_flight
            .values()
            .filter(|&&state| state == RequestState::Pending)
            .count()
    }

    /// Number of worker threads.
    #[inline]
    #[must_use]
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Returns a finished chunk if one is ready, without blocking.
    pub fn try_recv(&mut self) -> Option<ChunkResult> {
        while let Ok(output) = self.output_rx.try_recv() {
            if let Some(chunk) = self.settle(output) {
                return Some(chunk);
            }
        }
        None
    }

    /// Waits up to `timeout` for the next finished chunk.
    ///
    /// A timeout past the end of the clock waits without limit.
    pub fn recv_timeout(&mut self, timeout: Duration) -> Option<ChunkResult> {
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            return self.recv_blocking();
        };
        while !self.in_flight.is_empty() {
            match self.output_rx.recv_deadline(deadline) {
                Ok(output) => {
                    if let Some(chunk) = self.settle(output) {
                        return Some(chunk);
                    }
                }
                Err(RecvTimeoutError::Timeout) => return None,
                Err(RecvTimeoutError::Disconnected) => {
                    self.abandon_in_flight();
                    return None;
                }
            }
        }
        None
    }

    fn recv_blocking(&mut self) -> Option<ChunkResult> {
        while !self.in_flight.is_empty() {
            if let Ok(output) = self.output_rx.recv() {
                if let Some(chunk) = self.settle(output) {
                    return Some(chunk);
                }
            } else {
                self.abandon_in_flight();
                return None;
            }
        }
        None
    }

    /// Returns every chunk that is ready right now.
    pub fn drain(&mut self) -> Vec<ChunkResult> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }

    /// Blocks until nothing is in flight, returning the delivered chunks.
    pub fn wait_all(&mut self) -> Vec<ChunkResult> {
        let mut chunks = Vec::with_capacity(self.pending_count());
        while !self.in_flight.is_empty() {
            if let Ok(output) = self.output_rx.recv() {
                chunks.extend(self.settle(output));
            } else {
                self.abandon_in_flight();
                break;
            }
        }
        chunks
    }

    /// Activity counters so far.
    #[must_use]
    pub fn stats(&self) -> DispatchStats {
        DispatchStats {
            generated: self.counters.generated.load(Ordering::Relaxed),
            skipped: self.counters.skipped.load(Ordering::Relaxed),
            ..self.stats
        }
    }

    /// Stops accepting requests and joins the workers.
    ///
    /// Workers finish whatever is already queued. Those results stay
    /// receivable through [`ChunkDispatcher::drain`].
    pub fn shutdown(&mut self) {
        if self.request_tx.take().is_none() {
            return;
        }

        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                tracing::warn!("Chunk worker panicked before shutdown");
            }
        }

        tracing::info!("Chunk dispatcher shut down");
    }

    fn submit(&self, coord: ChunkCoord) -> DispatchResult<()> {
        let tx = self.request_tx.as_ref().ok_or(DispatchError::ShutDown)?;
        tx.send(coord).map_err(|_| DispatchError::ShutDown)
    }

    /// Applies one worker output to the bookkeeping.
    fn settle(&mut self, output: WorkerOutput) -> Option<ChunkResult> {
        match output {
            WorkerOutput::Generated(chunk) => match self.in_flight.remove(&chunk.coord) {
                Some(RequestState::Pending) => {
                    self.stats.delivered += 1;
                    Some(chunk)
                }
                Some(RequestState::Cancelled) => {
                    self.cancelled.lock().remove(&chunk.coord);
                    self.stats.discarded += 1;
                    tracing::debug!(
                        "Discarded cancelled chunk ({}, {})",
                        chunk.coord.x,
                        chunk.coord.y
                    );
                    None
                }
                None => {
                    tracing::warn!(
                        "Dropping untracked chunk ({}, {})",
                        chunk.coord.x,
                        chunk.coord.y
                    );
                    None
                }
            },
            WorkerOutput::Skipped(coord) => {
                match self.in_flight.get(&coord).copied() {
                    // Revived after the worker already skipped it.
                    Some(RequestState::Pending) => {
                        if self.submit(coord).is_err() {
                            self.in_flight.remove(&coord);
                        }
                    }
                    Some(RequestState::Cancelled) => {
                        self.in_flight.remove(&coord);
                        self.cancelled.lock().remove(&coord);
                    }
                    None => {}
                }
                None
            }
        }
    }

    /// Forgets every outstanding request once no worker can answer.
    fn abandon_in_flight(&mut self) {
        if !self.in_flight.is_empty() {
            tracing::warn!(
                "All chunk workers gone with {} requests outstanding",
                self.in_flight.len()
            );
        }
        self.in_flight.clear();
        self.cancelled.lock().clear();
    }
}

impl Drop for ChunkDispatcher {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for ChunkDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChunkDispatcher")
            .field("workers", &self.workers.len())
            .field("in_flight", &self.in_flight.len())
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

fn run_worker<N: NoiseField>(
    id: usize,
    generator: &ChunkGenerator<N>,
    requests: &Receiver<ChunkCoord>,
    outputs: &Sender<WorkerOutput>,
    cancelled: &Mutex<HashSet<ChunkCoord>>,
    counters: &WorkerCounters,
) {
    tracing::debug!("Chunk worker {} started", id);

    while let Ok(coord) = requests.recv() {
        let output = if cancelled.lock().contains(&coord) {
            counters.skipped.fetch_add(1, Ordering::Relaxed);
            WorkerOutput::Skipped(coord)
        } else {
            let chunk = generator.generate(coord);
            counters.generated.fetch_add(1, Ordering::Relaxed);
            WorkerOutput::Generated(chunk)
        };

        if outputs.send(output).is_err() {
            break;
        }
    }

    tracing::debug!("Chunk worker {} stopped", id);
}
