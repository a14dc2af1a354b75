//! Order stream generator engine.
//!
//! One producer task cycles generate → persist → report → pause until the
//! stop flag is observed at a cycle boundary. The in-flight cycle always
//! completes; cancellation is cooperative only.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use rand::Rng;
use rand::RngExt;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::config::AppConfig;
use crate::error::Result;
use crate::market::MarketState;
use crate::report::{self, RunSummary};
use crate::sink::FileSink;
use crate::types::{OrderRecord, Side};

const LEVEL_OFFSET_MIN: f64 = 0.05;
const LEVEL_OFFSET_MAX: f64 = 0.2;
const QTY_BASE_MIN: f64 = 0.005;
const QTY_BASE_MAX: f64 = 0.03;
const JITTER_MICROS_MIN: u64 = 1;
const JITTER_MICROS_MAX: u64 = 10;

/// Set-once cancellation flag shared between the producer loop and the
/// stop listeners. Written exactly once, polled at cycle boundaries.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

pub struct OrderStreamGenerator {
    market: MarketState,
    sink: FileSink,
    live_preview: bool,
    batch_min: u32,
    batch_max: u32,
    drop_probability: f64,
    pause_min_ms: u64,
    pause_max_ms: u64,
    row_count: u64,
    started: Instant,
}

impl OrderStreamGenerator {
    /// Create or truncate the sink, write the header row, reset counters.
    pub fn initialize(config: &AppConfig) -> Result<Self> {
        let sink = FileSink::create(Path::new(&config.sink.path))?;
        tracing::info!("📁 Sink initialized: {}", config.sink.path);

        Ok(Self {
            market: MarketState::new(config.market.base_price),
            sink,
            live_preview: config.generator.live_preview,
            batch_min: config.generator.batch_min,
            batch_max: config.generator.batch_max,
            drop_probability: config.generator.drop_probability,
            pause_min_ms: config.generator.pause_min_ms,
            pause_max_ms: config.generator.pause_max_ms,
            row_count: 0,
            started: Instant::now(),
        })
    }

    pub fn row_count(&self) -> u64 {
        self.row_count
    }

    pub fn current_price(&self) -> f64 {
        self.market.current_price
    }

    /// Apply one market update and return the new price.
    pub fn advance_market<R: Rng>(&mut self, rng: &mut R) -> f64 {
        self.market.advance(rng)
    }

    /// Produce one batch of orders around the freshly advanced price.
    pub fn generate_batch<R: Rng>(&mut self, rng: &mut R) -> Vec<OrderRecord> {
        self.advance_market(rng);
        let exchange_ts = now_micros();
        let target = rng.random_range(self.batch_min..=self.batch_max) as usize;
        self.build_batch(rng, exchange_ts, target)
    }

    fn build_batch<R: Rng>(&self, rng: &mut R, exchange_ts: u64, target: usize) -> Vec<OrderRecord> {
        let price = self.market.current_price;
        let levels = target / 2 + 1;

        // Mirrored price levels on both sides of the current price.
        let mut candidates: Vec<(Side, f64, f64)> = Vec::with_capacity(levels * 2);
        for i in 1..=levels {
            let bid_price = price - i as f64 * rng.random_range(LEVEL_OFFSET_MIN..LEVEL_OFFSET_MAX);
            let bid_qty = rng.random_range(QTY_BASE_MIN..QTY_BASE_MAX) * (1.0 + rng.random::<f64>());
            candidates.push((Side::Bid, bid_price, bid_qty));

            let ask_price = price + i as f64 * rng.random_range(LEVEL_OFFSET_MIN..LEVEL_OFFSET_MAX);
            let ask_qty = rng.random_range(QTY_BASE_MIN..QTY_BASE_MAX) * (1.0 + rng.random::<f64>());
            candidates.push((Side::Ask, ask_price, ask_qty));
        }

        let mut survivors: Vec<(Side, f64, f64)> = candidates
            .into_iter()
            .filter(|_| rng.random::<f64>() >= self.drop_probability)
            .collect();

        survivors.shuffle(rng);
        survivors.truncate(target);

        let mut records = Vec::with_capacity(survivors.len());
        let mut last_receive = exchange_ts;
        for (i, (side, level_price, qty)) in survivors.into_iter().enumerate() {
            let jitter = rng.random_range(JITTER_MICROS_MIN..=JITTER_MICROS_MAX);
            // Jitter draws can collide across positions; carry the running
            // maximum so arrival stamps never step backwards.
            let receive_ts = (exchange_ts + jitter + i as u64).max(last_receive);
            last_receive = receive_ts;
            records.push(OrderRecord::new(receive_ts, exchange_ts, level_price, qty, side));
        }

        records
    }

    /// Append each record to the sink in emission order.
    pub fn persist_batch(&mut self, records: &[OrderRecord]) -> Result<()> {
        for record in records {
            self.sink.append(record)?;
            self.row_count += 1;
        }
        self.sink.flush()?;
        Ok(())
    }

    /// Emit one overwritten status line for this batch, if enabled.
    pub fn report_progress(&self, batch: &[OrderRecord]) {
        if let Some(line) = self.progress_line(batch) {
            report::print_status_line(&line);
        }
    }

    fn progress_line(&self, batch: &[OrderRecord]) -> Option<String> {
        if !self.live_preview {
            return None;
        }

        let elapsed = self.started.elapsed().as_secs_f64();
        let rate = report::throughput(self.row_count, elapsed);
        Some(report::status_line(self.row_count, rate, batch, self.market.current_price))
    }

    /// Generate, persist and report batches until `stop` is observed.
    pub async fn run(&mut self, stop: &StopSignal) -> Result<()> {
        let mut rng: StdRng = rand::make_rng();

        while !stop.is_set() {
            let batch = self.generate_batch(&mut rng);

            if let Err(err) = self.persist_batch(&batch) {
                // Keep whatever already reached the sink before aborting.
                let _ = self.sink.flush();
                return Err(err);
            }

            self.report_progress(&batch);

            let pause = rng.random_range(self.pause_min_ms..=self.pause_max_ms);
            tokio::time::sleep(Duration::from_millis(pause)).await;
        }

        tracing::info!("🛑 Stop observed, finishing run");
        self.summarize();
        Ok(())
    }

    /// Print the final run summary. Reporting only, no state mutation.
    pub fn summarize(&self) {
        RunSummary {
            total_rows: self.row_count,
            elapsed_secs: self.started.elapsed().as_secs_f64(),
            sink_bytes: self.sink.size_bytes(),
            final_price: self.market.current_price,
            sink_path: self.sink.path().display().to_string(),
        }
        .print();
    }
}

fn now_micros() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before unix epoch")
        .as_micros() as u64
}
