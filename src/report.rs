//! Live progress line and final run summary.

use std::io::Write;

use crate::types::{OrderRecord, Side};

/// Count bids and asks in one batch.
pub fn side_counts(batch: &[OrderRecord]) -> (usize, usize) {
    let bids = batch.iter().filter(|r| r.side == Side::Bid).count();
    (bids, batch.len() - bids)
}

/// Price of the last record on `side`, scanning the batch from its end.
/// Only the current batch is consulted, so a side absent from this batch
/// reports nothing even when an earlier batch carried one.
pub fn last_price(batch: &[OrderRecord], side: Side) -> Option<&str> {
    batch.iter().rev().find(|r| r.side == side).map(|r| r.price.as_str())
}

/// Average rows per second, zero when no time has elapsed yet.
pub fn throughput(rows: u64, elapsed_secs: f64) -> f64 {
    if elapsed_secs > 0.0 {
        rows as f64 / elapsed_secs
    } else {
        0.0
    }
}

/// Render the live status line for one batch.
pub fn status_line(row_count: u64, rate: f64, batch: &[OrderRecord], market_price: f64) -> String {
    let (bids, asks) = side_counts(batch);
    let last_bid = last_price(batch, Side::Bid).unwrap_or("N/A");
    let last_ask = last_price(batch, Side::Ask).unwrap_or("N/A");

    format!(
        "[{}] Rows: {} | Rate: {:.1} rows/s | Bid/Ask: {}/{} | Last: B:{} A:{} | Market: {:.2}",
        chrono::Local::now().format("%H:%M:%S"),
        row_count,
        rate,
        bids,
        asks,
        last_bid,
        last_ask,
        market_price
    )
}

/// Overwrite the current console line with a fresh status line.
pub fn print_status_line(line: &str) {
    print!("\r{line}");
    std::io::stdout().flush().ok();
}

/// Final shutdown report. Pure data; printing never mutates run state.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub total_rows: u64,
    pub elapsed_secs: f64,
    pub sink_bytes: u64,
    pub final_price: f64,
    pub sink_path: String,
}

impl RunSummary {
    pub fn average_rate(&self) -> f64 {
        throughput(self.total_rows, self.elapsed_secs)
    }

    pub fn print(&self) {
        println!();
        println!("==================================================");
        println!("📊 Generation Summary 📊");
        println!("==================================================");
        println!("Total rows:    {}", self.total_rows);
        println!("Elapsed:       {:.1} s", self.elapsed_secs);
        println!("Average rate:  {:.1} rows/s", self.average_rate());
        println!("Sink size:     {:.2} KB", self.sink_bytes as f64 / 1024.0);
        println!("Final price:   {:.2}", self.final_price);
        println!("Sink saved to: {}", self.sink_path);
        println!("==================================================");
    }
}

#[cfg(test)]
mod tests {
    use crate::types::{OrderRecord, Side};

    use super::{RunSummary, last_price, side_counts, status_line, throughput};

    fn batch() -> Vec<OrderRecord> {
        vec![
            OrderRecord::new(11, 10, 68480.10, 0.010, Side::Ask),
            OrderRecord::new(12, 10, 68479.80, 0.020, Side::Bid),
            OrderRecord::new(13, 10, 68480.25, 0.015, Side::Ask),
        ]
    }

    #[test]
    fn counts_both_sides_of_a_batch() {
        assert_eq!(side_counts(&batch()), (1, 2));
        assert_eq!(side_counts(&[]), (0, 0));
    }

    #[test]
    fn last_price_scans_from_the_batch_end() {
        let batch = batch();
        assert_eq!(last_price(&batch, Side::Ask), Some("68480.25000000"));
        assert_eq!(last_price(&batch, Side::Bid), Some("68479.80000000"));
    }

    #[test]
    fn absent_side_reports_no_price() {
        let bids_only = vec![OrderRecord::new(11, 10, 68479.9, 0.01, Side::Bid)];
        assert_eq!(last_price(&bids_only, Side::Ask), None);

        let line = status_line(1, 0.5, &bids_only, 68480.0);
        assert!(line.contains("A:N/A"));
        assert!(line.contains("B:68479.90000000"));
    }

    #[test]
    fn throughput_is_zero_before_time_elapses() {
        assert_eq!(throughput(100, 0.0), 0.0);
        assert_eq!(throughput(100, 4.0), 25.0);
    }

    #[test]
    fn summary_average_rate_uses_total_rows() {
        let summary = RunSummary {
            total_rows: 300,
            elapsed_secs: 60.0,
            sink_bytes: 2048,
            final_price: 68481.5,
            sink_path: "orders.csv".to_string(),
        };
        assert_eq!(summary.average_rate(), 5.0);
    }
}
