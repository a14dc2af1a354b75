use anyhow::Context;

use synthflow::AppConfig;
use synthflow::types::{OrderRecord, Side};

fn main() -> anyhow::Result<()> {
    println!("==================================================");
    println!("📊 SynthFlow Sink Analyzer 📊");
    println!("==================================================");

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| AppConfig::load_default().sink.path);

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read sink file {path}"))?;

    let mut records = Vec::new();
    let mut malformed = 0usize;
    for row in content.lines().skip(1) {
        if row.is_empty() {
            continue;
        }
        match OrderRecord::parse_row(row) {
            Some(record) => records.push(record),
            None => malformed += 1,
        }
    }

    println!("File: {path}");
    println!("Rows: {} ({} malformed)", records.len(), malformed);

    if records.is_empty() {
        println!("==================================================");
        return Ok(());
    }

    let bids = records.iter().filter(|r| r.side == Side::Bid).count();
    let asks = records.len() - bids;

    let mut price_min = f64::MAX;
    let mut price_max = f64::MIN;
    let mut quantity_total = 0.0;
    let mut latencies: Vec<u64> = Vec::with_capacity(records.len());
    for record in &records {
        let price: f64 = record.price.parse().unwrap_or(0.0);
        price_min = price_min.min(price);
        price_max = price_max.max(price);
        quantity_total += record.quantity.parse().unwrap_or(0.0);
        latencies.push(record.receive_ts.saturating_sub(record.exchange_ts));
    }

    let mean_latency = latencies.iter().sum::<u64>() as f64 / latencies.len() as f64;
    latencies.sort_unstable();
    let median_latency = if latencies.len() % 2 == 0 {
        (latencies[latencies.len() / 2 - 1] + latencies[latencies.len() / 2]) as f64 / 2.0
    } else {
        latencies[latencies.len() / 2] as f64
    };

    println!("-- 📈 Book:");
    println!("    Bid/Ask: {bids}/{asks}");
    println!("    Price range: {price_min:.8} .. {price_max:.8}");
    println!("    Total quantity: {quantity_total:.8}");
    println!("-- ⏱ Receive latency (µs):");
    println!("    Mean: {mean_latency:.1}");
    println!("    Median: {median_latency:.1}");
    println!("==================================================");

    Ok(())
}
