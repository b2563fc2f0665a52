//! Example: Scanning for BeeWi Bulbs
//!
//! Lists every nearby peripheral that looks like a BeeWi SmartLite bulb.
//!
//! Run with: `cargo run --example scan_bulbs`

use beewi_core::scan::{self, ScanOptions};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    println!("Scanning for BeeWi bulbs...");
    println!();

    let options = ScanOptions::default().duration_secs(10);
    let bulbs = scan::scan_with_options(options).await?;

    if bulbs.is_empty() {
        println!("No bulbs found.");
        println!();
        println!("Make sure:");
        println!("  - The bulb is powered");
        println!("  - Bluetooth is enabled on this computer");
        println!("  - No phone app is currently connected to the bulb");
        return Ok(());
    }

    println!("Found {} bulb(s):", bulbs.len());
    println!();
    for bulb in &bulbs {
        let name = bulb.name.as_deref().unwrap_or("Unknown");
        let rssi = bulb
            .rssi
            .map(|r| format!("{} dBm", r))
            .unwrap_or_else(|| "N/A".to_string());

        println!("  {}", name);
        println!("    Identifier: {}", bulb.identifier);
        println!("    RSSI: {}", rssi);
        println!();
    }

    Ok(())
}
