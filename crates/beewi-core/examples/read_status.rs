//! Example: Reading a Bulb's Status
//!
//! Connects to a bulb, prints its current settings and hardware details,
//! then disconnects.
//!
//! Run with: `cargo run --example read_status -- <DEVICE_ADDRESS>`

use std::env;

use beewi_core::{ConnectionConfig, with_controller};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();
    let Some(identifier) = args.get(1) else {
        eprintln!("Usage: {} <DEVICE_ADDRESS_OR_NAME>", args[0]);
        eprintln!();
        eprintln!("Example:");
        eprintln!("  {} AA:BB:CC:DD:EE:FF", args[0]);
        std::process::exit(1);
    };

    println!("Connecting to {}...", identifier);

    let (state, info) = with_controller(identifier, ConnectionConfig::default(), async |bulb| {
        let state = bulb.settings().await?;
        let info = bulb.hardware_info().await?;
        Ok((state, info))
    })
    .await?;

    println!();
    println!("Settings:");
    println!("{}", state);
    println!();
    println!("Hardware:");
    println!("{}", info);

    Ok(())
}
