//! Hardware integration tests for beewi-core
//!
//! These tests require a real bulb and should be run with:
//! ```
//! cargo test --package beewi-core --test hardware_tests -- --ignored --nocapture --test-threads=1
//! ```
//!
//! Configure the bulb via the `BEEWI_DEVICE` environment variable:
//! ```
//! BEEWI_DEVICE="AA:BB:CC:DD:EE:FF" cargo test --package beewi-core --test hardware_tests -- --ignored --nocapture
//! ```
//!
//! The tests change the bulb's settings and restore white mode at the end.

use std::env;
use std::time::Duration;

use beewi_core::scan::{ScanOptions, scan_with_options};
use beewi_core::{BulbController, BulbMode, ConnectionConfig, Rgb, with_controller};
use tokio::time::timeout;

/// Default timeout for BLE operations
const BLE_TIMEOUT: Duration = Duration::from_secs(30);

/// Get the bulb identifier from the environment
fn get_device() -> Option<String> {
    env::var("BEEWI_DEVICE").ok().filter(|s| !s.is_empty())
}

// =============================================================================
// Scan Tests
// =============================================================================

#[tokio::test]
#[ignore = "requires BLE hardware"]
async fn test_scan_discovers_bulbs() {
    let options = ScanOptions::default().duration_secs(10);

    let result = timeout(BLE_TIMEOUT, scan_with_options(options)).await;

    match result {
        Ok(Ok(bulbs)) => {
            println!("Scan discovered {} bulbs:", bulbs.len());
            for bulb in &bulbs {
                println!(
                    "  - {} ({})",
                    bulb.name.as_deref().unwrap_or("Unknown"),
                    bulb.identifier
                );
                assert!(bulb.is_bulb);
            }
        }
        Ok(Err(e)) => panic!("Scan failed: {}", e),
        Err(_) => panic!("Scan timed out"),
    }
}

// =============================================================================
// Control Tests
// =============================================================================

#[tokio::test]
#[ignore = "requires BLE hardware"]
async fn test_connect_read_close() {
    let Some(device) = get_device() else {
        println!("SKIP: No device configured (set BEEWI_DEVICE env var)");
        return;
    };

    let mut bulb = timeout(BLE_TIMEOUT, BulbController::connect(&device))
        .await
        .expect("Connect timeout")
        .expect("Connect failed");

    assert!(bulb.last_state().is_some(), "connect reads the initial status");

    let state = bulb.settings().await.expect("Status read failed");
    println!("{}", state);

    bulb.close().await.expect("Close failed");
}

#[tokio::test]
#[ignore = "requires BLE hardware"]
async fn test_control_round_trip() {
    let Some(device) = get_device() else {
        println!("SKIP: No device configured");
        return;
    };

    let result = timeout(
        Duration::from_secs(60),
        with_controller(&device, ConnectionConfig::default(), async |bulb| {
            bulb.turn_on().await?;

            bulb.set_color(Rgb::new(255, 0, 0)).await?;
            let state = bulb.settings().await?;
            assert_eq!(state.mode, BulbMode::Color);

            bulb.set_brightness(2).await?;
            let state = bulb.settings().await?;
            assert_eq!(state.brightness, Some(2));

            bulb.set_white().await?;
            bulb.set_temperature(5).await?;
            let state = bulb.settings().await?;
            assert_eq!(state.mode, BulbMode::White);
            assert_eq!(state.temperature, Some(5));

            bulb.set_brightness(9).await
        }),
    )
    .await;

    match result {
        Ok(Ok(state)) => println!("Final state:\n{}", state),
        Ok(Err(e)) => panic!("Control sequence failed: {}", e),
        Err(_) => panic!("Control sequence timed out"),
    }
}

#[tokio::test]
#[ignore = "requires BLE hardware"]
async fn test_hardware_info() {
    let Some(device) = get_device() else {
        println!("SKIP: No device configured");
        return;
    };

    let info = timeout(
        BLE_TIMEOUT,
        with_controller(&device, ConnectionConfig::default(), async |bulb| {
            bulb.hardware_info().await
        }),
    )
    .await
    .expect("Hardware info timeout")
    .expect("Hardware info failed");

    println!("{}", info);
    assert_eq!(info.mac_address.len(), 17);
}
