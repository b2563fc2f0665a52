//! Bulb control commands: power, brightness, temperature, white, colour, sequence.

use std::fmt;
use std::time::Duration;

use anyhow::{Context, Result};
use beewi_core::{BulbController, BulbState, BulbTransport, Rgb, run_scoped};

use crate::cli::OutputFormat;
use crate::format::{FormatOptions, format_state_json, format_state_text};
use crate::style;
use crate::util::connect_bulb;

/// A single state change requested on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    On,
    Off,
    Brightness(u8),
    Temperature(u8),
    White,
    Color(Rgb),
    Sequence(u8),
}

impl Action {
    /// Send the action through a controller, returning the resulting state.
    pub async fn apply<T: BulbTransport>(
        self,
        bulb: &mut BulbController<T>,
    ) -> beewi_core::Result<BulbState> {
        match self {
            Action::On => bulb.turn_on().await,
            Action::Off => bulb.turn_off().await,
            Action::Brightness(level) => bulb.set_brightness(level).await,
            Action::Temperature(level) => bulb.set_temperature(level).await,
            Action::White => bulb.set_white().await,
            Action::Color(rgb) => bulb.set_color(rgb).await,
            Action::Sequence(index) => bulb.set_color_sequence(index).await,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::On => write!(f, "Bulb turned on"),
            Action::Off => write!(f, "Bulb turned off"),
            Action::Brightness(level) => write!(f, "Brightness set to {}", level),
            Action::Temperature(level) => write!(f, "Temperature set to {}", level),
            Action::White => write!(f, "White mode selected"),
            Action::Color(rgb) => write!(f, "Colour set to {}", rgb),
            Action::Sequence(index) => write!(f, "Colour sequence {} started", index),
        }
    }
}

pub async fn cmd_control(
    identifier: &str,
    timeout: Duration,
    action: Action,
    format: OutputFormat,
    quiet: bool,
    opts: &FormatOptions,
) -> Result<()> {
    let show_progress = !quiet && format == OutputFormat::Text;
    let bulb = connect_bulb(identifier, timeout, show_progress).await?;

    let state = run_scoped(bulb, async |bulb| action.apply(bulb).await)
        .await
        .with_context(|| format!("Failed to apply '{}'", action_name(action)))?;

    match format {
        OutputFormat::Json => print!("{}", format_state_json(&state, opts)?),
        OutputFormat::Text if !quiet => {
            println!("{}", style::format_success(&action.to_string(), opts.no_color));
            if matches!(action, Action::Temperature(_)) && !state.is_white() {
                eprintln!("Note: the bulb is in colour mode; temperature applies once it is white.");
            }
            print!("{}", format_state_text(&state, opts));
        }
        OutputFormat::Text => {}
    }
    Ok(())
}

fn action_name(action: Action) -> &'static str {
    match action {
        Action::On => "on",
        Action::Off => "off",
        Action::Brightness(_) => "brightness",
        Action::Temperature(_) => "temperature",
        Action::White => "white",
        Action::Color(_) => "color",
        Action::Sequence(_) => "sequence",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beewi_core::{BulbMode, MockBulbBuilder};

    #[tokio::test]
    async fn test_actions_drive_mock_bulb() {
        let mock = MockBulbBuilder::new().build();
        let mut bulb = BulbController::new(mock).await.unwrap();

        let state = Action::Color(Rgb::new(0, 0, 255)).apply(&mut bulb).await.unwrap();
        assert_eq!(state.mode, BulbMode::Color);

        let state = Action::Off.apply(&mut bulb).await.unwrap();
        assert!(!state.is_on());

        let state = Action::Brightness(4).apply(&mut bulb).await.unwrap();
        assert_eq!(state.brightness, Some(4));

        assert_eq!(bulb.transport().write_count().await, 3);
    }

    #[tokio::test]
    async fn test_white_action_skips_write_when_white() {
        let mock = MockBulbBuilder::new().white(5).build();
        let mut bulb = BulbController::new(mock).await.unwrap();

        Action::White.apply(&mut bulb).await.unwrap();
        assert_eq!(bulb.transport().write_count().await, 0);
    }

    #[tokio::test]
    async fn test_out_of_range_action_writes_nothing() {
        let mock = MockBulbBuilder::new().build();
        let mut bulb = BulbController::new(mock).await.unwrap();

        assert!(Action::Sequence(7).apply(&mut bulb).await.is_err());
        assert_eq!(bulb.transport().write_count().await, 0);
    }

    #[test]
    fn test_action_messages() {
        assert_eq!(Action::Brightness(3).to_string(), "Brightness set to 3");
        assert_eq!(
            Action::Color(Rgb::new(1, 2, 3)).to_string(),
            "Colour set to 1 2 3"
        );
        assert_eq!(action_name(Action::Sequence(2)), "sequence");
    }
}
