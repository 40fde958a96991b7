//! holtek-mouse CLI: command-line configuration for Holtek-chipset mice.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use holtek_mouse_core::buttons::{ButtonLayout, KeyBinding};
use holtek_mouse_core::config::MouseConfig;
use holtek_mouse_core::device::{self, MouseModel};
use holtek_mouse_core::hid::HidFeatureTransport;
use holtek_mouse_core::lighting::EffectRecord;
use holtek_mouse_core::mouse::Mouse;
use holtek_mouse_core::report_rate::{PollInterval, STEP_COUNT};
use holtek_mouse_core::safety;
use std::path::PathBuf;
use tracing::debug;

/// Parse `0x`-prefixed hex or plain decimal.
fn parse_u16(s: &str) -> Result<u16, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("'{s}': {e}"))
}

fn parse_u8(s: &str) -> Result<u8, String> {
    let v = parse_u16(s)?;
    u8::try_from(v).map_err(|_| format!("'{s}' does not fit in a byte"))
}

fn open_mouse(pid: u16) -> Result<Mouse<HidFeatureTransport>> {
    let layout = match MouseModel::from_pid(pid) {
        Some(model) => {
            debug!(model = model.name(), "using model button layout");
            model.button_layout()
        }
        None => {
            debug!(pid = format_args!("0x{pid:04X}"), "unknown model, using generic layout");
            ButtonLayout::generic()
        }
    };
    let transport = HidFeatureTransport::open(pid)
        .with_context(|| format!("open mouse with PID 0x{pid:04X}"))?;
    Ok(Mouse::new(transport, layout))
}

fn warn_before_write() {
    eprintln!("{}", safety::BRICKING_DISCLAIMER);
}

#[derive(Parser)]
#[command(
    name = "holtek-mouse",
    version,
    about = "Open-source Holtek mouse configuration"
)]
struct Cli {
    /// USB product ID of the mouse.
    #[arg(long, global = true, value_parser = parse_u16, default_value = "0xfc6d")]
    pid: u16,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List connected Holtek mice.
    ListDevices,
    /// Show the active profile.
    GetProfile,
    /// Switch the active profile (0-4).
    SetProfile { profile: u8 },
    /// Show the five poll rate steps.
    GetRates,
    /// Set the five poll rate steps (1000, 500, 250 or 125 Hz each).
    SetRates {
        #[arg(num_args = STEP_COUNT, required = true)]
        hz: Vec<u16>,
    },
    /// Show the five scroll speed steps.
    GetScroll,
    /// Set the five scroll speed steps.
    SetScroll {
        #[arg(num_args = STEP_COUNT, required = true, value_parser = parse_u8)]
        speeds: Vec<u8>,
    },
    /// Show the DPI slots of a profile.
    GetDpis { profile: u8 },
    /// Set up to five DPI level codes for a profile; the rest are disabled.
    SetDpis {
        profile: u8,
        #[arg(value_parser = parse_u16)]
        levels: Vec<u16>,
    },
    /// Show the lighting effect of a profile.
    GetEffects { profile: u8 },
    /// Set the lighting effect of a profile.
    SetEffects {
        profile: u8,
        #[arg(value_parser = parse_u8)]
        red: u8,
        #[arg(value_parser = parse_u8)]
        green: u8,
        #[arg(value_parser = parse_u8)]
        blue: u8,
        #[arg(long, default_value = "0", value_parser = parse_u8)]
        mode_low: u8,
        #[arg(long, default_value = "0", value_parser = parse_u8)]
        speed: u8,
        #[arg(long, default_value = "0", value_parser = parse_u8)]
        mode_high: u8,
        #[arg(long, default_value = "7", value_parser = parse_u8)]
        brightness: u8,
    },
    /// Show every button binding of a profile.
    GetKeymap { profile: u8 },
    /// Bind a named button to an action, modifier and key code.
    MapKey {
        profile: u8,
        button: String,
        #[arg(value_parser = parse_u8)]
        action: u8,
        #[arg(value_parser = parse_u8)]
        modifier: u8,
        #[arg(value_parser = parse_u8)]
        key: u8,
    },
    /// Print the full device configuration as JSON.
    Dump,
    /// Apply a JSON configuration file.
    Apply { path: PathBuf },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::ListDevices => {
            let devices = device::discover_devices()?;
            if devices.is_empty() {
                println!("No Holtek mice found.");
                println!("Ensure your mouse is connected and you can access its hidraw node.");
            } else {
                for dev in &devices {
                    println!(
                        "{} (PID: 0x{:04X}, path: {})",
                        dev.model.name(),
                        dev.pid,
                        dev.path
                    );
                    if let Some(serial) = &dev.serial {
                        println!("  serial: {serial}");
                    }
                }
            }
        }
        Commands::GetProfile => {
            let mut mouse = open_mouse(cli.pid)?;
            println!("Active profile: {}", mouse.active_profile()?);
        }
        Commands::SetProfile { profile } => {
            warn_before_write();
            let mut mouse = open_mouse(cli.pid)?;
            mouse.set_active_profile(profile)?;
            println!("Active profile set to {profile}");
        }
        Commands::GetRates => {
            let mut mouse = open_mouse(cli.pid)?;
            for (i, rate) in mouse.poll_rates()?.iter().enumerate() {
                println!("Step {i}: {rate}");
            }
        }
        Commands::SetRates { hz } => {
            let divisors = hz
                .iter()
                .map(|&v| PollInterval::from_hz(v).map(PollInterval::divisor))
                .collect::<holtek_mouse_core::error::Result<Vec<u8>>>()?;
            let rates = safety::validate_poll_divisors(&divisors)?;
            warn_before_write();
            let mut mouse = open_mouse(cli.pid)?;
            mouse.set_poll_rates(&rates)?;
            println!("Poll rates set");
        }
        Commands::GetScroll => {
            let mut mouse = open_mouse(cli.pid)?;
            for (i, speed) in mouse.scroll_speeds()?.iter().enumerate() {
                println!("Step {i}: {speed}");
            }
        }
        Commands::SetScroll { speeds } => {
            let speeds = safety::validate_step_count("scroll_speeds", &speeds)?;
            warn_before_write();
            let mut mouse = open_mouse(cli.pid)?;
            mouse.set_scroll_speeds(&speeds)?;
            println!("Scroll speeds set");
        }
        Commands::GetDpis { profile } => {
            let mut mouse = open_mouse(cli.pid)?;
            for (i, slot) in mouse.dpis(profile)?.slots().iter().enumerate() {
                if slot.enabled {
                    println!("Slot {i}: 0x{:04X}", slot.level);
                } else {
                    println!("Slot {i}: disabled");
                }
            }
        }
        Commands::SetDpis { profile, levels } => {
            safety::validate_dpi_count(levels.len())?;
            warn_before_write();
            let mut mouse = open_mouse(cli.pid)?;
            mouse.set_dpis(profile, &levels)?;
            println!("Profile {profile}: {} DPI levels set", levels.len());
        }
        Commands::GetEffects { profile } => {
            let mut mouse = open_mouse(cli.pid)?;
            let e = mouse.effects(profile)?;
            println!("Profile {profile}:");
            println!("  Color: #{:02X}{:02X}{:02X}", e.red, e.green, e.blue);
            println!("  Mode: 0x{:04X}", e.mode());
            println!("  Speed: {}", e.speed);
            println!("  Brightness: {}", e.brightness);
        }
        Commands::SetEffects {
            profile,
            red,
            green,
            blue,
            mode_low,
            speed,
            mode_high,
            brightness,
        } => {
            let effects = EffectRecord {
                red,
                green,
                blue,
                mode_low,
                speed,
                mode_high,
                brightness,
            };
            warn_before_write();
            let mut mouse = open_mouse(cli.pid)?;
            mouse.set_effects(profile, &effects)?;
            println!("Profile {profile}: effect set");
        }
        Commands::GetKeymap { profile } => {
            let mut mouse = open_mouse(cli.pid)?;
            for (name, binding) in mouse.keymap(profile)? {
                println!("{name}: {binding}");
            }
        }
        Commands::MapKey {
            profile,
            button,
            action,
            modifier,
            key,
        } => {
            let binding = KeyBinding::new(action, modifier, key);
            let mut mouse = open_mouse(cli.pid)?;
            mouse.layout().slot_of(&button)?;
            warn_before_write();
            mouse.map_key(profile, &button, binding)?;
            println!("Profile {profile}: '{button}' bound to {binding}");
        }
        Commands::Dump => {
            let mut mouse = open_mouse(cli.pid)?;
            let snapshot = MouseConfig::snapshot(&mut mouse)?;
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        Commands::Apply { path } => {
            let config = MouseConfig::load(&path)?;
            let mut mouse = open_mouse(cli.pid)?;
            config.validate(mouse.layout())?;
            warn_before_write();
            config.apply(&mut mouse)?;
            println!("Applied {}", path.display());
        }
    }

    Ok(())
}
