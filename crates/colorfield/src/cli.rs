use std::time::Duration;

use clap::{Parser, Subcommand};
use renderer::{Antialiasing, Background};

#[derive(Parser, Debug)]
#[command(
    name = "colorfield",
    author,
    version,
    about = "Animated grain wallpaper with drag-to-pick background color",
    arg_required_else_help = false
)]
pub struct Cli {
    #[command(flatten)]
    pub run: RunArgs,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Background variant: `grain` (theme-colored noise) or `marble`.
    #[arg(
        long,
        value_name = "VARIANT",
        value_parser = parse_background,
        default_value = "grain"
    )]
    pub background: Background,

    /// Window size (e.g. `1280x800`).
    #[arg(long, value_name = "WIDTHxHEIGHT")]
    pub size: Option<String>,

    /// Optional FPS cap (0 = render every presented frame).
    #[arg(long, value_name = "FPS")]
    pub fps: Option<f32>,

    /// Anti-aliasing policy: `auto`, `off`, or an explicit MSAA sample count (e.g. `4`).
    #[arg(
        long,
        value_name = "MODE",
        value_parser = parse_antialias,
        default_value = "auto"
    )]
    pub antialias: Antialiasing,

    /// Sphere rows for the marble background.
    #[arg(long, value_name = "COUNT", default_value_t = 4)]
    pub rows: u32,

    /// Sphere columns for the marble background.
    #[arg(long, value_name = "COUNT", default_value_t = 8)]
    pub cols: u32,

    /// Fade-in gating the first paint (e.g. `300ms`).
    #[arg(
        long,
        value_name = "DURATION",
        value_parser = humantime::parse_duration,
        default_value = "300ms"
    )]
    pub reveal: Duration,

    /// Start from the default color, ignoring any saved state.
    #[arg(long)]
    pub fresh: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Inspect or clear the persisted color state.
    State(StateCommand),
}

#[derive(Parser, Debug)]
pub struct StateCommand {
    #[command(subcommand)]
    pub action: StateAction,
}

#[derive(Subcommand, Debug)]
pub enum StateAction {
    /// Print the resolved state file path.
    Where,
    /// Delete the saved color so the next launch uses the defaults.
    Reset,
}

pub fn parse() -> Cli {
    Cli::parse()
}

pub fn parse_background(value: &str) -> Result<Background, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "grain" => Ok(Background::Grain),
        "marble" => Ok(Background::Marble),
        other => Err(format!(
            "unknown background '{other}', expected `grain` or `marble`"
        )),
    }
}

pub fn parse_antialias(value: &str) -> Result<Antialiasing, String> {
    let normalized = value.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "" => Err("anti-alias mode must not be empty".to_string()),
        "auto" | "max" | "default" => Ok(Antialiasing::Auto),
        "off" | "none" | "disable" | "disabled" | "0" | "1" => Ok(Antialiasing::Off),
        _ => normalized
            .parse::<u32>()
            .map_err(|_| format!("invalid anti-alias mode '{value}'"))
            .and_then(|samples| {
                if samples.is_power_of_two() && samples <= 16 {
                    Ok(Antialiasing::Samples(samples))
                } else {
                    Err(format!(
                        "unsupported MSAA sample count {samples}; expected a power of two up to 16"
                    ))
                }
            }),
    }
}

pub fn parse_surface_size(value: &str) -> Result<(u32, u32), String> {
    let mut parts = value.trim().splitn(2, ['x', 'X']);
    let width = parts.next().and_then(|raw| raw.trim().parse::<u32>().ok());
    let height = parts.next().and_then(|raw| raw.trim().parse::<u32>().ok());
    match (width, height) {
        (Some(width), Some(height)) if width > 0 && height > 0 => Ok((width, height)),
        _ => Err(format!("invalid size '{value}', expected WIDTHxHEIGHT")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn background_parses_known_variants() {
        assert_eq!(parse_background("grain"), Ok(Background::Grain));
        assert_eq!(parse_background(" Marble "), Ok(Background::Marble));
        assert!(parse_background("plasma").is_err());
    }

    #[test]
    fn antialias_accepts_modes_and_sample_counts() {
        assert_eq!(parse_antialias("auto"), Ok(Antialiasing::Auto));
        assert_eq!(parse_antialias("off"), Ok(Antialiasing::Off));
        assert_eq!(parse_antialias("4"), Ok(Antialiasing::Samples(4)));
        assert!(parse_antialias("3").is_err());
        assert!(parse_antialias("32").is_err());
        assert!(parse_antialias("").is_err());
    }

    #[test]
    fn surface_size_parses_and_rejects() {
        assert_eq!(parse_surface_size("1280x800"), Ok((1280, 800)));
        assert_eq!(parse_surface_size("1920X1080"), Ok((1920, 1080)));
        assert!(parse_surface_size("0x100").is_err());
        assert!(parse_surface_size("1280").is_err());
        assert!(parse_surface_size("wide x tall").is_err());
    }
}
