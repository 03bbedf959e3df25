use clap::Parser;
use once_cell::sync::Lazy;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
/// An interactive field of dots that drift home and shy away from the mouse
pub struct Args {
    /// Initial window size, as width,height
    #[arg(long, default_value = "800,600", value_parser = parse_window_size)]
    pub win: (u32, u32),

    /// Distance between dots in the initial grid.
    #[arg(long, default_value = "40", value_parser = parse_finite)]
    pub spacing: f32,
    /// Radius around the mouse cursor inside which dots are pushed away.
    #[arg(long, default_value = "100", value_parser = parse_finite)]
    pub interaction_radius: f32,
    #[arg(long, default_value = "0.3", value_parser = parse_finite)]
    pub push_gain: f32,
    /// Strength of the spring pulling each dot back to its grid position.
    #[arg(long, default_value = "0.02", value_parser = parse_finite)]
    pub return_gain: f32,
    /// Velocity multiplier applied every frame (1.0 == no friction).
    #[arg(long, default_value = "0.95", value_parser = parse_finite)]
    pub friction: f32,
    /// Maximum distance between two dots that still get a connecting line.
    #[arg(long, default_value = "80", value_parser = parse_finite)]
    pub link_radius: f32,
    #[arg(long, default_value = "0.3", value_parser = parse_finite)]
    pub link_opacity: f32,
    /// Seed for the random initial velocities and radii.
    #[arg(long)]
    pub seed: Option<u64>,
}

pub static ARGS: Lazy<Args> = Lazy::new(Args::parse);

fn parse_window_size(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(',')
        .ok_or_else(|| format!("expected width,height but got '{s}'"))?;
    let w: u32 = w.trim().parse().map_err(|e| format!("bad width '{w}': {e}"))?;
    let h: u32 = h.trim().parse().map_err(|e| format!("bad height '{h}': {e}"))?;
    if w == 0 || h == 0 {
        return Err("window dimensions must be non-zero".into());
    }
    Ok((w, h))
}

/// Accepts only finite numbers.
fn parse_finite(s: &str) -> Result<f32, String> {
    let value: f32 = s.trim().parse().map_err(|e| format!("bad number '{s}': {e}"))?;
    if !value.is_finite() {
        return Err(format!("'{s}' is not a finite number"));
    }
    Ok(value)
}
