// Maze collapse display - demo driver

use anyhow::Result;
use chrono::Local;
use log::{error, info};
use std::env;
use std::io::Write;
use std::path::Path;
use std::process;

use maze_display::{ConfigBuilder, DisplayConfig, GridDisplay, WaitOutcome};

const CONFIG_PATH: &str = "display.json";

fn main() -> Result<()> {
    init_logging();

    let config = resolve_config();
    info!(
        "starting {}x{} grid display, {} px/cell",
        config.rows, config.cols, config.cell_size
    );

    let mut display = GridDisplay::from_config(&config);
    display.init()?;
    display.clear()?;
    draw_demo_frame(&mut display)?;
    display.present()?;

    match display.wait_until_closed(config.timeout_secs)? {
        WaitOutcome::ClosedByUser => info!("window closed by user"),
        WaitOutcome::TimedOut => info!("no close request within {} s", config.timeout_secs),
    }
    Ok(())
}

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .init();
}

/// Command-line dimensions win over the config file, which wins over defaults
fn resolve_config() -> DisplayConfig {
    let args: Vec<String> = env::args().collect();
    if args.len() >= 4 {
        match (args[1].parse(), args[2].parse(), args[3].parse()) {
            (Ok(rows), Ok(cols), Ok(cell_size)) => {
                let mut builder = ConfigBuilder::new().grid(rows, cols).cell_size(cell_size);
                if let Some(timeout) = args.get(4).and_then(|t| t.parse().ok()) {
                    builder = builder.timeout_secs(timeout);
                }
                return builder.build();
            }
            _ => {
                println!("Usage:");
                println!("  cargo run                                       # {} or defaults", CONFIG_PATH);
                println!("  cargo run -- <rows> <cols> <cell_size> [timeout_secs]");
                process::exit(1);
            }
        }
    }

    let path = Path::new(CONFIG_PATH);
    if path.exists() {
        match DisplayConfig::load(path) {
            Ok(config) => return config,
            Err(e) => {
                error!("could not load {}: {}", CONFIG_PATH, e);
                process::exit(1);
            }
        }
    }
    DisplayConfig::default()
}

/// Greyscale sweep across the grid, plus one deliberately out-of-range cell
/// in the center that shows up as the red marker
fn draw_demo_frame(display: &mut GridDisplay) -> maze_display::Result<()> {
    let rows = display.rows();
    let cols = display.cols();
    let span = (rows + cols).saturating_sub(2).max(1) as f32;
    for row in 0..rows {
        for col in 0..cols {
            display.draw_cell(row, col, (row + col) as f32 / span)?;
        }
    }
    display.draw_cell(rows / 2, cols / 2, 2.0)?;
    Ok(())
}
