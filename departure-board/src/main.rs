use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use departure_board::board::combine;
use departure_board::config;
use departure_board::render::{BoardRenderer, ConsoleSurface, UiOptions};
use departure_board::sources;

/// Console board geometry: 96 columns by 8 rows of character cells.
const CONSOLE_COLUMNS: u32 = 96;
const CONSOLE_ROWS: u32 = 8;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.yml".to_string());

    match run(&config_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "refresh cycle failed");
            ExitCode::FAILURE
        }
    }
}

/// One refresh cycle: compose config, fetch both boards, combine, draw.
fn run(config_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let (cfg, _remote) = config::load_with_overrides(config_path)?;

    let rtt_client = sources::rtt_client_from(&cfg)?;
    let tube_client = sources::tube_client_from(&cfg)?;

    let rail_rows = sources::national_rail_board(&cfg, &rtt_client)?;
    let tube_rows = sources::tube_board(&cfg, &tube_client)?;
    info!(
        rail = rail_rows.len(),
        tube = tube_rows.len(),
        "fetched board rows"
    );

    let rows = combine(rail_rows, tube_rows, sources::combine_mode(&cfg));

    let ui = UiOptions::from_config(&cfg);
    let mut surface = ConsoleSurface::new(CONSOLE_COLUMNS, CONSOLE_ROWS, ui.line_height.max(1));
    BoardRenderer::new(ui).draw(&mut surface, &rows);

    for line in surface.lines() {
        println!("{line}");
    }

    Ok(())
}
