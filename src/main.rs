mod cli;

use adif_mapper::csv_out::{self, OutputFormat};
use adif_mapper::filter::FilterConfig;
use adif_mapper::{HomeLocation, LoadedLog};
use anyhow::Context;
use chrono_tz::Tz;
use env_logger::Env;
use log::{info, warn};

fn setup_logging(level: &str) {
    let env = Env::default().filter_or("RUST_LOG", match level {
        "essential" => "info",
        "debug" => "debug",
        "trace" => "trace",
        "warn" => "warn",
        "error" => "error",
        _ => "info",
    });
    env_logger::Builder::from_env(env).init();
}

fn parse_tz(args_tz: &Option<String>) -> Option<Tz> {
    let tzname = args_tz.as_ref()?;
    match tzname.parse::<Tz>() {
        Ok(tz) => Some(tz),
        Err(_) => {
            warn!("Timezone parse failed; falling back to UTC");
            None
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = cli::parse_cli();
    setup_logging(&args.log_level);

    let format: OutputFormat = args.format.parse()?;
    let tz = parse_tz(&args.tz);
    let filter = FilterConfig::new(&args.bands, &args.modes, args.call.as_deref())?;

    let home = match args.home.as_deref() {
        Some(grid) => match HomeLocation::from_locator(grid) {
            Ok(h) => {
                info!("Home: {}", h.describe());
                Some(h)
            }
            Err(e) => {
                warn!("Invalid Grid: {}; distances and bearings omitted", e);
                None
            }
        },
        None => None,
    };

    info!("Reading file {}", args.input_file.display());
    let log = LoadedLog::from_path(&args.input_file)
        .with_context(|| format!("Error reading ADIF file {}", args.input_file.display()))?;
    info!("bands: {}", log.band_options().join(", "));
    info!("modes: {}", log.mode_options().join(", "));

    let view = log.map_view(&filter, home.as_ref());
    info!(
        "{} QSOs, {} stations, {} mapped, {} grid cells",
        view.total_count,
        log.aggregates.len(),
        view.mapped_count(),
        view.overlays.len()
    );

    let out_path = args
        .out
        .clone()
        .unwrap_or_else(|| args.input_file.with_extension(format.extension()));
    csv_out::write_contacts(&view.contacts, &out_path, format, tz)
        .with_context(|| format!("writing {}", out_path.display()))?;

    info!("Done.");
    Ok(())
}
