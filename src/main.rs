mod beatmap_file;
mod mode;
mod settings;

use clap::Parser;
use std::path::PathBuf;

/// Generates a 360 (or 90) degree version of a beatmap difficulty
#[derive(Parser)]
#[command(name = "beat360fyer", version, about)]
struct Cli {
	/// Beatmap JSON to convert
	input: PathBuf,

	/// Where to write the converted beatmap (default: stdout)
	#[arg(short, long)]
	output: Option<PathBuf>,

	/// Which play mode to generate
	#[arg(long, value_enum, default_value_t = mode::GameMode::Generated360Degree)]
	mode: mode::GameMode,

	/// Settings file
	#[arg(long, default_value = settings::SETTINGS_PATH)]
	config: PathBuf,
}

fn init_logging() {
	if let Err(e) = dotenvy::dotenv() {
		// not having a .env file is fine
		if !e.not_found() {
			eprintln!("Couldn't load .env file: {}", e);
		}
	}

	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

fn main() -> anyhow::Result<()> {
	init_logging();
	let cli = Cli::parse();

	let settings = settings::Settings::load(&cli.config)?;
	if !settings.is_enabled(cli.mode) {
		anyhow::bail!("{} mode is disabled in {}", cli.mode, cli.config.display());
	}

	let mut beatmap = beatmap_file::load(&cli.input)?;
	log::info!(
		"Generating rotation events for {} ({}) from the {} difficulty {}",
		cli.mode,
		cli.mode.short_name(),
		settings.based_on,
		cli.input.display(),
	);

	let config = settings.generator_config(cli.mode);
	let report = generator::generate(&mut beatmap, &config)?;
	log::info!(
		"{} spins, {} walls added, {} walls removed, {} walls split, {} bombs removed, {} notes removed",
		report.spins,
		report.obstacles_synthesized,
		report.obstacles_removed,
		report.obstacles_split,
		report.bombs_removed,
		report.notes_removed,
	);

	beatmap_file::save(&beatmap, cli.output.as_deref())?;
	Ok(())
}
