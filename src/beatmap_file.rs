//! Reads and writes beatmaps in the generator's own JSON shape

use anyhow::Context as _;
use std::path::Path;

pub fn load(path: &Path) -> anyhow::Result<generator::Beatmap> {
	let contents = std::fs::read_to_string(path)
		.with_context(|| format!("Couldn't read beatmap {}", path.display()))?;
	serde_json::from_str(&contents).with_context(|| format!("Beatmap {} is malformed", path.display()))
}

/// Writes to stdout if no path is given
pub fn save(beatmap: &generator::Beatmap, path: Option<&Path>) -> anyhow::Result<()> {
	match path {
		Some(path) => {
			let file = std::fs::File::create(path)
				.with_context(|| format!("Couldn't create {}", path.display()))?;
			let mut writer = std::io::BufWriter::new(file);
			serde_json::to_writer_pretty(&mut writer, beatmap)?;
			std::io::Write::flush(&mut writer)?;
		}
		None => {
			let stdout = std::io::stdout();
			serde_json::to_writer_pretty(stdout.lock(), beatmap)?;
			println!();
		}
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_save_then_load() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("beatmap.json");

		let beatmap = generator::Beatmap {
			beats_per_minute: 128.0,
			lane_count: 4,
			objects: vec![generator::BeatmapObject::Note(generator::Note::new(
				1.5,
				2,
				generator::CutDirection::DownRight,
				generator::NoteColor::B,
			))],
			events: Vec::new(),
		};
		save(&beatmap, Some(&path)).unwrap();
		assert_eq!(load(&path).unwrap(), beatmap);
	}

	#[test]
	fn test_load_reports_path() {
		let error = load(Path::new("does/not/exist.json")).unwrap_err();
		assert!(error.to_string().contains("exist.json"));
	}
}
