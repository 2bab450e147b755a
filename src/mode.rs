/// The generated play modes. They only differ in how far the playfield may turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum GameMode {
	#[value(name = "360")]
	Generated360Degree,
	#[value(name = "90")]
	Generated90Degree,
}

impl GameMode {
	pub fn serialized_name(self) -> &'static str {
		match self {
			Self::Generated360Degree => "Generated360Degree",
			Self::Generated90Degree => "Generated90Degree",
		}
	}

	pub fn short_name(self) -> &'static str {
		match self {
			Self::Generated360Degree => "GEN360",
			Self::Generated90Degree => "GEN90",
		}
	}
}

impl std::fmt::Display for GameMode {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.serialized_name())
	}
}

/// Which difficulty set of the song the generated one is built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize)]
pub enum SourceCharacteristic {
	#[default]
	Standard,
	OneSaber,
	NoArrows,
}

impl std::fmt::Display for SourceCharacteristic {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		std::fmt::Debug::fmt(self, f)
	}
}
