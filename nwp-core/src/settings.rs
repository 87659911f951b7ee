use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{NwpError, Result};
use crate::sampler::DEFAULT_TEMPERATURE;
use crate::window::DEFAULT_WINDOW;

/// Application settings shared by every front end.
///
/// Every field has a default, so a settings file only needs the values it
/// overrides.
///
/// # Invariants (checked by [`Settings::validate`])
/// - `temperature` is finite and > 0
/// - `default_window` is > 0
/// - `default_words` is within `1..=max_words`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
	/// JSON model bundle.
	pub model_path: PathBuf,

	/// JSON vocabulary.
	pub vocabulary_path: PathBuf,

	/// Sampling temperature.
	pub temperature: f32,

	/// Window length used when the model declares none.
	pub default_window: usize,

	/// Largest word count a front end accepts.
	pub max_words: usize,

	/// Word count proposed to the user.
	pub default_words: usize,

	/// Prompt proposed to the user.
	pub default_prompt: String,

	/// Server bind address.
	pub host: String,

	/// Server port.
	pub port: u16,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			model_path: PathBuf::from("./data/movie.json"),
			vocabulary_path: PathBuf::from("./data/movie.vocab.json"),
			temperature: DEFAULT_TEMPERATURE,
			default_window: DEFAULT_WINDOW,
			max_words: 20,
			default_words: 8,
			default_prompt: "The movie was".to_owned(),
			host: "127.0.0.1".to_owned(),
			port: 5000,
		}
	}
}

impl Settings {
	/// Loads settings from an optional JSON file.
	///
	/// `None` returns the defaults. The result is validated either way.
	pub fn load<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
		let settings = match path {
			Some(path) => {
				let bytes = std::fs::read(path.as_ref())?;
				let settings: Settings = serde_json::from_slice(&bytes)?;
				log::info!("Loaded settings from {}", path.as_ref().display());
				settings
			}
			None => Settings::default(),
		};
		settings.validate()?;
		Ok(settings)
	}

	/// Checks the invariants.
	///
	/// # Errors
	/// Returns the first violated invariant.
	pub fn validate(&self) -> Result<()> {
		if !self.temperature.is_finite() || self.temperature <= 0.0 {
			return Err(NwpError::InvalidTemperature(self.temperature));
		}
		if self.default_window == 0 {
			return Err(NwpError::InvalidSetting("default_window must be > 0".to_owned()));
		}
		if !(1..=self.max_words).contains(&self.default_words) {
			return Err(NwpError::InvalidSetting(format!(
				"default_words must be between 1 and {}, got {}",
				self.max_words, self.default_words
			)));
		}
		Ok(())
	}
}
