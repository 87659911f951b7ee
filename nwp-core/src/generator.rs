use rand::Rng;
use serde::Serialize;

use crate::error::Result;
use crate::model::{DenseModel, SequenceModel};
use crate::predictor::{NextWordPredictor, UNKNOWN_TOKEN};
use crate::sampler::TemperatureSampler;
use crate::settings::Settings;
use crate::vocabulary::Vocabulary;

/// Outcome of one generation request.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct GenerationReport {
	/// Trimmed prompt followed by every appended word.
	pub text: String,
	/// Appended words, in order.
	pub words: Vec<String>,
	/// Whether the unknown sentinel ended generation before `count` words.
	pub stopped_early: bool,
}

/// High-level next-word generator.
///
/// # Responsibilities
/// - Own the model and vocabulary, loaded once and injected at construction
/// - Run the generation loop on top of [`NextWordPredictor`]
///
/// Each call builds its own state; nothing persists between calls.
#[derive(Debug)]
pub struct Generator<M> {
	predictor: NextWordPredictor<M>,
}

impl Generator<DenseModel> {
	/// Loads the bundled model and vocabulary named by `settings`.
	///
	/// # Errors
	/// Returns an error if either file cannot be loaded or a setting is invalid.
	pub fn from_settings(settings: &Settings) -> Result<Self> {
		settings.validate()?;
		let model = DenseModel::load(&settings.model_path)?;
		let vocabulary = Vocabulary::load(&settings.vocabulary_path)?;
		let sampler = TemperatureSampler::new(settings.temperature)?;
		Ok(Self::new(model, vocabulary, sampler, settings.default_window))
	}
}

impl<M: SequenceModel> Generator<M> {
	pub fn new(model: M, vocabulary: Vocabulary, sampler: TemperatureSampler, default_window: usize) -> Self {
		Self { predictor: NextWordPredictor::new(model, vocabulary, sampler, default_window) }
	}

	pub fn predictor(&self) -> &NextWordPredictor<M> {
		&self.predictor
	}

	/// Extends `prompt` by up to `count` sampled words.
	///
	/// - The prompt is trimmed first.
	/// - Generation stops early on [`UNKNOWN_TOKEN`].
	/// - `count <= 0` performs no iteration.
	///
	/// # Errors
	/// Inference errors are fatal and propagated.
	pub fn generate<R: Rng + ?Sized>(&self, prompt: &str, count: i64, rng: &mut R) -> Result<String> {
		Ok(self.generate_report(prompt, count, rng)?.text)
	}

	/// Same as [`generate`](Self::generate) but also reports the appended
	/// words and whether generation stopped early.
	pub fn generate_report<R: Rng + ?Sized>(&self, prompt: &str, count: i64, rng: &mut R) -> Result<GenerationReport> {
		let mut text = prompt.trim().to_owned();
		let count = usize::try_from(count).unwrap_or(0);
		let mut words = Vec::new();
		let mut stopped_early = false;

		for _ in 0..count {
			let word = self.predictor.predict_next(&text, rng)?;
			if word == UNKNOWN_TOKEN {
				stopped_early = true;
				break;
			}
			text.push(' ');
			text.push_str(&word);
			words.push(word);
		}

		log::info!("Generated {} of {count} words", words.len());
		Ok(GenerationReport { text, words, stopped_early })
	}
}
