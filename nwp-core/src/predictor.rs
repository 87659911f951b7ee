use rand::Rng;

use crate::error::Result;
use crate::model::SequenceModel;
use crate::sampler::TemperatureSampler;
use crate::vocabulary::Vocabulary;
use crate::window::{fit_window, resolve_window};

/// Reserved word returned when a sampled index has no vocabulary entry.
///
/// Also the generation loop's early-stop signal.
pub const UNKNOWN_TOKEN: &str = "<UNK>";

/// Predicts one next word from a text context.
///
/// # Responsibilities
/// - Tokenize the context and fit it to the model window
/// - Run one inference call
/// - Sample an index and map it back to a word
///
/// The model and vocabulary are owned but never mutated.
#[derive(Debug)]
pub struct NextWordPredictor<M> {
	model: M,
	vocabulary: Vocabulary,
	sampler: TemperatureSampler,
	window: usize,
}

impl<M: SequenceModel> NextWordPredictor<M> {
	/// Creates a predictor.
	///
	/// `default_window` is used when the model declares no (or a zero) window.
	pub fn new(model: M, vocabulary: Vocabulary, sampler: TemperatureSampler, default_window: usize) -> Self {
		let window = resolve_window(model.input_window(), default_window);
		if vocabulary.max_index() >= model.vocab_size() {
			log::warn!(
				"Vocabulary uses index {} but the model only outputs {} values",
				vocabulary.max_index(),
				model.vocab_size()
			);
		}
		Self { model, vocabulary, sampler, window }
	}

	/// Effective input window length.
	pub fn window(&self) -> usize {
		self.window
	}

	pub fn vocabulary(&self) -> &Vocabulary {
		&self.vocabulary
	}

	pub fn sampler(&self) -> &TemperatureSampler {
		&self.sampler
	}

	pub fn model(&self) -> &M {
		&self.model
	}

	/// Tokenizes `context` and fits it to the window.
	pub fn encode(&self, context: &str) -> Vec<usize> {
		fit_window(&self.vocabulary.texts_to_indices(context), self.window)
	}

	/// Predicts the word following `context`.
	///
	/// Returns [`UNKNOWN_TOKEN`] when the sampled index maps to no word.
	///
	/// # Errors
	/// Propagates inference and sampling errors.
	pub fn predict_next<R: Rng + ?Sized>(&self, context: &str, rng: &mut R) -> Result<String> {
		let window = self.encode(context);
		let probabilities = self.model.infer(&window)?;
		let index = self.sampler.sample(&probabilities, rng)?;

		let word = self.vocabulary.index_to_word(index).unwrap_or(UNKNOWN_TOKEN);
		log::debug!("{window:?} -> {index} ({word})");
		Ok(word.to_owned())
	}
}
