use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{NwpError, Result};
use crate::window::PAD_INDEX;

/// Characters stripped from text before splitting it into words.
pub const DEFAULT_FILTERS: &str = "!\"#$%&()*+,-./:;<=>?@[\\]^_`{|}~\t\n";

/// On-disk form of a [`Vocabulary`].
///
/// Only `word_index` is required; the other fields default to the usual
/// tokenizer conventions.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct VocabularyFile {
	pub word_index: HashMap<String, usize>,
	#[serde(default)]
	pub oov_token: Option<String>,
	#[serde(default = "default_lower")]
	pub lower: bool,
	#[serde(default = "default_filters")]
	pub filters: String,
	#[serde(default = "default_split")]
	pub split: String,
}

fn default_lower() -> bool {
	true
}

fn default_filters() -> String {
	DEFAULT_FILTERS.to_owned()
}

fn default_split() -> String {
	" ".to_owned()
}

/// Word ↔ index mapping used to feed the model and read its output.
///
/// ## Invariants
/// - index 0 is reserved for padding and never maps to a word
/// - immutable after construction
#[derive(Debug, Clone)]
pub struct Vocabulary {
	word_index: HashMap<String, usize>,
	index_word: HashMap<usize, String>,
	oov_index: Option<usize>,
	lower: bool,
	filters: String,
	split: String,
}

impl Vocabulary {
	/// Builds a vocabulary with the default text conventions.
	///
	/// # Errors
	/// Returns an error if a word uses the padding index.
	pub fn new(word_index: HashMap<String, usize>) -> Result<Self> {
		Self::from_file(VocabularyFile {
			word_index,
			oov_token: None,
			lower: default_lower(),
			filters: default_filters(),
			split: default_split(),
		})
	}

	/// Builds a vocabulary from its serialized form.
	///
	/// The reverse mapping is derived here. When two words share an index the
	/// first one in lexical order wins, so lookups stay deterministic.
	///
	/// # Errors
	/// - a word uses the padding index
	/// - `oov_token` is set but missing from `word_index`
	pub fn from_file(file: VocabularyFile) -> Result<Self> {
		if let Some((word, _)) = file.word_index.iter().find(|(_, index)| **index == PAD_INDEX) {
			return Err(NwpError::InvalidSetting(format!("Word '{word}' uses the padding index")));
		}

		let oov_index = match &file.oov_token {
			Some(token) => match file.word_index.get(token) {
				Some(index) => Some(*index),
				None => return Err(NwpError::InvalidSetting(format!("OOV token '{token}' is not in the vocabulary"))),
			},
			None => None,
		};

		let mut words: Vec<(&String, &usize)> = file.word_index.iter().collect();
		words.sort();
		let mut index_word = HashMap::with_capacity(words.len());
		for (word, index) in words {
			index_word.entry(*index).or_insert_with(|| word.clone());
		}

		Ok(Self {
			index_word,
			oov_index,
			word_index: file.word_index,
			lower: file.lower,
			filters: file.filters,
			split: file.split,
		})
	}

	/// Loads a vocabulary from a JSON file.
	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
		let bytes = std::fs::read(path.as_ref())?;
		let file: VocabularyFile = serde_json::from_slice(&bytes)?;
		let vocabulary = Self::from_file(file)?;
		log::info!("Loaded vocabulary of {} words from {}", vocabulary.len(), path.as_ref().display());
		Ok(vocabulary)
	}

	/// Number of distinct words.
	pub fn len(&self) -> usize {
		self.word_index.len()
	}

	pub fn is_empty(&self) -> bool {
		self.word_index.is_empty()
	}

	/// Highest index in use, i.e. the minimum model output size minus one.
	pub fn max_index(&self) -> usize {
		self.word_index.values().copied().max().unwrap_or(PAD_INDEX)
	}

	/// Splits `text` into normalized words.
	///
	/// Filter characters act as separators, the text is lowercased when
	/// configured, and empty pieces are discarded.
	pub fn split_words(&self, text: &str) -> Vec<String> {
		let text = if self.lower { text.to_lowercase() } else { text.to_owned() };
		let cleaned: String = text
			.chars()
			.map(|c| if self.filters.contains(c) { ' ' } else { c })
			.collect();

		// Filter characters were mapped to spaces, so split on both
		let separator = if self.split.is_empty() { " " } else { self.split.as_str() };
		cleaned
			.split(separator)
			.flat_map(|piece| piece.split(' '))
			.filter(|word| !word.is_empty())
			.map(str::to_owned)
			.collect()
	}

	/// Converts `text` into token indices.
	///
	/// Unknown words map to the OOV index when one is configured, otherwise
	/// they are dropped.
	pub fn texts_to_indices(&self, text: &str) -> Vec<usize> {
		self.split_words(text)
			.iter()
			.filter_map(|word| self.word_index.get(word).copied().or(self.oov_index))
			.collect()
	}

	/// Index of a single word, if known.
	pub fn word_to_index(&self, word: &str) -> Option<usize> {
		self.word_index.get(word).copied()
	}

	/// Word for `index`, if any.
	pub fn index_to_word(&self, index: usize) -> Option<&str> {
		self.index_word.get(&index).map(String::as_str)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn movie_vocabulary() -> Vocabulary {
		let word_index = [("the", 1), ("movie", 2), ("was", 3), ("great", 4)]
			.into_iter()
			.map(|(w, i)| (w.to_owned(), i))
			.collect();
		Vocabulary::new(word_index).unwrap()
	}

	#[test]
	fn test_tokenizes_with_filters_and_case() {
		let vocabulary = movie_vocabulary();
		assert_eq!(vocabulary.texts_to_indices("The movie, was GREAT!"), vec![1, 2, 3, 4]);
	}

	#[test]
	fn test_drops_unknown_words() {
		let vocabulary = movie_vocabulary();
		assert_eq!(vocabulary.texts_to_indices("the popcorn was cold"), vec![1, 3]);
		assert!(vocabulary.texts_to_indices("").is_empty());
	}

	#[test]
	fn test_oov_token_replaces_unknown_words() {
		let file = VocabularyFile {
			word_index: [("<OOV>", 1), ("the", 2), ("movie", 3)]
				.into_iter()
				.map(|(w, i)| (w.to_owned(), i))
				.collect(),
			oov_token: Some("<OOV>".to_owned()),
			lower: true,
			filters: String::new(),
			split: " ".to_owned(),
		};
		let vocabulary = Vocabulary::from_file(file).unwrap();
		assert_eq!(vocabulary.texts_to_indices("the film"), vec![2, 1]);
	}

	#[test]
	fn test_reverse_lookup() {
		let vocabulary = movie_vocabulary();
		assert_eq!(vocabulary.index_to_word(2), Some("movie"));
		assert_eq!(vocabulary.index_to_word(0), None);
		assert_eq!(vocabulary.index_to_word(99), None);
		assert_eq!(vocabulary.max_index(), 4);
	}

	#[test]
	fn test_rejects_padding_index() {
		let word_index = [("oops".to_owned(), 0)].into_iter().collect();
		assert!(matches!(Vocabulary::new(word_index), Err(NwpError::InvalidSetting(_))));
	}

	#[test]
	fn test_rejects_missing_oov_token() {
		let file: VocabularyFile = serde_json::from_str(r#"{"word_index": {"a": 1}, "oov_token": "<OOV>"}"#).unwrap();
		assert!(Vocabulary::from_file(file).is_err());
	}

	#[test]
	fn test_file_defaults() {
		let file: VocabularyFile = serde_json::from_str(r#"{"word_index": {"hello": 1}}"#).unwrap();
		assert!(file.lower);
		assert_eq!(file.filters, DEFAULT_FILTERS);
		assert_eq!(file.split, " ");
		assert!(file.oov_token.is_none());
	}
}
