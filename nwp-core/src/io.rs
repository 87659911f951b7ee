use std::path::{Path, PathBuf};
use std::{fs, io};

/// Suffix shared by vocabulary files, e.g. `movie.vocab.json`.
pub const VOCABULARY_SUFFIX: &str = ".vocab.json";

/// Builds an output path based on an input path and a new extension.
///
/// Example:
/// `data/movie.json` + `"bin"` → `data/movie.bin`
pub(crate) fn build_output_path<P: AsRef<Path>>(
	input_path: P,
	output_extension: &str,
) -> io::Result<PathBuf> {
	let input_path = input_path.as_ref();

	let parent = input_path.parent().unwrap_or_else(|| Path::new("."));
	let file_stem = input_path
		.file_stem()
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Input path has no filename"))?;

	let mut output = PathBuf::from(parent);
	output.push(file_stem);
	output.set_extension(output_extension);

	Ok(output)
}

/// Lists the model bundles of a directory by name.
///
/// A bundle is any `.json` file that is not a vocabulary; names are returned
/// without extension and sorted.
pub fn list_models<P: AsRef<Path>>(dir: P) -> io::Result<Vec<String>> {
	let mut models = Vec::new();

	for entry in fs::read_dir(dir)? {
		let path = entry?.path();
		if !path.is_file() || path.extension() != Some(std::ffi::OsStr::new("json")) {
			continue;
		}
		let Some(name) = path.file_name().map(|n| n.to_string_lossy().to_string()) else {
			continue;
		};
		if name.ends_with(VOCABULARY_SUFFIX) {
			continue;
		}
		models.push(name.trim_end_matches(".json").to_owned());
	}

	models.sort();
	Ok(models)
}
