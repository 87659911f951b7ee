use std::path::PathBuf;

use clap::{Parser, Subcommand};
use nwp_core::model::DenseModel;
use nwp_core::patch::fix_model_file;
use nwp_core::{Generator, Settings, TemperatureSampler, Vocabulary};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Next-word generator command line.
#[derive(Parser, Debug)]
#[command(name = "nwp", version, about)]
struct Cli {
    /// Optional JSON settings file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extend a prompt word by word
    Generate {
        /// Model bundle (defaults to the settings)
        #[arg(long)]
        model: Option<PathBuf>,

        /// Vocabulary file (defaults to the settings)
        #[arg(long)]
        vocab: Option<PathBuf>,

        /// Starting text
        #[arg(long)]
        prompt: Option<String>,

        /// Number of words to append; negative values append nothing
        #[arg(long, allow_negative_numbers = true)]
        count: Option<i64>,

        /// Sampling temperature
        #[arg(long)]
        temperature: Option<f32>,

        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Rewrite a legacy model bundle so the loader accepts it
    FixModel {
        /// Bundle to read
        old: PathBuf,
        /// Corrected copy to write
        new: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_ref())?;

    match cli.command {
        Command::Generate { model, vocab, prompt, count, temperature, seed } => {
            // Command line values win over the settings file
            let model = DenseModel::load(model.unwrap_or(settings.model_path))?;
            let vocabulary = Vocabulary::load(vocab.unwrap_or(settings.vocabulary_path))?;
            let sampler = TemperatureSampler::new(temperature.unwrap_or(settings.temperature))?;
            let generator = Generator::new(model, vocabulary, sampler, settings.default_window);

            let prompt = prompt.unwrap_or(settings.default_prompt);
            let count = count.unwrap_or(settings.default_words as i64);
            let text = match seed {
                Some(seed) => generator.generate(&prompt, count, &mut StdRng::seed_from_u64(seed))?,
                None => generator.generate(&prompt, count, &mut rand::rng())?,
            };
            println!("{text}");
        }
        Command::FixModel { old, new } => {
            let patched = fix_model_file(&old, &new)?;
            if patched > 0 {
                println!("Removed batch_shape from {patched} input layer(s)");
            } else {
                println!("No batch_shape found, copy written unchanged");
            }
            println!("Model fixed and saved as {}", new.display());
        }
    }

    Ok(())
}
