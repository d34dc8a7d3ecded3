//! Available subcommands.

use std::path::PathBuf;

use clap::{ArgGroup, Subcommand};

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Speak one text in the reference voice
    Clone {
        /// Reference recording (WAV)
        #[arg(short, long)]
        reference: PathBuf,

        /// Text to synthesize
        #[arg(short, long)]
        text: String,

        /// Write the result here; parent directories are created
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Speak many texts in the reference voice, writing cloned_{i}.wav
    #[command(group(ArgGroup::new("input").required(true).args(["texts", "texts_file"])))]
    Batch {
        /// Reference recording (WAV)
        #[arg(short, long)]
        reference: PathBuf,

        /// Directory for cloned_0.wav, cloned_1.wav, ...
        #[arg(short, long)]
        output_dir: PathBuf,

        /// File with one text per non-empty line
        #[arg(long, conflicts_with = "texts")]
        texts_file: Option<PathBuf>,

        /// Texts to synthesize, in order
        texts: Vec<String>,
    },

    /// Print the page count of a PDF document
    Pages {
        /// Document to inspect
        file: PathBuf,
    },
}
