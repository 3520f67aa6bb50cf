use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "vls",
    about = "Embedded video players and clickable timestamps for markdown notes",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Show config location and command outcomes
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Insert a player and citation for a YouTube/Bilibili link
    Insert {
        /// Markdown note to edit (created if missing)
        file: PathBuf,

        /// Insert at the start of this line (1-based; default: end of note)
        #[arg(short, long)]
        line: Option<usize>,

        /// Clipboard contents to take the link from (reads stdin if omitted)
        #[arg(short, long)]
        clipboard: Option<String>,
    },

    /// Turn a line like `1:23 caption` into a clickable timestamp marker
    Stamp {
        /// Markdown note to edit
        file: PathBuf,

        /// Line holding the timestamp text (1-based)
        #[arg(short, long)]
        line: usize,
    },

    /// Click a timestamp marker, seeking the note's player to its offset
    Seek {
        /// Markdown note to edit
        file: PathBuf,

        /// Which marker to click (1-based, in document order)
        marker: usize,
    },

    /// Print a player source rewritten to start at the given offset
    Offset {
        /// Embedded player URL
        src: String,

        /// Offset as seconds or h:mm:ss
        offset: String,
    },
}
