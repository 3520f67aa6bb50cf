use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use eyre::{Result, bail};
use log::{debug, info};

use vls::commands::{CommandId, Commands};
use vls::config::Config;
use vls::host::{LogNotifier, NoMetadata, Notifier, Position, RecordingNotifier, StaticClipboard, TextBuffer};
use vls::meta::MetaClient;
use vls::render::RenderedNote;

mod cli;

use cli::{Cli, Command};

fn setup_logging() -> Result<()> {
    let log_dir = log_dir();
    std::fs::create_dir_all(&log_dir)?;
    let log_file = log_dir.join("vls.log");

    let target = Box::new(std::fs::OpenOptions::new().create(true).append(true).open(&log_file)?);

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized: {}", log_file.display());
    Ok(())
}

fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("vls")
        .join("logs")
}

fn build_after_help() -> String {
    format!(
        "\nConfig is read from: {}\nLogs are written to: {}",
        vls::config::config_path().display(),
        log_dir().join("vls.log").display()
    )
}

fn read_note(path: &Path) -> Result<String> {
    if path.exists() {
        Ok(std::fs::read_to_string(path)?)
    } else {
        debug!("{} does not exist, starting an empty note", path.display());
        Ok(String::new())
    }
}

fn read_stdin() -> Result<String> {
    let mut text = String::new();
    io::stdin().lock().read_to_string(&mut text)?;
    Ok(text)
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    setup_logging()?;

    let after_help = build_after_help();
    let cmd = <Cli as clap::CommandFactory>::command().after_help(after_help);
    let matches = cmd.get_matches();
    let cli = <Cli as clap::FromArgMatches>::from_arg_matches(&matches)?;

    // Load config file (non-fatal if missing/invalid)
    let config = Config::load().unwrap_or_default();

    if cli.verbose {
        let config_path = vls::config::config_path();
        if config_path.exists() {
            eprintln!("Config: {}", config_path.display());
        }
    }

    match cli.command {
        Command::Insert { file, line, clipboard } => {
            let clipboard = match clipboard {
                Some(text) => text,
                None => read_stdin()?,
            };
            let meta = MetaClient::from_config(reqwest::Client::new(), &config);
            let commands = Commands::new(StaticClipboard::new(clipboard), meta, LogNotifier);

            let mut buf = TextBuffer::new(read_note(&file)?);
            let cursor = match line {
                Some(n) => Position::new(n.saturating_sub(1), 0),
                None => buf.end(),
            };
            buf.set_cursor(cursor);

            match commands.run(CommandId::InsertFromClipboard, Some(&mut buf)).await {
                Ok(outcome) => {
                    std::fs::write(&file, buf.text())?;
                    if cli.verbose {
                        eprintln!("{outcome:?}\nWritten to: {}", file.display());
                    }
                }
                Err(_) => return Ok(ExitCode::FAILURE),
            }
        }
        Command::Stamp { file, line } => {
            let commands = Commands::new(StaticClipboard::empty(), NoMetadata, LogNotifier);

            let mut buf = TextBuffer::new(std::fs::read_to_string(&file)?);
            if line == 0 || line > buf.line_count() {
                bail!("line {line} is out of range for {} ({} lines)", file.display(), buf.line_count());
            }
            buf.select_line(line - 1);

            match commands.run(CommandId::SelectionToTimestamp, Some(&mut buf)).await {
                Ok(outcome) => {
                    std::fs::write(&file, buf.text())?;
                    if cli.verbose {
                        eprintln!("{outcome}\nWritten to: {}", file.display());
                    }
                }
                Err(_) => return Ok(ExitCode::FAILURE),
            }
        }
        Command::Seek { file, marker } => {
            let text = std::fs::read_to_string(&file)?;
            let mut rendered = RenderedNote::render(&text);
            let count = rendered.markers().len();
            if marker == 0 || marker > count {
                bail!("no timestamp marker #{marker} in {} ({count} found)", file.display());
            }

            let before = rendered.player_sources();
            let notices = RecordingNotifier::default();
            rendered.click_marker(marker - 1, &notices);
            if !notices.messages().is_empty() {
                for message in notices.messages() {
                    LogNotifier.notify(&message);
                }
                return Ok(ExitCode::FAILURE);
            }
            let after = rendered.player_sources();
            if before == after {
                if cli.verbose {
                    eprintln!("Player source unchanged");
                }
                return Ok(ExitCode::SUCCESS);
            }

            std::fs::write(&file, rendered.write_back(&text))?;
            if cli.verbose {
                for src in &after {
                    eprintln!("Player: {src}");
                }
            }
        }
        Command::Offset { src, offset } => {
            let Some(seconds) = vls::timestamp::parse(&offset) else {
                bail!("invalid offset: {offset}\n\nExpected seconds, m:ss or h:mm:ss");
            };
            println!("{}", vls::embed::with_start_offset(&src, seconds));
        }
    }

    Ok(ExitCode::SUCCESS)
}
