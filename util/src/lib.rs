use log::LevelFilter;
use std::{fs, io, path::Path, path::PathBuf};

/// Arguments shared by every puzzle binary.
#[derive(Debug, clap::Args)]
pub struct Common {
    /// Puzzle input file
    pub input: PathBuf,

    /// Log more (repeat for debug and trace output)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Common {
    pub fn level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    pub fn init_logging(&self) -> Result<(), log::SetLoggerError> {
        init_logging(self.level())
    }

    pub fn read_input(&self) -> io::Result<String> {
        read_input(&self.input)
    }
}

/// Logs go to stderr so stdout only ever carries the answer.
pub fn init_logging(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    env_logger::Builder::new()
        .filter_level(level)
        .target(env_logger::Target::Stderr)
        .format_timestamp(None)
        .try_init()
}

pub fn read_input(path: impl AsRef<Path>) -> io::Result<String> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    log::debug!("Read {} bytes from {}", text.len(), path.display());
    Ok(text)
}

/// Trimmed, non-blank lines paired with their 1-based line number.
pub fn data_lines(s: &str) -> impl Iterator<Item = (usize, &str)> {
    s.lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty())
}
