use std::fs::File;
use std::io::{
    stdout,
    BufWriter,
    Write,
};
use std::path::{
    Path,
    PathBuf,
};

use anyhow::{
    bail,
    Context,
};
use clap::Args;
use log::LevelFilter;

use crate::strings::utils as strings;

#[derive(Args, Debug, Clone)]
pub(crate) struct UtilsArgs {
    #[arg(short, long, action = clap::ArgAction::Count, help = strings::VERBOSE)]
    pub verbose: u8,
}

impl UtilsArgs {
    /// Initializes logging. `RUST_LOG` still overrides the level when set.
    pub fn setup(&self) -> anyhow::Result<()> {
        let level = match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            _ => LevelFilter::Debug,
        };
        let mut builder = pretty_env_logger::formatted_builder();
        builder.filter_level(level);
        if let Ok(filters) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filters);
        }
        builder.try_init()?;
        Ok(())
    }
}

pub(crate) fn validate_input(path: &Path) -> anyhow::Result<&Path> {
    if !path.exists() {
        bail!("Path {} does not exist", path.display())
    }
    if !path.is_file() {
        bail!("Path {} is not a file", path.display())
    }
    Ok(path)
}

pub(crate) fn validate_dir(path: &Path) -> anyhow::Result<&Path> {
    if !path.is_dir() {
        bail!("Path {} is not a directory", path.display())
    }
    Ok(path)
}

/// Opens `path` for writing, or stdout when no path is given.
pub(crate) fn open_output(path: Option<&PathBuf>) -> anyhow::Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            if path.is_dir() {
                bail!("Output path {} is a directory", path.display())
            }
            let file = File::create(path)
                .with_context(|| format!("could not create {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        },
        None => Ok(Box::new(BufWriter::new(stdout().lock()))),
    }
}
