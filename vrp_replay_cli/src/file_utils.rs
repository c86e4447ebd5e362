use std::{
    fs::File,
    io::{BufReader, Write},
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::de::DeserializeOwned;

pub fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;

    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("cannot parse {}", path.display()))
}

/// Writes `content` to `out`, creating parent folders, or to stdout without
/// an output path.
pub fn write_output(out: Option<&PathBuf>, content: &str) -> anyhow::Result<()> {
    match out {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            std::fs::write(path, content)
                .with_context(|| format!("cannot write {}", path.display()))
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{content}")?;
            Ok(())
        }
    }
}
