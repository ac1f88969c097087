pub mod card;

pub use card::{CardLine, ShareCard};

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;

/// Write a rendered card to a file atomically
///
/// The file is never left half-written. The parent directory must exist.
pub fn write_card(path: &Path, contents: &str) -> Result<()> {
    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    file.write_all(contents.as_bytes())
        .context("Failed to write share card")?;
    if !contents.ends_with('\n') {
        file.write_all(b"\n").context("Failed to write share card")?;
    }

    file.commit()
        .with_context(|| format!("Failed to save share card to {}", path.display()))?;

    Ok(())
}
