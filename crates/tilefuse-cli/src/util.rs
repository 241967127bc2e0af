use std::{
    fs::File,
    io::{self, BufWriter, Write as _},
    path::Path,
};

use anyhow::Context as _;

/// Writes `value` as pretty JSON to `output`, or to stdout when no path is
/// given.
pub fn save_json<T>(value: &T, output: Option<&Path>) -> anyhow::Result<()>
where
    T: serde::Serialize,
{
    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            write_json(&mut writer, value)
                .with_context(|| format!("Failed to write JSON to {}", path.display()))
        }
        None => {
            let mut writer = io::stdout().lock();
            write_json(&mut writer, value).context("Failed to write JSON to stdout")
        }
    }
}

fn write_json<W, T>(writer: &mut W, value: &T) -> anyhow::Result<()>
where
    W: io::Write,
    T: serde::Serialize,
{
    serde_json::to_writer_pretty(&mut *writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
