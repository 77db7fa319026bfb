//! `flakeid next` command.

use crate::ports::IdGenerator;

/// Execute the `next` command.
///
/// # Errors
///
/// Returns an error string if the clock moved backwards.
pub fn run(generator: &dyn IdGenerator, extension: Option<&str>) -> Result<(), String> {
    println!("{}", render(generator, extension)?);
    Ok(())
}

/// Mints one identifier for the default node, optionally as a file name.
///
/// # Errors
///
/// Returns an error string if the clock moved backwards.
pub fn render(generator: &dyn IdGenerator, extension: Option<&str>) -> Result<String, String> {
    let id = generator.create_next_id().map_err(|e| e.to_string())?;
    Ok(match extension {
        Some(ext) => id.file_name(ext),
        None => id.to_string(),
    })
}
