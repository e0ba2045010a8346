use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Result};

use a11y_lens_core::{WcagLevel, WcagVersion};

/// Read one line from stdin, trimmed. `None` means stdin was closed.
fn read_line() -> Result<Option<String>> {
    let mut input = String::new();
    let n = io::stdin().lock().read_line(&mut input)?;
    if n == 0 {
        return Ok(None);
    }
    Ok(Some(input.trim().to_string()))
}

fn ask(prompt: &str) -> Result<Option<String>> {
    let mut stderr = io::stderr().lock();
    write!(stderr, "{prompt}")?;
    stderr.flush()?;
    drop(stderr);
    read_line()
}

pub(crate) fn prompt_level() -> Result<WcagLevel> {
    let mut prompt = "Which WCAG accessibility level do you want to check? (A / AA / AAA): ";
    loop {
        let answer = match ask(prompt)? {
            Some(answer) => answer,
            None => bail!("stdin closed while waiting for a WCAG level"),
        };
        match answer.parse() {
            Ok(level) => return Ok(level),
            Err(_) => prompt = "Please enter a valid level (A / AA / AAA): ",
        }
    }
}

pub(crate) fn prompt_version() -> Result<WcagVersion> {
    let mut prompt = "Which WCAG version do you want to check? (2.0 / 2.1 / 2.2): ";
    loop {
        let answer = match ask(prompt)? {
            Some(answer) => answer,
            None => bail!("stdin closed while waiting for a WCAG version"),
        };
        match answer.parse() {
            Ok(version) => return Ok(version),
            Err(_) => prompt = "Please enter a valid version (2.0 / 2.1 / 2.2): ",
        }
    }
}

/// Unlike level/version this does not loop; the caller treats an
/// unrecognized answer as `table`.
pub(crate) fn prompt_format() -> Result<String> {
    match ask("How would you like results? (table / list / json): ")? {
        Some(answer) if !answer.is_empty() => Ok(answer),
        _ => Ok("table".to_string()),
    }
}

pub(crate) fn prompt_directory() -> Result<PathBuf> {
    match ask("Enter the directory path to scan (leave blank for current directory): ")? {
        Some(answer) if !answer.is_empty() => Ok(PathBuf::from(answer)),
        _ => Ok(std::env::current_dir()?),
    }
}

/// Confirmation shown before any file content leaves the machine.
pub(crate) fn confirm_send(file_count: usize, provider: &str) -> Result<bool> {
    let prompt = format!(
        "About to send the contents of {file_count} file(s) to the {provider} API. Continue? [y/N]: "
    );
    let answer = match ask(&prompt)? {
        Some(answer) => answer.to_ascii_lowercase(),
        None => return Ok(false),
    };
    Ok(matches!(answer.as_str(), "y" | "yes"))
}
