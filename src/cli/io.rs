//! JSON output for the CLI
//!
//! - One JSON document per invocation on stdout
//! - Log lines never go to stdout
//! - UTF-8 only

use std::io::{self, Write};

use serde_json::Value;

use super::errors::CliResult;

/// Render a JSON value, compact or pretty.
pub fn render_json(value: &Value, pretty: bool) -> CliResult<String> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(rendered)
}

/// Write a JSON value to stdout followed by a newline
pub fn write_json(value: &Value, pretty: bool) -> CliResult<()> {
    let rendered = render_json(value, pretty)?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", rendered)?;
    stdout.flush()?;
    Ok(())
}
