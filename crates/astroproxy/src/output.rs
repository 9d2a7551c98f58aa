//! Output formatting: JSON, compact JSON, YAML.
//!
//! API responses are untyped JSON, so every command renders the decoded
//! value as-is in the format selected by `--output`.

use std::io::{self, Write};

use serde_json::Value;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;

/// Render a response value in the chosen format.
pub fn render(format: &OutputFormat, data: &Value) -> Result<String, CliError> {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(data),
        OutputFormat::JsonCompact => serde_json::to_string(data),
        OutputFormat::Yaml => {
            return serde_yaml::to_string(data)
                .map(|s| s.trim_end().to_owned())
                .map_err(|e| CliError::Render(e.to_string()));
        }
    };
    rendered.map_err(|e| CliError::Render(e.to_string()))
}

/// Render `data` in the resolved format and print it.
pub fn emit(global: &GlobalOpts, data: &Value) -> Result<(), CliError> {
    let format = global.output.clone().unwrap_or_default();
    print_output(&render(&format, data)?, global.quiet);
    Ok(())
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn compact_json_is_single_line() {
        let out = render(&OutputFormat::JsonCompact, &json!({ "a": [1, 2] })).unwrap();
        assert_eq!(out, r#"{"a":[1,2]}"#);
    }

    #[test]
    fn yaml_has_no_trailing_newline() {
        let out = render(&OutputFormat::Yaml, &json!({ "balance": 5 })).unwrap();
        assert_eq!(out, "balance: 5");
    }

    #[test]
    fn pretty_json_is_indented() {
        let out = render(&OutputFormat::Json, &json!({ "a": 1 })).unwrap();
        assert_eq!(out, "{\n  \"a\": 1\n}");
    }
}
