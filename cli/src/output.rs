//! Output utilities for CLI tools.

use std::{fs::File, io::Write};

use serde::Serialize;

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// YAML format (default).
    #[default]
    Yaml,
    /// JSON format.
    Json,
}

/// Output configuration.
pub struct Output {
    pub format: OutputFormat,
    pub file: Option<String>,
}

impl Output {
    /// Creates a new output configuration.
    pub fn new(format: OutputFormat, file: Option<String>) -> Self {
        Self { format, file }
    }

    /// Renders `value` in the configured format.
    pub fn render<T: Serialize>(&self, value: &T) -> anyhow::Result<String> {
        Ok(match self.format {
            OutputFormat::Yaml => serde_yaml::to_string(value)?,
            OutputFormat::Json => serde_json::to_string_pretty(value)?,
        })
    }

    /// Outputs the result to the configured file, or stdout.
    pub fn write<T: Serialize>(&self, value: &T) -> anyhow::Result<()> {
        let output = self.render(value)?;

        match &self.file {
            Some(path) => {
                let mut file = File::create(path)?;
                file.write_all(output.as_bytes())?;
            }
            None => {
                println!("{}", output);
            }
        }

        Ok(())
    }
}

/// Rounds to two decimals for display. Non-finite values pass through.
pub fn round2(x: f64) -> f64 {
    if x.is_finite() {
        (x * 100.0).round() / 100.0
    } else {
        x
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Row {
        name: &'static str,
        similarity: f64,
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(0.98765), 0.99);
        assert_eq!(round2(-0.004), -0.0);
        assert_eq!(round2(1.0), 1.0);
        assert!(round2(f64::INFINITY).is_infinite());
    }

    #[test]
    fn test_render_formats() {
        let row = Row {
            name: "A",
            similarity: 0.5,
        };
        let yaml = Output::new(OutputFormat::Yaml, None).render(&row).unwrap();
        assert!(yaml.contains("name: A"));

        let json = Output::new(OutputFormat::Json, None).render(&row).unwrap();
        assert!(json.contains("\"similarity\": 0.5"));
    }

    #[test]
    fn test_write_to_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("out.json");
        let out = Output::new(OutputFormat::Json, Some(path.display().to_string()));
        out.write(&Row {
            name: "B",
            similarity: 1.0,
        })
        .unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"name\": \"B\""));
    }
}
