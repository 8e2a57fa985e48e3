//! Reader for assembly-like program source.
//!
//! Lines are classified, not parsed: `.name value` sets a config field,
//! `#label` names the next item, `;` starts a comment and anything else is an
//! item kept verbatim. `.include_file path` marks text spliced in by an earlier
//! tool; the path is recorded and nothing is read.

use std::collections::BTreeMap;

use crate::config::MachineConfig;
use crate::{AsimError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramSource {
    pub config: MachineConfig,
    /// Label name to the index of the item it precedes.
    pub labels: BTreeMap<String, usize>,
    pub items: Vec<String>,
    pub include_files: Vec<String>,
}

impl ProgramSource {
    pub fn parse(text: &str) -> Result<Self> {
        Self::parse_with(MachineConfig::default(), text)
    }

    /// Parse starting from `config`; directives in `text` override it.
    pub fn parse_with(config: MachineConfig, text: &str) -> Result<Self> {
        let mut out = Self {
            config,
            ..Self::default()
        };
        for (idx, raw) in text.lines().enumerate() {
            out.parse_line(raw, idx + 1)?;
        }
        Ok(out)
    }

    fn parse_line(&mut self, raw: &str, line: usize) -> Result<()> {
        let code = raw.split(';').next().unwrap_or("").trim();
        if code.is_empty() {
            return Ok(());
        }

        if let Some(label) = code.strip_prefix('#') {
            let label = label.trim();
            if label.is_empty() {
                return Err(AsimError::Grammar {
                    line,
                    message: "empty label name".to_string(),
                });
            }
            if self.labels.contains_key(label) {
                return Err(AsimError::Grammar {
                    line,
                    message: format!("duplicate label: {label}"),
                });
            }
            self.labels.insert(label.to_string(), self.items.len());
            return Ok(());
        }

        if code.starts_with('.') {
            let mut parts = code.split_whitespace();
            let name = parts.next().unwrap_or(code);
            let Some(value) = parts.next() else {
                return Err(AsimError::Grammar {
                    line,
                    message: format!("missing value for {name}"),
                });
            };
            if name == ".include_file" {
                let path = code[name.len()..].trim();
                self.include_files.push(path.to_string());
                return Ok(());
            }
            return self.config.apply_directive(name, value, line);
        }

        self.items.push(code.to_string());
        Ok(())
    }
}
