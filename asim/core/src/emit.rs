//! Program text emission.
//!
//! The emitter is a pure function of a [`MachineConfig`] and an ordered list of
//! items: the same input always renders to the same bytes. Items are opaque and
//! copied verbatim; each one gets a `line_<n>` label numbered from zero in input
//! order.

use std::fmt::{self, Display, Write};

use crate::config::MachineConfig;
use crate::{AsimError, Result};

const INDENT: &str = "    ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramEmitter {
    config: MachineConfig,
    require_items: bool,
}

impl ProgramEmitter {
    pub fn new(config: &MachineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config: *config,
            require_items: false,
        })
    }

    /// Reject empty item lists with [`AsimError::EmptyProgram`].
    pub fn require_items(mut self, require: bool) -> Self {
        self.require_items = require;
        self
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    pub fn emit<I: Display>(&self, items: &[I]) -> Result<String> {
        let mut out = String::new();
        self.emit_to(items, &mut out)?;
        Ok(out)
    }

    pub fn emit_to<I: Display, W: Write>(&self, items: &[I], out: &mut W) -> Result<()> {
        if self.require_items && items.is_empty() {
            return Err(AsimError::EmptyProgram);
        }
        self.write_program(items, out)?;
        Ok(())
    }

    fn write_program<I: Display, W: Write>(&self, items: &[I], out: &mut W) -> fmt::Result {
        let MachineConfig {
            data_mem,
            stack_size,
            n_gpr,
            ..
        } = self.config;
        writeln!(out, "unsigned short asim_mem[{data_mem}];")?;
        writeln!(out, "Stack<short> asim_stack({stack_size});")?;
        writeln!(out, "Register asim_reg({n_gpr});")?;
        writeln!(out)?;
        writeln!(out, "int main() {{")?;
        for (index, item) in items.iter().enumerate() {
            writeln!(out, "{INDENT}line_{index}:")?;
            writeln!(out, "{INDENT}{item}")?;
        }
        writeln!(out, "}}")
    }
}

/// Validate `config` and render `items` in one call.
pub fn render_program<I: Display>(config: &MachineConfig, items: &[I]) -> Result<String> {
    ProgramEmitter::new(config)?.emit(items)
}
