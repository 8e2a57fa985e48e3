//! Machine sizing shared by the state containers and the emitter.

use crate::{AsimError, Result};
use serde::{Deserialize, Serialize};

/// Data memory cells of the reference target (8 Mi words).
pub const DEFAULT_DATA_MEM: usize = 8 * 1024 * 1024;
pub const DEFAULT_STACK_SIZE: usize = 64;
pub const DEFAULT_N_GPR: usize = 16;
/// Instruction memory cells of the reference target (8 Mi words).
pub const DEFAULT_INST_MEM: usize = 8 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineConfig {
    #[serde(default = "default_data_mem")]
    pub data_mem: usize,
    #[serde(default = "default_stack_size")]
    pub stack_size: usize,
    #[serde(default = "default_n_gpr", alias = "n_GPR")]
    pub n_gpr: usize,
    /// Recorded for the target toolchain; the emitted text does not use it.
    #[serde(default = "default_inst_mem")]
    pub inst_mem: usize,
}

fn default_data_mem() -> usize {
    DEFAULT_DATA_MEM
}

fn default_stack_size() -> usize {
    DEFAULT_STACK_SIZE
}

fn default_n_gpr() -> usize {
    DEFAULT_N_GPR
}

fn default_inst_mem() -> usize {
    DEFAULT_INST_MEM
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            data_mem: DEFAULT_DATA_MEM,
            stack_size: DEFAULT_STACK_SIZE,
            n_gpr: DEFAULT_N_GPR,
            inst_mem: DEFAULT_INST_MEM,
        }
    }
}

impl MachineConfig {
    /// Fail on the first zero-sized field, in declaration order.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("data_mem", self.data_mem),
            ("stack_size", self.stack_size),
            ("n_gpr", self.n_gpr),
            ("inst_mem", self.inst_mem),
        ] {
            if value == 0 {
                return Err(AsimError::InvalidConfiguration { field, value });
            }
        }
        Ok(())
    }

    /// Apply a `.name value` source directive. `line` is only used for errors.
    pub fn apply_directive(&mut self, name: &str, value: &str, line: usize) -> Result<()> {
        let slot = match name {
            ".data_mem" => &mut self.data_mem,
            ".stack_size" => &mut self.stack_size,
            ".n_GPR" | ".n_gpr" => &mut self.n_gpr,
            ".inst_mem" => &mut self.inst_mem,
            other => {
                return Err(AsimError::Grammar {
                    line,
                    message: format!("invalid configuration directive: {other}"),
                })
            }
        };
        *slot = parse_number(value).ok_or_else(|| AsimError::Grammar {
            line,
            message: format!("invalid value for {name}: '{value}'"),
        })?;
        Ok(())
    }
}

/// Decimal or `0x`-prefixed hexadecimal.
fn parse_number(text: &str) -> Option<usize> {
    match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => usize::from_str_radix(hex, 16).ok(),
        None => text.parse().ok(),
    }
}
