//! Machine state core for the ASIM register/stack target.
//!
//! The crate owns the state containers an interpreter for the target would
//! operate on (a bounded stack, a register file and a flat data memory) and the
//! pure text emitter that turns a configuration plus a list of opaque items into
//! a labeled program. Reading assembly-like source and archiving programs sit on
//! top of those pieces.

use std::fmt;
use thiserror::Error;

pub mod config;
pub mod emit;
pub mod image;
pub mod memory;
pub mod source;
pub mod stack;
pub mod state;

pub use config::{
    MachineConfig, DEFAULT_DATA_MEM, DEFAULT_INST_MEM, DEFAULT_N_GPR, DEFAULT_STACK_SIZE,
};
pub use emit::{render_program, ProgramEmitter};
pub use image::{ImageMetadata, ProgramImage, IMAGE_MAGIC, IMAGE_VERSION};
pub use memory::FlatMemory;
pub use source::ProgramSource;
pub use stack::BoundedStack;
pub use state::{Register, RegisterFile};

pub type Result<T> = std::result::Result<T, AsimError>;

#[derive(Debug, Error)]
pub enum AsimError {
    #[error("stack overflow (capacity {capacity})")]
    StackOverflow { capacity: usize },
    #[error("stack underflow")]
    StackUnderflow,
    #[error("index {index} out of range (length {len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("invalid configuration: {field} must be positive (got {value})")]
    InvalidConfiguration { field: &'static str, value: usize },
    #[error("program has no items")]
    EmptyProgram,
    #[error("unknown register '{0}'")]
    UnknownRegister(String),
    #[error("line {line}: {message}")]
    Grammar { line: usize, message: String },
    #[error("image error: {0}")]
    InvalidImage(String),
    #[error("formatting failed")]
    Format(#[from] fmt::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("serialize error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// State of one simulated machine.
///
/// Every machine owns its own register file, data memory and stack; nothing is
/// shared between instances.
#[derive(Debug, Clone)]
pub struct Machine {
    pub registers: RegisterFile,
    pub memory: FlatMemory,
    pub stack: BoundedStack<i16>,
}

impl Machine {
    pub fn new(config: &MachineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            registers: RegisterFile::new(config.n_gpr)?,
            memory: FlatMemory::new(config.data_mem)?,
            stack: BoundedStack::new(config.stack_size)?,
        })
    }

    /// Zero every register, counter and memory cell and empty the stack.
    pub fn reset(&mut self) {
        self.registers.reset();
        self.memory.clear();
        self.stack.clear();
    }
}

impl fmt::Display for Machine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.registers)?;
        writeln!(f)?;
        write!(f, "Stack ({}/{}):", self.stack.len(), self.stack.capacity())?;
        for value in self.stack.iter() {
            write!(f, " {value}")?;
        }
        Ok(())
    }
}
