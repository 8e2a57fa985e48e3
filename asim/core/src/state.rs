use std::fmt;
use std::str::FromStr;

use crate::config::DEFAULT_N_GPR;
use crate::{AsimError, Result};

/// Registers addressable by name.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Register {
    /// General-purpose register by index (16-bit).
    Gpr(usize),
    /// Program counter.
    Pc,
    /// Status register.
    Sr,
    /// Tick counter.
    Tc,
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Register::Gpr(idx) => write!(f, "r_{idx}"),
            Register::Pc => write!(f, "pc"),
            Register::Sr => write!(f, "sr"),
            Register::Tc => write!(f, "tc"),
        }
    }
}

impl FromStr for Register {
    type Err = AsimError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pc" => Ok(Register::Pc),
            "sr" => Ok(Register::Sr),
            "tc" => Ok(Register::Tc),
            other => other
                .strip_prefix("r_")
                .filter(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
                .and_then(|rest| rest.parse().ok())
                .map(Register::Gpr)
                .ok_or_else(|| AsimError::UnknownRegister(s.to_string())),
        }
    }
}

/// Register file: a bank of 16-bit general-purpose registers plus the
/// program, status and tick counters.
///
/// The bank size is fixed when the file is built, either from a runtime count
/// ([`RegisterFile::new`]) or a compile-time one ([`RegisterFile::fixed`]).
/// Both start fully zeroed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegisterFile {
    gpr: Box<[u16]>,
    pub pc: u32,
    pub sr: u32,
    pub tc: u32,
}

struct NonZeroCount<const N: usize>;

impl<const N: usize> NonZeroCount<N> {
    const OK: () = assert!(N > 0, "register file needs at least one register");
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::fixed::<DEFAULT_N_GPR>()
    }
}

impl RegisterFile {
    pub fn new(count: usize) -> Result<Self> {
        if count == 0 {
            return Err(AsimError::InvalidConfiguration {
                field: "n_gpr",
                value: count,
            });
        }
        Ok(Self::zeroed(count))
    }

    /// Register file whose bank size is a compile-time constant.
    pub fn fixed<const N: usize>() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = NonZeroCount::<N>::OK;
        Self::zeroed(N)
    }

    fn zeroed(count: usize) -> Self {
        Self {
            gpr: vec![0; count].into_boxed_slice(),
            pc: 0,
            sr: 0,
            tc: 0,
        }
    }

    /// Number of general-purpose registers.
    pub fn count(&self) -> usize {
        self.gpr.len()
    }

    pub fn read(&self, index: usize) -> Result<u16> {
        self.gpr
            .get(index)
            .copied()
            .ok_or(AsimError::IndexOutOfRange {
                index,
                len: self.gpr.len(),
            })
    }

    pub fn write(&mut self, index: usize, value: u16) -> Result<()> {
        let len = self.gpr.len();
        let slot = self
            .gpr
            .get_mut(index)
            .ok_or(AsimError::IndexOutOfRange { index, len })?;
        *slot = value;
        Ok(())
    }

    pub fn as_slice(&self) -> &[u16] {
        &self.gpr
    }

    /// Read any register; general-purpose values are widened to `u32`.
    pub fn get(&self, reg: Register) -> Result<u32> {
        match reg {
            Register::Gpr(index) => self.read(index).map(u32::from),
            Register::Pc => Ok(self.pc),
            Register::Sr => Ok(self.sr),
            Register::Tc => Ok(self.tc),
        }
    }

    /// Write any register; general-purpose registers keep the low 16 bits.
    pub fn set(&mut self, reg: Register, value: u32) -> Result<()> {
        match reg {
            Register::Gpr(index) => self.write(index, (value & 0xFFFF) as u16)?,
            Register::Pc => self.pc = value,
            Register::Sr => self.sr = value,
            Register::Tc => self.tc = value,
        }
        Ok(())
    }

    /// Convenience wrapper that parses the register name before reading.
    pub fn get_by_name(&self, name: &str) -> Result<u32> {
        self.get(Register::from_str(name)?)
    }

    /// Convenience wrapper that parses the register name before writing.
    pub fn set_by_name(&mut self, name: &str, value: u32) -> Result<()> {
        self.set(Register::from_str(name)?, value)
    }

    pub fn reset(&mut self) {
        self.gpr.fill(0);
        self.pc = 0;
        self.sr = 0;
        self.tc = 0;
    }
}

impl fmt::Display for RegisterFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "General Purpose Registers:")?;
        for (idx, value) in self.gpr.iter().enumerate() {
            writeln!(f, "r{idx}: {value:04X}")?;
        }
        writeln!(f)?;
        writeln!(f, "Special Registers:")?;
        writeln!(f, "pc: {:08X}", self.pc)?;
        writeln!(f, "sr: {:08X}", self.sr)?;
        write!(f, "tc: {}", self.tc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registers_are_zeroed() {
        let regs = RegisterFile::default();
        assert_eq!(regs.count(), DEFAULT_N_GPR);
        assert!(regs.as_slice().iter().all(|&v| v == 0));
        assert_eq!((regs.pc, regs.sr, regs.tc), (0, 0, 0));
    }

    #[test]
    fn fixed_and_runtime_sizes_match() {
        let fixed = RegisterFile::fixed::<4>();
        let runtime = RegisterFile::new(4).unwrap();
        assert_eq!(fixed, runtime);
    }

    #[test]
    fn zero_count_is_rejected() {
        assert!(matches!(
            RegisterFile::new(0),
            Err(AsimError::InvalidConfiguration { field: "n_gpr", .. })
        ));
    }

    #[test]
    fn out_of_range_access_fails_without_mutation() {
        let mut regs = RegisterFile::new(2).unwrap();
        assert!(matches!(
            regs.read(2),
            Err(AsimError::IndexOutOfRange { index: 2, len: 2 })
        ));
        assert!(regs.write(5, 1).is_err());
        assert_eq!(regs.as_slice(), &[0, 0]);
    }

    #[test]
    fn gpr_writes_through_set_are_masked_to_16_bits() {
        let mut regs = RegisterFile::new(4).unwrap();
        regs.set(Register::Gpr(3), 0x1_ABCD).unwrap();
        assert_eq!(regs.read(3).unwrap(), 0xABCD);
        regs.set(Register::Pc, 0x1_0000).unwrap();
        assert_eq!(regs.get(Register::Pc).unwrap(), 0x1_0000);
    }

    #[test]
    fn register_name_parsing() {
        assert_eq!(Register::from_str("r_5").unwrap(), Register::Gpr(5));
        assert_eq!(Register::from_str("PC").unwrap(), Register::Pc);
        assert_eq!(Register::from_str("tc").unwrap(), Register::Tc);
        assert!(Register::from_str("r_").is_err());
        assert!(Register::from_str("r_x").is_err());
        assert!(Register::from_str("r_+1").is_err());
        assert!(matches!(
            Register::from_str("ax"),
            Err(AsimError::UnknownRegister(name)) if name == "ax"
        ));
        assert_eq!(Register::Gpr(12).to_string(), "r_12");
    }

    #[test]
    fn named_access_round_trips() {
        let mut regs = RegisterFile::new(8).unwrap();
        regs.set_by_name("r_7", 42).unwrap();
        regs.set_by_name("sr", 0b101).unwrap();
        assert_eq!(regs.get_by_name("r_7").unwrap(), 42);
        assert_eq!(regs.sr, 0b101);
        assert!(matches!(
            regs.get_by_name("r_8"),
            Err(AsimError::IndexOutOfRange { index: 8, len: 8 })
        ));
    }

    #[test]
    fn dump_lists_every_register() {
        let mut regs = RegisterFile::new(2).unwrap();
        regs.write(1, 0xAB).unwrap();
        regs.pc = 0x10;
        regs.tc = 7;
        let dump = regs.to_string();
        assert_eq!(
            dump,
            "General Purpose Registers:\nr0: 0000\nr1: 00AB\n\nSpecial Registers:\npc: 00000010\nsr: 00000000\ntc: 7"
        );
    }
}
