use crate::{AsimError, Result};
use std::fmt;

/// Flat data memory of 16-bit cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlatMemory {
    cells: Box<[u16]>,
}

impl FlatMemory {
    pub fn new(len: usize) -> Result<Self> {
        if len == 0 {
            return Err(AsimError::InvalidConfiguration {
                field: "data_mem",
                value: len,
            });
        }
        Ok(Self {
            cells: vec![0; len].into_boxed_slice(),
        })
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn read(&self, address: usize) -> Result<u16> {
        self.cells
            .get(address)
            .copied()
            .ok_or(AsimError::IndexOutOfRange {
                index: address,
                len: self.cells.len(),
            })
    }

    pub fn write(&mut self, address: usize, value: u16) -> Result<()> {
        let len = self.cells.len();
        let cell = self
            .cells
            .get_mut(address)
            .ok_or(AsimError::IndexOutOfRange {
                index: address,
                len,
            })?;
        *cell = value;
        Ok(())
    }

    /// Copy `words` into memory starting at `offset`. Nothing is written unless
    /// the whole range fits.
    pub fn load(&mut self, offset: usize, words: &[u16]) -> Result<()> {
        let len = self.cells.len();
        let end = offset.checked_add(words.len()).filter(|&end| end <= len);
        let Some(end) = end else {
            return Err(AsimError::IndexOutOfRange {
                index: offset.max(len),
                len,
            });
        };
        self.cells[offset..end].copy_from_slice(words);
        Ok(())
    }

    pub fn as_slice(&self) -> &[u16] {
        &self.cells
    }

    pub fn clear(&mut self) {
        self.cells.fill(0);
    }
}

impl fmt::Display for FlatMemory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Sixteen cells per row, prefixed by the row address.
        for (row, chunk) in self.cells.chunks(16).enumerate() {
            if row > 0 {
                writeln!(f)?;
            }
            write!(f, "{:06X}:", row * 16)?;
            for cell in chunk {
                write!(f, " {cell:04X}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_memory_is_zeroed() {
        let mem = FlatMemory::new(8).unwrap();
        assert_eq!(mem.len(), 8);
        assert!(mem.as_slice().iter().all(|&c| c == 0));
    }

    #[test]
    fn write_then_read() {
        let mut mem = FlatMemory::new(8).unwrap();
        mem.write(0, 46).unwrap();
        mem.write(7, u16::MAX).unwrap();
        assert_eq!(mem.read(0).unwrap(), 46);
        assert_eq!(mem.read(7).unwrap(), u16::MAX);
    }

    #[test]
    fn out_of_bounds_access_fails() {
        let mut mem = FlatMemory::new(8).unwrap();
        assert!(matches!(
            mem.write(8, 12),
            Err(AsimError::IndexOutOfRange { index: 8, len: 8 })
        ));
        assert!(matches!(
            mem.read(usize::MAX),
            Err(AsimError::IndexOutOfRange { .. })
        ));
        assert!(mem.as_slice().iter().all(|&c| c == 0));
    }

    #[test]
    fn zero_length_is_rejected() {
        assert!(matches!(
            FlatMemory::new(0),
            Err(AsimError::InvalidConfiguration {
                field: "data_mem",
                value: 0
            })
        ));
    }

    #[test]
    fn load_is_all_or_nothing() {
        let mut mem = FlatMemory::new(4).unwrap();
        mem.load(1, &[1, 2, 3]).unwrap();
        assert_eq!(mem.as_slice(), &[0, 1, 2, 3]);
        assert!(mem.load(2, &[9, 9, 9]).is_err());
        assert!(mem.load(usize::MAX, &[9]).is_err());
        assert_eq!(mem.as_slice(), &[0, 1, 2, 3]);
    }

    #[test]
    fn dump_is_hex_rows() {
        let mut mem = FlatMemory::new(18).unwrap();
        mem.write(17, 0xBEEF).unwrap();
        let dump = mem.to_string();
        let lines: Vec<&str> = dump.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("000000: 0000"));
        assert_eq!(lines[1], "000010: 0000 BEEF");
    }
}
