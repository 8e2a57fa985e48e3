use asim_core::{AsimError, FlatMemory, Machine, MachineConfig, Register, RegisterFile};
use proptest::prelude::*;

proptest! {
    #[test]
    fn new_register_file_is_zeroed(count in 1usize..256) {
        let regs = RegisterFile::new(count).unwrap();
        prop_assert_eq!(regs.count(), count);
        for index in 0..count {
            prop_assert_eq!(regs.read(index).unwrap(), 0);
        }
        prop_assert_eq!((regs.pc, regs.sr, regs.tc), (0, 0, 0));
    }

    #[test]
    fn register_write_then_read(count in 1usize..64, index in 0usize..128, value in any::<u16>()) {
        let mut regs = RegisterFile::new(count).unwrap();
        if index < count {
            regs.write(index, value).unwrap();
            prop_assert_eq!(regs.read(index).unwrap(), value);
            prop_assert_eq!(regs.get(Register::Gpr(index)).unwrap(), u32::from(value));
        } else {
            let write_err = regs.write(index, value).unwrap_err();
            let write_rejected = matches!(
                write_err,
                AsimError::IndexOutOfRange { index: i, len } if i == index && len == count
            );
            prop_assert!(write_rejected, "unexpected error: {}", write_err);
            let read_rejected = matches!(regs.read(index), Err(AsimError::IndexOutOfRange { .. }));
            prop_assert!(read_rejected, "read of r{} should be out of range", index);
            prop_assert!(regs.as_slice().iter().all(|&v| v == 0), "failed write mutated registers");
        }
    }

    #[test]
    fn memory_write_then_read(len in 1usize..512, address in 0usize..1024, value in any::<u16>()) {
        let mut mem = FlatMemory::new(len).unwrap();
        if address < len {
            mem.write(address, value).unwrap();
            prop_assert_eq!(mem.read(address).unwrap(), value);
        } else {
            let write_rejected =
                matches!(mem.write(address, value), Err(AsimError::IndexOutOfRange { .. }));
            prop_assert!(write_rejected, "write to {} should be out of range", address);
            let read_rejected = matches!(mem.read(address), Err(AsimError::IndexOutOfRange { .. }));
            prop_assert!(read_rejected, "read of {} should be out of range", address);
            prop_assert!(mem.as_slice().iter().all(|&cell| cell == 0), "failed write mutated memory");
        }
    }
}

#[test]
fn fixed_register_file_is_zeroed() {
    let regs = RegisterFile::fixed::<32>();
    assert_eq!(regs.count(), 32);
    assert!(regs.as_slice().iter().all(|&v| v == 0));
    assert_eq!((regs.pc, regs.sr, regs.tc), (0, 0, 0));
}

#[test]
fn machine_built_from_config_matches_sizes() {
    let config = MachineConfig {
        data_mem: 1024,
        stack_size: 128,
        n_gpr: 16,
        ..MachineConfig::default()
    };
    let mut machine = Machine::new(&config).unwrap();
    assert_eq!(machine.memory.len(), 1024);
    assert_eq!(machine.stack.capacity(), 128);
    assert_eq!(machine.registers.count(), 16);

    machine.registers.set_by_name("r_15", 0xFFFF).unwrap();
    assert!(machine.registers.set_by_name("r_16", 1).is_err());
    machine.registers.tc += 1;
    assert_eq!(machine.registers.get_by_name("tc").unwrap(), 1);
}
