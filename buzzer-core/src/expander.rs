//! PCF8575-style 16-bit I2C port expanders driving the indicator lights.
//!
//! The expander has no registers: a two-byte read returns the port
//! (P00-P07 first, then P10-P17) and a two-byte write sets it. Every
//! indicator group is one expander on the shared bus, addressed by its
//! 7-bit address. Bits are switched with a read-modify-write so lights of
//! other buttons on the same expander keep their state.

use embedded_hal::i2c::I2c;
use log::trace;

use crate::registry::Indicator;
use crate::sequencer::Indicators;

pub struct Pcf8575Bank<I2C> {
    i2c: I2C,
}

impl<I2C: I2c> Pcf8575Bank<I2C> {
    pub const fn new(i2c: I2C) -> Self {
        Self { i2c }
    }

    pub fn release(self) -> I2C {
        self.i2c
    }

    /// Read the full 16-bit port of the expander at `address`.
    pub fn read_port(&mut self, address: u8) -> Result<u16, I2C::Error> {
        let mut buf = [0u8; 2];
        self.i2c.read(address, &mut buf)?;
        Ok(u16::from_le_bytes(buf))
    }

    pub fn write_port(&mut self, address: u8, value: u16) -> Result<(), I2C::Error> {
        self.i2c.write(address, &value.to_le_bytes())
    }
}

impl<I2C: I2c> Indicators for Pcf8575Bank<I2C> {
    type Error = I2C::Error;

    fn set(&mut self, indicator: Indicator, on: bool) -> Result<(), Self::Error> {
        let current = self.read_port(indicator.group)?;
        let next = if on {
            current | indicator.mask
        } else {
            current & !indicator.mask
        };
        if next == current {
            return Ok(());
        }
        trace!("expander {:#04x}: {:#06x} -> {:#06x}", indicator.group, current, next);
        self.write_port(indicator.group, next)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::vec::Vec;

    use embedded_hal::i2c::{ErrorKind, ErrorType, Operation};

    use super::*;

    /// A bus full of expanders that remember what was written to them.
    #[derive(Default)]
    struct FakeBus {
        ports: BTreeMap<u8, u16>,
        writes: Vec<(u8, u16)>,
        absent: Option<u8>,
    }

    impl ErrorType for FakeBus {
        type Error = ErrorKind;
    }

    impl I2c for FakeBus {
        fn transaction(&mut self, address: u8, operations: &mut [Operation<'_>]) -> Result<(), Self::Error> {
            if self.absent == Some(address) {
                return Err(ErrorKind::NoAcknowledge(embedded_hal::i2c::NoAcknowledgeSource::Address));
            }
            for op in operations {
                match op {
                    Operation::Read(buf) => {
                        let port = self.ports.get(&address).copied().unwrap_or(0);
                        buf.copy_from_slice(&port.to_le_bytes());
                    }
                    Operation::Write(bytes) => {
                        let value = u16::from_le_bytes([bytes[0], bytes[1]]);
                        self.ports.insert(address, value);
                        self.writes.push((address, value));
                    }
                }
            }
            Ok(())
        }
    }

    const LAMP_3: Indicator = Indicator { group: 0x20, mask: 1 << 3 };
    const LAMP_12: Indicator = Indicator { group: 0x20, mask: 1 << 12 };
    const MAP_3: Indicator = Indicator { group: 0x21, mask: 1 << 3 };

    #[test]
    fn activate_preserves_other_bits() {
        let mut bank = Pcf8575Bank::new(FakeBus::default());
        bank.activate(LAMP_3).unwrap();
        bank.activate(LAMP_12).unwrap();
        bank.activate(MAP_3).unwrap();
        bank.deactivate(LAMP_3).unwrap();

        let bus = bank.release();
        assert_eq!(bus.ports[&0x20], 1 << 12);
        assert_eq!(bus.ports[&0x21], 1 << 3);
    }

    #[test]
    fn unchanged_port_is_not_rewritten() {
        let mut bank = Pcf8575Bank::new(FakeBus::default());
        bank.deactivate(LAMP_3).unwrap();
        bank.activate(LAMP_3).unwrap();
        bank.activate(LAMP_3).unwrap();

        assert_eq!(bank.release().writes, [(0x20, 1 << 3)]);
    }

    #[test]
    fn high_byte_goes_second_on_the_wire() {
        let mut bank = Pcf8575Bank::new(FakeBus::default());
        bank.write_port(0x20, 0x1234).unwrap();
        assert_eq!(bank.read_port(0x20).unwrap(), 0x1234);
        assert_eq!(0x1234u16.to_le_bytes(), [0x34, 0x12]);
    }

    #[test]
    fn missing_expander_reports_nack() {
        let mut bank = Pcf8575Bank::new(FakeBus {
            absent: Some(0x21),
            ..FakeBus::default()
        });
        assert!(bank.activate(LAMP_3).is_ok());
        assert!(matches!(bank.activate(MAP_3), Err(ErrorKind::NoAcknowledge(_))));
    }
}
