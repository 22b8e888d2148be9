//! ### RESET - Soft reset (`0xE0`, 1 byte, W)
//!
//! Writing `0xB6` performs a complete power-on reset. Any other value is ignored by the device.
use crate::register::{Reg, Writable};

/// Marker struct for the RESET (0xE0) register
pub struct Reset;
impl Reg for Reset { const ADDR: u8 = 0xE0; }

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ResetCommand {
    SoftReset,
}

impl Writable for Reset {
    type In = ResetCommand;

    fn encode(v: &Self::In, out: &mut [u8]) {
        out[0] = match v {
            ResetCommand::SoftReset => 0xB6,
        };
    }
}
