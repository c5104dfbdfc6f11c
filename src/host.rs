// Copyright 2017 Michael Benfield <mike.benfield@gmail.com>
// This file is part of Attalus. You may distribute and/or modify Attalus under
// the terms of the GNU General Public License as published by the Free Sofware
// Foundation, either version 3 of the license or (at your option) any later
// version. You should have received a copy of the GNU General Public License
// along with Attalus. If not, see <http://www.gnu.org/licenses/>.

//! The capabilities the VDP needs from its host.
//!
//! A real system pairs the VDP with a 68000 core and an interrupt
//! controller; this crate does not implement either. Instead, the VDP
//! borrows a `&mut HostInterface` for the duration of each call that needs
//! one (external DMA, cycle stealing, HV-counter reads, interrupt
//! signaling). Modeling this as a trait object rather than a set of free
//! function pointers lets tests substitute a fake host with none of the
//! VDP's logic disturbed.

/// The two interrupt lines a Mega Drive VDP can assert.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum IrqLevel {
    /// Horizontal interrupt, level 4.
    HInt,
    /// Vertical interrupt, level 6.
    VInt,
}

pub trait HostInterface {
    /// Read a 16-bit word from 68000 address space, for external-source
    /// DMA. The address has already been masked to the source component's
    /// range (ROM, work RAM, ...) by the caller.
    fn read_word(&mut self, address: u32) -> u16;

    /// Read a single byte from 68000 address space.
    fn read_byte(&mut self, address: u32) -> u8;

    /// How many 68000 cycles does one scanline take at the VDP's current
    /// horizontal resolution?
    fn cycles_per_line(&self) -> u32;

    /// Tell the host to subtract `cycles` from the 68000's remaining
    /// budget for the current scanline (DMA cycle stealing).
    fn release_cycles(&mut self, cycles: u32);

    /// Total elapsed 68000 cycles since power-on. Used to locate where
    /// within the current line an HV-counter read landed.
    fn odometer(&self) -> u64;

    /// Assert the given interrupt line.
    fn raise_irq(&mut self, level: IrqLevel);

    /// Acknowledge (deassert) the given interrupt line, returning the
    /// autovector the 68000 should use.
    fn ack_irq(&mut self, level: IrqLevel) -> u8;
}

/// A host that answers every external read with zero and otherwise does
/// nothing. Useful for tests that only care about internal VDP state
/// (register writes, palette math, FILL/COPY DMA) and never touch
/// external-source DMA or real interrupt delivery.
#[derive(Copy, Clone, Debug, Default)]
pub struct NullHost {
    pub cycles_per_line: u32,
    pub released: u64,
    pub odometer: u64,
    pub hint_asserted: bool,
    pub vint_asserted: bool,
}

impl NullHost {
    pub fn new(cycles_per_line: u32) -> Self {
        NullHost {
            cycles_per_line,
            released: 0,
            odometer: 0,
            hint_asserted: false,
            vint_asserted: false,
        }
    }
}

impl HostInterface for NullHost {
    fn read_word(&mut self, _address: u32) -> u16 {
        0
    }

    fn read_byte(&mut self, _address: u32) -> u8 {
        0
    }

    fn cycles_per_line(&self) -> u32 {
        self.cycles_per_line
    }

    fn release_cycles(&mut self, cycles: u32) {
        self.released += cycles as u64;
    }

    fn odometer(&self) -> u64 {
        self.odometer
    }

    fn raise_irq(&mut self, level: IrqLevel) {
        match level {
            IrqLevel::HInt => self.hint_asserted = true,
            IrqLevel::VInt => self.vint_asserted = true,
        }
    }

    fn ack_irq(&mut self, level: IrqLevel) -> u8 {
        match level {
            IrqLevel::HInt => {
                self.hint_asserted = false;
                28
            }
            IrqLevel::VInt => {
                self.vint_asserted = false;
                30
            }
        }
    }
}
