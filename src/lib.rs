// Copyright 2017 Michael Benfield <mike.benfield@gmail.com>
// This file is part of Attalus. You may distribute and/or modify Attalus under
// the terms of the GNU General Public License as published by the Free Sofware
// Foundation, either version 3 of the license or (at your option) any later
// version. You should have received a copy of the GNU General Public License
// along with Attalus. If not, see <http://www.gnu.org/licenses/>.

//! A cycle-accurate emulation core for the Mega Drive / Genesis VDP
//! (315-5313) running in its native Mode 5.
//!
//! This crate does not emulate a 68000, does not know about cartridge
//! address space, and does not present a frame to the screen: it is the
//! VDP alone, driven by a host that supplies cycles and memory reads and
//! consumes a framebuffer, interrupt requests, and status bits.

extern crate bitflags;
extern crate serde;
#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate failure;
extern crate bincode;

#[cfg(test)]
extern crate quickcheck;

#[macro_use]
mod utilities;
#[macro_use]
pub mod log;
pub mod errors;
pub mod save;
pub mod host;
pub mod vdp;

pub use vdp::Vdp;
pub use host::HostInterface;
