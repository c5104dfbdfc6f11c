// Copyright 2017 Michael Benfield <mike.benfield@gmail.com>
// This file is part of Attalus. You may distribute and/or modify Attalus under
// the terms of the GNU General Public License as published by the Free Sofware
// Foundation, either version 3 of the license or (at your option) any later
// version. You should have received a copy of the GNU General Public License
// along with Attalus. If not, see <http://www.gnu.org/licenses/>.

//! Error types.
//!
//! Nothing on the VDP's hot path (ports, DMA, register writes, rendering)
//! returns a `Result`: those conditions are observable only through status
//! bits and the IRQ line, matching real hardware. The one genuinely
//! fallible surface is savestates and the debug memory-inspection helpers,
//! which use the `VdpError` defined here.

use std::fmt::{self, Debug, Display};

use failure::{Backtrace, Context, Fail};

#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum VdpErrorKind {
    /// A savestate could not be encoded or decoded.
    Savestate(String),
    /// A debug-port helper was asked to read or write outside the bounds
    /// of the memory it addresses.
    OutOfBounds { address: usize, limit: usize },
}

impl Display for VdpErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            VdpErrorKind::Savestate(ref s) => write!(f, "savestate error: {}", s),
            VdpErrorKind::OutOfBounds { address, limit } => write!(
                f,
                "address {:#X} is out of bounds (limit {:#X})",
                address, limit
            ),
        }
    }
}

#[derive(Debug)]
pub struct VdpError(Context<VdpErrorKind>);

impl Display for VdpError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl Fail for VdpError {
    fn cause(&self) -> Option<&Fail> {
        self.0.cause()
    }

    fn backtrace(&self) -> Option<&Backtrace> {
        self.0.backtrace()
    }
}

impl VdpError {
    pub fn kind(&self) -> VdpErrorKind {
        self.0.get_context().clone()
    }
}

impl From<VdpErrorKind> for VdpError {
    fn from(kind: VdpErrorKind) -> VdpError {
        VdpError(Context::new(kind))
    }
}

impl From<Context<VdpErrorKind>> for VdpError {
    fn from(context: Context<VdpErrorKind>) -> VdpError {
        VdpError(context)
    }
}

pub type Result<T> = ::std::result::Result<T, VdpError>;
