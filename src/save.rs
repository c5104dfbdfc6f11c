// Copyright 2017 Michael Benfield <mike.benfield@gmail.com>
// This file is part of Attalus. You may distribute and/or modify Attalus under
// the terms of the GNU General Public License as published by the Free Sofware
// Foundation, either version 3 of the license or (at your option) any later
// version. You should have received a copy of the GNU General Public License
// along with Attalus. If not, see <http://www.gnu.org/licenses/>.

//! Savestate (de)serialization.
//!
//! A VDP's entire persisted state (`vdp::VdpState`) is a plain serde
//! struct; these helpers turn it into an opaque blob with `bincode`, the
//! same pairing this codebase family uses elsewhere for console state.

const MAX_BYTES: u64 = 0x1000000; // 16 MiB; far more than one VDP needs.

use std;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use bincode;

use errors::{VdpError, VdpErrorKind};

type Result<T> = std::result::Result<T, VdpError>;

pub fn serialize<T>(t: &T) -> Result<Vec<u8>>
where
    T: ?Sized + Serialize,
{
    bincode::config()
        .limit(MAX_BYTES)
        .serialize(t)
        .map_err(|e| VdpErrorKind::Savestate(format!("{}", e)).into())
}

pub fn serialize_into<W, T>(w: W, t: &T) -> Result<()>
where
    W: Write,
    T: ?Sized + Serialize,
{
    bincode::config()
        .limit(MAX_BYTES)
        .serialize_into(w, t)
        .map_err(|e| VdpErrorKind::Savestate(format!("{}", e)).into())
}

pub fn serialize_at<P, T>(path: P, t: &T) -> Result<()>
where
    P: AsRef<Path>,
    T: ?Sized + Serialize,
{
    let file = File::create(path).map_err(|e| VdpErrorKind::Savestate(format!("{}", e)))?;
    serialize_into(&file, t)
}

pub fn deserialize<'a, T>(bytes: &'a [u8]) -> Result<T>
where
    T: Deserialize<'a>,
{
    bincode::config()
        .limit(MAX_BYTES)
        .deserialize(bytes)
        .map_err(|e| VdpErrorKind::Savestate(format!("{}", e)).into())
}

pub fn deserialize_from<R, T>(reader: R) -> Result<T>
where
    R: Read,
    T: DeserializeOwned,
{
    bincode::config()
        .limit(MAX_BYTES)
        .deserialize_from(reader)
        .map_err(|e| VdpErrorKind::Savestate(format!("{}", e)).into())
}

pub fn deserialize_at<P, T>(path: P) -> Result<T>
where
    P: AsRef<Path>,
    T: DeserializeOwned,
{
    let file = File::open(path).map_err(|e| VdpErrorKind::Savestate(format!("{}", e)))?;
    deserialize_from(&file)
}
