// Copyright 2017 Michael Benfield <mike.benfield@gmail.com>
// This file is part of Attalus. You may distribute and/or modify Attalus under
// the terms of the GNU General Public License as published by the Free Sofware
// Foundation, either version 3 of the license or (at your option) any later
// version. You should have received a copy of the GNU General Public License
// along with Attalus. If not, see <http://www.gnu.org/licenses/>.

use std;

use super::options::VdpOptions;
use super::palette::Palette;
use super::sprites::{SpriteCacheEntry, SPRITE_CACHE_CAPACITY};
use super::{
    DmaMode, DmaSource, StatusFlags, CRAM_ENTRIES, REGISTER_COUNT, SAT_SHADOW_BYTES,
    VRAM_CAPACITY, VSRAM_ENTRIES,
};

/// Everything that is part of a savestate: every byte a game could, in
/// principle, observe by reading the VDP back. `VdpOptions` (host-chosen
/// hardware-bug toggles) and the palette cache (a pure function of CRAM
/// and the registers) are deliberately not here; see `Vdp`.
#[derive(Clone, Copy)]
pub struct VdpState {
    pub reg: [u8; REGISTER_COUNT],
    pub status: StatusFlags,
    pub ctrl_latch: bool,
    pub code: u8,
    pub address: u32,
    pub test_reg: u16,
    pub data_buffer: u16,
    /// Reserved for FIFO residue bits; always empty in this core (see
    /// `SPEC_FULL.md` section 9, Open Questions).
    pub fifo: [u16; 4],
    pub fifo_count: u8,
    pub dma_mode: Option<DmaMode>,
    pub dma_source: DmaSource,
    pub dma_src_addr: u32,
    pub dma_words_remaining: u32,
    pub line: u16,
    pub hint_counter: u8,
    pub hint_pending: bool,
    pub hint_line_asserted: bool,
    pub vint_line_asserted: bool,
    pub dot_overflow_prev_line: bool,
    pub sprite_cache: [[SpriteCacheEntry; SPRITE_CACHE_CAPACITY]; 2],
    pub sprite_cache_count: [u8; 2],
    pub vram: [u8; VRAM_CAPACITY],
    pub cram: [u16; CRAM_ENTRIES],
    pub vsram: [u16; VSRAM_ENTRIES],
    pub sat_shadow: [u8; SAT_SHADOW_BYTES],
}

mod _impl0 {
    use super::super::{DmaMode, DmaSource, StatusFlags};
    use super::{SpriteCacheEntry, VdpState, SPRITE_CACHE_CAPACITY};

    /// Same fields as `VdpState`, but with every array over 32 elements
    /// restructured as a nested array of at most 32 elements, which is as
    /// large as this vintage of `serde_derive` implements `Serialize` and
    /// `Deserialize` for directly. Transmuting the whole struct at once
    /// (rather than field by field) is how the rest of this codebase
    /// handles the same limitation; see `utilities::impl_serde_via`.
    #[derive(Serialize, Deserialize)]
    struct VdpStateDerive {
        reg: [u8; 24],
        status: StatusFlags,
        ctrl_latch: bool,
        code: u8,
        address: u32,
        test_reg: u16,
        data_buffer: u16,
        fifo: [u16; 4],
        fifo_count: u8,
        dma_mode: Option<DmaMode>,
        dma_source: DmaSource,
        dma_src_addr: u32,
        dma_words_remaining: u32,
        line: u16,
        hint_counter: u8,
        hint_pending: bool,
        hint_line_asserted: bool,
        vint_line_asserted: bool,
        dot_overflow_prev_line: bool,
        sprite_cache: [[SpriteCacheEntry; SPRITE_CACHE_CAPACITY]; 2],
        sprite_cache_count: [u8; 2],
        vram: [[[u8; 32]; 32]; 128],
        cram: [[u16; 32]; 2],
        vsram: [[u16; 20]; 2],
        sat_shadow: [[u8; 32]; 32],
    }

    impl_serde_via! {VdpState, VdpStateDerive}
}

impl Default for VdpState {
    fn default() -> VdpState {
        VdpState {
            reg: [0; REGISTER_COUNT],
            status: StatusFlags::empty(),
            ctrl_latch: false,
            code: 0,
            address: 0,
            test_reg: 0,
            data_buffer: 0,
            fifo: [0; 4],
            fifo_count: 0,
            dma_mode: None,
            dma_source: DmaSource::Rom,
            dma_src_addr: 0,
            dma_words_remaining: 0,
            line: 0,
            hint_counter: 0,
            hint_pending: false,
            hint_line_asserted: false,
            vint_line_asserted: false,
            dot_overflow_prev_line: false,
            sprite_cache: [[SpriteCacheEntry::default(); SPRITE_CACHE_CAPACITY]; 2],
            sprite_cache_count: [0; 2],
            vram: [0; VRAM_CAPACITY],
            cram: [0; CRAM_ENTRIES],
            vsram: [0; VSRAM_ENTRIES],
            sat_shadow: [0; SAT_SHADOW_BYTES],
        }
    }
}

impl std::fmt::Debug for VdpState {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "VdpState {{ reg: {:?}, status: {:?}, code: {:?}, address: {:#X}, \
             line: {:?}, dma_mode: {:?}, vram: {:?} (...) }}",
            self.reg,
            self.status,
            self.code,
            self.address,
            self.line,
            self.dma_mode,
            &self.vram[0..32]
        )
    }
}

/// The VDP as a whole: its persisted state, the host-chosen hardware-bug
/// toggles (`VdpOptions`), and the lazily rebuilt palette cache.
pub struct Vdp {
    pub state: VdpState,
    pub options: VdpOptions,
    pub palette: Palette,
}

impl std::fmt::Debug for Vdp {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Vdp {{ state: {:?}, options: {:?} }}", self.state, self.options)
    }
}

impl Default for Vdp {
    fn default() -> Vdp {
        let mut vdp = Vdp {
            state: VdpState::default(),
            options: VdpOptions::default(),
            palette: Palette::default(),
        };
        vdp.reset();
        vdp
    }
}

impl Vdp {
    /// Construct a fresh VDP with the given hardware-bug-toggle options,
    /// already reset to power-on defaults.
    pub fn with_options(options: VdpOptions) -> Vdp {
        let mut vdp = Vdp {
            state: VdpState::default(),
            options,
            palette: Palette::default(),
        };
        vdp.reset();
        vdp
    }

    /// Reset to the documented Mode-5 power-on defaults (section 4.3):
    /// registers 0 and 1 select Mode 5 with display and interrupts
    /// disabled, auto-increment defaults to 2, everything else clears.
    /// Also aborts any in-progress DMA and re-dirties the palette cache.
    pub fn reset(&mut self) {
        self.state = VdpState::default();
        self.state.reg[0] = 0x04;
        self.state.reg[1] = 0x04;
        self.state.reg[15] = 0x02;
        self.palette.mark_fully_dirty();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use save;

    #[test]
    fn reset_clears_memories_and_dma() {
        let mut vdp = Vdp::default();
        vdp.state.vram[10] = 0xFF;
        vdp.state.cram[3] = 0x0EEE;
        vdp.state.vsram[1] = 0x3FF;
        vdp.state.dma_words_remaining = 42;
        vdp.state.status.insert(StatusFlags::DMA);

        vdp.reset();

        assert!(vdp.state.vram.iter().all(|&b| b == 0));
        assert!(vdp.state.cram.iter().all(|&w| w == 0));
        assert!(vdp.state.vsram.iter().all(|&w| w == 0));
        assert_eq!(vdp.state.dma_words_remaining, 0);
        assert!(!vdp.state.status.contains(StatusFlags::DMA));
    }

    #[test]
    fn savestate_round_trip_preserves_every_field() {
        let mut vdp = Vdp::default();
        vdp.state.vram[0x1234] = 0xAB;
        vdp.state.cram[5] = 0x0E0E;
        vdp.state.vsram[7] = 0x0155;
        vdp.state.reg[11] = 0x3C;
        vdp.state.address = 0x1FFFE;
        vdp.state.sat_shadow[4] = 0x77;

        let bytes = save::serialize(&vdp.state).expect("serialize");
        let restored: VdpState = save::deserialize(&bytes).expect("deserialize");

        assert_eq!(restored.vram[0x1234], 0xAB);
        assert_eq!(restored.cram[5], 0x0E0E);
        assert_eq!(restored.vsram[7], 0x0155);
        assert_eq!(restored.reg[11], 0x3C);
        assert_eq!(restored.address, 0x1FFFE);
        assert_eq!(restored.sat_shadow[4], 0x77);
    }
}
