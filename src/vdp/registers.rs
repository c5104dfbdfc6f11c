// Copyright 2017 Michael Benfield <mike.benfield@gmail.com>
// This file is part of Attalus. You may distribute and/or modify Attalus under
// the terms of the GNU General Public License as published by the Free Sofware
// Foundation, either version 3 of the license or (at your option) any later
// version. You should have received a copy of the GNU General Public License
// along with Attalus. If not, see <http://www.gnu.org/licenses/>.

//! Register writes and the mode bits, masks, and base addresses derived
//! from them. Registers are never interpreted inline at the port; every
//! other module asks one of these small accessor methods instead of
//! poking at `state.reg` directly.

use super::{DmaMode, DmaSource, HSize, InterlaceMode, VSize, Vdp};

/// `H_Scroll_Mask_Table`, indexed by register 11 bits 1:0.
const H_SCROLL_MASK_TABLE: [u16; 4] = [0x00, 0x07, 0xF8, 0xFF];

/// Scroll-size lookup, keyed by `(v_sz << 2) | h_sz` where each of v_sz/h_sz
/// is the raw 2-bit field from register 16. Columns: (h_shift, h_mask,
/// v_mask). Invalid combinations (v_sz or h_sz == 0b10) collapse to the
/// same approximation the original hardware/emulator uses: the H/V size
/// acts as if it were 32 cells.
const SCROLL_SIZE_TABLE: [(u8, u16, u16); 16] = [
    (5, 0x1F, 0x1F),  // 00 00: 32x32
    (6, 0x3F, 0x1F),  // 00 01: 64x32
    (5, 0x1F, 0x1F),  // 00 10: invalid -> 32x32
    (7, 0x7F, 0x1F),  // 00 11: 128x32
    (5, 0x1F, 0x3F),  // 01 00: 32x64
    (6, 0x3F, 0x1F),  // 01 01: invalid -> 64x32
    (5, 0x1F, 0x3F),  // 01 10: invalid -> 32x64
    (6, 0x3F, 0x1F),  // 01 11: invalid -> 64x32
    (5, 0x1F, 0x1F),  // 10 00: invalid -> 32x32
    (6, 0x3F, 0x1F),  // 10 01: invalid -> 64x32
    (5, 0x1F, 0x1F),  // 10 10: invalid -> 32x32
    (7, 0x7F, 0x1F),  // 10 11: invalid -> 128x32
    (5, 0x1F, 0x7F),  // 11 00: 32x128
    (6, 0x3F, 0x1F),  // 11 01: invalid -> 64x32
    (5, 0x1F, 0x1F),  // 11 10: invalid -> 32x32
    (6, 0x3F, 0x1F),  // 11 11: invalid -> 64x32
];

impl Vdp {
    pub fn reg(&self, i: usize) -> u8 {
        self.state.reg[i]
    }

    pub fn is_128k_mode(&self) -> bool {
        self.state.reg[1] & 0b0000_0100 != 0
    }

    pub fn vram_mask(&self) -> u32 {
        if self.is_128k_mode() {
            super::VRAM_MASK_128K
        } else {
            super::VRAM_MASK_64K
        }
    }

    pub fn display_enabled(&self) -> bool {
        self.state.reg[1] & 0b0100_0000 != 0
    }

    pub fn is_mode_5(&self) -> bool {
        self.state.reg[1] & 0b0000_0100 != 0
    }

    /// Decoded (M1, M2, M3, M4/PSEL, M5) tuple used by the mode dispatcher
    /// that selects between the real compositor and the error renderer.
    pub fn mode_bits(&self) -> (bool, bool, bool, bool, bool) {
        let reg0 = self.state.reg[0];
        let reg1 = self.state.reg[1];
        let m1 = reg1 & 0b0001_0000 != 0;
        let m2 = reg1 & 0b0000_1000 != 0;
        let m3 = reg0 & 0b0000_0010 != 0;
        let m4 = reg0 & 0b0000_0100 != 0;
        let m5 = reg1 & 0b0000_0100 != 0;
        (m1, m2, m3, m4, m5)
    }

    pub fn hint_enabled(&self) -> bool {
        self.state.reg[0] & 0b0001_0000 != 0
    }

    pub fn vint_enabled(&self) -> bool {
        self.state.reg[1] & 0b0010_0000 != 0
    }

    pub fn h_size(&self) -> HSize {
        if self.state.reg[12] & 0b0000_0001 != 0 {
            HSize::H40
        } else {
            HSize::H32
        }
    }

    pub fn v_size(&self) -> VSize {
        if self.state.reg[1] & 0b0000_1000 != 0 {
            VSize::V30
        } else {
            VSize::V28
        }
    }

    pub fn interlace_mode(&self) -> InterlaceMode {
        match self.state.reg[12] & 0b0000_0110 {
            0b010 => InterlaceMode::Im1,
            0b110 => {
                if self.options.enable_interlaced_mode {
                    InterlaceMode::Im2
                } else {
                    InterlaceMode::Im1
                }
            }
            _ => InterlaceMode::Off,
        }
    }

    pub fn shadow_highlight_enabled(&self) -> bool {
        self.state.reg[12] & 0b0000_1000 != 0
    }

    pub fn auto_increment(&self) -> u32 {
        self.state.reg[15] as u32
    }

    pub fn background_color_index(&self) -> u8 {
        self.state.reg[7] & 0b0011_1111
    }

    fn nametable_mask(&self) -> u32 {
        if self.is_128k_mode() {
            0x1E000
        } else {
            0xE000
        }
    }

    pub fn scroll_a_base(&self) -> u32 {
        ((self.state.reg[2] as u32 & 0b0011_1000) << 10) & self.nametable_mask()
    }

    pub fn window_base(&self) -> u32 {
        let bits = if self.h_size() == HSize::H40 {
            self.state.reg[3] as u32 & 0b0011_1100
        } else {
            self.state.reg[3] as u32 & 0b0011_1110
        };
        (bits << 10) & self.nametable_mask()
    }

    pub fn scroll_b_base(&self) -> u32 {
        ((self.state.reg[4] as u32 & 0b0000_1111) << 13) & self.nametable_mask()
    }

    pub fn sat_base(&self) -> u32 {
        let bits = if self.h_size() == HSize::H40 {
            self.state.reg[5] as u32 & 0b0111_1100
        } else {
            self.state.reg[5] as u32 & 0b0111_1111
        };
        (bits << 9) & self.nametable_mask()
    }

    pub fn sprite_pattern_bank(&self) -> u16 {
        if self.is_128k_mode() {
            (self.state.reg[6] as u16 & 0b0010_0000) << 4
        } else {
            0
        }
    }

    pub fn pattern_base_extension(&self) -> u16 {
        if self.is_128k_mode() {
            (self.state.reg[14] as u16 & 0b0000_0001) << 16 | (self.state.reg[14] as u16 & 0b0001_0000) << 12
        } else {
            0
        }
    }

    pub fn h_scroll_base(&self) -> u32 {
        let bits = self.state.reg[13] as u32 & 0b0011_1111;
        (bits << 10) & self.nametable_mask()
    }

    /// `(column_shift, column_mask, v_mask)` derived from register 11 and
    /// register 16 as described in section 4.3.
    pub fn h_scroll_mask(&self) -> u16 {
        H_SCROLL_MASK_TABLE[(self.state.reg[11] & 0b11) as usize]
    }

    pub fn v_scroll_full(&self) -> bool {
        self.state.reg[11] & 0b0000_0100 == 0
    }

    pub fn scroll_size(&self) -> (u8, u16, u16) {
        let h_sz = self.state.reg[16] & 0b11;
        let v_sz = (self.state.reg[16] >> 4) & 0b11;
        SCROLL_SIZE_TABLE[((v_sz << 2) | h_sz) as usize]
    }

    pub fn window_h_pos(&self) -> (u8, bool) {
        let r = self.state.reg[17];
        (r & 0b0001_1111, r & 0b1000_0000 != 0)
    }

    pub fn window_v_pos(&self) -> (u8, bool) {
        let r = self.state.reg[18];
        (r & 0b0001_1111, r & 0b1000_0000 != 0)
    }

    pub fn hint_reload(&self) -> u8 {
        self.state.reg[10]
    }

    pub fn dma_length(&self) -> u32 {
        let raw = self.state.reg[19] as u32 | (self.state.reg[20] as u32) << 8;
        if raw == 0 && self.options.zero_length_dma {
            0x10000
        } else {
            raw
        }
    }

    pub fn dma_src_addr_reg(&self) -> u32 {
        self.state.reg[21] as u32
            | (self.state.reg[22] as u32) << 8
            | ((self.state.reg[23] as u32 & 0b0011_1111) << 16)
    }

    pub fn dma_mode_bits(&self) -> Option<DmaMode> {
        match self.state.reg[23] >> 6 {
            0b00 | 0b01 => Some(DmaMode::MemoryToVram),
            0b10 => Some(DmaMode::Fill),
            0b11 => Some(DmaMode::Copy),
            _ => None,
        }
    }

    /// Select which region of 68000 address space the DMA source word
    /// address (a 22-bit register value, in words) lives in. Only `Rom`
    /// and `M68kRam` are backed by a real host read in this core; the
    /// rest exist so the dispatch in `dma::read_source_word` is
    /// exhaustive over the documented `DMA_Src_t` banks (section 4.4).
    pub fn dma_source_kind(&self) -> DmaSource {
        match self.dma_src_addr_reg() >> 17 {
            0b10000 => DmaSource::SegaCdProgramRam,
            0b10001..=0b10011 => DmaSource::SegaCdWordRam2M,
            0b10100..=0b10111 => DmaSource::SegaCdWordRam1M,
            0b11100..=0b11111 => DmaSource::M68kRam,
            _ => DmaSource::Rom,
        }
    }

    pub fn dma_enabled(&self) -> bool {
        self.state.reg[1] & 0b0001_0000 != 0
    }

    /// Dispatch a single register write, reacting to whichever register
    /// changed (section 4.3). Register numbers 24 and above are silently
    /// dropped, matching real hardware; in non-Mode-5 modes only 0-10 are
    /// wired, but this core only targets Mode 5, so every index 0-23 is
    /// honored.
    pub fn set_register(&mut self, index: u8, value: u8) {
        let index = index as usize;
        if index >= super::REGISTER_COUNT {
            return;
        }
        self.state.reg[index] = value;

        match index {
            0 | 1 => {
                self.update_irq_line();
            }
            7 => {
                self.palette.mark_fully_dirty();
            }
            12 => {
                self.palette.mark_fully_dirty();
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_defaults_match_hardware() {
        let vdp = Vdp::default();
        assert_eq!(vdp.reg(0), 0x04);
        assert_eq!(vdp.reg(1), 0x04);
        assert_eq!(vdp.reg(15), 0x02);
        for i in 2..super::super::REGISTER_COUNT {
            if i == 15 {
                continue;
            }
            assert_eq!(vdp.reg(i), 0, "register {} should reset to 0", i);
        }
        assert!(vdp.is_mode_5());
        assert!(!vdp.display_enabled());
    }

    #[test]
    fn dbg_set_get_register_round_trips() {
        let mut vdp = Vdp::default();
        for i in 0..super::super::REGISTER_COUNT as u8 {
            vdp.set_register(i, i.wrapping_mul(7).wrapping_add(3));
        }
        for i in 0..super::super::REGISTER_COUNT as u8 {
            assert_eq!(vdp.reg(i as usize), i.wrapping_mul(7).wrapping_add(3));
        }
    }

    #[test]
    fn register_write_out_of_range_is_dropped() {
        let mut vdp = Vdp::default();
        vdp.set_register(200, 0xFF);
    }

    #[test]
    fn h_scroll_mask_table_matches_original_source() {
        let mut vdp = Vdp::default();
        vdp.set_register(11, 0b00);
        assert_eq!(vdp.h_scroll_mask(), 0x00);
        vdp.set_register(11, 0b01);
        assert_eq!(vdp.h_scroll_mask(), 0x07);
        vdp.set_register(11, 0b10);
        assert_eq!(vdp.h_scroll_mask(), 0xF8);
        vdp.set_register(11, 0b11);
        assert_eq!(vdp.h_scroll_mask(), 0xFF);
    }

    #[test]
    fn basic_register_write_scenario() {
        // Scenario 1: write 0x8174 to control port selects reg 1 = 0x74.
        let mut vdp = Vdp::default();
        vdp.set_register(1, 0x74);
        assert_eq!(vdp.reg(1), 0x74);
        assert!(vdp.is_mode_5());
        assert!(vdp.display_enabled());
        assert!(vdp.vint_enabled());
    }
}
