// Copyright 2017 Michael Benfield <mike.benfield@gmail.com>
// This file is part of Attalus. You may distribute and/or modify Attalus under
// the terms of the GNU General Public License as published by the Free Sofware
// Foundation, either version 3 of the license or (at your option) any later
// version. You should have received a copy of the GNU General Public License
// along with Attalus. If not, see <http://www.gnu.org/licenses/>.

//! The three DMA transfer types and their per-line timing.

use host::HostInterface;

use super::ports::AccessKind;
use super::{DmaMode, DmaSource, HSize, StatusFlags, Vdp};

/// Words per scanline, indexed by `[h40][active_display]`.
fn rate_table(mode: DmaMode) -> [[u32; 2]; 2] {
    match mode {
        DmaMode::MemoryToVram => [[8, 83], [9, 102]],
        DmaMode::Fill => [[15, 166], [17, 204]],
        DmaMode::Copy => [[8, 83], [9, 102]],
    }
    // rows for CRAM/VSRAM external writes (16/18 active, 167/205 blanking)
    // are applied directly in `per_line_quota` since they share
    // `MemoryToVram`'s mode tag but a different rate.
}

impl Vdp {
    /// Invoked when a control-word pair sets the DMA-armed bit (CD5).
    /// Reads the DMA-mode/source/length registers and either starts a
    /// FILL/COPY immediately or arms external-memory DMA to run on the
    /// next data-port write... actually MemoryToVram runs immediately
    /// here, matching the original's "DMA executes synchronously" model.
    pub fn arm_dma<H: HostInterface>(&mut self, host: &mut H) {
        let mode = match self.dma_mode_bits() {
            Some(m) => m,
            None => {
                log_fault!(
                    "DMA armed with unsupported mode bits in register 23 ({:#04X}); ignoring",
                    self.state.reg[23]
                );
                return;
            }
        };

        self.state.dma_mode = Some(mode);
        self.state.dma_source = self.dma_source_kind();
        self.state.dma_src_addr = self.dma_src_addr_reg();
        self.state.dma_words_remaining = self.dma_length();
        self.state.status.insert(StatusFlags::DMA);

        match mode {
            DmaMode::MemoryToVram => self.run_memory_to_vram_dma(host),
            DmaMode::Copy => self.run_copy_dma(),
            DmaMode::Fill => {
                // Waits for the data-port write that supplies the fill
                // word; see `ports::write_data`.
            }
        }
    }

    fn dma_write_word(&mut self, word: u16) {
        match self.access_kind() {
            AccessKind::VramWrite => {
                let addr = self.state.address;
                self.write_vram_word_for_dma(addr, word);
            }
            AccessKind::CramWrite => {
                // Raw address check, not the `& 0x7E`-masked index (see
                // `ports::write_data`).
                if self.state.address < 0x80 {
                    let idx = (self.state.address & 0x7E) as usize / 2;
                    self.state.cram[idx] = word & 0x0EEE;
                    self.palette.mark_fully_dirty();
                }
            }
            AccessKind::VsramWrite => {
                let idx = ((self.state.address & 0x7E) / 2) as usize;
                if idx < super::VSRAM_ENTRIES {
                    self.state.vsram[idx] = word & 0x03FF;
                }
            }
            _ => {
                log_fault!("DMA write with unsupported access code {:#04X}; dropped", self.state.code);
            }
        }
        let inc = self.auto_increment();
        self.state.address = (self.state.address + inc) & self.vram_mask();
    }

    fn write_vram_word_for_dma(&mut self, addr: u32, word: u16) {
        let a = (addr & !1) as usize & (super::VRAM_CAPACITY - 1);
        let word = if addr & 1 != 0 { word.swap_bytes() } else { word };
        self.state.vram[a] = (word >> 8) as u8;
        self.state.vram[a + 1] = word as u8;

        let base = self.sat_base();
        if a as u32 >= base && (a as u32) < base + super::SAT_SHADOW_BYTES as u32 {
            let offset = (a as u32 - base) as usize;
            if offset < super::SAT_SHADOW_BYTES {
                self.state.sat_shadow[offset] = self.state.vram[a];
                if offset + 1 < super::SAT_SHADOW_BYTES {
                    self.state.sat_shadow[offset + 1] = self.state.vram[a + 1];
                }
            }
        }
    }

    /// Read one word from the named source, wrapping within the 128 KiB
    /// segment the address started in (the documented "DMA wrap" bug).
    fn read_source_word<H: HostInterface>(&self, host: &mut H, addr: u32) -> u16 {
        match self.state.dma_source {
            DmaSource::Rom | DmaSource::M68kRam => host.read_word(addr),
            DmaSource::SegaCdProgramRam
            | DmaSource::SegaCdWordRam2M
            | DmaSource::SegaCdWordRam1M => 0,
        }
    }

    fn run_memory_to_vram_dma<H: HostInterface>(&mut self, host: &mut H) {
        let segment_base = self.state.dma_src_addr & !0xFFFF;
        let mut src = self.state.dma_src_addr;

        for _ in 0..self.state.dma_words_remaining {
            let word = self.read_source_word(host, src);
            self.dma_write_word(word);

            let within_segment = (src.wrapping_add(1)) & 0xFFFF;
            src = segment_base | within_segment;
        }

        self.state.dma_src_addr = src;
        self.finish_dma();
    }

    fn run_copy_dma(&mut self) {
        let mut src = self.state.dma_src_addr;

        for _ in 0..self.state.dma_words_remaining {
            let byte = self.state.vram[src as usize & (super::VRAM_CAPACITY - 1)];
            let addr = self.state.address;
            let a = addr as usize & (super::VRAM_CAPACITY - 1);
            self.state.vram[a] = byte;
            self.refresh_sat_shadow_byte(a as u32);

            let inc = self.auto_increment();
            self.state.address = (addr + inc) & self.vram_mask();
            src = src.wrapping_add(1) & 0xFFFF;
        }

        self.state.dma_src_addr = src;
        self.finish_dma();
    }

    fn refresh_sat_shadow_byte(&mut self, addr: u32) {
        let base = self.sat_base();
        if addr >= base && addr < base + super::SAT_SHADOW_BYTES as u32 {
            let offset = (addr - base) as usize;
            self.state.sat_shadow[offset] = self.state.vram[addr as usize & (super::VRAM_CAPACITY - 1)];
        }
    }

    /// Called by `write_data` when a data-port write arrives while a FILL
    /// DMA is armed: the written word supplies the fill seed.
    pub fn run_fill_dma(&mut self, seed: u16) {
        let fill_byte = (seed >> 8) as u8;

        for _ in 0..self.state.dma_words_remaining {
            match self.access_kind() {
                AccessKind::VramWrite => {
                    let a = self.state.address as usize & (super::VRAM_CAPACITY - 1);
                    self.state.vram[a ^ 1] = fill_byte;
                    self.refresh_sat_shadow_byte((a ^ 1) as u32);
                }
                AccessKind::CramWrite => {
                    // Raw address check, not the `& 0x7E`-masked index.
                    if self.state.address < 0x80 {
                        let idx = (self.state.address & 0x7E) as usize / 2;
                        self.state.cram[idx] = seed & 0x0EEE;
                        self.palette.mark_fully_dirty();
                    }
                }
                AccessKind::VsramWrite => {
                    let idx = ((self.state.address & 0x7E) / 2) as usize;
                    if idx < super::VSRAM_ENTRIES {
                        self.state.vsram[idx] = seed & 0x03FF;
                    }
                }
                _ => {}
            }

            let inc = self.auto_increment();
            self.state.address = (self.state.address + inc) & self.vram_mask();
            self.state.dma_src_addr = self.state.dma_src_addr.wrapping_add(1) & 0xFFFF;
        }

        self.finish_dma();
    }

    fn finish_dma(&mut self) {
        self.state.dma_words_remaining = 0;
        self.state.dma_mode = None;
        self.state.status.remove(StatusFlags::DMA);
        self.state.code &= !0b0010_0000;
    }

    fn per_line_quota(&self, active_display: bool) -> u32 {
        let mode = match self.state.dma_mode {
            Some(m) => m,
            None => return 0,
        };
        let h40 = self.h_size() == HSize::H40;
        let row = rate_table(mode)[h40 as usize];
        let is_cram_vsram = mode == DmaMode::MemoryToVram
            && match self.access_kind() {
                AccessKind::CramWrite | AccessKind::VsramWrite => true,
                _ => false,
            };

        if is_cram_vsram {
            if active_display {
                if h40 { 18 } else { 16 }
            } else if h40 {
                205
            } else {
                167
            }
        } else if active_display {
            row[0]
        } else {
            row[1]
        }
    }

    /// Called once per emulated scanline by the host. Already-completed
    /// (synchronous) DMAs have nothing left to do here except report the
    /// number of 68000 cycles to steal for the portion of this line's
    /// transfer that real hardware would still be mid-flight for.
    pub fn update_dma<H: HostInterface>(&mut self, host: &mut H, active_display: bool) -> u32 {
        if self.state.dma_words_remaining == 0 {
            return 0;
        }

        let quota = self.per_line_quota(active_display).max(1);
        let steal_fraction = self.state.dma_words_remaining.min(quota);
        self.state.dma_words_remaining -= steal_fraction;

        if self.state.dma_words_remaining == 0 {
            self.finish_dma();
        }

        let cpl = host.cycles_per_line();
        (steal_fraction as u64 * cpl as u64 / quota.max(1) as u64) as u32
    }
}
