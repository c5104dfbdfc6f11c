// Copyright 2017 Michael Benfield <mike.benfield@gmail.com>
// This file is part of Attalus. You may distribute and/or modify Attalus under
// the terms of the GNU General Public License as published by the Free Sofware
// Foundation, either version 3 of the license or (at your option) any later
// version. You should have received a copy of the GNU General Public License
// along with Attalus. If not, see <http://www.gnu.org/licenses/>.

//! The scanline compositor (Mode 5) and the color-bars error renderer for
//! every other mode. `render_line` is the single entry point a host
//! calls once per visible scanline; it dispatches on the decoded mode
//! bits the way `SPEC_FULL.md` section 4.8 describes.

use super::{HSize, LinePixel, PixelFlags, Vdp, LINE_BUFFER_WIDTH};

/// One row of an RGB888 framebuffer, provided by the host and at least
/// `HSize::active_pixels()` + border wide.
pub type FrameRow<'a> = &'a mut [[u8; 3]];

impl Vdp {
    /// Render one scanline, dispatching to the Mode 5 compositor or the
    /// error renderer depending on the decoded mode bits.
    pub fn render_line(&mut self, line: u16, out: FrameRow) {
        if self.is_mode_5() {
            self.render_line_mode5(line, out);
        } else {
            self.render_error_line(out);
        }
    }

    fn render_line_mode5(&mut self, line: u16, out: FrameRow) {
        // With the option off, any dirty palette is rebuilt the instant it's
        // needed. With it on, rebuilds are deferred to the border rows
        // (section 4.5's documented "mid-active-display CRAM writes don't
        // visibly update until the next blanking period" behavior).
        let in_blanking = line >= self.v_size().active_lines();
        if self.palette.is_dirty() && (!self.options.update_palette_in_vblank_only || in_blanking) {
            let cram = self.state.cram;
            self.palette.update(&cram);
            self.palette.apply_background_override(self.background_color_index());
        }

        let mut buffer = [LinePixel::default(); LINE_BUFFER_WIDTH];
        let sh_enabled = self.shadow_highlight_enabled();
        if sh_enabled {
            for p in buffer.iter_mut() {
                p.flags.insert(PixelFlags::SHADOW);
            }
        }

        self.draw_scroll_b(line, &mut buffer);
        self.draw_scroll_a_and_window(line, &mut buffer);
        self.draw_sprites(line, &mut buffer);

        self.expand_to_framebuffer(&buffer, out);
    }

    fn tile_row_pattern(&self, tile_index: u16, row: u8, v_flip: bool, h40_extra: u16) -> u32 {
        let effective_row = if v_flip { 7 - row } else { row };
        let tile_addr = (tile_index as u32 + h40_extra as u32) * 32 + effective_row as u32 * 4;
        let a = tile_addr as usize & (super::VRAM_CAPACITY - 1);
        (self.state.vram[a] as u32) << 24
            | (self.state.vram[a + 1] as u32) << 16
            | (self.state.vram[a + 2] as u32) << 8
            | self.state.vram[a + 3] as u32
    }

    fn draw_scroll_b(&mut self, line: u16, buffer: &mut [LinePixel; LINE_BUFFER_WIDTH]) {
        let h_cells = self.h_size().cells();
        let base = self.scroll_b_base();
        let h_scroll = self.h_scroll_value(line, 1);
        let (_, _, v_mask) = self.scroll_size();
        let sh_enabled = self.shadow_highlight_enabled();

        for cell in 0..h_cells {
            let x_scrolled = (cell as i32 * 8) - h_scroll as i32;
            let x_cell = (x_scrolled.div_euclid(8)) as i32;
            let fine_x = x_scrolled.rem_euclid(8);
            let v_scroll = self.v_scroll_value(1, x_cell) as i32;
            let y = line as i32 + v_scroll;
            let y_cell = y.div_euclid(8) & v_mask as i32;
            let fine_y = (y.rem_euclid(8)) as u8;

            let (h_shift, h_mask, _) = self.scroll_size();
            let nt_col = (x_cell & h_mask as i32) as u32;
            let nt_row = y_cell as u32;
            let nt_addr = base + ((nt_row << h_shift) + nt_col) * 2;
            let word = self.nametable_word(nt_addr);

            self.draw_tile_cell(buffer, cell as i32 * 8 - fine_x, word, fine_y, false, sh_enabled);
        }
    }

    fn nametable_word(&self, addr: u32) -> u16 {
        let a = addr as usize & (super::VRAM_CAPACITY - 1);
        (self.state.vram[a] as u16) << 8 | self.state.vram[a + 1] as u16
    }

    fn h_scroll_value(&self, line: u16, plane: u8) -> u16 {
        let base = self.h_scroll_base();
        let mask = self.h_scroll_mask();
        let row = (line & mask) as u32;
        let offset = base + row * 4 + if plane == 0 { 0 } else { 2 };
        self.nametable_word(offset) & 0x3FF
    }

    /// `cell_cur` is the nametable column the scrolled fetch landed on,
    /// *before* masking to the plane's valid range, and may be negative or
    /// `>= 40` (2-cell VScroll combined with HScroll can walk off either
    /// edge). Full-scroll mode ignores it entirely. Out-of-range columns
    /// only arise in 2-cell mode, where real hardware either reproduces the
    /// documented VScroll bug or, with emulation of it disabled, falls back
    /// to column 0's value.
    fn v_scroll_value(&self, plane: u8, cell_cur: i32) -> u16 {
        if self.v_scroll_full() {
            return self.state.vsram[plane as usize] & 0x3FF;
        }

        let cell_cur = if cell_cur < 0 || cell_cur >= 40 {
            if self.options.vscroll_bug {
                let bugged = if self.h_size() == HSize::H40 {
                    self.state.vsram[38] & self.state.vsram[39]
                } else {
                    0
                };
                return bugged & 0x3FF;
            }
            0
        } else {
            cell_cur
        };

        let idx = (cell_cur & !1) as usize + plane as usize;
        if idx < super::VSRAM_ENTRIES {
            self.state.vsram[idx] & 0x3FF
        } else {
            0
        }
    }

    fn draw_tile_cell(
        &self,
        buffer: &mut [LinePixel; LINE_BUFFER_WIDTH],
        start_x: i32,
        word: u16,
        fine_y: u8,
        window: bool,
        sh_enabled: bool,
    ) {
        let tile_index = word & 0x07FF;
        let h_flip = word & 0x0800 != 0;
        let v_flip = word & 0x1000 != 0;
        let palette = ((word >> 13) & 0b11) as u8;
        let priority = word & 0x8000 != 0;

        let pattern = self.tile_row_pattern(tile_index, fine_y, v_flip, 0);

        for px in 0..8i32 {
            let col = if h_flip { 7 - px } else { px };
            let shift = (7 - col) * 4;
            let index = ((pattern >> shift) & 0xF) as u8;
            if index == 0 {
                continue;
            }

            let x = start_x + px;
            if x < 0 || x as usize >= LINE_BUFFER_WIDTH {
                continue;
            }
            let x = x as usize;

            let existing = buffer[x];
            if priority || !existing.flags.contains(PixelFlags::PRIORITY) {
                let mut flags = PixelFlags::empty();
                if priority {
                    flags.insert(PixelFlags::PRIORITY);
                }
                if window {
                    flags.insert(PixelFlags::WINDOW);
                }
                if sh_enabled {
                    flags.insert(PixelFlags::SHADOW);
                }
                buffer[x] = LinePixel {
                    index: palette * 16 + index,
                    flags,
                };
            }
        }
    }

    fn draw_scroll_a_and_window(&mut self, line: u16, buffer: &mut [LinePixel; LINE_BUFFER_WIDTH]) {
        let h_cells = self.h_size().cells();
        let (win_x, win_right) = self.window_h_pos();
        let (win_y, win_bottom) = self.window_v_pos();
        let win_col_boundary = win_x as u16 * 2;
        let win_row_boundary = win_y as u16 * 2;

        let row_in_window = if win_bottom {
            line >= win_row_boundary
        } else {
            line < win_row_boundary
        };

        let window_base = self.window_base();
        let scroll_a_base = self.scroll_a_base();
        let h_scroll = self.h_scroll_value(line, 0);
        let (h_shift, h_mask, v_mask) = self.scroll_size();
        let sh_enabled = self.shadow_highlight_enabled();

        for cell in 0..h_cells {
            let in_window = row_in_window
                && if win_right {
                    cell >= win_col_boundary
                } else {
                    cell < win_col_boundary
                };

            if in_window {
                let nt_addr = window_base + (line / 8) as u32 * self.window_row_stride() + cell as u32 * 2;
                let word = self.nametable_word(nt_addr);
                self.draw_tile_cell(buffer, cell as i32 * 8, word, (line % 8) as u8, true, sh_enabled);
            } else {
                let x_scrolled = (cell as i32 * 8) - h_scroll as i32;
                let x_cell = x_scrolled.div_euclid(8);
                let fine_x = x_scrolled.rem_euclid(8);
                let v_scroll = self.v_scroll_value(0, x_cell) as i32;
                let y = line as i32 + v_scroll;
                let y_cell = y.div_euclid(8) & v_mask as i32;
                let fine_y = (y.rem_euclid(8)) as u8;

                let nt_col = (x_cell & h_mask as i32) as u32;
                let nt_addr = scroll_a_base + ((y_cell as u32) << h_shift) * 2 + nt_col * 2;
                let word = self.nametable_word(nt_addr);
                self.draw_tile_cell(
                    buffer,
                    cell as i32 * 8 - fine_x,
                    word,
                    fine_y,
                    false,
                    sh_enabled,
                );
            }
        }
    }

    /// Bytes between successive rows of the window nametable: one word per
    /// column, 64 columns in H40 (`H_Win_Shift` 6) but only 32 in H32
    /// (`H_Win_Shift` 5).
    fn window_row_stride(&self) -> u32 {
        if self.h_size() == HSize::H40 {
            128
        } else {
            64
        }
    }

    fn draw_sprites(&mut self, line: u16, buffer: &mut [LinePixel; LINE_BUFFER_WIDTH]) {
        let parity = (line & 1) as usize;
        self.update_sprite_cache(line.wrapping_add(1), parity ^ 1);

        let read_parity = parity;
        let count = self.state.sprite_cache_count[read_parity] as usize;
        let sh_enabled = self.shadow_highlight_enabled();

        let mut collision = false;

        for i in 0..count {
            let entry = self.state.sprite_cache[read_parity][i];
            let cells = entry.width_cells as i32;
            let v_cells = entry.v_cells as u16;
            let tile_row = (entry.row_in_sprite / 8) as u16;
            let fine_row = entry.row_in_sprite % 8;

            for cell in 0..cells {
                let effective_cell = if entry.h_flip { cells - 1 - cell } else { cell };
                // Sprite tiles are laid out column-major in the pattern
                // table: column `effective_cell`'s tiles start `v_cells`
                // tiles after the previous column's.
                let tile_index = entry.pattern_base / 32 + effective_cell as u16 * v_cells + tile_row;
                let pattern = self.tile_row_pattern(tile_index, fine_row, false, 0);

                for px in 0..8i32 {
                    let col = if entry.h_flip { 7 - px } else { px };
                    let shift = (7 - col) * 4;
                    let index = ((pattern >> shift) & 0xF) as u8;
                    if index == 0 {
                        continue;
                    }

                    let x = entry.x as i32 + cell * 8 + px;
                    if x < 0 || x as usize >= LINE_BUFFER_WIDTH {
                        continue;
                    }
                    let x = x as usize;

                    let existing = buffer[x];
                    if existing.flags.contains(PixelFlags::SPRITE) {
                        collision = true;
                        continue;
                    }
                    if existing.flags.contains(PixelFlags::PRIORITY) && !entry.priority {
                        continue;
                    }

                    if sh_enabled && entry.palette == 3 && (index == 14 || index == 15) {
                        let mut flags = existing.flags;
                        if index == 14 {
                            flags.insert(PixelFlags::HIGHLIGHT);
                        } else {
                            flags.insert(PixelFlags::SHADOW);
                        }
                        flags.insert(PixelFlags::SPRITE_OPERATOR);
                        buffer[x].flags = flags;
                        continue;
                    }

                    let mut flags = PixelFlags::empty();
                    flags.insert(PixelFlags::SPRITE);
                    if entry.priority {
                        flags.insert(PixelFlags::PRIORITY);
                    }
                    buffer[x] = LinePixel {
                        index: entry.palette * 16 + index,
                        flags,
                    };
                }
            }
        }

        if collision {
            self.state.status.insert(super::StatusFlags::COLLISION);
        }
    }

    fn expand_to_framebuffer(&self, buffer: &[LinePixel; LINE_BUFFER_WIDTH], out: FrameRow) {
        let active = self.h_size().active_pixels() as usize;
        let border_total = out.len().saturating_sub(active);
        let border_left = border_total / 2;

        let bg_color = self.background_palette_color();

        for (x, slot) in out.iter_mut().enumerate() {
            if x < border_left || x >= border_left + active {
                *slot = if self.options.border_color_emulation {
                    bg_color
                } else {
                    [0, 0, 0]
                };
                continue;
            }

            let buf_index = x - border_left;
            let pixel = buffer[buf_index];
            *slot = self.resolve_color(pixel);
        }
    }

    fn background_palette_color(&self) -> [u8; 3] {
        self.palette.active[self.background_color_index() as usize]
    }

    fn resolve_color(&self, pixel: LinePixel) -> [u8; 3] {
        let base = pixel.index as usize;
        if pixel.flags.contains(PixelFlags::HIGHLIGHT) && pixel.flags.contains(PixelFlags::SHADOW) {
            self.palette.active[base]
        } else if pixel.flags.contains(PixelFlags::HIGHLIGHT) {
            self.palette.active[super::CRAM_ENTRIES * 2 + base]
        } else if pixel.flags.contains(PixelFlags::SHADOW) {
            self.palette.active[super::CRAM_ENTRIES + base]
        } else {
            self.palette.active[base]
        }
    }

    /// Modes 0-4 and the invalid M1+M2 combination: fill with SMPTE-style
    /// color bars rather than attempt a faithful legacy render (section
    /// 4.8). This crate's scope is Mode 5 only.
    fn render_error_line(&self, out: FrameRow) {
        log_minor!("VDP not in Mode 5 (mode bits {:?}); showing color bars", self.mode_bits());

        const BARS: [[u8; 3]; 7] = [
            [192, 192, 192],
            [192, 192, 0],
            [0, 192, 192],
            [0, 192, 0],
            [192, 0, 192],
            [192, 0, 0],
            [0, 0, 192],
        ];
        let width = out.len();
        let bar_width = (width / BARS.len()).max(1);
        for (x, slot) in out.iter_mut().enumerate() {
            *slot = BARS[(x / bar_width).min(BARS.len() - 1)];
        }
    }
}
