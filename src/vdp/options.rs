// Copyright 2017 Michael Benfield <mike.benfield@gmail.com>
// This file is part of Attalus. You may distribute and/or modify Attalus under
// the terms of the GNU General Public License as published by the Free Sofware
// Foundation, either version 3 of the license or (at your option) any later
// version. You should have received a copy of the GNU General Public License
// along with Attalus. If not, see <http://www.gnu.org/licenses/>.

//! Host-chosen configuration: which hardware quirks and bugs to emulate.
//!
//! This is deliberately not part of `VdpState` (see `SPEC_FULL.md` section
//! 6): it is a policy the host picks once, not a byte a game can read back,
//! so it has no business surviving in a savestate diff.

/// Toggles for documented hardware behaviors that a host may want to turn
/// off, either because it is emulating a clone/FPGA reimplementation that
/// fixed the quirk, or because it wants stricter-than-hardware semantics
/// for debugging a homebrew ROM.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct VdpOptions {
    /// Enforce the real per-line sprite and sprite-pixel limits. Disabling
    /// this lifts them, which no real console can do but which is
    /// convenient when debugging sprite placement.
    pub sprite_limits: bool,
    /// Whether a DMA started with a word count of 0 should be treated as a
    /// transfer of 0x10000 words (the documented "wraps to the maximum"
    /// behavior) or a genuine no-op.
    pub zero_length_dma: bool,
    /// Emulate the documented VScroll bug: when 2-cell VScroll is combined
    /// with HScroll such that the fetch lands on a nametable column outside
    /// 0..40, real hardware returns VSRAM[38] & VSRAM[39] in H40 or a fixed
    /// 0 in H32, rather than simply clamping to column 0.
    pub vscroll_bug: bool,
    /// Whether the border color honors register 7 continuously or only
    /// the value present at the start of the active display (a detail
    /// that does not affect any visible Mode 5 software but which some
    /// test ROMs probe).
    pub border_color_emulation: bool,
    /// Apply the documented NTSC V30 "rolling picture" defect: in V30 mode
    /// on an NTSC system the extra 16 lines are not blanked so the image
    /// rolls. PAL systems have the lines to spare and never roll.
    pub ntsc_v30_rolling: bool,
    /// Only recompute the palette cache during VBlank, matching a
    /// real console's CRAM-to-DAC latency, rather than eagerly on every
    /// CRAM write.
    pub update_palette_in_vblank_only: bool,
    /// Permit `InterlaceMode::Im2`. Clearing this forces interlace mode 2
    /// to behave as interlace mode 1, for hosts that cannot present an
    /// interlaced framebuffer.
    pub enable_interlaced_mode: bool,
}

impl Default for VdpOptions {
    /// Matches real Mega Drive / Genesis hardware.
    fn default() -> VdpOptions {
        VdpOptions {
            sprite_limits: true,
            zero_length_dma: true,
            vscroll_bug: true,
            border_color_emulation: true,
            ntsc_v30_rolling: true,
            update_palette_in_vblank_only: false,
            enable_interlaced_mode: true,
        }
    }
}
