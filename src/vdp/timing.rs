// Copyright 2017 Michael Benfield <mike.benfield@gmail.com>
// This file is part of Attalus. You may distribute and/or modify Attalus under
// the terms of the GNU General Public License as published by the Free Sofware
// Foundation, either version 3 of the license or (at your option) any later
// version. You should have received a copy of the GNU General Public License
// along with Attalus. If not, see <http://www.gnu.org/licenses/>.

//! H/V counters, interrupt assertion, and frame/line bookkeeping.

use host::{HostInterface, IrqLevel};

use super::{StatusFlags, TvSystem, Vdp, VSize};

impl Vdp {
    pub fn total_lines(&self, tv: TvSystem) -> u16 {
        match tv {
            TvSystem::Ntsc => 262,
            TvSystem::Pal => 312,
        }
    }

    /// How many of `total_lines` are border, top and bottom together.
    pub fn border_lines(&self, tv: TvSystem) -> u16 {
        let visible = match self.v_size() {
            VSize::V28 => 224,
            VSize::V30 => 240,
        };
        self.total_lines(tv) - visible
    }

    /// Re-evaluate whether HINT/VINT should currently be asserted, given
    /// their enable bits and pending flags, and tell the host accordingly.
    /// Called whenever a register write could have flipped an enable bit,
    /// and whenever a pending flag itself changes.
    pub fn update_irq_line(&mut self) {
        let vint_active = self.vint_enabled() && self.state.vint_line_asserted;
        let hint_active = self.hint_enabled() && self.state.hint_line_asserted;

        if !vint_active {
            self.state.vint_line_asserted = false;
        }
        if !hint_active {
            self.state.hint_line_asserted = false;
        }
    }

    /// Raise VINT (level 6) through the host, tracking `status.F` and the
    /// pending flag that `ack_irq` will later clear.
    pub fn raise_vint<H: HostInterface>(&mut self, host: &mut H) {
        if self.vint_enabled() {
            self.state.status.insert(StatusFlags::F);
            self.state.vint_line_asserted = true;
            host.raise_irq(IrqLevel::VInt);
        }
    }

    pub fn ack_vint<H: HostInterface>(&mut self, host: &mut H) -> u8 {
        self.state.status.remove(StatusFlags::F);
        self.state.vint_line_asserted = false;
        host.ack_irq(IrqLevel::VInt)
    }

    /// Raise HINT (level 4) through the host.
    pub fn raise_hint<H: HostInterface>(&mut self, host: &mut H) {
        if self.hint_enabled() {
            self.state.hint_line_asserted = true;
            host.raise_irq(IrqLevel::HInt);
        }
    }

    pub fn ack_hint<H: HostInterface>(&mut self, host: &mut H) -> u8 {
        self.state.hint_line_asserted = false;
        host.ack_irq(IrqLevel::HInt)
    }

    /// Decrement the HINT counter once per scanline through the active
    /// display and top border; on underflow, reload from register 10 and
    /// fire HINT. Returns true if HINT fired this call.
    pub fn decrement_hint_counter<H: HostInterface>(&mut self, host: &mut H) -> bool {
        if self.state.hint_counter == 0 {
            self.state.hint_counter = self.hint_reload();
            self.raise_hint(host);
            true
        } else {
            self.state.hint_counter -= 1;
            false
        }
    }

    /// Begin a new frame: toggle `ODD` if interlacing, else clear it;
    /// reload the HINT counter; clear VBLANK. Called by the host once per
    /// frame, before the first line is rendered.
    pub fn start_frame(&mut self) {
        if self.interlace_mode() != super::InterlaceMode::Off {
            self.state.status.toggle(StatusFlags::ODD);
        } else {
            self.state.status.remove(StatusFlags::ODD);
        }
        self.state.hint_counter = self.hint_reload();
        self.state.status.remove(StatusFlags::VBLANK);
        self.state.line = 0;
    }

    /// Advance the line counter and update HBLANK/VBLANK status bits for
    /// the line the host is about to render, firing VINT on the frame's
    /// first post-active line.
    pub fn advance_line<H: HostInterface>(&mut self, host: &mut H) {
        let active_lines = self.v_size().active_lines();
        if self.state.line == active_lines {
            self.state.status.insert(StatusFlags::VBLANK);
            self.raise_vint(host);
        }
        self.state.line = self.state.line.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use host::NullHost;

    #[test]
    fn hint_reload_scenario() {
        // Scenario 4: reg 10 = 0x07; after 8 reload-decrements HINT fires
        // and the counter reloads to 7.
        let mut vdp = Vdp::default();
        vdp.set_register(0, vdp.reg(0) | 0b0001_0000); // IE1 (HINT enable)
        vdp.set_register(10, 0x07);
        let mut host = NullHost::new(3420);

        let mut fired_on = None;
        for i in 1..=8 {
            if vdp.decrement_hint_counter(&mut host) {
                fired_on = Some(i);
                break;
            }
        }

        assert_eq!(fired_on, Some(8));
        assert_eq!(vdp.state.hint_counter, 7);
        assert!(host.hint_asserted);
    }

    #[test]
    fn interlace_im2_toggles_odd_bit_each_frame() {
        // Scenario 5: with IM2 selected, ODD toggles every startFrame().
        let mut vdp = Vdp::default();
        vdp.set_register(12, 0b0000_0110);
        assert_eq!(vdp.interlace_mode(), super::super::InterlaceMode::Im2);

        vdp.start_frame();
        let first = vdp.state.status.contains(StatusFlags::ODD);
        vdp.start_frame();
        let second = vdp.state.status.contains(StatusFlags::ODD);

        assert_ne!(first, second);
    }

    #[test]
    fn no_interlace_clears_odd_bit() {
        let mut vdp = Vdp::default();
        vdp.state.status.insert(StatusFlags::ODD);
        vdp.start_frame();
        assert!(!vdp.state.status.contains(StatusFlags::ODD));
    }
}
