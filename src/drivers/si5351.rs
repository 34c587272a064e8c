//! `Si5351A` Clock Synthesizer Driver
//!
//! CLK0 is the VFO: the operating frequency while transmitting, the
//! operating frequency plus the IF while receiving. CLK2 is the BFO at
//! the IF. Each runs from its own PLL so retuning the VFO never
//! disturbs the BFO.
//!
//! [`Synthesizer`] calls only update a shadow register map;
//! [`Si5351::flush`] writes the registers that changed.

use embedded_hal_async::i2c::I2c;

use crate::config::SI5351_XTAL_FREQ;
use crate::hal::i2c::{I2cAddress, I2cBus, RegisterMap};
use crate::radio::synth::{corrected_xtal, plan, Divider, SynthPlan};
use crate::radio::Synthesizer;
use crate::types::Frequency;

/// `Si5351A` register addresses
mod reg {
    pub const DEVICE_STATUS: u8 = 0;
    pub const OUTPUT_ENABLE: usize = 3;
    pub const CLK0_CONTROL: usize = 16;
    pub const CLK1_CONTROL: usize = 17;
    pub const CLK2_CONTROL: usize = 18;
    pub const PLLA_PARAMS: usize = 26;
    pub const PLLB_PARAMS: usize = 34;
    pub const MS0_PARAMS: usize = 42;
    pub const MS2_PARAMS: usize = 58;
    pub const PLL_RESET: usize = 177;
    pub const CRYSTAL_LOAD: usize = 183;
    pub const COUNT: usize = 184;
}

/// Clock control: powered up, integer mode, multisynth source, 8 mA
const CLK_ON: u8 = 0x4F;
/// Clock control: source is PLL B
const CLK_PLLB: u8 = 0x20;
/// Clock control: powered down
const CLK_OFF: u8 = 0x80;
/// PLL reset bits
const RESET_PLLA: u8 = 0x20;
const RESET_PLLB: u8 = 0x80;

/// Crystal load capacitance
#[derive(Clone, Copy, Debug, Default)]
pub enum CrystalLoad {
    /// 6 pF load
    Load6pF,
    /// 8 pF load
    Load8pF,
    /// 10 pF load
    #[default]
    Load10pF,
}

impl CrystalLoad {
    const fn as_reg(self) -> u8 {
        // Low bits are reserved and must read back 0b010010
        let reserved = 0b0001_0010;
        match self {
            Self::Load6pF => 0b0100_0000 | reserved,
            Self::Load8pF => 0b1000_0000 | reserved,
            Self::Load10pF => 0b1100_0000 | reserved,
        }
    }
}

/// One synthesizer output and the PLL behind it
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Output {
    Vfo,
    Bfo,
}

impl Output {
    const fn pll_base(self) -> usize {
        match self {
            Self::Vfo => reg::PLLA_PARAMS,
            Self::Bfo => reg::PLLB_PARAMS,
        }
    }

    const fn ms_base(self) -> usize {
        match self {
            Self::Vfo => reg::MS0_PARAMS,
            Self::Bfo => reg::MS2_PARAMS,
        }
    }

    const fn control(self) -> (usize, u8) {
        match self {
            Self::Vfo => (reg::CLK0_CONTROL, CLK_ON),
            Self::Bfo => (reg::CLK2_CONTROL, CLK_ON | CLK_PLLB),
        }
    }

    const fn reset_bit(self) -> u8 {
        match self {
            Self::Vfo => RESET_PLLA,
            Self::Bfo => RESET_PLLB,
        }
    }
}

/// `Si5351A` driver
pub struct Si5351 {
    regs: RegisterMap<{ reg::COUNT }>,
    xtal: u64,
    if_freq: Frequency,
    vfo_ms: Option<u32>,
    bfo_ms: Option<u32>,
}

impl Si5351 {
    /// Driver with a nominal crystal and nothing programmed
    #[must_use]
    pub const fn new() -> Self {
        Self {
            regs: RegisterMap::new(),
            xtal: corrected_xtal(SI5351_XTAL_FREQ, 0),
            if_freq: Frequency::from_units(0),
            vfo_ms: None,
            bfo_ms: None,
        }
    }

    /// Bring the device up with every output off
    ///
    /// # Errors
    ///
    /// Bus error from the controller.
    pub async fn init<I: I2c>(
        &mut self,
        bus: &mut I2cBus<I>,
        load: CrystalLoad,
    ) -> Result<(), I::Error> {
        for _ in 0..100 {
            let status = bus.read_reg(I2cAddress::SI5351, reg::DEVICE_STATUS).await?;
            if status & 0x80 == 0 {
                break;
            }
            embassy_time::Timer::after(embassy_time::Duration::from_millis(1)).await;
        }

        for (r, value) in [
            (reg::OUTPUT_ENABLE, 0xFF),
            (reg::CRYSTAL_LOAD, load.as_reg()),
            (reg::CLK0_CONTROL, CLK_OFF),
            (reg::CLK1_CONTROL, CLK_OFF),
            (reg::CLK2_CONTROL, CLK_OFF),
        ] {
            self.regs.set(r, value);
            #[allow(clippy::cast_possible_truncation)]
            bus.write_reg(I2cAddress::SI5351, r as u8, value).await?;
        }
        self.regs.mark_all_clean();

        // CLK0 and CLK2 on from the next flush
        self.regs.set(reg::OUTPUT_ENABLE, !0b101);
        info!("Si5351 ready");
        Ok(())
    }

    /// Write every register changed since the last flush
    ///
    /// # Errors
    ///
    /// Bus error; the remaining writes are dropped.
    pub async fn flush<I: I2c>(&mut self, bus: &mut I2cBus<I>) -> Result<(), I::Error> {
        if !self.regs.any_dirty() {
            return Ok(());
        }
        let mut result = Ok(());
        for (r, value) in self.regs.dirty_regs() {
            #[allow(clippy::cast_possible_truncation)]
            let write = bus.write_reg(I2cAddress::SI5351, r as u8, value).await;
            if write.is_err() {
                result = write;
                break;
            }
        }
        // The reset strobe is self-clearing on the device
        self.regs.set(reg::PLL_RESET, 0);
        self.regs.mark_all_clean();
        result
    }

    fn program(&mut self, output: Output, freq: Frequency) {
        let Some(SynthPlan { pll, ms }) = plan(freq, self.xtal) else {
            warn!("synthesizer cannot reach {}", freq);
            return;
        };
        self.regs.set_all(output.pll_base(), &pll.registers(0));
        self.regs
            .set_all(output.ms_base(), &Divider::integer(ms).registers(0));
        let (control, value) = output.control();
        self.regs.set(control, value);

        let last = match output {
            Output::Vfo => &mut self.vfo_ms,
            Output::Bfo => &mut self.bfo_ms,
        };
        // A new multisynth divider needs the PLL restarted
        if *last != Some(ms) {
            *last = Some(ms);
            let reset = self.regs.get(reg::PLL_RESET) | output.reset_bit();
            self.regs.set(reg::PLL_RESET, reset);
        }
    }
}

impl Default for Si5351 {
    fn default() -> Self {
        Self::new()
    }
}

impl Synthesizer for Si5351 {
    fn set_frequency(&mut self, freq: Frequency, transmit: bool) {
        let lo = if transmit {
            Some(freq)
        } else {
            freq.checked_offset(i64::from(self.if_freq.as_units()))
        };
        match lo {
            Some(lo) => self.program(Output::Vfo, lo),
            None => warn!("VFO frequency overflow"),
        }
    }

    fn set_calibration(&mut self, correction: i32, if_freq: Frequency) {
        self.xtal = corrected_xtal(SI5351_XTAL_FREQ, correction);
        self.if_freq = if_freq;
        self.program(Output::Bfo, if_freq);
    }
}
