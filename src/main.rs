//! CW Rig Main Application
//!
//! Entry point for the STM32G474-based CW transceiver firmware.
//! A 1 kHz tick task samples the front panel and runs the tick handler;
//! the main task polls the rig after every tick and then flushes the
//! drivers over the shared I2C bus.

#![no_std]
#![no_main]

use defmt::{info, warn};
use embassy_executor::Spawner;
use embassy_stm32::gpio::{Input, Level, Output, Pull, Speed};
use embassy_stm32::i2c::I2c;
use embassy_stm32::mode::Async;
use embassy_stm32::time::Hertz;
use embassy_stm32::{bind_interrupts, i2c, peripherals};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use cw_rig_firmware::drivers::display::OledDisplay;
use cw_rig_firmware::drivers::eeprom::Eeprom;
use cw_rig_firmware::drivers::si5351::{CrystalLoad, Si5351};
use cw_rig_firmware::error::Fault;
use cw_rig_firmware::hal::gpio::{FrontPanel, KeyingOutputs};
use cw_rig_firmware::hal::i2c::I2cBus;
use cw_rig_firmware::hal::timer::{RateLimiter, TickSource};
use cw_rig_firmware::prelude::*;
use cw_rig_firmware::rig::Rig;
use cw_rig_firmware::tick::SharedState;

bind_interrupts!(struct Irqs {
    I2C1_EV => i2c::EventInterruptHandler<peripherals::I2C1>;
    I2C1_ER => i2c::ErrorInterruptHandler<peripherals::I2C1>;
});

/// Context shared by the tick task and the main loop
static SHARED: SharedState = SharedState::new();

/// Raised once per tick so the main loop runs in step with the ticks
static TICKED: Signal<CriticalSectionRawMutex, ()> = Signal::new();

type Panel = FrontPanel<Input<'static>>;
type FirmwareRig = Rig<'static, OledDisplay, Eeprom, KeyingOutputs<Output<'static>>, Si5351>;

static RIG: StaticCell<FirmwareRig> = StaticCell::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("CW rig firmware v{}", env!("CARGO_PKG_VERSION"));

    let config = embassy_stm32::Config::default();
    let p = embassy_stm32::init(config);

    // Front panel, all active low
    let panel = FrontPanel::new(
        Input::new(p.PA0, Pull::Up),
        Input::new(p.PA1, Pull::Up),
        Input::new(p.PA4, Pull::Up),
        Input::new(p.PB0, Pull::Up),
        Input::new(p.PB1, Pull::Up),
        Input::new(p.PB4, Pull::Up),
        Input::new(p.PB5, Pull::Up),
    );

    let keying = KeyingOutputs::new(
        Output::new(p.PC0, Level::Low, Speed::Low),
        Output::new(p.PC1, Level::Low, Speed::Low),
        Output::new(p.PC2, Level::Low, Speed::Low),
    );

    // PB8 = SCL, PB9 = SDA
    let i2c: I2c<'static, Async> = I2c::new(
        p.I2C1,
        p.PB8,
        p.PB9,
        Irqs,
        p.DMA1_CH1,
        p.DMA1_CH2,
        Hertz(I2C_FREQUENCY_HZ),
        Default::default(),
    );
    let mut bus = I2cBus::new(i2c);
    for device in bus.scan().await {
        info!("I2C device at {}", device);
    }

    let eeprom = Eeprom::load(&mut bus).await;
    if !eeprom.is_online() {
        warn!("EEPROM offline");
    }

    let mut synth = Si5351::new();
    let synth_ok = synth.init(&mut bus, CrystalLoad::default()).await.is_ok();

    let mut display = OledDisplay::new();
    if display.init(&mut bus).await.is_err() {
        warn!("display did not respond");
    }

    let rig = RIG.init(Rig::new(
        &SHARED,
        display,
        eeprom,
        keying,
        synth,
        RigOptions::default(),
    ));
    rig.start();
    if !synth_ok {
        rig.fault(Fault::Hardware);
    }

    spawner.must_spawn(tick_task(panel));
    info!("tick task running");

    let mut storage_pace = RateLimiter::from_millis(100);
    loop {
        TICKED.wait().await;
        rig.poll();

        if rig.synthesizer_mut().flush(&mut bus).await.is_err() {
            warn!("Si5351 write failed");
            rig.fault(Fault::Hardware);
        }
        if storage_pace.check() && rig.storage_mut().flush(&mut bus).await.is_err() {
            warn!("EEPROM write failed");
            rig.fault(Fault::StorageFailure);
        }
        if rig.display_mut().flush_step(&mut bus).await.is_err() {
            warn!("display write failed");
        }
    }
}

/// Tick handler: sample the panel, advance the counter, wake the main loop
#[embassy_executor::task]
async fn tick_task(mut panel: Panel) {
    let mut ticks = TickSource::new();
    loop {
        ticks.next().await;
        SHARED.stage_port(panel.sample());
        SHARED.tick();
        TICKED.signal(());
    }
}
