//! Rig controller
//!
//! Owns the collaborators and the main-loop state, reads the shared tick
//! context and applies what [`transition`] decides. Events raised while
//! handling an event are queued and handled before `poll` returns.

use heapless::Deque;

use crate::config::{
    RigOptions, BEACON_INTERVAL, CAL_CORRECTION_LIMIT, CAL_CORRECTION_STEP, CAL_IF_STEP,
    ERASE_HOLD_TICKS, ERASE_PROGRESS_TICKS, FEEDBACK_TICKS, IF_FREQ_MAX, IF_FREQ_MIN,
    RIG_EVENT_QUEUE, WORD_SPACE_DOTS,
};
use crate::display::Display;
use crate::error::{Fault, RigError};
use crate::key::{KeyEvent, KeyMode, KeyState};
use crate::memory::{playback_buffer, store_memory, transmit_memory, Recorded};
use crate::morse::CodecOptions;
use crate::radio::{Synthesizer, Transmitter, TxSwitch, Vfo};
use crate::storage::{self, Settings, Storage, StorageError};
use crate::tick::{blink_visible, deadline_passed, ticks_since, Button, KeySource, SharedState};

use super::effect::{on_entry, on_exit, Effect};
use super::screen::compose;
use super::state::{step_slot, CalSnapshot};
use super::transition::{fault_of, transition, Action, Transition};
use super::{MenuItem, RigEvent, RigMode, RigState};

/// The rig: state machine plus collaborators
pub struct Rig<'a, D, S, T, Y>
where
    D: Display,
    S: Storage,
    T: Transmitter,
    Y: Synthesizer,
{
    shared: &'a SharedState,
    display: D,
    storage: S,
    tx: TxSwitch<T>,
    synth: Y,
    options: RigOptions,
    state: RigState,
    pending: Deque<RigEvent, RIG_EVENT_QUEUE>,
    dirty: bool,
    hold_until: Option<u32>,
    last_blink: bool,
    menu_shown: Option<MenuItem>,
    progress_shown: Option<i16>,
}

impl<'a, D, S, T, Y> Rig<'a, D, S, T, Y>
where
    D: Display,
    S: Storage,
    T: Transmitter,
    Y: Synthesizer,
{
    /// Rig in STARTUP; call [`Rig::start`] to load settings
    pub fn new(
        shared: &'a SharedState,
        display: D,
        storage: S,
        transmitter: T,
        synth: Y,
        options: RigOptions,
    ) -> Self {
        shared.set_squeeze(options.squeeze_start);
        Self {
            shared,
            display,
            storage,
            tx: TxSwitch::new(transmitter),
            synth,
            options,
            state: RigState::new(),
            pending: Deque::new(),
            dirty: true,
            hold_until: None,
            last_blink: true,
            menu_shown: None,
            progress_shown: None,
        }
    }

    /// Run STARTUP: outputs off, settings loaded, then DEFAULT or ERROR
    pub fn start(&mut self) {
        info!("rig starting: {}", self.options);
        for &effect in on_entry(RigMode::Startup) {
            self.apply(effect);
        }
        self.handle(RigEvent::Boot);
    }

    /// Explicit reset input; the only way out of ERROR
    pub fn reset(&mut self) {
        self.handle(RigEvent::Reset);
    }

    /// Report a fault detected outside the rig, e.g. by a driver
    pub fn fault(&mut self, fault: Fault) {
        self.handle(RigEvent::Fault(fault));
    }

    /// Redraw on the next idle poll
    pub fn invalidate_display(&mut self) {
        self.dirty = true;
    }

    /// Active mode
    #[must_use]
    pub const fn mode(&self) -> RigMode {
        self.state.mode
    }

    /// Main-loop state
    #[must_use]
    pub const fn state(&self) -> &RigState {
        &self.state
    }

    /// Runtime options
    #[must_use]
    pub const fn options(&self) -> &RigOptions {
        &self.options
    }

    /// Display collaborator
    #[must_use]
    pub const fn display(&self) -> &D {
        &self.display
    }

    /// Display collaborator, mutably
    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    /// Settings store
    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Settings store, mutably
    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Keying outputs
    #[must_use]
    pub const fn transmitter(&self) -> &TxSwitch<T> {
        &self.tx
    }

    /// Synthesizer collaborator
    #[must_use]
    pub const fn synthesizer(&self) -> &Y {
        &self.synth
    }

    /// Synthesizer collaborator, mutably
    pub fn synthesizer_mut(&mut self) -> &mut Y {
        &mut self.synth
    }

    /// One main-loop pass
    pub fn poll(&mut self) {
        let now = self.shared.now();

        if self.shared.take_overflow() {
            warn!("tick event queue overflowed");
        }

        let detents = self.shared.take_encoder();
        if detents != 0 {
            self.handle(RigEvent::EncoderTurn(detents));
        }
        while let Some(event) = self.shared.take_button_event() {
            if let Some(event) = RigEvent::from_button(event) {
                self.handle(event);
            }
        }
        while let Some(event) = self.shared.take_key_event() {
            self.handle(RigEvent::Key(event));
        }

        if self.shared.take_abort() {
            self.handle(RigEvent::PlaybackAborted);
        } else if self.shared.playback_done() {
            self.handle(RigEvent::PlaybackDone);
        }

        let key = self.shared.key();
        self.check_timers(now, &key);
        self.check_consistency(&key);
        self.show_holds();
        self.refresh(now);
    }

    /// Handle `event` and everything it raises
    fn handle(&mut self, event: RigEvent) {
        self.raise(event);
        while let Some(event) = self.pending.pop_front() {
            self.dispatch(event);
        }
    }

    fn raise(&mut self, event: RigEvent) {
        if self.pending.push_back(event).is_err() {
            warn!("rig event dropped: {}", event);
        }
    }

    fn dispatch(&mut self, event: RigEvent) {
        let Transition { next, action } = transition(self.state.mode, &event);
        if let (Some(RigMode::Error), Some(fault)) = (next, fault_of(&event)) {
            error!("fault: {}", fault);
            self.state.fault = Some(fault);
        }
        if let Some(next) = next {
            self.change_mode(next);
        }
        self.perform(action);
    }

    fn change_mode(&mut self, next: RigMode) {
        let prev = self.state.mode;
        for &effect in on_exit(prev) {
            self.apply(effect);
        }
        self.state.mode = next;
        for &effect in on_entry(next) {
            self.apply(effect);
        }
        info!("{} -> {}", prev, next);
    }

    fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::AllOff => self.tx.all_off(),
            Effect::KeyUp => self.tx.key_up(),
            Effect::Mute(muted) => self.tx.set_mute(muted),
            Effect::RetuneTx => self.synth.set_frequency(self.state.tx_freq(), true),
            Effect::RetuneRx => self.retune_rx(),
            Effect::Carrier => self.tx.carrier(),
            Effect::TuneFlag(on) => self.state.tune_mode_on = on,
            Effect::KeyerPreferred => {
                let mode = self.state.key_mode;
                self.shared.with_key(|key| key.set_mode(mode));
            }
            Effect::ForceIambic => self.shared.with_key(|key| key.set_mode(KeyMode::Iambic)),
            Effect::PaddleKeying => self.shared.set_source(KeySource::Paddles),
            Effect::DisableKeyer => self.shared.set_source(KeySource::Disabled),
            Effect::StartPlayback => self.start_playback(),
            Effect::ReviewPlayback => {
                let player = playback_buffer(&self.state.buffer, self.codec_options());
                self.shared.set_source(KeySource::Playback(player));
            }
            Effect::CaptureSpeed => self.state.saved_speed = self.shared.key().speed(),
            Effect::CaptureBand => self.state.pending_band = self.state.band(),
            Effect::ClearDfe => self.state.dfe.clear(),
            Effect::ClearRecording => {
                self.state.buffer.empty_buffer();
                self.state.recorder.clear();
                self.state.word_mark = None;
            }
            Effect::CaptureCalibration => {
                self.state.saved_cal = Some(CalSnapshot {
                    correction: self.state.correction,
                    if_freq: self.state.if_freq,
                    vfo: self.state.vfo,
                });
            }
            Effect::Invalidate => self.dirty = true,
        }
    }

    #[allow(clippy::too_many_lines)]
    fn perform(&mut self, action: Action) {
        let now = self.shared.now();
        match action {
            Action::None => {}
            Action::LoadSettings => self.load_settings(),
            Action::Tune(detents) => {
                self.state.vfo.tune(detents);
                self.retune_rx();
                self.dirty = true;
            }
            Action::NextStep => {
                self.state.vfo.next_step();
                self.dirty = true;
            }
            Action::ToggleRit => {
                self.state.vfo.toggle_rit();
                self.retune_rx();
                self.dirty = true;
            }
            Action::EraseStorage => self.erase_storage(),
            Action::Transmit(event) => self.tx.key(event, true),
            Action::Sidetone(event) => self.tx.key(event, false),
            Action::Record(event) => {
                self.tx.key(event, false);
                self.record(event, now);
            }
            Action::AppendSpace => {
                if self.state.buffer.last().is_some_and(|c| c != ' ') {
                    self.append(' ');
                }
            }
            Action::ToggleBeacon => {
                self.state.beacon = !self.state.beacon;
                // First transmission goes out at once
                let interval = beacon_interval(&self.shared.key());
                self.state.beacon_mark = now.wrapping_sub(interval);
                self.feedback(if self.state.beacon {
                    "BEACON ON"
                } else {
                    "BEACON OFF"
                });
            }
            Action::ToggleKeyMode => {
                self.state.key_mode = self.state.key_mode.toggle();
                let mode = self.state.key_mode;
                self.shared.with_key(|key| key.set_mode(mode));
                self.feedback(match mode {
                    KeyMode::Iambic => "IAMBIC",
                    KeyMode::Straight => "STRAIGHT KEY",
                });
            }
            Action::AdjustSpeed(detents) => {
                let wanted = i16::from(self.shared.key().speed()) + i16::from(detents);
                let result = u8::try_from(wanted)
                    .map_err(|_| RigError::SpeedOutOfRange)
                    .and_then(|wpm| self.shared.with_key(|key| key.set_speed(wpm)));
                if result.is_err() {
                    self.feedback("SPEED LIMIT");
                }
                self.dirty = true;
            }
            Action::SaveSpeed => {
                let speed = self.shared.key().speed();
                let result = storage::save_speed(&mut self.storage, speed);
                self.check_saved(result);
            }
            Action::RestoreSpeed => {
                let speed = self.state.saved_speed;
                if self.shared.with_key(|key| key.set_speed(speed)).is_err() {
                    warn!("captured speed {=u8} rejected", speed);
                }
            }
            Action::CycleBand(detents) => {
                self.state.pending_band = self.state.pending_band.cycle(detents);
                self.dirty = true;
            }
            Action::ConfirmBand => {
                self.state.vfo.select_band(self.state.pending_band);
                let result = storage::save_band(&mut self.storage, self.state.band());
                self.check_saved(result);
                self.retune_rx();
                self.dirty = true;
            }
            Action::DfeDigit(detents) => {
                self.state.dfe.turn(detents);
                self.dirty = true;
            }
            Action::DfeNext => {
                if self.state.dfe.accept() {
                    self.raise(RigEvent::EntryComplete);
                }
                self.dirty = true;
            }
            Action::ApplyDfe => self.apply_dfe(),
            Action::SelectSendSlot(detents) => {
                self.state.mem_tx_index = step_slot(self.state.mem_tx_index, detents);
                self.dirty = true;
            }
            Action::SelectEnterSlot(detents) => {
                self.state.mem_enter_index = step_slot(self.state.mem_enter_index, detents);
                self.dirty = true;
            }
            Action::StopPlayback => self.shared.set_source(KeySource::Paddles),
            Action::MarkBeacon => self.state.beacon_mark = now,
            Action::StopBeacon => {
                if self.state.beacon {
                    self.state.beacon = false;
                    self.feedback("BEACON OFF");
                }
            }
            Action::ReportEmpty => {
                self.state.beacon = false;
                self.feedback("MEMORY EMPTY");
            }
            Action::ReportFull => self.feedback("MEMORY FULL"),
            Action::StoreBuffer => self.store_buffer(),
            Action::DiscardBuffer => {
                self.state.buffer.empty_buffer();
                self.state.recorder.clear();
                self.feedback("DISCARDED");
            }
            Action::AdjustCorrection(detents) => {
                let step = i32::from(detents) * CAL_CORRECTION_STEP;
                self.state.correction = self
                    .state
                    .correction
                    .saturating_add(step)
                    .clamp(-CAL_CORRECTION_LIMIT, CAL_CORRECTION_LIMIT);
                self.recalibrate();
            }
            Action::AdjustIf(detents) => {
                let delta = i64::from(detents) * i64::from(CAL_IF_STEP);
                let shifted = self.state.if_freq.checked_offset(delta).unwrap_or(self.state.if_freq);
                self.state.if_freq = shifted.clamp(IF_FREQ_MIN, IF_FREQ_MAX);
                self.recalibrate();
            }
            Action::FinishCalibration => {
                self.state.saved_cal = None;
                let result = storage::save_correction(&mut self.storage, self.state.correction)
                    .and_then(|()| storage::save_if_freq(&mut self.storage, self.state.if_freq));
                if self.check_saved(result) {
                    self.feedback("CAL SAVED");
                }
            }
            Action::RestoreCalibration => {
                if let Some(saved) = self.state.saved_cal.take() {
                    let band_changed = saved.vfo.band() != self.state.band();
                    self.state.correction = saved.correction;
                    self.state.if_freq = saved.if_freq;
                    self.state.vfo = saved.vfo;
                    if band_changed {
                        let result = storage::save_band(&mut self.storage, saved.vfo.band());
                        self.check_saved(result);
                    }
                    self.recalibrate();
                }
                self.feedback("CAL ABORTED");
            }
        }
    }

    fn load_settings(&mut self) {
        match Settings::load(&mut self.storage) {
            Ok((settings, recovered)) => {
                if recovered.any() {
                    warn!("settings replaced by defaults: {}", recovered);
                }
                info!("loaded {}", settings);
                self.state.vfo = Vfo::new(settings.band);
                self.state.pending_band = settings.band;
                self.state.if_freq = settings.if_freq;
                self.state.correction = settings.correction;
                if self.shared.with_key(|key| key.set_speed(settings.speed)).is_err() {
                    warn!("stored speed {=u8} rejected", settings.speed);
                }
                self.synth.set_calibration(settings.correction, settings.if_freq);
                self.retune_rx();
                self.raise(RigEvent::Loaded);
            }
            Err(e) => {
                error!("settings unreadable: {}", e);
                self.raise(RigEvent::Fault(Fault::StorageFailure));
            }
        }
    }

    fn erase_storage(&mut self) {
        if !self.options.erase_eeprom {
            return;
        }
        self.clear_overlays();
        match storage::erase(&mut self.storage) {
            Ok(()) => {
                warn!("settings erased");
                self.load_settings();
                self.feedback("ERASED");
            }
            Err(e) => {
                error!("erase failed: {}", e);
                self.feedback("ERASE FAILED");
            }
        }
    }

    fn start_playback(&mut self) {
        let slot = self.state.mem_tx_index;
        let options = self.codec_options();
        match transmit_memory(&mut self.storage, slot, options) {
            Ok(Some(player)) => self.shared.set_source(KeySource::Playback(player)),
            Ok(None) => self.raise(RigEvent::SlotEmpty),
            Err(e) => {
                warn!("memory {=u8} unreadable: {}", slot, e);
                self.raise(RigEvent::SlotEmpty);
            }
        }
    }

    fn record(&mut self, event: KeyEvent, now: u32) {
        if event == KeyEvent::End {
            self.state.word_mark = Some(now);
        }
        match self.state.recorder.record(event) {
            Some(Recorded::Char(c)) => self.append(c),
            Some(Recorded::Unknown) => self.feedback("?"),
            None => {}
        }
    }

    fn append(&mut self, c: char) {
        if self.state.buffer.push(c).is_err() || self.state.buffer.is_full() {
            self.raise(RigEvent::MemoryFull);
        }
        self.dirty = true;
    }

    fn store_buffer(&mut self) {
        self.state.buffer.prepare_buffer_for_tx();
        let slot = self.state.mem_enter_index;
        match store_memory(&mut self.storage, slot, &self.state.buffer) {
            Ok(()) => self.feedback("STORED"),
            Err(e) => {
                warn!("store to memory {=u8} failed: {}", slot, e);
                self.feedback("STORE FAILED");
            }
        }
        self.state.buffer.empty_buffer();
    }

    fn apply_dfe(&mut self) {
        let applied = self
            .state
            .dfe
            .frequency()
            .is_some_and(|freq| self.state.vfo.set_frequency(freq).is_ok());
        if applied {
            let result = storage::save_band(&mut self.storage, self.state.band());
            self.check_saved(result);
            self.retune_rx();
        } else {
            self.feedback("OUT OF BAND");
        }
        self.state.dfe.clear();
    }

    fn recalibrate(&mut self) {
        self.synth
            .set_calibration(self.state.correction, self.state.if_freq);
        self.retune_rx();
        self.dirty = true;
    }

    fn retune_rx(&mut self) {
        self.synth.set_frequency(self.state.vfo.rx_freq(), false);
    }

    /// Feedback on a failed write; returns `true` on success
    fn check_saved(&mut self, result: Result<(), StorageError>) -> bool {
        match result {
            Ok(()) => true,
            Err(e) => {
                warn!("settings write failed: {}", e);
                self.feedback("SAVE FAILED");
                false
            }
        }
    }

    fn codec_options(&self) -> CodecOptions {
        CodecOptions {
            cut_numbers: self.options.obscure_abbreviations,
            unrecognized: self.options.unrecognized,
        }
    }

    fn check_timers(&mut self, now: u32, key: &KeyState) {
        match self.state.mode {
            RigMode::Default if self.state.beacon && key.is_idle() => {
                if ticks_since(now, self.state.beacon_mark) >= beacon_interval(key) {
                    self.handle(RigEvent::BeaconDue);
                }
            }
            RigMode::MemEnter => {
                let Some(mark) = self.state.word_mark else {
                    return;
                };
                let silence = WORD_SPACE_DOTS * u32::from(key.dot_time());
                if key.is_idle()
                    && !self.state.recorder.in_progress()
                    && ticks_since(now, mark) >= silence
                {
                    self.state.word_mark = None;
                    self.handle(RigEvent::WordSpace);
                }
            }
            _ => {}
        }
    }

    /// Raise a fault for combinations no transition can produce
    fn check_consistency(&mut self, key: &KeyState) {
        let mode = self.state.mode;
        if mode == RigMode::Error {
            return;
        }
        let straight = key.mode == KeyMode::Straight && !mode.allows_straight();
        let keyed = self.tx.is_transmitting() && !mode.transmits();
        if straight || keyed {
            error!("impossible state in {}: straight={}, keyed={}", mode, straight, keyed);
            self.handle(RigEvent::Fault(Fault::ImpossibleState));
        }
    }

    /// Menu prompt while the keyer button is held, erase progress for RIT
    fn show_holds(&mut self) {
        if self.state.mode != RigMode::Default {
            self.clear_overlays();
            return;
        }

        match self.shared.held(Button::Keyer) {
            Some(held) => {
                let item = MenuItem::from_hold(held);
                if self.menu_shown != Some(item) {
                    self.display.question(item.label());
                    self.menu_shown = Some(item);
                }
            }
            None => {
                if self.menu_shown.take().is_some() {
                    self.dirty = true;
                }
            }
        }

        if !self.options.erase_eeprom {
            return;
        }
        match self.shared.held(Button::Rit) {
            Some(held) if (ERASE_PROGRESS_TICKS..ERASE_HOLD_TICKS).contains(&held) => {
                let percent = i16::try_from(held * 100 / ERASE_HOLD_TICKS).unwrap_or(100);
                if self.progress_shown != Some(percent) {
                    self.display.progress(percent, 0, 100);
                    self.progress_shown = Some(percent);
                }
            }
            _ => {
                if self.progress_shown.take().is_some() {
                    self.display.clear_progress();
                    self.dirty = true;
                }
            }
        }
    }

    fn clear_overlays(&mut self) {
        if self.menu_shown.take().is_some() {
            self.dirty = true;
        }
        if self.progress_shown.take().is_some() {
            self.display.clear_progress();
            self.dirty = true;
        }
    }

    fn feedback(&mut self, text: &str) {
        info!("feedback: {=str}", text);
        self.display.feedback(text);
        self.hold_until = Some(self.shared.now().wrapping_add(FEEDBACK_TICKS));
        self.dirty = true;
    }

    fn refresh(&mut self, now: u32) {
        if self.menu_shown.is_some() || self.progress_shown.is_some() {
            return;
        }
        if let Some(until) = self.hold_until {
            if !deadline_passed(now, until) {
                return;
            }
            self.hold_until = None;
        }
        let blink = blink_visible(now);
        if self.dirty {
            self.state.display = compose(&self.state, &self.shared.key());
        }
        if self.dirty || (self.state.display.blinking_1 != 0 && blink != self.last_blink) {
            self.display.render(&self.state.display, blink);
            self.dirty = false;
            self.last_blink = blink;
        }
    }
}

fn beacon_interval(key: &KeyState) -> u32 {
    BEACON_INTERVAL * u32::from(key.dot_time())
}
