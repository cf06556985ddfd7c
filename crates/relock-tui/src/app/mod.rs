//! Application host: owns the screens, drives the gate, routes input

pub mod config;
pub mod events;
mod state;

pub use state::{AppState, CredentialPrompt, Screen, SensorPrompt, SetupStep};

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{Event as CrosstermEvent, EventStream, KeyCode, KeyEvent, KeyEventKind};
use futures::StreamExt;
use ratatui::prelude::*;
use relock_core::{
    needs_authentication, BiometricAuthenticator, BiometricErrorCode, BiometricVerdict, Clock,
    CredentialAuthenticator, CredentialVerdict, GateOutcome, LockPolicy, NoBiometric, PrefsStore,
    PromptSpec, ScreenLockGate, SharedAuthSession, SystemClock,
};
use tokio::sync::mpsc;
use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::credential::{
    CredentialError, PassphraseVerifier, TerminalCredential, MAX_PASSPHRASE_LEN,
    MIN_PASSPHRASE_LEN,
};
use crate::sensor::KeySensor;
use crate::ui::{self, Theme};
use config::TuiConfig;
use events::{gate_worker, AppEvent, GateCommand};

/// Validity windows offered by the settings screen, in seconds
const TIMEOUT_PRESETS: &[u64] = &[0, 15, 30, 60, 120, 300, 600, 1800, 3600];

/// Number of entries in the settings list
const SETTINGS_ITEM_COUNT: usize = 3;

/// Main application struct
pub struct App {
    /// Host-side state
    pub state: AppState,

    /// Active theme
    pub theme: Theme,

    /// Persisted preferences, shared with the gate
    pub prefs: Arc<PrefsStore>,

    /// Session record, shared with the gate
    pub session: SharedAuthSession,

    /// Time source, shared with the gate
    pub clock: Arc<dyn Clock>,

    /// Passphrase verifier backing the credential prompts
    pub verifier: PassphraseVerifier,

    /// Whether a sensor backend is wired up
    pub sensor_available: bool,

    /// TUI configuration
    pub config: TuiConfig,

    /// Whether the app should quit
    pub should_quit: bool,

    data_dir: PathBuf,
    commands: mpsc::UnboundedSender<GateCommand>,
    events: mpsc::UnboundedReceiver<AppEvent>,
}

impl App {
    /// Wire up the gate, its authenticators, and the worker task
    pub fn new(data_dir: &Path, use_sensor: bool) -> Result<Self> {
        let config = TuiConfig::load(data_dir);
        let theme = if config.high_contrast {
            Theme::high_contrast()
        } else {
            Theme::default()
        };

        let prefs = Arc::new(PrefsStore::open(data_dir.join("prefs.json"))?);
        let verifier = PassphraseVerifier::open(data_dir.join("credential.json"))?;
        let session = SharedAuthSession::new();
        let clock: Arc<dyn Clock> = Arc::new(SystemClock::new());

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();

        let biometric: Arc<dyn BiometricAuthenticator> = if use_sensor {
            Arc::new(KeySensor::new(events_tx.clone()))
        } else {
            Arc::new(NoBiometric)
        };
        let credential: Arc<dyn CredentialAuthenticator> =
            Arc::new(TerminalCredential::new(events_tx.clone()));

        let gate = ScreenLockGate::new(
            prefs.clone(),
            session.clone(),
            clock.clone(),
            biometric,
            credential,
        )
        .with_prompt(PromptSpec::new("Unlock").with_subtitle("Confirm it's you to continue"));
        tokio::spawn(gate_worker(gate, commands_rx, events_tx));

        let mut state = AppState::new();
        if !verifier.is_enrolled() {
            state.screen = Screen::Setup;
        }

        info!(
            "Host ready (sensor: {}, enrolled: {})",
            use_sensor,
            verifier.is_enrolled()
        );

        Ok(Self {
            state,
            theme,
            prefs,
            session,
            clock,
            verifier,
            sensor_available: use_sensor,
            config,
            should_quit: false,
            data_dir: data_dir.to_path_buf(),
            commands: commands_tx,
            events: events_rx,
        })
    }

    /// Run the application main loop
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        // Launching counts as an activation of the protected screen
        if self.state.screen != Screen::Setup {
            self.trigger_check();
        }

        let mut input = EventStream::new();
        let mut tick = tokio::time::interval(Duration::from_millis(self.config.tick_ms.max(50)));

        while !self.should_quit {
            terminal.draw(|frame| ui::render(frame, self))?;

            tokio::select! {
                maybe_event = input.next() => {
                    match maybe_event {
                        Some(Ok(CrosstermEvent::Key(key))) if key.kind == KeyEventKind::Press => {
                            self.handle_key(key);
                        }
                        Some(Ok(_)) => {}
                        Some(Err(e)) => return Err(e.into()),
                        None => break,
                    }
                }
                Some(event) = self.events.recv() => self.handle_app_event(event),
                _ = tick.tick() => self.on_tick(),
            }
        }

        Ok(())
    }

    /// Seconds before the session goes stale, for the Home countdown
    pub fn remaining_validity_secs(&self) -> Option<u64> {
        let policy = self.prefs.lock_policy();
        if !policy.enabled {
            return None;
        }
        self.session
            .remaining_secs(self.clock.as_ref(), policy.timeout_secs)
    }

    /// Ask the gate to run one access check; the outcome arrives as an event
    fn trigger_check(&mut self) {
        if self.state.check_in_flight {
            return;
        }

        self.state.clear_messages();
        self.state.screen = Screen::Locked;
        self.state.check_in_flight = true;

        if self.commands.send(GateCommand::CheckAccess).is_err() {
            self.state.check_in_flight = false;
            self.state.set_error("Gate worker is gone");
        }
    }

    /// Handle key press events
    fn handle_key(&mut self, key: KeyEvent) {
        match self.state.screen {
            Screen::Setup => self.handle_setup_key(key.code),
            Screen::Locked => self.handle_locked_key(key.code),
            Screen::Home => self.handle_home_key(key.code),
            Screen::Settings => self.handle_settings_key(key.code),
        }
    }

    /// Handle events from the gate worker and its authenticators
    fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::GateFinished(outcome) => self.on_gate_finished(outcome),
            AppEvent::SensorPrompt { spec, responder } => {
                self.state.sensor_prompt = Some(SensorPrompt { spec, responder });
            }
            AppEvent::CredentialPrompt { spec, responder } => {
                self.state.credential_prompt = Some(CredentialPrompt {
                    spec,
                    responder,
                    input: String::new(),
                });
            }
        }
    }

    fn on_gate_finished(&mut self, outcome: GateOutcome) {
        self.state.check_in_flight = false;
        self.state.sensor_prompt = None;
        self.state.credential_prompt = None;

        match outcome {
            GateOutcome::Allow => {
                self.state.clear_messages();
                self.state.screen = Screen::Home;
            }
            GateOutcome::Deny => {
                self.state.screen = Screen::Locked;
                self.state.set_error("Confirmation expired, authenticate again");
            }
            GateOutcome::PendingUserAction => {
                self.state.screen = Screen::Locked;
                if self.state.error_message.is_none() {
                    self.state.set_status("Still locked, press Enter to try again");
                }
            }
        }
    }

    fn on_tick(&mut self) {
        self.state.tick = self.state.tick.wrapping_add(1);

        // Relock the protected screens when the session goes stale. A zero
        // window re-authenticates per activation, not mid-use, so it never
        // kicks the user out of a showing screen.
        if matches!(self.state.screen, Screen::Home | Screen::Settings)
            && !self.state.check_in_flight
        {
            let policy = self.prefs.lock_policy();
            if policy.timeout_secs > 0
                && needs_authentication(&policy, self.session.elapsed(self.clock.as_ref()))
            {
                info!("Session went stale, relocking");
                self.state.screen = Screen::Locked;
                self.state.set_status("Session expired");
            }
        }
    }

    fn handle_setup_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char(c) => {
                let buffer = match self.state.setup_step {
                    SetupStep::Enter => &mut self.state.setup_input,
                    SetupStep::Confirm => &mut self.state.setup_confirm,
                };
                if buffer.len() < MAX_PASSPHRASE_LEN {
                    buffer.push(c);
                }
                self.state.error_message = None;
            }
            KeyCode::Backspace => {
                match self.state.setup_step {
                    SetupStep::Enter => self.state.setup_input.pop(),
                    SetupStep::Confirm => self.state.setup_confirm.pop(),
                };
            }
            KeyCode::Enter => self.advance_setup(),
            KeyCode::Esc => match self.state.setup_step {
                SetupStep::Enter => self.should_quit = true,
                SetupStep::Confirm => {
                    self.state.setup_confirm.clear();
                    self.state.setup_step = SetupStep::Enter;
                }
            },
            _ => {}
        }
    }

    fn advance_setup(&mut self) {
        match self.state.setup_step {
            SetupStep::Enter => {
                if self.state.setup_input.len() < MIN_PASSPHRASE_LEN {
                    self.state.set_error(format!(
                        "Passphrase must be at least {} characters",
                        MIN_PASSPHRASE_LEN
                    ));
                    return;
                }
                self.state.setup_step = SetupStep::Confirm;
            }
            SetupStep::Confirm => {
                if self.state.setup_confirm != self.state.setup_input {
                    self.state.set_error("Passphrases do not match");
                    self.state.setup_input.clear();
                    self.state.setup_confirm.clear();
                    self.state.setup_step = SetupStep::Enter;
                    return;
                }

                let passphrase = Zeroizing::new(std::mem::take(&mut self.state.setup_input));
                let _confirm = Zeroizing::new(std::mem::take(&mut self.state.setup_confirm));

                match self.verifier.enroll(&passphrase) {
                    Ok(()) => {
                        // Enrollment proves knowledge of the passphrase, so it
                        // counts as an authentication
                        self.session.record_success(self.clock.as_ref());
                        self.state.setup_step = SetupStep::Enter;
                        self.state.screen = Screen::Home;
                        self.state.set_status("Passphrase set");
                    }
                    Err(e) => {
                        self.state.set_error(e.to_string());
                        self.state.setup_step = SetupStep::Enter;
                    }
                }
            }
        }
    }

    fn handle_locked_key(&mut self, code: KeyCode) {
        if self.state.sensor_prompt.is_some() {
            self.handle_sensor_key(code);
        } else if self.state.credential_prompt.is_some() {
            self.handle_credential_key(code);
        } else {
            match code {
                KeyCode::Enter | KeyCode::Char('u') => self.trigger_check(),
                KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
                _ => {}
            }
        }
    }

    fn handle_sensor_key(&mut self, code: KeyCode) {
        let verdict = match code {
            KeyCode::Enter => BiometricVerdict::Success,
            KeyCode::Char('m') => BiometricVerdict::Mismatch,
            KeyCode::Char('e') => BiometricVerdict::Error(BiometricErrorCode::HardwareUnavailable),
            KeyCode::Esc => BiometricVerdict::Cancelled,
            _ => return,
        };

        if verdict == BiometricVerdict::Mismatch {
            self.state.set_error("Not recognized, try again");
        }
        if let Some(prompt) = self.state.sensor_prompt.take() {
            let _ = prompt.responder.send(verdict);
        }
    }

    fn handle_credential_key(&mut self, code: KeyCode) {
        // While locked out only dismissal is accepted
        if self.verifier.lockout_remaining_secs().is_some() {
            if code == KeyCode::Esc {
                self.cancel_credential_prompt();
            }
            return;
        }

        match code {
            KeyCode::Char(c) => {
                if let Some(prompt) = self.state.credential_prompt.as_mut() {
                    if prompt.input.len() < MAX_PASSPHRASE_LEN {
                        prompt.input.push(c);
                    }
                }
                self.state.error_message = None;
            }
            KeyCode::Backspace => {
                if let Some(prompt) = self.state.credential_prompt.as_mut() {
                    prompt.input.pop();
                }
            }
            KeyCode::Enter => self.submit_passphrase(),
            KeyCode::Esc => self.cancel_credential_prompt(),
            _ => {}
        }
    }

    fn cancel_credential_prompt(&mut self) {
        if let Some(prompt) = self.state.credential_prompt.take() {
            let _ = prompt.responder.send(CredentialVerdict::Cancelled);
        }
    }

    fn submit_passphrase(&mut self) {
        let Some(mut prompt) = self.state.credential_prompt.take() else {
            return;
        };
        let passphrase = Zeroizing::new(std::mem::take(&mut prompt.input));

        match self.verifier.verify(&passphrase) {
            Ok(()) => {
                let _ = prompt.responder.send(CredentialVerdict::Confirmed);
            }
            Err(e @ (CredentialError::Incorrect(_) | CredentialError::LockedOut(_))) => {
                // The prompt survives a failed attempt; only the user backs out
                self.state.set_error(e.to_string());
                self.state.credential_prompt = Some(prompt);
            }
            Err(e) => {
                warn!("Credential verification failed: {}", e);
                self.state.set_error(e.to_string());
                let _ = prompt.responder.send(CredentialVerdict::Cancelled);
            }
        }
    }

    fn handle_home_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('l') => self.lock_now(),
            KeyCode::Char('s') => {
                self.state.clear_messages();
                self.state.settings_index = 0;
                self.state.screen = Screen::Settings;
            }
            KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
    }

    /// Drop the session record and return to the locked screen
    fn lock_now(&mut self) {
        info!("Locked by user");
        self.session.clear();
        self.state.clear_messages();
        self.state.screen = Screen::Locked;
    }

    fn handle_settings_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                // Leaving settings re-enters the protected screen through
                // the gate
                self.trigger_check();
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if self.state.settings_index > 0 {
                    self.state.settings_index -= 1;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.state.settings_index < SETTINGS_ITEM_COUNT - 1 {
                    self.state.settings_index += 1;
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.toggle_selected_setting(),
            KeyCode::Left | KeyCode::Char('h') => self.adjust_selected_setting(-1),
            KeyCode::Right | KeyCode::Char('l') => self.adjust_selected_setting(1),
            KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
    }

    fn toggle_selected_setting(&mut self) {
        match self.state.settings_index {
            0 => {
                let policy = self.prefs.lock_policy();
                self.apply_policy(LockPolicy {
                    enabled: !policy.enabled,
                    ..policy
                });
            }
            2 => self.toggle_high_contrast(),
            _ => {}
        }
    }

    fn adjust_selected_setting(&mut self, direction: i64) {
        if self.state.settings_index == 1 {
            self.adjust_timeout(direction);
        }
    }

    fn adjust_timeout(&mut self, direction: i64) {
        let policy = self.prefs.lock_policy();
        let current = policy.timeout_secs;
        let next = if direction > 0 {
            TIMEOUT_PRESETS.iter().copied().find(|&p| p > current)
        } else {
            TIMEOUT_PRESETS.iter().rev().copied().find(|&p| p < current)
        };

        if let Some(timeout_secs) = next {
            self.apply_policy(LockPolicy {
                timeout_secs,
                ..policy
            });
        }
    }

    fn apply_policy(&mut self, policy: LockPolicy) {
        match self.prefs.set_lock_policy(policy) {
            Ok(()) => self.state.set_status("Preferences saved"),
            Err(e) => {
                warn!("Failed to persist preferences: {}", e);
                self.state.set_error(format!("Could not save preferences: {}", e));
            }
        }
    }

    fn toggle_high_contrast(&mut self) {
        self.config.high_contrast = !self.config.high_contrast;
        self.theme = if self.config.high_contrast {
            Theme::high_contrast()
        } else {
            Theme::default()
        };

        if let Err(e) = self.config.save(&self.data_dir) {
            warn!("Failed to persist TUI config: {}", e);
            self.state.set_error(format!("Could not save preferences: {}", e));
        }
    }
}
