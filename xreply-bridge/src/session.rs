//! Page-side composer session.
//!
//! A [`ComposerSession`] carries everything the page context keeps between
//! clicks: the in-flight guard, the trigger button's state, the notification
//! sink and a snapshot of the settings. With a settings store attached, each
//! flow re-reads the stored record before generating. Every flow ends with
//! the guard released and the button settled, whatever went wrong.

use serde_json::json;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::{RwLock, watch};
use tracing::{debug, info, instrument, warn};
use xreply_composer::{
    Clipboard, ComposerLocator, DEFAULT_POLL, DEFAULT_WAIT, Document, ElementRef, InsertionChain,
    InsertionContext, InsertionMethod, InsertionTimings, TweetExtractor,
    write_clipboard_with_retries,
};
use xreply_core::{ReplyError, TweetContent};
use xreply_store::{Settings, SettingsStore, Tone};

use crate::port::RuntimeBridge;
use crate::prompts::{TOPIC_WORD_RANGE, topic_prompt};
use crate::protocol::Request;

// ============================================================================
// Button State
// ============================================================================

/// State of the trigger button.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ButtonState {
    /// Ready for a click.
    #[default]
    Idle,
    /// A generation is running.
    Loading,
    /// The last run inserted text.
    Success,
    /// The last run failed.
    Error,
}

impl ButtonState {
    /// Button label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "✨ Auto Reply",
            Self::Loading => "⏳ Generating...",
            Self::Success => "✅ Ready",
            Self::Error => "❌ Retry",
        }
    }
}

impl fmt::Display for ButtonState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Notifications
// ============================================================================

/// Severity of a transient notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    /// Progress.
    Info,
    /// Completed.
    Success,
    /// Degraded but recovered.
    Warning,
    /// Failed.
    Error,
}

/// Shows transient notifications to the user.
pub trait Notifier: Send + Sync {
    /// Shows one notification.
    fn notify(&self, level: NotificationLevel, message: &str);
}

/// Writes notifications to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, level: NotificationLevel, message: &str) {
        match level {
            NotificationLevel::Error => warn!(notification = %message, "Notify"),
            _ => info!(level = ?level, notification = %message, "Notify"),
        }
    }
}

/// Keeps notifications in memory.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    shown: Mutex<Vec<(NotificationLevel, String)>>,
}

impl MemoryNotifier {
    /// Creates an empty notifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns everything shown so far.
    pub fn shown(&self) -> Vec<(NotificationLevel, String)> {
        self.shown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the most recent message.
    pub fn last(&self) -> Option<(NotificationLevel, String)> {
        self.shown().pop()
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, level: NotificationLevel, message: &str) {
        self.shown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((level, message.to_string()));
    }
}

// ============================================================================
// In-Flight Guard
// ============================================================================

/// Holds the session's single generation slot; released on drop.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

// ============================================================================
// Timings and Results
// ============================================================================

/// Pauses between the steps of a session flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTimings {
    /// After clicking the tweet's reply control, for the composer to open.
    pub open_delay: Duration,
    /// After the text arrives, before looking for the composer.
    pub settle: Duration,
    /// How long to wait for a composer.
    pub composer_wait: Duration,
    /// Interval between composer searches.
    pub composer_poll: Duration,
    /// How long a success label stays up.
    pub success_reset: Duration,
    /// How long an error label stays up.
    pub error_reset: Duration,
}

impl Default for SessionTimings {
    fn default() -> Self {
        Self {
            open_delay: Duration::from_millis(1000),
            settle: Duration::from_millis(500),
            composer_wait: DEFAULT_WAIT,
            composer_poll: DEFAULT_POLL,
            success_reset: Duration::from_secs(2),
            error_reset: Duration::from_secs(3),
        }
    }
}

impl SessionTimings {
    /// No pauses and a single composer search. For tests and simulations.
    pub fn immediate() -> Self {
        Self {
            open_delay: Duration::ZERO,
            settle: Duration::ZERO,
            composer_wait: Duration::ZERO,
            composer_poll: Duration::ZERO,
            success_reset: Duration::ZERO,
            error_reset: Duration::ZERO,
        }
    }
}

/// How generated text reached the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// Inserted into the composer and verified.
    Inserted {
        /// The text.
        text: String,
        /// Strategy that worked.
        method: InsertionMethod,
    },
    /// Insertion failed; the text was put on the clipboard instead.
    Copied {
        /// The text.
        text: String,
    },
}

impl Delivery {
    /// The delivered text.
    pub fn text(&self) -> &str {
        match self {
            Self::Inserted { text, .. } | Self::Copied { text } => text,
        }
    }
}

// ============================================================================
// Composer Session
// ============================================================================

/// Page-side state and flows for one composer.
pub struct ComposerSession {
    bridge: RuntimeBridge,
    document: Arc<dyn Document>,
    clipboard: Option<Arc<dyn Clipboard>>,
    notifier: Arc<dyn Notifier>,
    settings: RwLock<Settings>,
    store: Option<Arc<SettingsStore>>,
    in_flight: AtomicBool,
    button: Arc<watch::Sender<ButtonState>>,
    locator: ComposerLocator,
    chain: InsertionChain,
    insertion: InsertionTimings,
    timings: SessionTimings,
}

impl fmt::Debug for ComposerSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComposerSession")
            .field("button", &*self.button.borrow())
            .field("generating", &self.is_generating())
            .field("strategies", &self.chain.methods())
            .finish_non_exhaustive()
    }
}

impl ComposerSession {
    /// Creates a session over a page.
    pub fn new(
        bridge: RuntimeBridge,
        document: Arc<dyn Document>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let (button, _) = watch::channel(ButtonState::Idle);
        Self {
            bridge,
            document,
            clipboard: None,
            notifier,
            settings: RwLock::new(Settings::default()),
            store: None,
            in_flight: AtomicBool::new(false),
            button: Arc::new(button),
            locator: ComposerLocator::new(),
            chain: InsertionChain::standard(),
            insertion: InsertionTimings::default(),
            timings: SessionTimings::default(),
        }
    }

    /// Sets the clipboard used for paste insertion and the topic fallback.
    pub fn with_clipboard(mut self, clipboard: Arc<dyn Clipboard>) -> Self {
        self.clipboard = Some(clipboard);
        self
    }

    /// Sets the initial settings snapshot.
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = RwLock::new(settings);
        self
    }

    /// Reads settings from `store` at the start of every flow.
    pub fn with_store(mut self, store: Arc<SettingsStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Sets the insertion pauses. The typing delay still follows settings.
    pub fn with_insertion_timings(mut self, timings: InsertionTimings) -> Self {
        self.insertion = timings;
        self
    }

    /// Sets the flow pauses.
    pub fn with_timings(mut self, timings: SessionTimings) -> Self {
        self.timings = timings;
        self
    }

    /// Replaces the composer locator.
    pub fn with_locator(mut self, locator: ComposerLocator) -> Self {
        self.locator = locator;
        self
    }

    /// Watches the trigger button's state.
    pub fn button_state(&self) -> watch::Receiver<ButtonState> {
        self.button.subscribe()
    }

    /// Returns true while a generation is running.
    pub fn is_generating(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Returns the settings snapshot.
    pub async fn settings(&self) -> Settings {
        self.settings.read().await.clone()
    }

    /// Swaps in settings saved elsewhere.
    pub async fn apply_settings_update(&self, settings: Settings) {
        debug!(provider = %settings.provider, "Settings snapshot updated");
        *self.settings.write().await = settings;
    }

    /// Re-reads the stored settings into the snapshot and returns them.
    ///
    /// Without a store, or when the record cannot be read, the snapshot is
    /// returned as is.
    async fn load_settings(&self) -> Settings {
        let Some(store) = &self.store else {
            return self.settings().await;
        };
        match store.read_fresh().await {
            Ok(fresh) => {
                self.settings.write().await.clone_from(&fresh);
                fresh
            }
            Err(error) => {
                warn!(error = %error, "Failed to read settings, using snapshot");
                self.settings().await
            }
        }
    }

    /// Handles a broadcast message. Returns true if it was consumed.
    pub async fn on_message(&self, request: &Request) -> bool {
        match request {
            Request::SettingsUpdated { settings } => {
                self.apply_settings_update(settings.clone()).await;
                true
            }
            _ => false,
        }
    }

    // ========================================================================
    // Reply Flow
    // ========================================================================

    /// Generates a reply to the tweet `trigger` sits in and inserts it.
    ///
    /// # Errors
    ///
    /// Returns [`ReplyError::Busy`] while another generation runs, a
    /// configuration error when the active provider has no key, and any
    /// generation, location or insertion failure. Every failure is also
    /// shown as a notification.
    #[instrument(skip(self, trigger))]
    pub async fn reply_to(&self, trigger: &ElementRef) -> Result<Delivery, ReplyError> {
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            return Err(self.reject(ReplyError::Busy, NotificationLevel::Warning));
        };

        let cached = self.settings().await;
        if !cached.has_active_key() {
            return Err(self.reject(
                ReplyError::missing_key(cached.provider),
                NotificationLevel::Error,
            ));
        }
        let settings = self.load_settings().await;
        if !settings.has_active_key() {
            return Err(self.reject(
                ReplyError::missing_key(settings.provider),
                NotificationLevel::Error,
            ));
        }

        self.set_button(ButtonState::Loading);
        let result = self.run_reply(trigger, &settings).await;
        match &result {
            Ok(delivery) => {
                self.settle(ButtonState::Success, self.timings.success_reset);
                self.notifier
                    .notify(NotificationLevel::Success, "Reply generated successfully!");
                self.record(delivery).await;
            }
            Err(err) => self.fail(err),
        }
        result
    }

    async fn run_reply(
        &self,
        trigger: &ElementRef,
        settings: &Settings,
    ) -> Result<Delivery, ReplyError> {
        if let Err(error) = trigger.click().await {
            debug!(error = %error, "Reply control click failed");
        }
        tokio::time::sleep(self.timings.open_delay).await;

        let tweet = self.extract(trigger).await?;
        self.notifier
            .notify(NotificationLevel::Info, "Generating your reply...");
        let text = self.bridge.generate_reply(&tweet).await?;

        tokio::time::sleep(self.timings.settle).await;
        let method = self.insert(&text, settings).await?;
        Ok(Delivery::Inserted { text, method })
    }

    async fn extract(&self, trigger: &ElementRef) -> Result<TweetContent, ReplyError> {
        match TweetExtractor::extract_from_button(trigger).await {
            Ok(Some(tweet)) => Ok(tweet),
            Ok(None) => Err(ReplyError::InvalidRequest(
                "Could not find tweet content".to_string(),
            )),
            Err(error) => {
                warn!(error = %error, "Tweet extraction failed");
                Err(ReplyError::InvalidRequest(
                    "Could not find tweet content".to_string(),
                ))
            }
        }
    }

    // ========================================================================
    // Topic Flow
    // ========================================================================

    /// Generates a tweet about `topic` and inserts it, copying it to the
    /// clipboard when insertion fails.
    ///
    /// # Errors
    ///
    /// Returns [`ReplyError::Busy`] while another generation runs,
    /// [`ReplyError::InvalidRequest`] for a blank topic, and generation or
    /// location failures. An insertion failure is only an error when the
    /// clipboard fallback fails too.
    #[instrument(skip(self))]
    pub async fn compose_tweet(
        &self,
        topic: &str,
        tone: Option<Tone>,
    ) -> Result<Delivery, ReplyError> {
        if topic.trim().is_empty() {
            return Err(self.reject(
                ReplyError::InvalidRequest("Please enter a topic".to_string()),
                NotificationLevel::Error,
            ));
        }
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            return Err(self.reject(ReplyError::Busy, NotificationLevel::Warning));
        };

        let settings = self.load_settings().await;
        self.set_button(ButtonState::Loading);
        let result = self
            .run_topic(topic, tone.unwrap_or(settings.tone), &settings)
            .await;
        match &result {
            Ok(delivery @ Delivery::Inserted { .. }) => {
                self.settle(ButtonState::Success, self.timings.success_reset);
                self.notifier
                    .notify(NotificationLevel::Success, "Tweet ready – edit & send!");
                self.record(delivery).await;
            }
            Ok(Delivery::Copied { .. }) => self.set_button(ButtonState::Idle),
            Err(err) => self.fail(err),
        }
        result
    }

    async fn run_topic(
        &self,
        topic: &str,
        tone: Tone,
        settings: &Settings,
    ) -> Result<Delivery, ReplyError> {
        let prompt = topic_prompt(topic, tone, TOPIC_WORD_RANGE);
        let text = self.bridge.generate_tweet(prompt).await?;

        tokio::time::sleep(self.timings.settle).await;
        match self.insert(&text, settings).await {
            Ok(method) => Ok(Delivery::Inserted { text, method }),
            Err(err @ ReplyError::InsertionFailed { .. }) => self.copy_fallback(text, err).await,
            Err(err) => Err(err),
        }
    }

    async fn copy_fallback(&self, text: String, err: ReplyError) -> Result<Delivery, ReplyError> {
        self.notifier.notify(
            NotificationLevel::Warning,
            "Tweet generated but insertion failed. Please paste manually.",
        );
        let Some(clipboard) = self.clipboard.as_deref() else {
            return Err(err);
        };
        match write_clipboard_with_retries(clipboard, &text, self.insertion.clipboard_retry).await
        {
            Ok(()) => {
                info!(chars = text.chars().count(), "Tweet copied to clipboard");
                self.notifier
                    .notify(NotificationLevel::Info, "Tweet copied to clipboard!");
                Ok(Delivery::Copied { text })
            }
            Err(error) => {
                warn!(error = %error, "Clipboard fallback failed");
                Err(err)
            }
        }
    }

    // ========================================================================
    // Shared Steps
    // ========================================================================

    async fn insert(&self, text: &str, settings: &Settings) -> Result<InsertionMethod, ReplyError> {
        let composer = self
            .locator
            .wait_for(
                self.document.as_ref(),
                self.timings.composer_wait,
                self.timings.composer_poll,
            )
            .await?;

        let timings = self
            .insertion
            .clone()
            .with_typing_delay(settings.typing_speed.delay());
        let mut ctx = InsertionContext::new(Arc::clone(&self.document), composer.element)
            .with_timings(timings);
        if let Some(clipboard) = &self.clipboard {
            ctx = ctx.with_clipboard(Arc::clone(clipboard));
        }

        let outcome = self.chain.insert(&ctx, text).await;
        match outcome.result {
            Ok(success) => Ok(success.method),
            Err(error) => Err(error.into()),
        }
    }

    async fn record(&self, delivery: &Delivery) {
        if let Delivery::Inserted { method, .. } = delivery {
            self.bridge
                .record_stats("inserted", json!({ "method": method.id() }))
                .await;
        }
    }

    fn reject(&self, err: ReplyError, level: NotificationLevel) -> ReplyError {
        self.notifier.notify(level, &err.user_message());
        err
    }

    fn fail(&self, err: &ReplyError) {
        warn!(kind = ?err.kind(), error = %err, "Session flow failed");
        self.settle(ButtonState::Error, self.timings.error_reset);
        self.notifier
            .notify(NotificationLevel::Error, &err.user_message());
    }

    fn set_button(&self, state: ButtonState) {
        self.button.send_replace(state);
    }

    /// Shows `state`, then returns to idle after `after` unless something
    /// else changed the button first.
    fn settle(&self, state: ButtonState, after: Duration) {
        self.set_button(state);
        if after.is_zero() {
            self.set_button(ButtonState::Idle);
            return;
        }
        let button = Arc::clone(&self.button);
        tokio::spawn(async move {
            tokio::time::sleep(after).await;
            button.send_if_modified(|current| {
                let reset = *current == state;
                if reset {
                    *current = ButtonState::Idle;
                }
                reset
            });
        });
    }
}
