//! Reminder notifications: preferences, the fire/no-fire heuristic,
//! motivational message selection and the polled hourly schedule.

use crate::clock::Clock;
use crate::error::{JourneyError, Result};
use crate::paths;
use crate::store::RecordStore;
use crate::types::{Frequency, Permission, TOTAL_DAYS};
use crate::unlock::Progress;
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// NotificationPreferences
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPreferences {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_preferred_time")]
    pub preferred_time: String,
    #[serde(default)]
    pub frequency: Frequency,
    #[serde(default)]
    pub last_notification_date: Option<DateTime<Utc>>,
}

fn default_preferred_time() -> String {
    crate::usage::DEFAULT_REMINDER_TIME.to_string()
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self::with_time(&default_preferred_time())
    }
}

impl NotificationPreferences {
    /// Disabled daily reminders at `preferred_time`.
    pub fn with_time(preferred_time: &str) -> Self {
        Self {
            enabled: false,
            preferred_time: preferred_time.to_string(),
            frequency: Frequency::Daily,
            last_notification_date: None,
        }
    }

    /// Stored preferences, or fresh ones at `default_time` when none were
    /// saved yet.
    pub fn load<S: RecordStore>(store: &S, default_time: &str) -> Result<Self> {
        Ok(store
            .get(paths::NOTIFICATION_PREFERENCES_KEY)?
            .unwrap_or_else(|| Self::with_time(default_time)))
    }

    pub fn save<S: RecordStore>(&self, store: &S) -> Result<()> {
        store.put(paths::NOTIFICATION_PREFERENCES_KEY, self)
    }

    /// Write only the last-sent instant, keeping whatever else is stored.
    pub fn record_sent<S: RecordStore>(
        store: &S,
        default_time: &str,
        at: DateTime<Utc>,
    ) -> Result<()> {
        let mut stored = Self::load(store, default_time)?;
        stored.last_notification_date = stored.last_notification_date.max(Some(at));
        stored.save(store)
    }
}

/// Parse `HH:MM` (24h) into hour and minute.
pub fn parse_time(s: &str) -> Result<(u32, u32)> {
    let invalid = || JourneyError::InvalidTime(s.to_string());
    let (h, m) = s.split_once(':').ok_or_else(invalid)?;
    if h.len() != 2 || m.len() != 2 {
        return Err(invalid());
    }
    let hour: u32 = h.parse().map_err(|_| invalid())?;
    let minute: u32 = m.parse().map_err(|_| invalid())?;
    if hour > 23 || minute > 59 {
        return Err(invalid());
    }
    Ok((hour, minute))
}

// ---------------------------------------------------------------------------
// Platform capabilities
// ---------------------------------------------------------------------------

/// Platform permission to show notifications.
pub trait PermissionGate {
    fn status(&self) -> Permission;
    fn request(&mut self) -> Permission;
}

/// Platform surface that displays a notification.
pub trait Notifier {
    fn show(&mut self, title: &str, body: &str) -> Result<()>;
}

/// Permission gate with a predetermined answer. A `Default` gate becomes
/// `Granted` once requested.
#[derive(Debug, Clone, Copy)]
pub struct FixedPermission(pub Permission);

impl FixedPermission {
    /// Gate for `permission`, where an undecided `Default` is replaced by
    /// the answer remembered from an earlier prompt.
    pub fn remembered<S: RecordStore>(permission: Permission, store: &S) -> Result<Self> {
        if permission != Permission::Default {
            return Ok(Self(permission));
        }
        let stored: Option<Permission> = store.get(paths::NOTIFICATION_PERMISSION_KEY)?;
        Ok(Self(stored.unwrap_or(Permission::Default)))
    }

    /// Keep a decided answer so later sessions do not start undecided.
    pub fn remember<S: RecordStore>(&self, store: &S) -> Result<()> {
        if self.0 == Permission::Default {
            return Ok(());
        }
        store.put(paths::NOTIFICATION_PERMISSION_KEY, &self.0)
    }
}

impl PermissionGate for FixedPermission {
    fn status(&self) -> Permission {
        self.0
    }

    fn request(&mut self) -> Permission {
        if self.0 == Permission::Default {
            self.0 = Permission::Granted;
        }
        self.0
    }
}

/// Keeps every shown notification in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    pub shown: Vec<ReminderMessage>,
}

impl Notifier for RecordingNotifier {
    fn show(&mut self, title: &str, body: &str) -> Result<()> {
        self.shown.push(ReminderMessage {
            title: title.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderMessage {
    pub title: String,
    pub body: String,
}

struct MessageGroup {
    applies: fn(usize) -> bool,
    /// `{count}` and `{next_day}` are substituted on render.
    pool: &'static [(&'static str, &'static str)],
}

fn not_started(n: usize) -> bool {
    n == 0
}

fn first_day_done(n: usize) -> bool {
    n == 1
}

fn building_habit(n: usize) -> bool {
    (2..=3).contains(&n)
}

fn past_halfway(n: usize) -> bool {
    (4..=5).contains(&n)
}

fn one_left(n: usize) -> bool {
    n == 6
}

fn all_done(n: usize) -> bool {
    n == usize::from(TOTAL_DAYS)
}

fn stopped_midway(n: usize) -> bool {
    n > 0 && n < usize::from(TOTAL_DAYS)
}

/// Checked top to bottom; the first group that applies wins.
static MESSAGE_GROUPS: [MessageGroup; 7] = [
    MessageGroup {
        applies: not_started,
        pool: &[
            ("🌱 Que tal começar hoje?", "5 minutos de foco já é um ótimo começo. Sem pressão!"),
            ("✨ Seu momento de foco", "Pequenos passos levam a grandes conquistas."),
            ("🎯 Pronto para focar?", "Não precisa ser perfeito, só precisa começar."),
        ],
    },
    MessageGroup {
        applies: first_day_done,
        pool: &[
            ("🌟 Você começou!", "Que tal manter o ritmo? Dia 2 te espera."),
            ("💪 Primeiro passo dado", "Consistência é mais importante que intensidade."),
        ],
    },
    MessageGroup {
        applies: building_habit,
        pool: &[
            ("⚡ {count} dias completos!", "Você está criando um hábito. Continue no seu ritmo!"),
            ("🔥 Ritmo mantido!", "Cada dia de foco é uma vitória. Vamos continuar?"),
        ],
    },
    MessageGroup {
        applies: past_halfway,
        pool: &[
            ("🚀 {count}/7 dias!", "Você está quase lá! Mantenha o foco."),
            ("💎 Mais da metade!", "Sua consistência está impressionante!"),
        ],
    },
    MessageGroup {
        applies: one_left,
        pool: &[("🏆 Último dia chegando!", "Você foi longe demais para desistir agora!")],
    },
    MessageGroup {
        applies: all_done,
        pool: &[("🎉 Jornada completa!", "Que tal começar uma nova? O hábito já está criado!")],
    },
    MessageGroup {
        applies: stopped_midway,
        pool: &[
            ("💚 Sem pressão!", "Continue de onde parou. Seu progresso está salvo!"),
            ("🌈 Retome no seu tempo", "Dia {next_day} te espera quando estiver pronto."),
        ],
    },
];

const FALLBACK_MESSAGE: (&str, &str) = ("✨ Momento de foco", "Que tal dedicar alguns minutos hoje?");

fn render(template: &str, completed: usize, next_day: u8) -> String {
    template
        .replace("{count}", &completed.to_string())
        .replace("{next_day}", &next_day.to_string())
}

/// Pick a motivational message for `completed` days, uniformly at random
/// within the first matching group.
pub fn select_message<R: Rng>(
    completed: usize,
    last_completed: Option<u8>,
    rng: &mut R,
) -> ReminderMessage {
    let next_day = last_completed.unwrap_or(0).saturating_add(1);
    let (title, body) = MESSAGE_GROUPS
        .iter()
        .find(|g| (g.applies)(completed))
        .filter(|g| !g.pool.is_empty())
        .map(|g| g.pool[rng.gen_range(0..g.pool.len())])
        .unwrap_or(FALLBACK_MESSAGE);
    ReminderMessage {
        title: render(title, completed, next_day),
        body: render(body, completed, next_day),
    }
}

pub fn select_message_for<R: Rng>(progress: &Progress, rng: &mut R) -> ReminderMessage {
    select_message(
        progress.completed_count(),
        progress.last_completed().map(|d| d.get()),
        rng,
    )
}

// ---------------------------------------------------------------------------
// ReminderScheduler
// ---------------------------------------------------------------------------

/// Polled recurring task. `tick` reports when a check is due; nothing runs
/// on its own.
#[derive(Debug, Clone)]
pub struct ReminderScheduler {
    interval: Duration,
    next_due: Option<DateTime<Utc>>,
}

impl ReminderScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
        }
    }

    pub fn hourly() -> Self {
        Self::new(Duration::hours(1))
    }

    /// Start running; the first check is due immediately.
    pub fn start(&mut self, now: DateTime<Utc>) {
        self.next_due = Some(now);
    }

    pub fn stop(&mut self) {
        self.next_due = None;
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    pub fn next_due(&self) -> Option<DateTime<Utc>> {
        self.next_due
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// True if a check is due at `now`; the next one is then one interval
    /// later. Missed intervals collapse into a single check.
    pub fn tick(&mut self, now: DateTime<Utc>) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                self.next_due = Some(now + self.interval);
                true
            }
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Reminders
// ---------------------------------------------------------------------------

pub struct Reminders<G, N, C> {
    prefs: NotificationPreferences,
    gate: G,
    notifier: N,
    clock: C,
    scheduler: ReminderScheduler,
}

impl<G: PermissionGate, N: Notifier, C: Clock> Reminders<G, N, C> {
    pub fn new(
        prefs: NotificationPreferences,
        gate: G,
        notifier: N,
        clock: C,
        scheduler: ReminderScheduler,
    ) -> Self {
        Self {
            prefs,
            gate,
            notifier,
            clock,
            scheduler,
        }
    }

    pub fn preferences(&self) -> &NotificationPreferences {
        &self.prefs
    }

    pub fn permission(&self) -> Permission {
        self.gate.status()
    }

    pub fn scheduler(&self) -> &ReminderScheduler {
        &self.scheduler
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn gate(&self) -> &G {
        &self.gate
    }

    /// Restart the schedule for preferences that were already enabled
    /// in an earlier session.
    pub fn resume(&mut self) {
        if self.prefs.enabled && self.gate.status() == Permission::Granted {
            self.scheduler.start(self.clock.now_utc());
        }
    }

    /// Ask for permission and, if granted, enable reminders and run the
    /// first check right away.
    pub fn request_enable<R: Rng>(
        &mut self,
        progress: &Progress,
        rng: &mut R,
    ) -> Result<Option<ReminderMessage>> {
        let permission = match self.gate.status() {
            Permission::Granted => Permission::Granted,
            Permission::Unsupported => Permission::Unsupported,
            _ => self.gate.request(),
        };
        match permission {
            Permission::Granted => {
                self.prefs.enabled = true;
                self.scheduler.start(self.clock.now_utc());
                tracing::info!(frequency = %self.prefs.frequency, "reminders enabled");
                self.tick(progress, rng)
            }
            Permission::Unsupported => Err(JourneyError::PermissionDenied(
                "notifications are not supported on this platform".to_string(),
            )),
            Permission::Denied | Permission::Default => Err(JourneyError::PermissionDenied(
                "permission was denied".to_string(),
            )),
        }
    }

    /// Adopt preferences saved by another session, keeping the later of
    /// the two last-sent instants. Disabled preferences stop the schedule.
    pub fn sync_preferences(&mut self, stored: NotificationPreferences) {
        let last_notification_date = self
            .prefs
            .last_notification_date
            .max(stored.last_notification_date);
        self.prefs = NotificationPreferences {
            last_notification_date,
            ..stored
        };
        if !self.prefs.enabled && self.scheduler.is_running() {
            self.scheduler.stop();
            tracing::info!("reminders were disabled, schedule stopped");
        }
    }

    pub fn disable(&mut self) {
        self.prefs.enabled = false;
        self.scheduler.stop();
        tracing::info!("reminders disabled");
    }

    pub fn update_preferences(
        &mut self,
        preferred_time: Option<&str>,
        frequency: Option<Frequency>,
    ) -> Result<()> {
        if let Some(t) = preferred_time {
            parse_time(t)?;
        }
        if let Some(t) = preferred_time {
            self.prefs.preferred_time = t.to_string();
        }
        if let Some(f) = frequency {
            self.prefs.frequency = f;
        }
        Ok(())
    }

    pub fn should_fire(&self, now: DateTime<Utc>) -> bool {
        if !self.prefs.enabled || self.gate.status() != Permission::Granted {
            return false;
        }
        match self.prefs.last_notification_date {
            None => true,
            Some(last) => now - last >= Duration::hours(self.prefs.frequency.min_hours_between()),
        }
    }

    /// Show a reminder if one is due now.
    pub fn evaluate<R: Rng>(
        &mut self,
        progress: &Progress,
        rng: &mut R,
    ) -> Result<Option<ReminderMessage>> {
        let now = self.clock.now_utc();
        if !self.should_fire(now) {
            tracing::debug!(%now, "no reminder due");
            return Ok(None);
        }
        let message = select_message_for(progress, rng);
        self.show(&message, now)?;
        Ok(Some(message))
    }

    /// Scheduler entry point: evaluate only when the schedule says a check
    /// is due.
    pub fn tick<R: Rng>(
        &mut self,
        progress: &Progress,
        rng: &mut R,
    ) -> Result<Option<ReminderMessage>> {
        let now = self.clock.now_utc();
        if !self.scheduler.tick(now) {
            return Ok(None);
        }
        self.evaluate(progress, rng)
    }

    /// Show a message immediately, regardless of frequency.
    pub fn send_test<R: Rng>(
        &mut self,
        progress: &Progress,
        rng: &mut R,
    ) -> Result<ReminderMessage> {
        if self.gate.status() != Permission::Granted {
            return Err(JourneyError::PermissionDenied(format!(
                "permission is '{}'",
                self.gate.status()
            )));
        }
        let message = select_message_for(progress, rng);
        self.show(&message, self.clock.now_utc())?;
        Ok(message)
    }

    fn show(&mut self, message: &ReminderMessage, now: DateTime<Utc>) -> Result<()> {
        self.notifier.show(&message.title, &message.body)?;
        self.prefs.last_notification_date = Some(now);
        tracing::info!(title = %message.title, "reminder shown");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
