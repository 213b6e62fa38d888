// src/recording/controller.rs
//! Session controller
//!
//! Owns the single optional recording session and serializes every state
//! transition (start, stop, each `record_*` call) behind one mutex. The host
//! composition root constructs one controller and hands `Arc` clones to its
//! hook sites.
//!
//! # Hook-site usage
//!
//! ```text
//! if controller.is_active() {                    // atomic load, no lock
//!     controller.record_damage(attacker, victim, amount);
//! }
//! ```
//!
//! Recording calls return nothing: filter rejections, the event cap and I/O
//! failures are absorbed here and never reach the host.

use crate::observability;
use crate::recording::event::EventPayload;
use crate::recording::filter::SessionFilter;
use crate::recording::session::{ActiveSession, SessionSummary};
use crate::recording::writer::{AppendOutcome, WriterStats};
use crate::utils::config::RecorderConfig;
use crate::utils::errors::{RecorderError, Result};
use crate::world::{Aura, AuraApplication, SpellInfo, Unit, WorldLocation};
use chrono::Local;
use parking_lot::{Mutex, RwLock};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Text returned by [`SessionController::session_info`] when idle
pub const NO_ACTIVE_SESSION: &str = "No active recording session.";

/// Snapshot of the active session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionStatus {
    pub name: String,
    pub path: PathBuf,
    pub filter: SessionFilter,
    pub events_written: u32,
    pub max_events: u32,
    pub elapsed: Duration,
    pub stats: WriterStats,
}

/// Event recording session controller
pub struct SessionController {
    config: RwLock<RecorderConfig>,

    /// Mirrors `session.is_some()`; written only under the session lock
    active: AtomicBool,

    session: Mutex<Option<ActiveSession>>,
}

impl SessionController {
    /// Create a controller from a resolved configuration snapshot
    pub fn new(config: RecorderConfig) -> Self {
        Self {
            config: RwLock::new(config),
            active: AtomicBool::new(false),
            session: Mutex::new(None),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.read().enable
    }

    /// True while a session is open; lock-free
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// True while a session is open whose scope covers `(map_id, instance_id)`
    pub fn is_active_for_scope(&self, map_id: u32, instance_id: u32) -> bool {
        if !self.is_active() {
            return false;
        }

        self.session
            .lock()
            .as_ref()
            .map_or(false, |session| session.filter().matches_scope(map_id, instance_id))
    }

    /// Current configuration snapshot
    pub fn config(&self) -> RecorderConfig {
        self.config.read().clone()
    }

    /// Replace the configuration snapshot
    ///
    /// An open session keeps the cap it started with. Disabling the recorder
    /// stops an open session first.
    pub fn reload_config(&self, config: RecorderConfig) -> Result<()> {
        config.validate()?;

        let mut slot = self.session.lock();

        if !config.enable {
            if let Some(session) = slot.take() {
                self.active.store(false, Ordering::Release);
                info!("Event recorder disabled by config reload; stopping '{}'", session.name());
                if let Err(e) = self.finish(session) {
                    error!("Failed to close session during config reload: {}", e);
                }
            }
        }

        if config.enable {
            info!(
                "Event recorder enabled (output: {:?}, max events: {})",
                config.output_dir, config.max_events
            );
        }

        *self.config.write() = config;
        Ok(())
    }

    /// Open a new session
    ///
    /// The map filter is `map_override` when nonzero, else the origin's map,
    /// else unrestricted. The instance filter and radius anchor come from the
    /// origin; without one the anchor is `(0, 0, 0)` on map 0. The radius is
    /// `radius_override` when positive, else the configured default.
    ///
    /// Returns the path of the session file.
    pub fn start_session(
        &self,
        name: &str,
        origin: Option<&dyn Unit>,
        map_override: u32,
        radius_override: f32,
    ) -> Result<PathBuf> {
        let mut slot = self.session.lock();
        let config = self.config.read().clone();

        if !config.enable {
            return Err(RecorderError::Disabled);
        }

        validate_session_name(name)?;

        if let Some(active) = slot.as_ref() {
            return Err(RecorderError::AlreadyActive(active.name().to_string()));
        }

        std::fs::create_dir_all(&config.output_dir).map_err(|source| {
            error!(
                "Failed to create output directory {:?}: {}",
                config.output_dir, source
            );
            RecorderError::OutputDirectory {
                path: config.output_dir.clone(),
                source,
            }
        })?;

        let filter = resolve_filter(origin, map_override, radius_override, config.default_radius);

        let session = ActiveSession::open(name, &config.output_dir, filter, config.max_events, Local::now())
            .map_err(|e| {
                error!("Failed to open session '{}': {}", name, e);
                e
            })?;

        let path = session.path().to_path_buf();

        info!(
            "Started recording session '{}' (map: {}, instance: {}, radius: {:.1}, file: {:?})",
            name, filter.map_filter, filter.instance_filter, filter.radius, path
        );

        *slot = Some(session);
        self.active.store(true, Ordering::Release);
        observability::session_started();

        Ok(path)
    }

    /// Close the open session, writing `record_stop`
    ///
    /// The session is torn down even if the final write fails.
    pub fn stop_session(&self) -> Result<SessionSummary> {
        let mut slot = self.session.lock();

        let Some(session) = slot.take() else {
            return Err(if self.is_enabled() {
                RecorderError::NotActive
            } else {
                RecorderError::Disabled
            });
        };

        self.active.store(false, Ordering::Release);
        self.finish(session)
    }

    fn finish(&self, session: ActiveSession) -> Result<SessionSummary> {
        let name = session.name().to_string();

        let summary = session.close().map_err(|e| {
            error!("Failed to finalize session '{}': {}", name, e);
            e
        })?;

        info!(
            "Stopped recording session '{}' ({:.1}s, {} events, {} dropped)",
            summary.name, summary.duration, summary.events_captured, summary.stats.events_dropped
        );
        observability::session_stopped();

        Ok(summary)
    }

    /// Operator-facing one-line description of the session
    pub fn session_info(&self) -> String {
        let slot = self.session.lock();

        let Some(session) = slot.as_ref() else {
            return NO_ACTIVE_SESSION.to_string();
        };

        let filter = session.filter();
        format!(
            "Session: '{}' | Map: {} | Instance: {} | Events: {} / {} | Elapsed: {:.1}s | Radius: {:.1}",
            session.name(),
            filter.map_filter,
            filter.instance_filter,
            session.events_written(),
            session.max_events(),
            session.elapsed().as_secs_f64(),
            filter.radius
        )
    }

    /// Structured snapshot of the session, if one is open
    pub fn status(&self) -> Option<SessionStatus> {
        let slot = self.session.lock();
        slot.as_ref().map(|session| SessionStatus {
            name: session.name().to_string(),
            path: session.path().to_path_buf(),
            filter: *session.filter(),
            events_written: session.events_written(),
            max_events: session.max_events(),
            elapsed: session.elapsed(),
            stats: session.stats().clone(),
        })
    }

    /// Active filter, or the neutral filter when idle
    pub fn filter(&self) -> SessionFilter {
        self.session
            .lock()
            .as_ref()
            .map_or_else(SessionFilter::neutral, |session| *session.filter())
    }

    /// Record `unit` entering combat with `victim`; admitted on `unit`
    pub fn record_enter_combat(&self, unit: Option<&dyn Unit>, victim: Option<&dyn Unit>) {
        self.record_with(|filter| {
            filter
                .admits(unit)
                .then(|| EventPayload::enter_combat(unit, victim))
        });
    }

    pub fn record_leave_combat(&self, unit: Option<&dyn Unit>) {
        self.record_with(|filter| filter.admits(unit).then(|| EventPayload::leave_combat(unit)));
    }

    pub fn record_evade(&self, unit: Option<&dyn Unit>, reason: u8) {
        self.record_with(|filter| filter.admits(unit).then(|| EventPayload::evade(unit, reason)));
    }

    /// Admitted when either the victim or the killer passes
    pub fn record_death(&self, victim: Option<&dyn Unit>, killer: Option<&dyn Unit>) {
        self.record_with(|filter| {
            filter
                .admits_either(victim, killer)
                .then(|| EventPayload::death(victim, killer))
        });
    }

    /// Admitted when either the attacker or the victim passes
    pub fn record_damage(&self, attacker: Option<&dyn Unit>, victim: Option<&dyn Unit>, amount: u32) {
        self.record_with(|filter| {
            filter
                .admits_either(attacker, victim)
                .then(|| EventPayload::damage(attacker, victim, amount))
        });
    }

    /// Admitted when either the healer or the target passes
    pub fn record_heal(&self, healer: Option<&dyn Unit>, target: Option<&dyn Unit>, amount: u32) {
        self.record_with(|filter| {
            filter
                .admits_either(healer, target)
                .then(|| EventPayload::heal(healer, target, amount))
        });
    }

    pub fn record_aura_apply(&self, target: Option<&dyn Unit>, aura: Option<&Aura>) {
        self.record_with(|filter| {
            let aura = aura?;
            filter
                .admits(target)
                .then(|| EventPayload::aura_apply(target, aura))
        });
    }

    pub fn record_aura_remove(
        &self,
        target: Option<&dyn Unit>,
        application: Option<&AuraApplication>,
        remove_mode: u8,
    ) {
        self.record_with(|filter| {
            let application = application?;
            if !filter.admits(target) {
                return None;
            }
            EventPayload::aura_remove(target, application, remove_mode)
        });
    }

    pub fn record_spell_cast(&self, caster: Option<&dyn Unit>, spell: Option<&SpellInfo>) {
        self.record_with(|filter| {
            let spell = spell?;
            filter
                .admits(caster)
                .then(|| EventPayload::spell_cast(caster, spell))
        });
    }

    /// Filter, build and append under the session lock
    fn record_with<F>(&self, build: F)
    where
        F: FnOnce(&SessionFilter) -> Option<EventPayload>,
    {
        if !self.is_active() {
            return;
        }

        let mut slot = self.session.lock();
        let Some(session) = slot.as_mut() else {
            return;
        };

        let Some(payload) = build(session.filter()) else {
            debug!("Event rejected by session filter");
            return;
        };

        match session.write(&payload) {
            Ok(AppendOutcome::Written) => observability::event_written(payload.name()),
            Ok(AppendOutcome::Dropped) => observability::event_dropped(),
            Err(e) => warn!(
                "Failed to record {} event for session '{}': {}",
                payload.name(),
                session.name(),
                e
            ),
        }
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        if let Some(session) = self.session.get_mut().take() {
            self.active.store(false, Ordering::Release);
            if let Err(e) = self.finish(session) {
                error!("Failed to close session on shutdown: {}", e);
            }
        }
    }
}

/// Resolve session filters from the start parameters
pub fn resolve_filter(
    origin: Option<&dyn Unit>,
    map_override: u32,
    radius_override: f32,
    default_radius: f32,
) -> SessionFilter {
    let radius = if radius_override > 0.0 {
        radius_override
    } else {
        default_radius.max(0.0)
    };

    // Without an origin the radius is anchored at the world origin
    let Some(origin) = origin else {
        return SessionFilter {
            map_filter: map_override,
            radius,
            ..SessionFilter::neutral()
        };
    };

    let anchor: WorldLocation = origin.location();

    SessionFilter {
        map_filter: if map_override != 0 { map_override } else { anchor.map_id },
        instance_filter: origin.instance_id(),
        radius,
        anchor,
    }
}

/// Session names become part of a file name
fn validate_session_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(RecorderError::InvalidSessionName("name cannot be empty".to_string()));
    }

    if name == "." || name == ".." {
        return Err(RecorderError::InvalidSessionName(format!("'{}' is reserved", name)));
    }

    if name.chars().any(|c| c == '/' || c == '\\' || c.is_control()) {
        return Err(RecorderError::InvalidSessionName(format!(
            "'{}' contains path separators or control characters",
            name.escape_debug()
        )));
    }

    Ok(())
}
