// src/recording/event.rs
//! Event formatting
//!
//! Stateless translation from host entities and event fields into the JSON
//! Lines wire format. Every line shares the envelope
//! `{"t":<seconds, 3 decimals>,"event":"<kind>",...}`; the kind-specific
//! fields come from [`EventPayload`].

use crate::utils::errors::Result;
use crate::world::{Aura, AuraApplication, SpellInfo, Unit, UnitKind};
use serde::{Deserialize, Serialize};
use std::io;
use std::time::Duration;

/// Spell name written when the host has none
pub const UNKNOWN_SPELL_NAME: &str = "Unknown";

/// Nested entity descriptor
///
/// An absent entity is written as JSON `null` (`Option::None`), never omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum UnitDescriptor {
    Player { name: String, guid: String },
    Creature { entry: u32, name: String, guid: String },
    Unit { entry: u32, name: String, guid: String },
}

impl UnitDescriptor {
    /// Describe a unit, or `None` for an absent one
    pub fn describe(unit: Option<&dyn Unit>) -> Option<Self> {
        let unit = unit?;
        let name = unit.name().to_string();
        let guid = unit.guid();

        Some(match unit.kind() {
            UnitKind::Player => UnitDescriptor::Player { name, guid },
            UnitKind::Creature => UnitDescriptor::Creature {
                entry: unit.entry(),
                name,
                guid,
            },
            UnitKind::Unit => UnitDescriptor::Unit {
                entry: unit.entry(),
                name,
                guid,
            },
        })
    }

    pub fn name(&self) -> &str {
        match self {
            UnitDescriptor::Player { name, .. }
            | UnitDescriptor::Creature { name, .. }
            | UnitDescriptor::Unit { name, .. } => name,
        }
    }

    pub fn guid(&self) -> &str {
        match self {
            UnitDescriptor::Player { guid, .. }
            | UnitDescriptor::Creature { guid, .. }
            | UnitDescriptor::Unit { guid, .. } => guid,
        }
    }
}

/// Kind-specific event fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EventPayload {
    RecordStart {
        session: String,
        map: u32,
        file: String,
    },
    RecordStop {
        session: String,
        duration: f64,
        events_captured: u32,
    },
    EnterCombat {
        source: Option<UnitDescriptor>,
        target: Option<UnitDescriptor>,
    },
    LeaveCombat {
        source: Option<UnitDescriptor>,
    },
    Evade {
        source: Option<UnitDescriptor>,
        reason: u8,
    },
    Death {
        source: Option<UnitDescriptor>,
        killer: Option<UnitDescriptor>,
    },
    Damage {
        source: Option<UnitDescriptor>,
        target: Option<UnitDescriptor>,
        amount: u32,
    },
    Heal {
        source: Option<UnitDescriptor>,
        target: Option<UnitDescriptor>,
        amount: u32,
    },
    AuraApply {
        target: Option<UnitDescriptor>,
        spell_id: u32,
        spell_name: String,
    },
    AuraRemove {
        target: Option<UnitDescriptor>,
        spell_id: u32,
        spell_name: String,
        remove_mode: u8,
    },
    SpellCast {
        source: Option<UnitDescriptor>,
        spell_id: u32,
        spell_name: String,
    },
}

impl EventPayload {
    /// Wire name of the `event` field
    pub fn name(&self) -> &'static str {
        match self {
            EventPayload::RecordStart { .. } => "record_start",
            EventPayload::RecordStop { .. } => "record_stop",
            EventPayload::EnterCombat { .. } => "enter_combat",
            EventPayload::LeaveCombat { .. } => "leave_combat",
            EventPayload::Evade { .. } => "evade",
            EventPayload::Death { .. } => "death",
            EventPayload::Damage { .. } => "damage",
            EventPayload::Heal { .. } => "heal",
            EventPayload::AuraApply { .. } => "aura_apply",
            EventPayload::AuraRemove { .. } => "aura_remove",
            EventPayload::SpellCast { .. } => "spell_cast",
        }
    }

    pub fn enter_combat(unit: Option<&dyn Unit>, victim: Option<&dyn Unit>) -> Self {
        EventPayload::EnterCombat {
            source: UnitDescriptor::describe(unit),
            target: UnitDescriptor::describe(victim),
        }
    }

    pub fn leave_combat(unit: Option<&dyn Unit>) -> Self {
        EventPayload::LeaveCombat {
            source: UnitDescriptor::describe(unit),
        }
    }

    pub fn evade(unit: Option<&dyn Unit>, reason: u8) -> Self {
        EventPayload::Evade {
            source: UnitDescriptor::describe(unit),
            reason,
        }
    }

    pub fn death(victim: Option<&dyn Unit>, killer: Option<&dyn Unit>) -> Self {
        EventPayload::Death {
            source: UnitDescriptor::describe(victim),
            killer: UnitDescriptor::describe(killer),
        }
    }

    pub fn damage(attacker: Option<&dyn Unit>, victim: Option<&dyn Unit>, amount: u32) -> Self {
        EventPayload::Damage {
            source: UnitDescriptor::describe(attacker),
            target: UnitDescriptor::describe(victim),
            amount,
        }
    }

    pub fn heal(healer: Option<&dyn Unit>, target: Option<&dyn Unit>, amount: u32) -> Self {
        EventPayload::Heal {
            source: UnitDescriptor::describe(healer),
            target: UnitDescriptor::describe(target),
            amount,
        }
    }

    pub fn aura_apply(target: Option<&dyn Unit>, aura: &Aura) -> Self {
        let (spell_id, spell_name) = spell_fields(aura.spell.as_ref());
        EventPayload::AuraApply {
            target: UnitDescriptor::describe(target),
            spell_id,
            spell_name,
        }
    }

    /// `None` when the application carries no base aura
    pub fn aura_remove(
        target: Option<&dyn Unit>,
        application: &AuraApplication,
        remove_mode: u8,
    ) -> Option<Self> {
        let base = application.base.as_ref()?;
        let (spell_id, spell_name) = spell_fields(base.spell.as_ref());
        Some(EventPayload::AuraRemove {
            target: UnitDescriptor::describe(target),
            spell_id,
            spell_name,
            remove_mode,
        })
    }

    pub fn spell_cast(caster: Option<&dyn Unit>, spell: &SpellInfo) -> Self {
        let (spell_id, spell_name) = spell_fields(Some(spell));
        EventPayload::SpellCast {
            source: UnitDescriptor::describe(caster),
            spell_id,
            spell_name,
        }
    }
}

fn spell_fields(spell: Option<&SpellInfo>) -> (u32, String) {
    match spell {
        Some(spell) if !spell.name.is_empty() => (spell.id, spell.name.clone()),
        Some(spell) => (spell.id, UNKNOWN_SPELL_NAME.to_string()),
        None => (0, UNKNOWN_SPELL_NAME.to_string()),
    }
}

/// Seconds with millisecond resolution, as written in `t` and `duration`
pub fn session_seconds(elapsed: Duration) -> f64 {
    elapsed.as_millis() as f64 / 1000.0
}

/// Compact JSON that prints every float with exactly three decimals
struct MillisecondFloats;

impl serde_json::ser::Formatter for MillisecondFloats {
    fn write_f64<W>(&mut self, writer: &mut W, value: f64) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        write!(writer, "{:.3}", value)
    }
}

/// Render one output line (without the newline terminator)
///
/// String escaping (quotes, backslashes, control characters) is left to
/// `serde_json`; `t` and `duration` are always printed with exactly three
/// decimals.
pub fn render_line(elapsed: Duration, payload: &EventPayload) -> Result<String> {
    let mut buf = Vec::with_capacity(128);
    payload.serialize(&mut serde_json::Serializer::with_formatter(&mut buf, MillisecondFloats))?;
    let body = String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    // body is always an object that starts with the "event" tag
    Ok(format!("{{\"t\":{:.3},{}", session_seconds(elapsed), &body[1..]))
}

/// A line read back from a session file
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RecordedLine {
    pub t: f64,

    #[serde(flatten)]
    pub payload: EventPayload,
}

impl RecordedLine {
    pub fn parse(line: &str) -> Result<Self> {
        Ok(serde_json::from_str(line)?)
    }
}
