// src/world/mod.rs
//! Host-facing entity model
//!
//! The simulation host owns its units, spells and auras. The recorder only
//! needs a narrow, read-only view of them, expressed by the [`Unit`] trait and
//! the small spell/aura value types below. Hosts either implement [`Unit`] for
//! their own entity type or hand over a copied [`UnitSnapshot`].

/// Entity kind, resolved once per formatting call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitKind {
    /// Player-controlled character
    Player,

    /// Template-spawned creature
    Creature,

    /// Any other unit (pets, totems, vehicles)
    Unit,
}

/// A point on a map
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WorldLocation {
    pub map_id: u32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl WorldLocation {
    pub fn new(map_id: u32, x: f32, y: f32, z: f32) -> Self {
        Self { map_id, x, y, z }
    }

    /// Squared euclidean distance, ignoring the map
    pub fn distance_sq(&self, other: &WorldLocation) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx * dx + dy * dy + dz * dz
    }
}

/// Read-only view of a host unit
pub trait Unit: Send + Sync {
    fn kind(&self) -> UnitKind;

    /// Template id; 0 for players
    fn entry(&self) -> u32;

    fn name(&self) -> &str;

    /// Stable globally-unique id string
    fn guid(&self) -> String;

    fn location(&self) -> WorldLocation;

    fn instance_id(&self) -> u32;
}

/// Owned copy of a unit's recordable state
#[derive(Debug, Clone, PartialEq)]
pub struct UnitSnapshot {
    pub kind: UnitKind,
    pub entry: u32,
    pub name: String,
    pub guid: String,
    pub location: WorldLocation,
    pub instance_id: u32,
}

impl UnitSnapshot {
    pub fn player(name: impl Into<String>, guid: impl Into<String>, location: WorldLocation) -> Self {
        Self {
            kind: UnitKind::Player,
            entry: 0,
            name: name.into(),
            guid: guid.into(),
            location,
            instance_id: 0,
        }
    }

    pub fn creature(
        entry: u32,
        name: impl Into<String>,
        guid: impl Into<String>,
        location: WorldLocation,
    ) -> Self {
        Self {
            kind: UnitKind::Creature,
            entry,
            name: name.into(),
            guid: guid.into(),
            location,
            instance_id: 0,
        }
    }

    pub fn with_kind(mut self, kind: UnitKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_instance(mut self, instance_id: u32) -> Self {
        self.instance_id = instance_id;
        self
    }
}

impl Unit for UnitSnapshot {
    fn kind(&self) -> UnitKind {
        self.kind
    }

    fn entry(&self) -> u32 {
        self.entry
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn guid(&self) -> String {
        self.guid.clone()
    }

    fn location(&self) -> WorldLocation {
        self.location
    }

    fn instance_id(&self) -> u32 {
        self.instance_id
    }
}

/// Spell identity as written to the output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpellInfo {
    pub id: u32,

    /// Display name; may be empty
    pub name: String,
}

impl SpellInfo {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self { id, name: name.into() }
    }
}

/// An aura instance
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Aura {
    pub spell: Option<SpellInfo>,
}

impl Aura {
    pub fn new(spell: SpellInfo) -> Self {
        Self { spell: Some(spell) }
    }
}

/// An aura as applied to one target
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuraApplication {
    pub base: Option<Aura>,
}

impl AuraApplication {
    pub fn new(base: Aura) -> Self {
        Self { base: Some(base) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_sq() {
        let a = WorldLocation::new(0, 1.0, 2.0, 3.0);
        let b = WorldLocation::new(7, 4.0, 6.0, 3.0);
        assert_eq!(a.distance_sq(&b), 25.0);
        assert_eq!(b.distance_sq(&a), 25.0);
    }

    #[test]
    fn test_snapshot_as_unit() {
        let snapshot = UnitSnapshot::creature(
            1234,
            "Ragnaros",
            "Creature-0-1234-1",
            WorldLocation::new(409, 10.0, 20.0, 30.0),
        )
        .with_instance(7);

        let unit: &dyn Unit = &snapshot;
        assert_eq!(unit.kind(), UnitKind::Creature);
        assert_eq!(unit.entry(), 1234);
        assert_eq!(unit.name(), "Ragnaros");
        assert_eq!(unit.guid(), "Creature-0-1234-1");
        assert_eq!(unit.location().map_id, 409);
        assert_eq!(unit.instance_id(), 7);
    }

    #[test]
    fn test_player_has_no_entry() {
        let player = UnitSnapshot::player("Jaina", "Player-1", WorldLocation::default());
        assert_eq!(player.kind(), UnitKind::Player);
        assert_eq!(player.entry(), 0);
    }
}
