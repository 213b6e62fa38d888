// src/recording/filter.rs
//! Session admission filter
//!
//! Decides whether an event involving a given unit is written. Zero values
//! are wildcards: `map_filter == 0` and `instance_filter == 0` match every
//! scope, `radius == 0` disables the spatial test.

use crate::world::{Unit, WorldLocation};

/// Filter parameters resolved at session start
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SessionFilter {
    /// Only admit units on this map (0 = any)
    pub map_filter: u32,

    /// Only report this instance as in scope (0 = any)
    pub instance_filter: u32,

    /// Spatial radius around `anchor` (0 = unrestricted)
    pub radius: f32,

    /// Center of the radius test
    pub anchor: WorldLocation,
}

impl SessionFilter {
    /// Neutral filter admitting everything
    pub fn neutral() -> Self {
        Self::default()
    }

    pub fn is_neutral(&self) -> bool {
        *self == Self::neutral()
    }

    /// Admission decision for a single unit
    ///
    /// Units on a different map than the anchor only face the map test; the
    /// radius boundary is inclusive.
    pub fn admits(&self, unit: Option<&dyn Unit>) -> bool {
        let Some(unit) = unit else {
            return false;
        };

        let location = unit.location();

        if self.map_filter != 0 && location.map_id != self.map_filter {
            return false;
        }

        if self.radius > 0.0 && location.map_id == self.anchor.map_id {
            return location.distance_sq(&self.anchor) <= self.radius * self.radius;
        }

        true
    }

    /// Admission when either side of a two-unit event passes
    pub fn admits_either(&self, first: Option<&dyn Unit>, second: Option<&dyn Unit>) -> bool {
        self.admits(first) || self.admits(second)
    }

    /// Cheap (map, instance) pre-check for hook sites
    pub fn matches_scope(&self, map_id: u32, instance_id: u32) -> bool {
        if self.map_filter != 0 && self.map_filter != map_id {
            return false;
        }

        if self.instance_filter != 0 && self.instance_filter != instance_id {
            return false;
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::UnitSnapshot;
    use proptest::prelude::*;

    fn unit_at(map_id: u32, x: f32, y: f32, z: f32) -> UnitSnapshot {
        UnitSnapshot::creature(1, "Imp", "Creature-1", WorldLocation::new(map_id, x, y, z))
    }

    fn boss_room() -> SessionFilter {
        SessionFilter {
            map_filter: 0,
            instance_filter: 0,
            radius: 50.0,
            anchor: WorldLocation::new(0, 100.0, 100.0, 50.0),
        }
    }

    #[test]
    fn test_neutral_admits_everything() {
        let filter = SessionFilter::neutral();
        assert!(filter.is_neutral());
        assert!(filter.admits(Some(&unit_at(0, 0.0, 0.0, 0.0))));
        assert!(filter.admits(Some(&unit_at(533, 1e6, -1e6, 3.0))));
        assert!(filter.matches_scope(1, 2));
    }

    #[test]
    fn test_absent_unit_rejected() {
        assert!(!SessionFilter::neutral().admits(None));
        assert!(!SessionFilter::neutral().admits_either(None, None));
    }

    #[test]
    fn test_map_filter() {
        let filter = SessionFilter {
            map_filter: 409,
            ..Default::default()
        };
        assert!(filter.admits(Some(&unit_at(409, 0.0, 0.0, 0.0))));
        assert!(!filter.admits(Some(&unit_at(410, 0.0, 0.0, 0.0))));
    }

    #[test]
    fn test_radius_boundary_inclusive() {
        let filter = boss_room();
        assert!(filter.admits(Some(&unit_at(0, 150.0, 100.0, 50.0))));
        assert!(filter.admits(Some(&unit_at(0, 100.0, 100.0, 0.0))));
        assert!(!filter.admits(Some(&unit_at(0, 150.01, 100.0, 50.0))));
        assert!(!filter.admits(Some(&unit_at(0, 100.0, 300.0, 50.0))));
    }

    #[test]
    fn test_other_map_skips_radius() {
        let filter = boss_room();
        assert!(filter.admits(Some(&unit_at(1, 9000.0, 9000.0, 0.0))));

        let restricted = SessionFilter {
            map_filter: 1,
            ..boss_room()
        };
        assert!(restricted.admits(Some(&unit_at(1, 9000.0, 9000.0, 0.0))));
        assert!(!restricted.admits(Some(&unit_at(0, 100.0, 100.0, 50.0))));
    }

    #[test]
    fn test_admits_either() {
        let filter = boss_room();
        let near = unit_at(0, 110.0, 100.0, 50.0);
        let far = unit_at(0, 300.0, 100.0, 50.0);
        assert!(filter.admits_either(Some(&near), Some(&far)));
        assert!(filter.admits_either(Some(&far), Some(&near)));
        assert!(filter.admits_either(None, Some(&near)));
        assert!(!filter.admits_either(Some(&far), None));
    }

    #[test]
    fn test_scope() {
        let filter = SessionFilter {
            map_filter: 409,
            instance_filter: 12,
            ..Default::default()
        };
        assert!(filter.matches_scope(409, 12));
        assert!(!filter.matches_scope(409, 13));
        assert!(!filter.matches_scope(410, 12));

        let any_instance = SessionFilter {
            map_filter: 409,
            ..Default::default()
        };
        assert!(any_instance.matches_scope(409, 99));
    }

    proptest! {
        #[test]
        fn prop_inside_radius_admitted(
            radius in 1.0f32..500.0,
            fraction in 0.0f32..0.99,
            angle in 0.0f32..std::f32::consts::TAU,
        ) {
            let filter = SessionFilter {
                radius,
                anchor: WorldLocation::new(3, 10.0, -20.0, 5.0),
                ..Default::default()
            };
            let d = radius * fraction;
            let unit = unit_at(3, 10.0 + d * angle.cos(), -20.0 + d * angle.sin(), 5.0);
            prop_assert!(filter.admits(Some(&unit)));
        }

        #[test]
        fn prop_outside_radius_rejected(
            radius in 1.0f32..500.0,
            factor in 1.01f32..10.0,
            angle in 0.0f32..std::f32::consts::TAU,
        ) {
            let filter = SessionFilter {
                radius,
                anchor: WorldLocation::new(3, 10.0, -20.0, 5.0),
                ..Default::default()
            };
            let d = radius * factor;
            let unit = unit_at(3, 10.0 + d * angle.cos(), -20.0 + d * angle.sin(), 5.0);
            prop_assert!(!filter.admits(Some(&unit)));
        }

        #[test]
        fn prop_other_maps_ignore_radius(
            map_id in 4u32..1000,
            x in -1e5f32..1e5,
            y in -1e5f32..1e5,
        ) {
            let filter = SessionFilter {
                radius: 1.0,
                anchor: WorldLocation::new(3, 0.0, 0.0, 0.0),
                ..Default::default()
            };
            prop_assert!(filter.admits(Some(&unit_at(map_id, x, y, 0.0))));
        }
    }
}
