//! Unit tests for the spaces.

use cps_agent::{keys, Agent, AgentArena, IdSource, Params};
use cps_core::{AgentId, Millis, SimRng};
use cps_substrate::DecayKinetics;

use crate::{Space, TickCtx};

struct Harness {
    arena: AgentArena,
    ids: IdSource,
    rng: SimRng,
}

impl Harness {
    fn new(seed: u64) -> Self {
        Self {
            arena: AgentArena::new(),
            ids: IdSource::new(),
            rng: SimRng::new(seed),
        }
    }

    /// Mirror of the simulation's add path: assign id, space placement, then
    /// arena insertion with unclaimed params stored.
    fn add_agent(
        &mut self,
        space: &mut dyn Space,
        params: Params,
    ) -> Result<AgentId, crate::SpaceError> {
        let mut agent = Agent::new();
        agent.assign_id(&mut self.ids);
        space.add_agent(&mut agent, &params, &self.arena)?;
        for (name, value) in params.iter() {
            if !agent.has_attribute(name) {
                agent.set_attribute(name, value.clone());
            }
        }
        Ok(self.arena.push(agent))
    }

    fn update(&mut self, space: &mut dyn Space, dt: Millis) {
        let mut ctx = TickCtx {
            rng: &mut self.rng,
            ids: &mut self.ids,
        };
        space.update(dt, &mut self.arena, &mut ctx).unwrap();
    }
}

#[cfg(test)]
mod homogeneous {
    use super::*;
    use crate::HomogeneousSpace;

    #[test]
    fn add_agent_provisions_space_attributes() {
        let mut h = Harness::new(1);
        let mut space = HomogeneousSpace::new(10.0, None, None);
        let id = h
            .add_agent(&mut space, Params::new().with(keys::VOLUME, 2.0))
            .unwrap();
        let agent = h.arena.get(id).unwrap();
        assert_eq!(agent.bool_attr(keys::DIVISION_PENDING), Some(false));
        assert_eq!(agent.bool_attr(keys::DIVISION_COMPLETED), Some(false));
        assert_eq!(agent.bool_attr(keys::REMOVE_PENDING), Some(false));
        assert_eq!(agent.float_attr(keys::VOLUME), Some(2.0));
    }

    #[test]
    fn capacity_overflow_warns_but_accepts() {
        let mut h = Harness::new(1);
        let mut space = HomogeneousSpace::new(1.0, None, None);
        h.add_agent(&mut space, Params::new().with(keys::VOLUME, 5.0)).unwrap();
        assert_eq!(h.arena.len(), 1);
    }

    #[test]
    fn division_within_capacity_appends_a_clone() {
        let mut h = Harness::new(2);
        let mut space = HomogeneousSpace::new(2.0, None, None);
        let id = h
            .add_agent(&mut space, Params::new().with(keys::VOLUME, 1.0))
            .unwrap();
        h.arena
            .get_mut(id)
            .unwrap()
            .set_attribute(keys::DIVISION_PENDING, true);

        h.update(&mut space, Millis(10));

        assert_eq!(h.arena.len(), 2);
        let mother = h.arena.get(id).unwrap();
        assert_eq!(mother.bool_attr(keys::DIVISION_PENDING), Some(false));
        assert_eq!(mother.bool_attr(keys::DIVISION_COMPLETED), Some(true));
        // Daughter appended at the end, attributes copied, fresh id.
        let daughter = h.arena.as_slice().last().unwrap();
        assert_ne!(daughter.id(), id);
        assert_eq!(daughter.bool_attr(keys::DIVISION_COMPLETED), Some(true));
    }

    #[test]
    fn division_beyond_capacity_latches_until_removal() {
        let mut h = Harness::new(3);
        let mut space = HomogeneousSpace::new(2.0, None, None);
        let a = h.add_agent(&mut space, Params::new().with(keys::VOLUME, 1.0)).unwrap();
        let b = h.add_agent(&mut space, Params::new().with(keys::VOLUME, 1.0)).unwrap();

        h.arena.get_mut(a).unwrap().set_attribute(keys::DIVISION_PENDING, true);
        h.update(&mut space, Millis(10));
        assert_eq!(h.arena.len(), 2, "no room: division blocked");
        assert!(!space.has_free_volume());
        // The request stays pending for a later tick.
        assert_eq!(
            h.arena.get(a).unwrap().bool_attr(keys::DIVISION_PENDING),
            Some(true)
        );

        // Removal frees space and lifts the latch.
        h.arena.get_mut(b).unwrap().set_attribute(keys::REMOVE_PENDING, true);
        h.update(&mut space, Millis(10));
        assert!(h.arena.get(b).is_none());
        assert!(space.has_free_volume());

        h.update(&mut space, Millis(10));
        assert_eq!(h.arena.len(), 2, "pending division completed after removal");
    }

    #[test]
    fn unknown_substrate_in_agent_info_is_an_error() {
        let mut h = Harness::new(4);
        let mut space = HomogeneousSpace::new(10.0, None, None);
        let mut map = cps_agent::SubstrateMap::default();
        map.insert("ghost".into(), cps_core::SubstrateInfo::flux(0.1, 0.0, 0.0));
        let id = h.add_agent(&mut space, Params::new()).unwrap();
        h.arena.get_mut(id).unwrap().set_attribute(keys::SUBSTRATE_INFO, map);

        let mut ctx = TickCtx { rng: &mut h.rng, ids: &mut h.ids };
        let result = space.update(Millis(10), &mut h.arena, &mut ctx);
        assert!(matches!(result, Err(crate::SpaceError::UnknownSubstrate(_))));
    }

    #[test]
    fn substrate_decays_on_its_own_clock() {
        let mut h = Harness::new(5);
        let mut space = HomogeneousSpace::new(1000.0, None, None);
        let k = (2.0_f64).ln() / 1000.0;
        space.add_substrate("drug", 0.0, k, DecayKinetics::FirstOrder).unwrap();
        space.substrate_mut("drug").unwrap().set_concentration(1.0);

        // The first due update runs with zero accumulated time, so 101 calls
        // apply exactly 100 decay steps of 10 ms.
        for _ in 0..101 {
            h.update(&mut space, Millis(10));
        }
        let c = space.substrate("drug").unwrap().concentration();
        assert!((c - 0.5).abs() < 1e-9, "got {c}");
    }
}

#[cfg(test)]
mod lattice {
    use super::*;
    use crate::{Lattice2DSpace, SpaceError};

    fn place(h: &mut Harness, space: &mut Lattice2DSpace, pos: (i32, i32)) -> AgentId {
        h.add_agent(space, Params::new().with(keys::POSITION, pos)).unwrap()
    }

    /// Placement-conservation invariant: the set of position attributes and
    /// the set of occupied layer cells agree, one-to-one.
    fn assert_placement_consistent(space: &Lattice2DSpace, arena: &AgentArena) {
        let mut from_layer = Vec::new();
        let (nx, ny) = space.dimensions();
        for x in 0..nx as i32 {
            for y in 0..ny as i32 {
                if let Some(id) = space.agent_at((x, y)) {
                    from_layer.push((id, (x, y)));
                }
            }
        }
        assert_eq!(from_layer.len(), arena.len());
        for (id, pos) in from_layer {
            let agent = arena.get(id).expect("layer references a live agent");
            assert_eq!(agent.pair_attr(keys::POSITION), Some(pos));
        }
    }

    #[test]
    fn add_agent_validation() {
        let mut h = Harness::new(1);
        let mut space = Lattice2DSpace::new((3, 3), 10.0, None, None);
        assert!(matches!(
            h.add_agent(&mut space, Params::new()),
            Err(SpaceError::MissingPosition)
        ));
        assert!(matches!(
            h.add_agent(&mut space, Params::new().with(keys::POSITION, (3, 0))),
            Err(SpaceError::OutOfBounds { .. })
        ));
        place(&mut h, &mut space, (1, 1));
        assert!(matches!(
            h.add_agent(&mut space, Params::new().with(keys::POSITION, (1, 1))),
            Err(SpaceError::PositionOccupied { .. })
        ));
        // Failed additions leave no placement behind.
        assert_eq!(h.arena.len(), 1);
        assert_placement_consistent(&space, &h.arena);
    }

    #[test]
    fn add_agent_provisions_lattice_attributes() {
        let mut h = Harness::new(1);
        let mut space = Lattice2DSpace::new((3, 3), 10.0, None, None);
        let id = h
            .add_agent(
                &mut space,
                Params::new()
                    .with(keys::POSITION, (0, 2))
                    .with(keys::MOTILITY, 0.02)
                    .with(keys::BINDING_AFFINITY, 1.5)
                    .with(keys::DISPLACEMENT_LIMIT, 3),
            )
            .unwrap();
        let agent = h.arena.get(id).unwrap();
        assert_eq!(agent.pair_attr(keys::POSITION), Some((0, 2)));
        assert_eq!(agent.float_attr(keys::MOTILITY), Some(0.02));
        assert_eq!(agent.float_attr(keys::BINDING_AFFINITY), Some(1.5));
        assert_eq!(agent.int_attr(keys::DISPLACEMENT_LIMIT), Some(3));
        assert_eq!(space.agent_at((0, 2)), Some(id));
    }

    #[test]
    fn remaining_volume_accounts_for_occupant() {
        let mut h = Harness::new(1);
        let mut space = Lattice2DSpace::new((3, 3), 10.0, None, None);
        assert_eq!(space.get_remaining_volume((0, 0), &h.arena), 100.0);
        h.add_agent(
            &mut space,
            Params::new().with(keys::POSITION, (0, 0)).with(keys::VOLUME, 30.0),
        )
        .unwrap();
        assert_eq!(space.get_remaining_volume((0, 0), &h.arena), 70.0);
    }

    #[test]
    fn immobile_agents_never_move() {
        let mut h = Harness::new(7);
        let mut space = Lattice2DSpace::new((5, 5), 10.0, None, None);
        let id = place(&mut h, &mut space, (2, 2));
        for _ in 0..100 {
            h.update(&mut space, Millis(10));
        }
        assert_eq!(h.arena.get(id).unwrap().pair_attr(keys::POSITION), Some((2, 2)));
        assert_placement_consistent(&space, &h.arena);
    }

    #[test]
    fn motile_agents_wander_and_exclusion_holds() {
        let mut h = Harness::new(8);
        let mut space = Lattice2DSpace::new((6, 6), 10.0, None, None);
        for pos in [(0, 0), (2, 3), (5, 5), (3, 1)] {
            h.add_agent(
                &mut space,
                Params::new().with(keys::POSITION, pos).with(keys::MOTILITY, 1.0),
            )
            .unwrap();
        }
        let mut any_movement = false;
        let initial: Vec<_> = h
            .arena
            .iter()
            .map(|a| a.pair_attr(keys::POSITION).unwrap())
            .collect();
        for _ in 0..50 {
            h.update(&mut space, Millis(10));
            assert_placement_consistent(&space, &h.arena);
        }
        let after: Vec<_> = h
            .arena
            .iter()
            .map(|a| a.pair_attr(keys::POSITION).unwrap())
            .collect();
        if initial != after {
            any_movement = true;
        }
        assert!(any_movement, "motility 1.0 over 50 ticks must move someone");
    }

    #[test]
    fn division_into_adjacent_empty_cell() {
        let mut h = Harness::new(9);
        let mut space = Lattice2DSpace::new((3, 1), 10.0, None, None);
        let mother = place(&mut h, &mut space, (0, 0));
        place(&mut h, &mut space, (2, 0));
        h.arena
            .get_mut(mother)
            .unwrap()
            .set_attribute(keys::DIVISION_PENDING, true);

        h.update(&mut space, Millis(10));

        // Path (0,0)→(1,0): two cells, no pushing; daughter at (1,0).
        assert_eq!(h.arena.len(), 3);
        let daughter_id = space.agent_at((1, 0)).unwrap();
        assert_ne!(daughter_id, mother);
        let mother_agent = h.arena.get(mother).unwrap();
        assert_eq!(mother_agent.pair_attr(keys::POSITION), Some((0, 0)));
        assert_eq!(mother_agent.bool_attr(keys::DIVISION_COMPLETED), Some(true));
        assert_placement_consistent(&space, &h.arena);
    }

    #[test]
    fn division_pushes_intermediate_agents_along_the_path() {
        let mut h = Harness::new(10);
        let mut space = Lattice2DSpace::new((4, 1), 10.0, None, None);
        let mother = place(&mut h, &mut space, (0, 0));
        let middle = place(&mut h, &mut space, (1, 0));
        // Mother at (0,0), neighbor at (1,0); nearest empty is (2,0) at
        // distance 2 — reachable only with displacement_limit ≥ 2.
        h.arena
            .get_mut(mother)
            .unwrap()
            .set_attribute(keys::DISPLACEMENT_LIMIT, 2);
        h.arena
            .get_mut(mother)
            .unwrap()
            .set_attribute(keys::DIVISION_PENDING, true);

        h.update(&mut space, Millis(10));

        assert_eq!(h.arena.len(), 3);
        // The middle agent was pushed from (1,0) to (2,0); daughter took (1,0).
        assert_eq!(
            h.arena.get(middle).unwrap().pair_attr(keys::POSITION),
            Some((2, 0))
        );
        let daughter_id = space.agent_at((1, 0)).unwrap();
        assert_ne!(daughter_id, mother);
        assert_ne!(daughter_id, middle);
        assert_placement_consistent(&space, &h.arena);
    }

    #[test]
    fn division_skipped_beyond_displacement_limit() {
        let mut h = Harness::new(11);
        let mut space = Lattice2DSpace::new((4, 1), 10.0, None, None);
        let mother = place(&mut h, &mut space, (0, 0));
        place(&mut h, &mut space, (1, 0));
        // displacement_limit defaults to 1; nearest empty is at distance 2.
        h.arena
            .get_mut(mother)
            .unwrap()
            .set_attribute(keys::DIVISION_PENDING, true);

        h.update(&mut space, Millis(10));

        assert_eq!(h.arena.len(), 2, "division must be skipped");
        assert_eq!(
            h.arena.get(mother).unwrap().bool_attr(keys::DIVISION_PENDING),
            Some(true),
            "flag stays raised for the next tick"
        );
        assert_placement_consistent(&space, &h.arena);
    }

    #[test]
    fn division_on_a_full_lattice_is_skipped() {
        let mut h = Harness::new(12);
        let mut space = Lattice2DSpace::new((2, 1), 10.0, None, None);
        let mother = place(&mut h, &mut space, (0, 0));
        place(&mut h, &mut space, (1, 0));
        h.arena
            .get_mut(mother)
            .unwrap()
            .set_attribute(keys::DIVISION_PENDING, true);
        h.update(&mut space, Millis(10));
        assert_eq!(h.arena.len(), 2);
    }

    #[test]
    fn removal_clears_the_layer_cell() {
        let mut h = Harness::new(13);
        let mut space = Lattice2DSpace::new((3, 3), 10.0, None, None);
        let id = place(&mut h, &mut space, (1, 1));
        h.arena.get_mut(id).unwrap().set_attribute(keys::REMOVE_PENDING, true);
        h.update(&mut space, Millis(10));
        assert!(h.arena.get(id).is_none());
        assert!(space.is_empty_position((1, 1)));
        assert_placement_consistent(&space, &h.arena);
    }

    #[test]
    fn static_node_registration_validates_substrate_and_position() {
        let mut space = Lattice2DSpace::new((3, 3), 10.0, None, None);
        let node = cps_substrate::StaticNode::new(
            Some((1, 1)),
            1.0,
            cps_core::SubstrateInfo::fixed(1.0),
        );
        assert!(matches!(
            space.add_static_node("oxygen", node.clone()),
            Err(SpaceError::UnknownSubstrate(_))
        ));
        space.add_substrate("oxygen", 1.0, 0.0, DecayKinetics::FirstOrder).unwrap();
        assert!(space.add_static_node("oxygen", node).is_ok());
        let bad = cps_substrate::StaticNode::new(
            Some((9, 9)),
            1.0,
            cps_core::SubstrateInfo::fixed(1.0),
        );
        assert!(matches!(
            space.add_static_node("oxygen", bad),
            Err(SpaceError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn agent_flux_couples_to_the_lattice_field() {
        let mut h = Harness::new(14);
        let mut space = Lattice2DSpace::new((3, 3), 10.0, None, None);
        space.add_substrate("oxygen", 0.0, 0.0, DecayKinetics::FirstOrder).unwrap();
        space
            .substrate_mut("oxygen")
            .unwrap()
            .concentration_mut()
            .fill(1.0);

        let id = h
            .add_agent(
                &mut space,
                Params::new().with(keys::POSITION, (1, 1)).with(keys::VOLUME, 10.0),
            )
            .unwrap();
        let mut map = cps_agent::SubstrateMap::default();
        map.insert("oxygen".into(), cps_core::SubstrateInfo::flux(0.0, 0.01, 0.0));
        h.arena.get_mut(id).unwrap().set_attribute(keys::SUBSTRATE_INFO, map);

        for _ in 0..10 {
            h.update(&mut space, Millis(10));
        }
        let uptaken = h.arena.get(id).unwrap().substrates().unwrap()["oxygen"].concentration;
        assert!(uptaken > 0.0, "agent must take up substrate");
        let remaining = space.substrate("oxygen").unwrap().concentration_at((1, 1));
        assert!(remaining < 1.0);
    }
}
