//! Unit tests for agent storage.

#[cfg(test)]
mod agent {
    use cps_core::{SubstrateInfo, TimeSpan, TimeUnit};

    use crate::{keys, Agent, AttrValue, IdSource, SubstrateMap};

    #[test]
    fn attribute_roundtrip() {
        let mut a = Agent::new();
        a.set_attribute("flag", true);
        a.set_attribute("count", 3i64);
        a.set_attribute("speed", 0.25);
        a.set_attribute("where", (4, 7));
        a.set_attribute("label", "alive");
        assert_eq!(a.bool_attr("flag"), Some(true));
        assert_eq!(a.int_attr("count"), Some(3));
        assert_eq!(a.float_attr("speed"), Some(0.25));
        assert_eq!(a.pair_attr("where"), Some((4, 7)));
        assert_eq!(a.str_attr("label"), Some("alive"));
        assert!(!a.has_attribute("missing"));
    }

    #[test]
    fn int_coerces_to_float_view() {
        let mut a = Agent::new();
        a.set_attribute(keys::VOLUME, 500i64);
        assert_eq!(a.float_attr(keys::VOLUME), Some(500.0));
    }

    #[test]
    fn set_default_does_not_overwrite() {
        let mut a = Agent::new();
        assert!(a.set_default("x", 1i64));
        assert!(!a.set_default("x", 2i64));
        assert_eq!(a.int_attr("x"), Some(1));
    }

    #[test]
    fn ids_are_monotonic_and_clone_gets_a_fresh_one() {
        let mut ids = IdSource::new();
        let mut a = Agent::new();
        let mut b = Agent::new();
        let ida = a.assign_id(&mut ids);
        let idb = b.assign_id(&mut ids);
        assert!(ida < idb);

        a.set_attribute("flag", true);
        let c = a.clone_with(&mut ids);
        assert_ne!(c.id(), a.id());
        assert_eq!(c.bool_attr("flag"), Some(true));
    }

    #[test]
    fn clone_is_a_deep_copy() {
        let mut ids = IdSource::new();
        let mut a = Agent::new();
        a.assign_id(&mut ids);
        let mut m = SubstrateMap::default();
        m.insert("oxygen".into(), SubstrateInfo::flux(0.1, 0.0, 0.0));
        a.set_attribute(keys::SUBSTRATE_INFO, m);

        let mut c = a.clone_with(&mut ids);
        c.substrates_mut().unwrap().get_mut("oxygen").unwrap().concentration = 9.0;
        let orig = a.substrates().unwrap()["oxygen"].concentration;
        assert_eq!(orig, 0.0);
    }

    #[test]
    fn time_attr_converts() {
        let mut a = Agent::new();
        a.set_attribute(keys::CELLCYCLE_MEAN_LENGTH, TimeSpan::new(1.0, TimeUnit::Hour));
        let span = a.time_attr(keys::CELLCYCLE_MEAN_LENGTH).unwrap();
        assert_eq!(span.to_millis().0, 3_600_000);
    }

    #[test]
    fn advance_past_skips_restored_ids() {
        let mut ids = IdSource::new();
        ids.advance_past(cps_core::AgentId(41));
        assert_eq!(ids.next_id(), cps_core::AgentId(42));
    }

    #[test]
    fn params_unclaimed_iteration() {
        let p = crate::Params::new().with("a", 1i64).with("b", true);
        let mut keys: Vec<&str> = p.iter().map(|(k, _)| k).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(p.get("a"), Some(&AttrValue::Int(1)));
    }
}

#[cfg(test)]
mod arena {
    use crate::{Agent, AgentArena, IdSource};

    fn filled(n: usize) -> (AgentArena, Vec<cps_core::AgentId>) {
        let mut ids = IdSource::new();
        let mut arena = AgentArena::new();
        let mut out = Vec::new();
        for _ in 0..n {
            let mut a = Agent::new();
            a.assign_id(&mut ids);
            out.push(arena.push(a));
        }
        (arena, out)
    }

    #[test]
    fn insertion_order_is_preserved() {
        let (arena, ids) = filled(5);
        assert_eq!(arena.ids(), ids);
    }

    #[test]
    fn removal_keeps_relative_order_and_lookup() {
        let (mut arena, ids) = filled(5);
        let removed = arena.remove(ids[2]).unwrap();
        assert_eq!(removed.id(), ids[2]);
        assert_eq!(arena.len(), 4);
        assert_eq!(arena.ids(), vec![ids[0], ids[1], ids[3], ids[4]]);
        for &id in &[ids[0], ids[1], ids[3], ids[4]] {
            assert_eq!(arena.get(id).unwrap().id(), id);
        }
        assert!(arena.get(ids[2]).is_none());
    }

    #[test]
    fn remove_missing_is_none() {
        let (mut arena, _) = filled(2);
        assert!(arena.remove(cps_core::AgentId(99)).is_none());
    }
}
