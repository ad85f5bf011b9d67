//! Unit tests for lattice kernels.

#[cfg(test)]
mod path {
    use crate::bresenham;

    #[test]
    fn horizontal_line() {
        assert_eq!(bresenham([0, 0], [3, 0]), vec![[0, 0], [1, 0], [2, 0], [3, 0]]);
    }

    #[test]
    fn vertical_line() {
        assert_eq!(bresenham([2, 4], [2, 1]), vec![[2, 4], [2, 3], [2, 2], [2, 1]]);
    }

    #[test]
    fn diagonal_line() {
        assert_eq!(bresenham([0, 0], [2, 2]), vec![[0, 0], [1, 1], [2, 2]]);
    }

    #[test]
    fn single_cell() {
        assert_eq!(bresenham([5, 5], [5, 5]), vec![[5, 5]]);
    }

    #[test]
    fn steps_are_single_cell_moves() {
        let path = bresenham([0, 0], [5, 2]);
        assert_eq!(path.len(), 6);
        for pair in path.windows(2) {
            let dx = (pair[1][0] - pair[0][0]).abs();
            let dy = (pair[1][1] - pair[0][1]).abs();
            assert!(dx <= 1 && dy <= 1);
        }
        assert_eq!(*path.first().unwrap(), [0, 0]);
        assert_eq!(*path.last().unwrap(), [5, 2]);
    }
}

#[cfg(test)]
mod energy {
    use ndarray::Array2;

    use crate::{pairwise_energy, total_energy};

    #[test]
    fn overlap_is_infinite() {
        assert_eq!(pairwise_energy([1, 1], 2.0, [1, 1], 2.0), f64::INFINITY);
    }

    #[test]
    fn adjacent_is_negative_geometric_mean() {
        let e = pairwise_energy([1, 1], 4.0, [1, 2], 9.0);
        assert!((e - (-6.0)).abs() < 1e-12);
    }

    #[test]
    fn diagonal_contributes_nothing() {
        assert_eq!(pairwise_energy([1, 1], 4.0, [2, 2], 9.0), 0.0);
    }

    #[test]
    fn total_sums_edge_neighbors_only() {
        // Agent 0 at (1,1); neighbors at (0,1) edge-adjacent and (0,0) diagonal.
        let mut occ = Array2::from_elem((3, 3), -1);
        occ[(1, 1)] = 0;
        occ[(0, 1)] = 1;
        occ[(0, 0)] = 2;
        let affs = [1.0, 4.0, 100.0];
        let e = total_energy(0, [1, 1], &affs, &occ);
        assert!((e - (-2.0)).abs() < 1e-12);
    }

    #[test]
    fn boundary_agent_ignores_outside_cells() {
        let mut occ = Array2::from_elem((2, 2), -1);
        occ[(0, 0)] = 0;
        let affs = [1.0];
        assert_eq!(total_energy(0, [0, 0], &affs, &occ), 0.0);
    }
}

#[cfg(test)]
mod trial {
    use cps_core::SimRng;
    use ndarray::Array2;

    use crate::{displace, displacement_trial};

    #[test]
    fn displace_updates_scratch_state() {
        let mut occ = Array2::from_elem((3, 3), -1);
        occ[(1, 1)] = 0;
        let mut positions = vec![[1, 1]];
        displace(&mut positions, 0, [1, 2], &mut occ);
        assert_eq!(positions[0], [1, 2]);
        assert_eq!(occ[(1, 1)], -1);
        assert_eq!(occ[(1, 2)], 0);
    }

    #[test]
    fn zero_affinity_moves_are_always_accepted_into_empty_cells() {
        // dE == 0 for affinity-free agents, so every in-bounds draw onto an
        // empty cell must be accepted.
        let mut rng = SimRng::new(11);
        let mut accepted = 0;
        for _ in 0..200 {
            let mut occ = Array2::from_elem((5, 5), -1);
            occ[(2, 2)] = 0;
            let mut positions = vec![[2, 2]];
            let affs = [0.0];
            let mut moved = vec![false];
            displacement_trial(0, &mut positions, &affs, &mut occ, &mut moved, &mut rng);
            // Interior cell: all four neighbors are in bounds and empty.
            assert!(moved[0]);
            accepted += 1;
        }
        assert_eq!(accepted, 200);
    }

    #[test]
    fn occupied_target_leaves_state_untouched() {
        // All four von Neumann neighbors occupied: no trial can move agent 0.
        let mut rng = SimRng::new(5);
        let mut occ = Array2::from_elem((3, 3), -1);
        occ[(1, 1)] = 0;
        occ[(0, 1)] = 1;
        occ[(2, 1)] = 2;
        occ[(1, 0)] = 3;
        occ[(1, 2)] = 4;
        let mut positions = vec![[1, 1], [0, 1], [2, 1], [1, 0], [1, 2]];
        let affs = [1.0; 5];
        let mut moved = vec![false; 5];
        let before = occ.clone();
        for _ in 0..50 {
            displacement_trial(0, &mut positions, &affs, &mut occ, &mut moved, &mut rng);
        }
        assert_eq!(occ, before);
        assert_eq!(positions[0], [1, 1]);
        assert!(!moved[0]);
    }

    #[test]
    fn uphill_acceptance_rate_approaches_boltzmann() {
        // One bound pair on a 4x1 strip: agent 0 at (1,0) bound to agent 1
        // at (0,0).  The only legal move is the draw of (+1,0) — left is
        // occupied, up/down out of bounds — and it breaks the bond, so
        // dE = sqrt(b*b) = b.  Acceptances over N independent trials should
        // approach N * (1/4) * exp(-dE).
        let d_e = 1.5_f64;
        let affinity = d_e * d_e;
        let mut rng = SimRng::new(99);
        let trials = 20_000;
        let mut accepted = 0u32;
        for _ in 0..trials {
            let mut occ = Array2::from_elem((4, 1), -1);
            occ[(1, 0)] = 0;
            occ[(0, 0)] = 1;
            let mut positions = vec![[1, 0], [0, 0]];
            let affs = [affinity, affinity];
            let mut moved = vec![false, false];
            displacement_trial(0, &mut positions, &affs, &mut occ, &mut moved, &mut rng);
            if moved[0] {
                assert_eq!(positions[0], [2, 0]);
                accepted += 1;
            } else {
                assert_eq!(positions[0], [1, 0]);
                assert_eq!(occ[(2, 0)], -1);
            }
        }
        let expected = trials as f64 * 0.25 * (-d_e).exp();
        let tolerance = 4.0 * expected.sqrt(); // ~4 sigma
        assert!(
            ((accepted as f64) - expected).abs() < tolerance,
            "accepted {accepted}, expected ~{expected:.0}"
        );
    }
}

#[cfg(test)]
mod search {
    use ndarray::Array2;

    use crate::nearest_empty_sites;

    #[test]
    fn fully_occupied_returns_none() {
        let occupied = Array2::from_elem((2, 2), true);
        assert!(nearest_empty_sites(&occupied, [0, 0]).is_none());
    }

    #[test]
    fn adjacent_empty_cell_has_distance_one() {
        let mut occupied = Array2::from_elem((3, 3), true);
        occupied[(1, 2)] = false;
        let (dist, sites) = nearest_empty_sites(&occupied, [1, 1]).unwrap();
        assert_eq!(dist, 1.0);
        assert_eq!(sites, vec![[1, 2]]);
    }

    #[test]
    fn symmetric_candidates_are_all_reported() {
        let mut occupied = Array2::from_elem((3, 3), true);
        occupied[(0, 1)] = false;
        occupied[(2, 1)] = false;
        occupied[(1, 0)] = false;
        occupied[(1, 2)] = false;
        let (dist, sites) = nearest_empty_sites(&occupied, [1, 1]).unwrap();
        assert_eq!(dist, 1.0);
        assert_eq!(sites.len(), 4);
    }

    #[test]
    fn occupied_cells_are_skipped_even_when_closer() {
        let mut occupied = Array2::from_elem((5, 1), false);
        occupied[(1, 0)] = true;
        occupied[(2, 0)] = true;
        // Origin (2,0): nearest empty are (0,0) dist 2 and (3,0) dist 1.
        let (dist, sites) = nearest_empty_sites(&occupied, [2, 0]).unwrap();
        assert_eq!(dist, 1.0);
        assert_eq!(sites, vec![[3, 0]]);
    }
}
