use glam::Vec3;
use plant_core::{BiasForce, GeneratorConfig, Plant, PlantConfig, ProbabilityProfile, SolverConfig};
use rand::{SeedableRng, rngs::StdRng};

fn quiet_solver() -> SolverConfig {
    SolverConfig {
        bias: BiasForce::None,
        jitter: 0.0,
        ..SolverConfig::default()
    }
}

fn plant(generator: GeneratorConfig, seed: u64) -> Plant<StdRng> {
    let cfg = PlantConfig {
        generator,
        solver: quiet_solver(),
    };
    Plant::generate(cfg, StdRng::seed_from_u64(seed)).unwrap()
}

fn varied_configs() -> Vec<GeneratorConfig> {
    let base = GeneratorConfig::default();
    vec![
        base,
        GeneratorConfig {
            main_branch_points: 20,
            max_branch_levels: 3,
            branch_probability: 6.0,
            ..base
        },
        GeneratorConfig {
            main_branch_points: 12,
            max_branch_levels: 4,
            halving_ratio: 1.5,
            branch_probability: 9.0,
            probability_profile: ProbabilityProfile::RampTowardTip,
            ..base
        },
        GeneratorConfig {
            main_branch_points: 2,
            max_branch_levels: 5,
            branch_probability: 9.0,
            ..base
        },
    ]
}

#[test]
fn constraint_endpoints_are_valid_indices() {
    for cfg in varied_configs() {
        for seed in 0..16 {
            let p = plant(cfg, seed);
            let n = p.points().len();
            for c in p.constraints() {
                assert!(c.a < n && c.b < n, "constraint {c:?} outside 0..{n}");
                assert_ne!(c.a, c.b);
                assert!(c.rest_length > 0.0);
            }
        }
    }
}

#[test]
fn branch_ranges_are_disjoint_and_cover_all_points() {
    for cfg in varied_configs() {
        for seed in 0..16 {
            let p = plant(cfg, seed);
            let mut ranges: Vec<_> = p.branches().iter().map(|b| b.range()).collect();
            ranges.sort_by_key(|r| r.start);

            let mut next = 0;
            for r in &ranges {
                assert_eq!(r.start, next, "gap or overlap at {r:?}");
                next = r.end;
            }
            assert_eq!(next, p.points().len());
        }
    }
}

#[test]
fn allocation_is_monotonic_in_creation_order() {
    for cfg in varied_configs() {
        for seed in 0..16 {
            let p = plant(cfg, seed);
            let branches = p.branches();
            for pair in branches.windows(2) {
                assert_eq!(pair[1].start, pair[0].end());
            }
            for b in branches {
                if let Some(parent) = b.parent {
                    assert!(b.start >= branches[parent].end());
                    assert_eq!(b.depth, branches[parent].depth + 1);
                }
            }
        }
    }
}

#[test]
fn depth_never_exceeds_configured_levels() {
    for cfg in varied_configs() {
        for seed in 0..8 {
            let p = plant(cfg, seed);
            let max = p.tree().max_depth().unwrap();
            assert!(max <= cfg.max_branch_levels);
        }
    }
}

#[test]
fn render_groups_follow_branch_ranges() {
    let p = plant(
        GeneratorConfig {
            main_branch_points: 16,
            max_branch_levels: 3,
            branch_probability: 7.0,
            ..GeneratorConfig::default()
        },
        3,
    );

    let groups = p.render_groups();
    assert_eq!(groups.len(), p.branches().len());

    for g in groups {
        let b = &p.branches()[g.branch];
        assert_eq!(g.order, b.depth);

        let own: Vec<_> = b.range().collect();
        match b.parent {
            None => assert_eq!(g.indices, own),
            Some(parent) => {
                assert!(p.branches()[parent].range().contains(&g.indices[0]));
                assert_eq!(&g.indices[1..], own.as_slice());
            }
        }
    }

    // Breadth-first: orders never decrease.
    assert!(groups.windows(2).all(|w| w[0].order <= w[1].order));
}

#[test]
fn main_branch_only_when_no_levels() {
    let cfg = GeneratorConfig {
        main_branch_points: 4,
        max_branch_levels: 0,
        ..GeneratorConfig::default()
    };
    let p = plant(cfg, 0);

    assert_eq!(p.points().len(), 4);
    assert_eq!(p.constraints().len(), 3);
    assert_eq!(p.branch_events(), 0);
    let rest = p.constraints()[0].rest_length;
    assert!(p.constraints().iter().all(|c| c.rest_length == rest));
}

#[test]
fn branch_event_with_three_point_children() {
    // Probability 9 always branches: a 4-point main branch gets a pair of
    // 3-point children at offset 0 and a pair of 2-point children at 1.
    let cfg = GeneratorConfig {
        main_branch_points: 4,
        max_branch_levels: 1,
        halving_ratio: 1.0,
        branch_probability: 9.0,
        ..GeneratorConfig::default()
    };
    let p = plant(cfg, 42);

    assert_eq!(p.branch_events(), 2);
    assert_eq!(p.branches().len(), 5);
    assert_eq!(p.points().len(), 4 + 3 + 3 + 2 + 2);
    assert_eq!(p.constraints().len(), 3 + 21 + 12);

    let main = p.branches()[0].range();
    let first = p.branches()[1].range();
    let second = p.branches()[2].range();
    assert_eq!(first.len(), 3);
    assert_eq!(second.len(), 3);

    let between = |x: &std::ops::Range<usize>, y: &std::ops::Range<usize>| {
        p.constraints()
            .iter()
            .filter(|c| x.contains(&c.a) && y.contains(&c.b))
            .copied()
            .collect::<Vec<_>>()
    };

    let ladder = between(&main, &first);
    let rungs = ladder
        .iter()
        .filter(|c| c.a - main.start == c.b - first.start)
        .count();
    assert!(rungs >= 3);
    assert!(ladder.len() - rungs <= 2 * (3 - 1));

    let struts = between(&first, &second);
    assert_eq!(struts.len(), 3);
    for (i, s) in struts.iter().enumerate() {
        let expected = 2.0 * (cfg.parent_distance + i as f32 * cfg.widening);
        assert!((s.rest_length - expected).abs() < 1e-6);
    }
}

#[test]
fn pin_is_idempotent() {
    let mut a = plant(GeneratorConfig::default(), 5);
    let mut b = plant(GeneratorConfig::default(), 5);
    let target = Vec3::new(0.0, 1.0, 0.0);

    a.pin(3, target);
    b.pin(3, target);
    b.pin(3, target);

    assert_eq!(a.points()[3], b.points()[3]);
}

#[test]
fn pin_before_first_tick_holds_position() {
    let mut p = plant(GeneratorConfig::default(), 1);
    let anchor = Vec3::new(0.0, 1.0, 0.0);
    p.pin(0, anchor);

    for _ in 0..5 {
        p.tick(5);
    }

    assert_eq!(p.positions()[0], anchor);
}

#[test]
fn relaxation_reduces_constraint_error() {
    for seed in 0..4 {
        let mut p = plant(GeneratorConfig::default(), seed);
        p.pin(0, Vec3::new(0.0, 1.0, 0.0));

        let initial = p.constraint_error();
        let mut tail = 0.0;
        for t in 0..50 {
            p.tick(5);
            if t >= 40 {
                tail += p.constraint_error();
            }
        }

        assert!(p.constraint_error() < initial, "seed {seed} did not settle");
        assert!(tail / 10.0 < initial);
    }
}

#[test]
fn positions_are_ordered_by_index() {
    let mut p = plant(GeneratorConfig::default(), 2);
    p.pin(1, Vec3::new(5.0, 5.0, 5.0));

    let positions = p.positions();
    assert_eq!(positions.len(), p.points().len());
    assert_eq!(positions[1], Vec3::new(5.0, 5.0, 5.0));
    for (pos, point) in positions.iter().zip(p.points()) {
        assert_eq!(*pos, point.pos);
    }
}

#[test]
#[should_panic]
fn tick_with_zero_passes_panics() {
    let mut p = plant(GeneratorConfig::default(), 0);
    p.tick(0);
}

#[test]
#[should_panic]
fn pin_out_of_range_panics() {
    let mut p = plant(GeneratorConfig::default(), 0);
    let n = p.points().len();
    p.pin(n, Vec3::ZERO);
}

#[test]
fn invalid_config_is_reported() {
    let cfg = PlantConfig {
        generator: GeneratorConfig {
            point_spacing: f32::NAN,
            ..GeneratorConfig::default()
        },
        ..PlantConfig::default()
    };
    assert!(Plant::generate(cfg, StdRng::seed_from_u64(0)).is_err());
}
