//! End-to-end checks of the localization sum against classical
//! intersection numbers.

use num_traits::Zero;

use abel_classes::algebra::{
    contact, hypersurface, incidency, jet, o1, o1_i, psi, r1, vector, ClassExpr,
};
use abel_core::rational::{rat, rat_frac, Rat};
use abel_core::weights::TorusWeights;
use abel_engine::integrator::{
    atiyah_bott, graph_contribution, ComputeOptions, ComputeOutcome, Integrator, Value,
};
use abel_graphs::enumerate::enumerate_graphs;

fn compute(n: i64, d: i64, m: i64, class: &ClassExpr) -> Rat {
    match atiyah_bott(n, d, m, class).unwrap() {
        ComputeOutcome::Value(Value::Scalar(v)) => v,
        other => panic!("expected a scalar value, got {:?}", other),
    }
}

#[test]
fn test_lines_on_the_quintic_threefold() {
    assert_eq!(compute(4, 1, 0, &hypersurface(&[5])), rat(2875));
}

#[test]
fn test_conics_on_the_bidegree_33_complete_intersection() {
    assert_eq!(
        compute(5, 2, 0, &hypersurface(&[3, 3])),
        rat_frac(423549, 8).unwrap()
    );
}

#[test]
fn test_lines_through_two_points_in_p3() {
    assert_eq!(compute(3, 1, 0, &incidency(&[3]).pow(2)), rat(1));
    assert_eq!(compute(3, 1, 0, &incidency(&[2, 2, 3])), rat(1));
}

#[test]
fn test_r1_squared_on_maps_to_the_line() {
    assert_eq!(compute(1, 1, 0, &r1(1).pow(2)), rat(1));
    assert_eq!(compute(1, 2, 0, &r1(1).pow(2)), rat_frac(1, 8).unwrap());
}

#[test]
fn test_conics_on_a_cubic_surface_meeting_a_line() {
    assert_eq!(
        compute(3, 2, 0, &(incidency(&[2]) * hypersurface(&[3]))),
        rat(81)
    );
}

#[test]
fn test_marked_lines_on_a_quadric_surface() {
    assert_eq!(
        compute(3, 1, 1, &(o1_i(1).pow(2) * hypersurface(&[2]))),
        rat(4)
    );
}

#[test]
fn test_descendant_invariant_of_the_plane() {
    assert_eq!(
        compute(2, 2, 1, &(o1().pow(2) * psi(&[4]))),
        rat_frac(1, 8).unwrap()
    );
}

#[test]
fn test_jet_class_matches_its_psi_expansion() {
    // Jet(1, 1) agrees with O1_1 (O1_1 + psi_1) in any zero cycle.
    let expanded = incidency(&[2]).pow(4) * o1_i(1) * (o1_i(1) + psi(&[1]));
    let direct = incidency(&[2]).pow(4) * jet(1, 1);
    assert_eq!(compute(2, 2, 1, &expanded), rat(2));
    assert_eq!(compute(2, 2, 1, &direct), rat(2));
}

#[test]
fn test_contact_conditions_against_a_plane_curve() {
    assert_eq!(
        compute(3, 1, 2, &(o1_i(1).pow(2) * o1_i(2).pow(3) * contact())),
        rat(1)
    );
}

#[test]
fn test_two_marked_points_on_a_line() {
    assert_eq!(compute(2, 1, 2, &(o1_i(1).pow(2) * o1_i(2).pow(2))), rat(1));
    assert_eq!(compute(1, 1, 2, &o1()), rat(1));
}

#[test]
fn test_vector_class_computes_components_in_one_pass() {
    let class = vector(vec![incidency(&[3]).pow(2), incidency(&[2, 2, 3])]);
    match atiyah_bott(3, 1, 0, &class).unwrap() {
        ComputeOutcome::Value(Value::Vector(values)) => {
            assert_eq!(values, vec![rat(1), rat(1)]);
        }
        other => panic!("expected a vector value, got {:?}", other),
    }
}

#[test]
fn test_vector_with_a_non_cycle_component_zeroes_it() {
    let class = vector(vec![incidency(&[3]).pow(2), incidency(&[3])]);
    match atiyah_bott(3, 1, 0, &class).unwrap() {
        ComputeOutcome::Value(Value::Vector(values)) => {
            assert_eq!(values, vec![rat(1), rat(0)]);
        }
        other => panic!("expected a vector value, got {:?}", other),
    }
}

#[test]
fn test_powers_broadcast_over_vectors() {
    let class = vector(vec![incidency(&[3]), incidency(&[3])]).pow(2);
    match atiyah_bott(3, 1, 0, &class).unwrap() {
        ComputeOutcome::Value(Value::Vector(values)) => {
            assert_eq!(values, vec![rat(1), rat(1)]);
        }
        other => panic!("expected a vector value, got {:?}", other),
    }
}

#[test]
fn test_results_are_deterministic_across_runs() {
    let class = hypersurface(&[5]);
    let first = atiyah_bott(4, 1, 0, &class).unwrap();
    let second = atiyah_bott(4, 1, 0, &class).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_wrong_codimension_is_not_a_zero_cycle() {
    match atiyah_bott(3, 1, 0, &hypersurface(&[5])).unwrap() {
        ComputeOutcome::NotZeroCycle {
            codimension,
            dimension,
        } => {
            assert_eq!(codimension, 6);
            assert_eq!(dimension, 4);
        }
        other => panic!("expected NotZeroCycle, got {:?}", other),
    }
}

#[test]
fn test_disabled_check_still_produces_a_value() {
    let options = ComputeOptions {
        check_zero_cycle: false,
        ..ComputeOptions::default()
    };
    let outcome = Integrator::new()
        .with_options(options)
        .integrate(3, 1, 0, &incidency(&[3]))
        .unwrap();
    assert!(matches!(outcome, ComputeOutcome::Value(Value::Scalar(_))));
}

#[test]
fn test_composition_errors_are_fatal() {
    assert!(atiyah_bott(2, 2, 1, &(psi(&[1]) * psi(&[1]))).is_err());
    assert!(atiyah_bott(2, 2, 1, &(jet(1, 1) * psi(&[1]))).is_err());
    assert!(atiyah_bott(2, 2, 1, &(o1_i(1) + hypersurface(&[1]))).is_err());

    // Vectors of different lengths are rejected before any enumeration,
    // a one-component vector included.
    let mismatched = vector(vec![incidency(&[3])])
        + vector(vec![incidency(&[3]), incidency(&[3])]);
    assert!(atiyah_bott(3, 1, 0, &mismatched).is_err());
}

#[test]
fn test_sum_over_graphs_is_order_independent() {
    // Summing the per-graph contributions in reverse order must reproduce
    // the integrator's answer.
    let class = incidency(&[2]) * hypersurface(&[3]);
    let graphs = enumerate_graphs(2, 0).unwrap();
    let weights = TorusWeights::candidate(3, 0);
    let mut total = Rat::zero();
    for g in graphs.iter().rev() {
        let c = graph_contribution(g, 3, &weights, &class, &[true], None, false).unwrap();
        total += c.into_iter().next().unwrap();
    }
    assert_eq!(total, compute(3, 2, 0, &class));
}
