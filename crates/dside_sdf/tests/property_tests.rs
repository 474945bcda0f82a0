//! Property-based tests for PASS determinism/soundness and repetition
//! vector minimality.

use dside_sdf::{integralize, is_consistent, nullspace, pass, Topology};
use proptest::prelude::*;

fn gcd(a: i64, b: i64) -> i64 {
    if b == 0 {
        a.abs()
    } else {
        gcd(b, a % b)
    }
}

/// A small fixed consistent two-actor producer/consumer chain, parameterized
/// by production/consumption rate, used to generate arbitrary-but-consistent
/// topologies for property testing.
fn rated_chain(rate: i64) -> Topology {
    Topology::from_rows(1, 2, vec![vec![rate, -rate]])
}

proptest! {
    #[test]
    fn pass_is_deterministic_for_any_consistent_rate(rate in 1i64..20) {
        let t = rated_chain(rate);
        prop_assert!(is_consistent(&t));
        let ns = nullspace(&t);
        let q = integralize(&ns[0]);
        let trace1 = pass(&t, &q, &[0]);
        let trace2 = pass(&t, &q, &[0]);
        prop_assert_eq!(trace1, trace2);
    }

    #[test]
    fn pass_length_matches_repetition_sum(rate in 1i64..20) {
        let t = rated_chain(rate);
        let ns = nullspace(&t);
        let q = integralize(&ns[0]);
        let trace = pass(&t, &q, &[0]).expect("chain is schedulable");
        prop_assert_eq!(trace.len() as i64, q.iter().sum::<i64>());
    }

    #[test]
    fn pass_prefix_tokens_never_go_negative(rate in 1i64..20) {
        let t = rated_chain(rate);
        let ns = nullspace(&t);
        let q = integralize(&ns[0]);
        let trace = pass(&t, &q, &[0]).expect("chain is schedulable");

        let mut tokens = vec![0i64];
        for &actor in &trace {
            for c in 0..t.channels() {
                tokens[c] += t.get(c, actor);
            }
            for &tok in &tokens {
                prop_assert!(tok >= 0);
            }
        }
    }

    #[test]
    fn repetition_vector_is_minimal_positive_with_unit_gcd(rate in 1i64..20) {
        let t = rated_chain(rate);
        let ns = nullspace(&t);
        let q = integralize(&ns[0]);
        prop_assert!(q.iter().all(|&x| x > 0));
        let g = q.iter().fold(0i64, |acc, &x| gcd(acc, x));
        prop_assert_eq!(g, 1);
        // T . q == 0
        for c in 0..t.channels() {
            let mut sum = 0i64;
            for (a, &qa) in q.iter().enumerate() {
                sum += t.get(c, a) * qa;
            }
            prop_assert_eq!(sum, 0);
        }
    }
}
