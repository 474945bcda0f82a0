//! # SDF math kernel
//!
//! Pure functions over integer topology matrices: nullspace, integralization
//! of the repetition vector, Periodic Admissible Schedule (PASS)
//! construction, and job-level expansion with weak/strong precedence.
//!
//! Grounded on `idesyde/sdf.py::get_PASS` / `sdf_to_jobs` from the original
//! Python implementation this system is modeled on, re-expressed with exact
//! rational arithmetic instead of floating point so consistency checks are
//! exact.

mod rational;
mod topology;

pub use rational::Rational;
pub use topology::Topology;

/// A single SDF actor firing: the `q`-th instance of actor `a`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Job {
    pub actor: usize,
    pub firing: u32,
}

/// The job precedence structure produced by [`job_expansion`].
#[derive(Debug, Clone, Default)]
pub struct JobGraph {
    pub jobs: Vec<Job>,
    /// `(job_index, job_index)` pairs: weak-next links consecutive firings
    /// of the same actor.
    pub weak_next: Vec<(usize, usize)>,
    /// `(job_index, job_index)` pairs: strong-next links jobs that must
    /// complete before the target job may start, derived from channel
    /// token arithmetic.
    pub strong_next: Vec<(usize, usize)>,
}

/// The topology matrix's nullspace, or `None` if it has dimension other
/// than exactly one (the consistency condition for SDF graphs).
#[must_use]
pub fn is_consistent(topology: &Topology) -> bool {
    nullspace(topology).len() == 1
}

/// Compute a basis for the nullspace of `topology` over the rationals via
/// Gaussian elimination.
#[must_use]
pub fn nullspace(topology: &Topology) -> Vec<Vec<Rational>> {
    let rows = topology.channels();
    let cols = topology.actors();
    if cols == 0 {
        return Vec::new();
    }
    // Work on a copy as rationals; row-reduce to echelon form.
    let mut m: Vec<Vec<Rational>> = (0..rows)
        .map(|r| (0..cols).map(|c| Rational::from_i64(topology.get(r, c))).collect())
        .collect();

    let mut pivot_col_of_row: Vec<Option<usize>> = Vec::new();
    let mut pivot_row = 0;
    for col in 0..cols {
        if pivot_row >= m.len() {
            break;
        }
        let Some(sel) = (pivot_row..m.len()).find(|&r| !m[r][col].is_zero()) else {
            continue;
        };
        m.swap(pivot_row, sel);
        let pivot_val = m[pivot_row][col];
        for c in col..cols {
            m[pivot_row][c] = m[pivot_row][c].div(pivot_val);
        }
        for r in 0..m.len() {
            if r == pivot_row {
                continue;
            }
            let factor = m[r][col];
            if !factor.is_zero() {
                for c in col..cols {
                    let sub = m[pivot_row][c].mul(factor);
                    m[r][c] = m[r][c].sub(sub);
                }
            }
        }
        pivot_col_of_row.push(Some(col));
        pivot_row += 1;
    }
    let rank = pivot_row;
    let pivot_cols: Vec<usize> = pivot_col_of_row.into_iter().flatten().collect();
    let free_cols: Vec<usize> = (0..cols).filter(|c| !pivot_cols.contains(c)).collect();

    free_cols
        .iter()
        .map(|&free_col| {
            let mut vec = vec![Rational::zero(); cols];
            vec[free_col] = Rational::one();
            for (r, &pc) in pivot_cols.iter().enumerate().take(rank) {
                vec[pc] = m[r][free_col].neg();
            }
            vec
        })
        .collect()
}

/// Reduce a rational vector to the minimal positive integer generator: scale
/// by the LCM of denominators, then divide by the GCD of the resulting
/// integers, and flip sign so the first nonzero entry is positive.
#[must_use]
pub fn integralize(vector: &[Rational]) -> Vec<i64> {
    if vector.is_empty() {
        return Vec::new();
    }
    let lcm_den = vector.iter().fold(1i64, |acc, r| lcm(acc, r.denominator()));
    let mut scaled: Vec<i64> = vector
        .iter()
        .map(|r| r.numerator() * (lcm_den / r.denominator()))
        .collect();

    if let Some(first_nonzero) = scaled.iter().find(|&&x| x != 0) {
        if *first_nonzero < 0 {
            for x in &mut scaled {
                *x = -*x;
            }
        }
    }

    let g = scaled.iter().fold(0i64, |acc, &x| gcd(acc, x.abs()));
    if g > 1 {
        for x in &mut scaled {
            *x /= g;
        }
    }
    scaled
}

fn gcd(a: i64, b: i64) -> i64 {
    if b == 0 {
        a.abs()
    } else {
        gcd(b, a % b)
    }
}

fn lcm(a: i64, b: i64) -> i64 {
    if a == 0 || b == 0 {
        0
    } else {
        (a / gcd(a, b)).abs() * b.abs()
    }
}

/// Construct a Periodic Admissible Schedule: a deterministic firing order
/// of actor indices, tie-breaking on smallest index, that never drives any
/// channel's token count below zero and fires every actor exactly
/// `repetition[actor]` times.
///
/// Returns `None` if no such order exists from `initial_tokens`.
#[must_use]
pub fn pass(topology: &Topology, repetition: &[i64], initial_tokens: &[i64]) -> Option<Vec<usize>> {
    let actors = topology.actors();
    let channels = topology.channels();
    assert_eq!(repetition.len(), actors);
    assert_eq!(initial_tokens.len(), channels);

    let mut remaining: Vec<i64> = repetition.to_vec();
    let mut tokens: Vec<i64> = initial_tokens.to_vec();
    let total: i64 = repetition.iter().sum();
    let mut trace = Vec::with_capacity(total as usize);

    for _ in 0..total {
        let mut fired = None;
        for a in 0..actors {
            if remaining[a] <= 0 {
                continue;
            }
            let mut candidate = tokens.clone();
            for (c, cand) in candidate.iter_mut().enumerate().take(channels) {
                *cand += topology.get(c, a);
            }
            if candidate.iter().all(|&t| t >= 0) {
                tokens = candidate;
                remaining[a] -= 1;
                fired = Some(a);
                break;
            }
        }
        match fired {
            Some(a) => trace.push(a),
            None => return None,
        }
    }
    Some(trace)
}

/// Expand an SDF graph's actors into per-firing jobs with weak (same actor,
/// next firing) and strong (cross-actor, forced by channel token
/// arithmetic) precedence edges.
///
/// `channels` lists, per row of `topology`, the `(source_actor,
/// target_actor)` pair that row represents.
#[must_use]
pub fn job_expansion(
    topology: &Topology,
    repetition: &[i64],
    initial_tokens: &[i64],
    channels: &[(usize, usize)],
) -> JobGraph {
    let actors = topology.actors();
    assert_eq!(repetition.len(), actors);
    assert_eq!(channels.len(), topology.channels());

    let mut jobs = Vec::new();
    let mut job_index: Vec<Vec<usize>> = vec![Vec::new(); actors];
    for a in 0..actors {
        for q in 1..=repetition[a] {
            job_index[a].push(jobs.len());
            jobs.push(Job {
                actor: a,
                firing: q as u32,
            });
        }
    }

    let mut weak_next = Vec::new();
    for a in 0..actors {
        for w in job_index[a].windows(2) {
            weak_next.push((w[0], w[1]));
        }
    }

    let mut strong_next = Vec::new();
    for (cidx, &(s, t)) in channels.iter().enumerate() {
        let production = topology.get(cidx, s);
        let consumption = topology.get(cidx, t);
        let delay = initial_tokens[cidx];
        let mut fires: i64 = 1;
        let mut firet: i64 = 1;
        while firet <= repetition[t] {
            if production * (fires - 1) + delay + consumption * firet >= 0 {
                firet += 1;
            } else {
                let src_job = job_index[s][(fires - 1) as usize];
                let tgt_job = job_index[t][(firet - 1) as usize];
                strong_next.push((src_job, tgt_job));
                fires += 1;
            }
        }
    }

    JobGraph {
        jobs,
        weak_next,
        strong_next,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_actor_hsdf() -> Topology {
        // a (prod 1) -> b (cons 1), single channel, no delay.
        Topology::from_rows(1, 2, vec![vec![1, -1]])
    }

    #[test]
    fn consistent_two_actor_hsdf_has_unit_repetition() {
        let t = two_actor_hsdf();
        assert!(is_consistent(&t));
        let ns = nullspace(&t);
        let q = integralize(&ns[0]);
        assert_eq!(q, vec![1, 1]);
    }

    #[test]
    fn inconsistent_graph_has_empty_nullspace() {
        // a(prod 1) -> b(cons 2, prod 1) -> c(cons 3): scenario B of the spec.
        let t = Topology::from_rows(2, 3, vec![vec![1, -2, 0], vec![0, 1, -3]]);
        assert!(!is_consistent(&t));
    }

    #[test]
    fn pass_is_deterministic_and_sound() {
        let t = two_actor_hsdf();
        let q = vec![1, 1];
        let trace1 = pass(&t, &q, &[0]).unwrap();
        let trace2 = pass(&t, &q, &[0]).unwrap();
        assert_eq!(trace1, trace2);
        assert_eq!(trace1, vec![0, 1]);
    }

    #[test]
    fn delay_prefixed_cycle_is_consistent_with_unit_repetition() {
        // a<->b cycle: a->b needs 2 tokens (starts at 0), b->a carries 1
        // initial token and is consumed 1-for-1 by a.
        let t = Topology::from_rows(2, 2, vec![vec![2, -2], vec![-1, 1]]);
        let ns = nullspace(&t);
        assert_eq!(ns.len(), 1);
        let q = integralize(&ns[0]);
        assert_eq!(q, vec![1, 1]);
        let trace = pass(&t, &q, &[0, 1]).unwrap();
        assert_eq!(trace.len(), 2);
    }

    #[test]
    fn pass_tie_break_prefers_smallest_index_with_tokens() {
        // No channels: every actor is always fireable, so the tie-break
        // rule alone determines order. Actor 0 must exhaust its firings
        // before actor 1 gets a turn.
        let t = Topology::from_rows(0, 2, vec![]);
        let trace = pass(&t, &[2, 1], &[]).unwrap();
        assert_eq!(trace, vec![0, 0, 1]);
    }

    #[test]
    fn job_expansion_links_single_firing_actors() {
        let t = two_actor_hsdf();
        let jg = job_expansion(&t, &[1, 1], &[0], &[(0, 1)]);
        assert_eq!(jg.jobs.len(), 2);
        assert!(jg.weak_next.is_empty());
        assert_eq!(jg.strong_next, vec![(0, 1)]);
    }
}
