//! End-to-end scenarios A–F, each driving the orchestrator or a slice of
//! the pipeline over literal inputs.

use dside::decision::DecisionModel;
use dside::engine::run_to_fixpoint;
use dside::explorer::{BruteForceExplorer, ExploreOptions, Explorer};
use dside::orchestrator::{Orchestrator, RunSummary};
use dside::rules::standard_rule_catalogue;
use dside::vocab;
use dside::Config;
use dside_graph::{Graph, GraphBuilder, PropertyValue, ScalarValue};

fn set_str(b: &mut GraphBuilder, v: dside_graph::VertexId, key: &str, value: &str) {
    b.set_property(v, key, PropertyValue::Scalar(ScalarValue::Str(value.to_string())));
}

fn set_float(b: &mut GraphBuilder, v: dside_graph::VertexId, key: &str, value: f64) {
    b.set_property(v, key, PropertyValue::Scalar(ScalarValue::Float(value)));
}

/// Scenario A: two-actor HSDF on one core.
#[test]
fn scenario_a_two_actor_hsdf_on_one_core() {
    let mut b = GraphBuilder::new();
    let a = b.add_vertex("a", [vocab::ACTOR]);
    let bb = b.add_vertex("b", [vocab::ACTOR]);
    let ch = b.add_edge(a, bb, [vocab::CHANNEL]);
    b.set_edge_property(ch, vocab::PRODUCTION, PropertyValue::Scalar(ScalarValue::Int(1)));
    b.set_edge_property(ch, vocab::CONSUMPTION, PropertyValue::Scalar(ScalarValue::Int(1)));
    b.set_edge_property(ch, vocab::INITIAL_TOKENS, PropertyValue::Scalar(ScalarValue::Int(0)));

    let p = b.add_vertex("p", [vocab::PROCESSING_COMPONENT]);
    let s = b.add_vertex("s", [vocab::SCHEDULER]);
    b.add_edge(s, p, [vocab::SCHEDULING_EDGE]);

    let wcet_a = b.add_vertex("wcet_a_p", [vocab::WCET_ANNOTATION]);
    set_str(&mut b, wcet_a, vocab::ACTOR_REF, "a");
    set_str(&mut b, wcet_a, vocab::PROCESSOR_REF, "p");
    set_float(&mut b, wcet_a, vocab::VALUE, 2.0);

    let wcet_b = b.add_vertex("wcet_b_p", [vocab::WCET_ANNOTATION]);
    set_str(&mut b, wcet_b, vocab::ACTOR_REF, "b");
    set_str(&mut b, wcet_b, vocab::PROCESSOR_REF, "p");
    set_float(&mut b, wcet_b, vocab::VALUE, 3.0);

    let g = b.build().expect("scenario A graph is well-formed");

    let rules = standard_rule_catalogue();
    let (identified, _) = run_to_fixpoint(&g, &rules);

    let exec = identified
        .iter()
        .find_map(|m| match m {
            DecisionModel::SdfExecution(e) => Some(e),
            _ => None,
        })
        .expect("one SdfExecution expected");
    assert_eq!(exec.repetition, vec![1, 1]);
    assert_eq!(exec.pass, vec![0, 1]);

    assert!(identified
        .iter()
        .any(|m| matches!(m, DecisionModel::SdfToMultiCoreCharacterized(_))));

    let js = identified
        .iter()
        .find_map(|m| match m {
            DecisionModel::JobScheduling(j) => Some(j),
            _ => None,
        })
        .expect("one JobScheduling expected");
    assert_eq!(js.jobs.len(), 2);

    let explorer = BruteForceExplorer::default();
    let model = DecisionModel::JobScheduling(js.clone());
    let solutions: Vec<_> = explorer.explore(&model, &ExploreOptions::default()).collect();
    assert!(!solutions.is_empty());

    let DecisionModel::JobScheduling(best) = &solutions[0] else { panic!("expected JobScheduling") };
    let job_a = best.jobs.iter().position(|j| j.actor == 0).unwrap();
    let job_b = best.jobs.iter().position(|j| j.actor == 1).unwrap();
    let start = |idx: usize| {
        best.pre_schedulings
            .iter()
            .find(|&&(j, _, _)| j == idx)
            .map(|&(_, _, start)| start)
            .expect("job is scheduled")
    };
    assert_eq!(start(job_a), 0);
    assert_eq!(start(job_b), 2);

    let period = best
        .pre_schedulings
        .iter()
        .map(|&(idx, proc, start)| {
            let wcet = best.wcet.iter().find(|((j, p), _)| *j == idx && *p == proc).unwrap().1 .0;
            start + wcet.round() as u64
        })
        .max()
        .unwrap();
    assert!(period >= 5);
}

/// Scenario B: inconsistent SDF yields no solution.
#[test]
fn scenario_b_inconsistent_sdf_yields_no_explorer_found() {
    let mut b = GraphBuilder::new();
    let a = b.add_vertex("a", [vocab::ACTOR]);
    let bb = b.add_vertex("b", [vocab::ACTOR]);
    let c = b.add_vertex("c", [vocab::ACTOR]);
    let e1 = b.add_edge(a, bb, [vocab::CHANNEL]);
    b.set_edge_property(e1, vocab::PRODUCTION, PropertyValue::Scalar(ScalarValue::Int(1)));
    b.set_edge_property(e1, vocab::CONSUMPTION, PropertyValue::Scalar(ScalarValue::Int(2)));
    let e2 = b.add_edge(bb, c, [vocab::CHANNEL]);
    b.set_edge_property(e2, vocab::PRODUCTION, PropertyValue::Scalar(ScalarValue::Int(1)));
    b.set_edge_property(e2, vocab::CONSUMPTION, PropertyValue::Scalar(ScalarValue::Int(3)));
    let g = b.build().unwrap();

    let rules = standard_rule_catalogue();
    let (identified, _) = run_to_fixpoint(&g, &rules);
    assert!(!identified.iter().any(|m| matches!(m, DecisionModel::SdfExecution(_))));

    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.run.run_path = dir.path().to_path_buf();
    let orchestrator = Orchestrator::new(config);
    assert!(matches!(orchestrator.run(g), RunSummary::NoExplorerFound));
}

/// Scenario D: delay-prefixed cycle ties the PASS tie-break to the
/// smallest index with nonzero tokens available.
#[test]
fn scenario_d_delay_prefixed_cycle() {
    let t = dside_sdf::Topology::from_rows(2, 2, vec![vec![2, -2], vec![-1, 1]]);
    let ns = dside_sdf::nullspace(&t);
    let q = dside_sdf::integralize(&ns[0]);
    assert_eq!(q, vec![1, 1]);
    let trace = dside_sdf::pass(&t, &q, &[0, 1]).expect("cycle with initial token is schedulable");
    assert_eq!(trace, vec![1, 0]);
}

/// Scenario F: multi-path communication records every shortest path, with
/// the first one used by default for wcct assembly.
#[test]
fn scenario_f_multi_path_communication_records_all_paths() {
    let mut b = GraphBuilder::new();
    let p1 = b.add_vertex("p1", [vocab::PROCESSING_COMPONENT]);
    let p2 = b.add_vertex("p2", [vocab::PROCESSING_COMPONENT]);
    let c1 = b.add_vertex("c1", [vocab::COMMUNICATION_COMPONENT]);
    let c2 = b.add_vertex("c2", [vocab::COMMUNICATION_COMPONENT]);
    b.add_edge(p1, c1, ["link"]);
    b.add_edge(c1, p2, ["link"]);
    b.add_edge(p1, c2, ["link"]);
    b.add_edge(c2, p2, ["link"]);
    b.add_vertex("s", [vocab::SCHEDULER]);
    let g: Graph = b.build().unwrap();

    let paths = g.shortest_paths(p1, p2);
    assert_eq!(paths.len(), 2);
    for p in &paths {
        assert_eq!(p.len(), 3);
    }
}
