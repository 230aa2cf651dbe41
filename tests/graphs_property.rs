mod common;

use common::Noop;
use proptest::prelude::*;

use plait::graph::{GraphBuilder, GraphError};

/// Builds a graph of `n` chained nodes (`n0 -> n1 -> ...`) plus arbitrary
/// extra forward edges; forward-only edges can never form a cycle.
fn forward_graph(n: usize, extra: &[(usize, usize)]) -> GraphBuilder {
    let mut builder = GraphBuilder::new();
    for i in 0..n {
        let mut preds: Vec<String> = Vec::new();
        if i > 0 {
            preds.push(format!("n{}", i - 1));
        }
        for &(from, to) in extra {
            if to == i && from < to && from < n {
                preds.push(format!("n{from}"));
            }
        }
        let pred_refs: Vec<&str> = preds.iter().map(String::as_str).collect();
        builder = builder.add_node(format!("n{i}").as_str(), &pred_refs, Noop);
    }
    builder
}

proptest! {
    #[test]
    fn forward_edge_graphs_always_build(
        n in 2usize..8,
        extra in proptest::collection::vec((0usize..8, 0usize..8), 0..10),
    ) {
        let graph = forward_graph(n, &extra).build();
        prop_assert!(graph.is_ok());

        let graph = graph.unwrap();
        let order = graph.topological_order();
        prop_assert_eq!(order.len(), n);
        // Every node appears after all of its predecessors.
        for (position, name) in order.iter().enumerate() {
            for pred in graph.predecessors(name) {
                let pred_position = order.iter().position(|other| other == pred).unwrap();
                prop_assert!(pred_position < position);
            }
        }
    }

    #[test]
    fn any_back_edge_creates_a_cycle(n in 2usize..8, target in 0usize..8) {
        let target = target % (n - 1); // strictly before the last node
        let mut builder = GraphBuilder::new();
        for i in 0..n {
            let mut preds: Vec<String> = Vec::new();
            if i > 0 {
                preds.push(format!("n{}", i - 1));
            }
            if i == target {
                preds.push(format!("n{}", n - 1));
            }
            let pred_refs: Vec<&str> = preds.iter().map(String::as_str).collect();
            builder = builder.add_node(format!("n{i}").as_str(), &pred_refs, Noop);
        }
        prop_assert!(matches!(builder.build(), Err(GraphError::Cycle { .. })));
    }
}
