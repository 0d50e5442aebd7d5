use std::collections::{BTreeSet, HashSet, VecDeque};

use proptest::prelude::*;

use edgerank_core::graph::{AdjacencyIndex, DegreeTable, EdgeStore, GraphStats};
use edgerank_core::io::export::write_ranks;
use edgerank_core::io::loader::read_edge_list;
use edgerank_core::metrics::histogram::DegreeHistogram;
use edgerank_core::metrics::pagerank::{PageRankConfig, pagerank, uniform_ranks};
use edgerank_core::metrics::traversal::{bfs, bfs_indexed, neighbors};

/// Edge lists over a small id space so that graphs are dense enough to have
/// interesting components.
fn arb_pairs() -> impl Strategy<Value = Vec<(u64, u64)>> {
    prop::collection::vec((0_u64..40, 0_u64..40), 0..120)
}

/// Reference reachability over the undirected view, by union of edges.
fn reachable(pairs: &[(u64, u64)], start: u64) -> BTreeSet<u64> {
    let mut seen = BTreeSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some(c) = queue.pop_front() {
        for &(s, t) in pairs {
            let next = if s == c {
                t
            } else if t == c {
                s
            } else {
                continue;
            };
            if seen.insert(next) {
                queue.push_back(next);
            }
        }
    }
    seen
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn node_count_is_one_past_max_id(pairs in arb_pairs()) {
        let store = EdgeStore::from_pairs(&pairs);
        let expected = pairs.iter().map(|&(s, t)| s.max(t) + 1).max().unwrap_or(0);
        prop_assert_eq!(store.node_count(), expected);
        prop_assert_eq!(store.edge_count(), pairs.len());
        for edge in store.iter_edges() {
            prop_assert!(store.check_node(edge.source).is_ok());
            prop_assert!(store.check_node(edge.target).is_ok());
        }
    }

    #[test]
    fn degrees_sum_to_edge_count(pairs in arb_pairs()) {
        let store = EdgeStore::from_pairs(&pairs);
        let degrees = DegreeTable::build(&store).expect("degree table");
        prop_assert_eq!(degrees.node_count(), store.node_count());
        prop_assert_eq!(degrees.total(), pairs.len() as u64);
    }

    #[test]
    fn histogram_counts_sum_to_node_count(pairs in arb_pairs()) {
        let store = EdgeStore::from_pairs(&pairs);
        let degrees = DegreeTable::build(&store).expect("degree table");
        let histogram = DegreeHistogram::build(&degrees);
        prop_assert_eq!(histogram.total(), store.node_count());
        for (d, count) in histogram.iter() {
            let direct = degrees.as_slice().iter().filter(|&&x| x == d).count() as u64;
            prop_assert_eq!(count, direct);
        }
    }

    #[test]
    fn bfs_visits_exactly_the_reachable_set_once(pairs in arb_pairs(), pick in any::<prop::sample::Index>()) {
        let store = EdgeStore::from_pairs(&pairs);
        prop_assume!(store.node_count() > 0);
        let start = pick.index(usize::try_from(store.node_count()).unwrap_or(usize::MAX)) as u64;

        let traversal = bfs(&store, start).expect("start in range");
        let order = traversal.order();

        let distinct: HashSet<u64> = order.iter().copied().collect();
        prop_assert_eq!(distinct.len(), order.len());
        prop_assert_eq!(order.first().copied(), Some(start));

        let expected = reachable(&pairs, start);
        let visited: BTreeSet<u64> = order.iter().copied().collect();
        prop_assert_eq!(visited, expected);
        prop_assert_eq!(traversal.visited().len(), order.len());
    }

    #[test]
    fn indexed_bfs_matches_scan(pairs in arb_pairs(), pick in any::<prop::sample::Index>()) {
        let store = EdgeStore::from_pairs(&pairs);
        prop_assume!(store.node_count() > 0);
        let start = pick.index(usize::try_from(store.node_count()).unwrap_or(usize::MAX)) as u64;

        let index = AdjacencyIndex::build(&store).expect("index");
        prop_assert_eq!(bfs(&store, start), bfs_indexed(&index, start));
    }

    #[test]
    fn neighbors_match_adjacency_runs(pairs in arb_pairs()) {
        let store = EdgeStore::from_pairs(&pairs);
        let index = AdjacencyIndex::build(&store).expect("index");
        for node in 0..store.node_count() {
            let scanned = neighbors(&store, node).expect("in range");
            let mut seen = HashSet::new();
            let indexed: Vec<u64> = index
                .neighbors(node)
                .expect("in range")
                .iter()
                .copied()
                .filter(|n| seen.insert(*n))
                .collect();
            prop_assert_eq!(scanned, indexed);
        }
    }

    #[test]
    fn zero_iterations_is_uniform(pairs in arb_pairs()) {
        let store = EdgeStore::from_pairs(&pairs);
        let degrees = DegreeTable::build(&store).expect("degree table");
        let config = PageRankConfig { iterations: 0, ..PageRankConfig::default() };
        let result = pagerank(&store, &degrees, &config).expect("pagerank");
        prop_assert_eq!(result.ranks, uniform_ranks(store.node_count()).expect("ranks"));
    }

    #[test]
    fn pagerank_is_deterministic(pairs in arb_pairs(), damping in 0.0_f64..=1.0, iterations in 0_u32..20) {
        let store = EdgeStore::from_pairs(&pairs);
        let degrees = DegreeTable::build(&store).expect("degree table");
        let config = PageRankConfig { damping, iterations, ..PageRankConfig::default() };

        let a = pagerank(&store, &degrees, &config).expect("pagerank");
        let b = pagerank(&store, &degrees, &config).expect("pagerank");
        let a_bits: Vec<u64> = a.ranks.iter().map(|r| r.to_bits()).collect();
        let b_bits: Vec<u64> = b.ranks.iter().map(|r| r.to_bits()).collect();
        prop_assert_eq!(a_bits, b_bits);
        prop_assert_eq!(a.skipped_edges, 0);
    }

    #[test]
    fn stats_agree_with_tables(pairs in arb_pairs()) {
        let store = EdgeStore::from_pairs(&pairs);
        let degrees = DegreeTable::build(&store).expect("degree table");
        let stats = GraphStats::compute(&store, &degrees);

        let touched: HashSet<u64> = pairs.iter().flat_map(|&(s, t)| [s, t]).collect();
        prop_assert_eq!(stats.isolated_node_count, store.node_count() - touched.len() as u64);
        prop_assert_eq!(stats.self_loop_count, pairs.iter().filter(|(s, t)| s == t).count());
        prop_assert_eq!(stats.max_out_degree, degrees.max_degree().unwrap_or(0));
    }

    #[test]
    fn written_edge_lists_load_back(pairs in arb_pairs()) {
        let text: String = pairs.iter().map(|(s, t)| format!("{s} {t}\n")).collect();
        let loaded = read_edge_list(text.as_bytes()).expect("in-memory read");
        prop_assert!(loaded.is_complete());
        prop_assert_eq!(loaded.store, EdgeStore::from_pairs(&pairs));
    }

    #[test]
    fn exported_ranks_parse_back_exactly(ranks in prop::collection::vec(1e-6_f64..1.0, 0..50)) {
        let mut buf = Vec::new();
        write_ranks(&mut buf, &ranks).expect("write to vec");
        let text = String::from_utf8(buf).expect("utf8");
        let parsed: Vec<f64> = text.lines().map(|l| l.parse().expect("float")).collect();
        prop_assert_eq!(parsed, ranks);
    }
}
