#![no_main]

use edgerank_core::graph::DegreeTable;
use edgerank_core::io::loader::read_edge_list;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(loaded) = read_edge_list(data) else {
        return;
    };
    let store = &loaded.store;
    if store.node_count() > 1 << 20 {
        return;
    }
    let degrees = DegreeTable::build(store).expect("degree table");
    assert_eq!(degrees.total(), store.edge_count() as u64);
    for edge in store.iter_edges() {
        assert!(edge.source < store.node_count());
        assert!(edge.target < store.node_count());
    }
});
