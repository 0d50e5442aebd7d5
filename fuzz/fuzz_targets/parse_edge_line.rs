#![no_main]

use edgerank_core::io::loader::parse_edge_line;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Any accepted line must print back to something that parses the same.
    if let Ok(Some(edge)) = parse_edge_line(data) {
        let line = format!("{} {}", edge.source, edge.target);
        assert_eq!(parse_edge_line(line.as_bytes()), Ok(Some(edge)));
    }
});
