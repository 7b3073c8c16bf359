//! Static-geometry preprocessing: collapse touching block edges into the
//! minimal exterior boundary.
//!
//! Without this a ball crossing the shared corner of two touching blocks can
//! be classified against that corner by edges from both blocks and bounce
//! twice.

use crate::geometry::{Line, Rectangle};

/// Drop every edge that appears an even number of times. A wall shared in
/// full by two touching blocks is interior and must not be collidable.
pub fn cancel_shared_edges(lines: impl IntoIterator<Item = Line>) -> Vec<Line> {
    let mut kept: Vec<Line> = Vec::new();
    for line in lines {
        match kept.iter().position(|l| *l == line) {
            Some(index) => {
                kept.remove(index);
            }
            None => kept.push(line),
        }
    }
    kept
}

/// Merge collinear segments that continue each other until no pair merges.
///
/// Shared interior edges are cancelled first.
pub fn merge_lines(lines: impl IntoIterator<Item = Line>) -> Vec<Line> {
    let mut lines = cancel_shared_edges(lines);

    let mut pass = 0;
    loop {
        pass += 1;
        let mut merged = 0;
        let mut i = 0;
        while i < lines.len() {
            let mut j = i + 1;
            while j < lines.len() {
                match lines[i].merge(&lines[j]) {
                    Ok(line) => {
                        lines[i] = line;
                        lines.remove(j);
                        merged += 1;
                        // lines[i] changed, rescan its partners
                        j = i + 1;
                    }
                    Err(_) => j += 1,
                }
            }
            i += 1;
        }
        log::debug!("merge pass {}: {} merges, {} lines", pass, merged, lines.len());
        if merged == 0 {
            break;
        }
    }
    lines
}

/// Collidable outline of a set of blocks
pub fn boundary_lines(blocks: &[Rectangle]) -> Vec<Line> {
    merge_lines(blocks.iter().flat_map(|block| block.edges()))
}
