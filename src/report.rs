//! Text rendering of simulator state.

use std::fmt::Write;

use crate::vm_manager::PageMapping;

const FREE_MAP_WIDTH: usize = 16;

/// `.` for a free frame, `#` for a used one, 16 frames per line
pub fn render_free_map(bitmap: &[bool]) -> String {
    let mut out = String::from("--- PAGE FREE MAP ---\n");
    for row in bitmap.chunks(FREE_MAP_WIDTH) {
        out.extend(row.iter().map(|&free| if free { '.' } else { '#' }));
        out.push('\n');
    }
    out
}

pub fn render_page_table(process: usize, mappings: &[PageMapping]) -> String {
    let mut out = format!("--- PROCESS {} PAGE TABLE ---\n", process);
    for mapping in mappings {
        writeln!(out, "{:02x} -> {:02x}", mapping.virtual_page, mapping.frame).ok();
    }
    out
}
