#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tabstrip_layout::{
    ClipThresholds, DefaultTabLayoutModel, ScrollingTabLayoutModel, TabLayoutModel,
};

#[derive(Debug, Arbitrary)]
enum Op {
    SetOffset(Option<u8>),
    SetWidth(i16),
    MakeVisible(u8),
    Select(Option<u8>),
    Forward,
    Backward,
    Reclaim,
}

#[derive(Debug, Arbitrary)]
struct Input {
    widths: Vec<u16>,
    min_left: u8,
    min_right: u8,
    pixels: u8,
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    let widths: Vec<i32> = input
        .widths
        .iter()
        .take(64)
        .map(|&w| i32::from(w % 1000).max(1))
        .collect();
    let n = widths.len();
    let thresholds = ClipThresholds {
        min_left: i32::from(input.min_left.max(1)),
        min_right: i32::from(input.min_right.max(1)),
    };
    let mut m = ScrollingTabLayoutModel::new(DefaultTabLayoutModel::from_widths(widths, 24))
        .with_thresholds(thresholds)
        .with_pixels_to_add_to_selection(i32::from(input.pixels));

    for op in input.ops.iter().take(256) {
        match *op {
            Op::SetOffset(o) => {
                m.set_offset(o.map(usize::from));
            }
            Op::SetWidth(w) => {
                m.set_width(i32::from(w));
            }
            Op::MakeVisible(i) => {
                let w = m.width();
                m.make_visible(usize::from(i), w);
            }
            Op::Select(s) => m.set_selected(s.map(usize::from)),
            Op::Forward => {
                m.scroll_forward();
            }
            Op::Backward => {
                m.scroll_backward();
            }
            Op::Reclaim => {
                m.ensure_available_space_used(false);
            }
        }

        if n <= 1 {
            assert_eq!(m.offset(), None, "offset set with {n} tabs");
        }
        let layout = m.layout();
        assert_eq!(layout.widths.len(), n);
        assert!(layout.widths.iter().all(|&w| w >= 0), "negative width");
        if let (Some(first), Some(last)) = (layout.first_visible, layout.last_visible) {
            assert!(first <= last && last < n);
            for i in (0..first).chain(last + 1..n) {
                assert_eq!(m.w(i), 0, "tab {i} outside the visible range has width");
            }
        }
        for i in 0..n + 2 {
            let _ = m.bounds(i);
        }
    }
});
