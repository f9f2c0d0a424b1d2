//! Property-based invariant tests for the scrolling tab layout.
//!
//! 1. With at most one tab the offset is always none
//! 2. The visible range is ordered and everything outside it has width 0
//! 3. The last visible tab ends inside the viewport, exactly one pixel short
//!    of the edge when clipped
//! 4. Repeating `make_visible` reports no further change
//! 5. No panics on arbitrary operation sequences

use proptest::prelude::*;
use tabstrip_layout::{
    DefaultTabLayoutModel, MIN_LEFT_CLIPPED_WIDTH, ScrollingTabLayoutModel, TabLayoutModel,
};

// ── Strategies ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Op {
    SetOffset(Option<usize>),
    SetWidth(i32),
    MakeVisible(usize),
    Select(Option<usize>),
    Forward,
    Backward,
    Reclaim,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        proptest::option::of(0usize..40).prop_map(Op::SetOffset),
        (-5i32..1500).prop_map(Op::SetWidth),
        (0usize..40).prop_map(Op::MakeVisible),
        proptest::option::of(0usize..40).prop_map(Op::Select),
        Just(Op::Forward),
        Just(Op::Backward),
        Just(Op::Reclaim),
    ]
}

fn widths_strategy() -> impl Strategy<Value = Vec<i32>> {
    proptest::collection::vec(1i32..300, 0..30)
}

fn scrolling(widths: Vec<i32>, pixels: i32) -> ScrollingTabLayoutModel<DefaultTabLayoutModel> {
    ScrollingTabLayoutModel::new(DefaultTabLayoutModel::from_widths(widths, 24))
        .with_pixels_to_add_to_selection(pixels)
}

fn apply(m: &mut ScrollingTabLayoutModel<DefaultTabLayoutModel>, op: &Op) {
    match *op {
        Op::SetOffset(o) => {
            m.set_offset(o);
        }
        Op::SetWidth(w) => {
            m.set_width(w);
        }
        Op::MakeVisible(i) => {
            let w = m.width();
            m.make_visible(i, w);
        }
        Op::Select(s) => m.set_selected(s.filter(|&s| s < m.tab_count())),
        Op::Forward => {
            m.scroll_forward();
        }
        Op::Backward => {
            m.scroll_backward();
        }
        Op::Reclaim => {
            m.ensure_available_space_used(true);
        }
    }
}

fn check_geometry(m: &mut ScrollingTabLayoutModel<DefaultTabLayoutModel>, width: i32) {
    let n = m.tab_count();
    let first = m.first_visible_tab(width);
    let last = m.last_visible_tab(width);
    if n == 0 {
        assert_eq!((first, last), (None, None));
        return;
    }
    let (Some(first), Some(last)) = (first, last) else {
        panic!("no visible range for {n} tabs at width {width}");
    };
    assert!(first <= last, "first {first} > last {last}");
    assert!(last < n, "last {last} out of {n}");
    for i in (0..first).chain(last + 1..n) {
        assert_eq!(m.w(i), 0, "hidden tab {i} has width");
    }
    let right = m.x(last) + m.w(last);
    if m.is_last_tab_clipped() {
        assert_eq!(right, width - 1, "clipped last tab must stop one pixel short");
    } else {
        assert!(right <= width, "unclipped last tab overflows: {right} > {width}");
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Offset invariant
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn offset_stays_none_with_one_tab(
        single in any::<bool>(),
        ops in proptest::collection::vec(op_strategy(), 0..40),
    ) {
        let widths = if single { vec![120] } else { Vec::new() };
        let mut m = scrolling(widths, 0);
        for op in &ops {
            apply(&mut m, op);
            prop_assert_eq!(m.offset(), None);
            prop_assert_eq!(m.offset_raw(), -1);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2–3. Coverage and fit boundary
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn visible_range_and_fit_boundary_hold(
        widths in widths_strategy(),
        width in MIN_LEFT_CLIPPED_WIDTH..1500,
        pixels in 0i32..20,
        ops in proptest::collection::vec(op_strategy(), 0..30),
    ) {
        let mut m = scrolling(widths, pixels);
        for op in &ops {
            apply(&mut m, op);
        }
        check_geometry(&mut m, width);
    }

    #[test]
    fn every_offset_respects_fit_boundary(
        widths in widths_strategy(),
        width in MIN_LEFT_CLIPPED_WIDTH..1500,
        offset in proptest::option::of(0usize..30),
    ) {
        let mut m = scrolling(widths, 0);
        m.set_offset(offset);
        check_geometry(&mut m, width);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. make_visible idempotence
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn make_visible_twice_reports_no_change(
        widths in widths_strategy(),
        width in 0i32..1500,
        index in 0usize..30,
        selected in proptest::option::of(0usize..30),
        ops in proptest::collection::vec(op_strategy(), 0..10),
    ) {
        let mut m = scrolling(widths, 0);
        for op in &ops {
            apply(&mut m, op);
        }
        m.set_selected(selected.filter(|&s| s < m.tab_count()));
        m.make_visible(index, width);
        prop_assert!(!m.make_visible(index, width));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Robustness
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn arbitrary_sequences_never_panic(
        widths in widths_strategy(),
        ops in proptest::collection::vec(op_strategy(), 0..60),
    ) {
        let mut m = scrolling(widths, 4);
        for op in &ops {
            apply(&mut m, op);
            let n = m.tab_count();
            for i in 0..n + 2 {
                let _ = m.bounds(i);
            }
            let _ = m.index_of_point(50, 5);
            let _ = m.drop_index_of_point(50, 5);
        }
    }
}

#[test]
fn five_equal_tabs_in_narrow_viewport() {
    let mut m = scrolling(vec![100; 5], 0);
    assert_eq!(m.first_visible_tab(230), Some(0));
    assert_eq!(m.last_visible_tab(230), Some(1));
    assert!(m.is_last_tab_clipped());
}

#[test]
fn five_equal_tabs_at_250_truncate_third() {
    let mut m = scrolling(vec![100; 5], 0);
    assert_eq!(m.first_visible_tab(250), Some(0));
    assert_eq!(m.last_visible_tab(250), Some(2));
    assert!(m.is_last_tab_clipped());
    let widths: Vec<i32> = (0..5).map(|i| m.w(i)).collect();
    assert_eq!(widths, [100, 100, 49, 0, 0]);
    assert_eq!(m.x(2) + m.w(2), 249);
    assert!(m.can_scroll_forward());
    assert!(!m.can_scroll_backward());
}

#[test]
fn single_tab_any_wide_viewport() {
    for width in [40, 41, 99, 100, 500] {
        let mut m = scrolling(vec![100], 0);
        assert_eq!(m.offset(), None);
        assert_eq!(m.first_visible_tab(width), Some(0));
        assert_eq!(m.last_visible_tab(width), Some(0));
        assert_eq!(m.x(0), 0);
        assert_eq!(m.w(0), width, "lone tab must fill a {width}px viewport");
        assert!(!m.is_last_tab_clipped());
    }
}
