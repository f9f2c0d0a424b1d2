#![forbid(unsafe_code)]

//! Clipped tab geometry as a pure function.
//!
//! [`recompute`] turns natural tab widths plus the scroll state into the
//! on-screen width of every tab. [`ScrollingTabLayoutModel`] memoizes it with
//! a [`LayoutCacheKey`] built from the scalar inputs plus a generation that
//! changes whenever the natural widths may have.
//!
//! # Rules
//!
//! * A viewport narrower than the left clip threshold shows one tab (the
//!   selected one, else tab 0) at the full viewport width.
//! * A lone tab always takes the full viewport width.
//! * The offset tab is drawn as a left-clipped stub; tabs before it get
//!   width 0.
//! * Walking right, the first tab that overflows is truncated to the
//!   remaining space minus one pixel. If that would leave it narrower than
//!   the right clip threshold, the previous tab absorbs the space instead and
//!   becomes the last visible tab.
//! * Offset at the last tab shows it whole plus as much of its predecessor as
//!   fits.
//!
//! A tab fits when `x + width <= viewport`. A clipped last tab always ends
//! at `viewport - 1`.
//!
//! [`ScrollingTabLayoutModel`]: crate::ScrollingTabLayoutModel

/// Default narrowest stub kept for a tab clipped at the left edge.
pub const MIN_LEFT_CLIPPED_WIDTH: i32 = 40;

/// Default narrowest visible part of a tab clipped at the right edge.
pub const MIN_RIGHT_CLIPPED_WIDTH: i32 = 40;

/// Clip thresholds in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClipThresholds {
    pub min_left: i32,
    pub min_right: i32,
}

impl Default for ClipThresholds {
    fn default() -> Self {
        Self {
            min_left: MIN_LEFT_CLIPPED_WIDTH,
            min_right: MIN_RIGHT_CLIPPED_WIDTH,
        }
    }
}

/// Everything [`recompute`] depends on.
#[derive(Debug, Clone, Copy)]
pub struct LayoutInput<'a> {
    /// Natural width of every tab, in model order.
    pub natural: &'a [i32],
    /// Viewport width; `<= 0` lays nothing out.
    pub viewport_width: i32,
    /// Left-clipped tab, `None` when tab 0 is fully visible.
    pub offset: Option<usize>,
    /// Selected tab.
    pub selected: Option<usize>,
    /// Extra pixels given to the selected tab.
    pub pixels_to_add_to_selection: i32,
    pub thresholds: ClipThresholds,
}

/// Key for memoizing [`recompute`].
///
/// Natural widths are not part of the key. The owner bumps `generation`
/// whenever they may have changed, the same way a layout cache invalidates
/// every entry at once.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct LayoutCacheKey {
    pub viewport_width: i32,
    pub offset: Option<usize>,
    pub selected: Option<usize>,
    pub pixels_to_add_to_selection: i32,
    pub thresholds: ClipThresholds,
    pub tab_count: usize,
    /// Natural-width generation of the owner.
    pub generation: u64,
}

impl LayoutCacheKey {
    /// Build the key for `input` computed from widths of `generation`.
    #[must_use]
    pub fn new(input: &LayoutInput<'_>, generation: u64) -> Self {
        Self {
            tab_count: input.natural.len(),
            generation,
            viewport_width: input.viewport_width,
            offset: input.offset,
            selected: input.selected,
            pixels_to_add_to_selection: input.pixels_to_add_to_selection,
            thresholds: input.thresholds,
        }
    }
}

/// On-screen geometry for one viewport width.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LayoutResult {
    /// On-screen width per tab; 0 for tabs outside the visible range.
    pub widths: Vec<i32>,
    pub first_visible: Option<usize>,
    pub last_visible: Option<usize>,
    /// The last visible tab is truncated at the right edge.
    pub last_tab_clipped: bool,
    /// Scrolling forward would reveal more.
    pub forward_enabled: bool,
    /// Scrolling backward would reveal more.
    pub backward_enabled: bool,
    /// Left edge per tab, the prefix sums of `widths`.
    lefts: Vec<i32>,
}

impl LayoutResult {
    /// Left edge of a tab; 0 for stale indices.
    #[must_use]
    pub fn x(&self, index: usize) -> i32 {
        self.lefts.get(index).copied().unwrap_or(0)
    }

    /// On-screen width of a tab; 0 for stale or hidden tabs.
    #[must_use]
    pub fn w(&self, index: usize) -> i32 {
        self.widths.get(index).copied().unwrap_or(0)
    }

    /// Whether `index` lies within the visible range.
    #[must_use]
    pub fn is_visible(&self, index: usize) -> bool {
        match (self.first_visible, self.last_visible) {
            (Some(first), Some(last)) => index >= first && index <= last && self.w(index) > 0,
            _ => false,
        }
    }

    /// Whether `index` is visible and clipped at neither edge.
    #[must_use]
    pub fn is_fully_visible(&self, index: usize, offset: Option<usize>) -> bool {
        if !self.is_visible(index) {
            return false;
        }
        let left_clipped = offset.is_some() && self.first_visible == Some(index);
        let right_clipped = self.last_tab_clipped && self.last_visible == Some(index);
        !left_clipped && !right_clipped
    }

    /// Right edge of the last visible tab.
    #[must_use]
    pub fn used_width(&self) -> i32 {
        self.last_visible
            .map_or(0, |last| self.x(last) + self.w(last))
    }
}

/// Clamp an offset to what `tab_count` tabs allow.
#[must_use]
pub fn effective_offset(offset: Option<usize>, tab_count: usize) -> Option<usize> {
    if tab_count <= 1 {
        return None;
    }
    offset.map(|o| o.min(tab_count - 1))
}

/// Compute on-screen widths for `input`.
#[must_use]
pub fn recompute(input: &LayoutInput<'_>) -> LayoutResult {
    let mut result = clip(input);
    let mut x = 0;
    result.lefts = result
        .widths
        .iter()
        .map(|&w| {
            let left = x;
            x += w;
            left
        })
        .collect();
    result
}

fn clip(input: &LayoutInput<'_>) -> LayoutResult {
    let count = input.natural.len();
    let width = input.viewport_width;
    let mut result = LayoutResult {
        widths: vec![0; count],
        ..LayoutResult::default()
    };
    if count == 0 || width <= 0 {
        return result;
    }
    let offset = effective_offset(input.offset, count);

    if width < input.thresholds.min_left {
        let only = input.selected.filter(|&s| s < count).unwrap_or(0);
        result.widths[only] = width;
        result.first_visible = Some(only);
        result.last_visible = Some(only);
        update_actions(offset, &mut result);
        return result;
    }

    if count == 1 {
        result.widths[0] = width;
        result.first_visible = Some(0);
        result.last_visible = Some(0);
        update_actions(offset, &mut result);
        return result;
    }

    let leftover = match offset {
        Some(o) if o == count - 1 => {
            layout_from_last_tab(input, &mut result);
            0
        }
        _ => walk(input, offset, &mut result),
    };

    apply_selection_bias(input, offset, &mut result);
    if leftover > 0 {
        redistribute(leftover, &mut result);
    }
    update_actions(offset, &mut result);
    result
}

/// Lay tabs left to right from the offset; returns pixels to redistribute.
fn walk(input: &LayoutInput<'_>, offset: Option<usize>, result: &mut LayoutResult) -> i32 {
    let count = input.natural.len();
    let width = input.viewport_width;
    let start = offset.unwrap_or(0);
    result.first_visible = Some(start);
    result.last_visible = Some(count - 1);

    let mut x = 0;
    for i in start..count {
        let natural = input.natural[i].max(0);
        let tab_width = if offset == Some(i) {
            natural.min(input.thresholds.min_left)
        } else {
            natural
        };
        if x + tab_width <= width {
            result.widths[i] = tab_width;
            x += tab_width;
            continue;
        }

        let remaining = width - x;
        result.last_tab_clipped = true;
        if remaining < input.thresholds.min_right && i != start {
            // Too little room to show a useful sliver: the previous tab takes it.
            let absorbed = remaining - 1;
            result.widths[i - 1] = (result.widths[i - 1] + absorbed).max(0);
            result.last_visible = Some(i - 1);
            return absorbed.max(0);
        }
        result.widths[i] = (remaining - 1).max(0);
        result.last_visible = Some(i);
        return 0;
    }
    0
}

fn layout_from_last_tab(input: &LayoutInput<'_>, result: &mut LayoutResult) {
    let last = input.natural.len() - 1;
    let width = input.viewport_width;
    let last_width = input.natural[last].max(0);
    let room = width - last_width;
    result.last_visible = Some(last);

    if room > 0 {
        let previous = input.natural[last - 1].max(0).min(room);
        result.widths[last - 1] = previous;
        result.widths[last] = last_width;
        result.first_visible = Some(if previous > 0 { last - 1 } else { last });
    } else {
        result.widths[last] = width - 1;
        result.first_visible = Some(last);
        result.last_tab_clipped = true;
    }
}

/// Widen the selected tab, taking the pixels from its visible neighbours.
fn apply_selection_bias(input: &LayoutInput<'_>, offset: Option<usize>, result: &mut LayoutResult) {
    let pixels = input.pixels_to_add_to_selection;
    let (Some(first), Some(last), Some(selected)) =
        (result.first_visible, result.last_visible, input.selected)
    else {
        return;
    };
    if pixels <= 0 || selected < first || selected > last {
        return;
    }
    let left_clipped = offset.is_some() && selected == first;
    let right_clipped = result.last_tab_clipped && selected == last;
    if left_clipped || right_clipped {
        return;
    }
    let neighbours = (last - first) as i32;
    if neighbours == 0 {
        return;
    }

    result.widths[selected] += pixels;
    // `1 / neighbours` binds first, so each neighbour's share is `pixels`
    // once there are two or more of them.
    let share = pixels - 1 / neighbours;
    let step = if share > 0 { share } else { 2 };

    let mut budget = pixels;
    while budget > 0 {
        let mut took_any = false;
        for i in (first..=last).filter(|&i| i != selected) {
            if budget == 0 {
                break;
            }
            // Capped by the budget: neighbours give up exactly what the
            // selection gained, so a clipped last tab keeps its edge.
            let take = step.min(budget).min(result.widths[i]);
            if take > 0 {
                result.widths[i] -= take;
                budget -= take;
                took_any = true;
            }
        }
        if !took_any {
            result.widths[selected] -= budget;
            break;
        }
    }
}

/// Spread pixels the absorbing tab picked up over the rest of the range.
fn redistribute(leftover: i32, result: &mut LayoutResult) {
    let (Some(first), Some(last)) = (result.first_visible, result.last_visible) else {
        return;
    };
    let visible = last - first + 1;
    if visible <= 2 {
        return;
    }
    let others = (visible - 1) as i32;
    let per_tab = leftover.min(result.widths[last]) / others;
    if per_tab == 0 {
        return;
    }
    for w in &mut result.widths[first..last] {
        *w += per_tab;
    }
    result.widths[last] -= per_tab * others;
}

fn update_actions(offset: Option<usize>, result: &mut LayoutResult) {
    result.backward_enabled = offset.is_some();
    result.forward_enabled = result.last_tab_clipped
        && matches!(
            (result.first_visible, result.last_visible),
            (Some(first), Some(last)) if last > first
        );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(natural: &[i32], viewport_width: i32) -> LayoutInput<'_> {
        LayoutInput {
            natural,
            viewport_width,
            offset: None,
            selected: None,
            pixels_to_add_to_selection: 0,
            thresholds: ClipThresholds::default(),
        }
    }

    #[test]
    fn empty_model_lays_out_nothing() {
        let r = recompute(&input(&[], 300));
        assert!(r.widths.is_empty());
        assert_eq!(r.first_visible, None);
        assert_eq!(r.used_width(), 0);
    }

    #[test]
    fn unsized_viewport_lays_out_nothing() {
        let r = recompute(&input(&[100, 100], -1));
        assert_eq!(r.widths, [0, 0]);
        assert_eq!(r.last_visible, None);
    }

    #[test]
    fn everything_fits() {
        let r = recompute(&input(&[100, 100, 100], 300));
        assert_eq!(r.widths, [100, 100, 100]);
        assert_eq!((r.first_visible, r.last_visible), (Some(0), Some(2)));
        assert!(!r.last_tab_clipped);
        assert!(!r.forward_enabled);
        assert!(!r.backward_enabled);
    }

    #[test]
    fn overflow_with_room_truncates_tab() {
        // 250 - 200 = 50 left, enough for a right-clipped sliver.
        let r = recompute(&input(&[100; 5], 250));
        assert_eq!(r.widths, [100, 100, 49, 0, 0]);
        assert_eq!(r.last_visible, Some(2));
        assert!(r.last_tab_clipped);
        assert_eq!(r.used_width(), 249);
        assert!(r.forward_enabled);
    }

    #[test]
    fn overflow_without_room_gives_slack_to_previous_tab() {
        // 230 - 200 = 30 left, below the right clip threshold.
        let r = recompute(&input(&[100; 5], 230));
        assert_eq!(r.widths, [100, 129, 0, 0, 0]);
        assert_eq!(r.last_visible, Some(1));
        assert!(r.last_tab_clipped);
        assert_eq!(r.used_width(), 229);
    }

    #[test]
    fn absorbed_slack_is_spread_over_wider_ranges() {
        // 330 - 300 = 30 left -> tab 2 absorbs 29, then 29 / 2 = 14 each for 0 and 1.
        let r = recompute(&input(&[100; 5], 330));
        assert_eq!(r.widths, [114, 114, 101, 0, 0]);
        assert_eq!(r.used_width(), 329);
    }

    #[test]
    fn offset_tab_is_a_stub() {
        let mut i = input(&[100; 4], 250);
        i.offset = Some(1);
        let r = recompute(&i);
        assert_eq!(r.widths, [0, 40, 100, 100]);
        assert_eq!((r.first_visible, r.last_visible), (Some(1), Some(3)));
        assert!(!r.last_tab_clipped);
        assert!(r.backward_enabled);
    }

    #[test]
    fn narrow_viewport_shows_selection_only() {
        let mut i = input(&[100; 4], 30);
        i.selected = Some(2);
        let r = recompute(&i);
        assert_eq!(r.widths, [0, 0, 30, 0]);
        assert_eq!((r.first_visible, r.last_visible), (Some(2), Some(2)));
        assert_eq!(r.x(2), 0);
        assert!(!r.last_tab_clipped);
    }

    #[test]
    fn narrow_viewport_without_selection_shows_first_tab() {
        let r = recompute(&input(&[100; 4], 39));
        assert_eq!(r.widths, [39, 0, 0, 0]);
    }

    #[test]
    fn offset_on_last_tab_shows_predecessor_sliver() {
        let mut i = input(&[100, 100, 120], 150);
        i.offset = Some(2);
        let r = recompute(&i);
        assert_eq!(r.widths, [0, 30, 120]);
        assert_eq!((r.first_visible, r.last_visible), (Some(1), Some(2)));
        assert!(!r.last_tab_clipped);
    }

    #[test]
    fn offset_on_oversized_last_tab_truncates_it() {
        let mut i = input(&[100, 200], 150);
        i.offset = Some(1);
        let r = recompute(&i);
        assert_eq!(r.widths, [0, 149]);
        assert_eq!((r.first_visible, r.last_visible), (Some(1), Some(1)));
        assert!(r.last_tab_clipped);
        assert!(!r.forward_enabled);
    }

    #[test]
    fn offset_is_ignored_for_single_tab() {
        let mut i = input(&[100], 300);
        i.offset = Some(0);
        let r = recompute(&i);
        assert_eq!(r.widths, [300]);
        assert!(!r.backward_enabled);
    }

    #[test]
    fn single_tab_takes_the_whole_viewport() {
        for width in [40, 99, 100, 500] {
            let r = recompute(&input(&[100], width));
            assert_eq!(r.widths, [width]);
            assert_eq!((r.first_visible, r.last_visible), (Some(0), Some(0)));
            assert!(!r.last_tab_clipped);
            assert_eq!(r.used_width(), width);
        }
    }

    #[test]
    fn selection_bias_takes_pixels_from_first_neighbour() {
        let mut i = input(&[100, 100, 100], 300);
        i.selected = Some(1);
        i.pixels_to_add_to_selection = 6;
        let r = recompute(&i);
        assert_eq!(r.widths, [94, 106, 100]);
        assert_eq!(r.used_width(), 300);
    }

    #[test]
    fn selection_bias_with_one_neighbour_cycles() {
        let mut i = input(&[100, 100], 200);
        i.selected = Some(0);
        i.pixels_to_add_to_selection = 5;
        let r = recompute(&i);
        // share = 5 - 1 / 1 = 4, then the remaining pixel.
        assert_eq!(r.widths, [105, 95]);
    }

    #[test]
    fn selection_bias_falls_back_to_two_pixel_steps() {
        let mut i = input(&[100, 100], 200);
        i.selected = Some(1);
        i.pixels_to_add_to_selection = 1;
        let r = recompute(&i);
        assert_eq!(r.widths, [99, 101]);
    }

    #[test]
    fn selection_bias_never_changes_total_width() {
        let cases: [(&[i32], usize); 3] = [(&[100, 100], 0), (&[100, 100], 1), (&[100, 100, 100], 1)];
        for (natural, selected) in cases {
            let total: i32 = natural.iter().sum();
            for pixels in 1..12 {
                let mut i = input(natural, total);
                i.selected = Some(selected);
                i.pixels_to_add_to_selection = pixels;
                let r = recompute(&i);
                assert_eq!(r.widths.iter().sum::<i32>(), total, "pixels {pixels}");
                assert_eq!(r.w(selected), natural[selected] + pixels);
            }
        }
    }

    #[test]
    fn clipped_last_tab_keeps_its_edge_under_selection_bias() {
        let mut i = input(&[100; 5], 250);
        i.selected = Some(1);
        i.pixels_to_add_to_selection = 1;
        let r = recompute(&i);
        assert_eq!(r.widths, [99, 101, 49, 0, 0]);
        assert_eq!(r.used_width(), 249);
    }

    #[test]
    fn selection_bias_skips_clipped_selection() {
        let mut i = input(&[100; 5], 250);
        i.selected = Some(2);
        i.pixels_to_add_to_selection = 10;
        let r = recompute(&i);
        assert_eq!(r.widths, [100, 100, 49, 0, 0]);
    }

    #[test]
    fn cache_key_tracks_generation_and_inputs() {
        let a = input(&[100, 100], 300);
        assert_eq!(LayoutCacheKey::new(&a, 1), LayoutCacheKey::new(&input(&[100, 100], 300), 1));
        assert_ne!(LayoutCacheKey::new(&a, 1), LayoutCacheKey::new(&a, 2));
        assert_ne!(LayoutCacheKey::new(&a, 1), LayoutCacheKey::new(&input(&[100, 100], 301), 1));
        assert_ne!(LayoutCacheKey::new(&a, 1), LayoutCacheKey::new(&input(&[100], 300), 1));
    }

    #[test]
    fn left_edges_are_prefix_sums() {
        let mut i = input(&[100; 4], 250);
        i.offset = Some(1);
        let r = recompute(&i);
        assert_eq!((0..4).map(|t| r.x(t)).collect::<Vec<_>>(), [0, 0, 40, 140]);
    }

    #[test]
    fn stale_index_geometry_is_zero() {
        let r = recompute(&input(&[100], 300));
        assert_eq!(r.x(5), 0);
        assert_eq!(r.w(5), 0);
        assert!(!r.is_visible(5));
    }
}
