//! Property-based invariant tests for box layout and scrollbars.
//!
//! 1. A box always reports exactly the requested width.
//! 2. Two flexible children around a fixed gap split the rest in order.
//! 3. No line extends past the box while every child gets some width.
//! 4. The scrollbar thumb stays within its budget and is never empty.

use imtui::view::{find_scroll_interval, text, AnyView, BoxView, View};
use imtui::Text;
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn word(s: &str) -> AnyView {
    Box::new(text(vec![Text::plain(s)]))
}

fn word_strategy() -> impl Strategy<Value = String> {
    "[a-z]{0,12}"
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Width conservation
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn box_width_is_requested_width(
        a in word_strategy(),
        b in word_strategy(),
        c in word_strategy(),
        w in 0usize..60,
        h in 1usize..5,
    ) {
        let view = BoxView::new("a* b= c*", vec![word(&a), word(&b), word(&c)]);
        let buf = view.render(w, h);
        prop_assert_eq!(buf.width, w);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Flex division around a fixed gap
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn flex_children_split_remaining_width(w in 5usize..80) {
        let fill = "x".repeat(80);
        let view = BoxView::new("a* 5 c*", vec![word(&fill), word(&fill)]);
        let buf = view.render(w, 1);

        let first = (w - 5) / 2;
        let line: String = buf.plain_lines().concat();
        let xs = "x".repeat(first);
        prop_assert_eq!(buf.width, w);
        prop_assert_eq!(line.len(), w);
        prop_assert_eq!(&line[..first], xs.as_str());
        prop_assert_eq!(&line[first..first + 5], "     ");
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Content stays inside the box
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn lines_fit_within_width(
        a in word_strategy(),
        b in word_strategy(),
        w in 14usize..40,
    ) {
        let view = BoxView::new("a= 1 b*", vec![word(&a), word(&b)]);
        let buf = view.render(w, 3);
        for line in buf.plain_lines() {
            prop_assert!(line.chars().count() <= w, "{:?} wider than {}", line, w);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Scrollbar thumb bounds
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn scroll_thumb_within_budget(
        total in 1usize..1000,
        low_frac in 0.0f64..1.0,
        len in 1usize..100,
        budget in 1usize..100,
    ) {
        let low = ((total as f64) * low_frac) as usize;
        let high = (low + len).min(total).max(low + 1);
        let (start, end) = find_scroll_interval(total, low, high, budget);
        prop_assert!(start < end, "empty thumb {}..{}", start, end);
        prop_assert!(end <= budget);
    }
}
