// web_app/state/pagination.rs - Which page buttons a pagination bar shows
//
// At most five page numbers are visible; the first and last page are
// always reachable and skipped ranges collapse into a gap.

const MAX_VISIBLE_PAGES: u32 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageSlot {
    Page(u32),
    /// Skipped pages, rendered as "..."
    Gap,
}

/// Page buttons for `current` out of `total` pages (1-based)
///
/// Empty when there is nothing to paginate.
pub fn page_window(current: u32, total: u32) -> Vec<PageSlot> {
    if total <= 1 {
        return Vec::new();
    }

    let pages: Vec<u32> = if total <= MAX_VISIBLE_PAGES {
        (1..=total).collect()
    } else if current <= 3 {
        (1..=4).chain(std::iter::once(total)).collect()
    } else if current >= total - 2 {
        std::iter::once(1).chain(total - 3..=total).collect()
    } else {
        std::iter::once(1)
            .chain(current - 1..=current + 1)
            .chain(std::iter::once(total))
            .collect()
    };

    let mut slots = Vec::with_capacity(pages.len() + 2);
    let mut previous: Option<u32> = None;
    for page in pages {
        if matches!(previous, Some(p) if page - p > 1) {
            slots.push(PageSlot::Gap);
        }
        slots.push(PageSlot::Page(page));
        previous = Some(page);
    }
    slots
}

/// Whether "previous"/"next" buttons are enabled
pub fn can_step(current: u32, total: u32) -> (bool, bool) {
    (current > 1, current < total)
}
