use crate::models::Revenue;

pub const ITEMS_PER_PAGE: i64 = 6;

/// Gridline spacing of the revenue chart, in dollars
const Y_AXIS_STEP: i64 = 1000;

/// Row offset of a 1-indexed page. Callers clamp `page` to at least 1.
///
/// Saturates at `i64::MAX`, which is past every row, so a huge page is empty.
pub fn offset(page: i64) -> i64 {
    page.saturating_sub(1).saturating_mul(ITEMS_PER_PAGE)
}

pub fn page_count(total_rows: i64, items_per_page: i64) -> i64 {
    if total_rows <= 0 {
        return 0;
    }
    (total_rows + items_per_page - 1) / items_per_page
}

#[derive(Debug, Clone, PartialEq)]
pub struct YAxis {
    /// Tick labels from `top_label` down to zero, e.g. `$5K`, `$4K`, ... `$0K`
    pub labels: Vec<String>,
    pub top_label: i64,
}

/// Scale for the revenue chart: the highest month rounded up to the next
/// thousand, with one tick per thousand.
///
/// An empty (or all-zero) series yields a single `$0K` tick and a zero top
/// label; callers must not divide by it.
pub fn generate_y_axis(revenue: &[Revenue]) -> YAxis {
    let highest = revenue.iter().map(|r| i64::from(r.revenue)).max().unwrap_or(0);

    if highest <= 0 {
        return YAxis {
            labels: vec!["$0K".to_string()],
            top_label: 0,
        };
    }

    let top_label = (highest + Y_AXIS_STEP - 1) / Y_AXIS_STEP * Y_AXIS_STEP;
    let labels = (0..=top_label / Y_AXIS_STEP)
        .rev()
        .map(|k| format!("${}K", k))
        .collect();

    YAxis { labels, top_label }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page(i64),
    Ellipsis,
}

/// Layout of the pagination control for `current_page` out of `total_pages`
pub fn generate_pagination(current_page: i64, total_pages: i64) -> Vec<PageItem> {
    use PageItem::{Ellipsis, Page};

    if total_pages <= 7 {
        return (1..=total_pages).map(Page).collect();
    }

    if current_page <= 3 {
        return vec![
            Page(1),
            Page(2),
            Page(3),
            Ellipsis,
            Page(total_pages - 1),
            Page(total_pages),
        ];
    }

    if current_page >= total_pages - 2 {
        return vec![
            Page(1),
            Page(2),
            Ellipsis,
            Page(total_pages - 2),
            Page(total_pages - 1),
            Page(total_pages),
        ];
    }

    vec![
        Page(1),
        Ellipsis,
        Page(current_page - 1),
        Page(current_page),
        Page(current_page + 1),
        Ellipsis,
        Page(total_pages),
    ]
}
