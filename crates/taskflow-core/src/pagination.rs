use crate::query::offset_for;
use serde::Serialize;

/// Navigation state for one page of a list view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub offset: u64,
    pub has_previous: bool,
    pub has_next: bool,
    /// 1-based index of the first row shown, or 0 when nothing is shown.
    pub first_item: u64,
    pub last_item: u64,
    pub total_pages: u64,
}

impl PageWindow {
    pub fn new(page: u64, limit: u64, total: u64) -> Self {
        let limit = limit.max(1);
        let offset = offset_for(page, limit);
        let end = offset.saturating_add(limit);
        let shows_rows = offset < total;

        Self {
            page,
            limit,
            total,
            offset,
            has_previous: page > 0,
            has_next: end < total,
            first_item: if shows_rows { offset + 1 } else { 0 },
            last_item: if shows_rows { end.min(total) } else { 0 },
            total_pages: total.div_ceil(limit),
        }
    }
}
