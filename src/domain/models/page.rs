use serde::Serialize;

/// 1-indexed page window over a sorted result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl PageRequest {
    /// Normalises raw query values: `page < 1` becomes 1, a non-positive
    /// `per_page` falls back to `default_per_page`, and `per_page` never exceeds `max_per_page`.
    pub fn new(page: Option<i64>, per_page: Option<i64>, default_per_page: u32, max_per_page: u32) -> Self {
        let page = page.filter(|p| *p >= 1).map_or(1, |p| p.min(u32::MAX as i64) as u32);
        let per_page = per_page
            .filter(|p| *p >= 1)
            .map_or(default_per_page, |p| p.min(max_per_page as i64) as u32)
            .clamp(1, max_per_page.max(1));
        Self { page, per_page }
    }

    pub fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.per_page as i64
    }

    pub fn limit(&self) -> i64 {
        self.per_page as i64
    }

    pub fn page_count(&self, total: i64) -> i64 {
        if total <= 0 {
            0
        } else {
            (total + self.per_page as i64 - 1) / self.per_page as i64
        }
    }
}

#[derive(Debug, Serialize)]
pub struct JobPage<T> {
    pub jobs: Vec<T>,
    pub total: i64,
    pub pages: i64,
    pub current_page: u32,
    pub per_page: u32,
}

impl<T> JobPage<T> {
    pub fn new(jobs: Vec<T>, total: i64, request: PageRequest) -> Self {
        Self {
            jobs,
            total,
            pages: request.page_count(total),
            current_page: request.page,
            per_page: request.per_page,
        }
    }
}
