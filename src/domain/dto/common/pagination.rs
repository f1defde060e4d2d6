use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: u64 = 12;
pub const MAX_PAGE_SIZE: u64 = 100;

/// `?page=&limit=` query parameters; both optional and 1-based.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

/// Normalised page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: u64,
    pub limit: u64,
}

impl PageWindow {
    pub fn skip(&self) -> u64 {
        (self.page - 1) * self.limit
    }
}

impl PageQuery {
    pub fn window(&self) -> PageWindow {
        PageWindow {
            page: self.page.unwrap_or(1).max(1),
            limit: self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, total: u64, window: PageWindow) -> Self {
        Self {
            items,
            total,
            page: window.page,
            limit: window.limit,
            total_pages: total.div_ceil(window.limit),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_defaults_and_clamping() {
        assert_eq!(PageQuery::default().window(), PageWindow { page: 1, limit: DEFAULT_PAGE_SIZE });

        let query = PageQuery { page: Some(0), limit: Some(1000) };
        assert_eq!(query.window(), PageWindow { page: 1, limit: MAX_PAGE_SIZE });

        let query = PageQuery { page: Some(3), limit: Some(10) };
        assert_eq!(query.window().skip(), 20);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let window = PageWindow { page: 1, limit: 10 };
        assert_eq!(Paginated::new(vec![0; 10], 21, window).total_pages, 3);
        assert_eq!(Paginated::<u8>::new(vec![], 0, window).total_pages, 0);
    }
}
