/// Fixed-size paging over a counted result set.
///
/// Bad page input is corrected rather than surfaced: anything that does
/// not parse as an integer falls back to the first page, and any integer
/// outside the valid range (including zero and negatives) falls back to
/// the last page. An empty result set still has one, empty, page.
pub struct Pager {
    page_size: i64,
    total_items: i64,
}

impl Pager {
    pub fn new(page_size: i64, total_items: i64) -> Pager {
        Pager {
            page_size: page_size.max(1),
            total_items: total_items.max(0),
        }
    }

    pub fn total_pages(&self) -> i64 {
        let pages = (self.total_items + self.page_size - 1) / self.page_size;
        pages.max(1)
    }

    /// Resolve a raw `page` query parameter to a valid page number.
    pub fn resolve(&self, requested: Option<&str>) -> i64 {
        match requested {
            None => 1,
            Some(raw) => match raw.trim().parse::<i64>() {
                Err(_) => 1,
                Ok(n) if n < 1 => self.total_pages(),
                Ok(n) if n > self.total_pages() => self.total_pages(),
                Ok(n) => n,
            },
        }
    }

    pub fn offset(&self, page: i64) -> i64 {
        (page - 1) * self.page_size
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }

    pub fn page(&self, requested: Option<&str>) -> Page {
        Page {
            number: self.resolve(requested),
            total_pages: self.total_pages(),
        }
    }
}

/// Position of the rendered page, for pagination controls.
pub struct Page {
    pub number: i64,
    pub total_pages: i64,
}

impl Page {
    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }

    pub fn previous(&self) -> i64 {
        self.number - 1
    }

    pub fn next(&self) -> i64 {
        self.number + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_total_pages_up() {
        assert_eq!(Pager::new(3, 7).total_pages(), 3);
        assert_eq!(Pager::new(3, 6).total_pages(), 2);
        assert_eq!(Pager::new(3, 1).total_pages(), 1);
    }

    #[test]
    fn empty_set_has_one_empty_page() {
        let pager = Pager::new(3, 0);
        assert_eq!(pager.total_pages(), 1);
        assert_eq!(pager.resolve(None), 1);
        assert_eq!(pager.resolve(Some("5")), 1);
    }

    #[test]
    fn missing_page_is_page_one() {
        assert_eq!(Pager::new(3, 7).resolve(None), 1);
    }

    #[test]
    fn non_integer_page_is_page_one() {
        let pager = Pager::new(3, 7);
        assert_eq!(pager.resolve(Some("abc")), 1);
        assert_eq!(pager.resolve(Some("2.5")), 1);
        assert_eq!(pager.resolve(Some("")), 1);
    }

    #[test]
    fn out_of_range_page_is_last_page() {
        let pager = Pager::new(3, 7);
        assert_eq!(pager.resolve(Some("4")), 3);
        assert_eq!(pager.resolve(Some("9999")), 3);
    }

    #[test]
    fn below_range_page_is_last_page() {
        let pager = Pager::new(3, 7);
        assert_eq!(pager.resolve(Some("0")), 3);
        assert_eq!(pager.resolve(Some("-2")), 3);
    }

    #[test]
    fn valid_page_passes_through() {
        let pager = Pager::new(3, 7);
        assert_eq!(pager.resolve(Some("2")), 2);
        assert_eq!(pager.offset(2), 3);
        assert_eq!(pager.limit(), 3);
    }

    #[test]
    fn page_navigation_flags() {
        let pager = Pager::new(3, 7);
        let first = pager.page(None);
        assert!(!first.has_previous());
        assert!(first.has_next());
        assert_eq!(first.next(), 2);

        let last = pager.page(Some("3"));
        assert!(last.has_previous());
        assert!(!last.has_next());
        assert_eq!(last.previous(), 2);
    }

    #[test]
    fn zero_page_size_is_clamped() {
        let pager = Pager::new(0, 5);
        assert_eq!(pager.limit(), 1);
        assert_eq!(pager.total_pages(), 5);
    }
}
