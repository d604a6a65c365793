/// Contiguous run of catalog rows shown on one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub offset: usize,
    pub len: usize,
}

impl Window {
    /// Rows `[(page-1)*page_size, min(total, page*page_size))`. Pages are 1-based; page 0 and
    /// pages past the end give an empty window.
    pub fn for_page(page: usize, page_size: usize, total: usize) -> Self {
        if page == 0 {
            return Self { offset: 0, len: 0 };
        }
        let start = (page - 1).saturating_mul(page_size);
        let end = start.saturating_add(page_size).min(total);
        Self {
            offset: start,
            len: end.saturating_sub(start),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::Window;

    #[test]
    fn first_page_is_full() {
        assert_eq!(Window::for_page(1, 10, 25), Window { offset: 0, len: 10 });
    }

    #[test]
    fn last_page_holds_the_remainder() {
        for total in [1usize, 9, 10, 11, 19, 20, 21, 99] {
            let last = total.div_ceil(10);
            let window = Window::for_page(last, 10, total);
            let remainder = if total % 10 == 0 { 10 } else { total % 10 };
            assert_eq!(window.len, remainder, "total {total}");
            assert!(Window::for_page(last + 1, 10, total).is_empty(), "total {total}");
        }
    }

    #[test]
    fn page_zero_is_empty() {
        assert!(Window::for_page(0, 10, 50).is_empty());
    }

    #[test]
    fn huge_page_does_not_overflow() {
        assert!(Window::for_page(usize::MAX, 10, 50).is_empty());
    }

    #[test]
    fn empty_catalog_has_no_pages() {
        assert!(Window::for_page(1, 10, 0).is_empty());
    }
}
