#[derive(Clone, Debug, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based, after clamping.
    pub number: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

/// Slices `items` into 1-based pages. A page past the end falls back to the first page, as happens when a
/// narrower filter shrinks the result set.
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total_pages = items.len().div_ceil(page_size).max(1);
    let number = if page == 0 || page > total_pages { 1 } else { page };
    let start = (number - 1) * page_size;

    Page {
        items: items.iter().skip(start).take(page_size).cloned().collect(),
        number,
        total_pages,
        total_items: items.len(),
    }
}
