use crate::catalog::{Book, Catalog};

/// Books whose id, title or author contains `keyword`, ignoring case, in
/// catalog order.
pub fn search_books(catalog: &Catalog, keyword: &str) -> Vec<Book> {
    catalog.search(keyword).into_iter().cloned().collect()
}

/// State of the search screen.
#[derive(Clone, Debug)]
pub struct SearchState {
    pub query: String,
    /// True while the query is being typed; false while browsing results.
    pub editing: bool,
    pub results: Vec<Book>,
    pub page: usize,
    /// The query that produced `results`, if any.
    pub last_query: Option<String>,
}

impl Default for SearchState {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchState {
    pub fn new() -> Self {
        Self {
            query: String::new(),
            editing: true,
            results: Vec::new(),
            page: 0,
            last_query: None,
        }
    }
}

/// Run the typed query against the catalog. An empty query clears results.
pub fn apply_search(search: &mut SearchState, catalog: &Catalog) {
    let q = search.query.trim();
    if q.is_empty() {
        search.results.clear();
        search.last_query = None;
    } else {
        search.results = search_books(catalog, q);
        search.last_query = Some(q.to_string());
    }
    search.page = 0;
    search.editing = false;
}
