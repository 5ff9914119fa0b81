use serde::{Deserialize, Deserializer, Serialize};

/// A list response, paginated or not
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Total number of matching records across all pages
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
}

// Bare arrays first: a paginated object never parses as a sequence
#[derive(Deserialize)]
#[serde(untagged)]
enum PageRepr<T> {
    Bare(Vec<T>),
    Paginated {
        results: Vec<T>,
        #[serde(default)]
        count: Option<u64>,
        #[serde(default)]
        next: Option<String>,
        #[serde(default)]
        previous: Option<String>,
    },
}

impl<T> From<PageRepr<T>> for Page<T> {
    fn from(repr: PageRepr<T>) -> Self {
        match repr {
            PageRepr::Bare(items) => Page {
                count: items.len() as u64,
                items,
                next: None,
                previous: None,
            },
            PageRepr::Paginated {
                results,
                count,
                next,
                previous,
            } => Page {
                count: count.unwrap_or(results.len() as u64),
                items: results,
                next,
                previous,
            },
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Page<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        PageRepr::<T>::deserialize(deserializer).map(Page::from)
    }
}

impl<T> Page<T> {
    /// Number of pages at the given page size, never less than one
    pub fn total_pages(&self, page_size: u32) -> u64 {
        let size = u64::from(page_size.max(1));
        self.count.div_ceil(size).max(1)
    }

    pub fn has_more(&self) -> bool {
        self.next.is_some()
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}
