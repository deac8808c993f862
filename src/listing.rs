//! Client-side search and pagination for directory lists
//!
//! Lists are filtered by a case-insensitive substring match over each record's
//! searchable fields, then sliced into fixed-size pages.

use crate::data::{Airport, Category, Facility};

/// Number of items shown per page by default
pub const DEFAULT_PAGE_SIZE: usize = 6;

/// A record that can be matched against a search term
pub trait Searchable {
    /// Fields the search term is matched against
    fn search_fields(&self) -> Vec<&str>;
}

impl Searchable for Airport {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.code.as_str()]
    }
}

impl Searchable for Category {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str()]
    }
}

impl Searchable for Facility {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        if let Some(ref location) = self.location {
            fields.push(location);
        }
        fields
    }
}

/// Returns the items whose searchable fields contain `term`, ignoring case
///
/// An empty term matches everything. The term is used as typed, spaces included.
pub fn filter<'a, T: Searchable>(items: &'a [T], term: &str) -> Vec<&'a T> {
    let term = term.to_lowercase();
    if term.is_empty() {
        return items.iter().collect();
    }

    items
        .iter()
        .filter(|item| {
            item.search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&term))
        })
        .collect()
}

/// One page of a list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<'a, T> {
    /// Items on this page
    pub items: Vec<&'a T>,
    /// 1-based number of this page (1 for an empty list)
    pub number: usize,
    /// Number of pages; 0 for an empty list
    pub total_pages: usize,
    /// Number of items across all pages
    pub total_items: usize,
}

impl<'a, T> Page<'a, T> {
    /// Slices out page `number` (1-based) of `items`
    ///
    /// Page numbers past the end are clamped to the last page and 0 is treated as 1.
    pub fn of(items: &[&'a T], number: usize, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        let total_items = items.len();
        let total_pages = total_pages(total_items, page_size);
        let number = number.clamp(1, total_pages.max(1));

        let start = (number - 1) * page_size;
        let end = (start + page_size).min(total_items);
        let items = items[start..end].to_vec();

        Self {
            items,
            number,
            total_pages,
            total_items,
        }
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }

    /// Whether there is more than one page, i.e. whether page controls are worth showing
    pub fn is_paginated(&self) -> bool {
        self.total_pages > 1
    }
}

/// `ceil(total_items / page_size)`
pub fn total_pages(total_items: usize, page_size: usize) -> usize {
    total_items.div_ceil(page_size.max(1))
}
