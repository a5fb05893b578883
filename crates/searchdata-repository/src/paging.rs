//! Paging, sorting and limiting arguments

use searchdata_parser::{Direction, Order};

/// Result ordering passed as a method argument
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Sort {
    orders: Vec<Order>,
}

impl Sort {
    pub fn unsorted() -> Self {
        Self::default()
    }

    pub fn by(property: impl Into<String>, direction: Direction) -> Self {
        Self::unsorted().and(property, direction)
    }

    pub fn and(mut self, property: impl Into<String>, direction: Direction) -> Self {
        self.orders.push(Order {
            property: property.into(),
            direction,
        });
        self
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn is_sorted(&self) -> bool {
        !self.orders.is_empty()
    }
}

impl From<Vec<Order>> for Sort {
    fn from(orders: Vec<Order>) -> Self {
        Self { orders }
    }
}

/// Zero-based page request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pageable {
    page: usize,
    size: usize,
    sort: Sort,
}

impl Pageable {
    pub fn of(page: usize, size: usize) -> Self {
        Self {
            page,
            size,
            sort: Sort::unsorted(),
        }
    }

    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.sort = sort;
        self
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Offset of the first document on this page
    pub fn offset(&self) -> usize {
        self.page.saturating_mul(self.size)
    }

    pub fn sort(&self) -> &Sort {
        &self.sort
    }
}

/// Upper bound on the number of results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Limit(Option<usize>);

impl Limit {
    pub fn of(max: usize) -> Self {
        Self(Some(max))
    }

    pub fn unlimited() -> Self {
        Self(None)
    }

    pub fn max(&self) -> Option<usize> {
        self.0
    }
}
