pub mod access;
pub mod auth;
pub mod engagement;
pub mod posts;
pub mod visibility;

/// A window of rows plus the size of the full filtered set.
#[derive(Debug, Clone)]
pub struct PageSlice<T> {
    pub total: i64,
    pub items: Vec<T>,
}
