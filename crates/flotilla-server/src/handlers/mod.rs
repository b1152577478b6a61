//! Request handlers, one module per entity.

pub mod drivers;
pub mod fuel;
pub mod imports;
pub mod inspections;
pub mod materials;
pub mod payables;
pub mod projects;
pub mod system;
pub mod trips;
pub mod vehicles;

use serde::Deserialize;

use flotilla_storage::PageRequest;

/// Query string shared by the simple list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub active_only: bool,
}

/// Pagination part of a query string.
#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

pub(crate) fn default_true() -> bool {
    true
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    PageRequest::DEFAULT_PER_PAGE
}

impl Pagination {
    pub fn request(&self) -> PageRequest {
        PageRequest::new(self.page, self.per_page)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}
