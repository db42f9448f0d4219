//! Department filter.

use crate::catalog::Catalog;
use crate::models::Course;

/// Value the selector uses for "no filter".
pub const ALL: &str = "all";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Department(String),
}

impl Filter {
    /// `"all"` maps to [`Filter::All`]; any other value is taken as a
    /// department, known or not.
    pub fn parse(value: &str) -> Self {
        if value == ALL {
            Self::All
        } else {
            Self::Department(value.to_string())
        }
    }

    pub fn matches(&self, course: &Course) -> bool {
        match self {
            Self::All => true,
            Self::Department(dept) => course.department == *dept,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FilterState {
    selection: Filter,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> &Filter {
        &self.selection
    }

    /// Replaces the selection. Departments are not checked against the catalog.
    pub fn set_filter(&mut self, filter: Filter) {
        self.selection = filter;
    }

    /// Courses matching the selection, in catalog order.
    pub fn visible_courses<'a>(&self, catalog: &'a Catalog) -> Vec<&'a Course> {
        catalog
            .courses()
            .iter()
            .filter(|c| self.selection.matches(c))
            .collect()
    }
}
