//! Application controller.
//!
//! [`App`] owns all UI state. Input arrives as an [`Event`]; [`App::dispatch`]
//! applies it and reports the [`Effect`], and the caller re-renders the
//! [`Region`]s that effect touches.

use crate::catalog::{Catalog, CatalogSource, CatalogState};
use crate::filter::{Filter, FilterState};
use crate::models::Course;
use crate::persistence::SchedulePersistence;
use crate::render::{html, PanelState};
use crate::schedule::{ScheduleError, ScheduleStore, Toggled};
use crate::storage::KeyValueStore;

/// A discrete user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    SelectDepartment(Filter),
    ToggleCourse(String),
    AddCourse(String),
    RemoveCourse(String),
    /// Already confirmed by the user.
    ClearSchedule,
    OpenPanel,
    ClosePanel,
    TogglePanel,
}

/// What a dispatched event changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    FilterChanged,
    Toggled(Toggled),
    Added { changed: bool },
    NotInCatalog,
    Removed { changed: bool },
    Cleared,
    Panel(PanelState),
}

impl Effect {
    /// Regions whose inputs this effect may have changed.
    pub fn regions(&self) -> &'static [Region] {
        match self {
            Self::FilterChanged => &[Region::Catalog],
            Self::Panel(_) => &[Region::Schedule],
            Self::Toggled(_)
            | Self::Added { .. }
            | Self::NotInCatalog
            | Self::Removed { .. }
            | Self::Cleared => &[Region::Catalog, Region::Schedule],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Catalog,
    Schedule,
}

pub struct App<S> {
    catalog: CatalogState,
    filter: FilterState,
    schedule: ScheduleStore<S>,
    panel: PanelState,
}

impl<S: KeyValueStore> App<S> {
    /// Restores the saved schedule from `store`. The catalog starts out loading.
    pub fn new(store: S) -> Self {
        Self {
            catalog: CatalogState::Loading,
            filter: FilterState::new(),
            schedule: ScheduleStore::open(SchedulePersistence::new(store)),
            panel: PanelState::default(),
        }
    }

    pub fn with_catalog(store: S, catalog: Catalog) -> Self {
        let mut app = Self::new(store);
        app.set_catalog(CatalogState::Loaded(catalog));
        app
    }

    /// Fetches the catalog. Failure is recorded in the state, never returned.
    pub async fn load_catalog(&mut self, source: &CatalogSource) -> &CatalogState {
        let state = CatalogState::from_result(Catalog::load(source).await);
        self.set_catalog(state);
        &self.catalog
    }

    pub fn set_catalog(&mut self, state: CatalogState) {
        self.catalog = state;
    }

    pub fn catalog(&self) -> &CatalogState {
        &self.catalog
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn schedule(&self) -> &ScheduleStore<S> {
        &self.schedule
    }

    pub fn panel(&self) -> PanelState {
        self.panel
    }

    /// Visible courses under the current filter; empty until the catalog loads.
    pub fn visible_courses(&self) -> Vec<&Course> {
        self.catalog
            .catalog()
            .map(|c| self.filter.visible_courses(c))
            .unwrap_or_default()
    }

    fn lookup(&self, id: &str) -> Option<&Course> {
        self.catalog.catalog().and_then(|c| c.get(id))
    }

    pub fn dispatch(&mut self, event: Event) -> Result<Effect, ScheduleError> {
        tracing::debug!("Dispatching {:?}", event);

        let effect = match event {
            Event::SelectDepartment(filter) => {
                self.filter.set_filter(filter);
                Effect::FilterChanged
            }
            Event::ToggleCourse(id) => {
                let catalog = &self.catalog;
                let toggled = self
                    .schedule
                    .toggle(&id, |id| catalog.catalog().and_then(|c| c.get(id)))?;
                Effect::Toggled(toggled)
            }
            Event::AddCourse(id) => match self.lookup(&id).cloned() {
                Some(course) => Effect::Added {
                    changed: self.schedule.add(&course)?,
                },
                None => Effect::NotInCatalog,
            },
            Event::RemoveCourse(id) => Effect::Removed {
                changed: self.schedule.remove(&id)?,
            },
            Event::ClearSchedule => {
                self.schedule.clear()?;
                Effect::Cleared
            }
            Event::OpenPanel => {
                self.panel.open();
                Effect::Panel(self.panel)
            }
            Event::ClosePanel => {
                self.panel.close();
                Effect::Panel(self.panel)
            }
            Event::TogglePanel => {
                self.panel.toggle();
                Effect::Panel(self.panel)
            }
        };

        Ok(effect)
    }

    pub fn render_region(&self, region: Region) -> String {
        match region {
            Region::Catalog => html::catalog_region(&self.catalog, &self.filter, &self.schedule),
            Region::Schedule => html::schedule_region(&self.schedule, self.panel),
        }
    }

    /// Concatenated fragments, one per region.
    pub fn render_regions(&self, regions: &[Region]) -> String {
        regions
            .iter()
            .map(|r| self.render_region(*r))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn render_page(&self) -> String {
        html::page(&self.catalog, &self.filter, &self.schedule, self.panel)
    }

    /// Applies `event` and returns the re-rendered regions it affected.
    pub fn dispatch_and_render(&mut self, event: Event) -> Result<String, ScheduleError> {
        let effect = self.dispatch(event)?;
        Ok(self.render_regions(effect.regions()))
    }
}
