//! Application state management for the airport directory
//!
//! This module contains the main application state, handling keyboard input,
//! data loading through the directory client, and transitions between the
//! airport, category, facility and detail screens.

use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent};
use tracing::{info, warn};

use crate::data::{Airport, Category, DirectoryError, Facility, FacilityDetail};
use crate::directory::DirectoryClient;
use crate::listing::{filter, Page, Searchable};
use crate::toast::Toasts;

/// Maximum scroll offset for the facility detail view
const MAX_DETAIL_SCROLL: u16 = 40;

/// The screen currently shown
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// List of all airports
    Airports,
    /// Facility categories of an airport
    Categories(Airport),
    /// Facilities of one category at an airport
    Facilities(Airport, Category),
    /// Full record of a single facility, by id
    FacilityDetail(String),
}

/// Progress of the data behind the current screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// Data has been requested and the screen shows a loading indicator
    Loading,
    /// Data is available
    Loaded,
    /// The last load failed; the screen shows its empty state
    Failed,
}

/// Selection, page and search term of a list screen
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListView {
    /// Index of the selected row within the current page
    pub selected: usize,
    /// 1-based page number
    pub page: usize,
    /// Current search term
    pub search: String,
    /// Whether typed characters go to the search term
    pub searching: bool,
}

impl ListView {
    fn new() -> Self {
        Self {
            page: 1,
            ..Default::default()
        }
    }

    /// Filters `items` by the search term and slices out the current page
    pub fn page_of<'a, T: Searchable>(&self, items: &'a [T], page_size: usize) -> Page<'a, T> {
        Page::of(&filter(items, &self.search), self.page, page_size)
    }

    /// Search changes always start over from the first page
    fn reset_position(&mut self) {
        self.page = 1;
        self.selected = 0;
    }
}

/// Main application struct managing state and data
pub struct App {
    /// Current screen
    pub screen: Screen,
    /// Whether the data for `screen` is loading, loaded or failed
    pub load_state: LoadState,
    /// List state of the current screen
    pub view: ListView,
    /// Screens to return to with Esc, most recent last
    history: Vec<(Screen, ListView)>,
    pub airports: Option<Arc<Vec<Airport>>>,
    pub categories: Option<Arc<Vec<Category>>>,
    pub facilities: Option<Arc<Vec<Facility>>>,
    pub detail: Option<Arc<FacilityDetail>>,
    /// Active notifications
    pub toasts: Toasts,
    /// Items per list page
    pub page_size: usize,
    /// Flag to show help overlay
    pub show_help: bool,
    /// Scroll offset for the facility detail view
    pub detail_scroll_offset: u16,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    client: DirectoryClient,
}

impl App {
    /// Creates an App on the airport list, waiting for its first load
    pub fn new(client: DirectoryClient, page_size: usize) -> Self {
        Self {
            screen: Screen::Airports,
            load_state: LoadState::Loading,
            view: ListView::new(),
            history: Vec::new(),
            airports: None,
            categories: None,
            facilities: None,
            detail: None,
            toasts: Toasts::default(),
            page_size: page_size.max(1),
            show_help: false,
            detail_scroll_offset: 0,
            should_quit: false,
            client,
        }
    }

    /// Whether the current screen is waiting for `load_current`
    pub fn needs_load(&self) -> bool {
        self.load_state == LoadState::Loading
    }

    /// Label of the data source, for the status bar
    pub fn source_name(&self) -> &'static str {
        self.client.source_name()
    }

    /// How long ago the shown facility detail was fetched
    pub fn detail_age(&self) -> Option<Duration> {
        match &self.screen {
            Screen::FacilityDetail(id) => self.client.facility_detail_age(id),
            _ => None,
        }
    }

    /// Fetches the data for the current screen through the cache
    ///
    /// A failure clears the screen's data, shows an error toast and leaves the
    /// screen in `LoadState::Failed` so it renders its empty state.
    pub async fn load_current(&mut self) {
        let screen = self.screen.clone();
        let outcome = match &screen {
            Screen::Airports => self
                .client
                .airports()
                .await
                .map(|airports| self.airports = Some(airports))
                .map_err(|e| {
                    self.airports = None;
                    ("airports", e)
                }),
            Screen::Categories(airport) => self
                .client
                .categories(&airport.id)
                .await
                .map(|categories| self.categories = Some(categories))
                .map_err(|e| {
                    self.categories = None;
                    ("facility categories", e)
                }),
            Screen::Facilities(airport, category) => self
                .client
                .facilities(&airport.id, &category.id)
                .await
                .map(|facilities| self.facilities = Some(facilities))
                .map_err(|e| {
                    self.facilities = None;
                    ("facilities", e)
                }),
            Screen::FacilityDetail(id) => self
                .client
                .facility_detail(id)
                .await
                .map(|detail| self.detail = Some(detail))
                .map_err(|e| {
                    self.detail = None;
                    ("facility details", e)
                }),
        };

        match outcome {
            Ok(()) => {
                self.load_state = LoadState::Loaded;
                self.clamp_selection();
            }
            Err((what, error)) => self.report_failure(what, &error),
        }
    }

    fn report_failure(&mut self, what: &str, error: &DirectoryError) {
        warn!(screen = ?self.screen, error = %error, "failed to load {}", what);
        self.load_state = LoadState::Failed;
        self.toasts
            .error(format!("Failed to load {}. Please try again.", what));
    }

    /// Drops expired toasts; called once per frame
    pub fn tick(&mut self) {
        self.toasts.prune(Local::now());
    }

    /// Number of rows on the current page of a list screen
    pub fn page_len(&self) -> usize {
        match &self.screen {
            Screen::Airports => self.page_len_of(self.airports.as_deref()),
            Screen::Categories(_) => self.page_len_of(self.categories.as_deref()),
            Screen::Facilities(..) => self.page_len_of(self.facilities.as_deref()),
            Screen::FacilityDetail(_) => 0,
        }
    }

    fn page_len_of<T: Searchable>(&self, items: Option<&Vec<T>>) -> usize {
        items
            .map(|items| self.view.page_of(items, self.page_size).items.len())
            .unwrap_or(0)
    }

    /// Number of pages of the current list screen after filtering
    pub fn total_pages(&self) -> usize {
        fn pages<T: Searchable>(app: &App, items: Option<&Vec<T>>) -> usize {
            items
                .map(|items| app.view.page_of(items, app.page_size).total_pages)
                .unwrap_or(0)
        }
        match &self.screen {
            Screen::Airports => pages(self, self.airports.as_deref()),
            Screen::Categories(_) => pages(self, self.categories.as_deref()),
            Screen::Facilities(..) => pages(self, self.facilities.as_deref()),
            Screen::FacilityDetail(_) => 0,
        }
    }

    fn clamp_selection(&mut self) {
        let total_pages = self.total_pages();
        self.view.page = self.view.page.clamp(1, total_pages.max(1));
        let len = self.page_len();
        if self.view.selected >= len {
            self.view.selected = len.saturating_sub(1);
        }
    }

    /// Handles keyboard input and updates state accordingly
    ///
    /// # Key Bindings
    /// - `q`: Quit the application (outside search mode)
    /// - `Up`/`k`, `Down`/`j`: Move selection (lists) or scroll (detail)
    /// - `Enter`: Open the selected entry
    /// - `Esc`: Go back; quits from the airport list
    /// - `Right`/`n`, `Left`/`p`: Next / previous page
    /// - `/`: Start typing a search term; `Enter` keeps it, `Esc` clears it
    /// - `r`: Reload the current screen
    /// - `x`: Dismiss the latest notification
    /// - `?`: Toggle help
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        // Handle help overlay - intercepts all keys when shown
        if self.show_help {
            if matches!(
                key_event.code,
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')
            ) {
                self.show_help = false;
            }
            return;
        }

        if self.view.searching {
            self.handle_search_key(key_event);
            return;
        }

        match key_event.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Char('x') => {
                self.toasts.dismiss_latest();
            }
            KeyCode::Char('r') => self.load_state = LoadState::Loading,
            KeyCode::Esc => self.go_back(),
            _ if self.needs_load() => {} // Navigation waits for the data
            code => match self.screen {
                Screen::FacilityDetail(_) => self.handle_detail_key(code),
                _ => self.handle_list_key(code),
            },
        }
    }

    fn handle_search_key(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Enter => self.view.searching = false,
            KeyCode::Esc => {
                self.view.searching = false;
                self.view.search.clear();
                self.view.reset_position();
            }
            KeyCode::Backspace => {
                self.view.search.pop();
                self.view.reset_position();
            }
            KeyCode::Char(c) => {
                self.view.search.push(c);
                self.view.reset_position();
            }
            _ => {}
        }
    }

    fn handle_list_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Up | KeyCode::Char('k') => self.move_selection_up(),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection_down(),
            KeyCode::Right | KeyCode::Char('n') => self.next_page(),
            KeyCode::Left | KeyCode::Char('p') => self.previous_page(),
            KeyCode::Char('/') => self.view.searching = true,
            KeyCode::Enter => self.open_selected(),
            _ => {}
        }
    }

    fn handle_detail_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Down | KeyCode::Char('j') => {
                self.detail_scroll_offset = (self.detail_scroll_offset + 1).min(MAX_DETAIL_SCROLL);
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.detail_scroll_offset = self.detail_scroll_offset.saturating_sub(1);
            }
            KeyCode::Char('g') => self.detail_scroll_offset = 0,
            _ => {}
        }
    }

    /// Moves selection up, wrapping to the bottom of the page
    fn move_selection_up(&mut self) {
        let len = self.page_len();
        if len == 0 {
            return;
        }
        self.view.selected = if self.view.selected == 0 {
            len - 1
        } else {
            self.view.selected - 1
        };
    }

    /// Moves selection down, wrapping to the top of the page
    fn move_selection_down(&mut self) {
        let len = self.page_len();
        if len == 0 {
            return;
        }
        self.view.selected = (self.view.selected + 1) % len;
    }

    fn next_page(&mut self) {
        if self.view.page < self.total_pages() {
            self.view.page += 1;
            self.view.selected = 0;
        }
    }

    fn previous_page(&mut self) {
        if self.view.page > 1 {
            self.view.page -= 1;
            self.view.selected = 0;
        }
    }

    /// Returns the selected row of the current page, if the list has one
    fn selected_on_page<'a, T: Searchable>(&self, items: Option<&'a Vec<T>>) -> Option<&'a T> {
        let items = items?;
        let page = self.view.page_of(items, self.page_size);
        page.items.get(self.view.selected).copied()
    }

    pub fn selected_airport(&self) -> Option<&Airport> {
        self.selected_on_page(self.airports.as_deref())
    }

    pub fn selected_category(&self) -> Option<&Category> {
        self.selected_on_page(self.categories.as_deref())
    }

    pub fn selected_facility(&self) -> Option<&Facility> {
        self.selected_on_page(self.facilities.as_deref())
    }

    fn open_selected(&mut self) {
        let next = match &self.screen {
            Screen::Airports => self.selected_airport().cloned().map(Screen::Categories),
            Screen::Categories(airport) => self
                .selected_category()
                .cloned()
                .map(|category| Screen::Facilities(airport.clone(), category)),
            Screen::Facilities(..) => self
                .selected_facility()
                .map(|facility| Screen::FacilityDetail(facility.id.clone())),
            Screen::FacilityDetail(_) => None,
        };

        if let Some(next) = next {
            self.navigate_to(next);
        }
    }

    /// Pushes the current screen onto the history and requests data for `screen`
    pub fn navigate_to(&mut self, screen: Screen) {
        info!(screen = ?screen, "navigating");
        let previous = std::mem::replace(&mut self.screen, screen);
        let view = std::mem::replace(&mut self.view, ListView::new());
        self.history.push((previous, view));
        self.detail_scroll_offset = 0;
        self.load_state = LoadState::Loading;
    }

    /// Returns to the previous screen, or quits from the airport list
    fn go_back(&mut self) {
        match self.history.pop() {
            Some((screen, view)) => {
                self.screen = screen;
                self.view = view;
                self.detail_scroll_offset = 0;
                // Usually a cache hit; still goes through the cache so stale data refreshes.
                self.load_state = LoadState::Loading;
            }
            None => self.should_quit = true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{DataSource, FixtureSource};
    use crossterm::event::KeyModifiers;

    fn key_event(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn fixture_app() -> App {
        let source: Arc<dyn DataSource> = Arc::new(FixtureSource::bundled().unwrap());
        App::new(DirectoryClient::with_default_window(source), 6)
    }

    /// Loads the airport list the way the main loop does
    async fn loaded_app() -> App {
        let mut app = fixture_app();
        app.load_current().await;
        assert_eq!(app.load_state, LoadState::Loaded);
        app
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(key_event(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_app_starts_loading_airports() {
        let app = fixture_app();
        assert_eq!(app.screen, Screen::Airports);
        assert!(app.needs_load());
        assert_eq!(app.view.page, 1);
        assert!(app.toasts.is_empty());
    }

    #[tokio::test]
    async fn test_load_airports_fills_first_page() {
        let app = loaded_app().await;

        assert_eq!(app.airports.as_ref().unwrap().len(), 7);
        assert_eq!(app.page_len(), 6);
        assert_eq!(app.total_pages(), 2);
        assert_eq!(app.selected_airport().unwrap().code, "JFK");
    }

    #[tokio::test]
    async fn test_navigation_wraps_within_page() {
        let mut app = loaded_app().await;

        app.handle_key(key_event(KeyCode::Up));
        assert_eq!(app.view.selected, 5, "Should wrap to bottom of page");

        app.handle_key(key_event(KeyCode::Char('j')));
        assert_eq!(app.view.selected, 0, "Should wrap to top");
    }

    #[tokio::test]
    async fn test_next_and_previous_page() {
        let mut app = loaded_app().await;

        app.handle_key(key_event(KeyCode::Char('n')));
        assert_eq!(app.view.page, 2);
        assert_eq!(app.page_len(), 1);
        assert_eq!(app.selected_airport().unwrap().code, "SYD");

        // Already on the last page
        app.handle_key(key_event(KeyCode::Right));
        assert_eq!(app.view.page, 2);

        app.handle_key(key_event(KeyCode::Left));
        assert_eq!(app.view.page, 1);
        app.handle_key(key_event(KeyCode::Char('p')));
        assert_eq!(app.view.page, 1);
    }

    #[tokio::test]
    async fn test_search_filters_and_resets_page() {
        let mut app = loaded_app().await;
        app.handle_key(key_event(KeyCode::Char('n')));
        assert_eq!(app.view.page, 2);

        app.handle_key(key_event(KeyCode::Char('/')));
        assert!(app.view.searching);
        type_text(&mut app, "london");

        assert_eq!(app.view.search, "london");
        assert_eq!(app.view.page, 1);
        assert_eq!(app.page_len(), 1);
        assert_eq!(app.selected_airport().unwrap().code, "LHR");

        // 'q' while searching is text, not quit
        app.handle_key(key_event(KeyCode::Char('q')));
        assert!(!app.should_quit);
        assert_eq!(app.page_len(), 0);

        app.handle_key(key_event(KeyCode::Backspace));
        app.handle_key(key_event(KeyCode::Enter));
        assert!(!app.view.searching);
        assert_eq!(app.view.search, "london");
    }

    #[tokio::test]
    async fn test_esc_in_search_clears_term() {
        let mut app = loaded_app().await;
        app.handle_key(key_event(KeyCode::Char('/')));
        type_text(&mut app, "zzz");
        assert_eq!(app.page_len(), 0);

        app.handle_key(key_event(KeyCode::Esc));

        assert!(!app.view.searching);
        assert!(app.view.search.is_empty());
        assert_eq!(app.page_len(), 6);
        assert!(!app.should_quit);
    }

    #[tokio::test]
    async fn test_drill_down_to_facility_detail() {
        let mut app = loaded_app().await;

        app.handle_key(key_event(KeyCode::Enter));
        assert!(matches!(app.screen, Screen::Categories(ref a) if a.code == "JFK"));
        assert!(app.needs_load());
        app.load_current().await;
        assert_eq!(app.categories.as_ref().unwrap().len(), 4);

        app.handle_key(key_event(KeyCode::Enter));
        assert!(matches!(app.screen, Screen::Facilities(_, ref c) if c.id == "restaurants"));
        app.load_current().await;
        assert_eq!(app.total_pages(), 2);

        app.handle_key(key_event(KeyCode::Enter));
        assert_eq!(app.screen, Screen::FacilityDetail("jfk-r1".to_string()));
        app.load_current().await;
        assert_eq!(app.detail.as_ref().unwrap().facility.name, "Shake Shack");
        assert!(app.detail_age().is_some());
    }

    #[tokio::test]
    async fn test_esc_restores_previous_list_state() {
        let mut app = loaded_app().await;
        app.handle_key(key_event(KeyCode::Down));
        app.handle_key(key_event(KeyCode::Down));
        assert_eq!(app.selected_airport().unwrap().code, "SIN");

        app.handle_key(key_event(KeyCode::Enter));
        app.load_current().await;
        app.handle_key(key_event(KeyCode::Esc));

        assert_eq!(app.screen, Screen::Airports);
        assert_eq!(app.view.selected, 2);
        app.load_current().await;
        assert_eq!(app.selected_airport().unwrap().code, "SIN");
    }

    #[tokio::test]
    async fn test_esc_on_airport_list_quits() {
        let mut app = loaded_app().await;
        app.handle_key(key_event(KeyCode::Esc));
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_q_quits_from_any_screen() {
        let mut app = loaded_app().await;
        app.navigate_to(Screen::FacilityDetail("jfk-l1".to_string()));
        app.handle_key(key_event(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_airport_without_categories_is_empty_not_failed() {
        let mut app = loaded_app().await;
        app.handle_key(key_event(KeyCode::Char('n')));
        app.handle_key(key_event(KeyCode::Enter));
        app.load_current().await;

        assert_eq!(app.load_state, LoadState::Loaded);
        assert_eq!(app.page_len(), 0);
        assert!(app.toasts.is_empty());

        // Enter on an empty list stays put
        app.handle_key(key_event(KeyCode::Enter));
        assert!(matches!(app.screen, Screen::Categories(_)));
    }

    #[tokio::test]
    async fn test_missing_facility_shows_error_toast() {
        let mut app = loaded_app().await;
        app.navigate_to(Screen::FacilityDetail("nope".to_string()));
        app.load_current().await;

        assert_eq!(app.load_state, LoadState::Failed);
        assert!(app.detail.is_none());
        assert_eq!(
            app.toasts.active()[0].message,
            "Failed to load facility details. Please try again."
        );

        app.handle_key(key_event(KeyCode::Char('x')));
        assert!(app.toasts.is_empty());
    }

    #[tokio::test]
    async fn test_reload_key_requests_load() {
        let mut app = loaded_app().await;
        app.handle_key(key_event(KeyCode::Char('r')));
        assert!(app.needs_load());

        // Selection keys are ignored until the data arrives
        app.handle_key(key_event(KeyCode::Down));
        assert_eq!(app.view.selected, 0);
    }

    #[tokio::test]
    async fn test_detail_scroll() {
        let mut app = loaded_app().await;
        app.navigate_to(Screen::FacilityDetail("jfk-l1".to_string()));
        app.load_current().await;

        app.handle_key(key_event(KeyCode::Char('j')));
        app.handle_key(key_event(KeyCode::Down));
        assert_eq!(app.detail_scroll_offset, 2);

        app.handle_key(key_event(KeyCode::Up));
        assert_eq!(app.detail_scroll_offset, 1);

        app.handle_key(key_event(KeyCode::Char('g')));
        assert_eq!(app.detail_scroll_offset, 0);

        app.handle_key(key_event(KeyCode::Up));
        assert_eq!(app.detail_scroll_offset, 0, "Should stop at zero");
    }

    #[test]
    fn test_help_overlay_intercepts_keys() {
        let mut app = fixture_app();
        app.handle_key(key_event(KeyCode::Char('?')));
        assert!(app.show_help);

        app.handle_key(key_event(KeyCode::Char('q')));
        assert!(!app.show_help);
        assert!(!app.should_quit, "q closes help before it quits");
    }
}
