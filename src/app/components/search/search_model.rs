use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::app::models::*;
use crate::app::observable::Observable;
use crate::app::repository::{MapRepository, Repository, RepositoryResult};
use crate::settings::SearchSettings;

/// State of the map search screen.
///
/// Holds four observable slots (search results, saved keywords, the keyword picked by the
/// user, and the last marker position) and forwards user actions to a [`Repository`].
pub struct SearchViewModel {
    repository: Arc<dyn Repository + Send + Sync>,
    search_results: Observable<Vec<Keyword>>,
    saved_keywords: Observable<Vec<Keyword>>,
    selected_keyword: Observable<Option<Keyword>>,
    last_marker: Observable<Option<Keyword>>,
}

impl SearchViewModel {
    pub fn new(repository: Arc<dyn Repository + Send + Sync>) -> Self {
        let saved_keywords = Observable::new(repository.get_all_saved_keywords());
        let model = Self {
            repository,
            search_results: Default::default(),
            saved_keywords,
            selected_keyword: Default::default(),
            last_marker: Default::default(),
        };
        model.load_last_marker_position();
        model
    }

    pub fn search_results(&self) -> &Observable<Vec<Keyword>> {
        &self.search_results
    }

    pub fn saved_keywords(&self) -> &Observable<Vec<Keyword>> {
        &self.saved_keywords
    }

    pub fn selected_keyword(&self) -> &Observable<Option<Keyword>> {
        &self.selected_keyword
    }

    pub fn last_marker(&self) -> &Observable<Option<Keyword>> {
        &self.last_marker
    }

    /// Runs the search in the background, results replace the current ones once available.
    ///
    /// Must be called from within a tokio runtime. Earlier searches still in flight are not
    /// cancelled: whichever completes last wins. A failed search leaves the results as they
    /// were, the error is handed back through the returned handle.
    pub fn search(&self, query: &str) -> JoinHandle<RepositoryResult<()>> {
        let repository = Arc::clone(&self.repository);
        let search_results = self.search_results.clone();
        let query = query.to_owned();
        tokio::spawn(async move {
            let results = repository.search(&query).await?;
            search_results.set(results);
            Ok(())
        })
    }

    pub fn save_keyword(&self, keyword: &Keyword) {
        let inserted = self.saved_keywords.update(|keywords| {
            if keywords.contains(keyword) {
                false
            } else {
                keywords.insert(0, keyword.clone());
                true
            }
        });
        if inserted {
            self.repository.save_keyword(keyword);
        }
    }

    pub fn delete_keyword(&self, keyword: &Keyword) {
        let mut keywords = self.saved_keywords.get();
        if let Some(index) = keywords.iter().position(|k| k == keyword) {
            keywords.remove(index);
        }
        self.saved_keywords.set(keywords);
        self.repository.delete_keyword(keyword);
    }

    pub fn process_selection_result(&self, result: SelectionResult) {
        if let Some(keyword) = result.into_keyword() {
            self.selected_keyword.set(Some(keyword.clone()));
            self.save_last_marker_position(&keyword);
        }
    }

    pub fn save_last_marker_position(&self, keyword: &Keyword) {
        self.repository
            .save_last_marker_position(keyword.x, keyword.y, &keyword.name, &keyword.address);
    }

    // Never clears a marker that was already loaded
    pub fn load_last_marker_position(&self) {
        if let Some(keyword) = self.repository.load_last_marker_position() {
            self.last_marker.set(Some(keyword));
        }
    }
}

pub struct SearchViewModelFactory {
    settings: SearchSettings,
}

impl SearchViewModelFactory {
    pub fn new(settings: SearchSettings) -> Self {
        Self { settings }
    }

    pub fn create(&self) -> RepositoryResult<SearchViewModel> {
        let SearchSettings {
            api_key,
            data_dir,
            page_size,
        } = self.settings.clone();
        let repository = MapRepository::open(data_dir, api_key, page_size)?;
        Ok(SearchViewModel::new(Arc::new(repository)))
    }
}
