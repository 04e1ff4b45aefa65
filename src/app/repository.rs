use futures::future::BoxFuture;
use std::path::Path;
use thiserror::Error;

use crate::api::{LocalSearchClient, SearchApiError};
use crate::app::models::{Keyword, MarkerPosition};
use crate::prefs::{PrefsError, PrefsStore};

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error(transparent)]
    SearchError(#[from] SearchApiError),
    #[error(transparent)]
    PrefsError(#[from] PrefsError),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

// Everything the search screen needs from the data layer.
// Persistence calls are fire-and-forget: implementations report their own failures.
pub trait Repository {
    fn get_all_saved_keywords(&self) -> Vec<Keyword>;

    fn search(&self, query: &str) -> BoxFuture<'_, RepositoryResult<Vec<Keyword>>>;

    fn save_keyword(&self, keyword: &Keyword);

    fn delete_keyword(&self, keyword: &Keyword);

    fn save_last_marker_position(&self, x: f64, y: f64, name: &str, address: &str);

    fn load_last_marker_position(&self) -> Option<Keyword>;
}

pub struct MapRepository {
    client: LocalSearchClient,
    prefs: PrefsStore,
}

impl MapRepository {
    pub fn new(client: LocalSearchClient, prefs: PrefsStore) -> Self {
        Self { client, prefs }
    }

    pub fn open<P: AsRef<Path>>(
        data_dir: P,
        api_key: Option<String>,
        page_size: usize,
    ) -> RepositoryResult<Self> {
        let client = LocalSearchClient::new(api_key, page_size)?;
        let prefs = PrefsStore::new(data_dir)?;
        Ok(Self::new(client, prefs))
    }
}

impl Repository for MapRepository {
    fn get_all_saved_keywords(&self) -> Vec<Keyword> {
        self.prefs.saved_keywords().unwrap_or_else(|e| {
            warn!("Could not read saved keywords: {}", e);
            vec![]
        })
    }

    fn search(&self, query: &str) -> BoxFuture<'_, RepositoryResult<Vec<Keyword>>> {
        let query = query.to_owned();
        Box::pin(async move {
            let keywords = self.client.search_keyword(&query).await?;
            debug!("{} results for {:?}", keywords.len(), &query);
            Ok(keywords)
        })
    }

    fn save_keyword(&self, keyword: &Keyword) {
        if let Err(e) = self.prefs.save_keyword(keyword) {
            warn!("Could not save keyword {:?}: {}", &keyword.name, e);
        }
    }

    fn delete_keyword(&self, keyword: &Keyword) {
        if let Err(e) = self.prefs.delete_keyword(keyword) {
            warn!("Could not delete keyword {:?}: {}", &keyword.name, e);
        }
    }

    fn save_last_marker_position(&self, x: f64, y: f64, name: &str, address: &str) {
        let marker = MarkerPosition {
            x,
            y,
            name: name.to_string(),
            address: address.to_string(),
        };
        if let Err(e) = self.prefs.save_last_marker(&marker) {
            warn!("Could not save last marker: {}", e);
        }
    }

    fn load_last_marker_position(&self) -> Option<Keyword> {
        self.prefs.last_marker().unwrap_or_else(|e| {
            warn!("Could not read last marker: {}", e);
            None
        })
    }
}

#[cfg(test)]
pub mod tests {

    use super::*;
    use futures::FutureExt;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use tokio::sync::oneshot;

    #[derive(Clone, Debug, PartialEq)]
    pub enum RepositoryCall {
        Search(String),
        SaveKeyword(Keyword),
        DeleteKeyword(Keyword),
        SaveLastMarker(f64, f64, String, String),
        LoadLastMarker,
    }

    // Records every call, serves canned data
    pub struct TestRepository {
        saved: Vec<Keyword>,
        marker: Option<Keyword>,
        results: Mutex<VecDeque<BoxFuture<'static, RepositoryResult<Vec<Keyword>>>>>,
        calls: Mutex<Vec<RepositoryCall>>,
    }

    impl TestRepository {
        pub fn new(saved: Vec<Keyword>, marker: Option<Keyword>) -> Self {
            Self {
                saved,
                marker,
                results: Mutex::new(VecDeque::new()),
                calls: Mutex::new(vec![]),
            }
        }

        pub fn push_results(&self, results: RepositoryResult<Vec<Keyword>>) {
            self.results
                .lock()
                .unwrap()
                .push_back(async move { results }.boxed());
        }

        // The next search only completes once something is sent through the returned channel
        pub fn push_pending(&self) -> oneshot::Sender<Vec<Keyword>> {
            let (sender, receiver) = oneshot::channel();
            self.results.lock().unwrap().push_back(
                async move { RepositoryResult::Ok(receiver.await.unwrap_or_default()) }.boxed(),
            );
            sender
        }

        pub fn calls(&self) -> Vec<RepositoryCall> {
            self.calls.lock().unwrap().clone()
        }

        pub fn clear_calls(&self) {
            self.calls.lock().unwrap().clear();
        }

        fn record(&self, call: RepositoryCall) {
            self.calls.lock().unwrap().push(call);
        }
    }

    impl Repository for TestRepository {
        fn get_all_saved_keywords(&self) -> Vec<Keyword> {
            self.saved.clone()
        }

        fn search(&self, query: &str) -> BoxFuture<'_, RepositoryResult<Vec<Keyword>>> {
            self.record(RepositoryCall::Search(query.to_string()));
            self.results
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| async { RepositoryResult::Ok(vec![]) }.boxed())
        }

        fn save_keyword(&self, keyword: &Keyword) {
            self.record(RepositoryCall::SaveKeyword(keyword.clone()));
        }

        fn delete_keyword(&self, keyword: &Keyword) {
            self.record(RepositoryCall::DeleteKeyword(keyword.clone()));
        }

        fn save_last_marker_position(&self, x: f64, y: f64, name: &str, address: &str) {
            self.record(RepositoryCall::SaveLastMarker(
                x,
                y,
                name.to_string(),
                address.to_string(),
            ));
        }

        fn load_last_marker_position(&self) -> Option<Keyword> {
            self.record(RepositoryCall::LoadLastMarker);
            self.marker.clone()
        }
    }

    #[test]
    fn map_repository_persists_to_prefs() {
        let dir = tempfile::tempdir().unwrap();
        let repository = MapRepository::open(dir.path(), None, 15).unwrap();
        let cafe = Keyword::new(3, "Cafe", "123 Main", 1.0, 2.0);

        repository.save_keyword(&cafe);
        repository.save_keyword(&cafe);
        assert_eq!(repository.get_all_saved_keywords(), vec![cafe.clone()]);

        repository.delete_keyword(&cafe);
        assert!(repository.get_all_saved_keywords().is_empty());

        assert_eq!(repository.load_last_marker_position(), None);
        repository.save_last_marker_position(1.0, 2.0, "Cafe", "123 Main");
        assert_eq!(
            repository.load_last_marker_position(),
            Some(Keyword::new(0, "Cafe", "123 Main", 1.0, 2.0))
        );
    }

    #[test]
    fn map_repository_search_without_key() {
        let dir = tempfile::tempdir().unwrap();
        let repository = MapRepository::open(dir.path(), None, 15).unwrap();

        let result = futures::executor::block_on(repository.search("cafe"));
        assert!(matches!(
            result,
            Err(RepositoryError::SearchError(SearchApiError::NoKey))
        ));
    }

    #[test]
    fn map_repository_tolerates_corrupted_prefs() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("saved_keywords.json"), b"{").unwrap();
        std::fs::write(dir.path().join("last_marker.json"), b"[]").unwrap();
        let repository = MapRepository::open(dir.path(), None, 15).unwrap();

        assert!(repository.get_all_saved_keywords().is_empty());
        assert_eq!(repository.load_last_marker_position(), None);
    }
}
