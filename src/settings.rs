use std::env;
use std::path::PathBuf;
use std::str::FromStr;

const API_KEY: &str = "KAKAO_REST_API_KEY";
const DATA_DIR: &str = "MAP_SEARCH_DATA_DIR";
const PAGE_SIZE: &str = "MAP_SEARCH_PAGE_SIZE";

// The keyword search API serves at most 15 places per page
const MAX_PAGE_SIZE: usize = 15;

#[derive(Clone, Debug)]
pub struct SearchSettings {
    pub api_key: Option<String>,
    pub data_dir: PathBuf,
    pub page_size: usize,
}

impl SearchSettings {
    pub fn new_from_env() -> Self {
        Self::new_from_vars(|key| env::var(key).ok())
    }

    fn new_from_vars<F>(var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default_with_home(var("HOME"));
        let api_key = var(API_KEY).filter(|key| !key.trim().is_empty());
        let data_dir = var(DATA_DIR)
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);
        let page_size = var(PAGE_SIZE)
            .and_then(|size| usize::from_str(size.trim()).ok())
            .map(|size| size.clamp(1, MAX_PAGE_SIZE))
            .unwrap_or(defaults.page_size);
        Self {
            api_key,
            data_dir,
            page_size,
        }
    }

    fn default_with_home(home: Option<String>) -> Self {
        let data_dir = match home {
            Some(home) => PathBuf::from(home).join(".local/share/map-search"),
            None => PathBuf::from(".map-search"),
        };
        Self {
            api_key: None,
            data_dir,
            page_size: MAX_PAGE_SIZE,
        }
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self::default_with_home(env::var("HOME").ok())
    }
}
