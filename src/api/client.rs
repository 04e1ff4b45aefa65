use isahc::http::{method::Method, StatusCode, Uri};
use isahc::{AsyncReadResponseExt, HttpClient, Request};
use serde_json::from_str;
use thiserror::Error;

pub use super::api_models::*;
use crate::app::models::Keyword;

const KAKAO_HOST: &str = "dapi.kakao.com";
const KEYWORD_SEARCH_PATH: &str = "/v2/local/search/keyword.json";

#[derive(Error, Debug)]
pub enum SearchApiError {
    #[error("No API key")]
    NoKey,
    #[error("Invalid API key")]
    InvalidKey,
    #[error("Request rate exceeded")]
    TooManyRequests,
    #[error("Request failed ({0}): {1}")]
    BadStatus(u16, String),
    #[error(transparent)]
    ClientError(#[from] isahc::Error),
    #[error(transparent)]
    RequestError(#[from] isahc::http::Error),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error(transparent)]
    ParseError(#[from] serde_json::Error),
}

pub struct LocalSearchClient {
    api_key: Option<String>,
    client: HttpClient,
    page_size: usize,
}

impl LocalSearchClient {
    pub fn new(api_key: Option<String>, page_size: usize) -> Result<Self, SearchApiError> {
        let client = HttpClient::new()?;
        Ok(Self {
            api_key,
            client,
            page_size,
        })
    }

    fn search_request(&self, query: SearchQuery) -> Result<Request<()>, SearchApiError> {
        let api_key = self.api_key.as_ref().ok_or(SearchApiError::NoKey)?;

        let path_and_query = format!("{}?{}", KEYWORD_SEARCH_PATH, query.into_query_string());
        let uri = Uri::builder()
            .scheme("https")
            .authority(KAKAO_HOST)
            .path_and_query(&path_and_query[..])
            .build()?;

        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .header("Authorization", format!("KakaoAK {}", api_key))
            .body(())?;
        Ok(request)
    }

    // Never touches the configured key, later searches still send it
    fn status_error(status: StatusCode, details: String) -> SearchApiError {
        match status {
            StatusCode::UNAUTHORIZED => SearchApiError::InvalidKey,
            StatusCode::TOO_MANY_REQUESTS => SearchApiError::TooManyRequests,
            s => SearchApiError::BadStatus(s.as_u16(), details),
        }
    }

    pub async fn search_keyword(&self, query: &str) -> Result<Vec<Keyword>, SearchApiError> {
        let query = SearchQuery::new(query, 1, self.page_size);
        if query.is_blank() {
            return Ok(vec![]);
        }

        debug!("searching for {:?}", &query.query);
        let request = self.search_request(query)?;
        let mut result = self.client.send_async(request).await?;

        let status = result.status();
        if status.is_success() {
            let response: KeywordSearchResponse = from_str(&result.text().await?)?;
            Ok(response.into())
        } else {
            let details = result
                .text()
                .await
                .unwrap_or_else(|_| "(no details available)".to_string());
            Err(Self::status_error(status, details))
        }
    }
}
