//! Page-number pagination with absolute next/previous links.

use axum::extract::{FromRequestParts, OriginalUri};
use axum::http::header;
use axum::http::request::Parts;
use url::Url;

use crate::app::visibility::Paginated;
use crate::app::PageSlice;
use crate::http::AppError;
use crate::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageConfig {
    pub default_size: i64,
    pub max_size: i64,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            default_size: 2,
            max_size: 20,
        }
    }
}

/// Names of the query parameters driving one paginated list. A post detail
/// paginates its comments with a separate pair so both can coexist in a URL.
#[derive(Debug, Clone, Copy)]
pub struct PageKeys {
    pub page: &'static str,
    pub page_size: &'static str,
}

pub const LIST_KEYS: PageKeys = PageKeys {
    page: "page",
    page_size: "page_size",
};

pub const COMMENT_KEYS: PageKeys = PageKeys {
    page: "comments_page",
    page_size: "comments_page_size",
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    pub page: i64,
    pub page_size: i64,
}

impl PageParams {
    /// Any unparsable or out of range value is an invalid page.
    pub fn parse(
        page: Option<&str>,
        page_size: Option<&str>,
        config: PageConfig,
    ) -> Result<Self, AppError> {
        let page_size = match page_size {
            None => config.default_size,
            Some(raw) => match raw.trim().parse::<i64>() {
                Ok(size) if (1..=config.max_size).contains(&size) => size,
                _ => return Err(AppError::invalid_page()),
            },
        };

        let page = match page {
            None => 1,
            Some(raw) => match raw.trim().parse::<i64>() {
                Ok(page) if page >= 1 => page,
                _ => return Err(AppError::invalid_page()),
            },
        };

        Ok(Self { page, page_size })
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

/// Turns a fetched window into the response envelope. Page 1 is always
/// valid; any later page has to contain at least one row.
pub fn paginate<T, U>(
    slice: PageSlice<T>,
    params: PageParams,
    keys: PageKeys,
    url: &Url,
) -> Result<Paginated<U>, AppError>
where
    U: From<T>,
{
    if params.page > 1 && params.offset() >= slice.total {
        return Err(AppError::invalid_page());
    }

    let next = (params.page.saturating_mul(params.page_size) < slice.total)
        .then(|| page_link(url, keys.page, Some(params.page + 1)));
    let previous = match params.page {
        1 => None,
        2 => Some(page_link(url, keys.page, None)),
        page => Some(page_link(url, keys.page, Some(page - 1))),
    };

    Ok(Paginated {
        count: slice.total,
        next,
        previous,
        results: slice.items.into_iter().map(U::from).collect(),
    })
}

/// Rewrites `key` in the request URL, keeping every other parameter.
fn page_link(url: &Url, key: &str, page: Option<i64>) -> String {
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(name, _)| name != key)
        .map(|(name, value)| (name.into_owned(), value.into_owned()))
        .collect();

    let mut link = url.clone();
    link.set_query(None);
    if !kept.is_empty() || page.is_some() {
        let mut query = link.query_pairs_mut();
        for (name, value) in &kept {
            query.append_pair(name, value);
        }
        if let Some(page) = page {
            query.append_pair(key, &page.to_string());
        }
    }
    link.to_string()
}

/// Absolute URL of the current request, used as the base for page links.
#[derive(Debug, Clone)]
pub struct RequestUrl(pub Url);

#[axum::async_trait]
impl FromRequestParts<AppState> for RequestUrl {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let OriginalUri(uri) = OriginalUri::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::internal("failed to read request uri"))?;

        let host = parts
            .headers
            .get(header::HOST)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("localhost");
        let scheme = parts
            .headers
            .get("x-forwarded-proto")
            .and_then(|value| value.to_str().ok())
            .unwrap_or("http");
        let path_and_query = uri
            .path_and_query()
            .map(|value| value.as_str())
            .unwrap_or("/");

        let url = Url::parse(&format!("{}://{}{}", scheme, host, path_and_query))
            .map_err(|_| AppError::bad_request("invalid request url"))?;
        Ok(RequestUrl(url))
    }
}
