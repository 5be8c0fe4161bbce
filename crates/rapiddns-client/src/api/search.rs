//! Search and advanced-query endpoints.

use crate::paginate::{PageProgress, PageSource, Paginated, Paginator};
use crate::RapidDnsClient;
use async_trait::async_trait;
use rapiddns_core::envelope::StatusRule;
use rapiddns_core::{RecordSet, Result, SearchType};

/// Default page number
pub const DEFAULT_PAGE: u32 = 1;

/// Default number of records per page
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Search API endpoints
pub struct SearchApi<'a> {
    client: &'a RapidDnsClient,
}

impl<'a> SearchApi<'a> {
    pub(crate) fn new(client: &'a RapidDnsClient) -> Self {
        Self { client }
    }

    /// Search by keyword (domain, IP or CIDR)
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let records = client.search().keyword("example.com").send().await?;
    /// println!("{} records", records.len());
    /// ```
    #[must_use]
    pub fn keyword(&self, keyword: impl Into<String>) -> SearchRequestBuilder<'a> {
        SearchRequestBuilder::new(
            self.client,
            Target::Keyword {
                keyword: keyword.into(),
                search_type: None,
            },
        )
    }

    /// Run an advanced query (e.g. `domain:apple AND tld:com`)
    #[must_use]
    pub fn query(&self, query: impl Into<String>) -> SearchRequestBuilder<'a> {
        SearchRequestBuilder::new(self.client, Target::Query(query.into()))
    }
}

enum Target {
    Keyword {
        keyword: String,
        search_type: Option<SearchType>,
    },
    Query(String),
}

/// Builder for search and query requests
pub struct SearchRequestBuilder<'a> {
    client: &'a RapidDnsClient,
    target: Target,
    page: u32,
    page_size: u32,
    max_records: Option<usize>,
}

impl<'a> SearchRequestBuilder<'a> {
    fn new(client: &'a RapidDnsClient, target: Target) -> Self {
        Self {
            client,
            target,
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
            max_records: None,
        }
    }

    /// Set the page number (1-indexed); the starting page for `fetch_all`
    #[must_use]
    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Set the number of records per page
    #[must_use]
    pub fn page_size(mut self, size: u32) -> Self {
        self.page_size = size;
        self
    }

    /// Restrict a keyword search to one search type.
    ///
    /// Has no effect on advanced queries.
    #[must_use]
    pub fn search_type(mut self, search_type: SearchType) -> Self {
        if let Target::Keyword {
            search_type: current,
            ..
        } = &mut self.target
        {
            *current = Some(search_type);
        }
        self
    }

    /// Cap the number of records `fetch_all` accumulates
    #[must_use]
    pub fn max_records(mut self, max: usize) -> Self {
        self.max_records = Some(max);
        self
    }

    /// Fetch the configured page only
    pub async fn send(self) -> Result<RecordSet> {
        self.fetch_page(self.page, self.page_size).await
    }

    /// Fetch pages until the result is exhausted or the cap is reached
    pub async fn fetch_all(self) -> Result<Paginated> {
        self.fetch_all_with(|_| {}).await
    }

    /// Like [`fetch_all`](Self::fetch_all), reporting each page as it arrives
    pub async fn fetch_all_with<F>(self, on_page: F) -> Result<Paginated>
    where
        F: FnMut(&PageProgress) + Send,
    {
        let paginator = Paginator {
            start_page: self.page,
            page_size: self.page_size,
            max_records: self.max_records,
        };
        paginator.run(&self, on_page).await
    }
}

#[async_trait]
impl PageSource for SearchRequestBuilder<'_> {
    async fn fetch_page(&self, page: u32, page_size: u32) -> Result<RecordSet> {
        let mut params = vec![
            ("page", page.to_string()),
            ("pagesize", page_size.to_string()),
        ];

        match &self.target {
            Target::Keyword {
                keyword,
                search_type,
            } => {
                if let Some(search_type) = search_type {
                    params.push(("search_type", search_type.as_str().to_string()));
                }
                self.client
                    .get(&["search", keyword.as_str()], &params, StatusRule::Lenient)
                    .await
            }
            Target::Query(query) => {
                self.client
                    .get(&["search", "query", query.as_str()], &params, StatusRule::Lenient)
                    .await
            }
        }
    }
}
