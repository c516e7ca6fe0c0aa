use crate::util::QueryParams;

/// The two request shapes the proxy forwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxyQuery {
    /// `?s=<title>&page=<n>`
    Search { title: String, page: u32 },
    /// `?i=<imdb id>`
    Lookup { id: String },
}

impl ProxyQuery {
    /// Match the parameters against the accepted shapes. Anything that is
    /// not exactly `{s, page}` or exactly `{i}` is rejected.
    pub fn from_params(params: &QueryParams) -> Result<Self, QueryShapeError> {
        if params.has_exactly(&["s", "page"]) {
            let title = params.get("s").unwrap_or_default().to_string();
            let raw_page = params.get("page").unwrap_or_default();
            let page = raw_page
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|p| *p >= 1)
                .ok_or_else(|| QueryShapeError::InvalidPage(raw_page.to_string()))?;
            return Ok(ProxyQuery::Search { title, page });
        }

        if params.has_exactly(&["i"]) {
            let id = params.get("i").unwrap_or_default().to_string();
            return Ok(ProxyQuery::Lookup { id });
        }

        Err(QueryShapeError::WrongShape)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryShapeError {
    #[error("Error: Wrong format for query string parameters!")]
    WrongShape,
    #[error("Error: Invalid page number {0:?}")]
    InvalidPage(String),
}
