//! OData query builder for Microsoft Graph collection requests

/// A Graph collection request with OData system query options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ODataQuery {
    path: String,
    filter: Option<String>,
    select: Vec<String>,
    top: Option<u32>,
}

impl ODataQuery {
    /// Start a query for `path`, relative to the Graph base URL (e.g. "groups")
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            filter: None,
            select: Vec::new(),
            top: None,
        }
    }

    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn select(mut self, fields: &[&str]) -> Self {
        self.select = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    pub fn top(mut self, top: Option<u32>) -> Self {
        self.top = top;
        self
    }

    /// Query parameters in request order, values not yet encoded
    pub fn to_query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(filter) = &self.filter {
            params.push(("$filter", filter.clone()));
        }
        if !self.select.is_empty() {
            params.push(("$select", self.select.join(",")));
        }
        if let Some(top) = self.top {
            params.push(("$top", top.to_string()));
        }
        params
    }

    /// Absolute request URL
    pub fn to_url(&self, base_url: &str) -> String {
        let mut url = format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            self.path.trim_start_matches('/')
        );

        let params = self.to_query_params();
        if !params.is_empty() {
            let encoded: Vec<String> = params
                .iter()
                .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
                .collect();
            url.push('?');
            url.push_str(&encoded.join("&"));
        }

        url
    }
}

/// Exact, case-sensitive display name match
pub fn display_name_filter(name: &str) -> String {
    format!("displayName eq '{}'", escape_odata(name))
}

/// Escape a string literal for an OData filter by doubling single quotes
pub fn escape_odata(value: &str) -> String {
    value.replace('\'', "''")
}
