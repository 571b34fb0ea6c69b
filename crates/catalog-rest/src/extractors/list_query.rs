//! List query parameters.

use catalog_core::ListQuery;
use serde::Deserialize;
use utoipa::IntoParams;

/// Query string of the product list endpoint.
///
/// Every field is taken as text so that malformed numbers fall back to the
/// defaults during normalization instead of failing extraction.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListQueryParams {
    /// One-based page number (default 1).
    #[param(value_type = Option<i64>)]
    pub page: Option<String>,
    /// Items per page (default 20, max 200).
    #[param(value_type = Option<i64>)]
    pub page_size: Option<String>,
    /// Case-insensitive match on name or type.
    pub search: Option<String>,
    /// `price_asc`, `price_desc`, or anything else for newest first.
    pub sort: Option<String>,
}

fn parse_number(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|value| value.trim().parse().ok())
}

impl From<ListQueryParams> for ListQuery {
    fn from(params: ListQueryParams) -> Self {
        Self {
            page: parse_number(params.page.as_deref()),
            page_size: parse_number(params.page_size.as_deref()),
            search: params.search,
            sort: params.sort,
        }
    }
}
