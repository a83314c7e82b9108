//! Catalog list queries and page arithmetic.

use url::Url;

/// Items requested per catalog page
pub const PAGE_SIZE: u32 = 20;

/// Item types included in catalog listings
const LISTED_TYPES: &str = "Movie,Series";

/// Offset of the first item on a 1-based page
pub fn start_index(page: u32) -> u32 {
    page.saturating_sub(1) * PAGE_SIZE
}

/// Whether another page follows `page` given the server's total count
pub fn has_more(page: u32, total_count: u32) -> bool {
    u64::from(PAGE_SIZE) * u64::from(page) < u64::from(total_count)
}

/// Field a listing is sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    DateAdded,
    PremiereDate,
    /// Newest additions first, ties broken by name
    RecentlyAdded,
}

impl SortField {
    /// Options offered by the sort filter, in display order
    pub const SELECTABLE: [SortField; 3] =
        [SortField::Name, SortField::DateAdded, SortField::PremiereDate];

    pub fn as_query(&self) -> &'static str {
        match self {
            SortField::Name => "SortName",
            SortField::DateAdded => "DateCreated",
            SortField::PremiereDate => "ProductionYear",
            SortField::RecentlyAdded => "DateCreated,SortName",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortField::Name => "Name",
            SortField::DateAdded => "Date Added",
            SortField::PremiereDate => "Premiere Date",
            SortField::RecentlyAdded => "Recently Added",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn as_query(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "Ascending",
            SortDirection::Descending => "Descending",
        }
    }
}

/// Parameters of one catalog listing request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// 1-based page number
    pub page: u32,
    pub sort: Option<(SortField, SortDirection)>,
    /// Restrict the listing to one library folder
    pub parent_id: Option<String>,
    pub search_term: Option<String>,
}

impl ListQuery {
    pub fn page(page: u32) -> Self {
        Self {
            page,
            sort: None,
            parent_id: None,
            search_term: None,
        }
    }

    pub fn sorted(mut self, field: SortField, direction: SortDirection) -> Self {
        self.sort = Some((field, direction));
        self
    }

    pub fn in_folder(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn matching(mut self, search_term: impl Into<String>) -> Self {
        self.search_term = Some(search_term.into());
        self
    }

    /// Build `{base}/Users/{userId}/Items` with the listing parameters.
    ///
    /// Blank search terms and parent ids are left out.
    pub fn to_url(&self, base_url: &Url, user_id: &str) -> Url {
        let mut url = base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["Users", user_id, "Items"]);
        }

        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("StartIndex", &start_index(self.page).to_string())
                .append_pair("Limit", &PAGE_SIZE.to_string())
                .append_pair("Recursive", "true")
                .append_pair("IncludeItemTypes", LISTED_TYPES)
                .append_pair("ImageTypeLimit", "1")
                .append_pair("EnableImageTypes", "Primary");

            if let Some(term) = self.search_term.as_deref().filter(|t| !t.trim().is_empty()) {
                query.append_pair("SearchTerm", term);
            }
            if let Some(parent_id) = self.parent_id.as_deref().filter(|p| !p.is_empty()) {
                query.append_pair("ParentId", parent_id);
            }
            if let Some((field, direction)) = self.sort {
                query
                    .append_pair("SortBy", field.as_query())
                    .append_pair("SortOrder", direction.as_query());
            }
        }

        url
    }
}
