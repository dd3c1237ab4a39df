use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

// ============ Pagination ============

/// Largest page size sent to a backend.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Pagination parameters for list operations.
///
/// Pages are 1-indexed regardless of how the backend numbers them; the
/// endpoint's [`QueryStyle`] translates on the way out.
///
/// # Default
///
/// The default is `page = 1, page_size = 10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationParams {
    /// Page number (1-indexed).
    pub page: u32,
    /// Number of items per page.
    pub page_size: u32,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 10,
        }
    }
}

impl PaginationParams {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self { page, page_size }
    }

    /// Clamp pagination values to valid ranges.
    ///
    /// - `page` is clamped to `>= 1`
    /// - `page_size` is clamped to `1..=max_page_size`
    #[must_use]
    pub fn validated(&self, max_page_size: u32) -> Self {
        Self {
            page: self.page.max(1),
            page_size: self.page_size.clamp(1, max_page_size),
        }
    }

    /// Number of items before this page (`skip` in skip/limit APIs).
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }
}

/// Sort direction for page/size style listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// How a backend expects list pagination in the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "style", rename_all = "snake_case")]
pub enum QueryStyle {
    /// `?skip=&limit=`
    #[default]
    SkipLimit,
    /// `?page=&size=&sortBy=&direction=`
    PageSize {
        /// Backend counts pages from 0.
        #[serde(default)]
        zero_based: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        sort_by: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        direction: Option<SortDirection>,
    },
}

/// A list request: one page plus optional server-side filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub pagination: PaginationParams,
    /// Extra query parameters, e.g. `district=Kaski`, sent in order.
    pub filters: Vec<(String, String)>,
}

impl ListQuery {
    pub fn page(page: u32, page_size: u32) -> Self {
        Self {
            pagination: PaginationParams::new(page, page_size),
            filters: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push((key.into(), value.into()));
        self
    }
}

/// One normalized page of a listing.
///
/// Whatever shape the backend used (bare array or envelope), callers see
/// only `items` and `total`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListPage {
    /// Items in the current page, in server order.
    pub items: Vec<Record>,
    /// Total number of items across all pages (server-reported or inferred).
    pub total: u64,
}

impl ListPage {
    pub fn new(items: Vec<Record>, total: u64) -> Self {
        Self { items, total }
    }
}

// ============ Records ============

/// Server-assigned record identity.
///
/// Opaque: the backend may use integers or strings. Both deserialize into
/// the same textual form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Read an id out of a JSON value, accepting strings and integers.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) if !s.trim().is_empty() => Some(Self(s.clone())),
            Value::Number(n) => Some(Self(n.to_string())),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Error;

        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value)
            .ok_or_else(|| Error::custom(format!("invalid record id: {value}")))
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        Self(n.to_string())
    }
}

/// A resource record: field name to JSON value.
///
/// Scalars are JSON strings, numbers, booleans or null; repeatable groups
/// are arrays of objects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Key holding the server-assigned id.
    pub const ID_FIELD: &'static str = "id";

    pub fn new() -> Self {
        Self(Map::new())
    }

    pub fn id(&self) -> Option<RecordId> {
        self.0.get(Self::ID_FIELD).and_then(RecordId::from_value)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// String value of a field, `None` for missing, null or non-string values.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(field.into(), value.into())
    }

    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.0.remove(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Wrap a JSON value, which must be an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Object(record.0)
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

// ============ Endpoints ============

/// Placeholder substituted with the record id in item paths.
pub const ID_PLACEHOLDER: &str = "{id}";

/// REST surface of one resource kind.
///
/// Paths are relative to the client's base URL. The item path contains
/// [`ID_PLACEHOLDER`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceEndpoint {
    /// Resource key used in logs and errors, e.g. `schools`.
    pub resource: String,
    /// Collection path for list and create, e.g. `/schools/`.
    pub collection: String,
    /// Item path for get, update and delete, e.g. `/schools/{id}`.
    pub item: String,
    /// Aggregate counters, e.g. `/schools/stats/`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<String>,
    #[serde(default)]
    pub query_style: QueryStyle,
}

impl ResourceEndpoint {
    /// Conventional layout: `/{resource}/` and `/{resource}/{id}`, skip/limit paging, no stats.
    pub fn rest(resource: &str) -> Self {
        Self {
            resource: resource.to_string(),
            collection: format!("/{resource}/"),
            item: format!("/{resource}/{ID_PLACEHOLDER}"),
            stats: None,
            query_style: QueryStyle::SkipLimit,
        }
    }

    #[must_use]
    pub fn with_stats(mut self, path: impl Into<String>) -> Self {
        self.stats = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_query_style(mut self, style: QueryStyle) -> Self {
        self.query_style = style;
        self
    }

    /// Item path with the id percent-encoded.
    pub fn item_path(&self, id: &RecordId) -> String {
        self.item
            .replace(ID_PLACEHOLDER, &urlencoding::encode(id.as_str()))
    }

    /// Query parameters for a list request, pagination first, filters after.
    pub fn query_pairs(&self, query: &ListQuery) -> Vec<(String, String)> {
        let params = query.pagination.validated(MAX_PAGE_SIZE);
        let mut pairs = match &self.query_style {
            QueryStyle::SkipLimit => vec![
                ("skip".to_string(), params.offset().to_string()),
                ("limit".to_string(), params.page_size.to_string()),
            ],
            QueryStyle::PageSize {
                zero_based,
                sort_by,
                direction,
            } => {
                let page = if *zero_based {
                    params.page.saturating_sub(1)
                } else {
                    params.page
                };
                let mut pairs = vec![
                    ("page".to_string(), page.to_string()),
                    ("size".to_string(), params.page_size.to_string()),
                ];
                if let Some(sort_by) = sort_by {
                    pairs.push(("sortBy".to_string(), sort_by.clone()));
                }
                if let Some(direction) = direction {
                    pairs.push(("direction".to_string(), direction.as_str().to_string()));
                }
                pairs
            }
        };
        pairs.extend(query.filters.iter().cloned());
        pairs
    }

    /// Collection path with the encoded list query appended.
    pub fn list_path(&self, query: &ListQuery) -> String {
        let encoded: Vec<String> = self
            .query_pairs(query)
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect();
        if encoded.is_empty() {
            self.collection.clone()
        } else {
            format!("{}?{}", self.collection, encoded.join("&"))
        }
    }
}
