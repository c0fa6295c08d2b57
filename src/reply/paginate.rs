//! Pagination metadata.

use serde_json::Value;

use super::{Data, Pagination, Reply};
use crate::client::PaginationType;

/// `next` for the current position, or 0 when there is no next page.
fn next_position(kind: PaginationType, has_next: bool, current: i64, limit: i64) -> i64 {
    match (has_next, kind) {
        (false, _) => 0,
        (true, PaginationType::Page) => current.saturating_add(1),
        (true, PaginationType::Offset) => current.saturating_add(limit),
    }
}

impl Reply<'_> {
    /// Paginate with a known total count.
    ///
    /// Pages are zero-based in page mode. A `limit` below 1 is treated as 1.
    pub fn paginate_total(&mut self, limit: i64, current: i64, total: i64) -> &mut Self {
        let limit = limit.max(1);
        let kind = self.client.pagination_type();

        let has_next = match kind {
            PaginationType::Page => {
                let total_pages = if total > 0 {
                    total / limit + i64::from(total % limit > 0)
                } else {
                    0
                };
                current.saturating_add(1) < total_pages
            }
            PaginationType::Offset => current.saturating_add(limit) < total,
        };

        self.state.envelope.meta.pagination = Some(Pagination {
            next: next_position(kind, has_next, current, limit),
            has_next,
            current,
            total: Some(total),
        });
        self
    }

    /// Paginate a list fetched with `limit + 1` items.
    ///
    /// When the data is a JSON array longer than `limit`, it is cut down to
    /// `limit` and `hasNext` is set. Any other data is left alone.
    pub fn paginate_cursor(&mut self, limit: i64, current: i64) -> &mut Self {
        let limit = limit.max(1);
        let kind = self.client.pagination_type();

        let Data::Json(Value::Array(items)) = &mut self.state.envelope.data else {
            tracing::warn!(
                data = self.state.envelope.data.kind(),
                "cursor pagination needs a JSON array, leaving reply unchanged"
            );
            return self;
        };

        let keep = usize::try_from(limit).unwrap_or(usize::MAX);
        let has_next = items.len() > keep;
        if has_next {
            items.truncate(keep);
        }

        self.state.envelope.meta.pagination = Some(Pagination {
            next: next_position(kind, has_next, current, limit),
            has_next,
            current,
            total: None,
        });
        self
    }
}
