use crate::database::manager::DatabaseError;
use crate::error::ApiError;

const DEFAULT_PER_PAGE: i64 = 25;
const MAX_PER_PAGE: i64 = 100;

/// Clamped pagination window shared by the list endpoints
#[derive(Debug, Clone, Copy)]
pub struct Pagination {
    pub page: i64,
    pub per_page: i64,
}

impl Pagination {
    pub fn from_params(page: Option<i64>, per_page: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            per_page: per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.per_page
    }
}

pub fn db_error(e: sqlx::Error) -> ApiError {
    DatabaseError::from(e).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults_and_clamps() {
        let paging = Pagination::from_params(None, None);
        assert_eq!(paging.page, 1);
        assert_eq!(paging.per_page, 25);
        assert_eq!(paging.offset(), 0);

        let paging = Pagination::from_params(Some(0), Some(1000));
        assert_eq!(paging.page, 1);
        assert_eq!(paging.per_page, 100);

        let paging = Pagination::from_params(Some(3), Some(50));
        assert_eq!(paging.offset(), 100);
    }
}
