use serde_json::{json, Value};

use crate::database::manager::DatabaseManager;
use crate::database::models::Category;
use crate::error::ApiError;
use crate::middleware::response::ApiResponse;

use super::utils::db_error;

const CATEGORY_COLUMNS: &str = "id, name, slug, is_active, created_at";

/// GET /api/admin/categories - all categories, alphabetical
pub async fn list() -> Result<ApiResponse<Vec<Category>>, ApiError> {
    let pool = DatabaseManager::pool().await?;

    let categories = sqlx::query_as::<_, Category>(&format!(
        "SELECT {} FROM categories ORDER BY name",
        CATEGORY_COLUMNS
    ))
    .fetch_all(&pool)
    .await
    .map_err(db_error)?;

    Ok(ApiResponse::success(categories))
}

/// POST /api/admin/categories/sync - reconcile stored slugs with the ones
/// derived from category names. Idempotent: a second run reports no updates.
pub async fn sync() -> Result<ApiResponse<Value>, ApiError> {
    let pool = DatabaseManager::pool().await?;

    let categories = sqlx::query_as::<_, Category>(&format!(
        "SELECT {} FROM categories ORDER BY name",
        CATEGORY_COLUMNS
    ))
    .fetch_all(&pool)
    .await
    .map_err(db_error)?;

    let mut changes: Vec<Value> = Vec::new();
    for category in &categories {
        let expected = slugify(&category.name);
        if expected.is_empty() || expected == category.slug {
            continue;
        }

        sqlx::query("UPDATE categories SET slug = $1 WHERE id = $2")
            .bind(&expected)
            .bind(category.id)
            .execute(&pool)
            .await
            .map_err(db_error)?;

        tracing::info!(category = %category.id, from = %category.slug, to = %expected, "category slug reconciled");
        changes.push(json!({ "id": category.id, "from": category.slug, "to": expected }));
    }

    Ok(ApiResponse::success(json!({
        "checked": categories.len(),
        "updated": changes.len(),
        "changes": changes,
    })))
}

/// Lowercased alphanumeric runs joined by single hyphens, no leading or
/// trailing hyphen. Non-ASCII characters are treated as separators.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    slug
}
