//! Item API handlers

use axum::{extract::State, Json};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::validation::{validate_required_text, MAX_NAME_LEN, MAX_SIZE_LEN};
use crate::utils::{AppError, AppResult};
use shared::models::{Item, ItemUpsert};

/// GET /api/items - all items with their variants
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Item>>> {
    let items = state
        .item_repository()
        .find_all()
        .await
        .map_err(AppError::from)?;
    Ok(Json(items))
}

/// POST /api/items - add or update an item (staff only)
///
/// First submission for a new name creates the item; repeat submissions
/// merge: matching sizes get the new price and add the submitted stock,
/// unseen sizes are appended.
pub async fn upsert(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(input): Json<ItemUpsert>,
) -> AppResult<Json<Item>> {
    user.require_staff()?;

    validate_required_text(&input.name, "name", MAX_NAME_LEN)?;
    for variant in &input.variants {
        validate_required_text(&variant.size, "size", MAX_SIZE_LEN)?;
    }

    let item = state
        .item_repository()
        .upsert(input)
        .await
        .map_err(AppError::from)?;
    Ok(Json(item))
}
