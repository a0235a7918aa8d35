//! Handler for `GET /tree`.
//!
//! Returns the nested hierarchy, filtered by `?q=` when given, or `null` when
//! nothing is left to show.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
};
use famtree_core::{TreeNode, editor, store::FamilyStore};

use crate::{ApiState, error::ApiError, people::SearchParams};

/// `GET /tree[?q=<term>]`
pub async fn handler<S: FamilyStore>(
  State(state): State<Arc<ApiState<S>>>,
  Query(params): Query<SearchParams>,
) -> Result<Json<Option<TreeNode>>, ApiError> {
  let tree = editor::load_tree(
    state.store.as_ref(),
    params.q.as_deref(),
    &state.family_name,
  )
  .await?;
  Ok(Json(tree))
}
