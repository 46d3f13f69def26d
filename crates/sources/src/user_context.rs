//! Helper to build a UserContext from the UserStore

use crate::types::UserContext;
use anyhow::{anyhow, Result};
use data_loader::{UserId, UserStore};

/// Build a UserContext for `user_id`, failing if the user is unknown
pub fn build_user_context(store: &UserStore, user_id: UserId) -> Result<UserContext> {
    let user = store
        .get_user(user_id)
        .ok_or_else(|| anyhow!("User {} not found", user_id))?;

    Ok(UserContext::new(user.id, user.latitude, user.longitude))
}
