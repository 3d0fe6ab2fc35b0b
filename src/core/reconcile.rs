use crate::domain::model::{HandleSet, ReconciliationResult};

/// Compute both asymmetric differences between the follower and following
/// sets. Deterministic and total: empty inputs yield empty lists and zero
/// counts. Handles are lowercase, so the `BTreeSet` iteration order is
/// already the required case-insensitive ascending order.
pub fn reconcile(followers: &HandleSet, following: &HandleSet) -> ReconciliationResult {
    let non_followers: Vec<String> = following.difference(followers).cloned().collect();
    let not_following_back: Vec<String> = followers.difference(following).cloned().collect();

    ReconciliationResult {
        non_followers,
        not_following_back,
        follower_count: followers.len(),
        following_count: following.len(),
    }
}
