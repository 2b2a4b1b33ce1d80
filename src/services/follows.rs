use uuid::Uuid;

use crate::{
    db::UserStore,
    error::{AppError, AppResult},
    models::{FollowOutcome, FollowedUser, User},
};

async fn load_pair(
    users: &dyn UserStore,
    user_id: Uuid,
    following_id: Uuid,
) -> AppResult<(User, User)> {
    let user = users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    let followee = users
        .find_by_id(following_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User to follow not found".to_string()))?;
    Ok((user, followee))
}

/// Makes `user_id` follow `following_id`; following twice is a no-op
pub async fn follow(
    users: &dyn UserStore,
    user_id: Uuid,
    following_id: Uuid,
) -> AppResult<FollowOutcome> {
    let (user, followee) = load_pair(users, user_id, following_id).await?;

    let changed = !users.is_following(user.id, followee.id).await?
        && users.insert_following(user.id, followee.id).await?;

    let message = if changed {
        tracing::info!(follower = %user.id, followee = %followee.id, "Follow added");
        format!("{} is now following {}", user.nickname, followee.nickname)
    } else {
        format!("{} is already following {}", user.nickname, followee.nickname)
    };

    Ok(FollowOutcome {
        message,
        changed,
        user: user.nickname,
        f_user: followee.nickname,
    })
}

/// Removes the relation; unfollowing someone not followed is a no-op
pub async fn unfollow(
    users: &dyn UserStore,
    user_id: Uuid,
    following_id: Uuid,
) -> AppResult<FollowOutcome> {
    let (user, followee) = load_pair(users, user_id, following_id).await?;

    let changed = users.is_following(user.id, followee.id).await?
        && users.delete_following(user.id, followee.id).await?;

    let message = if changed {
        tracing::info!(follower = %user.id, followee = %followee.id, "Follow removed");
        format!("{} unfollowed {}", user.nickname, followee.nickname)
    } else {
        format!("{} is not following {}", user.nickname, followee.nickname)
    };

    Ok(FollowOutcome {
        message,
        changed,
        user: user.nickname,
        f_user: followee.nickname,
    })
}

/// Users followed by `user_id`
pub async fn following_info(users: &dyn UserStore, user_id: Uuid) -> AppResult<Vec<FollowedUser>> {
    if users.find_by_id(user_id).await?.is_none() {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    Ok(users
        .list_following(user_id)
        .await?
        .into_iter()
        .map(|user| FollowedUser {
            id: user.id,
            nickname: user.nickname,
            movie_list: user.movie_list,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MockUserStore;
    use chrono::Utc;

    fn user(nickname: &str) -> User {
        User {
            id: Uuid::new_v4(),
            email: format!("{}@cinetalk.kr", nickname),
            nickname: nickname.to_string(),
            password_hash: "hash".to_string(),
            profile_image: None,
            movie_list: vec![603, 27205],
            created_at: Utc::now(),
        }
    }

    fn store_with(a: User, b: User) -> MockUserStore {
        let mut users = MockUserStore::new();
        users.expect_find_by_id().returning(move |id| {
            Ok([&a, &b].into_iter().find(|u| u.id == id).cloned())
        });
        users
    }

    #[tokio::test]
    async fn test_follow_inserts_relation() {
        let (alice, bob) = (user("alice"), user("bob"));
        let (alice_id, bob_id) = (alice.id, bob.id);
        let mut users = store_with(alice, bob);
        users.expect_is_following().returning(|_, _| Ok(false));
        users
            .expect_insert_following()
            .times(1)
            .returning(|_, _| Ok(true));

        let outcome = follow(&users, alice_id, bob_id).await.unwrap();
        assert!(outcome.changed);
        assert_eq!(outcome.user, "alice");
        assert_eq!(outcome.f_user, "bob");
    }

    #[tokio::test]
    async fn test_follow_twice_is_noop() {
        let (alice, bob) = (user("alice"), user("bob"));
        let (alice_id, bob_id) = (alice.id, bob.id);
        let mut users = store_with(alice, bob);
        users.expect_is_following().returning(|_, _| Ok(true));
        users.expect_insert_following().never();

        let outcome = follow(&users, alice_id, bob_id).await.unwrap();
        assert!(!outcome.changed);
        assert_eq!(outcome.message, "alice is already following bob");
    }

    #[tokio::test]
    async fn test_unfollow_absent_relation_is_noop() {
        let (alice, bob) = (user("alice"), user("bob"));
        let (alice_id, bob_id) = (alice.id, bob.id);
        let mut users = store_with(alice, bob);
        users.expect_is_following().returning(|_, _| Ok(false));
        users.expect_delete_following().never();

        let outcome = unfollow(&users, alice_id, bob_id).await.unwrap();
        assert!(!outcome.changed);
        assert_eq!(outcome.message, "alice is not following bob");
    }

    #[tokio::test]
    async fn test_follow_unknown_user() {
        let alice = user("alice");
        let alice_id = alice.id;
        let mut users = store_with(alice, user("bob"));
        users.expect_insert_following().never();

        let result = follow(&users, alice_id, Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_following_info_lists_followees() {
        let (alice, bob) = (user("alice"), user("bob"));
        let alice_id = alice.id;
        let followee = bob.clone();
        let mut users = store_with(alice, bob);
        users
            .expect_list_following()
            .returning(move |_| Ok(vec![followee.clone()]));

        let listed = following_info(&users, alice_id).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].nickname, "bob");
        assert_eq!(listed[0].movie_list, vec![603, 27205]);
    }
}
