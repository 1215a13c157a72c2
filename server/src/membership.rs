//! Join-table membership toggles: favorites, shopping cart and subscriptions.
//!
//! Each relation is a `(owner, target)` pair with a unique key. `add` rejects a
//! pair that already exists and `remove` rejects one that does not, so neither
//! verb is idempotent. The unique constraint is the final arbiter: an insert
//! that loses a race to a concurrent one is reported as `AlreadyPresent`.

use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum MembershipError {
    #[error("{0}")]
    AlreadyPresent(&'static str),

    #[error("{0}")]
    NotPresent(&'static str),

    #[error("{0}")]
    SelfReference(&'static str),

    #[error(transparent)]
    Database(#[from] DieselError),
}

pub trait Membership {
    const ALREADY_PRESENT: &'static str;
    const NOT_PRESENT: &'static str;
    /// Set when owner and target must differ.
    const SELF_REFERENCE: Option<&'static str> = None;

    fn exists(conn: &mut PgConnection, owner: Uuid, target: Uuid) -> QueryResult<bool>;
    fn insert(conn: &mut PgConnection, owner: Uuid, target: Uuid) -> QueryResult<usize>;
    fn delete(conn: &mut PgConnection, owner: Uuid, target: Uuid) -> QueryResult<usize>;
}

pub fn add<M: Membership>(
    conn: &mut PgConnection,
    owner: Uuid,
    target: Uuid,
) -> Result<(), MembershipError> {
    ensure_distinct::<M>(owner, target)?;
    if M::exists(conn, owner, target)? {
        return Err(MembershipError::AlreadyPresent(M::ALREADY_PRESENT));
    }
    settle_insert::<M>(M::insert(conn, owner, target))
}

pub fn remove<M: Membership>(
    conn: &mut PgConnection,
    owner: Uuid,
    target: Uuid,
) -> Result<(), MembershipError> {
    ensure_distinct::<M>(owner, target)?;
    settle_delete::<M>(M::delete(conn, owner, target)?)
}

pub fn ensure_distinct<M: Membership>(owner: Uuid, target: Uuid) -> Result<(), MembershipError> {
    match M::SELF_REFERENCE {
        Some(message) if owner == target => Err(MembershipError::SelfReference(message)),
        _ => Ok(()),
    }
}

fn settle_insert<M: Membership>(result: QueryResult<usize>) -> Result<(), MembershipError> {
    match result {
        Ok(_) => Ok(()),
        Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
            Err(MembershipError::AlreadyPresent(M::ALREADY_PRESENT))
        }
        Err(e) => Err(e.into()),
    }
}

fn settle_delete<M: Membership>(deleted: usize) -> Result<(), MembershipError> {
    if deleted == 0 {
        Err(MembershipError::NotPresent(M::NOT_PRESENT))
    } else {
        Ok(())
    }
}

macro_rules! membership {
    (
        $name:ident,
        $table:ident ($owner:ident -> $target:ident),
        $present:expr,
        $absent:expr
        $(, self_reference = $self_ref:expr)?
    ) => {
        pub struct $name;

        impl Membership for $name {
            const ALREADY_PRESENT: &'static str = $present;
            const NOT_PRESENT: &'static str = $absent;
            $(const SELF_REFERENCE: Option<&'static str> = Some($self_ref);)?

            fn exists(conn: &mut PgConnection, owner: Uuid, target: Uuid) -> QueryResult<bool> {
                use crate::schema::$table;
                diesel::select(diesel::dsl::exists(
                    $table::table
                        .filter($table::$owner.eq(owner))
                        .filter($table::$target.eq(target)),
                ))
                .get_result(conn)
            }

            fn insert(conn: &mut PgConnection, owner: Uuid, target: Uuid) -> QueryResult<usize> {
                use crate::schema::$table;
                diesel::insert_into($table::table)
                    .values(($table::$owner.eq(owner), $table::$target.eq(target)))
                    .execute(conn)
            }

            fn delete(conn: &mut PgConnection, owner: Uuid, target: Uuid) -> QueryResult<usize> {
                use crate::schema::$table;
                diesel::delete(
                    $table::table
                        .filter($table::$owner.eq(owner))
                        .filter($table::$target.eq(target)),
                )
                .execute(conn)
            }
        }
    };
}

membership!(
    Favorite,
    favorites(user_id -> recipe_id),
    "Recipe is already in favorites",
    "Recipe is not in favorites"
);

membership!(
    ShoppingCart,
    shopping_cart(user_id -> recipe_id),
    "Recipe is already in the shopping cart",
    "Recipe is not in the shopping cart"
);

membership!(
    Subscription,
    subscriptions(user_id -> author_id),
    "You are already subscribed to this user",
    "You are not subscribed to this user",
    self_reference = "You cannot subscribe to yourself"
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;

    fn unique_violation() -> DieselError {
        DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new("duplicate key value violates unique constraint".to_string()),
        )
    }

    #[test]
    fn test_insert_race_loser_reports_already_present() {
        let result = settle_insert::<Favorite>(Err(unique_violation()));
        assert!(matches!(
            result,
            Err(MembershipError::AlreadyPresent("Recipe is already in favorites"))
        ));
    }

    #[test]
    fn test_insert_success() {
        assert!(settle_insert::<ShoppingCart>(Ok(1)).is_ok());
    }

    #[test]
    fn test_other_insert_errors_propagate() {
        let result = settle_insert::<ShoppingCart>(Err(DieselError::RollbackTransaction));
        assert!(matches!(result, Err(MembershipError::Database(_))));
    }

    #[test]
    fn test_delete_of_missing_pair_is_rejected() {
        assert!(matches!(
            settle_delete::<ShoppingCart>(0),
            Err(MembershipError::NotPresent("Recipe is not in the shopping cart"))
        ));
        assert!(settle_delete::<ShoppingCart>(1).is_ok());
    }

    #[test]
    fn test_self_subscription_always_rejected() {
        let user = Uuid::new_v4();
        assert!(matches!(
            ensure_distinct::<Subscription>(user, user),
            Err(MembershipError::SelfReference(_))
        ));
        assert!(ensure_distinct::<Subscription>(user, Uuid::new_v4()).is_ok());
    }

    #[test]
    fn test_recipe_memberships_allow_any_pair() {
        let id = Uuid::new_v4();
        assert!(ensure_distinct::<Favorite>(id, id).is_ok());
        assert!(ensure_distinct::<ShoppingCart>(id, id).is_ok());
    }

    fn toggle_sequence<M: Membership>(conn: &mut PgConnection, owner: Uuid, target: Uuid) {
        assert!(add::<M>(conn, owner, target).is_ok());
        assert!(matches!(
            add::<M>(conn, owner, target),
            Err(MembershipError::AlreadyPresent(_))
        ));
        assert!(remove::<M>(conn, owner, target).is_ok());
        assert!(matches!(
            remove::<M>(conn, owner, target),
            Err(MembershipError::NotPresent(_))
        ));
        assert!(add::<M>(conn, owner, target).is_ok());
    }

    #[test]
    fn test_toggle_sequences_against_database() {
        let Some(pool) = test_support::pool() else {
            return;
        };
        let mut conn = pool.get().unwrap();
        let cook = test_support::create_user(&mut conn);
        let follower = test_support::create_user(&mut conn);
        let recipe = test_support::create_recipe(&mut conn, &cook, &[]);

        toggle_sequence::<Favorite>(&mut conn, follower.id, recipe.id);
        toggle_sequence::<ShoppingCart>(&mut conn, follower.id, recipe.id);
        toggle_sequence::<Subscription>(&mut conn, follower.id, cook.id);
    }

    #[test]
    fn test_self_subscription_rejected_with_existing_state() {
        let Some(pool) = test_support::pool() else {
            return;
        };
        let mut conn = pool.get().unwrap();
        let cook = test_support::create_user(&mut conn);

        assert!(matches!(
            add::<Subscription>(&mut conn, cook.id, cook.id),
            Err(MembershipError::SelfReference(_))
        ));
        assert!(matches!(
            remove::<Subscription>(&mut conn, cook.id, cook.id),
            Err(MembershipError::SelfReference(_))
        ));
    }
}
