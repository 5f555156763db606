use mockall::predicate;
use pretty_assertions::assert_eq;
use slotbook_api::middleware::error_handling::AppError;
use slotbook_core::{
    errors::BookError,
    models::{
        profile::{Profile, Role},
        shop::{ReviewDecision, Shop, ShopReviewRequest, ShopStatus},
    },
};
use uuid::Uuid;

use crate::test_utils::{db_profile, db_shop, TestContext};

// Mirrors handlers::shop::review_shop with the repositories mocked.
async fn review_with_mocks(
    ctx: &TestContext,
    caller: &Profile,
    id: Uuid,
    request: ShopReviewRequest,
) -> Result<Shop, AppError> {
    if !caller.role.is_admin() {
        return Err(AppError(BookError::Authorization(
            "Administrator access required".to_string(),
        )));
    }
    let reason = request.validated_reason()?;

    let shop = ctx
        .shop_repo
        .get_shop_by_id(id)
        .await?
        .ok_or_else(|| BookError::NotFound(format!("Shop with ID {} not found", id)))?;
    let shop = Shop::try_from(shop)?;
    let next = shop.status.review(request.decision)?;

    let stored_reason = match request.decision {
        ReviewDecision::Reject => reason,
        _ => None,
    };
    let updated = ctx.shop_repo.set_shop_status(id, next, stored_reason).await?;
    Ok(Shop::try_from(updated)?)
}

fn admin() -> Profile {
    Profile::try_from(db_profile(Role::SuperAdmin)).unwrap()
}

fn context_with_shop(status: ShopStatus) -> (TestContext, Uuid) {
    let owner = db_profile(Role::Owner);
    let shop = db_shop(owner.id, status);
    let id = shop.id;

    let mut ctx = TestContext::new();
    ctx.shop_repo
        .expect_get_shop_by_id()
        .with(predicate::eq(id))
        .returning(move |_| Ok(Some(shop.clone())));

    (ctx, id)
}

fn expect_status_write(ctx: &mut TestContext, id: Uuid, status: ShopStatus, reason: Option<&str>) {
    let owner = db_profile(Role::Owner);
    let mut row = db_shop(owner.id, status);
    row.id = id;
    row.rejection_reason = reason.map(str::to_string);

    ctx.shop_repo
        .expect_set_shop_status()
        .with(
            predicate::eq(id),
            predicate::eq(status),
            predicate::eq(reason.map(str::to_string)),
        )
        .times(1)
        .returning(move |_, _, _| Ok(row.clone()));
}

#[tokio::test]
async fn test_admin_approves_pending_shop() {
    let (mut ctx, id) = context_with_shop(ShopStatus::PendingReview);
    expect_status_write(&mut ctx, id, ShopStatus::Approved, None);

    let request = ShopReviewRequest {
        decision: ReviewDecision::Approve,
        reason: Some("looks good".to_string()),
    };
    let shop = review_with_mocks(&ctx, &admin(), id, request).await.unwrap();

    assert_eq!(shop.status, ShopStatus::Approved);
    assert_eq!(shop.rejection_reason, None);
}

#[tokio::test]
async fn test_admin_rejects_with_reason() {
    let (mut ctx, id) = context_with_shop(ShopStatus::PendingReview);
    expect_status_write(&mut ctx, id, ShopStatus::Rejected, Some("Missing address"));

    let request = ShopReviewRequest {
        decision: ReviewDecision::Reject,
        reason: Some("Missing address".to_string()),
    };
    let shop = review_with_mocks(&ctx, &admin(), id, request).await.unwrap();

    assert_eq!(shop.status, ShopStatus::Rejected);
    assert_eq!(shop.rejection_reason.as_deref(), Some("Missing address"));
}

#[tokio::test]
async fn test_suspending_a_draft_conflicts() {
    let (ctx, id) = context_with_shop(ShopStatus::Draft);

    let request = ShopReviewRequest {
        decision: ReviewDecision::Suspend,
        reason: None,
    };
    let result = review_with_mocks(&ctx, &admin(), id, request).await;

    assert!(matches!(result, Err(AppError(BookError::Conflict(_)))));
}

#[tokio::test]
async fn test_owner_cannot_review() {
    let ctx = TestContext::new();
    let owner = Profile::try_from(db_profile(Role::Owner)).unwrap();

    let request = ShopReviewRequest {
        decision: ReviewDecision::Approve,
        reason: None,
    };
    let result = review_with_mocks(&ctx, &owner, Uuid::new_v4(), request).await;

    assert!(matches!(result, Err(AppError(BookError::Authorization(_)))));
}
