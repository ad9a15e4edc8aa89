//! Resource service tests with mocked repositories.
//!
//! These assert that domain errors surfaced by the storage layer (uniqueness
//! conflicts, missing references, owner-scoped misses) propagate through the
//! services unchanged.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use mockall::predicate::eq;

use carview::domain::{
    Brand, CommentAuthor, CommentView, NewReview, ReviewAuthor, ReviewCar, ReviewDetail,
};
use carview::errors::{AppError, AppResult};
use carview::infra::repositories::{
    MockBrandRepository, MockCommentRepository, MockFavoriteRepository, MockReviewRepository,
};
use carview::infra::{
    BrandRepository, CarRepository, CommentRepository, FavoriteRepository, ReviewRepository,
    TransactionContext, UnitOfWork, UserRepository,
};
use carview::services::{
    BrandManager, BrandService, CommentManager, CommentService, FavoriteManager, FavoriteService,
    ReviewManager, ReviewService,
};

/// Unit-of-work mock assembling whichever repository a test cares about.
#[derive(Default)]
struct TestUnitOfWork {
    brands: Option<Arc<MockBrandRepository>>,
    reviews: Option<Arc<MockReviewRepository>>,
    comments: Option<Arc<MockCommentRepository>>,
    favorites: Option<Arc<MockFavoriteRepository>>,
}

#[async_trait]
impl UnitOfWork for TestUnitOfWork {
    fn users(&self) -> Arc<dyn UserRepository> {
        unimplemented!("not used in these tests")
    }

    fn brands(&self) -> Arc<dyn BrandRepository> {
        self.brands.clone().expect("brand repository not mocked")
    }

    fn cars(&self) -> Arc<dyn CarRepository> {
        unimplemented!("car writes go through transactions")
    }

    fn reviews(&self) -> Arc<dyn ReviewRepository> {
        self.reviews.clone().expect("review repository not mocked")
    }

    fn comments(&self) -> Arc<dyn CommentRepository> {
        self.comments.clone().expect("comment repository not mocked")
    }

    fn favorites(&self) -> Arc<dyn FavoriteRepository> {
        self.favorites
            .clone()
            .expect("favorite repository not mocked")
    }

    async fn transaction<F, T>(&self, _f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(
                TransactionContext<'a>,
            ) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        Err(AppError::internal("Transactions not supported in test mock"))
    }
}

fn review_detail(id: i64, user_id: i64, car_id: i64) -> ReviewDetail {
    ReviewDetail {
        id,
        title: "Great daily driver".to_string(),
        content: "Comfortable and reliable.".to_string(),
        image_url: "https://img.example.com/r.jpg".to_string(),
        user: ReviewAuthor {
            id: user_id,
            username: "alice".to_string(),
        },
        car: ReviewCar {
            id: car_id,
            model: "Impreza".to_string(),
        },
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

// =============================================================================
// Reviews
// =============================================================================

#[tokio::test]
async fn review_create_returns_the_joined_detail() {
    let mut repo = MockReviewRepository::new();
    repo.expect_create()
        .returning(|review| Ok(review_detail(10, review.user_id, review.car_id)));

    let uow = TestUnitOfWork {
        reviews: Some(Arc::new(repo)),
        ..Default::default()
    };
    let service = ReviewManager::new(Arc::new(uow));

    let detail = service
        .create(NewReview {
            user_id: 1,
            car_id: 5,
            title: "Great daily driver".to_string(),
            content: "Comfortable and reliable.".to_string(),
            image_url: "https://img.example.com/r.jpg".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(detail.id, 10);
    assert_eq!(detail.user.id, 1);
    assert_eq!(detail.car.id, 5);
}

#[tokio::test]
async fn second_review_for_same_car_conflicts() {
    let mut repo = MockReviewRepository::new();
    repo.expect_create()
        .returning(|_| Err(AppError::conflict("only one review per car is permitted")));

    let uow = TestUnitOfWork {
        reviews: Some(Arc::new(repo)),
        ..Default::default()
    };
    let service = ReviewManager::new(Arc::new(uow));

    let err = service
        .create(NewReview {
            user_id: 1,
            car_id: 5,
            title: "Again".to_string(),
            content: "Again.".to_string(),
            image_url: "https://img.example.com/r.jpg".to_string(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn review_for_missing_car_is_not_found() {
    let mut repo = MockReviewRepository::new();
    repo.expect_create()
        .returning(|_| Err(AppError::not_found("car")));

    let uow = TestUnitOfWork {
        reviews: Some(Arc::new(repo)),
        ..Default::default()
    };
    let service = ReviewManager::new(Arc::new(uow));

    let err = service
        .create(NewReview {
            user_id: 1,
            car_id: 999,
            title: "Ghost car".to_string(),
            content: "Does not exist.".to_string(),
            image_url: "https://img.example.com/r.jpg".to_string(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound(ref r) if r == "car"));
}

#[tokio::test]
async fn deleting_someone_elses_review_is_not_found() {
    let mut repo = MockReviewRepository::new();
    repo.expect_delete()
        .with(eq(2), eq(10))
        .returning(|_, _| Err(AppError::not_found("review")));

    let uow = TestUnitOfWork {
        reviews: Some(Arc::new(repo)),
        ..Default::default()
    };
    let service = ReviewManager::new(Arc::new(uow));

    let err = service.delete(2, 10).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

// =============================================================================
// Favorites
// =============================================================================

#[tokio::test]
async fn favoriting_twice_conflicts() {
    let mut repo = MockFavoriteRepository::new();
    repo.expect_add()
        .with(eq(1), eq(5))
        .times(1)
        .returning(|_, _| Ok(()));
    repo.expect_add()
        .with(eq(1), eq(5))
        .returning(|_, _| Err(AppError::conflict("car is already favorited")));

    let uow = TestUnitOfWork {
        favorites: Some(Arc::new(repo)),
        ..Default::default()
    };
    let service = FavoriteManager::new(Arc::new(uow));

    service.add(1, 5).await.unwrap();
    let err = service.add(1, 5).await.unwrap_err();

    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn removing_a_missing_favorite_is_not_found() {
    let mut repo = MockFavoriteRepository::new();
    repo.expect_remove()
        .returning(|_, _| Err(AppError::not_found("favorite")));

    let uow = TestUnitOfWork {
        favorites: Some(Arc::new(repo)),
        ..Default::default()
    };
    let service = FavoriteManager::new(Arc::new(uow));

    let err = service.remove(1, 5).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

// =============================================================================
// Brands
// =============================================================================

#[tokio::test]
async fn duplicate_brand_name_conflicts() {
    let mut repo = MockBrandRepository::new();
    repo.expect_create()
        .with(eq("Subaru".to_string()))
        .returning(|_| Err(AppError::conflict("brand name already exists")));

    let uow = TestUnitOfWork {
        brands: Some(Arc::new(repo)),
        ..Default::default()
    };
    let service = BrandManager::new(Arc::new(uow));

    let err = service.create("Subaru".to_string()).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn brand_list_passes_through() {
    let mut repo = MockBrandRepository::new();
    repo.expect_list().returning(|| {
        Ok(vec![
            Brand {
                id: 1,
                name: "Subaru".to_string(),
            },
            Brand {
                id: 2,
                name: "Honda".to_string(),
            },
        ])
    });

    let uow = TestUnitOfWork {
        brands: Some(Arc::new(repo)),
        ..Default::default()
    };
    let service = BrandManager::new(Arc::new(uow));

    let brands = service.list().await.unwrap();
    assert_eq!(brands.len(), 2);
    assert_eq!(brands[0].name, "Subaru");
}

// =============================================================================
// Comments
// =============================================================================

#[tokio::test]
async fn comment_list_embeds_author_summaries() {
    let mut repo = MockCommentRepository::new();
    repo.expect_list_by_review().with(eq(10)).returning(|_| {
        Ok(vec![CommentView {
            id: 1,
            review_id: 10,
            content: "Agreed.".to_string(),
            user: CommentAuthor {
                id: 2,
                username: "bob".to_string(),
            },
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }])
    });

    let uow = TestUnitOfWork {
        comments: Some(Arc::new(repo)),
        ..Default::default()
    };
    let service = CommentManager::new(Arc::new(uow));

    let comments = service.list_by_review(10).await.unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].user.username, "bob");
}

#[tokio::test]
async fn commenting_on_a_missing_review_is_not_found() {
    let mut repo = MockCommentRepository::new();
    repo.expect_create()
        .returning(|_| Err(AppError::not_found("review")));

    let uow = TestUnitOfWork {
        comments: Some(Arc::new(repo)),
        ..Default::default()
    };
    let service = CommentManager::new(Arc::new(uow));

    let err = service
        .create(carview::domain::NewComment {
            user_id: 1,
            review_id: 404,
            content: "Hello?".to_string(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound(ref r) if r == "review"));
}
