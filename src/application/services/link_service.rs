//! Link lifecycle engine: submission, moderation, counters, listing.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::domain::entities::{
    Identity, LinkDetails, LinkFilter, LinkStatus, NewLink, StatusChange,
};
use crate::domain::repositories::{CategoryRepository, LinkRepository};
use crate::error::AppError;
use crate::utils::url::parse_absolute;

/// A link submission as received from a caller.
///
/// Required fields are optional here so the service can report exactly
/// which one is missing, in the contract order url, title, category.
#[derive(Debug, Clone, Default)]
pub struct SubmitLink {
    pub url: Option<String>,
    pub title: Option<String>,
    pub category_id: Option<i64>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub favicon: Option<String>,
    pub tags: Vec<String>,
}

/// Service owning the link state machine, analytics counters, and listing.
///
/// All role gating lives here: handlers authenticate callers, this service
/// decides what a role may do.
pub struct LinkService {
    links: Arc<dyn LinkRepository>,
    categories: Arc<dyn CategoryRepository>,
}

impl LinkService {
    /// Creates a new link service.
    pub fn new(links: Arc<dyn LinkRepository>, categories: Arc<dyn CategoryRepository>) -> Self {
        Self { links, categories }
    }

    /// Submits a new link on behalf of `actor`.
    ///
    /// Required fields are checked in order url, title, category; the first
    /// missing one is reported. An admin submission is created `approved`
    /// with the approval stamp set to the actor; everyone else starts
    /// `pending`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for a missing field or an invalid
    /// URL, [`AppError::NotFound`] for an unknown category.
    pub async fn submit(
        &self,
        submission: SubmitLink,
        actor: &Identity,
    ) -> Result<LinkDetails, AppError> {
        let url = submission
            .url
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AppError::missing_field("url"))?;
        let title = submission
            .title
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AppError::missing_field("title"))?;
        let category_id = submission
            .category_id
            .ok_or_else(|| AppError::missing_field("category"))?;

        parse_absolute(&url)?;

        if self.categories.find_by_id(category_id).await?.is_none() {
            return Err(AppError::not_found(
                "Category not found",
                json!({ "category_id": category_id }),
            ));
        }

        let (status, approved_at, approved_by) = if actor.is_admin() {
            (LinkStatus::Approved, Some(Utc::now()), Some(actor.id))
        } else {
            (LinkStatus::Pending, None, None)
        };

        let new_link = NewLink {
            url,
            title,
            description: submission.description,
            image: submission.image,
            favicon: submission.favicon,
            category_id,
            submitted_by: actor.id,
            status,
            tags: submission.tags,
            approved_at,
            approved_by,
        };

        self.links.insert(new_link).await
    }

    /// Moves a link to `new_status`.
    ///
    /// Administrator-gated, not state-gated: an admin may move a link
    /// between any of the three states. Entering `approved` stamps
    /// `approved_at` (the caller may supply an explicit timestamp) and
    /// `approved_by`; leaving `approved` keeps both stamps as the audit
    /// trail of the historical approval.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Forbidden`] for non-admin callers (the link is
    /// left untouched) and [`AppError::NotFound`] for an unknown id.
    pub async fn transition(
        &self,
        link_id: i64,
        new_status: LinkStatus,
        approved_at: Option<DateTime<Utc>>,
        actor: &Identity,
    ) -> Result<LinkDetails, AppError> {
        self.require_admin(actor)?;

        let change = if new_status == LinkStatus::Approved {
            StatusChange {
                status: new_status,
                approved_at: Some(approved_at.unwrap_or_else(Utc::now)),
                approved_by: Some(actor.id),
            }
        } else {
            StatusChange {
                status: new_status,
                approved_at: None,
                approved_by: None,
            }
        };

        self.links
            .set_status(link_id, change)
            .await?
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "id": link_id })))
    }

    /// Records one view, returning the new view count.
    ///
    /// The increment is executed atomically by the store; concurrent calls
    /// all land. The engine performs no call deduplication — suppressing
    /// repeat views within a session is the consumer's concern.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for an unknown id.
    pub async fn record_view(&self, link_id: i64) -> Result<i64, AppError> {
        self.links
            .increment_views(link_id)
            .await?
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "id": link_id })))
    }

    /// Records one click, returning the new click count.
    ///
    /// Same contract as [`Self::record_view`], independent counter.
    pub async fn record_click(&self, link_id: i64) -> Result<i64, AppError> {
        self.links
            .increment_clicks(link_id)
            .await?
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "id": link_id })))
    }

    /// Hard-deletes a link regardless of status.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Forbidden`] for non-admin callers and
    /// [`AppError::NotFound`] if the link is already gone (which happens
    /// legitimately when another administrator deleted it first).
    pub async fn delete(&self, link_id: i64, actor: &Identity) -> Result<(), AppError> {
        self.require_admin(actor)?;

        if !self.links.delete(link_id).await? {
            return Err(AppError::not_found(
                "Link not found",
                json!({ "id": link_id }),
            ));
        }

        Ok(())
    }

    /// Lists links, newest first, joined with category and submitter.
    ///
    /// `status` defaults to `approved` — the public listing default; only
    /// an explicit request sees `pending` or `rejected`. `category_id` and
    /// `search` restrict further when present.
    pub async fn list(
        &self,
        status: Option<LinkStatus>,
        category_id: Option<i64>,
        search: Option<String>,
    ) -> Result<Vec<LinkDetails>, AppError> {
        let filter = LinkFilter {
            status: status.unwrap_or(LinkStatus::Approved),
            category_id,
            search: search.filter(|s| !s.is_empty()),
        };

        self.links.list(filter).await
    }

    /// Returns the top `limit` approved links by popularity.
    ///
    /// Popularity is `views + clicks`, descending; ties keep the listing
    /// order (newest first), which a stable sort preserves.
    pub async fn featured(&self, limit: usize) -> Result<Vec<LinkDetails>, AppError> {
        let mut links = self.links.list(LinkFilter::approved()).await?;

        links.sort_by_key(|l| std::cmp::Reverse(l.score()));
        links.truncate(limit);

        Ok(links)
    }

    fn require_admin(&self, actor: &Identity) -> Result<(), AppError> {
        if actor.is_admin() {
            Ok(())
        } else {
            Err(AppError::forbidden(
                "Admin role required",
                json!({ "role": actor.role }),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Category, CategoryRef, LinkView, Role, SubmitterRef};
    use crate::domain::repositories::{MockCategoryRepository, MockLinkRepository};

    fn admin() -> Identity {
        Identity {
            id: 1,
            name: "Ada".to_string(),
            role: Role::Admin,
        }
    }

    fn member() -> Identity {
        Identity {
            id: 2,
            name: "Bob".to_string(),
            role: Role::User,
        }
    }

    fn test_category(id: i64) -> Category {
        Category {
            id,
            name: "Tools".to_string(),
            slug: "tools".to_string(),
            description: None,
            icon: None,
            color: "#3b82f6".to_string(),
            created_at: Utc::now(),
        }
    }

    fn details_from(new_link: &NewLink, id: i64) -> LinkDetails {
        LinkDetails {
            link: LinkView {
                id,
                url: new_link.url.clone(),
                title: new_link.title.clone(),
                description: new_link.description.clone(),
                image: new_link.image.clone(),
                favicon: new_link.favicon.clone(),
                status: new_link.status,
                views: 0,
                clicks: 0,
                tags: new_link.tags.clone(),
                created_at: Utc::now(),
                approved_at: new_link.approved_at,
                approved_by: new_link.approved_by,
            },
            category: CategoryRef {
                id: new_link.category_id,
                name: "Tools".to_string(),
                slug: "tools".to_string(),
                icon: None,
                color: "#3b82f6".to_string(),
            },
            submitted_by: SubmitterRef {
                id: new_link.submitted_by,
                name: "someone".to_string(),
            },
        }
    }

    fn details_with_counters(id: i64, views: i64, clicks: i64) -> LinkDetails {
        LinkDetails {
            link: LinkView {
                id,
                url: format!("https://example.com/{id}"),
                title: format!("Link {id}"),
                description: None,
                image: None,
                favicon: None,
                status: LinkStatus::Approved,
                views,
                clicks,
                tags: vec![],
                created_at: Utc::now(),
                approved_at: None,
                approved_by: None,
            },
            category: CategoryRef {
                id: 1,
                name: "Tools".to_string(),
                slug: "tools".to_string(),
                icon: None,
                color: "#3b82f6".to_string(),
            },
            submitted_by: SubmitterRef {
                id: 2,
                name: "someone".to_string(),
            },
        }
    }

    fn valid_submission() -> SubmitLink {
        SubmitLink {
            url: Some("https://example.com".to_string()),
            title: Some("Example".to_string()),
            category_id: Some(1),
            ..Default::default()
        }
    }

    fn service(links: MockLinkRepository, categories: MockCategoryRepository) -> LinkService {
        LinkService::new(Arc::new(links), Arc::new(categories))
    }

    #[tokio::test]
    async fn test_submit_by_member_is_pending_without_stamps() {
        let mut links = MockLinkRepository::new();
        let mut categories = MockCategoryRepository::new();

        categories
            .expect_find_by_id()
            .returning(|id| Ok(Some(test_category(id))));

        links
            .expect_insert()
            .withf(|n| {
                n.status == LinkStatus::Pending
                    && n.approved_at.is_none()
                    && n.approved_by.is_none()
                    && n.submitted_by == 2
            })
            .times(1)
            .returning(|n| Ok(details_from(&n, 10)));

        let result = service(links, categories)
            .submit(valid_submission(), &member())
            .await
            .unwrap();

        assert_eq!(result.link.status, LinkStatus::Pending);
        assert!(result.link.approved_at.is_none());
    }

    #[tokio::test]
    async fn test_submit_by_admin_is_approved_with_stamps() {
        let mut links = MockLinkRepository::new();
        let mut categories = MockCategoryRepository::new();

        categories
            .expect_find_by_id()
            .returning(|id| Ok(Some(test_category(id))));

        links
            .expect_insert()
            .withf(|n| {
                n.status == LinkStatus::Approved
                    && n.approved_at.is_some()
                    && n.approved_by == Some(1)
            })
            .times(1)
            .returning(|n| Ok(details_from(&n, 10)));

        let result = service(links, categories)
            .submit(valid_submission(), &admin())
            .await
            .unwrap();

        assert_eq!(result.link.status, LinkStatus::Approved);
        assert_eq!(result.link.approved_by, Some(1));
    }

    #[tokio::test]
    async fn test_submit_reports_first_missing_field_in_order() {
        let cases = [
            (
                SubmitLink {
                    url: None,
                    title: None,
                    category_id: None,
                    ..Default::default()
                },
                "url",
            ),
            (
                SubmitLink {
                    url: Some("https://example.com".to_string()),
                    title: None,
                    category_id: None,
                    ..Default::default()
                },
                "title",
            ),
            (
                SubmitLink {
                    url: Some("https://example.com".to_string()),
                    title: Some("Example".to_string()),
                    category_id: None,
                    ..Default::default()
                },
                "category",
            ),
        ];

        for (submission, expected_field) in cases {
            let svc = service(MockLinkRepository::new(), MockCategoryRepository::new());
            let err = svc.submit(submission, &member()).await.unwrap_err();

            match err {
                AppError::Validation { details, .. } => {
                    assert_eq!(details["field"], expected_field);
                }
                other => panic!("expected validation error, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_submit_empty_url_counts_as_missing() {
        let svc = service(MockLinkRepository::new(), MockCategoryRepository::new());

        let err = svc
            .submit(
                SubmitLink {
                    url: Some(String::new()),
                    title: Some("Example".to_string()),
                    category_id: Some(1),
                    ..Default::default()
                },
                &member(),
            )
            .await
            .unwrap_err();

        match err {
            AppError::Validation { details, .. } => assert_eq!(details["field"], "url"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_submit_rejects_invalid_url_without_category_lookup() {
        let mut categories = MockCategoryRepository::new();
        categories.expect_find_by_id().times(0);

        let svc = service(MockLinkRepository::new(), categories);

        let err = svc
            .submit(
                SubmitLink {
                    url: Some("not-a-url".to_string()),
                    title: Some("Example".to_string()),
                    category_id: Some(1),
                    ..Default::default()
                },
                &member(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_submit_unknown_category() {
        let mut categories = MockCategoryRepository::new();
        categories.expect_find_by_id().returning(|_| Ok(None));

        let svc = service(MockLinkRepository::new(), categories);

        let err = svc
            .submit(valid_submission(), &member())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_transition_by_member_is_forbidden_and_untouched() {
        let mut links = MockLinkRepository::new();
        links.expect_set_status().times(0);

        let svc = service(links, MockCategoryRepository::new());

        let err = svc
            .transition(10, LinkStatus::Approved, None, &member())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Forbidden { .. }));
    }

    #[tokio::test]
    async fn test_transition_to_approved_stamps_actor_and_time() {
        let mut links = MockLinkRepository::new();

        links
            .expect_set_status()
            .withf(|id, change| {
                *id == 10
                    && change.status == LinkStatus::Approved
                    && change.approved_at.is_some()
                    && change.approved_by == Some(1)
            })
            .times(1)
            .returning(|id, _| Ok(Some(details_with_counters(id, 0, 0))));

        let svc = service(links, MockCategoryRepository::new());

        svc.transition(10, LinkStatus::Approved, None, &admin())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_transition_honors_explicit_approval_timestamp() {
        let supplied = Utc::now() - chrono::Duration::days(3);
        let expected = supplied;

        let mut links = MockLinkRepository::new();
        links
            .expect_set_status()
            .withf(move |_, change| change.approved_at == Some(expected))
            .times(1)
            .returning(|id, _| Ok(Some(details_with_counters(id, 0, 0))));

        let svc = service(links, MockCategoryRepository::new());

        svc.transition(10, LinkStatus::Approved, Some(supplied), &admin())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_transition_away_from_approved_keeps_stamps() {
        // The change must not carry stamp values, so the store leaves the
        // historical approval in place.
        let mut links = MockLinkRepository::new();
        links
            .expect_set_status()
            .withf(|_, change| {
                change.status == LinkStatus::Rejected
                    && change.approved_at.is_none()
                    && change.approved_by.is_none()
            })
            .times(1)
            .returning(|id, _| Ok(Some(details_with_counters(id, 0, 0))));

        let svc = service(links, MockCategoryRepository::new());

        svc.transition(10, LinkStatus::Rejected, None, &admin())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_transition_unknown_link() {
        let mut links = MockLinkRepository::new();
        links.expect_set_status().returning(|_, _| Ok(None));

        let svc = service(links, MockCategoryRepository::new());

        let err = svc
            .transition(404, LinkStatus::Approved, None, &admin())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_record_view_returns_new_count() {
        let mut links = MockLinkRepository::new();
        links
            .expect_increment_views()
            .with(mockall::predicate::eq(10))
            .times(1)
            .returning(|_| Ok(Some(42)));

        let svc = service(links, MockCategoryRepository::new());

        assert_eq!(svc.record_view(10).await.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_record_click_unknown_link() {
        let mut links = MockLinkRepository::new();
        links.expect_increment_clicks().returning(|_| Ok(None));

        let svc = service(links, MockCategoryRepository::new());

        assert!(matches!(
            svc.record_click(404).await.unwrap_err(),
            AppError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_delete_requires_admin() {
        let mut links = MockLinkRepository::new();
        links.expect_delete().times(0);

        let svc = service(links, MockCategoryRepository::new());

        assert!(matches!(
            svc.delete(10, &member()).await.unwrap_err(),
            AppError::Forbidden { .. }
        ));
    }

    #[tokio::test]
    async fn test_delete_already_gone() {
        let mut links = MockLinkRepository::new();
        links.expect_delete().returning(|_| Ok(false));

        let svc = service(links, MockCategoryRepository::new());

        assert!(matches!(
            svc.delete(10, &admin()).await.unwrap_err(),
            AppError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_list_defaults_to_approved() {
        let mut links = MockLinkRepository::new();
        links
            .expect_list()
            .withf(|filter| {
                filter.status == LinkStatus::Approved
                    && filter.category_id.is_none()
                    && filter.search.is_none()
            })
            .times(1)
            .returning(|_| Ok(vec![]));

        let svc = service(links, MockCategoryRepository::new());

        svc.list(None, None, None).await.unwrap();
    }

    #[tokio::test]
    async fn test_list_blank_search_is_dropped() {
        let mut links = MockLinkRepository::new();
        links
            .expect_list()
            .withf(|filter| filter.search.is_none())
            .times(1)
            .returning(|_| Ok(vec![]));

        let svc = service(links, MockCategoryRepository::new());

        svc.list(Some(LinkStatus::Pending), None, Some(String::new()))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_featured_ranks_by_score_with_stable_ties() {
        let mut links = MockLinkRepository::new();
        links.expect_list().returning(|_| {
            Ok(vec![
                details_with_counters(1, 10, 5), // score 15
                details_with_counters(2, 1, 1),  // score 2
                details_with_counters(3, 0, 20), // score 20
            ])
        });

        let svc = service(links, MockCategoryRepository::new());

        let featured = svc.featured(2).await.unwrap();
        let ids: Vec<i64> = featured.iter().map(|l| l.link.id).collect();

        assert_eq!(ids, vec![3, 1]);
    }

    #[tokio::test]
    async fn test_featured_ties_keep_listing_order() {
        let mut links = MockLinkRepository::new();
        links.expect_list().returning(|_| {
            Ok(vec![
                details_with_counters(1, 5, 5),
                details_with_counters(2, 10, 0),
                details_with_counters(3, 0, 10),
            ])
        });

        let svc = service(links, MockCategoryRepository::new());

        let featured = svc.featured(3).await.unwrap();
        let ids: Vec<i64> = featured.iter().map(|l| l.link.id).collect();

        // All scores equal: stable sort keeps the original order.
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
