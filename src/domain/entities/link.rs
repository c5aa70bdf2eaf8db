//! Link entity: a community-submitted website reference.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Moderation state of a submitted link.
///
/// A link starts out `Pending` unless submitted by an administrator, in
/// which case it is created `Approved`. Administrators may move a link
/// between any of the three states; transitions are gated by role, not by
/// the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStatus {
    Pending,
    Approved,
    Rejected,
}

impl LinkStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkStatus::Pending => "pending",
            LinkStatus::Approved => "approved",
            LinkStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LinkStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(LinkStatus::Pending),
            "approved" => Ok(LinkStatus::Approved),
            "rejected" => Ok(LinkStatus::Rejected),
            other => Err(format!("unknown link status: {other}")),
        }
    }
}

/// A submitted link as stored.
///
/// `approved_at`/`approved_by` record the historical approval and are not
/// cleared when a link later leaves the `approved` state.
#[derive(Debug, Clone)]
pub struct Link {
    pub id: i64,
    pub url: String,
    pub title: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub favicon: Option<String>,
    pub category_id: i64,
    pub submitted_by: i64,
    pub status: LinkStatus,
    pub views: i64,
    pub clicks: i64,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
    pub approved_by: Option<i64>,
}

impl Link {
    /// Popularity score used for featured ranking.
    pub fn score(&self) -> i64 {
        self.views + self.clicks
    }
}

/// Input data for creating a new link record.
#[derive(Debug, Clone)]
pub struct NewLink {
    pub url: String,
    pub title: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub favicon: Option<String>,
    pub category_id: i64,
    pub submitted_by: i64,
    pub status: LinkStatus,
    pub tags: Vec<String>,
    pub approved_at: Option<DateTime<Utc>>,
    pub approved_by: Option<i64>,
}

/// Status change applied to an existing link.
///
/// The approval stamp fields are `Some` only when the change enters the
/// `approved` state; `None` leaves whatever is stored untouched.
#[derive(Debug, Clone)]
pub struct StatusChange {
    pub status: LinkStatus,
    pub approved_at: Option<DateTime<Utc>>,
    pub approved_by: Option<i64>,
}

/// Filter for listing links.
#[derive(Debug, Clone)]
pub struct LinkFilter {
    /// Exact status match. Listing always has a status; the public default
    /// is `Approved`.
    pub status: LinkStatus,
    /// Exact category match; `None` means no restriction.
    pub category_id: Option<i64>,
    /// Case-insensitive substring matched against title OR description.
    pub search: Option<String>,
}

impl LinkFilter {
    /// Public listing default: approved links, unrestricted.
    pub fn approved() -> Self {
        Self {
            status: LinkStatus::Approved,
            category_id: None,
            search: None,
        }
    }
}

/// A link joined with its category display fields and submitter name.
///
/// Read-time projection; never stored.
#[derive(Debug, Clone, Serialize)]
pub struct LinkDetails {
    #[serde(flatten)]
    pub link: LinkView,
    pub category: CategoryRef,
    pub submitted_by: SubmitterRef,
}

/// Serializable view of the link's own columns.
#[derive(Debug, Clone, Serialize)]
pub struct LinkView {
    pub id: i64,
    pub url: String,
    pub title: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub favicon: Option<String>,
    pub status: LinkStatus,
    pub views: i64,
    pub clicks: i64,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
    pub approved_by: Option<i64>,
}

/// Category display fields joined onto a link.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryRef {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub icon: Option<String>,
    pub color: String,
}

/// Submitter display fields joined onto a link.
#[derive(Debug, Clone, Serialize)]
pub struct SubmitterRef {
    pub id: i64,
    pub name: String,
}

impl LinkDetails {
    /// Popularity score used for featured ranking.
    pub fn score(&self) -> i64 {
        self.link.views + self.link.clicks
    }
}
