use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A row from the `profiles` table. One profile per authenticated user;
/// the id matches the identity provider's subject.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    pub display_name: Option<String>,
    pub role: String,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct BandRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub genre: Option<String>,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AlbumRow {
    pub id: Uuid,
    pub band_id: Uuid,
    pub title: String,
    pub genre: Option<String>,
    pub cover_url: Option<String>,
    pub published: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PlaylistRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
}

/// Playlist plus its track count, for list views.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistSummaryRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub track_count: i64,
}

/// One playlist entry joined with its track, album and band names.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PlaylistTrackRow {
    pub track_id: Uuid,
    pub position: i32,
    pub title: String,
    pub duration_secs: Option<i32>,
    pub album_title: String,
    pub band_name: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SavedAlbumRow {
    pub album_id: Uuid,
    pub title: String,
    pub band_name: String,
    pub cover_url: Option<String>,
    pub saved_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct LikedTrackRow {
    pub track_id: Uuid,
    pub title: String,
    pub album_title: String,
    pub band_name: String,
    pub liked_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct NotificationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: String,
    pub body: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SubscriptionRow {
    pub user_id: Uuid,
    pub billing_customer_id: Option<String>,
    pub billing_subscription_id: Option<String>,
    pub status: String,
    pub current_period_end: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SettingRow {
    pub key: String,
    pub value: String,
    pub description: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// A pending (or reviewed) moderation entry joined with the track and band
/// it concerns, so the queue renders without extra lookups.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ModerationEntryRow {
    pub id: Uuid,
    pub track_id: Uuid,
    pub band_id: Uuid,
    pub submitted_by: Uuid,
    pub status: String,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub track_title: String,
    pub band_name: String,
}

/// Amounts are integer cents; payout periods are whole dates.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PayoutRow {
    pub id: Uuid,
    pub band_id: Uuid,
    pub amount_cents: i64,
    pub status: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub completed_at: Option<DateTime<Utc>>,
    pub band_name: String,
}
