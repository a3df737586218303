use serde::Serialize;
use time::format_description::well_known::Rfc3339;

use domain::media::MediaAsset;
use domain::user::User;

#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    #[must_use]
    pub fn success_with_data(data: Option<T>) -> Self {
        Self {
            ok: true,
            error: None,
            data,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UserInfoResponse {
    pub id: i64,
    pub external_id: String,
    pub email: String,
    pub display_name: String,
    pub avatar_url: String,
}

impl From<User> for UserInfoResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.as_i64(),
            external_id: user.external_id,
            email: user.email,
            display_name: user.display_name,
            avatar_url: user.avatar_url,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreditsResponse {
    pub credits: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct VideoResponse {
    pub id: i64,
    pub file_name: String,
    pub file_type: String,
    pub file_url: String,
    pub created_at: String,
}

impl From<MediaAsset> for VideoResponse {
    fn from(asset: MediaAsset) -> Self {
        Self {
            id: asset.id.as_i64(),
            created_at: asset
                .created_at
                .format(&Rfc3339)
                .unwrap_or_else(|_| asset.created_at.to_string()),
            file_name: asset.filename,
            file_type: asset.content_type,
            file_url: asset.url,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateVideoResponse {
    pub video_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentAcceptedResponse {
    pub credits_added: i64,
}
