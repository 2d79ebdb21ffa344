use async_trait::async_trait;
use shared::ApiResponse;
use urlencoding::encode;
use shared::quote::{
    CreateDraftRequest, CreateDraftResponse, DraftPatch, QuoteDraft, SubmitDraftResponse, TripType,
};

use super::DraftGateway;
use crate::http::{HttpClient, NetworkHttpClient};
use crate::{ClientConfig, ClientResult};

const DRAFTS_PATH: &str = "api/quotes/drafts";

/// Draft gateway backed by the quote REST API
#[derive(Debug, Clone)]
pub struct HttpDraftGateway<H: HttpClient = NetworkHttpClient> {
    http: H,
}

impl HttpDraftGateway<NetworkHttpClient> {
    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        Ok(Self::new(NetworkHttpClient::new(config)?))
    }
}

impl<H: HttpClient> HttpDraftGateway<H> {
    pub fn new(http: H) -> Self {
        Self { http }
    }

    fn draft_path(quote_id: &str) -> String {
        format!("{}/{}", DRAFTS_PATH, encode(quote_id))
    }
}

#[async_trait]
impl<H: HttpClient + 'static> DraftGateway for HttpDraftGateway<H> {
    async fn create(&self, trip_type: TripType) -> ClientResult<CreateDraftResponse> {
        let body = CreateDraftRequest { trip_type };
        let resp: ApiResponse<CreateDraftResponse> = self.http.post(DRAFTS_PATH, &body).await?;
        Ok(resp.into_data()?)
    }

    async fn update(&self, quote_id: &str, patch: &DraftPatch) -> ClientResult<QuoteDraft> {
        let resp: ApiResponse<QuoteDraft> =
            self.http.patch(&Self::draft_path(quote_id), patch).await?;
        Ok(resp.into_data()?)
    }

    async fn fetch(&self, quote_id: &str) -> ClientResult<QuoteDraft> {
        let resp: ApiResponse<QuoteDraft> = self.http.get(&Self::draft_path(quote_id)).await?;
        Ok(resp.into_data()?)
    }

    async fn delete(&self, quote_id: &str) -> ClientResult<()> {
        let resp: ApiResponse<serde_json::Value> =
            self.http.delete(&Self::draft_path(quote_id)).await?;
        Ok(resp.into_unit()?)
    }

    async fn submit(&self, quote_id: &str) -> ClientResult<SubmitDraftResponse> {
        let path = format!("{}/submit", Self::draft_path(quote_id));
        let resp: ApiResponse<SubmitDraftResponse> = self.http.post_empty(&path).await?;
        Ok(resp.into_data()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_path() {
        assert_eq!(
            HttpDraftGateway::<NetworkHttpClient>::draft_path("q-42"),
            "api/quotes/drafts/q-42"
        );
    }

    #[test]
    fn test_draft_path_escapes_id() {
        assert_eq!(
            HttpDraftGateway::<NetworkHttpClient>::draft_path("a/b c"),
            "api/quotes/drafts/a%2Fb%20c"
        );
    }

    #[test]
    fn test_from_config() {
        let gateway = HttpDraftGateway::from_config(&ClientConfig::default());
        assert!(gateway.is_ok());
    }
}
