use csrd_core::{AppError, AppResult};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

#[cfg(test)]
mod tests;

/// JSON client for a json-server style REST backend.
///
/// Every non-2xx answer becomes [`AppError::Http`] carrying the status code.
#[derive(Debug, Clone)]
pub struct JsonServerClient {
    http_client: reqwest::Client,
    base_url: Url,
}

impl JsonServerClient {
    /// Creates a client rooted at `base_url`.
    #[must_use]
    pub fn new(http_client: reqwest::Client, base_url: Url) -> Self {
        Self {
            http_client,
            base_url,
        }
    }

    /// Builds `base_url/segment/...`, percent-encoding each segment.
    pub fn endpoint(&self, segments: &[&str]) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                AppError::Internal(format!(
                    "backend URL '{}' cannot carry a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Fetches and decodes a resource.
    pub async fn get<T: DeserializeOwned>(&self, url: Url) -> AppResult<T> {
        let response = self.execute(self.http_client.get(url.clone()), &url).await?;
        Self::decode(response, &url).await
    }

    /// Fetches a single resource, mapping 404 to `None`.
    pub async fn find<T: DeserializeOwned>(&self, url: Url) -> AppResult<Option<T>> {
        match self.get(url).await {
            Ok(value) => Ok(Some(value)),
            Err(AppError::Http(status)) if status == StatusCode::NOT_FOUND.as_u16() => Ok(None),
            Err(error) => Err(error),
        }
    }

    /// Sends `body` with `method` and decodes the stored resource.
    pub async fn send<B, T>(&self, method: Method, url: Url, body: &B) -> AppResult<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let request = self.http_client.request(method, url.clone()).json(body);
        let response = self.execute(request, &url).await?;
        Self::decode(response, &url).await
    }

    /// Deletes a resource.
    pub async fn delete(&self, url: Url) -> AppResult<()> {
        self.execute(self.http_client.delete(url.clone()), &url)
            .await
            .map(|_| ())
    }

    async fn execute(
        &self,
        request: reqwest::RequestBuilder,
        url: &Url,
    ) -> AppResult<reqwest::Response> {
        let response = request.send().await.map_err(|error| {
            tracing::error!(%url, error = %error, "backend request failed");
            AppError::Internal(format!("request to '{url}' failed: {error}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%url, status = status.as_u16(), "backend answered with an error status");
            return Err(AppError::Http(status.as_u16()));
        }

        tracing::debug!(%url, status = status.as_u16(), "backend request succeeded");
        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response, url: &Url) -> AppResult<T> {
        response.json::<T>().await.map_err(|error| {
            AppError::Internal(format!("response from '{url}' could not be decoded: {error}"))
        })
    }
}
