//! Storage API (`/storage/v1/object`).

use reqwest::Method;
use tracing::instrument;
use url::Url;

use crate::client::SupabaseClient;
use crate::{BackendError, Result};

/// Handle to the storage API, borrowed from a [`SupabaseClient`].
#[derive(Debug, Clone, Copy)]
pub struct StorageApi<'a> {
    client: &'a SupabaseClient,
}

impl<'a> StorageApi<'a> {
    pub(crate) const fn new(client: &'a SupabaseClient) -> Self {
        Self { client }
    }

    /// Upload an object and return its public URL.
    ///
    /// Existing objects at `path` are not overwritten.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the upload (duplicate path,
    /// bucket missing, too large) or the request fails.
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<Url> {
        let url = self.object_url(&[bucket], path)?;
        let request = self
            .client
            .request(Method::POST, url)
            .header("Content-Type", content_type)
            .header("Cache-Control", "max-age=3600")
            .header("x-upsert", "false")
            .body(bytes);

        self.client.send(request).await?;
        self.public_url(bucket, path)
    }

    /// The public URL of an object in a public bucket.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be built.
    pub fn public_url(&self, bucket: &str, path: &str) -> Result<Url> {
        self.object_url(&["public", bucket], path)
    }

    fn object_url(&self, prefix: &[&str], path: &str) -> Result<Url> {
        let mut url = self.client.endpoint("storage/v1/object")?;
        url.path_segments_mut()
            .map_err(|()| BackendError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .extend(prefix)
            .extend(path.split('/').filter(|segment| !segment.is_empty()));
        Ok(url)
    }
}
