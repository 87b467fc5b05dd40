use crate::error::{ClientError, Result, ResultExt, PAYMENT_REQUIRED};
use crate::http::Client;
use crate::models::distribution::DistributionCatalog;

const DISTRIBUTIONS_PATH: &str = "/api/v1/distributions.json";

impl Client {
    /// Fetch the distribution catalog. Not cached.
    pub async fn distributions(&self) -> Result<DistributionCatalog> {
        self.fetch_distributions().await.during("list distributions")
    }

    async fn fetch_distributions(&self) -> Result<DistributionCatalog> {
        let url = self.resolve(DISTRIBUTIONS_PATH)?;
        let response = self.get_json(url, &[PAYMENT_REQUIRED]).await?;
        serde_json::from_slice(&response.body)
            .map_err(|e| ClientError::unmarshal("distributions", e, &response.body))
    }
}
