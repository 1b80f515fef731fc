//! reqwest adapter for the fortune service

use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::insight::{InsightAnalyzer, InsightRequest};

use super::locations::{
    CitiesResponse, City, ProvincesResponse, default_cities, default_provinces,
};
use super::{ApiEnvelope, BirthInput, FortuneReport};

#[derive(Debug, Deserialize)]
struct AnalysisData {
    #[serde(default)]
    analysis_text: String,
}

/// Client for the computation, analysis and location endpoints
#[derive(Debug, Clone)]
pub struct FortuneClient {
    http: Client,
    base_url: Url,
}

impl FortuneClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;
        let http = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Base URL with path segments appended (each segment is percent-encoded)
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// `POST /api/calculate`
    pub async fn calculate(&self, input: &BirthInput) -> Result<FortuneReport, ApiError> {
        let url = self.endpoint(&["api", "calculate"])?;
        debug!(%url, nickname = %input.nickname, "requesting fortune report");
        let response = check(self.http.post(url).json(input).send().await?)?;
        response
            .json::<ApiEnvelope<FortuneReport>>()
            .await?
            .into_data()
    }

    /// `POST /api/analyze_year`. An empty text counts as a failure.
    pub async fn analyze_year(&self, request: &InsightRequest) -> Result<String, ApiError> {
        let url = self.endpoint(&["api", "analyze_year"])?;
        debug!(
            %url,
            year = request.target_year,
            dimension = %request.dimension,
            "requesting analysis"
        );
        let response = check(self.http.post(url).json(request).send().await?)?;
        let data = response
            .json::<ApiEnvelope<AnalysisData>>()
            .await?
            .into_data()?;
        if data.analysis_text.is_empty() {
            return Err(ApiError::MissingField("analysis_text"));
        }
        Ok(data.analysis_text)
    }

    /// `GET /api/provinces`
    pub async fn provinces(&self) -> Result<Vec<String>, ApiError> {
        let url = self.endpoint(&["api", "provinces"])?;
        let response = check(self.http.get(url).send().await?)?;
        Ok(response.json::<ProvincesResponse>().await?.provinces)
    }

    /// `GET /api/cities/{province}`
    pub async fn cities(&self, province: &str) -> Result<Vec<City>, ApiError> {
        let url = self.endpoint(&["api", "cities", province])?;
        let response = check(self.http.get(url).send().await?)?;
        Ok(response.json::<CitiesResponse>().await?.cities)
    }

    /// Provinces, or the built-in table when the lookup fails
    pub async fn provinces_or_default(&self) -> Vec<String> {
        match self.provinces().await {
            Ok(provinces) if !provinces.is_empty() => provinces,
            Ok(_) => default_provinces(),
            Err(e) => {
                warn!(error = %e, "province lookup failed, using built-in table");
                default_provinces()
            }
        }
    }

    /// Cities of a province, or the built-in table when the lookup fails
    pub async fn cities_or_default(&self, province: &str) -> Vec<City> {
        match self.cities(province).await {
            Ok(cities) => cities,
            Err(e) => {
                warn!(error = %e, province, "city lookup failed, using built-in table");
                default_cities(province)
            }
        }
    }
}

fn check(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ApiError::Status(status.as_u16()))
    }
}

#[async_trait]
impl InsightAnalyzer for FortuneClient {
    async fn analyze(&self, request: &InsightRequest) -> Result<String, ApiError> {
        self.analyze_year(request).await
    }
}
