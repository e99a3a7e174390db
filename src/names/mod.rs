// OneHand Name Meaning Provider
// Copyright (c) 2026 Xing_The_Creator | OneHand
//
// Lookup order for a name:
// 1. SQLite cache of earlier LLM answers
// 2. Gemini (only when an API key is configured), cached on success
// 3. Public statistics APIs as a best-effort fallback

pub mod cache;
pub mod countries;
pub mod gemini;
pub mod profile;
pub mod public_apis;

use std::sync::Arc;

use tracing::{error, warn};

use cache::NameCache;
use gemini::GeminiClient;
pub use profile::{
    normalize_name, AnalysisSource, NameAnalysis, NameDetails, NameEstimate, NameProfile,
};
use public_apis::{PublicApiUrls, PublicNameApis};

pub struct NameMeaningProvider {
    cache: Option<Arc<NameCache>>,
    llm: Option<GeminiClient>,
    apis: PublicNameApis,
}

impl NameMeaningProvider {
    pub fn new(cache: Option<Arc<NameCache>>, llm: Option<GeminiClient>, urls: PublicApiUrls) -> Self {
        if llm.is_none() {
            warn!("[NAMES] {} not found. LLM features will be disabled.", gemini::API_KEY_ENV);
        }
        Self {
            cache,
            llm,
            apis: PublicNameApis::new(urls),
        }
    }

    /// Provider wired from the environment: Gemini if a key is set, default public APIs.
    pub fn from_env(cache: Option<Arc<NameCache>>) -> Self {
        Self::new(cache, GeminiClient::from_env(), PublicApiUrls::default())
    }

    pub fn has_llm(&self) -> bool {
        self.llm.is_some()
    }

    pub async fn analyze_name(&self, raw_name: &str) -> NameAnalysis {
        let name = normalize_name(raw_name);

        if let Some(profile) = self.cached(&name).await {
            return NameAnalysis {
                source: AnalysisSource::Cache,
                details: NameDetails::Profile(profile),
            };
        }

        if let Some(llm) = &self.llm {
            match llm.analyze(&name).await {
                Ok(profile) => {
                    self.remember(&name, &profile).await;
                    return NameAnalysis {
                        source: AnalysisSource::Llm,
                        details: NameDetails::Profile(profile),
                    };
                }
                Err(e) => error!("[NAMES] Error processing LLM response for '{}': {}", name, e),
            }
        }

        warn!("[NAMES] Could not fetch data for '{}' from LLM. Falling back to APIs.", name);
        NameAnalysis {
            source: AnalysisSource::PublicApis,
            details: NameDetails::Estimate(self.apis.estimate(&name).await),
        }
    }

    async fn cached(&self, name: &str) -> Option<NameProfile> {
        let cache = self.cache.clone()?;
        let key = name.to_string();

        match tokio::task::spawn_blocking(move || cache.get(&key)).await {
            Ok(Ok(hit)) => hit,
            Ok(Err(e)) => {
                error!("[CACHE] Lookup failed for '{}': {}", name, e);
                None
            }
            Err(e) => {
                error!("[CACHE] Lookup task failed: {}", e);
                None
            }
        }
    }

    async fn remember(&self, name: &str, profile: &NameProfile) {
        let Some(cache) = self.cache.clone() else {
            return;
        };
        let key = name.to_string();
        let profile = profile.clone();

        match tokio::task::spawn_blocking(move || cache.put(&key, &profile)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => error!("[CACHE] Failed to cache data for '{}': {}", name, e),
            Err(e) => error!("[CACHE] Cache write task failed: {}", e),
        }
    }
}
