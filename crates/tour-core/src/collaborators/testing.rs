//! In-memory collaborator doubles for tests.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;

use super::{BlogPublisher, CollaboratorError, CompanionPost, PurchaseCheck, PurchaseGate};

type Hook = Arc<dyn Fn() + Send + Sync>;

/// Records companion posts and fails on demand.
#[derive(Clone, Default)]
pub struct RecordingBlogPublisher {
    posts: Arc<Mutex<Vec<CompanionPost>>>,
    failure: Option<CollaboratorError>,
    delay: Option<Duration>,
    hook: Option<Hook>,
}

impl RecordingBlogPublisher {
    /// A publisher that accepts every post.
    pub fn accepting() -> Self {
        Self::default()
    }

    /// A publisher that rejects every post with a 500.
    pub fn failing() -> Self {
        Self {
            failure: Some(CollaboratorError::Status {
                service: "blog".to_string(),
                status: 500,
            }),
            ..Self::default()
        }
    }

    /// Sleeps before answering, to exercise timeouts.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Runs `hook` inside every call, before answering.
    pub fn with_hook(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.hook = Some(Arc::new(hook));
        self
    }

    /// Every post received so far, including rejected ones.
    pub fn posts(&self) -> Vec<CompanionPost> {
        self.posts.lock().map(|posts| posts.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl BlogPublisher for RecordingBlogPublisher {
    async fn create_companion_post(&self, post: &CompanionPost) -> Result<(), CollaboratorError> {
        if let Ok(mut posts) = self.posts.lock() {
            posts.push(post.clone());
        }
        if let Some(hook) = &self.hook {
            hook();
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

/// Purchase gate answering from an in-memory table.
#[derive(Clone)]
pub struct StaticPurchaseGate {
    purchases: Arc<Mutex<HashMap<(String, u64), PurchaseCheck>>>,
    fallback: PurchaseCheck,
    listing_unavailable: bool,
}

impl StaticPurchaseGate {
    /// A gate where nothing is purchased until [`Self::grant`] is called.
    pub fn new() -> Self {
        Self {
            purchases: Arc::default(),
            fallback: PurchaseCheck::NotPurchased,
            listing_unavailable: false,
        }
    }

    /// A gate that allows every tourist every tour.
    pub fn allow_all() -> Self {
        Self {
            fallback: PurchaseCheck::Allowed,
            ..Self::new()
        }
    }

    /// A gate whose service is down for every request.
    pub fn unavailable() -> Self {
        Self {
            fallback: PurchaseCheck::GateUnavailable,
            listing_unavailable: true,
            ..Self::new()
        }
    }

    /// Marks `tour_id` as purchased by `tourist`.
    pub fn grant(&self, tourist: &str, tour_id: u64) {
        if let Ok(mut purchases) = self.purchases.lock() {
            purchases.insert((tourist.to_string(), tour_id), PurchaseCheck::Allowed);
        }
    }
}

impl Default for StaticPurchaseGate {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PurchaseGate for StaticPurchaseGate {
    async fn check_purchased(&self, tourist: &str, tour_id: u64) -> PurchaseCheck {
        self.purchases
            .lock()
            .ok()
            .and_then(|purchases| purchases.get(&(tourist.to_string(), tour_id)).copied())
            .unwrap_or(self.fallback)
    }

    async fn purchased_tour_ids(&self, tourist: &str) -> Result<Vec<u64>, CollaboratorError> {
        if self.listing_unavailable {
            return Err(CollaboratorError::Transport {
                service: "purchase".to_string(),
                reason: "connection refused".to_string(),
            });
        }
        let mut ids: Vec<u64> = self
            .purchases
            .lock()
            .map(|purchases| {
                purchases
                    .iter()
                    .filter(|((owner, _), check)| {
                        owner == tourist && **check == PurchaseCheck::Allowed
                    })
                    .map(|((_, tour_id), _)| *tour_id)
                    .collect()
            })
            .unwrap_or_default();
        ids.sort_unstable();
        Ok(ids)
    }
}
