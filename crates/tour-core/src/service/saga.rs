//! The publish saga.
//!
//! Publishing spans two services: the tour flips to `published` locally and
//! a companion post is created on the blog service. There is no distributed
//! transaction, so a failed blog call is compensated by reverting the tour
//! to `draft`:
//!
//! 1. local: check publishability, set `status = published` (commits)
//! 2. remote: create the companion post, bounded by the collaborator timeout
//! 3. on remote failure: revert to draft, retried with backoff
//!
//! The revert reads the current status under the write lock. A tour that was
//! archived while the blog call was in flight is forced back to draft as
//! well, and a tour that is already a draft is left alone, so running it
//! twice is harmless.

use tokio::time::timeout;

use super::{lifecycle::owned_tour, TourService};
use crate::{
    collaborators::CompanionPost,
    error::{Result, TourError},
    models::TourStatus,
    params::Id,
    retry::retry_with_backoff,
};

impl TourService {
    /// Publishes a draft tour and creates its companion blog post.
    ///
    /// # Errors
    ///
    /// `NotPublishable` when a precondition fails, `SagaRollback` when the
    /// blog post failed and the tour is a draft again, `CompensationFailed`
    /// when the tour could not be reverted either.
    pub async fn publish_tour(&self, id: &Id, author: &str) -> Result<()> {
        let tour_id = id.id;
        let owner = author.to_string();

        let post = self
            .write(move |uow| {
                let tour = owned_tour(uow, tour_id, &owner)?;
                if let Some(reason) = tour.publish_blocker() {
                    return Err(TourError::NotPublishable {
                        id: tour_id,
                        reason,
                    });
                }
                if !uow.set_tour_status(tour_id, TourStatus::Draft, TourStatus::Published)? {
                    return Err(TourError::NotPublishable {
                        id: tour_id,
                        reason: "tour is no longer a draft".to_string(),
                    });
                }
                Ok(CompanionPost {
                    title: tour.name.clone(),
                    description: tour.description.clone(),
                    author: tour.author.clone(),
                    tour_id,
                    tags: tour.joined_tags(),
                })
            })
            .await?;
        log::info!("Tour {tour_id} published locally, creating companion post");

        let outcome = timeout(
            self.config.collaborator_timeout,
            self.blog.create_companion_post(&post),
        )
        .await;

        let reason = match outcome {
            Ok(Ok(())) => {
                log::info!("Publish saga for tour {tour_id} completed");
                return Ok(());
            }
            Ok(Err(e)) => e.to_string(),
            Err(_) => format!(
                "blog service did not answer within {:?}",
                self.config.collaborator_timeout
            ),
        };

        log::warn!("Companion post for tour {tour_id} failed ({reason}), reverting to draft");
        self.compensate_publish(tour_id, reason).await
    }

    /// Reverts a tour to draft after a failed companion post. Always returns
    /// an error describing the outcome.
    async fn compensate_publish(&self, tour_id: u64, reason: String) -> Result<()> {
        let reverted = retry_with_backoff(&self.config.compensation_retry, || {
            self.write(move |uow| {
                // Read and write share the write lock, so the update always matches
                let current = uow.require_tour(tour_id)?.status;
                if current != TourStatus::Draft {
                    uow.set_tour_status(tour_id, current, TourStatus::Draft)?;
                }
                Ok(current)
            })
        })
        .await;

        match reverted {
            Ok(previous) => {
                log::info!("Tour {tour_id} reverted to draft (was {previous})");
                Err(TourError::SagaRollback { tour_id, reason })
            }
            Err(e) => {
                log::error!(
                    "Tour {tour_id} left published without a companion post; compensation failed: {e}"
                );
                Err(TourError::CompensationFailed {
                    tour_id,
                    reason: format!("{reason}; revert failed: {e}"),
                })
            }
        }
    }
}
