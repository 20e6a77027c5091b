//! Tour execution operations: start, proximity checks and ending.

use tokio::time::timeout;

use super::{GateUnavailablePolicy, TourService};
use crate::{
    collaborators::PurchaseCheck,
    db::UnitOfWork,
    error::{Result, TourError},
    geo,
    models::{ProximityResult, TourExecution},
    params::{EndExecution, Id, Position, StartExecution},
};

/// Loads an execution that belongs to `tourist` and is still active.
fn active_owned_execution(uow: &UnitOfWork<'_>, id: u64, tourist: &str) -> Result<TourExecution> {
    let execution = uow.require_execution(id)?;
    if execution.tourist != tourist {
        return Err(TourError::unauthorized(format!(
            "tour execution {id} belongs to another tourist"
        )));
    }
    if execution.status.is_terminal() {
        return Err(TourError::ExecutionNotActive {
            id,
            status: execution.status,
        });
    }
    Ok(execution)
}

impl TourService {
    /// Starts an execution of a purchased, executable tour.
    ///
    /// Preconditions are checked in order: no execution already active for
    /// the tourist, the tour exists, the tour is published or archived, and
    /// the purchase service confirms the purchase. The insert re-checks the
    /// first precondition under the write lock.
    pub async fn start_execution(
        &self,
        params: &StartExecution,
        tourist: &str,
    ) -> Result<TourExecution> {
        self.validator.position(params.latitude, params.longitude)?;
        let tour_id = params.tour_id;

        let owner = tourist.to_string();
        self.read(move |uow| {
            if uow.active_execution_for(&owner)?.is_some() {
                return Err(TourError::ActiveExecutionExists { tourist: owner });
            }
            let tour = uow.require_tour(tour_id)?;
            if !tour.status.is_executable() {
                return Err(TourError::NotExecutable {
                    id: tour_id,
                    status: tour.status,
                });
            }
            Ok(())
        })
        .await?;

        self.ensure_purchased(tourist, tour_id).await?;

        let owner = tourist.to_string();
        let (latitude, longitude) = (params.latitude, params.longitude);
        let execution = self
            .write(move |uow| {
                if uow.active_execution_for(&owner)?.is_some() {
                    return Err(TourError::ActiveExecutionExists { tourist: owner });
                }
                let tour = uow.require_tour(tour_id)?;
                if !tour.status.is_executable() {
                    return Err(TourError::NotExecutable {
                        id: tour_id,
                        status: tour.status,
                    });
                }
                uow.insert_execution(tour_id, &owner, latitude, longitude)
            })
            .await?;

        log::info!(
            "Started execution {} of tour {tour_id} for '{tourist}'",
            execution.id
        );
        Ok(execution)
    }

    async fn ensure_purchased(&self, tourist: &str, tour_id: u64) -> Result<()> {
        let check = timeout(
            self.config.collaborator_timeout,
            self.purchases.check_purchased(tourist, tour_id),
        )
        .await
        .unwrap_or(PurchaseCheck::GateUnavailable);

        match (check, self.config.gate_unavailable_policy) {
            (PurchaseCheck::Allowed, _) => Ok(()),
            (PurchaseCheck::NotPurchased, _) => Err(TourError::PaymentRequired { tour_id }),
            (PurchaseCheck::GateUnavailable, GateUnavailablePolicy::Allow) => {
                log::warn!(
                    "Purchase service unavailable; starting tour {tour_id} for '{tourist}' unverified"
                );
                Ok(())
            }
            (PurchaseCheck::GateUnavailable, GateUnavailablePolicy::Block) => {
                Err(TourError::dependency_unavailable(
                    "purchase",
                    format!("could not verify purchase of tour {tour_id}"),
                ))
            }
        }
    }

    /// Records a position report and detects the first not yet completed key
    /// point within [`geo::PROXIMITY_THRESHOLD_METERS`].
    ///
    /// Key points are examined in the order they were stored, so when two
    /// are in range the older one wins; the other is picked up by a later
    /// check. At most one completion is recorded per call.
    pub async fn check_proximity(
        &self,
        id: &Id,
        position: Position,
        tourist: &str,
    ) -> Result<ProximityResult> {
        self.validator.position(position.latitude, position.longitude)?;
        let execution_id = id.id;
        let owner = tourist.to_string();

        let result = self
            .write(move |uow| {
                let execution = active_owned_execution(uow, execution_id, &owner)?;
                let last_activity = uow.touch_execution(execution_id)?;

                let reached = uow
                    .key_points_in_storage_order(execution.tour_id)?
                    .into_iter()
                    .filter(|key_point| !execution.has_completed(key_point.id))
                    .find(|key_point| {
                        geo::is_within_proximity(position.latitude, position.longitude, key_point)
                    });

                match reached {
                    Some(key_point) => {
                        let completion = uow.insert_completion(
                            execution_id,
                            key_point.id,
                            position.latitude,
                            position.longitude,
                            last_activity,
                        )?;
                        Ok(ProximityResult::reached(key_point, completion, last_activity))
                    }
                    None => Ok(ProximityResult::nothing_nearby(last_activity)),
                }
            })
            .await?;

        if let Some(key_point) = &result.key_point {
            log::info!(
                "Execution {execution_id} reached key point {} ('{}')",
                key_point.id,
                key_point.name
            );
        } else {
            log::debug!("Execution {execution_id}: no key points nearby");
        }
        Ok(result)
    }

    /// Ends an active execution as completed or abandoned.
    pub async fn end_execution(
        &self,
        id: &Id,
        params: &EndExecution,
        tourist: &str,
    ) -> Result<TourExecution> {
        let validator = self.validator;
        let requested = params.status.clone();
        let execution_id = id.id;
        let owner = tourist.to_string();

        let execution = self
            .write(move |uow| {
                let execution = active_owned_execution(uow, execution_id, &owner)?;
                let status = validator.end_status(&requested)?;
                if !uow.finish_execution(execution_id, status)? {
                    return Err(TourError::ExecutionNotActive {
                        id: execution_id,
                        status: execution.status,
                    });
                }
                uow.require_execution(execution_id)
            })
            .await?;

        log::info!("Execution {execution_id} ended as {}", execution.status);
        Ok(execution)
    }

    /// The tourist's execution in progress.
    pub async fn active_execution(&self, tourist: &str) -> Result<TourExecution> {
        let owner = tourist.to_string();
        self.read(move |uow| {
            uow.active_execution_for(&owner)?
                .ok_or(TourError::NoActiveExecution { tourist: owner })
        })
        .await
    }
}
