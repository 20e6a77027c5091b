//! Tour authoring and lifecycle operations.

use super::TourService;
use crate::{
    db::UnitOfWork,
    error::{Result, TourError},
    models::{KeyPoint, Tour, TourFilter, TourStatus},
    params::{CreateTour, Id, KeyPointInput, UpdateTour},
};

/// Loads a tour and checks that `author` wrote it.
pub(crate) fn owned_tour(uow: &UnitOfWork<'_>, id: u64, author: &str) -> Result<Tour> {
    let tour = uow.require_tour(id)?;
    if !tour.is_authored_by(author) {
        return Err(TourError::unauthorized(format!(
            "tour {id} belongs to another author"
        )));
    }
    Ok(tour)
}

impl TourService {
    /// Creates a draft tour authored by `author`. The effective price stays 0
    /// until the tour is published.
    pub async fn create_tour(&self, params: &CreateTour, author: &str) -> Result<Tour> {
        let draft = self.validator.create_tour(params)?;
        let author = author.to_string();

        let tour = self
            .write(move |uow| uow.insert_tour(&draft, &author))
            .await?;
        log::info!("Created draft tour {} by '{}'", tour.id, tour.author);
        Ok(tour)
    }

    /// Replaces the content of a draft tour, key points included.
    pub async fn update_tour(&self, id: &Id, params: &UpdateTour, author: &str) -> Result<Tour> {
        let validator = self.validator;
        let params = params.clone();
        let tour_id = id.id;
        let author = author.to_string();

        let tour = self
            .write(move |uow| {
                let tour = owned_tour(uow, tour_id, &author)?;
                if tour.status != TourStatus::Draft {
                    return Err(TourError::NotEditable {
                        id: tour_id,
                        status: tour.status,
                    });
                }
                let draft = validator.update_tour(&params)?;
                uow.replace_tour_content(tour_id, &draft)
            })
            .await?;
        log::info!("Updated tour {tour_id}");
        Ok(tour)
    }

    /// Appends one key point to a draft tour.
    pub async fn add_key_point(
        &self,
        id: &Id,
        input: &KeyPointInput,
        author: &str,
    ) -> Result<KeyPoint> {
        let validator = self.validator;
        let input = input.clone();
        let tour_id = id.id;
        let author = author.to_string();

        self.write(move |uow| {
            let tour = owned_tour(uow, tour_id, &author)?;
            if tour.status != TourStatus::Draft {
                return Err(TourError::NotEditable {
                    id: tour_id,
                    status: tour.status,
                });
            }
            let next_order = uow.next_key_point_order(tour_id)?;
            let key_point = validator.key_point(&input, next_order)?;
            uow.append_key_point(tour_id, &key_point)
        })
        .await
    }

    /// Retrieves a tour with its ordered key points.
    pub async fn get_tour(&self, id: &Id) -> Result<Tour> {
        let tour_id = id.id;
        self.read(move |uow| uow.require_tour(tour_id)).await
    }

    /// Lists the public catalogue.
    pub async fn list_published_tours(&self) -> Result<Vec<Tour>> {
        self.read(|uow| uow.list_tours(&TourFilter::published()))
            .await
    }

    /// Lists every tour written by `author`, in any status.
    pub async fn list_tours_by_author(&self, author: &str) -> Result<Vec<Tour>> {
        let filter = TourFilter::by_author(author);
        self.read(move |uow| uow.list_tours(&filter)).await
    }

    /// Lists the executable tours `tourist` purchased. When the purchase
    /// service cannot be reached the list is empty rather than an error.
    pub async fn list_purchased_tours(&self, tourist: &str) -> Result<Vec<Tour>> {
        let ids = match self.purchases.purchased_tour_ids(tourist).await {
            Ok(ids) => ids,
            Err(e) => {
                log::warn!("Listing purchased tours for '{tourist}' degraded to empty: {e}");
                return Ok(Vec::new());
            }
        };

        let filter = TourFilter::executable_among(ids);
        self.read(move |uow| uow.list_tours(&filter)).await
    }

    /// Withdraws a published tour from the catalogue. Archived tours stay
    /// executable for tourists who bought them.
    pub async fn archive_tour(&self, id: &Id, author: &str) -> Result<()> {
        self.transition(id.id, author, TourStatus::archived, |id, status| {
            TourError::NotArchivable { id, status }
        })
        .await?;
        log::info!("Archived tour {}", id.id);
        Ok(())
    }

    /// Returns an archived tour to the catalogue without re-publishing it.
    pub async fn unarchive_tour(&self, id: &Id, author: &str) -> Result<()> {
        self.transition(id.id, author, TourStatus::unarchived, |id, status| {
            TourError::NotUnarchivable { id, status }
        })
        .await?;
        log::info!("Unarchived tour {}", id.id);
        Ok(())
    }

    async fn transition(
        &self,
        tour_id: u64,
        author: &str,
        target: fn(TourStatus) -> Option<TourStatus>,
        refused: fn(u64, TourStatus) -> TourError,
    ) -> Result<()> {
        let author = author.to_string();
        self.write(move |uow| {
            let tour = owned_tour(uow, tour_id, &author)?;
            let next = target(tour.status).ok_or_else(|| refused(tour_id, tour.status))?;
            if !uow.set_tour_status(tour_id, tour.status, next)? {
                return Err(refused(tour_id, tour.status));
            }
            Ok(())
        })
        .await
    }
}
