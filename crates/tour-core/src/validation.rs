//! Input validation for tour and execution requests.
//!
//! [`Validator`] is stateless and owned by the service that uses it; it turns
//! loosely typed [`crate::params`] into the checked values the repository
//! persists.

use crate::{
    error::{Result, TourError},
    models::{Difficulty, ExecutionStatus, TransportDetail},
    params::{CreateTour, KeyPointInput, TransportInput, UpdateTour},
};

/// Checked content of a tour, ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct TourDraft {
    pub name: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub tags: Vec<String>,
    pub list_price: f64,
    pub transport_details: Vec<TransportDetail>,
    pub key_points: Vec<NewKeyPoint>,
}

/// Checked key point, ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct NewKeyPoint {
    pub name: String,
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
    pub image_url: Option<String>,
    pub order: i64,
}

struct TourFields<'a> {
    name: &'a str,
    description: &'a str,
    difficulty: &'a str,
    tags: &'a [String],
    price: f64,
    transport_details: &'a [TransportInput],
    key_points: &'a [KeyPointInput],
}

/// Stateless request validator.
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator;

impl Validator {
    pub fn new() -> Self {
        Self
    }

    /// Validates a tour creation request.
    pub fn create_tour(&self, params: &CreateTour) -> Result<TourDraft> {
        self.tour_fields(TourFields {
            name: &params.name,
            description: &params.description,
            difficulty: &params.difficulty,
            tags: &params.tags,
            price: params.price,
            transport_details: &params.transport_details,
            key_points: &params.key_points,
        })
    }

    /// Validates a full tour replacement request.
    pub fn update_tour(&self, params: &UpdateTour) -> Result<TourDraft> {
        self.tour_fields(TourFields {
            name: &params.name,
            description: &params.description,
            difficulty: &params.difficulty,
            tags: &params.tags,
            price: params.price,
            transport_details: &params.transport_details,
            key_points: &params.key_points,
        })
    }

    /// Validates a single key point, using `default_order` when the input
    /// carries none.
    pub fn key_point(&self, input: &KeyPointInput, default_order: i64) -> Result<NewKeyPoint> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(TourError::invalid_input("key_points.name").with_reason("cannot be empty"));
        }
        self.position(input.latitude, input.longitude)?;

        Ok(NewKeyPoint {
            name: name.to_string(),
            description: input.description.trim().to_string(),
            latitude: input.latitude,
            longitude: input.longitude,
            image_url: input
                .image_url
                .as_deref()
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .map(String::from),
            order: input.order.unwrap_or(default_order),
        })
    }

    /// Rejects coordinates that are not finite numbers. Ranges are owned by
    /// the upstream format and are not re-checked here.
    pub fn position(&self, latitude: f64, longitude: f64) -> Result<()> {
        if !latitude.is_finite() {
            return Err(TourError::invalid_input("latitude").with_reason("must be a finite number"));
        }
        if !longitude.is_finite() {
            return Err(TourError::invalid_input("longitude").with_reason("must be a finite number"));
        }
        Ok(())
    }

    /// Parses the status an execution is ended with; only terminal statuses
    /// are accepted.
    pub fn end_status(&self, status: &str) -> Result<ExecutionStatus> {
        match status.parse::<ExecutionStatus>() {
            Ok(status) if status.is_terminal() => Ok(status),
            _ => Err(TourError::invalid_input("status")
                .with_reason(format!("'{status}' is not one of completed, abandoned"))),
        }
    }

    fn tour_fields(&self, fields: TourFields<'_>) -> Result<TourDraft> {
        let name = fields.name.trim();
        if name.is_empty() {
            return Err(TourError::invalid_input("name").with_reason("cannot be empty"));
        }

        let difficulty = fields.difficulty.parse::<Difficulty>().map_err(|_| {
            TourError::invalid_input("difficulty").with_reason(format!(
                "'{}' is not one of easy, medium, hard",
                fields.difficulty
            ))
        })?;

        if !fields.price.is_finite() || fields.price < 0.0 {
            return Err(TourError::invalid_input("price").with_reason("must be a non-negative number"));
        }

        let transport_details = fields
            .transport_details
            .iter()
            .map(|input| self.transport(input))
            .collect::<Result<Vec<_>>>()?;

        let key_points = fields
            .key_points
            .iter()
            .enumerate()
            .map(|(index, input)| self.key_point(input, index as i64))
            .collect::<Result<Vec<_>>>()?;

        Ok(TourDraft {
            name: name.to_string(),
            description: fields.description.trim().to_string(),
            difficulty,
            tags: normalize_tags(fields.tags),
            list_price: fields.price,
            transport_details,
            key_points,
        })
    }

    fn transport(&self, input: &TransportInput) -> Result<TransportDetail> {
        let mode = input.transport_type.parse().map_err(|_| {
            TourError::invalid_input("transport_details.transport_type").with_reason(format!(
                "'{}' is not one of walking, biking, driving",
                input.transport_type
            ))
        })?;
        if input.duration == 0 {
            return Err(TourError::invalid_input("transport_details.duration")
                .with_reason("must be greater than zero"));
        }
        Ok(TransportDetail {
            duration_minutes: input.duration,
            mode,
        })
    }
}

/// Trims tags and drops empty ones. Tags are stored comma separated, so
/// commas inside a tag split it.
fn normalize_tags(tags: &[String]) -> Vec<String> {
    tags.iter()
        .flat_map(|tag| tag.split(','))
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransportMode;

    fn create_params() -> CreateTour {
        CreateTour {
            name: "  Fortress walk ".to_string(),
            description: "Around the fortress".to_string(),
            difficulty: "medium".to_string(),
            tags: vec!["history, views".to_string(), " ".to_string()],
            price: 15.0,
            transport_details: vec![TransportInput {
                duration: 45,
                transport_type: "walking".to_string(),
            }],
            key_points: vec![
                KeyPointInput {
                    name: "Gate".to_string(),
                    latitude: 45.25,
                    longitude: 19.86,
                    ..Default::default()
                },
                KeyPointInput {
                    name: "Clock tower".to_string(),
                    latitude: 45.252,
                    longitude: 19.862,
                    order: Some(7),
                    ..Default::default()
                },
            ],
        }
    }

    #[test]
    fn test_create_tour_normalizes_input() {
        let draft = Validator::new().create_tour(&create_params()).unwrap();
        assert_eq!(draft.name, "Fortress walk");
        assert_eq!(draft.difficulty, Difficulty::Medium);
        assert_eq!(draft.tags, vec!["history", "views"]);
        assert_eq!(draft.list_price, 15.0);
        assert_eq!(draft.transport_details[0].mode, TransportMode::Walking);
        assert_eq!(draft.key_points[0].order, 0);
        assert_eq!(draft.key_points[1].order, 7);
    }

    #[test]
    fn test_unknown_difficulty_is_rejected() {
        let mut params = create_params();
        params.difficulty = "extreme".to_string();
        let err = Validator::new().create_tour(&params).unwrap_err();
        assert!(matches!(err, TourError::InvalidInput { ref field, .. } if field == "difficulty"));
    }

    #[test]
    fn test_negative_price_is_rejected() {
        let mut params = create_params();
        params.price = -1.0;
        assert!(Validator::new().create_tour(&params).is_err());
    }

    #[test]
    fn test_blank_key_point_name_is_rejected() {
        let mut params = create_params();
        params.key_points[1].name = " ".to_string();
        let err = Validator::new().create_tour(&params).unwrap_err();
        assert!(matches!(err, TourError::InvalidInput { ref field, .. } if field == "key_points.name"));
    }

    #[test]
    fn test_transport_is_checked() {
        let mut params = create_params();
        params.transport_details[0].transport_type = "sailing".to_string();
        assert!(Validator::new().create_tour(&params).is_err());

        let mut params = create_params();
        params.transport_details[0].duration = 0;
        assert!(Validator::new().create_tour(&params).is_err());
    }

    #[test]
    fn test_end_status_accepts_only_terminal_statuses() {
        let validator = Validator::new();
        assert_eq!(validator.end_status("completed").unwrap(), ExecutionStatus::Completed);
        assert_eq!(validator.end_status("abandoned").unwrap(), ExecutionStatus::Abandoned);
        assert!(validator.end_status("active").is_err());
        assert!(validator.end_status("paused").is_err());
    }

    #[test]
    fn test_position_must_be_finite() {
        let validator = Validator::new();
        assert!(validator.position(45.0, 19.0).is_ok());
        assert!(validator.position(f64::NAN, 19.0).is_err());
        assert!(validator.position(45.0, f64::INFINITY).is_err());
    }
}
