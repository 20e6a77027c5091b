#[cfg(test)]
mod model_tests {
    use jiff::Timestamp;

    use crate::models::{
        Difficulty, ExecutionStatus, KeyPoint, KeyPointCompletion, Tour, TourExecution,
        TourStatus, TransportDetail, TransportMode,
    };

    fn create_test_key_point(id: u64, order: i64) -> KeyPoint {
        KeyPoint {
            id,
            tour_id: 1,
            name: format!("Key point {id}"),
            description: String::new(),
            latitude: 45.0,
            longitude: 19.0,
            image_url: None,
            order,
        }
    }

    fn create_publishable_tour() -> Tour {
        Tour {
            id: 1,
            name: "Old town".to_string(),
            description: "Walk through the old town".to_string(),
            difficulty: Difficulty::Easy,
            tags: vec!["history".to_string()],
            status: TourStatus::Draft,
            price: 0.0,
            list_price: 12.5,
            transport_details: vec![TransportDetail {
                duration_minutes: 90,
                mode: TransportMode::Walking,
            }],
            distance_km: 1.2,
            author: "guide".to_string(),
            key_points: vec![create_test_key_point(1, 0), create_test_key_point(2, 1)],
            created_at: Timestamp::from_second(1640995200).unwrap(),
            updated_at: Timestamp::from_second(1641081600).unwrap(),
        }
    }

    #[test]
    fn test_status_round_trip_through_strings() {
        for status in [TourStatus::Draft, TourStatus::Published, TourStatus::Archived] {
            assert_eq!(status.as_str().parse::<TourStatus>().unwrap(), status);
        }
        assert!("deleted".parse::<TourStatus>().is_err());
        assert_eq!("HARD".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert!("extreme".parse::<Difficulty>().is_err());
        assert!("flying".parse::<TransportMode>().is_err());
    }

    #[test]
    fn test_lifecycle_transitions() {
        assert_eq!(TourStatus::Published.archived(), Some(TourStatus::Archived));
        assert_eq!(TourStatus::Draft.archived(), None);
        assert_eq!(TourStatus::Archived.archived(), None);

        assert_eq!(TourStatus::Archived.unarchived(), Some(TourStatus::Published));
        assert_eq!(TourStatus::Published.unarchived(), None);
        assert_eq!(TourStatus::Draft.unarchived(), None);

        assert!(!TourStatus::Draft.is_executable());
        assert!(TourStatus::Published.is_executable());
        assert!(TourStatus::Archived.is_executable());
    }

    #[test]
    fn test_execution_status_terminality() {
        assert!(!ExecutionStatus::Active.is_terminal());
        assert!(ExecutionStatus::Completed.is_terminal());
        assert!(ExecutionStatus::Abandoned.is_terminal());
    }

    #[test]
    fn test_publishable_tour_has_no_blocker() {
        assert_eq!(create_publishable_tour().publish_blocker(), None);
    }

    #[test]
    fn test_single_key_point_blocks_publication() {
        let mut tour = create_publishable_tour();
        tour.key_points.truncate(1);
        let reason = tour.publish_blocker().expect("one key point is not enough");
        assert!(reason.contains("at least 2 key points"));
    }

    #[test]
    fn test_missing_fields_block_publication() {
        let mut tour = create_publishable_tour();
        tour.description = "   ".to_string();
        assert_eq!(tour.publish_blocker().as_deref(), Some("description is required"));

        let mut tour = create_publishable_tour();
        tour.tags = vec![String::new()];
        assert_eq!(
            tour.publish_blocker().as_deref(),
            Some("at least one tag is required")
        );

        let mut tour = create_publishable_tour();
        tour.transport_details.clear();
        assert_eq!(
            tour.publish_blocker().as_deref(),
            Some("at least one transport detail is required")
        );

        let mut tour = create_publishable_tour();
        tour.status = TourStatus::Archived;
        assert!(tour.publish_blocker().unwrap().contains("archived"));
    }

    #[test]
    fn test_tour_serializes_lowercase_enums() {
        let tour = create_publishable_tour();
        let json = serde_json::to_value(&tour).unwrap();
        assert_eq!(json["status"], "draft");
        assert_eq!(json["difficulty"], "easy");
        assert_eq!(json["transport_details"][0]["mode"], "walking");
        assert_eq!(tour.joined_tags(), "history");
    }

    #[test]
    fn test_execution_tracks_completed_key_points() {
        let now = Timestamp::from_second(1640995200).unwrap();
        let execution = TourExecution {
            id: 4,
            tour_id: 1,
            tourist: "tourist".to_string(),
            status: ExecutionStatus::Active,
            start_latitude: 0.0,
            start_longitude: 0.0,
            start_time: now,
            end_time: None,
            last_activity: now,
            completions: vec![KeyPointCompletion {
                id: 1,
                execution_id: 4,
                key_point_id: 2,
                latitude: 0.0,
                longitude: 0.0,
                completed_at: now,
            }],
        };

        assert!(execution.has_completed(2));
        assert!(!execution.has_completed(1));
    }
}
