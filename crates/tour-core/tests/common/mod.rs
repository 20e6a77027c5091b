use std::time::Duration;

use tempfile::TempDir;
use tour_core::{
    CreateTour, KeyPointInput, RetryPolicy, TourService, TourServiceBuilder, TransportInput,
};

/// Helper function to create a service wired to HTTP collaborators at the
/// given base URLs
pub async fn create_test_service(blog_url: &str, purchase_url: &str) -> (TempDir, TourService) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let service = TourServiceBuilder::new()
        .with_database_path(Some(&db_path))
        .with_blog_url(blog_url)
        .with_purchase_url(purchase_url)
        .with_collaborator_timeout(Duration::from_millis(500))
        .with_compensation_retry(RetryPolicy {
            max_retries: 1,
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(5),
            multiplier: 2.0,
        })
        .build()
        .await
        .expect("Failed to create service");
    (temp_dir, service)
}

/// A tour that satisfies every publication precondition
#[allow(dead_code)]
pub fn publishable_tour() -> CreateTour {
    CreateTour {
        name: "Novi Sad highlights".to_string(),
        description: "Square, cathedral and the fortress".to_string(),
        difficulty: "medium".to_string(),
        tags: vec!["city".to_string(), "history".to_string()],
        price: 12.5,
        transport_details: vec![TransportInput {
            duration: 120,
            transport_type: "walking".to_string(),
        }],
        key_points: vec![
            KeyPointInput {
                name: "Freedom square".to_string(),
                latitude: 45.2551,
                longitude: 19.8450,
                ..Default::default()
            },
            KeyPointInput {
                name: "Petrovaradin fortress".to_string(),
                latitude: 45.2517,
                longitude: 19.8625,
                ..Default::default()
            },
        ],
    }
}
