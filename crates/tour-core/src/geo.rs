//! Great-circle distance calculations.

use crate::models::KeyPoint;

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Radius within which a key point counts as reached.
pub const PROXIMITY_THRESHOLD_METERS: f64 = 1000.0;

/// Great-circle distance in kilometers between two coordinates given in
/// decimal degrees.
pub fn haversine_distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Total length in kilometers of the path through `key_points` taken in
/// `order`. Points sharing an `order` keep their relative input position.
pub fn path_distance_km(key_points: &[KeyPoint]) -> f64 {
    if key_points.len() < 2 {
        return 0.0;
    }

    let mut sorted: Vec<&KeyPoint> = key_points.iter().collect();
    // sort_by_key is stable
    sorted.sort_by_key(|kp| kp.order);

    sorted
        .windows(2)
        .map(|leg| {
            haversine_distance_km(
                leg[0].latitude,
                leg[0].longitude,
                leg[1].latitude,
                leg[1].longitude,
            )
        })
        .sum()
}

/// Whether a position lies within [`PROXIMITY_THRESHOLD_METERS`] of a key
/// point.
pub fn is_within_proximity(latitude: f64, longitude: f64, key_point: &KeyPoint) -> bool {
    let meters =
        haversine_distance_km(latitude, longitude, key_point.latitude, key_point.longitude)
            * 1000.0;
    meters <= PROXIMITY_THRESHOLD_METERS
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_point(id: u64, latitude: f64, longitude: f64, order: i64) -> KeyPoint {
        KeyPoint {
            id,
            tour_id: 1,
            name: format!("kp{id}"),
            description: String::new(),
            latitude,
            longitude,
            image_url: None,
            order,
        }
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        assert_eq!(haversine_distance_km(45.2671, 19.8335, 45.2671, 19.8335), 0.0);
        assert_eq!(haversine_distance_km(0.0, 0.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let there = haversine_distance_km(45.2671, 19.8335, 44.7866, 20.4489);
        let back = haversine_distance_km(44.7866, 20.4489, 45.2671, 19.8335);
        assert!((there - back).abs() < 1e-9);
    }

    #[test]
    fn test_known_distances() {
        // One degree of longitude on the equator
        let one_degree = haversine_distance_km(0.0, 0.0, 0.0, 1.0);
        assert!((one_degree - 111.195).abs() < 0.01, "got {one_degree}");

        // Novi Sad to Belgrade, roughly 70 km
        let cities = haversine_distance_km(45.2671, 19.8335, 44.7866, 20.4489);
        assert!((cities - 70.0).abs() < 3.0, "got {cities}");
    }

    #[test]
    fn test_path_distance_needs_two_points() {
        assert_eq!(path_distance_km(&[]), 0.0);
        assert_eq!(path_distance_km(&[key_point(1, 10.0, 10.0, 0)]), 0.0);
    }

    #[test]
    fn test_path_distance_ignores_input_order() {
        let a = key_point(1, 0.0, 0.0, 0);
        let b = key_point(2, 0.0, 1.0, 1);
        let c = key_point(3, 1.0, 1.0, 2);

        let forward = path_distance_km(&[a.clone(), b.clone(), c.clone()]);
        let shuffled = path_distance_km(&[c, a, b]);
        assert!((forward - shuffled).abs() < 1e-9);
    }

    #[test]
    fn test_path_distance_follows_order_field() {
        let a = key_point(1, 0.0, 0.0, 0);
        let b = key_point(2, 0.0, 1.0, 1);
        let c = key_point(3, 0.0, 2.0, 2);
        let straight = path_distance_km(&[a.clone(), b.clone(), c.clone()]);

        // Visiting the far point before the middle one doubles back
        let zigzag = path_distance_km(&[a, key_point(2, 0.0, 1.0, 2), key_point(3, 0.0, 2.0, 1)]);
        assert!(zigzag > straight);
        assert!((straight - 2.0 * haversine_distance_km(0.0, 0.0, 0.0, 1.0)).abs() < 1e-9);
    }

    #[test]
    fn test_equal_orders_keep_input_sequence() {
        let a = key_point(1, 0.0, 0.0, 0);
        let b = key_point(2, 0.0, 1.0, 0);
        let c = key_point(3, 0.0, 3.0, 0);

        let expected = haversine_distance_km(0.0, 0.0, 0.0, 1.0)
            + haversine_distance_km(0.0, 1.0, 0.0, 3.0);
        assert!((path_distance_km(&[a, b, c]) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_proximity_threshold() {
        let origin = key_point(1, 0.0, 0.0, 0);
        assert!(is_within_proximity(0.0, 0.0, &origin));
        // ~556 m north
        assert!(is_within_proximity(0.005, 0.0, &origin));
        // ~1.1 km east
        assert!(!is_within_proximity(0.0, 0.01, &origin));
    }
}
