use geo_types::Point;
use serde::{Deserialize, Serialize};

use crate::error::{coordinate_range_error, Error};

/// Bound applied to both components of a user-submitted position.
///
/// Longitude is held to the same range as latitude rather than +/-180.
pub const INPUT_LIMIT: f64 = 90.0;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lng: f64,
    pub lat: f64,
}

impl Coordinates {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// Parses the two free-text form fields into a position, rejecting
    /// anything that is not a number inside [-90, 90].
    pub fn parse_input(longitude: &str, latitude: &str) -> Result<Self, Error> {
        let lng: f64 = longitude
            .trim()
            .parse()
            .map_err(|_| coordinate_range_error())?;
        let lat: f64 = latitude
            .trim()
            .parse()
            .map_err(|_| coordinate_range_error())?;

        let coordinates = Self::new(lng, lat);
        coordinates.check_input_range()?;

        Ok(coordinates)
    }

    pub fn check_input_range(&self) -> Result<(), Error> {
        let within = |value: f64| (-INPUT_LIMIT..=INPUT_LIMIT).contains(&value);

        if within(self.lng) && within(self.lat) {
            Ok(())
        } else {
            Err(coordinate_range_error())
        }
    }
}

impl From<Coordinates> for Point<f64> {
    fn from(coordinates: Coordinates) -> Self {
        Point::new(coordinates.lng, coordinates.lat)
    }
}

impl From<Coordinates> for String {
    fn from(coordinates: Coordinates) -> Self {
        format!("{},{}", coordinates.lat, coordinates.lng)
    }
}

#[test]
fn input_boundary_is_inclusive() {
    assert!(Coordinates::parse_input("90", "54.5958").is_ok());
    assert!(Coordinates::parse_input("-90", "-90").is_ok());
    assert!(Coordinates::parse_input("91", "54.5958").is_err());
    assert!(Coordinates::parse_input("-5.93", "-90.0001").is_err());
}

#[test]
fn input_must_be_numeric() {
    let err = Coordinates::parse_input("west", "54.5958").unwrap_err();
    assert_eq!(err.code, 101);

    assert!(Coordinates::parse_input("", "").is_err());
    assert!(Coordinates::parse_input("NaN", "0").is_err());
    assert!(Coordinates::parse_input("inf", "0").is_err());
}

#[test]
fn input_is_trimmed() {
    let coordinates = Coordinates::parse_input(" -5.93 ", "54.5958\n").unwrap();
    assert_eq!(coordinates, Coordinates::new(-5.93, 54.5958));
}

#[test]
fn point_conversion_keeps_axis_order() {
    let point: Point<f64> = Coordinates::new(-5.93, 54.5958).into();
    assert_eq!(point.x(), -5.93);
    assert_eq!(point.y(), 54.5958);

    let location: String = Coordinates::new(-5.93, 54.5958).into();
    assert_eq!(location, "54.5958,-5.93");
}
