use serde::{Deserialize, Serialize};

use crate::entities::Coordinates;

/// Pending delivery points. Selecting a point replaces whatever was there.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DestinationSet(Vec<Coordinates>);

impl DestinationSet {
    pub fn new() -> Self {
        Self(vec![])
    }

    pub fn select(&mut self, point: Coordinates) {
        self.0.clear();
        self.0.push(point);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[Coordinates] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<Coordinates> {
        self.0.clone()
    }
}

#[test]
fn select_replaces_previous_point() {
    let mut destinations = DestinationSet::new();

    destinations.select(Coordinates::new(-6.0, 54.6));
    destinations.select(Coordinates::new(-5.8, 54.5));

    assert_eq!(destinations.len(), 1);
    assert_eq!(destinations.as_slice(), &[Coordinates::new(-5.8, 54.5)]);
}
