use serde::{Deserialize, Serialize};

use crate::entities::{Coordinates, DestinationSet};

/// State of one map session: where the vehicle is and where it is going.
///
/// `sequence` moves forward on every change that invalidates a route being
/// planned, so a plan can check it still belongs to the latest selection.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Session {
    pub origin: Coordinates,
    pub destinations: DestinationSet,
    pub sequence: u64,
}

impl Session {
    pub fn new(origin: Coordinates) -> Self {
        Self {
            origin,
            destinations: DestinationSet::new(),
            sequence: 0,
        }
    }

    pub fn select(&mut self, point: Coordinates) -> u64 {
        self.destinations.select(point);
        self.advance()
    }

    pub fn move_origin(&mut self, origin: Coordinates) -> u64 {
        self.origin = origin;
        self.destinations.clear();
        self.advance()
    }

    pub fn is_current(&self, ticket: u64) -> bool {
        self.sequence == ticket
    }

    fn advance(&mut self) -> u64 {
        self.sequence += 1;
        self.sequence
    }
}

#[test]
fn selection_supersedes_earlier_ticket() {
    let mut session = Session::new(Coordinates::new(-5.93, 54.5958));

    let first = session.select(Coordinates::new(-6.0, 54.6));
    let second = session.select(Coordinates::new(-5.8, 54.5));

    assert!(!session.is_current(first));
    assert!(session.is_current(second));
    assert_eq!(session.destinations.len(), 1);
}

#[test]
fn moving_origin_drops_destinations() {
    let mut session = Session::new(Coordinates::new(-5.93, 54.5958));
    let ticket = session.select(Coordinates::new(-6.0, 54.6));

    session.move_origin(Coordinates::new(10.0, 20.0));

    assert!(session.destinations.is_empty());
    assert!(!session.is_current(ticket));
    assert_eq!(session.origin, Coordinates::new(10.0, 20.0));
}
