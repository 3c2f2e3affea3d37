//! Booking workflow service
//!
//! Availability queries and the reservation write. HTTP handlers own the
//! session and response mapping; this layer owns logging and counters.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::domain::{BookingError, DatabaseRepo, DomainResult, Reservation, Room, StayPeriod};

pub struct BookingService {
    repo: Arc<dyn DatabaseRepo>,
}

impl BookingService {
    pub fn new(repo: Arc<dyn DatabaseRepo>) -> Self {
        Self { repo }
    }

    /// Rooms free for the whole of `period`. An empty list is not an error.
    pub async fn available_rooms(&self, period: StayPeriod) -> DomainResult<Vec<Room>> {
        let result = self.repo.search_availability_for_all_rooms(period).await;
        let label = match &result {
            Ok(rooms) if rooms.is_empty() => "empty",
            Ok(_) => "found",
            Err(_) => "error",
        };
        metrics::counter!("bookings_availability_searches_total", "result" => label).increment(1);

        match result {
            Ok(rooms) => {
                info!(
                    start = %period.start(),
                    end = %period.end(),
                    rooms = rooms.len(),
                    "Availability search"
                );
                Ok(rooms)
            }
            Err(e) => {
                error!("Availability search for {:?} failed: {}", period, e);
                Err(e)
            }
        }
    }

    pub async fn room_availability(&self, period: StayPeriod, room_id: i32) -> DomainResult<bool> {
        self.repo
            .search_availability_by_dates_by_room_id(period, room_id)
            .await
            .inspect_err(|e| error!("Availability check for room {} failed: {}", room_id, e))
    }

    pub async fn room(&self, id: i32) -> DomainResult<Room> {
        self.repo
            .get_room_by_id(id)
            .await
            .inspect_err(|e| warn!("Room {} lookup failed: {}", id, e))
    }

    /// Persist the reservation and its date block. Returns the new id.
    pub async fn confirm(&self, reservation: &Reservation) -> Result<i32, BookingError> {
        match self
            .repo
            .insert_reservation_with_restriction(reservation)
            .await
        {
            Ok(id) => {
                metrics::counter!("bookings_reservations_total", "outcome" => "saved")
                    .increment(1);
                info!(
                    reservation_id = id,
                    room_id = reservation.room_id,
                    start = %reservation.start_date,
                    end = %reservation.end_date,
                    "Reservation saved"
                );
                Ok(id)
            }
            Err(e) => {
                let outcome = match &e {
                    BookingError::Reservation(_) => "reservation_failed",
                    BookingError::Restriction { .. } => "restriction_failed",
                };
                metrics::counter!("bookings_reservations_total", "outcome" => outcome)
                    .increment(1);
                if let BookingError::Restriction {
                    orphaned: Some(id), ..
                } = &e
                {
                    warn!("Reservation {} saved without its room restriction", id);
                }
                error!("Booking room {} failed: {}", reservation.room_id, e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::repositories::test_repo::{
        TestDatabaseRepo, FAILING_RESERVATION_ROOM,
    };

    fn service() -> (BookingService, Arc<TestDatabaseRepo>) {
        let repo = Arc::new(TestDatabaseRepo::new());
        (BookingService::new(repo.clone()), repo)
    }

    fn period(s: &str, e: &str) -> StayPeriod {
        StayPeriod::parse(s, e).unwrap()
    }

    #[tokio::test]
    async fn empty_search_is_not_an_error() {
        let (svc, _) = service();
        let rooms = svc
            .available_rooms(period("2050-10-01", "2050-10-02"))
            .await
            .unwrap();
        assert!(rooms.is_empty());
        assert!(svc
            .available_rooms(period("2050-11-11", "2050-11-12"))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn confirm_writes_block_for_saved_reservation() {
        let (svc, repo) = service();
        let reservation = Reservation {
            room_id: 1,
            ..Reservation::pending(period("2050-01-01", "2050-01-02"))
        };
        let id = svc.confirm(&reservation).await.unwrap();
        let blocks = repo.restriction_inserts();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].reservation_id, Some(id));
        assert!(!svc
            .room_availability(period("2050-01-01", "2050-01-02"), 1)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn confirm_stops_after_failed_reservation() {
        let (svc, repo) = service();
        let reservation = Reservation {
            room_id: FAILING_RESERVATION_ROOM,
            ..Reservation::pending(period("2050-01-01", "2050-01-02"))
        };
        assert!(matches!(
            svc.confirm(&reservation).await,
            Err(BookingError::Reservation(_))
        ));
        assert!(repo.restriction_inserts().is_empty());
    }
}
