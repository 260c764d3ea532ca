//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods.
//! Methods that take part in a commit accept any `PgExecutor`, so they run
//! equally against the pool or inside a transaction.

pub mod booking_session_repo;
pub mod reservation_repo;
pub mod room_repo;
pub mod room_restriction_repo;

pub use booking_session_repo::BookingSessionRepo;
pub use reservation_repo::ReservationRepo;
pub use room_repo::RoomRepo;
pub use room_restriction_repo::RoomRestrictionRepo;
