use async_trait::async_trait;
use mongodb::bson::Document;

use crate::db::models::Booking;
use crate::error::AppError;

/// Repository trait for booking persistence.
///
/// This trait allows substituting the database layer in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Store a new booking. Bookings are never replaced or merged.
    async fn insert(&self, booking: &Booking) -> Result<(), AppError>;

    /// List every stored booking in the store's natural order.
    async fn list_all(&self) -> Result<Vec<Booking>, AppError>;
}

/// MongoDB implementation of the BookingRepository.
pub struct MongoBookingRepository {
    collection: mongodb::Collection<Booking>,
}

impl MongoBookingRepository {
    pub const COLLECTION: &'static str = "bookings";

    pub fn new(db: &mongodb::Database) -> Self {
        Self {
            collection: db.collection(Self::COLLECTION),
        }
    }

    /// Round-trip a `ping` command to check that the server is reachable.
    pub async fn ping(db: &mongodb::Database) -> Result<(), AppError> {
        use mongodb::bson::doc;

        db.run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}

/// Convert a booking to BSON ahead of the write.
///
/// Payloads BSON cannot represent (e.g. integers above `i64::MAX` inside
/// `flight`) are rejected as validation failures, not store failures.
fn to_bson_document(booking: &Booking) -> Result<Document, AppError> {
    mongodb::bson::to_document(booking)
        .map_err(|e| AppError::Validation(format!("Booking cannot be stored: {e}")))
}

#[async_trait]
impl BookingRepository for MongoBookingRepository {
    async fn insert(&self, booking: &Booking) -> Result<(), AppError> {
        let document = to_bson_document(booking)?;

        self.collection
            .clone_with_type::<Document>()
            .insert_one(document)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Booking>, AppError> {
        use futures::TryStreamExt;
        use mongodb::bson::doc;

        let cursor = self
            .collection
            .find(doc! {})
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        cursor
            .try_collect()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
