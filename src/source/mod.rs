//! External ticket-store boundary.
//!
//! The engine itself is purely computational; the only I/O is a single
//! awaited fetch that yields a complete in-memory batch before aggregation
//! begins. Store failures surface as [`Error::Upstream`] unchanged; the
//! engine performs no retry and attaches no extra context.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::aggregate::{DailyTicketStat, TicketRecord};
use crate::core::error::Result;

/// Query interface the analytics engine consumes.
///
/// Implementations live in the application layer (SQL store, API client,
/// in-memory fixtures for tests).
#[async_trait]
pub trait TicketStore: Send + Sync {
    /// All ticket rows in the optional `[start, end]` window.
    async fn fetch_tickets(
        &self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Vec<TicketRecord>>;

    /// Ticket rows restricted by the store's payment-status predicate.
    async fn fetch_paid_tickets(
        &self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Vec<TicketRecord>>;

    /// Pre-aggregated daily rollup rows for the coarser re-aggregation path.
    async fn fetch_daily_stats(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<DailyTicketStat>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::Error;

    struct FailingStore;

    #[async_trait]
    impl TicketStore for FailingStore {
        async fn fetch_tickets(
            &self,
            _start: Option<DateTime<Utc>>,
            _end: Option<DateTime<Utc>>,
        ) -> Result<Vec<TicketRecord>> {
            Err(Error::Upstream("connection refused".to_string()))
        }

        async fn fetch_paid_tickets(
            &self,
            start: Option<DateTime<Utc>>,
            end: Option<DateTime<Utc>>,
        ) -> Result<Vec<TicketRecord>> {
            self.fetch_tickets(start, end).await
        }

        async fn fetch_daily_stats(
            &self,
            _start: Option<NaiveDate>,
            _end: Option<NaiveDate>,
        ) -> Result<Vec<DailyTicketStat>> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_upstream_error_propagates_unchanged() {
        let store = FailingStore;
        match store.fetch_tickets(None, None).await {
            Err(Error::Upstream(message)) => assert_eq!(message, "connection refused"),
            other => panic!("expected upstream error, got {other:?}"),
        }
    }
}
