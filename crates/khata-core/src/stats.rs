//! # Dashboard Statistics
//!
//! The dashboard summary and the local-time windows it is computed over.
//!
//! ## Sales Windows
//! ```text
//!   month_start            day_start                  now         day_end
//!   (1st, 00:00 local)     (today, 00:00 local)        │   (tomorrow, 00:00)
//!        │                      │                      │             │
//!  ──────┼──────────────────────┼──────────────────────┼─────────────┼────►
//!        │                      └── today_sales ───────┴─────────────┘
//!        └── monthly_sales (no upper bound) ───────────────────────────────►
//! ```
//!
//! Only `paid` invoices count toward either figure. Windows are computed in
//! the server's local zone and compared against UTC timestamps.

use chrono::{DateTime, Datelike, Days, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InvoiceStatusCounts {
    pub paid: i64,
    pub pending: i64,
    pub overdue: i64,
    pub draft: i64,
}

/// Summary shown on the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DashboardStats {
    /// Paid invoice totals dated today.
    #[ts(type = "string")]
    pub today_sales: Money,
    /// Paid invoice totals dated on or after the 1st of this month.
    #[ts(type = "string")]
    pub monthly_sales: Money,
    pub total_customers: i64,
    pub total_items: i64,
    pub low_stock_count: i64,
    pub invoice_status_counts: InvoiceStatusCounts,
}

/// UTC bounds of the local day and month containing a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SalesWindow {
    pub day_start: DateTime<Utc>,
    pub day_end: DateTime<Utc>,
    pub month_start: DateTime<Utc>,
}

/// Computes the sales windows for `now` in its own time zone.
///
/// A midnight skipped by a DST change resolves to the first valid instant
/// after it.
pub fn sales_window<Tz: TimeZone>(now: &DateTime<Tz>) -> SalesWindow {
    let tz = now.timezone();
    let today = now.date_naive();

    let day_start = local_midnight(&tz, today);
    let day_end = today
        .checked_add_days(Days::new(1))
        .map_or(DateTime::<Utc>::MAX_UTC, |d| local_midnight(&tz, d));
    let month_start = local_midnight(&tz, today.with_day(1).unwrap_or(today));

    SalesWindow {
        day_start,
        day_end,
        month_start,
    }
}

fn local_midnight<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::MIN);
    tz.from_local_datetime(&midnight)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(midnight + Duration::hours(1))).earliest())
        .map_or_else(|| midnight.and_utc(), |t| t.with_timezone(&Utc))
}
