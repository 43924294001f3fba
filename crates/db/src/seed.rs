//! Sample policies and notes for local development.
//!
//! Notes have no HTTP write path, so this is how a fresh database gets
//! something to export.

use chrono::{TimeZone, Utc};
use exporter_core::policy::NewPolicy;
use rust_decimal::Decimal;

use crate::models::note::CreateNote;
use crate::repositories::{NoteRepo, PolicyRepo};
use crate::DbPool;

/// (policy number, premium in cents, start date y/m/d, note texts)
const SAMPLES: [(&str, i64, (i32, u32, u32), &[&str]); 5] = [
    ("HSCX1001", 20_000, (2024, 4, 1), &["Initial note", "Customer called about renewal"]),
    ("HSCX1002", 30_000, (2024, 4, 5), &["Premium adjusted after review"]),
    ("HSCX1003", 15_000, (2024, 4, 10), &[]),
    ("HSCX1004", 45_000, (2024, 5, 1), &["Claim filed", "Claim settled"]),
    ("HSCX1005", 12_500, (2024, 5, 3), &[]),
];

/// Insert the sample policies and their notes if `policies` is empty.
///
/// Returns the number of policies inserted (zero when data already exists).
pub async fn seed_sample_data(pool: &DbPool) -> Result<usize, sqlx::Error> {
    if PolicyRepo::count(pool).await? > 0 {
        tracing::debug!("Policies already present, skipping sample data");
        return Ok(0);
    }

    for (number, cents, (y, m, d), notes) in SAMPLES {
        let start_date = Utc
            .with_ymd_and_hms(y, m, d, 0, 0, 0)
            .single()
            .ok_or_else(|| sqlx::Error::Protocol(format!("invalid sample date {y}-{m}-{d}")))?;

        let policy_id = PolicyRepo::create(
            pool,
            &NewPolicy {
                policy_number: number.to_string(),
                premium: Decimal::new(cents, 2),
                start_date,
            },
        )
        .await?;

        for text in notes {
            NoteRepo::create(
                pool,
                &CreateNote {
                    policy_id,
                    text: (*text).to_string(),
                },
            )
            .await?;
        }
    }

    tracing::info!(count = SAMPLES.len(), "Sample policies seeded");
    Ok(SAMPLES.len())
}
