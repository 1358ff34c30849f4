use chrono::{DateTime, FixedOffset, SubsecRound, Utc};

/// Current time truncated to microseconds, the precision a Postgres
/// `TIMESTAMPTZ` column keeps. Values handed back to callers before a
/// round trip through the database must already match what is stored.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

pub fn utc_to_fixed_offset(utc_dt: &DateTime<Utc>) -> DateTime<FixedOffset> {
    utc_dt.fixed_offset()
}

pub fn fixed_offset_to_utc(dt: DateTime<FixedOffset>) -> DateTime<Utc> {
    dt.with_timezone(&Utc)
}
