//! Field codecs for the persisted record shape.

/// Tag sets travel as one space separated string.
pub(crate) mod tags {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::collections::BTreeSet;

    pub fn serialize<S>(tags: &BTreeSet<String>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let joined = tags.iter().map(String::as_str).collect::<Vec<_>>().join(" ");
        serializer.serialize_str(&joined)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        Ok(raw.split_whitespace().map(str::to_string).collect())
    }
}

/// Durations travel as signed 100ns ticks.
pub(crate) mod ticks {
    use chrono::TimeDelta;
    use serde::{Deserialize, Deserializer, Serializer};

    const NANOS_PER_TICK: i64 = 100;

    pub fn to_ticks(delta: &TimeDelta) -> i64 {
        delta
            .num_nanoseconds()
            .map(|n| n / NANOS_PER_TICK)
            .unwrap_or_else(|| {
                delta
                    .num_microseconds()
                    .unwrap_or(i64::MAX)
                    .saturating_mul(10)
            })
    }

    pub fn from_ticks(ticks: i64) -> TimeDelta {
        TimeDelta::nanoseconds(ticks.saturating_mul(NANOS_PER_TICK))
    }

    pub fn serialize<S>(delta: &TimeDelta, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(to_ticks(delta))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<TimeDelta, D::Error>
    where
        D: Deserializer<'de>,
    {
        i64::deserialize(deserializer).map(from_ticks)
    }
}
