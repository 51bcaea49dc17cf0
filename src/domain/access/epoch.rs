//! Serde helpers encoding timestamps as epoch seconds.
//!
//! The persisted documents store instants as JSON numbers. Integers and
//! floats are both accepted on read; writes always emit floats.

use serde::{Deserialize, Deserializer, Serializer};

use crate::domain::foundation::Timestamp;

pub fn serialize<S: Serializer>(ts: &Timestamp, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(ts.as_epoch_secs())
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Timestamp, D::Error> {
    f64::deserialize(deserializer).map(Timestamp::from_epoch_secs)
}

pub mod option {
    use super::*;

    pub fn serialize<S: Serializer>(
        ts: &Option<Timestamp>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match ts {
            Some(ts) => serializer.serialize_some(&ts.as_epoch_secs()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Timestamp>, D::Error> {
        Option::<f64>::deserialize(deserializer).map(|secs| secs.map(Timestamp::from_epoch_secs))
    }
}

pub mod seq {
    use super::*;

    pub fn serialize<S: Serializer>(ts: &[Timestamp], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(ts.iter().map(Timestamp::as_epoch_secs))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<Timestamp>, D::Error> {
        Vec::<f64>::deserialize(deserializer)
            .map(|secs| secs.into_iter().map(Timestamp::from_epoch_secs).collect())
    }
}
