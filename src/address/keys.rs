//! Storage key derivation.
//!
//! ```text
//! boss key:        {collection}&{experiment}&{channel}
//! lookup key:      {collection_id}&{experiment_id}&{channel_id}
//! per-sample key:  {boss key}&{resolution}&{time_index}
//! ```

use std::fmt::Display;

use crate::catalog::ResolvedChannel;

use super::coerce::AxisRange;

/// Separator between key components.
pub const KEY_SEPARATOR: &str = "&";

/// Name-based key of a channel.
pub fn boss_key(channel: &ResolvedChannel) -> String {
    join([
        &channel.collection.name,
        &channel.experiment.name,
        &channel.channel.name,
    ])
}

/// Id-based key of a channel.
pub fn lookup_key(channel: &ResolvedChannel) -> String {
    join([
        channel.collection.id,
        channel.experiment.id,
        channel.channel.id,
    ])
}

/// Key for one resolution and time sample.
pub fn sample_key(boss_key: &str, resolution: u32, time_index: u64) -> String {
    format!(
        "{}{sep}{}{sep}{}",
        boss_key,
        resolution,
        time_index,
        sep = KEY_SEPARATOR
    )
}

/// One key per time index in `time`, in increasing order.
pub fn boss_key_list(boss_key: &str, resolution: u32, time: AxisRange) -> Vec<String> {
    time.as_range()
        .map(|t| sample_key(boss_key, resolution, t))
        .collect()
}

fn join<T: Display>(parts: [T; 3]) -> String {
    parts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(KEY_SEPARATOR)
}
