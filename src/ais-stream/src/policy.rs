use std::time::Duration;

use backon::{Backoff, BackoffBuilder, ConstantBuilder, ExponentialBuilder};
use serde::Deserialize;

pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum ReconnectSettings {
    Fixed {
        #[serde(with = "humantime_serde")]
        delay: Duration,
    },
    Exponential {
        #[serde(with = "humantime_serde")]
        min_delay: Duration,
        #[serde(with = "humantime_serde")]
        max_delay: Duration,
        #[serde(default)]
        jitter: bool,
    },
}

/// Produces the delay before each reconnect attempt. Never gives up.
pub struct ReconnectPolicy {
    settings: ReconnectSettings,
    backoff: Box<dyn Backoff>,
}

impl Default for ReconnectSettings {
    fn default() -> Self {
        ReconnectSettings::Fixed {
            delay: DEFAULT_RECONNECT_DELAY,
        }
    }
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self::new(ReconnectSettings::default())
    }
}

impl std::fmt::Debug for ReconnectPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReconnectPolicy")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl ReconnectPolicy {
    pub fn new(settings: ReconnectSettings) -> Self {
        Self {
            backoff: build(&settings),
            settings,
        }
    }

    pub fn fixed(delay: Duration) -> Self {
        Self::new(ReconnectSettings::Fixed { delay })
    }

    pub fn settings(&self) -> &ReconnectSettings {
        &self.settings
    }

    pub fn next_delay(&mut self) -> Duration {
        if let Some(delay) = self.backoff.next() {
            return delay;
        }
        self.reset();
        self.backoff.next().unwrap_or(match self.settings {
            ReconnectSettings::Fixed { delay } => delay,
            ReconnectSettings::Exponential { max_delay, .. } => max_delay,
        })
    }

    /// Starts the delay sequence over, called after a successful open.
    pub fn reset(&mut self) {
        self.backoff = build(&self.settings);
    }
}

fn build(settings: &ReconnectSettings) -> Box<dyn Backoff> {
    match *settings {
        ReconnectSettings::Fixed { delay } => Box::new(
            ConstantBuilder::default()
                .with_delay(delay)
                .with_max_times(usize::MAX)
                .build(),
        ),
        ReconnectSettings::Exponential {
            min_delay,
            max_delay,
            jitter,
        } => {
            let builder = ExponentialBuilder::default()
                .with_min_delay(min_delay)
                .with_max_delay(max_delay)
                .with_max_times(usize::MAX);
            if jitter {
                Box::new(builder.with_jitter().build())
            } else {
                Box::new(builder.build())
            }
        }
    }
}
