//! Configuration for the signal timing, the learning environment and the
//! reward shaping.
//!
//! All values are fixed per instance. Builders validate eagerly so that an
//! invalid configuration never produces a running simulation.

use super::error::ConfigError;

/// Default minimum green time (s)
pub const DEFAULT_GREEN_MIN: u32 = 6;
/// Default yellow time (s)
pub const DEFAULT_YELLOW: u32 = 2;
/// Default all-red clearance time (s)
pub const DEFAULT_ALL_RED: u32 = 1;
/// Default vehicles served per green second
pub const DEFAULT_SERVICE_RATE: u32 = 1;
/// Default margin another queue needs over the current one to win the switch
pub const DEFAULT_SWITCH_THRESHOLD: u32 = 1;

/// Default episode length in ticks
pub const DEFAULT_EPISODE_LENGTH: u64 = 300;
/// Default mean arrivals per direction per tick
pub const DEFAULT_ARRIVAL_RATE: f64 = 0.3;

/// Signal timing and service parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalConfig {
    pub green_min: u32,
    pub yellow: u32,
    pub all_red: u32,
    pub service_rate: u32,
    pub switch_threshold: u32,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            green_min: DEFAULT_GREEN_MIN,
            yellow: DEFAULT_YELLOW,
            all_red: DEFAULT_ALL_RED,
            service_rate: DEFAULT_SERVICE_RATE,
            switch_threshold: DEFAULT_SWITCH_THRESHOLD,
        }
    }
}

impl SignalConfig {
    /// Build and validate a signal configuration
    pub fn new(
        green_min: u32,
        yellow: u32,
        all_red: u32,
        service_rate: u32,
        switch_threshold: u32,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            green_min,
            yellow,
            all_red,
            service_rate,
            switch_threshold,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("green_min", self.green_min),
            ("yellow", self.yellow),
            ("all_red", self.all_red),
            ("service_rate", self.service_rate),
            ("switch_threshold", self.switch_threshold),
        ];
        for (name, value) in fields {
            if value == 0 {
                return Err(ConfigError::NonPositive { name });
            }
        }
        Ok(())
    }

    /// Length of the green extension granted to drain the current queue
    pub fn green_extension(&self) -> u32 {
        self.green_min.div_ceil(2)
    }

    /// Ticks from the start of a green to the start of the next one when no
    /// extension is granted
    pub fn cycle_length(&self) -> u32 {
        self.green_min + self.yellow + self.all_red
    }
}

/// Reward shaping weights for the learning environment.
///
/// The values in `Default` are the single fixed set used by this crate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RewardConfig {
    /// Penalty per queued vehicle, every tick
    pub congestion_weight: f64,
    /// Credit per vehicle served this tick
    pub service_weight: f64,
    /// Bonus for opening the (non-empty) longest queue
    pub match_bonus: f64,
    /// Penalty for opening an empty approach while others wait
    pub empty_penalty: f64,
    /// Penalty per unit of `max - mean` above the threshold
    pub imbalance_penalty: f64,
    /// `max - mean` above which the imbalance terms apply
    pub imbalance_threshold: f64,
    /// Extra bonus for opening the longest queue while imbalanced
    pub imbalance_resolved_bonus: f64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            congestion_weight: 1.0,
            service_weight: 1.0,
            match_bonus: 2.0,
            empty_penalty: 2.0,
            imbalance_penalty: 0.5,
            imbalance_threshold: 2.0,
            imbalance_resolved_bonus: 1.0,
        }
    }
}

/// Configuration of the learning environment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvConfig {
    pub signal: SignalConfig,
    pub episode_length: u64,
    pub arrival_rate: f64,
    pub reward: RewardConfig,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            signal: SignalConfig::default(),
            episode_length: DEFAULT_EPISODE_LENGTH,
            arrival_rate: DEFAULT_ARRIVAL_RATE,
            reward: RewardConfig::default(),
        }
    }
}

impl EnvConfig {
    pub fn new(
        signal: SignalConfig,
        episode_length: u64,
        arrival_rate: f64,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            signal,
            episode_length,
            arrival_rate,
            reward: RewardConfig::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_reward(mut self, reward: RewardConfig) -> Self {
        self.reward = reward;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.signal.validate()?;
        if self.episode_length == 0 {
            return Err(ConfigError::NonPositive {
                name: "episode_length",
            });
        }
        validate_rate("arrival_rate", self.arrival_rate)
    }
}

/// Rates must be finite and strictly positive
pub(crate) fn validate_rate(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidRate { name, value })
    }
}
