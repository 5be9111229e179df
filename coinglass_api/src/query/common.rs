//! Shared query infrastructure: the [`Query`] and [`HistoryQuery`] traits,
//! [`HistoryWindow`] fields, [`Interval`] and [`LiquidationRange`].

use std::str::FromStr;

use url::Url;

use crate::{validation, Error};

/// Trait implemented by all query builders. Provides URL serialization and
/// the parameter pre-check the client runs before sending a request.
pub trait Query {
    /// Appends this query's parameters to the given URL, returning the
    /// modified URL. Unset optional parameters are omitted.
    fn add_to_url(&self, url: &Url) -> Url;

    /// Rejects invalid parameter combinations.
    fn validate(&self) -> Result<(), Error>;
}

/// Queries over a time series. Provides shared builder methods for the
/// result limit and the time window.
pub trait HistoryQuery: Query {
    /// Returns a mutable reference to the window fields.
    fn get_window(&mut self) -> &mut HistoryWindow;

    /// Sets the maximum number of rows returned.
    fn with_limit(mut self, limit: u32) -> Self
    where
        Self: Sized,
    {
        self.get_window().limit = Some(limit);
        self
    }

    /// Sets the start of the window (epoch seconds or milliseconds, as the
    /// endpoint expects).
    fn with_start_time(mut self, start_time: i64) -> Self
    where
        Self: Sized,
    {
        self.get_window().start_time = Some(start_time);
        self
    }

    /// Sets the end of the window.
    fn with_end_time(mut self, end_time: i64) -> Self
    where
        Self: Sized,
    {
        self.get_window().end_time = Some(end_time);
        self
    }
}

/// Result limit and time window shared by history endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HistoryWindow {
    /// Maximum number of rows. Defaults to 1000.
    pub limit: Option<u32>,
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,
}

impl Default for HistoryWindow {
    fn default() -> HistoryWindow {
        HistoryWindow {
            limit: Some(1000),
            start_time: None,
            end_time: None,
        }
    }
}

impl HistoryWindow {
    /// Appends the limit and window parameters to the URL.
    pub fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        if let Some(limit) = self.limit {
            url.query_pairs_mut()
                .append_pair("limit", &limit.to_string());
        };
        if let Some(start_time) = self.start_time {
            url.query_pairs_mut()
                .append_pair("startTime", &start_time.to_string());
        };
        if let Some(end_time) = self.end_time {
            url.query_pairs_mut()
                .append_pair("endTime", &end_time.to_string());
        };
        url
    }

    pub fn validate(&self) -> Result<(), Error> {
        if let Some(limit) = self.limit {
            validation::validate_limit(limit)?;
        }
        validation::validate_time_range(self.start_time, self.end_time)
    }
}

/// Candle interval of a history endpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Interval {
    M1,
    M3,
    M5,
    M15,
    M30,
    H1,
    #[default]
    H4,
    H6,
    H8,
    H12,
    D1,
    W1,
}

impl Interval {
    pub const ALL: [Interval; 12] = [
        Interval::M1,
        Interval::M3,
        Interval::M5,
        Interval::M15,
        Interval::M30,
        Interval::H1,
        Interval::H4,
        Interval::H6,
        Interval::H8,
        Interval::H12,
        Interval::D1,
        Interval::W1,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::M1 => "1m",
            Interval::M3 => "3m",
            Interval::M5 => "5m",
            Interval::M15 => "15m",
            Interval::M30 => "30m",
            Interval::H1 => "1h",
            Interval::H4 => "4h",
            Interval::H6 => "6h",
            Interval::H8 => "8h",
            Interval::H12 => "12h",
            Interval::D1 => "1d",
            Interval::W1 => "1w",
        }
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Interval::ALL
            .into_iter()
            .find(|i| i.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                Error::InvalidParameter(format!(
                    "unknown interval '{}'. Valid values: {}",
                    s,
                    Interval::ALL.map(|i| i.as_str()).join(", ")
                ))
            })
    }
}

/// Look-back range of the liquidation map and heatmap endpoints.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LiquidationRange {
    H12,
    #[default]
    H24,
    D3,
    D7,
    D30,
    D90,
    D180,
    Y1,
}

impl LiquidationRange {
    pub const ALL: [LiquidationRange; 8] = [
        LiquidationRange::H12,
        LiquidationRange::H24,
        LiquidationRange::D3,
        LiquidationRange::D7,
        LiquidationRange::D30,
        LiquidationRange::D90,
        LiquidationRange::D180,
        LiquidationRange::Y1,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LiquidationRange::H12 => "12h",
            LiquidationRange::H24 => "24h",
            LiquidationRange::D3 => "3d",
            LiquidationRange::D7 => "7d",
            LiquidationRange::D30 => "30d",
            LiquidationRange::D90 => "90d",
            LiquidationRange::D180 => "180d",
            LiquidationRange::Y1 => "1y",
        }
    }
}

impl std::fmt::Display for LiquidationRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LiquidationRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        LiquidationRange::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                Error::InvalidParameter(format!(
                    "unknown range '{}'. Valid values: {}",
                    s,
                    LiquidationRange::ALL.map(|r| r.as_str()).join(", ")
                ))
            })
    }
}
