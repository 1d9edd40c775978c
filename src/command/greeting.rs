//! Time-of-day greetings

use chrono::{Local, Timelike};

/// Part of the day used to pick a greeting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    /// Hours 0 through 11
    Morning,
    /// Hours 12 through 17
    Afternoon,
    /// Hours 18 through 23
    Evening,
}

impl Period {
    /// Map an hour of the day (0-23) to its period
    pub fn from_hour(hour: u32) -> Self {
        if hour < 12 {
            Period::Morning
        } else if hour < 18 {
            Period::Afternoon
        } else {
            Period::Evening
        }
    }

    /// Period for the local wall clock
    pub fn now() -> Self {
        Self::from_hour(Local::now().hour())
    }

    /// Canonical greeting for this period
    pub fn greeting(&self) -> &'static str {
        match self {
            Period::Morning => "Good Morning",
            Period::Afternoon => "Good Afternoon",
            Period::Evening => "Good Evening",
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.greeting())
    }
}
