//! Compute mode: request a fresh report from birth parameters

use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result};
use tracing::debug;

use lifetrend::api::{BirthInput, City, DEFAULT_LONGITUDE, FortuneClient, FortuneReport};
use lifetrend::config::ApiConfig;

use crate::output::print_warning;

/// Local birth date and time as typed on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BirthTime {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
}

/// Hour used when only a date is given
const DEFAULT_HOUR: u32 = 12;

fn is_leap(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        2 if is_leap(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

impl BirthTime {
    /// Range check. Lunar months never exceed 30 days.
    pub fn validate(&self, is_lunar: bool) -> Result<(), String> {
        let max_day = if is_lunar {
            30
        } else {
            days_in_month(self.year, self.month)
        };
        self.check_fields(max_day)
    }

    fn check_fields(&self, max_day: u32) -> Result<(), String> {
        if !(1..=12).contains(&self.month) {
            return Err(format!("month {} is out of range", self.month));
        }
        if self.day == 0 || self.day > max_day {
            return Err(format!(
                "day {} is out of range for {}-{:02}",
                self.day, self.year, self.month
            ));
        }
        if self.hour > 23 || self.minute > 59 {
            return Err(format!("time {:02}:{:02} is out of range", self.hour, self.minute));
        }
        Ok(())
    }
}

impl FromStr for BirthTime {
    type Err = String;

    /// `YYYY-MM-DD`, optionally followed by `THH:MM` or ` HH:MM`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (date, time) = match s.split_once(['T', ' ']) {
            Some((date, time)) => (date, Some(time.trim())),
            None => (s, None),
        };
        let field = |v: &str, what: &str| {
            v.parse::<u32>()
                .map_err(|_| format!("invalid {} in {} (expected YYYY-MM-DDTHH:MM)", what, s))
        };

        let mut parts = date.split('-');
        let (Some(year), Some(month), Some(day), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(format!("expected YYYY-MM-DDTHH:MM (got {})", s));
        };
        let year = year
            .parse::<i32>()
            .map_err(|_| format!("invalid year in {} (expected YYYY-MM-DDTHH:MM)", s))?;

        let (hour, minute) = match time {
            Some(time) => {
                let (hour, minute) = time
                    .split_once(':')
                    .ok_or_else(|| format!("expected HH:MM after the date (got {})", s))?;
                (field(hour, "hour")?, field(minute, "minute")?)
            }
            None => (DEFAULT_HOUR, 0),
        };

        let parsed = Self {
            year,
            month: field(month, "month")?,
            day: field(day, "day")?,
            hour,
            minute,
        };
        // Month lengths are checked once the calendar is known
        parsed.check_fields(31)?;
        Ok(parsed)
    }
}

impl fmt::Display for BirthTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{:02}-{:02} {:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Code the calculate endpoint expects
    pub fn code(self) -> u8 {
        match self {
            Gender::Male => 1,
            Gender::Female => 0,
        }
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" | "男" | "1" => Ok(Gender::Male),
            "female" | "f" | "女" | "0" => Ok(Gender::Female),
            other => Err(format!("unknown gender {} (use male or female)", other)),
        }
    }
}

/// Everything needed for one calculate request
#[derive(Debug, Clone)]
pub struct BirthQuery {
    pub nickname: String,
    pub time: BirthTime,
    pub gender: Gender,
    pub is_lunar: bool,
    pub province: Option<String>,
    pub city: Option<String>,
}

impl BirthQuery {
    /// Label shown in place of a payload file name
    pub fn source(&self) -> String {
        format!(
            "calculated {}{}",
            self.time,
            if self.is_lunar { " (lunar)" } else { "" }
        )
    }

    fn input(&self, province: String, city: Option<&City>) -> BirthInput {
        let time = self.time;
        BirthInput {
            nickname: self.nickname.clone(),
            year: time.year,
            month: time.month,
            day: time.day,
            hour: time.hour,
            minute: time.minute,
            gender: self.gender.code(),
            is_lunar: self.is_lunar,
            province,
            city: city.map(|c| c.name.clone()).unwrap_or_default(),
            city_long: city.map_or(DEFAULT_LONGITUDE, |c| c.longitude),
        }
    }
}

/// The named city, or the first one when no name is given
pub fn pick_city<'a>(cities: &'a [City], wanted: Option<&str>) -> Option<&'a City> {
    match wanted {
        Some(name) => cities.iter().find(|c| c.name == name.trim()),
        None => cities.first(),
    }
}

/// Resolve the birth place, then ask the service for the report
pub async fn compute_report(query: &BirthQuery, config: &ApiConfig) -> Result<FortuneReport> {
    query
        .time
        .validate(query.is_lunar)
        .map_err(anyhow::Error::msg)?;
    let client = FortuneClient::new(config)?;

    let (province, city) = match &query.province {
        Some(province) => {
            let provinces = client.provinces_or_default().await;
            if !provinces.iter().any(|p| p == province) {
                print_warning(&format!("province {} is not in the lookup table", province));
            }
            let cities = client.cities_or_default(province).await;
            let city = pick_city(&cities, query.city.as_deref()).cloned();
            if city.is_none() {
                print_warning(&format!(
                    "no longitude for {} {}, assuming {}°",
                    province,
                    query.city.as_deref().unwrap_or(""),
                    DEFAULT_LONGITUDE
                ));
            }
            (province.clone(), city)
        }
        None => (String::new(), None),
    };

    let input = query.input(province, city.as_ref());
    debug!(city = %input.city, longitude = input.city_long, "birth place resolved");
    client
        .calculate(&input)
        .await
        .with_context(|| format!("fortune calculation failed at {}", client.base_url()))
}
