//! Text rendering of the tracker state.

use std::fmt::Write;

use chrono::{DateTime, Local};
use cityweather_core::{
    AppState, CityList, ConditionCategory, ForecastDayPoint, LocationCandidate, Theme,
    TrackedCity,
};

pub const EMPTY_LIST_MESSAGE: &str = "No cities added yet. Start by searching for a city above.";

/// ANSI colours for one theme.
struct Palette {
    title: &'static str,
    muted: &'static str,
    accent: &'static str,
    error: &'static str,
}

const RESET: &str = "\x1b[0m";

impl Palette {
    fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Palette {
                title: "\x1b[1;30m",
                muted: "\x1b[90m",
                accent: "\x1b[34m",
                error: "\x1b[31m",
            },
            Theme::Dark => Palette {
                title: "\x1b[1;97m",
                muted: "\x1b[37m",
                accent: "\x1b[96m",
                error: "\x1b[91m",
            },
        }
    }
}

pub fn icon(category: ConditionCategory) -> &'static str {
    match category {
        ConditionCategory::Cloud => "☁",
        ConditionCategory::Rain => "🌧",
        ConditionCategory::Sun => "☀",
    }
}

/// "light rain" -> "Light Rain".
fn capitalize_words(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn weekday(timestamp_secs: i64) -> String {
    DateTime::from_timestamp(timestamp_secs, 0)
        .map(|utc| utc.with_timezone(&Local).format("%a").to_string())
        .unwrap_or_else(|| "?".to_string())
}

fn forecast_row(out: &mut String, day: &ForecastDayPoint, p: &Palette) {
    let _ = writeln!(
        out,
        "      {:<4} {} {:>4.0}°C  {}{}{}",
        weekday(day.timestamp_secs),
        icon(day.category()),
        day.temperature_c,
        p.muted,
        capitalize_words(&day.description),
        RESET,
    );
}

fn city_block(out: &mut String, index: usize, city: &TrackedCity, expanded: bool, p: &Palette) {
    let c = &city.current;
    let marker = if expanded { "▲" } else { "▼" };

    let _ = writeln!(
        out,
        "{:>2}. {} {}{}{}  {}{}{}  {}{:.0}°C{}  {}",
        index + 1,
        icon(c.category),
        p.title,
        c.display_name,
        RESET,
        p.muted,
        capitalize_words(&c.description),
        RESET,
        p.accent,
        c.temperature_c,
        RESET,
        marker,
    );

    if !expanded {
        return;
    }

    let _ = writeln!(
        out,
        "      Humidity {}%   Wind {:.0} m/s",
        c.humidity_pct, c.wind_speed_ms
    );
    for day in &city.forecast {
        forecast_row(out, day, p);
    }
}

pub fn city_list(list: &CityList, theme: Theme) -> String {
    let p = Palette::for_theme(theme);
    let mut out = String::new();

    if list.is_empty() {
        let _ = writeln!(out, "{}{}{}", p.muted, EMPTY_LIST_MESSAGE, RESET);
        return out;
    }

    for (i, city) in list.cities().iter().enumerate() {
        city_block(&mut out, i, city, list.is_expanded(city.id()), &p);
    }
    out
}

/// Full screen: list, then any status or error line.
pub fn state(state: &AppState, theme: Theme) -> String {
    let p = Palette::for_theme(theme);
    let mut out = city_list(&state.cities, theme);

    if state.loading {
        let _ = writeln!(out, "{}Adding...{}", p.muted, RESET);
    }
    if let Some(error) = &state.error {
        let _ = writeln!(out, "{}{}{}", p.error, error, RESET);
    }
    out
}

pub fn suggestions(candidates: &[LocationCandidate], theme: Theme) -> String {
    let p = Palette::for_theme(theme);
    let mut out = String::new();

    if candidates.is_empty() {
        let _ = writeln!(out, "{}No matching cities.{}", p.muted, RESET);
        return out;
    }

    for c in candidates {
        let _ = writeln!(
            out,
            "{}  {}({:.2}, {:.2}){}",
            c.display_name, p.muted, c.latitude, c.longitude, RESET
        );
    }
    out
}
