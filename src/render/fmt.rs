use chrono::{DateTime, Local, Utc};

use super::palette::PanelColor;

/// Whole-degree temperature string. Values that round to zero from below
/// must not read "-0" on the panel.
pub fn temperature(temp: f64) -> String {
    let s = format!("{:.0}", temp);
    if s == "-0" { "0".to_string() } else { s }
}

/// Threshold coloring: cold reads blue, hot reads red, anything between
/// stays black.
pub fn temperature_color(temp: f64, cold_temp: f64, hot_temp: f64) -> PanelColor {
    if temp < cold_temp {
        PanelColor::Blue
    } else if temp > hot_temp {
        PanelColor::Red
    } else {
        PanelColor::Black
    }
}

/// Epoch seconds to local wall time. Out-of-range epochs collapse to the
/// epoch origin rather than failing the render.
pub fn local_time(epoch: i64) -> DateTime<Local> {
    DateTime::<Utc>::from_timestamp(epoch, 0)
        .unwrap_or_default()
        .with_timezone(&Local)
}

/// "5 PM" style hour stamp for forecast columns and graph markers.
pub fn hour_ampm(epoch: i64) -> String {
    local_time(epoch).format("%-I %p").to_string()
}

/// "6:42 AM" style clock for sunrise/sunset.
pub fn clock12(epoch: i64) -> String {
    local_time(epoch).format("%-I:%M %p").to_string()
}

/// Unpadded 12h hour, used to find the midnight/noon graph markers.
pub fn hour12(epoch: i64) -> String {
    local_time(epoch).format("%-I").to_string()
}

/// "AM" or "PM" for the given instant.
pub fn ampm(epoch: i64) -> String {
    local_time(epoch).format("%p").to_string()
}

pub fn month_name(epoch: i64) -> String {
    local_time(epoch).format("%B").to_string()
}

pub fn day_of_month(epoch: i64) -> String {
    local_time(epoch).format("%-d").to_string()
}

pub fn weekday_abbrev(epoch: i64) -> String {
    local_time(epoch).format("%a").to_string()
}

/// "July 4, 16:05" stamp for the alert header line.
pub fn alert_stamp(epoch: i64) -> String {
    local_time(epoch).format("%B %-d, %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_zero_is_normalized() {
        assert_eq!(temperature(-0.2), "0");
        assert_eq!(temperature(-0.0), "0");
        assert_eq!(temperature(0.2), "0");
    }

    #[test]
    fn rounds_to_nearest_integer() {
        assert_eq!(temperature(3.6), "4");
        assert_eq!(temperature(3.4), "3");
        assert_eq!(temperature(-12.7), "-13");
        // half cases resolve consistently with the formatter
        let five_five = temperature(-5.5);
        assert!(five_five == "-5" || five_five == "-6");
        assert_eq!(temperature(-5.51), "-6");
    }

    #[test]
    fn threshold_coloring() {
        assert_eq!(temperature_color(-3.0, 0.0, 30.0), PanelColor::Blue);
        assert_eq!(temperature_color(35.0, 0.0, 30.0), PanelColor::Red);
        assert_eq!(temperature_color(15.0, 0.0, 30.0), PanelColor::Black);
        // boundary values stay neutral
        assert_eq!(temperature_color(0.0, 0.0, 30.0), PanelColor::Black);
        assert_eq!(temperature_color(30.0, 0.0, 30.0), PanelColor::Black);
    }

    #[test]
    fn bad_epoch_does_not_panic() {
        let _ = hour_ampm(i64::MAX);
        let _ = clock12(i64::MIN);
    }
}
