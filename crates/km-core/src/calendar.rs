use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};

/// Years between the common era and Absalom Reckoning.
pub const AR_YEAR_OFFSET: i32 = 2700;

const MONTHS: [&str; 12] = [
    "Abadius",
    "Calistril",
    "Pharast",
    "Gozran",
    "Desnus",
    "Sarenith",
    "Erastus",
    "Arodus",
    "Rova",
    "Lamashan",
    "Neth",
    "Kuthona",
];

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Moonday",
        Weekday::Tue => "Toilday",
        Weekday::Wed => "Wealday",
        Weekday::Thu => "Oathday",
        Weekday::Fri => "Fireday",
        Weekday::Sat => "Starday",
        Weekday::Sun => "Sunday",
    }
}

/// English ordinal, e.g. `1st`, `12th`, `23rd`.
pub fn ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

/// The Absalom Reckoning year of a date.
pub fn ar_year(time: &NaiveDateTime) -> i32 {
    time.year() + AR_YEAR_OFFSET
}

/// Format the world clock the way Golarion natives read it.
///
/// `2023-01-02 09:30:00` becomes `Moonday, 2nd of Abadius, 4723 AR (09:30:00)`.
pub fn format_world_time(time: &NaiveDateTime) -> String {
    let month = MONTHS[time.month0() as usize];
    let (_, hour) = time.hour12();
    format!(
        "{}, {} of {}, {} AR ({:02}:{:02}:{:02})",
        weekday_name(time.weekday()),
        ordinal(time.day()),
        month,
        ar_year(time),
        hour,
        time.minute(),
        time.second(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn formats_golarion_date() {
        assert_eq!(
            format_world_time(&at(2023, 1, 2, 9, 30)),
            "Moonday, 2nd of Abadius, 4723 AR (09:30:00)"
        );
    }

    #[test]
    fn twelve_hour_clock() {
        assert_eq!(
            format_world_time(&at(2023, 10, 13, 0, 5)),
            "Fireday, 13th of Lamashan, 4723 AR (12:05:00)"
        );
        assert!(format_world_time(&at(2023, 10, 13, 15, 0)).ends_with("(03:00:00)"));
    }

    #[test]
    fn ordinals() {
        let cases = [(1, "1st"), (2, "2nd"), (3, "3rd"), (4, "4th"), (11, "11th"), (12, "12th"), (21, "21st"), (22, "22nd"), (31, "31st")];
        for (n, text) in cases {
            assert_eq!(ordinal(n), text);
        }
    }
}
