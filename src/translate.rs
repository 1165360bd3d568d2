/// Offline phrase table for the handful of strings the layouts draw.
///
/// "EN" (and anything unrecognized) passes phrases through untouched;
/// unknown phrases also pass through so a missing entry never blanks a
/// label on the panel.
#[derive(Debug, Clone)]
pub struct Translation {
    lang: Lang,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lang {
    English,
    German,
}

impl Translation {
    pub fn new(lang: &str) -> Self {
        let lang = match lang.trim().to_uppercase().as_str() {
            "DE" => Lang::German,
            _ => Lang::English,
        };
        Self { lang }
    }

    pub fn word<'a>(&self, phrase: &'a str) -> &'a str {
        match self.lang {
            Lang::English => phrase,
            Lang::German => german(phrase).unwrap_or(phrase),
        }
    }
}

fn german(phrase: &str) -> Option<&'static str> {
    let t = match phrase {
        "January" => "Januar",
        "February" => "Februar",
        "March" => "M\u{e4}rz",
        "April" => "April",
        "May" => "Mai",
        "June" => "Juni",
        "July" => "Juli",
        "August" => "August",
        "September" => "September",
        "October" => "Oktober",
        "November" => "November",
        "December" => "Dezember",
        "Mon" => "Mo",
        "Tue" => "Di",
        "Wed" => "Mi",
        "Thu" => "Do",
        "Fri" => "Fr",
        "Sat" => "Sa",
        "Sun" => "So",
        "Temperature" => "Temperatur",
        "Feels like" => "Gef\u{fc}hlt",
        "Pressure" => "Druck",
        "Rain" => "Regen",
        // the graph axis swaps 12h markers for 24h clock labels
        "AM" => "00:00",
        "PM" => "12:00",
        "Sunrise" => "Sonnenaufgang",
        "Sunset" => "Sonnenuntergang",
        "clear sky" => "klare Sicht",
        "few clouds" => "Wolkig",
        "scattered clouds" => "Bew\u{f6}lkt",
        "broken clouds" => "Leicht Bew\u{f6}lkt",
        "overcast clouds" => "Bedeckt",
        "shower rain" => "Starker Regen",
        "rain" => "Regen",
        "thunderstorm" => "Gewitter",
        "snow" => "Schnee",
        "fog" => "Nebel",
        _ => return None,
    };
    Some(t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_is_identity() {
        let t = Translation::new("EN");
        assert_eq!(t.word("Feels like"), "Feels like");
        assert_eq!(t.word("clear sky"), "clear sky");
    }

    #[test]
    fn german_translates_known_phrases() {
        let t = Translation::new("DE");
        assert_eq!(t.word("Feels like"), "Gefühlt");
        assert_eq!(t.word("March"), "März");
        assert_eq!(t.word("Sat"), "Sa");
        assert_eq!(t.word("thunderstorm"), "Gewitter");
        assert_eq!(t.word("PM"), "12:00");
    }

    #[test]
    fn unknown_phrases_pass_through() {
        let t = Translation::new("DE");
        assert_eq!(t.word("light drizzle"), "light drizzle");
    }

    #[test]
    fn unrecognized_language_falls_back_to_english() {
        let t = Translation::new("fr");
        assert_eq!(t.word("Rain"), "Rain");
        let t = Translation::new(" de ");
        assert_eq!(t.word("Rain"), "Regen");
    }
}
