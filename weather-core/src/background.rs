use chrono::{Local, Timelike};

/// Time-of-day theme for the main view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Background {
    Morning,
    Afternoon,
    Evening,
}

impl Background {
    /// 06:00–11:59 morning, 12:00–17:59 afternoon, everything else evening.
    pub fn for_hour(hour: u32) -> Self {
        match hour {
            6..=11 => Background::Morning,
            12..=17 => Background::Afternoon,
            _ => Background::Evening,
        }
    }

    pub fn now() -> Self {
        Self::for_hour(Local::now().hour())
    }

    pub fn asset(&self) -> &'static str {
        match self {
            Background::Morning => "morning.jpg",
            Background::Afternoon => "afternoon.jpg",
            Background::Evening => "evening.jpg",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Background::Morning => "morning",
            Background::Afternoon => "afternoon",
            Background::Evening => "evening",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_table() {
        let cases = [
            (0, Background::Evening),
            (5, Background::Evening),
            (6, Background::Morning),
            (11, Background::Morning),
            (12, Background::Afternoon),
            (17, Background::Afternoon),
            (18, Background::Evening),
            (23, Background::Evening),
        ];

        for (hour, expected) in cases {
            assert_eq!(Background::for_hour(hour), expected, "hour {hour}");
        }
    }

    #[test]
    fn assets() {
        assert_eq!(Background::Morning.asset(), "morning.jpg");
        assert_eq!(Background::for_hour(13).asset(), "afternoon.jpg");
    }
}
