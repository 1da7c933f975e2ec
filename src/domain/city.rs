use unicode_segmentation::UnicodeSegmentation;

/// A city name as typed by the subscriber. Passed verbatim to the weather provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct City(String);

impl City {
    pub fn parse(s: String) -> Result<City, String> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err("City must not be empty.".to_string());
        }
        if trimmed.graphemes(true).count() > 256 {
            return Err(format!("{} is not a valid city name.", s));
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl AsRef<str> for City {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
