use crate::weather::WeatherData;

pub struct RenderedEmail {
    pub subject: String,
    pub html: String,
    pub text: String,
}

pub fn confirmation_email(confirm_url: &str, unsubscribe_url: &str) -> RenderedEmail {
    let html = format!(
        "<h2>Confirm your subscription</h2>\
        <p>Hi there! Please confirm your email address by clicking \
        <a href=\"{confirm}\">here</a>.</p>\
        <p>If you didn't request this, you can safely ignore this email.</p>\
        <hr />\
        <p>Not interested? <a href=\"{unsubscribe}\">Unsubscribe</a></p>",
        confirm = escape_html(confirm_url),
        unsubscribe = escape_html(unsubscribe_url),
    );
    let text = format!(
        "Confirm your subscription by visiting {}\nNot interested? Unsubscribe with {}",
        confirm_url, unsubscribe_url
    );
    RenderedEmail {
        subject: "Confirm your subscription".to_string(),
        html,
        text,
    }
}

pub fn weather_update_email(city: &str, weather: &WeatherData, unsubscribe_url: &str) -> RenderedEmail {
    let html = format!(
        "<h2>Your weather update for {city}</h2>\
        <p>Here's your latest forecast:</p>\
        <ul>\
        <li><strong>Temperature:</strong> {temperature:.1}°C</li>\
        <li><strong>Humidity:</strong> {humidity}%</li>\
        <li><strong>Condition:</strong> {description}</li>\
        </ul>\
        <hr />\
        <p>Don't want to receive updates? <a href=\"{unsubscribe}\">Unsubscribe here</a>.</p>",
        city = escape_html(city),
        temperature = weather.temperature,
        humidity = weather.humidity,
        description = escape_html(&weather.description),
        unsubscribe = escape_html(unsubscribe_url),
    );
    let text = format!(
        "Weather update for {}\nTemperature: {:.1}°C\nHumidity: {}%\nCondition: {}\n\nUnsubscribe: {}",
        city, weather.temperature, weather.humidity, weather.description, unsubscribe_url
    );
    RenderedEmail {
        subject: format!("Weather update for {}", city),
        html,
        text,
    }
}

fn escape_html(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}
