use crate::routes::plain_response;
use crate::weather::{WeatherData, WeatherError, WeatherProvider};
use rocket::http::Status;
use rocket::response::Responder;
use rocket::serde::json::Json;
use rocket::{Request, State};
use std::sync::Arc;

#[derive(thiserror::Error)]
pub enum WeatherLookupError {
    #[error("City parameter is empty.")]
    MissingCity,
    #[error(transparent)]
    Provider(#[from] WeatherError),
}

impl std::fmt::Debug for WeatherLookupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        super::error_chain_fmt(self, f)
    }
}

impl<'r> Responder<'r, 'static> for WeatherLookupError {
    fn respond_to(self, _request: &'r Request<'_>) -> rocket::response::Result<'static> {
        let status = match self {
            WeatherLookupError::MissingCity => Status::BadRequest,
            WeatherLookupError::Provider(WeatherError::CityNotFound(_)) => Status::NotFound,
            WeatherLookupError::Provider(WeatherError::Unexpected(_)) => {
                tracing::error!(error.cause_chain = ?self, "WeatherLookupError");
                Status::InternalServerError
            }
        };
        plain_response(status, self.to_string())
    }
}

#[get("/api/weather?<city>")]
pub async fn current_weather(
    city: Option<String>,
    provider: &State<Arc<dyn WeatherProvider>>,
) -> Result<Json<WeatherData>, WeatherLookupError> {
    let city = match city {
        Some(city) if !city.trim().is_empty() => city,
        _ => return Err(WeatherLookupError::MissingCity),
    };
    let data = provider.current_weather(city.trim()).await?;
    Ok(Json(data))
}
