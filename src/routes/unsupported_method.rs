//! Known API paths answer 400 for methods they do not serve.

#[derive(Responder)]
#[response(status = 400, content_type = "plain")]
pub struct UnsupportedMethod(&'static str);

fn unsupported() -> UnsupportedMethod {
    UnsupportedMethod("Unsupported method")
}

#[get("/api/subscribe")]
pub fn subscribe_get() -> UnsupportedMethod {
    unsupported()
}

#[put("/api/subscribe")]
pub fn subscribe_put() -> UnsupportedMethod {
    unsupported()
}

#[delete("/api/subscribe")]
pub fn subscribe_delete() -> UnsupportedMethod {
    unsupported()
}

#[patch("/api/subscribe")]
pub fn subscribe_patch() -> UnsupportedMethod {
    unsupported()
}

#[post("/api/confirm/<_>")]
pub fn confirm_post() -> UnsupportedMethod {
    unsupported()
}

#[put("/api/confirm/<_>")]
pub fn confirm_put() -> UnsupportedMethod {
    unsupported()
}

#[delete("/api/confirm/<_>")]
pub fn confirm_delete() -> UnsupportedMethod {
    unsupported()
}

#[patch("/api/confirm/<_>")]
pub fn confirm_patch() -> UnsupportedMethod {
    unsupported()
}

#[post("/api/unsubscribe/<_>")]
pub fn unsubscribe_post() -> UnsupportedMethod {
    unsupported()
}

#[put("/api/unsubscribe/<_>")]
pub fn unsubscribe_put() -> UnsupportedMethod {
    unsupported()
}

#[delete("/api/unsubscribe/<_>")]
pub fn unsubscribe_delete() -> UnsupportedMethod {
    unsupported()
}

#[patch("/api/unsubscribe/<_>")]
pub fn unsubscribe_patch() -> UnsupportedMethod {
    unsupported()
}

#[post("/api/weather")]
pub fn weather_post() -> UnsupportedMethod {
    unsupported()
}

#[put("/api/weather")]
pub fn weather_put() -> UnsupportedMethod {
    unsupported()
}

#[delete("/api/weather")]
pub fn weather_delete() -> UnsupportedMethod {
    unsupported()
}

#[patch("/api/weather")]
pub fn weather_patch() -> UnsupportedMethod {
    unsupported()
}
