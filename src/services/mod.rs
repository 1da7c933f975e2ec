mod dispatch;
mod subscription;

pub use dispatch::{DispatchError, WeatherDispatcher, DEFAULT_PAGE_SIZE};
pub use subscription::{SubscriptionError, SubscriptionService};
