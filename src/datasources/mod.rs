pub mod location;
pub mod openweathermap;
pub mod soildata;

pub use location::LocationClient;
pub use openweathermap::OpenWeatherMapClient;
pub use soildata::SoilDataClient;
