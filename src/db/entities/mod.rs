//! SeaORM entities, one module per table.

pub mod plot_activity;
pub mod sensor_reading;
pub mod sim_card;
pub mod sim_payment;
pub mod station;
pub mod station_image;
pub mod user;
pub mod weather_forecast;

pub mod prelude {
    pub use super::user::Entity as User;
    pub use super::user::Model as UserModel;
    pub use super::user::ActiveModel as UserActiveModel;
    pub use super::user::Column as UserColumn;

    pub use super::station::Entity as Station;
    pub use super::station::Model as StationModel;
    pub use super::station::ActiveModel as StationActiveModel;
    pub use super::station::Column as StationColumn;

    pub use super::sensor_reading::Entity as SensorReading;
    pub use super::sensor_reading::Model as SensorReadingModel;
    pub use super::sensor_reading::ActiveModel as SensorReadingActiveModel;
    pub use super::sensor_reading::Column as SensorReadingColumn;

    pub use super::station_image::Entity as StationImage;
    pub use super::station_image::Model as StationImageModel;
    pub use super::station_image::ActiveModel as StationImageActiveModel;
    pub use super::station_image::Column as StationImageColumn;

    pub use super::plot_activity::Entity as PlotActivity;
    pub use super::plot_activity::Model as PlotActivityModel;
    pub use super::plot_activity::ActiveModel as PlotActivityActiveModel;
    pub use super::plot_activity::Column as PlotActivityColumn;

    pub use super::sim_card::Entity as SimCard;
    pub use super::sim_card::Model as SimCardModel;
    pub use super::sim_card::ActiveModel as SimCardActiveModel;
    pub use super::sim_card::Column as SimCardColumn;

    pub use super::sim_payment::Entity as SimPayment;
    pub use super::sim_payment::Model as SimPaymentModel;
    pub use super::sim_payment::ActiveModel as SimPaymentActiveModel;
    pub use super::sim_payment::Column as SimPaymentColumn;

    pub use super::weather_forecast::Entity as WeatherForecast;
    pub use super::weather_forecast::Model as WeatherForecastModel;
    pub use super::weather_forecast::ActiveModel as WeatherForecastActiveModel;
    pub use super::weather_forecast::Column as WeatherForecastColumn;
}
