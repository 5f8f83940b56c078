pub mod bill;
pub mod engine;
pub mod error;
pub mod flow;
pub mod interval;
pub mod series;
pub mod tariff;
pub mod year_month;
