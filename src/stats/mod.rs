//! Определения статистик: встроенный каталог, разбор описаний и
//! преобразователи значений.

pub mod catalog;
pub mod mapper;
pub mod statistic;

pub use catalog::{ALL, Catalog, output_source};
pub use mapper::Mapper;
pub use statistic::Statistic;
