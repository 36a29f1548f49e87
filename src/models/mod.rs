pub mod data_models;

pub use data_models::ProductInfo;
