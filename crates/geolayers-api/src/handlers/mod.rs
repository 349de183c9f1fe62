pub mod data;
pub mod layers;
pub mod sources;
pub mod upload;
