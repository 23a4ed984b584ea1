pub mod body;
pub mod tilemap;
