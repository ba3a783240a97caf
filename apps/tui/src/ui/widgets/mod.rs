pub mod outline;
pub mod performers;
pub mod popup;
pub mod radar;
pub mod roadmap;
pub mod score;
