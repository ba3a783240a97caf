pub mod loading;
pub mod report;
