pub mod activity_reducer;
pub mod app_reducer;
pub mod build_reducer;
pub mod repository_reducer;
