pub mod frame_tile;
pub mod project_card;
pub mod sidebar;
pub mod upload_progress;
