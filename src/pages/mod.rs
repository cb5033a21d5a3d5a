pub mod new_project;
pub mod project_editor;
pub mod project_picker;
