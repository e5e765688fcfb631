pub mod files_filter;
pub mod files_list;
pub mod files_search;
pub mod files_transform;
pub mod refactor_example;
pub mod version;
