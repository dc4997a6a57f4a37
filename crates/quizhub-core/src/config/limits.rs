//! Domain limits for folders and quizzes.

use serde::{Deserialize, Serialize};

/// Bounds enforced by the folder and quiz services.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Deepest allowed folder depth (top-level folders are depth 0).
    #[serde(default = "default_max_folder_depth")]
    pub max_folder_depth: usize,
    /// Maximum folder name length in characters, after trimming.
    #[serde(default = "default_max_folder_name_length")]
    pub max_folder_name_length: usize,
    /// Maximum quiz title length in characters, after trimming.
    #[serde(default = "default_max_title_length")]
    pub max_title_length: usize,
    /// Maximum number of live quizzes a single owner may hold.
    #[serde(default = "default_max_quizzes_per_owner")]
    pub max_quizzes_per_owner: u64,
    /// Maximum number of ids accepted by one bulk operation.
    #[serde(default = "default_max_bulk_items")]
    pub max_bulk_items: usize,
    /// Maximum number of recipients in one share request.
    #[serde(default = "default_max_share_recipients")]
    pub max_share_recipients: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_folder_depth: default_max_folder_depth(),
            max_folder_name_length: default_max_folder_name_length(),
            max_title_length: default_max_title_length(),
            max_quizzes_per_owner: default_max_quizzes_per_owner(),
            max_bulk_items: default_max_bulk_items(),
            max_share_recipients: default_max_share_recipients(),
        }
    }
}

fn default_max_folder_depth() -> usize {
    5
}

fn default_max_folder_name_length() -> usize {
    100
}

fn default_max_title_length() -> usize {
    200
}

fn default_max_quizzes_per_owner() -> u64 {
    500
}

fn default_max_bulk_items() -> usize {
    100
}

fn default_max_share_recipients() -> usize {
    50
}
