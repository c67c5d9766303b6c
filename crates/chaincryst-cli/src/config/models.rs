use chaincryst::engine::config::SearchConfig;
use std::path::PathBuf;

pub struct AppConfig {
    pub unit_paths: Vec<PathBuf>,
    pub output_dir: PathBuf,
    pub summary_path: Option<PathBuf>,
    pub core_config: SearchConfig,
}
