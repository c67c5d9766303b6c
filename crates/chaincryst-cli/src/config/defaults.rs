use chaincryst::engine::config::{
    DEFAULT_CLASH_THRESHOLD, DEFAULT_CONTACT_THRESHOLD, DEFAULT_OUTPUT_EXTENSION,
    DEFAULT_PADDING, RadiusPolicy,
};

pub struct DefaultsConfig {
    pub n_samples: usize,
    pub radius: RadiusPolicy,
    pub clash_threshold: f64,
    pub padding: f64,
    pub contact_threshold: f64,
    pub extension: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            n_samples: 10,
            radius: RadiusPolicy::Auto,
            clash_threshold: DEFAULT_CLASH_THRESHOLD,
            padding: DEFAULT_PADDING,
            contact_threshold: DEFAULT_CONTACT_THRESHOLD,
            extension: DEFAULT_OUTPUT_EXTENSION.to_string(),
        }
    }
}
