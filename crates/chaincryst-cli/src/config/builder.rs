use super::defaults::DefaultsConfig;
use super::file::{FileConfig, FileRadius};
use super::models::AppConfig;
use crate::cli::BuildArgs;
use crate::error::{CliError, Result};
use chaincryst::engine::config::{RadiusPolicy, SearchConfigBuilder};
use std::path::PathBuf;

pub fn build_config(args: &BuildArgs) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };

    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let search_file = file_config.search.take().unwrap_or_default();
    let output_file = file_config.output.take().unwrap_or_default();

    let n_samples = args
        .n_samples
        .or(search_file.n_samples)
        .unwrap_or(defaults.n_samples);

    let radius = match (args.radius, &search_file.radius) {
        (Some(policy), _) => policy,
        (None, Some(file_radius)) => file_radius.to_policy()?,
        (None, None) => defaults.radius,
    };

    let clash_threshold = args
        .clash_threshold
        .or(search_file.clash_threshold)
        .unwrap_or(defaults.clash_threshold);
    let padding = args
        .padding
        .or(search_file.padding)
        .unwrap_or(defaults.padding);
    let contact_threshold = args
        .contact_threshold
        .or(search_file.contact_threshold)
        .unwrap_or(defaults.contact_threshold);
    let extension = args
        .extension
        .clone()
        .or(output_file.extension)
        .unwrap_or(defaults.extension);

    let core_config = SearchConfigBuilder::new()
        .n_samples(n_samples)
        .radius(radius)
        .clash_threshold(clash_threshold)
        .padding(padding)
        .contact_threshold(contact_threshold)
        .output_extension(&extension)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    Ok(AppConfig {
        unit_paths: args.input.clone(),
        output_dir: args.output.clone(),
        summary_path: args.summary.clone().or(output_file.summary),
        core_config,
    })
}

fn parse_value<T: std::str::FromStr>(key: &str, value_str: &str, kind: &str) -> Result<T> {
    value_str.parse().map_err(|_| {
        CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value_str))
    })
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    if set_values.is_empty() {
        return Ok(config);
    }
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };

        match key {
            "search.n-samples" => {
                config.search.get_or_insert_with(Default::default).n_samples =
                    Some(parse_value(key, value_str, "integer")?);
            }
            "search.radius" => {
                let policy = value_str
                    .parse::<RadiusPolicy>()
                    .map_err(|e| CliError::Config(e.to_string()))?;
                let radius = match policy {
                    RadiusPolicy::Auto => FileRadius::Text(value_str.to_string()),
                    RadiusPolicy::Fixed(r) => FileRadius::Value(r),
                };
                config.search.get_or_insert_with(Default::default).radius = Some(radius);
            }
            "search.clash-threshold" => {
                config.search.get_or_insert_with(Default::default).clash_threshold =
                    Some(parse_value(key, value_str, "float")?);
            }
            "search.padding" => {
                config.search.get_or_insert_with(Default::default).padding =
                    Some(parse_value(key, value_str, "float")?);
            }
            "search.contact-threshold" => {
                config
                    .search
                    .get_or_insert_with(Default::default)
                    .contact_threshold = Some(parse_value(key, value_str, "float")?);
            }
            "output.extension" => {
                config.output.get_or_insert_with(Default::default).extension =
                    Some(value_str.to_string());
            }
            "output.summary" => {
                config.output.get_or_insert_with(Default::default).summary =
                    Some(PathBuf::from(value_str));
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}
