use clap::Parser;
use derivative::Derivative;

#[derive(Parser, Derivative)]
#[derivative(Debug)]
#[command(author, about, version)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[clap(long, env = "CONFIG_FILE", default_value = "config.yaml")]
    pub config_file: String,

    /// API key of the book catalog. Overrides the one in the configuration file.
    #[clap(long, env = "CATALOG_API_KEY", hide_env_values = true)]
    #[derivative(Debug(format_with = "crate::utils::mask_fmt"))]
    pub catalog_api_key: Option<String>,

    /// API key of the text-generation service. Overrides the one in the configuration file.
    #[clap(long, env = "GENERATION_API_KEY", hide_env_values = true)]
    #[derivative(Debug(format_with = "crate::utils::mask_fmt"))]
    pub generation_api_key: Option<String>,
}
