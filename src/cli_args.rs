use clap::Parser;

use crate::config::Environment;

#[derive(Debug, Parser)]
#[command(author, about, version)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[clap(long, env = "CONFIG_FILE", default_value = "config.yaml")]
    pub config_file: String,
    /// Environment to run in. `test` switches to the test database.
    #[clap(long, env = "BOOKSHELF_ENV", value_enum, default_value_t = Environment::Development)]
    pub env: Environment,
}
