//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for eunomia
#[derive(Parser, Debug)]
#[command(name = "eunomia")]
#[command(author, version, about = "IRC channel governance bot - proposals become legislation by vote")]
#[command(long_about = r#"
Eunomia watches one IRC channel and turns proposals into legislation.

Any ordinary message is a proposal. Votes point back at it:
  :D             support the line above
  :D^^ / :D~2    support the line 2 visible lines further up
  alice: :D      support alice's most recent message
  D:             filibuster, resets the tally

When a proposal collects enough votes (3 by default) it is written, with
its surrounding context, to the proposal log.

Configuration files are loaded from (in priority order):
1. EUNOMIA_* environment variables (EUNOMIA_IRC__CHANNEL=#agora)
2. --config <path>     Explicit config file
3. ./eunomia.toml      Project-level config
4. ~/.config/eunomia/config.toml   Global config

Example:
  eunomia --server irc.libera.chat --channel '#agora'
  eunomia --config /etc/eunomia.toml -vv
"#)]
pub struct Cli {
    /// IRC server hostname
    #[arg(short, long, value_name = "HOST")]
    pub server: Option<String>,

    /// IRC server port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Channel to govern
    #[arg(short, long, value_name = "CHANNEL")]
    pub channel: Option<String>,

    /// Nickname to use
    #[arg(short, long)]
    pub nick: Option<String>,

    /// Directory for channel, proposal and diagnostic logs
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Announce accepted proposals in the channel
    #[arg(long)]
    pub announce: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress the startup banner
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Print the records in a proposal log file and exit
    #[arg(long, value_name = "FILE")]
    pub print_records: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_overrides() {
        let cli = Cli::parse_from([
            "eunomia",
            "--server",
            "irc.libera.chat",
            "-c",
            "#agora",
            "-vv",
            "--announce",
        ]);
        assert_eq!(cli.server.as_deref(), Some("irc.libera.chat"));
        assert_eq!(cli.channel.as_deref(), Some("#agora"));
        assert_eq!(cli.verbose, 2);
        assert!(cli.announce);
        assert!(cli.nick.is_none());
    }
}
