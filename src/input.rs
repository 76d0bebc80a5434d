//! Provides a means to read, parse and hold configuration options for scans.
use anyhow::Context;
use clap::Parser;
use serde_derive::Deserialize;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

const CONFIG_FILE_NAME: &str = ".portprobe.toml";

#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "portprobe",
    version = env!("CARGO_PKG_VERSION"),
    max_term_width = 120,
    help_template = "{bin} {version}\n{about}\n\nUSAGE:\n    {usage}\n\nOPTIONS:\n{options}",
)]
/// Sequential TCP connect port prober.
/// Ports are probed one at a time, in ascending order, and every port gets
/// an OPEN, CLOSED or ERROR line.
pub struct Opts {
    /// IPv4 address to probe. Asked for interactively when not given here
    /// or in the configuration file.
    #[arg(short, long)]
    pub address: Option<String>,

    /// A single port, or two ports separated by '-' or ','. Both separators
    /// scan the whole inclusive range between the two ports: 80,443 is the
    /// same as 80-443. Asked for interactively when missing.
    #[arg(short, long, alias = "range", allow_hyphen_values = true)]
    pub ports: Option<String>,

    /// Connect timeout in milliseconds. Without it a probe waits as long as
    /// the operating system allows.
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// Whether to ignore the configuration file or not.
    #[arg(short, long)]
    pub no_config: bool,

    /// Custom path to config file
    #[arg(short, long, value_parser)]
    pub config_path: Option<PathBuf>,

    /// Greppable mode. Only output `port:state` lines.
    #[arg(short, long)]
    pub greppable: bool,

    /// Accessible mode. Turns off features which negatively affect screen readers.
    #[arg(long)]
    pub accessible: bool,
}

#[cfg(not(tarpaulin_include))]
impl Opts {
    pub fn read() -> Self {
        Self::parse()
    }

    /// Fills in values missing from the command line with those found in
    /// the user configuration file. Command line values always win.
    pub fn merge(&mut self, config: &Config) {
        if !self.no_config {
            self.merge_flags(config);
            self.merge_optional(config);
        }
    }

    fn merge_flags(&mut self, config: &Config) {
        macro_rules! merge_flags {
            ($($field: ident),+) => {
                $(
                    if config.$field == Some(true) {
                        self.$field = true;
                    }
                )+
            }
        }

        merge_flags!(greppable, accessible);
    }

    fn merge_optional(&mut self, config: &Config) {
        macro_rules! merge_optional {
            ($($field: ident),+) => {
                $(
                    if self.$field.is_none() {
                        self.$field.clone_from(&config.$field);
                    }
                )+
            }
        }

        merge_optional!(address, ports, timeout);
    }

    /// Prompts on `writer` and reads from `reader` for whichever of the
    /// address and the port specification is still missing.
    ///
    /// An empty answer is kept as an empty string; validation rejects it
    /// later with the usual error.
    pub fn prompt_missing<R: BufRead, W: Write>(
        &mut self,
        reader: &mut R,
        writer: &mut W,
    ) -> io::Result<()> {
        if self.address.is_none() {
            self.address = Some(prompt(reader, writer, "Please enter the IP Address: ")?);
        }
        if self.ports.is_none() {
            self.ports = Some(prompt(
                reader,
                writer,
                "Please enter the Port interval (e.g., 80,443 or 1000-1020): ",
            )?);
        }
        Ok(())
    }
}

/// Writes `message`, then reads one line without its line terminator.
pub fn prompt<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    message: &str,
) -> io::Result<String> {
    write!(writer, "{message}")?;
    writer.flush()?;

    let mut line = String::new();
    reader.read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_owned())
}

/// Struct used to deserialize the options specified within our config file.
/// These will be further merged with our command line arguments in order to
/// generate the final Opts struct.
#[cfg(not(tarpaulin_include))]
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    address: Option<String>,
    ports: Option<String>,
    timeout: Option<u64>,
    greppable: Option<bool>,
    accessible: Option<bool>,
}

#[cfg(not(tarpaulin_include))]
impl Config {
    /// Reads the configuration file with TOML format and parses it into a
    /// Config struct. A missing or unreadable file yields an empty config;
    /// a file that is not valid TOML is an error.
    ///
    /// # Format
    ///
    /// address = "127.0.0.1"
    /// ports = "1-1024"
    /// timeout = 1500
    /// greppable = false
    /// accessible = true
    ///
    pub fn read(custom_config_path: Option<PathBuf>) -> anyhow::Result<Self> {
        let Some(config_path) = custom_config_path.or_else(default_config_path) else {
            return Ok(Self::default());
        };

        let content = if config_path.exists() {
            fs::read_to_string(&config_path).unwrap_or_default()
        } else {
            String::new()
        };

        Self::from_toml(&content)
            .with_context(|| format!("invalid configuration file {}", config_path.display()))
    }

    fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

/// Constructs default path to config toml
pub fn default_config_path() -> Option<PathBuf> {
    let mut config_path = dirs::home_dir()?;
    config_path.push(CONFIG_FILE_NAME);
    Some(config_path)
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};
    use parameterized::parameterized;
    use std::io::Cursor;

    use super::{prompt, Config, Opts};

    impl Config {
        fn default_test() -> Self {
            Self {
                address: Some("10.0.0.1".to_owned()),
                ports: Some("1-1024".to_owned()),
                timeout: Some(1_000),
                greppable: Some(true),
                accessible: Some(true),
            }
        }
    }

    #[test]
    fn verify_cli() {
        Opts::command().debug_assert();
    }

    #[parameterized(input = {
        vec!["portprobe", "-a", "127.0.0.1", "-p", "80"],
        vec!["portprobe", "--address", "127.0.0.1", "--ports", "1000-1020"],
        vec!["portprobe", "-a", "127.0.0.1", "--range", "80,443"],
        vec!["portprobe", "-a", "127.0.0.1", "-p", "-5"],
    }, ports = {
        "80", "1000-1020", "80,443", "-5",
    })]
    fn parse_port_argument(input: Vec<&str>, ports: &str) {
        let opts = Opts::parse_from(input);

        assert_eq!(opts.address.as_deref(), Some("127.0.0.1"));
        assert_eq!(opts.ports.as_deref(), Some(ports));
    }

    #[test]
    fn opts_no_merge_when_config_is_ignored() {
        let mut opts = Opts {
            no_config: true,
            ..Opts::default()
        };
        let config = Config::default_test();

        opts.merge(&config);

        assert_eq!(opts.address, None);
        assert_eq!(opts.ports, None);
        assert_eq!(opts.timeout, None);
        assert!(!opts.greppable);
        assert!(!opts.accessible);
    }

    #[test]
    fn opts_merge_fills_missing_values() {
        let mut opts = Opts::default();
        let config = Config::default_test();

        opts.merge(&config);

        assert_eq!(opts.address, config.address);
        assert_eq!(opts.ports, config.ports);
        assert_eq!(opts.timeout, config.timeout);
        assert!(opts.greppable);
        assert!(opts.accessible);
    }

    #[test]
    fn opts_merge_keeps_command_line_values() {
        let mut opts = Opts::parse_from(["portprobe", "-a", "127.0.0.1", "-p", "22", "-t", "50"]);
        let config = Config::default_test();

        opts.merge(&config);

        assert_eq!(opts.address.as_deref(), Some("127.0.0.1"));
        assert_eq!(opts.ports.as_deref(), Some("22"));
        assert_eq!(opts.timeout, Some(50));
    }

    #[test]
    fn config_from_toml() {
        let config = Config::from_toml("address = \"192.168.1.1\"\nports = \"80,443\"\ntimeout = 200\n").unwrap();

        assert_eq!(config.address.as_deref(), Some("192.168.1.1"));
        assert_eq!(config.ports.as_deref(), Some("80,443"));
        assert_eq!(config.timeout, Some(200));
        assert_eq!(config.greppable, None);
    }

    #[test]
    fn config_rejects_wrong_types() {
        assert!(Config::from_toml("ports = [80, 443]").is_err());
    }

    #[test]
    fn missing_config_file_is_empty() {
        let config = Config::read(Some("/nonexistent/portprobe.toml".into())).unwrap();
        assert_eq!(config.address, None);
    }

    #[test]
    fn prompt_strips_line_terminator() {
        let mut reader = Cursor::new("127.0.0.1\r\n");
        let mut written = Vec::new();

        let answer = prompt(&mut reader, &mut written, "IP: ").unwrap();

        assert_eq!(answer, "127.0.0.1");
        assert_eq!(written, b"IP: ");
    }

    #[test]
    fn prompt_missing_only_asks_for_missing_values() {
        let mut opts = Opts {
            address: Some("127.0.0.1".to_owned()),
            ..Opts::default()
        };
        let mut reader = Cursor::new("1000-1020\n");
        let mut written = Vec::new();

        opts.prompt_missing(&mut reader, &mut written).unwrap();

        assert_eq!(opts.address.as_deref(), Some("127.0.0.1"));
        assert_eq!(opts.ports.as_deref(), Some("1000-1020"));
        let written = String::from_utf8(written).unwrap();
        assert!(!written.contains("IP Address"));
        assert!(written.contains("Port interval"));
    }

    #[test]
    fn prompt_at_end_of_input_is_empty() {
        let mut opts = Opts::default();
        let mut reader = Cursor::new("");

        opts.prompt_missing(&mut reader, &mut Vec::new()).unwrap();

        assert_eq!(opts.address.as_deref(), Some(""));
        assert_eq!(opts.ports.as_deref(), Some(""));
    }
}
