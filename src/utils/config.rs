#![forbid(unsafe_code)]

use anyhow::{Result, anyhow};
use log::{info, error, LevelFilter};
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Root};
use log4rs::encode::pattern::PatternEncoder;
use serde::Deserialize;
use std::{env, fs, path::Path};
use fs_mistrust::Mistrust;
use std::os::unix::fs::PermissionsExt;
use lazy_static::lazy_static;
use structopt::StructOpt;

// Server Utilities
use crate::fileops::filter::DEFAULT_SIZE_THRESHOLD;
use crate::fileops::search::SearchOptions;
use crate::utils::errors::Errors;
use crate::utils::fs_utils::get_absolute_path;

// ***************************************************************************
//                                Constants
// ***************************************************************************
// Directory and file locations. Unless otherwise noted, all files and directories
// are relative to the root directory.
const ENV_ROOT_DIR         : &str = "FILES_SERVER_ROOT_DIR";
const DEFAULT_ROOT_DIR     : &str = "~/.files_server";
const CONFIG_DIR           : &str = "/config";
const LOGS_DIR             : &str = "/logs";
const CERTS_DIR            : &str = "/certs";
const LOG4RS_CONFIG_FILE   : &str = "/log4rs.yml";         // relative to config dir
const SERVER_CONFIG_FILE   : &str = "/files_server.toml";  // relative to config dir
pub const CERT_FILE        : &str = "/cert.pem";           // relative to certs dir
pub const KEY_FILE         : &str = "/key.pem";            // relative to certs dir

// Networking.
const DEFAULT_HTTP_ADDR    : &str = "http://localhost";
const DEFAULT_HTTP_PORT    : u16  = 3000;

// Directory operations.
const DEFAULT_DIRECTORY    : &str = ".";

// Console log line used when no log4rs file is installed.
const CONSOLE_LOG_PATTERN  : &str = "{d(%Y-%m-%dT%H:%M:%S%.3f)} {h({l})} {t} - {m}{n}";

// ***************************************************************************
//                             Static Variables
// ***************************************************************************
// Assign the command line arguments BEFORE RUNTIME_CTX is initialized in main.
lazy_static! {
    pub static ref SERVER_ARGS: ServerArgs = init_server_args();
}

// Calculate the data directories BEFORE RUNTIME_CTX is initialized in main.
lazy_static! {
    pub static ref SERVER_DIRS: ServerDirs = init_server_dirs();
}

// ***************************************************************************
//                             Directory Structs
// ***************************************************************************
// ---------------------------------------------------------------------------
// ServerDirs:
// ---------------------------------------------------------------------------
#[derive(Debug, Deserialize)]
pub struct ServerDirs {
    pub root_dir: String,
    pub config_dir: String,
    pub logs_dir: String,
    pub certs_dir: String,
}

// ***************************************************************************
//                               Config Structs
// ***************************************************************************
// ---------------------------------------------------------------------------
// ServerArgs:
// ---------------------------------------------------------------------------
#[derive(Debug, StructOpt)]
#[structopt(name = "files_server", about = "Command line arguments for the files server.")]
pub struct ServerArgs {
    /// Specify the server's root data directory.
    ///
    /// This directory contains the configuration, log and certificate
    /// directories the server uses during execution.
    #[structopt(short, long)]
    pub root_dir: Option<String>,

    /// Create the data directories and then exit.
    ///
    /// The data directories will be rooted at a root directory calculated
    /// using the following priority order:
    ///
    ///   1. If set, the value of the FILES_SERVER_ROOT_DIR environment,
    ///
    ///   2. Otherwise, if set, the value of the --root-dir command line argument,
    ///
    ///   3. Otherwise, ~/.files_server
    ///
    #[structopt(short, long)]
    pub create_dirs_only: bool,
}

// ---------------------------------------------------------------------------
// Parms:
// ---------------------------------------------------------------------------
#[derive(Debug)]
#[allow(dead_code)]
pub struct Parms {
    pub config_file: String,
    pub config: Config,
}

// ---------------------------------------------------------------------------
// RuntimeCtx:
// ---------------------------------------------------------------------------
#[derive(Debug)]
#[allow(dead_code)]
pub struct RuntimeCtx {
    pub parms: Parms,
    pub server_args: &'static ServerArgs,
    pub server_dirs: &'static ServerDirs,
}

// ---------------------------------------------------------------------------
// Config:
// ---------------------------------------------------------------------------
/// Settings read from files_server.toml.  Missing keys take their defaults.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    pub title: String,
    pub http_addr: String,
    pub http_port: u16,
    /// Serve HTTPS using cert.pem and key.pem from the certs directory.
    pub tls: bool,
    /// Directory used when a request omits the directory parameter.
    pub default_directory: String,
    /// Size in bytes separating small from large files.
    pub size_threshold: u64,
    pub sort_entries: bool,
    pub follow_links: bool,
}

impl Config {
    pub fn new() -> Self {
        Config::default()
    }

    /// The traversal options the search endpoint uses.
    pub fn search_options(&self) -> SearchOptions {
        SearchOptions { sort_entries: self.sort_entries, follow_links: self.follow_links }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: "Files Server".to_string(),
            http_addr: DEFAULT_HTTP_ADDR.to_string(),
            http_port: DEFAULT_HTTP_PORT,
            tls: false,
            default_directory: DEFAULT_DIRECTORY.to_string(),
            size_threshold: DEFAULT_SIZE_THRESHOLD,
            sort_entries: false,
            follow_links: false,
        }
    }
}

// ***************************************************************************
//                            Directory Functions
// ***************************************************************************
// ---------------------------------------------------------------------------
// init_server_args:
// ---------------------------------------------------------------------------
/** Get the command line arguments. */
fn init_server_args() -> ServerArgs {
    let args = ServerArgs::from_args();
    println!("{:?}", args);
    args
}

// ---------------------------------------------------------------------------
// init_server_dirs:
// ---------------------------------------------------------------------------
/** Calculate the external data directories. */
fn init_server_dirs() -> ServerDirs {
    // Initialize the mistrust object.
    let mistrust = get_mistrust();

    // Check that each path is absolute and is a directory with the
    // proper permission assign if it exists.  If it doesn't exist,
    // create it.
    let root_dir = get_root_dir();
    check_server_dir(&root_dir, "root directory", &mistrust);

    let config_dir = root_dir.clone() + CONFIG_DIR;
    check_server_dir(&config_dir, "config directory", &mistrust);

    let logs_dir = root_dir.clone() + LOGS_DIR;
    check_server_dir(&logs_dir, "logs directory", &mistrust);

    let certs_dir = root_dir.clone() + CERTS_DIR;
    check_server_dir(&certs_dir, "certs directory", &mistrust);

    // Package up and return the directories.
    ServerDirs { root_dir, config_dir, logs_dir, certs_dir }
}

// ---------------------------------------------------------------------------
// check_server_dir:
// ---------------------------------------------------------------------------
/** Check that the path is absolute and, if it exists, that is has the proper
 * permissions assigned.  If it doesn't exist, create it.  The mistrust package
 * creates directories with 0o700 permissions.
 *
 * Any failure results in a panic.
 */
fn check_server_dir(dir: &String, msgname: &str, mistrust: &Mistrust) {
    // Get the path object.
    let path = Path::new(dir);
    if !path.is_absolute() {
        panic!("The server {} path must be absolute: {}", msgname, dir);
    }
    if path.exists() {
        // Make sure the path represents a directory.
        if !path.is_dir() {
            panic!("The server {} path must be a directory: {}", msgname, dir);
        }

        // Make sure the directory had rwx for owner only.
        let meta = path.metadata().unwrap_or_else(|_| panic!("Unable to read metadata for {}: {}", msgname, dir));
        let perm = meta.permissions().mode();
        if perm & 0o777 != 0o700 {
            panic!("The server {} path must be have 0o700 permissions: {}", msgname, dir);
        }
    } else {
        // Create the directory with the correct permissions.
        if let Err(e) = mistrust.make_directory(path) {
            panic!("Make directory error for {:?}: {}", path, &e.to_string());
        }
    }
}

// ---------------------------------------------------------------------------
// get_mistrust:
// ---------------------------------------------------------------------------
/** Configure a new mistrust object for initial directory processing. */
fn get_mistrust() -> Mistrust {
    match Mistrust::builder()
        .ignore_prefix(get_absolute_path("~"))
        .trust_group(0)
        .build() {
            Ok(m) => m,
            Err(e) => {
                panic!("Mistrust configuration error: {}", &e.to_string());
            }
        }
}

// ---------------------------------------------------------------------------
// get_root_dir:
// ---------------------------------------------------------------------------
fn get_root_dir() -> String {
    // Order of precedence:
    //  1. Environment variable
    //  2. Command line --root-dir argument
    //  3. Default location
    //
    let root_dir = env::var(ENV_ROOT_DIR).unwrap_or_else(
        |_| {
            match SERVER_ARGS.root_dir.clone() {
                Some(r) => r,
                None => DEFAULT_ROOT_DIR.to_string(),
            }
        });

    // Canonicalize the path.
    get_absolute_path(&root_dir)
}

// ***************************************************************************
//                               Log Functions
// ***************************************************************************
// ---------------------------------------------------------------------------
// init_log:
// ---------------------------------------------------------------------------
/** Initialize log4rs from the config directory's log4rs.yml.  When that file
 * doesn't exist, log at info level to the console.
 */
pub fn init_log() {
    let logconfig = init_log_config();
    if !Path::new(&logconfig).exists() {
        init_console_log();
        info!("No log configuration at {}, logging to console.", logconfig);
        return;
    }

    match log4rs::init_file(logconfig.clone(), Default::default()) {
        Ok(_) => (),
        Err(e) => {
            println!("{}", e);
            let s = format!("{}", Errors::Log4rsInitialization(logconfig));
            panic!("{}", s);
        },
    }
    info!("Log4rs initialized using: {}", logconfig);
}

// ---------------------------------------------------------------------------
// init_console_log:
// ---------------------------------------------------------------------------
fn init_console_log() {
    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(CONSOLE_LOG_PATTERN)))
        .build();
    let config = log4rs::Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(LevelFilter::Info));

    let result = match config {
        Ok(c) => log4rs::init_config(c).map(|_| ()).map_err(|e| e.to_string()),
        Err(e) => Err(e.to_string()),
    };
    if let Err(e) = result {
        println!("{}", e);
        panic!("{}", Errors::Log4rsInitialization("console".to_string()));
    }
}

// ---------------------------------------------------------------------------
// init_log_config:
// ---------------------------------------------------------------------------
fn init_log_config() -> String {
    SERVER_DIRS.config_dir.clone() + LOG4RS_CONFIG_FILE
}

// ***************************************************************************
//                             Parms Functions
// ***************************************************************************
// ---------------------------------------------------------------------------
// get_parms:
// ---------------------------------------------------------------------------
/** Retrieve the application parameters from the configuration file in the
 * config directory.  If the file can't be read, default values are used.
 */
fn get_parms() -> Result<Parms> {
    // Get the config file path from its data directory.
    let config_file = SERVER_DIRS.config_dir.clone() + SERVER_CONFIG_FILE;

    // Read the cofiguration file.
    let config_file_abs = get_absolute_path(&config_file);
    info!("{}", Errors::ReadingConfigFile(config_file_abs.clone()));
    let contents = match fs::read_to_string(&config_file_abs) {
        Ok(c) => c,
        Err(_) => {
            println!("Unable to read configuration at {}. Using default values.", config_file);
            return Ok(Parms { config_file: Default::default(), config: Config::new() });
        }
    };

    let config = parse_config(&contents, &config_file_abs)?;
    Ok(Parms { config_file: config_file_abs, config })
}

// ---------------------------------------------------------------------------
// parse_config:
// ---------------------------------------------------------------------------
fn parse_config(contents: &str, config_file: &str) -> Result<Config> {
    match toml::from_str(contents) {
        Ok(c)  => Ok(c),
        Err(e) => {
            let msg = format!("{}\n   {}", Errors::TOMLParseError(config_file.to_string()), e);
            error!("{}", msg);
            Result::Err(anyhow!(msg))
        }
    }
}

// ***************************************************************************
//                             Config Functions
// ***************************************************************************
// ---------------------------------------------------------------------------
// init_runtime_context:
// ---------------------------------------------------------------------------
pub fn init_runtime_context() -> RuntimeCtx {
    // If this fails the application aborts.
    let parms = get_parms().expect("FAILED to read configuration file.");
    RuntimeCtx {parms, server_args: &SERVER_ARGS, server_dirs: &SERVER_DIRS}
}

// ***************************************************************************
//                                  Tests
// ***************************************************************************
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = Config::new();
        assert_eq!(c.http_port, 3000);
        assert_eq!(c.default_directory, ".");
        assert_eq!(c.size_threshold, 1024);
        assert!(!c.tls);
        assert_eq!(c.search_options(), SearchOptions::default());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let c = parse_config("http_port = 8080\nsort_entries = true\n", "test.toml").unwrap();
        assert_eq!(c.http_port, 8080);
        assert!(c.search_options().sort_entries);
        assert!(!c.search_options().follow_links);
        assert_eq!(c.title, "Files Server");
    }

    #[test]
    fn full_toml() {
        let toml = r#"
            title = "Lab Files"
            http_addr = "https://files.example"
            http_port = 8443
            tls = true
            default_directory = "/srv/share"
            size_threshold = 4096
            sort_entries = true
            follow_links = true
        "#;
        let c = parse_config(toml, "test.toml").unwrap();
        assert_eq!(c.title, "Lab Files");
        assert!(c.tls);
        assert_eq!(c.default_directory, "/srv/share");
        assert_eq!(c.size_threshold, 4096);
        assert!(c.follow_links);
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let err = parse_config("http_port = \"not a number\"", "bad.toml").unwrap_err();
        assert!(err.to_string().contains("bad.toml"));
    }
}
