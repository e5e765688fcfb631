#![forbid(unsafe_code)]

use lazy_static::lazy_static;
use log::info;
use poem::listener::{Listener, RustlsCertificate, RustlsConfig};
use poem::{listener::TcpListener, Route};
use poem_openapi::OpenApiService;

// Server Utilities
use crate::v1::files::files_filter::FilterFilesApi;
use crate::v1::files::files_list::ListFilesApi;
use crate::v1::files::files_search::SearchFilesApi;
use crate::v1::files::files_transform::TransformFilesApi;
use crate::v1::files::refactor_example::RefactorExampleApi;
use crate::v1::files::version::VersionApi;
use crate::utils::config::{init_log, init_runtime_context, RuntimeCtx, SERVER_ARGS, SERVER_DIRS,
                           CERT_FILE, KEY_FILE};
use crate::utils::errors::Errors;

// Modules
mod fileops;
mod utils;
mod v1;

// ***************************************************************************
//                                Constants
// ***************************************************************************
const SERVER_NAME : &str = "FilesServer"; // for poem logging

// ***************************************************************************
//                             Static Variables
// ***************************************************************************
// Lazily initialize the parameters variable so that is has a 'static lifetime.
// We exit if we can't read our parameters.
lazy_static! {
    static ref RUNTIME_CTX: RuntimeCtx = init_runtime_context();
}

// ---------------------------------------------------------------------------
// main:
// ---------------------------------------------------------------------------
#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    // --------------- Initialize Server --------------
    // Announce ourselves.
    println!("Starting files_server!");

    // Only lay down the data directories if that's all that was asked for.
    if SERVER_ARGS.create_dirs_only {
        println!("Data directories are rooted at {}.", SERVER_DIRS.root_dir);
        return Ok(());
    }

    // Initialize the server.
    server_init();

    // --------------- Main Loop Set Up ---------------
    // Assign base URL.
    let config = &RUNTIME_CTX.parms.config;
    let server_url = format!("{}:{}{}", config.http_addr, config.http_port, "/v1");

    // Every endpoint takes its defaults from the configuration.
    let endpoints = (ListFilesApi::new(config),
                     TransformFilesApi::new(config),
                     FilterFilesApi::new(config),
                     SearchFilesApi::new(config),
                     RefactorExampleApi,
                     VersionApi);
    let api_service =
        OpenApiService::new(endpoints, config.title.clone(), env!("CARGO_PKG_VERSION"))
            .server(server_url);

    // Allow the generated openapi specs to be retrieved from the server.
    let spec = api_service.spec_endpoint();
    let spec_yaml = api_service.spec_endpoint_yaml();

    // Create the routes and run the server.
    let addr = format!("{}{}", "0.0.0.0:", config.http_port);
    let ui = api_service.swagger_ui();
    let app = Route::new()
        .nest("/v1", api_service)
        .nest("/", ui)
        .at("/spec", spec)
        .at("/spec_yaml", spec_yaml);

    // ------------------ Main Loop -------------------
    let listener = TcpListener::bind(addr);
    if config.tls {
        let certs_dir = &RUNTIME_CTX.server_dirs.certs_dir;
        let tls_config = RustlsConfig::new().fallback(
            RustlsCertificate::new()
                .key(std::fs::read(certs_dir.clone() + KEY_FILE)?)
                .cert(std::fs::read(certs_dir.clone() + CERT_FILE)?),
        );
        poem::Server::new(listener.rustls(tls_config))
            .name(SERVER_NAME)
            .run(app)
            .await
    } else {
        poem::Server::new(listener)
            .name(SERVER_NAME)
            .run(app)
            .await
    }
}

// ***************************************************************************
//                             Private Functions
// ***************************************************************************
// ---------------------------------------------------------------------------
// server_init:
// ---------------------------------------------------------------------------
/** Initialize all subsystems and data structures other than those needed
 * to configure the main loop processor.
 */
fn server_init() {
    // Configure our log.
    init_log();

    // Force the reading of input parameters and initialization of runtime context.
    info!("{}", Errors::InputParms(format!("{:#?}", *RUNTIME_CTX)));

    // Log build info.
    print_version_info();
}

// ---------------------------------------------------------------------------
// print_version_info:
// ---------------------------------------------------------------------------
fn print_version_info() {
    info!("\n*** Running FILES_SERVER={}, BRANCH={}, COMMIT={}, DIRTY={}, SRC_TS={}, RUSTC={}.",
          option_env!("CARGO_PKG_VERSION").unwrap_or("unknown"),
          env!("GIT_BRANCH"),
          env!("GIT_COMMIT_SHORT"),
          env!("GIT_DIRTY"),
          env!("SOURCE_TIMESTAMP"),
          env!("RUSTC_VERSION"));
}
