#![forbid(unsafe_code)]

// Source trees built outside a git checkout still need these variables, so
// each lookup falls back to "unknown" rather than failing the build.
fn set_env(name: &str, value: Result<String, String>) {
    println!("cargo:rustc-env={}={}", name, value.unwrap_or_else(|_| "unknown".to_string()));
}

fn main() {
    set_env("GIT_BRANCH", build_data::get_git_branch());
    set_env("GIT_COMMIT_SHORT", build_data::get_git_commit_short());
    set_env("GIT_DIRTY", build_data::get_git_dirty().map(|d| d.to_string()));
    // Using the build time instead makes the build unreproducible.
    set_env("SOURCE_TIMESTAMP", build_data::get_source_time().map(build_data::format_timestamp));
    set_env("RUSTC_VERSION", build_data::get_rustc_version());

    // Tells cargo not to rebuild build.rs during debug builds when other files change.
    // This speeds up development builds.
    //build_data::no_debug_rebuilds();
}
