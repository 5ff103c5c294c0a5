//! Init command implementation
//!
//! Scaffolds a new genre-server project with the files needed to start it.

use super::output::Output;
use std::fs;
use std::path::Path;

/// Result of the init operation
#[derive(Debug)]
pub enum InitResult {
    /// Initialization completed successfully
    Success,
    /// Project already exists (genres.toml found)
    AlreadyExists,
    /// An error occurred during initialization
    Error(String),
}

/// Configuration for the init command
pub struct InitConfig {
    /// Directory to initialize
    pub path: std::path::PathBuf,
    /// Overwrite existing files
    pub force: bool,
    /// Host address for the server
    pub host: String,
    /// Port for the server
    pub port: u16,
}

/// Run the init command
pub fn run(config: InitConfig, output: &Output) -> InitResult {
    output.banner();
    output.section("Initializing genre-server project");

    let base_path = &config.path;

    // Check if genres.toml already exists
    let config_path = base_path.join("genres.toml");
    if config_path.exists() && !config.force {
        output.warning("genres.toml already exists!");
        output.hint("Use --force to overwrite existing files");
        return InitResult::AlreadyExists;
    }

    let data_dir = base_path.join("data");
    if !data_dir.exists() {
        if let Err(e) = fs::create_dir_all(&data_dir) {
            output.error(&format!("Failed to create data: {}", e));
            return InitResult::Error(e.to_string());
        }
        output.created("data/");
    } else {
        output.skipped("data/", "already exists");
    }

    let toml_content = generate_genres_toml(&config);
    if let Err(e) = write_file(&config_path, &toml_content, config.force) {
        output.error(&format!("Failed to create genres.toml: {}", e));
        return InitResult::Error(e.to_string());
    }
    output.created("genres.toml");

    let env_example_path = base_path.join(".env.example");
    if let Err(e) = write_file(&env_example_path, &generate_env_example(), config.force) {
        output.error(&format!("Failed to create .env.example: {}", e));
        return InitResult::Error(e.to_string());
    }
    output.created(".env.example");

    // Create .gitignore if it doesn't exist
    let gitignore_path = base_path.join(".gitignore");
    if !gitignore_path.exists() {
        if let Err(e) = write_file(&gitignore_path, &generate_gitignore(), false) {
            output.warning(&format!("Failed to create .gitignore: {}", e));
        } else {
            output.created(".gitignore");
        }
    }

    output.done("genre-server project initialized");

    output.section("Next steps");
    output.next_step(1, "Copy the generated secret into .env", Some("cp .env.example .env"));
    output.next_step(2, "Start the server", Some("genre-server"));
    output.next_step(3, "Register a user with POST /register", None);

    output.hint(&format!(
        "Server will be available at http://{}:{}",
        config.host, config.port
    ));
    output.hint("OpenAPI document at /api-docs/openapi.json");

    InitResult::Success
}

fn write_file(path: &Path, content: &str, force: bool) -> std::io::Result<()> {
    if path.exists() && !force {
        return Ok(()); // Skip existing files unless force is true
    }
    fs::write(path, content)
}

fn generate_genres_toml(config: &InitConfig) -> String {
    format!(
        r#"# genre-server Configuration
# ==========================
# Generated by: genre-server init
#
# REQUIRED: Set this environment variable before starting:
#   - JWT_SECRET: A secret key for token signing (min 32 characters)

[server]
host = "{host}"
port = {port}
log_level = "info"
# Largest accepted request body in bytes
max_body_bytes = 65536

[auth]
jwt_secret_env = "JWT_SECRET"
# Token lifetime in seconds
token_expiry = 3600
# Seconds between removals of expired blacklist entries (0 disables)
blacklist_cleanup_interval = 600

[database]
# Local SQLite file, or ":memory:" for an ephemeral database
url = "./data/genres.db"
# Remote Turso (requires the `turso` feature):
# turso_url_env = "TURSO_DATABASE_URL"
# turso_token_env = "TURSO_AUTH_TOKEN"
"#,
        host = config.host,
        port = config.port,
    )
}

fn generate_env_example() -> String {
    format!(
        r#"# genre-server environment
# Freshly generated; replace it if this file is ever shared.
JWT_SECRET={secret}

# Log filter (overrides server.log_level)
# RUST_LOG=genres=debug,tower_http=debug
"#,
        secret = generate_secret()
    )
}

/// 32 random bytes, hex encoded.
fn generate_secret() -> String {
    hex::encode(rand::random::<[u8; 32]>())
}

fn generate_gitignore() -> String {
    r#"# genre-server generated files
/data/
*.db
*.db-journal

# Environment
.env
.env.local

# Rust
/target/
"#
    .to_string()
}
