use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use similar::{ChangeTag, TextDiff};

use tfboot_core::{OutputFormat, S3BackendDescriptor, TagSet, Value};
use tfboot_state::{BackendConfig, BootstrapConfig, bootstrap};

#[derive(Parser)]
#[command(name = "tfboot")]
#[command(about = "Bootstrap S3 remote state with DynamoDB locking for Terraform")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the state bucket and lock table if missing, then emit the backend configuration
    Init {
        #[command(flatten)]
        backend: BackendArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Emit the backend configuration without calling AWS
    Render {
        #[command(flatten)]
        backend: BackendArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args, Debug, Default)]
struct BackendArgs {
    /// JSON file with backend attributes (flags override its values)
    #[arg(long)]
    config: Option<PathBuf>,

    /// AWS region for the bucket and lock table
    #[arg(long)]
    region: Option<String>,

    /// State bucket name (must be globally unique)
    #[arg(long)]
    bucket: Option<String>,

    /// Object key of the state file inside the bucket
    #[arg(long)]
    key: Option<String>,

    /// Whether Terraform encrypts the state object [default: true]
    #[arg(long)]
    encrypt: Option<bool>,

    /// DynamoDB lock table name [default: terraform-locks]
    #[arg(long)]
    lock_table: Option<String>,

    /// Custom AWS endpoint (e.g., a local emulator)
    #[arg(long, env = "AWS_ENDPOINT_URL")]
    endpoint_url: Option<String>,

    /// Tag applied to every resource (repeatable)
    #[arg(long = "tag", value_name = "KEY=VALUE")]
    tags: Vec<String>,

    /// Tag applied to the state bucket only (repeatable)
    #[arg(long = "backend-tag", value_name = "KEY=VALUE")]
    backend_tags: Vec<String>,
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Output format: json (backend.tf.json) or hcl
    #[arg(long, default_value = "json")]
    format: OutputFormat,

    /// Write the backend configuration to this file instead of stdout
    #[arg(long, short)]
    out: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { backend, output } => run_init(&backend, &output).await,
        Commands::Render { backend, output } => run_render(&backend, &output),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run_init(args: &BackendArgs, output: &OutputArgs) -> Result<(), String> {
    let config = load_bootstrap_config(args)?;
    log::info!(
        "Provisioning remote state for scope '{}' (lock table '{}')",
        config.scope.name,
        config.lock_table
    );

    eprintln!(
        "{} s3://{} in {}",
        "Bootstrapping".cyan().bold(),
        config.bucket,
        config.region
    );

    let provisioned = bootstrap(&config).await.map_err(|e| e.to_string())?;

    if provisioned.bucket_created {
        eprintln!("{} bucket {}", "Created".green().bold(), config.bucket);
    } else {
        eprintln!("{} bucket {} already exists", "Kept".yellow().bold(), config.bucket);
    }

    if let Some(err) = &provisioned.lock_table.error {
        log::warn!(
            "Continuing without confirmed lock table '{}': {}",
            provisioned.lock_table.value,
            err
        );
        eprintln!(
            "{} lock table {} may not exist: {}",
            "Warning:".yellow().bold(),
            provisioned.lock_table.value,
            err
        );
    }

    emit(&provisioned.descriptor, output)
}

fn run_render(args: &BackendArgs, output: &OutputArgs) -> Result<(), String> {
    let config = load_bootstrap_config(args)?;

    let descriptor = S3BackendDescriptor {
        region: config.region,
        bucket: config.bucket,
        key: config.key,
        encrypt: config.encrypt,
        dynamodb_table: config.lock_table,
    };

    emit(&descriptor, output)
}

/// Merge the optional config file with command-line flags
fn load_bootstrap_config(args: &BackendArgs) -> Result<BootstrapConfig, String> {
    let mut config = match &args.config {
        Some(path) => BackendConfig::load(path).map_err(|e| e.to_string())?,
        None => BackendConfig::default(),
    };

    if let Some(region) = &args.region {
        config.set("region", region.as_str());
    }
    if let Some(bucket) = &args.bucket {
        config.set("bucket", bucket.as_str());
    }
    if let Some(key) = &args.key {
        config.set("key", key.as_str());
    }
    if let Some(encrypt) = args.encrypt {
        config.set("encrypt", encrypt);
    }
    if let Some(lock_table) = &args.lock_table {
        config.set("dynamodb_table", lock_table.as_str());
    }
    if let Some(endpoint_url) = &args.endpoint_url {
        config.set("endpoint_url", endpoint_url.as_str());
    }

    merge_tag_args(&mut config, "tags", &args.tags)?;
    merge_tag_args(&mut config, "backend_tags", &args.backend_tags)?;

    BootstrapConfig::from_config(&config).map_err(|e| e.to_string())
}

/// Add `KEY=VALUE` arguments to a map attribute, overriding file values
fn merge_tag_args(
    config: &mut BackendConfig,
    attribute: &str,
    args: &[String],
) -> Result<(), String> {
    if args.is_empty() {
        return Ok(());
    }

    let mut map: HashMap<String, Value> = match config.attributes.remove(attribute) {
        Some(Value::Map(map)) => map,
        Some(_) => return Err(format!("Attribute '{}' must be a map", attribute)),
        None => HashMap::new(),
    };

    for arg in args {
        let (key, value) = TagSet::parse_pair(arg).map_err(|e| e.to_string())?;
        map.insert(key, Value::String(value));
    }

    config.attributes.insert(attribute.to_string(), Value::Map(map));
    Ok(())
}

fn emit(descriptor: &S3BackendDescriptor, output: &OutputArgs) -> Result<(), String> {
    let mut rendered = descriptor
        .render(output.format)
        .map_err(|e| format!("Failed to render backend configuration: {}", e))?;
    if !rendered.ends_with('\n') {
        rendered.push('\n');
    }

    match &output.out {
        Some(path) => write_output(path, &rendered),
        None => {
            print!("{}", rendered);
            Ok(())
        }
    }
}

/// Write the rendered configuration, showing a diff when replacing different content
fn write_output(path: &Path, rendered: &str) -> Result<(), String> {
    match fs::read_to_string(path) {
        Ok(existing) if existing == rendered => {
            eprintln!("{} {}", "Unchanged".green(), path.display());
            return Ok(());
        }
        Ok(existing) => print_diff(path, &existing, rendered),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(format!("Failed to read {}: {}", path.display(), e)),
    }

    fs::write(path, rendered).map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
    eprintln!("{} {}", "Wrote".green().bold(), path.display());
    Ok(())
}

fn print_diff(file: &Path, original: &str, updated: &str) {
    eprintln!("\n{} {}:", "Diff for".cyan().bold(), file.display());

    let diff = TextDiff::from_lines(original, updated);
    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => "-".red(),
            ChangeTag::Insert => "+".green(),
            ChangeTag::Equal => " ".normal(),
        };
        eprint!("{}{}", sign, change);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tfboot_core::{BACKEND_TAG_CATEGORY, TagSource};

    fn args() -> BackendArgs {
        BackendArgs {
            region: Some("us-west-2".to_string()),
            bucket: Some("my-new-tf-bucket".to_string()),
            key: Some("envs/dev/terraform.tfstate".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn flags_build_bootstrap_config() {
        let mut args = args();
        args.encrypt = Some(false);
        args.tags = vec!["Owner=platform".to_string()];
        args.backend_tags = vec!["Purpose=terraform-state".to_string()];

        let config = load_bootstrap_config(&args).unwrap();
        assert_eq!(config.region, "us-west-2");
        assert!(!config.encrypt);
        assert_eq!(config.lock_table, "terraform-locks");

        let tags = config.scope.tags(BACKEND_TAG_CATEGORY);
        assert_eq!(tags.get("Owner"), Some("platform"));
        assert_eq!(tags.get("Purpose"), Some("terraform-state"));
    }

    #[test]
    fn flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tfboot.json");
        fs::write(
            &path,
            r#"{
                "region": "eu-west-1",
                "bucket": "from-file",
                "key": "k",
                "tags": {"Owner": "file", "Team": "infra"}
            }"#,
        )
        .unwrap();

        let args = BackendArgs {
            config: Some(path),
            bucket: Some("from-flag".to_string()),
            tags: vec!["Owner=flag".to_string()],
            ..Default::default()
        };

        let config = load_bootstrap_config(&args).unwrap();
        assert_eq!(config.region, "eu-west-1");
        assert_eq!(config.bucket, "from-flag");

        let tags = config.scope.tags(BACKEND_TAG_CATEGORY);
        assert_eq!(tags.get("Owner"), Some("flag"));
        assert_eq!(tags.get("Team"), Some("infra"));
    }

    #[test]
    fn malformed_tag_is_rejected() {
        let mut args = args();
        args.tags = vec!["no-separator".to_string()];

        let err = load_bootstrap_config(&args).err().unwrap();
        assert_eq!(err, "Invalid tag 'no-separator': expected KEY=VALUE");
    }

    #[test]
    fn render_writes_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backend.tf");

        let output = OutputArgs {
            format: OutputFormat::Hcl,
            out: Some(path.clone()),
        };
        run_render(&args(), &output).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("bucket         = \"my-new-tf-bucket\""));
        assert!(written.contains("dynamodb_table = \"terraform-locks\""));

        // Rendering again leaves the file as it is
        run_render(&args(), &output).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), written);
    }

    #[test]
    fn unreadable_output_file_is_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backend.tf.json");
        let original = [0xff, 0xfe, 0x00, 0x80];
        fs::write(&path, original).unwrap();

        let output = OutputArgs {
            format: OutputFormat::Json,
            out: Some(path.clone()),
        };
        let err = run_render(&args(), &output).unwrap_err();

        assert!(err.starts_with("Failed to read "));
        assert_eq!(fs::read(&path).unwrap(), original);
    }

    #[test]
    fn render_creates_missing_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backend.tf.json");

        let output = OutputArgs {
            format: OutputFormat::Json,
            out: Some(path.clone()),
        };
        run_render(&args(), &output).unwrap();

        assert!(fs::read_to_string(&path).unwrap().contains("\"my-new-tf-bucket\""));
    }
}
