use cmdtree::{Cli, EXIT_FAILURE, Handlers, Invocation, SchemaFormat, export_schema};
use cmdtree_core::CommandManifest;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Tree declaration compiled into the binary.
const EMBEDDED_MANIFEST: &str = include_str!("../opsctl.yml");

/// Environment variable holding the log filter.
const LOG_ENV: &str = "OPSCTL_LOG";

/// Environment variable pointing at a replacement manifest file.
const MANIFEST_ENV: &str = "OPSCTL_MANIFEST";

/// What `main` still has to do after a handler returns.
#[derive(Debug)]
enum Action {
    Done,
    ExportSchema(SchemaFormat),
}

type Reply = Result<Action, String>;

fn main() {
    setup_logging();

    let cli = match build_cli() {
        Ok(cli) => cli,
        Err(err) => fail(&err),
    };

    let result = match cli.run() {
        None | Some(Ok(Action::Done)) => Ok(()),
        Some(Ok(Action::ExportSchema(format))) => {
            export_schema(&cli, format).map(|schema| println!("{}", schema.trim_end()))
        }
        Some(Err(err)) => Err(err),
    };

    if let Err(err) = result {
        fail(&err);
    }
}

fn fail(err: &str) -> ! {
    eprintln!("error: {err}");
    std::process::exit(EXIT_FAILURE);
}

fn setup_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_filter(filter),
    );

    subscriber.try_init().unwrap_or_else(|e| {
        eprintln!("Error: Failed to set up logging: {e}");
    });
}

fn load_manifest() -> Result<CommandManifest, String> {
    match std::env::var_os(MANIFEST_ENV) {
        Some(path) => {
            debug!(path = ?path, "loading manifest override");
            CommandManifest::load(&path).map_err(|err| {
                format!("Failed to load manifest '{}': {err}", path.to_string_lossy())
            })
        }
        None => CommandManifest::from_yaml_str(EMBEDDED_MANIFEST)
            .map_err(|err| format!("Embedded manifest is invalid: {err}")),
    }
}

fn build_cli() -> Result<Cli<Reply>, String> {
    let manifest = load_manifest()?;
    Cli::from_manifest(manifest, handlers()).map_err(|err| err.to_string())
}

fn handlers() -> Handlers<Reply> {
    Handlers::new()
        .on("status", run_status)
        .on("deploy", run_deploy)
        .on("db migrate", run_migrate)
        .on("db reset", run_reset)
        .on("db backup create", run_backup_create)
        .on("db backup list", |_| {
            println!("No backups stored");
            Ok(Action::Done)
        })
        .on("schema", run_schema)
}

fn run_status(inv: &Invocation) -> Reply {
    println!("Fleet status: 3 services healthy");
    if inv.flags.is_set("verbose") {
        for service in ["api", "worker", "scheduler"] {
            println!("  {service}: healthy");
        }
    }
    Ok(Action::Done)
}

fn run_deploy(inv: &Invocation) -> Reply {
    let service = &inv.args[0];
    let region = inv.args.get(1).map_or("all regions", String::as_str);
    let env = inv.flags.value("env").unwrap_or_default();
    let tag = inv.flags.value("tag").unwrap_or("latest");

    if inv.flags.is_set("verbose") {
        println!("Resolved {service}@{tag} for {env}");
    }
    let verb = if inv.flags.is_set("dry-run") {
        "Would deploy"
    } else {
        "Deployed"
    };
    println!("{verb} {service}@{tag} to {env} ({region})");
    Ok(Action::Done)
}

fn run_migrate(inv: &Invocation) -> Reply {
    match inv.flags.value("to") {
        Some(version) => println!("Migrated database to version {version}"),
        None => println!("Migrated database to latest"),
    }
    Ok(Action::Done)
}

fn run_reset(inv: &Invocation) -> Reply {
    let env = inv.flags.value("env").unwrap_or_default();
    println!("Reset database in {env}");
    Ok(Action::Done)
}

fn run_backup_create(inv: &Invocation) -> Reply {
    let label = inv.args.first().map_or("manual", String::as_str);
    println!("Created backup '{label}'");
    Ok(Action::Done)
}

fn run_schema(inv: &Invocation) -> Reply {
    let format = inv.flags.value("format").unwrap_or("json").parse()?;
    Ok(Action::ExportSchema(format))
}
